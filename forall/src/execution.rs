//! Property check execution: the `ForAll` runner and its free-function forms.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::combine::Combine;
use crate::config::{ConfigError, TestConfig, get_global_config};
use crate::error::{
    CheckError, FalsificationCause, FalsifiedPropertyError, GenerationError, panic_message,
};
use crate::generator::{Generator, GeneratorRegistry};
use crate::property::{PropertyEvaluationContext, PropertyOutcome};
use crate::rng::fresh_seed;

/// Outcome of a property check
pub type CheckResult<T> = Result<CheckSummary, CheckError<T>>;

/// What a passing run evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckSummary {
    /// Total evaluations, samples included
    pub evaluations: usize,
    /// Evaluations fed from the sample set
    pub sample_evaluations: usize,
    /// Seed of the random part of the run
    pub seed: u64,
}

/// Argument generators of a property.
///
/// Implemented for a single [`Generator`] (one argument) and for tuples of
/// one to six generators (one argument per component).
///
/// Arguments appear in failure messages in their `Debug` form. Numbers and
/// booleans print as their plain value; strings and chars are quoted and
/// escaped (`"a\nb"`), so whitespace and control characters stay visible
/// in the report. Types wanting a custom rendering implement `Debug` by hand.
pub trait Generators {
    /// Values handed to the property body
    type Values: Clone + 'static;

    /// Merge the argument generators into one
    fn combined(self) -> Generator<Self::Values>;

    /// `Debug` rendering of each argument, in declaration order
    fn describe(values: &Self::Values) -> Vec<String>;
}

impl<A> Generators for Generator<A>
where
    A: Clone + fmt::Debug + 'static,
{
    type Values = A;

    fn combined(self) -> Generator<A> {
        self
    }

    fn describe(value: &A) -> Vec<String> {
        vec![format!("{:?}", value)]
    }
}

impl<A> Generators for (Generator<A>,)
where
    A: Clone + fmt::Debug + 'static,
{
    type Values = (A,);

    fn combined(self) -> Generator<(A,)> {
        self.0.map_each(|a| (a,))
    }

    fn describe(values: &(A,)) -> Vec<String> {
        vec![format!("{:?}", values.0)]
    }
}

macro_rules! impl_generators {
    ($($ty:ident, $value:ident);+) => {
        impl<$($ty),+> Generators for ($(Generator<$ty>,)+)
        where
            $($ty: Clone + fmt::Debug + Send + Sync + 'static),+
        {
            type Values = ($($ty,)+);

            fn combined(self) -> Generator<Self::Values> {
                self.combine()
            }

            fn describe(values: &Self::Values) -> Vec<String> {
                let ($($value,)+) = values;
                vec![$(format!("{:?}", $value)),+]
            }
        }
    };
}

impl_generators!(A, a; B, b);
impl_generators!(A, a; B, b; C, c);
impl_generators!(A, a; B, b; C, c; D, d);
impl_generators!(A, a; B, b; C, c; D, d; E, e);
impl_generators!(A, a; B, b; C, c; D, d; E, e; G, g);

/// Argument tuples whose generators can be looked up in a [`GeneratorRegistry`]
pub trait DefaultArguments: Clone + 'static {
    /// Combined generator built from the registered default of every component
    fn default_generator(registry: &GeneratorRegistry) -> Result<Generator<Self>, ConfigError>;

    /// `Debug` rendering of each argument, in declaration order
    fn describe(values: &Self) -> Vec<String>;
}

macro_rules! impl_default_arguments {
    ($($ty:ident),+) => {
        impl<$($ty),+> DefaultArguments for ($($ty,)+)
        where
            $($ty: Clone + fmt::Debug + Send + Sync + 'static),+
        {
            fn default_generator(
                registry: &GeneratorRegistry,
            ) -> Result<Generator<Self>, ConfigError> {
                Ok(($(registry.resolve::<$ty>()?,)+).combined())
            }

            fn describe(values: &Self) -> Vec<String> {
                <($(Generator<$ty>,)+) as Generators>::describe(values)
            }
        }
    };
}

impl_default_arguments!(A);
impl_default_arguments!(A, B);
impl_default_arguments!(A, B, C);
impl_default_arguments!(A, B, C, D);
impl_default_arguments!(A, B, C, D, E);
impl_default_arguments!(A, B, C, D, E, G);

/// Configurable property runner.
///
/// Options left unset fall back to the global configuration (see
/// [`get_global_config`]).
///
/// ```rust
/// use forall::{ForAll, ints};
///
/// let summary = ForAll::new()
///     .iterations(50)
///     .seed(7)
///     .check((ints::<i32>(), ints::<i32>()), |(a, b)| {
///         a.wrapping_add(b) == b.wrapping_add(a)
///     })
///     .unwrap();
/// assert_eq!(summary.evaluations, 50);
/// ```
#[derive(Debug, Default)]
pub struct ForAll {
    iterations: Option<usize>,
    seed: Option<u64>,
    registry: Option<GeneratorRegistry>,
}

impl ForAll {
    /// Runner using the global configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of evaluations
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = Some(iterations);
        self
    }

    /// Set the seed for a reproducible run
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Registry used by [`check_default`](Self::check_default)
    pub fn registry(mut self, registry: GeneratorRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Check `property` against values of `generators`
    pub fn check<G, F, O>(&self, generators: G, property: F) -> CheckResult<G::Values>
    where
        G: Generators,
        F: Fn(G::Values) -> O,
        O: PropertyOutcome,
    {
        self.check_with_context(generators, |values, _| property(values))
    }

    /// Like [`check`](Self::check), also passing the evaluation context
    pub fn check_with_context<G, F, O>(&self, generators: G, property: F) -> CheckResult<G::Values>
    where
        G: Generators,
        F: Fn(G::Values, &PropertyEvaluationContext) -> O,
        O: PropertyOutcome,
    {
        let config = self.resolve_config()?;
        run(generators.combined(), G::describe, &config, property)
    }

    /// Check `property` with generators looked up from the registry by
    /// argument type
    pub fn check_default<A, F, O>(&self, property: F) -> CheckResult<A>
    where
        A: DefaultArguments,
        F: Fn(A) -> O,
        O: PropertyOutcome,
    {
        let config = self.resolve_config()?;
        let generator = match &self.registry {
            Some(registry) => A::default_generator(registry)?,
            None => A::default_generator(&GeneratorRegistry::with_defaults())?,
        };
        run(generator, A::describe, &config, |values, _| property(values))
    }

    /// Like [`check`](Self::check), panicking with the failure message
    pub fn assert<G, F, O>(&self, generators: G, property: F)
    where
        G: Generators,
        F: Fn(G::Values) -> O,
        O: PropertyOutcome,
    {
        if let Err(error) = self.check(generators, property) {
            panic!("{}", error);
        }
    }

    fn resolve_config(&self) -> Result<TestConfig, ConfigError> {
        let global = get_global_config()?;
        TestConfig::from_global_with_overrides(&global, self.iterations, self.seed)
    }
}

/// Check `property` against values of `generators` with the global
/// configuration.
///
/// ```rust
/// use forall::{check_for_all, ints, strings};
///
/// let result = check_for_all((ints::<u8>(), strings()), |(n, s)| {
///     s.repeat(n as usize % 4).len() == s.len() * (n as usize % 4)
/// });
/// assert!(result.is_ok());
/// ```
pub fn check_for_all<G, F, O>(generators: G, property: F) -> CheckResult<G::Values>
where
    G: Generators,
    F: Fn(G::Values) -> O,
    O: PropertyOutcome,
{
    ForAll::new().check(generators, property)
}

/// Like [`check_for_all`], also passing the evaluation context
pub fn check_for_all_with_context<G, F, O>(generators: G, property: F) -> CheckResult<G::Values>
where
    G: Generators,
    F: Fn(G::Values, &PropertyEvaluationContext) -> O,
    O: PropertyOutcome,
{
    ForAll::new().check_with_context(generators, property)
}

/// Check `property` with the default generators of its argument types.
///
/// ```rust
/// use forall::check_for_all_default;
///
/// let result = check_for_all_default(|(a, b): (i64, i64)| a.wrapping_mul(b) == b.wrapping_mul(a));
/// assert!(result.is_ok());
/// ```
pub fn check_for_all_default<A, F, O>(property: F) -> CheckResult<A>
where
    A: DefaultArguments,
    F: Fn(A) -> O,
    O: PropertyOutcome,
{
    ForAll::new().check_default(property)
}

/// Check `property` and panic with the failure message when it does not hold
pub fn assert_for_all<G, F, O>(generators: G, property: F)
where
    G: Generators,
    F: Fn(G::Values) -> O,
    O: PropertyOutcome,
{
    ForAll::new().assert(generators, property)
}

fn run<T, F, O>(
    generator: Generator<T>,
    describe: fn(&T) -> Vec<String>,
    config: &TestConfig,
    property: F,
) -> CheckResult<T>
where
    T: Clone + 'static,
    F: Fn(T, &PropertyEvaluationContext) -> O,
    O: PropertyOutcome,
{
    let seed = config.seed.unwrap_or_else(fresh_seed);
    let samples = generator.samples();
    let total = config.iterations.max(samples.len());

    debug!(
        seed,
        total,
        samples = samples.len(),
        "starting property check"
    );

    let evaluate = |iteration: usize, values: T, is_sample: bool| -> Result<(), CheckError<T>> {
        let context = PropertyEvaluationContext::new(iteration, total, seed, is_sample);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            property(values.clone(), &context).into_result()
        }));
        let cause = match outcome {
            Ok(Ok(())) => return Ok(()),
            Ok(Err(cause)) => cause,
            Err(payload) => FalsificationCause::Panicked(panic_message(payload.as_ref())),
        };

        debug!(iteration, total, seed, %cause, "property falsified");
        Err(CheckError::Falsified(FalsifiedPropertyError {
            rendered_arguments: describe(&values),
            arguments: values,
            failing_iteration: iteration,
            total_iterations: total,
            seed,
            cause,
        }))
    };

    for (index, values) in samples.iter().enumerate() {
        evaluate(index + 1, values.clone(), true)?;
    }

    let mut sequence = generator.random_sequence(seed);
    for iteration in samples.len() + 1..=total {
        let drawn = panic::catch_unwind(AssertUnwindSafe(|| sequence.next()));
        let values = match drawn {
            Ok(Some(Ok(values))) => values,
            Ok(Some(Err(error))) => return Err(generation_failed(error, iteration, seed)),
            Ok(None) => {
                let error = GenerationError::new("random sequence ended");
                return Err(generation_failed(error, iteration, seed));
            }
            Err(payload) => {
                let message = format!("generator panicked: {}", panic_message(payload.as_ref()));
                return Err(generation_failed(GenerationError::new(message), iteration, seed));
            }
        };
        evaluate(iteration, values, false)?;
    }

    debug!(seed, total, "property check passed");
    Ok(CheckSummary {
        evaluations: total,
        sample_evaluations: samples.len(),
        seed,
    })
}

fn generation_failed<T>(error: GenerationError, iteration: usize, seed: u64) -> CheckError<T> {
    let error = error.with_context(format!("evaluation {}", iteration));
    warn!(iteration, seed, %error, "generator failed");
    CheckError::Generation(error)
}
