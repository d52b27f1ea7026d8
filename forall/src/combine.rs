//! Combinators building one generator out of several.
//!
//! Combined generators draw from their components in declared order, once
//! per component and per value, from the single cursor of the run. Their
//! samples are the cartesian product of the component samples, with the
//! first component varying slowest.

use std::sync::Arc;

use crate::config::ConfigError;
use crate::error::GenerationError;
use crate::generator::Generator;
use crate::rng::Random;

/// Tuples of generators that can be merged into a generator of tuples
pub trait Combine {
    /// Tuple of the component value types
    type Output;

    /// Merge the components into one generator
    fn combine(self) -> Generator<Self::Output>;
}

/// Tuples of generators whose values can be merged by an N-ary transform
pub trait CombineMap<F, R>: Combine {
    /// Merge the components, applying `transform` to every drawn and sample
    /// tuple. Sample tuples sent to the same value collapse into one.
    fn combine_map(self, transform: F) -> Generator<R>;
}

/// Combine a tuple of 2 to 6 generators into a generator of tuples.
///
/// ```rust
/// use forall::{combine, Generator};
///
/// let pairs = combine((
///     Generator::constant(0).with_samples([1, 2]),
///     Generator::constant("x").with_samples(["one", "two"]),
/// ));
/// assert_eq!(pairs.samples().len(), 4);
/// ```
pub fn combine<C: Combine>(generators: C) -> Generator<C::Output> {
    generators.combine()
}

/// Combine a tuple of generators and merge each tuple with `transform`
pub fn combine_map<C, F, R>(generators: C, transform: F) -> Generator<R>
where
    C: CombineMap<F, R>,
{
    generators.combine_map(transform)
}

/// Combine any number of generators of the same type.
///
/// Samples are the cartesian product as for [`combine`]. Combining zero
/// generators is a configuration error.
pub fn combine_all<T>(generators: Vec<Generator<T>>) -> Result<Generator<Vec<T>>, ConfigError>
where
    T: Clone + Send + Sync + 'static,
{
    if generators.is_empty() {
        return Err(ConfigError::NoGenerators);
    }

    let sizes: Vec<usize> = generators.iter().map(|g| g.samples().len()).collect();
    let samples = product_indices(&sizes)
        .map(|indices| {
            indices
                .iter()
                .zip(&generators)
                .map(|(&index, generator)| generator.samples()[index].clone())
                .collect()
        })
        .collect();

    let components = Arc::new(generators);
    let sampler = Arc::new(move |random: &mut Random| -> Result<Vec<T>, GenerationError> {
        components
            .iter()
            .map(|generator| generator.generate(random))
            .collect()
    });

    Ok(Generator::from_parts(sampler, samples))
}

/// Index tuples of the cartesian product of sets with the given sizes.
///
/// The first position varies slowest. Any empty set makes the product empty.
fn product_indices(sizes: &[usize]) -> impl Iterator<Item = Vec<usize>> + '_ {
    let total: usize = sizes.iter().product();
    (0..total).map(move |mut flat| {
        let mut indices = vec![0; sizes.len()];
        for (position, &size) in sizes.iter().enumerate().rev() {
            indices[position] = flat % size;
            flat /= size;
        }
        indices
    })
}

macro_rules! impl_combine {
    ($($index:tt => $ty:ident, $generator:ident, $value:ident);+) => {
        impl<$($ty),+> Combine for ($(Generator<$ty>,)+)
        where
            $($ty: Clone + Send + Sync + 'static),+
        {
            type Output = ($($ty,)+);

            fn combine(self) -> Generator<Self::Output> {
                let ($($generator,)+) = self;

                let sizes = [$($generator.samples().len()),+];
                let samples = product_indices(&sizes)
                    .map(|indices| ($($generator.samples()[indices[$index]].clone(),)+))
                    .collect();

                let sampler = Arc::new(
                    move |random: &mut Random| -> Result<Self::Output, GenerationError> {
                        Ok(($($generator.generate(random)?,)+))
                    },
                );

                Generator::from_parts(sampler, samples)
            }
        }

        impl<$($ty,)+ F, R> CombineMap<F, R> for ($(Generator<$ty>,)+)
        where
            $($ty: Clone + Send + Sync + 'static,)+
            F: Fn($($ty),+) -> R + Send + Sync + 'static,
            R: PartialEq + 'static,
        {
            fn combine_map(self, transform: F) -> Generator<R> {
                self.combine()
                    .map(move |($($value,)+)| transform($($value),+))
            }
        }
    };
}

impl_combine!(0 => A, ga, a; 1 => B, gb, b);
impl_combine!(0 => A, ga, a; 1 => B, gb, b; 2 => C, gc, c);
impl_combine!(0 => A, ga, a; 1 => B, gb, b; 2 => C, gc, c; 3 => D, gd, d);
impl_combine!(0 => A, ga, a; 1 => B, gb, b; 2 => C, gc, c; 3 => D, gd, d; 4 => E, ge, e);
impl_combine!(0 => A, ga, a; 1 => B, gb, b; 2 => C, gc, c; 3 => D, gd, d; 4 => E, ge, e; 5 => G, gg, g);

impl<T> Generator<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Pair this generator with `other`; same as `combine((self, other))`
    pub fn combine_with<U>(self, other: Generator<U>) -> Generator<(T, U)>
    where
        U: Clone + Send + Sync + 'static,
    {
        combine((self, other))
    }

    /// Pair this generator with `other` and merge each pair with `transform`
    pub fn combine_with_map<U, F, R>(self, other: Generator<U>, transform: F) -> Generator<R>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(T, U) -> R + Send + Sync + 'static,
        R: PartialEq + 'static,
    {
        combine_map((self, other), transform)
    }
}
