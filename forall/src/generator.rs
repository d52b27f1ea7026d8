//! Core generator value, random sequences and the default-generator registry.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use rand::Rng;

use crate::config::ConfigError;
use crate::error::GenerationError;
use crate::rng::Random;

/// Consecutive rejections tolerated by [`Generator::filter`] before giving up
pub const MAX_FILTER_ATTEMPTS: usize = 1000;

type Sampler<T> = Arc<dyn Fn(&mut Random) -> Result<T, GenerationError> + Send + Sync>;

/// Producer of test values of type `T`.
///
/// A generator pairs a sampling function, which turns draws from a
/// [`Random`] cursor into values, with a set of samples that every run
/// evaluates before any random value. Generators are immutable; every
/// builder method returns a new generator and clones share the sampler.
///
/// ```rust
/// use forall::Generator;
/// use rand::Rng;
///
/// let digits = Generator::create(|random| random.gen_range(0..10)).with_samples([0, 9]);
/// assert_eq!(digits.samples(), &[0, 9]);
/// ```
pub struct Generator<T> {
    sampler: Sampler<T>,
    samples: Vec<T>,
}

impl<T: 'static> Generator<T> {
    /// Create a generator from a sampling function, with no samples
    pub fn create<F>(sample: F) -> Self
    where
        F: Fn(&mut Random) -> T + Send + Sync + 'static,
    {
        Self::try_create(move |random| Ok(sample(random)))
    }

    /// Create a generator from a sampling function that may fail
    pub fn try_create<F>(sample: F) -> Self
    where
        F: Fn(&mut Random) -> Result<T, GenerationError> + Send + Sync + 'static,
    {
        Self {
            sampler: Arc::new(sample),
            samples: Vec::new(),
        }
    }

    /// Generator that always produces `value`
    pub fn constant(value: T) -> Self
    where
        T: Clone + Send + Sync,
    {
        Self::create(move |_| value.clone())
    }

    /// Uniform choice among `values`, all of which are also samples
    pub fn one_of(values: Vec<T>) -> Result<Self, ConfigError>
    where
        T: Clone + PartialEq + Send + Sync,
    {
        if values.is_empty() {
            return Err(ConfigError::EmptyChoices);
        }

        let choices = Arc::new(values.clone());
        let generator = Self::create(move |random| {
            let index = random.gen_range(0..choices.len());
            choices[index].clone()
        });
        Ok(generator.with_samples(values))
    }

    /// Add values that every run must evaluate.
    ///
    /// Samples form a set: values already present are not added twice.
    pub fn with_samples<I>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: PartialEq,
    {
        for value in values {
            if !self.samples.contains(&value) {
                self.samples.push(value);
            }
        }
        self
    }

    /// Same sampling function, no samples
    pub fn without_samples(self) -> Self {
        Self {
            sampler: self.sampler,
            samples: Vec::new(),
        }
    }

    /// Values every run evaluates before drawing random ones
    pub fn samples(&self) -> &[T] {
        &self.samples
    }

    /// Draw one value from the cursor
    pub fn generate(&self, random: &mut Random) -> Result<T, GenerationError> {
        (self.sampler)(random)
    }

    /// Endless sequence of random values for `seed`.
    ///
    /// Every call starts a fresh cursor, so two sequences created with the
    /// same seed yield the same values.
    pub fn random_sequence(&self, seed: u64) -> RandomSequence<T> {
        RandomSequence {
            generator: Generator {
                sampler: Arc::clone(&self.sampler),
                samples: Vec::new(),
            },
            random: Random::from_seed(seed),
        }
    }

    /// Transform every drawn value and every sample.
    ///
    /// Samples the transform sends to the same value collapse into one.
    pub fn map<U, F>(self, transform: F) -> Generator<U>
    where
        U: PartialEq + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let mapped = self.map_each(transform);
        let mut samples = Vec::with_capacity(mapped.samples.len());
        for value in mapped.samples {
            if !samples.contains(&value) {
                samples.push(value);
            }
        }
        Generator {
            sampler: mapped.sampler,
            samples,
        }
    }

    /// One-to-one `map` for transforms that cannot merge samples
    pub(crate) fn map_each<U, F>(self, transform: F) -> Generator<U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let transform = Arc::new(transform);
        let samples = self.samples.into_iter().map(|v| transform(v)).collect();
        let sampler = self.sampler;
        Generator {
            sampler: Arc::new(move |random: &mut Random| sampler(random).map(|v| transform(v))),
            samples,
        }
    }

    /// Keep only values satisfying `predicate`.
    ///
    /// Samples are filtered once. Draws are retried; after
    /// [`MAX_FILTER_ATTEMPTS`] consecutive rejections the draw fails with a
    /// [`GenerationError`].
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let samples = self.samples.into_iter().filter(|v| predicate(v)).collect();
        let sampler = self.sampler;
        Self {
            sampler: Arc::new(move |random: &mut Random| {
                for _ in 0..MAX_FILTER_ATTEMPTS {
                    let value = sampler(random)?;
                    if predicate(&value) {
                        return Ok(value);
                    }
                }
                Err(GenerationError::new(format!(
                    "filter rejected {} consecutive values",
                    MAX_FILTER_ATTEMPTS
                )))
            }),
            samples,
        }
    }

    /// Wrap values in `Some`, with `None` added as a sample
    pub fn optional(self) -> Generator<Option<T>> {
        let mut samples = Vec::with_capacity(self.samples.len() + 1);
        samples.push(None);
        samples.extend(self.samples.into_iter().map(Some));
        let sampler = self.sampler;
        Generator {
            sampler: Arc::new(move |random: &mut Random| sampler(random).map(Some)),
            samples,
        }
    }

    pub(crate) fn from_parts(sampler: Sampler<T>, samples: Vec<T>) -> Self {
        Self { sampler, samples }
    }
}

impl<T: Clone> Clone for Generator<T> {
    fn clone(&self) -> Self {
        Self {
            sampler: Arc::clone(&self.sampler),
            samples: self.samples.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Generator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("samples", &self.samples)
            .finish_non_exhaustive()
    }
}

/// Random values of a generator, driven by one seeded cursor
pub struct RandomSequence<T> {
    generator: Generator<T>,
    random: Random,
}

impl<T: 'static> RandomSequence<T> {
    /// Seed this sequence was started from
    pub fn seed(&self) -> u64 {
        self.random.seed()
    }
}

impl<T: 'static> Iterator for RandomSequence<T> {
    type Item = Result<T, GenerationError>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generator.generate(&mut self.random))
    }
}

/// Type-safe registry mapping a type to its default generator
pub struct GeneratorRegistry {
    generators: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl GeneratorRegistry {
    /// Create a new empty generator registry
    pub fn new() -> Self {
        Self {
            generators: HashMap::new(),
        }
    }

    /// Registry pre-populated with the primitive generators
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        crate::primitives::register_defaults(&mut registry);
        registry
    }

    /// Register (or replace) the default generator for `T`
    pub fn register<T>(&mut self, generator: Generator<T>)
    where
        T: Send + Sync + 'static,
    {
        self.generators.insert(TypeId::of::<T>(), Box::new(generator));
    }

    /// Build `T`'s generator from the registry and register it
    pub fn register_arbitrary<T>(&mut self) -> Result<(), ConfigError>
    where
        T: crate::arbitrary::Arbitrary + Send + Sync + 'static,
    {
        let generator = T::arbitrary(self)?;
        self.register(generator);
        Ok(())
    }

    /// Get a generator for a specific type
    pub fn get<T: Clone + 'static>(&self) -> Option<Generator<T>> {
        self.generators
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<Generator<T>>())
            .cloned()
    }

    /// Like [`get`](Self::get), failing with a configuration error when absent
    pub fn resolve<T: Clone + 'static>(&self) -> Result<Generator<T>, ConfigError> {
        self.get::<T>().ok_or(ConfigError::MissingGenerator {
            type_name: std::any::type_name::<T>(),
        })
    }

    /// Check if a generator is registered for a specific type
    pub fn contains<T: 'static>(&self) -> bool {
        self.generators.contains_key(&TypeId::of::<T>())
    }

    /// Remove a generator for a specific type
    pub fn remove<T: 'static>(&mut self) -> bool {
        self.generators.remove(&TypeId::of::<T>()).is_some()
    }

    /// Get the number of registered generators
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorRegistry")
            .field("len", &self.generators.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn draw<T: 'static>(generator: &Generator<T>, seed: u64, count: usize) -> Vec<T> {
        generator
            .random_sequence(seed)
            .take(count)
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_create_has_no_samples() {
        let generator = Generator::create(|random| random.r#gen::<i32>());
        assert!(generator.samples().is_empty());
    }

    #[test]
    fn test_with_samples_is_a_set() {
        let generator = Generator::create(|random| random.gen_range(0..10))
            .with_samples([42, 100, 42])
            .with_samples([100, 7]);
        assert_eq!(generator.samples(), &[42, 100, 7]);
    }

    #[test]
    fn test_with_samples_leaves_original_untouched() {
        let original = Generator::create(|random| random.r#gen::<u8>()).with_samples([1]);
        let extended = original.clone().with_samples([2, 3]);

        assert_eq!(original.samples(), &[1]);
        assert_eq!(extended.samples(), &[1, 2, 3]);
    }

    #[test]
    fn test_random_sequence_is_restartable() {
        let generator = Generator::create(|random| random.r#gen::<i64>());
        assert_eq!(draw(&generator, 123, 500), draw(&generator, 123, 500));
        assert_ne!(draw(&generator, 123, 20), draw(&generator, 124, 20));
    }

    #[test]
    fn test_random_sequence_seed() {
        let generator = Generator::constant(1u8);
        assert_eq!(generator.random_sequence(56).seed(), 56);
    }

    #[test]
    fn test_random_sequence_is_varied() {
        let generator = Generator::create(|random| random.r#gen::<f64>());
        let distinct: HashSet<u64> = draw(&generator, 0, 200)
            .into_iter()
            .map(f64::to_bits)
            .collect();
        assert!(distinct.len() > 190);
    }

    #[test]
    fn test_random_sequence_excludes_samples() {
        let generator = Generator::constant(5).with_samples([-1]);
        assert!(draw(&generator, 3, 50).iter().all(|&v| v == 5));
    }

    #[test]
    fn test_try_create_reports_errors() {
        let generator: Generator<i32> =
            Generator::try_create(|_| Err(GenerationError::new("no value")));
        let first = generator.random_sequence(0).next().unwrap();
        assert_eq!(first, Err(GenerationError::new("no value")));
    }

    #[test]
    fn test_one_of() {
        let generator = Generator::one_of(vec!['a', 'b', 'c']).unwrap();
        assert_eq!(generator.samples(), &['a', 'b', 'c']);
        assert!(draw(&generator, 9, 100).iter().all(|c| "abc".contains(*c)));

        let empty = Generator::<char>::one_of(vec![]);
        assert_eq!(empty.unwrap_err(), ConfigError::EmptyChoices);
    }

    #[test]
    fn test_map_transforms_draws_and_samples() {
        let generator = Generator::create(|random| random.gen_range(0..100))
            .with_samples([1, 2])
            .map(|v| v * 10);

        assert_eq!(generator.samples(), &[10, 20]);
        assert!(draw(&generator, 4, 100).iter().all(|v| v % 10 == 0));
    }

    #[test]
    fn test_map_collapses_merged_samples() {
        let generator = Generator::create(|random| random.gen_range(0..100))
            .with_samples([1, 2, 3, 4])
            .map(|v| v % 2);

        assert_eq!(generator.samples(), &[1, 0]);
    }

    #[test]
    fn test_filter() {
        let generator = Generator::create(|random| random.gen_range(0..100))
            .with_samples([1, 2, 3, 4])
            .filter(|v| v % 2 == 0);

        assert_eq!(generator.samples(), &[2, 4]);
        assert!(draw(&generator, 5, 100).iter().all(|v| v % 2 == 0));
    }

    #[test]
    fn test_filter_gives_up() {
        let generator = Generator::create(|random| random.gen_range(0..10)).filter(|v| *v > 100);
        let error = generator.random_sequence(1).next().unwrap().unwrap_err();
        assert_eq!(error.message, "filter rejected 1000 consecutive values");
    }

    #[test]
    fn test_optional() {
        let generator = Generator::create(|random| random.r#gen::<u16>())
            .with_samples([3])
            .optional();

        assert_eq!(generator.samples(), &[None, Some(3)]);
        assert!(draw(&generator, 8, 50).iter().all(Option::is_some));
    }

    #[test]
    fn test_without_samples() {
        let generator = Generator::constant(1).with_samples([2, 3]).without_samples();
        assert!(generator.samples().is_empty());
        assert_eq!(draw(&generator, 0, 3), vec![1, 1, 1]);
    }

    #[test]
    fn test_generator_registry_basic_operations() {
        let mut registry = GeneratorRegistry::new();

        // Initially empty
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(!registry.contains::<i32>());

        registry.register(Generator::constant(42i32));

        assert!(!registry.is_empty());
        assert_eq!(registry.len(), 1);
        assert!(registry.contains::<i32>());
        assert!(!registry.contains::<String>());

        assert!(registry.remove::<i32>());
        assert!(!registry.remove::<i32>());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_generator_registry_type_safety() {
        let mut registry = GeneratorRegistry::new();
        registry.register(Generator::constant(42i32));
        registry.register(Generator::constant("hello".to_string()));

        let mut random = Random::from_seed(0);
        let int_gen = registry.get::<i32>().unwrap();
        assert_eq!(int_gen.generate(&mut random), Ok(42));
        let string_gen = registry.get::<String>().unwrap();
        assert_eq!(string_gen.generate(&mut random), Ok("hello".to_string()));

        assert!(registry.get::<f64>().is_none());
        assert_eq!(
            registry.resolve::<f64>().unwrap_err(),
            ConfigError::MissingGenerator { type_name: "f64" }
        );
    }

    #[test]
    fn test_registry_replaces_existing() {
        let mut registry = GeneratorRegistry::new();
        registry.register(Generator::constant(1u8));
        registry.register(Generator::constant(2u8));

        assert_eq!(registry.len(), 1);
        let generator = registry.resolve::<u8>().unwrap();
        assert_eq!(generator.generate(&mut Random::from_seed(0)), Ok(2));
    }
}
