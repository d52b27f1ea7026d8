//! Arbitrary trait for types that can build their own default generator.

use std::sync::Arc;

use rand::Rng;

use crate::config::ConfigError;
use crate::error::GenerationError;
use crate::generator::{Generator, GeneratorRegistry};
use crate::rng::Random;

/// Longest vector produced by the `Vec<T>` implementation
pub const MAX_COLLECTION_LENGTH: usize = 16;

/// Types that know how to build a generator of themselves.
///
/// Component generators are looked up in the registry when `arbitrary` is
/// called, so a missing component type fails early with
/// [`ConfigError::MissingGenerator`]. Implementations are usually derived:
///
/// ```rust
/// use forall::{Arbitrary, GeneratorRegistry};
///
/// #[derive(Debug, Clone, Arbitrary)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let mut registry = GeneratorRegistry::with_defaults();
/// registry.register_arbitrary::<Point>().unwrap();
/// assert!(registry.contains::<Point>());
/// ```
pub trait Arbitrary: Sized {
    /// Build the generator of `Self` from the generators in `registry`
    fn arbitrary(registry: &GeneratorRegistry) -> Result<Generator<Self>, ConfigError>;
}

impl<T> Arbitrary for Option<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn arbitrary(registry: &GeneratorRegistry) -> Result<Generator<Self>, ConfigError> {
        Ok(registry.resolve::<T>()?.optional())
    }
}

impl<T> Arbitrary for Vec<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Vectors of up to [`MAX_COLLECTION_LENGTH`] elements; samples are the
    /// empty vector and one singleton per element sample
    fn arbitrary(registry: &GeneratorRegistry) -> Result<Generator<Self>, ConfigError> {
        let element = registry.resolve::<T>()?;

        let mut samples = vec![Vec::new()];
        samples.extend(element.samples().iter().map(|sample| vec![sample.clone()]));

        let sampler = Arc::new(move |random: &mut Random| -> Result<Vec<T>, GenerationError> {
            let length = random.gen_range(0..=MAX_COLLECTION_LENGTH);
            (0..length).map(|_| element.generate(random)).collect()
        });

        Ok(Generator::from_parts(sampler, samples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_arbitrary() {
        let mut registry = GeneratorRegistry::new();
        registry.register(Generator::constant(4u8).with_samples([0]));

        let generator = Option::<u8>::arbitrary(&registry).unwrap();
        assert_eq!(generator.samples(), &[None, Some(0)]);
        assert_eq!(generator.generate(&mut Random::from_seed(0)), Ok(Some(4)));
    }

    #[test]
    fn test_vec_arbitrary() {
        let mut registry = GeneratorRegistry::new();
        registry.register(Generator::constant('x').with_samples(['a', 'b']));

        let generator = Vec::<char>::arbitrary(&registry).unwrap();
        assert_eq!(generator.samples(), &[vec![], vec!['a'], vec!['b']]);

        let values: Vec<Vec<char>> = generator
            .random_sequence(2)
            .take(100)
            .collect::<Result<_, _>>()
            .unwrap();
        assert!(values.iter().all(|v| v.len() <= MAX_COLLECTION_LENGTH));
        assert!(values.iter().flatten().all(|&c| c == 'x'));
        assert!(values.iter().any(|v| v.len() > 1));
    }

    #[test]
    fn test_missing_element_generator() {
        let registry = GeneratorRegistry::new();
        assert_eq!(
            Vec::<u64>::arbitrary(&registry).unwrap_err(),
            ConfigError::MissingGenerator { type_name: "u64" }
        );
    }

    #[test]
    fn test_register_arbitrary() {
        let mut registry = GeneratorRegistry::with_defaults();
        registry.register_arbitrary::<Vec<i16>>().unwrap();
        registry.register_arbitrary::<Option<Vec<i16>>>().unwrap();

        assert!(registry.contains::<Vec<i16>>());
        let nested = registry.resolve::<Option<Vec<i16>>>().unwrap();
        assert_eq!(nested.samples()[0], None);
    }
}
