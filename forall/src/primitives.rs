//! Default generators for primitive types.
//!
//! Each generator carries the usual edge cases as samples so that every run
//! exercises them before drawing random values.

use std::fmt::Display;

use num_traits::{Float, PrimInt};
use rand::Rng;
use rand::distributions::Alphanumeric;
use rand::distributions::uniform::SampleUniform;

use crate::config::ConfigError;
use crate::generator::{Generator, GeneratorRegistry};

/// Longest string produced by [`strings`]
pub const MAX_STRING_LENGTH: usize = 32;

/// Bound of the range used by [`floats`]
pub const DEFAULT_FLOAT_BOUND: f64 = 1000.0;

/// Integers over the full range of `T`, with samples `0`, `1`, `-1` (when
/// signed), `MIN` and `MAX`
pub fn ints<T>() -> Generator<T>
where
    T: PrimInt + SampleUniform + Send + Sync + 'static,
{
    let generator = Generator::create(|random| random.gen_range(T::min_value()..=T::max_value()));
    let mut samples = vec![T::zero(), T::one()];
    if let Some(minus_one) = T::zero().checked_sub(&T::one()) {
        samples.push(minus_one);
    }
    samples.push(T::min_value());
    samples.push(T::max_value());
    generator.with_samples(samples)
}

/// Integers in `[min, max]`, with the bounds (plus `0` and `1` when inside
/// the range) as samples
pub fn ints_in<T>(min: T, max: T) -> Result<Generator<T>, ConfigError>
where
    T: PrimInt + SampleUniform + Display + Send + Sync + 'static,
{
    if min > max {
        return Err(ConfigError::InvalidRange {
            min: min.to_string(),
            max: max.to_string(),
        });
    }

    let generator = Generator::create(move |random| random.gen_range(min..=max));
    let in_range = [T::zero(), T::one()]
        .into_iter()
        .filter(|v| *v >= min && *v <= max);
    Ok(generator.with_samples([min, max].into_iter().chain(in_range)))
}

/// Floats in `[-1000, 1000]` with samples `0`, `1`, `-1` and both bounds
pub fn floats<T>() -> Generator<T>
where
    T: Float + SampleUniform + Display + Send + Sync + 'static,
{
    let bound = T::from(DEFAULT_FLOAT_BOUND).unwrap_or_else(T::max_value);
    let generator = Generator::create(move |random| random.gen_range(-bound..=bound));
    generator.with_samples([T::zero(), T::one(), -T::one(), -bound, bound])
}

/// Floats in `[min, max]` with the bounds as samples.
///
/// Both bounds must be finite and so must `max - min`: a wider range such as
/// `[-f64::MAX, f64::MAX]` cannot be sampled uniformly and is rejected.
pub fn floats_in<T>(min: T, max: T) -> Result<Generator<T>, ConfigError>
where
    T: Float + SampleUniform + Display + Send + Sync + 'static,
{
    if !min.is_finite() || !max.is_finite() || min > max || !(max - min).is_finite() {
        return Err(ConfigError::InvalidRange {
            min: min.to_string(),
            max: max.to_string(),
        });
    }

    let generator = Generator::create(move |random| random.gen_range(min..=max));
    let in_range = [T::zero()].into_iter().filter(|v| *v >= min && *v <= max);
    Ok(generator.with_samples([min, max].into_iter().chain(in_range)))
}

/// Fair booleans; both values are samples
pub fn bools() -> Generator<bool> {
    Generator::<bool>::create(|random| random.r#gen()).with_samples([true, false])
}

/// Any Unicode scalar value, with the space character as sample
pub fn chars() -> Generator<char> {
    Generator::<char>::create(|random| random.r#gen()).with_samples([' '])
}

/// Strings of up to [`MAX_STRING_LENGTH`] characters.
///
/// Characters are alphanumeric three times out of four and arbitrary
/// Unicode otherwise. The empty string and a single space are samples.
pub fn strings() -> Generator<String> {
    Generator::<String>::create(|random| {
        let length = random.gen_range(0..=MAX_STRING_LENGTH);
        (0..length)
            .map(|_| {
                if random.gen_ratio(3, 4) {
                    char::from(random.sample(Alphanumeric))
                } else {
                    random.r#gen::<char>()
                }
            })
            .collect()
    })
    .with_samples([String::new(), " ".to_string()])
}

fn register_ints<T>(registry: &mut GeneratorRegistry)
where
    T: PrimInt + SampleUniform + Send + Sync + 'static,
{
    registry.register(ints::<T>());
}

/// Register the default generator of every primitive type
pub fn register_defaults(registry: &mut GeneratorRegistry) {
    register_ints::<i8>(registry);
    register_ints::<i16>(registry);
    register_ints::<i32>(registry);
    register_ints::<i64>(registry);
    register_ints::<i128>(registry);
    register_ints::<isize>(registry);
    register_ints::<u8>(registry);
    register_ints::<u16>(registry);
    register_ints::<u32>(registry);
    register_ints::<u64>(registry);
    register_ints::<u128>(registry);
    register_ints::<usize>(registry);
    registry.register(floats::<f32>());
    registry.register(floats::<f64>());
    registry.register(bools());
    registry.register(chars());
    registry.register(strings());
}
