//! Declarative shorthand for property checks.

/// Check a property with optional inline configuration.
///
/// Expands to [`ForAll`](crate::ForAll) calls and returns its
/// [`CheckResult`](crate::CheckResult).
///
/// ```rust
/// use forall::{for_all, ints};
///
/// let result = for_all!(ints::<i32>(), |x| x.wrapping_neg().wrapping_neg() == x);
/// assert!(result.is_ok());
///
/// let result = for_all!(
///     (ints::<u16>(), ints::<u16>()),
///     iterations = 500,
///     seed = 42,
///     |(a, b)| a.max(b) >= a.min(b)
/// );
/// assert_eq!(result.unwrap().seed, 42);
/// ```
#[macro_export]
macro_rules! for_all {
    ($generators:expr, iterations = $iterations:expr, seed = $seed:expr, $property:expr $(,)?) => {
        $crate::ForAll::new()
            .iterations($iterations)
            .seed($seed)
            .check($generators, $property)
    };

    ($generators:expr, iterations = $iterations:expr, $property:expr $(,)?) => {
        $crate::ForAll::new()
            .iterations($iterations)
            .check($generators, $property)
    };

    ($generators:expr, seed = $seed:expr, $property:expr $(,)?) => {
        $crate::ForAll::new().seed($seed).check($generators, $property)
    };

    ($generators:expr, $property:expr $(,)?) => {
        $crate::check_for_all($generators, $property)
    };
}
