//! Derive macro for the forall property checking library
//!
//! `#[derive(Arbitrary)]` implements `forall::Arbitrary` for structs and
//! enums, so the type can be registered as a default generator.

use proc_macro::TokenStream;

mod derive;

/// Derive `forall::Arbitrary`
///
/// Every field type must have a generator registered in the
/// `GeneratorRegistry` passed to `arbitrary`; the lookup happens once, when
/// the generator is built. Enums pick a variant uniformly.
///
/// ```rust
/// use forall::{Arbitrary, GeneratorRegistry};
///
/// #[derive(Debug, Clone, Arbitrary)]
/// enum Status {
///     Active,
///     Inactive(String),
///     Pending { reason: String, retries: u8 },
/// }
///
/// let mut registry = GeneratorRegistry::with_defaults();
/// registry.register_arbitrary::<Status>().unwrap();
/// ```
///
/// Generic parameters receive `Clone + Send + Sync + 'static` bounds.
/// Unions and empty enums are rejected.
#[proc_macro_derive(Arbitrary)]
pub fn derive_arbitrary(input: TokenStream) -> TokenStream {
    derive::derive_arbitrary_impl(input)
}
