#![allow(clippy::result_large_err)]

//! # forall - seeded, reproducible property checking
//!
//! `forall` checks that a property holds for many generated inputs. Every
//! [`Generator`] pairs a seeded sampling function with a set of samples that
//! are always evaluated first, generators compose with [`combine`], and a
//! failing run reports the failing evaluation, the arguments and the seed
//! that reproduces it.
//!
//! ## Quick Start
//!
//! ```rust
//! use forall::{ForAll, Generator, check_for_all, floats, ints};
//! use rand::Rng;
//!
//! // Samples are evaluated before any random value
//! let small = Generator::create(|random| random.gen_range(-100..=100)).with_samples([0, 100]);
//!
//! let result = check_for_all((small, floats::<f64>()), |(n, x)| {
//!     (n as f64 + x) - x - n as f64 <= 1e-9
//! });
//! assert!(result.is_ok());
//!
//! // A falsified property reports everything needed to replay it
//! let error = ForAll::new()
//!     .seed(78)
//!     .check(ints::<u8>(), |n| n < 200)
//!     .unwrap_err();
//! assert!(error.to_string().ends_with("Generation seed: 78"));
//! ```
//!
//! ## Default generators
//!
//! Argument types with a registered generator need no explicit generators:
//!
//! ```rust
//! use forall::check_for_all_default;
//!
//! let result = check_for_all_default(|(s, n): (String, u8)| s.repeat(n as usize % 3).len() >= s.len() * (n as usize % 3));
//! assert!(result.is_ok());
//! ```
//!
//! ## Configuration
//!
//! The iteration budget defaults to 200 and the seed to a fresh random value.
//! Both can be set per run through [`ForAll`] or [`for_all!`], per thread
//! with [`set_global_config`], or per process with the `FORALL_ITERATIONS`
//! and `FORALL_SEED` environment variables.

pub mod arbitrary;
pub mod combine;
pub mod config;
pub mod error;
pub mod execution;
pub mod generator;
mod macros;
pub mod primitives;
pub mod property;
pub mod rng;

// Used by `#[derive(Arbitrary)]` expansions
#[doc(hidden)]
pub use rand;

pub use arbitrary::Arbitrary;
pub use combine::{Combine, CombineMap, combine, combine_all, combine_map};
pub use config::{
    ConfigError, DEFAULT_ITERATIONS, GlobalConfig, TestConfig, get_global_config,
    reset_global_config, set_global_config,
};
pub use error::{
    CheckError, FailureReport, FalsificationCause, FalsifiedPropertyError, GenerationError,
};
pub use execution::{
    CheckResult, CheckSummary, DefaultArguments, ForAll, Generators, assert_for_all,
    check_for_all, check_for_all_default, check_for_all_with_context,
};
pub use generator::{Generator, GeneratorRegistry, RandomSequence};
pub use primitives::{bools, chars, floats, floats_in, ints, ints_in, strings};
pub use property::{PropertyEvaluationContext, PropertyOutcome};
pub use rng::{Random, fresh_seed};

#[cfg(feature = "derive")]
pub use forall_derive::Arbitrary;
