//! Configuration types for controlling run length and seeding.

use std::cell::RefCell;

/// Iterations run when neither the call site nor the environment sets a budget
pub const DEFAULT_ITERATIONS: usize = 200;

/// Environment variable overriding the default iteration budget
pub const ITERATIONS_ENV: &str = "FORALL_ITERATIONS";

/// Environment variable pinning the default seed
pub const SEED_ENV: &str = "FORALL_SEED";

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Invalid number of iterations (must be > 0)
    InvalidIterations(usize),
    /// A combination was requested over zero generators
    NoGenerators,
    /// A choice generator was built from zero values
    EmptyChoices,
    /// A range generator was built with `min > max`
    InvalidRange { min: String, max: String },
    /// No default generator is registered for a type
    MissingGenerator { type_name: &'static str },
    /// An environment variable holds a value that cannot be parsed
    InvalidEnvValue { variable: String, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidIterations(n) => {
                write!(f, "Invalid iterations count: {} (must be > 0)", n)
            }
            ConfigError::NoGenerators => {
                write!(f, "Cannot combine zero generators")
            }
            ConfigError::EmptyChoices => {
                write!(f, "Cannot choose from an empty set of values")
            }
            ConfigError::InvalidRange { min, max } => {
                write!(f, "Invalid range: min {} is greater than max {}", min, max)
            }
            ConfigError::MissingGenerator { type_name } => {
                write!(f, "No default generator registered for type {}", type_name)
            }
            ConfigError::InvalidEnvValue { variable, value } => {
                write!(f, "Invalid value {:?} for environment variable {}", value, variable)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration for an individual property check
#[derive(Debug, Clone, PartialEq)]
pub struct TestConfig {
    /// Number of evaluations to run (samples included)
    pub iterations: usize,
    /// Optional seed for reproducible runs; a fresh one is drawn when absent
    pub seed: Option<u64>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            seed: None,
        }
    }
}

impl TestConfig {
    /// Create a new test configuration with validation
    pub fn new(iterations: usize, seed: Option<u64>) -> Result<Self, ConfigError> {
        let config = Self { iterations, seed };
        config.validate()?;
        Ok(config)
    }

    /// Validate the test configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::InvalidIterations(self.iterations));
        }
        Ok(())
    }

    /// Create a test configuration from global defaults with optional overrides
    pub fn from_global_with_overrides(
        global: &GlobalConfig,
        iterations: Option<usize>,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            iterations: iterations.unwrap_or(global.default_iterations),
            seed: seed.or(global.default_seed),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Global configuration for default run behavior
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalConfig {
    /// Default number of iterations for checks
    pub default_iterations: usize,
    /// Default seed for reproducible checks
    pub default_seed: Option<u64>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            default_iterations: DEFAULT_ITERATIONS,
            default_seed: None,
        }
    }
}

impl GlobalConfig {
    /// Create a new global configuration with validation
    pub fn new(default_iterations: usize, default_seed: Option<u64>) -> Result<Self, ConfigError> {
        let config = Self {
            default_iterations,
            default_seed,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the global configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_iterations == 0 {
            return Err(ConfigError::InvalidIterations(self.default_iterations));
        }
        Ok(())
    }

    /// Read `FORALL_ITERATIONS` and `FORALL_SEED` from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// Unset variables keep their defaults; set but unparsable ones are
    /// rejected rather than ignored.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ITERATIONS_ENV) {
            config.default_iterations = parse_var(ITERATIONS_ENV, &raw)?;
        }
        if let Some(raw) = lookup(SEED_ENV) {
            config.default_seed = Some(parse_var(SEED_ENV, &raw)?);
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(variable: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnvValue {
            variable: variable.to_string(),
            value: raw.to_string(),
        })
}

// Thread-local override of the environment-derived configuration
thread_local! {
    static GLOBAL_OVERRIDE: RefCell<Option<GlobalConfig>> = const { RefCell::new(None) };
}

/// Get the current global configuration.
///
/// Returns the thread-local override when one is set, otherwise reads the
/// environment.
pub fn get_global_config() -> Result<GlobalConfig, ConfigError> {
    match GLOBAL_OVERRIDE.with(|slot| slot.borrow().clone()) {
        Some(config) => Ok(config),
        None => GlobalConfig::from_env(),
    }
}

/// Set the global configuration for the current thread
pub fn set_global_config(config: GlobalConfig) -> Result<(), ConfigError> {
    config.validate()?;
    GLOBAL_OVERRIDE.with(|slot| *slot.borrow_mut() = Some(config));
    Ok(())
}

/// Drop the thread-local override and go back to the environment
pub fn reset_global_config() {
    GLOBAL_OVERRIDE.with(|slot| *slot.borrow_mut() = None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = TestConfig::default();
        assert_eq!(config.iterations, 200);
        assert!(config.seed.is_none());

        let global = GlobalConfig::default();
        assert_eq!(global.default_iterations, 200);
        assert!(global.default_seed.is_none());
    }

    #[test]
    fn test_config_rejects_zero_iterations() {
        assert_eq!(
            TestConfig::new(0, None),
            Err(ConfigError::InvalidIterations(0))
        );
        assert_eq!(
            GlobalConfig::new(0, Some(1)),
            Err(ConfigError::InvalidIterations(0))
        );
        assert!(TestConfig::new(1, Some(5)).is_ok());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let global = GlobalConfig::new(50, Some(9)).unwrap();

        let inherited = TestConfig::from_global_with_overrides(&global, None, None).unwrap();
        assert_eq!(inherited.iterations, 50);
        assert_eq!(inherited.seed, Some(9));

        let overridden =
            TestConfig::from_global_with_overrides(&global, Some(10), Some(3)).unwrap();
        assert_eq!(overridden.iterations, 10);
        assert_eq!(overridden.seed, Some(3));

        assert!(TestConfig::from_global_with_overrides(&global, Some(0), None).is_err());
    }

    #[test]
    fn test_lookup_parses_variables() {
        let config =
            GlobalConfig::from_lookup(lookup_from(&[(ITERATIONS_ENV, "500"), (SEED_ENV, " 42 ")]))
                .unwrap();
        assert_eq!(config.default_iterations, 500);
        assert_eq!(config.default_seed, Some(42));

        let empty = GlobalConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(empty, GlobalConfig::default());
    }

    #[test]
    fn test_lookup_rejects_garbage() {
        let error = GlobalConfig::from_lookup(lookup_from(&[(SEED_ENV, "abc")])).unwrap_err();
        assert_eq!(
            error,
            ConfigError::InvalidEnvValue {
                variable: SEED_ENV.to_string(),
                value: "abc".to_string(),
            }
        );

        let zero = GlobalConfig::from_lookup(lookup_from(&[(ITERATIONS_ENV, "0")])).unwrap_err();
        assert_eq!(zero, ConfigError::InvalidIterations(0));
    }

    #[test]
    fn test_thread_local_override() {
        let custom = GlobalConfig::new(7, Some(11)).unwrap();
        set_global_config(custom.clone()).unwrap();
        assert_eq!(get_global_config().unwrap(), custom);

        reset_global_config();
        assert!(set_global_config(GlobalConfig {
            default_iterations: 0,
            default_seed: None,
        })
        .is_err());
    }

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            ConfigError::InvalidIterations(0).to_string(),
            "Invalid iterations count: 0 (must be > 0)"
        );
        assert_eq!(
            ConfigError::NoGenerators.to_string(),
            "Cannot combine zero generators"
        );
        assert_eq!(
            ConfigError::MissingGenerator { type_name: "u8" }.to_string(),
            "No default generator registered for type u8"
        );
    }
}
