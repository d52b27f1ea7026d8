//! Error types and failure reports for property checks.

use std::any::Any;
use std::fmt;

use crate::config::ConfigError;

/// A generator could not produce a value.
///
/// This is a defect in the generator, not a counter-example, and is never
/// reported as a falsified property.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationError {
    /// What went wrong
    pub message: String,
    /// Where it went wrong, when known (for example the evaluation index)
    pub context: Option<String>,
}

impl GenerationError {
    /// Create a generation error without context
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
        }
    }

    /// Attach context, replacing any previous one
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Generation failed: {}", self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, " (context: {})", ctx)?;
        }
        Ok(())
    }
}

impl std::error::Error for GenerationError {}

/// Why a property body rejected its input
#[derive(Debug, Clone, PartialEq)]
pub enum FalsificationCause {
    /// The body returned `false`
    ReturnedFalse,
    /// The body returned an error, rendered with `Display`
    Failed(String),
    /// The body panicked, typically through a failed assertion
    Panicked(String),
}

impl fmt::Display for FalsificationCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FalsificationCause::ReturnedFalse => write!(f, "property returned false"),
            FalsificationCause::Failed(message) => write!(f, "property failed: {}", message),
            FalsificationCause::Panicked(message) => {
                write!(f, "property panicked: {}", message)
            }
        }
    }
}

impl std::error::Error for FalsificationCause {}

/// A counter-example found by a property check.
///
/// The `Display` form is the reproducible failure message:
///
/// ```text
/// Property falsified after 12 tests (out of 123)
/// Argument 1: 42
/// Argument 2: -4.1
/// Argument 3: 100
/// Generation seed: 78
/// ```
///
/// Arguments are rendered with `Debug`, so a string argument appears quoted
/// and escaped (`Argument 1: "a\nb"`).
#[derive(Debug, Clone)]
pub struct FalsifiedPropertyError<T> {
    /// The values passed to the property body at the failing evaluation
    pub arguments: T,
    /// `Debug` rendering of each argument, in declaration order
    pub rendered_arguments: Vec<String>,
    /// 1-based index of the failing evaluation
    pub failing_iteration: usize,
    /// Number of evaluations the run had planned
    pub total_iterations: usize,
    /// Seed that reproduces the run
    pub seed: u64,
    /// Why the body rejected the input
    pub cause: FalsificationCause,
}

impl<T> FalsifiedPropertyError<T> {
    /// Plain-data copy of the failure, detached from the argument type
    pub fn report(&self) -> FailureReport {
        FailureReport {
            failing_iteration: self.failing_iteration,
            total_iterations: self.total_iterations,
            seed: self.seed,
            arguments: self.rendered_arguments.clone(),
            cause: self.cause.to_string(),
        }
    }
}

impl<T> fmt::Display for FalsifiedPropertyError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Property falsified after {} tests (out of {})",
            self.failing_iteration, self.total_iterations
        )?;
        for (index, argument) in self.rendered_arguments.iter().enumerate() {
            write!(f, "\nArgument {}: {}", index + 1, argument)?;
        }
        write!(f, "\nGeneration seed: {}", self.seed)
    }
}

impl<T: fmt::Debug> std::error::Error for FalsifiedPropertyError<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

/// Type-erased failure report, suitable for handing to external tooling
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct FailureReport {
    pub failing_iteration: usize,
    pub total_iterations: usize,
    pub seed: u64,
    pub arguments: Vec<String>,
    pub cause: String,
}

impl FailureReport {
    /// Serialize the report as pretty-printed JSON
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Everything that can stop a property check
#[derive(Debug, Clone)]
pub enum CheckError<T> {
    /// The property does not hold for a generated input
    Falsified(FalsifiedPropertyError<T>),
    /// A generator failed to produce a value
    Generation(GenerationError),
    /// The check was configured incorrectly and never started
    Config(ConfigError),
}

impl<T> CheckError<T> {
    /// Check whether the run found a counter-example
    pub fn is_falsified(&self) -> bool {
        matches!(self, CheckError::Falsified(_))
    }

    /// The counter-example, if this error is a falsification
    pub fn falsified(&self) -> Option<&FalsifiedPropertyError<T>> {
        match self {
            CheckError::Falsified(error) => Some(error),
            _ => None,
        }
    }
}

impl<T> fmt::Display for CheckError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckError::Falsified(error) => fmt::Display::fmt(error, f),
            CheckError::Generation(error) => fmt::Display::fmt(error, f),
            CheckError::Config(error) => write!(f, "Configuration error: {}", error),
        }
    }
}

impl<T: fmt::Debug> std::error::Error for CheckError<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CheckError::Falsified(error) => Some(&error.cause),
            CheckError::Generation(error) => Some(error),
            CheckError::Config(error) => Some(error),
        }
    }
}

impl<T> From<ConfigError> for CheckError<T> {
    fn from(error: ConfigError) -> Self {
        CheckError::Config(error)
    }
}

impl<T> From<GenerationError> for CheckError<T> {
    fn from(error: GenerationError) -> Self {
        CheckError::Generation(error)
    }
}

/// Extract the message of a caught panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_failure() -> FalsifiedPropertyError<(i32, f64, i64)> {
        FalsifiedPropertyError {
            arguments: (42, -4.1, 100),
            rendered_arguments: vec!["42".into(), "-4.1".into(), "100".into()],
            failing_iteration: 12,
            total_iterations: 123,
            seed: 78,
            cause: FalsificationCause::Panicked("failed".into()),
        }
    }

    #[test]
    fn test_falsified_message_format() {
        assert_eq!(
            sample_failure().to_string(),
            "Property falsified after 12 tests (out of 123)\n\
             Argument 1: 42\n\
             Argument 2: -4.1\n\
             Argument 3: 100\n\
             Generation seed: 78"
        );
    }

    #[test]
    fn test_falsified_source_is_cause() {
        use std::error::Error;

        let failure = sample_failure();
        let source = failure.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("property panicked: failed"));
    }

    #[test]
    fn test_report_copies_fields() {
        let report = sample_failure().report();
        assert_eq!(report.failing_iteration, 12);
        assert_eq!(report.total_iterations, 123);
        assert_eq!(report.seed, 78);
        assert_eq!(report.arguments, vec!["42", "-4.1", "100"]);
        assert_eq!(report.cause, "property panicked: failed");
    }

    #[test]
    fn test_generation_error_display() {
        let error = GenerationError::new("division by zero").with_context("evaluation 3");
        assert_eq!(
            error.to_string(),
            "Generation failed: division by zero (context: evaluation 3)"
        );
        assert_eq!(
            GenerationError::new("boom").to_string(),
            "Generation failed: boom"
        );
    }

    #[test]
    fn test_check_error_conversions() {
        let config: CheckError<i32> = ConfigError::NoGenerators.into();
        assert!(matches!(config, CheckError::Config(ConfigError::NoGenerators)));
        assert_eq!(
            config.to_string(),
            "Configuration error: Cannot combine zero generators"
        );

        let generation: CheckError<i32> = GenerationError::new("boom").into();
        assert!(!generation.is_falsified());
        assert!(generation.falsified().is_none());

        let falsified = CheckError::Falsified(sample_failure());
        assert!(falsified.is_falsified());
        assert_eq!(falsified.falsified().map(|f| f.seed), Some(78));
    }

    #[test]
    fn test_panic_message_extraction() {
        let payload: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(payload.as_ref()), "static message");

        let payload: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(panic_message(payload.as_ref()), "owned message");

        let payload: Box<dyn Any + Send> = Box::new(17u8);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_report_json() {
        let json = sample_failure().report().to_json().unwrap();
        assert!(json.contains("\"failing_iteration\": 12"));
        assert!(json.contains("\"seed\": 78"));
        assert!(json.contains("\"-4.1\""));
    }
}
