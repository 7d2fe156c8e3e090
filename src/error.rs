//! Error types for the employment law engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition that can stop an evaluation. The statutory
//! computations themselves are total over validated facts; errors only arise
//! from configuration loading and from fact validation.

use thiserror::Error;

/// The main error type for the employment law engine.
///
/// # Example
///
/// ```
/// use emplaw_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/holidays.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/holidays.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A date string could not be parsed.
    #[error("Invalid date in field '{field}': '{value}'")]
    InvalidDate {
        /// The field holding the date.
        field: String,
        /// The rejected input.
        value: String,
    },

    /// Dates are not in chronological order or cannot be paired.
    #[error("Invalid date ordering: {message}")]
    InvalidOrdering {
        /// A description of the ordering problem.
        message: String,
    },

    /// The selected case options contradict each other or are incomplete.
    #[error("Configuration conflict: {message}")]
    ConfigurationConflict {
        /// A description of the conflict.
        message: String,
    },

    /// A canton abbreviation was not recognised.
    #[error("Unknown canton: {code}")]
    UnknownCanton {
        /// The rejected abbreviation.
        code: String,
    },
}

impl EngineError {
    /// Returns true if the error was caused by the submitted facts rather
    /// than by the engine's configuration.
    pub fn is_validation_error(&self) -> bool {
        !matches!(
            self,
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/holidays.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/holidays.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/ch/sick_pay.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/ch/sick_pay.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_date_displays_field_and_value() {
        let error = EngineError::InvalidDate {
            field: "employment_start".to_string(),
            value: "31.02.2024".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid date in field 'employment_start': '31.02.2024'"
        );
    }

    #[test]
    fn test_configuration_conflict_displays_message() {
        let error = EngineError::ConfigurationConflict {
            message: "no case parameter selected".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration conflict: no case parameter selected"
        );
    }

    #[test]
    fn test_unknown_canton_displays_code() {
        let error = EngineError::UnknownCanton {
            code: "XX".to_string(),
        };
        assert_eq!(error.to_string(), "Unknown canton: XX");
    }

    #[test]
    fn test_validation_errors_are_distinguished_from_config_errors() {
        assert!(
            EngineError::InvalidOrdering {
                message: "x".to_string()
            }
            .is_validation_error()
        );
        assert!(
            !EngineError::ConfigNotFound {
                path: "x".to_string()
            }
            .is_validation_error()
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_conflict() -> EngineResult<()> {
            Err(EngineError::ConfigurationConflict {
                message: "no workdays selected".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_conflict()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
