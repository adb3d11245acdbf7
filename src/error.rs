//! Error taxonomy for the estimation pipeline.

use std::fmt;

use crate::config::ConfigError;

/// Failure that stops an estimation before any result is produced.
///
/// Recoverable conditions (missing weather, degenerate financial ratios) are
/// resolved inside the pipeline and never surface here.
#[derive(Debug)]
pub enum EstimateError {
    /// One or more inputs violate their constraints; nothing was simulated.
    Validation(Vec<ConfigError>),
    /// The site cannot be simulated (coordinates, timezone, or calendar year).
    InvalidSite(String),
}

impl fmt::Display for EstimateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(errors) => {
                write!(f, "invalid input: ")?;
                for (i, e) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{} {}", e.field, e.message)?;
                }
                Ok(())
            }
            Self::InvalidSite(msg) => write!(f, "invalid site: {msg}"),
        }
    }
}

impl std::error::Error for EstimateError {}

impl From<ConfigError> for EstimateError {
    fn from(e: ConfigError) -> Self {
        Self::Validation(vec![e])
    }
}
