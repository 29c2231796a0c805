//! Configuration error types.

use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment could not merge or extract the configuration.
    #[error("configuration error: {0}")]
    Figment(Box<figment::Error>),

    /// A field holds a value outside its accepted range.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// Dotted field path.
        field: &'static str,
        /// What is wrong with the value.
        reason: String,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}
