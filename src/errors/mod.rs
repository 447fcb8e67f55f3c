//! Startup error type for settings loading.

use std::path::PathBuf;

/// Coarse classification of a [`ConfigError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    MissingRequiredField,
    TypeCoercionFailure,
    EnvFile,
}

/// Configuration error raised while building [`crate::config::Settings`].
///
/// Every variant is fatal: the process must not start serving with an
/// invalid or partial configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required setting: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Invalid value for {field}: expected {expected}, got {raw_value:?}")]
    TypeCoercionFailure {
        field: &'static str,
        raw_value: String,
        expected: &'static str,
    },

    #[error("Failed to read env file {}: {source}", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

impl ConfigError {
    pub fn kind(&self) -> ConfigErrorKind {
        match self {
            Self::MissingRequiredField { .. } => ConfigErrorKind::MissingRequiredField,
            Self::TypeCoercionFailure { .. } => ConfigErrorKind::TypeCoercionFailure,
            Self::EnvFile { .. } => ConfigErrorKind::EnvFile,
        }
    }

    /// Name of the setting at fault, if the error concerns a single field.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingRequiredField { field } | Self::TypeCoercionFailure { field, .. } => {
                Some(field)
            }
            Self::EnvFile { .. } => None,
        }
    }

    /// Check if this error reports an absent required setting.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::MissingRequiredField { .. })
    }
}
