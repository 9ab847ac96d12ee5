use config::ConfigError;
use thiserror::Error;

use crate::core::MatchError;
use crate::services::{ParseError, WriteError};

/// Top-level failure of a matching run
#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Output(#[from] WriteError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl AppError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Process exit status for this failure
    ///
    /// Bad input and environment problems exit with 1; a matcher that runs out
    /// of preferences is a defect and exits with 2.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Match(MatchError::PreferencesExhausted { .. }) => 2,
            _ => 1,
        }
    }

    pub fn is_internal_fault(&self) -> bool {
        self.exit_code() == 2
    }
}
