use roster_core::{ApiError, ConfigError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Already shown to the user as the roster's notice.
    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
