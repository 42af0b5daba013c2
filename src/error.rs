//! Typed errors for configuration loading.
//!
//! Internal modules return [`ConfigError`] where the failure class matters;
//! command handlers at the CLI boundary convert to [`anyhow::Error`] via `?`.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise from configuration loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Two mapping entries declare the same source subdirectory.
    #[error("duplicate mapping source '{0}' in mappings.toml")]
    DuplicateSource(String),

    /// A config file exists but cannot be parsed as TOML.
    #[error("invalid TOML in {file}: {message}")]
    InvalidSyntax {
        /// Path of the file that failed to parse.
        file: PathBuf,
        /// Parser error message.
        message: String,
    },

    /// An I/O error occurred while reading a config file.
    #[error("reading config file {path}")]
    Io {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
