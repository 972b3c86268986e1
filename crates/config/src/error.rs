//! Error types for configuration loading and persistence.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading or writing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Read {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error writing a configuration file.
	#[error("I/O error writing {path}: {error}")]
	Write {
		/// Path to the file that failed to write.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Preferences are not valid JSON for the expected schema.
	#[error("invalid preferences in {path}: {error}")]
	Json {
		path: PathBuf,
		error: serde_json::Error,
	},

	/// The INI file could not be parsed.
	#[error("INI parse error in {path}: {error}")]
	Ini {
		path: PathBuf,
		error: ini::ParseError,
	},
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
