use std::path::PathBuf;

use deviot_config::ConfigError;
use thiserror::Error;

/// Errors from project precondition actions.
#[derive(Debug, Error)]
pub enum ProjectError {
	/// The active view has no file on disk.
	#[error("the active view is not backed by a file")]
	NoActiveFile,

	/// Moving the sketch into the sources directory failed.
	#[error("failed to move {from} to {to}: {source}")]
	FileMove {
		from: PathBuf,
		to: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// Reading or rewriting the project configuration failed.
	#[error(transparent)]
	Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, ProjectError>;
