use thiserror::Error;

use crate::sink::SinkError;

/// Errors surfaced by panel lifecycle operations.
#[derive(Debug, Error)]
pub enum MessagesError {
	/// No output sink is bound to the handler.
	#[error("no output sink bound for panel '{name}'")]
	SinkUnavailable { name: String },
	/// The host or sink failed.
	#[error(transparent)]
	Sink(#[from] SinkError),
}

pub type Result<T> = std::result::Result<T, MessagesError>;
