//! Persisted plugin preferences.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// User selections and options stored between editor sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
	/// Keep the build tool's strict `src/` project structure.
	pub structure: bool,
	/// Build environment (board id) used for compile/upload.
	pub environment: Option<String>,
	/// Serial port used for upload and monitor.
	pub serial_port: Option<String>,
	/// Boards the user has picked for the current project.
	pub selected_boards: Vec<String>,
	/// UI language code for message catalogs.
	pub language: Option<String>,
}

impl Preferences {
	/// Reads preferences from `path`; a missing file yields defaults.
	pub fn load(path: &Path) -> Result<Self> {
		let json = match std::fs::read_to_string(path) {
			Ok(json) => json,
			Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
			Err(error) => {
				return Err(ConfigError::Read {
					path: path.to_path_buf(),
					error,
				});
			}
		};
		serde_json::from_str(&json).map_err(|error| ConfigError::Json {
			path: path.to_path_buf(),
			error,
		})
	}

	/// Writes preferences as pretty JSON, replacing the file.
	pub fn save(&self, path: &Path) -> Result<()> {
		let json = serde_json::to_string_pretty(self).map_err(|error| ConfigError::Json {
			path: path.to_path_buf(),
			error,
		})?;
		std::fs::write(path, json).map_err(|error| ConfigError::Write {
			path: path.to_path_buf(),
			error,
		})
	}

	/// Selected environment, ignoring empty strings.
	pub fn environment(&self) -> Option<&str> {
		self.environment.as_deref().filter(|s| !s.is_empty())
	}

	/// Selected serial port, ignoring empty strings.
	pub fn serial_port(&self) -> Option<&str> {
		self.serial_port.as_deref().filter(|s| !s.is_empty())
	}
}
