//! Build-tool project configuration (`platformio.ini`).
//!
//! The store loads the whole file, edits it in memory and rewrites it in full
//! on [`IniStore::persist`]. Comments in the original file are not preserved.

use std::path::{Path, PathBuf};

use ini::Ini;

use crate::error::{ConfigError, Result};

/// File name of the build-tool project configuration.
pub const PROJECT_INI: &str = "platformio.ini";

/// Section holding the build-tool options edited by the plugin.
pub const PLATFORMIO_SECTION: &str = "platformio";

/// Key pointing the build tool at the sources directory.
pub const SRC_DIR_KEY: &str = "src_dir";

/// INI-backed key/value store bound to one file.
#[derive(Debug)]
pub struct IniStore {
	path: PathBuf,
	ini: Ini,
}

impl IniStore {
	/// Loads `path`. A missing file yields an empty store that creates the
	/// file on persist.
	pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
		let path = path.into();
		let ini = match Ini::load_from_file(&path) {
			Ok(ini) => ini,
			Err(ini::Error::Io(error)) if error.kind() == std::io::ErrorKind::NotFound => {
				tracing::debug!(path = %path.display(), "config.ini_missing");
				Ini::new()
			}
			Err(ini::Error::Io(error)) => return Err(ConfigError::Read { path, error }),
			Err(ini::Error::Parse(error)) => return Err(ConfigError::Ini { path, error }),
		};
		Ok(Self { path, ini })
	}

	/// File this store persists to.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Reads one value.
	pub fn get(&self, section: &str, key: &str) -> Option<&str> {
		self.ini.section(Some(section)).and_then(|props| props.get(key))
	}

	/// Sets one value, creating the section when needed.
	pub fn set(&mut self, section: &str, key: &str, value: &str) {
		self.ini.with_section(Some(section)).set(key, value);
	}

	/// Rewrites the whole file.
	pub fn persist(&self) -> Result<()> {
		self.ini.write_to_file(&self.path).map_err(|error| ConfigError::Write {
			path: self.path.clone(),
			error,
		})?;
		tracing::debug!(path = %self.path.display(), "config.ini_persisted");
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn missing_file_loads_empty_and_persist_creates_it() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join(PROJECT_INI);

		let mut store = IniStore::load(&path).unwrap();
		assert_eq!(store.get(PLATFORMIO_SECTION, SRC_DIR_KEY), None);

		store.set(PLATFORMIO_SECTION, SRC_DIR_KEY, "/proj");
		store.persist().unwrap();

		let reloaded = IniStore::load(&path).unwrap();
		assert_eq!(reloaded.get(PLATFORMIO_SECTION, SRC_DIR_KEY), Some("/proj"));
	}

	#[test]
	fn set_keeps_other_sections_and_keys() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join(PROJECT_INI);
		std::fs::write(&path, "[platformio]\nenv_default = uno\n\n[env:uno]\nplatform = atmelavr\nboard = uno\n").unwrap();

		let mut store = IniStore::load(&path).unwrap();
		store.set(PLATFORMIO_SECTION, SRC_DIR_KEY, "/work/blink");
		store.persist().unwrap();

		let reloaded = IniStore::load(&path).unwrap();
		assert_eq!(reloaded.get(PLATFORMIO_SECTION, SRC_DIR_KEY), Some("/work/blink"));
		assert_eq!(reloaded.get(PLATFORMIO_SECTION, "env_default"), Some("uno"));
		assert_eq!(reloaded.get("env:uno", "board"), Some("uno"));
	}

	#[test]
	fn persist_into_missing_directory_fails_with_write_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("absent").join(PROJECT_INI);

		let store = IniStore::load(&path).unwrap();
		assert!(matches!(store.persist(), Err(ConfigError::Write { .. })));
	}
}
