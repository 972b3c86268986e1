//! Editor and file-system collaborators consulted by [`crate::ProjectCheck`].

use std::io;
use std::path::{Path, PathBuf};

/// Active editor view, read fresh on every check.
pub trait EditorContext {
	/// Path of the file shown in the active view.
	fn file_path(&self) -> Option<PathBuf>;

	/// Extension of the active file, without the dot.
	fn file_extension(&self) -> Option<String> {
		let path = self.file_path()?;
		path.extension().map(|ext| ext.to_string_lossy().into_owned())
	}

	/// Returns true when the view has unsaved modifications.
	fn is_dirty(&self) -> bool;

	/// Content size in characters.
	fn size(&self) -> usize;

	/// Closes the active view.
	fn close_file(&mut self);

	/// Opens `path` in the active window.
	fn open_file(&mut self, path: &Path);
}

/// Interactive pickers shown when no selection is persisted.
pub trait SelectionPrompt {
	fn quick_boards(&mut self);

	fn quick_environments(&mut self);

	fn quick_serial_ports(&mut self);
}

/// Synchronous file relocation.
pub trait FileMover {
	fn move_file(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// [`FileMover`] on the local file system.
///
/// Creates the destination directory, renames, and falls back to copy then
/// remove when the rename crosses devices.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsMover;

impl FileMover for FsMover {
	fn move_file(&self, from: &Path, to: &Path) -> io::Result<()> {
		if let Some(parent) = to.parent() {
			std::fs::create_dir_all(parent)?;
		}
		match std::fs::rename(from, to) {
			Ok(()) => Ok(()),
			Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {
				std::fs::copy(from, to)?;
				std::fs::remove_file(from)
			}
			Err(err) => Err(err),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fs_mover_creates_destination_directory() {
		let dir = tempfile::tempdir().unwrap();
		let from = dir.path().join("blink.ino");
		let to = dir.path().join("src").join("blink.ino");
		std::fs::write(&from, "void setup() {}").unwrap();

		FsMover.move_file(&from, &to).unwrap();
		assert!(!from.exists());
		assert_eq!(std::fs::read_to_string(&to).unwrap(), "void setup() {}");
	}

	#[test]
	fn fs_mover_reports_missing_source() {
		let dir = tempfile::tempdir().unwrap();
		let err = FsMover
			.move_file(&dir.path().join("missing.ino"), &dir.path().join("src/missing.ino"))
			.unwrap_err();
		assert_eq!(err.kind(), io::ErrorKind::NotFound);
	}

	struct Fixed(Option<&'static str>);

	impl EditorContext for Fixed {
		fn file_path(&self) -> Option<PathBuf> {
			self.0.map(PathBuf::from)
		}

		fn is_dirty(&self) -> bool {
			false
		}

		fn size(&self) -> usize {
			0
		}

		fn close_file(&mut self) {}

		fn open_file(&mut self, _path: &Path) {}
	}

	#[test]
	fn default_extension_comes_from_path() {
		assert_eq!(Fixed(Some("/p/blink.ino")).file_extension().as_deref(), Some("ino"));
		assert_eq!(Fixed(Some("/p/start.S")).file_extension().as_deref(), Some("S"));
		assert_eq!(Fixed(Some("/p/Makefile")).file_extension(), None);
		assert_eq!(Fixed(None).file_extension(), None);
	}
}
