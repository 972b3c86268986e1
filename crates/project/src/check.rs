use std::path::{Path, PathBuf};

use deviot_config::{IniStore, PLATFORMIO_SECTION, PROJECT_INI, Preferences, SRC_DIR_KEY};

use crate::error::{ProjectError, Result};
use crate::host::{EditorContext, FileMover, FsMover, SelectionPrompt};

/// Extensions the build tool accepts as sketch sources. Matched literally.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["ino", "pde", "cpp", "c", ".S"];

/// Name of the sources directory in the strict project structure.
pub const SRC_DIR: &str = "src";

/// Returns true when `ext` is one of [`ACCEPTED_EXTENSIONS`].
pub fn is_accepted_extension(ext: &str) -> bool {
	ACCEPTED_EXTENSIONS.contains(&ext)
}

/// Returns `path` with `folder` inserted before the file name.
pub fn add_folder_to_file_path(path: &Path, folder: &str) -> PathBuf {
	let parent = path.parent().unwrap_or_else(|| Path::new(""));
	match path.file_name() {
		Some(file_name) => parent.join(folder).join(file_name),
		None => parent.join(folder),
	}
}

/// Returns true when a directory named `src` contains `path`.
pub fn is_in_src_dir(path: &Path) -> bool {
	path.parent().is_some_and(|parent| parent.components().any(|c| c.as_os_str() == SRC_DIR))
}

/// Corrective action taken by [`ProjectCheck::ensure_project_layout`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutAction {
	/// The file was moved into the sources directory and reopened.
	Relocated { from: PathBuf, to: PathBuf },
	/// The file already lives inside a `src` directory.
	AlreadyStructured,
	/// The project config now points `src_dir` at the project directory.
	SourceDirOverridden { ini: PathBuf, src_dir: PathBuf },
}

/// Which picker was shown for a missing selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
	Boards,
	Environments,
	SerialPorts,
}

/// Result of a selection check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
	/// A persisted selection was found and bound.
	Selected(String),
	/// Nothing is persisted; the user was asked to pick.
	Prompted(Prompt),
}

impl Selection {
	pub fn selected(&self) -> Option<&str> {
		match self {
			Self::Selected(id) => Some(id),
			Self::Prompted(_) => None,
		}
	}
}

/// Preconditions checked before build tool commands (initialize, compile,
/// upload) run against the active file.
pub struct ProjectCheck {
	preferences: Preferences,
	mover: Box<dyn FileMover>,
	board_id: Option<String>,
	port_id: Option<String>,
}

impl std::fmt::Debug for ProjectCheck {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ProjectCheck")
			.field("preferences", &self.preferences)
			.field("board_id", &self.board_id)
			.field("port_id", &self.port_id)
			.finish_non_exhaustive()
	}
}

impl ProjectCheck {
	pub fn new(preferences: Preferences) -> Self {
		Self::with_mover(preferences, Box::new(FsMover))
	}

	pub fn with_mover(preferences: Preferences, mover: Box<dyn FileMover>) -> Self {
		Self {
			preferences,
			mover,
			board_id: None,
			port_id: None,
		}
	}

	pub fn preferences(&self) -> &Preferences {
		&self.preferences
	}

	/// Board bound by the last [`Self::check_board_selected`].
	pub fn board_id(&self) -> Option<&str> {
		self.board_id.as_deref()
	}

	/// Port bound by the last [`Self::check_serial_port_selected`].
	pub fn port_id(&self) -> Option<&str> {
		self.port_id.as_deref()
	}

	/// Returns true when the active file has an accepted extension.
	pub fn is_accepted_file_type(&self, ctx: &dyn EditorContext) -> bool {
		ctx.file_extension().is_some_and(|ext| is_accepted_extension(&ext))
	}

	pub fn is_empty_file(&self, ctx: &dyn EditorContext) -> bool {
		ctx.size() == 0
	}

	pub fn has_unsaved_changes(&self, ctx: &dyn EditorContext) -> bool {
		ctx.is_dirty()
	}

	/// Project directory of the active file: its directory, or the parent of
	/// that directory when the file sits in `src`.
	pub fn project_path(&self, ctx: &dyn EditorContext) -> Result<PathBuf> {
		let file = ctx.file_path().ok_or(ProjectError::NoActiveFile)?;
		let dir = file.parent().ok_or(ProjectError::NoActiveFile)?;
		if dir.file_name().is_some_and(|name| name == SRC_DIR)
			&& let Some(project) = dir.parent()
		{
			return Ok(project.to_path_buf());
		}
		Ok(dir.to_path_buf())
	}

	/// Path of the build tool's project configuration.
	pub fn ini_path(&self, ctx: &dyn EditorContext) -> Result<PathBuf> {
		Ok(self.project_path(ctx)?.join(PROJECT_INI))
	}

	/// Brings the project into a layout the build tool can compile.
	///
	/// With the strict structure enabled, a file outside `src` is closed,
	/// moved into `<dir>/src/` and reopened, in that order. A failed move
	/// propagates and leaves the view closed. With the structure disabled the
	/// project config is rewritten so `src_dir` points at the project
	/// directory.
	pub fn ensure_project_layout(&self, ctx: &mut dyn EditorContext) -> Result<LayoutAction> {
		if !self.preferences.structure {
			return self.override_src_dir(ctx);
		}

		let from = ctx.file_path().ok_or(ProjectError::NoActiveFile)?;
		if is_in_src_dir(&from) {
			return Ok(LayoutAction::AlreadyStructured);
		}

		let to = add_folder_to_file_path(&from, SRC_DIR);
		ctx.close_file();
		self.mover.move_file(&from, &to).map_err(|source| ProjectError::FileMove {
			from: from.clone(),
			to: to.clone(),
			source,
		})?;
		ctx.open_file(&to);
		tracing::debug!(from = %from.display(), to = %to.display(), "project.file_relocated");
		Ok(LayoutAction::Relocated { from, to })
	}

	/// Sets `[platformio] src_dir` to the project directory, rewriting the
	/// whole config file.
	pub fn override_src_dir(&self, ctx: &dyn EditorContext) -> Result<LayoutAction> {
		let src_dir = self.project_path(ctx)?;
		let ini = src_dir.join(PROJECT_INI);

		let mut store = IniStore::load(&ini)?;
		store.set(PLATFORMIO_SECTION, SRC_DIR_KEY, &src_dir.to_string_lossy());
		store.persist()?;
		tracing::debug!(ini = %ini.display(), src_dir = %src_dir.display(), "project.src_dir_overridden");
		Ok(LayoutAction::SourceDirOverridden { ini, src_dir })
	}

	/// Binds the persisted environment, or asks the user to pick a board
	/// (none chosen yet) or an environment (boards chosen, none active).
	pub fn check_board_selected(&mut self, prompt: &mut dyn SelectionPrompt) -> Selection {
		self.board_id = self.preferences.environment().map(str::to_string);
		if let Some(id) = &self.board_id {
			return Selection::Selected(id.clone());
		}

		if self.preferences.selected_boards.is_empty() {
			prompt.quick_boards();
			return Selection::Prompted(Prompt::Boards);
		}
		prompt.quick_environments();
		Selection::Prompted(Prompt::Environments)
	}

	/// Binds the persisted serial port, or asks the user to pick one.
	pub fn check_serial_port_selected(&mut self, prompt: &mut dyn SelectionPrompt) -> Selection {
		self.port_id = self.preferences.serial_port().map(str::to_string);
		match &self.port_id {
			Some(port) => Selection::Selected(port.clone()),
			None => {
				prompt.quick_serial_ports();
				Selection::Prompted(Prompt::SerialPorts)
			}
		}
	}
}
