//! Project preconditions for build tool commands.
//!
//! Before initializing, compiling or uploading, the plugin checks that the
//! active file is a sketch source, is saved and non-empty, that the project
//! layout matches the build tool's expectations, and that a board and serial
//! port are selected.

mod check;
pub mod error;
pub mod host;

pub use check::{
	ACCEPTED_EXTENSIONS, LayoutAction, ProjectCheck, Prompt, SRC_DIR, Selection, add_folder_to_file_path, is_accepted_extension, is_in_src_dir,
};
pub use error::{ProjectError, Result};
pub use host::{EditorContext, FileMover, FsMover, SelectionPrompt};
