//! Configuration for the plugin.
//!
//! Two documents are handled here:
//!
//! - **Preferences** (`deviot.json`): the user's persisted selections, such as
//!   the build environment, the serial port and whether the strict `src/`
//!   project structure is enforced.
//! - **Project INI** (`platformio.ini`): the build tool's per-project config.
//!   The plugin only edits `[platformio] src_dir`, always through a full-file
//!   rewrite.

pub mod error;
pub mod ini_store;
pub mod preferences;

pub use error::{ConfigError, Result};
pub use ini_store::{IniStore, PLATFORMIO_SECTION, PROJECT_INI, SRC_DIR_KEY};
pub use preferences::Preferences;
