//! Output surfaces and the host window operations that create them.

use thiserror::Error;

use crate::normalize::normalize_newlines;

/// Identifier of the embedded output panel owned by the plugin.
pub const PANEL_ID: &str = "deviot";

/// Syntax definition for console output in the embedded panel.
pub const CONSOLE_SYNTAX: &str = "Packages/Deviot/Console.tmLanguage";

/// Errors raised by an output surface or its host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
	/// The view behind the sink was closed.
	#[error("output view '{name}' is closed")]
	Closed { name: String },
	/// The sink rejected an edit because it is read-only.
	#[error("output view '{name}' is read-only")]
	ReadOnly { name: String },
}

/// Appendable text surface shown by the host editor.
pub trait OutputSink: Send {
	/// Display name of the underlying view.
	fn name(&self) -> String;

	fn append(&mut self, text: &str) -> Result<(), SinkError>;

	fn set_read_only(&mut self, read_only: bool) -> Result<(), SinkError>;

	/// Moves the cursor (and selection) to end of content.
	fn move_cursor_to_end(&mut self) -> Result<(), SinkError>;

	fn focus(&mut self) -> Result<(), SinkError>;

	/// Returns true once the host closed the view.
	fn is_closed(&self) -> bool;
}

/// Pane placement for file-view sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
	/// Reuse the current pane.
	Current,
	Left,
	#[default]
	Right,
	Up,
	Down,
}

/// Which adapter backs a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
	/// Embedded output panel below the editor.
	Panel,
	/// Standalone scratch view in its own pane.
	FileView,
}

/// Where a newly created sink should live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SinkTarget {
	#[default]
	Panel,
	FileView { direction: Direction },
}

impl SinkTarget {
	/// File view in a pane to the right.
	pub fn file_view() -> Self {
		Self::FileView { direction: Direction::Right }
	}

	pub fn kind(self) -> SinkKind {
		match self {
			Self::Panel => SinkKind::Panel,
			Self::FileView { .. } => SinkKind::FileView,
		}
	}
}

/// Window operations of the host editor used for panel lifecycle.
pub trait PanelHost {
	/// Finds an open view in any window whose display name equals `name`.
	fn find_open_view(&mut self, name: &str) -> Option<Box<dyn OutputSink>>;

	/// Creates (or recreates) the embedded output panel `panel_id`, assigning
	/// `syntax` when given.
	fn create_output_panel(&mut self, panel_id: &str, syntax: Option<&str>) -> Result<Box<dyn OutputSink>, SinkError>;

	/// Creates a new pane in `direction` holding a focused, word-wrapped
	/// scratch view named `name`.
	fn create_file_view(&mut self, name: &str, direction: Direction) -> Result<Box<dyn OutputSink>, SinkError>;

	/// Reveals the embedded output panel.
	fn show_panel(&mut self, panel_id: &str);

	/// Focuses the first pane group without views. Returns false when every
	/// group holds at least one view.
	fn focus_empty_group(&mut self) -> bool;

	/// Destroys the focused pane.
	fn destroy_pane(&mut self);
}

/// Writes one fragment: normalizes newlines, lifts read-only for the append,
/// restores it and moves the cursor to the end.
pub fn write_fragment(sink: &mut dyn OutputSink, text: &str) -> Result<(), SinkError> {
	let text = normalize_newlines(text);
	sink.set_read_only(false)?;
	let appended = sink.append(&text);
	sink.set_read_only(true)?;
	appended?;
	sink.move_cursor_to_end()
}
