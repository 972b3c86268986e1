//! In-memory host and sink adapters.
//!
//! Used for headless runs and tests. A [`MemorySink`] is a shared handle: the
//! host keeps one clone per view and every sink handed to a `Messages` points
//! at the same buffer, so host-side closes are visible to the drain actor.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::sink::{Direction, OutputSink, PanelHost, SinkError, SinkKind};

/// Snapshot of one in-memory view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryView {
	pub name: String,
	pub kind: SinkKind,
	pub text: String,
	pub read_only: bool,
	/// Byte offset of the cursor.
	pub cursor: usize,
	pub focus_count: usize,
	/// Number of successful appends.
	pub appends: usize,
	pub closed: bool,
	pub word_wrap: bool,
	pub scratch: bool,
	pub syntax: Option<String>,
}

impl MemoryView {
	fn new(name: &str, kind: SinkKind) -> Self {
		Self {
			name: name.to_string(),
			kind,
			text: String::new(),
			read_only: false,
			cursor: 0,
			focus_count: 0,
			appends: 0,
			closed: false,
			word_wrap: false,
			scratch: false,
			syntax: None,
		}
	}
}

/// Shared in-memory text view.
#[derive(Debug, Clone)]
pub struct MemorySink {
	view: Arc<Mutex<MemoryView>>,
}

impl MemorySink {
	pub fn new(name: &str, kind: SinkKind) -> Self {
		Self {
			view: Arc::new(Mutex::new(MemoryView::new(name, kind))),
		}
	}

	/// Current buffer contents.
	pub fn text(&self) -> String {
		self.view.lock().text.clone()
	}

	pub fn snapshot(&self) -> MemoryView {
		self.view.lock().clone()
	}

	/// Marks the view closed; later edits fail with [`SinkError::Closed`].
	pub fn close(&self) {
		self.view.lock().closed = true;
	}

	/// Returns true when both handles point at one view.
	pub fn same_view(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.view, &other.view)
	}

	fn edit<R>(&self, f: impl FnOnce(&mut MemoryView) -> Result<R, SinkError>) -> Result<R, SinkError> {
		let mut view = self.view.lock();
		if view.closed {
			return Err(SinkError::Closed { name: view.name.clone() });
		}
		f(&mut view)
	}
}

impl OutputSink for MemorySink {
	fn name(&self) -> String {
		self.view.lock().name.clone()
	}

	fn append(&mut self, text: &str) -> Result<(), SinkError> {
		self.edit(|view| {
			if view.read_only {
				return Err(SinkError::ReadOnly { name: view.name.clone() });
			}
			view.text.push_str(text);
			view.appends += 1;
			Ok(())
		})
	}

	fn set_read_only(&mut self, read_only: bool) -> Result<(), SinkError> {
		self.edit(|view| {
			view.read_only = read_only;
			Ok(())
		})
	}

	fn move_cursor_to_end(&mut self) -> Result<(), SinkError> {
		self.edit(|view| {
			view.cursor = view.text.len();
			Ok(())
		})
	}

	fn focus(&mut self) -> Result<(), SinkError> {
		self.edit(|view| {
			view.focus_count += 1;
			Ok(())
		})
	}

	fn is_closed(&self) -> bool {
		self.view.lock().closed
	}
}

/// Single-window in-memory editor host.
///
/// The window is a list of pane groups, each holding view names. Output
/// panels live outside the groups, like an editor's bottom panel.
#[derive(Debug)]
pub struct MemoryHost {
	groups: Vec<Vec<String>>,
	focused_group: usize,
	views: Vec<MemorySink>,
	panels: Vec<(String, MemorySink)>,
	shown_panel: Option<String>,
	destroyed_panes: usize,
}

impl Default for MemoryHost {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryHost {
	/// Window with one group holding an untitled document.
	pub fn new() -> Self {
		let mut host = Self {
			groups: vec![Vec::new()],
			focused_group: 0,
			views: Vec::new(),
			panels: Vec::new(),
			shown_panel: None,
			destroyed_panes: 0,
		};
		host.open_document("untitled");
		host
	}

	/// Opens a plain document view in the focused group.
	pub fn open_document(&mut self, name: &str) -> MemorySink {
		let sink = MemorySink::new(name, SinkKind::FileView);
		self.groups[self.focused_group].push(name.to_string());
		self.views.push(sink.clone());
		sink
	}

	/// Closes the first open view named `name`, as the user would.
	pub fn close_view(&mut self, name: &str) -> bool {
		let Some(sink) = self.views.iter().find(|v| !v.is_closed() && v.name() == name).cloned() else {
			return false;
		};
		sink.close();
		self.views.retain(|v| !v.same_view(&sink));
		for group in &mut self.groups {
			if let Some(pos) = group.iter().position(|n| n == name) {
				group.remove(pos);
				break;
			}
		}
		true
	}

	/// Open view named `name`.
	pub fn view(&self, name: &str) -> Option<MemorySink> {
		self.views.iter().find(|v| !v.is_closed() && v.name() == name).cloned()
	}

	/// Current embedded panel `panel_id`.
	pub fn panel(&self, panel_id: &str) -> Option<MemorySink> {
		self.panels.iter().find(|(id, _)| id == panel_id).map(|(_, sink)| sink.clone())
	}

	pub fn shown_panel(&self) -> Option<&str> {
		self.shown_panel.as_deref()
	}

	pub fn group_count(&self) -> usize {
		self.groups.len()
	}

	pub fn destroyed_panes(&self) -> usize {
		self.destroyed_panes
	}
}

impl PanelHost for MemoryHost {
	fn find_open_view(&mut self, name: &str) -> Option<Box<dyn OutputSink>> {
		self.view(name).map(|sink| Box::new(sink) as Box<dyn OutputSink>)
	}

	fn create_output_panel(&mut self, panel_id: &str, syntax: Option<&str>) -> Result<Box<dyn OutputSink>, SinkError> {
		let sink = MemorySink::new(panel_id, SinkKind::Panel);
		sink.view.lock().syntax = syntax.map(str::to_string);
		if let Some(slot) = self.panels.iter_mut().find(|(id, _)| id == panel_id) {
			slot.1.close();
			slot.1 = sink.clone();
		} else {
			self.panels.push((panel_id.to_string(), sink.clone()));
		}
		Ok(Box::new(sink))
	}

	fn create_file_view(&mut self, name: &str, direction: Direction) -> Result<Box<dyn OutputSink>, SinkError> {
		if direction != Direction::Current {
			self.groups.push(Vec::new());
			self.focused_group = self.groups.len() - 1;
		}
		let sink = self.open_document(name);
		{
			let mut view = sink.view.lock();
			view.word_wrap = !view.word_wrap;
			view.scratch = true;
			view.focus_count += 1;
		}
		Ok(Box::new(sink))
	}

	fn show_panel(&mut self, panel_id: &str) {
		self.shown_panel = Some(panel_id.to_string());
	}

	fn focus_empty_group(&mut self) -> bool {
		match self.groups.iter().position(Vec::is_empty) {
			Some(index) => {
				self.focused_group = index;
				true
			}
			None => false,
		}
	}

	fn destroy_pane(&mut self) {
		if self.groups.len() <= 1 {
			return;
		}
		self.groups.remove(self.focused_group);
		self.focused_group = self.focused_group.saturating_sub(1);
		self.destroyed_panes += 1;
	}
}
