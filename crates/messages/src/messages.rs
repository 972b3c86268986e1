//! Message handler: translated text queued from any thread and delivered to
//! one output sink by a single drain actor.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use deviot_i18n::Translate;
use deviot_worker::{DRAIN_YIELD, Drain, DrainHandle, DrainSpec, DrainStep, Mailbox, Popped, spawn_drain};
use parking_lot::Mutex;

use crate::error::{MessagesError, Result};
use crate::normalize::trim_newline_escapes;
use crate::registry::PanelRegistry;
use crate::sink::{CONSOLE_SYNTAX, OutputSink, PANEL_ID, PanelHost, SinkKind, SinkTarget, write_fragment};

/// Tuning for message delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagesConfig {
	/// Pause between consecutive drain steps while fragments remain.
	pub drain_yield: Duration,
	/// Syntax assigned to the embedded output panel.
	pub console_syntax: Option<String>,
}

impl Default for MessagesConfig {
	fn default() -> Self {
		Self {
			drain_yield: DRAIN_YIELD,
			console_syntax: Some(CONSOLE_SYNTAX.to_string()),
		}
	}
}

/// Text accepted by [`Messages::print`]. Bytes are decoded as UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageText {
	Text(String),
	Bytes(Vec<u8>),
}

impl MessageText {
	fn into_string(self) -> String {
		match self {
			Self::Text(text) => text,
			Self::Bytes(bytes) => match String::from_utf8(bytes) {
				Ok(text) => text,
				Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
			},
		}
	}
}

impl From<&str> for MessageText {
	fn from(text: &str) -> Self {
		Self::Text(text.to_string())
	}
}

impl From<String> for MessageText {
	fn from(text: String) -> Self {
		Self::Text(text)
	}
}

impl From<&[u8]> for MessageText {
	fn from(bytes: &[u8]) -> Self {
		Self::Bytes(bytes.to_vec())
	}
}

impl From<Vec<u8>> for MessageText {
	fn from(bytes: Vec<u8>) -> Self {
		Self::Bytes(bytes)
	}
}

struct BoundSink {
	kind: SinkKind,
	sink: Box<dyn OutputSink>,
}

#[derive(Default)]
struct Labels {
	name: Option<String>,
	initial_text: Option<String>,
}

struct Shared {
	id: u64,
	translator: Arc<dyn Translate>,
	config: MessagesConfig,
	queue: Mailbox<String>,
	sink: Mutex<Option<BoundSink>>,
	labels: Mutex<Labels>,
	drain: Mutex<Option<DrainHandle>>,
}

/// Handle to one message panel session.
///
/// Clones share the queue, the bound sink and the drain actor. The actor
/// holds only a weak reference, so dropping the last handle stops it.
#[derive(Clone)]
pub struct Messages {
	shared: Arc<Shared>,
}

impl std::fmt::Debug for Messages {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Messages")
			.field("id", &self.shared.id)
			.field("name", &self.name())
			.field("pending", &self.pending())
			.field("open", &self.is_open())
			.finish()
	}
}

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

impl Messages {
	/// Creates an unbound handler. Text printed before a panel is opened is
	/// buffered and flushed once the sink exists.
	pub fn new(translator: Arc<dyn Translate>) -> Self {
		Self::with_config(translator, MessagesConfig::default())
	}

	pub fn with_config(translator: Arc<dyn Translate>, config: MessagesConfig) -> Self {
		Self {
			shared: Arc::new(Shared {
				id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
				translator,
				config,
				queue: Mailbox::new(),
				sink: Mutex::new(None),
				labels: Mutex::new(Labels::default()),
				drain: Mutex::new(None),
			}),
		}
	}

	/// Creates a handler bound to an existing sink.
	pub fn with_sink(translator: Arc<dyn Translate>, kind: SinkKind, sink: Box<dyn OutputSink>) -> Self {
		let messages = Self::new(translator);
		messages.bind(kind, sink);
		messages
	}

	/// Process-unique handler id.
	pub fn id(&self) -> u64 {
		self.shared.id
	}

	/// Returns true when both handles are the same handler.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.shared, &other.shared)
	}

	/// Panel display name, empty when unnamed.
	pub fn name(&self) -> String {
		self.shared.labels.lock().name.clone().unwrap_or_default()
	}

	/// Sets the translated text printed whenever the panel is opened.
	pub fn initial_text(&self, key: &str, args: &[&str]) {
		let text = self.shared.translator.translate(key, args);
		self.shared.labels.lock().initial_text = Some(text);
	}

	/// Sets the translated panel display name.
	pub fn panel_name(&self, key: &str, args: &[&str]) {
		let name = self.shared.translator.translate(key, args);
		self.shared.labels.lock().name = Some(trim_newline_escapes(&name).to_string());
	}

	/// Number of fragments waiting for delivery.
	pub fn pending(&self) -> usize {
		self.shared.queue.len()
	}

	/// Returns true when a sink is bound and still open.
	pub fn is_open(&self) -> bool {
		self.shared.sink.lock().as_ref().is_some_and(|bound| !bound.sink.is_closed())
	}

	/// Kind of the bound sink.
	pub fn sink_kind(&self) -> Option<SinkKind> {
		self.shared.sink.lock().as_ref().map(|bound| bound.kind)
	}

	/// Drain steps that delivered (or dropped) a fragment.
	pub fn delivered_steps(&self) -> u64 {
		self.shared.drain.lock().as_ref().map_or(0, DrainHandle::steps)
	}

	/// Opens the panel: reuses the bound sink, recovers an open view with
	/// the panel name, or creates a new sink for `target`. Then reveals it,
	/// starts delivery, queues the initial text and tracks a named panel in
	/// `registry`.
	pub fn open_panel(&self, host: &mut dyn PanelHost, registry: &mut PanelRegistry, target: SinkTarget) -> Result<()> {
		let name = self.name();
		if !self.is_open() && !self.recover_panel(host, &name) {
			self.select_output(host, &name, target)?;
		}

		self.reveal(host)?;
		self.shared.queue.reopen();
		self.start_delivery();

		let initial = self.shared.labels.lock().initial_text.clone();
		if let Some(text) = initial {
			self.enqueue(text);
		}

		if !name.is_empty() {
			registry.track(self.clone());
		}
		tracing::debug!(panel = %name, id = self.shared.id, kind = ?self.sink_kind(), "messages.panel_opened");
		Ok(())
	}

	/// Binds an open host view named `name`. Returns false when none exists.
	pub fn recover_panel(&self, host: &mut dyn PanelHost, name: &str) -> bool {
		if name.is_empty() {
			return false;
		}
		match host.find_open_view(name) {
			Some(sink) => {
				tracing::debug!(panel = %name, "messages.panel_recovered");
				self.bind(SinkKind::FileView, sink);
				true
			}
			None => false,
		}
	}

	/// Focuses the bound sink.
	pub fn set_focus(&self) -> Result<()> {
		let mut slot = self.shared.sink.lock();
		let bound = slot.as_mut().ok_or_else(|| MessagesError::SinkUnavailable { name: self.name() })?;
		bound.sink.focus()?;
		Ok(())
	}

	/// Translates `text` and queues it for delivery. Safe from any thread;
	/// never touches the sink.
	pub fn print(&self, text: impl Into<MessageText>, args: &[&str]) {
		let text = text.into().into_string();
		let text = self.shared.translator.translate(&text, args);
		self.enqueue(text);
	}

	/// Delivers at most one queued fragment to the sink.
	///
	/// The queue lock is released before the sink write. A fragment popped
	/// while no open sink is bound is dropped with a warning. Only valid while
	/// no drain actor runs.
	#[cfg(test)]
	pub(crate) fn drain_step(&self) -> DrainStep {
		drain_shared(&self.shared)
	}

	/// Unbinds the sink and stops delivery.
	///
	/// Queued fragments are dropped and later prints are rejected with a
	/// warning until the panel is opened again through [`Self::open_panel`].
	pub fn detach(&self) {
		let drain = self.shared.drain.lock().take();
		if let Some(handle) = drain {
			handle.cancel();
		}
		self.shared.sink.lock().take();
		self.shared.queue.close();
		let dropped = self.shared.queue.clear();
		if dropped > 0 {
			tracing::warn!(id = self.shared.id, dropped, "dropping queued message fragments, output view closed");
		}
		tracing::debug!(panel = %self.name(), id = self.shared.id, "messages.detached");
	}

	fn enqueue(&self, text: String) {
		tracing::trace!(id = self.shared.id, len = text.len(), "messages.enqueue");
		if !self.shared.queue.push(text) {
			tracing::warn!(id = self.shared.id, "dropping message fragment, output view closed");
		}
	}

	fn bind(&self, kind: SinkKind, sink: Box<dyn OutputSink>) {
		*self.shared.sink.lock() = Some(BoundSink { kind, sink });
	}

	fn select_output(&self, host: &mut dyn PanelHost, name: &str, target: SinkTarget) -> Result<()> {
		let sink = match target {
			SinkTarget::Panel => host.create_output_panel(PANEL_ID, self.shared.config.console_syntax.as_deref())?,
			SinkTarget::FileView { direction } => host.create_file_view(name, direction)?,
		};
		self.bind(target.kind(), sink);
		Ok(())
	}

	fn reveal(&self, host: &mut dyn PanelHost) -> Result<()> {
		match self.sink_kind() {
			Some(SinkKind::Panel) => {
				host.show_panel(PANEL_ID);
				Ok(())
			}
			Some(SinkKind::FileView) => self.set_focus(),
			None => Err(MessagesError::SinkUnavailable { name: self.name() }),
		}
	}

	/// Starts the drain actor unless one is already running.
	///
	/// Must be called inside a tokio runtime, or the worker's shared runtime
	/// is used.
	pub fn start_delivery(&self) {
		let mut drain = self.shared.drain.lock();
		if drain.as_ref().is_some_and(|handle| !handle.is_finished()) {
			return;
		}
		let spec = DrainSpec::new(format!("messages:{}", self.shared.id)).yield_delay(self.shared.config.drain_yield);
		let target = DrainTarget {
			shared: Arc::downgrade(&self.shared),
		};
		*drain = Some(spawn_drain(spec, self.shared.queue.clone(), target));
	}
}

struct DrainTarget {
	shared: Weak<Shared>,
}

impl Drain for DrainTarget {
	fn step(&mut self) -> DrainStep {
		match self.shared.upgrade() {
			Some(shared) => drain_shared(&shared),
			None => DrainStep::Detached,
		}
	}
}

fn drain_shared(shared: &Shared) -> DrainStep {
	let Some(Popped { item, remaining }) = shared.queue.pop() else {
		return DrainStep::Idle;
	};

	let mut slot = shared.sink.lock();
	match slot.as_mut() {
		Some(bound) if !bound.sink.is_closed() => {
			if let Err(err) = write_fragment(bound.sink.as_mut(), &item) {
				tracing::warn!(id = shared.id, error = %err, "dropping message fragment, sink write failed");
			}
		}
		Some(bound) => {
			tracing::warn!(id = shared.id, sink = %bound.sink.name(), "dropping message fragment, output view closed");
		}
		None => {
			tracing::warn!(id = shared.id, "dropping message fragment, no output view bound");
		}
	}
	drop(slot);

	if remaining > 0 { DrainStep::Pending } else { DrainStep::Drained }
}
