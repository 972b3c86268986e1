//! Panel session registry.
//!
//! Maps panel display names to their message handlers so later commands can
//! recover or close a panel opened earlier. The registry is a plain value
//! owned by the plugin host (created at startup, dropped at shutdown) and
//! mutated through `&mut self`, which keeps every change on the owner's
//! thread.

use std::collections::HashMap;
use std::sync::Arc;

use deviot_i18n::Translate;

use crate::error::Result;
use crate::messages::{Messages, MessagesConfig};
use crate::normalize::trim_newline_escapes;
use crate::sink::{PanelHost, SinkTarget};

/// Request to open (or recover) a named panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelRequest {
	/// Translation key of the panel name.
	pub name: String,
	/// Translation key of the text printed when the panel opens.
	pub initial_text: Option<String>,
	pub target: SinkTarget,
}

impl PanelRequest {
	/// Embedded panel request named by `name`.
	pub fn named(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Self::default()
		}
	}

	#[must_use]
	pub fn initial_text(mut self, key: impl Into<String>) -> Self {
		self.initial_text = Some(key.into());
		self
	}

	#[must_use]
	pub fn target(mut self, target: SinkTarget) -> Self {
		self.target = target;
		self
	}
}

/// Outcome of [`PanelRegistry::on_view_closed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewClosed {
	/// The view was not a tracked panel.
	Untracked,
	/// The panel entry was removed.
	Evicted {
		/// An emptied pane group was destroyed.
		pane_destroyed: bool,
	},
}

/// Name → handler registry for open panels.
pub struct PanelRegistry {
	translator: Arc<dyn Translate>,
	config: MessagesConfig,
	panels: HashMap<String, Messages>,
}

impl std::fmt::Debug for PanelRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PanelRegistry").field("panels", &self.names()).finish()
	}
}

impl PanelRegistry {
	pub fn new(translator: Arc<dyn Translate>) -> Self {
		Self::with_config(translator, MessagesConfig::default())
	}

	pub fn with_config(translator: Arc<dyn Translate>, config: MessagesConfig) -> Self {
		Self {
			translator,
			config,
			panels: HashMap::new(),
		}
	}

	/// Creates an unnamed, untracked handler sharing this registry's
	/// translator and tuning.
	pub fn handler(&self) -> Messages {
		Messages::with_config(Arc::clone(&self.translator), self.config.clone())
	}

	/// Opens the panel described by `request`.
	///
	/// A tracked handler with the same name is reused, so repeated opens
	/// return the same handler and the same view.
	pub fn open_panel(&mut self, host: &mut dyn PanelHost, request: PanelRequest) -> Result<Messages> {
		let name = trim_newline_escapes(&self.translator.translate(&request.name, &[])).to_string();
		let messages = match self.panels.get(&name) {
			Some(existing) => existing.clone(),
			None => {
				let messages = self.handler();
				messages.panel_name(&request.name, &[]);
				messages
			}
		};
		if let Some(key) = &request.initial_text {
			messages.initial_text(key, &[]);
		}
		messages.open_panel(host, self, request.target)?;
		Ok(messages)
	}

	/// Tracks `messages` under its panel name. Unnamed handlers are ignored.
	pub fn track(&mut self, messages: Messages) {
		let name = messages.name();
		if name.is_empty() {
			return;
		}
		if let Some(previous) = self.panels.insert(name.clone(), messages)
			&& !previous.ptr_eq(&self.panels[&name])
		{
			tracing::debug!(panel = %name, replaced = previous.id(), "registry.handler_replaced");
		}
	}

	/// Handles a view close reported by the host.
	///
	/// Untracked names are ignored. A tracked panel is evicted and its
	/// handler detached; if the window is left with an empty pane group, that
	/// group is focused and destroyed.
	pub fn on_view_closed(&mut self, host: &mut dyn PanelHost, view_name: &str) -> ViewClosed {
		let Some(messages) = self.panels.remove(view_name) else {
			return ViewClosed::Untracked;
		};
		messages.detach();

		let pane_destroyed = host.focus_empty_group();
		if pane_destroyed {
			host.destroy_pane();
		}
		tracing::debug!(panel = %view_name, pane_destroyed, "registry.panel_evicted");
		ViewClosed::Evicted { pane_destroyed }
	}

	pub fn get(&self, name: &str) -> Option<&Messages> {
		self.panels.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.panels.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.panels.len()
	}

	pub fn is_empty(&self) -> bool {
		self.panels.is_empty()
	}

	/// Tracked panel names, sorted.
	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<_> = self.panels.keys().cloned().collect();
		names.sort();
		names
	}

	/// Detaches and forgets every panel. Called at plugin shutdown.
	pub fn close_all(&mut self) {
		for (_, messages) in self.panels.drain() {
			messages.detach();
		}
	}
}

#[cfg(test)]
mod tests;
