//! Output panel messages for the plugin.
//!
//! Text printed from any thread (build tool output readers, serial monitors,
//! command handlers) is queued on a [`Messages`] handler and delivered to its
//! output view by one drain actor, one fragment per step, in print order.
//!
//! * [`Messages`]: per-panel queue, sink binding and delivery.
//! * [`PanelRegistry`]: name → handler tracking across plugin commands.
//! * [`OutputSink`] / [`PanelHost`]: the host editor surface.
//! * [`memory`]: in-memory host adapters.

pub mod error;
pub mod memory;
mod messages;
mod normalize;
mod registry;
pub mod sink;

pub use error::{MessagesError, Result};
pub use messages::{MessageText, Messages, MessagesConfig};
pub use normalize::{normalize_newlines, trim_newline_escapes};
pub use registry::{PanelRegistry, PanelRequest, ViewClosed};
pub use sink::{CONSOLE_SYNTAX, Direction, OutputSink, PANEL_ID, PanelHost, SinkError, SinkKind, SinkTarget, write_fragment};
