//! Worker runtime primitives shared by the plugin crates.
//!
//! * [`Mailbox`]: FIFO with synchronous producers and one async consumer.
//! * [`spawn_drain`]: single-flight drain actor over a mailbox.
//! * [`spawn`]: runtime-aware task spawn.

pub mod drain;
pub mod mailbox;
mod spawn;

pub use drain::{DRAIN_YIELD, Drain, DrainExit, DrainHandle, DrainSpec, DrainStep, spawn_drain};
pub use mailbox::{Mailbox, Popped};
pub use spawn::spawn;
