//! Single-flight drain actor.
//!
//! One actor task owns the consumer side of a [`Mailbox`] and runs the
//! target's [`Drain::step`] sequentially: steps never overlap. While a step
//! reports more pending work the actor yields for a short delay so bursts
//! coalesce and the host event loop keeps turning. When idle it parks on the
//! mailbox until a producer pushes again.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::mailbox::Mailbox;
use crate::spawn;

/// Default pause between consecutive steps while work remains.
pub const DRAIN_YIELD: Duration = Duration::from_millis(1);

/// Outcome of one drain step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainStep {
	/// Nothing was queued; the wake was redundant.
	Idle,
	/// One item was processed and the queue is now empty.
	Drained,
	/// One item was processed and more are queued.
	Pending,
	/// The target is gone; the actor should exit.
	Detached,
}

/// Why a drain actor stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainExit {
	Cancelled,
	MailboxClosed,
	Detached,
}

/// Consumer logic run by a drain actor.
pub trait Drain: Send + 'static {
	/// Processes at most one queued item.
	fn step(&mut self) -> DrainStep;
}

impl<F> Drain for F
where
	F: FnMut() -> DrainStep + Send + 'static,
{
	fn step(&mut self) -> DrainStep {
		self()
	}
}

/// Spawn configuration for one drain actor.
#[derive(Debug, Clone)]
pub struct DrainSpec {
	pub(crate) name: String,
	pub(crate) yield_delay: Duration,
}

impl DrainSpec {
	/// Creates a spec with the default yield.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			yield_delay: DRAIN_YIELD,
		}
	}

	/// Sets the pause between steps while work remains.
	#[must_use]
	pub fn yield_delay(mut self, delay: Duration) -> Self {
		self.yield_delay = delay;
		self
	}
}

/// Handle for one running drain actor. Dropping it cancels the actor.
pub struct DrainHandle {
	name: String,
	cancel: CancellationToken,
	steps: Arc<AtomicU64>,
	join: Option<JoinHandle<DrainExit>>,
}

impl std::fmt::Debug for DrainHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DrainHandle")
			.field("name", &self.name)
			.field("steps", &self.steps())
			.field("cancelled", &self.cancel.is_cancelled())
			.finish()
	}
}

impl Drop for DrainHandle {
	fn drop(&mut self) {
		self.cancel.cancel();
	}
}

impl DrainHandle {
	/// Actor name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Number of steps that processed an item.
	pub fn steps(&self) -> u64 {
		self.steps.load(Ordering::Acquire)
	}

	/// Requests the actor to stop after its current step.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Returns true when the actor task has exited.
	pub fn is_finished(&self) -> bool {
		self.join.as_ref().is_none_or(JoinHandle::is_finished)
	}

	/// Waits for the actor to exit. Returns `None` if it was already joined or panicked.
	pub async fn join(&mut self) -> Option<DrainExit> {
		let handle = self.join.take()?;
		match handle.await {
			Ok(exit) => Some(exit),
			Err(err) => {
				tracing::warn!(drain = %self.name, error = %err, "drain actor join failed");
				None
			}
		}
	}
}

/// Spawns the single consumer for `mailbox`.
pub fn spawn_drain<T, D>(spec: DrainSpec, mailbox: Mailbox<T>, target: D) -> DrainHandle
where
	T: Send + 'static,
	D: Drain,
{
	let cancel = CancellationToken::new();
	let steps = Arc::new(AtomicU64::new(0));
	let join = spawn(&spec.name, run_drain(spec.clone(), mailbox, target, cancel.clone(), Arc::clone(&steps)));
	tracing::debug!(drain = %spec.name, "drain.spawned");
	DrainHandle {
		name: spec.name,
		cancel,
		steps,
		join: Some(join),
	}
}

async fn run_drain<T, D>(spec: DrainSpec, mailbox: Mailbox<T>, mut target: D, cancel: CancellationToken, steps: Arc<AtomicU64>) -> DrainExit
where
	T: Send + 'static,
	D: Drain,
{
	let exit = loop {
		if cancel.is_cancelled() {
			break DrainExit::Cancelled;
		}

		match target.step() {
			DrainStep::Pending => {
				steps.fetch_add(1, Ordering::AcqRel);
				tokio::select! {
					biased;
					_ = cancel.cancelled() => break DrainExit::Cancelled,
					_ = tokio::time::sleep(spec.yield_delay) => continue,
				}
			}
			DrainStep::Drained => {
				steps.fetch_add(1, Ordering::AcqRel);
			}
			DrainStep::Idle => {
				if mailbox.is_closed() && mailbox.is_empty() {
					break DrainExit::MailboxClosed;
				}
			}
			DrainStep::Detached => break DrainExit::Detached,
		}

		tokio::select! {
			biased;
			_ = cancel.cancelled() => break DrainExit::Cancelled,
			_ = mailbox.wait() => {}
		}
	};
	tracing::debug!(drain = %spec.name, ?exit, steps = steps.load(Ordering::Acquire), "drain.exit");
	exit
}

#[cfg(test)]
mod tests;
