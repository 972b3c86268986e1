use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;

/// Result of popping one message from a [`Mailbox`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popped<T> {
	/// The message at the head of the queue.
	pub item: T,
	/// Messages still queued after this pop.
	pub remaining: usize,
}

struct MailboxState<T> {
	queue: VecDeque<T>,
	closed: bool,
}

struct MailboxInner<T> {
	state: Mutex<MailboxState<T>>,
	notify: Notify,
}

/// FIFO mailbox with synchronous producers and a single async consumer.
///
/// Producers push from any thread without awaiting. Every push signals the
/// consumer through a permit-storing [`Notify`], so a wake issued while the
/// consumer is busy is observed on its next wait. The queue lock is never held
/// across an await point or while the consumer processes an item.
pub struct Mailbox<T> {
	inner: Arc<MailboxInner<T>>,
}

impl<T> Clone for Mailbox<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<T> Default for Mailbox<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> Mailbox<T> {
	/// Creates an empty, open mailbox.
	pub fn new() -> Self {
		Self::with_capacity(0)
	}

	/// Creates an empty mailbox with preallocated queue storage.
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			inner: Arc::new(MailboxInner {
				state: Mutex::new(MailboxState {
					queue: VecDeque::with_capacity(capacity),
					closed: false,
				}),
				notify: Notify::new(),
			}),
		}
	}

	/// Appends one message and wakes the consumer.
	///
	/// Returns `false` if the mailbox was closed; the message is dropped.
	pub fn push(&self, msg: T) -> bool {
		let mut state = self.inner.state.lock();
		if state.closed {
			return false;
		}
		state.queue.push_back(msg);
		drop(state);
		self.inner.notify.notify_one();
		true
	}

	/// Pops the head message, reporting how many remain behind it.
	pub fn pop(&self) -> Option<Popped<T>> {
		let mut state = self.inner.state.lock();
		let item = state.queue.pop_front()?;
		Some(Popped {
			item,
			remaining: state.queue.len(),
		})
	}

	/// Resolves once a push or close has happened since the last wait.
	pub async fn wait(&self) {
		self.inner.notify.notified().await;
	}

	/// Rejects further pushes. Already queued messages stay poppable.
	pub fn close(&self) {
		self.inner.state.lock().closed = true;
		self.inner.notify.notify_one();
	}

	/// Accepts pushes again after [`Self::close`].
	pub fn reopen(&self) {
		self.inner.state.lock().closed = false;
	}

	/// Discards every queued message, returning how many were dropped.
	pub fn clear(&self) -> usize {
		let mut state = self.inner.state.lock();
		let dropped = state.queue.len();
		state.queue.clear();
		dropped
	}

	/// Returns true once [`Self::close`] was called.
	pub fn is_closed(&self) -> bool {
		self.inner.state.lock().closed
	}

	/// Returns current queue length.
	pub fn len(&self) -> usize {
		self.inner.state.lock().queue.len()
	}

	/// Returns true when nothing is queued.
	pub fn is_empty(&self) -> bool {
		self.inner.state.lock().queue.is_empty()
	}

	/// Returns true when both handles share one queue.
	pub fn same_queue(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use super::*;

	#[test]
	fn pop_is_fifo_and_reports_remaining() {
		let mailbox = Mailbox::new();
		assert!(mailbox.push(1u32));
		assert!(mailbox.push(2));
		assert!(mailbox.push(3));

		assert_eq!(mailbox.pop(), Some(Popped { item: 1, remaining: 2 }));
		assert_eq!(mailbox.pop(), Some(Popped { item: 2, remaining: 1 }));
		assert_eq!(mailbox.pop(), Some(Popped { item: 3, remaining: 0 }));
		assert_eq!(mailbox.pop(), None);
	}

	#[test]
	fn closed_mailbox_rejects_push_but_keeps_backlog() {
		let mailbox = Mailbox::new();
		mailbox.push("a");
		mailbox.close();

		assert!(mailbox.is_closed());
		assert!(!mailbox.push("b"));
		assert_eq!(mailbox.len(), 1);
		assert_eq!(mailbox.pop().map(|p| p.item), Some("a"));
	}

	#[test]
	fn clear_then_reopen_starts_empty() {
		let mailbox = Mailbox::new();
		mailbox.push(1u8);
		mailbox.push(2);
		mailbox.close();

		assert_eq!(mailbox.clear(), 2);
		assert!(mailbox.is_empty());
		assert!(!mailbox.push(3));

		mailbox.reopen();
		assert!(!mailbox.is_closed());
		assert!(mailbox.push(4));
		assert_eq!(mailbox.pop(), Some(Popped { item: 4, remaining: 0 }));
	}

	#[test]
	fn clones_share_one_queue() {
		let a = Mailbox::<u8>::new();
		let b = a.clone();
		b.push(9);
		assert!(a.same_queue(&b));
		assert!(!a.same_queue(&Mailbox::new()));
		assert_eq!(a.len(), 1);
	}

	#[tokio::test]
	async fn push_before_wait_is_not_lost() {
		let mailbox = Mailbox::new();
		mailbox.push(1u8);

		tokio::time::timeout(Duration::from_millis(100), mailbox.wait())
			.await
			.expect("stored permit should resolve wait immediately");
	}

	#[tokio::test]
	async fn push_from_thread_wakes_waiter() {
		let mailbox = Mailbox::new();
		let producer = mailbox.clone();

		let waiter = tokio::spawn({
			let mailbox = mailbox.clone();
			async move {
				mailbox.wait().await;
				mailbox.pop().map(|p| p.item)
			}
		});

		std::thread::spawn(move || {
			std::thread::sleep(Duration::from_millis(10));
			producer.push(42u32);
		})
		.join()
		.unwrap();

		let got = tokio::time::timeout(Duration::from_secs(1), waiter).await.unwrap().unwrap();
		assert_eq!(got, Some(42));
	}
}
