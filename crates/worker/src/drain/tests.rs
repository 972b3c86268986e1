use std::sync::atomic::{AtomicBool, AtomicUsize};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::*;

fn collecting_target(mailbox: Mailbox<u32>, out: Arc<Mutex<Vec<u32>>>) -> impl FnMut() -> DrainStep + Send + 'static {
	move || match mailbox.pop() {
		None => DrainStep::Idle,
		Some(popped) => {
			out.lock().unwrap().push(popped.item);
			if popped.remaining > 0 { DrainStep::Pending } else { DrainStep::Drained }
		}
	}
}

async fn wait_until(mut cond: impl FnMut() -> bool) {
	tokio::time::timeout(Duration::from_secs(5), async {
		while !cond() {
			tokio::time::sleep(Duration::from_millis(2)).await;
		}
	})
	.await
	.expect("condition not reached in time");
}

#[tokio::test]
async fn drains_in_push_order() {
	let mailbox = Mailbox::new();
	let out = Arc::new(Mutex::new(Vec::new()));
	let handle = spawn_drain(DrainSpec::new("order"), mailbox.clone(), collecting_target(mailbox.clone(), Arc::clone(&out)));

	for i in 0..50 {
		mailbox.push(i);
	}

	wait_until(|| out.lock().unwrap().len() == 50).await;
	assert_eq!(*out.lock().unwrap(), (0..50).collect::<Vec<_>>());
	assert_eq!(handle.steps(), 50);
}

#[tokio::test]
async fn backlog_pushed_before_spawn_is_flushed() {
	let mailbox = Mailbox::new();
	mailbox.push(1);
	mailbox.push(2);

	let out = Arc::new(Mutex::new(Vec::new()));
	let _handle = spawn_drain(DrainSpec::new("backlog"), mailbox.clone(), collecting_target(mailbox.clone(), Arc::clone(&out)));

	wait_until(|| out.lock().unwrap().len() == 2).await;
	assert_eq!(*out.lock().unwrap(), vec![1, 2]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn steps_never_overlap_under_concurrent_producers() {
	let mailbox = Mailbox::new();
	let in_step = Arc::new(AtomicBool::new(false));
	let overlaps = Arc::new(AtomicUsize::new(0));
	let seen = Arc::new(AtomicUsize::new(0));

	let target = {
		let mailbox = mailbox.clone();
		let in_step = Arc::clone(&in_step);
		let overlaps = Arc::clone(&overlaps);
		let seen = Arc::clone(&seen);
		move || {
			if in_step.swap(true, Ordering::AcqRel) {
				overlaps.fetch_add(1, Ordering::AcqRel);
			}
			let step = match mailbox.pop() {
				None => DrainStep::Idle,
				Some(popped) => {
					seen.fetch_add(1, Ordering::AcqRel);
					if popped.remaining > 0 { DrainStep::Pending } else { DrainStep::Drained }
				}
			};
			in_step.store(false, Ordering::Release);
			step
		}
	};
	let _handle = spawn_drain(DrainSpec::new("overlap").yield_delay(Duration::ZERO), mailbox.clone(), target);

	let producers: Vec<_> = (0..8)
		.map(|t| {
			let mailbox = mailbox.clone();
			std::thread::spawn(move || {
				for i in 0..25u32 {
					mailbox.push(t * 100 + i);
				}
			})
		})
		.collect();
	for producer in producers {
		producer.join().unwrap();
	}

	wait_until(|| seen.load(Ordering::Acquire) == 200).await;
	assert_eq!(overlaps.load(Ordering::Acquire), 0);
}

#[tokio::test]
async fn cancel_stops_actor() {
	let mailbox = Mailbox::<u32>::new();
	let out = Arc::new(Mutex::new(Vec::new()));
	let mut handle = spawn_drain(DrainSpec::new("cancel"), mailbox.clone(), collecting_target(mailbox.clone(), out));

	handle.cancel();
	assert_eq!(handle.join().await, Some(DrainExit::Cancelled));
	assert!(handle.is_finished());
	assert_eq!(handle.join().await, None);
}

#[tokio::test]
async fn closed_and_empty_mailbox_ends_actor() {
	let mailbox = Mailbox::<u32>::new();
	let out = Arc::new(Mutex::new(Vec::new()));
	let mut handle = spawn_drain(DrainSpec::new("close"), mailbox.clone(), collecting_target(mailbox.clone(), Arc::clone(&out)));

	mailbox.push(5);
	mailbox.close();

	let exit = tokio::time::timeout(Duration::from_secs(5), handle.join()).await.unwrap();
	assert_eq!(exit, Some(DrainExit::MailboxClosed));
	assert_eq!(*out.lock().unwrap(), vec![5]);
}

#[tokio::test]
async fn detached_target_ends_actor() {
	let mailbox = Mailbox::<u32>::new();
	let mut handle = spawn_drain(DrainSpec::new("detached"), mailbox.clone(), || DrainStep::Detached);

	let exit = tokio::time::timeout(Duration::from_secs(5), handle.join()).await.unwrap();
	assert_eq!(exit, Some(DrainExit::Detached));
}
