use std::future::Future;
use std::sync::OnceLock;

use tokio::task::JoinHandle;

/// Returns the ambient runtime handle, or a lazily built shared runtime.
///
/// Editor hosts call plugin commands on their own UI thread, which never runs
/// inside a tokio runtime. Drain actors opened from such a thread land on the
/// shared runtime; one worker thread serves every panel since each step is a
/// short synchronous write.
pub(crate) fn runtime_handle() -> tokio::runtime::Handle {
	if let Ok(handle) = tokio::runtime::Handle::try_current() {
		return handle;
	}

	static GLOBAL_RT: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
	let runtime = GLOBAL_RT.get_or_init(|| {
		tokio::runtime::Builder::new_multi_thread()
			.enable_all()
			.worker_threads(1)
			.thread_name("deviot-worker-global")
			.build()
			.expect("failed to build deviot-worker global tokio runtime")
	});
	runtime.handle().clone()
}

/// Spawns an async task, tagging the trace event with `name`.
pub fn spawn<F>(name: &str, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(task = name, "worker.spawn");
	runtime_handle().spawn(fut)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn spawn_outside_runtime_uses_global_runtime() {
		let handle = spawn("outside", async { 7u32 });
		let value = std::thread::spawn(move || {
			tokio::runtime::Builder::new_current_thread()
				.build()
				.unwrap()
				.block_on(handle)
		})
		.join()
		.unwrap()
		.unwrap();
		assert_eq!(value, 7);
	}

	#[tokio::test]
	async fn spawn_inside_runtime_uses_current_handle() {
		let out = spawn("inside", async { "ok" }).await.unwrap();
		assert_eq!(out, "ok");
	}
}
