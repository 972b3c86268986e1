use deviot_i18n::Catalog;

use super::*;
use crate::memory::MemoryHost;
use crate::sink::{PANEL_ID, SinkKind};

fn registry() -> PanelRegistry {
	PanelRegistry::new(Arc::new(Catalog::empty()))
}

#[tokio::test]
async fn opening_twice_returns_same_handler_and_view() {
	let mut host = MemoryHost::new();
	let mut registry = registry();

	let first = registry.open_panel(&mut host, PanelRequest::named("Build Output")).unwrap();
	let second = registry.open_panel(&mut host, PanelRequest::named("Build Output")).unwrap();

	assert!(first.ptr_eq(&second));
	assert!(registry.get("Build Output").unwrap().ptr_eq(&first));
	assert_eq!(registry.len(), 1);
	assert_eq!(first.sink_kind(), Some(SinkKind::Panel));
}

#[tokio::test]
async fn open_recovers_view_left_open_by_an_earlier_session() {
	let mut host = MemoryHost::new();
	let existing = host.open_document("Deviot Viewer");
	let mut registry = registry();

	let messages = registry
		.open_panel(&mut host, PanelRequest::named("Deviot Viewer").target(SinkTarget::file_view()))
		.unwrap();

	assert_eq!(messages.sink_kind(), Some(SinkKind::FileView));
	assert_eq!(host.group_count(), 1, "no new pane for a recovered view");
	assert_eq!(existing.snapshot().focus_count, 1);
}

#[tokio::test]
async fn translated_name_is_the_registry_key() {
	let mut catalog = Catalog::empty();
	catalog.insert("monitor_title", "\\nSerial Monitor\\n");
	let mut registry = PanelRegistry::new(Arc::new(catalog));
	let mut host = MemoryHost::new();

	registry.open_panel(&mut host, PanelRequest::named("monitor_title")).unwrap();
	assert_eq!(registry.names(), vec!["Serial Monitor".to_string()]);
}

#[tokio::test]
async fn unnamed_panels_are_not_tracked() {
	let mut host = MemoryHost::new();
	let mut registry = registry();

	let messages = registry.open_panel(&mut host, PanelRequest::default()).unwrap();
	assert!(messages.is_open());
	assert!(registry.is_empty());
}

#[tokio::test]
async fn closing_tracked_view_evicts_and_destroys_empty_pane() {
	let mut host = MemoryHost::new();
	let mut registry = registry();
	let messages = registry
		.open_panel(&mut host, PanelRequest::named("Build").target(SinkTarget::file_view()))
		.unwrap();
	assert_eq!(host.group_count(), 2);

	host.close_view("Build");
	let closed = registry.on_view_closed(&mut host, "Build");

	assert_eq!(closed, ViewClosed::Evicted { pane_destroyed: true });
	assert!(!registry.contains("Build"));
	assert_eq!(host.group_count(), 1);
	assert!(!messages.is_open());
	assert_eq!(messages.sink_kind(), None);
}

#[tokio::test]
async fn prints_after_close_are_dropped_not_buffered() {
	let mut host = MemoryHost::new();
	let mut registry = registry();
	let monitor = registry
		.open_panel(&mut host, PanelRequest::named("Monitor").target(SinkTarget::file_view()))
		.unwrap();
	let view = host.view("Monitor").unwrap();

	host.close_view("Monitor");
	registry.on_view_closed(&mut host, "Monitor");
	for i in 0..1_000 {
		monitor.print(format!("late {i}\n"), &[]);
	}
	assert_eq!(monitor.pending(), 0);

	let reopened = registry
		.open_panel(&mut host, PanelRequest::named("Monitor").target(SinkTarget::file_view()))
		.unwrap();
	assert!(!reopened.ptr_eq(&monitor));
	assert_eq!(reopened.pending(), 0);
	tokio::time::sleep(std::time::Duration::from_millis(20)).await;
	assert_eq!(view.text(), "");
	assert_eq!(host.view("Monitor").unwrap().text(), "");
}

#[tokio::test]
async fn closing_untracked_view_is_a_noop() {
	let mut host = MemoryHost::new();
	let mut registry = registry();
	registry.open_panel(&mut host, PanelRequest::named("Build")).unwrap();

	host.open_document("notes.txt");
	host.close_view("notes.txt");
	assert_eq!(registry.on_view_closed(&mut host, "notes.txt"), ViewClosed::Untracked);
	assert_eq!(registry.len(), 1);
	assert_eq!(host.destroyed_panes(), 0);
}

#[tokio::test]
async fn reopen_after_close_creates_a_fresh_handler() {
	let mut host = MemoryHost::new();
	let mut registry = registry();
	let first = registry.open_panel(&mut host, PanelRequest::named("Build")).unwrap();

	registry.on_view_closed(&mut host, "Build");
	let second = registry.open_panel(&mut host, PanelRequest::named("Build")).unwrap();

	assert!(!first.ptr_eq(&second));
	assert!(second.is_open());
	assert_eq!(host.shown_panel(), Some(PANEL_ID));
}

#[tokio::test]
async fn close_all_detaches_every_panel() {
	let mut host = MemoryHost::new();
	let mut registry = registry();
	let a = registry.open_panel(&mut host, PanelRequest::named("A")).unwrap();
	let b = registry
		.open_panel(&mut host, PanelRequest::named("B").target(SinkTarget::file_view()))
		.unwrap();

	registry.close_all();
	assert!(registry.is_empty());
	assert!(!a.is_open());
	assert!(!b.is_open());
}

#[tokio::test]
async fn initial_text_is_printed_on_open() {
	let mut host = MemoryHost::new();
	let mut registry = registry();
	registry
		.open_panel(&mut host, PanelRequest::named("Build").initial_text("Compiling...\\n"))
		.unwrap();
	let panel = host.panel(PANEL_ID).unwrap();

	tokio::time::timeout(std::time::Duration::from_secs(5), async {
		while panel.snapshot().appends < 1 {
			tokio::time::sleep(std::time::Duration::from_millis(2)).await;
		}
	})
	.await
	.unwrap();
	assert_eq!(panel.text(), "Compiling...\n");
}
