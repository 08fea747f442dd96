use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use threadview_browse::{
    BrowseConfig, BrowseEvent, Browser, BrowsingController, Edge, EngineError, InitialWindow,
    Intent, Message, MessageId, SearchEngine, Thread, ThreadId, ViewModel,
};
use threadview_engine::{ArchiveEngine, Result};
use tokio::sync::{mpsc, Notify};

/// Engine answering from fixed data and recording every call it receives
#[derive(Default)]
struct ScriptedEngine {
    threads: Vec<Thread>,
    windows: HashMap<ThreadId, InitialWindow>,
    timeline: Vec<Message>,
    /// When set, `load_range` and loads of a "slow" archive wait for a permit
    gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedEngine {
    fn with_thread(mut self, thread: Thread, window: &[MessageId], before: bool, after: bool) -> Self {
        self.windows.insert(
            thread.thread_id.clone(),
            InitialWindow::new(messages(window), before, after),
        );
        self.threads.push(thread);
        self
    }

    fn with_timeline(mut self, ids: &[MessageId]) -> Self {
        self.timeline = messages(ids);
        self
    }

    fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchEngine for ScriptedEngine {
    async fn load_archive(&self, raw: &str) -> Result<()> {
        self.record("load_archive".into());
        if raw.contains("slow") {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.record("slow_archive_ready".into());
        }
        if raw.starts_with('{') {
            Ok(())
        } else {
            Err(EngineError::MalformedArchive("expected value".into()))
        }
    }

    async fn find_threads(&self, query: &str) -> Result<Vec<Thread>> {
        self.record(format!("find_threads({})", query));
        Ok(self
            .threads
            .iter()
            .filter(|t| t.title_text.to_lowercase().contains(query))
            .cloned()
            .collect())
    }

    async fn load_initial_window(&self, thread_id: &ThreadId, _query: &str) -> Result<InitialWindow> {
        self.record(format!("load_initial_window({})", thread_id));
        self.windows
            .get(thread_id)
            .cloned()
            .ok_or_else(|| EngineError::UnknownThread(thread_id.clone()))
    }

    async fn load_range(&self, lo: MessageId, hi: MessageId, _query: &str) -> Result<Vec<Message>> {
        self.record(format!("load_range({}, {})", lo, hi));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        Ok(self
            .timeline
            .iter()
            .filter(|m| (lo..=hi).contains(&m.message_id))
            .cloned()
            .collect())
    }
}

fn messages(ids: &[MessageId]) -> Vec<Message> {
    ids.iter().map(|&id| Message::new(id, format!("message {}", id))).collect()
}

fn paging_engine() -> ScriptedEngine {
    ScriptedEngine::default()
        .with_thread(Thread::new("t1", "Trip", 1_700_000_000), &[10, 11, 12], true, true)
        .with_timeline(&[7, 9, 10, 11, 12])
}

async fn open_thread(controller: &mut BrowsingController, engine: &ScriptedEngine, id: &str) {
    controller
        .dispatch(engine, Intent::LoadArchive("{}".into()))
        .await
        .unwrap();
    controller
        .dispatch(engine, Intent::SelectThread(id.into()))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_single_thread_listing() {
    let engine = ScriptedEngine::default().with_thread(
        Thread::new("t1", "Trip", 1_700_000_000),
        &[1],
        false,
        false,
    );
    let mut controller = BrowsingController::default();

    controller
        .dispatch(&engine, Intent::LoadArchive("{}".into()))
        .await
        .unwrap();
    controller
        .dispatch(&engine, Intent::Search("trip".into()))
        .await
        .unwrap();

    let view = controller.view();
    let threads = view.threads().unwrap();
    assert_eq!(threads, &[Thread::new("t1", "Trip", 1_700_000_000)]);
    assert_eq!(
        engine.calls(),
        vec!["load_archive", "find_threads()", "find_threads(trip)"]
    );
}

#[tokio::test]
async fn test_load_more_before_then_after() {
    let engine = paging_engine();
    let mut controller = BrowsingController::new(BrowseConfig::default().with_page_size(5));
    open_thread(&mut controller, &engine, "t1").await;

    controller.dispatch(&engine, Intent::LoadMoreBefore).await.unwrap();
    let view = controller.view();
    let thread = view.thread().unwrap();
    assert_eq!(thread.message_ids(), vec![7, 9, 10, 11, 12]);
    assert!(thread.more_before);

    controller.dispatch(&engine, Intent::LoadMoreAfter).await.unwrap();
    let view = controller.view();
    let thread = view.thread().unwrap();
    assert_eq!(thread.message_ids(), vec![7, 9, 10, 11, 12]);
    assert!(!thread.more_after);

    // Exhausted edge: no further engine traffic
    controller.dispatch(&engine, Intent::LoadMoreAfter).await.unwrap();
    controller.dispatch(&engine, Intent::LoadMoreAfter).await.unwrap();

    assert_eq!(
        engine.calls()[3..],
        ["load_range(4, 9)", "load_range(13, 18)"]
    );
}

#[tokio::test]
async fn test_paging_until_both_edges_exhausted() {
    let engine = paging_engine();
    let mut controller = BrowsingController::new(BrowseConfig::default().with_page_size(2));
    open_thread(&mut controller, &engine, "t1").await;

    for _ in 0..10 {
        controller.dispatch(&engine, Intent::LoadMoreBefore).await.unwrap();
        controller.dispatch(&engine, Intent::LoadMoreAfter).await.unwrap();
    }

    let window = controller.window().unwrap();
    assert_eq!(window.message_ids(), vec![7, 9, 10, 11, 12]);
    assert!(!window.more_before());
    assert!(!window.more_after());
}

#[tokio::test]
async fn test_unknown_thread_error_keeps_listing() {
    let engine = paging_engine();
    let mut controller = BrowsingController::default();
    controller
        .dispatch(&engine, Intent::LoadArchive("{}".into()))
        .await
        .unwrap();

    let err = controller
        .dispatch(&engine, Intent::SelectThread("missing".into()))
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::UnknownThread(ThreadId::from("missing")));
    assert_eq!(controller.view().threads().unwrap().len(), 1);
}

#[tokio::test]
async fn test_malformed_archive_leaves_nothing_loaded() {
    let engine = paging_engine();
    let mut controller = BrowsingController::default();

    let err = controller
        .dispatch(&engine, Intent::LoadArchive("garbage".into()))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::MalformedArchive(_)));
    assert_eq!(controller.view(), ViewModel::Empty { loading: false });
}

async fn wait_for<F>(events: &mut mpsc::Receiver<BrowseEvent>, mut accept: F) -> ViewModel
where
    F: FnMut(&ViewModel) -> bool,
{
    loop {
        match events.recv().await.expect("browser stopped") {
            BrowseEvent::View(view) if accept(&view) => return view,
            BrowseEvent::Failed(e) => panic!("engine failed: {}", e),
            _ => {}
        }
    }
}

fn is_open(view: &ViewModel, id: &str) -> bool {
    view.thread().map_or(false, |t| t.thread_id.as_str() == id)
}

#[tokio::test]
async fn test_browser_discards_fetch_for_replaced_thread() {
    let gate = Arc::new(Notify::new());
    let engine = ScriptedEngine::default()
        .with_thread(Thread::new("a", "Alpha", 2), &[10, 11, 12], true, true)
        .with_thread(Thread::new("b", "Beta", 1), &[30, 31], true, true)
        .with_timeline(&[5, 6, 7, 10, 11, 12, 30, 31])
        .with_gate(Arc::clone(&gate));
    let (handle, mut events) = Browser::new(Arc::new(engine)).spawn();

    handle.load_archive("{}").await.unwrap();
    wait_for(&mut events, |v| v.threads().map_or(false, |t| t.len() == 2)).await;

    handle.select_thread("a").await.unwrap();
    wait_for(&mut events, |v| is_open(v, "a")).await;

    handle.load_more(Edge::Before).await.unwrap();
    wait_for(&mut events, |v| v.thread().map_or(false, |t| t.loading_before)).await;

    handle.select_thread("b").await.unwrap();
    let opened = wait_for(&mut events, |v| is_open(v, "b")).await;
    assert_eq!(opened.thread().unwrap().message_ids(), vec![30, 31]);

    // Release the stale fetch for "a"
    gate.notify_one();
    let after = wait_for(&mut events, |_| true).await;
    let thread = after.thread().unwrap();
    assert_eq!(thread.thread_id.as_str(), "b");
    assert_eq!(thread.message_ids(), vec![30, 31]);
    assert!(!thread.loading_before);
}

#[tokio::test]
async fn test_browser_reports_failures_and_exhausted_edges() {
    let engine = paging_engine();
    let (handle, mut events) = Browser::new(Arc::new(engine)).spawn();

    handle.load_archive("{}").await.unwrap();
    wait_for(&mut events, |v| v.threads().is_some()).await;

    handle.select_thread("nope").await.unwrap();
    loop {
        if let BrowseEvent::Failed(e) = events.recv().await.unwrap() {
            assert_eq!(e, EngineError::UnknownThread(ThreadId::from("nope")));
            break;
        }
    }

    handle.select_thread("t1").await.unwrap();
    wait_for(&mut events, |v| is_open(v, "t1")).await;

    handle.load_more(Edge::After).await.unwrap();
    wait_for(&mut events, |v| v.thread().map_or(false, |t| !t.more_after)).await;

    handle.load_more(Edge::After).await.unwrap();
    assert_eq!(
        events.recv().await,
        Some(BrowseEvent::NothingToFetch(Edge::After))
    );
}

fn export_with(count: u64) -> String {
    let messages: Vec<String> = (1..=count)
        .map(|id| format!(r#"{{"id": {}, "date_unixtime": {}, "text": "message {}"}}"#, id, id, id))
        .collect();
    format!(r#"{{"messages": [{}]}}"#, messages.join(","))
}

#[tokio::test]
async fn test_back_to_back_archive_loads_serve_the_latest() {
    let engine = Arc::new(ArchiveEngine::default());
    let (handle, mut events) = Browser::new(engine.clone()).spawn();

    handle.load_archive(export_with(20_000)).await.unwrap();
    handle.load_archive(export_with(1)).await.unwrap();

    // One view per intent (2) and per engine outcome: both loads plus the
    // listing search that follows the accepted one.
    let mut last = None;
    for _ in 0..5 {
        match events.recv().await.expect("browser stopped") {
            BrowseEvent::View(view) => last = Some(view),
            other => panic!("unexpected event {:?}", other),
        }
    }

    let view = last.unwrap();
    assert_eq!(view.threads().map(|t| t.len()), Some(1));
    assert_eq!(engine.find_threads("").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_empty_initial_window_offers_no_paging() {
    let engine = ScriptedEngine::default().with_thread(Thread::new("t1", "Trip", 1), &[], true, true);
    let mut controller = BrowsingController::default();
    open_thread(&mut controller, &engine, "t1").await;

    let view = controller.view();
    let thread = view.thread().unwrap();
    assert!(thread.messages.is_empty());
    assert!(!thread.more_before && !thread.more_after);

    controller.dispatch(&engine, Intent::LoadMoreBefore).await.unwrap();
    assert_eq!(engine.calls().len(), 3);
}

#[tokio::test]
async fn test_archive_loads_run_in_request_order() {
    let gate = Arc::new(Notify::new());
    let engine = Arc::new(paging_engine().with_gate(Arc::clone(&gate)));
    let (handle, mut events) = Browser::new(engine.clone()).spawn();

    handle.load_archive(r#"{"slow": true}"#).await.unwrap();
    handle.load_archive("{}").await.unwrap();
    wait_for(&mut events, |_| true).await;
    wait_for(&mut events, |_| true).await;
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    // The second load is queued behind the first
    assert_eq!(engine.calls(), vec!["load_archive"]);

    gate.notify_one();
    wait_for(&mut events, |v| v.threads().map_or(false, |t| t.len() == 1)).await;
    assert_eq!(
        engine.calls(),
        vec!["load_archive", "slow_archive_ready", "load_archive", "find_threads()"]
    );
}
