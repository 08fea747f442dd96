use std::sync::Arc;

use thiserror::Error;
use threadview_engine::{EngineError, SearchEngine};
use threadview_types::{Edge, Intent, ThreadId, ViewModel};
use tokio::sync::{mpsc, oneshot};

use crate::call::{EngineCall, EngineOutcome, EngineRequest};
use crate::config::BrowseConfig;
use crate::controller::BrowsingController;

/// Emitted by a running [`Browser`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseEvent {
    /// State changed (or may have); re-render
    View(ViewModel),
    /// A paging intent found nothing to request at this edge
    NothingToFetch(Edge),
    /// An engine call failed; the view is unchanged
    Failed(EngineError),
}

#[derive(Debug, Error)]
#[error("Browser task has stopped")]
pub struct BrowserClosed;

/// Sends intents to a spawned [`Browser`]
#[derive(Clone)]
pub struct BrowserHandle {
    intents: mpsc::Sender<Intent>,
}

impl BrowserHandle {
    pub async fn send(&self, intent: Intent) -> Result<(), BrowserClosed> {
        self.intents.send(intent).await.map_err(|_| BrowserClosed)
    }

    pub async fn load_archive(&self, raw: impl Into<String>) -> Result<(), BrowserClosed> {
        self.send(Intent::LoadArchive(raw.into())).await
    }

    pub async fn search(&self, query: impl Into<String>) -> Result<(), BrowserClosed> {
        self.send(Intent::Search(query.into())).await
    }

    pub async fn select_thread(&self, thread_id: impl Into<ThreadId>) -> Result<(), BrowserClosed> {
        self.send(Intent::SelectThread(thread_id.into())).await
    }

    pub async fn load_more(&self, edge: Edge) -> Result<(), BrowserClosed> {
        self.send(Intent::load_more(edge)).await
    }

    pub async fn close_thread(&self) -> Result<(), BrowserClosed> {
        self.send(Intent::CloseThread).await
    }
}

/// Drives a [`BrowsingController`] against a shared engine on a background task.
///
/// Intents are applied in arrival order. Every engine call runs on its own
/// task, so a slow search never blocks paging; the controller discards
/// whatever the user has since navigated away from. Archive loads are the
/// exception: each waits for the previous one, so the engine is left holding
/// the archive the controller accepted.
pub struct Browser {
    engine: Arc<dyn SearchEngine>,
    config: BrowseConfig,
}

impl Browser {
    pub fn new(engine: Arc<dyn SearchEngine>) -> Self {
        Self {
            engine,
            config: BrowseConfig::default(),
        }
    }

    pub fn with_config(mut self, config: BrowseConfig) -> Self {
        self.config = config;
        self
    }

    /// Spawn the event loop, return the intent handle and event receiver.
    /// The loop ends once every handle is dropped or the receiver is closed.
    pub fn spawn(self) -> (BrowserHandle, mpsc::Receiver<BrowseEvent>) {
        let buffer = self.config.event_buffer.max(1);
        let (intent_tx, intent_rx) = mpsc::channel(buffer);
        let (event_tx, event_rx) = mpsc::channel(buffer);

        tokio::spawn(run_loop(self.engine, self.config, intent_rx, event_tx));

        (BrowserHandle { intents: intent_tx }, event_rx)
    }
}

/// Chains archive loads in the order they were issued
#[derive(Default)]
struct LoadQueue {
    tail: Option<oneshot::Receiver<()>>,
}

impl LoadQueue {
    /// The load to wait for, and a sender that is dropped when this one ends
    fn enqueue(&mut self) -> (Option<oneshot::Receiver<()>>, oneshot::Sender<()>) {
        let (finished, tail) = oneshot::channel();
        (self.tail.replace(tail), finished)
    }
}

fn spawn_call(
    engine: &Arc<dyn SearchEngine>,
    call: EngineCall,
    done: &mpsc::UnboundedSender<EngineOutcome>,
    loads: &mut LoadQueue,
) {
    let engine = Arc::clone(engine);
    let done = done.clone();
    let turn = matches!(call.request, EngineRequest::LoadArchive { .. }).then(|| loads.enqueue());
    tokio::spawn(async move {
        let finished = match turn {
            Some((previous, finished)) => {
                if let Some(previous) = previous {
                    // Resolves once the previous load's sender is dropped
                    let _ = previous.await;
                }
                Some(finished)
            }
            None => None,
        };
        let outcome = call.execute(engine.as_ref()).await;
        drop(finished);
        // Loop already gone; nobody wants the result.
        let _ = done.send(outcome);
    });
}

async fn run_loop(
    engine: Arc<dyn SearchEngine>,
    config: BrowseConfig,
    mut intents: mpsc::Receiver<Intent>,
    events: mpsc::Sender<BrowseEvent>,
) {
    let mut controller = BrowsingController::new(config);
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<EngineOutcome>();
    let mut loads = LoadQueue::default();

    tracing::debug!("Browser started");

    loop {
        let mut emitted = Vec::new();

        tokio::select! {
            intent = intents.recv() => {
                let Some(intent) = intent else {
                    break;
                };
                let edge = intent.edge();
                match controller.handle(intent) {
                    Some(call) => spawn_call(&engine, call, &done_tx, &mut loads),
                    None => {
                        if let Some(edge) = edge {
                            emitted.push(BrowseEvent::NothingToFetch(edge));
                        }
                    }
                }
            }
            Some(outcome) = done_rx.recv() => {
                match controller.complete(outcome) {
                    Ok(Some(call)) => spawn_call(&engine, call, &done_tx, &mut loads),
                    Ok(None) => {}
                    Err(e) => emitted.push(BrowseEvent::Failed(e)),
                }
            }
        }

        emitted.push(BrowseEvent::View(controller.view()));
        for event in emitted {
            if events.send(event).await.is_err() {
                tracing::debug!("Event receiver dropped, stopping browser");
                return;
            }
        }
    }

    tracing::debug!("Browser stopped");
}
