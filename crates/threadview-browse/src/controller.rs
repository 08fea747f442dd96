use threadview_engine::{EngineError, SearchEngine};
use threadview_types::{
    Edge, Intent, MessageId, Thread, ThreadId, ThreadListView, ThreadView, ViewModel,
};

use crate::call::{
    CallKind, EngineCall, EngineOutcome, EngineReply, EngineRequest, SessionToken, Ticket,
};
use crate::config::BrowseConfig;
use crate::window::WindowStore;

/// Search results currently shown, with the query as the user typed it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub query: String,
    pub threads: Vec<Thread>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct InFlight {
    before: bool,
    after: bool,
}

impl InFlight {
    fn get(&self, edge: Edge) -> bool {
        match edge {
            Edge::Before => self.before,
            Edge::After => self.after,
        }
    }

    fn set(&mut self, edge: Edge, value: bool) {
        match edge {
            Edge::Before => self.before = value,
            Edge::After => self.after = value,
        }
    }
}

/// One thread-open episode
#[derive(Debug, Clone)]
pub struct ThreadSession {
    token: SessionToken,
    thread_id: ThreadId,
    title: Option<String>,
    /// Case-folded search query, forwarded to the engine for highlighting
    query: String,
    window: WindowStore,
    in_flight: InFlight,
    /// Listing the thread was opened from; restored by `CloseThread`
    listing: Listing,
}

impl ThreadSession {
    pub fn token(&self) -> SessionToken {
        self.token
    }

    pub fn thread_id(&self) -> &ThreadId {
        &self.thread_id
    }

    pub fn window(&self) -> &WindowStore {
        &self.window
    }

    pub fn is_in_flight(&self, edge: Edge) -> bool {
        self.in_flight.get(edge)
    }
}

#[derive(Debug, Clone)]
pub enum BrowseState {
    NoArchive,
    ArchiveLoaded(Listing),
    ThreadOpen(ThreadSession),
}

/// Id range to request when extending the window past `anchor` (the first
/// visible id for `Before`, the last for `After`). `None` when no id can lie
/// beyond the anchor.
pub fn fetch_range(
    edge: Edge,
    anchor: MessageId,
    page_size: MessageId,
) -> Option<(MessageId, MessageId)> {
    match edge {
        Edge::Before => {
            let hi = anchor.checked_sub(1)?;
            Some((hi.saturating_sub(page_size), hi))
        }
        Edge::After => {
            let lo = anchor.checked_add(1)?;
            Some((lo, lo.saturating_add(page_size)))
        }
    }
}

fn reply_name(reply: &EngineReply) -> &'static str {
    match reply {
        EngineReply::ArchiveLoaded => "archive_loaded",
        EngineReply::Threads(_) => "threads",
        EngineReply::InitialWindow(_) => "initial_window",
        EngineReply::Range(_) => "range",
    }
}

fn unexpected(reply: EngineReply) -> EngineError {
    EngineError::Internal(format!("unexpected engine reply: {}", reply_name(&reply)))
}

/// State machine turning intents into engine calls and engine results into
/// view models.
///
/// The controller never awaits. [`handle`](Self::handle) returns the engine
/// call an intent requires; whoever runs it feeds the outcome back through
/// [`complete`](Self::complete), in any order and at any later time. Results
/// whose ticket no longer matches the current archive, navigation or thread
/// session are dropped there.
pub struct BrowsingController {
    config: BrowseConfig,
    state: BrowseState,
    last_token: u64,
    archive: SessionToken,
    archive_pending: bool,
    /// Latest search or thread selection still waiting for the engine
    navigation: Option<SessionToken>,
}

impl BrowsingController {
    pub fn new(config: BrowseConfig) -> Self {
        Self {
            config,
            state: BrowseState::NoArchive,
            last_token: 0,
            archive: SessionToken::new(0),
            archive_pending: false,
            navigation: None,
        }
    }

    pub fn config(&self) -> &BrowseConfig {
        &self.config
    }

    pub fn state(&self) -> &BrowseState {
        &self.state
    }

    pub fn session(&self) -> Option<&ThreadSession> {
        match &self.state {
            BrowseState::ThreadOpen(session) => Some(session),
            _ => None,
        }
    }

    pub fn window(&self) -> Option<&WindowStore> {
        self.session().map(ThreadSession::window)
    }

    pub fn has_archive(&self) -> bool {
        !matches!(self.state, BrowseState::NoArchive)
    }

    fn issue(&mut self) -> SessionToken {
        self.last_token += 1;
        SessionToken::new(self.last_token)
    }

    fn ticket(&self, token: SessionToken, kind: CallKind) -> Ticket {
        Ticket {
            archive: self.archive,
            token,
            kind,
        }
    }

    /// Apply an intent. Returns the engine call to run, or `None` when the
    /// intent needs no engine work (including paging with nothing to fetch).
    pub fn handle(&mut self, intent: Intent) -> Option<EngineCall> {
        tracing::debug!(?intent, "Handling intent");
        match intent {
            Intent::LoadArchive(raw) => Some(self.begin_load_archive(raw)),
            Intent::Search(query) => self.begin_search(query),
            Intent::SelectThread(thread_id) => self.begin_select(thread_id),
            Intent::LoadMoreBefore => self.begin_fetch(Edge::Before),
            Intent::LoadMoreAfter => self.begin_fetch(Edge::After),
            Intent::CloseThread => {
                self.close_thread();
                None
            }
        }
    }

    fn begin_load_archive(&mut self, raw: String) -> EngineCall {
        let token = self.issue();
        self.archive = token;
        self.archive_pending = true;
        self.navigation = None;
        self.state = BrowseState::NoArchive;

        EngineCall::new(
            self.ticket(token, CallKind::LoadArchive),
            EngineRequest::LoadArchive { raw },
        )
    }

    fn begin_search(&mut self, query: String) -> Option<EngineCall> {
        if !self.has_archive() {
            tracing::debug!("Search ignored: no archive loaded");
            return None;
        }

        let token = self.issue();
        self.navigation = Some(token);
        let folded = query.to_lowercase();

        Some(EngineCall::new(
            self.ticket(token, CallKind::Search { query }),
            EngineRequest::FindThreads { query: folded },
        ))
    }

    fn begin_select(&mut self, thread_id: ThreadId) -> Option<EngineCall> {
        let query = match &self.state {
            BrowseState::NoArchive => {
                tracing::debug!(%thread_id, "Thread selection ignored: no archive loaded");
                return None;
            }
            BrowseState::ArchiveLoaded(listing) => listing.query.to_lowercase(),
            BrowseState::ThreadOpen(session) => session.query.clone(),
        };

        let token = self.issue();
        self.navigation = Some(token);

        Some(EngineCall::new(
            self.ticket(
                token,
                CallKind::SelectThread {
                    thread_id: thread_id.clone(),
                },
            ),
            EngineRequest::LoadInitialWindow { thread_id, query },
        ))
    }

    fn begin_fetch(&mut self, edge: Edge) -> Option<EngineCall> {
        // The window is about to be replaced.
        if self.navigation.is_some() {
            return None;
        }

        let archive = self.archive;
        let page_size = self.config.page_size;
        let BrowseState::ThreadOpen(session) = &mut self.state else {
            return None;
        };
        if !session.window.has_more(edge) || session.in_flight.get(edge) {
            return None;
        }

        let anchor = match edge {
            Edge::Before => session.window.first_id(),
            Edge::After => session.window.last_id(),
        };
        let Some((lo, hi)) = anchor.and_then(|anchor| fetch_range(edge, anchor, page_size)) else {
            session.window.mark_exhausted(edge);
            return None;
        };

        session.in_flight.set(edge, true);
        tracing::debug!(?edge, lo, hi, session = %session.token, "Requesting range");

        Some(EngineCall::new(
            Ticket {
                archive,
                token: session.token,
                kind: CallKind::Fetch(edge),
            },
            EngineRequest::LoadRange {
                lo,
                hi,
                query: session.query.clone(),
            },
        ))
    }

    fn close_thread(&mut self) {
        if !matches!(self.state, BrowseState::ThreadOpen(_)) {
            return;
        }
        self.navigation = None;
        if let BrowseState::ThreadOpen(session) =
            std::mem::replace(&mut self.state, BrowseState::NoArchive)
        {
            self.state = BrowseState::ArchiveLoaded(session.listing);
        }
    }

    /// Apply the result of an engine call issued by [`handle`](Self::handle)
    /// (or chained from an earlier `complete`).
    ///
    /// Stale results are dropped silently. Failures are returned and leave
    /// the state as it was. May return a follow-up call to run.
    pub fn complete(&mut self, outcome: EngineOutcome) -> Result<Option<EngineCall>, EngineError> {
        let EngineOutcome { ticket, result } = outcome;
        if ticket.archive != self.archive {
            tracing::debug!(kind = ?ticket.kind, "Dropping result from a superseded archive");
            return Ok(None);
        }

        let completed = match ticket.kind {
            CallKind::LoadArchive => self.finish_load_archive(result),
            CallKind::Search { query } => self.finish_search(ticket.token, query, result),
            CallKind::SelectThread { thread_id } => {
                self.finish_select(ticket.token, thread_id, result)
            }
            CallKind::Fetch(edge) => self.finish_fetch(ticket.token, edge, result),
        };

        if let Err(ref e) = completed {
            tracing::warn!(error = %e, "Engine call failed");
        }
        completed
    }

    fn finish_load_archive(
        &mut self,
        result: Result<EngineReply, EngineError>,
    ) -> Result<Option<EngineCall>, EngineError> {
        if !self.archive_pending {
            return Ok(None);
        }
        self.archive_pending = false;

        match result? {
            EngineReply::ArchiveLoaded => {
                tracing::info!(archive = %self.archive, "Archive ready");
                self.state = BrowseState::ArchiveLoaded(Listing::default());
                Ok(self.begin_search(String::new()))
            }
            other => Err(unexpected(other)),
        }
    }

    fn take_navigation(&mut self, token: SessionToken) -> bool {
        if self.navigation == Some(token) {
            self.navigation = None;
            true
        } else {
            tracing::debug!(%token, "Dropping superseded navigation result");
            false
        }
    }

    fn finish_search(
        &mut self,
        token: SessionToken,
        query: String,
        result: Result<EngineReply, EngineError>,
    ) -> Result<Option<EngineCall>, EngineError> {
        if !self.take_navigation(token) {
            return Ok(None);
        }

        match result? {
            EngineReply::Threads(threads) => {
                tracing::debug!(query = %query, threads = threads.len(), "Search finished");
                self.state = BrowseState::ArchiveLoaded(Listing { query, threads });
                Ok(None)
            }
            other => Err(unexpected(other)),
        }
    }

    fn finish_select(
        &mut self,
        token: SessionToken,
        thread_id: ThreadId,
        result: Result<EngineReply, EngineError>,
    ) -> Result<Option<EngineCall>, EngineError> {
        if !self.take_navigation(token) {
            return Ok(None);
        }

        let initial = match result? {
            EngineReply::InitialWindow(initial) => initial,
            other => return Err(unexpected(other)),
        };

        let (listing, query) = match std::mem::replace(&mut self.state, BrowseState::NoArchive) {
            BrowseState::ArchiveLoaded(listing) => {
                let query = listing.query.to_lowercase();
                (listing, query)
            }
            BrowseState::ThreadOpen(session) => (session.listing, session.query),
            BrowseState::NoArchive => (Listing::default(), String::new()),
        };
        let title = listing
            .threads
            .iter()
            .find(|t| t.thread_id == thread_id)
            .map(|t| t.title_text.clone());

        tracing::debug!(
            %thread_id,
            session = %token,
            messages = initial.messages.len(),
            "Thread opened"
        );
        self.state = BrowseState::ThreadOpen(ThreadSession {
            token,
            thread_id,
            title,
            query,
            window: WindowStore::new(initial.messages, initial.more_before, initial.more_after),
            in_flight: InFlight::default(),
            listing,
        });
        Ok(None)
    }

    fn finish_fetch(
        &mut self,
        token: SessionToken,
        edge: Edge,
        result: Result<EngineReply, EngineError>,
    ) -> Result<Option<EngineCall>, EngineError> {
        let navigation_pending = self.navigation.is_some();
        let BrowseState::ThreadOpen(session) = &mut self.state else {
            tracing::debug!(%token, "Dropping fetch: no thread open");
            return Ok(None);
        };
        if session.token != token {
            tracing::debug!(%token, current = %session.token, "Dropping fetch for a superseded session");
            return Ok(None);
        }

        session.in_flight.set(edge, false);
        if navigation_pending {
            tracing::debug!(%token, "Dropping fetch: thread is being replaced");
            return Ok(None);
        }

        match result? {
            EngineReply::Range(messages) => {
                let fetched = messages.len();
                let added = session.window.merge(edge, messages);
                tracing::debug!(
                    ?edge,
                    fetched,
                    added,
                    more = session.window.has_more(edge),
                    "Range merged"
                );
                Ok(None)
            }
            other => Err(unexpected(other)),
        }
    }

    /// Render-ready snapshot of the current state
    pub fn view(&self) -> ViewModel {
        match &self.state {
            BrowseState::NoArchive => ViewModel::Empty {
                loading: self.archive_pending,
            },
            BrowseState::ArchiveLoaded(listing) => ViewModel::Threads(ThreadListView {
                query: listing.query.clone(),
                threads: listing.threads.clone(),
                loading: self.navigation.is_some(),
            }),
            BrowseState::ThreadOpen(session) => ViewModel::Thread(ThreadView {
                thread_id: session.thread_id.clone(),
                title: session.title.clone(),
                messages: session.window.messages().to_vec(),
                more_before: session.window.more_before(),
                more_after: session.window.more_after(),
                loading_before: session.in_flight.before,
                loading_after: session.in_flight.after,
            }),
        }
    }

    /// Handle `intent` and run every resulting engine call to completion,
    /// one after another.
    pub async fn dispatch(
        &mut self,
        engine: &dyn SearchEngine,
        intent: Intent,
    ) -> Result<(), EngineError> {
        let mut next = self.handle(intent);
        while let Some(call) = next {
            let outcome = call.execute(engine).await;
            next = self.complete(outcome)?;
        }
        Ok(())
    }
}

impl Default for BrowsingController {
    fn default() -> Self {
        Self::new(BrowseConfig::default())
    }
}
