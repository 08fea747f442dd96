//! In-memory search engine over a Telegram chat export.

mod export;
mod highlight;
mod index;
mod query;
mod threads;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use threadview_types::{Message, MessageId, Thread, ThreadId};
use tokio::sync::RwLock;

use crate::config::ArchiveEngineConfig;
use crate::error::{EngineError, Result};
use crate::lemmatizer::{lemmatizer_for, Lemmatizer};
use crate::traits::{InitialWindow, SearchEngine};

use export::ArchivedMessage;
use highlight::Highlighter;
use index::WordIndex;
use query::Query;

struct ArchivedThread {
    id: ThreadId,
    /// Ascending message positions
    members: Vec<usize>,
}

/// Parsed and indexed export. Immutable once built.
struct Archive {
    messages: Vec<ArchivedMessage>,
    positions: HashMap<MessageId, usize>,
    threads: Vec<ArchivedThread>,
    thread_lookup: HashMap<ThreadId, usize>,
    index: WordIndex,
}

impl Archive {
    fn build(
        raw: &str,
        config: &ArchiveEngineConfig,
        lemmatizer: &dyn Lemmatizer,
    ) -> Result<Self> {
        let messages = export::parse_export(raw)?;
        let positions: HashMap<MessageId, usize> = messages
            .iter()
            .enumerate()
            .map(|(pos, m)| (m.id, pos))
            .collect();

        let groups = threads::group_threads(&messages, &positions);
        let index = WordIndex::build(&messages, &groups, lemmatizer, config.min_word_len);

        let threads: Vec<ArchivedThread> = groups
            .into_iter()
            .map(|members| ArchivedThread {
                id: ThreadId::new(messages[members[0]].id.to_string()),
                members,
            })
            .collect();
        let thread_lookup = threads
            .iter()
            .enumerate()
            .map(|(idx, thread)| (thread.id.clone(), idx))
            .collect();

        Ok(Self {
            messages,
            positions,
            threads,
            thread_lookup,
            index,
        })
    }

    fn eval(&self, query: &Query, lemmatizer: &dyn Lemmatizer, min_word_len: usize) -> Vec<usize> {
        match query {
            Query::All => (0..self.threads.len()).collect(),
            Query::Word(word) => index::normalize_word(word, lemmatizer, min_word_len)
                .map(|lemma| self.index.lookup(&lemma).to_vec())
                .unwrap_or_default(),
            Query::And(left, right) => query::intersect_sorted(
                &self.eval(left, lemmatizer, min_word_len),
                &self.eval(right, lemmatizer, min_word_len),
            ),
            Query::Or(left, right) => query::union_sorted(
                &self.eval(left, lemmatizer, min_word_len),
                &self.eval(right, lemmatizer, min_word_len),
            ),
        }
    }

    fn summarize(&self, thread: &ArchivedThread, title_max_chars: usize) -> Thread {
        let first = &self.messages[thread.members[0]];
        Thread::new(
            thread.id.clone(),
            make_title(&first.text(), title_max_chars),
            first.date_unixtime,
        )
    }

    fn render(&self, pos: usize, highlighter: &Highlighter<'_>) -> Message {
        let message = &self.messages[pos];
        let reply_to_text = message
            .reply_to
            .and_then(|id| self.positions.get(&id))
            .map(|&target| self.messages[target].text());

        Message {
            message_id: message.id,
            text: highlighter.spans(&message.entities),
            reply_to_text,
        }
    }
}

/// First line of `text`, cut to `max_chars` characters
fn make_title(text: &str, max_chars: usize) -> String {
    let line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim();
    if line.chars().count() <= max_chars {
        return line.to_string();
    }
    let mut title: String = line.chars().take(max_chars.saturating_sub(1)).collect();
    title.push('…');
    title
}

/// [`SearchEngine`] backed by an in-memory index of one chat export.
///
/// Loads may overlap; the most recently started one wins, whichever build
/// finishes first.
pub struct ArchiveEngine {
    archive: RwLock<Option<Arc<Archive>>>,
    /// Bumped when a load starts
    generation: AtomicU64,
    config: ArchiveEngineConfig,
    lemmatizer: Arc<dyn Lemmatizer>,
}

impl ArchiveEngine {
    pub fn new(config: ArchiveEngineConfig) -> Self {
        Self {
            archive: RwLock::new(None),
            generation: AtomicU64::new(0),
            lemmatizer: Arc::from(lemmatizer_for(&config.language)),
            config,
        }
    }

    pub fn with_lemmatizer(mut self, lemmatizer: Arc<dyn Lemmatizer>) -> Self {
        self.lemmatizer = lemmatizer;
        self
    }

    pub fn config(&self) -> &ArchiveEngineConfig {
        &self.config
    }

    async fn current(&self) -> Result<Arc<Archive>> {
        self.archive
            .read()
            .await
            .clone()
            .ok_or(EngineError::NoArchive)
    }

    fn highlighter(&self, query: &str) -> Highlighter<'_> {
        Highlighter::new(
            query::query_words(query),
            self.lemmatizer.as_ref(),
            self.config.min_word_len,
        )
    }
}

impl Default for ArchiveEngine {
    fn default() -> Self {
        Self::new(ArchiveEngineConfig::default())
    }
}

#[async_trait]
impl SearchEngine for ArchiveEngine {
    async fn load_archive(&self, raw: &str) -> Result<()> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let raw = raw.to_owned();
        let config = self.config.clone();
        let lemmatizer = Arc::clone(&self.lemmatizer);

        let archive = tokio::task::spawn_blocking(move || {
            Archive::build(&raw, &config, lemmatizer.as_ref())
        })
        .await
        .map_err(|e| EngineError::Internal(format!("archive indexing task failed: {}", e)))??;

        let mut current = self.archive.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "Discarding archive superseded by a later load");
            return Ok(());
        }

        tracing::info!(
            generation,
            messages = archive.messages.len(),
            threads = archive.threads.len(),
            words = archive.index.len(),
            "Archive loaded"
        );
        *current = Some(Arc::new(archive));
        Ok(())
    }

    async fn find_threads(&self, query: &str) -> Result<Vec<Thread>> {
        let archive = self.current().await?;
        let parsed = query::parse(query)?;

        let mut found = archive.eval(&parsed, self.lemmatizer.as_ref(), self.config.min_word_len);
        // Newest first; thread index breaks ties in archive order.
        found.sort_by_key(|&idx| {
            let first = archive.threads[idx].members[0];
            (std::cmp::Reverse(archive.messages[first].date_unixtime), idx)
        });

        tracing::debug!(query, matches = found.len(), "find_threads");

        Ok(found
            .into_iter()
            .map(|idx| archive.summarize(&archive.threads[idx], self.config.title_max_chars))
            .collect())
    }

    async fn load_initial_window(
        &self,
        thread_id: &ThreadId,
        query: &str,
    ) -> Result<InitialWindow> {
        let archive = self.current().await?;
        let thread = archive
            .thread_lookup
            .get(thread_id)
            .map(|&idx| &archive.threads[idx])
            .ok_or_else(|| EngineError::UnknownThread(thread_id.clone()))?;

        let first = thread.members[0];
        let last = thread.members[thread.members.len() - 1];
        let size = self.config.initial_window.max(1);
        let end = last.min(first + size - 1);

        let highlighter = self.highlighter(query);
        let messages = (first..=end)
            .map(|pos| archive.render(pos, &highlighter))
            .collect();

        Ok(InitialWindow::new(
            messages,
            first > 0,
            end + 1 < archive.messages.len(),
        ))
    }

    async fn load_range(&self, lo: MessageId, hi: MessageId, query: &str) -> Result<Vec<Message>> {
        let archive = self.current().await?;
        if lo > hi {
            return Ok(Vec::new());
        }

        let start = archive.messages.partition_point(|m| m.id < lo);
        let end = archive.messages.partition_point(|m| m.id <= hi);

        let highlighter = self.highlighter(query);
        Ok((start..end)
            .map(|pos| archive.render(pos, &highlighter))
            .collect())
    }
}
