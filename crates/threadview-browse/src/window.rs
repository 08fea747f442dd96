use threadview_types::{Edge, Message, MessageId};

/// Materialized slice of a thread's timeline plus its boundary flags.
///
/// Messages are kept strictly increasing by id with no duplicates. A flag
/// is cleared only when a fetch at that edge comes back empty; a short page
/// leaves it set, since ids are not contiguous.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowStore {
    messages: Vec<Message>,
    more_before: bool,
    more_after: bool,
}

fn normalize(mut messages: Vec<Message>) -> Vec<Message> {
    messages.sort_by_key(|m| m.message_id);
    messages.dedup_by_key(|m| m.message_id);
    messages
}

impl WindowStore {
    pub fn new(initial: Vec<Message>, more_before: bool, more_after: bool) -> Self {
        let mut window = Self::default();
        window.reset(initial, more_before, more_after);
        window
    }

    /// Replace the window. An empty window has no edge to page from, so
    /// both flags are cleared.
    pub fn reset(&mut self, initial: Vec<Message>, more_before: bool, more_after: bool) {
        self.messages = normalize(initial);
        let anchored = !self.messages.is_empty();
        self.more_before = more_before && anchored;
        self.more_after = more_after && anchored;
    }

    /// Prepend a fetched page. Returns the number of messages added.
    pub fn merge_before(&mut self, fetched: Vec<Message>) -> usize {
        if fetched.is_empty() {
            self.more_before = false;
            return 0;
        }

        let mut fresh = normalize(fetched);
        if let Some(first) = self.first_id() {
            fresh.retain(|m| m.message_id < first);
        }
        let added = fresh.len();
        fresh.append(&mut self.messages);
        self.messages = fresh;
        added
    }

    /// Append a fetched page. Returns the number of messages added.
    pub fn merge_after(&mut self, fetched: Vec<Message>) -> usize {
        if fetched.is_empty() {
            self.more_after = false;
            return 0;
        }

        let mut fresh = normalize(fetched);
        if let Some(last) = self.last_id() {
            fresh.retain(|m| m.message_id > last);
        }
        let added = fresh.len();
        self.messages.append(&mut fresh);
        added
    }

    pub fn merge(&mut self, edge: Edge, fetched: Vec<Message>) -> usize {
        match edge {
            Edge::Before => self.merge_before(fetched),
            Edge::After => self.merge_after(fetched),
        }
    }

    /// Clear the flag for `edge` without a fetch (nothing can lie beyond it)
    pub fn mark_exhausted(&mut self, edge: Edge) {
        match edge {
            Edge::Before => self.more_before = false,
            Edge::After => self.more_after = false,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn message_ids(&self) -> Vec<MessageId> {
        self.messages.iter().map(|m| m.message_id).collect()
    }

    pub fn first_id(&self) -> Option<MessageId> {
        self.messages.first().map(|m| m.message_id)
    }

    pub fn last_id(&self) -> Option<MessageId> {
        self.messages.last().map(|m| m.message_id)
    }

    pub fn more_before(&self) -> bool {
        self.more_before
    }

    pub fn more_after(&self) -> bool {
        self.more_after
    }

    pub fn has_more(&self, edge: Edge) -> bool {
        match edge {
            Edge::Before => self.more_before,
            Edge::After => self.more_after,
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(ids: &[MessageId]) -> Vec<Message> {
        ids.iter()
            .map(|&id| Message::new(id, format!("message {}", id)))
            .collect()
    }

    fn assert_strictly_increasing(window: &WindowStore) {
        let ids = window.message_ids();
        assert!(
            ids.windows(2).all(|pair| pair[0] < pair[1]),
            "ids not strictly increasing: {:?}",
            ids
        );
    }

    #[test]
    fn test_reset_normalizes_initial_messages() {
        let window = WindowStore::new(messages(&[12, 10, 11, 10]), true, false);

        assert_eq!(window.message_ids(), vec![10, 11, 12]);
        assert!(window.more_before());
        assert!(!window.more_after());
    }

    #[test]
    fn test_empty_initial_window_has_nothing_more() {
        let window = WindowStore::new(Vec::new(), true, true);

        assert!(window.is_empty());
        assert!(!window.has_more(Edge::Before));
        assert!(!window.has_more(Edge::After));
    }

    #[test]
    fn test_short_page_before_keeps_flag() {
        let mut window = WindowStore::new(messages(&[10, 11, 12]), true, true);

        let added = window.merge_before(messages(&[7, 9]));

        assert_eq!(added, 2);
        assert_eq!(window.message_ids(), vec![7, 9, 10, 11, 12]);
        assert!(window.more_before());
    }

    #[test]
    fn test_empty_fetch_exhausts_edge_without_touching_messages() {
        let mut window = WindowStore::new(messages(&[10, 11, 12]), true, true);

        assert_eq!(window.merge_after(Vec::new()), 0);
        assert_eq!(window.message_ids(), vec![10, 11, 12]);
        assert!(!window.more_after());
        assert!(window.more_before());
    }

    #[test]
    fn test_empty_merges_on_both_edges_keep_initial_window() {
        let initial = messages(&[3, 5, 8]);
        let mut window = WindowStore::new(initial.clone(), true, true);

        window.merge_before(Vec::new());
        window.merge_after(Vec::new());

        assert_eq!(window.messages(), initial.as_slice());
        assert!(!window.more_before());
        assert!(!window.more_after());
    }

    #[test]
    fn test_overlapping_fetches_are_deduplicated() {
        let mut window = WindowStore::new(messages(&[10, 11, 12]), true, true);

        window.merge_before(messages(&[9, 8, 10, 11, 9]));
        window.merge_after(messages(&[12, 13, 11, 15, 13]));

        assert_eq!(window.message_ids(), vec![8, 9, 10, 11, 12, 13, 15]);
        assert_strictly_increasing(&window);
    }

    #[test]
    fn test_fetch_of_only_known_ids_adds_nothing_and_keeps_flag() {
        let mut window = WindowStore::new(messages(&[10, 11]), true, true);

        assert_eq!(window.merge_before(messages(&[10, 11])), 0);
        assert_eq!(window.message_ids(), vec![10, 11]);
        assert!(window.more_before());
    }

    #[test]
    fn test_merge_into_empty_window() {
        let mut window = WindowStore::default();

        window.merge_after(messages(&[4, 2]));
        window.merge_before(messages(&[1]));

        assert_eq!(window.message_ids(), vec![1, 2, 4]);
    }

    #[test]
    fn test_merges_stay_ordered_across_many_pages() {
        let mut window = WindowStore::new(messages(&[50]), true, true);

        for step in 1..=6u64 {
            let lo = 50 - step * 6;
            let page: Vec<_> = (lo..lo + 6).rev().filter(|id| id % 3 != 0).collect();
            window.merge_before(messages(&page));

            let hi = 50 + step * 6;
            let page: Vec<_> = (hi - 5..=hi).filter(|id| id % 4 != 0).collect();
            window.merge_after(messages(&page));

            assert_strictly_increasing(&window);
        }
        assert_eq!(window.first_id(), Some(14));
        assert_eq!(window.last_id(), Some(86));
    }

    #[test]
    fn test_mark_exhausted() {
        let mut window = WindowStore::new(messages(&[0, 1]), true, true);

        window.mark_exhausted(Edge::Before);

        assert!(!window.has_more(Edge::Before));
        assert!(window.has_more(Edge::After));
    }
}
