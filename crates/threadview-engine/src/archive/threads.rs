use std::collections::HashMap;

use threadview_types::MessageId;

use super::export::ArchivedMessage;

/// Union-find over message positions. The root of every set is its lowest
/// position, i.e. the earliest message of the thread.
struct ThreadForest {
    parent: Vec<usize>,
}

impl ThreadForest {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            let (root, child) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[child] = root;
        }
    }
}

/// Group messages into threads by following reply links.
///
/// Returns the member positions of every thread, threads ordered by their
/// earliest message and members in ascending order. A reply to a message
/// missing from the export starts a thread of its own.
pub(crate) fn group_threads(
    messages: &[ArchivedMessage],
    positions: &HashMap<MessageId, usize>,
) -> Vec<Vec<usize>> {
    let mut forest = ThreadForest::new(messages.len());

    for (pos, message) in messages.iter().enumerate() {
        if let Some(target) = message.reply_to.and_then(|id| positions.get(&id)) {
            forest.union(*target, pos);
        }
    }

    let mut thread_of_root: Vec<Option<usize>> = vec![None; messages.len()];
    let mut threads: Vec<Vec<usize>> = Vec::new();

    for pos in 0..messages.len() {
        let root = forest.find(pos);
        let thread = *thread_of_root[root].get_or_insert_with(|| {
            threads.push(Vec::new());
            threads.len() - 1
        });
        threads[thread].push(pos);
    }

    threads
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: MessageId, reply_to: Option<MessageId>) -> ArchivedMessage {
        ArchivedMessage {
            id,
            date_unixtime: 0,
            entities: Vec::new(),
            reply_to,
        }
    }

    fn group(messages: &[ArchivedMessage]) -> Vec<Vec<usize>> {
        let positions = messages
            .iter()
            .enumerate()
            .map(|(pos, m)| (m.id, pos))
            .collect();
        group_threads(messages, &positions)
    }

    #[test]
    fn test_reply_chains_form_threads() {
        let messages = vec![
            message(1, None),
            message(2, None),
            message(3, Some(1)),
            message(5, Some(3)),
            message(8, Some(2)),
            message(9, None),
        ];

        assert_eq!(group(&messages), vec![vec![0, 2, 3], vec![1, 4], vec![5]]);
    }

    #[test]
    fn test_branching_replies_stay_in_one_thread() {
        let messages = vec![
            message(1, None),
            message(2, Some(1)),
            message(3, Some(1)),
            message(4, Some(2)),
            message(5, None),
        ];

        assert_eq!(group(&messages), vec![vec![0, 1, 2, 3], vec![4]]);
    }

    #[test]
    fn test_reply_to_missing_message_starts_thread() {
        let messages = vec![message(10, Some(3)), message(11, Some(10))];

        assert_eq!(group(&messages), vec![vec![0, 1]]);
    }
}
