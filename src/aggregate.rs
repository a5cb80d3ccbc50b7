//! # Feed Aggregation
//! Pure merge logic: drop already-seen items, then interleave.
//!
//! News lists are first interleaved among themselves (briefing, topical,
//! international); the result is then interleaved with papers and summaries.
//! Both stages are deterministic for identical inputs.

use crate::ingest::types::FeedItem;
use crate::seen::SeenSet;

/// Raw per-slot results of one load cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedLists {
    pub papers: Vec<FeedItem>,
    pub summaries: Vec<FeedItem>,
    pub briefing: Vec<FeedItem>,
    pub topical: Vec<FeedItem>,
    pub international: Vec<FeedItem>,
}

impl FetchedLists {
    pub fn total(&self) -> usize {
        self.papers.len()
            + self.summaries.len()
            + self.briefing.len()
            + self.topical.len()
            + self.international.len()
    }
}

/// Round-robin merge: one item from each non-exhausted list per round,
/// always in the given list order.
pub fn interleave<T>(lists: Vec<Vec<T>>) -> Vec<T> {
    let total: usize = lists.iter().map(Vec::len).sum();
    let mut iters: Vec<_> = lists.into_iter().map(Vec::into_iter).collect();
    let mut out = Vec::with_capacity(total);
    while out.len() < total {
        for it in iters.iter_mut() {
            if let Some(x) = it.next() {
                out.push(x);
            }
        }
    }
    out
}

pub fn drop_seen(items: Vec<FeedItem>, seen: &SeenSet) -> Vec<FeedItem> {
    items.into_iter().filter(|i| !seen.contains(i.id())).collect()
}

/// Dedup every list against `seen`, then run both interleave stages.
/// Returns the feed and the number of items dropped as seen.
pub fn build_feed(lists: FetchedLists, seen: &SeenSet) -> (Vec<FeedItem>, usize) {
    let before = lists.total();

    let news = interleave(vec![
        drop_seen(lists.briefing, seen),
        drop_seen(lists.topical, seen),
        drop_seen(lists.international, seen),
    ]);
    let feed = interleave(vec![
        drop_seen(lists.papers, seen),
        drop_seen(lists.summaries, seen),
        news,
    ]);

    let dropped = before - feed.len();
    (feed, dropped)
}
