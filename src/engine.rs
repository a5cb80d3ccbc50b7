//! # Feed Engine
//! Owns the providers, the seen-set and the currently published feed.
//!
//! Every load runs all provider slots concurrently, merges the results with
//! [`crate::aggregate::build_feed`] and swaps in a fresh immutable
//! [`FeedSnapshot`]. A snapshot is only installed when it is newer than the
//! one already published, so overlapping refreshes cannot roll the feed back.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use parking_lot::{Mutex, RwLock};
use tracing::{info, warn};

use crate::aggregate::{build_feed, FetchedLists};
use crate::config::FeedConfig;
use crate::ingest::providers::{
    arxiv::ArxivProvider, briefing::BriefingProvider, interest::InterestProvider,
    interest::InterestTopic, summaries::SummaryProvider,
};
use crate::ingest::types::{FeedItem, SourceProvider};
use crate::ingest::{ensure_metrics_described, fetch_or_empty};
use crate::seen::{load_seen, save_seen, FileKvStore, KvStore, SeenSet};

pub type BoxedProvider = Box<dyn SourceProvider>;

/// One optional provider per feed slot.
#[derive(Default)]
pub struct FeedSources {
    pub papers: Option<BoxedProvider>,
    pub summaries: Option<BoxedProvider>,
    pub briefing: Option<BoxedProvider>,
    pub topical: Option<BoxedProvider>,
    pub international: Option<BoxedProvider>,
}

impl FeedSources {
    pub fn from_config(cfg: &FeedConfig, client: reqwest::Client) -> Self {
        let gn = &cfg.ground_news;

        let summaries = cfg.summaries.url.as_ref().map(|url| {
            Box::new(SummaryProvider::new(
                client.clone(),
                url.clone(),
                cfg.summaries.author.clone(),
            )) as BoxedProvider
        });

        let topical = (!gn.places.is_empty()).then(|| {
            let topics = gn.places.iter().map(|c| InterestTopic::place(c.as_str())).collect();
            Box::new(InterestProvider::new(client.clone(), gn.base_url.clone(), topics))
                as BoxedProvider
        });

        let international = gn.international_topic().cloned().map(|topic| {
            Box::new(
                InterestProvider::new(client.clone(), gn.base_url.clone(), vec![topic])
                    .named("international"),
            ) as BoxedProvider
        });

        Self {
            papers: Some(Box::new(ArxivProvider::new(
                client.clone(),
                cfg.arxiv.base_url.clone(),
                cfg.arxiv.categories.clone(),
                cfg.arxiv.max_results,
            ))),
            summaries,
            briefing: Some(Box::new(BriefingProvider::new(
                client,
                gn.base_url.clone(),
                gn.briefing_policy,
            ))),
            topical,
            international,
        }
    }

    /// Run every slot concurrently and wait for all of them.
    pub async fn fetch_all(&self) -> FetchedLists {
        let (papers, summaries, briefing, topical, international) = tokio::join!(
            fetch_or_empty(self.papers.as_deref()),
            fetch_or_empty(self.summaries.as_deref()),
            fetch_or_empty(self.briefing.as_deref()),
            fetch_or_empty(self.topical.as_deref()),
            fetch_or_empty(self.international.as_deref()),
        );
        FetchedLists {
            papers,
            summaries,
            briefing,
            topical,
            international,
        }
    }
}

/// Immutable result of one load cycle.
#[derive(Debug, Clone, Default)]
pub struct FeedSnapshot {
    /// 0 means nothing has been loaded yet.
    pub generation: u64,
    pub items: Vec<FeedItem>,
    pub loaded_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    Initial,
    Refresh,
}

pub struct FeedEngine {
    sources: FeedSources,
    store: Arc<dyn KvStore>,
    seen: Mutex<SeenSet>,
    /// Held across clone-and-save so writes reach the store in order.
    persist: tokio::sync::Mutex<()>,
    snapshot: RwLock<Arc<FeedSnapshot>>,
    next_ticket: AtomicU64,
    loads_in_flight: AtomicUsize,
    refreshes_in_flight: AtomicUsize,
    previous_index: Mutex<Option<usize>>,
}

/// Decrements an in-flight counter when the load finishes or is dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(c: &'a AtomicUsize) -> Self {
        c.fetch_add(1, Ordering::SeqCst);
        Self(c)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl FeedEngine {
    /// Build the engine and read the seen-set once (fail-open).
    pub async fn new(sources: FeedSources, store: Arc<dyn KvStore>) -> Self {
        ensure_metrics_described();
        let seen = load_seen(store.as_ref()).await;
        Self {
            sources,
            store,
            seen: Mutex::new(seen),
            persist: tokio::sync::Mutex::new(()),
            snapshot: RwLock::new(Arc::new(FeedSnapshot::default())),
            next_ticket: AtomicU64::new(1),
            loads_in_flight: AtomicUsize::new(0),
            refreshes_in_flight: AtomicUsize::new(0),
            previous_index: Mutex::new(None),
        }
    }

    /// Wire providers and the file-backed store from configuration.
    pub async fn from_config(cfg: &FeedConfig) -> anyhow::Result<Self> {
        let client = cfg.http.build_client()?;
        let sources = FeedSources::from_config(cfg, client);
        let store: Arc<dyn KvStore> = Arc::new(FileKvStore::new(cfg.storage.dir.clone()));
        Ok(Self::new(sources, store).await)
    }

    pub async fn load(&self) -> Arc<FeedSnapshot> {
        self.run_load(LoadKind::Initial).await
    }

    pub async fn refresh(&self) -> Arc<FeedSnapshot> {
        self.run_load(LoadKind::Refresh).await
    }

    async fn run_load(&self, kind: LoadKind) -> Arc<FeedSnapshot> {
        let in_flight = match kind {
            LoadKind::Initial => &self.loads_in_flight,
            LoadKind::Refresh => &self.refreshes_in_flight,
        };
        let _guard = InFlight::enter(in_flight);
        let ticket = self.next_ticket.fetch_add(1, Ordering::SeqCst);
        let t0 = Instant::now();

        let lists = self.sources.fetch_all().await;
        let seen = self.seen.lock().clone();
        let (items, dropped) = build_feed(lists, &seen);

        counter!("feed_dedup_total").increment(dropped as u64);
        histogram!("feed_load_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

        let fresh = Arc::new(FeedSnapshot {
            generation: ticket,
            items,
            loaded_at: Some(chrono::Utc::now()),
        });

        let mut slot = self.snapshot.write();
        if fresh.generation > slot.generation {
            *slot = fresh;
            gauge!("feed_items").set(slot.items.len() as f64);
            info!(
                target: "feed",
                ?kind,
                generation = slot.generation,
                items = slot.items.len(),
                dropped_seen = dropped,
                "feed published"
            );
        } else {
            warn!(
                target: "feed",
                ?kind,
                stale = fresh.generation,
                current = slot.generation,
                "discarding stale load"
            );
        }
        Arc::clone(&slot)
    }

    /// Current published feed.
    pub fn snapshot(&self) -> Arc<FeedSnapshot> {
        Arc::clone(&self.snapshot.read())
    }

    pub fn items(&self) -> Vec<FeedItem> {
        self.snapshot().items.clone()
    }

    /// True until the first load completes, and during any initial load.
    pub fn is_loading(&self) -> bool {
        self.loads_in_flight.load(Ordering::SeqCst) > 0 || self.snapshot().generation == 0
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshes_in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn seen_count(&self) -> usize {
        self.seen.lock().len()
    }

    pub fn has_seen(&self, id: &str) -> bool {
        self.seen.lock().contains(id)
    }

    /// Record a dismissal and persist the whole set.
    ///
    /// Returns whether the id was new. A failed write is logged and the
    /// in-memory insert is kept.
    pub async fn mark_seen(&self, id: &str) -> bool {
        if !self.seen.lock().insert(id) {
            return false;
        }
        info!(target: "feed", id, "swiped away");

        // The set only grows, so whoever holds the turn writes a superset of
        // every earlier save.
        let _turn = self.persist.lock().await;
        let current = self.seen.lock().clone();
        if let Err(e) = save_seen(self.store.as_ref(), &current).await {
            warn!(error = ?e, id, "seen-set persist failed");
            counter!("feed_seen_persist_errors_total").increment(1);
        }
        true
    }

    /// The UI settled on page `new_index`. If it moved away from a previous
    /// page, the item on that page is marked seen and its id returned.
    pub async fn scroll_settled(&self, new_index: usize) -> Option<String> {
        let previous = self.previous_index.lock().replace(new_index);
        let prev = previous.filter(|p| *p != new_index)?;

        let id = self.snapshot().items.get(prev).map(|i| i.id().to_string())?;
        self.mark_seen(&id).await;
        Some(id)
    }
}
