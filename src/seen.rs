//! Durable set of item ids the user has already swiped past.
//!
//! Stored under a single key as a JSON array of strings. Loading is fail-open
//! (any problem yields an empty set); saving overwrites the full set.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::Mutex;

pub const SEEN_KEY: &str = "seenArticles";

static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// One `<key>.json` file per key inside `dir`.
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl KvStore for FileKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("creating {}", self.dir.display()))?;
        let path = self.path_for(key);
        // Each write gets its own temp file; only the rename touches `path`.
        let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let tmp = self
            .dir
            .join(format!("{key}.json.{}.{seq}.tmp", std::process::id()));
        tokio::fs::write(&tmp, value)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e).with_context(|| format!("replacing {}", path.display()));
        }
        Ok(())
    }
}

/// In-memory store; `failing()` makes every write return an error.
#[derive(Default)]
pub struct MemoryKvStore {
    inner: Mutex<HashMap<String, String>>,
    fail_writes: bool,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            fail_writes: true,
        }
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.inner.lock().insert(key.to_string(), value.to_string());
        store
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.lock().get(key).cloned()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.inner.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            anyhow::bail!("memory store is read-only");
        }
        self.inner.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenSet {
    ids: BTreeSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Returns `true` if the id was not present before.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.ids)?)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        let ids: Vec<String> = serde_json::from_str(s).context("seen-set is not a string array")?;
        Ok(ids.into_iter().collect())
    }
}

impl<S: Into<String>> FromIterator<S> for SeenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Read the seen-set; never fails.
pub async fn load_seen(store: &dyn KvStore) -> SeenSet {
    match store.get(SEEN_KEY).await {
        Ok(Some(raw)) => match SeenSet::from_json(&raw) {
            Ok(set) => {
                tracing::info!(count = set.len(), "seen-set loaded");
                set
            }
            Err(e) => {
                tracing::warn!(error = ?e, "seen-set unreadable, starting empty");
                SeenSet::new()
            }
        },
        Ok(None) => SeenSet::new(),
        Err(e) => {
            tracing::warn!(error = ?e, "seen-set load failed, starting empty");
            SeenSet::new()
        }
    }
}

/// Serialize and overwrite the stored seen-set.
pub async fn save_seen(store: &dyn KvStore, seen: &SeenSet) -> Result<()> {
    let json = seen.to_json()?;
    store.set(SEEN_KEY, &json).await
}
