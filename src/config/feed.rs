// src/config/feed.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ingest::providers::ground::DEFAULT_GROUND_NEWS_BASE;
use crate::ingest::providers::interest::InterestTopic;
use crate::ingest::providers::summaries::DEFAULT_SUMMARY_AUTHOR;
use crate::quality::SourcePolicy;

pub const ENV_FEED_CONFIG_PATH: &str = "FEED_CONFIG_PATH";
pub const DEFAULT_FEED_CONFIG_PATH: &str = "config/feed.toml";

fn default_arxiv_base() -> String {
    "https://export.arxiv.org/api/query".to_string()
}
fn default_categories() -> Vec<String> {
    vec!["cs.RO".to_string(), "math.OC".to_string()]
}
fn default_max_results() -> u32 {
    50
}
fn default_ground_base() -> String {
    DEFAULT_GROUND_NEWS_BASE.to_string()
}
fn default_places() -> Vec<String> {
    vec!["CA".to_string()]
}
fn default_international() -> Option<InterestTopic> {
    Some(InterestTopic::international())
}
fn default_true() -> bool {
    true
}
fn default_summary_author() -> String {
    DEFAULT_SUMMARY_AUTHOR.to_string()
}
fn default_storage_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_user_agent() -> String {
    concat!("swipe-feed/", env!("CARGO_PKG_VERSION")).to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArxivConfig {
    #[serde(default = "default_arxiv_base")]
    pub base_url: String,
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

impl Default for ArxivConfig {
    fn default() -> Self {
        Self {
            base_url: default_arxiv_base(),
            categories: default_categories(),
            max_results: default_max_results(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundNewsConfig {
    #[serde(default = "default_ground_base")]
    pub base_url: String,
    #[serde(default)]
    pub briefing_policy: SourcePolicy,
    /// Place codes for the topical fetcher (e.g. "CA").
    #[serde(default = "default_places")]
    pub places: Vec<String>,
    /// Set to `false` to leave the international slot empty.
    #[serde(default = "default_true")]
    pub international_enabled: bool,
    /// Discovery lookup for the international slot.
    #[serde(default = "default_international")]
    pub international: Option<InterestTopic>,
}

impl GroundNewsConfig {
    /// The international topic, unless the slot is switched off.
    pub fn international_topic(&self) -> Option<&InterestTopic> {
        self.international
            .as_ref()
            .filter(|_| self.international_enabled)
    }
}

impl Default for GroundNewsConfig {
    fn default() -> Self {
        Self {
            base_url: default_ground_base(),
            briefing_policy: SourcePolicy::default(),
            places: default_places(),
            international_enabled: true,
            international: default_international(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummariesConfig {
    /// Endpoint serving `{groupId: {articleId: {title, content}}}`.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_summary_author")]
    pub author: String,
}

impl Default for SummariesConfig {
    fn default() -> Self {
        Self {
            url: None,
            author: default_summary_author(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_dir")]
    pub dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Unset means requests may wait indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: None,
        }
    }
}

impl HttpConfig {
    pub fn build_client(&self) -> Result<reqwest::Client> {
        let mut b = reqwest::Client::builder().user_agent(self.user_agent.clone());
        if let Some(secs) = self.timeout_secs {
            b = b.timeout(Duration::from_secs(secs));
        }
        b.build().context("building http client")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default)]
    pub arxiv: ArxivConfig,
    #[serde(default)]
    pub ground_news: GroundNewsConfig,
    #[serde(default)]
    pub summaries: SummariesConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

impl FeedConfig {
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading feed config from {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Resolution order:
    /// 1) $FEED_CONFIG_PATH
    /// 2) config/feed.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_FEED_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("{ENV_FEED_CONFIG_PATH} points to non-existent path"));
        }
        let p = PathBuf::from(DEFAULT_FEED_CONFIG_PATH);
        if p.exists() {
            return Self::load_from(&p);
        }
        Ok(Self::default())
    }
}
