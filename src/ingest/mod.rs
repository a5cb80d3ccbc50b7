// src/ingest/mod.rs
pub mod providers;
pub mod types;

use crate::ingest::types::{FeedItem, SourceProvider};
use anyhow::{Context, Result};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "feed_fetch_items_total",
            "Items produced by providers before deduplication."
        );
        describe_counter!(
            "feed_fetch_errors_total",
            "Provider fetch/parse errors (slot yields nothing)."
        );
        describe_counter!(
            "feed_dedup_total",
            "Items removed because they were already seen."
        );
        describe_counter!(
            "feed_seen_persist_errors_total",
            "Failed writes of the seen-set."
        );
        describe_histogram!("feed_load_ms", "Full load cycle time in milliseconds.");
        describe_gauge!("feed_items", "Items in the currently published feed.");
    });
}

/// Collapse every whitespace run into one space and trim.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize news text: decode entities, strip tags, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s);

    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| {
        regex::Regex::new(r"(?is)</?[a-z][^>]*>").expect("static tag regex is valid")
    });
    let stripped = re_tags.replace_all(&decoded, "");

    let out = stripped
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    collapse_whitespace(&out)
}

/// Run one provider; any error is logged and turns into an empty list.
pub async fn fetch_or_empty(provider: Option<&dyn SourceProvider>) -> Vec<FeedItem> {
    let Some(p) = provider else {
        return Vec::new();
    };
    match p.fetch_latest().await {
        Ok(items) => {
            counter!("feed_fetch_items_total", "provider" => p.name())
                .increment(items.len() as u64);
            tracing::debug!(provider = p.name(), count = items.len(), "provider fetched");
            items
        }
        Err(e) => {
            tracing::warn!(error = ?e, provider = p.name(), "provider error");
            counter!("feed_fetch_errors_total", "provider" => p.name()).increment(1);
            Vec::new()
        }
    }
}

pub(crate) async fn get_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let resp = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("GET {url}"))?
        .error_for_status()
        .with_context(|| format!("GET {url} status"))?;
    resp.text()
        .await
        .with_context(|| format!("reading body of {url}"))
}

pub(crate) async fn get_json<T: DeserializeOwned>(client: &reqwest::Client, url: &str) -> Result<T> {
    let body = get_text(client, url).await?;
    serde_json::from_str(&body).with_context(|| format!("decoding json from {url}"))
}
