// src/ingest/providers/arxiv.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use futures::future::try_join_all;
use quick_xml::de::from_str;
use serde::Deserialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::ingest::collapse_whitespace;
use crate::ingest::types::{FeedItem, PaperItem, SourceProvider};

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "entry", default)]
    entry: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    published: Option<String>,
    #[serde(rename = "author", default)]
    author: Vec<Author>,
}

#[derive(Debug, Deserialize)]
struct Author {
    #[serde(default)]
    name: String,
}

/// A parsed entry that still carries its sortable timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPaper {
    pub title: String,
    pub content: String,
    pub published_raw: String,
    /// Unix seconds; `None` if the timestamp did not parse.
    pub published_at: Option<i64>,
    pub authors: Vec<String>,
    pub link: String,
}

fn parse_rfc3339_to_unix(ts: &str) -> Option<i64> {
    OffsetDateTime::parse(ts.trim(), &Rfc3339)
        .ok()
        .map(|dt| dt.unix_timestamp())
}

/// Parse an arXiv Atom document into raw entries (document order).
pub fn parse_entries(xml: &str) -> Result<Vec<RawPaper>> {
    let feed: Feed = from_str(xml).context("parsing arxiv atom xml")?;
    Ok(feed
        .entry
        .into_iter()
        .map(|e| {
            let published_raw = e.published.unwrap_or_default();
            RawPaper {
                title: collapse_whitespace(&e.title),
                content: collapse_whitespace(&e.summary),
                published_at: parse_rfc3339_to_unix(&published_raw),
                published_raw,
                authors: e
                    .author
                    .into_iter()
                    .map(|a| collapse_whitespace(&a.name))
                    .filter(|n| !n.is_empty())
                    .collect(),
                link: e.id.trim().to_string(),
            }
        })
        .collect())
}

/// Sort newest first and only then render the relative date.
/// Entries with an unparseable timestamp go last and keep their raw text.
pub fn finalize_papers(mut raw: Vec<RawPaper>, now_unix: i64) -> Vec<PaperItem> {
    // `None` < `Some`, so reversing the comparison puts them at the end.
    raw.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    raw.into_iter()
        .map(|r| PaperItem {
            date: match r.published_at {
                Some(ts) => relative_since(ts, now_unix),
                None => r.published_raw,
            },
            title: r.title,
            content: r.content,
            authors: r.authors,
            link: r.link,
        })
        .collect()
}

/// "3 hours ago"-style distance between `ts` and `now` (unix seconds).
pub fn relative_since(ts: i64, now: i64) -> String {
    let delta = now - ts;
    let secs = delta.unsigned_abs();

    let phrase = if secs < 60 {
        "less than a minute".to_string()
    } else if secs < 3_600 {
        plural(secs / 60, "minute")
    } else if secs < 86_400 {
        plural(secs / 3_600, "hour")
    } else if secs < 30 * 86_400 {
        plural(secs / 86_400, "day")
    } else if secs < 365 * 86_400 {
        plural(secs / (30 * 86_400), "month")
    } else {
        plural(secs / (365 * 86_400), "year")
    };

    if delta >= 0 {
        format!("{phrase} ago")
    } else {
        format!("in {phrase}")
    }
}

fn plural(n: u64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// Queries the arXiv export API once per subject category.
pub struct ArxivProvider {
    client: reqwest::Client,
    base_url: String,
    categories: Vec<String>,
    max_results: u32,
}

impl ArxivProvider {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        categories: Vec<String>,
        max_results: u32,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            categories,
            max_results,
        }
    }

    fn query_url(&self, category: &str) -> String {
        format!(
            "{}?search_query=cat:{}&start=0&max_results={}&sortBy=submittedDate&sortOrder=descending",
            self.base_url, category, self.max_results
        )
    }

    async fn fetch_category(&self, category: &str) -> Result<Vec<RawPaper>> {
        let url = self.query_url(category);
        let body = crate::ingest::get_text(&self.client, &url).await?;
        parse_entries(&body).with_context(|| format!("arxiv category {category}"))
    }
}

#[async_trait]
impl SourceProvider for ArxivProvider {
    async fn fetch_latest(&self) -> Result<Vec<FeedItem>> {
        let per_category =
            try_join_all(self.categories.iter().map(|c| self.fetch_category(c))).await?;
        let raw: Vec<RawPaper> = per_category.into_iter().flatten().collect();
        let papers = finalize_papers(raw, Utc::now().timestamp());
        Ok(papers.into_iter().map(FeedItem::from).collect())
    }

    fn name(&self) -> &'static str {
        "arxiv"
    }
}
