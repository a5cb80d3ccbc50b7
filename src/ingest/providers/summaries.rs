// src/ingest/providers/summaries.rs
use std::collections::{BTreeMap, HashSet};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::ingest::collapse_whitespace;
use crate::ingest::types::{FeedItem, PaperItem, SourceProvider};

pub const DEFAULT_SUMMARY_AUTHOR: &str = "AI Summary";

#[derive(Debug, Deserialize)]
struct Summary {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
}

/// `groupId -> articleId -> summary`; BTreeMap keeps the walk order stable.
type SummaryGroups = BTreeMap<String, BTreeMap<String, Summary>>;

/// Flatten the two-level summary mapping into paper cards.
///
/// The card id is `"{groupId}-{title}"`; a second article with the same title
/// in the same group is dropped so one dismissal cannot hide two cards.
pub fn parse_summaries(json: &str, author: &str) -> Result<Vec<PaperItem>> {
    let groups: SummaryGroups =
        serde_json::from_str(json).context("summaries: malformed group mapping")?;
    let mut out = Vec::new();
    let mut links = HashSet::new();
    for (group_id, articles) in groups {
        for (article_id, summary) in articles {
            let title = collapse_whitespace(&summary.title);
            let link = format!("{group_id}-{title}");
            if !links.insert(link.clone()) {
                tracing::warn!(%link, %article_id, "duplicate summary title, skipping");
                continue;
            }
            out.push(PaperItem {
                link,
                content: collapse_whitespace(&summary.content),
                date: String::new(),
                authors: vec![author.to_string()],
                title,
            });
        }
    }
    Ok(out)
}

pub struct SummaryProvider {
    client: reqwest::Client,
    url: String,
    author: String,
}

impl SummaryProvider {
    pub fn new(client: reqwest::Client, url: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            author: author.into(),
        }
    }
}

#[async_trait]
impl SourceProvider for SummaryProvider {
    async fn fetch_latest(&self) -> Result<Vec<FeedItem>> {
        let body = crate::ingest::get_text(&self.client, &self.url).await?;
        let papers = parse_summaries(&body, &self.author)?;
        Ok(papers.into_iter().map(FeedItem::from).collect())
    }

    fn name(&self) -> &'static str {
        "summaries"
    }
}
