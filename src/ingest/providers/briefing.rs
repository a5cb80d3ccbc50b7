// src/ingest/providers/briefing.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::ingest::normalize_text;
use crate::ingest::providers::ground::{join_url, to_sources, RawSource};
use crate::ingest::types::{FeedItem, NewsStoryItem, SourceProvider};
use crate::quality::SourcePolicy;

#[derive(Debug, Deserialize)]
struct Briefing {
    #[serde(default)]
    stories: Vec<Story>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Story {
    id: String,
    #[serde(default)]
    story_title: String,
    #[serde(default)]
    summary_one_headline: String,
    #[serde(default)]
    summary_one_text: String,
    #[serde(default)]
    summary_two_headline: String,
    #[serde(default)]
    summary_two_text: String,
    #[serde(default)]
    event_summary: EventSummary,
}

#[derive(Debug, Default, Deserialize)]
struct EventSummary {
    #[serde(default)]
    sources: Vec<RawSource>,
}

/// Map today's briefing payload onto stories, filtering sources by `policy`.
pub fn parse_briefing(json: &str, policy: SourcePolicy) -> Result<Vec<NewsStoryItem>> {
    let briefing: Briefing = serde_json::from_str(json).context("parsing briefing json")?;
    Ok(briefing
        .stories
        .into_iter()
        .map(|s| NewsStoryItem {
            id: s.id,
            story_title: normalize_text(&s.story_title),
            summary_one_headline: normalize_text(&s.summary_one_headline),
            summary_one_text: normalize_text(&s.summary_one_text),
            summary_two_headline: normalize_text(&s.summary_two_headline),
            summary_two_text: normalize_text(&s.summary_two_text),
            sources: policy.apply(to_sources(s.event_summary.sources)),
        })
        .collect())
}

/// Curated "today's briefing" stories.
pub struct BriefingProvider {
    client: reqwest::Client,
    base_url: String,
    policy: SourcePolicy,
}

impl BriefingProvider {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, policy: SourcePolicy) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            policy,
        }
    }
}

#[async_trait]
impl SourceProvider for BriefingProvider {
    async fn fetch_latest(&self) -> Result<Vec<FeedItem>> {
        let url = join_url(&self.base_url, "vectors/storiesInTodaysBriefing");
        let body = crate::ingest::get_text(&self.client, &url).await?;
        let stories = parse_briefing(&body, self.policy)?;
        Ok(stories.into_iter().map(FeedItem::from).collect())
    }

    fn name(&self) -> &'static str {
        "briefing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::FactualityTier;

    const JSON: &str = r#"{
        "stories": [{
            "id": "st-1",
            "storyTitle": "Budget&nbsp;passes",
            "summaryOneHeadline": "What happened",
            "summaryOneText": "<p>The vote</p>",
            "summaryTwoHeadline": "Why it matters",
            "summaryTwoText": "Because",
            "imageUrl": "ignored",
            "eventSummary": {"sources": [
                {"sourceId": "a", "url": "ua", "sourceInfo": {"name": "A", "factuality": "high"}},
                {"sourceId": "b", "url": "ub", "sourceInfo": {"name": "B", "factuality": "high"}},
                {"sourceId": "c", "url": "uc", "sourceInfo": {"name": "C", "factuality": "mixed"}}
            ]}
        }]
    }"#;

    #[test]
    fn fallback_policy_keeps_high_sources() {
        let out = parse_briefing(JSON, SourcePolicy::Fallback).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].story_title, "Budget passes");
        assert_eq!(out[0].summary_one_text, "The vote");
        assert_eq!(out[0].sources.len(), 2);
        assert!(out[0]
            .sources
            .iter()
            .all(|s| s.factuality == FactualityTier::High));
    }

    #[test]
    fn strict_policy_keeps_story_without_sources() {
        let out = parse_briefing(JSON, SourcePolicy::VeryHighOnly).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0].sources.is_empty());
    }

    #[test]
    fn missing_stories_is_empty() {
        assert!(parse_briefing("{}", SourcePolicy::Fallback).unwrap().is_empty());
    }
}
