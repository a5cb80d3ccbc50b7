// src/ingest/types.rs
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Credibility classification attached to every news source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FactualityTier {
    VeryHigh,
    High,
    Other,
}

impl FactualityTier {
    /// Map the API label onto a tier. Unknown or missing labels are `Other`.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(str::trim) {
            Some("veryHigh") => Self::VeryHigh,
            Some("high") => Self::High,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub name: String,
    pub source_id: String,
    pub url: String,
    pub factuality: FactualityTier,
}

/// A paper listing or an AI summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperItem {
    pub title: String,
    pub content: String,
    /// Human-relative ("3 hours ago"), raw ISO text, or empty for summaries.
    pub date: String,
    pub authors: Vec<String>,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsStoryItem {
    pub id: String,
    pub story_title: String,
    pub summary_one_headline: String,
    pub summary_one_text: String,
    pub summary_two_headline: String,
    pub summary_two_text: String,
    pub sources: Vec<SourceInfo>,
}

/// One displayable card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedItem {
    Paper(PaperItem),
    Story(NewsStoryItem),
}

impl FeedItem {
    /// Stable identifier used for seen-tracking.
    pub fn id(&self) -> &str {
        match self {
            FeedItem::Paper(p) => &p.link,
            FeedItem::Story(s) => &s.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            FeedItem::Paper(p) => &p.title,
            FeedItem::Story(s) => &s.story_title,
        }
    }
}

impl From<PaperItem> for FeedItem {
    fn from(p: PaperItem) -> Self {
        FeedItem::Paper(p)
    }
}

impl From<NewsStoryItem> for FeedItem {
    fn from(s: NewsStoryItem) -> Self {
        FeedItem::Story(s)
    }
}

#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<FeedItem>>;
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_labels_map_with_other_as_catch_all() {
        assert_eq!(FactualityTier::from_label(Some("veryHigh")), FactualityTier::VeryHigh);
        assert_eq!(FactualityTier::from_label(Some("high")), FactualityTier::High);
        assert_eq!(FactualityTier::from_label(Some("mixed")), FactualityTier::Other);
        assert_eq!(FactualityTier::from_label(None), FactualityTier::Other);
    }

    #[test]
    fn feed_item_serializes_with_kind_tag() {
        let item = FeedItem::Story(NewsStoryItem {
            id: "ev-1".into(),
            story_title: "Title".into(),
            summary_one_headline: String::new(),
            summary_one_text: "Text".into(),
            summary_two_headline: String::new(),
            summary_two_text: String::new(),
            sources: vec![SourceInfo {
                name: "Reuters".into(),
                source_id: "s1".into(),
                url: "https://example.test/a".into(),
                factuality: FactualityTier::VeryHigh,
            }],
        });
        let v = serde_json::to_value(&item).unwrap();
        assert_eq!(v["kind"], "story");
        assert_eq!(v["storyTitle"], "Title");
        assert_eq!(v["sources"][0]["factuality"], "veryHigh");
        assert_eq!(item.id(), "ev-1");
    }
}
