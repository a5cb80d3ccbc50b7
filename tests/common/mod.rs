// tests/common/mod.rs
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use swipe_feed::{FactualityTier, FeedItem, NewsStoryItem, PaperItem, SourceInfo, SourceProvider};

pub fn paper(link: &str) -> FeedItem {
    FeedItem::Paper(PaperItem {
        title: format!("Paper {link}"),
        content: "abstract".to_string(),
        date: "2 hours ago".to_string(),
        authors: vec!["A. Author".to_string()],
        link: link.to_string(),
    })
}

pub fn story(id: &str) -> FeedItem {
    story_with_sources(id, vec![])
}

pub fn story_with_sources(id: &str, tiers: Vec<FactualityTier>) -> FeedItem {
    FeedItem::Story(NewsStoryItem {
        id: id.to_string(),
        story_title: format!("Story {id}"),
        summary_one_headline: String::new(),
        summary_one_text: "text".to_string(),
        summary_two_headline: String::new(),
        summary_two_text: String::new(),
        sources: tiers
            .into_iter()
            .enumerate()
            .map(|(i, t)| SourceInfo {
                name: format!("src{i}"),
                source_id: format!("sid{i}"),
                url: format!("https://example.test/{id}/{i}"),
                factuality: t,
            })
            .collect(),
    })
}

pub fn ids(items: &[FeedItem]) -> Vec<String> {
    items.iter().map(|i| i.id().to_string()).collect()
}

pub struct FixedProvider {
    pub name: &'static str,
    pub items: Vec<FeedItem>,
}

#[async_trait]
impl SourceProvider for FixedProvider {
    async fn fetch_latest(&self) -> Result<Vec<FeedItem>> {
        Ok(self.items.clone())
    }
    fn name(&self) -> &'static str {
        self.name
    }
}

pub struct FailingProvider;

#[async_trait]
impl SourceProvider for FailingProvider {
    async fn fetch_latest(&self) -> Result<Vec<FeedItem>> {
        Err(anyhow!("upstream exploded"))
    }
    fn name(&self) -> &'static str {
        "failing"
    }
}

pub fn fixed(name: &'static str, items: Vec<FeedItem>) -> Option<Box<dyn SourceProvider>> {
    Some(Box::new(FixedProvider { name, items }))
}
