// src/ingest/providers/interest.rs
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::ingest::normalize_text;
use crate::ingest::providers::ground::{join_url, to_sources, RawSource};
use crate::ingest::types::{FeedItem, NewsStoryItem, SourceProvider};
use crate::quality::filter_sources;

/// How a topic is turned into a Ground News interest id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InterestTopic {
    /// `place/{code}/interest` → `interest.id`
    Place { code: String },
    /// `interests/discover` → entry `group` → sub-interest with `slug`
    Discover { group: String, slug: String },
}

impl InterestTopic {
    pub fn place(code: impl Into<String>) -> Self {
        Self::Place { code: code.into() }
    }

    pub fn international() -> Self {
        Self::Discover {
            group: "popular".to_string(),
            slug: "international".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PlaceInterest {
    interest: InterestRef,
}

#[derive(Debug, Deserialize)]
struct InterestRef {
    id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DiscoverGroup {
    id: String,
    #[serde(default)]
    interests: Vec<DiscoverInterest>,
}

#[derive(Debug, Deserialize)]
struct DiscoverInterest {
    id: String,
    #[serde(default)]
    slug: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventList {
    #[serde(default)]
    event_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EventEnvelope {
    event: Event,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Event {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    first_ten_sources: Vec<RawSource>,
}

/// Walk the discovery list: group by `id`, then sub-interest by `slug`.
pub(crate) fn find_discover_id(groups: &[DiscoverGroup], group: &str, slug: &str) -> Result<String> {
    let g = groups
        .iter()
        .find(|g| g.id == group)
        .ok_or_else(|| anyhow!("discover group '{group}' not found"))?;
    g.interests
        .iter()
        .find(|i| i.slug == slug)
        .map(|i| i.id.clone())
        .ok_or_else(|| anyhow!("interest '{slug}' not found in group '{group}'"))
}

fn event_to_story(ev: Event) -> NewsStoryItem {
    NewsStoryItem {
        id: ev.id,
        story_title: normalize_text(&ev.title),
        summary_one_headline: String::new(),
        summary_one_text: normalize_text(&ev.description),
        summary_two_headline: String::new(),
        summary_two_text: String::new(),
        sources: filter_sources(to_sources(ev.first_ten_sources)),
    }
}

/// Stories for one or more interests, ordered by ascending source count.
pub struct InterestProvider {
    client: reqwest::Client,
    base_url: String,
    topics: Vec<InterestTopic>,
    name: &'static str,
}

impl InterestProvider {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, topics: Vec<InterestTopic>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            topics,
            name: "interest",
        }
    }

    /// The international variant, resolved through the discovery endpoint.
    pub fn international(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self::new(client, base_url, vec![InterestTopic::international()]).named("international")
    }

    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    async fn resolve(&self, topic: &InterestTopic) -> Result<String> {
        match topic {
            InterestTopic::Place { code } => {
                let url = join_url(&self.base_url, &format!("place/{code}/interest"));
                let place: PlaceInterest = crate::ingest::get_json(&self.client, &url).await?;
                Ok(place.interest.id)
            }
            InterestTopic::Discover { group, slug } => {
                let url = join_url(&self.base_url, "interests/discover");
                let groups: Vec<DiscoverGroup> =
                    crate::ingest::get_json(&self.client, &url).await?;
                find_discover_id(&groups, group, slug)
            }
        }
    }

    async fn fetch_event(&self, event_id: &str) -> Result<NewsStoryItem> {
        let url = join_url(&self.base_url, &format!("event/{event_id}"));
        let env: EventEnvelope = crate::ingest::get_json(&self.client, &url).await?;
        Ok(event_to_story(env.event))
    }

    async fn stories_for(&self, topic: &InterestTopic) -> Result<Vec<NewsStoryItem>> {
        let interest_id = self
            .resolve(topic)
            .await
            .with_context(|| format!("resolving interest for {topic:?}"))?;

        let url = join_url(&self.base_url, &format!("interest/{interest_id}/events"));
        let list: EventList = crate::ingest::get_json(&self.client, &url).await?;

        let results = join_all(list.event_ids.iter().map(|id| self.fetch_event(id))).await;

        let mut stories = Vec::with_capacity(results.len());
        for (id, res) in list.event_ids.iter().zip(results) {
            match res {
                Ok(story) => stories.push(story),
                Err(e) => {
                    tracing::warn!(error = ?e, provider = self.name, event = %id, "event detail failed");
                }
            }
        }
        Ok(stories)
    }
}

#[async_trait]
impl SourceProvider for InterestProvider {
    async fn fetch_latest(&self) -> Result<Vec<FeedItem>> {
        let mut all = Vec::new();
        for topic in &self.topics {
            all.extend(self.stories_for(topic).await?);
        }
        all.sort_by_key(|s| s.sources.len());
        Ok(all.into_iter().map(FeedItem::from).collect())
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
