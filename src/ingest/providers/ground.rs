// src/ingest/providers/ground.rs
//! Wire shapes shared by the Ground News providers.

use serde::Deserialize;

use crate::ingest::normalize_text;
use crate::ingest::types::{FactualityTier, SourceInfo};

pub const DEFAULT_GROUND_NEWS_BASE: &str = "https://web-api-cdn.ground.news/api/public";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawSource {
    #[serde(default)]
    pub source_id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub source_info: RawSourceInfo,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawSourceInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub factuality: Option<String>,
}

impl From<RawSource> for SourceInfo {
    fn from(s: RawSource) -> Self {
        SourceInfo {
            name: normalize_text(&s.source_info.name),
            factuality: FactualityTier::from_label(s.source_info.factuality.as_deref()),
            source_id: s.source_id,
            url: s.url,
        }
    }
}

pub(crate) fn to_sources(raw: Vec<RawSource>) -> Vec<SourceInfo> {
    raw.into_iter().map(SourceInfo::from).collect()
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
