//! # Source Quality
//!
//! Filters a story's sources by factuality tier.
//!
//! - `filter_sources`: graceful three-tier fallback. Keep `veryHigh`; if none,
//!   keep `high`; if still none, keep everything. Never empties a non-empty list.
//! - `filter_very_high`: strict variant, may return an empty list.
//!
//! `SourcePolicy` selects one of the two per fetcher.

use serde::{Deserialize, Serialize};

use crate::ingest::types::{FactualityTier, SourceInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourcePolicy {
    /// Only `veryHigh` sources survive, even if that leaves none.
    VeryHighOnly,
    /// Three-tier fallback (`veryHigh` → `high` → all).
    #[default]
    Fallback,
}

impl SourcePolicy {
    pub fn apply(self, sources: Vec<SourceInfo>) -> Vec<SourceInfo> {
        match self {
            SourcePolicy::VeryHighOnly => filter_very_high(sources),
            SourcePolicy::Fallback => filter_sources(sources),
        }
    }
}

fn keep_tier(sources: &[SourceInfo], tier: FactualityTier) -> Vec<SourceInfo> {
    sources
        .iter()
        .filter(|s| s.factuality == tier)
        .cloned()
        .collect()
}

pub fn filter_sources(sources: Vec<SourceInfo>) -> Vec<SourceInfo> {
    for tier in [FactualityTier::VeryHigh, FactualityTier::High] {
        let kept = keep_tier(&sources, tier);
        if !kept.is_empty() {
            return kept;
        }
    }
    sources
}

pub fn filter_very_high(sources: Vec<SourceInfo>) -> Vec<SourceInfo> {
    sources
        .into_iter()
        .filter(|s| s.factuality == FactualityTier::VeryHigh)
        .collect()
}
