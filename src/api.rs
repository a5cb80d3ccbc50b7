use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::engine::FeedEngine;
use crate::ingest::types::FeedItem;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<FeedEngine>,
}

impl AppState {
    pub fn new(engine: Arc<FeedEngine>) -> Self {
        Self { engine }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/feed", get(feed))
        .route("/status", get(status))
        .route("/refresh", post(refresh))
        .route("/scroll", post(scroll))
        .route("/seen", post(mark_seen))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
struct FeedResp {
    loading: bool,
    refreshing: bool,
    generation: u64,
    items: Vec<FeedItem>,
}

async fn feed(State(state): State<AppState>) -> Json<FeedResp> {
    let snap = state.engine.snapshot();
    Json(FeedResp {
        loading: state.engine.is_loading(),
        refreshing: state.engine.is_refreshing(),
        generation: snap.generation,
        items: snap.items.clone(),
    })
}

#[derive(serde::Serialize)]
struct StatusResp {
    loading: bool,
    refreshing: bool,
    generation: u64,
    item_count: usize,
    seen_count: usize,
}

async fn status(State(state): State<AppState>) -> Json<StatusResp> {
    let snap = state.engine.snapshot();
    Json(StatusResp {
        loading: state.engine.is_loading(),
        refreshing: state.engine.is_refreshing(),
        generation: snap.generation,
        item_count: snap.items.len(),
        seen_count: state.engine.seen_count(),
    })
}

#[derive(serde::Serialize)]
struct RefreshResp {
    generation: u64,
    item_count: usize,
}

async fn refresh(State(state): State<AppState>) -> Json<RefreshResp> {
    let snap = state.engine.refresh().await;
    Json(RefreshResp {
        generation: snap.generation,
        item_count: snap.items.len(),
    })
}

#[derive(serde::Deserialize)]
struct ScrollReq {
    index: usize,
}

#[derive(serde::Serialize)]
struct ScrollResp {
    swiped: Option<String>,
}

async fn scroll(State(state): State<AppState>, Json(body): Json<ScrollReq>) -> Json<ScrollResp> {
    let swiped = state.engine.scroll_settled(body.index).await;
    Json(ScrollResp { swiped })
}

#[derive(serde::Deserialize)]
struct SeenReq {
    id: String,
}

#[derive(serde::Serialize)]
struct SeenResp {
    inserted: bool,
}

async fn mark_seen(State(state): State<AppState>, Json(body): Json<SeenReq>) -> Json<SeenResp> {
    let inserted = state.engine.mark_seen(&body.id).await;
    Json(SeenResp { inserted })
}
