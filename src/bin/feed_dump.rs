// src/bin/feed_dump.rs
// One-shot load: prints the merged feed the way the card UI would page through it.
use swipe_feed::config::FeedConfig;
use swipe_feed::{FeedEngine, FeedItem};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .compact()
        .init();

    let cfg = FeedConfig::load_default()?;
    let engine = FeedEngine::from_config(&cfg).await?;
    let snap = engine.load().await;

    for (i, item) in snap.items.iter().enumerate() {
        match item {
            FeedItem::Paper(p) => {
                let date = if p.date.is_empty() { "-" } else { p.date.as_str() };
                println!("{i:>3} [paper] {} ({date}) {}", p.title, p.authors.join(", "));
            }
            FeedItem::Story(s) => {
                println!("{i:>3} [story] {} ({} sources)", s.story_title, s.sources.len());
            }
        }
    }
    println!(
        "{} items, generation {}, {} already seen",
        snap.items.len(),
        snap.generation,
        engine.seen_count()
    );
    Ok(())
}
