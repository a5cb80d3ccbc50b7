// tests/providers_http.rs
//
// Fetchers against a mocked upstream (wiremock). No real network.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use swipe_feed::ingest::providers::arxiv::ArxivProvider;
use swipe_feed::ingest::providers::briefing::BriefingProvider;
use swipe_feed::ingest::providers::interest::{InterestProvider, InterestTopic};
use swipe_feed::ingest::providers::summaries::SummaryProvider;
use swipe_feed::quality::SourcePolicy;
use swipe_feed::{FactualityTier, FeedItem, SourceProvider};

fn source(id: &str, tier: &str) -> serde_json::Value {
    json!({
        "sourceId": id,
        "url": format!("https://news.example/{id}"),
        "sourceInfo": {"name": id.to_uppercase(), "factuality": tier}
    })
}

fn event(id: &str, sources: Vec<serde_json::Value>) -> serde_json::Value {
    json!({"event": {
        "id": id,
        "title": format!("Event {id}"),
        "description": format!("About {id}"),
        "firstTenSources": sources
    }})
}

async fn mount_json(server: &MockServer, p: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(p))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn story_ids(items: &[FeedItem]) -> Vec<&str> {
    items.iter().map(|i| i.id()).collect()
}

#[tokio::test]
async fn arxiv_merges_categories_newest_first() {
    let server = MockServer::start().await;
    let ro = std::fs::read_to_string("tests/fixtures/arxiv_cs_ro.xml").expect("fixture");
    let oc = std::fs::read_to_string("tests/fixtures/arxiv_math_oc.xml").expect("fixture");

    Mock::given(method("GET"))
        .and(path("/api/query"))
        .and(query_param("search_query", "cat:cs.RO"))
        .and(query_param("max_results", "50"))
        .and(query_param("sortOrder", "descending"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ro))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/query"))
        .and(query_param("search_query", "cat:math.OC"))
        .respond_with(ResponseTemplate::new(200).set_body_string(oc))
        .mount(&server)
        .await;

    let p = ArxivProvider::new(
        reqwest::Client::new(),
        format!("{}/api/query", server.uri()),
        vec!["cs.RO".into(), "math.OC".into()],
        50,
    );
    let items = p.fetch_latest().await.expect("arxiv ok");

    assert_eq!(
        story_ids(&items),
        vec![
            "http://arxiv.org/abs/2405.00003v1",
            "http://arxiv.org/abs/2405.00010v1",
            "http://arxiv.org/abs/2405.00002v1",
            "http://arxiv.org/abs/2405.00001v2",
        ]
    );
    match &items[0] {
        FeedItem::Paper(paper) => {
            assert_eq!(paper.title, "Legged Locomotion over Deformable Terrain");
            assert_eq!(
                paper.content,
                "We study quadruped gaits on sand and snow. Results show a 12% energy reduction."
            );
            assert_eq!(paper.authors, vec!["Maria Keller", "Jun Sato"]);
            assert!(paper.date.ends_with("ago"), "date was {}", paper.date);
        }
        other => panic!("expected paper, got {other:?}"),
    }
}

#[tokio::test]
async fn arxiv_fails_when_a_category_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/query"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let p = ArxivProvider::new(
        reqwest::Client::new(),
        format!("{}/api/query", server.uri()),
        vec!["cs.RO".into()],
        50,
    );
    assert!(p.fetch_latest().await.is_err());
}

#[tokio::test]
async fn summaries_flatten_with_synthesized_links() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/summaries",
        json!({"grp": {"a1": {"title": "Robots  learn", "content": "Body"}}}),
    )
    .await;

    let p = SummaryProvider::new(
        reqwest::Client::new(),
        format!("{}/summaries", server.uri()),
        "AI Summary",
    );
    let items = p.fetch_latest().await.unwrap();
    assert_eq!(story_ids(&items), vec!["grp-Robots learn"]);
}

#[tokio::test]
async fn briefing_applies_configured_policy() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/api/public/vectors/storiesInTodaysBriefing",
        json!({"stories": [{
            "id": "s1",
            "storyTitle": "Headline",
            "summaryOneHeadline": "One",
            "summaryOneText": "Text one",
            "summaryTwoHeadline": "Two",
            "summaryTwoText": "Text two",
            "eventSummary": {"sources": [source("a", "high"), source("b", "high"), source("c", "mixed")]}
        }]}),
    )
    .await;
    let base = format!("{}/api/public", server.uri());

    let fallback = BriefingProvider::new(reqwest::Client::new(), base.clone(), SourcePolicy::Fallback);
    let items = fallback.fetch_latest().await.unwrap();
    let FeedItem::Story(s) = &items[0] else {
        panic!("expected story");
    };
    assert_eq!(s.sources.len(), 2);
    assert!(s.sources.iter().all(|x| x.factuality == FactualityTier::High));
    assert_eq!(s.summary_two_text, "Text two");

    let strict = BriefingProvider::new(reqwest::Client::new(), base, SourcePolicy::VeryHighOnly);
    let items = strict.fetch_latest().await.unwrap();
    let FeedItem::Story(s) = &items[0] else {
        panic!("expected story");
    };
    assert!(s.sources.is_empty());
}

#[tokio::test]
async fn place_interest_chain_sorts_by_source_count_and_skips_broken_events() {
    let server = MockServer::start().await;
    mount_json(&server, "/api/public/place/CA/interest", json!({"interest": {"id": "int-ca"}})).await;
    mount_json(
        &server,
        "/api/public/interest/int-ca/events",
        json!({"eventIds": ["e1", "e2", "e3", "e4"]}),
    )
    .await;
    mount_json(
        &server,
        "/api/public/event/e1",
        event("e1", vec![source("a", "veryHigh"), source("b", "veryHigh"), source("c", "high")]),
    )
    .await;
    mount_json(
        &server,
        "/api/public/event/e2",
        event("e2", vec![source("d", "high"), source("e", "low")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/public/event/e3"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_json(&server, "/api/public/event/e4", event("e4", vec![])).await;

    let p = InterestProvider::new(
        reqwest::Client::new(),
        format!("{}/api/public", server.uri()),
        vec![InterestTopic::place("CA")],
    );
    let items = p.fetch_latest().await.unwrap();

    // e4: 0 sources, e2: 1 (high), e1: 2 (veryHigh); e3 dropped
    assert_eq!(story_ids(&items), vec!["e4", "e2", "e1"]);
    let FeedItem::Story(e2) = &items[1] else {
        panic!("expected story");
    };
    assert_eq!(e2.sources[0].name, "D");
    assert_eq!(e2.story_title, "Event e2");
    assert_eq!(e2.summary_one_text, "About e2");
}

#[tokio::test]
async fn international_resolves_through_discovery() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/api/public/interests/discover",
        json!([
            {"id": "local", "interests": [{"id": "nope", "slug": "international"}]},
            {"id": "popular", "interests": [
                {"id": "int-biz", "slug": "business"},
                {"id": "int-world", "slug": "international"}
            ]}
        ]),
    )
    .await;
    mount_json(&server, "/api/public/interest/int-world/events", json!({"eventIds": ["w1"]})).await;
    mount_json(&server, "/api/public/event/w1", event("w1", vec![source("x", "other")])).await;

    let p = InterestProvider::international(reqwest::Client::new(), format!("{}/api/public", server.uri()));
    assert_eq!(p.name(), "international");
    let items = p.fetch_latest().await.unwrap();
    assert_eq!(story_ids(&items), vec!["w1"]);
}

#[tokio::test]
async fn international_errors_when_slug_missing() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/api/public/interests/discover",
        json!([{"id": "popular", "interests": [{"id": "int-biz", "slug": "business"}]}]),
    )
    .await;

    let p = InterestProvider::international(reqwest::Client::new(), format!("{}/api/public", server.uri()));
    assert!(p.fetch_latest().await.is_err());
}
