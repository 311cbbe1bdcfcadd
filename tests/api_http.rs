// tests/api_http.rs
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use spotbot::ingest::peaks::PeakParkMap;
use spotbot::ingest::roster::RosterHandle;
use spotbot::ingest::types::SpotProvider;
use spotbot::ingest::Feeds;
use spotbot::notify::RecordingSink;
use spotbot::{create_router, BotState, Channels, RateLimiter, Sink, Source, Spot, SpotCache};
use tower::ServiceExt; // for `oneshot`

struct EmptyFeed(Source);

#[async_trait::async_trait]
impl SpotProvider for EmptyFeed {
    async fn fetch_latest(&self) -> spotbot::Result<Vec<Spot>> {
        Ok(vec![])
    }

    fn source(&self) -> Source {
        self.0
    }
}

fn test_state(sink: Arc<RecordingSink>) -> BotState {
    BotState {
        feeds: Arc::new(Feeds::new(
            Box::new(EmptyFeed(Source::Pota)),
            Box::new(EmptyFeed(Source::Sota)),
        )),
        limiter: Arc::new(RateLimiter::new(60)),
        cache: Arc::new(SpotCache::new()),
        sink: sink as Arc<dyn Sink>,
        roster: RosterHandle::new(["K6POTA"]),
        peaks: Arc::new(PeakParkMap::empty()),
        channels: Channels {
            pota: "100".into(),
            sota: "200".into(),
        },
        bot_user_id: "42".into(),
    }
}

async fn body_text(resp: axum::response::Response) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn health_ok() {
    let app = create_router(test_state(Arc::new(RecordingSink::new())));
    let resp = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "ok");
}

#[tokio::test]
async fn message_event_gets_reply_in_same_channel() {
    let sink = Arc::new(RecordingSink::new());
    let app = create_router(test_state(sink.clone()));

    let req = Request::builder()
        .method("POST")
        .uri("/events/message")
        .header("content-type", "application/json")
        .body(Body::from(
            r#"{"channel_id":"200","author_id":"7","mentions":["42"],"content":"<@42> n6ham"}"#,
        ))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("\"replied\":true"));

    assert_eq!(
        sink.messages(),
        vec![("200".to_string(), "No recent spots found for N6HAM.".to_string())]
    );
}

#[tokio::test]
async fn lookup_route_returns_reply_text() {
    let app = create_router(test_state(Arc::new(RecordingSink::new())));
    let resp = app
        .oneshot(Request::get("/lookup/w6sota").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "No recent spots found for W6SOTA.");
}
