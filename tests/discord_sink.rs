// tests/discord_sink.rs
use spotbot::notify::{DiscordSink, Sink};
use spotbot::BotError;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn posts_message_with_bot_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/channels/100/messages"))
        .and(header("authorization", "Bot secret"))
        .and(body_json(serde_json::json!({ "content": "K6POTA at K-1234" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let sink = DiscordSink::new("secret".into()).with_api_base(server.uri());
    sink.send("100", "K6POTA at K-1234").await.unwrap();
}

#[tokio::test]
async fn rejected_message_is_delivery_error_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let sink = DiscordSink::new("secret".into()).with_api_base(server.uri());
    let err = sink.send("100", "hello").await.unwrap_err();
    assert!(matches!(err, BotError::SinkDelivery { ref channel, .. } if channel == "100"));
}
