// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router tests driven with `tower::ServiceExt::oneshot`.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use postcraft_config::PostcraftConfig;
use postcraft_core::types::{InboundEvent, PendingPost, SenderId};
use postcraft_core::{ChannelAdapter, PublisherAdapter};
use postcraft_gateway::{GatewayState, router};
use postcraft_messenger::{sign_payload, sign_request};
use postcraft_test_utils::TestHarness;
use tower::ServiceExt;

const SECRET: &str = "app-secret";

fn config() -> PostcraftConfig {
    let mut config = PostcraftConfig::default();
    config.messenger.verify_token = Some("tok".into());
    config.messenger.app_secret = Some(SECRET.into());
    config.server.public_base_url = Some("https://postcraft.example".into());
    config
}

fn state(h: &TestHarness, config: PostcraftConfig) -> GatewayState {
    GatewayState {
        config: Arc::new(config),
        pipeline: Some(h.pipeline.clone()),
        channel: Some(h.channel.clone() as Arc<dyn ChannelAdapter>),
        publisher: Some(h.publisher.clone() as Arc<dyn PublisherAdapter>),
        store: h.store.clone(),
        start_time: Instant::now(),
    }
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn signed_webhook(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json")
        .header("x-hub-signature-256", sign_payload(SECRET, body.as_bytes()))
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delivery(text: &str) -> String {
    serde_json::json!({
        "object": "page",
        "entry": [{"messaging": [
            {"sender": {"id": "u1"}, "message": {"mid": "m1", "text": text}}
        ]}]
    })
    .to_string()
}

#[tokio::test]
async fn verification_echoes_challenge() {
    let h = TestHarness::new().unwrap();
    let app = router(state(&h, config()));
    let response = app
        .oneshot(
            Request::get("/webhook?hub.mode=subscribe&hub.verify_token=tok&hub.challenge=123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "123");
}

#[tokio::test]
async fn verification_accepts_plain_names_and_rejects_bad_token() {
    let h = TestHarness::new().unwrap();
    let app = router(state(&h, config()));

    let ok = app
        .clone()
        .oneshot(
            Request::get("/webhook?mode=subscribe&verify_token=tok&challenge=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);

    let bad = app
        .oneshot(
            Request::get("/webhook?hub.mode=subscribe&hub.verify_token=nope&hub.challenge=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(bad.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn signed_delivery_is_processed_and_acknowledged() {
    let h = TestHarness::new().unwrap();
    let app = router(state(&h, config()));
    let response = app
        .oneshot(signed_webhook(&delivery("schedule post")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "EVENT_RECEIVED");
    let texts = h.channel.sent_texts().await;
    assert!(texts[0].contains("Scheduling lives in the web app"));
}

#[tokio::test]
async fn bad_signature_is_forbidden_and_nothing_runs() {
    let h = TestHarness::new().unwrap();
    let app = router(state(&h, config()));
    let body = delivery("hello");
    let request = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("x-hub-signature-256", sign_payload("other-secret", body.as_bytes()))
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(h.channel.sent_messages().await.is_empty());
}

#[tokio::test]
async fn non_page_object_is_bad_request() {
    let h = TestHarness::new().unwrap();
    let app = router(state(&h, config()));
    let body = r#"{"object":"user","entry":[]}"#;
    let response = app.oneshot(signed_webhook(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_backend_is_server_error() {
    let h = TestHarness::new().unwrap();
    let mut state = state(&h, config());
    state.pipeline = None;
    let response = router(state)
        .oneshot(signed_webhook(&delivery("hello")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn wrong_method_is_405() {
    let h = TestHarness::new().unwrap();
    let response = router(state(&h, config()))
        .oneshot(Request::put("/webhook").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

async fn seed_user(h: &TestHarness, sender: &str) {
    let id = SenderId::from(sender);
    for text in ["one", "two", "three"] {
        h.store
            .record_inbound(&InboundEvent::text("messenger", id.clone(), text))
            .await
            .unwrap();
    }
    h.store
        .set_pending(&PendingPost::new(id, "draft".into(), None))
        .await
        .unwrap();
}

#[tokio::test]
async fn valid_erasure_deletes_and_returns_code() {
    let h = TestHarness::new().unwrap();
    seed_user(&h, "u1").await;
    let app = router(state(&h, config()));

    let signed = sign_request(
        &serde_json::json!({"algorithm": "HMAC-SHA256", "user_id": "u1", "issued_at": 1700000000}),
        SECRET,
    );
    let request = Request::builder()
        .method("POST")
        .uri("/data-deletion")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(format!("signed_request={signed}")))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let code = json["confirmation_code"].as_str().unwrap().to_string();
    assert!(!code.is_empty());
    assert_eq!(
        json["url"],
        format!("https://postcraft.example/deletion-status?code={code}")
    );

    let memory = h.memory.as_ref().unwrap();
    assert!(memory.events_for(&SenderId::from("u1")).await.is_empty());
    assert!(h.pending("u1").await.is_none());

    let status = app
        .oneshot(
            Request::get(format!("/deletion-status?code={code}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(status.status(), StatusCode::OK);
    let json = body_json(status).await;
    assert_eq!(json["status"], "deleted");
    assert_eq!(json["records_deleted"], 3);
}

#[tokio::test]
async fn invalid_erasure_signature_deletes_nothing() {
    let h = TestHarness::new().unwrap();
    seed_user(&h, "u1").await;
    let app = router(state(&h, config()));

    let forged = sign_request(
        &serde_json::json!({"algorithm": "HMAC-SHA256", "user_id": "u1"}),
        "wrong-secret",
    );
    let response = app
        .oneshot(json_post(
            "/data-deletion",
            serde_json::json!({"signed_request": forged}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let memory = h.memory.as_ref().unwrap();
    assert_eq!(memory.events_for(&SenderId::from("u1")).await.len(), 3);
    assert!(h.pending("u1").await.is_some());
}

#[tokio::test]
async fn unknown_deletion_code_is_not_found() {
    let h = TestHarness::new().unwrap();
    let response = router(state(&h, config()))
        .oneshot(
            Request::get("/deletion-status?code=missing")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn publish_with_data_uri_uploads_image() {
    let h = TestHarness::new().unwrap();
    let response = router(state(&h, config()))
        .oneshot(json_post(
            "/publish",
            serde_json::json!({"text": "Hello page", "imageUrl": "data:image/png;base64,aGVsbG8="}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["postId"], "page_1");

    let calls = h.publisher.calls().await;
    assert_eq!(calls[0].text, "Hello page");
    assert_eq!(calls[0].image.as_ref().unwrap().mime_type, "image/png");
}

#[tokio::test]
async fn publish_failure_reports_vendor_message() {
    let h = TestHarness::new().unwrap();
    h.publisher.set_failure(Some("(#368) Temporarily blocked")).await;
    let response = router(state(&h, config()))
        .oneshot(json_post("/publish", serde_json::json!({"text": "x"})))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "(#368) Temporarily blocked");
}

#[tokio::test]
async fn publish_needs_content() {
    let h = TestHarness::new().unwrap();
    let response = router(state(&h, config()))
        .oneshot(json_post("/publish", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(h.publisher.call_count().await, 0);
}

#[tokio::test]
async fn story_api_returns_inline_media_and_song() {
    let h = TestHarness::new().unwrap();
    h.generator
        .push_text("The owl laughed.\nSong Suggestion: Happy by Pharrell Williams")
        .await;
    let response = router(state(&h, config()))
        .oneshot(json_post(
            "/v1/story",
            serde_json::json!({"sender_id": "web-1", "theme": "funny", "tts": true, "song_suggestion": true}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["intent"], "create_story");
    assert_eq!(json["song_suggestion"], "Happy by Pharrell Williams");
    assert_eq!(json["attachments"].as_array().unwrap().len(), 2);
    assert!(h.pending("web-1").await.is_some());
}

#[tokio::test]
async fn chat_api_classifies_text() {
    let h = TestHarness::new().unwrap();
    let response = router(state(&h, config()))
        .oneshot(json_post("/v1/chat", serde_json::json!({"text": "post now"})))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["intent"], "posting_limits");
}

#[tokio::test]
async fn anonymous_web_clients_get_separate_drafts() {
    let h = TestHarness::new().unwrap();
    let app = router(state(&h, config()));

    let mut ids = Vec::new();
    for prompt in ["a red fox", "a blue whale"] {
        let response = app
            .clone()
            .oneshot(json_post("/v1/image", serde_json::json!({"prompt": prompt})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        ids.push(json["sender_id"].as_str().unwrap().to_string());
    }

    assert_ne!(ids[0], ids[1]);
    assert!(h.pending("web").await.is_none());
    assert_eq!(h.pending(&ids[0]).await.unwrap().text, "a red fox");
    assert_eq!(h.pending(&ids[1]).await.unwrap().text, "a blue whale");
}

#[tokio::test]
async fn given_sender_id_is_echoed() {
    let h = TestHarness::new().unwrap();
    let response = router(state(&h, config()))
        .oneshot(json_post(
            "/v1/chat",
            serde_json::json!({"sender_id": " browser-7 ", "text": "post now"}),
        ))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["sender_id"], "browser-7");
}

#[tokio::test]
async fn empty_image_prompt_is_bad_request() {
    let h = TestHarness::new().unwrap();
    let response = router(state(&h, config()))
        .oneshot(json_post("/v1/image", serde_json::json!({"prompt": "  "})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_missing_settings() {
    let h = TestHarness::new().unwrap();
    let response = router(state(&h, config()))
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert!(json["missing"]
        .as_array()
        .unwrap()
        .iter()
        .any(|v| *v == "gemini.api_key"));
}
