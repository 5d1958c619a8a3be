use super::*;
use async_trait::async_trait;
use serde_json::json;
use storage::{InMemoryEventStore, StoredEvent};

fn setup() -> ApiContext {
    ApiContext::new(Arc::new(InMemoryEventStore::new()))
}

struct BrokenStore;

#[async_trait]
impl EventStore for BrokenStore {
    async fn put(&self, _body: Value) -> anyhow::Result<StoredEvent> {
        Err(anyhow::anyhow!("disk on fire"))
    }

    async fn latest(&self) -> anyhow::Result<Option<StoredEvent>> {
        Err(anyhow::anyhow!("disk on fire"))
    }

    async fn clear(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn create_echoes_body_with_saved_message() {
    let ctx = setup();
    let body = json!({ "eventName": "summer-fest", "timeZone": "Eastern" });
    let response = create_event(&ctx, body.clone()).await.expect("create");
    assert_eq!(response.message, "Event data saved successfully");
    assert_eq!(response.event_data, body);
}

#[tokio::test]
async fn read_before_any_create_is_empty() {
    let ctx = setup();
    assert!(read_event(&ctx).await.expect("read").is_none());
}

#[tokio::test]
async fn create_then_read_round_trips_exact_record() {
    let ctx = setup();
    let body = json!({ "eventName": "summer-fest", "description": "A fun outdoor festival" });
    create_event(&ctx, body.clone()).await.expect("create");
    assert_eq!(read_event(&ctx).await.expect("read"), Some(body));
}

#[tokio::test]
async fn create_accepts_bodies_without_any_schema() {
    let ctx = setup();
    let body = json!([1, "two", null]);
    let response = create_event(&ctx, body.clone()).await.expect("create");
    assert_eq!(response.event_data, body);
}

#[tokio::test]
async fn back_to_back_creates_keep_only_the_second() {
    let ctx = setup();
    create_event(&ctx, json!({ "eventName": "first" }))
        .await
        .expect("first");
    create_event(&ctx, json!({ "eventName": "second" }))
        .await
        .expect("second");
    assert_eq!(
        read_event(&ctx).await.expect("read"),
        Some(json!({ "eventName": "second" }))
    );
}

#[tokio::test]
async fn store_failures_map_to_internal_errors() {
    let ctx = ApiContext::new(Arc::new(BrokenStore));
    let err = create_event(&ctx, json!({})).await.expect_err("should fail");
    assert_eq!(err.code, ErrorCode::Internal);
    let err = read_event(&ctx).await.expect_err("should fail");
    assert!(err.message.contains("disk on fire"));
}

#[test]
fn allow_header_lists_get_and_post() {
    assert_eq!(allow_header_value(), "GET, POST");
}
