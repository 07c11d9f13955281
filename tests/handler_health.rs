mod common;

#[tokio::test]
async fn test_health_is_public_and_healthy() {
    let app = common::spawn_app();

    let response = app.server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["database"]["status"], "ok");
    assert_eq!(body["checks"]["click_queue"]["status"], "ok");
    assert!(body["version"].as_str().is_some());
}
