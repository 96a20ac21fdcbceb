mod common;

use axum::{extract::State, http::StatusCode};
use product_catalog::routes::health::health_check;

use common::{TestApp, body_json};

#[tokio::test]
async fn health_check_returns_ok() -> anyhow::Result<()> {
    let app = TestApp::new().await?;

    let response = health_check(State(app.state.clone())).await;
    assert_eq!(response.0.message, "Health check");

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "ok");
    assert_eq!(data.database, "up");
    Ok(())
}

#[tokio::test]
async fn unknown_route_returns_not_found_message() -> anyhow::Result<()> {
    let app = TestApp::new().await?;

    let response = app.get("/nope").await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await?["message"], "Not Found");
    Ok(())
}

#[tokio::test]
async fn client_page_is_served_at_root() -> anyhow::Result<()> {
    let app = TestApp::new().await?;

    let response = app.get("/").await?;
    assert_eq!(response.status(), StatusCode::OK);
    let html = String::from_utf8(common::body_bytes(response).await?)?;
    assert!(html.contains("/api/products"));
    Ok(())
}
