mod common;

use axum::{body::Body, http::{Request, StatusCode}};

#[tokio::test]
async fn health_check_reports_database() -> anyhow::Result<()> {
    let app = common::setup().await?;

    let response = app
        .send(Request::get("/health").body(Body::empty())?)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::json_body(response).await;
    assert_eq!(body["message"], "Health check");
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], "up");
    Ok(())
}
