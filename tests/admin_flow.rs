mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use bookstore::{
    dto::admin::{CreateProductRequest, TagRequest, UpdateProductRequest},
    entity::users::UserRole,
    error::AppError,
    middleware::auth::AuthUser,
    models::Cart,
    services::{admin_service, cart_service, receipt_service, stats_service},
};
use axum::body::to_bytes;
use chrono::{Duration, Local};
use serde_json::json;

fn admin(app: &common::TestApp) -> AuthUser {
    AuthUser {
        user_id: app.seed.admin_id,
        role: UserRole::Admin,
    }
}

#[tokio::test]
async fn back_office_is_admin_only() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let user_id = app.create_customer("shopper").await?;

    let response = app.send(Request::get("/admin").body(Body::empty())?).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let cookie = app.cookie(&common::logged_in(user_id, UserRole::User));
    let response = app
        .send(
            Request::get("/admin/categories")
                .header(header::COOKIE, cookie)
                .body(Body::empty())?,
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn dashboard_counts_products_per_category() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let cookie = app.cookie(&common::logged_in(app.seed.admin_id, UserRole::Admin));

    let response = app
        .send(
            Request::get("/admin")
                .header(header::COOKIE, cookie.clone())
                .body(Body::empty())?,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::json_body(response).await;
    let counts: Vec<i64> = body["data"]["stats"]
        .as_array()
        .expect("stats")
        .iter()
        .filter_map(|row| row["product_count"].as_i64())
        .collect();
    assert_eq!(counts, vec![3, 3, 3, 4]);

    let response = app
        .send(
            Request::get("/admin/views")
                .header(header::COOKIE, cookie)
                .body(Body::empty())?,
        )
        .await;
    let body = common::json_body(response).await;
    assert_eq!(body["data"][2]["name"], "Sách");
    assert_eq!(body["data"][2]["excluded_columns"], json!(["image"]));
    assert_eq!(body["data"][2]["can_export"], true);
    assert_eq!(body["data"][0]["can_export"], false);
    Ok(())
}

#[tokio::test]
async fn revenue_follows_receipts() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let user_id = app.create_customer("buyer").await?;
    let buyer = AuthUser {
        user_id,
        role: UserRole::User,
    };

    let cart = cart_service::add(Cart::default(), "1", "Đắc Nhân Tâm", 90000);
    let cart = cart_service::add(cart, "1", "Đắc Nhân Tâm", 90000);
    let cart = cart_service::add(cart, "2", "Atomic Habits", 110000);
    receipt_service::save_receipt(&app.state, &buyer, &cart)
        .await?
        .expect("receipt");

    let stats = stats_service::stats_revenue(&app.state, None, None, None).await?;
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].product_id, 1);
    assert_eq!(stats[0].revenue, 180000);
    assert_eq!(stats[1].revenue, 110000);

    let stats = stats_service::stats_revenue(&app.state, Some("Atomic"), None, None).await?;
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].product_id, 2);

    let today = Local::now().date_naive();
    let stats = stats_service::stats_revenue(&app.state, None, Some(today), Some(today)).await?;
    assert_eq!(stats.len(), 2);

    let tomorrow = today + Duration::days(1);
    let stats = stats_service::stats_revenue(&app.state, None, Some(tomorrow), None).await?;
    assert!(stats.is_empty());

    let err = stats_service::stats_revenue(&app.state, None, Some(tomorrow), Some(today))
        .await
        .expect_err("inverted range");
    assert!(matches!(err, AppError::BadRequest(_)));

    let cookie = app.cookie(&common::logged_in(app.seed.admin_id, UserRole::Admin));
    let response = app
        .send(
            Request::get("/admin/stats?kw=&from_date=&to_date=")
                .header(header::COOKIE, cookie)
                .body(Body::empty())?,
        )
        .await;
    let body = common::json_body(response).await;
    assert_eq!(body["data"]["total"], 290000);
    Ok(())
}

#[tokio::test]
async fn product_crud_keeps_tags_in_sync() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let admin = admin(&app);

    let classic = admin_service::create_tag(&app.state, &admin, TagRequest { name: "Kinh điển".into() })
        .await?
        .data
        .expect("tag");
    let err = admin_service::create_tag(&app.state, &admin, TagRequest { name: "Kinh điển".into() })
        .await
        .expect_err("duplicate tag");
    assert!(matches!(err, AppError::Conflict(_)));

    let created = admin_service::create_product(
        &app.state,
        &admin,
        CreateProductRequest {
            name: "Nhà Giả Kim".into(),
            author: Some("Paulo Coelho".into()),
            price: 79000,
            image: None,
            active: None,
            category_id: 3,
            tag_ids: vec![classic.id],
        },
    )
    .await?
    .data
    .expect("product");
    assert!(created.product.active);
    assert_eq!(created.tags.len(), 1);

    let updated = admin_service::update_product(
        &app.state,
        &admin,
        created.product.id,
        UpdateProductRequest {
            price: Some(85000),
            tag_ids: Some(vec![]),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("product");
    assert_eq!(updated.product.price, 85000);
    assert_eq!(updated.product.name, "Nhà Giả Kim");
    assert!(updated.tags.is_empty());

    let err = admin_service::update_product(
        &app.state,
        &admin,
        created.product.id,
        UpdateProductRequest {
            category_id: Some(999),
            ..Default::default()
        },
    )
    .await
    .expect_err("unknown category");
    assert!(matches!(err, AppError::BadRequest(_)));

    admin_service::delete_product(&app.state, &admin, created.product.id).await?;
    let err = admin_service::get_product(&app.state, &admin, created.product.id)
        .await
        .expect_err("deleted");
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[tokio::test]
async fn categories_with_products_cannot_be_deleted() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let cookie = app.cookie(&common::logged_in(app.seed.admin_id, UserRole::Admin));

    let response = app
        .send(
            Request::delete("/admin/categories/1")
                .header(header::COOKIE, cookie.clone())
                .body(Body::empty())?,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .send(
            Request::post("/admin/categories")
                .header(header::COOKIE, cookie.clone())
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"name": "Thiếu Nhi"}).to_string()))?,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::json_body(response).await;
    let id = body["data"]["id"].as_i64().expect("id");

    let response = app
        .send(
            Request::delete(format!("/admin/categories/{id}"))
                .header(header::COOKIE, cookie)
                .body(Body::empty())?,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn sold_products_cannot_be_deleted() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let admin = admin(&app);
    let cart = cart_service::add(Cart::default(), "5", "Súng, Vi trùng và Thép", 79000);
    receipt_service::save_receipt(&app.state, &admin, &cart).await?;

    let err = admin_service::delete_product(&app.state, &admin, 5)
        .await
        .expect_err("sold");
    assert!(matches!(err, AppError::BadRequest(_)));
    Ok(())
}

#[tokio::test]
async fn product_export_honours_filters() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let cookie = app.cookie(&common::logged_in(app.seed.admin_id, UserRole::Admin));

    let response = app
        .send(
            Request::get("/admin/products/export?q=Harari&min_price=&max_price=200000")
                .header(header::COOKIE, cookie.clone())
                .body(Body::empty())?,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let text = String::from_utf8(bytes.to_vec())?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "id,name,author,price,active,category_id");
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], "3,21 Bài Học Cho Thế Kỷ 21,Yuval Noah Harari,120000,true,1");
    assert!(!text.contains("cloudinary"));

    let response = app
        .send(
            Request::get("/admin/products/export?min_price=999999")
                .header(header::COOKIE, cookie)
                .body(Body::empty())?,
        )
        .await;
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(String::from_utf8(bytes.to_vec())?.lines().count(), 1);

    let user_id = app.create_customer("shopper").await?;
    let response = app
        .send(
            Request::get("/admin/products/export")
                .header(header::COOKIE, app.cookie(&common::logged_in(user_id, UserRole::User)))
                .body(Body::empty())?,
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    Ok(())
}
