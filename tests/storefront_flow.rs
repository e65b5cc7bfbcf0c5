mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use bookstore::{
    entity::{
        receipt::Entity as Receipts, receipt_details::Entity as ReceiptDetails, users::UserRole,
    },
    models::Cart,
    services::cart_service,
};
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait};
use serde_json::json;

fn cart_of(lines: &[(&str, &str, i64)]) -> Cart {
    lines.iter().fold(Cart::default(), |cart, (id, name, price)| {
        cart_service::add(cart, id, name, *price)
    })
}

#[tokio::test]
async fn catalog_filters_by_keyword_and_category() -> anyhow::Result<()> {
    let app = common::setup().await?;

    let response = app
        .send(Request::get("/?keyword=Atomic").body(Body::empty())?)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::json_body(response).await;
    let products = body["data"]["products"].as_array().expect("products");
    assert_eq!(products.len(), 1);
    assert_eq!(
        products[0]["name"],
        "Atomic Habits - Thay Đổi Tí Hon, Hiệu Quả Bất Ngờ"
    );
    assert_eq!(body["data"]["categories"].as_array().map(Vec::len), Some(4));

    let response = app
        .send(Request::get("/?category_id=1&page=").body(Body::empty())?)
        .await;
    let body = common::json_body(response).await;
    assert_eq!(body["data"]["products"].as_array().map(Vec::len), Some(3));
    assert_eq!(body["meta"]["total"], 3);
    Ok(())
}

#[tokio::test]
async fn product_details_include_category() -> anyhow::Result<()> {
    let app = common::setup().await?;

    let response = app
        .send(Request::get("/details/1").body(Body::empty())?)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::json_body(response).await;
    assert_eq!(body["data"]["product"]["name"], "Đắc Nhân Tâm");
    assert_eq!(body["data"]["category"]["name"], "Sách Bán Chạy");

    let response = app
        .send(Request::get("/details/999").body(Body::empty())?)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn cart_changes_travel_in_the_session_cookie() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let add = json!({"id": 1, "name": "Đắc Nhân Tâm", "price": 90000}).to_string();

    let response = app
        .send(
            Request::post("/cart")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(add.clone()))?,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let session = app.session_from(&response).expect("session cookie");
    let body = common::json_body(response).await;
    assert_eq!(body, json!({"total_quantity": 1, "total_amount": 90000}));

    let response = app
        .send(
            Request::post("/cart")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::COOKIE, app.cookie(&session))
                .body(Body::from(add))?,
        )
        .await;
    let session = app.session_from(&response).expect("session cookie");
    let body = common::json_body(response).await;
    assert_eq!(body, json!({"total_quantity": 2, "total_amount": 180000}));

    let response = app
        .send(
            Request::put("/cart/1")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::COOKIE, app.cookie(&session))
                .body(Body::from(json!({"quantity": "5"}).to_string()))?,
        )
        .await;
    let session = app.session_from(&response).expect("session cookie");
    let body = common::json_body(response).await;
    assert_eq!(body["total_quantity"], 5);
    assert_eq!(body["total_amount"], 450000);

    let response = app
        .send(
            Request::put("/cart/1")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::COOKIE, app.cookie(&session))
                .body(Body::from(json!({"quantity": "abc"}).to_string()))?,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let response = app
        .send(
            Request::delete("/cart/1")
                .header(header::COOKIE, app.cookie(&session))
                .body(Body::empty())?,
        )
        .await;
    let body = common::json_body(response).await;
    assert_eq!(body, json!({"total_quantity": 0, "total_amount": 0}));
    Ok(())
}

#[tokio::test]
async fn cart_page_shows_session_cart() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let mut session = bookstore::middleware::session::Session::default();
    cart_service::store(&mut session, "cart", &cart_of(&[("3", "21 Bài Học", 120000)]))?;

    let response = app
        .send(
            Request::get("/cart")
                .header(header::COOKIE, app.cookie(&session))
                .body(Body::empty())?,
        )
        .await;
    let body = common::json_body(response).await;
    assert_eq!(body["data"]["cart"]["3"]["quantity"], 1);
    assert_eq!(body["data"]["stats"]["total_amount"], 120000);
    Ok(())
}

#[tokio::test]
async fn checkout_requires_login() -> anyhow::Result<()> {
    let app = common::setup().await?;

    let response = app.send(Request::post("/pay").body(Body::empty())?).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn empty_cart_checkout_writes_nothing() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let user_id = app.create_customer("buyer").await?;
    let session = common::logged_in(user_id, UserRole::User);

    let response = app
        .send(
            Request::post("/pay")
                .header(header::COOKIE, app.cookie(&session))
                .body(Body::empty())?,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::json_body(response).await, json!({"status": 200}));
    assert_eq!(Receipts::find().count(&app.state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn checkout_stores_receipt_and_clears_cart() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let user_id = app.create_customer("buyer").await?;
    let mut session = common::logged_in(user_id, UserRole::User);
    let cart = cart_of(&[("1", "Đắc Nhân Tâm", 90000), ("1", "Đắc Nhân Tâm", 90000)]);
    cart_service::store(&mut session, "cart", &cart)?;

    let response = app
        .send(
            Request::post("/pay")
                .header(header::COOKIE, app.cookie(&session))
                .body(Body::empty())?,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let after = app.session_from(&response).expect("session cookie");
    assert!(!after.contains("cart"));
    assert_eq!(after.user().map(|u| u.user_id), Some(user_id));
    assert_eq!(common::json_body(response).await, json!({"status": 200}));

    let receipts = Receipts::find().all(&app.state.orm).await?;
    assert_eq!(receipts.len(), 1);
    assert_eq!(receipts[0].user_id, user_id);

    let details = ReceiptDetails::find().all(&app.state.orm).await?;
    assert_eq!(details.len(), 1);
    assert_eq!(details[0].receipt_id, receipts[0].id);
    assert_eq!(details[0].product_id, 1);
    assert_eq!(details[0].quantity, 2);
    assert_eq!(details[0].price, 90000);
    Ok(())
}

#[tokio::test]
async fn invalid_quantity_aborts_checkout() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let user_id = app.create_customer("buyer").await?;
    let mut session = common::logged_in(user_id, UserRole::User);
    let cart = cart_service::update(cart_of(&[("1", "Đắc Nhân Tâm", 90000)]), "1", 0);
    cart_service::store(&mut session, "cart", &cart)?;

    let response = app
        .send(
            Request::post("/pay")
                .header(header::COOKIE, app.cookie(&session))
                .body(Body::empty())?,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(common::json_body(response).await, json!({"status": 400}));
    assert_eq!(Receipts::find().count(&app.state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn unknown_product_rolls_back_checkout() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let user_id = app.create_customer("buyer").await?;
    let mut session = common::logged_in(user_id, UserRole::User);
    let cart = cart_of(&[("1", "Đắc Nhân Tâm", 90000), ("999", "ghost", 1)]);
    cart_service::store(&mut session, "cart", &cart)?;

    let response = app
        .send(
            Request::post("/pay")
                .header(header::COOKIE, app.cookie(&session))
                .body(Body::empty())?,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(Receipts::find().count(&app.state.orm).await?, 0);
    assert_eq!(ReceiptDetails::find().count(&app.state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn storage_failure_at_checkout_keeps_the_cart() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let user_id = app.create_customer("buyer").await?;
    let mut session = common::logged_in(user_id, UserRole::User);
    cart_service::store(&mut session, "cart", &cart_of(&[("1", "Đắc Nhân Tâm", 90000)]))?;
    app.state
        .orm
        .execute_unprepared("DROP TABLE receipt_details")
        .await?;

    let response = app
        .send(
            Request::post("/pay")
                .header(header::COOKIE, app.cookie(&session))
                .body(Body::empty())?,
        )
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(common::json_body(response).await, json!({"status": 500}));
    assert_eq!(Receipts::find().count(&app.state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn malformed_cart_bodies_get_status_replies() -> anyhow::Result<()> {
    let app = common::setup().await?;

    let response = app
        .send(
            Request::post("/cart")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))?,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(common::json_body(response).await, json!({"status": 400}));

    let response = app
        .send(
            Request::put("/cart/1")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"qty": 3}).to_string()))?,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(common::json_body(response).await, json!({"status": 400}));
    Ok(())
}

#[tokio::test]
async fn huge_numbers_do_not_break_cart_or_catalog() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let mut session = bookstore::middleware::session::Session::default();
    cart_service::store(&mut session, "cart", &cart_of(&[("1", "Đắc Nhân Tâm", 90000)]))?;

    let response = app
        .send(
            Request::put("/cart/1")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::COOKIE, app.cookie(&session))
                .body(Body::from(json!({"quantity": i64::MAX}).to_string()))?,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let session = app.session_from(&response).expect("session cookie");
    let body = common::json_body(response).await;
    assert_eq!(body["total_amount"], i64::MAX);

    let response = app
        .send(
            Request::post("/cart")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::COOKIE, app.cookie(&session))
                .body(Body::from(
                    json!({"id": 1, "name": "Đắc Nhân Tâm", "price": 90000}).to_string(),
                ))?,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::json_body(response).await["total_quantity"], i64::MAX);

    let response = app
        .send(Request::get(format!("/?page={}", i64::MAX)).body(Body::empty())?)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::json_body(response).await;
    assert_eq!(body["data"]["products"].as_array().map(Vec::len), Some(0));
    Ok(())
}
