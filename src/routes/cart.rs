use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};

use crate::{
    dto::cart::{AddToCartRequest, CartPage, UpdateCartRequest},
    error::{AppError, AppResult},
    middleware::{auth::AuthUser, session::Session},
    models::{Cart, CartStats},
    response::{ApiResponse, StatusBody},
    services::{cart_service, receipt_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart_page).post(add_to_cart))
        .route("/cart/{product_id}", put(update_cart).delete(delete_cart))
        .route("/pay", post(pay))
}

/// Store `cart` in the session and answer with its totals.
fn reply_with_stats(state: &AppState, mut session: Session, cart: &Cart) -> AppResult<Response> {
    cart_service::store(&mut session, &state.config.cart_key, cart)?;
    let cookie = state.sessions.store(&session)?;
    Ok((cookie, Json(cart_service::stats(cart))).into_response())
}

/// Unreadable bodies get the same `{status}` reply as every other failure here.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

fn status_reply(result: AppResult<Response>) -> Response {
    result.unwrap_or_else(|err| StatusBody::failure(&err))
}

#[utoipa::path(
    get,
    path = "/cart",
    responses(
        (status = 200, description = "Cart contents and totals", body = ApiResponse<CartPage>)
    ),
    tag = "Cart"
)]
pub async fn cart_page(
    State(state): State<AppState>,
    session: Session,
) -> Json<ApiResponse<CartPage>> {
    let cart = cart_service::load(&session, &state.config.cart_key);
    let stats = cart_service::stats(&cart);
    Json(ApiResponse::success("Cart", CartPage { cart, stats }, None))
}

#[utoipa::path(
    post,
    path = "/cart",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Product added, new totals", body = CartStats),
        (status = 400, description = "Malformed body", body = StatusBody)
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<AddToCartRequest>, JsonRejection>,
) -> Response {
    status_reply(json_body(payload).and_then(|payload| {
        let cart = cart_service::load(&session, &state.config.cart_key);
        let cart = cart_service::add(cart, &payload.id.as_key(), &payload.name, payload.price);
        reply_with_stats(&state, session, &cart)
    }))
}

#[utoipa::path(
    put,
    path = "/cart/{product_id}",
    params(
        ("product_id" = String, Path, description = "Product ID")
    ),
    request_body = UpdateCartRequest,
    responses(
        (status = 200, description = "Quantity changed, new totals", body = CartStats),
        (status = 400, description = "Quantity is not a number", body = StatusBody)
    ),
    tag = "Cart"
)]
pub async fn update_cart(
    State(state): State<AppState>,
    session: Session,
    Path(product_id): Path<String>,
    payload: Result<Json<UpdateCartRequest>, JsonRejection>,
) -> Response {
    status_reply(json_body(payload).and_then(|payload| {
        let quantity = payload
            .quantity
            .as_i64()
            .ok_or_else(|| AppError::BadRequest("quantity must be an integer".into()))?;
        let cart = cart_service::load(&session, &state.config.cart_key);
        let cart = cart_service::update(cart, &product_id, quantity);
        reply_with_stats(&state, session, &cart)
    }))
}

#[utoipa::path(
    delete,
    path = "/cart/{product_id}",
    params(
        ("product_id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Entry removed (if present), new totals", body = CartStats)
    ),
    tag = "Cart"
)]
pub async fn delete_cart(
    State(state): State<AppState>,
    session: Session,
    Path(product_id): Path<String>,
) -> Response {
    let cart = cart_service::load(&session, &state.config.cart_key);
    let cart = cart_service::delete(cart, &product_id);
    status_reply(reply_with_stats(&state, session, &cart))
}

/// Checkout. The cart leaves the session only once its receipt is stored.
#[utoipa::path(
    post,
    path = "/pay",
    responses(
        (status = 200, description = "Receipt stored, or nothing to pay", body = StatusBody),
        (status = 400, description = "Cart holds an invalid entry", body = StatusBody),
        (status = 401, description = "Not logged in"),
        (status = 500, description = "Receipt could not be stored", body = StatusBody)
    ),
    tag = "Cart"
)]
pub async fn pay(
    State(state): State<AppState>,
    user: AuthUser,
    mut session: Session,
) -> Response {
    let key = state.config.cart_key.as_str();
    let cart = cart_service::load(&session, key);

    match receipt_service::save_receipt(&state, &user, &cart).await {
        Ok(None) => Json(StatusBody::ok()).into_response(),
        Ok(Some(_)) => {
            session.remove(key);
            match state.sessions.store(&session) {
                Ok(cookie) => (cookie, Json(StatusBody::ok())).into_response(),
                Err(err) => StatusBody::failure(&err),
            }
        }
        Err(err) => StatusBody::failure(&err),
    }
}
