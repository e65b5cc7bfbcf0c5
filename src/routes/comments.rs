use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{
    dto::comments::{AddCommentRequest, CommentCreated},
    error::AppError,
    middleware::{auth::AuthUser, session::Session},
    models::CommentView,
    response::StatusBody,
    routes::cart::json_body,
    services::comment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/products/{product_id}/comments",
        get(list_comments).post(add_comment),
    )
}

#[utoipa::path(
    get,
    path = "/products/{product_id}/comments",
    params(
        ("product_id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Comments, newest first", body = Vec<CommentView>),
        (status = 500, description = "Comments could not be loaded", body = StatusBody)
    ),
    tag = "Comments"
)]
pub async fn list_comments(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Response {
    match comment_service::load_comments(&state, product_id).await {
        Ok(comments) => Json(comments).into_response(),
        Err(err) => StatusBody::failure(&err),
    }
}

#[utoipa::path(
    post,
    path = "/products/{product_id}/comments",
    params(
        ("product_id" = i32, Path, description = "Product ID")
    ),
    request_body = AddCommentRequest,
    responses(
        (status = 200, description = "Comment stored", body = CommentCreated),
        (status = 400, description = "Empty or too long", body = StatusBody),
        (status = 401, description = "Not logged in", body = StatusBody),
        (status = 404, description = "Unknown product", body = StatusBody),
        (status = 500, description = "Comment could not be stored", body = StatusBody)
    ),
    tag = "Comments"
)]
pub async fn add_comment(
    State(state): State<AppState>,
    session: Session,
    Path(product_id): Path<i32>,
    payload: Result<Json<AddCommentRequest>, JsonRejection>,
) -> Response {
    let Some(user) = session.user() else {
        return StatusBody::failure(&AppError::Unauthorized);
    };
    let payload = match json_body(payload) {
        Ok(payload) => payload,
        Err(err) => return StatusBody::failure(&err),
    };
    let user = AuthUser {
        user_id: user.user_id,
        role: user.role,
    };

    match comment_service::save_comment(&state, &user, product_id, &payload.content).await {
        Ok(comment) => Json(CommentCreated {
            status: StatusCode::NO_CONTENT.as_u16(),
            comment,
        })
        .into_response(),
        Err(err) => StatusBody::failure(&err),
    }
}
