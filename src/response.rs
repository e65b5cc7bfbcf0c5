use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppError;

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Meta {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub total: Option<i64>,
}

impl Meta {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
            total: Some(total),
        }
    }

    pub fn empty() -> Self {
        Self {
            page: None,
            per_page: None,
            total: None,
        }
    }
}

/// Envelope for page view models and admin resources.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}

/// `{"status": <code>}` body used by the cart, checkout and comment
/// endpoints. Failures never carry more detail than the code.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusBody {
    pub status: u16,
}

impl StatusBody {
    pub fn ok() -> Self {
        Self {
            status: StatusCode::OK.as_u16(),
        }
    }

    /// Log `err` and turn it into a bare status reply.
    pub fn failure(err: &AppError) -> Response {
        let status = err.status();
        if status.is_server_error() {
            tracing::error!(error = ?err, "request failed");
        } else {
            tracing::debug!(error = %err, "request rejected");
        }
        (
            status,
            Json(StatusBody {
                status: status.as_u16(),
            }),
        )
            .into_response()
    }
}
