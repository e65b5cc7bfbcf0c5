use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    entity::users::UserRole,
    error::AppError,
    middleware::session::Session,
    state::AppState,
};

/// The logged-in user, taken from the session. Handlers that list it as a
/// parameter reject anonymous requests with 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i32,
    pub role: UserRole,
}

pub fn ensure_role(user: &AuthUser, role: UserRole) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, UserRole::Admin)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        let user = session.user().ok_or(AppError::Unauthorized)?;
        Ok(AuthUser {
            user_id: user.user_id,
            role: user.role,
        })
    }
}
