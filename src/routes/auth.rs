use axum::{
    Form, Json, Router,
    extract::{Multipart, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};

use crate::{
    dto::auth::{AvatarUpload, LoginForm, LoginPage, RegisterForm, RegisterPage},
    error::{AppError, AppResult},
    middleware::session::{Session, SessionUser},
    models::User,
    response::ApiResponse,
    routes::params::NextQuery,
    services::auth_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login-admin", post(login_admin))
        .route("/register", get(register_page).post(register))
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
}

/// Only same-site paths are honoured as post-login destinations.
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

fn session_user(user: &User) -> SessionUser {
    SessionUser {
        user_id: user.id,
        role: user.role,
    }
}

#[utoipa::path(
    post,
    path = "/login-admin",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirect to the admin dashboard")
    ),
    tag = "Auth"
)]
pub async fn login_admin(
    State(state): State<AppState>,
    mut session: Session,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let redirect = Redirect::to("/admin");
    match auth_service::auth_user(&state.orm, &form.username, &form.password).await? {
        Some(user) => {
            session.login(&session_user(&user))?;
            tracing::info!(user_id = user.id, "admin login");
            Ok((state.sessions.store(&session)?, redirect).into_response())
        }
        None => Ok(redirect.into_response()),
    }
}

#[utoipa::path(
    get,
    path = "/register",
    responses(
        (status = 200, description = "Registration form", body = ApiResponse<RegisterPage>)
    ),
    tag = "Auth"
)]
pub async fn register_page() -> Json<ApiResponse<RegisterPage>> {
    Json(ApiResponse::success(
        "Register",
        RegisterPage {
            err_msg: String::new(),
        },
        None,
    ))
}

#[utoipa::path(
    post,
    path = "/register",
    request_body(content = RegisterForm, content_type = "multipart/form-data"),
    responses(
        (status = 303, description = "Registered, redirect to login"),
        (status = 200, description = "Form re-rendered with an error", body = ApiResponse<RegisterPage>)
    ),
    tag = "Auth"
)]
pub async fn register(State(state): State<AppState>, multipart: Multipart) -> Response {
    match register_account(&state, multipart).await {
        Ok(user) => {
            tracing::info!(user_id = user.id, "registration complete");
            Redirect::to("/login").into_response()
        }
        Err(err) => {
            if err.is_storage() {
                tracing::error!(error = ?err, "registration failed");
            }
            let page = RegisterPage {
                err_msg: auth_service::register_error_message(&err),
            };
            Json(ApiResponse::success("Register", page, None)).into_response()
        }
    }
}

async fn register_account(state: &AppState, multipart: Multipart) -> AppResult<User> {
    let (form, avatar) = read_register_form(multipart).await?;
    auth_service::check_passwords(&form)?;

    let avatar_url = match (avatar, state.images.as_ref()) {
        (Some(file), Some(host)) => host
            .upload(&file.file_name, &file.content_type, file.bytes)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "avatar upload failed"))?,
        (Some(_), None) => {
            tracing::warn!("no image host configured, avatar dropped");
            String::new()
        }
        (None, _) => String::new(),
    };

    auth_service::register_user(&state.orm, form, avatar_url).await
}

async fn read_register_form(
    mut multipart: Multipart,
) -> AppResult<(RegisterForm, Option<AvatarUpload>)> {
    let invalid = |e: axum::extract::multipart::MultipartError| {
        AppError::BadRequest(format!("invalid form data: {e}"))
    };
    let mut form = RegisterForm::default();
    let mut avatar = None;

    while let Some(field) = multipart.next_field().await.map_err(invalid)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "avatar" => {
                let file_name = field.file_name().unwrap_or("avatar").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(invalid)?;
                if !bytes.is_empty() {
                    avatar = Some(AvatarUpload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            "name" => form.name = field.text().await.map_err(invalid)?,
            "username" => form.username = field.text().await.map_err(invalid)?,
            "password" => form.password = field.text().await.map_err(invalid)?,
            "confirm" => form.confirm = field.text().await.map_err(invalid)?,
            _ => {}
        }
    }

    Ok((form, avatar))
}

#[utoipa::path(
    get,
    path = "/login",
    params(
        ("next" = Option<String>, Query, description = "Where to go after logging in")
    ),
    responses(
        (status = 200, description = "Login form", body = ApiResponse<LoginPage>),
        (status = 303, description = "Already logged in, redirect to the catalog")
    ),
    tag = "Auth"
)]
pub async fn login_page(session: Session, Query(query): Query<NextQuery>) -> Response {
    if session.user().is_some() {
        return Redirect::to("/").into_response();
    }
    Json(ApiResponse::success(
        "Login",
        LoginPage { next: query.next },
        None,
    ))
    .into_response()
}

#[utoipa::path(
    post,
    path = "/login",
    params(
        ("next" = Option<String>, Query, description = "Where to go after logging in")
    ),
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Logged in, redirect to `next` or the catalog"),
        (status = 200, description = "Credentials rejected, form re-rendered", body = ApiResponse<LoginPage>)
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    mut session: Session,
    Query(query): Query<NextQuery>,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    if session.user().is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let Some(user) = auth_service::auth_user(&state.orm, &form.username, &form.password).await?
    else {
        tracing::debug!(username = %form.username, "login rejected");
        let page = LoginPage { next: query.next };
        return Ok(Json(ApiResponse::success("Login", page, None)).into_response());
    };

    session.login(&session_user(&user))?;
    tracing::info!(user_id = user.id, "user logged in");
    let target = safe_next(query.next.as_deref()).to_string();
    Ok((state.sessions.store(&session)?, Redirect::to(&target)).into_response())
}

#[utoipa::path(
    get,
    path = "/logout",
    responses(
        (status = 303, description = "Logged out, redirect to login")
    ),
    tag = "Auth"
)]
pub async fn logout(State(state): State<AppState>, mut session: Session) -> AppResult<Response> {
    session.logout();
    Ok((state.sessions.store(&session)?, Redirect::to("/login")).into_response())
}
