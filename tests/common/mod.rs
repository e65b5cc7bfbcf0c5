#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
    routing::get,
};
use bookstore::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    dto::auth::RegisterForm,
    entity::users::UserRole,
    middleware::session::{Session, SessionUser},
    routes::{create_app_router, health},
    seed::{self, SeedReport},
    services::auth_service,
    state::AppState,
};
use serde_json::Value;
use tower::ServiceExt;

pub struct TestApp {
    pub state: AppState,
    pub seed: SeedReport,
}

/// Fresh in-memory database with the tables created and the demo data loaded.
pub async fn setup() -> anyhow::Result<TestApp> {
    let config = AppConfig::for_database("sqlite::memory:", "test-secret");
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;
    let seed = seed::run(&orm).await?;
    Ok(TestApp {
        state: AppState::new(orm, config),
        seed,
    })
}

impl TestApp {
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health::health_check))
            .merge(create_app_router())
            .with_state(self.state.clone())
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// Registers a plain customer account and returns its id.
    pub async fn create_customer(&self, username: &str) -> anyhow::Result<i32> {
        let form = RegisterForm {
            name: "Khách".to_string(),
            username: username.to_string(),
            password: "secret".to_string(),
            confirm: "secret".to_string(),
        };
        let user = auth_service::register_user(&self.state.orm, form, String::new()).await?;
        Ok(user.id)
    }

    /// `Cookie` header value carrying `session`.
    pub fn cookie(&self, session: &Session) -> String {
        let token = self.state.sessions.encode(session).expect("encode session");
        format!("{}={}", self.state.sessions.cookie_name(), token)
    }

    /// Decodes the session a response handed back through `Set-Cookie`.
    pub fn session_from(&self, response: &Response<Body>) -> Option<Session> {
        let raw = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
        let prefix = format!("{}=", self.state.sessions.cookie_name());
        let token = raw.split(';').next()?.strip_prefix(prefix.as_str())?;
        self.state.sessions.decode(token)
    }
}

pub fn logged_in(user_id: i32, role: UserRole) -> Session {
    let mut session = Session::default();
    session
        .login(&SessionUser { user_id, role })
        .expect("store user in session");
    session
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}
