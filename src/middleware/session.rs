//! Signed cookie sessions.
//!
//! The whole session map travels in one cookie as an HS256 token, so there is
//! no server-side store. A cookie that is missing, expired or fails the
//! signature check is treated as an empty session.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, HeaderValue, header, request::Parts},
    response::AppendHeaders,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{
    entity::users::UserRole,
    error::{AppError, AppResult},
    state::AppState,
};

/// Session key holding the logged-in user.
pub const USER_KEY: &str = "_user";

pub type SetCookie = AppendHeaders<[(header::HeaderName, HeaderValue); 1]>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: i32,
    pub role: UserRole,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    data: Map<String, Value>,
}

impl Session {
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .cloned()
            .and_then(|value| serde_json::from_value(value).ok())
    }

    pub fn insert<T: Serialize>(&mut self, key: &str, value: &T) -> AppResult<()> {
        let value = serde_json::to_value(value)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
        self.data.insert(key.to_string(), value);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn user(&self) -> Option<SessionUser> {
        self.get(USER_KEY)
    }

    pub fn login(&mut self, user: &SessionUser) -> AppResult<()> {
        self.insert(USER_KEY, user)
    }

    pub fn logout(&mut self) {
        self.remove(USER_KEY);
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    exp: usize,
    #[serde(default)]
    data: Map<String, Value>,
}

#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    cookie_name: String,
    ttl: Duration,
}

impl SessionKeys {
    pub fn new(secret: &str, cookie_name: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            cookie_name: cookie_name.to_string(),
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn encode(&self, session: &Session) -> AppResult<String> {
        let exp = Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;
        let claims = SessionClaims {
            exp: exp.timestamp() as usize,
            data: session.data.clone(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
    }

    pub fn decode(&self, token: &str) -> Option<Session> {
        decode::<SessionClaims>(token, &self.decoding, &Validation::default())
            .ok()
            .map(|decoded| Session {
                data: decoded.claims.data,
            })
    }

    /// Session carried by the request cookies, or an empty one.
    pub fn load(&self, headers: &HeaderMap) -> Session {
        self.read_cookie(headers)
            .and_then(|token| self.decode(&token))
            .unwrap_or_default()
    }

    /// `Set-Cookie` header persisting `session` in the browser.
    pub fn store(&self, session: &Session) -> AppResult<SetCookie> {
        let token = self.encode(session)?;
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.cookie_name,
            token,
            self.ttl.num_seconds()
        );
        let value = HeaderValue::from_str(&cookie)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
        Ok(AppendHeaders([(header::SET_COOKIE, value)]))
    }

    fn read_cookie(&self, headers: &HeaderMap) -> Option<String> {
        let prefix = format!("{}=", self.cookie_name);
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .map(str::trim)
            .find_map(|cookie| cookie.strip_prefix(prefix.as_str()))
            .map(str::to_string)
    }
}

impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(state.sessions.load(&parts.headers))
    }
}
