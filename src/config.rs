use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub session_secret: String,
    pub session_cookie: String,
    pub session_ttl_hours: i64,
    /// Session key the cart mapping is stored under.
    pub cart_key: String,
    pub max_upload_bytes: usize,
    pub cloudinary: Option<CloudinaryConfig>,
}

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub upload_preset: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let session_secret = env::var("SESSION_SECRET")
            .map_err(|_| anyhow::anyhow!("SESSION_SECRET is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let session_cookie = env::var("SESSION_COOKIE").unwrap_or_else(|_| "session".to_string());
        let session_ttl_hours = env::var("SESSION_TTL_HOURS")
            .ok()
            .and_then(|h| h.parse::<i64>().ok())
            .unwrap_or(24 * 7);
        let cart_key = env::var("CART_KEY").unwrap_or_else(|_| "cart".to_string());
        let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|b| b.parse::<usize>().ok())
            .unwrap_or(5 * 1024 * 1024);

        let cloudinary = match (
            env::var("CLOUDINARY_CLOUD_NAME"),
            env::var("CLOUDINARY_UPLOAD_PRESET"),
        ) {
            (Ok(cloud_name), Ok(upload_preset)) => Some(CloudinaryConfig {
                cloud_name,
                upload_preset,
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            host,
            port,
            session_secret,
            session_cookie,
            session_ttl_hours,
            cart_key,
            max_upload_bytes,
            cloudinary,
        })
    }

    /// Configuration for tests and local tooling; nothing is read from the environment.
    pub fn for_database(database_url: impl Into<String>, session_secret: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            session_secret: session_secret.into(),
            session_cookie: "session".to_string(),
            session_ttl_hours: 24 * 7,
            cart_key: "cart".to_string(),
            max_upload_bytes: 5 * 1024 * 1024,
            cloudinary: None,
        }
    }
}
