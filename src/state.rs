use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    config::AppConfig,
    middleware::session::SessionKeys,
    upload::{CloudinaryHost, ImageHost},
};

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub sessions: SessionKeys,
    /// `None` when no image host is configured; avatars are then left empty.
    pub images: Option<Arc<dyn ImageHost>>,
}

impl AppState {
    pub fn new(orm: DatabaseConnection, config: AppConfig) -> Self {
        let sessions = SessionKeys::new(
            &config.session_secret,
            &config.session_cookie,
            config.session_ttl_hours,
        );
        let images = config
            .cloudinary
            .clone()
            .map(|c| Arc::new(CloudinaryHost::new(c)) as Arc<dyn ImageHost>);
        Self {
            orm,
            config: Arc::new(config),
            sessions,
            images,
        }
    }

    pub fn with_image_host(mut self, host: Arc<dyn ImageHost>) -> Self {
        self.images = Some(host);
        self
    }
}
