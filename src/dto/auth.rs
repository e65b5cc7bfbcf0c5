use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Text fields of the multipart registration form. The avatar file travels
/// separately as [`AvatarUpload`].
#[derive(Deserialize, Debug, Default, Clone, ToSchema)]
pub struct RegisterForm {
    pub name: String,
    pub username: String,
    pub password: String,
    pub confirm: String,
}

#[derive(Debug, Clone)]
pub struct AvatarUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterPage {
    pub err_msg: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginPage {
    pub next: Option<String>,
}
