use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use sea_orm::ActiveValue::NotSet;

use crate::{
    dto::auth::RegisterForm,
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel, UserRole},
    error::{AppError, AppResult},
    models::User,
};

pub const PASSWORD_MISMATCH: &str = "Mật khẩu KHÔNG khớp!";
pub const USERNAME_TAKEN: &str = "Tên đăng nhập đã tồn tại!";
pub const SYSTEM_ERROR: &str = "Hệ thống đang có lỗi! Vui lòng quay lại sau!";

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        tracing::warn!("stored password hash is malformed");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

pub fn check_passwords(form: &RegisterForm) -> AppResult<()> {
    check_passwords_match(&form.password, &form.confirm)
}

fn check_passwords_match(password: &str, confirm: &str) -> AppResult<()> {
    if password != confirm {
        return Err(AppError::BadRequest(PASSWORD_MISMATCH.to_string()));
    }
    Ok(())
}

/// Looks up an active account and checks the password. Unknown users and
/// wrong passwords are both just `None`.
pub async fn auth_user(
    orm: &sea_orm::DatabaseConnection,
    username: &str,
    password: &str,
) -> AppResult<Option<User>> {
    let user = Users::find()
        .filter(UserCol::Username.eq(username.trim()))
        .filter(UserCol::Active.eq(true))
        .one(orm)
        .await?;

    Ok(user
        .filter(|u| verify_password(password, &u.password))
        .map(user_from_entity))
}

/// Validates the form and creates a `USER` account. `avatar` is the URL
/// returned by the image host, empty when no file was sent.
pub async fn register_user(
    orm: &sea_orm::DatabaseConnection,
    form: RegisterForm,
    avatar: String,
) -> AppResult<User> {
    let RegisterForm {
        name,
        username,
        password,
        confirm,
    } = form;

    check_passwords_match(&password, &confirm)?;
    let username = username.trim().to_string();
    if username.is_empty() || name.trim().is_empty() || password.is_empty() {
        return Err(AppError::BadRequest(
            "name, username and password are required".to_string(),
        ));
    }

    let exist = Users::find()
        .filter(UserCol::Username.eq(username.as_str()))
        .one(orm)
        .await?;
    if exist.is_some() {
        return Err(AppError::Conflict(USERNAME_TAKEN.to_string()));
    }

    let user = UserActive {
        id: NotSet,
        name: Set(name.trim().to_string()),
        username: Set(username),
        password: Set(hash_password(&password)?),
        image: Set(avatar),
        active: Set(true),
        user_role: Set(UserRole::User),
    }
    .insert(orm)
    .await?;

    tracing::info!(user_id = user.id, "user registered");
    Ok(user_from_entity(user))
}

/// Message shown on the re-rendered registration form.
pub fn register_error_message(err: &AppError) -> String {
    match err {
        AppError::BadRequest(msg) | AppError::Conflict(msg) => msg.clone(),
        _ => SYSTEM_ERROR.to_string(),
    }
}

fn user_from_entity(model: UserModel) -> User {
    User {
        id: model.id,
        name: model.name,
        username: model.username,
        avatar: model.image,
        active: model.active,
        role: model.user_role,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_password_verifies() {
        let hash = hash_password("123456").unwrap();
        assert_ne!(hash, "123456");
        assert!(verify_password("123456", &hash));
        assert!(!verify_password("654321", &hash));
        assert!(!verify_password("123456", "not-a-hash"));
    }

    #[test]
    fn storage_errors_get_the_generic_message() {
        let err = AppError::OrmError(sea_orm::DbErr::Custom("down".into()));
        assert_eq!(register_error_message(&err), SYSTEM_ERROR);
        let err = AppError::BadRequest(PASSWORD_MISMATCH.into());
        assert_eq!(register_error_message(&err), PASSWORD_MISMATCH);
    }
}
