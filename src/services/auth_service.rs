use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::entities::admin;
use crate::errors::{AppError, AppResult};
use crate::repositories::AdminRepository;
use crate::utils::jwt::JwtManager;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug)]
pub struct LoginOutcome {
    pub admin: admin::Model,
    pub token: String,
}

fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    bcrypt::verify(password, hash)
        .map_err(|e| AppError::Unexpected(anyhow::anyhow!("Password verification error: {e}")))
}

pub fn hash_password(password: &str) -> AppResult<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Unexpected(anyhow::anyhow!("Failed to hash password: {e}")))
}

pub async fn login<C: ConnectionTrait>(
    db: &C,
    jwt: &JwtManager,
    username: &str,
    password: &str,
) -> AppResult<LoginOutcome> {
    let invalid = || AppError::Unauthorized("Invalid username or password".to_string());

    let admin = AdminRepository::new(db)
        .find_by_username(username.trim())
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(password, &admin.password_hash)? {
        return Err(invalid());
    }

    let token = jwt
        .create_jwt(admin.admin_id, &admin.username)
        .map_err(|e| AppError::Unexpected(anyhow::anyhow!("Failed to create token: {e}")))?;

    tracing::info!(username = %admin.username, "Admin logged in");
    Ok(LoginOutcome { admin, token })
}

pub async fn change_password<C: ConnectionTrait>(
    db: &C,
    admin_id: Uuid,
    old_password: &str,
    new_password: &str,
) -> AppResult<()> {
    if new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::ValidationFailure(vec![format!(
            "New password must be at least {MIN_PASSWORD_LEN} characters"
        )]));
    }

    let repo = AdminRepository::new(db);
    let admin = repo
        .find_by_id(admin_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid current password".to_string()))?;

    if !verify_password(old_password, &admin.password_hash)? {
        return Err(AppError::Unauthorized(
            "Invalid current password".to_string(),
        ));
    }

    let password_hash = hash_password(new_password)?;
    repo.update_password(admin, password_hash).await?;
    Ok(())
}
