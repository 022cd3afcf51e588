use anyhow::{Context, Result};
use sea_orm::ConnectionTrait;

use crate::repositories::AdminRepository;

/// Creates the default administrator when no account with `username` exists.
pub async fn initialize_admin_user<C: ConnectionTrait>(
    db: &C,
    username: &str,
    password: &str,
) -> Result<()> {
    let repo = AdminRepository::new(db);

    let existing_admin = repo
        .find_by_username(username)
        .await
        .context("Failed to check existing admin")?;

    if existing_admin.is_some() {
        tracing::info!("Admin account already exists ({}), skipping", username);
        return Ok(());
    }

    let password_hash =
        bcrypt::hash(password, bcrypt::DEFAULT_COST).context("Failed to hash admin password")?;

    repo.create(username.to_string(), password_hash)
        .await
        .context("Failed to insert admin")?;

    tracing::info!("Default admin account created ({})", username);
    tracing::warn!("Please change the default password after first login");
    Ok(())
}
