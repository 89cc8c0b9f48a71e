/// First-run bootstrap
///
/// A fresh deployment has no accounts, and only a superadmin can create
/// them, so the server optionally creates the first superadmin at startup
/// from `BOOTSTRAP_SUPERADMIN_USERNAME` / `BOOTSTRAP_SUPERADMIN_PASSWORD`.
/// The step is a no-op once any superadmin exists.

use sqlx::PgPool;
use taskdesk_shared::{
    auth::password,
    models::user::{CreateUser, Role, User},
};

use crate::config::Config;

/// Creates the bootstrap superadmin when configured and none exists yet
pub async fn ensure_superadmin(pool: &PgPool, config: &Config) -> anyhow::Result<()> {
    let (Some(username), Some(plaintext)) = (
        config.bootstrap.superadmin_username.as_deref(),
        config.bootstrap.superadmin_password.as_deref(),
    ) else {
        tracing::debug!("Bootstrap superadmin not configured, skipping");
        return Ok(());
    };

    if User::count_by_role(pool, Role::Superadmin).await? > 0 {
        tracing::debug!("Superadmin already present, skipping bootstrap");
        return Ok(());
    }

    let password_hash = password::hash_password(plaintext)?;

    let user = User::create(
        pool,
        CreateUser {
            username: username.to_string(),
            email: format!("{username}@localhost"),
            first_name: String::new(),
            last_name: String::new(),
            role: Role::Superadmin,
            assigned_admin: None,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, username, "Bootstrap superadmin created");

    Ok(())
}
