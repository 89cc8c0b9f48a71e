//! Seeds a demo data set for local development
//!
//! Creates three accounts (`superadmin`, `admin1`, `user1`, with `admin1`
//! managing `user1`) and one pending task. Existing accounts are left
//! alone, so the seeder is safe to run repeatedly.
//!
//! ```text
//! DATABASE_URL=postgresql://localhost/taskdesk cargo run --bin seed-demo
//! ```

use chrono::{Duration, Utc};
use sqlx::PgPool;
use taskdesk_shared::{
    auth::password,
    db::{migrations, pool},
    models::{
        task::{CreateTask, Task},
        user::{CreateUser, Role, User},
    },
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

struct DemoAccount {
    username: &'static str,
    email: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    role: Role,
    password: &'static str,
}

const ACCOUNTS: &[DemoAccount] = &[
    DemoAccount {
        username: "superadmin",
        email: "superadmin@example.com",
        first_name: "Sam",
        last_name: "Root",
        role: Role::Superadmin,
        password: "Admin123!",
    },
    DemoAccount {
        username: "admin1",
        email: "admin1@example.com",
        first_name: "Ada",
        last_name: "Manager",
        role: Role::Admin,
        password: "Admin123!",
    },
    DemoAccount {
        username: "user1",
        email: "user1@example.com",
        first_name: "Uri",
        last_name: "Worker",
        role: Role::User,
        password: "User1234!",
    },
];

/// Creates an account unless the username is already taken
async fn ensure_account(
    db: &PgPool,
    account: &DemoAccount,
    assigned_admin: Option<Uuid>,
) -> anyhow::Result<User> {
    if let Some(existing) = User::find_by_username(db, account.username).await? {
        tracing::info!(username = account.username, "Account already exists, skipping");
        return Ok(existing);
    }

    let user = User::create(
        db,
        CreateUser {
            username: account.username.to_string(),
            email: account.email.to_string(),
            first_name: account.first_name.to_string(),
            last_name: account.last_name.to_string(),
            role: account.role,
            assigned_admin,
            password_hash: password::hash_password(account.password)?,
        },
    )
    .await?;

    tracing::info!(
        username = account.username,
        role = account.role.as_str(),
        password = account.password,
        "Demo account created"
    );

    Ok(user)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

    let db = pool::create_pool(pool::DatabaseConfig {
        url: database_url,
        ..Default::default()
    })
    .await?;

    migrations::run_migrations(&db).await?;

    let _superadmin = ensure_account(&db, &ACCOUNTS[0], None).await?;
    let admin = ensure_account(&db, &ACCOUNTS[1], None).await?;
    let user = ensure_account(&db, &ACCOUNTS[2], Some(admin.id)).await?;

    // One sample task so every page has something to show.
    let existing = Task::list_for_assignee(&db, user.id).await?;
    if existing.is_empty() {
        let task = Task::create(
            &db,
            CreateTask {
                title: "Prepare the quarterly summary".to_string(),
                description: "Collect the numbers and draft a one-page summary.".to_string(),
                assigned_to: user.id,
                assigned_by: admin.id,
                due_date: Utc::now() + Duration::days(7),
            },
        )
        .await?;
        tracing::info!(task_id = %task.id, "Demo task created");
    } else {
        tracing::info!("Demo tasks already present, skipping");
    }

    pool::close_pool(db).await;

    Ok(())
}
