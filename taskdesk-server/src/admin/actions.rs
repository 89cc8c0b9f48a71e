/// Admin panel JSON actions
///
/// # Endpoints
///
/// - `POST /admin/actions/users` - Create an account
/// - `POST /admin/actions/users/:id/deactivate` - Deactivate an account
/// - `POST /admin/actions/tasks` - Create a task
///
/// These back the panel's forms but are plain JSON endpoints gated by the
/// same policy engine as the API, so an admin may create regular user
/// accounts here (forced into their managed scope) even though the users
/// page itself is superadmin-only.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use taskdesk_shared::{
    auth::{password, policy},
    lifecycle::FieldError,
    models::{
        task::{CreateTask, Task},
        user::{CreateUser, Role, User},
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::auth::{validation_errors, UserSummary},
};

use super::session::PanelUser;

/// Account creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Login name (must be unique)
    #[validate(length(min = 1, max = 150, message = "Username is required"))]
    pub username: String,

    /// Email address
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    /// Given name
    #[serde(default)]
    pub first_name: String,

    /// Family name
    #[serde(default)]
    pub last_name: String,

    /// Plaintext password (hashed before storage)
    pub password: String,

    /// Role for the new account (defaults to `user`)
    pub role: Option<Role>,

    /// Managing admin for `role = user` accounts
    pub assigned_admin: Option<Uuid>,
}

/// Task creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Short title
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Assignee (must have `role = user`)
    pub assigned_to: Uuid,

    /// When the work is due
    pub due_date: DateTime<Utc>,
}

/// Creates an account
///
/// Admin callers are confined to creating regular users inside their own
/// managed scope; any `role` or `assigned_admin` they send is overridden.
/// Superadmins choose freely, but a `assigned_admin` referent must be an
/// admin account.
///
/// # Errors
///
/// - `403 Forbidden`: admin attempting to create a staff account
/// - `400 Bad Request`: weak password or invalid `assigned_admin`
/// - `409 Conflict`: username already taken
pub async fn create_user(
    State(state): State<AppState>,
    Extension(PanelUser(creator)): Extension<PanelUser>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<Json<UserSummary>> {
    req.validate().map_err(validation_errors)?;

    let requested_role = req.role.unwrap_or(Role::User);

    // Superadmin accounts only come from first-run bootstrap.
    if requested_role == Role::Superadmin {
        return Err(ApiError::ValidationError(vec![FieldError::new(
            "role",
            "Accounts can only be created with the user or admin role",
        )]));
    }

    let actor = policy::Actor::new(creator.id, creator.role);
    policy::authorize(
        &actor,
        &policy::Action::CreateUser {
            role: requested_role,
        },
    )?;

    if let Err(message) = password::validate_password_strength(&req.password) {
        return Err(ApiError::ValidationError(vec![FieldError::new(
            "password", message,
        )]));
    }

    // Admins only create users in their own scope; superadmins choose.
    let (role, assigned_admin) = match creator.role {
        Role::Admin => (Role::User, Some(creator.id)),
        _ => (requested_role, req.assigned_admin),
    };

    if role != Role::User && assigned_admin.is_some() {
        return Err(ApiError::ValidationError(vec![FieldError::new(
            "assigned_admin",
            "Only regular user accounts have a managing admin",
        )]));
    }

    if let Some(admin_id) = assigned_admin {
        let referent = User::find_by_id(&state.db, admin_id)
            .await?
            .filter(|u| u.role == Role::Admin);
        if referent.is_none() {
            return Err(ApiError::ValidationError(vec![FieldError::new(
                "assigned_admin",
                "Managing admin must be an admin account",
            )]));
        }
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            role,
            assigned_admin,
            password_hash,
        },
    )
    .await?;

    tracing::info!(
        user_id = %user.id,
        role = user.role.as_str(),
        created_by = %creator.id,
        "Account created"
    );

    Ok(Json(UserSummary::from(&user)))
}

/// Deactivates an account (superadmin only)
///
/// Deactivation revokes panel sessions and refresh tokens within one
/// request cycle, since both re-check the live row.
pub async fn deactivate_user(
    State(state): State<AppState>,
    Extension(PanelUser(caller)): Extension<PanelUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let actor = policy::Actor::new(caller.id, caller.role);
    policy::authorize(&actor, &policy::Action::ManageUsers)?;

    if id == caller.id {
        return Err(ApiError::BadRequest(
            "You cannot deactivate your own account".to_string(),
        ));
    }

    if !User::set_active(&state.db, id, false).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id = %id, deactivated_by = %caller.id, "Account deactivated");

    Ok(Json(json!({ "deactivated": id })))
}

/// Creates a task
///
/// # Errors
///
/// - `404 Not Found`: no such assignee
/// - `400 Bad Request`: assignee is not a regular user, or is inactive
/// - `403 Forbidden`: assignee outside the caller's managed scope
pub async fn create_task(
    State(state): State<AppState>,
    Extension(PanelUser(creator)): Extension<PanelUser>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate().map_err(validation_errors)?;

    let assignee = User::find_by_id(&state.db, req.assigned_to)
        .await?
        .ok_or_else(|| ApiError::NotFound("Assignee not found".to_string()))?;

    if assignee.role != Role::User {
        return Err(ApiError::ValidationError(vec![FieldError::new(
            "assigned_to",
            "Tasks can only be assigned to regular users",
        )]));
    }

    if !assignee.is_active {
        return Err(ApiError::ValidationError(vec![FieldError::new(
            "assigned_to",
            "Assignee account is disabled",
        )]));
    }

    let actor = policy::Actor::new(creator.id, creator.role);
    policy::authorize(&actor, &policy::Action::CreateTask { assignee: &assignee })?;

    let task = Task::create(
        &state.db,
        CreateTask {
            title: req.title,
            description: req.description,
            assigned_to: assignee.id,
            assigned_by: creator.id,
            due_date: req.due_date,
        },
    )
    .await?;

    tracing::info!(
        task_id = %task.id,
        assigned_to = %task.assigned_to,
        assigned_by = %task.assigned_by,
        "Task created"
    );

    Ok(Json(task))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_request_defaults() {
        let req: CreateUserRequest = serde_json::from_str(
            r#"{"username": "jdoe", "email": "jdoe@example.com", "password": "Secr3t!pw"}"#,
        )
        .unwrap();

        assert!(req.role.is_none());
        assert!(req.assigned_admin.is_none());
        assert_eq!(req.first_name, "");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_user_request_rejects_bad_email() {
        let req: CreateUserRequest = serde_json::from_str(
            r#"{"username": "jdoe", "email": "not-an-email", "password": "Secr3t!pw"}"#,
        )
        .unwrap();

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_task_request_parses_rfc3339_due_date() {
        let req: CreateTaskRequest = serde_json::from_str(
            r#"{"title": "Ship it", "assigned_to": "8e5c0c3a-4f6b-4b6e-9a6e-1d6c57a2b7f0",
                "due_date": "2026-09-15T17:00:00Z"}"#,
        )
        .unwrap();

        assert_eq!(req.description, "");
        assert_eq!(req.due_date.to_rfc3339(), "2026-09-15T17:00:00+00:00");
        assert!(req.validate().is_ok());
    }
}
