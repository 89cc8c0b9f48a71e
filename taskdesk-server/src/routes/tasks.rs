/// Task endpoints
///
/// # Endpoints
///
/// - `GET /api/tasks` - Tasks visible to the caller (role-scoped)
/// - `PATCH /api/tasks/:id` - Status/report/hours update
/// - `GET /api/tasks/:id/report` - Completion report
///
/// Every handler follows the same shape: load the rows, gate the action
/// through the policy engine, validate any status change through the
/// lifecycle validator, then persist.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskdesk_shared::{
    auth::{middleware::AuthContext, policy},
    lifecycle::{validate_transition, StatusChange},
    models::{
        task::{Task, TaskStatus},
        user::User,
    },
    scope,
};
use uuid::Uuid;

/// Status update request
#[derive(Debug, Deserialize)]
pub struct TaskUpdateRequest {
    /// Target status
    pub status: TaskStatus,

    /// Completion report (required when completing)
    pub completion_report: Option<String>,

    /// Worked hours (> 0; required when completing)
    pub worked_hours: Option<f64>,
}

/// Completion report view
#[derive(Debug, Serialize)]
pub struct TaskReportResponse {
    /// Task ID
    pub id: Uuid,

    /// Task title
    pub title: String,

    /// Assignee username
    pub assigned_to_name: String,

    /// Creator username
    pub assigned_by_name: String,

    /// The completion report text
    pub completion_report: Option<String>,

    /// Hours worked
    pub worked_hours: Option<f64>,

    /// When the task was completed
    pub completed_at: Option<DateTime<Utc>>,

    /// When the work was due
    pub due_date: DateTime<Utc>,
}

/// Lists the tasks visible to the caller
///
/// Regular users see their own tasks, admins the tasks they created,
/// superadmins everything.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = scope::visible_tasks(&state.db, &auth.actor()).await?;
    Ok(Json(tasks))
}

/// Error for a transition that validated against a stale snapshot
///
/// The UPDATE re-checks the status the change was validated against; when
/// a concurrent request wins the race, the write affects no row and the
/// caller is told to re-read instead of silently rewriting the newer state.
fn concurrent_update_conflict() -> ApiError {
    ApiError::Conflict("Task was updated concurrently, re-read and retry".to_string())
}

/// Applies a status change to a task
///
/// # Errors
///
/// - `404 Not Found`: no such task
/// - `403 Forbidden`: caller may not update this task
/// - `400 Bad Request`: illegal transition or missing completion fields
/// - `409 Conflict`: a concurrent update changed the task's status first
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<TaskUpdateRequest>,
) -> ApiResult<Json<Task>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    policy::authorize(&auth.actor(), &policy::Action::UpdateTask(&task))?;

    let change = StatusChange {
        status: req.status,
        completion_report: req.completion_report,
        worked_hours: req.worked_hours,
    };
    let outcome = validate_transition(task.status, &change, Utc::now())?;

    let updated = Task::apply_transition(&state.db, task.id, task.status, &outcome)
        .await?
        .ok_or_else(concurrent_update_conflict)?;

    tracing::info!(
        task_id = %updated.id,
        status = updated.status.as_str(),
        user_id = %auth.user_id,
        "Task status updated"
    );

    Ok(Json(updated))
}

/// Returns the completion report for a task
///
/// # Errors
///
/// - `404 Not Found`: no such task, or the task is not completed
/// - `403 Forbidden`: admin outside the assignee's managed scope, or a
///   regular user
pub async fn task_report(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskReportResponse>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let assignee = User::find_by_id(&state.db, task.assigned_to)
        .await?
        .ok_or_else(|| ApiError::InternalError("Task assignee missing".to_string()))?;

    policy::authorize(
        &auth.actor(),
        &policy::Action::ViewTaskReport {
            task: &task,
            assignee: &assignee,
        },
    )?;

    let assigner = User::find_by_id(&state.db, task.assigned_by)
        .await?
        .ok_or_else(|| ApiError::InternalError("Task creator missing".to_string()))?;

    Ok(Json(TaskReportResponse {
        id: task.id,
        title: task.title,
        assigned_to_name: assignee.username,
        assigned_by_name: assigner.username,
        completion_report: task.completion_report,
        worked_hours: task.worked_hours,
        completed_at: task.completed_at,
        due_date: task.due_date,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_deserializes_wire_format() {
        let req: TaskUpdateRequest = serde_json::from_str(
            r#"{"status": "completed", "completion_report": "Done", "worked_hours": 3.5}"#,
        )
        .unwrap();

        assert_eq!(req.status, TaskStatus::Completed);
        assert_eq!(req.completion_report.as_deref(), Some("Done"));
        assert_eq!(req.worked_hours, Some(3.5));
    }

    #[test]
    fn test_update_request_report_and_hours_optional() {
        let req: TaskUpdateRequest = serde_json::from_str(r#"{"status": "in_progress"}"#).unwrap();

        assert_eq!(req.status, TaskStatus::InProgress);
        assert!(req.completion_report.is_none());
        assert!(req.worked_hours.is_none());
    }

    #[test]
    fn test_lost_transition_race_maps_to_conflict() {
        // A change validated against a stale status affects no row; the
        // handler reports 409, not 404 and never a silent overwrite.
        let err = None::<Task>.ok_or_else(concurrent_update_conflict).unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }
}
