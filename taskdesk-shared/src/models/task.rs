/// Task model and database operations
///
/// Tasks are created by an admin or superadmin for a regular user and move
/// through a one-directional lifecycle. Completion requires a report and a
/// positive worked-hours figure; see `crate::lifecycle` for the transition
/// rules.
///
/// # State Machine
///
/// ```text
/// pending → in_progress → completed
/// pending → completed
/// ```
///
/// Completed is terminal.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'in_progress', 'completed');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(200) NOT NULL,
///     description TEXT NOT NULL,
///     assigned_to UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     assigned_by UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     due_date TIMESTAMPTZ NOT NULL,
///     status task_status NOT NULL DEFAULT 'pending',
///     completion_report TEXT,
///     worked_hours DOUBLE PRECISION,
///     completed_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::lifecycle::TransitionOutcome;

/// Task lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created, not yet picked up
    Pending,

    /// Being worked on by the assignee
    InProgress,

    /// Finished; report and worked hours recorded, terminal
    Completed,
}

impl TaskStatus {
    /// Converts status to string for logging and display
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Checks if the status is terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }

    /// Checks if a transition to `target` moves forward along the lifecycle
    ///
    /// Re-asserting the current status is not a forward move; callers decide
    /// whether to treat that as a no-op (see `crate::lifecycle`).
    pub fn can_transition_to(&self, target: TaskStatus) -> bool {
        match (self, target) {
            (TaskStatus::Pending, TaskStatus::InProgress) => true,
            (TaskStatus::Pending, TaskStatus::Completed) => true,
            (TaskStatus::InProgress, TaskStatus::Completed) => true,
            _ => false,
        }
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Short title
    pub title: String,

    /// Free-text description
    pub description: String,

    /// Assignee (always a `role = user` account)
    pub assigned_to: Uuid,

    /// Creator (admin or superadmin)
    pub assigned_by: Uuid,

    /// When the work is due
    pub due_date: DateTime<Utc>,

    /// Current lifecycle status
    pub status: TaskStatus,

    /// Completion report, required once status becomes completed
    pub completion_report: Option<String>,

    /// Hours worked, > 0 whenever present
    pub worked_hours: Option<f64>,

    /// Stamped the instant the task transitions to completed, never recomputed
    pub completed_at: Option<DateTime<Utc>>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Short title
    pub title: String,

    /// Free-text description
    pub description: String,

    /// Assignee (must have `role = user`)
    pub assigned_to: Uuid,

    /// Creator (admin or superadmin)
    pub assigned_by: Uuid,

    /// When the work is due
    pub due_date: DateTime<Utc>,
}

impl Task {
    /// Creates a new task in pending status
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, assigned_to, assigned_by, due_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, assigned_to, assigned_by, due_date, status,
                      completion_report, worked_hours, completed_at, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.assigned_to)
        .bind(data.assigned_by)
        .bind(data.due_date)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, assigned_to, assigned_by, due_date, status,
                   completion_report, worked_hours, completed_at, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists every task, newest first
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, assigned_to, assigned_by, due_date, status,
                   completion_report, worked_hours, completed_at, created_at, updated_at
            FROM tasks
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists the tasks assigned to a user, newest first
    pub async fn list_for_assignee(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, assigned_to, assigned_by, due_date, status,
                   completion_report, worked_hours, completed_at, created_at, updated_at
            FROM tasks
            WHERE assigned_to = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists the tasks created by an admin, newest first
    pub async fn list_by_assigner(pool: &PgPool, admin_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, assigned_to, assigned_by, due_date, status,
                   completion_report, worked_hours, completed_at, created_at, updated_at
            FROM tasks
            WHERE assigned_by = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(admin_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists completed tasks, most recently completed first
    ///
    /// When `assigned_by` is given, the list is restricted to tasks created
    /// by that admin.
    pub async fn list_completed(
        pool: &PgPool,
        assigned_by: Option<Uuid>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = match assigned_by {
            Some(admin_id) => {
                sqlx::query_as::<_, Task>(
                    r#"
                    SELECT id, title, description, assigned_to, assigned_by, due_date, status,
                           completion_report, worked_hours, completed_at, created_at, updated_at
                    FROM tasks
                    WHERE status = 'completed' AND assigned_by = $1
                    ORDER BY completed_at DESC
                    "#,
                )
                .bind(admin_id)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Task>(
                    r#"
                    SELECT id, title, description, assigned_to, assigned_by, due_date, status,
                           completion_report, worked_hours, completed_at, created_at, updated_at
                    FROM tasks
                    WHERE status = 'completed'
                    ORDER BY completed_at DESC
                    "#,
                )
                .fetch_all(pool)
                .await?
            }
        };

        Ok(tasks)
    }

    /// Counts every task
    pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Counts tasks created by an admin
    pub async fn count_by_assigner(pool: &PgPool, admin_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE assigned_by = $1")
            .bind(admin_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Counts completed tasks, optionally restricted to one admin's creations
    pub async fn count_completed(
        pool: &PgPool,
        assigned_by: Option<Uuid>,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = match assigned_by {
            Some(admin_id) => {
                sqlx::query_as(
                    "SELECT COUNT(*) FROM tasks WHERE status = 'completed' AND assigned_by = $1",
                )
                .bind(admin_id)
                .fetch_one(pool)
                .await?
            }
            None => {
                sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE status = 'completed'")
                    .fetch_one(pool)
                    .await?
            }
        };

        Ok(count)
    }

    /// Applies a validated transition outcome in a single UPDATE
    ///
    /// All fields of the outcome land together or not at all; readers never
    /// observe a partial write. `completion_report`, `worked_hours` and
    /// `completed_at` keep their prior value when the outcome does not carry
    /// a replacement.
    ///
    /// The WHERE clause re-checks the status the outcome was validated
    /// against, so a racing transition that commits first makes this write
    /// a no-op instead of dragging the row backwards (a completed task can
    /// never be un-completed by a stale snapshot).
    ///
    /// Returns the updated task, or None if the row vanished or its status
    /// no longer matches `current`.
    pub async fn apply_transition(
        pool: &PgPool,
        id: Uuid,
        current: TaskStatus,
        outcome: &TransitionOutcome,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET status = $2,
                completion_report = COALESCE($3, completion_report),
                worked_hours = COALESCE($4, worked_hours),
                completed_at = COALESCE($5, completed_at),
                updated_at = NOW()
            WHERE id = $1 AND status = $6
            RETURNING id, title, description, assigned_to, assigned_by, due_date, status,
                      completion_report, worked_hours, completed_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(outcome.status)
        .bind(outcome.completion_report.as_deref())
        .bind(outcome.worked_hours)
        .bind(outcome.completed_at)
        .bind(current)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_as_str() {
        assert_eq!(TaskStatus::Pending.as_str(), "pending");
        assert_eq!(TaskStatus::InProgress.as_str(), "in_progress");
        assert_eq!(TaskStatus::Completed.as_str(), "completed");
    }

    #[test]
    fn test_task_status_is_terminal() {
        assert!(!TaskStatus::Pending.is_terminal());
        assert!(!TaskStatus::InProgress.is_terminal());
        assert!(TaskStatus::Completed.is_terminal());
    }

    #[test]
    fn test_task_status_transitions() {
        assert!(TaskStatus::Pending.can_transition_to(TaskStatus::InProgress));
        assert!(TaskStatus::Pending.can_transition_to(TaskStatus::Completed));
        assert!(TaskStatus::InProgress.can_transition_to(TaskStatus::Completed));

        // No backwards moves
        assert!(!TaskStatus::InProgress.can_transition_to(TaskStatus::Pending));
        assert!(!TaskStatus::Completed.can_transition_to(TaskStatus::Pending));
        assert!(!TaskStatus::Completed.can_transition_to(TaskStatus::InProgress));

        // Same status is not a forward move
        assert!(!TaskStatus::Pending.can_transition_to(TaskStatus::Pending));
        assert!(!TaskStatus::Completed.can_transition_to(TaskStatus::Completed));
    }

    #[test]
    fn test_task_status_serde_wire_format() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        let status: TaskStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(status, TaskStatus::Completed);
    }
}
