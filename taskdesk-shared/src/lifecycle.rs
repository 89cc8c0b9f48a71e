/// Task lifecycle validation
///
/// This module decides whether a requested status change is legal and what
/// exactly gets written if it is. It is pure: callers load the task, run
/// [`validate_transition`], and persist the returned [`TransitionOutcome`]
/// with `Task::apply_transition` in one UPDATE.
///
/// # Rules
///
/// - Progression is one-directional: pending → in_progress → completed, or
///   pending → completed directly. Completed is terminal; nothing moves out
///   of it, not even completed → completed.
/// - Re-asserting the currently held non-terminal status is accepted as a
///   no-op.
/// - Completing requires a non-blank report and worked hours > 0; both
///   failures are reported together when both apply.
/// - Worked hours must be > 0 whenever supplied, under any target status.
/// - `completed_at` is stamped once, at the moment of the completing call.
///
/// # Example
///
/// ```
/// use taskdesk_shared::lifecycle::{validate_transition, StatusChange};
/// use taskdesk_shared::models::task::TaskStatus;
/// use chrono::Utc;
///
/// let change = StatusChange {
///     status: TaskStatus::Completed,
///     completion_report: Some("Done".to_string()),
///     worked_hours: Some(3.5),
/// };
///
/// let outcome = validate_transition(TaskStatus::InProgress, &change, Utc::now()).unwrap();
/// assert_eq!(outcome.status, TaskStatus::Completed);
/// assert!(outcome.completed_at.is_some());
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::task::TaskStatus;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

impl FieldError {
    /// Creates a field error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A requested status change, as submitted by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
    /// Target status
    pub status: TaskStatus,

    /// Completion report, required when completing
    pub completion_report: Option<String>,

    /// Worked hours, required when completing, > 0 whenever present
    pub worked_hours: Option<f64>,
}

/// The validated effect of a status change
///
/// Optional fields carry `Some` only when the write should replace the
/// stored value; `None` means "keep what is there".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    /// Status to store
    pub status: TaskStatus,

    /// Report to store, if supplied
    pub completion_report: Option<String>,

    /// Hours to store, if supplied
    pub worked_hours: Option<f64>,

    /// Completion timestamp, set exactly when the target status is completed
    pub completed_at: Option<DateTime<Utc>>,
}

/// Validates a status change against the current status
///
/// Returns the outcome to persist, or every field-level failure at once.
/// `now` becomes `completed_at` when the change completes the task.
pub fn validate_transition(
    current: TaskStatus,
    change: &StatusChange,
    now: DateTime<Utc>,
) -> Result<TransitionOutcome, Vec<FieldError>> {
    let mut errors = Vec::new();

    if current.is_terminal() {
        return Err(vec![FieldError::new(
            "status",
            "completed tasks cannot change status",
        )]);
    }

    let is_noop = change.status == current;
    if !is_noop && !current.can_transition_to(change.status) {
        errors.push(FieldError::new(
            "status",
            format!(
                "cannot move from {} to {}",
                current.as_str(),
                change.status.as_str()
            ),
        ));
    }

    match change.worked_hours {
        Some(hours) if hours <= 0.0 => {
            errors.push(FieldError::new(
                "worked_hours",
                "worked hours must be greater than zero",
            ));
        }
        Some(_) => {}
        None => {
            if change.status == TaskStatus::Completed {
                errors.push(FieldError::new(
                    "worked_hours",
                    "worked hours are required when marking a task as completed",
                ));
            }
        }
    }

    if change.status == TaskStatus::Completed {
        let report_blank = change
            .completion_report
            .as_deref()
            .map(|r| r.trim().is_empty())
            .unwrap_or(true);
        if report_blank {
            errors.push(FieldError::new(
                "completion_report",
                "a completion report is required when marking a task as completed",
            ));
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(TransitionOutcome {
        status: change.status,
        completion_report: change.completion_report.clone(),
        worked_hours: change.worked_hours,
        completed_at: (change.status == TaskStatus::Completed).then_some(now),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(status: TaskStatus, report: Option<&str>, hours: Option<f64>) -> StatusChange {
        StatusChange {
            status,
            completion_report: report.map(str::to_string),
            worked_hours: hours,
        }
    }

    fn fields(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn test_pending_to_in_progress() {
        let outcome = validate_transition(
            TaskStatus::Pending,
            &change(TaskStatus::InProgress, None, None),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(outcome.status, TaskStatus::InProgress);
        assert!(outcome.completed_at.is_none());
        assert!(outcome.completion_report.is_none());
    }

    #[test]
    fn test_completion_stores_report_hours_and_timestamp() {
        let now = Utc::now();
        let outcome = validate_transition(
            TaskStatus::InProgress,
            &change(TaskStatus::Completed, Some("Done"), Some(3.5)),
            now,
        )
        .unwrap();

        assert_eq!(outcome.status, TaskStatus::Completed);
        assert_eq!(outcome.completion_report.as_deref(), Some("Done"));
        assert_eq!(outcome.worked_hours, Some(3.5));
        assert_eq!(outcome.completed_at, Some(now));
    }

    #[test]
    fn test_direct_pending_to_completed_is_allowed() {
        let outcome = validate_transition(
            TaskStatus::Pending,
            &change(TaskStatus::Completed, Some("Quick fix"), Some(0.25)),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(outcome.status, TaskStatus::Completed);
    }

    #[test]
    fn test_completion_without_report_names_the_field() {
        let errors = validate_transition(
            TaskStatus::InProgress,
            &change(TaskStatus::Completed, None, Some(2.0)),
            Utc::now(),
        )
        .unwrap_err();

        assert_eq!(fields(&errors), vec!["completion_report"]);
    }

    #[test]
    fn test_completion_missing_both_reports_both_fields() {
        let errors = validate_transition(
            TaskStatus::Pending,
            &change(TaskStatus::Completed, None, None),
            Utc::now(),
        )
        .unwrap_err();

        let fields = fields(&errors);
        assert!(fields.contains(&"completion_report"));
        assert!(fields.contains(&"worked_hours"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_zero_hours_rejected_on_completion() {
        let errors = validate_transition(
            TaskStatus::InProgress,
            &change(TaskStatus::Completed, Some("Done"), Some(0.0)),
            Utc::now(),
        )
        .unwrap_err();

        assert_eq!(fields(&errors), vec!["worked_hours"]);
    }

    #[test]
    fn test_negative_hours_rejected_regardless_of_status() {
        let errors = validate_transition(
            TaskStatus::Pending,
            &change(TaskStatus::InProgress, None, Some(-1.0)),
            Utc::now(),
        )
        .unwrap_err();

        assert_eq!(fields(&errors), vec!["worked_hours"]);
    }

    #[test]
    fn test_blank_report_counts_as_missing() {
        let errors = validate_transition(
            TaskStatus::InProgress,
            &change(TaskStatus::Completed, Some("   "), Some(1.0)),
            Utc::now(),
        )
        .unwrap_err();

        assert_eq!(fields(&errors), vec!["completion_report"]);
    }

    #[test]
    fn test_reassert_current_status_is_a_noop() {
        let outcome = validate_transition(
            TaskStatus::InProgress,
            &change(TaskStatus::InProgress, None, None),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(outcome.status, TaskStatus::InProgress);
        assert!(outcome.completed_at.is_none());
    }

    #[test]
    fn test_completed_is_terminal_for_every_target() {
        for target in [
            TaskStatus::Pending,
            TaskStatus::InProgress,
            TaskStatus::Completed,
        ] {
            let errors = validate_transition(
                TaskStatus::Completed,
                &change(target, Some("again"), Some(1.0)),
                Utc::now(),
            )
            .unwrap_err();

            assert_eq!(fields(&errors), vec!["status"], "target {:?}", target);
        }
    }

    #[test]
    fn test_backwards_move_rejected() {
        let errors = validate_transition(
            TaskStatus::InProgress,
            &change(TaskStatus::Pending, None, None),
            Utc::now(),
        )
        .unwrap_err();

        assert_eq!(fields(&errors), vec!["status"]);
    }

    #[test]
    fn test_hours_stored_as_given_on_non_completing_change() {
        let outcome = validate_transition(
            TaskStatus::Pending,
            &change(TaskStatus::InProgress, Some("partial notes"), Some(1.5)),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(outcome.completion_report.as_deref(), Some("partial notes"));
        assert_eq!(outcome.worked_hours, Some(1.5));
        assert!(outcome.completed_at.is_none());
    }
}
