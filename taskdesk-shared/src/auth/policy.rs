/// Authorization policy engine
///
/// A pure decision function over the current state: given an actor (id +
/// role) and an action carrying the resource snapshots the decision needs,
/// [`authorize`] answers allow or deny. No I/O happens here; callers load
/// the rows first.
///
/// # Rule precedence
///
/// 1. A completion report only exists for completed tasks: viewing the
///    report of a non-completed task is unavailable for every role.
/// 2. Superadmin is allowed everything else.
/// 3. Admins operate inside their managed scope: they create regular user
///    accounts (the caller must force `assigned_admin` to the creating
///    admin), create tasks only for their managed users, see and update
///    tasks they created, and read reports only from their managed users.
/// 4. Regular users see and update only their own tasks, and nothing else.
///
/// # Example
///
/// ```no_run
/// use taskdesk_shared::auth::policy::{authorize, Action, Actor};
/// use taskdesk_shared::models::{task::Task, user::Role};
///
/// fn check(actor: &Actor, task: &Task) -> bool {
///     authorize(actor, &Action::UpdateTask(task)).is_ok()
/// }
/// ```

use uuid::Uuid;

use crate::models::task::{Task, TaskStatus};
use crate::models::user::{Role, User};

/// The identity performing a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// User ID
    pub id: Uuid,

    /// Role carried by the authenticated session
    pub role: Role,
}

impl Actor {
    /// Creates an actor
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }
}

/// An action on a resource, with the state the decision depends on
#[derive(Debug)]
pub enum Action<'a> {
    /// Create an account with the given role
    CreateUser {
        /// Role of the account being created
        role: Role,
    },

    /// List or deactivate accounts
    ManageUsers,

    /// Create a task for the given assignee
    CreateTask {
        /// The user the task would be assigned to
        assignee: &'a User,
    },

    /// View a single task
    ViewTask(&'a Task),

    /// Change a task's status/report/hours
    UpdateTask(&'a Task),

    /// Read a task's completion report
    ViewTaskReport {
        /// The task whose report is requested
        task: &'a Task,
        /// The task's assignee (for the managed-scope check)
        assignee: &'a User,
    },
}

/// Denial outcome of an authorization check
///
/// `Forbidden` maps to an HTTP 403; `ReportUnavailable` maps to 404 so a
/// denied report request does not reveal more than the role is entitled to
/// know.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    /// The actor lacks permission for this action
    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    /// Reports only exist for completed tasks
    #[error("completion report not available")]
    ReportUnavailable,
}

/// Decides whether `actor` may perform `action`
///
/// Pure function; denials are distinguishable from not-found and from
/// validation failures so callers can map them to the right response.
pub fn authorize(actor: &Actor, action: &Action<'_>) -> Result<(), PolicyError> {
    // Reports only exist for completed work, regardless of role.
    if let Action::ViewTaskReport { task, .. } = action {
        if task.status != TaskStatus::Completed {
            return Err(PolicyError::ReportUnavailable);
        }
    }

    match actor.role {
        Role::Superadmin => Ok(()),

        Role::Admin => match action {
            Action::CreateUser { role } => {
                if *role == Role::User {
                    // The creation path forces assigned_admin = actor.id.
                    Ok(())
                } else {
                    Err(PolicyError::Forbidden(
                        "admins may only create regular user accounts",
                    ))
                }
            }
            Action::ManageUsers => Err(PolicyError::Forbidden(
                "user management requires superadmin privileges",
            )),
            Action::CreateTask { assignee } => {
                if assignee.assigned_admin == Some(actor.id) {
                    Ok(())
                } else {
                    Err(PolicyError::Forbidden(
                        "tasks can only be assigned to your managed users",
                    ))
                }
            }
            Action::ViewTask(task) | Action::UpdateTask(task) => {
                if task.assigned_by == actor.id {
                    Ok(())
                } else {
                    Err(PolicyError::Forbidden(
                        "task was created by another admin",
                    ))
                }
            }
            Action::ViewTaskReport { assignee, .. } => {
                if assignee.assigned_admin == Some(actor.id) {
                    Ok(())
                } else {
                    Err(PolicyError::Forbidden(
                        "reports are only visible for your managed users",
                    ))
                }
            }
        },

        Role::User => match action {
            Action::ViewTask(task) | Action::UpdateTask(task) => {
                if task.assigned_to == actor.id {
                    Ok(())
                } else {
                    Err(PolicyError::Forbidden(
                        "task is assigned to another user",
                    ))
                }
            }
            Action::ViewTaskReport { .. } => Err(PolicyError::Forbidden(
                "reports require admin privileges",
            )),
            Action::CreateUser { .. } | Action::ManageUsers => Err(PolicyError::Forbidden(
                "user management requires admin privileges",
            )),
            Action::CreateTask { .. } => Err(PolicyError::Forbidden(
                "task creation requires admin privileges",
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user_with(role: Role, assigned_admin: Option<Uuid>) -> User {
        User {
            id: Uuid::new_v4(),
            username: "someone".to_string(),
            email: "someone@example.com".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            role,
            assigned_admin,
            password_hash: "$argon2id$stub".to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_login_at: None,
        }
    }

    fn task_between(assigned_by: Uuid, assigned_to: Uuid, status: TaskStatus) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: "Ship it".to_string(),
            description: "Ship the thing".to_string(),
            assigned_to,
            assigned_by,
            due_date: Utc::now(),
            status,
            completion_report: None,
            worked_hours: None,
            completed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_superadmin_is_allowed_everything() {
        let sa = Actor::new(Uuid::new_v4(), Role::Superadmin);
        let stranger = user_with(Role::User, Some(Uuid::new_v4()));
        let task = task_between(Uuid::new_v4(), stranger.id, TaskStatus::Pending);

        assert!(authorize(&sa, &Action::CreateUser { role: Role::Admin }).is_ok());
        assert!(authorize(&sa, &Action::ManageUsers).is_ok());
        assert!(authorize(&sa, &Action::CreateTask { assignee: &stranger }).is_ok());
        assert!(authorize(&sa, &Action::ViewTask(&task)).is_ok());
        assert!(authorize(&sa, &Action::UpdateTask(&task)).is_ok());
    }

    #[test]
    fn test_report_for_uncompleted_task_unavailable_even_for_superadmin() {
        let sa = Actor::new(Uuid::new_v4(), Role::Superadmin);
        let assignee = user_with(Role::User, None);
        let task = task_between(Uuid::new_v4(), assignee.id, TaskStatus::Pending);

        let err = authorize(
            &sa,
            &Action::ViewTaskReport {
                task: &task,
                assignee: &assignee,
            },
        )
        .unwrap_err();

        assert_eq!(err, PolicyError::ReportUnavailable);
    }

    #[test]
    fn test_admin_creates_only_regular_users() {
        let admin = Actor::new(Uuid::new_v4(), Role::Admin);

        assert!(authorize(&admin, &Action::CreateUser { role: Role::User }).is_ok());
        assert!(matches!(
            authorize(&admin, &Action::CreateUser { role: Role::Admin }),
            Err(PolicyError::Forbidden(_))
        ));
        assert!(matches!(
            authorize(&admin, &Action::ManageUsers),
            Err(PolicyError::Forbidden(_))
        ));
    }

    #[test]
    fn test_admin_creates_tasks_only_inside_managed_scope() {
        let admin = Actor::new(Uuid::new_v4(), Role::Admin);
        let managed = user_with(Role::User, Some(admin.id));
        let unmanaged = user_with(Role::User, Some(Uuid::new_v4()));

        assert!(authorize(&admin, &Action::CreateTask { assignee: &managed }).is_ok());
        assert!(matches!(
            authorize(&admin, &Action::CreateTask { assignee: &unmanaged }),
            Err(PolicyError::Forbidden(_))
        ));
    }

    #[test]
    fn test_admin_task_visibility_follows_assigned_by() {
        let admin = Actor::new(Uuid::new_v4(), Role::Admin);
        let other_admin = Uuid::new_v4();
        let assignee = Uuid::new_v4();

        let own = task_between(admin.id, assignee, TaskStatus::Pending);
        let foreign = task_between(other_admin, assignee, TaskStatus::Pending);

        assert!(authorize(&admin, &Action::ViewTask(&own)).is_ok());
        assert!(authorize(&admin, &Action::UpdateTask(&own)).is_ok());
        assert!(authorize(&admin, &Action::ViewTask(&foreign)).is_err());
        assert!(authorize(&admin, &Action::UpdateTask(&foreign)).is_err());
    }

    #[test]
    fn test_admin_report_access_follows_assignee_admin() {
        let admin = Actor::new(Uuid::new_v4(), Role::Admin);
        let mine = user_with(Role::User, Some(admin.id));
        let theirs = user_with(Role::User, Some(Uuid::new_v4()));

        // Report scope follows the assignee's current admin, even when the
        // task was created by someone else.
        let task = task_between(Uuid::new_v4(), mine.id, TaskStatus::Completed);
        assert!(authorize(
            &admin,
            &Action::ViewTaskReport {
                task: &task,
                assignee: &mine
            }
        )
        .is_ok());

        let task = task_between(admin.id, theirs.id, TaskStatus::Completed);
        assert!(matches!(
            authorize(
                &admin,
                &Action::ViewTaskReport {
                    task: &task,
                    assignee: &theirs
                }
            ),
            Err(PolicyError::Forbidden(_))
        ));
    }

    #[test]
    fn test_user_updates_only_own_tasks() {
        let user = Actor::new(Uuid::new_v4(), Role::User);
        let own = task_between(Uuid::new_v4(), user.id, TaskStatus::Pending);
        let foreign = task_between(Uuid::new_v4(), Uuid::new_v4(), TaskStatus::Pending);

        assert!(authorize(&user, &Action::UpdateTask(&own)).is_ok());
        assert!(authorize(&user, &Action::ViewTask(&own)).is_ok());
        assert!(matches!(
            authorize(&user, &Action::UpdateTask(&foreign)),
            Err(PolicyError::Forbidden(_))
        ));
        assert!(matches!(
            authorize(&user, &Action::ViewTask(&foreign)),
            Err(PolicyError::Forbidden(_))
        ));
    }

    #[test]
    fn test_user_denied_everything_else() {
        let user = Actor::new(Uuid::new_v4(), Role::User);
        let assignee = user_with(Role::User, None);
        let completed = task_between(Uuid::new_v4(), user.id, TaskStatus::Completed);

        assert!(authorize(&user, &Action::CreateUser { role: Role::User }).is_err());
        assert!(authorize(&user, &Action::ManageUsers).is_err());
        assert!(authorize(&user, &Action::CreateTask { assignee: &assignee }).is_err());
        assert!(matches!(
            authorize(
                &user,
                &Action::ViewTaskReport {
                    task: &completed,
                    assignee: &assignee
                }
            ),
            Err(PolicyError::Forbidden(_))
        ));
    }
}
