/// Server-rendered admin panel
///
/// Session-cookie authenticated surface for admins and superadmins:
/// login/logout, a role-specific dashboard, user management, task
/// management, and completed-task reports. Pages query through the same
/// scoping layer as the JSON API, so both surfaces always agree.
///
/// - `session`: cookie-based sessions (the access JWT in an HttpOnly cookie)
/// - `render`: minimal HTML building blocks
/// - `pages`: GET handlers returning rendered pages
/// - `actions`: JSON POST endpoints backing the page forms

pub mod actions;
pub mod pages;
pub mod render;
pub mod session;

use crate::app::AppState;
use axum::{
    routing::{get, post},
    Router,
};

/// Builds the admin panel router (nested under `/admin`)
pub fn router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", get(pages::dashboard))
        .route("/users", get(pages::users_page))
        .route("/tasks", get(pages::tasks_page))
        .route("/reports", get(pages::reports_page))
        .route("/logout", post(pages::logout))
        .route("/actions/users", post(actions::create_user))
        .route("/actions/users/:id/deactivate", post(actions::deactivate_user))
        .route("/actions/tasks", post(actions::create_task))
        .layer(axum::middleware::from_fn_with_state(
            state,
            session::session_auth_layer,
        ));

    Router::new()
        .route("/login", get(pages::login_form).post(pages::login_submit))
        .merge(protected)
}
