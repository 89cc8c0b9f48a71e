/// Admin panel pages
///
/// # Pages
///
/// - `GET /admin/login` + `POST /admin/login` - Session login
/// - `POST /admin/logout` - End the session
/// - `GET /admin` - Role-specific dashboard
/// - `GET /admin/users` - Account management (superadmin only)
/// - `GET /admin/tasks` - Task list and creation form
/// - `GET /admin/reports` - Completed-task reports
///
/// Pages read through the same scoping layer as the JSON API. The create
/// forms submit JSON to the `/admin/actions/*` endpoints via a small
/// fetch helper embedded in the page.

use std::collections::HashMap;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Extension, Form,
};
use serde::Deserialize;
use taskdesk_shared::{
    auth::{
        jwt::{self, Claims, TokenType},
        password, policy,
    },
    models::user::{Role, User},
    scope::{self, Dashboard},
};
use uuid::Uuid;

use crate::{
    app::AppState,
    error::ApiResult,
};

use super::render::{escape, layout, stat_card, table};
use super::session::{self, PanelUser};

/// Fetch helper shared by the create forms
const FORM_SCRIPT: &str = r#"<script>
function submitJson(form, url) {
  const data = {};
  new FormData(form).forEach((v, k) => { if (v !== "") data[k] = v; });
  if (data.worked_hours) data.worked_hours = Number(data.worked_hours);
  if (data.due_date) data.due_date = new Date(data.due_date).toISOString();
  fetch(url, {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify(data),
  }).then(async (res) => {
    if (res.ok) { location.reload(); return; }
    const body = await res.json().catch(() => null);
    document.getElementById("form-error").textContent =
      body && body.message ? body.message : "Request failed";
  });
  return false;
}
</script>"#;

/// Login form fields
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    /// Login name
    pub username: String,

    /// Password
    pub password: String,
}

fn login_page(error: Option<&str>) -> Html<String> {
    let error_html = error
        .map(|msg| format!(r#"<p class="error">{}</p>"#, escape(msg)))
        .unwrap_or_default();

    let body = format!(
        concat!(
            "{error}",
            r#"<form method="post" action="/admin/login">"#,
            r#"<p><label>Username <input name="username" required></label></p>"#,
            r#"<p><label>Password <input name="password" type="password" required></label></p>"#,
            r#"<p><button type="submit">Log in</button></p>"#,
            "</form>"
        ),
        error = error_html,
    );

    Html(layout("Log in", None, &body))
}

/// Renders the login form
pub async fn login_form() -> Html<String> {
    login_page(None)
}

/// Handles a login submission
///
/// Only active admins and superadmins may open a panel session. On
/// success the access token is set as the session cookie and the browser
/// is redirected to the dashboard.
pub async fn login_submit(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> ApiResult<Response> {
    let Some(user) = User::find_by_username(&state.db, &form.username).await? else {
        return Ok(login_page(Some("Invalid credentials")).into_response());
    };

    if !password::verify_password(&form.password, &user.password_hash)? {
        return Ok(login_page(Some("Invalid credentials")).into_response());
    }

    if !user.is_active {
        return Ok(login_page(Some("User account is disabled")).into_response());
    }

    if !user.role.is_staff() {
        return Ok(login_page(Some("The admin panel requires admin privileges")).into_response());
    }

    User::update_last_login(&state.db, user.id).await?;

    let claims = Claims::new(user.id, user.role, TokenType::Access);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!(user_id = %user.id, role = user.role.as_str(), "Panel login");

    Ok((
        StatusCode::SEE_OTHER,
        [
            (header::SET_COOKIE, session::session_cookie(&token)),
            (header::LOCATION, "/admin".to_string()),
        ],
    )
        .into_response())
}

/// Ends the panel session
pub async fn logout() -> Response {
    (
        StatusCode::SEE_OTHER,
        [
            (header::SET_COOKIE, session::clear_session_cookie()),
            (header::LOCATION, "/admin/login".to_string()),
        ],
    )
        .into_response()
}

/// Renders the role-specific dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(PanelUser(user)): Extension<PanelUser>,
) -> ApiResult<Html<String>> {
    let actor = policy::Actor::new(user.id, user.role);

    // The session layer only admits staff, so a summary always exists.
    let cards = match scope::dashboard(&state.db, &actor).await? {
        Some(Dashboard::Superadmin {
            total_users,
            total_admins,
            total_tasks,
            completed_tasks,
        }) => [
            stat_card("Users", total_users),
            stat_card("Admins", total_admins),
            stat_card("Tasks", total_tasks),
            stat_card("Completed", completed_tasks),
        ]
        .concat(),
        Some(Dashboard::Admin {
            managed_users,
            created_tasks,
            completed_tasks,
        }) => [
            stat_card("Managed users", managed_users),
            stat_card("Tasks created", created_tasks),
            stat_card("Completed", completed_tasks),
        ]
        .concat(),
        None => String::new(),
    };

    let body = format!(r#"<div class="cards">{}</div>"#, cards);
    Ok(Html(layout("Dashboard", Some(&user), &body)))
}

/// Renders the user management page (superadmin only)
pub async fn users_page(
    State(state): State<AppState>,
    Extension(PanelUser(user)): Extension<PanelUser>,
) -> ApiResult<Html<String>> {
    let actor = policy::Actor::new(user.id, user.role);
    policy::authorize(&actor, &policy::Action::ManageUsers)?;

    let admins = User::list_by_role(&state.db, Role::Admin).await?;
    let users = User::list_by_role(&state.db, Role::User).await?;

    let admin_names: HashMap<Uuid, String> = admins
        .iter()
        .map(|a| (a.id, a.username.clone()))
        .collect();

    let user_rows: Vec<String> = users
        .iter()
        .map(|u| {
            let managed_by = u
                .assigned_admin
                .and_then(|id| admin_names.get(&id))
                .map(|name| escape(name))
                .unwrap_or_else(|| "-".to_string());
            let deactivate = if u.is_active {
                format!(
                    concat!(
                        r#"<form onsubmit="return submitJson(this, '/admin/actions/users/{}/deactivate')">"#,
                        r#"<button type="submit">Deactivate</button></form>"#
                    ),
                    u.id
                )
            } else {
                "inactive".to_string()
            };
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&u.username),
                escape(&u.display_name()),
                escape(&u.email),
                managed_by,
                deactivate,
            )
        })
        .collect();

    let admin_rows: Vec<String> = admins
        .iter()
        .map(|a| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&a.username),
                escape(&a.display_name()),
                escape(&a.email),
                if a.is_active { "active" } else { "inactive" },
            )
        })
        .collect();

    let admin_options: String = admins
        .iter()
        .filter(|a| a.is_active)
        .map(|a| format!(r#"<option value="{}">{}</option>"#, a.id, escape(&a.username)))
        .collect();

    let body = format!(
        concat!(
            "<h2>Admins</h2>{admins}",
            "<h2>Users</h2>{users}",
            "<h2>Create account</h2>",
            r#"<form onsubmit="return submitJson(this, '/admin/actions/users')">"#,
            r#"<p><label>Username <input name="username" required></label></p>"#,
            r#"<p><label>Email <input name="email" type="email" required></label></p>"#,
            r#"<p><label>First name <input name="first_name"></label></p>"#,
            r#"<p><label>Last name <input name="last_name"></label></p>"#,
            r#"<p><label>Password <input name="password" type="password" required></label></p>"#,
            r#"<p><label>Role <select name="role">"#,
            r#"<option value="user">user</option>"#,
            r#"<option value="admin">admin</option>"#,
            "</select></label></p>",
            r#"<p><label>Managing admin <select name="assigned_admin">"#,
            r#"<option value="">none</option>{admin_options}"#,
            "</select></label></p>",
            r#"<p><button type="submit">Create</button></p>"#,
            r#"<p id="form-error" class="error"></p>"#,
            "</form>{script}"
        ),
        admins = table(&["Username", "Name", "Email", "Status"], &admin_rows),
        users = table(&["Username", "Name", "Email", "Managed by", ""], &user_rows),
        admin_options = admin_options,
        script = FORM_SCRIPT,
    );

    Ok(Html(layout("Users", Some(&user), &body)))
}

/// Renders the task list and creation form
pub async fn tasks_page(
    State(state): State<AppState>,
    Extension(PanelUser(user)): Extension<PanelUser>,
) -> ApiResult<Html<String>> {
    let actor = policy::Actor::new(user.id, user.role);

    let tasks = scope::visible_tasks(&state.db, &actor).await?;
    let visible = scope::visible_users(&state.db, &actor).await?;

    let usernames: HashMap<Uuid, String> = visible
        .iter()
        .map(|u| (u.id, u.username.clone()))
        .collect();
    let name_of = |id: Uuid| {
        usernames
            .get(&id)
            .map(|name| escape(name))
            .unwrap_or_else(|| id.to_string())
    };

    let rows: Vec<String> = tasks
        .iter()
        .map(|t| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&t.title),
                name_of(t.assigned_to),
                t.status.as_str(),
                t.due_date.format("%Y-%m-%d %H:%M"),
            )
        })
        .collect();

    let assignee_options: String = visible
        .iter()
        .filter(|u| u.role == Role::User && u.is_active)
        .map(|u| format!(r#"<option value="{}">{}</option>"#, u.id, escape(&u.username)))
        .collect();

    let body = format!(
        concat!(
            "{tasks}",
            "<h2>Create task</h2>",
            r#"<form onsubmit="return submitJson(this, '/admin/actions/tasks')">"#,
            r#"<p><label>Title <input name="title" required></label></p>"#,
            r#"<p><label>Description <textarea name="description"></textarea></label></p>"#,
            r#"<p><label>Assignee <select name="assigned_to" required>{assignees}</select></label></p>"#,
            r#"<p><label>Due <input name="due_date" type="datetime-local" required></label></p>"#,
            r#"<p><button type="submit">Create</button></p>"#,
            r#"<p id="form-error" class="error"></p>"#,
            "</form>{script}"
        ),
        tasks = table(&["Title", "Assignee", "Status", "Due"], &rows),
        assignees = assignee_options,
        script = FORM_SCRIPT,
    );

    Ok(Html(layout("Tasks", Some(&user), &body)))
}

/// Renders the completed-task reports page
pub async fn reports_page(
    State(state): State<AppState>,
    Extension(PanelUser(user)): Extension<PanelUser>,
) -> ApiResult<Html<String>> {
    let actor = policy::Actor::new(user.id, user.role);

    let completed = scope::completed_tasks(&state.db, &actor).await?;
    let visible = scope::visible_users(&state.db, &actor).await?;

    let usernames: HashMap<Uuid, String> = visible
        .iter()
        .map(|u| (u.id, u.username.clone()))
        .collect();

    let rows: Vec<String> = completed
        .iter()
        .map(|t| {
            let assignee = usernames
                .get(&t.assigned_to)
                .map(|name| escape(name))
                .unwrap_or_else(|| t.assigned_to.to_string());
            let completed_at = t
                .completed_at
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string());
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&t.title),
                assignee,
                escape(t.completion_report.as_deref().unwrap_or("-")),
                t.worked_hours
                    .map(|h| format!("{h:.1}"))
                    .unwrap_or_else(|| "-".to_string()),
                completed_at,
            )
        })
        .collect();

    let body = table(&["Title", "Assignee", "Report", "Hours", "Completed"], &rows);

    Ok(Html(layout("Reports", Some(&user), &body)))
}
