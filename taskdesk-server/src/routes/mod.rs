/// JSON API route handlers
///
/// - `health`: liveness endpoint
/// - `auth`: login and token refresh
/// - `tasks`: task listing, status updates, completion reports

pub mod auth;
pub mod health;
pub mod tasks;
