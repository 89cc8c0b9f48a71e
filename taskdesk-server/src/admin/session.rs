/// Cookie sessions for the admin panel
///
/// A panel session is the access JWT stored in an HttpOnly cookie. The
/// middleware validates the token on every request and resolves it to a
/// live user row, so deactivating an account ends its panel sessions
/// within one request. Only admins and superadmins may hold a session;
/// anything else is bounced to the login page.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use taskdesk_shared::auth::{jwt, middleware::AuthContext};
use taskdesk_shared::models::user::User;

use crate::app::AppState;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "taskdesk_session";

/// The resolved panel user, inserted into request extensions
#[derive(Debug, Clone)]
pub struct PanelUser(pub User);

/// Builds the Set-Cookie value establishing a session
pub fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/admin; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, token
    )
}

/// Builds the Set-Cookie value ending a session
pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/admin; HttpOnly; Max-Age=0", SESSION_COOKIE)
}

/// Extracts the session token from the Cookie header, if present
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;

    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// Session authentication middleware
///
/// Validates the cookie, loads the user, and requires an active staff
/// account. Failures redirect to the login page.
pub async fn session_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = token_from_headers(req.headers()) else {
        return Redirect::to("/admin/login").into_response();
    };

    let claims = match jwt::validate_access_token(&token, state.jwt_secret()) {
        Ok(claims) => claims,
        Err(_) => return Redirect::to("/admin/login").into_response(),
    };

    let user = match User::find_by_id(&state.db, claims.sub).await {
        Ok(Some(user)) => user,
        Ok(None) | Err(_) => return Redirect::to("/admin/login").into_response(),
    };

    if !user.is_active || !user.role.is_staff() {
        return Redirect::to("/admin/login").into_response();
    }

    // Role comes from the live row, not the token, so demotions apply
    // within a token's lifetime.
    let auth = AuthContext {
        user_id: user.id,
        role: user.role,
    };
    req.extensions_mut().insert(auth);
    req.extensions_mut().insert(PanelUser(user));

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_token_extracted_from_cookie_header() {
        let headers = headers_with_cookie("taskdesk_session=abc.def.ghi");
        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_token_found_among_other_cookies() {
        let headers = headers_with_cookie("theme=dark; taskdesk_session=tok; lang=en");
        assert_eq!(token_from_headers(&headers).as_deref(), Some("tok"));
    }

    #[test]
    fn test_missing_or_empty_cookie_yields_none() {
        assert!(token_from_headers(&HeaderMap::new()).is_none());

        let headers = headers_with_cookie("theme=dark");
        assert!(token_from_headers(&headers).is_none());

        let headers = headers_with_cookie("taskdesk_session=");
        assert!(token_from_headers(&headers).is_none());
    }

    #[test]
    fn test_cookie_values_roundtrip() {
        let set = session_cookie("tok");
        assert!(set.starts_with("taskdesk_session=tok"));
        assert!(set.contains("HttpOnly"));

        let clear = clear_session_cookie();
        assert!(clear.contains("Max-Age=0"));
    }
}
