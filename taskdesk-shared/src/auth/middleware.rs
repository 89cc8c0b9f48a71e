/// Authentication context for request handling
///
/// The server's middleware layers (bearer tokens for the JSON API, session
/// cookies for the admin panel) validate credentials and insert an
/// [`AuthContext`] into the request extensions. Handlers extract it with
/// Axum's `Extension` extractor and turn it into a policy [`Actor`].
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use taskdesk_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {} ({})", auth.user_id, auth.role.as_str())
/// }
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::Claims;
use super::policy::Actor;
use crate::models::user::Role;

/// Authentication context added to request extensions
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Role carried by the credential
    pub role: Role,
}

impl AuthContext {
    /// Creates an auth context from validated JWT claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
        }
    }

    /// The policy-engine actor for this context
    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id, self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::TokenType;

    #[test]
    fn test_context_from_claims() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, Role::Admin, TokenType::Access);

        let ctx = AuthContext::from_claims(&claims);
        assert_eq!(ctx.user_id, user_id);
        assert_eq!(ctx.role, Role::Admin);

        let actor = ctx.actor();
        assert_eq!(actor.id, user_id);
        assert_eq!(actor.role, Role::Admin);
    }
}
