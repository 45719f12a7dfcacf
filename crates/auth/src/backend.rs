//! Claims-only authentication backend
//!
//! Wraps `AuthConfig` and turns a bearer token into an `AuthPrincipal`.
//! The access token already carries the principal id and role, so no
//! account lookup happens here; domains needing richer data load it
//! through their own repositories.

use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::jwt::validate_jwt_token;
use crate::principal::{AuthPrincipal, PrincipalRole};

/// Concrete authentication backend.
///
/// Domain states expose this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for AuthBackend {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Clone)]
pub struct AuthBackend {
    config: AuthConfig,
}

impl AuthBackend {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Validate a JWT and build the authenticated principal from its claims
    pub fn authenticate_jwt(&self, token: &str) -> Result<AuthPrincipal, AuthError> {
        let claims = validate_jwt_token(token, &self.config)?;

        let id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidPrincipalId)?;
        let role = PrincipalRole::from_claim(&claims.role).ok_or(AuthError::UnknownRole)?;

        Ok(AuthPrincipal { id, role })
    }
}
