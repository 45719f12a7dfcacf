//! Authentication middleware for the Stagelink API
//!
//! Provides JWT validation and axum extractors that work with any domain
//! state implementing `FromRef<S>` for `AuthBackend`. Validation is
//! claims-only: the token carries everything downstream handlers need
//! (principal id + role), so no database round trip happens here.

mod backend;
mod claims;
mod config;
mod error;
mod extractors;
mod jwt;
mod principal;

pub use backend::AuthBackend;
pub use claims::AccessClaims;
pub use config::AuthConfig;
pub use error::AuthError;
pub use extractors::AuthUser;
pub use principal::{AuthPrincipal, PrincipalRole};
