//! Authenticated principal supplied to every domain service call

use serde::Serialize;
use uuid::Uuid;

/// Role of an authenticated marketplace account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalRole {
    /// End user booking bands for events
    Client,
    /// Band member acting on behalf of a band
    Musician,
}

impl PrincipalRole {
    /// Parse the role claim; unknown values are rejected upstream
    pub fn from_claim(value: &str) -> Option<Self> {
        match value {
            "client" => Some(PrincipalRole::Client),
            "musician" => Some(PrincipalRole::Musician),
            _ => None,
        }
    }
}

impl std::fmt::Display for PrincipalRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrincipalRole::Client => write!(f, "client"),
            PrincipalRole::Musician => write!(f, "musician"),
        }
    }
}

/// An already-authenticated principal: id + role.
///
/// This is the only identity the chat core consumes; loading richer
/// account data is the owning domain's concern.
#[derive(Debug, Clone, Copy)]
pub struct AuthPrincipal {
    pub id: Uuid,
    pub role: PrincipalRole,
}
