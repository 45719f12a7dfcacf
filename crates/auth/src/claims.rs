//! JWT claims types

use serde::{Deserialize, Serialize};

/// Claims carried by Stagelink access tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (principal ID)
    pub sub: String,
    /// Principal role ("client" or "musician")
    pub role: String,
    /// Issued at
    pub iat: u64,
    /// Expires at
    pub exp: u64,
    /// Audience
    pub aud: Option<String>,
}
