use serde::{Deserialize, Serialize};

/// JWT claims carried by the backend's access tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub user_id: i64,

    /// Login name
    #[serde(default)]
    pub username: String,

    /// Display name - optional, falls back to username
    #[serde(default)]
    pub full_name: Option<String>,

    /// Administrative capability
    #[serde(default)]
    pub is_staff: bool,

    /// Phone number - optional
    #[serde(default)]
    pub phone_number: Option<String>,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp) - optional
    #[serde(default)]
    pub iat: Option<i64>,

    /// Token ID - optional
    #[serde(default)]
    pub jti: Option<String>,

    /// "access" or "refresh" - optional
    #[serde(default)]
    pub token_type: Option<String>,
}
