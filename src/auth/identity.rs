use super::Claims;

/// Identity of the signed-in user, decoded from the access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// User ID (from the user_id claim)
    pub user_id: i64,

    /// Login name
    pub username: String,

    /// Name shown in headers and greetings
    pub display_name: String,

    /// Whether the user may assign, approve and reject tasks
    pub is_privileged: bool,

    /// Phone number if available
    pub phone_number: Option<String>,

    /// JWT claims
    claims: Claims,
}

impl Identity {
    pub fn from_claims(claims: Claims) -> Self {
        let display_name = claims
            .full_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&claims.username)
            .to_string();

        Self {
            user_id: claims.user_id,
            username: claims.username.clone(),
            display_name,
            is_privileged: claims.is_staff,
            phone_number: claims.phone_number.clone().filter(|p| !p.is_empty()),
            claims,
        }
    }

    /// Get the JWT claims
    pub fn claims(&self) -> &Claims {
        &self.claims
    }
}
