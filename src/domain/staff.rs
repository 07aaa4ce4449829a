//! Staff domain types
//!
//! Staff members tasks get assigned to, plus the create/update commands.

use serde::{Deserialize, Serialize};

pub type StaffId = i64;

/// Role flags. Independent booleans; a member may hold several roles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffRoles {
    #[serde(default)]
    pub is_programmer: bool,
    #[serde(default)]
    pub is_tester: bool,
    #[serde(default)]
    pub is_manager: bool,
}

impl StaffRoles {
    pub fn programmer() -> Self {
        Self {
            is_programmer: true,
            ..Self::default()
        }
    }

    /// Human-readable role names, in a stable order.
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.is_programmer {
            labels.push("programmer");
        }
        if self.is_tester {
            labels.push("tester");
        }
        if self.is_manager {
            labels.push("manager");
        }
        labels
    }
}

/// Staff member entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: StaffId,
    pub full_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Years of experience as free text, e.g. "3 years"
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(flatten)]
    pub roles: StaffRoles,
}

/// Profile fields shared by create and update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StaffProfile {
    pub phone_number: String,
    pub address: String,
    pub experience: String,
    pub education: String,
    pub bio: String,
}

/// Command for registering a new staff member
///
/// The backend derives the login name from first and last name.
#[derive(Debug, Clone, Serialize)]
pub struct CreateStaff {
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    #[serde(flatten)]
    pub profile: StaffProfile,
    #[serde(flatten)]
    pub roles: StaffRoles,
}

/// Command for a partial update of a staff member
#[derive(Debug, Clone, Serialize)]
pub struct UpdateStaff {
    #[serde(skip)]
    pub id: StaffId,
    pub first_name: String,
    pub last_name: String,
    /// Left unchanged on the backend when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(flatten)]
    pub profile: StaffProfile,
    #[serde(flatten)]
    pub roles: StaffRoles,
}

/// A submitted staff form
#[derive(Debug, Clone)]
pub enum StaffCommand {
    Create(CreateStaff),
    Update(UpdateStaff),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_payload_without_roles_defaults_to_none() {
        let member: StaffMember = serde_json::from_value(json!({
            "id": 2,
            "full_name": "Programmist 2",
            "phone_number": "+998901234502",
            "address": "Manzil 2",
            "experience": "2 yil",
            "education": "Oliy",
            "bio": null
        }))
        .unwrap();

        assert_eq!(member.roles, StaffRoles::default());
        assert!(member.roles.labels().is_empty());
        assert!(member.bio.is_none());
    }

    #[test]
    fn roles_are_independent() {
        let roles = StaffRoles {
            is_programmer: true,
            is_tester: true,
            is_manager: false,
        };
        assert_eq!(roles.labels(), ["programmer", "tester"]);
    }

    #[test]
    fn update_omits_id_and_empty_password() {
        let cmd = UpdateStaff {
            id: 9,
            first_name: "Ali".to_string(),
            last_name: "Valiyev".to_string(),
            password: None,
            profile: StaffProfile::default(),
            roles: StaffRoles::programmer(),
        };
        let body = serde_json::to_value(&cmd).unwrap();

        assert!(body.get("id").is_none());
        assert!(body.get("password").is_none());
        assert_eq!(body["first_name"], "Ali");
        assert_eq!(body["is_programmer"], true);
        assert_eq!(body["phone_number"], "");
    }
}
