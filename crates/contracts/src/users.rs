use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Admin,
    Leader,
    Instructor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserStatus {
    Active,
    Blocked,
}

/// Account record as stored behind the gateway. `password` is only
/// populated on registration / reset payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub role: UserRole,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Admins and leaders may enter report rows.
    pub fn can_edit_reports(&self) -> bool {
        matches!(self.role, UserRole::Admin | UserRole::Leader)
    }

    pub fn is_blocked(&self) -> bool {
        self.status == Some(UserStatus::Blocked)
    }
}

/// Kind of account mutation performed by `adminUpdateUser`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminUpdateKind {
    UpdateStatus,
    ResetPass,
    Add,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_wire_format_is_uppercase() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"ADMIN\"");
        let role: UserRole = serde_json::from_str("\"LEADER\"").unwrap();
        assert_eq!(role, UserRole::Leader);
    }

    #[test]
    fn update_kind_wire_format() {
        assert_eq!(
            serde_json::to_string(&AdminUpdateKind::ResetPass).unwrap(),
            "\"RESET_PASS\""
        );
    }

    #[test]
    fn permissions_follow_role() {
        let user = User {
            username: "lead".into(),
            role: UserRole::Leader,
            full_name: "Lead".into(),
            email: None,
            phone: None,
            address: None,
            status: Some(UserStatus::Active),
            password: None,
        };
        assert!(user.can_edit_reports());
        assert!(!user.is_admin());
    }
}
