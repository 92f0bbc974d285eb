//! Wire shapes of the remote data gateway.
//!
//! The gateway is a single HTTP endpoint accepting action-tagged
//! requests: GET with query parameters for the two read actions,
//! POST with a JSON body for everything else. Responses are always
//! JSON; a truthy `error` field means failure regardless of HTTP
//! status.

use serde::{Deserialize, Serialize};

use crate::sheets::SheetRow;
use crate::users::{AdminUpdateKind, User};

// ---------------------------------------------------------------------------
// Read actions (GET)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetListResponse {
    #[serde(default)]
    pub sheets: Vec<String>,
    #[serde(default)]
    pub spreadsheet_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetDataResponse {
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<SheetRow>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Write actions (POST)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRowRequest {
    pub action: &'static str,
    pub sheet_name: String,
    pub row: SheetRow,
    /// Present: upsert by this key column. Absent: append.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_column: Option<String>,
}

impl SaveRowRequest {
    pub fn new(sheet_name: String, row: SheetRow, match_column: Option<String>) -> Self {
        Self {
            action: "saveRow",
            sheet_name,
            row,
            match_column,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMonthSheetsRequest {
    pub action: &'static str,
    /// Zero-padded month, matching the canonical sheet-name form.
    pub month: String,
    pub year: i32,
}

impl CreateMonthSheetsRequest {
    pub fn new(month: u32, year: i32) -> Self {
        Self {
            action: "createMonthSheets",
            month: format!("{:02}", month),
            year,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateNvSheetsRequest {
    pub action: &'static str,
}

impl Default for CreateNvSheetsRequest {
    fn default() -> Self {
        Self {
            action: "createNVSheets",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSheetsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub spreadsheet_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Generic acknowledgment for write actions that return no payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AckResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Configuration actions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetConfigRequest {
    pub action: &'static str,
    /// Month-scoped key for table configs; absent for the app config.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_key: Option<String>,
}

impl GetConfigRequest {
    pub fn new(config_key: Option<String>) -> Self {
        Self {
            action: "getConfig",
            config_key,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveConfigRequest<T> {
    pub action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_key: Option<String>,
    pub config: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl<T> SaveConfigRequest<T> {
    pub fn new(config_key: Option<String>, config: T, user: Option<User>) -> Self {
        Self {
            action: "saveConfig",
            config_key,
            config,
            user,
        }
    }
}

/// Absent `config` means the caller must substitute its default.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigResponse<T> {
    #[serde(default)]
    pub config: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Account actions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub action: &'static str,
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            action: "login",
            username: username.trim().to_string(),
            password: password.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub action: &'static str,
    pub user: User,
}

impl RegisterRequest {
    pub fn new(user: User) -> Self {
        Self {
            action: "register",
            user,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GetAllUsersRequest {
    pub action: &'static str,
}

impl Default for GetAllUsersRequest {
    fn default() -> Self {
        Self {
            action: "getAllUsers",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListResponse {
    #[serde(default)]
    pub users: Option<Vec<User>>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminUpdateUserRequest {
    pub action: &'static str,
    #[serde(rename = "type")]
    pub kind: AdminUpdateKind,
    pub user: User,
}

impl AdminUpdateUserRequest {
    pub fn new(kind: AdminUpdateKind, user: User) -> Self {
        Self {
            action: "adminUpdateUser",
            kind,
            user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_row_omits_absent_match_column() {
        let request = SaveRowRequest::new("BC-T09-2025".into(), SheetRow::new(), None);
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"action\":\"saveRow\""));
        assert!(json.contains("\"sheetName\":\"BC-T09-2025\""));
        assert!(!json.contains("matchColumn"));
    }

    #[test]
    fn create_month_pads_the_month() {
        let request = CreateMonthSheetsRequest::new(3, 2024);
        assert_eq!(request.month, "03");
    }

    #[test]
    fn config_response_tolerates_absent_config() {
        let response: ConfigResponse<crate::config::TableConfig> =
            serde_json::from_str("{}").unwrap();
        assert!(response.config.is_none());
        assert!(response.error.is_none());
    }

    #[test]
    fn sheet_data_response_defaults_are_empty() {
        let response: SheetDataResponse =
            serde_json::from_str("{\"error\":\"Sheet not found\"}").unwrap();
        assert!(response.headers.is_empty());
        assert_eq!(response.error.as_deref(), Some("Sheet not found"));
    }
}
