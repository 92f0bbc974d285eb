//! One function per gateway action.
//!
//! Read actions go over GET with query parameters and a cache-busting
//! `_t` timestamp; write actions POST a JSON body with a text/plain
//! content type (the Apps-Script-style endpoint rejects preflighted
//! requests). A truthy `error` field in any response is a failure
//! regardless of HTTP status.

use contracts::config::{AppConfig, TableConfig};
use contracts::gateway::{
    AckResponse, AdminUpdateUserRequest, ConfigResponse, CreateMonthSheetsRequest,
    CreateNvSheetsRequest, CreateSheetsResponse, GetAllUsersRequest, GetConfigRequest,
    LoginRequest, LoginResponse, RegisterRequest, SaveConfigRequest, SaveRowRequest,
    SheetDataResponse, SheetListResponse, UserListResponse,
};
use contracts::sheets::{SheetData, SheetRow};
use contracts::users::{AdminUpdateKind, User};
use gloo_net::http::Request;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::GatewayError;

const POST_CONTENT_TYPE: &str = "text/plain;charset=utf-8";

async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, GatewayError> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| GatewayError::Network(e.to_string()))?;
    response
        .json::<T>()
        .await
        .map_err(|e| GatewayError::Network(format!("unexpected response: {}", e)))
}

async fn post_json<B: Serialize, T: DeserializeOwned>(
    script_url: &str,
    body: &B,
) -> Result<T, GatewayError> {
    let payload = serde_json::to_string(body)
        .map_err(|e| GatewayError::Network(format!("failed to serialize request: {}", e)))?;
    let response = Request::post(script_url)
        .header("Content-Type", POST_CONTENT_TYPE)
        .body(payload)
        .map_err(|e| GatewayError::Network(e.to_string()))?
        .send()
        .await
        .map_err(|e| GatewayError::Network(e.to_string()))?;
    response
        .json::<T>()
        .await
        .map_err(|e| GatewayError::Network(format!("unexpected response: {}", e)))
}

fn cache_buster() -> String {
    format!("{}", js_sys::Date::now() as u64)
}

/// List all known sheet names, plus the main spreadsheet link.
pub async fn get_sheets(script_url: &str) -> Result<(Vec<String>, Option<String>), GatewayError> {
    let url = format!("{}?action=getSheets&_t={}", script_url, cache_buster());
    let data: SheetListResponse = get_json(&url).await?;
    if let Some(error) = data.error {
        return Err(GatewayError::Application(error));
    }
    Ok((data.sheets, data.spreadsheet_url))
}

/// Fetch the full content of one sheet.
pub async fn get_data(script_url: &str, sheet_name: &str) -> Result<SheetData, GatewayError> {
    let url = format!(
        "{}?action=getData&sheetName={}&_t={}",
        script_url,
        urlencoding::encode(sheet_name),
        cache_buster()
    );
    let data: SheetDataResponse = get_json(&url).await?;
    if let Some(error) = data.error {
        return Err(GatewayError::Application(error));
    }
    Ok(SheetData {
        headers: data.headers,
        rows: data.rows,
        file_url: data.file_url,
    })
}

/// Append a row, or upsert when `match_column` is given.
pub async fn save_row(
    script_url: &str,
    sheet_name: &str,
    row: SheetRow,
    match_column: Option<String>,
) -> Result<(), GatewayError> {
    let request = SaveRowRequest::new(sheet_name.to_string(), row, match_column);
    let data: AckResponse = post_json(script_url, &request).await?;
    match data.error {
        Some(error) => Err(GatewayError::Application(error)),
        None => Ok(()),
    }
}

/// Create the monthly sheet family (report, leave, plan) server-side.
/// Returns the spreadsheet link of the newly created file, if any.
pub async fn create_month_sheets(
    script_url: &str,
    month: u32,
    year: i32,
) -> Result<Option<String>, GatewayError> {
    let request = CreateMonthSheetsRequest::new(month, year);
    let data: CreateSheetsResponse = post_json(script_url, &request).await?;
    if let Some(error) = data.error {
        return Err(GatewayError::Application(error));
    }
    if !data.success {
        return Err(GatewayError::Application(
            "Khởi tạo sheet tháng thất bại".to_string(),
        ));
    }
    Ok(data.spreadsheet_url)
}

/// Create the operational (NV) sheet family server-side.
pub async fn create_nv_sheets(script_url: &str) -> Result<(), GatewayError> {
    let data: CreateSheetsResponse =
        post_json(script_url, &CreateNvSheetsRequest::default()).await?;
    if let Some(error) = data.error {
        return Err(GatewayError::Application(error));
    }
    if !data.success {
        return Err(GatewayError::Application(
            "Khởi tạo sheet nghiệp vụ thất bại".to_string(),
        ));
    }
    Ok(())
}

/// Month-scoped table appearance. Absent config means the caller
/// substitutes the default.
pub async fn get_table_config(
    script_url: &str,
    config_key: &str,
) -> Result<Option<TableConfig>, GatewayError> {
    let request = GetConfigRequest::new(Some(config_key.to_string()));
    let data: ConfigResponse<TableConfig> = post_json(script_url, &request).await?;
    if let Some(error) = data.error {
        return Err(GatewayError::Application(error));
    }
    Ok(data.config)
}

pub async fn save_table_config(
    script_url: &str,
    config_key: &str,
    config: &TableConfig,
) -> Result<(), GatewayError> {
    let request = SaveConfigRequest::new(Some(config_key.to_string()), config, None);
    let data: AckResponse = post_json(script_url, &request).await?;
    match data.error {
        Some(error) => Err(GatewayError::Application(error)),
        None => Ok(()),
    }
}

/// Category configuration (class codes, instructor roster, units).
pub async fn get_app_config(script_url: &str) -> Result<AppConfig, GatewayError> {
    let request = GetConfigRequest::new(None);
    let data: ConfigResponse<AppConfig> = post_json(script_url, &request).await?;
    if let Some(error) = data.error {
        return Err(GatewayError::Application(error));
    }
    Ok(data.config.unwrap_or_default())
}

pub async fn save_app_config(
    script_url: &str,
    user: &User,
    config: &AppConfig,
) -> Result<(), GatewayError> {
    let request = SaveConfigRequest::new(None, config, Some(user.clone()));
    let data: AckResponse = post_json(script_url, &request).await?;
    match data.error {
        Some(error) => Err(GatewayError::Application(error)),
        None => Ok(()),
    }
}

pub async fn login(script_url: &str, username: &str, password: &str) -> Result<User, GatewayError> {
    let request = LoginRequest::new(username, password);
    let data: LoginResponse = post_json(script_url, &request).await?;
    if let Some(error) = data.error {
        return Err(GatewayError::Application(error));
    }
    match data.user {
        Some(user) if data.success => Ok(user),
        _ => Err(GatewayError::Application("Đăng nhập thất bại".to_string())),
    }
}

pub async fn register(script_url: &str, user: User) -> Result<(), GatewayError> {
    let data: AckResponse = post_json(script_url, &RegisterRequest::new(user)).await?;
    match data.error {
        Some(error) => Err(GatewayError::Application(error)),
        None => Ok(()),
    }
}

pub async fn get_all_users(script_url: &str) -> Result<Vec<User>, GatewayError> {
    let data: UserListResponse = post_json(script_url, &GetAllUsersRequest::default()).await?;
    if let Some(error) = data.error {
        return Err(GatewayError::Application(error));
    }
    Ok(data.users.unwrap_or_default())
}

pub async fn admin_update_user(
    script_url: &str,
    kind: AdminUpdateKind,
    user: User,
) -> Result<(), GatewayError> {
    let request = AdminUpdateUserRequest::new(kind, user);
    let data: AckResponse = post_json(script_url, &request).await?;
    match data.error {
        Some(error) => Err(GatewayError::Application(error)),
        None => Ok(()),
    }
}
