//! localStorage persistence for the session and offline snapshots.

use std::collections::HashMap;

use contracts::config::TableConfig;
use contracts::users::User;
use web_sys::window;

const CURRENT_USER_KEY: &str = "sc_current_user";
const SCRIPT_URL_KEY: &str = "sc_script_url";
const SHEET_NAMES_KEY: &str = "sc_sheet_names";
const SPREADSHEET_URL_KEY: &str = "sc_spreadsheet_url";
const TABLE_CONFIGS_KEY: &str = "sc_table_configs";

fn get_local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

fn save_json<T: serde::Serialize>(key: &str, value: &T) {
    if let Some(storage) = get_local_storage() {
        if let Ok(json) = serde_json::to_string(value) {
            let _ = storage.set_item(key, &json);
        }
    }
}

fn load_json<T: serde::de::DeserializeOwned>(key: &str) -> Option<T> {
    let json = get_local_storage()?.get_item(key).ok()??;
    serde_json::from_str(&json).ok()
}

/// Save the signed-in user to localStorage
pub fn save_current_user(user: &User) {
    save_json(CURRENT_USER_KEY, user);
}

/// Get the signed-in user from localStorage
pub fn load_current_user() -> Option<User> {
    load_json(CURRENT_USER_KEY)
}

/// Save the gateway endpoint URL to localStorage
pub fn save_script_url(url: &str) {
    if let Some(storage) = get_local_storage() {
        let _ = storage.set_item(SCRIPT_URL_KEY, url);
    }
}

/// Get the gateway endpoint URL from localStorage
pub fn load_script_url() -> Option<String> {
    get_local_storage()?.get_item(SCRIPT_URL_KEY).ok()?
}

/// Save the last known sheet-name listing for instant startup
pub fn save_sheet_names(names: &[String]) {
    save_json(SHEET_NAMES_KEY, &names);
}

pub fn load_sheet_names() -> Option<Vec<String>> {
    load_json(SHEET_NAMES_KEY)
}

pub fn save_spreadsheet_url(url: &str) {
    if let Some(storage) = get_local_storage() {
        let _ = storage.set_item(SPREADSHEET_URL_KEY, url);
    }
}

pub fn load_spreadsheet_url() -> Option<String> {
    get_local_storage()?.get_item(SPREADSHEET_URL_KEY).ok()?
}

/// Save the month-scoped table configs so styling survives a reload
pub fn save_table_configs(configs: &HashMap<String, TableConfig>) {
    save_json(TABLE_CONFIGS_KEY, configs);
}

pub fn load_table_configs() -> Option<HashMap<String, TableConfig>> {
    load_json(TABLE_CONFIGS_KEY)
}

/// Everything belonging to one signed-in session. The endpoint URL is
/// deliberately not in this set: the next sign-in reuses it.
const SESSION_KEYS: &[&str] = &[
    CURRENT_USER_KEY,
    SHEET_NAMES_KEY,
    SPREADSHEET_URL_KEY,
    TABLE_CONFIGS_KEY,
];

/// Clear the session; the endpoint URL is kept so the next sign-in
/// does not have to re-enter it.
pub fn clear_session() {
    if let Some(storage) = get_local_storage() {
        for key in SESSION_KEYS {
            let _ = storage.remove_item(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logout_clears_every_session_key_but_keeps_the_endpoint() {
        assert!(SESSION_KEYS.contains(&CURRENT_USER_KEY));
        assert!(SESSION_KEYS.contains(&SHEET_NAMES_KEY));
        assert!(SESSION_KEYS.contains(&SPREADSHEET_URL_KEY));
        assert!(SESSION_KEYS.contains(&TABLE_CONFIGS_KEY));
        assert!(!SESSION_KEYS.contains(&SCRIPT_URL_KEY));
    }
}
