use contracts::config::AppConfig;
use leptos::prelude::*;

use crate::gateway::{api, GatewayError};
use crate::sheets::cache::SheetCache;
use crate::sheets::loader::{GatewaySource, SheetLoader};
use crate::system::auth::storage;

/// Top-level screen of the app shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Dashboard,
    Admin,
}

/// App-wide shared state: the sheet cache, the gateway endpoint and
/// everything restored from localStorage at startup.
///
/// The cache itself is not reactive; `cache_version` mirrors its
/// version counter so views can subscribe. Call [`Self::sync_version`]
/// after any operation that may have written to the cache.
#[derive(Clone)]
pub struct AppGlobalContext {
    pub cache: SheetCache,
    pub screen: RwSignal<Screen>,
    pub script_url: RwSignal<String>,
    /// Known remote sheet names, the resolver's search space.
    pub sheet_names: RwSignal<Vec<String>>,
    pub spreadsheet_url: RwSignal<Option<String>>,
    pub app_config: RwSignal<AppConfig>,
    pub cache_version: RwSignal<u64>,
}

impl AppGlobalContext {
    pub fn new() -> Self {
        let cache = SheetCache::new();
        if let Some(configs) = storage::load_table_configs() {
            cache.restore_configs(configs);
        }
        let version = cache.version();
        Self {
            cache,
            screen: RwSignal::new(Screen::Home),
            script_url: RwSignal::new(storage::load_script_url().unwrap_or_default()),
            sheet_names: RwSignal::new(storage::load_sheet_names().unwrap_or_default()),
            spreadsheet_url: RwSignal::new(storage::load_spreadsheet_url()),
            app_config: RwSignal::new(AppConfig::default()),
            cache_version: RwSignal::new(version),
        }
    }

    pub fn loader(&self) -> SheetLoader<GatewaySource> {
        let source = GatewaySource {
            script_url: self.script_url.get_untracked(),
        };
        SheetLoader::new(source, self.cache.clone())
    }

    /// Propagate the cache's version counter into the reactive graph.
    pub fn sync_version(&self) {
        let version = self.cache.version();
        if self.cache_version.get_untracked() != version {
            self.cache_version.set(version);
        }
    }

    /// Persist the month-scoped table configs alongside the session.
    pub fn persist_configs(&self) {
        storage::save_table_configs(&self.cache.configs_snapshot());
    }

    /// Re-list the remote sheet names; the listing is also persisted
    /// so the next startup resolves instantly.
    pub async fn refresh_sheet_names(&self) -> Result<(), GatewayError> {
        let script_url = self.script_url.get_untracked();
        let (names, spreadsheet_url) = api::get_sheets(&script_url).await?;
        storage::save_sheet_names(&names);
        self.sheet_names.set(names);
        if let Some(url) = spreadsheet_url {
            storage::save_spreadsheet_url(&url);
            self.spreadsheet_url.set(Some(url));
        }
        Ok(())
    }

    pub async fn load_app_config(&self) -> Result<(), GatewayError> {
        let script_url = self.script_url.get_untracked();
        let config = api::get_app_config(&script_url).await?;
        self.app_config.set(config);
        Ok(())
    }
}

/// Hook to access the shared app context
pub fn use_app_context() -> AppGlobalContext {
    use_context::<AppGlobalContext>().expect("AppGlobalContext not found in component tree")
}
