//! App Core for groupmark.
//!
//! Holds the settings and the listing store, and drives the startup/shutdown lifecycle.

use std::sync::Arc;

use tracing::info;

use crate::managers::listing_store::{ListingStore, ListingStoreTrait};
use crate::services::remote_store::{HttpRemoteStore, RemoteStore};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::settings::ClientSettings;

/// Central application struct.
///
/// The listing store is shared behind an `Arc` so request handlers can run
/// concurrently against it.
pub struct App<R = HttpRemoteStore> {
    pub settings_engine: SettingsEngine,
    pub store: Arc<ListingStore<R>>,
}

impl App<HttpRemoteStore> {
    /// Loads settings (file, then environment overrides), validates them and
    /// builds an HTTP-backed store.
    pub fn new(config_path: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings_engine = SettingsEngine::new(config_path);
        settings_engine.load()?;
        settings_engine.apply_env_overrides();
        SettingsEngine::validate(settings_engine.get_settings())?;

        let remote = HttpRemoteStore::new(settings_engine.get_settings())?;
        info!(
            "using remote store {} (tenant {})",
            remote.base_url(),
            settings_engine.get_settings().tenant
        );
        Ok(Self::with_remote(settings_engine, remote))
    }
}

impl<R: RemoteStore> App<R> {
    /// Builds an app over an already-constructed remote store.
    pub fn with_remote(settings_engine: SettingsEngine, remote: R) -> Self {
        let store = Arc::new(ListingStore::new(remote, settings_engine.get_settings()));
        Self {
            settings_engine,
            store,
        }
    }

    pub fn settings(&self) -> &ClientSettings {
        self.settings_engine.get_settings()
    }

    /// Startup sequence: initial load of the listing.
    ///
    /// A failed load is already logged and recorded by the store; the app
    /// starts with an empty listing in that case.
    pub async fn startup(&self) {
        let _ = self.store.load().await;
    }

    /// Shutdown sequence: abandon in-flight loads.
    pub fn shutdown(&self) {
        self.store.close();
    }
}
