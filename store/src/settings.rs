//! Store display settings.
//!
//! Unlike the other stores this one keeps no in-memory mirror: readers are
//! expected to re-`load` whenever the change broadcast reports the settings
//! key, which is also how same-process writers reach their readers.

use std::sync::Arc;

use anugadget_common::settings::StoreSettings;
use tokio::sync::broadcast;
use tracing::info;

use crate::kv::{encode, KvStore, StoreError};

/// Storage key owned by the settings store.
pub const SETTINGS_KEY: &str = "anugadget_admin_settings_v1";

pub struct SettingsStore {
    kv: Arc<dyn KvStore>,
}

impl SettingsStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        SettingsStore { kv }
    }

    /// Current settings. Absent or malformed stored data yields the
    /// defaults; stored-but-blank fields fall back field by field.
    pub fn load(&self) -> StoreSettings {
        self.kv
            .get(SETTINGS_KEY)
            .and_then(|raw| serde_json::from_str::<StoreSettings>(&raw).ok())
            .map(StoreSettings::or_defaults)
            .unwrap_or_default()
    }

    /// Persist new settings. The write broadcasts [`SETTINGS_KEY`] so
    /// same-process subscribers refresh immediately.
    pub fn save(&self, settings: &StoreSettings) -> Result<(), StoreError> {
        self.kv.set(SETTINGS_KEY, &encode(settings))?;
        info!(store_name = %settings.store_name, "settings saved");
        Ok(())
    }

    /// Change notifications. Re-`load` when a received key equals
    /// [`SETTINGS_KEY`].
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.kv.subscribe()
    }
}
