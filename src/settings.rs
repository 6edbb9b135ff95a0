//! Per-client preferences with an explicit load/save lifecycle.
//!
//! The store is built once at startup from `SETTINGS_PATH`, shared through
//! `AppState`, and written back with [`SettingsStore::save`] after every update.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    En,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub language: Language,
    pub notifications_enabled: bool,
    pub install_prompt_dismissed: bool,
    pub offline_ready: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            language: Language::Fr,
            notifications_enabled: false,
            install_prompt_dismissed: false,
            offline_ready: false,
        }
    }
}

/// Partial update; absent fields keep their current value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferencesUpdate {
    pub language: Option<Language>,
    pub notifications_enabled: Option<bool>,
    pub install_prompt_dismissed: Option<bool>,
    pub offline_ready: Option<bool>,
}

impl Preferences {
    pub fn apply(&mut self, update: PreferencesUpdate) {
        if let Some(language) = update.language {
            self.language = language;
        }
        if let Some(enabled) = update.notifications_enabled {
            self.notifications_enabled = enabled;
        }
        if let Some(dismissed) = update.install_prompt_dismissed {
            self.install_prompt_dismissed = dismissed;
        }
        if let Some(ready) = update.offline_ready {
            self.offline_ready = ready;
        }
    }
}

#[derive(Debug, Default)]
pub struct SettingsStore {
    path: Option<PathBuf>,
    clients: RwLock<HashMap<String, Preferences>>,
    /// Held from snapshot to rename so writes land in snapshot order
    save_lock: Mutex<()>,
}

impl SettingsStore {
    /// Memory-only store
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load from `path`. A missing file starts an empty store at that path.
    pub async fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        let clients = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                AppError::Internal(format!("Invalid settings file {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(AppError::Internal(format!(
                    "Failed to read settings {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        tracing::debug!(path = %path.display(), clients = clients.len(), "Loaded preferences");

        Ok(Self {
            path: Some(path),
            clients: RwLock::new(clients),
            save_lock: Mutex::new(()),
        })
    }

    /// Write the store to its file. The file is replaced atomically via a
    /// temporary sibling, so a crash never leaves a truncated file behind.
    pub async fn save(&self) -> AppResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let _guard = self.save_lock.lock().await;

        let raw = {
            let clients = self.clients.read().await;
            serde_json::to_string_pretty(&*clients)
                .map_err(|e| AppError::Internal(format!("Failed to encode settings: {}", e)))?
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to create {}: {}", parent.display(), e)))?;
        }

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, raw)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write {}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to replace {}: {}", path.display(), e)))
    }

    /// Preferences for `client_id`, defaults when the client is unknown
    pub async fn get(&self, client_id: &str) -> Preferences {
        self.clients
            .read()
            .await
            .get(client_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn update(&self, client_id: &str, update: PreferencesUpdate) -> AppResult<Preferences> {
        let updated = {
            let mut clients = self.clients.write().await;
            let prefs = clients.entry(client_id.to_string()).or_default();
            prefs.apply(update);
            prefs.clone()
        };
        self.save().await?;
        Ok(updated)
    }
}
