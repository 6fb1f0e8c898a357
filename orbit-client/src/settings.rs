//! 店铺设置缓存
//!
//! `get()` 在首次成功 [`SettingsStore::hydrate`] 之前返回 `None`，
//! 调用方不会把默认值当作真实设置展示。持久化副本可通过
//! [`SettingsStore::cached`] 读取，但不算已水合。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::models::{Settings, Size};

use crate::storage::Storage;
use crate::{ClientResult, HttpClient};

/// 存储键
pub const SETTINGS_STORAGE_KEY: &str = "orbit-settings";

/// Client view of the store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsSnapshot {
    pub pricing_enabled: bool,
    /// Percent
    pub tax_rate: f64,
    pub sizes: Vec<Size>,
}

/// Where settings are fetched from
#[async_trait]
pub trait SettingsSource: Send + Sync {
    async fn fetch_settings(&self) -> ClientResult<Settings>;
    async fn fetch_active_sizes(&self) -> ClientResult<Vec<Size>>;
}

#[async_trait]
impl SettingsSource for HttpClient {
    async fn fetch_settings(&self) -> ClientResult<Settings> {
        self.settings().await
    }

    async fn fetch_active_sizes(&self) -> ClientResult<Vec<Size>> {
        self.active_sizes().await
    }
}

pub struct SettingsStore<S: Storage> {
    current: Option<SettingsSnapshot>,
    hydrated: bool,
    storage: S,
}

impl<S: Storage> SettingsStore<S> {
    /// 加载持久化副本 (未水合)
    pub fn load(storage: S) -> ClientResult<Self> {
        let current = storage
            .load(SETTINGS_STORAGE_KEY)?
            .and_then(|json| match serde_json::from_str(&json) {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding unreadable settings cache");
                    None
                }
            });
        Ok(Self {
            current,
            hydrated: false,
            storage,
        })
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// 已从服务端获取的设置
    pub fn get(&self) -> Option<&SettingsSnapshot> {
        self.current.as_ref().filter(|_| self.hydrated)
    }

    /// 最近一次保存的设置，可能已过期
    pub fn cached(&self) -> Option<&SettingsSnapshot> {
        self.current.as_ref()
    }

    /// 从服务端刷新；失败时保留原状态
    pub async fn hydrate(&mut self, source: &dyn SettingsSource) -> ClientResult<&SettingsSnapshot> {
        let settings = source.fetch_settings().await?;
        let sizes = source.fetch_active_sizes().await?;

        let snapshot = SettingsSnapshot {
            pricing_enabled: settings.pricing_enabled,
            tax_rate: settings.tax_rate,
            sizes: sizes.into_iter().filter(|s| s.is_active).collect(),
        };
        self.storage
            .save(SETTINGS_STORAGE_KEY, &serde_json::to_string(&snapshot)?)?;

        tracing::debug!(
            tax_rate = snapshot.tax_rate,
            sizes = snapshot.sizes.len(),
            "Settings hydrated"
        );
        self.hydrated = true;
        Ok(self.current.insert(snapshot))
    }
}
