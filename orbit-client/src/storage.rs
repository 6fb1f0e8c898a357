//! 本地持久化
//!
//! 购物车与设置缓存以 JSON 字符串按键保存。

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::{ClientError, ClientResult};

/// Key-value persistence for client state
pub trait Storage: Send + Sync {
    fn load(&self, key: &str) -> ClientResult<Option<String>>;
    fn save(&self, key: &str, value: &str) -> ClientResult<()>;
    fn remove(&self, key: &str) -> ClientResult<()>;
}

/// 文件存储: 每个键一个 `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 获取路径
    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> ClientResult<Option<String>> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| ClientError::Storage(format!("Failed to read {}: {e}", path.display())))
    }

    fn save(&self, key: &str, value: &str) -> ClientResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            ClientError::Storage(format!("Failed to create {}: {e}", self.dir.display()))
        })?;
        let path = self.path(key);
        fs::write(&path, value)
            .map_err(|e| ClientError::Storage(format!("Failed to write {}: {e}", path.display())))
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        let path = self.path(key);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                ClientError::Storage(format!("Failed to remove {}: {e}", path.display()))
            })?;
        }
        Ok(())
    }
}

/// 内存存储 (测试与无持久化场景)
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> ClientResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| ClientError::Storage("Memory storage lock poisoned".into()))
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> ClientResult<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}

impl<S: Storage + ?Sized> Storage for std::sync::Arc<S> {
    fn load(&self, key: &str) -> ClientResult<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> ClientResult<()> {
        (**self).save(key, value)
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        (**self).remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("state"));

        assert_eq!(storage.load("cart").unwrap(), None);
        storage.save("cart", "[]").unwrap();
        assert!(storage.path("cart").exists());
        assert_eq!(storage.load("cart").unwrap().as_deref(), Some("[]"));

        storage.remove("cart").unwrap();
        assert_eq!(storage.load("cart").unwrap(), None);
        // Removing a missing key is fine
        storage.remove("cart").unwrap();
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        storage.save("settings", "{}").unwrap();
        assert_eq!(storage.load("settings").unwrap().as_deref(), Some("{}"));
        assert_eq!(storage.load("cart").unwrap(), None);
    }
}
