use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::Value;
use signage_core::Dataset;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::warn;

/// The dataset, persisted as one pretty-printed JSON file.
///
/// Writes land in a sibling temp file that is renamed over the target, so a
/// concurrent reader sees either the old document or the new one.
pub struct DataStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl DataStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// Current stored document. A missing or corrupt file reads as an empty
    /// dataset.
    pub async fn load(&self) -> Value {
        match self.read().await {
            Ok(value) => value,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "data file unreadable; serving empty dataset");
                empty_dataset()
            }
        }
    }

    async fn read(&self) -> anyhow::Result<Value> {
        let raw = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("reading {}", self.path.display()))?;
        Ok(serde_json::from_slice(&raw)?)
    }

    /// Replaces the stored document wholesale.
    pub async fn save(&self, document: &Value) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(document)?;
        let _guard = self.write_lock.lock().await;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || replace_file(&path, &json))
            .await
            .context("save task failed")??;
        Ok(())
    }
}

fn replace_file(path: &Path, contents: &[u8]) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("staging write in {}", dir.display()))?;
    staged.write_all(contents)?;
    staged.as_file().sync_all()?;
    staged
        .persist(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn empty_dataset() -> Value {
    serde_json::to_value(Dataset::default()).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn missing_file_reads_empty() {
        let dir = tempdir().unwrap();
        let store = DataStore::new(dir.path().join("data.json"));
        let doc = store.load().await;
        assert_eq!(doc["notices"], serde_json::json!([]));
        assert_eq!(doc["cctv"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn save_then_load_preserves_unknown_fields() {
        let dir = tempdir().unwrap();
        let store = DataStore::new(dir.path().join("data.json"));
        let doc = serde_json::json!({
            "notices": [], "events": [], "birthdays": [], "cctv": [],
            "theme": "dark"
        });
        store.save(&doc).await.unwrap();
        assert_eq!(store.load().await, doc);
    }

    #[tokio::test]
    async fn save_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let store = DataStore::new(dir.path().join("nope").join("data.json"));
        assert!(store.save(&serde_json::json!({})).await.is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn readers_never_see_a_partial_write() {
        let dir = tempdir().unwrap();
        let store = Arc::new(DataStore::new(dir.path().join("data.json")));
        let notices: Vec<_> = (0..3000)
            .map(|i| serde_json::json!({"title": format!("notice {i}"), "content": "x".repeat(64)}))
            .collect();
        let doc = serde_json::json!({
            "notices": notices, "events": [], "birthdays": [], "cctv": []
        });
        store.save(&doc).await.unwrap();

        let writer = {
            let store = store.clone();
            let doc = doc.clone();
            tokio::spawn(async move {
                for _ in 0..100 {
                    store.save(&doc).await.unwrap();
                }
            })
        };

        loop {
            let done = writer.is_finished();
            let served = store.load().await;
            assert_eq!(served["notices"].as_array().map(Vec::len), Some(3000));
            if done {
                break;
            }
        }
        writer.await.unwrap();
    }
}
