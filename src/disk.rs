//! Directory-backed cache store with atomic entry writes.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::snapshot::{RequestKey, ResponseSnapshot};
use crate::store::CacheStore;

/// Sidecar metadata persisted next to each body file.
#[derive(Debug, Serialize, Deserialize)]
struct EntryMeta {
    status: u16,
    headers: Vec<(String, String)>,
    captured_at: DateTime<Utc>,
    body_len: u64,
}

/// Persistent cache store backed by a directory.
///
/// Each cache name maps to one directory, created lazily on first open and
/// never removed by this crate. An entry is a pair of files addressed by a
/// digest of the key: a TOML metadata sidecar and a raw body file.
#[derive(Debug, Clone)]
pub struct DiskStore {
    name: String,
    dir: PathBuf,
}

impl DiskStore {
    /// Opens (creates if absent) the cache named `name` under the platform
    /// cache directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory cannot be created.
    pub async fn open(name: &str) -> Result<Self> {
        let root = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shellcache");
        Self::open_in(&root, name).await
    }

    /// Opens (creates if absent) the cache named `name` under `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory cannot be created.
    pub async fn open_in(root: &Path, name: &str) -> Result<Self> {
        let dir = root.join(name);
        tokio::fs::create_dir_all(&dir).await?;
        debug!("cache '{name}': opened at {}", dir.display());
        Ok(Self {
            name: name.to_string(),
            dir,
        })
    }

    /// Directory this store keeps its entries in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Filesystem-safe entry stem for a key: URL-safe base64 of the
    /// SHA-256 digest of the key's canonical form.
    fn entry_stem(key: &RequestKey) -> String {
        let digest = Sha256::digest(key.to_string().as_bytes());
        URL_SAFE_NO_PAD.encode(digest)
    }

    fn meta_path(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{stem}.meta.toml"))
    }

    fn body_path(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{stem}.body"))
    }

    /// Writes `bytes` to `path` atomically (write temp file + rename).
    async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[async_trait]
impl CacheStore for DiskStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &RequestKey) -> Result<Option<ResponseSnapshot>> {
        let stem = Self::entry_stem(key);

        let meta_text = match tokio::fs::read_to_string(self.meta_path(&stem)).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("cache '{}': miss for {key}", self.name);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let meta: EntryMeta = toml::from_str(&meta_text).map_err(|e| Error::CorruptEntry {
            key: key.to_string(),
            detail: format!("metadata unreadable: {e}"),
        })?;

        let body = match tokio::fs::read(self.body_path(&stem)).await {
            Ok(body) => body,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::CorruptEntry {
                    key: key.to_string(),
                    detail: "metadata present but body file missing".to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        if body.len() as u64 != meta.body_len {
            return Err(Error::CorruptEntry {
                key: key.to_string(),
                detail: format!(
                    "body length {} does not match recorded {}",
                    body.len(),
                    meta.body_len
                ),
            });
        }

        debug!(
            "cache '{}': hit for {key} ({} bytes)",
            self.name,
            body.len()
        );
        Ok(Some(ResponseSnapshot::from_parts(
            meta.status,
            meta.headers,
            body,
            meta.captured_at,
        )))
    }

    async fn put(&self, key: &RequestKey, snapshot: ResponseSnapshot) -> Result<()> {
        let stem = Self::entry_stem(key);
        let meta = EntryMeta {
            status: snapshot.status,
            headers: snapshot.headers.clone(),
            captured_at: snapshot.captured_at,
            body_len: snapshot.body.len() as u64,
        };
        let meta_text = toml::to_string(&meta)?;

        // Body lands first so a crash never leaves metadata pointing at a
        // missing or truncated body.
        Self::write_atomic(&self.body_path(&stem), &snapshot.body).await?;
        Self::write_atomic(&self.meta_path(&stem), meta_text.as_bytes()).await?;

        debug!(
            "cache '{}': stored {key} ({} bytes)",
            self.name,
            snapshot.body.len()
        );
        Ok(())
    }
}
