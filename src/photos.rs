//! Trip photos kept in a directory "bucket", plus in-memory previews for
//! uploads that could not be stored.

use std::{
    collections::{HashMap, VecDeque},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use axum::body::Bytes;
use futures::future::join_all;
use nanoid::nanoid;

use crate::error::TripError;

/// A file received from a client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

pub struct PhotoBucket {
    root: PathBuf,
    public_base: String,
    list_limit: usize,
}

impl PhotoBucket {
    pub fn new(root: impl Into<PathBuf>, public_base: &str, list_limit: usize) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.trim_end_matches('/').to_string(),
            list_limit,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stores the file under a fresh `<id>-<name>` path and returns that path.
    pub async fn upload(&self, file_name: &str, bytes: &[u8]) -> Result<String, TripError> {
        let path = format!("{}-{}", nanoid!(12), sanitize_file_name(file_name));
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(&path), bytes).await?;
        tracing::debug!(path = %path, size = bytes.len(), "photo stored");
        Ok(path)
    }

    pub fn public_url(&self, path: &str) -> String {
        format!("{}/photos/{path}", self.public_base)
    }

    /// Up to `list_limit` stored paths, by name.
    pub async fn list(&self) -> Result<Vec<String>, TripError> {
        let mut names = Vec::new();
        let mut dir = tokio::fs::read_dir(&self.root).await?;
        while let Some(item) = dir.next_entry().await? {
            if item.file_type().await?.is_file() {
                names.push(item.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        names.truncate(self.list_limit);
        Ok(names)
    }

    pub async fn list_urls(&self) -> Result<Vec<String>, TripError> {
        Ok(self
            .list()
            .await?
            .iter()
            .map(|path| self.public_url(path))
            .collect())
    }
}

/// Public URLs of the stored photos; an empty list when storage is missing
/// or unreadable.
pub async fn list_or_empty(bucket: Option<&PhotoBucket>) -> Vec<String> {
    let Some(bucket) = bucket else {
        tracing::warn!("photo storage not configured, showing no photos");
        return Vec::new();
    };
    bucket.list_urls().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "listing photos failed, showing none");
        Vec::new()
    })
}

#[derive(Debug, Clone)]
pub struct Preview {
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

pub const DEFAULT_PREVIEW_CAPACITY: usize = 50;

/// Session-only previews. Contents vanish when the process stops, and only
/// the newest `capacity` are kept.
pub struct PreviewCache {
    capacity: usize,
    items: Mutex<Previews>,
}

#[derive(Default)]
struct Previews {
    by_id: HashMap<String, Preview>,
    order: VecDeque<String>,
}

impl Default for PreviewCache {
    fn default() -> Self {
        Self::new(DEFAULT_PREVIEW_CAPACITY)
    }
}

impl PreviewCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            items: Mutex::default(),
        }
    }

    /// Keeps the file in memory and returns the URL it is served from.
    /// Evicts the oldest preview once the cache is full.
    pub fn insert(&self, file: UploadedFile) -> String {
        let id = nanoid!(12);
        let preview = Preview {
            content_type: file.content_type,
            bytes: file.bytes,
        };
        let mut items = self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        while items.order.len() >= self.capacity {
            let Some(oldest) = items.order.pop_front() else {
                break;
            };
            items.by_id.remove(&oldest);
            tracing::debug!(id = %oldest, "preview evicted");
        }
        items.order.push_back(id.clone());
        items.by_id.insert(id.clone(), preview);
        format!("/api/previews/{id}")
    }

    pub fn get(&self, id: &str) -> Option<Preview> {
        self.items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .by_id
            .get(id)
            .cloned()
    }
}

/// Uploads every file concurrently. A file that can't be stored gets a
/// session-only preview instead; the others are unaffected. Results are in
/// input order.
pub async fn upload_all(
    bucket: Option<Arc<PhotoBucket>>,
    previews: Arc<PreviewCache>,
    files: Vec<UploadedFile>,
) -> Vec<String> {
    let uploads = files.into_iter().map(|file| {
        let bucket = bucket.clone();
        let previews = previews.clone();
        async move {
            let Some(bucket) = bucket else {
                tracing::warn!(file = %file.name, "no photo storage, keeping a local preview");
                return previews.insert(file);
            };
            match bucket.upload(&file.name, &file.bytes).await {
                Ok(path) => bucket.public_url(&path),
                Err(e) => {
                    tracing::warn!(file = %file.name, error = %e, "upload failed, keeping a local preview");
                    previews.insert(file)
                }
            }
        }
    });
    join_all(uploads).await
}

fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    match cleaned.trim_start_matches('.') {
        "" => "photo".to_string(),
        rest => rest.to_string(),
    }
}
