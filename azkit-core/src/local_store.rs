//! Local filesystem implementation of [`BlobStore`].
//!
//! Layout under the store root:
//!
//! ```text
//! <root>/<container>/blobs/<blob name>           raw blob bytes
//! <root>/<container>/props/<sha256(name)>.json   serialised BlobProperties
//! ```
//!
//! Blob names may contain `/`, which maps onto nested directories under
//! `blobs/`. Properties files are flat and keyed by a hash of the name.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::contract::{BlobMetadata, BlobProperties, BlobStore, StorageError};

const BLOBS_DIR: &str = "blobs";
const PROPS_DIR: &str = "props";
const PROPS_EXT: &str = ".json";

#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    /// Use `root` as the store root, creating it if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        info!(root = %root.display(), "Opened local blob store");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn container_dir(&self, container: &str) -> Result<PathBuf, StorageError> {
        validate_container_name(container)?;
        Ok(self.root.join(container))
    }

    async fn existing_container_dir(&self, container: &str) -> Result<PathBuf, StorageError> {
        let dir = self.container_dir(container)?;
        if fs::metadata(&dir).await.map(|m| m.is_dir()).unwrap_or(false) {
            Ok(dir)
        } else {
            Err(StorageError::ContainerNotFound(container.to_string()))
        }
    }

    async fn blob_paths(&self, container: &str, blob: &str) -> Result<(PathBuf, PathBuf), StorageError> {
        validate_blob_name(blob)?;
        let dir = self.existing_container_dir(container).await?;
        let data = dir.join(BLOBS_DIR).join(blob);
        let props = dir
            .join(PROPS_DIR)
            .join(format!("{}{PROPS_EXT}", etag_of(blob.as_bytes())));
        Ok((data, props))
    }
}

fn validate_container_name(name: &str) -> Result<(), StorageError> {
    let ok = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\']);
    if ok {
        Ok(())
    } else {
        Err(StorageError::InvalidName(name.to_string()))
    }
}

fn validate_blob_name(name: &str) -> Result<(), StorageError> {
    let path = Path::new(name);
    let ok = !name.is_empty()
        && !name.contains('\\')
        && !name.ends_with('/')
        && path.components().all(|c| matches!(c, Component::Normal(_)));
    if ok {
        Ok(())
    } else {
        Err(StorageError::InvalidName(name.to_string()))
    }
}

fn not_found_as(e: std::io::Error, container: &str, blob: &str) -> StorageError {
    if e.kind() == ErrorKind::NotFound {
        StorageError::BlobNotFound {
            container: container.to_string(),
            blob: blob.to_string(),
        }
    } else {
        StorageError::Io(e)
    }
}

fn etag_of(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

async fn ensure_parent(path: &Path) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    Ok(())
}

/// Collect the properties files in `dir`.
async fn collect_props_files(dir: &Path) -> Result<Vec<PathBuf>, StorageError> {
    let mut files = Vec::new();
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(files),
        Err(e) => return Err(e.into()),
    };
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_file() && path.to_string_lossy().ends_with(PROPS_EXT) {
            files.push(path);
        }
    }
    Ok(files)
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn create_container(&self, container: &str) -> Result<(), StorageError> {
        let dir = self.container_dir(container)?;
        if fs::metadata(&dir).await.is_ok() {
            return Err(StorageError::ContainerExists(container.to_string()));
        }
        fs::create_dir_all(dir.join(BLOBS_DIR)).await?;
        fs::create_dir_all(dir.join(PROPS_DIR)).await?;
        debug!(container, "Created container directory");
        Ok(())
    }

    async fn delete_container(&self, container: &str) -> Result<(), StorageError> {
        let dir = self.existing_container_dir(container).await?;
        fs::remove_dir_all(&dir).await?;
        debug!(container, "Removed container directory");
        Ok(())
    }

    async fn list_containers(&self) -> Result<Vec<String>, StorageError> {
        let mut names = Vec::new();
        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    async fn list_blobs(&self, container: &str) -> Result<Vec<BlobProperties>, StorageError> {
        let dir = self.existing_container_dir(container).await?;
        let mut blobs = Vec::new();
        for path in collect_props_files(&dir.join(PROPS_DIR)).await? {
            let raw = fs::read(&path).await?;
            blobs.push(serde_json::from_slice::<BlobProperties>(&raw)?);
        }
        blobs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(blobs)
    }

    async fn blob_exists(&self, container: &str, blob: &str) -> Result<bool, StorageError> {
        let (data, _) = self.blob_paths(container, blob).await?;
        Ok(fs::metadata(&data).await.map(|m| m.is_file()).unwrap_or(false))
    }

    async fn upload_blob(
        &self,
        container: &str,
        blob: &str,
        data: Vec<u8>,
        metadata: Option<BlobMetadata>,
        overwrite: bool,
    ) -> Result<BlobProperties, StorageError> {
        let (data_path, props_path) = self.blob_paths(container, blob).await?;
        if !overwrite && fs::metadata(&data_path).await.is_ok() {
            return Err(StorageError::BlobExists {
                container: container.to_string(),
                blob: blob.to_string(),
            });
        }

        let props = BlobProperties {
            name: blob.to_string(),
            container: container.to_string(),
            size: data.len() as u64,
            etag: etag_of(&data),
            creation_time: chrono::Utc::now().to_rfc3339(),
            deleted: false,
            metadata: metadata.unwrap_or_default(),
        };

        ensure_parent(&data_path).await?;
        ensure_parent(&props_path).await?;
        fs::write(&data_path, &data).await?;
        fs::write(&props_path, serde_json::to_vec_pretty(&props)?).await?;
        debug!(container, blob, size = props.size, "Wrote blob to disk");
        Ok(props)
    }

    async fn download_blob(&self, container: &str, blob: &str) -> Result<Vec<u8>, StorageError> {
        let (data_path, _) = self.blob_paths(container, blob).await?;
        fs::read(&data_path)
            .await
            .map_err(|e| not_found_as(e, container, blob))
    }

    async fn blob_properties(
        &self,
        container: &str,
        blob: &str,
    ) -> Result<BlobProperties, StorageError> {
        let (_, props_path) = self.blob_paths(container, blob).await?;
        let raw = fs::read(&props_path)
            .await
            .map_err(|e| not_found_as(e, container, blob))?;
        Ok(serde_json::from_slice(&raw)?)
    }

    async fn delete_blob(&self, container: &str, blob: &str) -> Result<(), StorageError> {
        let (data_path, props_path) = self.blob_paths(container, blob).await?;
        fs::remove_file(&data_path)
            .await
            .map_err(|e| not_found_as(e, container, blob))?;
        if let Err(e) = fs::remove_file(&props_path).await {
            if e.kind() != ErrorKind::NotFound {
                return Err(e.into());
            }
        }
        debug!(container, blob, "Deleted blob from disk");
        Ok(())
    }
}
