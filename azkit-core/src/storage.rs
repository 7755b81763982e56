//! High-level blob storage facade.
//!
//! [`StorageUtil`] wraps any [`BlobStore`] backend and turns every failure into
//! a logged error plus a sentinel return value (`None`, `false`, an empty
//! list), so callers in scripts and export jobs can branch on a plain value
//! instead of handling backend errors.
//!
//! # Example
//! ```no_run
//! # async fn demo() -> Result<(), azkit_core::contract::StorageError> {
//! use azkit_core::local_store::LocalBlobStore;
//! use azkit_core::storage::StorageUtil;
//!
//! let util = StorageUtil::new(LocalBlobStore::open("/tmp/blobs").await?);
//! util.create_container("exports").await;
//! assert!(util.upload_string_as("exports", "hello.txt", "hi", None, true).await);
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Component, Path};
use tracing::{error, info};

use crate::contract::{BlobMetadata, BlobProperties, BlobStore};
use crate::doc_filter::DocFilter;

/// Blob attributes reported by a detailed container listing.
pub const LIST_ITEM_KEYS: [&str; 5] = ["name", "deleted", "creation_time", "etag", "size"];

/// One entry of [`StorageUtil::list_container`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BlobListing {
    Name(String),
    Details(BTreeMap<String, String>),
}

pub struct StorageUtil<S: BlobStore> {
    store: S,
    listing_filter: DocFilter,
}

impl<S: BlobStore> StorageUtil<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            listing_filter: DocFilter::including(LIST_ITEM_KEYS),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the container name on success.
    pub async fn create_container(&self, container: &str) -> Option<String> {
        match self.store.create_container(container).await {
            Ok(()) => {
                info!(container, "Container created");
                Some(container.to_string())
            }
            Err(e) => {
                error!(error = %e, container, "Failed to create container");
                None
            }
        }
    }

    pub async fn delete_container(&self, container: &str) -> bool {
        match self.store.delete_container(container).await {
            Ok(()) => {
                info!(container, "Container deleted");
                true
            }
            Err(e) => {
                error!(error = %e, container, "Failed to delete container");
                false
            }
        }
    }

    pub async fn list_containers(&self) -> Vec<String> {
        match self.store.list_containers().await {
            Ok(names) => {
                info!(count = names.len(), "Containers listed");
                names
            }
            Err(e) => {
                error!(error = %e, "Failed to list containers");
                Vec::new()
            }
        }
    }

    /// List the blobs of a container, either by name or as a reduced set of
    /// stringified attributes (see [`LIST_ITEM_KEYS`]).
    pub async fn list_container(&self, container: &str, names_only: bool) -> Vec<BlobListing> {
        let blobs = match self.store.list_blobs(container).await {
            Ok(blobs) => blobs,
            Err(e) => {
                error!(error = %e, container, "Failed to list blobs in container");
                return Vec::new();
            }
        };
        if names_only {
            blobs.into_iter().map(|b| BlobListing::Name(b.name)).collect()
        } else {
            blobs
                .iter()
                .map(|b| BlobListing::Details(self.filtered_list_metadata(b)))
                .collect()
        }
    }

    /// Upload a local file under its path name. Root, prefix, `.` and `..`
    /// components are dropped, so `/home/me/report.csv` is stored as
    /// `home/me/report.csv` and `./notes.md` as `notes.md`.
    pub async fn upload_file(
        &self,
        container: &str,
        local_filename: impl AsRef<Path>,
        metadata: Option<BlobMetadata>,
        replace: bool,
    ) -> bool {
        let local_filename = local_filename.as_ref();
        let blob_name = blob_name_for(local_filename);
        self.upload_file_as(container, &blob_name, local_filename, metadata, replace)
            .await
    }

    pub async fn upload_file_as(
        &self,
        container: &str,
        blob_name: &str,
        local_filename: impl AsRef<Path>,
        metadata: Option<BlobMetadata>,
        replace: bool,
    ) -> bool {
        let local_filename = local_filename.as_ref();
        if !replace && self.exists(container, blob_name).await {
            info!(container, blob = blob_name, "Blob already exists and replace is false");
            return false;
        }
        let data = match tokio::fs::read(local_filename).await {
            Ok(data) => data,
            Err(e) => {
                error!(error = %e, file = %local_filename.display(), blob = blob_name, "Failed to read local file for upload");
                return false;
            }
        };
        self.upload_bytes(container, blob_name, data, metadata, replace)
            .await
    }

    pub async fn upload_string_as(
        &self,
        container: &str,
        blob_name: &str,
        content: &str,
        metadata: Option<BlobMetadata>,
        replace: bool,
    ) -> bool {
        if !replace && self.exists(container, blob_name).await {
            info!(container, blob = blob_name, "Blob already exists and replace is false");
            return false;
        }
        self.upload_bytes(container, blob_name, content.as_bytes().to_vec(), metadata, replace)
            .await
    }

    /// Returns `(true, Some(properties))` once the blob is written to
    /// `local_filename`, `(false, None)` otherwise.
    pub async fn download_blob_to_file(
        &self,
        container: &str,
        blob_name: &str,
        local_filename: impl AsRef<Path>,
    ) -> (bool, Option<BlobProperties>) {
        let local_filename = local_filename.as_ref();
        let data = match self.store.download_blob(container, blob_name).await {
            Ok(data) => data,
            Err(e) => {
                error!(error = %e, container, blob = blob_name, "Failed to download blob");
                return (false, None);
            }
        };
        let props = match self.store.blob_properties(container, blob_name).await {
            Ok(props) => props,
            Err(e) => {
                error!(error = %e, container, blob = blob_name, "Failed to read blob properties");
                return (false, None);
            }
        };
        if let Err(e) = tokio::fs::write(local_filename, &data).await {
            error!(error = %e, file = %local_filename.display(), blob = blob_name, "Failed to write downloaded blob");
            return (false, None);
        }
        (true, Some(props))
    }

    /// Blob content decoded as UTF-8.
    pub async fn download_blob_as_string(&self, container: &str, blob_name: &str) -> Option<String> {
        let data = match self.store.download_blob(container, blob_name).await {
            Ok(data) => data,
            Err(e) => {
                error!(error = %e, container, blob = blob_name, "Failed to download blob");
                return None;
            }
        };
        match String::from_utf8(data) {
            Ok(text) => Some(text),
            Err(e) => {
                error!(error = %e, container, blob = blob_name, "Blob content is not valid UTF-8");
                None
            }
        }
    }

    pub async fn delete_blob(&self, container: &str, blob_name: &str) -> bool {
        match self.store.delete_blob(container, blob_name).await {
            Ok(()) => {
                info!(container, blob = blob_name, "Blob deleted");
                true
            }
            Err(e) => {
                error!(error = %e, container, blob = blob_name, "Failed to delete blob");
                false
            }
        }
    }

    async fn exists(&self, container: &str, blob_name: &str) -> bool {
        match self.store.blob_exists(container, blob_name).await {
            Ok(exists) => exists,
            Err(e) => {
                // The upload that follows reports the real failure.
                error!(error = %e, container, blob = blob_name, "Failed to check blob existence");
                false
            }
        }
    }

    async fn upload_bytes(
        &self,
        container: &str,
        blob_name: &str,
        data: Vec<u8>,
        metadata: Option<BlobMetadata>,
        replace: bool,
    ) -> bool {
        match self
            .store
            .upload_blob(container, blob_name, data, metadata, replace)
            .await
        {
            Ok(props) => {
                info!(container, blob = blob_name, size = props.size, "Blob uploaded");
                true
            }
            Err(e) => {
                error!(error = %e, container, blob = blob_name, "Failed to upload blob");
                false
            }
        }
    }

    fn filtered_list_metadata(&self, props: &BlobProperties) -> BTreeMap<String, String> {
        let doc = match serde_json::to_value(props) {
            Ok(Value::Object(doc)) => doc,
            Ok(_) => return BTreeMap::new(),
            Err(e) => {
                error!(error = %e, blob = %props.name, "Failed to serialise blob properties");
                return BTreeMap::new();
            }
        };
        self.listing_filter
            .filter(&doc)
            .into_iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, text)
            })
            .collect()
    }
}

/// Blob name for a local path: its normal components joined with `/`.
fn blob_name_for(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
