//! # contract: interface for blob storage backends
//!
//! This module defines a single trait ([`BlobStore`]) and the plain data types
//! that flow through it. A backend stores named blobs (byte payloads plus
//! string metadata) inside named containers.
//!
//! ## Interface & Extensibility
//! - Implement [`BlobStore`] to add a backend (local filesystem, cloud SDK, test double).
//! - All methods are async and return [`StorageError`] on failure; backends never log-and-swallow.
//!   Swallowing and sentinel values belong to the [`crate::storage::StorageUtil`] facade.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall`, so consumers get a `MockBlobStore`
//!   for deterministic failure-path tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

/// User-defined string metadata attached to a blob.
pub type BlobMetadata = BTreeMap<String, String>;

/// Properties of a stored blob, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobProperties {
    pub name: String,
    pub container: String,
    /// Content length in bytes.
    pub size: u64,
    /// Opaque content fingerprint; changes whenever the content does.
    pub etag: String,
    /// RFC 3339 timestamp of the upload that created this version.
    pub creation_time: String,
    pub deleted: bool,
    #[serde(default)]
    pub metadata: BlobMetadata,
}

/// Errors reported by blob storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("container '{0}' already exists")]
    ContainerExists(String),
    #[error("container '{0}' not found")]
    ContainerNotFound(String),
    #[error("blob '{blob}' already exists in container '{container}'")]
    BlobExists { container: String, blob: String },
    #[error("blob '{blob}' not found in container '{container}'")]
    BlobNotFound { container: String, blob: String },
    #[error("invalid name '{0}'")]
    InvalidName(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt blob properties: {0}")]
    Properties(#[from] serde_json::Error),
    #[error("{0}")]
    Other(String),
}

/// Trait for creating, listing, reading and deleting containers and blobs.
///
/// The trait is `Send` + `Sync` and intended for async/await usage.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Create an empty container. Fails if it already exists.
    async fn create_container(&self, container: &str) -> Result<(), StorageError>;

    /// Delete a container together with all of its blobs.
    async fn delete_container(&self, container: &str) -> Result<(), StorageError>;

    /// Names of all containers, sorted.
    async fn list_containers(&self) -> Result<Vec<String>, StorageError>;

    /// Properties of every blob in a container, sorted by blob name.
    async fn list_blobs(&self, container: &str) -> Result<Vec<BlobProperties>, StorageError>;

    async fn blob_exists(&self, container: &str, blob: &str) -> Result<bool, StorageError>;

    /// Store `data` as `blob`. With `overwrite == false` an existing blob is
    /// left untouched and [`StorageError::BlobExists`] is returned.
    async fn upload_blob(
        &self,
        container: &str,
        blob: &str,
        data: Vec<u8>,
        metadata: Option<BlobMetadata>,
        overwrite: bool,
    ) -> Result<BlobProperties, StorageError>;

    async fn download_blob(&self, container: &str, blob: &str) -> Result<Vec<u8>, StorageError>;

    async fn blob_properties(
        &self,
        container: &str,
        blob: &str,
    ) -> Result<BlobProperties, StorageError>;

    async fn delete_blob(&self, container: &str, blob: &str) -> Result<(), StorageError>;
}
