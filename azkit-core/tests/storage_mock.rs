use azkit_core::contract::{BlobProperties, MockBlobStore, StorageError};
use azkit_core::storage::{BlobListing, StorageUtil};

fn props(name: &str) -> BlobProperties {
    BlobProperties {
        name: name.to_string(),
        container: "c".to_string(),
        size: 3,
        etag: "etag-1".to_string(),
        creation_time: "2026-01-01T00:00:00+00:00".to_string(),
        deleted: false,
        metadata: Default::default(),
    }
}

#[tokio::test]
async fn test_backend_failures_become_sentinels() {
    let mut store = MockBlobStore::new();
    store
        .expect_create_container()
        .returning(|_| Err(StorageError::Other("service unavailable".into())));
    store
        .expect_delete_container()
        .returning(|c| Err(StorageError::ContainerNotFound(c.to_string())));
    store
        .expect_list_containers()
        .returning(|| Err(StorageError::Other("boom".into())));
    store
        .expect_list_blobs()
        .returning(|c| Err(StorageError::ContainerNotFound(c.to_string())));
    store.expect_download_blob().returning(|c, b| {
        Err(StorageError::BlobNotFound {
            container: c.to_string(),
            blob: b.to_string(),
        })
    });
    store
        .expect_delete_blob()
        .returning(|_, _| Err(StorageError::Other("denied".into())));

    let util = StorageUtil::new(store);
    assert_eq!(util.create_container("c").await, None);
    assert!(!util.delete_container("c").await);
    assert!(util.list_containers().await.is_empty());
    assert!(util.list_container("c", false).await.is_empty());
    assert_eq!(util.download_blob_as_string("c", "b").await, None);
    assert_eq!(util.download_blob_to_file("c", "b", "/nonexistent/out").await, (false, None));
    assert!(!util.delete_blob("c", "b").await);
}

#[tokio::test]
async fn test_replace_false_does_not_upload_existing_blob() {
    let mut store = MockBlobStore::new();
    store.expect_blob_exists().times(1).returning(|_, _| Ok(true));
    store.expect_upload_blob().never();

    let util = StorageUtil::new(store);
    assert!(!util.upload_string_as("c", "b", "data", None, false).await);
}

#[tokio::test]
async fn test_replace_true_skips_existence_check_and_overwrites() {
    let mut store = MockBlobStore::new();
    store.expect_blob_exists().never();
    store
        .expect_upload_blob()
        .withf(|c, b, data, metadata, overwrite| {
            c.to_string() == "c"
                && b.to_string() == "b"
                && data.as_slice() == b"abc"
                && metadata.is_none()
                && *overwrite
        })
        .times(1)
        .returning(|_, b, _, _, _| Ok(props(b)));

    let util = StorageUtil::new(store);
    assert!(util.upload_string_as("c", "b", "abc", None, true).await);
}

#[tokio::test]
async fn test_upload_failure_after_existence_check() {
    let mut store = MockBlobStore::new();
    store.expect_blob_exists().returning(|_, _| Ok(false));
    store.expect_upload_blob().returning(|c, b, _, _, _| {
        Err(StorageError::BlobExists {
            container: c.to_string(),
            blob: b.to_string(),
        })
    });

    let util = StorageUtil::new(store);
    assert!(!util.upload_string_as("c", "b", "abc", None, false).await);
}

#[tokio::test]
async fn test_names_only_listing_uses_blob_names() {
    let mut store = MockBlobStore::new();
    store
        .expect_list_blobs()
        .returning(|_| Ok(vec![props("a"), props("b")]));

    let util = StorageUtil::new(store);
    assert_eq!(
        util.list_container("c", true).await,
        vec![BlobListing::Name("a".into()), BlobListing::Name("b".into())]
    );
}

#[tokio::test]
async fn test_download_leaves_no_file_when_properties_fail() {
    let mut store = MockBlobStore::new();
    store
        .expect_download_blob()
        .returning(|_, _| Ok(b"abc".to_vec()));
    store
        .expect_blob_properties()
        .returning(|_, _| Err(StorageError::Other("properties unavailable".into())));

    let tmp = tempfile::tempdir().unwrap();
    let target = tmp.path().join("out.txt");
    let util = StorageUtil::new(store);
    assert_eq!(util.download_blob_to_file("c", "b", &target).await, (false, None));
    assert!(!target.exists());
}
