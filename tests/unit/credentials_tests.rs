/*!
 * Tests for API key storage
 */

use layerlingo::credentials::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
use layerlingo::providers::Credentials;

use crate::common::{create_temp_dir, create_test_file};

/// Test that a missing key file means no key
#[tokio::test]
async fn test_fileStore_load_withMissingFile_shouldReturnNone() {
    let dir = create_temp_dir().unwrap();
    let store = FileCredentialStore::new(dir.path().join("api_key"));

    assert_eq!(store.load().await.unwrap(), None);
    assert!(store.credentials().await.unwrap().is_empty());
}

/// Test that a saved key is read back trimmed, creating parent directories
#[tokio::test]
async fn test_fileStore_save_withNestedPath_shouldRoundTrip() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("layerlingo").join("api_key");
    let store = FileCredentialStore::new(&path);

    store.save("  secret-key\n").await.unwrap();

    assert!(path.exists());
    assert_eq!(store.load().await.unwrap(), Some("secret-key".to_string()));
    assert_eq!(store.credentials().await.unwrap(), Credentials::new("secret-key"));
}

/// Test that a blank key file counts as no key
#[tokio::test]
async fn test_fileStore_load_withBlankFile_shouldReturnNone() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(dir.path(), "api_key", "  \n").unwrap();
    let store = FileCredentialStore::new(path);

    assert_eq!(store.load().await.unwrap(), None);
}

/// Test the in-memory store
#[test]
fn test_memoryStore_withSavedKey_shouldReturnIt() {
    let store = MemoryCredentialStore::new();
    tokio_test::block_on(async {
        assert_eq!(store.load().await.unwrap(), None);
        store.save("abc").await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some("abc".to_string()));
    });
}

/// Test that debug output never shows the key
#[test]
fn test_credentials_debug_shouldRedactKey() {
    let credentials = Credentials::new("top-secret");
    let debug = format!("{:?}", credentials);
    assert!(!debug.contains("top-secret"));
    assert!(debug.contains("redacted"));
}
