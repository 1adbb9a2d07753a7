//! ObjectStore trait definition
//!
//! This trait defines the storage operations the transfer helpers need.
//! It keeps the core decoupled from the S3 SDK and is mocked in tests.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Metadata for an object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectInfo {
    /// Object key
    pub key: String,

    /// Size in bytes
    pub size_bytes: i64,

    /// Human-readable size
    pub size_human: String,

    /// Last modified timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<jiff::Timestamp>,

    /// ETag (usually MD5 for single-part uploads)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

impl ObjectInfo {
    /// Create a new ObjectInfo for an object of `size` bytes
    pub fn new(key: impl Into<String>, size: i64) -> Self {
        Self {
            key: key.into(),
            size_bytes: size,
            size_human: humansize::format_size(size.max(0) as u64, humansize::BINARY),
            last_modified: None,
            etag: None,
        }
    }
}

/// Storage operations used by [`crate::transfer::Transfer`]
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List every object under `prefix`, recursively
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectInfo>>;

    /// Write an object to `dest`, replacing any existing file
    async fn download(&self, bucket: &str, key: &str, dest: &Path) -> Result<ObjectInfo>;

    /// Upload a local file
    async fn upload(
        &self,
        src: &Path,
        bucket: &str,
        key: &str,
        content_type: Option<String>,
    ) -> Result<ObjectInfo>;

    /// Delete a single object
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_info_new() {
        let info = ObjectInfo::new("reads/sample.fq", 2048);
        assert_eq!(info.key, "reads/sample.fq");
        assert_eq!(info.size_bytes, 2048);
        assert!(info.size_human.contains("KiB"));
        assert!(info.etag.is_none());
    }

    #[test]
    fn test_object_info_serializes_without_empty_fields() {
        let info = ObjectInfo::new("a.txt", 1);
        let json = serde_json::to_value(&info).unwrap();
        assert!(json.get("etag").is_none());
        assert!(json.get("last_modified").is_none());
        assert_eq!(json["size_bytes"], 1);
    }
}
