//! Object-store URI parsing
//!
//! Handles URIs of the form `scheme://bucket/key1/key2/.../keyN`. Splitting is
//! purely positional on `/`: segment 2 is the bucket and everything from
//! segment 3 onwards, rejoined with `/`, is the key. Bucket and key legality
//! are not validated.

use crate::error::{Error, Result};

/// A parsed object-store URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectPath {
    /// Segments preceding the bucket, rejoined (`s3:/` for `s3://...`)
    head: String,
    /// Bucket name
    pub bucket: String,
    /// Object key (may be empty or end with `/` for prefixes)
    pub key: String,
}

impl ObjectPath {
    /// Parse a URI into an ObjectPath
    ///
    /// Fails with [`Error::MalformedPath`] when there is no key segment after
    /// the bucket, e.g. `s3://onlybucket`.
    pub fn parse(uri: &str) -> Result<Self> {
        let segments: Vec<&str> = uri.split('/').collect();
        if segments.len() < 4 {
            return Err(Error::MalformedPath(uri.to_string()));
        }

        Ok(Self {
            head: segments[..2].join("/"),
            bucket: segments[2].to_string(),
            key: segments[3..].join("/"),
        })
    }

    /// Build an `s3://bucket/key` path
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            head: "s3:/".to_string(),
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Final `/`-delimited segment of the key
    ///
    /// Empty when the key is empty or ends with `/`.
    pub fn file_name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or_default()
    }

    /// Whether the key addresses a prefix rather than a single object
    pub fn is_prefix(&self) -> bool {
        self.key.is_empty() || self.key.ends_with('/')
    }

    /// Key with a trailing `/`, suitable as a listing prefix
    ///
    /// Returns an empty string for the bucket root.
    pub fn prefix(&self) -> String {
        if self.is_prefix() {
            self.key.clone()
        } else {
            format!("{}/", self.key)
        }
    }

    /// Join a child key component
    pub fn join(&self, child: &str) -> Self {
        let base = self.key.trim_end_matches('/');
        let key = if base.is_empty() {
            child.to_string()
        } else {
            format!("{base}/{child}")
        };
        Self {
            head: self.head.clone(),
            bucket: self.bucket.clone(),
            key,
        }
    }

    /// Rebuild the full URI
    pub fn to_uri(&self) -> String {
        format!("{}/{}/{}", self.head, self.bucket, self.key)
    }
}

impl std::fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_uri())
    }
}

impl std::str::FromStr for ObjectPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Split a URI into `(bucket, key)`
pub fn parse(uri: &str) -> Result<(String, String)> {
    let path = ObjectPath::parse(uri)?;
    Ok((path.bucket, path.key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bucket_and_key() {
        let (bucket, key) = parse("s3://bkt/x/y/foo.txt").unwrap();
        assert_eq!(bucket, "bkt");
        assert_eq!(key, "x/y/foo.txt");
    }

    #[test]
    fn test_parse_single_segment_key() {
        let (bucket, key) = parse("s3://bkt/foo.txt").unwrap();
        assert_eq!(bucket, "bkt");
        assert_eq!(key, "foo.txt");
    }

    #[test]
    fn test_parse_keeps_empty_segments_in_key() {
        let (_, key) = parse("s3://bkt/a//b/").unwrap();
        assert_eq!(key, "a//b/");
    }

    #[test]
    fn test_parse_bucket_root() {
        let path = ObjectPath::parse("s3://bkt/").unwrap();
        assert_eq!(path.bucket, "bkt");
        assert_eq!(path.key, "");
        assert!(path.is_prefix());
        assert_eq!(path.prefix(), "");
    }

    #[test]
    fn test_parse_bucket_only_is_malformed() {
        let result = parse("s3://onlybucket");
        assert!(matches!(result, Err(Error::MalformedPath(p)) if p == "s3://onlybucket"));
    }

    #[test]
    fn test_parse_short_inputs_are_malformed() {
        for uri in ["", "bucket", "s3:/bucket", "a/b"] {
            assert!(
                matches!(parse(uri), Err(Error::MalformedPath(_))),
                "expected {uri:?} to be malformed"
            );
        }
    }

    #[test]
    fn test_parse_is_positional_for_any_scheme() {
        let (bucket, key) = parse("gs://other/dir/file").unwrap();
        assert_eq!(bucket, "other");
        assert_eq!(key, "dir/file");
    }

    #[test]
    fn test_file_name() {
        let path = ObjectPath::parse("s3://bkt/x/y/foo.txt").unwrap();
        assert_eq!(path.file_name(), "foo.txt");

        let dir = ObjectPath::parse("s3://bkt/x/y/").unwrap();
        assert_eq!(dir.file_name(), "");
    }

    #[test]
    fn test_prefix_adds_trailing_slash() {
        let path = ObjectPath::parse("s3://bkt/runs/42").unwrap();
        assert!(!path.is_prefix());
        assert_eq!(path.prefix(), "runs/42/");
    }

    #[test]
    fn test_join() {
        let path = ObjectPath::parse("s3://bkt/runs/").unwrap();
        let child = path.join("out.fa");
        assert_eq!(child.key, "runs/out.fa");
        assert_eq!(child.to_string(), "s3://bkt/runs/out.fa");

        let root = ObjectPath::parse("s3://bkt/").unwrap();
        assert_eq!(root.join("a.txt").key, "a.txt");
    }

    #[test]
    fn test_display_round_trips_uri() {
        let uri = "s3://bkt/x/y/foo.txt";
        assert_eq!(ObjectPath::parse(uri).unwrap().to_string(), uri);
        assert_eq!(ObjectPath::new("bkt", "k").to_string(), "s3://bkt/k");
    }

    #[test]
    fn test_from_str() {
        let path: ObjectPath = "s3://bkt/k".parse().unwrap();
        assert_eq!(path.bucket, "bkt");
    }
}
