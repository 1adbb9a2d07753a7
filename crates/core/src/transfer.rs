//! Transfer helpers
//!
//! Upload, download and removal operations expressed against [`ObjectStore`].
//! In dry-run mode every operation logs what it would do and returns the
//! result it would have produced, without touching the store or the local
//! filesystem.

use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::error::{Error, Result};
use crate::naming::resolve_batch_names;
use crate::traits::{ObjectInfo, ObjectStore};
use crate::uri::ObjectPath;

/// Exclude pattern applied when only an include pattern is given
pub const DEFAULT_EXCLUDE: &str = "*";

/// Options shared by every transfer operation
#[derive(Debug, Clone, Copy, Default)]
pub struct TransferOptions {
    /// Log the planned actions without performing them
    pub dry_run: bool,
}

/// Include/exclude filter for keys relative to a download prefix
///
/// The include pattern is evaluated after the exclude pattern, so a key is
/// selected when it matches `include` or does not match `exclude`.
#[derive(Debug, Clone)]
pub struct KeyFilter {
    include: Pattern,
    exclude: Pattern,
}

impl KeyFilter {
    /// Compile a filter; surrounding double quotes on either pattern are ignored
    pub fn new(include: &str, exclude: Option<&str>) -> Result<Self> {
        Ok(Self {
            include: Pattern::new(unquote(include))?,
            exclude: Pattern::new(unquote(exclude.unwrap_or(DEFAULT_EXCLUDE)))?,
        })
    }

    /// Whether the relative key is selected
    pub fn matches(&self, relative_key: &str) -> bool {
        self.include.matches(relative_key) || !self.exclude.matches(relative_key)
    }
}

fn unquote(pattern: &str) -> &str {
    pattern
        .strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
        .unwrap_or(pattern)
}

/// Transfer operations bound to a store
pub struct Transfer<'a> {
    store: &'a dyn ObjectStore,
    options: TransferOptions,
}

impl<'a> Transfer<'a> {
    pub fn new(store: &'a dyn ObjectStore, options: TransferOptions) -> Self {
        Self { store, options }
    }

    pub fn is_dry_run(&self) -> bool {
        self.options.dry_run
    }

    /// Download one object into `dir` under the final segment of its key
    pub async fn download_file(&self, uri: &str, dir: &Path) -> Result<PathBuf> {
        let path = ObjectPath::parse(uri)?;
        let name = path.file_name().to_string();
        self.fetch(&path, dir, &name).await
    }

    /// Download one object into `dir` as `name`
    pub async fn download_file_as(&self, uri: &str, dir: &Path, name: &str) -> Result<PathBuf> {
        let path = ObjectPath::parse(uri)?;
        self.fetch(&path, dir, name).await
    }

    /// Download several objects into `dir`, renaming colliding names
    ///
    /// Local paths are returned in input order. The first failure aborts the
    /// batch; files already written are left in place.
    pub async fn download_file_multi<S: AsRef<str>>(
        &self,
        uris: &[S],
        dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        let resolved = resolve_batch_names(uris)?;
        let mut local_paths = Vec::with_capacity(resolved.len());
        for entry in &resolved {
            local_paths.push(
                self.download_file_as(&entry.uri, dir, &entry.local_name)
                    .await?,
            );
        }
        Ok(local_paths)
    }

    /// Download everything under the URI's prefix into `dir`
    ///
    /// Objects keep their path relative to the prefix. Returns `dir`.
    pub async fn download_folder(&self, uri: &str, dir: &Path) -> Result<PathBuf> {
        self.download_prefix(uri, dir, None).await
    }

    /// Download the objects under the URI's prefix selected by the patterns
    ///
    /// `exclude` defaults to [`DEFAULT_EXCLUDE`], so only keys matching
    /// `include` are fetched. Returns `dir`.
    pub async fn download_pattern(
        &self,
        uri: &str,
        dir: &Path,
        include: &str,
        exclude: Option<&str>,
    ) -> Result<PathBuf> {
        let filter = KeyFilter::new(include, exclude)?;
        self.download_prefix(uri, dir, Some(&filter)).await
    }

    /// Upload a local file
    ///
    /// When the URI's key is empty or ends with `/`, the file's name is
    /// appended. Returns `None` on a dry run.
    pub async fn upload_file(&self, local: &Path, uri: &str) -> Result<Option<ObjectInfo>> {
        let mut path = ObjectPath::parse(uri)?;
        if !local.is_file() {
            return Err(Error::NotFound(local.display().to_string()));
        }
        if path.is_prefix() {
            let name = local
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            path = path.join(&name);
        }
        self.put(local, &path).await
    }

    /// Upload every file under `local_dir` below the URI's key
    ///
    /// Returns the number of files uploaded (or planned, on a dry run).
    pub async fn upload_folder(&self, uri: &str, local_dir: &Path) -> Result<usize> {
        let path = ObjectPath::parse(uri)?;
        if !local_dir.is_dir() {
            return Err(Error::NotFound(local_dir.display().to_string()));
        }

        let files = walk_dir(local_dir, local_dir)?;
        for (file, relative) in &files {
            self.put(file, &path.join(relative)).await?;
        }

        tracing::info!(count = files.len(), dir = %local_dir.display(), "uploaded folder");
        Ok(files.len())
    }

    /// Remove `files` from below the URI's key
    ///
    /// Returns the URIs removed (or planned, on a dry run).
    pub async fn rm_files<S: AsRef<str>>(&self, uri: &str, files: &[S]) -> Result<Vec<String>> {
        let path = ObjectPath::parse(uri)?;
        let mut removed = Vec::with_capacity(files.len());

        for file in files {
            let target = path.join(file.as_ref());
            if self.options.dry_run {
                tracing::info!(target = %target, "dry run: would remove");
            } else {
                tracing::info!(bucket = %target.bucket, key = %target.key, "removing");
                self.store.delete_object(&target.bucket, &target.key).await?;
            }
            removed.push(target.to_uri());
        }

        Ok(removed)
    }

    async fn fetch(&self, path: &ObjectPath, dir: &Path, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name == "." || name == ".." {
            return Err(Error::MalformedPath(path.to_uri()));
        }
        let dest = dir.join(name);

        if self.options.dry_run {
            tracing::info!(source = %path, local = %dest.display(), "dry run: would download");
            return Ok(dest);
        }

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tracing::info!(
            bucket = %path.bucket,
            key = %path.key,
            local = %dest.display(),
            "downloading"
        );
        self.store.download(&path.bucket, &path.key, &dest).await?;
        Ok(dest)
    }

    async fn put(&self, local: &Path, path: &ObjectPath) -> Result<Option<ObjectInfo>> {
        if self.options.dry_run {
            tracing::info!(local = %local.display(), target = %path, "dry run: would upload");
            return Ok(None);
        }

        let content_type = mime_guess::from_path(local)
            .first()
            .map(|m| m.essence_str().to_string());
        tracing::info!(
            local = %local.display(),
            bucket = %path.bucket,
            key = %path.key,
            "uploading"
        );
        let info = self
            .store
            .upload(local, &path.bucket, &path.key, content_type)
            .await?;
        Ok(Some(info))
    }

    async fn download_prefix(
        &self,
        uri: &str,
        dir: &Path,
        filter: Option<&KeyFilter>,
    ) -> Result<PathBuf> {
        let path = ObjectPath::parse(uri)?;
        let prefix = path.prefix();

        if self.options.dry_run {
            tracing::info!(
                source = %path,
                local = %dir.display(),
                filtered = filter.is_some(),
                "dry run: would download prefix"
            );
            return Ok(dir.to_path_buf());
        }

        let objects = self.store.list_objects(&path.bucket, &prefix).await?;

        let mut count = 0usize;
        for object in objects {
            let Some(relative) = object.key.strip_prefix(&prefix) else {
                continue;
            };
            // Zero-byte "directory" markers
            if relative.is_empty() || relative.ends_with('/') {
                continue;
            }
            if relative.split('/').any(|segment| segment == "..") {
                tracing::warn!(key = %object.key, "skipping key that escapes the target directory");
                continue;
            }
            if filter.is_some_and(|f| !f.matches(relative)) {
                tracing::debug!(key = %object.key, "excluded by pattern");
                continue;
            }

            let local_relative = relative.replace('/', std::path::MAIN_SEPARATOR_STR);
            let source = ObjectPath::new(&path.bucket, &object.key);
            self.fetch(&source, dir, &local_relative).await?;
            count += 1;
        }

        tracing::info!(count, source = %path, dir = %dir.display(), "downloaded prefix");
        Ok(dir.to_path_buf())
    }
}

/// Recursively collect files below `dir` with their `/`-separated path relative to `base`
fn walk_dir(dir: &Path, base: &Path) -> Result<Vec<(PathBuf, String)>> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    entries.sort();

    let mut files = Vec::new();
    for path in entries {
        if path.is_file() {
            let relative = path.strip_prefix(base).unwrap_or(&path);
            let relative = relative.to_string_lossy().replace('\\', "/");
            files.push((path, relative));
        } else if path.is_dir() {
            files.extend(walk_dir(&path, base)?);
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockObjectStore;
    use tempfile::TempDir;

    fn dry_run() -> TransferOptions {
        TransferOptions { dry_run: true }
    }

    #[test]
    fn test_key_filter_include_only() {
        let filter = KeyFilter::new("*.fa", None).unwrap();
        assert!(filter.matches("contigs.fa"));
        assert!(filter.matches("sub/dir/contigs.fa"));
        assert!(!filter.matches("reads.fq"));
    }

    #[test]
    fn test_key_filter_strips_quotes() {
        let filter = KeyFilter::new("\"*.fa\"", Some("\"*\"")).unwrap();
        assert!(filter.matches("contigs.fa"));
        assert!(!filter.matches("reads.fq"));
    }

    #[test]
    fn test_key_filter_narrow_exclude() {
        let filter = KeyFilter::new("keep.log", Some("*.log")).unwrap();
        assert!(filter.matches("keep.log"));
        assert!(filter.matches("reads.fq"));
        assert!(!filter.matches("drop.log"));
    }

    #[test]
    fn test_key_filter_invalid_pattern() {
        assert!(matches!(
            KeyFilter::new("[", None),
            Err(Error::InvalidPattern(_))
        ));
    }

    #[tokio::test]
    async fn test_download_file_uses_final_key_segment() {
        let dir = TempDir::new().unwrap();
        let mut store = MockObjectStore::new();
        store
            .expect_download()
            .withf(|bucket, key, dest| {
                bucket == "bkt" && key == "x/y/foo.txt" && dest.ends_with("foo.txt")
            })
            .times(1)
            .returning(|_, key, _| Ok(ObjectInfo::new(key, 3)));

        let transfer = Transfer::new(&store, TransferOptions::default());
        let local = transfer
            .download_file("s3://bkt/x/y/foo.txt", dir.path())
            .await
            .unwrap();
        assert_eq!(local, dir.path().join("foo.txt"));
    }

    #[tokio::test]
    async fn test_download_file_rejects_prefix_uri() {
        let store = MockObjectStore::new();
        let transfer = Transfer::new(&store, TransferOptions::default());
        let result = transfer
            .download_file("s3://bkt/x/", Path::new("/tmp"))
            .await;
        assert!(matches!(result, Err(Error::MalformedPath(_))));
    }

    #[tokio::test]
    async fn test_download_file_rejects_dot_segments() {
        let store = MockObjectStore::new();
        let transfer = Transfer::new(&store, dry_run());
        for uri in ["s3://bkt/x/..", "s3://bkt/x/."] {
            let result = transfer.download_file(uri, Path::new("/data/dl")).await;
            assert!(matches!(result, Err(Error::MalformedPath(u)) if u == uri));
        }
    }

    #[tokio::test]
    async fn test_download_file_malformed_uri() {
        let store = MockObjectStore::new();
        let transfer = Transfer::new(&store, TransferOptions::default());
        let result = transfer
            .download_file("s3://onlybucket", Path::new("/tmp"))
            .await;
        assert!(matches!(result, Err(Error::MalformedPath(_))));
    }

    #[tokio::test]
    async fn test_download_file_as_creates_missing_dir() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("nested").join("out");
        let mut store = MockObjectStore::new();
        store
            .expect_download()
            .times(1)
            .returning(|_, key, _| Ok(ObjectInfo::new(key, 0)));

        let transfer = Transfer::new(&store, TransferOptions::default());
        let local = transfer
            .download_file_as("s3://bkt/a.txt", &target, "renamed.txt")
            .await
            .unwrap();
        assert_eq!(local, target.join("renamed.txt"));
        assert!(target.is_dir());
    }

    #[tokio::test]
    async fn test_download_file_multi_renames_collisions() {
        let dir = TempDir::new().unwrap();
        let mut store = MockObjectStore::new();
        store
            .expect_download()
            .times(3)
            .returning(|_, key, _| Ok(ObjectInfo::new(key, 1)));

        let transfer = Transfer::new(&store, TransferOptions::default());
        let uris = ["s3://bkt/x/a.txt", "s3://bkt/y/a.txt", "s3://bkt/z/a.txt"];
        let local = transfer.download_file_multi(&uris, dir.path()).await.unwrap();

        assert_eq!(
            local,
            vec![
                dir.path().join("a.txt"),
                dir.path().join("1_a.txt"),
                dir.path().join("2_a.txt"),
            ]
        );
    }

    #[tokio::test]
    async fn test_download_file_multi_stops_on_first_error() {
        let dir = TempDir::new().unwrap();
        let mut store = MockObjectStore::new();
        store
            .expect_download()
            .times(1)
            .returning(|_, key, _| Err(Error::NotFound(key.to_string())));

        let transfer = Transfer::new(&store, TransferOptions::default());
        let uris = ["s3://bkt/x/a.txt", "s3://bkt/y/b.txt"];
        let result = transfer.download_file_multi(&uris, dir.path()).await;
        assert!(matches!(result, Err(Error::NotFound(k)) if k == "x/a.txt"));
    }

    #[tokio::test]
    async fn test_download_file_multi_dry_run_touches_nothing() {
        let store = MockObjectStore::new();
        let transfer = Transfer::new(&store, dry_run());
        let uris = vec!["s3://bkt/x/a.txt".to_string(), "s3://bkt/y/a.txt".to_string()];
        let local = transfer
            .download_file_multi(&uris, Path::new("/nonexistent/dl"))
            .await
            .unwrap();
        assert_eq!(
            local,
            vec![
                PathBuf::from("/nonexistent/dl/a.txt"),
                PathBuf::from("/nonexistent/dl/1_a.txt"),
            ]
        );
        assert!(!Path::new("/nonexistent/dl").exists());
    }

    fn listing() -> Vec<ObjectInfo> {
        vec![
            ObjectInfo::new("runs/42/", 0),
            ObjectInfo::new("runs/42/contigs.fa", 10),
            ObjectInfo::new("runs/42/logs/run.log", 5),
            ObjectInfo::new("runs/42/../escape.txt", 1),
        ]
    }

    #[tokio::test]
    async fn test_download_folder_keeps_relative_layout() {
        let dir = TempDir::new().unwrap();
        let mut store = MockObjectStore::new();
        store
            .expect_list_objects()
            .withf(|bucket, prefix| bucket == "bkt" && prefix == "runs/42/")
            .times(1)
            .returning(|_, _| Ok(listing()));
        store
            .expect_download()
            .times(2)
            .returning(|_, key, _| Ok(ObjectInfo::new(key, 1)));

        let transfer = Transfer::new(&store, TransferOptions::default());
        let result = transfer
            .download_folder("s3://bkt/runs/42", dir.path())
            .await
            .unwrap();

        assert_eq!(result, dir.path());
        assert!(dir.path().join("logs").is_dir());
    }

    #[tokio::test]
    async fn test_download_pattern_filters_keys() {
        let dir = TempDir::new().unwrap();
        let mut store = MockObjectStore::new();
        store
            .expect_list_objects()
            .times(1)
            .returning(|_, _| Ok(listing()));
        store
            .expect_download()
            .withf(|_, key, _| key == "runs/42/contigs.fa")
            .times(1)
            .returning(|_, key, _| Ok(ObjectInfo::new(key, 10)));

        let transfer = Transfer::new(&store, TransferOptions::default());
        transfer
            .download_pattern("s3://bkt/runs/42/", dir.path(), "*.fa", None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_download_folder_dry_run_skips_listing() {
        let store = MockObjectStore::new();
        let transfer = Transfer::new(&store, dry_run());
        let result = transfer
            .download_folder("s3://bkt/runs/42/", Path::new("/nonexistent/dl"))
            .await
            .unwrap();
        assert_eq!(result, Path::new("/nonexistent/dl"));
        assert!(!Path::new("/nonexistent/dl").exists());
    }

    #[tokio::test]
    async fn test_download_pattern_dry_run_still_checks_patterns() {
        let store = MockObjectStore::new();
        let transfer = Transfer::new(&store, dry_run());
        let planned = transfer
            .download_pattern("s3://bkt/runs/42/", Path::new("/nonexistent/dl"), "*.fa", None)
            .await
            .unwrap();
        assert_eq!(planned, Path::new("/nonexistent/dl"));

        let invalid = transfer
            .download_pattern("s3://bkt/runs/42/", Path::new("/nonexistent/dl"), "[", None)
            .await;
        assert!(matches!(invalid, Err(Error::InvalidPattern(_))));
    }

    #[tokio::test]
    async fn test_upload_file_appends_name_for_prefix() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("report.json");
        std::fs::write(&file, b"{}").unwrap();

        let mut store = MockObjectStore::new();
        store
            .expect_upload()
            .withf(|_, bucket, key, content_type| {
                bucket == "bkt"
                    && key == "out/report.json"
                    && content_type.as_deref() == Some("application/json")
            })
            .times(1)
            .returning(|_, _, key, _| Ok(ObjectInfo::new(key, 2)));

        let transfer = Transfer::new(&store, TransferOptions::default());
        let info = transfer
            .upload_file(&file, "s3://bkt/out/")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(info.key, "out/report.json");
    }

    #[tokio::test]
    async fn test_upload_file_missing_source() {
        let store = MockObjectStore::new();
        let transfer = Transfer::new(&store, TransferOptions::default());
        let result = transfer
            .upload_file(Path::new("/nonexistent/file.txt"), "s3://bkt/k")
            .await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_upload_file_dry_run() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, b"a").unwrap();

        let store = MockObjectStore::new();
        let transfer = Transfer::new(&store, dry_run());
        let info = transfer.upload_file(&file, "s3://bkt/a.txt").await.unwrap();
        assert!(info.is_none());
    }

    #[tokio::test]
    async fn test_upload_folder_maps_relative_paths_to_keys() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("a.txt"), b"a").unwrap();
        std::fs::write(dir.path().join("sub").join("b.txt"), b"b").unwrap();

        let mut store = MockObjectStore::new();
        store
            .expect_upload()
            .withf(|_, _, key, _| key == "dest/a.txt")
            .times(1)
            .returning(|_, _, key, _| Ok(ObjectInfo::new(key, 1)));
        store
            .expect_upload()
            .withf(|_, _, key, _| key == "dest/sub/b.txt")
            .times(1)
            .returning(|_, _, key, _| Ok(ObjectInfo::new(key, 1)));

        let transfer = Transfer::new(&store, TransferOptions::default());
        let count = transfer
            .upload_folder("s3://bkt/dest", dir.path())
            .await
            .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_rm_files_joins_names_under_key() {
        let mut store = MockObjectStore::new();
        store
            .expect_delete_object()
            .withf(|bucket, key| bucket == "bkt" && key.starts_with("tmp/"))
            .times(2)
            .returning(|_, _| Ok(()));

        let transfer = Transfer::new(&store, TransferOptions::default());
        let removed = transfer
            .rm_files("s3://bkt/tmp", &["a.txt", "b.txt"])
            .await
            .unwrap();
        assert_eq!(removed, ["s3://bkt/tmp/a.txt", "s3://bkt/tmp/b.txt"]);
    }

    #[tokio::test]
    async fn test_rm_files_dry_run() {
        let store = MockObjectStore::new();
        let transfer = Transfer::new(&store, dry_run());
        let removed = transfer.rm_files("s3://bkt/tmp/", &["a.txt"]).await.unwrap();
        assert_eq!(removed, ["s3://bkt/tmp/a.txt"]);
    }
}
