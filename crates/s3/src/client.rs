//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from s3kit-core.

use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::{ByteStream, DateTime};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

use s3kit_core::config::DEFAULT_REGION;
use s3kit_core::{Error, ObjectInfo, ObjectStore, Profile, Result};

/// Page size for list requests
const LIST_PAGE_SIZE: i32 = 1000;

/// Read buffer size when streaming an object body to disk
const DOWNLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
}

impl S3Client {
    /// Create a new S3 client from a profile
    ///
    /// Profiles without static credentials use the AWS default provider chain.
    pub async fn new(profile: &Profile) -> Result<Self> {
        profile.validate()?;
        let region = profile
            .region
            .clone()
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region));

        if let Some((access_key, secret_key)) = profile.static_credentials() {
            let credentials = aws_credential_types::Credentials::new(
                access_key,
                secret_key,
                None, // session token
                None, // expiry
                "s3kit-static-credentials",
            );
            loader = loader.credentials_provider(credentials);
        }

        if let Some(endpoint) = &profile.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let config = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(profile.path_style)
            .build();

        tracing::debug!(profile = %profile.name, "created S3 client");
        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
        })
    }

    /// Get the underlying aws-sdk-s3 client
    pub fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }
}

/// Map an SDK error onto the core error kinds
fn map_sdk_error<E, R>(err: SdkError<E, R>, subject: &str) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match err.code() {
        Some("NoSuchKey" | "NotFound" | "NoSuchBucket") => Error::NotFound(subject.to_string()),
        Some("AccessDenied" | "InvalidAccessKeyId" | "SignatureDoesNotMatch" | "ExpiredToken") => {
            Error::Auth(format!(
                "{subject}: {}",
                err.message().unwrap_or("access denied")
            ))
        }
        _ => Error::Network(DisplayErrorContext(&err).to_string()),
    }
}

fn to_timestamp(dt: &DateTime) -> Option<jiff::Timestamp> {
    jiff::Timestamp::from_second(dt.secs()).ok()
}

fn trim_etag(etag: &str) -> String {
    etag.trim_matches('"').to_string()
}

/// Stream `body` into `dest` through a temporary file in the same directory
///
/// `dest` is replaced only after the whole body has been written. On failure
/// the temporary file is removed and an existing `dest` is left untouched.
async fn write_body<R>(mut body: R, dest: &Path) -> Result<i64>
where
    R: AsyncRead + Unpin,
{
    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let (file, temp_path) = tempfile::Builder::new()
        .prefix(".s3kit-")
        .suffix(".part")
        .tempfile_in(parent)?
        .into_parts();
    let mut file = tokio::fs::File::from_std(file);

    let mut buf = vec![0u8; DOWNLOAD_CHUNK_SIZE];
    let mut written: i64 = 0;
    loop {
        let n = body
            .read(&mut buf)
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n]).await?;
        written += n as i64;
    }
    file.flush().await?;
    drop(file);

    temp_path.persist(dest).map_err(|e| Error::Io(e.error))?;
    Ok(written)
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectInfo>> {
        let mut items = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self
                .inner
                .list_objects_v2()
                .bucket(bucket)
                .max_keys(LIST_PAGE_SIZE);

            if !prefix.is_empty() {
                request = request.prefix(prefix);
            }
            if let Some(token) = &continuation_token {
                request = request.continuation_token(token);
            }

            let response = request
                .send()
                .await
                .map_err(|e| map_sdk_error(e, &format!("s3://{bucket}/{prefix}")))?;

            for object in response.contents() {
                let key = object.key().unwrap_or_default();
                let mut info = ObjectInfo::new(key, object.size().unwrap_or(0));
                info.last_modified = object.last_modified().and_then(to_timestamp);
                info.etag = object.e_tag().map(trim_etag);
                items.push(info);
            }

            if response.is_truncated().unwrap_or(false) {
                continuation_token = response.next_continuation_token().map(|s| s.to_string());
                if continuation_token.is_none() {
                    break;
                }
            } else {
                break;
            }
        }

        tracing::debug!(bucket, prefix, count = items.len(), "listed objects");
        Ok(items)
    }

    async fn download(&self, bucket: &str, key: &str, dest: &Path) -> Result<ObjectInfo> {
        let response = self
            .inner
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &format!("s3://{bucket}/{key}")))?;

        let last_modified = response.last_modified().and_then(to_timestamp);
        let etag = response.e_tag().map(trim_etag);

        let body = response.body.into_async_read();
        tokio::pin!(body);
        let written = write_body(body, dest).await?;

        let mut info = ObjectInfo::new(key, written);
        info.last_modified = last_modified;
        info.etag = etag;
        Ok(info)
    }

    async fn upload(
        &self,
        src: &Path,
        bucket: &str,
        key: &str,
        content_type: Option<String>,
    ) -> Result<ObjectInfo> {
        let size = tokio::fs::metadata(src).await?.len() as i64;
        let body = ByteStream::from_path(src)
            .await
            .map_err(|e| Error::General(format!("Failed to read {}: {e}", src.display())))?;

        let response = self
            .inner
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .set_content_type(content_type)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &format!("s3://{bucket}/{key}")))?;

        let mut info = ObjectInfo::new(key, size);
        info.etag = response.e_tag().map(trim_etag);
        info.last_modified = Some(jiff::Timestamp::now());
        Ok(info)
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.inner
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &format!("s3://{bucket}/{key}")))?;

        Ok(())
    }
}
