//! Object storage abstraction.
//!
//! Provides a unified interface over GCS, S3, and the local filesystem.
//! The local backend exists so every storage path in the pipeline can be
//! exercised against a plain directory in tests.

mod gcs;
mod local;
mod s3;
mod url;

pub use url::StorageLocation;

use std::borrow::Cow;
use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use snafu::prelude::*;
use tracing::debug;

use crate::error::{IoSnafu, ObjectStoreSnafu, StorageError, Utf8Snafu};

/// A reference-counted storage provider.
pub type StorageProviderRef = Arc<StorageProvider>;

/// Storage provider that abstracts over different storage backends.
#[derive(Clone)]
pub struct StorageProvider {
    location: StorageLocation,
    object_store: Arc<dyn ObjectStore>,
    canonical_url: String,
}

impl std::fmt::Debug for StorageProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StorageProvider<{}>", self.canonical_url)
    }
}

impl StorageProvider {
    /// Create a storage provider for the given URL.
    pub async fn for_url(url: &str) -> Result<Self, StorageError> {
        match StorageLocation::parse(url)? {
            StorageLocation::Gcs { bucket, key } => Self::construct_gcs(bucket, key).await,
            StorageLocation::S3 { bucket, key } => Self::construct_s3(bucket, key).await,
            StorageLocation::Local { path } => Self::construct_local(path).await,
        }
    }

    /// Qualify a path with the configured key prefix.
    fn qualify_path<'a>(&self, path: &'a Path) -> Cow<'a, Path> {
        match self.location.key() {
            Some(prefix) => Cow::Owned(prefix.parts().chain(path.parts()).collect()),
            None => Cow::Borrowed(path),
        }
    }

    /// Get the contents of an object.
    pub async fn get(&self, path: &Path) -> Result<Bytes, StorageError> {
        let qualified = self.qualify_path(path);
        let result = self
            .object_store
            .get(&qualified)
            .await
            .context(ObjectStoreSnafu)?;
        result.bytes().await.context(ObjectStoreSnafu)
    }

    /// Get the contents of an object as UTF-8 text.
    pub async fn read_text(&self, path: &Path) -> Result<String, StorageError> {
        let bytes = self.get(path).await?;
        String::from_utf8(bytes.to_vec()).context(Utf8Snafu {
            path: path.to_string(),
        })
    }

    /// Put bytes to a path.
    pub async fn put(&self, path: &Path, bytes: Bytes) -> Result<(), StorageError> {
        let qualified = self.qualify_path(path);
        self.object_store
            .put(&qualified, PutPayload::from(bytes))
            .await
            .context(ObjectStoreSnafu)?;
        Ok(())
    }

    /// Upload a local file to the given destination path.
    pub async fn upload(
        &self,
        local: &std::path::Path,
        dest: &Path,
    ) -> Result<(), StorageError> {
        let contents = tokio::fs::read(local).await.context(IoSnafu)?;
        self.put(dest, Bytes::from(contents)).await
    }

    /// Delete an object at the given path.
    pub async fn delete(&self, path: &Path) -> Result<(), StorageError> {
        let qualified = self.qualify_path(path);
        self.object_store
            .delete(&qualified)
            .await
            .context(ObjectStoreSnafu)?;
        Ok(())
    }

    /// List objects under a prefix, relative to the configured key prefix.
    ///
    /// Returns sorted relative paths. A missing prefix yields an empty
    /// listing rather than an error.
    pub async fn list_prefix(&self, prefix: &str) -> Result<Vec<Path>, StorageError> {
        let full_prefix: Path = match self.location.key() {
            Some(key) => key.parts().chain(Path::from(prefix).parts()).collect(),
            None => Path::from(prefix),
        };
        let skip = self
            .location
            .key()
            .map(|key| key.parts().count())
            .unwrap_or_default();

        let mut objects = Vec::new();
        let mut stream = self.object_store.list(Some(&full_prefix));
        while let Some(meta) = stream.next().await {
            match meta {
                Ok(meta) => {
                    let relative: Path = meta.location.parts().skip(skip).collect();
                    objects.push(relative);
                }
                Err(object_store::Error::NotFound { .. }) => {
                    debug!(prefix = %full_prefix, "Prefix not found, treating as empty");
                }
                Err(source) => return Err(StorageError::ObjectStore { source }),
            }
        }

        objects.sort_unstable_by_key(|path| path.to_string());
        Ok(objects)
    }
}

/// Move an object between providers: copy to the destination first, delete
/// from the source only once the copy succeeded. The destination copy is
/// authoritative, so a failure after the put never loses data.
pub async fn relocate(
    source: &StorageProvider,
    dest: &StorageProvider,
    path: &Path,
) -> Result<(), StorageError> {
    let bytes = source.get(path).await?;
    dest.put(path, bytes).await?;
    source.delete(path).await?;
    Ok(())
}
