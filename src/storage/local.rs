//! Local filesystem storage backend implementation.

use std::path::PathBuf;
use std::sync::Arc;

use object_store::ObjectStore;
use object_store::local::LocalFileSystem;
use snafu::prelude::*;

use crate::error::{IoSnafu, ObjectStoreSnafu, StorageError};

use super::{StorageLocation, StorageProvider};

impl StorageProvider {
    pub(super) async fn construct_local(path: PathBuf) -> Result<Self, StorageError> {
        tokio::fs::create_dir_all(&path).await.context(IoSnafu)?;

        let object_store: Arc<dyn ObjectStore> =
            Arc::new(LocalFileSystem::new_with_prefix(&path).context(ObjectStoreSnafu)?);

        let canonical_url = format!("file://{}", path.display());

        Ok(Self {
            location: StorageLocation::Local { path },
            object_store,
            canonical_url,
        })
    }
}
