//! Amazon S3 backend implementation.

use std::sync::Arc;

use object_store::aws::AmazonS3Builder;
use object_store::path::Path;
use object_store::{ObjectStore, RetryConfig};
use snafu::prelude::*;

use crate::error::{S3ConfigSnafu, StorageError};

use super::{StorageLocation, StorageProvider};

impl StorageProvider {
    pub(super) async fn construct_s3(
        bucket: String,
        key: Option<Path>,
    ) -> Result<Self, StorageError> {
        let builder = AmazonS3Builder::from_env()
            .with_bucket_name(&bucket)
            .with_retry(RetryConfig::default());

        let mut canonical_url = format!("s3://{bucket}");
        if let Some(key) = &key {
            canonical_url = format!("{canonical_url}/{key}");
        }

        let object_store: Arc<dyn ObjectStore> = Arc::new(builder.build().context(S3ConfigSnafu)?);

        Ok(Self {
            location: StorageLocation::S3 { bucket, key },
            object_store,
            canonical_url,
        })
    }
}
