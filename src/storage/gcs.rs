//! Google Cloud Storage backend implementation.

use std::sync::Arc;

use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::path::Path;
use object_store::{ObjectStore, RetryConfig};
use snafu::prelude::*;
use tracing::debug;

use crate::error::{GcsConfigSnafu, StorageError};

use super::{StorageLocation, StorageProvider};

impl StorageProvider {
    pub(super) async fn construct_gcs(
        bucket: String,
        key: Option<Path>,
    ) -> Result<Self, StorageError> {
        let mut builder = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(&bucket)
            .with_retry(RetryConfig::default());

        if let Ok(service_account_key) = std::env::var("GOOGLE_SERVICE_ACCOUNT_KEY") {
            debug!("Constructing GCS builder with service account key");
            builder = builder.with_service_account_key(&service_account_key);
        }

        let mut canonical_url = format!("gs://{bucket}");
        if let Some(key) = &key {
            canonical_url = format!("{canonical_url}/{key}");
        }

        let object_store: Arc<dyn ObjectStore> =
            Arc::new(builder.build().context(GcsConfigSnafu)?);

        Ok(Self {
            location: StorageLocation::Gcs { bucket, key },
            object_store,
            canonical_url,
        })
    }
}
