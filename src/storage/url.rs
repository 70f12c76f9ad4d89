//! URL parsing for storage backends.

use std::path::PathBuf;

use object_store::path::Path;

use crate::error::{InvalidUrlSnafu, StorageError};

/// Parsed storage location: backend, bucket/root, and optional key prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    Gcs { bucket: String, key: Option<Path> },
    S3 { bucket: String, key: Option<Path> },
    Local { path: PathBuf },
}

impl StorageLocation {
    /// Parse a URL into a storage location.
    ///
    /// Supported forms: `gs://bucket[/key]`, `s3://bucket[/key]`,
    /// `file:///path`, `file:/path`, and absolute local paths.
    pub fn parse(url: &str) -> Result<Self, StorageError> {
        if let Some(rest) = strip_scheme(url, "gs://") {
            let (bucket, key) = split_bucket(rest);
            return Ok(StorageLocation::Gcs { bucket, key });
        }
        if let Some(rest) = strip_scheme(url, "s3://") {
            let (bucket, key) = split_bucket(rest);
            return Ok(StorageLocation::S3 { bucket, key });
        }
        if let Some(rest) = strip_scheme(url, "file://").or_else(|| strip_scheme(url, "file:")) {
            let path = if rest.starts_with('/') {
                PathBuf::from(rest)
            } else {
                PathBuf::from(format!("/{rest}"))
            };
            return Ok(StorageLocation::Local { path });
        }
        if url.starts_with('/') {
            return Ok(StorageLocation::Local {
                path: PathBuf::from(url),
            });
        }

        InvalidUrlSnafu { url }.fail()
    }

    /// Key prefix within the bucket, if any.
    pub fn key(&self) -> Option<&Path> {
        match self {
            StorageLocation::Gcs { key, .. } | StorageLocation::S3 { key, .. } => key.as_ref(),
            StorageLocation::Local { .. } => None,
        }
    }
}

fn strip_scheme<'a>(url: &'a str, scheme: &str) -> Option<&'a str> {
    if url.len() >= scheme.len()
        && url.is_char_boundary(scheme.len())
        && url[..scheme.len()].eq_ignore_ascii_case(scheme)
    {
        Some(&url[scheme.len()..])
    } else {
        None
    }
}

fn split_bucket(rest: &str) -> (String, Option<Path>) {
    match rest.split_once('/') {
        Some((bucket, key)) if !key.is_empty() => (bucket.to_string(), Some(Path::from(key))),
        Some((bucket, _)) => (bucket.to_string(), None),
        None => (rest.to_string(), None),
    }
}
