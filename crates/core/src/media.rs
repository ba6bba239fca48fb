//! External media hosting collaborator.

use std::future::Future;

use crate::image::{ImageError, ImageSource};

/// A durable reference returned by the media host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
    /// Public HTTPS URL stored on the profile.
    pub url: String,
    /// Host-side identifier, kept for orphan bookkeeping in logs.
    pub public_id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// The image was rejected locally before any request was made.
    #[error("invalid image: {0}")]
    InvalidImage(#[from] ImageError),

    /// Network, DNS, TLS or timeout failure.
    #[error("upload request failed: {0}")]
    Request(String),

    /// The host answered with a non-success status.
    #[error("media host rejected upload ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Uploads a single image and returns its durable URL.
///
/// Uploads are not transactional: once this returns `Ok`, the remote copy
/// exists regardless of what the caller does next.
pub trait MediaUploader: Send + Sync {
    fn upload(
        &self,
        image: &ImageSource,
    ) -> impl Future<Output = Result<UploadedMedia, MediaError>> + Send;
}
