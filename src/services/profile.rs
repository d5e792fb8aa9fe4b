//! Profile document fetch and the avatar upload flow.

use std::path::Path;

use serde_json::json;
use thiserror::Error;

use crate::backend::{Backend, Document, StoreError};
use crate::model::{UserProfile, USERS_COLLECTION};

/// Uploads larger than this are rejected before touching the backend.
pub const MAX_AVATAR_BYTES: usize = 1024 * 1024;

/// Displays as the exact text shown to the user.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Error: file is too large (>1MB)")]
    TooLarge,
    #[error("Error: {0}")]
    Read(String),
    #[error("Error: {0}")]
    Store(#[from] StoreError),
}

/// Fetches the profile document keyed by `uid`. `Ok(None)` is the
/// recoverable "no data yet" case, not an error.
pub async fn fetch_profile(backend: &Backend, uid: &str) -> Result<Option<UserProfile>, StoreError> {
    let Some(fields) = backend.docs.get_document(USERS_COLLECTION, uid).await? else {
        tracing::debug!(uid, "no profile document yet");
        return Ok(None);
    };
    let profile = UserProfile::from_document(uid, fields)
        .map_err(|e| StoreError::Rejected(format!("malformed profile document: {}", e)))?;
    Ok(Some(profile))
}

/// Reads the selected avatar file, enforcing the size cap.
pub async fn read_avatar_file(path: &Path) -> Result<Vec<u8>, UploadError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| UploadError::Read(format!("failed to read {}: {}", path.display(), e)))?;
    if bytes.len() > MAX_AVATAR_BYTES {
        return Err(UploadError::TooLarge);
    }
    Ok(bytes)
}

/// Uploads the photo keyed by `uid` (overwriting any prior object),
/// resolves its download address, and persists the address into the
/// profile document. The steps are sequential, not transactional: a
/// failure after the upload leaves the uploaded object orphaned.
pub async fn upload_photo(
    backend: &Backend,
    uid: &str,
    bytes: Vec<u8>,
) -> Result<String, UploadError> {
    backend.blobs.put_object(uid, bytes).await?;
    let url = backend.blobs.get_download_address(uid).await?;

    let mut fields = Document::new();
    fields.insert("profilePhoto".to_string(), json!(url));
    backend
        .docs
        .update_fields(USERS_COLLECTION, uid, fields)
        .await?;
    tracing::info!(uid, "profile photo updated");
    Ok(url)
}
