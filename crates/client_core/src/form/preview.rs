//! Banner image attachment and its local preview reference.

use std::{
    collections::HashSet,
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use shared::protocol::BannerImageInfo;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::error::FormError;

const PREVIEW_SCHEME: &str = "blob:event-form/";
const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Tracks preview references that are still live. A reference stays live
/// exactly as long as its [`PreviewHandle`] exists.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    live: Arc<Mutex<HashSet<String>>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self) -> PreviewHandle {
        let url = format!("{PREVIEW_SCHEME}{}", Uuid::new_v4());
        self.lock().insert(url.clone());
        trace!(%url, "preview reference created");
        PreviewHandle {
            url,
            registry: self.clone(),
        }
    }

    pub fn is_live(&self, url: &str) -> bool {
        self.lock().contains(url)
    }

    pub fn live_count(&self) -> usize {
        self.lock().len()
    }

    fn revoke(&self, url: &str) {
        if self.lock().remove(url) {
            trace!(%url, "preview reference revoked");
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.live
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Owns one preview reference and revokes it on drop.
#[derive(Debug)]
pub struct PreviewHandle {
    url: String,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.revoke(&self.url);
    }
}

/// A picked image file. The MIME type is whatever the picker reported; it is
/// only checked when the form is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Reads `path` and guesses the MIME type from its extension.
    pub async fn from_path(path: &Path) -> Result<Self, FormError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| FormError::ImageRead {
                path: path.to_path_buf(),
                source,
            })?;
        let mime_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or(FALLBACK_MIME_TYPE);
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!(%file_name, mime_type, size = bytes.len(), "image file read");
        Ok(Self::new(file_name, mime_type, bytes))
    }
}

#[derive(Debug)]
pub struct AttachedImage {
    file: ImageFile,
    preview: PreviewHandle,
}

impl AttachedImage {
    pub(crate) fn new(file: ImageFile, preview: PreviewHandle) -> Self {
        Self { file, preview }
    }

    pub fn file(&self) -> &ImageFile {
        &self.file
    }

    pub fn mime_type(&self) -> &str {
        &self.file.mime_type
    }

    pub fn preview_url(&self) -> &str {
        self.preview.url()
    }

    pub fn size_bytes(&self) -> u64 {
        self.file.bytes.len() as u64
    }

    pub fn info(&self) -> BannerImageInfo {
        BannerImageInfo {
            file_name: self.file.file_name.clone(),
            mime_type: self.file.mime_type.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_revokes_its_reference_on_drop() {
        let registry = PreviewRegistry::new();
        let first = registry.create();
        let second = registry.create();
        assert_ne!(first.url(), second.url());
        assert!(first.url().starts_with("blob:"));
        assert_eq!(registry.live_count(), 2);

        let url = first.url().to_string();
        drop(first);
        assert!(!registry.is_live(&url));
        assert!(registry.is_live(second.url()));
        assert_eq!(registry.live_count(), 1);
    }

    #[test]
    fn attached_image_reports_size_and_metadata() {
        let registry = PreviewRegistry::new();
        let image = AttachedImage::new(
            ImageFile::new("banner.png", "image/png", vec![0; 2048]),
            registry.create(),
        );
        assert_eq!(image.size_bytes(), 2048);
        assert_eq!(image.info().file_name, "banner.png");
        assert!(registry.is_live(image.preview_url()));
    }

    #[tokio::test]
    async fn reading_from_path_guesses_mime_type() {
        let suffix = Uuid::new_v4();
        let path = std::env::temp_dir().join(format!("event_form_banner_{suffix}.jpg"));
        tokio::fs::write(&path, b"not really a jpeg")
            .await
            .expect("write");

        let file = ImageFile::from_path(&path).await.expect("read");
        assert_eq!(file.mime_type, "image/jpeg");
        assert_eq!(file.bytes.len(), 17);
        assert!(file.file_name.ends_with(".jpg"));

        tokio::fs::remove_file(&path).await.expect("cleanup");
    }

    #[tokio::test]
    async fn missing_file_is_an_image_read_error() {
        let path = std::env::temp_dir().join(format!("event_form_missing_{}.png", Uuid::new_v4()));
        let err = ImageFile::from_path(&path).await.expect_err("should fail");
        assert!(matches!(err, FormError::ImageRead { .. }));
    }
}
