//! Client-owned image memory addressed by revocable `blob:` handles.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use crate::models::BinaryImage;

/// Embedded SVG shown in place of a result when rendering fails.
pub const ERROR_PLACEHOLDER_IMAGE: &str = "data:image/svg+xml;base64,PHN2ZyB4bWxucz0iaHR0cDovL3d3dy53My5vcmcvMjAwMC9zdmciIHdpZHRoPSIxMjgiIGhlaWdodD0iMTI4IiB2aWV3Qm94PSIwIDAgMjQgMjQiIGZpbGw9Im5vbmUiIHN0cm9rZT0iI2U1ZTdlYiIgc3Ryb2tlLXdpZHRoPSIyIiBzdHJva2UtbGluZWNhcD0icm91bmQiIHN0cm9rZS1saW5lam9pbj0icm91bmQiPjxwYXRoIGQ9Ik0xOCAzSDZhMiAyIDAgMCAwLTIgMnYxNGMwIDEuMS45IDIgMiAyaDEyYzEuMSAwIDItLjkgMi0yVjVjMC0xLjEtLjktMi0yLTJ6TTEyIDlhMyAzIDAgMSAwIDAgNmMwLTEuNy0yLTItMi0zLjVBMi41IDIuNSAwIDAgMSAxMiA5eiIvPjxjaXJjbGUgY3g9IjEyIiBjeT0iMTYuNSIgcj0iLjUiIGZpbGw9IiNlNWU3ZWIiLz48L3N2Zz4=";

const OBJECT_URL_PREFIX: &str = "blob:";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    fn generate() -> Self {
        ObjectUrl(format!("{}{}", OBJECT_URL_PREFIX, Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the preview currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageHandle {
    /// Bytes held in an [`ImageStore`], released through [`ImageStore::revoke`].
    Object(ObjectUrl),
    /// The fixed [`ERROR_PLACEHOLDER_IMAGE`]; nothing to release.
    Placeholder,
}

impl ImageHandle {
    pub fn url(&self) -> &str {
        match self {
            ImageHandle::Object(url) => url.as_str(),
            ImageHandle::Placeholder => ERROR_PLACEHOLDER_IMAGE,
        }
    }
}

#[derive(Clone, Default)]
pub struct ImageStore {
    objects: Arc<Mutex<HashMap<ObjectUrl, Arc<BinaryImage>>>>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn objects(&self) -> MutexGuard<'_, HashMap<ObjectUrl, Arc<BinaryImage>>> {
        self.objects.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn create(&self, image: BinaryImage) -> ObjectUrl {
        let url = ObjectUrl::generate();
        log::trace!("Created {} ({} bytes)", url, image.len());
        self.objects().insert(url.clone(), Arc::new(image));
        url
    }

    pub fn resolve(&self, url: &ObjectUrl) -> Option<Arc<BinaryImage>> {
        self.objects().get(url).cloned()
    }

    /// Frees the bytes behind `url`. Unknown or already revoked handles are
    /// ignored.
    pub fn revoke(&self, url: &ObjectUrl) -> bool {
        let removed = self.objects().remove(url).is_some();
        if removed {
            log::trace!("Revoked {}", url);
        }
        removed
    }

    /// Releases whatever a handle owns. The placeholder owns nothing.
    pub fn release(&self, handle: Option<&ImageHandle>) {
        if let Some(ImageHandle::Object(url)) = handle {
            self.revoke(url);
        }
    }

    pub fn len(&self) -> usize {
        self.objects().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects().is_empty()
    }
}

impl fmt::Debug for ImageStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageStore").field("live", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_resolve_revoke() {
        let store = ImageStore::new();
        let url = store.create(BinaryImage::new(vec![1, 2, 3]));

        assert!(url.as_str().starts_with("blob:"));
        assert_eq!(store.resolve(&url).unwrap().bytes, vec![1, 2, 3]);

        assert!(store.revoke(&url));
        assert!(store.resolve(&url).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_release_is_idempotent() {
        let store = ImageStore::new();
        let url = store.create(BinaryImage::new(vec![9]));
        let handle = ImageHandle::Object(url.clone());

        store.release(Some(&handle));
        store.release(Some(&handle));
        store.release(Some(&ImageHandle::Placeholder));
        store.release(None);
        assert!(!store.revoke(&url));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_placeholder_url() {
        assert!(ImageHandle::Placeholder
            .url()
            .starts_with("data:image/svg+xml;base64,"));
    }
}
