use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use bytes::Bytes;
use log::debug;

use crate::{constants::PREVIEW_URL_SCHEME, selection::SelectedImage};

/// Registry of live preview URLs, in the spirit of a browser's object URL
/// store. Cloning shares the same registry.
#[derive(Debug, Clone, Default)]
pub struct PreviewStore {
    entries: Arc<Mutex<HashMap<String, Bytes>>>,
}

impl PreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `image` and returns a handle that revokes its URL on drop.
    pub fn create(&self, image: &SelectedImage) -> PreviewHandle {
        let url = format!("{}{:032x}", PREVIEW_URL_SCHEME, rand::random::<u128>());
        self.lock().insert(url.clone(), image.bytes().clone());
        debug!("created preview {} for {}", url, image.file_name());

        PreviewHandle {
            url,
            content_type: image.content_type().to_string(),
            store: self.clone(),
        }
    }

    /// Bytes behind a live preview URL; `None` once it has been revoked.
    pub fn resolve(&self, url: &str) -> Option<Bytes> {
        self.lock().get(url).cloned()
    }

    pub fn live_count(&self) -> usize {
        self.lock().len()
    }

    fn revoke(&self, url: &str) {
        if self.lock().remove(url).is_some() {
            debug!("revoked preview {}", url);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Bytes>> {
        // poisoned locks are recovered
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Debug)]
pub struct PreviewHandle {
    url: String,
    content_type: String,
    store: PreviewStore,
}

impl PreviewHandle {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.store.revoke(&self.url);
    }
}
