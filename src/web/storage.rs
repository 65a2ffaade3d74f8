use std::rc::Rc;

use tracing::warn;
use web_sys::{Storage, Window};

use crate::error::StorageError;
use crate::repositories::storage::KeyValueStore;

pub struct LocalStore {
    storage: Storage,
}

impl KeyValueStore for LocalStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::WriteFailed {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
    }
}

/// Used when the browser denies access to `localStorage`. Reads are empty and
/// every write fails.
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get_item(&self, _key: &str) -> Option<String> {
        None
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

pub fn local_store(window: &Window) -> Rc<dyn KeyValueStore> {
    match window.local_storage() {
        Ok(Some(storage)) => Rc::new(LocalStore { storage }),
        _ => {
            warn!("localStorage is not available; signups cannot be persisted");
            Rc::new(UnavailableStore)
        }
    }
}
