use std::rc::Rc;

use crate::error::StorageError;
use crate::models::campaign::UtmParams;
use crate::repositories::storage::{KeyValueStore, UTM_PARAMS_KEY};

#[derive(Clone)]
pub struct CampaignRepository {
    store: Rc<dyn KeyValueStore>,
}

impl CampaignRepository {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Overwrites whatever attribution was stored before.
    pub fn save(&self, params: &UtmParams) -> Result<(), StorageError> {
        let raw = serde_json::to_string(params)?;
        self.store.set_item(UTM_PARAMS_KEY, &raw)
    }

    pub fn load(&self) -> Option<UtmParams> {
        self.store
            .get_item(UTM_PARAMS_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
    }
}
