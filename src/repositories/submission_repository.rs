use std::rc::Rc;

use tracing::warn;

use crate::error::StorageError;
use crate::models::submission::Submission;
use crate::repositories::storage::{KeyValueStore, SUBMISSIONS_KEY};

/// Append-only log of signups kept in local storage.
#[derive(Clone)]
pub struct SubmissionRepository {
    store: Rc<dyn KeyValueStore>,
}

impl SubmissionRepository {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// All persisted records. Missing or unparseable content reads as empty.
    pub fn all(&self) -> Vec<Submission> {
        let Some(raw) = self.store.get_item(SUBMISSIONS_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(submissions) => submissions,
            Err(e) => {
                warn!("Discarding unreadable {} content: {}", SUBMISSIONS_KEY, e);
                Vec::new()
            }
        }
    }

    /// Read-modify-write append. Not atomic; the page is single-threaded.
    pub fn append(&self, submission: Submission) -> Result<(), StorageError> {
        let mut submissions = self.all();
        submissions.push(submission);
        let raw = serde_json::to_string(&submissions)?;
        self.store.set_item(SUBMISSIONS_KEY, &raw)
    }
}
