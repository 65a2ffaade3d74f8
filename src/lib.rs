pub mod config;
pub mod error;
pub mod models {
    pub mod campaign;
    pub mod event;
    pub mod submission;
}
pub mod utils {
    pub mod timers;
    pub mod validation;
}
pub mod repositories {
    pub mod campaign_repository;
    pub mod storage;
    pub mod submission_repository;
}
pub mod api {
    pub mod submission_client;
}
pub mod tracking {
    pub mod tracker;
}
pub mod handlers {
    pub mod campaign_handlers;
    pub mod form_handlers;
    pub mod interaction_handlers;
    pub mod message_presenter;
    pub mod performance_handlers;
}
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{LandingConfig, StorageMode};
pub use error::{StorageError, SubmissionError, ValidationError};
pub use utils::validation::is_valid_email;
