//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::services::notifier::Notifier;
use crate::store::RecordStore;

/// Record store and notifier behind trait objects, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }
}
