use std::sync::Arc;

use tokio::sync::watch;

use crate::config::Settings;
use crate::domain::message::MessageStore;
use crate::postgres::SchemaStatus;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub messages: MessageStore,
    pub schema_status: watch::Receiver<SchemaStatus>,
}

impl AppState {
    pub fn new(
        settings: Settings,
        messages: MessageStore,
        schema_status: watch::Receiver<SchemaStatus>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            messages,
            schema_status,
        }
    }

    /// Current schema status as last published by the initializer.
    pub fn schema_status(&self) -> SchemaStatus {
        *self.schema_status.borrow()
    }
}
