use crate::config::{Appearance, WidgetConfig};
use crate::storage::FsDocumentStore;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<FsDocumentStore>,
    pub config: Arc<WidgetConfig>,
    pub appearance: Appearance,
    /// Serializes read-modify-write cycles on the data files.
    pub write_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(store: FsDocumentStore, config: WidgetConfig, appearance: Appearance) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
            appearance,
            write_lock: Arc::new(Mutex::new(())),
        }
    }
}
