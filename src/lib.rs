pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod notifications;
pub mod ring;
pub mod settings;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::{ServerConfig, WidgetConfig};
pub use state::AppState;
pub use storage::FsDocumentStore;
