pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod identity;
pub mod loader;
pub mod models;
pub mod persistence;
pub mod schedule;
pub mod session;
pub mod state;
pub mod storage;
pub mod summary;
pub mod tracker;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::{DocumentStore, FileDocumentStore, MemoryDocumentStore};
