pub mod app;
pub mod book;
pub mod breakdown;
pub mod clock;
pub mod config;
pub mod display;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ticker;

pub use app::router;
pub use book::{CounterBook, Confirmation, ImportMode, Outcome};
pub use breakdown::{compute_breakdown, compute_breakdown_str, Breakdown};
pub use config::Config;
pub use models::{CounterRecord, Direction};
pub use state::AppState;
pub use storage::{load_counters, resolve_data_path};
