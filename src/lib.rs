//! Focus Timer - A focus countdown service with a session summary hand-off
//!
//! This library provides the countdown state machine, the local control API a
//! UI drives it through, and the client that stores finished sessions in the
//! planner API.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::{FocusError, PersistError};
pub use state::AppState;
pub use utils::signals::shutdown_signal;
