//! mlops-app - Application state and orchestration for mlops-console
//!
//! This crate implements the TEA (The Elm Architecture) pattern for state
//! management, the Engine that drives it, configuration loading, and the
//! background work (fetches, task polling, log streaming) behind the code and
//! cluster tools.

pub mod actions;
pub mod code_detail;
pub mod config;
pub mod confirm_dialog;
pub mod debounce;
pub mod diff;
pub mod engine;
pub mod forms;
pub mod handler;
pub mod input_key;
pub mod log_stream;
pub mod message;
pub mod notifications;
pub mod poller;
pub mod process;
pub mod remote;
pub mod route;
pub mod selection;
pub mod signals;
pub mod state;
pub mod text_buffer;

// Re-export primary types
pub use config::Settings;
pub use engine::Engine;
pub use handler::{UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use message::Message;
pub use route::Route;
pub use state::{AppPhase, AppState, UiMode};
