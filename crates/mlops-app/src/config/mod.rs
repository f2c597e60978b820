//! Configuration file parsing for mlops-console
//!
//! A single `config.toml` under the platform config directory, overridable
//! from the command line.

pub mod settings;
pub mod types;

pub use settings::{default_config_path, load_settings, save_settings, CONFIG_FILENAME};
pub use types::*;
