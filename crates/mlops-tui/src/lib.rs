//! mlops-tui - Terminal UI for mlops-console
//!
//! Creates an Engine from mlops-app and adds terminal rendering, event
//! polling, and the widgets for the code and cluster tools.

pub mod event;
pub mod layout;
pub mod render;
pub mod runner;
pub mod terminal;
pub mod theme;
pub mod widgets;

#[cfg(test)]
pub mod test_utils;

// Re-export main entry point
pub use runner::run;
