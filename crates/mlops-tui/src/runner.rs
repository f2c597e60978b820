//! Main TUI runner - entry point and event loop

use mlops_app::config::Settings;
use mlops_app::route::Route;
use mlops_app::Engine;
use mlops_client::Backend;
use mlops_core::prelude::*;

use super::{event, render, terminal};

/// Run the console against `backend`, starting at `start`.
pub async fn run<B: Backend>(backend: B, settings: Settings, start: Route) -> Result<()> {
    terminal::install_panic_hook();
    let mut term = ratatui::init();

    info!("Starting at {}", start);
    let mut engine = Engine::new(backend, settings, start);

    let result = run_loop(&mut term, &mut engine);

    engine.shutdown().await;
    ratatui::restore();
    result
}

/// Main event loop
fn run_loop<B: Backend>(
    terminal: &mut ratatui::DefaultTerminal,
    engine: &mut Engine<B>,
) -> Result<()> {
    while !engine.should_quit() {
        // Background results, signal handler
        engine.drain_pending_messages();

        terminal.draw(|frame| render::view(frame, &mut engine.state))?;

        if let Some(message) = event::poll()? {
            engine.process_message(message);
        }
    }
    Ok(())
}
