//! mlops-console - terminal console for ML code versioning and kind clusters
//!
//! This is the binary entry point. All logic lives in the workspace crates.

use std::path::PathBuf;

use clap::Parser;
use mlops_app::config::{self, Settings};
use mlops_app::route::Route;
use mlops_client::HttpBackend;
use mlops_core::prelude::*;

/// Terminal console for ML code versioning and kind cluster management
#[derive(Parser, Debug)]
#[command(name = "mlopsc")]
#[command(about = "Terminal console for ML code versioning and kind cluster management", long_about = None)]
struct Args {
    /// Screen to open first, e.g. `/codes/3` or `/clusters/dev/pods`
    #[arg(value_name = "ROUTE", default_value = "/codes")]
    route: String,

    /// Code versioning backend base URL
    #[arg(long, value_name = "URL")]
    code_url: Option<String>,

    /// Cluster management backend base URL
    #[arg(long, value_name = "URL")]
    cluster_url: Option<String>,

    /// Settings file (defaults to the platform config directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the effective settings to the config file and exit
    #[arg(long)]
    init_config: bool,
}

impl Args {
    fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(config::default_config_path)
    }

    /// Settings from the file with command-line overrides applied
    fn settings(&self) -> Settings {
        let mut settings = self
            .config_path()
            .map(|path| config::load_settings(&path))
            .unwrap_or_default();
        if let Some(url) = &self.code_url {
            settings.api.code_base_url = url.clone();
        }
        if let Some(url) = &self.cluster_url {
            settings.api.cluster_base_url = url.clone();
        }
        settings
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = args.settings();

    if args.init_config {
        let path = args
            .config_path()
            .ok_or_else(|| Error::config("No config directory on this platform; pass --config"))?;
        config::save_settings(&path, &settings).context("Writing settings")?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let start = Route::parse(&args.route)
        .ok_or_else(|| Error::config(format!("Unknown route: {}", args.route)))?;

    color_eyre::install().map_err(|e| Error::terminal(e.to_string()))?;
    mlops_core::logging::init()?;

    info!(
        "Code backend {}, cluster backend {}",
        settings.api.code_base_url, settings.api.cluster_base_url
    );
    let backend = HttpBackend::new(
        &settings.api.code_base_url,
        &settings.api.cluster_base_url,
        settings.api.request_timeout(),
    )?;

    mlops_tui::run(backend, settings, start).await
}
