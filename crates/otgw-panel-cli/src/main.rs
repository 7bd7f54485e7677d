//! otgw-panel: drive the OpenTherm Gateway control panels from a terminal

mod terminal;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use otgw_panel_core::config::PanelConfig;
use otgw_panel_core::controller::{Controller, DeviceId, HttpController};
use otgw_panel_core::cpanel::{ControlPanel, Tab};
use otgw_panel_core::demo::DemoController;
use otgw_panel_core::monitor::RefreshEngine;
use otgw_panel_core::panels::{build_monitor, FormSelections};
use otgw_panel_core::render::{target_for, UiGeneration};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use terminal::TerminalHost;

#[derive(Debug, Parser)]
#[command(
    name = "otgw-panel",
    version,
    about = "OpenTherm Gateway control panels",
    after_help = "Examples:\n  otgw-panel --demo monitor\n  otgw-panel --url http://192.168.1.10:3480 --device 12 render eco\n  otgw-panel save settings --set PluginDebug=1 --set PluginHaveChildren=24,27"
)]
struct Cli {
    /// Config file (defaults to the user's config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Controller address, overriding the config file
    #[arg(long, global = true)]
    url: Option<String>,

    /// Gateway device number, overriding the config file
    #[arg(long, global = true)]
    device: Option<u32>,

    /// Controller UI generation (ui5 or ui7)
    #[arg(long, global = true)]
    ui: Option<UiGeneration>,

    /// Request timeout in milliseconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Use the built-in simulated gateway instead of a controller
    #[arg(long, global = true)]
    demo: bool,

    /// Show debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Follow the Monitor tab until interrupted
    Monitor {
        /// Stop after this many seconds
        #[arg(long)]
        duration: Option<u64>,
    },
    /// Print the current monitor values once
    Status,
    /// Print the markup of a tab
    Render {
        /// monitor, eco, hardware or settings
        tab: Tab,
        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Save settings of a tab and reload the controller
    Save {
        /// eco, hardware or settings
        tab: Tab,
        /// Field value, repeatable (KEY=VALUE)
        #[arg(long = "set", value_name = "KEY=VALUE", required = true)]
        values: Vec<String>,
    },
    /// Reset one of the four transmission error counters
    ResetError {
        /// Counter number, 1 to 4
        counter: usize,
    },
    /// Show or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the effective configuration to the config file
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let path = match &cli.config {
        Some(path) => path.clone(),
        None => PanelConfig::default_path()?,
    };
    let config = effective_config(&cli, PanelConfig::load_or_default(&path)?);

    if let Command::Config { action } = &cli.command {
        return run_config(action, &config, &path);
    }

    let host = Arc::new(TerminalHost::new());
    let (controller, device): (Arc<dyn Controller>, DeviceId) = if cli.demo {
        (Arc::new(DemoController::new()), DemoController::DEVICE)
    } else {
        let controller = HttpController::new(&config.base_url, config.timeout())
            .with_context(|| format!("cannot reach controller at {}", config.base_url))?;
        (Arc::new(controller), config.device)
    };
    tracing::debug!(%device, generation = %config.generation, demo = cli.demo, "starting");

    let cpanel = ControlPanel::new(controller, device, config.generation, host.clone())
        .with_refresh_interval(config.refresh_interval());

    match cli.command {
        Command::Monitor { duration } => run_monitor(&cpanel, duration).await?,
        Command::Status => run_status(&cpanel, &host, config.generation).await?,
        Command::Render { tab, output } => {
            let html = cpanel.render_tab(tab).await?;
            match output {
                Some(path) => std::fs::write(&path, html)
                    .with_context(|| format!("cannot write {}", path.display()))?,
                None => println!("{html}"),
            }
        }
        Command::Save { tab, values } => {
            let form = parse_form(&values)?;
            let written = match tab {
                Tab::Eco => cpanel.save_eco_settings(&form).await?,
                Tab::Hardware => cpanel.save_hardware_settings(&form).await?,
                Tab::Settings => cpanel.save_plugin_settings(&form).await?,
                Tab::Monitor => bail!("the monitor tab has no settings"),
            };
            tracing::info!(%tab, written, "settings saved");
        }
        Command::ResetError { counter } => {
            if counter == 0 || !cpanel.reset_error_counter(counter - 1) {
                bail!("error counter must be between 1 and 4");
            }
        }
        Command::Config { .. } => {}
    }

    cpanel.on_panel_closed().await;
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn effective_config(cli: &Cli, mut config: PanelConfig) -> PanelConfig {
    if let Some(url) = &cli.url {
        config.base_url = url.clone();
    }
    if let Some(device) = cli.device {
        config.device = DeviceId(device);
    }
    if let Some(generation) = cli.ui {
        config.generation = generation;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_ms = timeout;
    }
    config
}

fn run_config(action: &ConfigAction, config: &PanelConfig, path: &Path) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("# {}", path.display());
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!("{} already exists, use --force to replace it", path.display());
            }
            config.save(path)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

async fn run_monitor(cpanel: &ControlPanel, duration: Option<u64>) -> Result<()> {
    cpanel.open_monitor_tab().await?;
    match duration {
        Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
        None => tokio::signal::ctrl_c()
            .await
            .context("cannot listen for Ctrl-C")?,
    }
    Ok(())
}

async fn run_status(cpanel: &ControlPanel, host: &TerminalHost, generation: UiGeneration) -> Result<()> {
    let session = cpanel.session();
    let catalog = session.load_messages().await?;
    let target = target_for(generation);
    let mut panel =
        build_monitor(target.as_ref(), session.variables(), session.device(), &catalog).await;

    let engine = RefreshEngine::new(session.variables().clone(), session.device(), catalog);
    engine.tick(&mut panel.view).await;
    host.print_view(&panel.view);
    Ok(())
}

/// `KEY=VALUE` pairs into a form submission; `KEY=` submits an empty value
fn parse_form(values: &[String]) -> Result<FormSelections> {
    values
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                .with_context(|| format!("expected KEY=VALUE, got '{pair}'"))
        })
        .collect()
}
