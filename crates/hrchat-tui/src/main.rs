use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use hrchat_core::{ChatClient, Config};

mod app;
mod handler;
mod logging;
mod tui;
mod ui;

use app::App;
use tui::{EventHandler, EventSender, Tui};

#[derive(Parser)]
#[command(name = "hrchat")]
#[command(about = "Terminal chat client for the HR database assistant")]
#[command(version)]
struct Cli {
    /// Base URL of the assistant server (overrides the config file)
    #[arg(short, long)]
    server: Option<String>,
    /// Request timeout in seconds, 0 for none
    #[arg(short, long)]
    timeout: Option<u64>,
    /// Write logs here instead of the default data directory
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Store --server and --timeout in the config file
    #[arg(long)]
    save: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = cli.log_file.clone().or_else(logging::default_log_path) {
        logging::init(&path)?;
    }

    let mut config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "could not read config, using defaults");
        Config::new()
    });
    if let Some(server) = cli.server {
        config.server_url = Some(server);
    }
    if let Some(timeout) = cli.timeout {
        config.request_timeout_secs = Some(timeout);
    }
    if cli.save {
        config.save()?;
        println!("Saved configuration to {}", Config::get_config_path()?.display());
    }

    let client = ChatClient::with_timeout(config.server_url(), config.request_timeout())?;
    tracing::info!(endpoint = client.endpoint(), "starting hrchat");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();
    let tx = events.sender();
    let mut app = App::new(client);

    let result = run(&mut terminal, &mut app, &mut events, &tx).await;

    tui::restore()?;
    tracing::info!("hrchat exited");
    result
}

async fn run(
    terminal: &mut Tui,
    app: &mut App,
    events: &mut EventHandler,
    tx: &EventSender,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        let Some(event) = events.next().await else {
            break;
        };
        handler::handle_event(app, event, tx);
    }
    Ok(())
}
