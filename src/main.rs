use anyhow::Context;
use clap::{Parser, Subcommand};
use crossterm::event::{self, Event as CEvent, KeyEventKind};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

use dextui::app::App;
use dextui::config::{Config, FanOut, Locale};
use dextui::fetch::{Catalog, CatalogClient};
use dextui::logging::{init_tracing, LogTarget};
use dextui::terminal::setup_terminal;
use dextui::ui::draw_ui;

#[derive(Debug, Parser)]
#[command(name = "dextui", version, about = "Browse the Pokémon catalog from your terminal")]
struct Cli {
    /// Config file (default: <config dir>/dextui/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Catalog base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Pokémon per page
    #[arg(long)]
    page_size: Option<usize>,

    /// Language for stat names and messages
    #[arg(long, value_enum)]
    locale: Option<Locale>,

    /// Skip entries whose details fail to load instead of failing the page
    #[arg(long)]
    lenient: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print one page of summaries as JSON and exit
    List {
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Print one Pokémon (by id or name) as JSON and exit
    Show { target: String },
}

impl Cli {
    fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let Some(size) = self.page_size {
            config.page_size = size;
        }
        if let Some(locale) = self.locale {
            config.locale = locale;
        }
        if self.lenient {
            config.fan_out = FanOut::Lenient;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let target = if cli.command.is_some() {
        LogTarget::Stderr
    } else {
        LogTarget::FileOnly
    };
    init_tracing(target);

    let config = cli.resolve_config()?;
    let client = CatalogClient::new(&config).context("failed to build HTTP client")?;

    match &cli.command {
        Some(Command::List { offset }) => {
            let page = client.fetch_page(*offset, config.page_size).await?;
            println!("{}", serde_json::to_string_pretty(&page.items)?);
            Ok(())
        }
        Some(Command::Show { target }) => {
            let detail = match target.parse::<u32>() {
                Ok(id) => client.fetch_by_id(id).await?,
                Err(_) => client.fetch_by_name(target).await?,
            };
            println!("{}", serde_json::to_string_pretty(&detail)?);
            Ok(())
        }
        None => run_tui(client, &config).await,
    }
}

async fn run_tui(client: CatalogClient, config: &Config) -> anyhow::Result<()> {
    info!(base_url = client.base_url(), page_size = config.page_size, "starting");
    let (mut app, mut rx) = App::new(Arc::new(client), config);
    app.refresh();

    let (mut terminal, _guard) = setup_terminal()?;

    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    while !app.should_quit {
        // apply completed background fetches before drawing
        while let Ok(msg) = rx.try_recv() {
            app.handle_message(msg);
        }
        app.tick(Instant::now());
        draw_ui(&mut terminal, &app)?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));
        if event::poll(timeout)? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Release {
                    app.handle_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }

    Ok(())
}
