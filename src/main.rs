use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use crossterm::event::{self, Event as CEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use dex_catalog::artwork::SpriteThumb;
use dex_catalog::config::{DEFAULT_BASE_URL, DEFAULT_LIMIT};
use dex_catalog::toast::TerminalAlerts;
use dex_catalog::ui::{draw_ui, Action, App, ART_BACKGROUND};
use dex_catalog::utils::{format_id, format_tenths};
use dex_catalog::{AlertMode, AlertPlatform, CatalogClient, Config, DisplayRecord, SelectionNotifier};

type LoadSlot = Arc<Mutex<Option<Result<Arc<Vec<DisplayRecord>>, String>>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AlertsArg {
    Prompt,
    Granted,
    Denied,
    Off,
}

impl From<AlertsArg> for AlertMode {
    fn from(a: AlertsArg) -> Self {
        match a {
            AlertsArg::Prompt => AlertMode::Prompt,
            AlertsArg::Granted => AlertMode::Granted,
            AlertsArg::Denied => AlertMode::Denied,
            AlertsArg::Off => AlertMode::Off,
        }
    }
}

/// Browse the Pokémon catalog in the terminal.
#[derive(Debug, Parser)]
#[command(name = "dex", version)]
struct Cli {
    /// Number of entries to load.
    #[arg(long, env = "POKEMON_LIMIT", default_value_t = DEFAULT_LIMIT)]
    limit: usize,

    /// Catalog API root.
    #[arg(long, env = "DEX_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// How selection alerts ask for permission.
    #[arg(long, env = "DEX_ALERTS", value_enum, default_value_t = AlertsArg::Prompt)]
    alerts: AlertsArg,

    /// Write logs to this file (the UI owns the terminal otherwise).
    #[arg(long, env = "DEX_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Load the catalog once, print it and exit.
    #[arg(long)]
    fetch_only: bool,

    /// With --fetch-only, print display records as JSON.
    #[arg(long, requires = "fetch_only")]
    json: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            base_url: self.base_url.clone(),
            limit: self.limit,
            alerts: self.alerts.into(),
            ..Config::default()
        }
    }
}

fn init_tracing(log_file: Option<&Path>, to_stderr: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else if to_stderr {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref(), cli.fetch_only)?;
    let config = cli.config();
    let client = Arc::new(CatalogClient::new(&config).context("failed to build HTTP client")?);

    if cli.fetch_only {
        return fetch_only(&client, config.limit, cli.json).await;
    }

    // One notifier for the whole session, shared with the event loop.
    let alerts = TerminalAlerts::for_mode(config.alerts).map(Arc::new);
    let platform = alerts.clone().map(|a| a as Arc<dyn AlertPlatform>);
    let notifier = Arc::new(SelectionNotifier::with_dismiss_after(
        platform,
        config.dismiss_after,
    ));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, App::new(alerts), client, notifier, config.limit).await;

    // Restore terminal
    disable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(LeaveAlternateScreen)?;
    result
}

async fn fetch_only(client: &CatalogClient, limit: usize, json: bool) -> anyhow::Result<()> {
    let records = client.fetch_list(limit).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(records.as_slice())?);
        return Ok(());
    }
    for p in records.iter() {
        println!(
            "{:<6} {:<14} {:<18} {:>5} {:>6} m {:>7} kg",
            format_id(p.id),
            p.name,
            p.types.join("/"),
            p.stats.total(),
            format_tenths(p.height),
            format_tenths(p.weight)
        );
    }
    eprintln!("{} entries loaded", records.len());
    Ok(())
}

fn spawn_load(client: Arc<CatalogClient>, limit: usize, slot: LoadSlot) {
    tokio::spawn(async move {
        let result = client
            .fetch_list(limit)
            .await
            .map_err(|e| e.to_string());
        let mut slot = slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(result);
    });
}

fn spawn_artwork(
    client: Arc<CatalogClient>,
    id: u32,
    url: String,
    cache: Arc<Mutex<std::collections::HashMap<u32, SpriteThumb>>>,
) {
    tokio::spawn(async move {
        let bytes = match client.fetch_image(&url).await {
            Ok(b) => b,
            Err(e) => {
                warn!(id, url = %url, error = %e, "failed to fetch artwork");
                return;
            }
        };
        match SpriteThumb::decode(&bytes, ART_BACKGROUND) {
            Ok(thumb) => {
                cache
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .insert(id, thumb);
            }
            Err(e) => warn!(id, error = %e, "failed to decode artwork"),
        }
    });
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    client: Arc<CatalogClient>,
    notifier: Arc<SelectionNotifier>,
    limit: usize,
) -> anyhow::Result<()> {
    // Shared slot where background loads hand results to the main loop
    let loaded: LoadSlot = Arc::new(Mutex::new(None));
    app.begin_loading();
    spawn_load(Arc::clone(&client), limit, Arc::clone(&loaded));

    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        draw_ui(terminal, &mut app)?;

        if let Some(result) = {
            let mut slot = loaded.lock().unwrap_or_else(|e| e.into_inner());
            slot.take()
        } {
            app.finish_loading(result);
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));
        if event::poll(timeout)? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                match app.handle_key(key.code) {
                    Action::Quit => break,
                    Action::Reload => {
                        info!("reloading catalog");
                        client.clear_caches();
                        app.artwork
                            .lock()
                            .unwrap_or_else(|e| e.into_inner())
                            .clear();
                        app.begin_loading();
                        spawn_load(Arc::clone(&client), limit, Arc::clone(&loaded));
                    }
                    Action::Selected(index) => {
                        let records = Arc::clone(&app.records);
                        let Some(record) = records.get(index) else {
                            continue;
                        };
                        // the alert never holds up the overlay
                        let n = Arc::clone(&notifier);
                        let name = record.name.clone();
                        tokio::spawn(async move { n.notify(&name).await });

                        let have_art = app
                            .artwork
                            .lock()
                            .unwrap_or_else(|e| e.into_inner())
                            .contains_key(&record.id);
                        if let (false, Some(url)) = (have_art, record.image.as_ref()) {
                            spawn_artwork(
                                Arc::clone(&client),
                                record.id,
                                url.clone(),
                                Arc::clone(&app.artwork),
                            );
                        }
                    }
                    Action::None => {}
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }
    Ok(())
}
