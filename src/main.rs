//! azure-creds - Azure OpenAI Credentials Form
//!
//! A terminal form that collects and validates Azure OpenAI connection
//! settings and hands complete credential sets to the running session.
//!
//! Logs go to a file so they never corrupt the terminal UI.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod app;
mod credentials;
mod input;
mod ui;

use app::{App, AppConfig};
use credentials::PartialCredentials;

/// Collect and validate Azure OpenAI connection credentials.
#[derive(Parser, Debug)]
#[command(name = "azure-creds", version, about)]
struct Cli {
    /// JSON file with initial values (azureEndpoint, apiKey, deployment, apiVersion)
    #[arg(long, value_name = "FILE")]
    seed: Option<PathBuf>,

    /// Azure OpenAI endpoint (https://your-resource.openai.azure.com)
    #[arg(long, env = "AZURE_OPENAI_ENDPOINT")]
    endpoint: Option<String>,

    /// Azure OpenAI API key
    #[arg(long, env = "AZURE_OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Deployment name
    #[arg(long, env = "AZURE_OPENAI_DEPLOYMENT")]
    deployment: Option<String>,

    /// API version (e.g. 2023-05-15)
    #[arg(long, env = "AZURE_OPENAI_API_VERSION")]
    api_version: Option<String>,

    /// Start with the settings panel expanded
    #[arg(long)]
    expanded: bool,

    /// Print the final credentials as JSON (or null) on exit
    #[arg(long)]
    print_json: bool,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn overrides(&self) -> PartialCredentials {
        PartialCredentials {
            azure_endpoint: self.endpoint.clone(),
            api_key: self.api_key.clone(),
            deployment: self.deployment.clone(),
            api_version: self.api_version.clone(),
        }
    }

    fn into_config(self) -> Result<AppConfig> {
        let initial = app::resolve_initial(self.seed.as_deref(), self.overrides())?;

        Ok(AppConfig {
            initial,
            start_expanded: self.expanded,
            print_json: self.print_json,
            log_file: self.log_file.unwrap_or_else(app::default_log_file),
            ..AppConfig::default()
        })
    }
}

fn setup_tracing(config: &AppConfig, verbose: u8) -> Result<WorkerGuard> {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("azure_creds={log_level}")));

    app::prepare_log_dir(&config.log_file)?;
    let log_dir = config.log_file.parent().unwrap_or(std::path::Path::new("."));
    let log_filename = config
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("azure-creds.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false).with_target(true))
        .init();

    Ok(guard)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    let config = cli.into_config()?;
    let _guard = setup_tracing(&config, verbose)?;

    info!(seeded = config.initial.is_some(), "starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result?;

    if app.config.print_json {
        println!("{}", serde_json::to_string_pretty(&app.received())?);
    }

    info!(
        configured = app.received().is_some(),
        updates = app.form.listener().updates(),
        "exiting"
    );
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    if app.handle_key_event(key) {
                        break;
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse_event(mouse),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
