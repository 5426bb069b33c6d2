// Registro: schema-driven employee registration in the terminal

use std::fs::{File, OpenOptions};
use std::io;
use std::sync::Mutex;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use registro::config::Cli;
use registro::departments::spawn_fetch;
use registro::ui::App;

fn init_logging(log_file: File) {
    // Default to INFO, overridable with RUST_LOG
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(Mutex::new(log_file)).with_ansi(false))
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cli.log_file)
        .map_err(|e| {
            format!("Could not open log file {}: {}", cli.log_file.display(), e)
        })?;
    init_logging(log_file);

    let config = match cli.load_schema() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    info!(fields = config.fields.len(), "starting registro");

    // The runtime only hosts the department lookup; the UI loop stays on this thread
    let runtime = tokio::runtime::Runtime::new()?;
    let mut app = App::new(config, cli.export_dir.clone());
    if !cli.no_fetch {
        app = app.with_departments(spawn_fetch(&runtime, cli.departments_url.clone()));
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }
    info!(records = app.records.len(), "exiting");

    Ok(())
}
