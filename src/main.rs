//! Link26 :: Terminal
//!
//! Hacking sim played through a fake shell.

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use link26::config::{load_config_from_env, GameConfig};
use link26::save::{DisabledSave, JsonFileSave, SaveProvider};
use link26::tui::App;
use link26::GameError;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::fs::OpenOptions;
use std::io::stdout;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn main() -> link26::Result<()> {
    let (config, source) = load_config_from_env();
    init_logging(&config)?;
    source.report();
    tracing::info!(
        target: "link26",
        version = link26::VERSION,
        config = ?source.path(),
        "starting"
    );

    let provider: Box<dyn SaveProvider> = if config.save_enabled {
        Box::new(JsonFileSave::new(config.save_path.clone()))
    } else {
        Box::new(DisabledSave)
    };

    // Setup terminal
    enable_raw_mode().map_err(GameError::Terminal)?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen).map_err(GameError::Terminal)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(GameError::Terminal)?;

    let mut app = App::new(provider, &config);

    // Main loop
    while app.running {
        app.tick();

        terminal.draw(|frame| {
            app.render(frame);
        })?;

        if !app.handle_input()? {
            break;
        }
    }

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    tracing::info!(target: "link26", "shutdown");

    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║  Connection closed. Thanks for playing Link26.         ║");
    println!("║                                                        ║");
    println!("║  Keep your trace low.                                  ║");
    println!("╚════════════════════════════════════════════════════════╝\n");

    Ok(())
}

/// The TUI owns stdout, so logs go to a file
fn init_logging(config: &GameConfig) -> Result<(), GameError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
        .map_err(|source| GameError::LogFile {
            path: config.log_path.clone(),
            source,
        })?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
