//! TETRIWELL - headless driver
//!
//! Reads whitespace separated tokens from stdin. `tick` is one base timer
//! tick, anything else is a key name looked up in the key bindings. Every
//! report is written to stdout as one JSON line.

use clap::Parser;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;
use tetriwell::{Report, Session, Settings};

#[derive(Debug, Parser)]
#[command(name = "tetriwell", version, about = "Falling-block engine driven from stdin")]
struct Cli {
    /// Fix the piece sequence
    #[arg(long)]
    seed: Option<u64>,

    /// Settings file to use instead of the platform config directory
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Begin playing without waiting for the start key
    #[arg(long)]
    autostart: bool,

    /// Write the default settings file and exit
    #[arg(long)]
    init_settings: bool,
}

fn tetriwell_temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("tetriwell");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn write_reports(out: &mut impl Write, reports: &[Report]) -> io::Result<()> {
    for report in reports {
        serde_json::to_writer(&mut *out, report)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    // Generate session ID for this instance
    let session_id: u32 = rand::random();
    let log_dir = tetriwell_temp_dir();
    let log_file = format!("{:08x}.log", session_id);

    // Setup tracing to log file
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tetriwell=debug"));
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    tracing::info!(
        "TETRIWELL starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    if cli.init_settings {
        let result = match &cli.settings {
            Some(path) => Settings::default().save_to(path),
            None => Settings::default().save(),
        };
        return result.map_err(io::Error::other);
    }

    // Load settings
    let mut settings = match &cli.settings {
        Some(path) => Settings::load_from(path).unwrap_or_else(|e| {
            eprintln!("Warning: Could not load settings from {}: {}", path.display(), e);
            tracing::warn!("Falling back to default settings: {}", e);
            Settings::default()
        }),
        None => Settings::load(),
    };
    if cli.seed.is_some() {
        settings.gameplay.seed = cli.seed;
    }

    let mut session = Session::new(&settings);
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if cli.autostart {
        let reports = session.command(tetriwell::input::Command::Start);
        write_reports(&mut out, &reports)?;
    }

    for line in io::stdin().lock().lines() {
        let line = line?;
        for token in line.split_whitespace() {
            let reports = if token.eq_ignore_ascii_case("tick") {
                session.tick()
            } else {
                session.key(token)
            };
            write_reports(&mut out, &reports)?;
        }
        out.flush()?;
    }
    out.flush()?;

    // Print final message
    if let Some(game) = session.game() {
        let summary = game.statistics().summary();
        eprintln!("Thanks for playing TETRIWELL!");
        eprintln!(
            "Level: {} | Lines: {} | Score: {}",
            summary.level, summary.lines, summary.score
        );
        eprintln!("High score: {}", session.scoreboard().high_score());
    }
    tracing::info!("TETRIWELL shutting down");

    Ok(())
}
