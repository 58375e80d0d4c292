mod app;
mod render;
mod store;
mod theme;

use app::App;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use solver_core::Solver;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use store::BoardStore;

/// Interactive Sudoku board with an animated automatic solver
#[derive(Parser)]
#[command(name = "sudoku-solver", version)]
struct Args {
    /// Board file to load and save (defaults to the platform data dir)
    #[arg(long)]
    board: Option<PathBuf>,

    /// Seed for the solver's randomized cell choice
    #[arg(long)]
    seed: Option<u64>,

    /// Delay between animated solver steps, in milliseconds
    #[arg(long, default_value_t = 40)]
    step_ms: u64,

    /// Append log output to this file
    #[arg(long)]
    log: Option<PathBuf>,
}

fn init_logging(path: &PathBuf) -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] {}: {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .chain(fern::log_file(path)?)
        .apply()?;
    Ok(())
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    if let Some(ref path) = args.log {
        if let Err(e) = init_logging(path) {
            eprintln!("Could not open log file: {}", e);
        }
    }

    let store = match args.board {
        Some(path) => BoardStore::with_path(path),
        None => BoardStore::new(),
    };
    let solver = match args.seed {
        Some(seed) => Solver::with_seed(seed),
        None => Solver::new(),
    };
    let mut app = App::new(store, solver, Duration::from_millis(args.step_ms));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Run the app
    let result = run_app(&mut stdout, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn run_app(stdout: &mut io::Stdout, app: &mut App) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        let tick_rate = app.get_tick_rate();

        render::render(stdout, app)?;
        stdout.flush()?;

        // Handle input with timeout so solver animation keeps ticking
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout.min(Duration::from_millis(33)))? {
            if let Event::Key(key) = event::read()? {
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    break;
                }

                match app.handle_key(key) {
                    app::AppAction::Continue => {}
                    app::AppAction::Quit => break,
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
