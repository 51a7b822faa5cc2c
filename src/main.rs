mod app;
mod cli;
mod ui;

use std::fs::File;
use std::io;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::{backend::CrosstermBackend, Terminal};

use minesweep::board::BoardConfig;
use minesweep::core::constants::TICK_INTERVAL_MS;
use minesweep::progression::{
    level_info, unlocked_abilities_view, JsonFileBackend, MemoryBackend, PlayerProfile,
    ProfileBackend, ProgressionStore,
};
use minesweep::session::GameSession;

use app::App;
use cli::{Cli, Command};

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    if cli.no_save {
        return run(&cli, MemoryBackend::new());
    }

    let backend = match &cli.profile {
        Some(path) => JsonFileBackend::with_path(path),
        None => JsonFileBackend::new()?,
    };
    log::info!("using profile {}", backend.path().display());
    run(&cli, backend)
}

/// Logs go to `--log-file` when given. Otherwise only the non-interactive
/// commands log, to stderr, so the alternate screen stays clean.
fn init_logging(cli: &Cli) -> io::Result<()> {
    if let Some(path) = &cli.log_file {
        let file = File::create(path)?;
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
    } else if cli.command() != Command::Play {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
            .init();
    }
    Ok(())
}

fn run<B: ProfileBackend>(cli: &Cli, backend: B) -> io::Result<()> {
    let mut store = ProgressionStore::load(backend);

    match cli.command() {
        Command::Stats => {
            print_stats(store.profile());
            Ok(())
        }
        Command::ResetProfile => {
            store.reset_profile();
            println!("Progress reset. New player id: {}", store.profile().id);
            Ok(())
        }
        Command::Play => {
            let rng = match cli.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let session = GameSession::new(BoardConfig::default(), store, rng);
            play(App::new(session))
        }
    }
}

fn print_stats(profile: &PlayerProfile) {
    let info = level_info(profile);
    let best = profile
        .best_time_seconds
        .map_or_else(|| "-".to_string(), |t| format!("{}s", t));

    println!("Player:       {}", profile.id);
    println!(
        "Level:        {} ({}/{} XP, {}%)",
        info.level, info.xp, info.xp_to_next_level, info.progress_percent
    );
    println!("Total score:  {}", profile.total_score);
    println!(
        "Games:        {} played, {} won ({:.0}%)",
        profile.games_played,
        profile.games_won,
        profile.win_rate()
    );
    println!("Best time:    {}", best);
    println!("Abilities:");
    for view in unlocked_abilities_view(profile) {
        println!(
            "  {} {:<12} level {:<3} uses {:<3} next level {} score",
            view.icon, view.name, view.level, view.uses, view.level_up_cost
        );
    }
}

fn play<B: ProfileBackend, R: Rng>(mut app: App<B, R>) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app);

    // Cleanup terminal
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop<B: ProfileBackend, R: Rng>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<B, R>,
) -> io::Result<()> {
    let tick_interval = Duration::from_millis(TICK_INTERVAL_MS);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Poll for input (50ms non-blocking)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press && !app.handle_key(key_event.code) {
                    log::info!("player quit");
                    return Ok(());
                }
            }
        }

        let delta = last_tick.elapsed();
        if delta >= tick_interval {
            app.update(delta);
            last_tick = Instant::now();
        }
    }
}
