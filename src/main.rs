//! Icy Climb entry point
//!
//! Without a window or input device the native build runs the demo climber
//! headless: one autoplay session, then the leaderboard.

use icy_climb::consts::SIM_DT;
use icy_climb::highscores::format_date;
use icy_climb::persistence::JsonFileStore;
use icy_climb::platform;
use icy_climb::sim::GamePhase;
use icy_climb::{Game, Settings};

/// Longest session the demo runs before giving up (seconds of sim time)
const DEMO_LIMIT_SECS: f32 = 600.0;

fn main() {
    env_logger::init();
    log::info!("Icy Climb (native) starting...");

    let settings = Settings::load(Settings::FILE_NAME);
    let store = JsonFileStore::new(&settings.highscore_path);
    let mut game = Game::new(&settings, store);
    game.set_autoplay(true);

    let max_ticks = (DEMO_LIMIT_SECS / SIM_DT) as u64;
    while game.state.phase == GamePhase::Playing
        && game.state.time_ticks < max_ticks
        && !game.should_quit()
    {
        game.frame(SIM_DT);
    }

    if game.state.phase == GamePhase::Playing {
        log::info!("Demo time limit reached");
        if let Some(rank) = game.projected_rank() {
            println!("Unfinished run would place #{}", rank);
        }
    }

    let stats = &game.state.stats;
    println!("\nRun finished after {:.1}s", stats.elapsed);
    println!("  Highest floor: {}", stats.highest_floor);
    println!("  Score:         {}", stats.score);
    println!("  Combo bonus:   {}", stats.combo_bonus_total);
    println!("  Best streak:   {}", stats.best_streak);
    println!("  Jumps:         {}", stats.jumps);

    if let Some(rank) = game.last_rank() {
        println!("  New high score! Rank #{}", rank);
    }
    if let Some(e) = game.take_persist_error() {
        println!(
            "  (high scores could not be saved to {}: {})",
            game.store().path().display(),
            e
        );
    }

    let scores = game.highscores();
    if scores.is_empty() {
        return;
    }
    let now = platform::now_ms();
    println!("\nHigh scores:");
    for (i, entry) in scores.entries.iter().enumerate() {
        println!(
            "  {:>2}. {:>8}  floor {:>4}  {}",
            i + 1,
            entry.score,
            entry.highest_floor,
            format_date(entry.timestamp, now)
        );
    }
}
