//! Frame driver
//!
//! Owns one session plus the leaderboard. Hosts feed it input and wall-clock
//! frame deltas; it runs whole fixed ticks, clears one-shot inputs after each,
//! and hands finished runs to the score store.

use crate::consts::SIM_DT;
use crate::highscores::HighScores;
use crate::persistence::{PersistError, ScoreStore};
use crate::platform::{self, FixedStep};
use crate::settings::Settings;
use crate::sim::{
    GameEvent, GameState, HorizontalIntent, RenderSnapshot, SessionStats, TickInput, tick,
};

pub struct Game<S: ScoreStore> {
    pub state: GameState,
    step: FixedStep,
    input: TickInput,
    highscores: HighScores,
    store: S,
    /// Stats of the most recently finished run
    last_run: Option<SessionStats>,
    /// Leaderboard rank (1-indexed) of that run, if it made the table
    last_rank: Option<usize>,
    /// Latest storage failure, kept until the host picks it up
    persist_error: Option<PersistError>,
    quit: bool,
}

impl<S: ScoreStore> Game<S> {
    pub fn new(settings: &Settings, store: S) -> Self {
        let seed = settings.seed.unwrap_or_else(platform::clock_seed);
        let highscores = match store.load() {
            Ok(scores) => scores,
            Err(e) => {
                log::warn!("Failed to load high scores, starting empty: {}", e);
                HighScores::new()
            }
        };
        log::info!(
            "Game initialized with seed: {} (walls: {})",
            seed,
            settings.wall_mode.as_str()
        );

        Self {
            state: GameState::new(seed, settings.wall_mode),
            step: FixedStep::new(),
            input: TickInput::default(),
            highscores,
            store,
            last_run: None,
            last_rank: None,
            persist_error: None,
            quit: false,
        }
    }

    pub fn set_direction(&mut self, direction: HorizontalIntent) {
        self.input.direction = direction;
    }

    pub fn press_jump(&mut self) {
        self.input.jump = true;
    }

    pub fn press_restart(&mut self) {
        self.input.restart = true;
    }

    /// Ask the host to stop; no further ticks run
    pub fn press_quit(&mut self) {
        log::info!("Quit requested");
        self.quit = true;
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn set_autoplay(&mut self, on: bool) {
        if self.input.idle_mode != on {
            log::info!("Idle mode: {}", on);
        }
        self.input.idle_mode = on;
    }

    /// Run as many ticks as `frame_dt` covers; returns the tick count
    pub fn frame(&mut self, frame_dt: f32) -> u32 {
        if self.quit {
            return 0;
        }
        let ticks = self.step.advance(frame_dt);
        for _ in 0..ticks {
            self.tick_once();
        }
        ticks
    }

    /// Run exactly one simulation tick
    pub fn tick_once(&mut self) {
        tick(&mut self.state, &self.input, SIM_DT);

        // Clear one-shot inputs after processing
        self.input.jump = false;
        self.input.restart = false;

        let finished = self.state.events.iter().find_map(|e| match e {
            GameEvent::GameOver { stats, .. } => Some(stats.clone()),
            _ => None,
        });
        if let Some(stats) = finished {
            if let Err(e) = self.record_run(stats) {
                log::warn!("Failed to save high scores: {}", e);
                self.persist_error = Some(e);
            }
        }
    }

    /// Add a finished run to the leaderboard and store it when it placed
    fn record_run(&mut self, stats: SessionStats) -> Result<(), PersistError> {
        let rank = self.highscores.add_run(&stats, platform::now_ms());
        self.last_rank = rank;
        self.last_run = Some(stats);

        match rank {
            Some(rank) => {
                log::info!("New high score at rank {}", rank);
                self.store.save(&self.highscores)
            }
            None => Ok(()),
        }
    }

    /// Render-ready copy of the current tick
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(&self.state)
    }

    /// Leftover tick fraction for render interpolation
    pub fn alpha(&self) -> f32 {
        self.step.alpha()
    }

    pub fn highscores(&self) -> &HighScores {
        &self.highscores
    }

    /// Rank the current run would take if it ended now
    pub fn projected_rank(&self) -> Option<usize> {
        self.highscores.potential_rank(self.state.stats.score)
    }

    pub fn last_run(&self) -> Option<&SessionStats> {
        self.last_run.as_ref()
    }

    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }

    /// Take the most recent storage failure, if any
    pub fn take_persist_error(&mut self) -> Option<PersistError> {
        self.persist_error.take()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::settings::WallMode;
    use crate::sim::GamePhase;

    /// Store whose disk is always gone
    struct BrokenStore;

    impl ScoreStore for BrokenStore {
        fn load(&self) -> Result<HighScores, PersistError> {
            Err(std::io::Error::other("disk unplugged").into())
        }

        fn save(&mut self, _scores: &HighScores) -> Result<(), PersistError> {
            Err(std::io::Error::other("disk unplugged").into())
        }
    }

    fn settings() -> Settings {
        Settings {
            seed: Some(4242),
            wall_mode: WallMode::Bounce,
            ..Default::default()
        }
    }

    /// Put the player just above the bottom edge, falling, having reached `floor`
    fn doom<S: ScoreStore>(game: &mut Game<S>, floor: u32) {
        let state = &mut game.state;
        state.stats.highest_floor = floor;
        state.stats.recompute_score(&state.tuning);
        state.player.on_ground = false;
        state.player.pos.y = state.camera.bottom() - 2.0;
        state.player.vel.y = 300.0;
    }

    #[test]
    fn test_frame_runs_fixed_ticks() {
        let mut game = Game::new(&settings(), MemoryStore::new());
        assert_eq!(game.frame(SIM_DT * 0.5), 0);
        assert_eq!(game.frame(SIM_DT * 2.0), 2);
        assert_eq!(game.state.time_ticks, 2);
    }

    #[test]
    fn test_jump_is_one_shot() {
        let mut game = Game::new(&settings(), MemoryStore::new());
        game.press_jump();
        game.tick_once();
        assert_eq!(game.state.stats.jumps, 1);

        // Still airborne; no jump is latched for later ticks
        for _ in 0..120 {
            game.tick_once();
        }
        assert_eq!(game.state.stats.jumps, 1);
        assert!(game.state.player.on_ground);
    }

    #[test]
    fn test_game_over_records_run() {
        let mut game = Game::new(&settings(), MemoryStore::new());
        doom(&mut game, 9);
        game.tick_once();

        assert_eq!(game.state.phase, GamePhase::GameOver);
        assert_eq!(game.last_run().map(|s| s.highest_floor), Some(9));
        assert_eq!(game.last_rank(), Some(1));
        assert_eq!(game.store().saves, 1);
        assert_eq!(game.store().scores().entries[0].highest_floor, 9);
        assert_eq!(game.highscores().top_score(), Some(90));
    }

    #[test]
    fn test_zero_score_run_is_not_stored() {
        let mut game = Game::new(&settings(), MemoryStore::new());
        doom(&mut game, 0);
        game.tick_once();

        assert_eq!(game.state.phase, GamePhase::GameOver);
        assert!(game.last_run().is_some());
        assert_eq!(game.last_rank(), None);
        assert_eq!(game.store().saves, 0);
    }

    #[test]
    fn test_storage_failure_is_not_fatal() {
        let mut game = Game::new(&settings(), BrokenStore);
        assert!(game.highscores().is_empty());

        doom(&mut game, 6);
        game.tick_once();

        assert!(matches!(game.take_persist_error(), Some(PersistError::Io(_))));
        assert!(game.take_persist_error().is_none());
        // The leaderboard still holds the run in memory and play continues
        assert_eq!(game.highscores().top_score(), Some(60));
        game.press_restart();
        game.tick_once();
        assert_eq!(game.state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_quit_stops_ticking() {
        let mut game = Game::new(&settings(), MemoryStore::new());
        game.press_quit();
        assert!(game.should_quit());
        assert_eq!(game.frame(SIM_DT * 4.0), 0);
        assert_eq!(game.state.time_ticks, 0);
    }

    #[test]
    fn test_projected_rank_tracks_live_score() {
        let mut scores = HighScores::new();
        scores.add_score(500, 40, 0.0);
        let mut game = Game::new(&settings(), MemoryStore::with_scores(scores));
        assert_eq!(game.projected_rank(), None);

        game.state.stats.highest_floor = 20;
        game.state.stats.recompute_score(&game.state.tuning);
        assert_eq!(game.projected_rank(), Some(2));

        game.state.stats.highest_floor = 60;
        game.state.stats.recompute_score(&game.state.tuning);
        assert_eq!(game.projected_rank(), Some(1));
    }

    #[test]
    fn test_loads_existing_leaderboard() {
        let mut scores = HighScores::new();
        scores.add_score(500, 40, 0.0);
        let game = Game::new(&settings(), MemoryStore::with_scores(scores));
        assert_eq!(game.highscores().top_score(), Some(500));
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut game = Game::new(&settings(), MemoryStore::new());
        game.set_direction(HorizontalIntent::Left);
        game.frame(SIM_DT * 3.0);
        let snap = game.snapshot();
        assert_eq!(snap.tick, game.state.time_ticks);
        assert!(snap.player.vel.x < 0.0);
    }
}
