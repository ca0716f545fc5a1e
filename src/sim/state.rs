//! Game state and core simulation types
//!
//! Everything a tick reads or writes hangs off [`GameState`], so a restart is
//! a plain reassignment and every component can be driven on its own in tests.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::combo::ComboState;
use super::difficulty::DifficultyState;
use super::floors::FloorGenerator;
use crate::consts::*;
use crate::settings::WallMode;
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active climbing
    Playing,
    /// Run ended, waiting for restart
    GameOver,
}

/// Directional intent for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HorizontalIntent {
    Left,
    Right,
    #[default]
    None,
}

impl HorizontalIntent {
    /// -1 for left, +1 for right, 0 for none
    pub fn sign(self) -> f32 {
        match self {
            HorizontalIntent::Left => -1.0,
            HorizontalIntent::Right => 1.0,
            HorizontalIntent::None => 0.0,
        }
    }
}

/// The climber. `pos` is the top-left corner of the bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    pub on_ground: bool,
    /// Floor stood on, or the floor last vacated while airborne
    pub current_floor: u32,
}

impl Player {
    /// Player standing centred on the ground floor
    pub fn spawn(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(
                WINDOW_WIDTH / 2.0 - tuning.player_width / 2.0,
                GROUND_Y - tuning.player_height,
            ),
            vel: Vec2::ZERO,
            width: tuning.player_width,
            height: tuning.player_height,
            on_ground: true,
            current_floor: 0,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }

    /// Horizontal momentum magnitude (px/s)
    #[inline]
    pub fn momentum(&self) -> f32 {
        self.vel.x.abs()
    }

    /// Momentum as a share of the maximum run speed, in [0, 1]
    pub fn momentum_ratio(&self, tuning: &Tuning) -> f32 {
        (self.momentum() / tuning.max_run_speed).clamp(0.0, 1.0)
    }
}

/// Follows the player upward, never back down
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Camera {
    /// World y of the top edge of the view
    pub y: f32,
    /// Where the camera is easing toward
    pub target_y: f32,
}

impl Camera {
    /// World y of the bottom edge of the view; falling past it ends the run
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + WINDOW_HEIGHT
    }

    /// Ease toward keeping the player at or below the follow line
    pub fn update(&mut self, player_top: f32, dt: f32) {
        let follow_line = WINDOW_HEIGHT * CAMERA_FOLLOW_RATIO;
        if player_top - self.y < follow_line {
            self.target_y = self.target_y.min(player_top - follow_line);
        }
        if self.target_y < self.y {
            let keep = (1.0 - CAMERA_SMOOTH).powf(dt / SIM_DT);
            self.y = self.target_y + (self.y - self.target_y) * keep;
        }
    }
}

/// Running totals for the session, handed to persistence at GameOver
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub highest_floor: u32,
    /// `highest_floor * base_points + combo_bonus_total`
    pub score: u64,
    pub combo_bonus_total: u64,
    pub best_streak: u32,
    pub jumps: u32,
    /// Seconds of play
    pub elapsed: f32,
}

impl SessionStats {
    /// Bring `score` back in line with its parts
    pub fn recompute_score(&mut self, tuning: &Tuning) {
        self.score = self.highest_floor as u64 * tuning.base_points + self.combo_bonus_total;
    }
}

/// Why a combo ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComboEndReason {
    /// Landed after a jump shorter than the combo threshold
    ShortJump,
    /// Landed below the highest floor reached
    FellLower,
    /// No scoring landing within the timeout
    Timeout,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// Missed every floor and dropped out of view
    Fell,
    /// Carried or pushed out of view by descending floors
    Swept,
}

/// Things that happened during a tick, for UI/audio layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped { floor: u32, momentum: f32 },
    Landed { floor: u32, delta: i64 },
    ComboStarted { floor: u32, delta: i64, bonus: u64 },
    ComboExtended { streak: u32, delta: i64, bonus: u64 },
    ComboEnded { reason: ComboEndReason, total_floors: u32, bonus: u64 },
    FloorsStartedMoving { speed: f32 },
    HurryUp { level: u32, speed: f32 },
    GameOver { reason: GameOverReason, stats: SessionStats },
    Restarted { seed: u64 },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for floor layout
    pub seed: u64,
    pub tuning: Tuning,
    pub wall_mode: WallMode,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    pub floors: FloorGenerator,
    pub combo: ComboState,
    pub difficulty: DifficultyState,
    pub stats: SessionStats,
    pub camera: Camera,
    /// Set when the run ends
    pub game_over_reason: Option<GameOverReason>,
    /// Events raised by the most recent tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session with default tuning
    pub fn new(seed: u64, wall_mode: WallMode) -> Self {
        Self::with_tuning(seed, wall_mode, Tuning::default())
    }

    /// Create a new session with explicit tuning
    pub fn with_tuning(seed: u64, wall_mode: WallMode, tuning: Tuning) -> Self {
        let mut floors = FloorGenerator::new(seed, &tuning);
        floors.ensure_generated_ahead(0, &tuning);

        Self {
            seed,
            player: Player::spawn(&tuning),
            floors,
            combo: ComboState::default(),
            difficulty: DifficultyState::new(&tuning),
            stats: SessionStats::default(),
            camera: Camera::default(),
            wall_mode,
            phase: GamePhase::Playing,
            time_ticks: 0,
            game_over_reason: None,
            events: Vec::new(),
            tuning,
        }
    }

    /// Seed for the run that follows this one
    pub fn next_seed(&self) -> u64 {
        self.seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407)
    }

    /// Discard the session and start a fresh one with the next seed
    pub fn restart(&mut self) {
        let seed = self.next_seed();
        *self = Self::with_tuning(seed, self.wall_mode, self.tuning.clone());
        log::info!("Restarted with seed {}", seed);
        self.events.push(GameEvent::Restarted { seed });
    }
}
