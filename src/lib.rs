//! Icy Climb - a momentum-based endless tower climber
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, floors, collisions, combos, difficulty)
//! - `tuning`: Game balance weights
//! - `settings`: Player preferences (wall mode, seed, score file)
//! - `highscores`: Top-10 leaderboard
//! - `persistence`: Score store contract and implementations
//! - `platform`: Wall clock and fixed-step accumulator
//! - `game`: Frame driver tying input, simulation and persistence together

pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use highscores::HighScores;
pub use settings::{Settings, WallMode};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the pace the tower was designed around)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the driver will accumulate (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// View dimensions
    pub const WINDOW_WIDTH: f32 = 800.0;
    pub const WINDOW_HEIGHT: f32 = 600.0;

    /// Side walls - the player bounces between them
    pub const WALL_THICKNESS: f32 = 100.0;
    pub const PLAY_LEFT: f32 = WALL_THICKNESS;
    pub const PLAY_RIGHT: f32 = WINDOW_WIDTH - WALL_THICKNESS;
    pub const PLAY_WIDTH: f32 = PLAY_RIGHT - PLAY_LEFT;

    /// Surface of floor 0 in world space (y grows downward)
    pub const GROUND_Y: f32 = WINDOW_HEIGHT - 100.0;

    /// Camera starts following once the player climbs above this share of the view
    pub const CAMERA_FOLLOW_RATIO: f32 = 0.4;
    /// Exponential camera smoothing per 60 Hz frame
    pub const CAMERA_SMOOTH: f32 = 0.15;
}

/// Width of the intersection of two closed intervals (0 when disjoint)
#[inline]
pub fn overlap_width(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> f32 {
    (a_max.min(b_max) - a_min.max(b_min)).max(0.0)
}

/// Horizontal gap between two intervals (0 when they overlap)
#[inline]
pub fn interval_gap(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> f32 {
    (a_min.max(b_min) - a_max.min(b_max)).max(0.0)
}
