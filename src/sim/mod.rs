//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by floor index)
//! - No rendering or platform dependencies

pub mod collision;
pub mod combo;
pub mod difficulty;
pub mod floors;
pub mod physics;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{CollisionOutcome, Contact, resolve};
pub use combo::{ComboPhase, ComboState};
pub use difficulty::DifficultyState;
pub use floors::{Floor, FloorGenerator, Material, material_tag};
pub use snapshot::RenderSnapshot;
pub use state::{
    Camera, ComboEndReason, GameEvent, GameOverReason, GamePhase, GameState, HorizontalIntent,
    Player, SessionStats,
};
pub use tick::{TickInput, tick};
