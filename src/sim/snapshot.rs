//! Read-only view of a finished tick for the rendering layer
//!
//! Everything is copied out of [`GameState`] so a renderer on another thread
//! never sees a partially updated tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::floors::Material;
use super::state::{GameEvent, GamePhase, GameState, SessionStats};

/// Extra distance above/below the view within which floors are reported
const VISIBLE_MARGIN: f32 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub on_ground: bool,
    pub current_floor: u32,
    pub momentum_ratio: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorView {
    pub index: u32,
    pub left: f32,
    pub right: f32,
    pub y: f32,
    pub thickness: f32,
    pub material: Material,
    pub checkpoint: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboView {
    pub active: bool,
    pub streak: u32,
    pub total_floors: u32,
    /// Meter fill, 1.0 right after a scoring landing
    pub fill: f32,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyView {
    pub descent_speed: f32,
    pub level: u32,
    pub hurry_up: bool,
    pub time_to_escalation: f32,
}

/// Everything a frame needs to draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub camera_y: f32,
    pub player: PlayerView,
    pub floors: Vec<FloorView>,
    pub combo: ComboView,
    pub stats: SessionStats,
    pub difficulty: DifficultyView,
    pub events: Vec<GameEvent>,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let tuning = &state.tuning;
        let view_top = state.camera.y - VISIBLE_MARGIN;
        let view_bottom = state.camera.bottom() + VISIBLE_MARGIN;

        let floors = state
            .floors
            .iter()
            .filter(|f| f.y >= view_top && f.y <= view_bottom)
            .map(|f| FloorView {
                index: f.index,
                left: f.left,
                right: f.right,
                y: f.y,
                thickness: f.thickness,
                material: f.material,
                checkpoint: f.checkpoint,
            })
            .collect();

        let p = &state.player;
        Self {
            tick: state.time_ticks,
            phase: state.phase,
            camera_y: state.camera.y,
            player: PlayerView {
                pos: p.pos,
                vel: p.vel,
                size: Vec2::new(p.width, p.height),
                on_ground: p.on_ground,
                current_floor: p.current_floor,
                momentum_ratio: p.momentum_ratio(tuning),
            },
            floors,
            combo: ComboView {
                active: state.combo.is_active(),
                streak: state.combo.streak,
                total_floors: state.combo.total_floors,
                fill: state.combo.fill(tuning),
                label: state.combo.rank_label().map(str::to_string),
            },
            stats: state.stats.clone(),
            difficulty: DifficultyView {
                descent_speed: state.difficulty.descent_speed,
                level: state.difficulty.level,
                hurry_up: state.difficulty.hurry_up(),
                time_to_escalation: state.difficulty.time_to_escalation(),
            },
            events: state.events.clone(),
        }
    }
}
