//! Collision resolution between the player, floors and side walls
//!
//! Floors are one-way platforms: the player only lands when falling and the
//! feet cross a surface this tick, and passes through from below. Descending
//! floors also push an airborne player that ends up underneath them.

use super::floors::{Floor, FloorGenerator};
use super::state::Player;
use crate::consts::*;
use crate::overlap_width;
use crate::settings::WallMode;
use crate::tuning::Tuning;

/// What the player's feet are doing after resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// In the air
    Airborne,
    /// Still on the floor it was standing on at the start of the tick
    Standing { floor: u32 },
    /// Touched down this tick
    Landed { floor: u32 },
}

/// Result of one resolution pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionOutcome {
    pub contact: Contact,
    /// A side wall reflected the player
    pub wall_bounced: bool,
    /// A descending floor pushed the player down
    pub pushed: bool,
}

/// Keep the player between the walls in bounce mode; returns true on a bounce.
/// Wrap mode is handled during integration.
pub fn resolve_walls(player: &mut Player, wall_mode: WallMode) -> bool {
    if wall_mode == WallMode::Wrap {
        return false;
    }

    if player.left() < PLAY_LEFT {
        player.pos.x = PLAY_LEFT;
        if player.vel.x < 0.0 {
            player.bounce_off_wall();
            return true;
        }
    } else if player.right() > PLAY_RIGHT {
        player.pos.x = PLAY_RIGHT - player.width;
        if player.vel.x > 0.0 {
            player.bounce_off_wall();
            return true;
        }
    }
    false
}

/// Horizontal support the floor gives the player, in pixels
#[inline]
fn support(player: &Player, floor: &Floor) -> f32 {
    overlap_width(player.left(), player.right(), floor.left, floor.right)
}

/// Resolve walls, landings and floor pushes for one tick.
///
/// `prev_bottom` is the player's feet before integration (after any carry by
/// a descending floor). An empty floor window never collides.
pub fn resolve(
    player: &mut Player,
    prev_bottom: f32,
    floors: &FloorGenerator,
    descent_speed: f32,
    dt: f32,
    wall_mode: WallMode,
    tuning: &Tuning,
) -> CollisionOutcome {
    let wall_bounced = resolve_walls(player, wall_mode);
    let was_grounded = player.on_ground;
    let standing_on = player.current_floor;

    let mut contact = Contact::Airborne;

    if player.vel.y >= 0.0 {
        let min_support = player.width * tuning.min_support_ratio;
        let bottom = player.bottom();

        // Highest crossed floor wins; only seams can yield more than one
        let landing = floors
            .iter()
            .filter(|f| prev_bottom <= f.y + tuning.landing_tolerance && bottom >= f.y)
            .filter(|f| support(player, f) >= min_support)
            .max_by_key(|f| f.index);

        if let Some(floor) = landing {
            player.pos.y = floor.y - player.height;
            player.vel.y = 0.0;
            player.on_ground = true;
            player.current_floor = floor.index;
            contact = if was_grounded && standing_on == floor.index {
                Contact::Standing { floor: floor.index }
            } else {
                Contact::Landed { floor: floor.index }
            };
        } else {
            player.on_ground = false;
        }
    } else {
        player.on_ground = false;
    }

    let mut pushed = false;
    if !player.on_ground && player.vel.y >= 0.0 && descent_speed > 0.0 {
        // A floor whose underside came down into the player this tick. The
        // head must have been clear of the slab before it moved.
        let prev_top = prev_bottom - player.height;
        let drop = descent_speed * dt;
        let overhead = floors
            .iter()
            .filter(|f| player.top() >= f.y && player.top() < f.bottom())
            .filter(|f| prev_top + 1e-3 >= f.bottom() - drop)
            .filter(|f| support(player, f) > 0.0)
            .max_by_key(|f| f.index);

        if let Some(floor) = overhead {
            player.pos.y = floor.bottom();
            player.vel.y = player.vel.y.max(descent_speed);
            pushed = true;
        }
    }

    CollisionOutcome {
        contact,
        wall_bounced,
        pushed,
    }
}
