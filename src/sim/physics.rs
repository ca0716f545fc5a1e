//! Player body: momentum, jumping and integration
//!
//! Momentum is the horizontal speed built up by holding a direction. It
//! decays under drag when no direction is held and feeds straight into the
//! jump impulse, so a full-speed run turns into a multi-floor jump.

use super::state::{HorizontalIntent, Player};
use crate::consts::*;
use crate::settings::WallMode;
use crate::tuning::Tuning;

impl Player {
    /// Accelerate toward the held direction, or bleed speed under drag
    pub fn apply_horizontal_intent(&mut self, intent: HorizontalIntent, dt: f32, tuning: &Tuning) {
        match intent {
            HorizontalIntent::None => {
                self.vel.x *= tuning.drag_per_frame.powf(dt / SIM_DT);
                if self.vel.x.abs() < tuning.stop_speed {
                    self.vel.x = 0.0;
                }
            }
            dir => {
                self.vel.x += dir.sign() * tuning.run_accel * dt;
            }
        }
        self.vel.x = self.vel.x.clamp(-tuning.max_run_speed, tuning.max_run_speed);
    }

    /// Launch upward if standing; the impulse grows with momentum.
    /// Returns false (and does nothing) while airborne.
    pub fn apply_jump(&mut self, tuning: &Tuning) -> bool {
        if !self.on_ground {
            return false;
        }
        self.vel.y = -tuning.jump_speed(self.momentum_ratio(tuning));
        self.on_ground = false;
        true
    }

    /// Advance one step: gravity, terminal speed, position, then screen wrap
    pub fn integrate(&mut self, dt: f32, wall_mode: WallMode, tuning: &Tuning) {
        self.vel.y = (self.vel.y + tuning.gravity * dt).min(tuning.terminal_fall_speed);
        self.pos += self.vel * dt;

        if wall_mode == WallMode::Wrap {
            self.wrap_horizontal();
        }
    }

    /// Re-enter from the opposite side once the centre leaves the play area.
    /// Velocity is untouched.
    pub fn wrap_horizontal(&mut self) {
        let center = self.center_x();
        if center < PLAY_LEFT {
            self.pos.x += PLAY_WIDTH;
        } else if center >= PLAY_RIGHT {
            self.pos.x -= PLAY_WIDTH;
        }
    }

    /// Reflect off a side wall, keeping the speed
    pub fn bounce_off_wall(&mut self) {
        self.vel.x = -self.vel.x;
    }
}
