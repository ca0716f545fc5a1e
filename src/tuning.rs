//! Game balance weights
//!
//! Every number that shapes how the climb feels lives here. The values are
//! fixed design parameters compiled into the game; `Tuning::default()` is the
//! only source the simulation uses outside of tests.

/// Bonus score for a single multi-floor jump, indexed by floors jumped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpBonusTable {
    /// Bonus for a 2-floor jump
    pub double: u64,
    /// Bonus for a 3-floor jump
    pub triple: u64,
    /// Per-floor bonus for jumps of 4 floors or more
    pub per_floor_big: u64,
}

impl JumpBonusTable {
    /// Base bonus for a jump spanning `floors` floors (0 below the combo threshold)
    pub fn bonus(&self, floors: u32) -> u64 {
        match floors {
            0 | 1 => 0,
            2 => self.double,
            3 => self.triple,
            n => n as u64 * self.per_floor_big,
        }
    }
}

/// All balance weights in one place
#[derive(Debug, Clone, PartialEq)]
pub struct Tuning {
    // === Player body ===
    /// Player bounding box (pixels)
    pub player_width: f32,
    pub player_height: f32,
    /// Horizontal acceleration while a direction is held (px/s²)
    pub run_accel: f32,
    /// Maximum horizontal speed (px/s)
    pub max_run_speed: f32,
    /// Velocity kept per 60 Hz frame with no directional intent
    pub drag_per_frame: f32,
    /// Below this horizontal speed the player is considered stopped (px/s)
    pub stop_speed: f32,
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Maximum fall speed (px/s)
    pub terminal_fall_speed: f32,
    /// Upward jump impulse with no momentum (px/s)
    pub jump_impulse: f32,
    /// Extra jump impulse at full momentum (px/s)
    pub momentum_jump_boost: f32,
    /// Share of the player's width that must rest on a floor to stand on it
    pub min_support_ratio: f32,
    /// Tolerance when deciding the feet were above a surface last tick (px)
    pub landing_tolerance: f32,

    // === Floors ===
    /// Vertical distance between consecutive floor surfaces (px)
    pub floor_spacing: f32,
    /// Visual/physical thickness of a floor slab (px)
    pub floor_thickness: f32,
    /// Floors kept generated above the highest floor reached
    pub lookahead: u32,
    /// Floors further than this below the view are pruned (px)
    pub prune_margin: f32,
    /// Base bound on the horizontal gap between consecutive spans (px)
    pub base_span_gap: f32,
    /// Gap bound growth per 100-floor tier (px)
    pub span_gap_per_tier: f32,
    /// Absolute cap on the horizontal gap between consecutive spans (px)
    pub max_span_gap: f32,
    /// Every n-th floor is a full-width checkpoint
    pub checkpoint_interval: u32,

    // === Scoring ===
    /// Points per floor of highest-floor progress
    pub base_points: u64,
    /// Per-jump combo bonus (multiplied by the current streak)
    pub jump_bonus: JumpBonusTable,
    /// Closing bonus factor applied to total combo floors squared
    pub combo_end_factor: u64,
    /// Minimum floors in one jump to count toward a combo
    pub combo_min_floors: u32,
    /// Seconds a combo survives without another scoring landing
    pub combo_timeout: f32,

    // === Difficulty ===
    /// Floors start descending once this floor has been reached
    pub descent_start_floor: u32,
    /// Initial descent speed (px/s)
    pub descent_base_speed: f32,
    /// Multiplier applied at every escalation
    pub escalation_factor: f32,
    /// Seconds between escalations
    pub escalation_interval: f32,
    /// How long the "Hurry up!" banner stays raised (s)
    pub hurry_display_secs: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_width: 30.0,
            player_height: 45.0,
            run_accel: 1440.0,
            max_run_speed: 600.0,
            drag_per_frame: 0.85,
            stop_speed: 1.0,
            gravity: 1800.0,
            terminal_fall_speed: 1500.0,
            jump_impulse: 600.0,
            momentum_jump_boost: 440.0,
            min_support_ratio: 0.5,
            landing_tolerance: 1.0,

            floor_spacing: 80.0,
            floor_thickness: 20.0,
            lookahead: 12,
            prune_margin: 100.0,
            base_span_gap: 40.0,
            span_gap_per_tier: 20.0,
            max_span_gap: 160.0,
            checkpoint_interval: 10,

            base_points: 10,
            jump_bonus: JumpBonusTable {
                double: 20,
                triple: 50,
                per_floor_big: 25,
            },
            combo_end_factor: 10,
            combo_min_floors: 2,
            combo_timeout: 3.0,

            descent_start_floor: 5,
            descent_base_speed: 30.0,
            escalation_factor: 1.25,
            escalation_interval: 30.0,
            hurry_display_secs: 2.0,
        }
    }
}

impl Tuning {
    /// Jump impulse for a given momentum ratio in [0, 1]
    pub fn jump_speed(&self, momentum_ratio: f32) -> f32 {
        self.jump_impulse + self.momentum_jump_boost * momentum_ratio.clamp(0.0, 1.0)
    }

    /// Apex height of a jump at the given momentum ratio (continuous approximation)
    pub fn jump_height(&self, momentum_ratio: f32) -> f32 {
        let v = self.jump_speed(momentum_ratio);
        v * v / (2.0 * self.gravity)
    }

    /// Horizontal distance covered by a full-momentum jump that lands one floor up
    ///
    /// This is the widest horizontal gap a player can cross between two
    /// consecutive floors.
    pub fn max_jump_reach(&self) -> f32 {
        let v = self.jump_speed(1.0);
        let disc = v * v - 2.0 * self.gravity * self.floor_spacing;
        if disc <= 0.0 {
            return 0.0;
        }
        let airtime = (v + disc.sqrt()) / self.gravity;
        airtime * self.max_run_speed
    }

    /// Bound on the horizontal gap between floor `index - 1` and floor `index`
    ///
    /// Grows with the 100-floor tier but never exceeds what a full-momentum
    /// jump can cross.
    pub fn span_gap_bound(&self, index: u32) -> f32 {
        let tier = (index / 100) as f32;
        (self.base_span_gap + tier * self.span_gap_per_tier)
            .min(self.max_span_gap)
            .min(self.max_jump_reach())
    }
}
