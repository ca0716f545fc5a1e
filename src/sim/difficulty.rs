//! Difficulty ramp
//!
//! Floors stay put until the player first reaches the descent start floor.
//! From then on every floor sinks at a shared speed. The session clock raises
//! an escalation every interval; each multiplies the speed once. Intervals
//! that pass before the floors move do not count.

use serde::{Deserialize, Serialize};

use super::state::GameEvent;
use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyState {
    /// Session time (s)
    pub elapsed: f32,
    /// Current floor descent speed (px/s); never decreases within a session
    pub descent_speed: f32,
    /// Product of all escalations so far
    pub multiplier: f32,
    /// Number of escalations so far
    pub level: u32,
    /// Session time of the next escalation
    pub next_escalation: f32,
    /// Floors have started descending
    pub moving: bool,
    /// Seconds the "Hurry up!" banner stays up
    pub hurry_timer: f32,
}

impl DifficultyState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            elapsed: 0.0,
            descent_speed: 0.0,
            multiplier: 1.0,
            level: 0,
            next_escalation: tuning.escalation_interval,
            moving: false,
            hurry_timer: 0.0,
        }
    }

    /// Advance the clock and recompute the descent speed
    pub fn update(
        &mut self,
        dt: f32,
        highest_floor: u32,
        tuning: &Tuning,
        events: &mut Vec<GameEvent>,
    ) {
        self.elapsed += dt;
        self.hurry_timer = (self.hurry_timer - dt).max(0.0);

        // One escalation per boundary crossed, however large the step.
        // Boundaries passed while the floors are static are skipped.
        while self.elapsed >= self.next_escalation {
            self.next_escalation += tuning.escalation_interval;
            if !self.moving {
                continue;
            }
            self.multiplier *= tuning.escalation_factor;
            self.level += 1;
            self.hurry_timer = tuning.hurry_display_secs;

            let speed = tuning.descent_base_speed * self.multiplier;
            log::info!("Hurry up! Escalation {} (descent {:.1} px/s)", self.level, speed);
            events.push(GameEvent::HurryUp {
                level: self.level,
                speed,
            });
        }

        if !self.moving && highest_floor >= tuning.descent_start_floor {
            self.moving = true;
            let speed = tuning.descent_base_speed * self.multiplier;
            log::info!("Floors started moving at {:.1} px/s", speed);
            events.push(GameEvent::FloorsStartedMoving { speed });
        }

        let target = if self.moving {
            tuning.descent_base_speed * self.multiplier
        } else {
            0.0
        };
        self.descent_speed = self.descent_speed.max(target);
    }

    /// "Hurry up!" banner is showing
    pub fn hurry_up(&self) -> bool {
        self.hurry_timer > 0.0
    }

    /// Seconds until the next escalation
    pub fn time_to_escalation(&self) -> f32 {
        (self.next_escalation - self.elapsed).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use proptest::prelude::*;

    #[test]
    fn test_static_below_start_floor() {
        let tuning = Tuning::default();
        let mut d = DifficultyState::new(&tuning);
        let mut events = Vec::new();
        for _ in 0..120 {
            d.update(SIM_DT, 4, &tuning, &mut events);
        }
        assert_eq!(d.descent_speed, 0.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_starts_moving_at_floor_five() {
        let tuning = Tuning::default();
        let mut d = DifficultyState::new(&tuning);
        let mut events = Vec::new();
        d.update(SIM_DT, 4, &tuning, &mut events);
        assert_eq!(d.descent_speed, 0.0);
        d.update(SIM_DT, 5, &tuning, &mut events);
        assert_eq!(d.descent_speed, tuning.descent_base_speed);
        assert_eq!(
            events,
            vec![GameEvent::FloorsStartedMoving {
                speed: tuning.descent_base_speed
            }]
        );
        // Falling back below the start floor keeps the floors moving
        d.update(SIM_DT, 2, &tuning, &mut events);
        assert_eq!(d.descent_speed, tuning.descent_base_speed);
    }

    #[test]
    fn test_escalates_once_per_boundary() {
        let tuning = Tuning::default();
        let mut d = DifficultyState::new(&tuning);
        let mut events = Vec::new();
        d.update(SIM_DT, 5, &tuning, &mut events);
        events.clear();

        d.elapsed = tuning.escalation_interval - SIM_DT / 2.0;
        d.update(SIM_DT, 5, &tuning, &mut events);
        let escalated = tuning.descent_base_speed * tuning.escalation_factor;
        assert!((d.descent_speed - escalated).abs() < 1e-4);
        assert!(d.hurry_up());
        assert_eq!(events.len(), 1);

        for _ in 0..60 {
            d.update(SIM_DT, 5, &tuning, &mut events);
        }
        assert!((d.descent_speed - escalated).abs() < 1e-4);
        assert_eq!(events.len(), 1);
        assert!(d.time_to_escalation() > tuning.escalation_interval - 2.0);
    }

    #[test]
    fn test_large_step_counts_every_boundary() {
        let tuning = Tuning::default();
        let mut d = DifficultyState::new(&tuning);
        let mut events = Vec::new();
        d.update(SIM_DT, 5, &tuning, &mut events);
        d.update(tuning.escalation_interval * 2.5, 5, &tuning, &mut events);
        assert_eq!(d.level, 2);
    }

    #[test]
    fn test_late_start_begins_at_base_speed() {
        let tuning = Tuning::default();
        let mut d = DifficultyState::new(&tuning);
        let mut events = Vec::new();
        for _ in 0..(31.0 / SIM_DT) as u32 {
            d.update(SIM_DT, 4, &tuning, &mut events);
        }
        assert!(events.is_empty());
        assert!(!d.hurry_up());
        assert_eq!(d.level, 0);

        d.update(SIM_DT, 5, &tuning, &mut events);
        assert_eq!(d.descent_speed, tuning.descent_base_speed);
        assert_eq!(
            events,
            vec![GameEvent::FloorsStartedMoving {
                speed: tuning.descent_base_speed
            }]
        );

        // The next boundary is the first one that escalates
        events.clear();
        while d.elapsed < tuning.escalation_interval * 2.0 + SIM_DT {
            d.update(SIM_DT, 5, &tuning, &mut events);
        }
        let escalated = tuning.descent_base_speed * tuning.escalation_factor;
        assert!((d.descent_speed - escalated).abs() < 1e-4);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], GameEvent::HurryUp { level: 1, .. }));
    }

    #[test]
    fn test_hurry_banner_expires() {
        let tuning = Tuning::default();
        let mut d = DifficultyState::new(&tuning);
        let mut events = Vec::new();
        d.update(SIM_DT, 5, &tuning, &mut events);
        d.update(tuning.escalation_interval, 5, &tuning, &mut events);
        assert!(d.hurry_up());
        d.update(tuning.hurry_display_secs + 0.1, 0, &tuning, &mut events);
        assert!(!d.hurry_up());
    }

    proptest! {
        #[test]
        fn prop_speed_never_decreases(floors in proptest::collection::vec(0u32..40, 1..400)) {
            let tuning = Tuning::default();
            let mut d = DifficultyState::new(&tuning);
            let mut events = Vec::new();
            let mut last = d.descent_speed;
            for highest in floors {
                d.update(0.25, highest, &tuning, &mut events);
                prop_assert!(d.descent_speed >= last);
                last = d.descent_speed;
            }
        }
    }
}
