//! Combo and scoring
//!
//! A combo is a run of multi-floor landings, each within the timeout of the
//! previous one. The timeout counts down every tick, in the air or not, so a
//! stalled combo ends even if the player never lands again.

use serde::{Deserialize, Serialize};

use super::state::{ComboEndReason, GameEvent, SessionStats};
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ComboPhase {
    #[default]
    Idle,
    Active,
}

/// Combo tracker. `streak` is nonzero only while active.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComboState {
    pub phase: ComboPhase,
    /// Consecutive scoring landings in this combo
    pub streak: u32,
    /// Floor delta of the most recent landing
    pub last_delta: i64,
    /// Seconds left before the combo lapses
    pub remaining: f32,
    /// Floors climbed by all jumps in this combo
    pub total_floors: u32,
}

impl ComboState {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase == ComboPhase::Active
    }

    /// Evaluate a landing on `landed` after leaving `previous`.
    ///
    /// Also updates the highest floor and the score.
    pub fn on_landing(
        &mut self,
        landed: u32,
        previous: u32,
        stats: &mut SessionStats,
        tuning: &Tuning,
        events: &mut Vec<GameEvent>,
    ) {
        let delta = landed as i64 - previous as i64;
        let prev_highest = stats.highest_floor;
        self.last_delta = delta;

        if landed > stats.highest_floor {
            stats.highest_floor = landed;
        }

        let scoring = delta >= tuning.combo_min_floors as i64;
        match self.phase {
            ComboPhase::Idle if scoring => {
                let bonus = tuning.jump_bonus.bonus(delta as u32);
                self.phase = ComboPhase::Active;
                self.streak = 1;
                self.total_floors = delta as u32;
                self.remaining = tuning.combo_timeout;
                stats.combo_bonus_total += bonus;
                log::debug!("Combo started on floor {} (+{})", landed, delta);
                events.push(GameEvent::ComboStarted {
                    floor: landed,
                    delta,
                    bonus,
                });
            }
            ComboPhase::Idle => {}
            ComboPhase::Active if scoring && landed >= prev_highest && self.remaining >= 0.0 => {
                self.streak += 1;
                self.total_floors += delta as u32;
                self.remaining = tuning.combo_timeout;
                let bonus = tuning.jump_bonus.bonus(delta as u32) * self.streak as u64;
                stats.combo_bonus_total += bonus;
                log::debug!("Combo x{} (+{} floors, bonus {})", self.streak, delta, bonus);
                events.push(GameEvent::ComboExtended {
                    streak: self.streak,
                    delta,
                    bonus,
                });
            }
            ComboPhase::Active => {
                let reason = if delta < 0 || landed < prev_highest {
                    ComboEndReason::FellLower
                } else {
                    ComboEndReason::ShortJump
                };
                self.end(reason, stats, tuning, events);
            }
        }

        stats.best_streak = stats.best_streak.max(self.streak);
        stats.recompute_score(tuning);
    }

    /// Count the timeout down; lapses into Idle exactly once.
    ///
    /// Runs on every tick without a landing, standing as well as airborne,
    /// so waiting on a floor lets the combo lapse too.
    pub fn advance(
        &mut self,
        dt: f32,
        stats: &mut SessionStats,
        tuning: &Tuning,
        events: &mut Vec<GameEvent>,
    ) {
        if !self.is_active() {
            return;
        }
        self.remaining -= dt;
        if self.remaining < 0.0 {
            self.end(ComboEndReason::Timeout, stats, tuning, events);
            stats.recompute_score(tuning);
        }
    }

    /// Close the combo, paying the closing bonus
    fn end(
        &mut self,
        reason: ComboEndReason,
        stats: &mut SessionStats,
        tuning: &Tuning,
        events: &mut Vec<GameEvent>,
    ) {
        let total = self.total_floors as u64;
        let bonus = total * total * tuning.combo_end_factor;
        stats.combo_bonus_total += bonus;
        log::debug!(
            "Combo ended ({:?}) after {} floors, bonus {}",
            reason,
            self.total_floors,
            bonus
        );
        events.push(GameEvent::ComboEnded {
            reason,
            total_floors: self.total_floors,
            bonus,
        });

        self.phase = ComboPhase::Idle;
        self.streak = 0;
        self.total_floors = 0;
        self.remaining = 0.0;
    }

    /// Share of the timeout still left, for the combo meter
    pub fn fill(&self, tuning: &Tuning) -> f32 {
        if !self.is_active() {
            return 0.0;
        }
        (self.remaining / tuning.combo_timeout).clamp(0.0, 1.0)
    }

    /// Banner text for the current combo
    pub fn rank_label(&self) -> Option<&'static str> {
        if !self.is_active() {
            return None;
        }
        let label = match self.total_floors {
            50.. => "EXTREME!",
            30.. => "AMAZING!",
            20.. => "WOW!",
            15.. => "GREAT!",
            10.. => "SWEET!",
            5.. => "GOOD!",
            _ => "COMBO",
        };
        Some(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    struct Harness {
        combo: ComboState,
        stats: SessionStats,
        tuning: Tuning,
        events: Vec<GameEvent>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                combo: ComboState::default(),
                stats: SessionStats::default(),
                tuning: Tuning::default(),
                events: Vec::new(),
            }
        }

        fn land(&mut self, from: u32, to: u32) {
            self.combo
                .on_landing(to, from, &mut self.stats, &self.tuning, &mut self.events);
        }

        fn wait(&mut self, secs: f32) {
            let ticks = (secs / SIM_DT).round() as u32;
            for _ in 0..ticks {
                self.combo
                    .advance(SIM_DT, &mut self.stats, &self.tuning, &mut self.events);
            }
        }

        fn ended_count(&self) -> usize {
            self.events
                .iter()
                .filter(|e| matches!(e, GameEvent::ComboEnded { .. }))
                .count()
        }
    }

    #[test]
    fn test_multi_floor_jump_starts_combo() {
        let mut h = Harness::new();
        h.land(0, 3);
        assert!(h.combo.is_active());
        assert_eq!(h.combo.streak, 1);
        assert_eq!(h.stats.highest_floor, 3);
        assert_eq!(h.stats.combo_bonus_total, 50);
        assert_eq!(h.stats.score, 3 * 10 + 50);
        assert_eq!(h.combo.rank_label(), Some("COMBO"));
    }

    #[test]
    fn test_single_floor_jump_never_starts_combo() {
        let mut h = Harness::new();
        h.land(0, 1);
        assert!(!h.combo.is_active());
        assert_eq!(h.combo.streak, 0);
        assert_eq!(h.stats.score, 10);
        assert!(h.events.is_empty());
    }

    #[test]
    fn test_streak_extends_with_multiplier() {
        let mut h = Harness::new();
        h.land(0, 2);
        h.wait(1.0);
        h.land(2, 5);
        assert_eq!(h.combo.streak, 2);
        assert_eq!(h.combo.total_floors, 5);
        // 20 for the double, then 50 x streak 2 for the triple
        assert_eq!(h.stats.combo_bonus_total, 20 + 100);
        assert_eq!(h.stats.best_streak, 2);
    }

    #[test]
    fn test_single_floor_landing_ends_combo() {
        let mut h = Harness::new();
        h.land(0, 3);
        h.land(3, 4);
        assert_eq!(h.combo.phase, ComboPhase::Idle);
        assert_eq!(h.combo.streak, 0);
        assert_eq!(h.stats.highest_floor, 4);
        assert!(h.events.contains(&GameEvent::ComboEnded {
            reason: ComboEndReason::ShortJump,
            total_floors: 3,
            bonus: 90,
        }));
    }

    #[test]
    fn test_falling_lower_ends_combo() {
        let mut h = Harness::new();
        h.land(0, 4);
        h.land(4, 2);
        assert!(!h.combo.is_active());
        assert!(matches!(
            h.events.last(),
            Some(GameEvent::ComboEnded { reason: ComboEndReason::FellLower, .. })
        ));
        assert_eq!(h.stats.highest_floor, 4);
    }

    #[test]
    fn test_multi_floor_jump_below_highest_ends_active_combo() {
        let mut h = Harness::new();
        h.stats.highest_floor = 10;
        h.land(0, 3);
        assert!(h.combo.is_active());
        h.land(3, 6);
        assert!(!h.combo.is_active());
    }

    #[test]
    fn test_timeout_ends_combo_exactly_once() {
        let mut h = Harness::new();
        h.land(0, 2);
        h.wait(2.5);
        assert!(h.combo.is_active());
        h.wait(1.0);
        assert!(!h.combo.is_active());
        h.wait(5.0);
        assert_eq!(h.ended_count(), 1);
        assert!(matches!(
            h.events.last(),
            Some(GameEvent::ComboEnded { reason: ComboEndReason::Timeout, .. })
        ));
    }

    #[test]
    fn test_landing_resets_timeout() {
        let mut h = Harness::new();
        h.land(0, 2);
        h.wait(2.5);
        h.land(2, 4);
        h.wait(2.5);
        assert!(h.combo.is_active());
        assert!(h.combo.fill(&h.tuning) > 0.0);
    }

    #[test]
    fn test_rank_labels() {
        let mut combo = ComboState {
            phase: ComboPhase::Active,
            streak: 3,
            total_floors: 12,
            ..Default::default()
        };
        assert_eq!(combo.rank_label(), Some("SWEET!"));
        combo.total_floors = 55;
        assert_eq!(combo.rank_label(), Some("EXTREME!"));
        combo.phase = ComboPhase::Idle;
        assert_eq!(combo.rank_label(), None);
    }
}
