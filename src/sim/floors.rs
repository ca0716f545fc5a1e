//! Floor generation
//!
//! Floors are produced lazily ahead of the highest floor reached and dropped
//! once they scroll below the view, so the tracked window stays a fixed size
//! however high the climb goes. Indices in the window are always contiguous.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::interval_gap;
use crate::tuning::Tuning;

/// Cosmetic floor material, one per ten floors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    Stone,
    Ice,
    Wood,
    Metal,
    Gum,
    Bone,
    Vine,
    Pipe,
    Cloud,
    Rainbow,
    Glass,
}

impl Material {
    /// Tier table, indexed by `(index / 10) % 11`
    pub const TIERS: [Material; 11] = [
        Material::Stone,
        Material::Ice,
        Material::Wood,
        Material::Metal,
        Material::Gum,
        Material::Bone,
        Material::Vine,
        Material::Pipe,
        Material::Cloud,
        Material::Rainbow,
        Material::Glass,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Material::Stone => "stone",
            Material::Ice => "ice",
            Material::Wood => "wood",
            Material::Metal => "metal",
            Material::Gum => "gum",
            Material::Bone => "bone",
            Material::Vine => "vine",
            Material::Pipe => "pipe",
            Material::Cloud => "cloud",
            Material::Rainbow => "rainbow",
            Material::Glass => "glass",
        }
    }
}

/// Material for a floor index; everything from floor 100 up is glass
pub fn material_tag(index: u32) -> Material {
    if index >= 100 {
        return Material::Glass;
    }
    Material::TIERS[((index / 10) % 11) as usize]
}

/// One platform of the tower
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub index: u32,
    /// Horizontal span
    pub left: f32,
    pub right: f32,
    /// World y of the walkable surface (y grows downward)
    pub y: f32,
    pub thickness: f32,
    pub material: Material,
    /// Full-width rest floor
    pub checkpoint: bool,
}

impl Floor {
    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// World y of the underside
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.thickness
    }
}

/// Span length classes, picked per floor from a tier-dependent pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpanLength {
    ExtraLong,
    Long,
    Medium,
    Short,
}

/// Where a span sits inside the play area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Center,
    FarLeft,
    FarRight,
    CenterGap,
}

/// Inset of regular floors from the walls
const SPAN_MARGIN: f32 = 20.0;
/// Width every span length starts from
const BASE_SPAN_WIDTH: f32 = 200.0;
/// Narrowest span ever generated
const MIN_SPAN_WIDTH: f32 = 30.0;

/// Owns the tracked window of floors
#[derive(Debug, Clone)]
pub struct FloorGenerator {
    floors: VecDeque<Floor>,
    rng: Pcg32,
    /// Index the next generated floor will get
    next_index: u32,
    /// Surface y of the most recently generated floor
    frontier_y: f32,
    /// Span of the most recently generated floor
    frontier_span: (f32, f32),
}

impl FloorGenerator {
    /// Generator holding only the full-width ground floor
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        let ground = Floor {
            index: 0,
            left: PLAY_LEFT,
            right: PLAY_RIGHT,
            y: GROUND_Y,
            thickness: tuning.floor_thickness,
            material: material_tag(0),
            checkpoint: true,
        };
        Self::from_floors(vec![ground], seed)
    }

    /// Generator continuing from a hand-built window
    ///
    /// Floors must be sorted by index with no gaps.
    pub fn from_floors(floors: Vec<Floor>, seed: u64) -> Self {
        let (next_index, frontier_y, frontier_span) = match floors.last() {
            Some(f) => (f.index + 1, f.y, (f.left, f.right)),
            None => (0, GROUND_Y, (PLAY_LEFT, PLAY_RIGHT)),
        };
        debug_assert!(floors.windows(2).all(|w| w[1].index == w[0].index + 1));
        Self {
            floors: floors.into(),
            rng: Pcg32::seed_from_u64(seed),
            next_index,
            frontier_y,
            frontier_span,
        }
    }

    /// Instantiate floors up to `highest_floor_index + lookahead`
    pub fn ensure_generated_ahead(&mut self, highest_floor_index: u32, tuning: &Tuning) {
        let target = highest_floor_index.saturating_add(tuning.lookahead);
        let mut generated = 0;
        while self.next_index <= target {
            let floor = self.generate(self.next_index, tuning);
            self.frontier_y = floor.y;
            self.frontier_span = (floor.left, floor.right);
            self.next_index += 1;
            self.floors.push_back(floor);
            generated += 1;
        }
        if generated > 0 {
            log::debug!(
                "Generated {} floors (frontier now {})",
                generated,
                self.next_index - 1
            );
        }
    }

    /// Drop every floor below `lowest_tracked_index`; returns how many went
    pub fn prune_behind(&mut self, lowest_tracked_index: u32) -> usize {
        let mut removed = 0;
        while self
            .floors
            .front()
            .is_some_and(|f| f.index < lowest_tracked_index)
        {
            self.floors.pop_front();
            removed += 1;
        }
        removed
    }

    /// Index of the lowest floor whose surface is still above `cutoff_y`
    pub fn lowest_tracked_index(&self, cutoff_y: f32) -> u32 {
        self.floors
            .iter()
            .find(|f| f.y <= cutoff_y)
            .map(|f| f.index)
            .unwrap_or(self.next_index)
    }

    /// Move every floor down by `dy` pixels
    pub fn descend(&mut self, dy: f32) {
        for floor in &mut self.floors {
            floor.y += dy;
        }
        self.frontier_y += dy;
    }

    /// Look up a tracked floor by index
    pub fn get(&self, index: u32) -> Option<&Floor> {
        let first = self.floors.front()?.index;
        let offset = index.checked_sub(first)?;
        self.floors.get(offset as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Floor> {
        self.floors.iter()
    }

    pub fn len(&self) -> usize {
        self.floors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.floors.is_empty()
    }

    /// Highest index generated so far
    pub fn highest_generated(&self) -> u32 {
        self.next_index.saturating_sub(1)
    }

    fn generate(&mut self, index: u32, tuning: &Tuning) -> Floor {
        let checkpoint = index % tuning.checkpoint_interval == 0;
        let (left, right) = if checkpoint {
            (PLAY_LEFT, PLAY_RIGHT)
        } else {
            self.random_span(index, tuning)
        };

        Floor {
            index,
            left,
            right,
            y: self.frontier_y - tuning.floor_spacing,
            thickness: tuning.floor_thickness,
            material: material_tag(index),
            checkpoint,
        }
    }

    /// Pick a width and position, then pull the span toward the previous one
    /// until the horizontal gap fits the reachability bound
    fn random_span(&mut self, index: u32, tuning: &Tuning) -> (f32, f32) {
        let area_start = PLAY_LEFT + SPAN_MARGIN;
        let area_end = PLAY_RIGHT - SPAN_MARGIN;
        let area_width = area_end - area_start;

        let width = self.span_width(index).min(area_width - SPAN_MARGIN);
        let available = area_width - width;

        let placement = if index <= 50 {
            match self.rng.random_range(0..4) {
                0 | 1 => Placement::Center,
                2 => Placement::FarLeft,
                _ => Placement::FarRight,
            }
        } else {
            match self.rng.random_range(0..3) {
                0 => Placement::FarLeft,
                1 => Placement::FarRight,
                _ => Placement::CenterGap,
            }
        };

        let max_offset = (available / 3.0).min(30.0);
        let mut left = match placement {
            Placement::Center => area_start + available / 2.0,
            Placement::FarLeft => area_start + self.rng.random_range(0.0..=max_offset),
            Placement::FarRight => area_end - width - self.rng.random_range(0.0..=max_offset),
            Placement::CenterGap => {
                let gap = (available / 3.0).min(60.0);
                let remaining = available - 2.0 * gap;
                if remaining > 0.0 {
                    area_start + gap + self.rng.random_range(0.0..=remaining)
                } else {
                    area_start + gap
                }
            }
        }
        .floor();

        let (prev_left, prev_right) = self.frontier_span;
        let bound = tuning.span_gap_bound(index).floor();
        if interval_gap(left, left + width, prev_left, prev_right) > bound {
            if left > prev_right {
                left = prev_right + bound;
            } else {
                left = prev_left - bound - width;
            }
        }
        // Clamping only ever moves the span back toward the previous one.
        // Spans stay on whole pixels so `right - left` is exactly `width`.
        let left = left.clamp(area_start, area_end - width);
        (left, left + width)
    }

    fn span_width(&mut self, index: u32) -> f32 {
        use SpanLength::*;

        let pool: [SpanLength; 4] = match index {
            0..=99 => [ExtraLong, ExtraLong, Long, Long],
            100..=199 => [Long, Medium, Short, Short],
            200..=399 => [Short, Short, Short, Medium],
            _ => [Long, Medium, Short, Short],
        };
        let length = pool[self.rng.random_range(0..pool.len())];

        let f = index as f32;
        let width = match length {
            ExtraLong => (BASE_SPAN_WIDTH * 1.2 - (f * 0.3).min(20.0)).max(220.0),
            Long => (BASE_SPAN_WIDTH - (f * 0.8).min(40.0)).max(180.0),
            Medium => (BASE_SPAN_WIDTH * 0.6 - (f * 1.2).min(60.0)).max(80.0),
            Short => {
                let current = (BASE_SPAN_WIDTH * 0.5 - (f * 1.5).min(80.0)).max(60.0);
                (current * 0.5).max(MIN_SPAN_WIDTH)
            }
        };
        width.floor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn generated(seed: u64, up_to: u32) -> FloorGenerator {
        let tuning = Tuning::default();
        let mut floors = FloorGenerator::new(seed, &tuning);
        floors.ensure_generated_ahead(up_to, &tuning);
        floors
    }

    #[test]
    fn test_material_tiers() {
        assert_eq!(material_tag(0), Material::Stone);
        assert_eq!(material_tag(9), Material::Stone);
        assert_eq!(material_tag(10), Material::Ice);
        assert_eq!(material_tag(65), Material::Vine);
        assert_eq!(material_tag(99), Material::Rainbow);
        assert_eq!(material_tag(100), Material::Glass);
        assert_eq!(material_tag(12_345), Material::Glass);
        assert_eq!(material_tag(42).as_str(), "gum");
    }

    #[test]
    fn test_ground_and_checkpoints_span_full_width() {
        let floors = generated(3, 40);
        for index in [0, 10, 20, 30, 40] {
            let floor = floors.get(index).unwrap();
            assert!(floor.checkpoint);
            assert_eq!((floor.left, floor.right), (PLAY_LEFT, PLAY_RIGHT));
        }
        assert!(!floors.get(11).unwrap().checkpoint);
    }

    #[test]
    fn test_lookahead_window() {
        let tuning = Tuning::default();
        let floors = generated(1, 0);
        assert_eq!(floors.highest_generated(), tuning.lookahead);
        assert_eq!(floors.len() as u32, tuning.lookahead + 1);
    }

    #[test]
    fn test_prune_keeps_window_contiguous() {
        let mut floors = generated(5, 30);
        assert_eq!(floors.prune_behind(10), 10);
        assert_eq!(floors.iter().next().map(|f| f.index), Some(10));
        assert!(floors.get(9).is_none());
        assert_eq!(floors.get(15).map(|f| f.index), Some(15));
        let indices: Vec<u32> = floors.iter().map(|f| f.index).collect();
        assert!(indices.windows(2).all(|w| w[1] == w[0] + 1));
        // Pruning below the window is a no-op
        assert_eq!(floors.prune_behind(3), 0);
    }

    #[test]
    fn test_lowest_tracked_index_follows_cutoff() {
        let tuning = Tuning::default();
        let floors = generated(5, 10);
        // Cutoff halfway between floor 2 and floor 3
        let cutoff = GROUND_Y - 2.5 * tuning.floor_spacing;
        assert_eq!(floors.lowest_tracked_index(cutoff), 3);
        assert_eq!(floors.lowest_tracked_index(GROUND_Y + 1.0), 0);
    }

    #[test]
    fn test_descend_moves_frontier_with_floors() {
        let tuning = Tuning::default();
        let mut floors = generated(9, 0);
        floors.descend(50.0);
        assert_eq!(floors.get(0).map(|f| f.y), Some(GROUND_Y + 50.0));
        floors.ensure_generated_ahead(5, &tuning);
        let a = floors.get(tuning.lookahead).unwrap().y;
        let b = floors.get(tuning.lookahead + 1).unwrap().y;
        assert!((a - b - tuning.floor_spacing).abs() < 1e-3);
    }

    #[test]
    fn test_narrow_spans_keep_their_width() {
        let floors = generated(13_177_882, 480);
        for floor in floors.iter() {
            assert!(floor.width() >= MIN_SPAN_WIDTH, "floor {}", floor.index);
            assert_eq!(floor.left, floor.left.floor());
            assert_eq!(floor.right, floor.right.floor());
        }
        let narrowest = floors.iter().map(Floor::width).fold(f32::MAX, f32::min);
        assert_eq!(narrowest, MIN_SPAN_WIDTH);
    }

    #[test]
    fn test_same_seed_same_tower() {
        let a: Vec<Floor> = generated(77, 200).iter().cloned().collect();
        let b: Vec<Floor> = generated(77, 200).iter().cloned().collect();
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_consecutive_floors_are_reachable(seed in any::<u64>()) {
            let tuning = Tuning::default();
            let floors = generated(seed, 480);
            let all: Vec<&Floor> = floors.iter().collect();
            for pair in all.windows(2) {
                let (lower, upper) = (pair[0], pair[1]);
                prop_assert_eq!(upper.index, lower.index + 1);
                prop_assert!((lower.y - upper.y - tuning.floor_spacing).abs() < 1e-2);
                let gap = interval_gap(lower.left, lower.right, upper.left, upper.right);
                prop_assert!(gap <= tuning.span_gap_bound(upper.index) + 1e-3);
                prop_assert!(gap <= tuning.max_jump_reach());
                prop_assert!(upper.left >= PLAY_LEFT && upper.right <= PLAY_RIGHT);
                prop_assert!(upper.width() >= MIN_SPAN_WIDTH);
            }
        }

        #[test]
        fn prop_material_is_glass_from_100(index in 100u32..) {
            prop_assert_eq!(material_tag(index), Material::Glass);
        }

        #[test]
        fn prop_material_cycles_every_ten(index in 0u32..90) {
            prop_assert_eq!(material_tag(index), material_tag(index - index % 10));
            prop_assert_ne!(material_tag(index), material_tag(index + 10));
        }
    }
}
