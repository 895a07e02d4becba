//! Target placement with cross-kind separation
//!
//! Candidates are sampled uniformly inside the playable band of the arena:
//! padded on every side, with the heads-up overlay strip at the top excluded.
//! A candidate is rejected when it lands closer than
//! `SEPARATION_FACTOR * diameter` to a live target of the opposite kind.
//! Same-kind overlap is allowed.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::TargetKind;
use crate::consts::{ARENA_PADDING, DEFAULT_HUD_MARGIN, MAX_PLACEMENT_ATTEMPTS, SEPARATION_FACTOR};

/// Measured arena, as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArenaBounds {
    pub width: f32,
    pub height: f32,
    /// Height of the reserved strip at the top (HUD overlay)
    pub top_margin: f32,
}

impl ArenaBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            top_margin: DEFAULT_HUD_MARGIN,
        }
    }

    pub fn with_top_margin(mut self, top_margin: f32) -> Self {
        self.top_margin = top_margin.max(0.0);
        self
    }

    /// Allowed top-left x range for a target of this diameter
    pub fn x_range(&self, diameter: f32) -> (f32, f32) {
        (ARENA_PADDING, self.width - diameter - ARENA_PADDING)
    }

    /// Allowed top-left y range for a target of this diameter
    pub fn y_range(&self, diameter: f32) -> (f32, f32) {
        (
            self.top_margin + ARENA_PADDING,
            self.height - diameter - ARENA_PADDING,
        )
    }

    /// Whether a target of this diameter fits at all
    pub fn fits(&self, diameter: f32) -> bool {
        let (x0, x1) = self.x_range(diameter);
        let (y0, y1) = self.y_range(diameter);
        [x0, x1, y0, y1].iter().all(|v| v.is_finite()) && x1 >= x0 && y1 >= y0
    }
}

/// No valid position found within the attempt budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementFailed;

impl std::fmt::Display for PlacementFailed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "no free position after {MAX_PLACEMENT_ATTEMPTS} attempts")
    }
}

impl std::error::Error for PlacementFailed {}

/// Pick go/no-go for a new target. Distractors only appear when enabled.
pub fn choose_kind<R: Rng>(rng: &mut R, distractor_enabled: bool, distractor_chance: f64) -> TargetKind {
    if distractor_enabled && rng.random_bool(distractor_chance.clamp(0.0, 1.0)) {
        TargetKind::NoGo
    } else {
        TargetKind::Go
    }
}

/// True if `pos` keeps its distance from every opposite-kind obstacle
pub fn is_clear(pos: Vec2, diameter: f32, kind: TargetKind, obstacles: &[(Vec2, TargetKind)]) -> bool {
    let min_dist = SEPARATION_FACTOR * diameter;
    obstacles
        .iter()
        .filter(|(_, other)| *other != kind)
        .all(|(other_pos, _)| pos.distance(*other_pos) >= min_dist)
}

/// Find a position for a target of `kind` among `obstacles`
pub fn place<R: Rng>(
    rng: &mut R,
    arena: &ArenaBounds,
    diameter: f32,
    kind: TargetKind,
    obstacles: &[(Vec2, TargetKind)],
) -> Result<Vec2, PlacementFailed> {
    if !arena.fits(diameter) {
        return Err(PlacementFailed);
    }
    let (x0, x1) = arena.x_range(diameter);
    let (y0, y1) = arena.y_range(diameter);

    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let candidate = Vec2::new(rng.random_range(x0..=x1), rng.random_range(y0..=y1));
        if is_clear(candidate, diameter, kind, obstacles) {
            return Ok(candidate);
        }
    }

    Err(PlacementFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_position_inside_playable_band() {
        let mut rng = Pcg32::seed_from_u64(7);
        let arena = ArenaBounds::new(800.0, 600.0);
        for _ in 0..500 {
            let pos = place(&mut rng, &arena, 100.0, TargetKind::Go, &[]).unwrap();
            assert!(pos.x >= ARENA_PADDING && pos.x <= 800.0 - 100.0 - ARENA_PADDING);
            assert!(pos.y >= DEFAULT_HUD_MARGIN + ARENA_PADDING);
            assert!(pos.y <= 600.0 - 100.0 - ARENA_PADDING);
        }
    }

    #[test]
    fn test_arena_too_small_fails() {
        let mut rng = Pcg32::seed_from_u64(1);
        let arena = ArenaBounds::new(100.0, 100.0);
        assert_eq!(
            place(&mut rng, &arena, 100.0, TargetKind::Go, &[]),
            Err(PlacementFailed)
        );
    }

    #[test]
    fn test_unbounded_arena_fails() {
        let mut rng = Pcg32::seed_from_u64(1);
        for arena in [
            ArenaBounds::new(f32::INFINITY, 800.0),
            ArenaBounds::new(1024.0, f32::INFINITY),
            ArenaBounds::new(f32::NAN, 800.0),
            ArenaBounds::new(1024.0, 800.0).with_top_margin(f32::INFINITY),
        ] {
            assert!(!arena.fits(100.0));
            assert_eq!(
                place(&mut rng, &arena, 100.0, TargetKind::Go, &[]),
                Err(PlacementFailed)
            );
        }
    }

    #[test]
    fn test_same_kind_overlap_allowed() {
        let mut rng = Pcg32::seed_from_u64(3);
        // Band is a single point: every candidate is (20, 20)
        let arena = ArenaBounds::new(140.0, 140.0).with_top_margin(0.0);
        let obstacles = [(Vec2::new(20.0, 20.0), TargetKind::Go)];
        let pos = place(&mut rng, &arena, 100.0, TargetKind::Go, &obstacles).unwrap();
        assert_eq!(pos, Vec2::new(20.0, 20.0));
    }

    #[test]
    fn test_opposite_kind_blocked_when_crowded() {
        let mut rng = Pcg32::seed_from_u64(3);
        let arena = ArenaBounds::new(140.0, 140.0).with_top_margin(0.0);
        let obstacles = [(Vec2::new(20.0, 20.0), TargetKind::NoGo)];
        assert_eq!(
            place(&mut rng, &arena, 100.0, TargetKind::Go, &obstacles),
            Err(PlacementFailed)
        );
    }

    #[test]
    fn test_placement_respects_separation() {
        let mut rng = Pcg32::seed_from_u64(42);
        let arena = ArenaBounds::new(1200.0, 900.0);
        let obstacles = [
            (Vec2::new(300.0, 400.0), TargetKind::NoGo),
            (Vec2::new(700.0, 500.0), TargetKind::NoGo),
        ];
        for _ in 0..200 {
            if let Ok(pos) = place(&mut rng, &arena, 80.0, TargetKind::Go, &obstacles) {
                for (other, _) in &obstacles {
                    assert!(pos.distance(*other) >= 1.2 * 80.0);
                }
            }
        }
    }

    #[test]
    fn test_is_clear_boundary() {
        let obstacles = [(Vec2::ZERO, TargetKind::NoGo)];
        assert!(is_clear(Vec2::new(121.0, 0.0), 100.0, TargetKind::Go, &obstacles));
        assert!(!is_clear(Vec2::new(119.0, 0.0), 100.0, TargetKind::Go, &obstacles));
    }

    #[test]
    fn test_choose_kind() {
        let mut rng = Pcg32::seed_from_u64(9);
        for _ in 0..100 {
            assert_eq!(choose_kind(&mut rng, false, 1.0), TargetKind::Go);
            assert_eq!(choose_kind(&mut rng, true, 1.0), TargetKind::NoGo);
            assert_eq!(choose_kind(&mut rng, true, 0.0), TargetKind::Go);
        }

        let no_go = (0..10_000)
            .filter(|_| choose_kind(&mut rng, true, 0.3) == TargetKind::NoGo)
            .count();
        assert!((2_500..3_500).contains(&no_go), "got {no_go}");
    }
}
