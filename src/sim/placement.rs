//! Non-overlapping random placement of targets
//!
//! Rejection sampling inside the arena: draw a uniform point, keep it if it is
//! far enough from everything already placed, otherwise draw again. After the
//! attempt cap the last draw is kept anyway.

use glam::Vec2;
use rand::Rng;

use crate::tuning::Tuning;

/// A placed position and how it was obtained
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placed {
    pub pos: Vec2,
    pub attempts: u32,
    /// False when the attempt cap ran out and the last draw was kept
    pub separated: bool,
}

/// Sampling region and spacing rules for one arena
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Smallest allowed top-left corner
    pub min: Vec2,
    /// Largest allowed top-left corner
    pub max: Vec2,
    pub min_separation: f32,
    pub max_attempts: u32,
}

impl Placement {
    pub fn new(
        arena: Vec2,
        footprint: Vec2,
        margin: f32,
        min_separation: f32,
        max_attempts: u32,
    ) -> Self {
        let min = Vec2::splat(margin);
        // Never let the range invert, a too-small arena collapses to the margin
        let max = (arena - footprint - Vec2::splat(margin)).max(min);
        Self {
            min,
            max,
            min_separation,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(
            Vec2::new(tuning.arena_width, tuning.arena_height),
            Vec2::splat(tuning.target_size),
            tuning.placement_margin,
            tuning.min_separation,
            tuning.placement_attempts,
        )
    }

    /// Uniform draw inside the sampling region
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            rng.random_range(self.min.x..=self.max.x),
            rng.random_range(self.min.y..=self.max.y),
        )
    }

    /// True if `candidate` keeps the minimum distance to every placed position
    pub fn is_clear(&self, candidate: Vec2, placed: &[Vec2]) -> bool {
        placed
            .iter()
            .all(|p| p.distance(candidate) >= self.min_separation)
    }

    /// Find a position for one more object
    pub fn place<R: Rng + ?Sized>(&self, placed: &[Vec2], rng: &mut R) -> Placed {
        let mut pos = self.sample(rng);
        let mut attempts = 1;
        while !self.is_clear(pos, placed) {
            if attempts >= self.max_attempts {
                log::debug!(
                    "Placement gave up after {} attempts, keeping ({:.1}, {:.1})",
                    attempts,
                    pos.x,
                    pos.y
                );
                return Placed {
                    pos,
                    attempts,
                    separated: false,
                };
            }
            pos = self.sample(rng);
            attempts += 1;
        }
        Placed {
            pos,
            attempts,
            separated: true,
        }
    }

    /// Place `count` objects one after another, each checked against the earlier ones
    pub fn place_all<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Placed> {
        let mut positions: Vec<Vec2> = Vec::with_capacity(count);
        let mut placed = Vec::with_capacity(count);
        for _ in 0..count {
            let p = self.place(&positions, rng);
            positions.push(p.pos);
            placed.push(p);
        }
        placed
    }
}
