//! Collision and bounds tests for the projectile
//!
//! The pokeball is treated as a box reaching `radius` right and down from its
//! position, overlapped against each target's bounding box.

use glam::Vec2;

use super::state::Target;

/// Check if the projectile box overlaps a target box
#[inline]
pub fn projectile_hits_target(pos: Vec2, radius: f32, target: &Target) -> bool {
    pos.x + radius > target.pos.x
        && pos.x < target.pos.x + target.size.x
        && pos.y + radius > target.pos.y
        && pos.y < target.pos.y + target.size.y
}

/// First target in iteration order overlapped by the projectile
pub fn first_hit(pos: Vec2, radius: f32, targets: &[Target]) -> Option<&Target> {
    targets
        .iter()
        .find(|t| projectile_hits_target(pos, radius, t))
}

/// Check if the projectile left the playfield (off either side or below the escape line)
#[inline]
pub fn out_of_bounds(pos: Vec2, arena_width: f32, escape_height: f32) -> bool {
    pos.y > escape_height || pos.x > arena_width || pos.x < 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target_at(id: u32, x: f32, y: f32) -> Target {
        Target {
            id,
            name: format!("T{id}"),
            pos: Vec2::new(x, y),
            size: Vec2::splat(80.0),
        }
    }

    #[test]
    fn test_overlap_edges() {
        let t = target_at(1, 100.0, 100.0);
        let r = 15.0;

        // Inside
        assert!(projectile_hits_target(Vec2::new(120.0, 120.0), r, &t));
        // Reaching in from the left/top by the radius
        assert!(projectile_hits_target(Vec2::new(86.0, 86.0), r, &t));
        // Touching exactly is not an overlap
        assert!(!projectile_hits_target(Vec2::new(85.0, 120.0), r, &t));
        assert!(!projectile_hits_target(Vec2::new(180.0, 120.0), r, &t));
        assert!(!projectile_hits_target(Vec2::new(120.0, 180.0), r, &t));
        assert!(projectile_hits_target(Vec2::new(179.9, 179.9), r, &t));
    }

    #[test]
    fn test_first_hit_uses_iteration_order() {
        let targets = vec![target_at(1, 100.0, 100.0), target_at(2, 150.0, 100.0)];
        let hit = first_hit(Vec2::new(160.0, 120.0), 15.0, &targets);
        assert_eq!(hit.map(|t| t.id), Some(1));

        let hit = first_hit(Vec2::new(200.0, 120.0), 15.0, &targets);
        assert_eq!(hit.map(|t| t.id), Some(2));

        assert!(first_hit(Vec2::new(500.0, 20.0), 15.0, &targets).is_none());
        assert!(first_hit(Vec2::new(500.0, 20.0), 15.0, &[]).is_none());
    }

    #[test]
    fn test_out_of_bounds() {
        assert!(!out_of_bounds(Vec2::new(400.0, 200.0), 800.0, 400.0));
        // Above the arena is still in play
        assert!(!out_of_bounds(Vec2::new(400.0, -50.0), 800.0, 400.0));
        assert!(!out_of_bounds(Vec2::new(0.0, 400.0), 800.0, 400.0));
        assert!(out_of_bounds(Vec2::new(400.0, 400.1), 800.0, 400.0));
        assert!(out_of_bounds(Vec2::new(800.1, 100.0), 800.0, 400.0));
        assert!(out_of_bounds(Vec2::new(-0.1, 100.0), 800.0, 400.0));
    }
}
