//! Wall and pairwise bubble collision response.
//!
//! Pairwise resolution is a plain O(n²) sweep. That is fine for a handful of
//! bubbles; large sets would need a broad phase (grid / sweep-and-prune) first.

use crate::bubble::{clamp_into_bounds, Bubble};
use bevy::prelude::*;

/// Below this center distance the contact normal is undefined; use +X.
const COINCIDENT_EPSILON: f32 = 1e-4;

/// Clamp a bubble inside the container, reflecting and damping the velocity
/// component of every axis whose edge crossed a boundary. Returns whether any
/// wall was touched.
pub fn resolve_walls(bubble: &mut Bubble, container: Vec2, restitution: f32) -> bool {
    let r = bubble.radius();
    let mut hit = false;

    if bubble.position.x - r < 0.0 {
        bubble.position.x = r;
        bubble.velocity.x *= -restitution;
        hit = true;
    } else if bubble.position.x + r > container.x {
        bubble.position.x = container.x - r;
        bubble.velocity.x *= -restitution;
        hit = true;
    }

    if bubble.position.y - r < 0.0 {
        bubble.position.y = r;
        bubble.velocity.y *= -restitution;
        hit = true;
    } else if bubble.position.y + r > container.y {
        bubble.position.y = container.y - r;
        bubble.velocity.y *= -restitution;
        hit = true;
    }
    hit
}

/// Resolve one overlapping, approaching pair.
///
/// Velocity: impulse `-(1 + e) * v_rel·n` shared by mass (`r²`).
/// Position: both bubbles move apart along the normal by half of
/// `separation * penetration` each.
pub fn resolve_pair(a: &mut Bubble, b: &mut Bubble, restitution: f32, separation: f32) -> bool {
    let delta = b.position - a.position;
    let distance = delta.length();
    let min_distance = a.radius() + b.radius();
    if distance >= min_distance {
        return false;
    }

    let normal = if distance > COINCIDENT_EPSILON {
        delta / distance
    } else {
        Vec2::X
    };
    let rel_normal = (b.velocity - a.velocity).dot(normal);
    // already separating
    if rel_normal > 0.0 {
        return false;
    }

    let impulse = -(1.0 + restitution) * rel_normal;
    let (mass_a, mass_b) = (a.mass(), b.mass());
    let total = (mass_a + mass_b).max(f32::EPSILON);
    a.velocity -= normal * (impulse * mass_b / total);
    b.velocity += normal * (impulse * mass_a / total);

    let correction = normal * ((min_distance - distance) * separation * 0.5);
    a.position -= correction;
    b.position += correction;
    true
}

/// Sweep every unordered pair once, in index order. Returns the number of
/// resolved contacts.
pub fn resolve_pairs(bubbles: &mut [Bubble], restitution: f32, separation: f32) -> usize {
    let mut resolved = 0;
    for i in 0..bubbles.len() {
        let (head, tail) = bubbles.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if resolve_pair(a, b, restitution, separation) {
                resolved += 1;
            }
        }
    }
    resolved
}

/// Pull every center back inside the container without touching velocity.
/// Positional de-overlap can nudge a bubble that was just clamped by a wall.
pub fn reclamp_all(bubbles: &mut [Bubble], container: Vec2) {
    for b in bubbles.iter_mut() {
        b.position = clamp_into_bounds(b.position, b.radius(), container);
    }
}

/// Deepest pairwise penetration (0 when nothing overlaps).
pub fn max_penetration(bubbles: &[Bubble]) -> f32 {
    let mut deepest = 0.0_f32;
    for (i, a) in bubbles.iter().enumerate() {
        for b in &bubbles[i + 1..] {
            let depth = a.radius() + b.radius() - a.position.distance(b.position);
            deepest = deepest.max(depth);
        }
    }
    deepest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bubble::test_skill;

    fn bubble(id: u32, radius: f32, pos: Vec2, vel: Vec2) -> Bubble {
        Bubble::new(&test_skill(id, 0), radius, pos, vel)
    }

    #[test]
    fn resting_overlap_splits_ninety_percent_evenly() {
        let mut a = bubble(1, 40.0, Vec2::new(100.0, 300.0), Vec2::ZERO);
        let mut b = bubble(2, 40.0, Vec2::new(160.0, 300.0), Vec2::ZERO);
        assert!(resolve_pair(&mut a, &mut b, 0.6, 0.9));
        assert!((a.position.x - 91.0).abs() < 1e-4, "a moved to {}", a.position.x);
        assert!((b.position.x - 169.0).abs() < 1e-4, "b moved to {}", b.position.x);
        assert_eq!(a.position.y, 300.0);
        assert_eq!(b.position.y, 300.0);
        // 20 units of overlap, 90% removed
        let gap = a.position.distance(b.position);
        assert!((gap - 78.0).abs() < 1e-4);
        // zero relative velocity -> zero impulse
        assert_eq!(a.velocity, Vec2::ZERO);
        assert_eq!(b.velocity, Vec2::ZERO);
    }

    #[test]
    fn separating_pair_is_left_alone() {
        let mut a = bubble(1, 40.0, Vec2::new(100.0, 300.0), Vec2::new(-1.0, 0.0));
        let mut b = bubble(2, 40.0, Vec2::new(160.0, 300.0), Vec2::new(1.0, 0.0));
        assert!(!resolve_pair(&mut a, &mut b, 0.6, 0.9));
        assert_eq!(a.position.x, 100.0);
        assert_eq!(b.velocity.x, 1.0);
    }

    #[test]
    fn approaching_pair_bounces_with_mass_weighting() {
        let mut small = bubble(1, 10.0, Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0));
        let mut big = bubble(2, 20.0, Vec2::new(25.0, 0.0), Vec2::ZERO);
        assert!(resolve_pair(&mut small, &mut big, 0.6, 0.9));
        // j = 1.6 * 2 = 3.2; masses 100 / 400
        assert!((small.velocity.x - (2.0 - 3.2 * 0.8)).abs() < 1e-5);
        assert!((big.velocity.x - 3.2 * 0.2).abs() < 1e-5);
        // momentum (r² weighted) is conserved
        let before = 100.0 * 2.0;
        let after = 100.0 * small.velocity.x + 400.0 * big.velocity.x;
        assert!((before - after).abs() < 1e-3);
    }

    #[test]
    fn coincident_centers_use_fallback_normal() {
        let mut a = bubble(1, 10.0, Vec2::new(50.0, 50.0), Vec2::ZERO);
        let mut b = bubble(2, 10.0, Vec2::new(50.0, 50.0), Vec2::ZERO);
        assert!(resolve_pair(&mut a, &mut b, 0.3, 0.9));
        assert!(a.position.x < b.position.x);
        assert!(a.position.is_finite() && b.position.is_finite());
    }

    #[test]
    fn walls_clamp_and_reflect() {
        let container = Vec2::new(800.0, 600.0);
        let mut b = bubble(1, 40.0, Vec2::new(20.0, 590.0), Vec2::new(-2.0, 3.0));
        assert!(resolve_walls(&mut b, container, 0.85));
        assert_eq!(b.position, Vec2::new(40.0, 560.0));
        assert!((b.velocity.x - 1.7).abs() < 1e-6);
        assert!((b.velocity.y + 2.55).abs() < 1e-6);

        let mut inside = bubble(2, 40.0, Vec2::new(400.0, 300.0), Vec2::new(1.0, 1.0));
        assert!(!resolve_walls(&mut inside, container, 0.85));
        assert_eq!(inside.velocity, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn repeated_sweeps_shrink_overlap_monotonically() {
        let mut set = vec![
            bubble(1, 40.0, Vec2::new(380.0, 300.0), Vec2::ZERO),
            bubble(2, 40.0, Vec2::new(420.0, 300.0), Vec2::ZERO),
            bubble(3, 30.0, Vec2::new(400.0, 330.0), Vec2::ZERO),
        ];
        let mut last = max_penetration(&set);
        assert!(last > 0.0);
        for _ in 0..20 {
            resolve_pairs(&mut set, 0.3, 0.9);
            // no velocities are fed back in; only positions move
            for b in set.iter_mut() {
                b.velocity = Vec2::ZERO;
            }
            let now = max_penetration(&set);
            assert!(now <= last + 1e-4, "overlap grew: {last} -> {now}");
            last = now;
        }
        assert!(last < 1.0, "residual overlap {last}");
    }

    #[test]
    fn reclamp_restores_containment() {
        let container = Vec2::new(200.0, 200.0);
        let mut set = vec![bubble(1, 20.0, Vec2::new(5.0, 199.0), Vec2::new(3.0, 3.0))];
        reclamp_all(&mut set, container);
        assert_eq!(set[0].position, Vec2::new(20.0, 180.0));
        assert_eq!(set[0].velocity, Vec2::new(3.0, 3.0));
    }
}
