//! Bubble simulation engine: owns the bubble list and advances it once per frame.
//!
//! Coordinates are container pixels with a top-left origin and y growing down.
//! Velocities are in pixels per frame; the step is deliberately frame-count
//! driven, not delta-time driven.

use crate::bubble::{bubble_radius, clamp_into_bounds, Bubble, BubbleSnapshot, ViewportClass};
use crate::{collision, impulse};
use bevy::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use sb_config::BubbleConfig;
use sb_core::Skill;
use std::f32::consts::TAU;

/// Which control law the current frame runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// Strong centering pull, Brownian jitter, light damping.
    Active,
    /// Everything is clustered near the center: weak pull, strong damping, full stops.
    Settled,
}

#[derive(Resource, Debug)]
pub struct BubbleEngine {
    cfg: BubbleConfig,
    container: Vec2,
    bubbles: Vec<Bubble>,
    class: Option<ViewportClass>,
    populated: bool,
    rng: StdRng,
    last_regime: Option<Regime>,
    frame: u64,
}

fn measured(size: Vec2) -> bool {
    size.x > 0.0 && size.y > 0.0 && size.is_finite()
}

/// Uniform sample in `[-half, half]`.
fn symmetric(rng: &mut StdRng, half: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * 2.0 * half
}

impl BubbleEngine {
    pub fn new(cfg: BubbleConfig, seed: u64) -> Self {
        Self {
            cfg,
            container: Vec2::ZERO,
            bubbles: Vec::new(),
            class: None,
            populated: false,
            rng: StdRng::seed_from_u64(seed),
            last_regime: None,
            frame: 0,
        }
    }

    /// Engine over a hand-placed bubble set (already populated).
    pub fn from_bubbles(cfg: BubbleConfig, container: Vec2, bubbles: Vec<Bubble>, seed: u64) -> Self {
        let mut engine = Self::new(cfg, seed);
        engine.class = Some(ViewportClass::for_width(container.x, &engine.cfg.layout));
        engine.container = container;
        engine.bubbles = bubbles;
        engine.populated = true;
        engine
    }

    pub fn config(&self) -> &BubbleConfig {
        &self.cfg
    }

    pub fn set_config(&mut self, cfg: BubbleConfig) {
        self.cfg = cfg;
    }

    pub fn container(&self) -> Vec2 {
        self.container
    }

    pub fn center(&self) -> Vec2 {
        self.container * 0.5
    }

    pub fn is_measured(&self) -> bool {
        measured(self.container)
    }

    pub fn is_populated(&self) -> bool {
        self.populated
    }

    pub fn viewport_class(&self) -> Option<ViewportClass> {
        self.class
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn bubbles_mut(&mut self) -> &mut [Bubble] {
        &mut self.bubbles
    }

    pub fn snapshot(&self) -> Vec<BubbleSnapshot> {
        self.bubbles.iter().map(Bubble::snapshot).collect()
    }

    /// Create one bubble per skill, biased toward the center. No-op (returns
    /// false) while the container has no measurable extent.
    pub fn populate(&mut self, skills: &[Skill], container: Vec2) -> bool {
        if !measured(container) {
            return false;
        }
        let layout = &self.cfg.layout;
        let rng = &mut self.rng;
        let class = ViewportClass::for_width(container.x, layout);
        let center = container * 0.5;

        self.bubbles = skills
            .iter()
            .map(|skill| {
                let radius = bubble_radius(skill.importance, class, layout);
                let theta = rng.gen::<f32>() * TAU;
                let reach = rng.gen::<f32>() * layout.spawn_fraction;
                let spread = center - Vec2::splat(radius);
                let position = clamp_into_bounds(
                    center + Vec2::new(theta.cos(), theta.sin()) * reach * spread,
                    radius,
                    container,
                );
                let velocity = Vec2::new(
                    symmetric(rng, layout.initial_speed),
                    symmetric(rng, layout.initial_speed),
                );
                Bubble::new(skill, radius, position, velocity)
            })
            .collect();
        self.container = container;
        self.class = Some(class);
        self.populated = true;
        self.last_regime = None;
        info!(
            count = self.bubbles.len(),
            width = container.x,
            height = container.y,
            ?class,
            "bubbles populated"
        );
        true
    }

    /// Rescale every offset from the old center by the new/old extent ratio,
    /// re-center, then re-clamp. Unmeasurable sizes are ignored so the last
    /// good layout survives a transient zero measurement.
    pub fn resize(&mut self, container: Vec2) -> bool {
        if !measured(container) || container == self.container {
            return false;
        }
        let old = self.container;
        let new_center = container * 0.5;
        if measured(old) {
            let old_center = old * 0.5;
            let scale = container / old;
            for b in self.bubbles.iter_mut() {
                let moved = new_center + (b.position - old_center) * scale;
                b.position = clamp_into_bounds(moved, b.radius(), container);
                b.original_position = Some(b.position);
            }
        } else {
            for b in self.bubbles.iter_mut() {
                b.position = clamp_into_bounds(b.position, b.radius(), container);
                b.original_position = Some(b.position);
            }
        }
        debug!(from = ?old, to = ?container, "container resized");
        self.container = container;
        true
    }

    /// Mean distance over all unordered bubble pairs; infinite below two bubbles.
    pub fn mean_pair_distance(&self) -> f32 {
        let n = self.bubbles.len();
        if n < 2 {
            return f32::INFINITY;
        }
        let mut total = 0.0;
        for (i, a) in self.bubbles.iter().enumerate() {
            for b in &self.bubbles[i + 1..] {
                total += a.position.distance(b.position);
            }
        }
        total / (n * (n - 1) / 2) as f32
    }

    /// Settled-ness test, evaluated fresh on the current state (never latched).
    pub fn regime(&self) -> Regime {
        if !self.is_measured() || self.bubbles.is_empty() {
            return Regime::Active;
        }
        let stab = &self.cfg.stability;
        let center = self.center();
        let near_limit = self.container.x * stab.center_radius_fraction;
        let all_near = self
            .bubbles
            .iter()
            .all(|b| b.position.distance(center) < near_limit);
        if !all_near {
            return Regime::Active;
        }
        let density = self.container.x * self.container.y
            / (self.bubbles.len() as f32 * stab.density_divisor.max(f32::EPSILON));
        if self.mean_pair_distance() < density * stab.density_factor {
            Regime::Settled
        } else {
            Regime::Active
        }
    }

    /// Advance one frame. Returns the regime used, or `None` when skipped
    /// because the container is unmeasured or empty.
    pub fn step(&mut self) -> Option<Regime> {
        if !self.is_measured() || self.bubbles.is_empty() {
            return None;
        }
        let regime = self.regime();
        if self.last_regime != Some(regime) {
            debug!(frame = self.frame, ?regime, "bubble regime changed");
            self.last_regime = Some(regime);
        }

        let center = self.center();
        let container = self.container;
        let motion = &self.cfg.motion;
        let rng = &mut self.rng;
        for b in self.bubbles.iter_mut() {
            let to_center = center - b.position;
            let distance = to_center.length();
            match regime {
                Regime::Settled => {
                    if b.velocity.length() < motion.stop_speed {
                        b.velocity = Vec2::ZERO;
                    } else {
                        b.velocity += to_center
                            * (motion.settled_center_pull * distance / motion.settled_pull_falloff);
                        b.velocity *= motion.settled_damping;
                    }
                }
                Regime::Active => {
                    b.velocity += to_center
                        * (motion.center_pull * (1.0 + distance / motion.center_pull_falloff));
                    b.velocity += Vec2::new(
                        symmetric(rng, motion.jitter),
                        symmetric(rng, motion.jitter),
                    );
                    b.velocity *= motion.damping;
                }
            }
            b.position += b.velocity;
            collision::resolve_walls(b, container, self.cfg.collision.wall_restitution);
        }

        let col = &self.cfg.collision;
        let restitution = match regime {
            Regime::Settled => col.restitution_settled,
            Regime::Active => col.restitution_active,
        };
        collision::resolve_pairs(&mut self.bubbles, restitution, col.separation_fraction);
        collision::reclamp_all(&mut self.bubbles, container);

        self.frame += 1;
        Some(regime)
    }

    /// Push every bubble away from `point`. Returns how many bubbles were
    /// pushed (0 while unmeasured).
    pub fn apply_click_impulse(&mut self, point: Vec2) -> usize {
        if !self.is_measured() {
            return 0;
        }
        let center = self.center();
        impulse::apply_click(&mut self.bubbles, point, center, &self.cfg.impulse);
        self.bubbles.len()
    }

    /// Topmost bubble containing `point`. Later bubbles draw above earlier
    /// ones, so the search runs back to front.
    pub fn hit_test(&self, point: Vec2) -> Option<&Bubble> {
        self.bubbles.iter().rev().find(|b| b.contains(point))
    }

    /// True once every bubble has come to a full stop.
    pub fn is_at_rest(&self) -> bool {
        self.bubbles.iter().all(|b| b.velocity == Vec2::ZERO)
    }

    pub fn max_penetration(&self) -> f32 {
        collision::max_penetration(&self.bubbles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bubble::test_skill;

    fn skills(n: u32) -> Vec<Skill> {
        (1..=n).map(|i| test_skill(i, (11 - i.min(10)) as u8)).collect()
    }

    fn hand_placed(cfg: BubbleConfig, container: Vec2, placed: &[(f32, Vec2)]) -> BubbleEngine {
        let bubbles = placed
            .iter()
            .enumerate()
            .map(|(i, (r, p))| Bubble::new(&test_skill(i as u32 + 1, 0), *r, *p, Vec2::ZERO))
            .collect();
        BubbleEngine::from_bubbles(cfg, container, bubbles, 42)
    }

    fn assert_contained(engine: &BubbleEngine) {
        let c = engine.container();
        for b in engine.bubbles() {
            let r = b.radius();
            assert!(
                b.position.x >= r - 1e-3 && b.position.x <= c.x - r + 1e-3,
                "bubble {} x={} out of [{r}, {}]",
                b.id,
                b.position.x,
                c.x - r
            );
            assert!(
                b.position.y >= r - 1e-3 && b.position.y <= c.y - r + 1e-3,
                "bubble {} y={} out of [{r}, {}]",
                b.id,
                b.position.y,
                c.y - r
            );
        }
    }

    #[test]
    fn populate_places_bubbles_near_center_within_bounds() {
        let mut engine = BubbleEngine::new(BubbleConfig::default(), 7);
        let container = Vec2::new(1280.0, 720.0);
        assert!(engine.populate(&skills(10), container));
        assert_eq!(engine.bubbles().len(), 10);
        assert_eq!(engine.viewport_class(), Some(ViewportClass::Wide));
        let center = engine.center();
        for b in engine.bubbles() {
            let offset = (b.position - center).abs();
            let half = container * 0.5 - Vec2::splat(b.radius());
            assert!(offset.x <= half.x * 0.6 + 1e-3, "x offset too large");
            assert!(offset.y <= half.y * 0.6 + 1e-3, "y offset too large");
            assert!(b.velocity.x.abs() <= 0.1 && b.velocity.y.abs() <= 0.1);
            assert_eq!(b.original_position, Some(b.position));
        }
        assert_contained(&engine);
        // radius fixed by importance: id 1 has importance 10
        assert_eq!(engine.bubbles()[0].radius(), 70.0);
    }

    #[test]
    fn narrow_viewport_uses_smaller_base() {
        let mut engine = BubbleEngine::new(BubbleConfig::default(), 1);
        engine.populate(&skills(1), Vec2::new(500.0, 800.0));
        assert_eq!(engine.viewport_class(), Some(ViewportClass::Narrow));
        assert_eq!(engine.bubbles()[0].radius(), 60.0);
    }

    #[test]
    fn unmeasured_container_skips_everything() {
        let mut engine = BubbleEngine::new(BubbleConfig::default(), 1);
        assert!(!engine.populate(&skills(3), Vec2::new(0.0, 600.0)));
        assert!(!engine.is_populated());
        assert_eq!(engine.step(), None);
        assert_eq!(engine.apply_click_impulse(Vec2::new(10.0, 10.0)), 0);
        assert!(!engine.resize(Vec2::ZERO));
    }

    #[test]
    fn same_seed_same_layout() {
        let mut a = BubbleEngine::new(BubbleConfig::default(), 99);
        let mut b = BubbleEngine::new(BubbleConfig::default(), 99);
        a.populate(&skills(5), Vec2::new(900.0, 700.0));
        b.populate(&skills(5), Vec2::new(900.0, 700.0));
        for _ in 0..30 {
            a.step();
            b.step();
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn containment_holds_every_frame() {
        let mut engine = BubbleEngine::new(BubbleConfig::default(), 3);
        engine.populate(&skills(10), Vec2::new(800.0, 600.0));
        for frame in 0..600 {
            if frame % 97 == 0 {
                engine.apply_click_impulse(Vec2::new(10.0 + frame as f32, 15.0));
            }
            engine.step();
            assert_contained(&engine);
        }
    }

    #[test]
    fn overlap_shrinks_without_input() {
        let mut cfg = BubbleConfig::default();
        cfg.motion.center_pull = 0.0;
        cfg.motion.jitter = 0.0;
        let mut engine = hand_placed(
            cfg,
            Vec2::new(800.0, 600.0),
            &[(40.0, Vec2::new(380.0, 300.0)), (40.0, Vec2::new(420.0, 300.0))],
        );
        let mut last = engine.max_penetration();
        assert!((last - 40.0).abs() < 1e-4);
        for _ in 0..10 {
            engine.step();
            let now = engine.max_penetration();
            assert!(now <= last + 1e-4, "overlap grew: {last} -> {now}");
            last = now;
        }
        // each frame removes 90% of what is left
        assert!(last < 1e-3, "still overlapping by {last}");
    }

    #[test]
    fn mean_pair_distance_and_regime() {
        let engine = hand_placed(
            BubbleConfig::default(),
            Vec2::new(2000.0, 2000.0),
            &[(10.0, Vec2::new(990.0, 1000.0)), (10.0, Vec2::new(1010.0, 1000.0))],
        );
        assert!((engine.mean_pair_distance() - 20.0).abs() < 1e-4);
        // density threshold: 4e6 / (2 * 1e4) * 2 = 400; both within 0.2 * 2000 of center
        assert_eq!(engine.regime(), Regime::Settled);

        let spread = hand_placed(
            BubbleConfig::default(),
            Vec2::new(2000.0, 2000.0),
            &[(10.0, Vec2::new(100.0, 100.0)), (10.0, Vec2::new(1010.0, 1000.0))],
        );
        assert_eq!(spread.regime(), Regime::Active);

        let single = hand_placed(
            BubbleConfig::default(),
            Vec2::new(2000.0, 2000.0),
            &[(10.0, Vec2::new(1000.0, 1000.0))],
        );
        assert_eq!(single.mean_pair_distance(), f32::INFINITY);
        assert_eq!(single.regime(), Regime::Active);
    }

    #[test]
    fn settles_then_stops_for_good() {
        let mut engine = hand_placed(
            BubbleConfig::default(),
            Vec2::new(2000.0, 2000.0),
            &[
                (10.0, Vec2::new(300.0, 300.0)),
                (10.0, Vec2::new(1700.0, 1650.0)),
                (12.0, Vec2::new(250.0, 1700.0)),
            ],
        );
        let mut settled_at = None;
        for frame in 0..5_000 {
            if engine.step() == Some(Regime::Settled) {
                settled_at = Some(frame);
                break;
            }
        }
        assert!(settled_at.is_some(), "never reached the settled regime");

        let mut rest_at = None;
        for frame in 0..2_000 {
            engine.step();
            if engine.is_at_rest() {
                rest_at = Some(frame);
                break;
            }
        }
        assert!(rest_at.is_some(), "bubbles never came to a full stop");
        // let positional de-overlap finish any sub-pixel residue
        for _ in 0..20 {
            engine.step();
        }

        let frozen: Vec<Vec2> = engine.bubbles().iter().map(|b| b.position).collect();
        for _ in 0..50 {
            assert_eq!(engine.step(), Some(Regime::Settled));
        }
        for (b, before) in engine.bubbles().iter().zip(frozen) {
            assert!(b.position.distance(before) < 1e-3, "bubble {} drifted", b.id);
            assert_eq!(b.velocity, Vec2::ZERO);
        }
    }

    #[test]
    fn impulse_after_settling_flips_back_to_active() {
        let mut engine = hand_placed(
            BubbleConfig::default(),
            Vec2::new(2000.0, 2000.0),
            &[(10.0, Vec2::new(990.0, 1000.0)), (10.0, Vec2::new(1010.0, 1000.0))],
        );
        assert_eq!(engine.step(), Some(Regime::Settled));
        engine.apply_click_impulse(Vec2::new(1000.0, 1100.0));
        // 40+ px per frame: a handful of frames carries them past the 400 px radius
        let mut saw_active = false;
        for _ in 0..20 {
            if engine.step() == Some(Regime::Active) {
                saw_active = true;
                break;
            }
        }
        assert!(saw_active);
    }

    #[test]
    fn click_impulse_changes_velocities() {
        let mut engine = hand_placed(
            BubbleConfig::default(),
            Vec2::new(800.0, 600.0),
            &[(40.0, Vec2::new(200.0, 300.0)), (40.0, Vec2::new(600.0, 300.0))],
        );
        assert_eq!(engine.apply_click_impulse(Vec2::new(400.0, 300.0)), 2);
        let v: Vec<Vec2> = engine.bubbles().iter().map(|b| b.velocity).collect();
        assert!(v[0].x < 0.0 && v[1].x > 0.0);
        assert!(v.iter().all(|v| v.length() > 0.0));
    }

    #[test]
    fn hit_test_prefers_topmost() {
        let engine = hand_placed(
            BubbleConfig::default(),
            Vec2::new(800.0, 600.0),
            &[(40.0, Vec2::new(300.0, 300.0)), (40.0, Vec2::new(330.0, 300.0))],
        );
        assert_eq!(engine.hit_test(Vec2::new(315.0, 300.0)).map(|b| b.id), Some(2));
        assert_eq!(engine.hit_test(Vec2::new(265.0, 300.0)).map(|b| b.id), Some(1));
        assert!(engine.hit_test(Vec2::new(700.0, 100.0)).is_none());
    }

    #[test]
    fn resize_scales_offsets_from_center() {
        let mut engine = hand_placed(
            BubbleConfig::default(),
            Vec2::new(800.0, 600.0),
            &[(40.0, Vec2::new(300.0, 250.0)), (40.0, Vec2::new(760.0, 560.0))],
        );
        let old_center = engine.center();
        let before: Vec<Vec2> = engine.bubbles().iter().map(|b| b.position - old_center).collect();
        assert!(engine.resize(Vec2::new(1600.0, 1200.0)));
        let new_center = engine.center();
        let first = engine.bubbles()[0].position - new_center;
        assert!((first - before[0] * 2.0).length() < 1e-3);
        assert!(first.normalize().dot(before[0].normalize()) > 0.999);
        let corner = &engine.bubbles()[1];
        assert!((corner.position - Vec2::new(1520.0, 1120.0)).length() < 1e-3);
        assert_eq!(corner.original_position, Some(corner.position));
        assert_contained(&engine);
    }

    #[test]
    fn shrinking_resize_keeps_bubbles_inside() {
        let mut engine = BubbleEngine::new(BubbleConfig::default(), 11);
        engine.populate(&skills(10), Vec2::new(1400.0, 900.0));
        assert!(engine.resize(Vec2::new(700.0, 450.0)));
        assert_contained(&engine);
        // no recreation: same ids and radii
        assert_eq!(engine.bubbles().len(), 10);
        assert_eq!(engine.bubbles()[0].radius(), 70.0);
        assert!(!engine.resize(Vec2::new(700.0, 450.0)), "same size is a no-op");
    }
}
