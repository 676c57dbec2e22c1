//! Click-driven push: every bubble is shoved away from the click point.
//!
//! Force decays with distance (capped influence radius, `ratio^falloff_exp`
//! blend between max and min force), is scaled down for larger bubbles, and is
//! bent by the bubble's angular position around the container center so the
//! spread is not perfectly radial. Part of the old velocity survives, more of
//! it for larger bubbles.

use crate::bubble::Bubble;
use bevy::prelude::*;
use sb_config::ImpulseConfig;

/// Force magnitude before size scaling, for a (epsilon padded) distance.
pub fn force_at(distance: f32, cfg: &ImpulseConfig) -> f32 {
    let reach = cfg.influence_radius.max(f32::EPSILON);
    let ratio = (distance.min(reach) / reach).clamp(0.0, 1.0);
    cfg.min_force + (cfg.max_force - cfg.min_force) * (1.0 - ratio.powf(cfg.falloff_exp))
}

/// Larger bubbles receive less push. Never negative.
pub fn size_multiplier(radius: f32, cfg: &ImpulseConfig) -> f32 {
    (cfg.size_base - radius / cfg.size_reference.max(f32::EPSILON) * cfg.size_slope).max(0.0)
}

/// Share of the previous velocity that survives the push.
pub fn carry_factor(radius: f32, cfg: &ImpulseConfig) -> f32 {
    cfg.carry_base + cfg.carry_slope * radius / cfg.size_reference.max(f32::EPSILON)
}

/// Velocity of `bubble` right after a click at `click`.
pub fn pushed_velocity(bubble: &Bubble, click: Vec2, center: Vec2, cfg: &ImpulseConfig) -> Vec2 {
    let offset = bubble.position - click;
    let distance = offset.length() + cfg.distance_epsilon.max(f32::EPSILON);
    let away = offset / distance;

    let around = bubble.position - center;
    let angle = around.y.atan2(around.x);
    let bent = away + Vec2::new(angle.cos(), angle.sin()) * cfg.angle_effect;
    let direction = bent.try_normalize().unwrap_or(away);

    let force = force_at(distance, cfg) * size_multiplier(bubble.radius(), cfg);
    bubble.velocity * carry_factor(bubble.radius(), cfg) + direction * force
}

/// Apply the push to every bubble in place.
pub fn apply_click(bubbles: &mut [Bubble], click: Vec2, center: Vec2, cfg: &ImpulseConfig) {
    for b in bubbles.iter_mut() {
        b.velocity = pushed_velocity(b, click, center, cfg);
    }
}
