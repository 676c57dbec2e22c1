// Pure configuration data for the bubble display (no Bevy dependency).
// Provides: data structures, layered loading, validation producing warnings (non-fatal), and tests.

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    /// Automatically close the app after this many seconds. 0.0 (or omitted) = run indefinitely.
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Skill Bubbles".into(),
            auto_close: 0.0,
        }
    }
}

/// Bubble sizing and initial placement.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Base radius on wide viewports.
    pub base_radius: f32,
    /// Base radius when the container is narrower than `narrow_breakpoint`.
    pub narrow_base_radius: f32,
    /// Radius added per importance point.
    pub importance_step: f32,
    pub narrow_breakpoint: f32,
    /// Max fraction of the half extent a bubble may be placed from the center.
    pub spawn_fraction: f32,
    /// Initial velocity components are drawn from `[-initial_speed, initial_speed]`.
    pub initial_speed: f32,
}
impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_radius: 40.0,
            narrow_base_radius: 30.0,
            importance_step: 3.0,
            narrow_breakpoint: 768.0,
            spawn_fraction: 0.6,
            initial_speed: 0.1,
        }
    }
}

/// Per-frame control law. Velocities are in units per frame.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct MotionConfig {
    pub center_pull: f32,
    pub center_pull_falloff: f32,
    /// Half-width of the uniform per-axis jitter added while unsettled.
    pub jitter: f32,
    pub damping: f32,
    pub settled_center_pull: f32,
    pub settled_pull_falloff: f32,
    pub settled_damping: f32,
    /// Below this speed a settled bubble is stopped outright.
    pub stop_speed: f32,
}
impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            center_pull: 0.00085,
            center_pull_falloff: 200.0,
            jitter: 0.0015,
            damping: 0.985,
            settled_center_pull: 0.0001,
            settled_pull_falloff: 400.0,
            settled_damping: 0.9,
            stop_speed: 0.01,
        }
    }
}

/// Thresholds of the settled predicate. Empirically tuned; kept as data.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct StabilityConfig {
    /// Every bubble must be within `center_radius_fraction * width` of the center.
    pub center_radius_fraction: f32,
    pub density_divisor: f32,
    pub density_factor: f32,
}
impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            center_radius_fraction: 0.2,
            density_divisor: 10_000.0,
            density_factor: 2.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct CollisionConfig {
    pub wall_restitution: f32,
    pub restitution_settled: f32,
    pub restitution_active: f32,
    /// Share of the penetration depth removed per resolution pass.
    pub separation_fraction: f32,
}
impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            wall_restitution: 0.85,
            restitution_settled: 0.3,
            restitution_active: 0.6,
            separation_fraction: 0.9,
        }
    }
}

/// Push applied to every bubble when empty space is clicked.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ImpulseConfig {
    pub influence_radius: f32,
    pub max_force: f32,
    pub min_force: f32,
    pub falloff_exp: f32,
    /// Radius at which the size multiplier equals `size_base - size_slope`.
    pub size_reference: f32,
    pub size_base: f32,
    pub size_slope: f32,
    /// Blend of the bubble's angular position into the push direction.
    pub angle_effect: f32,
    /// Share of the old velocity kept: `carry_base + carry_slope * r / size_reference`.
    pub carry_base: f32,
    pub carry_slope: f32,
    pub distance_epsilon: f32,
}
impl Default for ImpulseConfig {
    fn default() -> Self {
        Self {
            influence_radius: 300.0,
            max_force: 80.0,
            min_force: 40.0,
            falloff_exp: 1.5,
            size_reference: 40.0,
            size_base: 1.3,
            size_slope: 0.6,
            angle_effect: 0.4,
            carry_base: 0.2,
            carry_slope: 0.1,
            distance_epsilon: 5.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct RippleConfig {
    /// Seconds a ripple marker stays in the active set.
    pub lifetime: f32,
}
impl Default for RippleConfig {
    fn default() -> Self {
        Self { lifetime: 1.5 }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct BubbleConfig {
    pub window: WindowConfig,
    pub layout: LayoutConfig,
    pub motion: MotionConfig,
    pub stability: StabilityConfig,
    pub collision: CollisionConfig,
    pub impulse: ImpulseConfig,
    pub ripple: RippleConfig,
    /// Fixed RNG seed for reproducible layouts; `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

impl BubbleConfig {
    /// Load from a single RON file (errors contain human-readable context).
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        ron::from_str(&data).map_err(|e| format!("parse RON: {e}"))
    }

    /// Load file; on failure returns default config plus error string.
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Load multiple layers; later overrides earlier (deep merge).
    /// Skips missing files; returns (config, used_paths, errors).
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();

        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        match &mut merged {
                            Some(cur) => merge_value(cur, val),
                            None => merged = Some(val),
                        }
                        used.push(path_ref.display().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }

        let Some(val) = merged else {
            return (BubbleConfig::default(), used, errors);
        };
        match val.into_rust::<BubbleConfig>() {
            Ok(cfg) => (cfg, used, errors),
            Err(e) => {
                errors.push(format!(
                    "failed to deserialize merged config; using defaults: {e}"
                ));
                (BubbleConfig::default(), used, errors)
            }
        }
    }

    /// Produce validation warnings (non-fatal) for suspicious values.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.window.auto_close < 0.0 {
            w.push(format!(
                "window.autoClose {} negative -> treated as disabled (should be >= 0)",
                self.window.auto_close
            ));
        } else if self.window.auto_close > 0.0 && self.window.auto_close < 0.01 {
            w.push(format!(
                "window.autoClose {} very small; closes almost immediately",
                self.window.auto_close
            ));
        }

        let lay = &self.layout;
        if lay.base_radius <= 0.0 || lay.narrow_base_radius <= 0.0 {
            w.push("layout base radii must be > 0".into());
        }
        if lay.importance_step < 0.0 {
            w.push("layout.importance_step negative -> important skills shrink".into());
        }
        if !(0.0..=1.0).contains(&lay.spawn_fraction) {
            w.push(format!(
                "layout.spawn_fraction {} outside 0..1",
                lay.spawn_fraction
            ));
        }
        if lay.initial_speed < 0.0 {
            w.push("layout.initial_speed negative".into());
        }

        let m = &self.motion;
        for (label, damping) in [
            ("motion.damping", m.damping),
            ("motion.settled_damping", m.settled_damping),
        ] {
            if !(0.0..=1.0).contains(&damping) {
                w.push(format!("{label} {damping} outside 0..1 -> energy gain"));
            }
        }
        if m.center_pull < 0.0 || m.settled_center_pull < 0.0 {
            w.push("motion center pull negative -> bubbles pushed outward".into());
        }
        if m.center_pull_falloff <= 0.0 || m.settled_pull_falloff <= 0.0 {
            w.push("motion pull falloff must be > 0".into());
        }
        if m.jitter < 0.0 {
            w.push("motion.jitter negative".into());
        }
        if m.stop_speed < 0.0 {
            w.push("motion.stop_speed negative; settled bubbles never stop".into());
        }

        let s = &self.stability;
        if s.center_radius_fraction <= 0.0 {
            w.push("stability.center_radius_fraction must be > 0 or the display never settles".into());
        }
        if s.density_divisor <= 0.0 {
            w.push("stability.density_divisor must be > 0".into());
        }

        let c = &self.collision;
        for (label, e) in [
            ("collision.wall_restitution", c.wall_restitution),
            ("collision.restitution_settled", c.restitution_settled),
            ("collision.restitution_active", c.restitution_active),
        ] {
            if !(0.0..=1.0).contains(&e) {
                w.push(format!("{label} {e} outside 0..1"));
            }
        }
        if !(0.0..=1.0).contains(&c.separation_fraction) {
            w.push(format!(
                "collision.separation_fraction {} outside 0..1",
                c.separation_fraction
            ));
        }

        let imp = &self.impulse;
        if imp.influence_radius <= 0.0 {
            w.push("impulse.influence_radius must be > 0".into());
        }
        if imp.min_force > imp.max_force {
            w.push(format!(
                "impulse.min_force ({}) greater than max_force ({})",
                imp.min_force, imp.max_force
            ));
        }
        if imp.falloff_exp <= 0.0 {
            w.push("impulse.falloff_exp must be > 0".into());
        }
        if imp.size_reference <= 0.0 {
            w.push("impulse.size_reference must be > 0".into());
        }
        if imp.distance_epsilon <= 0.0 {
            w.push("impulse.distance_epsilon must be > 0 (division guard)".into());
        }
        if !(0.0..=1.0).contains(&imp.angle_effect) {
            w.push(format!(
                "impulse.angle_effect {} outside 0..1",
                imp.angle_effect
            ));
        }

        if self.ripple.lifetime <= 0.0 {
            w.push("ripple.lifetime must be > 0; ripples vanish immediately".into());
        }
        w
    }
}

fn merge_value(base: &mut ron::value::Value, overlay: ron::value::Value) {
    use ron::value::Value;
    match (base, overlay) {
        (Value::Map(bm), Value::Map(om)) => {
            for (k, v) in om.into_iter() {
                let mut incoming = Some(v);
                for (ek, ev) in bm.iter_mut() {
                    if *ek == k {
                        if let Some(val) = incoming.take() {
                            merge_value(ev, val);
                        }
                        break;
                    }
                }
                if let Some(val) = incoming {
                    bm.insert(k, val);
                }
            }
        }
        (b, o) => *b = o,
    }
}
