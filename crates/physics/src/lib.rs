// Physics crate: the custom bubble integrator and its Bevy wiring.
// The engine itself is plain data driven by `step()`; the systems below only
// feed it container measurements and advance it once per frame.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use sb_core::{BubbleConfigRes, ContainerSize, RngSeed, SimulationSet, SkillCatalog};

mod bubble;
mod collision;
mod engine;
mod impulse;

pub use bubble::{bubble_radius, clamp_into_bounds, Bubble, BubbleSnapshot, ViewportClass};
pub use collision::{max_penetration, resolve_pair, resolve_pairs, resolve_walls};
pub use engine::{BubbleEngine, Regime};
pub use impulse::{carry_factor, force_at, pushed_velocity, size_multiplier};

impl FromWorld for BubbleEngine {
    fn from_world(world: &mut World) -> Self {
        let cfg = world
            .get_resource::<BubbleConfigRes>()
            .map(|c| c.0.clone())
            .unwrap_or_default();
        let seed = world
            .get_resource::<RngSeed>()
            .map(|s| s.0)
            .or(cfg.rng_seed)
            .unwrap_or_else(rand::random::<u64>);
        BubbleEngine::new(cfg, seed)
    }
}

/// Copy the primary window's logical size into [`ContainerSize`].
pub fn measure_container(
    windows_q: Query<&Window, With<PrimaryWindow>>,
    mut size: ResMut<ContainerSize>,
) {
    let Ok(window) = windows_q.single() else { return; };
    let measured = Vec2::new(window.width(), window.height());
    if size.0 != measured {
        size.0 = measured;
    }
}

/// Populate once the container is measurable, then follow size changes.
pub fn sync_engine(
    size: Res<ContainerSize>,
    catalog: Option<Res<SkillCatalog>>,
    mut engine: ResMut<BubbleEngine>,
) {
    if !size.is_measured() {
        return;
    }
    if !engine.is_populated() {
        let Some(catalog) = catalog else { return; };
        engine.populate(&catalog.skills, size.0);
        return;
    }
    if engine.container() != size.0 {
        engine.resize(size.0);
    }
}

pub fn step_engine(mut engine: ResMut<BubbleEngine>) {
    engine.step();
}

/// Live tuning: a replaced config takes effect from the next step on.
pub fn apply_config_changes(cfg: Res<BubbleConfigRes>, mut engine: ResMut<BubbleEngine>) {
    engine.set_config(cfg.0.clone());
    debug!("bubble config updated");
}

pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ContainerSize>();
        app.init_resource::<BubbleEngine>();
        app.add_systems(
            Update,
            (
                apply_config_changes.run_if(resource_exists_and_changed::<BubbleConfigRes>),
                measure_container,
                sync_engine,
                step_engine,
            )
                .chain()
                .in_set(SimulationSet),
        );
    }
}
