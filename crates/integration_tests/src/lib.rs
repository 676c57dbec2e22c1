// Integration tests: the published plugins composed the way the app binary
// composes them, driven through events instead of a real window.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use sb_core::{BubbleConfigRes, ContainerSize, CorePlugin, RngSeed, SkillCatalog};
use sb_gameplay::GameplayPlugin;
use sb_physics::PhysicsPlugin;
use sb_rendering::RenderingPlugin;
use std::time::Duration;

/// Simulated frame length for every app built here.
pub const FRAME: Duration = Duration::from_millis(100);

/// All plugins on top of `MinimalPlugins`, fixed seed, manual clock, embedded
/// dataset. The container is left unmeasured.
pub fn build_app(cfg: sb_config::BubbleConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(bevy::input::InputPlugin);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));
    app.insert_resource(BubbleConfigRes(cfg));
    app.insert_resource(RngSeed(2024));
    if let Ok(catalog) = SkillCatalog::embedded() {
        app.insert_resource(catalog);
    }
    app.add_plugins((CorePlugin, PhysicsPlugin, GameplayPlugin, RenderingPlugin));
    app
}

pub fn set_container(app: &mut App, size: Vec2) {
    app.world_mut().resource_mut::<ContainerSize>().0 = size;
}
