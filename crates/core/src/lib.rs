// Core crate: shared resources, skill records and system set labels.
// Everything here is consumed by at least two of physics / gameplay / rendering.

use bevy::prelude::*;

mod skills;
pub use skills::{parse_hex_color, Skill, SkillCatalog, EMBEDDED_SKILLS};

/// Deterministic RNG seed resource (set once at startup / tests for reproducible layouts).
#[derive(Resource, Debug, Copy, Clone, Default)]
pub struct RngSeed(pub u64);

// Wrapper Bevy resource for the pure-data BubbleConfig (keeps sb_config free of bevy dependency).
#[derive(Resource, Debug, Clone, Default)]
pub struct BubbleConfigRes(pub sb_config::BubbleConfig);

/// Measured container extent in logical pixels (top-left origin, y down).
/// Zero on either axis means "not measured yet".
#[derive(Resource, Debug, Copy, Clone, Default, PartialEq, Deref, DerefMut)]
pub struct ContainerSize(pub Vec2);

impl ContainerSize {
    pub fn is_measured(&self) -> bool {
        self.0.x > 0.0 && self.0.y > 0.0
    }
}

// Frame ordering: pointer input is classified before the engine steps, and the
// renderer reads the post-step snapshot.
#[derive(SystemSet, Debug, Hash, Eq, PartialEq, Clone)]
pub struct InputSet;
#[derive(SystemSet, Debug, Hash, Eq, PartialEq, Clone)]
pub struct SimulationSet;
#[derive(SystemSet, Debug, Hash, Eq, PartialEq, Clone)]
pub struct PresentSet;

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ContainerSize>()
            .configure_sets(Update, (InputSet, SimulationSet, PresentSet).chain());
    }
}
