// Rendering crate: camera, bubble circles + labels, ripple gizmos and the
// detail panel. Reads engine / interaction state; never mutates it.
// Requires GameplayPlugin (selection events) and PhysicsPlugin (engine).

use bevy::prelude::*;
use sb_core::PresentSet;

mod bubbles;
mod metrics;
mod palette;
mod panel;
mod ripples;

pub use bubbles::{bubble_transform, BubbleLabel, BubbleVisual};
pub use metrics::{container_to_world, icon_size, label_font_size, SELECTED_SCALE};
pub use palette::{bubble_fill, Palette};
pub use panel::{panel_text, DetailPanel};
pub use ripples::{center_dot, ease_out, inner_ring, outer_ring, ripple_layers, RippleLayer};

#[derive(Component)]
pub struct GameCamera;

fn setup_camera(mut commands: Commands) {
    commands.spawn((Camera2d, GameCamera));
}

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Palette::BG))
            .add_systems(Startup, setup_camera)
            .add_systems(
                Update,
                (
                    (bubbles::spawn_bubble_visuals, bubbles::update_bubble_visuals).chain(),
                    (panel::open_detail_panel, panel::close_detail_panel).chain(),
                )
                    .in_set(PresentSet),
            );

        #[cfg(not(any(test, feature = "headless")))]
        {
            app.add_systems(Startup, bubbles::prepare_circle_mesh).add_systems(
                Update,
                (ripples::draw_ripples, bubbles::draw_selection_outline).in_set(PresentSet),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_core::{ContainerSize, CorePlugin, RngSeed, SkillCatalog};
    use sb_gameplay::{DismissSelection, GameplayPlugin, InteractionLayer, PointerClick};
    use sb_physics::{BubbleEngine, PhysicsPlugin};

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(RngSeed(9));
        app.insert_resource(SkillCatalog::embedded().expect("embedded skills parse"));
        app.add_plugins((CorePlugin, PhysicsPlugin, GameplayPlugin, RenderingPlugin));
        app.world_mut().resource_mut::<ContainerSize>().0 = Vec2::new(1000.0, 700.0);
        app
    }

    #[test]
    fn plugin_spawns_camera() {
        let mut app = app();
        app.update();
        let world = app.world_mut();
        let mut q = world.query::<&GameCamera>();
        assert_eq!(q.iter(world).count(), 1, "expected exactly one GameCamera");
    }

    #[test]
    fn one_visual_and_label_per_bubble() {
        let mut app = app();
        app.update();
        app.update();
        let world = app.world_mut();
        let mut visuals = world.query::<&BubbleVisual>();
        assert_eq!(visuals.iter(world).count(), 10);
        let mut labels = world.query::<&BubbleLabel>();
        assert_eq!(labels.iter(world).count(), 10);
    }

    #[test]
    fn visuals_follow_engine_positions() {
        let mut app = app();
        for _ in 0..3 {
            app.update();
        }
        let world = app.world_mut();
        let engine = world.resource::<BubbleEngine>();
        let container = engine.container();
        let expected: Vec<(u32, Vec2)> = engine
            .bubbles()
            .iter()
            .map(|b| (b.id, container_to_world(b.position, container)))
            .collect();
        let mut q = world.query::<(&BubbleVisual, &Transform)>();
        for (v, tf) in q.iter(world) {
            let (_, at) = expected.iter().find(|(id, _)| *id == v.id).expect("visual has a bubble");
            assert!((tf.translation.truncate() - *at).length() < 1e-3);
        }
    }

    #[test]
    fn panel_opens_on_select_and_closes_on_dismiss() {
        let mut app = app();
        app.update();
        let target = app.world().resource::<BubbleEngine>().bubbles()[0].position;
        app.world_mut().send_event(PointerClick(target));
        app.update();
        let picked = app.world().resource::<InteractionLayer>().selected().expect("selected");
        {
            let world = app.world_mut();
            let mut q = world.query::<&DetailPanel>();
            let panels: Vec<u32> = q.iter(world).map(|p| p.id).collect();
            assert_eq!(panels, vec![picked]);
        }
        app.world_mut().send_event(DismissSelection);
        app.update();
        let world = app.world_mut();
        let mut q = world.query::<&DetailPanel>();
        assert_eq!(q.iter(world).count(), 0);
    }
}
