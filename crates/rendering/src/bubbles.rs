//! Bubble visuals: one circle entity plus one label entity per engine bubble,
//! re-positioned from the engine snapshot every frame.
//!
//! Test / headless builds spawn the marker entities only (no meshes, materials
//! or fonts), so plugin composition can be checked without a renderer.

use crate::metrics::{container_to_world, label_font_size, BUBBLE_Z, SELECTED_SCALE, SELECTED_Z};
use bevy::prelude::*;
use sb_gameplay::InteractionLayer;
use sb_physics::{BubbleEngine, BubbleSnapshot};
use std::collections::HashSet;

#[cfg(not(any(test, feature = "headless")))]
use crate::palette::{bubble_fill, Palette};
#[cfg(not(any(test, feature = "headless")))]
use bevy::math::primitives::Circle;
#[cfg(not(any(test, feature = "headless")))]
use bevy::sprite::{ColorMaterial, MeshMaterial2d};

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BubbleVisual {
    pub id: u32,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BubbleLabel {
    pub id: u32,
}

/// World transform of a bubble circle built on a unit-radius mesh.
pub fn bubble_transform(snap: &BubbleSnapshot, container: Vec2, selected: bool) -> Transform {
    let (z, scale) = if selected { (SELECTED_Z, SELECTED_SCALE) } else { (BUBBLE_Z, 1.0) };
    Transform::from_translation(container_to_world(snap.position, container).extend(z))
        .with_scale(Vec3::new(snap.radius * scale, snap.radius * scale, 1.0))
}

#[cfg(not(any(test, feature = "headless")))]
#[derive(Resource)]
pub(crate) struct CircleMeshHandle(Handle<Mesh>);

#[cfg(not(any(test, feature = "headless")))]
pub(crate) fn prepare_circle_mesh(mut meshes: ResMut<Assets<Mesh>>, mut commands: Commands) {
    let mesh = meshes.add(Mesh::from(Circle::new(1.0)));
    commands.insert_resource(CircleMeshHandle(mesh));
}

#[cfg(not(any(test, feature = "headless")))]
pub(crate) fn spawn_bubble_visuals(
    mut commands: Commands,
    engine: Res<BubbleEngine>,
    circle_mesh: Option<Res<CircleMeshHandle>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    existing: Query<&BubbleVisual>,
) {
    let Some(circle_mesh) = circle_mesh else { return; };
    let known: HashSet<u32> = existing.iter().map(|v| v.id).collect();
    for b in engine.bubbles().iter().filter(|b| !known.contains(&b.id)) {
        let material = materials.add(ColorMaterial::from(bubble_fill(&b.fill_color)));
        commands.spawn((
            Mesh2d::from(circle_mesh.0.clone()),
            MeshMaterial2d(material),
            Transform::default(),
            BubbleVisual { id: b.id },
        ));
        commands.spawn((
            Text2d::new(b.label.clone()),
            TextFont { font_size: label_font_size(b.radius()), ..default() },
            TextColor(Palette::LABEL),
            Transform::default(),
            BubbleLabel { id: b.id },
        ));
    }
}

#[cfg(any(test, feature = "headless"))]
pub(crate) fn spawn_bubble_visuals(
    mut commands: Commands,
    engine: Res<BubbleEngine>,
    existing: Query<&BubbleVisual>,
) {
    let known: HashSet<u32> = existing.iter().map(|v| v.id).collect();
    for b in engine.bubbles().iter().filter(|b| !known.contains(&b.id)) {
        commands.spawn((Transform::default(), BubbleVisual { id: b.id }));
        commands.spawn((
            Transform::default(),
            TextFont { font_size: label_font_size(b.radius()), ..default() },
            BubbleLabel { id: b.id },
        ));
    }
}

pub(crate) fn update_bubble_visuals(
    engine: Res<BubbleEngine>,
    layer: Res<InteractionLayer>,
    mut circles: Query<(&BubbleVisual, &mut Transform), Without<BubbleLabel>>,
    mut labels: Query<(&BubbleLabel, &mut Transform), Without<BubbleVisual>>,
) {
    let container = engine.container();
    let selected = layer.selected();
    let snapshot = engine.snapshot();
    let find = |id: u32| snapshot.iter().find(|s| s.id == id);

    for (visual, mut tf) in circles.iter_mut() {
        let Some(snap) = find(visual.id) else { continue; };
        *tf = bubble_transform(snap, container, selected == Some(visual.id));
    }
    for (label, mut tf) in labels.iter_mut() {
        let Some(snap) = find(label.id) else { continue; };
        let z = if selected == Some(label.id) { SELECTED_Z } else { BUBBLE_Z };
        tf.translation = container_to_world(snap.position, container).extend(z + 1.0);
    }
}

#[cfg(not(any(test, feature = "headless")))]
pub(crate) fn draw_selection_outline(
    mut gizmos: Gizmos,
    engine: Res<BubbleEngine>,
    layer: Res<InteractionLayer>,
) {
    let Some(id) = layer.selected() else { return; };
    let Some(b) = engine.bubbles().iter().find(|b| b.id == id) else { return; };
    let at = container_to_world(b.position, engine.container());
    gizmos.circle_2d(at, b.radius() * SELECTED_SCALE + 2.0, Palette::SELECTED_OUTLINE);
}
