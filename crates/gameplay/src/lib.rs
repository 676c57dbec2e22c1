// Gameplay crate: pointer input, click classification (select vs. push),
// ripple bookkeeping and the selection events consumed by the detail view.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use sb_core::{BubbleConfigRes, InputSet, Skill, SkillCatalog};
use sb_physics::BubbleEngine;

mod interaction;
mod ripples;

pub use interaction::{ClickOutcome, InteractionLayer, InteractionState};
pub use ripples::{RippleMarker, RippleTracker, RippleView};

/// A primary click or tap, in container coordinates (top-left origin, y down).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PointerClick(pub Vec2);

/// A bubble was clicked; carries the full record for the detail view.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct BubbleSelected(pub Skill);

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionCleared {
    pub id: u32,
}

/// Request to close the open detail view.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct DismissSelection;

/// Map raw input to [`PointerClick`] / [`DismissSelection`]. Touch wins over
/// the mouse when both report a press in the same frame.
pub fn emit_pointer_clicks(
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    keys: Option<Res<ButtonInput<KeyCode>>>,
    touches: Option<Res<Touches>>,
    windows_q: Query<&Window, With<PrimaryWindow>>,
    mut clicks: EventWriter<PointerClick>,
    mut dismiss: EventWriter<DismissSelection>,
) {
    if let Some(touch) = touches.as_ref().and_then(|t| t.iter_just_pressed().next()) {
        clicks.write(PointerClick(touch.position()));
    } else if buttons.as_ref().is_some_and(|b| b.just_pressed(MouseButton::Left)) {
        if let Some(cursor) = windows_q.single().ok().and_then(|w| w.cursor_position()) {
            clicks.write(PointerClick(cursor));
        }
    }

    let right = buttons.as_ref().is_some_and(|b| b.just_pressed(MouseButton::Right));
    let escape = keys.as_ref().is_some_and(|k| k.just_pressed(KeyCode::Escape));
    if right || escape {
        dismiss.write(DismissSelection);
    }
}

pub fn handle_pointer_clicks(
    mut clicks: EventReader<PointerClick>,
    time: Res<Time>,
    catalog: Option<Res<SkillCatalog>>,
    mut engine: ResMut<BubbleEngine>,
    mut layer: ResMut<InteractionLayer>,
    mut selected: EventWriter<BubbleSelected>,
) {
    let now = time.elapsed_secs();
    for PointerClick(point) in clicks.read() {
        let ClickOutcome::Selected(id) = layer.handle_click(&mut engine, *point, now) else {
            continue;
        };
        match catalog.as_ref().and_then(|c| c.get(id)) {
            Some(skill) => {
                selected.write(BubbleSelected(skill.clone()));
            }
            None => warn!(id, "selected bubble has no skill record"),
        }
    }
}

pub fn handle_dismissals(
    mut requests: EventReader<DismissSelection>,
    mut layer: ResMut<InteractionLayer>,
    mut cleared: EventWriter<SelectionCleared>,
) {
    if requests.read().count() == 0 {
        return;
    }
    if let Some(id) = layer.dismiss() {
        cleared.write(SelectionCleared { id });
    }
}

pub fn expire_ripples(time: Res<Time>, mut layer: ResMut<InteractionLayer>) {
    layer.expire_ripples(time.elapsed_secs());
}

fn apply_ripple_lifetime(cfg: Res<BubbleConfigRes>, mut layer: ResMut<InteractionLayer>) {
    layer.ripple_tracker_mut().set_lifetime(cfg.0.ripple.lifetime);
}

pub struct GameplayPlugin;

impl Plugin for GameplayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InteractionLayer>()
            .add_event::<PointerClick>()
            .add_event::<BubbleSelected>()
            .add_event::<SelectionCleared>()
            .add_event::<DismissSelection>();
        app.add_systems(
            Update,
            (
                apply_ripple_lifetime.run_if(resource_exists_and_changed::<BubbleConfigRes>),
                emit_pointer_clicks,
                handle_pointer_clicks,
                handle_dismissals,
                expire_ripples,
            )
                .chain()
                .in_set(InputSet),
        );
    }
}
