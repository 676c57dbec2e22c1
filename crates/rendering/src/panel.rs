//! Detail panel: opened by `BubbleSelected`, closed by `SelectionCleared`.

use crate::palette::Palette;
use bevy::prelude::*;
use sb_core::Skill;
use sb_gameplay::{BubbleSelected, SelectionCleared};

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailPanel {
    pub id: u32,
}

/// Plain-text body of the panel. Markdown is shown as-is.
pub fn panel_text(skill: &Skill) -> String {
    let mut out = format!("{}\n\n{}", skill.name, skill.details);
    if !skill.markdown.is_empty() {
        out.push_str("\n\n");
        out.push_str(&skill.markdown);
    }
    if !skill.achievements.is_empty() {
        out.push_str("\n\nAchievements:");
        for a in &skill.achievements {
            out.push_str("\n- ");
            out.push_str(a);
        }
    }
    if let Some(video) = &skill.video_url {
        out.push_str("\n\nVideo: ");
        out.push_str(video);
    }
    if !skill.images.is_empty() {
        out.push_str(&format!("\n\n{} image(s)", skill.images.len()));
    }
    out.push_str("\n\n[Esc / right-click to close]");
    out
}

pub(crate) fn open_detail_panel(
    mut commands: Commands,
    mut selected: EventReader<BubbleSelected>,
    open: Query<Entity, With<DetailPanel>>,
) {
    let Some(BubbleSelected(skill)) = selected.read().last() else { return; };
    for e in &open {
        commands.entity(e).despawn();
    }
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(24.0),
                top: Val::Px(24.0),
                width: Val::Px(360.0),
                padding: UiRect::all(Val::Px(16.0)),
                ..default()
            },
            BackgroundColor(Palette::PANEL_BG),
            DetailPanel { id: skill.id },
        ))
        .with_children(|p| {
            p.spawn((
                Text::new(panel_text(skill)),
                TextFont { font_size: 16.0, ..default() },
                TextColor(Palette::LABEL),
            ));
        });
}

pub(crate) fn close_detail_panel(
    mut commands: Commands,
    mut cleared: EventReader<SelectionCleared>,
    open: Query<(Entity, &DetailPanel)>,
) {
    for ev in cleared.read() {
        for (e, panel) in &open {
            if panel.id == ev.id {
                commands.entity(e).despawn();
            }
        }
    }
}
