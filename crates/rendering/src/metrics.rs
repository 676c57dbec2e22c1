//! Pure sizing rules for bubble decorations and the container → world mapping.

use bevy::prelude::*;

/// Selected bubbles are drawn slightly enlarged.
pub const SELECTED_SCALE: f32 = 1.1;
/// Draw depth: the selected bubble sits above the rest.
pub const BUBBLE_Z: f32 = 20.0;
pub const SELECTED_Z: f32 = 30.0;

pub fn label_font_size(radius: f32) -> f32 {
    (radius / 4.5).max(10.0)
}

pub fn icon_size(radius: f32) -> f32 {
    (radius * 0.7).max(20.0)
}

/// Container pixels (top-left origin, y down) to 2D world units with the
/// default camera centered on the window.
pub fn container_to_world(point: Vec2, container: Vec2) -> Vec2 {
    Vec2::new(point.x - container.x * 0.5, container.y * 0.5 - point.y)
}
