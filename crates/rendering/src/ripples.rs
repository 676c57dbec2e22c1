//! Ripple visuals: three eased layers per marker (inner ring, delayed outer
//! ring, shrinking center dot), drawn with gizmos.

use crate::metrics::container_to_world;
use crate::palette::Palette;
use bevy::prelude::*;
use sb_core::ContainerSize;
use sb_gameplay::{InteractionLayer, RippleView};

/// One layer of a ripple at a given age.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleLayer {
    pub diameter: f32,
    pub alpha: f32,
}

pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Eased progress of a tween, `None` before it starts or after it ends.
fn progress(age: f32, delay: f32, duration: f32) -> Option<f32> {
    let local = age - delay;
    if local < 0.0 || local > duration {
        return None;
    }
    Some(ease_out(local / duration))
}

fn tween(age: f32, delay: f32, duration: f32, from: RippleLayer, to: RippleLayer) -> Option<RippleLayer> {
    let t = progress(age, delay, duration)?;
    Some(RippleLayer {
        diameter: from.diameter + (to.diameter - from.diameter) * t,
        alpha: from.alpha + (to.alpha - from.alpha) * t,
    })
}

pub fn inner_ring(age: f32) -> Option<RippleLayer> {
    tween(
        age,
        0.0,
        0.8,
        RippleLayer { diameter: 0.0, alpha: 1.0 },
        RippleLayer { diameter: 250.0, alpha: 0.0 },
    )
}

pub fn outer_ring(age: f32) -> Option<RippleLayer> {
    tween(
        age,
        0.1,
        1.6,
        RippleLayer { diameter: 0.0, alpha: 0.9 },
        RippleLayer { diameter: 350.0, alpha: 0.0 },
    )
}

pub fn center_dot(age: f32) -> Option<RippleLayer> {
    tween(
        age,
        0.0,
        0.5,
        RippleLayer { diameter: 8.0, alpha: 1.0 },
        RippleLayer { diameter: 0.0, alpha: 0.0 },
    )
}

/// Every visible layer of one ripple with the color it is drawn in.
pub fn ripple_layers(view: &RippleView) -> Vec<(RippleLayer, Color)> {
    [
        (inner_ring(view.age), Palette::RIPPLE_INNER),
        (outer_ring(view.age), Palette::RIPPLE_OUTER),
        (center_dot(view.age), Palette::RIPPLE_DOT),
    ]
    .into_iter()
    .filter_map(|(layer, color)| layer.map(|l| (l, color.with_alpha(l.alpha))))
    .collect()
}

pub fn draw_ripples(
    mut gizmos: Gizmos,
    time: Res<Time>,
    size: Res<ContainerSize>,
    layer: Res<InteractionLayer>,
) {
    for view in layer.ripples(time.elapsed_secs()) {
        let at = container_to_world(view.origin, size.0);
        for (l, color) in ripple_layers(&view) {
            if l.diameter > 0.0 {
                gizmos.circle_2d(at, l.diameter * 0.5, color);
            }
        }
    }
}
