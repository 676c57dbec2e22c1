//! Click classification: a click either selects the bubble under it or, on a
//! miss, leaves a ripple and pushes every bubble away.

use crate::ripples::{RippleMarker, RippleTracker, RippleView};
use bevy::prelude::*;
use sb_core::BubbleConfigRes;
use sb_physics::BubbleEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Selected(u32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    Selected(u32),
    Pushed { ripple: RippleMarker, pushed: usize },
    /// A selection is open, or the container has not been measured yet.
    Ignored,
}

#[derive(Resource, Debug, Clone)]
pub struct InteractionLayer {
    state: InteractionState,
    ripples: RippleTracker,
}

impl InteractionLayer {
    pub fn new(ripple_lifetime: f32) -> Self {
        Self { state: InteractionState::Idle, ripples: RippleTracker::new(ripple_lifetime) }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn selected(&self) -> Option<u32> {
        match self.state {
            InteractionState::Selected(id) => Some(id),
            InteractionState::Idle => None,
        }
    }

    pub fn handle_click(&mut self, engine: &mut BubbleEngine, point: Vec2, now: f32) -> ClickOutcome {
        if self.state != InteractionState::Idle || !engine.is_measured() {
            return ClickOutcome::Ignored;
        }
        if let Some(hit) = engine.hit_test(point) {
            let id = hit.id;
            self.state = InteractionState::Selected(id);
            info!(id, label = %hit.label, "bubble selected");
            return ClickOutcome::Selected(id);
        }
        let ripple = self.ripples.spawn(point, now);
        let pushed = engine.apply_click_impulse(point);
        debug!(ripple = ripple.id, x = point.x, y = point.y, pushed, "ripple spawned");
        ClickOutcome::Pushed { ripple, pushed }
    }

    /// Back to `Idle`. Returns the id that was selected, if any.
    pub fn dismiss(&mut self) -> Option<u32> {
        let prev = self.selected();
        if let Some(id) = prev {
            info!(id, "selection cleared");
        }
        self.state = InteractionState::Idle;
        prev
    }

    pub fn expire_ripples(&mut self, now: f32) -> usize {
        self.ripples.expire(now)
    }

    pub fn ripples(&self, now: f32) -> Vec<RippleView> {
        self.ripples.active(now)
    }

    pub fn ripple_tracker(&self) -> &RippleTracker {
        &self.ripples
    }

    pub fn ripple_tracker_mut(&mut self) -> &mut RippleTracker {
        &mut self.ripples
    }
}

impl FromWorld for InteractionLayer {
    fn from_world(world: &mut World) -> Self {
        let lifetime = world
            .get_resource::<BubbleConfigRes>()
            .map(|c| c.0.ripple.lifetime)
            .unwrap_or_else(|| sb_config::RippleConfig::default().lifetime);
        Self::new(lifetime)
    }
}
