//! Click ripples: short-lived markers left where a click missed every bubble.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleMarker {
    pub id: u64,
    /// Container coordinates of the click.
    pub origin: Vec2,
    /// Elapsed app time (seconds) at creation.
    pub created_at: f32,
}

/// What renderers see: the marker plus how long it has been alive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleView {
    pub id: u64,
    pub origin: Vec2,
    pub age: f32,
}

/// Owns the ripple id counter and the live markers. Ids are never reused
/// within one tracker, so concurrent ripples stay distinguishable.
#[derive(Debug, Clone)]
pub struct RippleTracker {
    next_id: u64,
    lifetime: f32,
    markers: Vec<RippleMarker>,
}

impl RippleTracker {
    pub fn new(lifetime: f32) -> Self {
        Self { next_id: 0, lifetime: lifetime.max(0.0), markers: Vec::new() }
    }

    pub fn lifetime(&self) -> f32 {
        self.lifetime
    }

    pub fn set_lifetime(&mut self, lifetime: f32) {
        self.lifetime = lifetime.max(0.0);
    }

    pub fn spawn(&mut self, origin: Vec2, now: f32) -> RippleMarker {
        let marker = RippleMarker { id: self.next_id, origin, created_at: now };
        self.next_id += 1;
        self.markers.push(marker);
        marker
    }

    /// Drop every marker whose lifetime has run out. Returns how many went.
    pub fn expire(&mut self, now: f32) -> usize {
        let lifetime = self.lifetime;
        let before = self.markers.len();
        self.markers.retain(|m| now - m.created_at < lifetime);
        before - self.markers.len()
    }

    pub fn active(&self, now: f32) -> Vec<RippleView> {
        self.markers
            .iter()
            .map(|m| RippleView { id: m.id, origin: m.origin, age: (now - m.created_at).max(0.0) })
            .collect()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.markers.iter().any(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
