//! Bubble body: display attributes copied from a skill record plus the mutable
//! kinematic state the engine integrates.

use bevy::prelude::*;
use sb_config::LayoutConfig;
use sb_core::Skill;

/// Responsive size class, decided once when the bubble set is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportClass {
    Narrow,
    Wide,
}

impl ViewportClass {
    pub fn for_width(width: f32, layout: &LayoutConfig) -> Self {
        if width < layout.narrow_breakpoint {
            Self::Narrow
        } else {
            Self::Wide
        }
    }

    pub fn base_radius(self, layout: &LayoutConfig) -> f32 {
        match self {
            Self::Narrow => layout.narrow_base_radius,
            Self::Wide => layout.base_radius,
        }
    }
}

/// `base + importance * step`.
pub fn bubble_radius(importance: u8, class: ViewportClass, layout: &LayoutConfig) -> f32 {
    class.base_radius(layout) + importance as f32 * layout.importance_step
}

/// Clamp a center into `[radius, extent - radius]` on both axes.
///
/// Uses max-then-min so a container smaller than the bubble pins it to the
/// far edge instead of panicking like `f32::clamp` would.
pub fn clamp_into_bounds(position: Vec2, radius: f32, container: Vec2) -> Vec2 {
    Vec2::new(
        position.x.max(radius).min(container.x - radius),
        position.y.max(radius).min(container.y - radius),
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    pub id: u32,
    pub label: String,
    pub fill_color: String,
    pub icon: Option<String>,
    pub importance: u8,
    radius: f32,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Layout anchor refreshed on populate and on every resize.
    pub original_position: Option<Vec2>,
}

impl Bubble {
    pub fn new(skill: &Skill, radius: f32, position: Vec2, velocity: Vec2) -> Self {
        Self {
            id: skill.id,
            label: skill.name.clone(),
            fill_color: skill.color.clone(),
            icon: skill.icon_url.clone(),
            importance: skill.importance,
            radius,
            position,
            velocity,
            original_position: Some(position),
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Mass proportional to area.
    pub fn mass(&self) -> f32 {
        self.radius * self.radius
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.position.distance(point) <= self.radius
    }

    pub fn snapshot(&self) -> BubbleSnapshot {
        BubbleSnapshot {
            id: self.id,
            position: self.position,
            radius: self.radius,
            color: self.fill_color.clone(),
            label: self.label.clone(),
            icon: self.icon.clone(),
        }
    }
}

/// Read-only per-frame view handed to renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleSnapshot {
    pub id: u32,
    pub position: Vec2,
    pub radius: f32,
    pub color: String,
    pub label: String,
    pub icon: Option<String>,
}

#[cfg(test)]
pub(crate) fn test_skill(id: u32, importance: u8) -> Skill {
    Skill {
        id,
        name: format!("skill-{id}"),
        details: String::new(),
        markdown: String::new(),
        importance,
        color: "#3498db".into(),
        images: Vec::new(),
        video_url: None,
        achievements: Vec::new(),
        icon_url: None,
    }
}
