//! Static skill records backing the bubbles.
//!
//! The catalog is read-only for the whole session: the engine derives one bubble per
//! record at populate time and the interaction layer hands full records to selection
//! listeners.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fs, path::Path};

/// Dataset shipped with the binary; used when no override file is present.
pub const EMBEDDED_SKILLS: &str = include_str!("../../../assets/data/skills.ron");

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Skill {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub details: String,
    /// Long-form body for the detail view (Markdown source, rendered externally).
    #[serde(default)]
    pub markdown: String,
    /// 1..=10, drives bubble radius.
    pub importance: u8,
    /// CSS-style hex fill, e.g. `"#3498db"`.
    pub color: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
}

impl Skill {
    /// Parsed fill color; `None` when `color` is not a valid hex string.
    pub fn fill_color(&self) -> Option<Color> {
        parse_hex_color(&self.color)
    }
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    Srgba::hex(hex.trim()).ok().map(Color::from)
}

#[derive(Resource, Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct SkillCatalog {
    pub skills: Vec<Skill>,
}

impl SkillCatalog {
    pub fn from_ron_str(src: &str) -> Result<Self, String> {
        ron::from_str(src).map_err(|e| format!("parse skills RON: {e}"))
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read skills: {e}"))?;
        Self::from_ron_str(&data)
    }

    /// The dataset compiled into the binary.
    pub fn embedded() -> Result<Self, String> {
        Self::from_ron_str(EMBEDDED_SKILLS)
    }

    pub fn get(&self, id: u32) -> Option<&Skill> {
        self.skills.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Non-fatal warnings about the dataset.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.skills.is_empty() {
            w.push("skill catalog is empty; nothing to display".into());
        }
        let mut seen = HashSet::new();
        for s in &self.skills {
            if !seen.insert(s.id) {
                w.push(format!("duplicate skill id {}", s.id));
            }
            if !(1..=10).contains(&s.importance) {
                w.push(format!(
                    "skill {} ({}) importance {} outside 1..=10",
                    s.id, s.name, s.importance
                ));
            }
            if s.fill_color().is_none() {
                w.push(format!(
                    "skill {} ({}) color {:?} is not a hex color",
                    s.id, s.name, s.color
                ));
            }
            if s.name.trim().is_empty() {
                w.push(format!("skill {} has an empty name", s.id));
            }
        }
        w
    }
}
