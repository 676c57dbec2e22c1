/*!
Skill bubbles app: loads layered config + the skill dataset, then assembles
the core, physics, gameplay and rendering plugins under a resizable window.

Examples:
  cargo run -p sb_bevy_app
  cargo run -p sb_bevy_app -- --seed 42
  cargo run -p sb_bevy_app -- --skills my_skills.ron --auto-close 30
*/

use anyhow::{Context, Result};
use bevy::prelude::*;
use clap::Parser;
use sb_config::BubbleConfig;
use sb_core::{BubbleConfigRes, CorePlugin, RngSeed, SkillCatalog};
use sb_gameplay::GameplayPlugin;
use sb_physics::PhysicsPlugin;
use sb_rendering::RenderingPlugin;
use std::path::{Path, PathBuf};

mod auto_close;
use auto_close::AutoClosePlugin;

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive skill bubbles", long_about = None)]
struct Cli {
    /// Directory holding bubbles.ron / bubbles.local.ron.
    #[arg(long, default_value = "assets/config")]
    config_dir: PathBuf,
    /// Skill dataset (RON); falls back to the embedded dataset.
    #[arg(long, default_value = "assets/data/skills.ron")]
    skills: PathBuf,
    /// Fixed RNG seed (overrides config `rng_seed`).
    #[arg(long)]
    seed: Option<u64>,
    /// Override `window.autoClose` (seconds, 0 disables).
    #[arg(long)]
    auto_close: Option<f32>,
}

fn load_config(dir: &Path) -> BubbleConfig {
    let (cfg, used, errors) =
        BubbleConfig::load_layered([dir.join("bubbles.ron"), dir.join("bubbles.local.ron")]);
    for e in errors {
        warn!("CONFIG LOAD ISSUE: {e}");
    }
    if used.is_empty() {
        info!("No config layers found; using defaults");
    } else {
        info!(?used, "Config layers loaded");
    }
    cfg
}

fn load_skills(path: &Path) -> Result<SkillCatalog> {
    SkillCatalog::load_from_file(path)
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("load skill dataset {}", path.display()))
}

fn main() {
    let cli = Cli::parse();

    let mut cfg = load_config(&cli.config_dir);
    if let Some(secs) = cli.auto_close {
        cfg.window.auto_close = secs.max(0.0);
    }
    for w in cfg.validate() {
        warn!("CONFIG WARNING: {w}");
    }
    info!(?cfg.window, "Window config");

    let catalog = match load_skills(&cli.skills) {
        Ok(c) => c,
        Err(e) => {
            warn!("{e:#}; using embedded dataset");
            SkillCatalog::embedded().unwrap_or_default()
        }
    };
    for w in catalog.validate() {
        warn!("SKILL WARNING: {w}");
    }
    info!(skills = catalog.len(), "Skill dataset ready");

    let seed = cli.seed.or(cfg.rng_seed);
    let window_title = cfg.window.title.clone();

    let mut app = App::new();
    app.insert_resource(BubbleConfigRes(cfg.clone()))
        .insert_resource(catalog);
    if let Some(seed) = seed {
        app.insert_resource(RngSeed(seed));
    }
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: window_title,
            resolution: (cfg.window.width, cfg.window.height).into(),
            resizable: true,
            ..Default::default()
        }),
        ..Default::default()
    }))
    .add_plugins(CorePlugin)
    .add_plugins(PhysicsPlugin)
    .add_plugins(GameplayPlugin)
    .add_plugins(RenderingPlugin)
    .add_plugins(AutoClosePlugin);

    app.run();
}
