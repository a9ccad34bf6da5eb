//! Sandbox scene description. Loaded from a `.ron` file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use engine_core::{Vec2, Vec3};
use fire::FireConfig;
use physics::{CollisionGroup, PhysicsWorld};
use rand::prelude::*;

/// One static box platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformDef {
    pub center: [f32; 2],
    pub half_extents: [f32; 2],
    /// Counter-clockwise rotation in degrees.
    #[serde(default)]
    pub rotation_deg: f32,
    /// Floating platform instead of ground.
    #[serde(default)]
    pub floating: bool,
}

/// What happens at a scripted time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum TriggerKind {
    /// Light a root exactly here.
    Ignite,
    /// Drop a spark that searches for nearby terrain.
    Spark,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trigger {
    pub at: f32,
    pub position: [f32; 2],
    pub kind: TriggerKind,
}

/// Full sandbox scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub fire: FireConfig,
    #[serde(default = "default_platforms")]
    pub platforms: Vec<PlatformDef>,
    #[serde(default)]
    pub triggers: Vec<Trigger>,
    /// Extra sparks dropped at random over the scene bounds at t = 0.
    #[serde(default)]
    pub random_sparks: u32,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f32,
    /// Seconds of simulation to run.
    #[serde(default = "default_duration")]
    pub duration: f32,
    /// Camera rectangle `[min_x, min_y, max_x, max_y]`. Spent fronts outside
    /// it are recycled each second.
    #[serde(default)]
    pub view: Option<[f32; 4]>,
}

fn default_platforms() -> Vec<PlatformDef> {
    vec![
        PlatformDef {
            center: [0.0, -0.5],
            half_extents: [10.0, 0.5],
            rotation_deg: 0.0,
            floating: false,
        },
        PlatformDef {
            center: [6.0, 6.0],
            half_extents: [4.5, 0.5],
            rotation_deg: 0.0,
            floating: true,
        },
    ]
}
fn default_seed() -> u64 {
    7
}
fn default_frame_rate() -> f32 {
    60.0
}
fn default_duration() -> f32 {
    15.0
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            fire: FireConfig::default(),
            platforms: default_platforms(),
            triggers: vec![
                Trigger {
                    at: 0.0,
                    position: [-3.0, 0.0],
                    kind: TriggerKind::Ignite,
                },
                Trigger {
                    at: 0.5,
                    position: [6.0, 7.0],
                    kind: TriggerKind::Spark,
                },
            ],
            random_sparks: 0,
            seed: default_seed(),
            frame_rate: default_frame_rate(),
            duration: default_duration(),
            view: None,
        }
    }
}

impl SceneConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading scene {:?}", path))?;
        let scene: SceneConfig =
            ron::from_str(&data).with_context(|| format!("parsing scene {:?}", path))?;
        scene.fire.validate().context("scene fire config")?;
        anyhow::ensure!(
            scene.frame_rate.is_finite() && scene.frame_rate > 0.0,
            "frame_rate must be positive, got {}",
            scene.frame_rate
        );
        Ok(scene)
    }

    /// Build the terrain described by `platforms`.
    pub fn build_terrain(&self) -> PhysicsWorld {
        let mut world = PhysicsWorld::new();
        for p in &self.platforms {
            let group = if p.floating {
                CollisionGroup::Platform
            } else {
                CollisionGroup::Ground
            };
            world.add_platform(
                Vec2::from(p.center),
                Vec2::from(p.half_extents),
                p.rotation_deg.to_radians(),
                group,
            );
        }
        world
    }

    /// Scripted triggers plus `random_sparks` scattered above the platforms,
    /// sorted by time.
    pub fn schedule(&self) -> Vec<Trigger> {
        let mut triggers = self.triggers.clone();
        if self.random_sparks > 0 && !self.platforms.is_empty() {
            let mut rng = StdRng::seed_from_u64(self.seed);
            for _ in 0..self.random_sparks {
                let p = &self.platforms[rng.gen_range(0..self.platforms.len())];
                let x = p.center[0] + rng.gen_range(-1.0..=1.0) * p.half_extents[0];
                let y = p.center[1] + p.half_extents[1] + rng.gen_range(0.2..1.0);
                triggers.push(Trigger {
                    at: 0.0,
                    position: [x, y],
                    kind: TriggerKind::Spark,
                });
            }
        }
        triggers.sort_by(|a, b| a.at.partial_cmp(&b.at).unwrap_or(std::cmp::Ordering::Equal));
        triggers
    }
}

impl Trigger {
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.position[0], self.position[1], 0.0)
    }
}
