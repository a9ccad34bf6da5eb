//! Headless fire platform sandbox.
//!
//! Usage: `fireplatform [scene.ron]`. Without a path the built-in demo scene
//! runs. Progress is reported through `log`; set `RUST_LOG=debug` to see
//! every spread.

mod scene;

use anyhow::Result;
use engine_core::Vec2;
use fire::FireSimulation;
use std::path::PathBuf;

use scene::{SceneConfig, TriggerKind};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let scene = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => SceneConfig::load(&path)?,
        None => {
            log::info!("No scene given, running built-in demo");
            SceneConfig::default()
        }
    };

    let mut sim = FireSimulation::new(scene.build_terrain(), scene.fire.clone())?;
    let mut schedule = scene.schedule().into_iter().peekable();
    let dt = 1.0 / scene.frame_rate;
    let frames = (scene.duration * scene.frame_rate).ceil() as u64;

    let mut spreads = 0usize;
    let mut engulfed = 0usize;
    for frame in 0..frames {
        let report = sim.advance(dt);
        spreads += report.spreads.len();
        engulfed += report.convergences.len();
        for c in &report.convergences {
            log::info!("t={:.2}s platform engulfed by {:?}", report.now, c.root);
        }

        // New ignitions go in after the tracker has run for this frame.
        while let Some(trigger) = schedule.next_if(|t| t.at <= sim.now()) {
            match trigger.kind {
                TriggerKind::Ignite => {
                    sim.ignite(trigger.position());
                }
                TriggerKind::Spark => sim.drop_spark(trigger.position()),
            }
        }

        if let Some([min_x, min_y, max_x, max_y]) = scene.view {
            if frame % scene.frame_rate.max(1.0) as u64 == 0 {
                sim.cull_outside(Vec2::new(min_x, min_y), Vec2::new(max_x, max_y));
            }
        }
    }

    log::info!(
        "Ran {:.1}s: {} spreads, {} platforms engulfed, {} groups still burning",
        sim.now(),
        spreads,
        engulfed,
        sim.active_groups().len()
    );
    log::info!(
        "{} live fronts ({} allocated, {} reused)",
        sim.fronts().len(),
        sim.factory().allocated(),
        sim.factory().reused()
    );
    Ok(())
}
