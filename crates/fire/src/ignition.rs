//! Ignition source: direct ignitions and short-lived sparks.
//!
//! `ignite` lights a root where it is told to. A spark instead glows for its
//! lifetime and then searches a small radius for terrain; the root appears on
//! the nearest surface point, oriented to that surface.

use engine_core::Vec3;
use physics::{LayerMask, TerrainQuery};

/// Request to light a bidirectional root front.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ignition {
    pub position: Vec3,
    /// Local up of the new root.
    pub up: Vec3,
}

/// A spark waiting to land.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spark {
    pub position: Vec3,
    pub radius: f32,
    /// Simulation time after which the spark tries to light a fire.
    pub dies_at: f32,
}

/// Issues ignition requests. Holds no fire state beyond pending sparks.
#[derive(Debug, Default)]
pub struct IgnitionSource {
    sparks: Vec<Spark>,
}

impl IgnitionSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root request at `position` with default (world up) orientation.
    pub fn ignite(&self, position: Vec3) -> Ignition {
        Ignition {
            position,
            up: Vec3::Y,
        }
    }

    /// Drop a spark that lives until `now + lifetime`.
    pub fn drop_spark(&mut self, position: Vec3, now: f32, lifetime: f32, radius: f32) {
        self.sparks.push(Spark {
            position,
            radius,
            dies_at: now + lifetime,
        });
    }

    pub fn sparks(&self) -> &[Spark] {
        &self.sparks
    }

    /// Burn out every spark past its lifetime. Sparks that find terrain within
    /// their radius become ignitions; the rest fizzle.
    pub fn update<Q: TerrainQuery + ?Sized>(
        &mut self,
        now: f32,
        terrain: &Q,
        mask: LayerMask,
    ) -> Vec<Ignition> {
        let mut ignitions = Vec::new();
        self.sparks.retain(|spark| {
            if now <= spark.dies_at {
                return true;
            }
            match terrain.probe_area(spark.position, spark.radius, mask) {
                Some(hit) => ignitions.push(Ignition {
                    position: hit.point,
                    up: hit.normal,
                }),
                None => log::debug!("Spark at {:?} fizzled with no terrain nearby", spark.position),
            }
            false
        });
        ignitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use physics::{ColliderHandle, SurfaceHit};

    /// A single wall face at x = 0 facing +X.
    struct Wall;

    impl TerrainQuery for Wall {
        fn probe_ahead(&self, _: Vec3, _: Vec3, _: f32, _: LayerMask) -> Option<SurfaceHit> {
            None
        }

        fn probe_downward(&self, _: Vec3, _: Vec3, _: f32, _: LayerMask) -> Option<SurfaceHit> {
            None
        }

        fn probe_area(&self, center: Vec3, radius: f32, _: LayerMask) -> Option<SurfaceHit> {
            (center.x <= radius).then(|| SurfaceHit {
                point: Vec3::new(0.0, center.y, 0.0),
                normal: Vec3::X,
                distance: center.x.max(0.0),
                collider: ColliderHandle::invalid(),
            })
        }
    }

    #[test]
    fn ignite_uses_world_up() {
        let source = IgnitionSource::new();
        let ignition = source.ignite(Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(ignition.position, Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(ignition.up, Vec3::Y);
    }

    #[test]
    fn spark_waits_out_lifetime() {
        let mut source = IgnitionSource::new();
        source.drop_spark(Vec3::new(0.5, 3.0, 0.0), 0.0, 1.0, 1.0);
        assert!(source.update(0.5, &Wall, LayerMask::TERRAIN).is_empty());
        assert!(source.update(1.0, &Wall, LayerMask::TERRAIN).is_empty());
        assert_eq!(source.sparks().len(), 1);

        let lit = source.update(1.25, &Wall, LayerMask::TERRAIN);
        assert_eq!(
            lit,
            vec![Ignition {
                position: Vec3::new(0.0, 3.0, 0.0),
                up: Vec3::X
            }]
        );
        assert!(source.sparks().is_empty());
    }

    #[test]
    fn spark_out_of_reach_fizzles() {
        let mut source = IgnitionSource::new();
        source.drop_spark(Vec3::new(5.0, 0.0, 0.0), 0.0, 0.5, 1.0);
        source.drop_spark(Vec3::new(0.2, 0.0, 0.0), 0.0, 2.0, 1.0);
        assert!(source.update(1.0, &Wall, LayerMask::TERRAIN).is_empty());
        // Only the long-lived spark is left.
        assert_eq!(source.sparks().len(), 1);
        assert_eq!(source.sparks()[0].dies_at, 2.0);
    }
}
