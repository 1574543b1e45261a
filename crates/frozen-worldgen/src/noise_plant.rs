//! Plants scattered on dirt where the noise falls inside a band.

use frozen_noise::sample_at;
use frozen_voxel::{BlockTags, BlockWorld, Heightmap};
use glam::IVec3;
use rand::Rng;
use tracing::trace;

use crate::config::{FeatureConfigError, PathConfig};
use crate::feature::{Feature, FeaturePlaceContext, Placement};

/// Places `path_block` on the first free cell of each column in the radius
/// when the noise sample is inside the band and the ground below is dirt.
#[derive(Debug, Clone)]
pub struct NoisePlantFeature {
    config: PathConfig,
}

impl NoisePlantFeature {
    pub fn new(config: PathConfig) -> Result<Self, FeatureConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PathConfig {
        &self.config
    }
}

impl Feature for NoisePlantFeature {
    fn place<W, R>(&self, ctx: FeaturePlaceContext<'_, W, R>) -> Placement
    where
        W: BlockWorld + Send + 'static,
        R: Rng + ?Sized,
    {
        let FeaturePlaceContext {
            world,
            random,
            origin,
            noise,
            ..
        } = ctx;
        let config = &self.config;
        let bundle = noise.snapshot();
        let sampler = bundle.generator(config.noise);
        let radius = config.radius;
        let radius_sq = radius * radius;
        let mut placed = false;

        for x in origin.x - radius..=origin.x + radius {
            for z in origin.z - radius..=origin.z + radius {
                let dx = origin.x - x;
                let dz = origin.z - z;
                if dx * dx + dz * dz >= radius_sq {
                    continue;
                }
                let cell = IVec3::new(x, world.height(Heightmap::OceanFloor, x, z), z);
                let sample =
                    sample_at(sampler, cell, config.multiplier, config.multiply_y, config.use_y);
                if config.in_band(sample)
                    && config.replaceable.test(&*world, cell)
                    && world.has_tag(cell - IVec3::Y, BlockTags::DIRT)
                {
                    match config.path_block.state(world.registry(), random) {
                        Some(block) => {
                            world.set_block(cell, block);
                            placed = true;
                        }
                        None => trace!(?cell, "plant state does not resolve to a block"),
                    }
                }
            }
        }
        placed.into()
    }
}
