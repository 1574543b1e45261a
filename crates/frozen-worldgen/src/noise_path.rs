//! Noise-thresholded paths, flat on the ocean floor or carved through a sphere.

use frozen_noise::{ImprovedNoise, sample_at};
use frozen_voxel::{BlockPos, BlockTags, BlockWorld, Heightmap, is_exposed};
use glam::IVec3;
use rand::Rng;
use tracing::trace;

use crate::config::{BlockStateProvider, FeatureConfigError, PathConfig};
use crate::feature::{Feature, FeaturePlaceContext, Placement};

#[derive(Debug, Clone)]
pub struct NoisePathFeature {
    config: PathConfig,
}

impl NoisePathFeature {
    pub fn new(config: PathConfig) -> Result<Self, FeatureConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PathConfig {
        &self.config
    }
}

impl Feature for NoisePathFeature {
    fn place<W, R>(&self, ctx: FeaturePlaceContext<'_, W, R>) -> Placement
    where
        W: BlockWorld + Send + 'static,
        R: Rng + ?Sized,
    {
        let bundle = ctx.noise.snapshot();
        let noise = bundle.generator(self.config.noise);
        scan_path(ctx.world, ctx.random, noise, &self.config, ctx.origin, None).into()
    }
}

/// Scan the path area around `origin` and place blocks on matching cells.
///
/// When `water_block` is given it replaces the path block on cells whose upper
/// neighbour holds water.
pub(crate) fn scan_path<W, R>(
    world: &mut W,
    random: &mut R,
    noise: &ImprovedNoise,
    config: &PathConfig,
    origin: BlockPos,
    water_block: Option<&BlockStateProvider>,
) -> bool
where
    W: BlockWorld + ?Sized,
    R: Rng + ?Sized,
{
    let radius = config.radius;
    let radius_sq = radius * radius;
    let mut placed = false;

    for x in origin.x - radius..=origin.x + radius {
        for z in origin.z - radius..=origin.z + radius {
            let dx = origin.x - x;
            let dz = origin.z - z;
            if !config.is_3d {
                if dx * dx + dz * dz < radius_sq {
                    let cell = IVec3::new(x, world.height(Heightmap::OceanFloor, x, z) - 1, z);
                    if selects(world, noise, config, cell) {
                        placed |= place_path(world, random, config, cell, water_block);
                    }
                }
                continue;
            }
            for y in origin.y - radius..=origin.y + radius {
                let dy = origin.y - y;
                if dx * dx + dy * dy + dz * dz < radius_sq {
                    let cell = IVec3::new(x, y, z);
                    if selects(world, noise, config, cell)
                        && (!config.only_exposed || is_exposed(&*world, cell))
                    {
                        placed |= place_path(world, random, config, cell, water_block);
                    }
                }
            }
        }
    }
    placed
}

fn selects<W: BlockWorld + ?Sized>(
    world: &W,
    noise: &ImprovedNoise,
    config: &PathConfig,
    cell: BlockPos,
) -> bool {
    let sample = sample_at(noise, cell, config.multiplier, config.multiply_y, config.use_y);
    config.in_band(sample) && config.replaceable.test(world, cell)
}

fn place_path<W, R>(
    world: &mut W,
    random: &mut R,
    config: &PathConfig,
    cell: BlockPos,
    water_block: Option<&BlockStateProvider>,
) -> bool
where
    W: BlockWorld + ?Sized,
    R: Rng + ?Sized,
{
    let provider = match water_block {
        Some(water) if world.has_tag(cell + IVec3::Y, BlockTags::WATER) => water,
        _ => &config.path_block,
    };
    match provider.state(world.registry(), random) {
        Some(block) => world.set_block(cell, block),
        None => {
            trace!(?cell, ?provider, "path state does not resolve to a block");
            false
        }
    }
}
