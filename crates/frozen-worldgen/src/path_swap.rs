//! Noise path that switches block under water.

use frozen_voxel::BlockWorld;
use rand::Rng;

use crate::config::{FeatureConfigError, PathSwapUnderWaterConfig};
use crate::feature::{Feature, FeaturePlaceContext, Placement};
use crate::noise_path::scan_path;

#[derive(Debug, Clone)]
pub struct PathSwapUnderWaterFeature {
    config: PathSwapUnderWaterConfig,
}

impl PathSwapUnderWaterFeature {
    pub fn new(config: PathSwapUnderWaterConfig) -> Result<Self, FeatureConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PathSwapUnderWaterConfig {
        &self.config
    }
}

impl Feature for PathSwapUnderWaterFeature {
    fn place<W, R>(&self, ctx: FeaturePlaceContext<'_, W, R>) -> Placement
    where
        W: BlockWorld + Send + 'static,
        R: Rng + ?Sized,
    {
        let bundle = ctx.noise.snapshot();
        let noise = bundle.generator(self.config.path.noise);
        scan_path(
            ctx.world,
            ctx.random,
            noise,
            &self.config.path,
            ctx.origin,
            Some(&self.config.water_path_block),
        )
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BlockStateProvider, PathConfig};
    use crate::executor::ServerExecutor;
    use frozen_noise::NoiseField;
    use frozen_voxel::{BlockPredicate, BlockRegistry, BlockTags, SparseWorld};
    use glam::IVec3;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::sync::Arc;

    #[test]
    fn test_underwater_cells_get_water_block() {
        let mut world = SparseWorld::new(Arc::new(BlockRegistry::standard()), 0, 32);
        let dirt = world.registry().lookup_by_name("dirt").unwrap();
        let water = world.registry().lookup_by_name("water").unwrap();
        world.fill(IVec3::new(-6, 0, -6), IVec3::new(6, 4, 6), dirt);
        // West half flooded.
        world.fill(IVec3::new(-6, 5, -6), IVec3::new(-1, 7, 6), water);

        let mut path = PathConfig::new(
            BlockStateProvider::simple("dirt_path"),
            BlockPredicate::Tagged(BlockTags::DIRT),
        );
        path.radius = 5;
        path.min_thresh = -1.0;
        let feature = PathSwapUnderWaterFeature::new(PathSwapUnderWaterConfig {
            water_path_block: BlockStateProvider::simple("gravel"),
            path,
        })
        .unwrap();

        let noise = NoiseField::new(1);
        let executor = ServerExecutor::<SparseWorld>::new();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut placement = feature.place(FeaturePlaceContext {
            world: &mut world,
            random: &mut rng,
            origin: IVec3::new(0, 5, 0),
            noise: &noise,
            executor: &executor,
        });
        assert_eq!(placement.placed(), Some(true));

        let gravel = world.registry().lookup_by_name("gravel").unwrap();
        let dirt_path = world.registry().lookup_by_name("dirt_path").unwrap();
        assert_eq!(world.block(IVec3::new(-2, 4, 0)), Some(gravel));
        assert_eq!(world.block(IVec3::new(2, 4, 0)), Some(dirt_path));
    }
}
