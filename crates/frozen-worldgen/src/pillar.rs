//! Straight column of one block growing up from the origin.

use frozen_voxel::BlockWorld;
use glam::IVec3;
use rand::Rng;
use tracing::trace;

use crate::config::{FeatureConfigError, PillarConfig};
use crate::feature::{Feature, FeaturePlaceContext, Placement};

#[derive(Debug, Clone)]
pub struct PillarFeature {
    config: PillarConfig,
}

impl PillarFeature {
    pub fn new(config: PillarConfig) -> Result<Self, FeatureConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PillarConfig {
        &self.config
    }
}

impl Feature for PillarFeature {
    fn place<W, R>(&self, ctx: FeaturePlaceContext<'_, W, R>) -> Placement
    where
        W: BlockWorld + Send + 'static,
        R: Rng + ?Sized,
    {
        let FeaturePlaceContext {
            world,
            random,
            origin,
            ..
        } = ctx;
        let Some(block) = world.registry().lookup_by_name(&self.config.column_block) else {
            trace!(block = %self.config.column_block, "pillar block is not registered");
            return false.into();
        };

        let height = self.config.height.sample(random);
        let mut placed = false;
        for step in 0..height {
            let cell = origin + IVec3::Y * step;
            let open = world.is_air(cell) || self.config.replaceable.test(&*world, cell);
            if !open || !world.set_block(cell, block) {
                break;
            }
            placed = true;
        }
        placed.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IntProvider;
    use crate::executor::ServerExecutor;
    use frozen_noise::NoiseField;
    use frozen_voxel::{BlockPredicate, BlockRegistry, BlockTags, SparseWorld};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::sync::Arc;

    fn place(feature: &PillarFeature, world: &mut SparseWorld, origin: IVec3) -> Option<bool> {
        let noise = NoiseField::new(0);
        let executor = ServerExecutor::<SparseWorld>::new();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        feature
            .place(FeaturePlaceContext {
                world,
                random: &mut rng,
                origin,
                noise: &noise,
                executor: &executor,
            })
            .placed()
    }

    fn pillar(height: i32) -> PillarFeature {
        PillarFeature::new(PillarConfig {
            column_block: "packed_ice".into(),
            height: IntProvider::Constant(height),
            replaceable: BlockPredicate::Tagged(BlockTags::PLANT | BlockTags::WATER),
        })
        .unwrap()
    }

    #[test]
    fn test_grows_through_air_and_replaceables() {
        let mut world = SparseWorld::new(Arc::new(BlockRegistry::standard()), 0, 64);
        let grass = world.registry().lookup_by_name("short_grass").unwrap();
        world.set_block(IVec3::new(0, 11, 0), grass);

        assert_eq!(place(&pillar(5), &mut world, IVec3::new(0, 10, 0)), Some(true));
        let ice = world.registry().lookup_by_name("packed_ice").unwrap();
        for y in 10..15 {
            assert_eq!(world.block(IVec3::new(0, y, 0)), Some(ice));
        }
        assert_eq!(world.block(IVec3::new(0, 15, 0)), Some(frozen_voxel::BlockId::AIR));
    }

    #[test]
    fn test_stops_at_first_blocker() {
        let mut world = SparseWorld::new(Arc::new(BlockRegistry::standard()), 0, 64);
        let stone = world.registry().lookup_by_name("stone").unwrap();
        world.set_block(IVec3::new(0, 12, 0), stone);

        assert_eq!(place(&pillar(6), &mut world, IVec3::new(0, 10, 0)), Some(true));
        let ice = world.registry().lookup_by_name("packed_ice").unwrap();
        assert_eq!(world.count(ice), 2);
        assert_eq!(world.block(IVec3::new(0, 13, 0)), Some(frozen_voxel::BlockId::AIR));
    }

    #[test]
    fn test_zero_height_places_nothing() {
        let mut world = SparseWorld::new(Arc::new(BlockRegistry::standard()), 0, 64);
        assert_eq!(place(&pillar(0), &mut world, IVec3::new(0, 10, 0)), Some(false));
    }
}
