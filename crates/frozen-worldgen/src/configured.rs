//! Serializable feature definitions and their built, ready-to-place form.

use frozen_voxel::BlockWorld;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{FadingDiskConfig, FeatureConfigError, PathConfig, PathSwapUnderWaterConfig, PillarConfig};
use crate::fading_disk::FadingDiskFeature;
use crate::feature::{Feature, FeaturePlaceContext, Placement};
use crate::noise_path::NoisePathFeature;
use crate::noise_plant::NoisePlantFeature;
use crate::path_swap::PathSwapUnderWaterFeature;
use crate::pillar::PillarFeature;

/// A feature kind together with its configuration, as written in RON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FeatureConfig {
    FadingDisk(FadingDiskConfig),
    NoisePlant(PathConfig),
    NoisePath(PathConfig),
    PathSwapUnderWater(PathSwapUnderWaterConfig),
    Pillar(PillarConfig),
}

impl FeatureConfig {
    /// Validate and build the feature.
    pub fn build(self) -> Result<ConfiguredFeature, FeatureConfigError> {
        Ok(match self {
            FeatureConfig::FadingDisk(c) => ConfiguredFeature::FadingDisk(FadingDiskFeature::new(c)?),
            FeatureConfig::NoisePlant(c) => ConfiguredFeature::NoisePlant(NoisePlantFeature::new(c)?),
            FeatureConfig::NoisePath(c) => ConfiguredFeature::NoisePath(NoisePathFeature::new(c)?),
            FeatureConfig::PathSwapUnderWater(c) => {
                ConfiguredFeature::PathSwapUnderWater(PathSwapUnderWaterFeature::new(c)?)
            }
            FeatureConfig::Pillar(c) => ConfiguredFeature::Pillar(PillarFeature::new(c)?),
        })
    }
}

/// A validated feature of any kind.
#[derive(Clone, Debug)]
pub enum ConfiguredFeature {
    FadingDisk(FadingDiskFeature),
    NoisePlant(NoisePlantFeature),
    NoisePath(NoisePathFeature),
    PathSwapUnderWater(PathSwapUnderWaterFeature),
    Pillar(PillarFeature),
}

impl ConfiguredFeature {
    pub fn name(&self) -> &'static str {
        match self {
            ConfiguredFeature::FadingDisk(_) => "fading_disk",
            ConfiguredFeature::NoisePlant(_) => "noise_plant",
            ConfiguredFeature::NoisePath(_) => "noise_path",
            ConfiguredFeature::PathSwapUnderWater(_) => "path_swap_under_water",
            ConfiguredFeature::Pillar(_) => "pillar",
        }
    }
}

impl Feature for ConfiguredFeature {
    fn place<W, R>(&self, ctx: FeaturePlaceContext<'_, W, R>) -> Placement
    where
        W: BlockWorld + Send + 'static,
        R: Rng + ?Sized,
    {
        match self {
            ConfiguredFeature::FadingDisk(f) => f.place(ctx),
            ConfiguredFeature::NoisePlant(f) => f.place(ctx),
            ConfiguredFeature::NoisePath(f) => f.place(ctx),
            ConfiguredFeature::PathSwapUnderWater(f) => f.place(ctx),
            ConfiguredFeature::Pillar(f) => f.place(ctx),
        }
    }
}
