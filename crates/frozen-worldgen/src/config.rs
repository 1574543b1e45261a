//! Feature configurations, value providers and their validation.
//!
//! Every config derives serde so it can be written in RON. Configs are checked
//! once by `validate` when a feature is built; out-of-range values are
//! rejected, never clamped.

use frozen_noise::NoiseVariant;
use frozen_voxel::{BlockId, BlockPredicate, BlockRegistry, Heightmap};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest radius a disk or noise path scan accepts.
pub const MAX_RADIUS: i32 = 64;
/// Accepted range of noise coordinate multipliers.
pub const MULTIPLIER_RANGE: std::ops::RangeInclusive<f64> = 0.0001..=128.0;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Rejected feature configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureConfigError {
    #[error("radius {0} is outside 1..=64")]
    RadiusOutOfRange(i32),
    #[error("radius provider can yield {0}, radius must be positive")]
    NonPositiveRadius(i32),
    #[error("height provider can yield {0}, height must not be negative")]
    NegativeHeight(i32),
    #[error("int provider range is inverted: {min} > {max}")]
    InvertedRange { min: i32, max: i32 },
    #[error("zone percents must satisfy 0 <= inner ({inner}) < start_fade ({start_fade}) <= 1")]
    ZoneOrder { inner: f32, start_fade: f32 },
    #[error("{name} must be in [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f32 },
    #[error("noise multiplier {0} is outside 0.0001..=128")]
    MultiplierOutOfRange(f64),
    #[error("{name} threshold must be in [-1, 1], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },
    #[error("threshold band is inverted: min {min} > max {max}")]
    InvertedThresholds { min: f64, max: f64 },
    #[error("weighted block provider has no positive weights")]
    EmptyProvider,
    #[error(transparent)]
    NoiseSelector(#[from] frozen_noise::NoiseVariantError),
}

fn check_probability(name: &'static str, value: f32) -> Result<(), FeatureConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(FeatureConfigError::ProbabilityOutOfRange { name, value })
    }
}

fn check_threshold(name: &'static str, value: f64) -> Result<(), FeatureConfigError> {
    if (-1.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(FeatureConfigError::ThresholdOutOfRange { name, value })
    }
}

// ---------------------------------------------------------------------------
// Providers
// ---------------------------------------------------------------------------

/// Integer drawn per placement (radius, height).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntProvider {
    Constant(i32),
    /// Uniform over `min_inclusive..=max_inclusive`.
    Uniform { min_inclusive: i32, max_inclusive: i32 },
    /// Skewed toward `min_inclusive`.
    BiasedToBottom { min_inclusive: i32, max_inclusive: i32 },
}

impl IntProvider {
    /// Draw one value from `random`. Constants draw nothing.
    pub fn sample<R: Rng + ?Sized>(&self, random: &mut R) -> i32 {
        match *self {
            IntProvider::Constant(value) => value,
            IntProvider::Uniform {
                min_inclusive,
                max_inclusive,
            } => random.random_range(min_inclusive..=max_inclusive),
            IntProvider::BiasedToBottom {
                min_inclusive,
                max_inclusive,
            } => {
                let spread = random.random_range(0..=max_inclusive - min_inclusive);
                min_inclusive + random.random_range(0..=spread)
            }
        }
    }

    /// Smallest value [`sample`](Self::sample) can return.
    pub fn min_value(&self) -> i32 {
        match *self {
            IntProvider::Constant(value) => value,
            IntProvider::Uniform { min_inclusive, .. }
            | IntProvider::BiasedToBottom { min_inclusive, .. } => min_inclusive,
        }
    }

    /// Largest value [`sample`](Self::sample) can return.
    pub fn max_value(&self) -> i32 {
        match *self {
            IntProvider::Constant(value) => value,
            IntProvider::Uniform { max_inclusive, .. }
            | IntProvider::BiasedToBottom { max_inclusive, .. } => max_inclusive,
        }
    }

    fn validate(&self) -> Result<(), FeatureConfigError> {
        let (min, max) = (self.min_value(), self.max_value());
        if min > max {
            return Err(FeatureConfigError::InvertedRange { min, max });
        }
        Ok(())
    }
}

/// One entry of a weighted provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedBlock {
    pub block: String,
    pub weight: u32,
}

/// Chooses the block a feature places.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockStateProvider {
    Simple(String),
    Weighted(Vec<WeightedBlock>),
}

impl BlockStateProvider {
    /// Always place the block named `name`.
    pub fn simple(name: impl Into<String>) -> Self {
        BlockStateProvider::Simple(name.into())
    }

    /// Pick a block and resolve it against `registry`. Unknown names yield
    /// `None`. Only the weighted form draws from `random`.
    pub fn state<R: Rng + ?Sized>(
        &self,
        registry: &BlockRegistry,
        random: &mut R,
    ) -> Option<BlockId> {
        match self {
            BlockStateProvider::Simple(name) => registry.lookup_by_name(name),
            BlockStateProvider::Weighted(entries) => {
                let total: u64 = entries.iter().map(|e| u64::from(e.weight)).sum();
                if total == 0 {
                    return None;
                }
                let mut roll = random.random_range(0..total);
                for entry in entries {
                    let weight = u64::from(entry.weight);
                    if roll < weight {
                        return registry.lookup_by_name(&entry.block);
                    }
                    roll -= weight;
                }
                None
            }
        }
    }

    fn validate(&self) -> Result<(), FeatureConfigError> {
        match self {
            BlockStateProvider::Simple(_) => Ok(()),
            BlockStateProvider::Weighted(entries) => {
                if entries.iter().any(|e| e.weight > 0) {
                    Ok(())
                } else {
                    Err(FeatureConfigError::EmptyProvider)
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Fading disk
// ---------------------------------------------------------------------------

/// Configuration of the fading disk feature.
///
/// Cells closer than `radius * inner_percent` form the inner zone, cells at
/// least `radius * start_fade_percent` away form the fade zone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FadingDiskConfig {
    /// Flat disk on the heightmap surface instead of an exposed-cell sphere.
    pub use_height_map_and_not_circular: bool,
    #[serde(default = "default_disk_heightmap")]
    pub heightmap: Heightmap,
    pub inner_state: BlockStateProvider,
    pub outer_state: BlockStateProvider,
    pub radius: IntProvider,
    pub place_chance: f32,
    pub inner_chance: f32,
    pub inner_percent: f32,
    pub start_fade_percent: f32,
    pub inner_replaceable: BlockPredicate,
    pub outer_replaceable: BlockPredicate,
}

fn default_disk_heightmap() -> Heightmap {
    Heightmap::OceanFloor
}

impl FadingDiskConfig {
    /// Check the radius range, chances and zone ordering.
    pub fn validate(&self) -> Result<(), FeatureConfigError> {
        self.radius.validate()?;
        let min_radius = self.radius.min_value();
        if min_radius <= 0 {
            return Err(FeatureConfigError::NonPositiveRadius(min_radius));
        }
        let max_radius = self.radius.max_value();
        if max_radius > MAX_RADIUS {
            return Err(FeatureConfigError::RadiusOutOfRange(max_radius));
        }
        check_probability("place_chance", self.place_chance)?;
        check_probability("inner_chance", self.inner_chance)?;
        let (inner, start_fade) = (self.inner_percent, self.start_fade_percent);
        if !(0.0 <= inner && inner < start_fade && start_fade <= 1.0) {
            return Err(FeatureConfigError::ZoneOrder { inner, start_fade });
        }
        self.inner_state.validate()?;
        self.outer_state.validate()
    }
}

// ---------------------------------------------------------------------------
// Noise paths
// ---------------------------------------------------------------------------

fn default_path_radius() -> i32 {
    10
}

fn default_multiplier() -> f64 {
    0.05
}

fn default_min_thresh() -> f64 {
    0.2
}

fn default_max_thresh() -> f64 {
    1.0
}

/// Shared configuration of the noise-driven path and plant features.
///
/// A cell is selected when `min_thresh < sample < max_thresh`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathConfig {
    pub path_block: BlockStateProvider,
    #[serde(default = "default_path_radius")]
    pub radius: i32,
    #[serde(default)]
    pub noise: NoiseVariant,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    #[serde(default = "default_min_thresh")]
    pub min_thresh: f64,
    #[serde(default = "default_max_thresh")]
    pub max_thresh: f64,
    #[serde(default)]
    pub use_y: bool,
    #[serde(default)]
    pub multiply_y: bool,
    #[serde(default)]
    pub is_3d: bool,
    #[serde(default)]
    pub only_exposed: bool,
    pub replaceable: BlockPredicate,
}

impl PathConfig {
    /// A config with the stock defaults placing `path_block` over `replaceable`.
    pub fn new(path_block: BlockStateProvider, replaceable: BlockPredicate) -> Self {
        Self {
            path_block,
            radius: default_path_radius(),
            noise: NoiseVariant::default(),
            multiplier: default_multiplier(),
            min_thresh: default_min_thresh(),
            max_thresh: default_max_thresh(),
            use_y: false,
            multiply_y: false,
            is_3d: false,
            only_exposed: false,
            replaceable,
        }
    }

    /// Select the noise generator by its numeric selector.
    pub fn with_noise_selector(mut self, selector: u8) -> Result<Self, FeatureConfigError> {
        self.noise = NoiseVariant::try_from(selector)?;
        Ok(self)
    }

    /// Check the radius, multiplier and threshold band.
    pub fn validate(&self) -> Result<(), FeatureConfigError> {
        if !(1..=MAX_RADIUS).contains(&self.radius) {
            return Err(FeatureConfigError::RadiusOutOfRange(self.radius));
        }
        if !MULTIPLIER_RANGE.contains(&self.multiplier) {
            return Err(FeatureConfigError::MultiplierOutOfRange(self.multiplier));
        }
        check_threshold("min", self.min_thresh)?;
        check_threshold("max", self.max_thresh)?;
        if self.min_thresh > self.max_thresh {
            return Err(FeatureConfigError::InvertedThresholds {
                min: self.min_thresh,
                max: self.max_thresh,
            });
        }
        self.path_block.validate()
    }

    /// Whether `sample` falls strictly inside the threshold band.
    pub fn in_band(&self, sample: f64) -> bool {
        sample > self.min_thresh && sample < self.max_thresh
    }
}

/// Path that switches to `water_path_block` under water.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathSwapUnderWaterConfig {
    pub water_path_block: BlockStateProvider,
    pub path: PathConfig,
}

impl PathSwapUnderWaterConfig {
    /// Check the path config and the underwater block.
    pub fn validate(&self) -> Result<(), FeatureConfigError> {
        self.path.validate()?;
        self.water_path_block.validate()
    }
}

// ---------------------------------------------------------------------------
// Pillar
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PillarConfig {
    pub column_block: String,
    pub height: IntProvider,
    pub replaceable: BlockPredicate,
}

impl PillarConfig {
    /// Check that the height range is ordered and never negative.
    pub fn validate(&self) -> Result<(), FeatureConfigError> {
        self.height.validate()?;
        let min_height = self.height.min_value();
        if min_height < 0 {
            return Err(FeatureConfigError::NegativeHeight(min_height));
        }
        Ok(())
    }
}
