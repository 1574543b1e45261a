//! Placement features: neighbourhood scans that classify cells around an origin
//! and conditionally replace them.
//!
//! Every feature draws its rolls from the caller's random source and reads noise
//! from a shared [`frozen_noise::NoiseField`]. Fading disks of radius
//! [`DEFERRED_RADIUS`] or more are handed to an [`ExecutionContext`] and return
//! a [`PlacementTicket`] instead of a result.

pub mod config;
pub mod configured;
pub mod executor;
pub mod fading_disk;
pub mod feature;
pub mod noise_path;
pub mod noise_plant;
pub mod path_swap;
pub mod pillar;

pub use config::{
    BlockStateProvider, FadingDiskConfig, FeatureConfigError, IntProvider, MAX_RADIUS, PathConfig,
    PathSwapUnderWaterConfig, PillarConfig, WeightedBlock,
};
pub use configured::{ConfiguredFeature, FeatureConfig};
pub use executor::{
    DeferredTask, ExecutionContext, ExecutorHandle, PlacementTicket, ServerExecutor,
    TicketResolver, TicketStatus,
};
pub use fading_disk::{DEFERRED_RADIUS, DiskZone, FadingDiskFeature, classify};
pub use feature::{Feature, FeaturePlaceContext, Placement};
pub use noise_path::NoisePathFeature;
pub use noise_plant::NoisePlantFeature;
pub use path_swap::PathSwapUnderWaterFeature;
pub use pillar::PillarFeature;
