//! Disk of blocks whose outer ring thins out with distance.
//!
//! Cells inside `radius * inner_percent` may receive the inner state, the
//! middle ring receives the outer state, and the fade ring (at or beyond
//! `radius * start_fade_percent`) receives the outer state on only about half
//! of its rolls.

use std::sync::Arc;

use frozen_voxel::{BlockPos, BlockWorld, closer_than, is_exposed};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::config::{FadingDiskConfig, FeatureConfigError};
use crate::executor::PlacementTicket;
use crate::feature::{Feature, FeaturePlaceContext, Placement};

/// Disks with at least this radius are deferred to the execution context.
pub const DEFERRED_RADIUS: i32 = 15;

/// Zone of a cell relative to the disk center.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiskZone {
    Inner,
    Middle,
    Fade,
}

/// Classify `cell` for a disk of `radius` centred on `center`.
pub fn classify(config: &FadingDiskConfig, center: BlockPos, cell: BlockPos, radius: i32) -> DiskZone {
    // Zone radii are rounded to f32 before comparing, so 10 * 0.3 is exactly 3.
    let radius = radius as f32;
    if closer_than(cell, center, f64::from(radius * config.inner_percent)) {
        DiskZone::Inner
    } else if !closer_than(cell, center, f64::from(radius * config.start_fade_percent)) {
        DiskZone::Fade
    } else {
        DiskZone::Middle
    }
}

#[derive(Debug, Clone)]
pub struct FadingDiskFeature {
    config: Arc<FadingDiskConfig>,
}

impl FadingDiskFeature {
    pub fn new(config: FadingDiskConfig) -> Result<Self, FeatureConfigError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &FadingDiskConfig {
        &self.config
    }
}

impl Feature for FadingDiskFeature {
    fn place<W, R>(&self, ctx: FeaturePlaceContext<'_, W, R>) -> Placement
    where
        W: BlockWorld + Send + 'static,
        R: Rng + ?Sized,
    {
        let FeaturePlaceContext {
            world,
            random,
            origin,
            executor,
            ..
        } = ctx;
        let config = &self.config;

        let center = if config.use_height_map_and_not_circular {
            origin.with_y(world.height(config.heightmap, origin.x, origin.z))
        } else {
            origin
        };
        let radius = config.radius.sample(random);

        if radius < DEFERRED_RADIUS {
            return scan(world, random, config, center, radius).into();
        }

        let mut task_random = ChaCha8Rng::seed_from_u64(random.next_u64());
        let config = Arc::clone(&self.config);
        let (ticket, resolver) = PlacementTicket::new();
        debug!(?center, radius, "deferring fading disk");
        executor.execute(Box::new(move |world: &mut W| {
            let placed = scan(world, &mut task_random, &config, center, radius);
            resolver.resolve(placed);
        }));
        Placement::Deferred(ticket)
    }
}

fn scan<W, R>(
    world: &mut W,
    random: &mut R,
    config: &FadingDiskConfig,
    center: BlockPos,
    radius: i32,
) -> bool
where
    W: BlockWorld + ?Sized,
    R: Rng + ?Sized,
{
    let radius_sq = radius * radius;
    let mut placed = false;

    for x in center.x - radius..=center.x + radius {
        for z in center.z - radius..=center.z + radius {
            let dx = center.x - x;
            let dz = center.z - z;
            if config.use_height_map_and_not_circular {
                if dx * dx + dz * dz < radius_sq {
                    let cell = BlockPos::new(x, world.height(config.heightmap, x, z) - 1, z);
                    placed |= place_cell(world, random, config, center, cell, radius);
                }
            } else {
                for y in center.y - radius..=center.y + radius {
                    let dy = center.y - y;
                    if dx * dx + dy * dy + dz * dz < radius_sq {
                        let cell = BlockPos::new(x, y, z);
                        if is_exposed(&*world, cell) {
                            placed |= place_cell(world, random, config, center, cell, radius);
                        }
                    }
                }
            }
        }
    }
    placed
}

fn place_cell<W, R>(
    world: &mut W,
    random: &mut R,
    config: &FadingDiskConfig,
    center: BlockPos,
    cell: BlockPos,
    radius: i32,
) -> bool
where
    W: BlockWorld + ?Sized,
    R: Rng + ?Sized,
{
    let zone = classify(config, center, cell, radius);
    if random.random::<f32>() >= config.place_chance {
        return false;
    }

    let chose_inner = match zone {
        DiskZone::Fade => {
            if random.random::<f32>() > 0.5 && config.outer_replaceable.test(&*world, cell) {
                return set_state(world, random, config, cell, false);
            }
            return false;
        }
        DiskZone::Inner => random.random::<f32>() < config.inner_chance,
        DiskZone::Middle => false,
    };

    let replaceable = if chose_inner {
        &config.inner_replaceable
    } else {
        &config.outer_replaceable
    };
    if replaceable.test(&*world, cell) {
        set_state(world, random, config, cell, chose_inner)
    } else {
        false
    }
}

fn set_state<W, R>(
    world: &mut W,
    random: &mut R,
    config: &FadingDiskConfig,
    cell: BlockPos,
    inner: bool,
) -> bool
where
    W: BlockWorld + ?Sized,
    R: Rng + ?Sized,
{
    let provider = if inner {
        &config.inner_state
    } else {
        &config.outer_state
    };
    match provider.state(world.registry(), random) {
        Some(block) => {
            world.set_block(cell, block);
            true
        }
        None => {
            trace!(?cell, ?provider, "disk state does not resolve to a block");
            false
        }
    }
}
