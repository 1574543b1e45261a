//! The authoritative world: terrain, placed features, deferred work and wind.
//!
//! [`WorldServer`] owns the only mutable [`SparseWorld`]. Features are placed
//! once after terrain generation; large fading disks come back as deferred
//! placements whose tasks run at the start of the following ticks. Every tick
//! also advances the wind simulation against the shared [`NoiseField`].

use std::sync::Arc;

use frozen_config::{Config, ConfigError};
use frozen_math::seed_2d;
use frozen_noise::NoiseField;
use frozen_voxel::{BlockId, BlockPos, BlockRegistry, SparseWorld};
use frozen_wind::{WindReader, WindSimulation};
use frozen_worldgen::{
    ConfiguredFeature, Feature, FeatureConfigError, FeaturePlaceContext, Placement,
    ServerExecutor,
};
use glam::{IVec3, Vec2};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Depth of the dirt layer under the grass surface.
const DIRT_DEPTH: i32 = 3;
/// Depth of the stone layer under the dirt.
const STONE_DEPTH: i32 = 5;
/// Centre and radius of the pond carved into the surface.
const POND_CENTER: (i32, i32) = (16, 16);
const POND_RADIUS: i32 = 6;
/// Fraction of grass cells that grow short grass on top.
const GRASS_DENSITY: f32 = 0.08;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("feature #{index} is invalid: {source}")]
    Feature {
        index: usize,
        #[source]
        source: FeatureConfigError,
    },

    #[error("surface y {surface_y} leaves no room for terrain inside {min_y}..{max_y}")]
    InvalidBounds {
        min_y: i32,
        max_y: i32,
        surface_y: i32,
    },

    #[error("terrain block `{0}` is not registered")]
    MissingBlock(&'static str),
}

/// Running totals for feature placement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlacementStats {
    /// Placements that finished, immediately or after deferral.
    pub finished: usize,
    /// Finished placements that changed at least one block.
    pub placed: usize,
    /// Placements handed to the executor.
    pub deferred: usize,
}

struct PendingPlacement {
    index: usize,
    name: &'static str,
    placement: Placement,
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

pub struct WorldServer {
    config: Config,
    noise: Arc<NoiseField>,
    wind: WindSimulation,
    world: SparseWorld,
    executor: ServerExecutor<SparseWorld>,
    features: Vec<(BlockPos, ConfiguredFeature)>,
    random: ChaCha8Rng,
    pending: Vec<PendingPlacement>,
    stats: PlacementStats,
    tick: u64,
}

impl WorldServer {
    /// Validate `config` and build an empty world. Call
    /// [`generate_terrain`](Self::generate_terrain) and
    /// [`place_features`](Self::place_features) before ticking.
    pub fn new(config: Config) -> Result<Self, ServerError> {
        let world_config = &config.world;
        let terrain_bottom = world_config.surface_y - DIRT_DEPTH - STONE_DEPTH;
        if terrain_bottom < world_config.min_y || world_config.surface_y + 1 >= world_config.max_y
        {
            return Err(ServerError::InvalidBounds {
                min_y: world_config.min_y,
                max_y: world_config.max_y,
                surface_y: world_config.surface_y,
            });
        }

        let features = world_config
            .features
            .iter()
            .enumerate()
            .map(|(index, placed)| {
                placed
                    .feature
                    .clone()
                    .build()
                    .map(|feature| (IVec3::from_array(placed.origin), feature))
                    .map_err(|source| ServerError::Feature { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let registry = Arc::new(BlockRegistry::standard());
        let world = SparseWorld::new(registry, world_config.min_y, world_config.max_y);
        let seed = world_config.seed;
        info!(seed, features = features.len(), "world server created");

        Ok(Self {
            noise: Arc::new(NoiseField::new(seed)),
            wind: WindSimulation::new(),
            world,
            executor: ServerExecutor::new(),
            features,
            random: ChaCha8Rng::seed_from_u64(seed as u64),
            pending: Vec::new(),
            stats: PlacementStats::default(),
            tick: 0,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn world(&self) -> &SparseWorld {
        &self.world
    }

    pub fn noise(&self) -> &Arc<NoiseField> {
        &self.noise
    }

    pub fn wind(&self) -> &WindSimulation {
        &self.wind
    }

    /// A lock-free handle for reading the wind from other threads.
    pub fn wind_reader(&self) -> WindReader {
        self.wind.reader()
    }

    pub fn stats(&self) -> PlacementStats {
        self.stats
    }

    /// Placements still waiting on deferred work.
    pub fn pending_placements(&self) -> usize {
        self.pending.len()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    // -----------------------------------------------------------------------
    // Generation
    // -----------------------------------------------------------------------

    fn block_id(&self, name: &'static str) -> Result<BlockId, ServerError> {
        self.world
            .registry_handle()
            .lookup_by_name(name)
            .ok_or(ServerError::MissingBlock(name))
    }

    /// Lay flat terrain over the configured extent: stone, dirt and a grass
    /// surface, a small pond, and a scattering of short grass.
    pub fn generate_terrain(&mut self) -> Result<usize, ServerError> {
        let stone = self.block_id("stone")?;
        let dirt = self.block_id("dirt")?;
        let grass = self.block_id("grass_block")?;
        let water = self.block_id("water")?;
        let short_grass = self.block_id("short_grass")?;

        let extent = self.config.world.extent;
        let surface = self.config.world.surface_y;
        let seed = self.config.world.seed as f32;
        let mut written = 0;

        written += self.world.fill(
            IVec3::new(-extent, surface - DIRT_DEPTH - STONE_DEPTH, -extent),
            IVec3::new(extent, surface - DIRT_DEPTH - 1, extent),
            stone,
        );
        written += self.world.fill(
            IVec3::new(-extent, surface - DIRT_DEPTH, -extent),
            IVec3::new(extent, surface - 1, extent),
            dirt,
        );

        for x in -extent..=extent {
            for z in -extent..=extent {
                let dx = x - POND_CENTER.0;
                let dz = z - POND_CENTER.1;
                if dx * dx + dz * dz < POND_RADIUS * POND_RADIUS {
                    written += self.world.fill(
                        IVec3::new(x, surface - 1, z),
                        IVec3::new(x, surface, z),
                        water,
                    );
                    continue;
                }
                written += self.world.fill(
                    IVec3::new(x, surface, z),
                    IVec3::new(x, surface, z),
                    grass,
                );
                if seed_2d(Vec2::new(x as f32, z as f32), seed) < GRASS_DENSITY {
                    written += self.world.fill(
                        IVec3::new(x, surface + 1, z),
                        IVec3::new(x, surface + 1, z),
                        short_grass,
                    );
                }
            }
        }

        info!(extent, surface, written, "terrain generated");
        Ok(written)
    }

    /// Place every configured feature once. Deferred placements are tracked
    /// and resolved by later ticks.
    pub fn place_features(&mut self) {
        for (index, (origin, feature)) in self.features.iter().enumerate() {
            let ctx = FeaturePlaceContext {
                world: &mut self.world,
                random: &mut self.random,
                origin: *origin,
                noise: self.noise.as_ref(),
                executor: &self.executor,
            };
            let mut placement = feature.place(ctx);
            let name = feature.name();
            if placement.is_deferred() {
                debug!(index, feature = name, origin = ?origin, "placement deferred");
                self.stats.deferred += 1;
                self.pending.push(PendingPlacement {
                    index,
                    name,
                    placement,
                });
            } else if let Some(placed) = placement.placed() {
                debug!(index, feature = name, placed, "placement finished");
                self.stats.finished += 1;
                if placed {
                    self.stats.placed += 1;
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Ticking
    // -----------------------------------------------------------------------

    /// Run one world tick: drain deferred work, settle finished placements,
    /// and advance the wind.
    pub fn tick(&mut self) {
        self.tick += 1;

        let ran = self.executor.run_pending(&mut self.world);
        if ran > 0 {
            debug!(tick = self.tick, ran, "ran deferred tasks");
        }
        self.settle_pending();

        if self.config.wind.should_simulate(true) {
            self.wind
                .advance(self.noise.as_ref(), self.config.wind.thunder_level);
        }

        let interval = self.config.server.status_interval;
        if interval > 0 && self.tick % interval == 0 {
            let wind = self.wind.wind();
            let cloud = self.wind.cloud_offset();
            info!(
                tick = self.tick,
                wind_x = wind.x,
                wind_y = wind.y,
                wind_z = wind.z,
                cloud_x = cloud.x,
                cloud_z = cloud.z,
                pending = self.pending.len(),
                "status"
            );
        }
    }

    fn settle_pending(&mut self) {
        let stats = &mut self.stats;
        self.pending.retain_mut(|pending| match pending.placement.placed() {
            Some(placed) => {
                debug!(
                    index = pending.index,
                    feature = pending.name,
                    placed,
                    "deferred placement finished"
                );
                stats.finished += 1;
                if placed {
                    stats.placed += 1;
                }
                false
            }
            None => true,
        });
    }

    /// Swap in a reloaded config. A new seed reseeds the noise field in place;
    /// features already placed are not re-run.
    pub fn apply_config(&mut self, config: Config) {
        if config.world.seed != self.config.world.seed {
            self.noise.set_seed(config.world.seed);
        }
        if config.world.features != self.config.world.features {
            warn!("feature list changed; restart to place the new features");
        }
        if config.wind.enabled != self.config.wind.enabled {
            info!(enabled = config.wind.enabled, "wind toggled");
        }
        self.config = config;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frozen_voxel::BlockWorld;
    use frozen_worldgen::{FadingDiskConfig, FeatureConfig, IntProvider, BlockStateProvider};
    use frozen_config::PlacedFeature;

    fn quiet_config(seed: i64) -> Config {
        let mut config = Config::default();
        config.world.seed = seed;
        config.world.extent = 32;
        config.server.status_interval = 0;
        config
    }

    fn ready_server(config: Config) -> WorldServer {
        let mut server = WorldServer::new(config).unwrap();
        server.generate_terrain().unwrap();
        server
    }

    #[test]
    fn test_terrain_layers() {
        let server = ready_server(quiet_config(3));
        let world = server.world();
        let registry = world.registry_handle();
        let name = |pos: IVec3| {
            let id = world.block(pos).unwrap();
            registry.get(id).unwrap().name.clone()
        };
        assert_eq!(name(IVec3::new(0, 64, 0)), "grass_block");
        assert_eq!(name(IVec3::new(0, 63, 0)), "dirt");
        assert_eq!(name(IVec3::new(0, 58, 0)), "stone");
        assert_eq!(name(IVec3::new(16, 64, 16)), "water");
        assert!(world.block(IVec3::new(0, 50, 0)).unwrap().is_air());
    }

    #[test]
    fn test_terrain_is_deterministic_by_seed() {
        let a = ready_server(quiet_config(11));
        let b = ready_server(quiet_config(11));
        let mut cells_a: Vec<_> = a.world().iter().collect();
        let mut cells_b: Vec<_> = b.world().iter().collect();
        cells_a.sort_by_key(|(pos, _)| pos.to_array());
        cells_b.sort_by_key(|(pos, _)| pos.to_array());
        assert_eq!(cells_a, cells_b);
    }

    #[test]
    fn test_invalid_feature_reports_index() {
        let mut config = quiet_config(0);
        let mut disk = match &config.world.features[0].feature {
            FeatureConfig::FadingDisk(disk) => disk.clone(),
            other => panic!("unexpected default feature {other:?}"),
        };
        disk.radius = IntProvider::Constant(0);
        config.world.features.push(PlacedFeature {
            origin: [0, 64, 0],
            feature: FeatureConfig::FadingDisk(disk),
        });
        let index = config.world.features.len() - 1;
        match WorldServer::new(config) {
            Err(ServerError::Feature { index: got, .. }) => assert_eq!(got, index),
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("a zero-radius disk must be rejected"),
        }
    }

    #[test]
    fn test_bounds_are_checked() {
        let mut config = quiet_config(0);
        config.world.surface_y = config.world.min_y + 2;
        assert!(matches!(
            WorldServer::new(config),
            Err(ServerError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn test_deferred_disk_resolves_on_later_tick() {
        let mut config = quiet_config(5);
        let disk = FadingDiskConfig {
            use_height_map_and_not_circular: true,
            inner_state: BlockStateProvider::simple("gravel"),
            outer_state: BlockStateProvider::simple("gravel"),
            radius: IntProvider::Constant(16),
            place_chance: 1.0,
            inner_chance: 1.0,
            ..match &config.world.features[0].feature {
                FeatureConfig::FadingDisk(disk) => disk.clone(),
                other => panic!("unexpected default feature {other:?}"),
            }
        };
        config.world.features = vec![PlacedFeature {
            origin: [0, 64, 0],
            feature: FeatureConfig::FadingDisk(disk),
        }];
        let mut server = ready_server(config);
        server.place_features();

        assert_eq!(server.stats().deferred, 1);
        assert_eq!(server.pending_placements(), 1);
        let gravel = server.block_id("gravel").unwrap();
        assert_eq!(server.world().count(gravel), 0, "nothing placed before the tick");

        server.tick();
        assert_eq!(server.pending_placements(), 0);
        assert_eq!(server.stats().finished, 1);
        assert_eq!(server.stats().placed, 1);
        assert!(server.world().count(gravel) > 0);
    }

    #[test]
    fn test_default_features_all_settle() {
        let mut server = ready_server(quiet_config(8));
        server.place_features();
        let total = server.config().world.features.len();
        for _ in 0..3 {
            server.tick();
        }
        assert_eq!(server.pending_placements(), 0);
        assert_eq!(server.stats().finished, total);
    }

    #[test]
    fn test_tick_advances_wind() {
        let mut server = ready_server(quiet_config(2));
        for _ in 0..10 {
            server.tick();
        }
        assert_eq!(server.tick_count(), 10);
        assert_eq!(server.wind().time(), 10);
        assert_eq!(server.wind_reader().time(), 10);
    }

    #[test]
    fn test_disabled_wind_stays_still() {
        let mut config = quiet_config(2);
        config.wind.enabled = false;
        let mut server = ready_server(config);
        server.tick();
        assert_eq!(server.wind().time(), 0);
    }

    #[test]
    fn test_reload_reseeds_noise_and_keeps_wind_state() {
        let mut server = ready_server(quiet_config(1));
        for _ in 0..5 {
            server.tick();
        }
        let cloud = server.wind().cloud_offset();

        let mut reloaded = server.config().clone();
        reloaded.world.seed = 99;
        server.apply_config(reloaded);

        assert_eq!(server.noise().seed(), 99);
        assert_eq!(server.wind().time(), 5);
        assert_eq!(server.wind().cloud_offset(), cloud);
    }
}
