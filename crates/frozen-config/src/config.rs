//! Configuration structs with defaults and RON persistence.

use std::path::Path;

use frozen_voxel::{BlockPredicate, BlockTags, Heightmap};
use frozen_worldgen::{
    BlockStateProvider, FadingDiskConfig, FeatureConfig, IntProvider, PathConfig,
    PathSwapUnderWaterConfig, PillarConfig,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub world: WorldConfig,
    pub wind: WindConfig,
    pub server: ServerConfig,
    pub debug: DebugConfig,
}

/// World generation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Noise seed. Changing it reseeds every noise generator.
    pub seed: i64,
    /// Lowest loaded y (inclusive).
    pub min_y: i32,
    /// Highest loaded y (exclusive).
    pub max_y: i32,
    /// Half-width of the generated terrain square, in blocks.
    pub extent: i32,
    /// Y of the top terrain layer.
    pub surface_y: i32,
    /// Features placed once after the terrain is generated.
    pub features: Vec<PlacedFeature>,
}

/// A feature and the origin it is placed at.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlacedFeature {
    pub origin: [i32; 3],
    pub feature: FeatureConfig,
}

/// Wind simulation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindConfig {
    /// Advance the wind every tick.
    pub enabled: bool,
    /// Keep simulating wind locally when the remote server does not send it.
    pub use_wind_on_non_frozenlib_servers: bool,
    /// Thunder level in [0, 1] fed to the wind each tick.
    pub thunder_level: f64,
}

/// Tick loop settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub ticks_per_second: u32,
    /// Stop after this many ticks. 0 runs until interrupted.
    pub max_ticks: u64,
    /// Log a status line every this many ticks. 0 disables it.
    pub status_interval: u64,
}

/// Debug/development settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Also write JSON logs to the log directory.
    pub log_to_file: bool,
}

// --- Default implementations ---

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            min_y: -64,
            max_y: 320,
            extent: 48,
            surface_y: 64,
            features: default_features(),
        }
    }
}

impl WindConfig {
    /// Whether the wind should be simulated when connected to a server that
    /// does (or does not) run FrozenLib itself.
    pub fn should_simulate(&self, server_has_frozenlib: bool) -> bool {
        self.enabled && (server_has_frozenlib || self.use_wind_on_non_frozenlib_servers)
    }
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            use_wind_on_non_frozenlib_servers: true,
            thunder_level: 0.0,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: 20,
            max_ticks: 0,
            status_interval: 100,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: cfg!(debug_assertions),
        }
    }
}

fn default_features() -> Vec<PlacedFeature> {
    let dirt = BlockPredicate::Tagged(BlockTags::DIRT);
    let mud_disk = FadingDiskConfig {
        use_height_map_and_not_circular: true,
        heightmap: Heightmap::OceanFloor,
        inner_state: BlockStateProvider::simple("mud"),
        outer_state: BlockStateProvider::simple("packed_mud"),
        radius: IntProvider::Uniform {
            min_inclusive: 5,
            max_inclusive: 9,
        },
        place_chance: 0.85,
        inner_chance: 0.6,
        inner_percent: 0.3,
        start_fade_percent: 0.7,
        inner_replaceable: dirt.clone(),
        outer_replaceable: dirt.clone(),
    };
    let gravel_disk = FadingDiskConfig {
        inner_state: BlockStateProvider::simple("gravel"),
        outer_state: BlockStateProvider::simple("coarse_dirt"),
        radius: IntProvider::Constant(18),
        ..mud_disk.clone()
    };
    let mut ferns = PathConfig::new(BlockStateProvider::simple("fern"), BlockPredicate::Air);
    ferns.radius = 16;
    ferns.min_thresh = 0.25;
    ferns.multiplier = 0.11;
    let mut trail = PathConfig::new(
        BlockStateProvider::simple("dirt_path"),
        BlockPredicate::blocks(["grass_block"]),
    );
    trail.min_thresh = -0.05;
    trail.max_thresh = 0.05;

    vec![
        PlacedFeature {
            origin: [0, 64, 0],
            feature: FeatureConfig::FadingDisk(mud_disk),
        },
        PlacedFeature {
            origin: [-24, 64, 20],
            feature: FeatureConfig::FadingDisk(gravel_disk),
        },
        PlacedFeature {
            origin: [20, 64, -20],
            feature: FeatureConfig::NoisePlant(ferns),
        },
        PlacedFeature {
            origin: [16, 64, 16],
            feature: FeatureConfig::PathSwapUnderWater(PathSwapUnderWaterConfig {
                water_path_block: BlockStateProvider::simple("gravel"),
                path: trail,
            }),
        },
        PlacedFeature {
            origin: [-20, 65, -20],
            feature: FeatureConfig::Pillar(PillarConfig {
                column_block: "packed_ice".to_string(),
                height: IntProvider::Uniform {
                    min_inclusive: 3,
                    max_inclusive: 7,
                },
                replaceable: BlockPredicate::Tagged(BlockTags::PLANT),
            }),
        },
    ]
}

// --- Persistence ---

impl Config {
    /// Read `config.ron` from `config_dir`, writing the defaults there first
    /// when the file does not exist yet.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Wrote default config to {}", path.display());
            return Ok(config);
        }
        let config = Self::read_file(&path)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write this config to `config_dir/config.ron`, creating the directory.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::write(config_dir))?;

        let path = config_dir.join(CONFIG_FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(5)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let text = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;
        std::fs::write(&path, text).map_err(ConfigError::write(&path))
    }

    /// Re-read the file. Returns `Some` only when its content differs from
    /// `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let fresh = Self::read_file(&config_dir.join(CONFIG_FILE_NAME))?;
        if fresh == *self {
            return Ok(None);
        }
        log::info!("Config file changed on disk");
        Ok(Some(fresh))
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(ConfigError::read(path))?;
        ron::from_str(&text).map_err(ConfigError::parse(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("ticks_per_second: 20"));
        assert!(ron_str.contains("use_wind_on_non_frozenlib_servers: true"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_default_features_are_valid() {
        for placed in Config::default().world.features {
            let name = format!("{:?}", placed.feature);
            assert!(placed.feature.build().is_ok(), "invalid default feature {name}");
        }
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(world: (seed: 9), server: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.world.seed, 9);
        assert_eq!(config.world.extent, 48);
        assert_eq!(config.wind, WindConfig::default());
    }

    #[test]
    fn test_wind_on_foreign_servers() {
        let mut wind = WindConfig::default();
        assert!(wind.should_simulate(false));
        wind.use_wind_on_non_frozenlib_servers = false;
        assert!(!wind.should_simulate(false));
        assert!(wind.should_simulate(true));
        wind.enabled = false;
        assert!(!wind.should_simulate(true));
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.world.seed = -77;
        config.wind.thunder_level = 0.5;
        config.server.max_ticks = 200;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.world.seed = 1234;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.map(|c| c.world.seed), Some(1234));
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
