//! Block registry: maps compact [`BlockId`] values to named, tagged [`BlockDef`]s.
//!
//! The registry is built once at startup. Air is always ID 0 so that absent
//! cells in sparse storage read back as empty space.

use bitflags::bitflags;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Compact block identifier (2 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockId(pub u16);

impl BlockId {
    pub const AIR: BlockId = BlockId(0);

    pub fn is_air(self) -> bool {
        self == Self::AIR
    }
}

bitflags! {
    /// Tags a block can carry. Features and heightmaps test these instead of
    /// individual block names.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct BlockTags: u16 {
        /// Dirt-like ground that plants can grow on.
        const DIRT = 1 << 0;
        /// Burning blocks. Count as open space for exposure tests.
        const FIRE = 1 << 1;
        /// Water, including waterlogged plants.
        const WATER = 1 << 2;
        /// Blocks movement and counts toward the ocean floor.
        const SOLID = 1 << 3;
        const LEAVES = 1 << 4;
        /// Small plants that never block movement.
        const PLANT = 1 << 5;
        /// Sand, gravel and the like.
        const SAND = 1 << 6;
    }
}

/// Full descriptor for a block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockDef {
    pub name: String,
    pub tags: BlockTags,
}

impl BlockDef {
    pub fn new(name: impl Into<String>, tags: BlockTags) -> Self {
        Self {
            name: name.into(),
            tags,
        }
    }
}

/// Errors that can occur during block registration.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A block with the same name has already been registered.
    #[error("duplicate block name: {0}")]
    DuplicateName(String),
    /// All 65 535 user-defined slots have been consumed.
    #[error("block registry is full (max 65536 blocks)")]
    RegistryFull,
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Maps [`BlockId`] to [`BlockDef`] with O(1) lookup both ways.
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    /// Dense array where `index == BlockId.0`.
    blocks: Vec<BlockDef>,
    name_to_id: FxHashMap<String, BlockId>,
}

impl BlockRegistry {
    /// Creates a new registry with air pre-registered as ID 0.
    pub fn new() -> Self {
        let mut name_to_id = FxHashMap::default();
        name_to_id.insert("air".to_string(), BlockId::AIR);
        Self {
            blocks: vec![BlockDef::new("air", BlockTags::empty())],
            name_to_id,
        }
    }

    /// A registry holding the common terrain blocks used by the built-in
    /// features.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        let defs = [
            BlockDef::new("stone", BlockTags::SOLID),
            BlockDef::new("dirt", BlockTags::SOLID | BlockTags::DIRT),
            BlockDef::new("grass_block", BlockTags::SOLID | BlockTags::DIRT),
            BlockDef::new("coarse_dirt", BlockTags::SOLID | BlockTags::DIRT),
            BlockDef::new("podzol", BlockTags::SOLID | BlockTags::DIRT),
            BlockDef::new("mud", BlockTags::SOLID | BlockTags::DIRT),
            BlockDef::new("packed_mud", BlockTags::SOLID),
            BlockDef::new("dirt_path", BlockTags::SOLID),
            BlockDef::new("sand", BlockTags::SOLID | BlockTags::SAND),
            BlockDef::new("gravel", BlockTags::SOLID | BlockTags::SAND),
            BlockDef::new("water", BlockTags::WATER),
            BlockDef::new("fire", BlockTags::FIRE),
            BlockDef::new("oak_leaves", BlockTags::LEAVES),
            BlockDef::new("short_grass", BlockTags::PLANT),
            BlockDef::new("fern", BlockTags::PLANT),
            BlockDef::new("seagrass", BlockTags::PLANT | BlockTags::WATER),
            BlockDef::new("ice", BlockTags::SOLID),
            BlockDef::new("packed_ice", BlockTags::SOLID),
            BlockDef::new("snow_block", BlockTags::SOLID),
        ];
        for def in defs {
            if let Err(err) = registry.register(def) {
                tracing::warn!(%err, "skipping standard block");
            }
        }
        registry
    }

    /// Registers a new block and returns its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if a block with the same name
    /// already exists, or [`RegistryError::RegistryFull`] if all slots are
    /// consumed.
    pub fn register(&mut self, def: BlockDef) -> Result<BlockId, RegistryError> {
        if self.name_to_id.contains_key(&def.name) {
            return Err(RegistryError::DuplicateName(def.name));
        }
        if self.blocks.len() > u16::MAX as usize {
            return Err(RegistryError::RegistryFull);
        }

        let id = BlockId(self.blocks.len() as u16);
        self.name_to_id.insert(def.name.clone(), id);
        self.blocks.push(def);
        Ok(id)
    }

    /// Returns the definition for `id`, or `None` for IDs this registry never
    /// issued.
    pub fn get(&self, id: BlockId) -> Option<&BlockDef> {
        self.blocks.get(id.0 as usize)
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<BlockId> {
        self.name_to_id.get(name).copied()
    }

    /// Tags of `id`. Unknown IDs carry no tags.
    pub fn tags(&self, id: BlockId) -> BlockTags {
        self.get(id).map(|def| def.tags).unwrap_or_default()
    }

    /// Returns `true` if `id` carries any of `tags`.
    pub fn has_any_tag(&self, id: BlockId, tags: BlockTags) -> bool {
        self.tags(id).intersects(tags)
    }

    /// Returns the total number of registered blocks (including air).
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if only air is registered.
    pub fn is_empty(&self) -> bool {
        self.blocks.len() <= 1
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}
