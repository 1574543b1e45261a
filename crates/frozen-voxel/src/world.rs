//! The world interface features read and mutate, plus small geometry helpers.

use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::registry::{BlockId, BlockRegistry, BlockTags};

/// Integer block coordinates.
pub type BlockPos = IVec3;

/// One of the six face directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Down,
        Direction::Up,
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Unit step toward this face.
    pub fn offset(self) -> IVec3 {
        match self {
            Direction::Down => IVec3::NEG_Y,
            Direction::Up => IVec3::Y,
            Direction::North => IVec3::NEG_Z,
            Direction::South => IVec3::Z,
            Direction::West => IVec3::NEG_X,
            Direction::East => IVec3::X,
        }
    }
}

/// Surface definitions used to find the top of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Heightmap {
    /// Highest non-air block.
    #[default]
    WorldSurface,
    /// Highest solid block; ignores water and plants.
    OceanFloor,
    /// Highest block that blocks movement or holds water.
    MotionBlocking,
    /// [`Heightmap::MotionBlocking`] without leaves.
    MotionBlockingNoLeaves,
}

impl Heightmap {
    /// Whether a block with `tags` (air when `air` is set) counts as the surface.
    pub fn counts(self, air: bool, tags: BlockTags) -> bool {
        if air {
            return false;
        }
        match self {
            Heightmap::WorldSurface => true,
            Heightmap::OceanFloor => tags.contains(BlockTags::SOLID),
            Heightmap::MotionBlocking => tags.intersects(BlockTags::SOLID | BlockTags::WATER),
            Heightmap::MotionBlockingNoLeaves => {
                tags.intersects(BlockTags::SOLID | BlockTags::WATER)
                    && !tags.contains(BlockTags::LEAVES)
            }
        }
    }
}

/// Block storage a feature operates on.
pub trait BlockWorld {
    fn registry(&self) -> &BlockRegistry;

    /// The block at `pos`, or `None` when the position is not loaded.
    fn block(&self, pos: BlockPos) -> Option<BlockId>;

    /// Replace the block at `pos`. Returns `false` when the position is not
    /// loaded or outside the world.
    fn set_block(&mut self, pos: BlockPos, block: BlockId) -> bool;

    /// Y of the first cell above the `heightmap` surface of column `(x, z)`.
    fn height(&self, heightmap: Heightmap, x: i32, z: i32) -> i32;

    /// Whether the loaded block at `pos` carries any of `tags`.
    fn has_tag(&self, pos: BlockPos, tags: BlockTags) -> bool {
        self.block(pos)
            .is_some_and(|id| self.registry().has_any_tag(id, tags))
    }

    /// Whether `pos` is loaded and air.
    fn is_air(&self, pos: BlockPos) -> bool {
        self.block(pos).is_some_and(BlockId::is_air)
    }
}

/// `true` when some face neighbour of `pos` is air or fire.
pub fn is_exposed(world: &(impl BlockWorld + ?Sized), pos: BlockPos) -> bool {
    Direction::ALL.iter().any(|direction| {
        let neighbour = pos + direction.offset();
        world.block(neighbour).is_some_and(|id| {
            id.is_air() || world.registry().has_any_tag(id, BlockTags::FIRE)
        })
    })
}

/// Euclidean distance between `a` and `b` strictly below `distance`.
pub fn closer_than(a: BlockPos, b: BlockPos, distance: f64) -> bool {
    (a - b).as_dvec3().length_squared() < distance * distance
}
