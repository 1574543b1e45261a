//! Hash-map backed [`BlockWorld`] for tests and the headless server.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::registry::{BlockId, BlockRegistry};
use crate::world::{BlockPos, BlockWorld, Heightmap};

/// In-memory world between `min_y` (inclusive) and `max_y` (exclusive).
///
/// Cells that were never written read back as air. Columns can be marked
/// unloaded, after which every cell in them reads as `None`.
#[derive(Debug, Clone)]
pub struct SparseWorld {
    registry: Arc<BlockRegistry>,
    blocks: FxHashMap<BlockPos, BlockId>,
    /// Highest y ever written with a non-air block, per column.
    column_top: FxHashMap<(i32, i32), i32>,
    unloaded: FxHashSet<(i32, i32)>,
    min_y: i32,
    max_y: i32,
}

impl SparseWorld {
    pub fn new(registry: Arc<BlockRegistry>, min_y: i32, max_y: i32) -> Self {
        Self {
            registry,
            blocks: FxHashMap::default(),
            column_top: FxHashMap::default(),
            unloaded: FxHashSet::default(),
            min_y,
            max_y: max_y.max(min_y),
        }
    }

    pub fn min_y(&self) -> i32 {
        self.min_y
    }

    pub fn max_y(&self) -> i32 {
        self.max_y
    }

    pub fn registry_handle(&self) -> Arc<BlockRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn unload_column(&mut self, x: i32, z: i32) {
        self.unloaded.insert((x, z));
    }

    pub fn load_column(&mut self, x: i32, z: i32) {
        self.unloaded.remove(&(x, z));
    }

    fn is_loaded(&self, pos: BlockPos) -> bool {
        pos.y >= self.min_y && pos.y < self.max_y && !self.unloaded.contains(&(pos.x, pos.z))
    }

    /// Fill the inclusive box `min..=max` with `block`. Returns the number of
    /// cells written.
    pub fn fill(&mut self, min: BlockPos, max: BlockPos, block: BlockId) -> usize {
        let lo = min.min(max);
        let hi = min.max(max);
        let mut written = 0;
        for x in lo.x..=hi.x {
            for z in lo.z..=hi.z {
                for y in lo.y..=hi.y {
                    if self.set_block(BlockPos::new(x, y, z), block) {
                        written += 1;
                    }
                }
            }
        }
        written
    }

    /// Number of stored cells holding `block`. Air is never stored.
    pub fn count(&self, block: BlockId) -> usize {
        self.blocks.values().filter(|&&id| id == block).count()
    }

    /// Iterate every stored non-air cell.
    pub fn iter(&self) -> impl Iterator<Item = (BlockPos, BlockId)> + '_ {
        self.blocks.iter().map(|(&pos, &id)| (pos, id))
    }
}

impl BlockWorld for SparseWorld {
    fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    fn block(&self, pos: BlockPos) -> Option<BlockId> {
        if !self.is_loaded(pos) {
            return None;
        }
        Some(self.blocks.get(&pos).copied().unwrap_or(BlockId::AIR))
    }

    fn set_block(&mut self, pos: BlockPos, block: BlockId) -> bool {
        if !self.is_loaded(pos) {
            trace!(?pos, "write to unloaded cell ignored");
            return false;
        }
        if block.is_air() {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, block);
            let top = self.column_top.entry((pos.x, pos.z)).or_insert(pos.y);
            *top = (*top).max(pos.y);
        }
        true
    }

    fn height(&self, heightmap: Heightmap, x: i32, z: i32) -> i32 {
        if self.unloaded.contains(&(x, z)) {
            return self.min_y;
        }
        let Some(&top) = self.column_top.get(&(x, z)) else {
            return self.min_y;
        };
        for y in (self.min_y..=top).rev() {
            let id = self
                .blocks
                .get(&BlockPos::new(x, y, z))
                .copied()
                .unwrap_or(BlockId::AIR);
            if heightmap.counts(id.is_air(), self.registry.tags(id)) {
                return y + 1;
            }
        }
        self.min_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;

    fn world() -> SparseWorld {
        SparseWorld::new(Arc::new(BlockRegistry::standard()), -16, 64)
    }

    fn id(world: &SparseWorld, name: &str) -> BlockId {
        world.registry().lookup_by_name(name).unwrap()
    }

    #[test]
    fn test_unwritten_cells_are_air() {
        let world = world();
        assert_eq!(world.block(IVec3::new(5, 10, 5)), Some(BlockId::AIR));
        assert_eq!(world.block(IVec3::new(5, 64, 5)), None, "max_y is exclusive");
        assert_eq!(world.block(IVec3::new(5, -17, 5)), None);
    }

    #[test]
    fn test_set_and_clear() {
        let mut world = world();
        let stone = id(&world, "stone");
        let pos = IVec3::new(1, 2, 3);
        assert!(world.set_block(pos, stone));
        assert_eq!(world.block(pos), Some(stone));
        assert!(world.set_block(pos, BlockId::AIR));
        assert_eq!(world.block(pos), Some(BlockId::AIR));
        assert_eq!(world.count(stone), 0);
    }

    #[test]
    fn test_heightmaps_differ_over_water() {
        let mut world = world();
        let stone = id(&world, "stone");
        let water = id(&world, "water");
        world.fill(IVec3::new(0, 0, 0), IVec3::new(0, 9, 0), stone);
        world.fill(IVec3::new(0, 10, 0), IVec3::new(0, 14, 0), water);
        assert_eq!(world.height(Heightmap::OceanFloor, 0, 0), 10);
        assert_eq!(world.height(Heightmap::WorldSurface, 0, 0), 15);
        assert_eq!(world.height(Heightmap::MotionBlocking, 0, 0), 15);
        assert_eq!(world.height(Heightmap::WorldSurface, 7, 7), -16);
    }

    #[test]
    fn test_unloaded_columns_reject_writes() {
        let mut world = world();
        let stone = id(&world, "stone");
        world.unload_column(2, 2);
        assert!(!world.set_block(IVec3::new(2, 0, 2), stone));
        assert_eq!(world.block(IVec3::new(2, 0, 2)), None);
        world.load_column(2, 2);
        assert!(world.set_block(IVec3::new(2, 0, 2), stone));
    }

    #[test]
    fn test_exposure_counts_air_and_fire() {
        let mut world = world();
        let stone = id(&world, "stone");
        let fire = id(&world, "fire");
        world.fill(IVec3::new(-2, 0, -2), IVec3::new(2, 4, 2), stone);
        assert!(!crate::is_exposed(&world, IVec3::new(0, 2, 0)));
        assert!(crate::is_exposed(&world, IVec3::new(0, 4, 0)), "top face is open");

        world.set_block(IVec3::new(1, 2, 0), fire);
        assert!(crate::is_exposed(&world, IVec3::new(0, 2, 0)), "fire counts as open");
    }
}
