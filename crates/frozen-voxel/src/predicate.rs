//! Serializable block predicates used by feature configurations.

use serde::{Deserialize, Serialize};

use crate::registry::{BlockId, BlockRegistry, BlockTags};
use crate::world::{BlockPos, BlockWorld};

/// Which blocks a feature may replace.
///
/// Blocks are named rather than referenced by ID so that predicates can be
/// written in configuration files before a registry exists.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum BlockPredicate {
    /// Every loaded block.
    #[default]
    Any,
    Air,
    /// Any of the listed block names.
    Blocks(Vec<String>),
    /// Any block carrying one of the tags.
    Tagged(BlockTags),
    Not(Box<BlockPredicate>),
    /// Matches when any inner predicate does.
    AnyOf(Vec<BlockPredicate>),
}

impl BlockPredicate {
    pub fn blocks<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        BlockPredicate::Blocks(names.into_iter().map(Into::into).collect())
    }

    /// Test a block ID against this predicate.
    pub fn matches(&self, registry: &BlockRegistry, id: BlockId) -> bool {
        match self {
            BlockPredicate::Any => true,
            BlockPredicate::Air => id.is_air(),
            BlockPredicate::Blocks(names) => registry
                .get(id)
                .is_some_and(|def| names.iter().any(|name| *name == def.name)),
            BlockPredicate::Tagged(tags) => registry.has_any_tag(id, *tags),
            BlockPredicate::Not(inner) => !inner.matches(registry, id),
            BlockPredicate::AnyOf(inner) => inner.iter().any(|p| p.matches(registry, id)),
        }
    }

    /// Test the block at `pos`. Unloaded positions never match.
    pub fn test(&self, world: &(impl BlockWorld + ?Sized), pos: BlockPos) -> bool {
        world
            .block(pos)
            .is_some_and(|id| self.matches(world.registry(), id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparse::SparseWorld;
    use glam::IVec3;
    use std::sync::Arc;

    #[test]
    fn test_named_and_tagged_predicates() {
        let registry = BlockRegistry::standard();
        let grass = registry.lookup_by_name("grass_block").unwrap();
        let stone = registry.lookup_by_name("stone").unwrap();

        let named = BlockPredicate::blocks(["grass_block", "dirt"]);
        assert!(named.matches(&registry, grass));
        assert!(!named.matches(&registry, stone));

        let dirt_tag = BlockPredicate::Tagged(BlockTags::DIRT);
        assert!(dirt_tag.matches(&registry, grass));
        assert!(!dirt_tag.matches(&registry, stone));

        let not_dirt = BlockPredicate::Not(Box::new(dirt_tag));
        assert!(not_dirt.matches(&registry, stone));
    }

    #[test]
    fn test_unloaded_never_matches() {
        let mut world = SparseWorld::new(Arc::new(BlockRegistry::standard()), 0, 16);
        world.unload_column(3, 3);
        let pos = IVec3::new(3, 5, 3);
        assert!(!BlockPredicate::Any.test(&world, pos));
        assert!(!BlockPredicate::Not(Box::new(BlockPredicate::Air)).test(&world, pos));
        assert!(BlockPredicate::Air.test(&world, IVec3::new(4, 5, 3)));
    }

    #[test]
    fn test_predicate_from_ron() {
        let parsed: BlockPredicate =
            ron::from_str(r#"AnyOf([Blocks(["sand"]), Tagged("DIRT")])"#).unwrap();
        let registry = BlockRegistry::standard();
        let sand = registry.lookup_by_name("sand").unwrap();
        let mud = registry.lookup_by_name("mud").unwrap();
        let ice = registry.lookup_by_name("ice").unwrap();
        assert!(parsed.matches(&registry, sand));
        assert!(parsed.matches(&registry, mud));
        assert!(!parsed.matches(&registry, ice));
    }
}
