//! Block identities, tags and the world interface placement features run against.

pub mod predicate;
pub mod registry;
pub mod sparse;
pub mod world;

pub use predicate::BlockPredicate;
pub use registry::{BlockDef, BlockId, BlockRegistry, BlockTags, RegistryError};
pub use sparse::SparseWorld;
pub use world::{BlockPos, BlockWorld, Direction, Heightmap, closer_than, is_exposed};
