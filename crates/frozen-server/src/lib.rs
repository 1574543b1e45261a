//! The FrozenLib world server: a fixed-rate tick loop driving terrain,
//! feature placement and the wind simulation.

pub mod tick_loop;
pub mod world_server;

pub use tick_loop::{DEFAULT_TPS, MAX_FRAME_TIME, TickLoop};
pub use world_server::{PlacementStats, ServerError, WorldServer};
