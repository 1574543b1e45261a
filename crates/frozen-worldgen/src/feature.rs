//! The placement entry point shared by every feature.

use frozen_noise::NoiseField;
use frozen_voxel::{BlockPos, BlockWorld};
use rand::Rng;

use crate::executor::{ExecutionContext, PlacementTicket, TicketStatus};

/// Everything a feature needs for one placement.
pub struct FeaturePlaceContext<'a, W, R: ?Sized> {
    pub world: &'a mut W,
    /// Per-invocation random source. Every roll a feature makes comes from here.
    pub random: &'a mut R,
    pub origin: BlockPos,
    pub noise: &'a NoiseField,
    /// Receives work a feature defers to the world-update thread.
    pub executor: &'a dyn ExecutionContext<W>,
}

/// Outcome of [`Feature::place`].
#[derive(Debug)]
pub enum Placement {
    /// Ran to completion.
    Completed { placed: bool },
    /// Handed to the execution context; the ticket resolves once it runs.
    Deferred(PlacementTicket),
}

impl Placement {
    /// Whether anything was placed, or `None` while deferred work is pending.
    pub fn placed(&mut self) -> Option<bool> {
        match self {
            Placement::Completed { placed } => Some(*placed),
            Placement::Deferred(ticket) => match ticket.status() {
                TicketStatus::Done(placed) => Some(placed),
                TicketStatus::Pending => None,
                TicketStatus::Abandoned => Some(false),
            },
        }
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Placement::Deferred(_))
    }
}

impl From<bool> for Placement {
    fn from(placed: bool) -> Self {
        Placement::Completed { placed }
    }
}

/// A configured world feature.
pub trait Feature {
    fn place<W, R>(&self, ctx: FeaturePlaceContext<'_, W, R>) -> Placement
    where
        W: BlockWorld + Send + 'static,
        R: Rng + ?Sized;
}
