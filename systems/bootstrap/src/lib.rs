#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the Gridkeep experience.

use gridkeep_world::{
    query::{self, PlacementView},
    Grid, World,
};

/// Produces data required to greet the player.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Exposes the placement grid configuration required for rendering.
    #[must_use]
    pub fn grid<'world>(&self, world: &'world World) -> &'world Grid {
        query::grid(world)
    }

    /// Snapshots the placed objects for presentation purposes.
    #[must_use]
    pub fn placements(&self, world: &World) -> PlacementView {
        query::placements(world)
    }
}
