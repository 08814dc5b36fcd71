#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that drives waypoint followers.
//!
//! Entities never advance on their own: each frame this system proposes one
//! follower step per live entity, and the world resolves the step against the
//! entity's path. Ceasing to propose steps is how movement is paused; there is
//! no separate cancellation command.

use gridkeep_core::{Command, Event};
use gridkeep_world::query::EntityView;

/// Pure system that reacts to frame ticks and emits follower step commands.
#[derive(Debug, Default)]
pub struct Movement;

impl Movement {
    /// Creates a new movement system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Consumes world events and the entity snapshot to emit step commands.
    ///
    /// One `StepEntity` command is proposed per live entity per frame, in
    /// ascending id order so replays stay deterministic. Frames without a
    /// `TimeAdvanced` event produce no commands.
    pub fn handle(&mut self, events: &[Event], entity_view: &EntityView, out: &mut Vec<Command>) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        for snapshot in entity_view.iter() {
            out.push(Command::StepEntity {
                entity: snapshot.id,
            });
        }
    }
}
