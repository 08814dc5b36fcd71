#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Gridkeep engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Gridkeep.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Configures the world's placement grid using the provided dimensions.
    ConfigureGrid {
        /// Number of cell columns laid out in the grid.
        columns: u32,
        /// Number of cell rows laid out in the grid.
        rows: u32,
        /// Length of each square cell measured in world units.
        cell_length: f32,
    },
    /// Advances the frame clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous frame.
        dt: Duration,
    },
    /// Requests that a new placement process begin from the idle state.
    StartCreation,
    /// Promotes a pending creation (or an existing object) into an active drag.
    BeginDrag {
        /// Describes whether a fresh preview or an existing object is dragged.
        request: DragRequest,
    },
    /// Feeds one frame of intersection query results into the active drag.
    DragTick {
        /// Grid cells currently under the pointer, nearest first.
        cell_hits: Vec<CellHit>,
        /// Object boundaries currently under the pointer, nearest first.
        boundary_hits: Vec<BoundaryHit>,
    },
    /// Attempts to finalize the active drag at the current candidate cell.
    CommitDrag,
    /// Abandons the active drag without mutating the object set.
    CancelDrag,
    /// Removes the object currently carried by a move drag.
    DeleteDragged,
    /// Resolves a selection query against the placed objects' boundaries.
    Select {
        /// Object boundaries currently under the pointer, nearest first.
        boundary_hits: Vec<BoundaryHit>,
    },
    /// Removes the currently selected object from the world.
    DeleteSelected,
    /// Builds and registers a waypoint path from an origin and step commands.
    GeneratePath {
        /// World position the path starts from.
        origin: WorldPoint,
        /// Ordered directional commands that shape the path.
        commands: Vec<PathCommand>,
    },
    /// Spawns a mobile entity at the origin of a registered path.
    SpawnEntity {
        /// Identifier of the path the entity will follow.
        path: PathId,
    },
    /// Advances a single entity by one follower step.
    StepEntity {
        /// Identifier of the entity attempting to advance.
        entity: EntityId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the frame clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the frame.
        dt: Duration,
    },
    /// Signals that the frame loop should instantiate a preview object.
    CreationTriggered,
    /// Confirms that a drag session became active.
    DragStarted {
        /// Kind of drag session that began.
        kind: DragKind,
    },
    /// Reports the legality verdict computed for the latest drag tick.
    LegalityAssessed {
        /// Whether committing at the candidate cell is currently blocked.
        blocked: bool,
        /// Cell under the pointer, if any.
        candidate_cell: Option<CellCoord>,
    },
    /// Instructs the presentation layer to move the drag preview.
    PreviewRepositioned {
        /// World position the preview should track.
        position: WorldPoint,
    },
    /// Instructs the presentation layer to move the drag backlight.
    BacklightRepositioned {
        /// World position the backlight should snap to.
        position: WorldPoint,
    },
    /// Adjusts the opacity of the grid's edge overlay.
    GridHighlightSet {
        /// Opacity applied to every grid edge line.
        opacity: f32,
    },
    /// Confirms that a new object was committed into the world.
    ObjectPlaced {
        /// Identifier assigned to the object by the world.
        object: PlaceableId,
        /// Cell the object now occupies.
        cell: CellCoord,
        /// World position the object was finalized at.
        position: WorldPoint,
    },
    /// Confirms that an existing object was re-bound to a new cell.
    ObjectMoved {
        /// Identifier of the object that moved.
        object: PlaceableId,
        /// Cell the object now occupies.
        cell: CellCoord,
        /// World position the object was finalized at.
        position: WorldPoint,
    },
    /// Confirms that an object was removed from the world.
    ObjectRemoved {
        /// Identifier of the object that was removed.
        object: PlaceableId,
        /// Cell the object occupied before removal.
        cell: CellCoord,
    },
    /// Instructs the presentation layer to discard the drag preview.
    PreviewDiscarded,
    /// Instructs the presentation layer to discard the drag backlight.
    BacklightRemoved,
    /// Applies the selection highlight to an object's boundary.
    SelectionHighlighted {
        /// Identifier of the object that gained the highlight.
        object: PlaceableId,
    },
    /// Resets a previously highlighted boundary to full transparency.
    SelectionHighlightCleared {
        /// Identifier of the object that lost the highlight.
        object: PlaceableId,
    },
    /// Confirms that a waypoint path was registered with the world.
    PathGenerated {
        /// Identifier assigned to the path by the world.
        path: PathId,
        /// Number of waypoints the path contains, origin included.
        waypoints: usize,
    },
    /// Reports that a path generation request was rejected.
    PathRejected {
        /// Specific reason the generation failed.
        reason: PathError,
    },
    /// Confirms that an entity was spawned against a path.
    EntitySpawned {
        /// Identifier assigned to the entity by the world.
        entity: EntityId,
        /// Path the entity will follow.
        path: PathId,
        /// World position the entity occupies after spawning.
        position: WorldPoint,
    },
    /// Confirms that an entity advanced one fixed increment.
    EntityAdvanced {
        /// Identifier of the entity that advanced.
        entity: EntityId,
        /// World position the entity occupies after the step.
        position: WorldPoint,
    },
    /// Reports that an entity consumed a waypoint on a comparison-only frame.
    WaypointReached {
        /// Identifier of the entity whose cursor advanced.
        entity: EntityId,
        /// Waypoint index the entity will test against next.
        points_reached: usize,
    },
    /// Confirms that an entity exhausted its path and left the world.
    EntityRetired {
        /// Identifier of the entity that was retired.
        entity: EntityId,
    },
}

/// Unique identifier assigned to a placed object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlaceableId(u32);

impl PlaceableId {
    /// Creates a new placeable identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a registered waypoint path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PathId(u32);

impl PathId {
    /// Creates a new path identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a mobile entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// A cell's coordinate pair doubles as its stable identity: cells are never
/// created or destroyed after grid construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Position expressed in world units with x/z as the ground plane and y up.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    /// Distance along the lateral (left/right) axis.
    pub x: f32,
    /// Height above the ground plane.
    pub y: f32,
    /// Distance along the longitudinal (forward/backward) axis.
    pub z: f32,
}

impl WorldPoint {
    /// Creates a new world position from explicit components.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Returns a copy of the point shifted along the ground plane.
    #[must_use]
    pub fn offset(self, dx: f32, dz: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y,
            z: self.z + dz,
        }
    }

    /// Returns a copy of the point raised by the provided height.
    #[must_use]
    pub fn raised(self, dy: f32) -> Self {
        Self {
            x: self.x,
            y: self.y + dy,
            z: self.z,
        }
    }
}

/// Movement directions available to path segments and followers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing z.
    Forward,
    /// Movement toward decreasing z.
    Backward,
    /// Movement toward decreasing x.
    Left,
    /// Movement toward increasing x.
    Right,
}

impl Direction {
    /// Unit ground-plane offset `(dx, dz)` advanced by one step.
    #[must_use]
    pub const fn unit(self) -> (f32, f32) {
        match self {
            Self::Forward => (0.0, 1.0),
            Self::Backward => (0.0, -1.0),
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
        }
    }
}

/// Distinguishes a fresh-preview drag from a relocation of a placed object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DragKind {
    /// The drag carries a preview that does not yet exist in the object set.
    New,
    /// The drag relocates an object that is already placed.
    Move,
}

/// Payload submitted when a drag session begins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragRequest {
    /// Starts dragging a freshly instantiated preview object.
    New {
        /// Vertical extent of the preview's bounding box in world units.
        preview_extent: f32,
    },
    /// Starts dragging an object that is already placed.
    Move {
        /// Identifier of the object being relocated.
        object: PlaceableId,
    },
}

impl DragRequest {
    /// Classifies the request as a [`DragKind`].
    #[must_use]
    pub const fn kind(&self) -> DragKind {
        match self {
            Self::New { .. } => DragKind::New,
            Self::Move { .. } => DragKind::Move,
        }
    }
}

/// Pointer intersection against a single grid cell, produced externally.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellHit {
    /// Cell the pointer ray passed through.
    pub cell: CellCoord,
    /// Exact world position where the ray met the cell plane.
    pub point: WorldPoint,
    /// Ray distance used for nearest-first ordering.
    pub distance: f32,
}

/// Pointer intersection against a placed object's boundary collider.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryHit {
    /// Object whose boundary the pointer ray passed through.
    pub object: PlaceableId,
    /// Ray distance used for nearest-first ordering.
    pub distance: f32,
}

/// One directional instruction consumed by the path generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathCommand {
    /// Axis and sign the command advances along.
    pub direction: Direction,
    /// Number of whole-unit steps the command covers.
    pub steps: u32,
}

impl PathCommand {
    /// Creates a new path command from a direction and step count.
    #[must_use]
    pub const fn new(direction: Direction, steps: u32) -> Self {
        Self { direction, steps }
    }
}

/// One directed checkpoint within a generated path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Waypoint {
    /// World position of the checkpoint.
    pub position: WorldPoint,
    /// Axis the previous segment advanced along; `None` only for the origin.
    pub direction: Option<Direction>,
}

impl Waypoint {
    /// Creates the undirected origin waypoint of a path.
    #[must_use]
    pub const fn origin(position: WorldPoint) -> Self {
        Self {
            position,
            direction: None,
        }
    }

    /// Creates a directed waypoint terminating one path command.
    #[must_use]
    pub const fn directed(position: WorldPoint, direction: Direction) -> Self {
        Self {
            position,
            direction: Some(direction),
        }
    }
}

/// Reasons a path generation request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum PathError {
    /// A command requested zero steps, which would emit an ambiguous waypoint.
    #[error("path command along {direction:?} requested zero steps")]
    ZeroSteps {
        /// Direction carried by the offending command.
        direction: Direction,
    },
    /// The request contained no commands at all.
    #[error("path generation requires at least one command")]
    Empty,
}

/// Hit points a combat system would eventually drain. Carries no behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Health(u32);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric hit point count.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}
