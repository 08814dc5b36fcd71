#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Gridkeep.
//!
//! The world owns the placement grid, the set of placed objects, the single
//! active drag process, the orthogonal selection slot, registered waypoint
//! paths and live mobile entities. All mutation flows through [`apply`] on a
//! single execution context; adapters and systems observe the results through
//! the [`query`] module and the emitted event stream.

use gridkeep_core::{
    BoundaryHit, CellCoord, CellHit, Command, DragRequest, EntityId, Event, Health, PathCommand,
    PathId, PlaceableId, Waypoint, WorldPoint, WELCOME_BANNER,
};

pub mod grid;
pub mod paths;

pub use grid::Grid;
pub use paths::{Path, PathBlueprint, PathBuilder};

const DEFAULT_GRID_COLUMNS: u32 = 10;
const DEFAULT_GRID_ROWS: u32 = 10;
const DEFAULT_CELL_LENGTH: f32 = 1.0;

/// Fixed ground-plane distance an entity covers in one follower step.
pub const STEP_INCREMENT: f32 = 0.05;

/// Edge overlay opacity applied while a drag session is active.
pub const DRAG_HIGHLIGHT_OPACITY: f32 = 0.5;

/// Height at which the drag preview hovers above its candidate cell.
pub const PREVIEW_LIFT: f32 = 0.5;
const PLACEMENT_LIFT: f32 = 0.01;
const BOUNDARY_LIFT: f32 = 0.7;
const BOUNDARY_TRIM: f32 = 0.4;
const ENTITY_LIFT: f32 = 0.5;

/// Represents the authoritative Gridkeep world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: Grid,
    objects: Vec<PlacedObject>,
    process: ActiveProcess,
    selection: Option<PlaceableId>,
    paths: Vec<Path>,
    entities: Vec<MobileEntity>,
    next_object: u32,
    next_path: u32,
    next_entity: u32,
    tick_index: u64,
}

impl World {
    /// Creates a new Gridkeep world ready for building.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            grid: Grid::new(DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS, DEFAULT_CELL_LENGTH),
            objects: Vec::new(),
            process: ActiveProcess::Idle,
            selection: None,
            paths: Vec::new(),
            entities: Vec::new(),
            next_object: 0,
            next_path: 0,
            next_entity: 0,
            tick_index: 0,
        }
    }

    fn allocate_object_id(&mut self) -> PlaceableId {
        let id = PlaceableId::new(self.next_object);
        self.next_object = self.next_object.saturating_add(1);
        id
    }

    fn allocate_path_id(&mut self) -> PathId {
        let id = PathId::new(self.next_path);
        self.next_path = self.next_path.saturating_add(1);
        id
    }

    fn allocate_entity_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_entity);
        self.next_entity = self.next_entity.saturating_add(1);
        id
    }

    fn object(&self, id: PlaceableId) -> Option<&PlacedObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    fn object_mut(&mut self, id: PlaceableId) -> Option<&mut PlacedObject> {
        self.objects.iter_mut().find(|object| object.id == id)
    }

    fn remove_object(&mut self, id: PlaceableId) -> Option<PlacedObject> {
        let index = self.objects.iter().position(|object| object.id == id)?;
        Some(self.objects.remove(index))
    }

    fn reset_process(&mut self, out_events: &mut Vec<Event>) {
        self.process = ActiveProcess::Idle;
        out_events.push(Event::GridHighlightSet { opacity: 0.0 });
    }

    fn clear_selection(&mut self, out_events: &mut Vec<Event>) {
        if let Some(previous) = self.selection.take() {
            out_events.push(Event::SelectionHighlightCleared { object: previous });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid {
            columns,
            rows,
            cell_length,
        } => {
            world.grid = Grid::new(columns, rows, cell_length);
            world.objects.clear();
            world.process = ActiveProcess::Idle;
            world.selection = None;
        }
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::StartCreation => start_creation(world, out_events),
        Command::BeginDrag { request } => begin_drag(world, request, out_events),
        Command::DragTick {
            cell_hits,
            boundary_hits,
        } => drag_tick(world, &cell_hits, &boundary_hits, out_events),
        Command::CommitDrag => commit_drag(world, out_events),
        Command::CancelDrag => cancel_drag(world, out_events),
        Command::DeleteDragged => delete_dragged(world, out_events),
        Command::Select { boundary_hits } => select(world, &boundary_hits, out_events),
        Command::DeleteSelected => delete_selected(world, out_events),
        Command::GeneratePath { origin, commands } => {
            generate_path(world, origin, &commands, out_events);
        }
        Command::SpawnEntity { path } => spawn_entity(world, path, out_events),
        Command::StepEntity { entity } => step_entity(world, entity, out_events),
    }
}

fn start_creation(world: &mut World, out_events: &mut Vec<Event>) {
    if !matches!(world.process, ActiveProcess::Idle) {
        return;
    }

    world.process = ActiveProcess::Creating;
    out_events.push(Event::CreationTriggered);
}

fn begin_drag(world: &mut World, request: DragRequest, out_events: &mut Vec<Event>) {
    match request {
        DragRequest::New { .. } => {
            if !matches!(world.process, ActiveProcess::Creating) {
                return;
            }
        }
        DragRequest::Move { object } => {
            if !matches!(world.process, ActiveProcess::Idle) {
                return;
            }
            if world.object(object).is_none() {
                return;
            }
            // Selection is suppressed while any drag is active.
            world.clear_selection(out_events);
        }
    }

    let kind = request.kind();
    world.process = ActiveProcess::Dragging(DragSession::new(request));
    out_events.push(Event::DragStarted { kind });
    out_events.push(Event::GridHighlightSet {
        opacity: DRAG_HIGHLIGHT_OPACITY,
    });
}

fn drag_tick(
    world: &mut World,
    cell_hits: &[CellHit],
    boundary_hits: &[BoundaryHit],
    out_events: &mut Vec<Event>,
) {
    let dragged = match &world.process {
        ActiveProcess::Dragging(session) => session.dragged_object(),
        _ => return,
    };

    let candidate = nearest_cell(&world.grid, cell_hits);
    let blocked = assess_blocked(
        &world.objects,
        boundary_hits,
        candidate.map(|found| found.cell),
        dragged,
    );

    let backlight = candidate.map(|found| world.grid.cell_center(found.cell));

    let ActiveProcess::Dragging(session) = &mut world.process else {
        return;
    };
    session.candidate = candidate;
    session.blocked = blocked;

    out_events.push(Event::LegalityAssessed {
        blocked,
        candidate_cell: candidate.map(|found| found.cell),
    });

    if !blocked {
        if let (Some(found), Some(snap)) = (candidate, backlight) {
            out_events.push(Event::PreviewRepositioned {
                position: found.point.raised(PREVIEW_LIFT),
            });
            out_events.push(Event::BacklightRepositioned { position: snap });
        }
    }
}

fn commit_drag(world: &mut World, out_events: &mut Vec<Event>) {
    let ActiveProcess::Dragging(session) = &world.process else {
        return;
    };

    // Re-validate regardless of what the input layer gated on.
    let Some(candidate) = session.candidate else {
        return;
    };
    if session.blocked {
        return;
    }

    let cell = candidate.cell;
    let center = world.grid.cell_center(cell);
    let position = center.raised(PLACEMENT_LIFT);

    match session.request {
        DragRequest::New { preview_extent } => {
            let id = world.allocate_object_id();
            let boundary = Boundary::for_extent(center, preview_extent);
            world.objects.push(PlacedObject {
                id,
                cell,
                position,
                boundary,
            });
            out_events.push(Event::ObjectPlaced {
                object: id,
                cell,
                position,
            });
        }
        DragRequest::Move { object } => {
            let Some(placed) = world.object_mut(object) else {
                // The move target vanished mid-drag; nothing left to commit.
                out_events.push(Event::BacklightRemoved);
                world.reset_process(out_events);
                return;
            };
            placed.cell = cell;
            placed.position = position;
            placed.boundary.position = center.raised(BOUNDARY_LIFT);
            out_events.push(Event::ObjectMoved {
                object,
                cell,
                position,
            });
        }
    }

    out_events.push(Event::BacklightRemoved);
    world.reset_process(out_events);
}

fn cancel_drag(world: &mut World, out_events: &mut Vec<Event>) {
    let ActiveProcess::Dragging(session) = &world.process else {
        return;
    };

    if matches!(session.request, DragRequest::New { .. }) {
        out_events.push(Event::PreviewDiscarded);
    }
    out_events.push(Event::BacklightRemoved);
    world.reset_process(out_events);
}

fn delete_dragged(world: &mut World, out_events: &mut Vec<Event>) {
    let ActiveProcess::Dragging(session) = &world.process else {
        return;
    };
    let DragRequest::Move { object } = session.request else {
        return;
    };

    if let Some(removed) = world.remove_object(object) {
        out_events.push(Event::ObjectRemoved {
            object: removed.id,
            cell: removed.cell,
        });
    }
    out_events.push(Event::BacklightRemoved);
    world.reset_process(out_events);
}

fn select(world: &mut World, boundary_hits: &[BoundaryHit], out_events: &mut Vec<Event>) {
    // Selection queries are suppressed while a creation or drag is active.
    if !matches!(world.process, ActiveProcess::Idle) {
        return;
    }

    let hit = boundary_hits
        .iter()
        .find(|hit| world.object(hit.object).is_some())
        .map(|hit| hit.object);

    let Some(next) = hit else {
        world.clear_selection(out_events);
        return;
    };

    if let Some(previous) = world.selection {
        if previous != next {
            out_events.push(Event::SelectionHighlightCleared { object: previous });
        }
    }
    world.selection = Some(next);
    out_events.push(Event::SelectionHighlighted { object: next });
}

fn delete_selected(world: &mut World, out_events: &mut Vec<Event>) {
    let Some(selected) = world.selection.take() else {
        return;
    };

    // A stale selection filters down to nothing rather than erroring.
    if let Some(removed) = world.remove_object(selected) {
        out_events.push(Event::ObjectRemoved {
            object: removed.id,
            cell: removed.cell,
        });
    }
}

fn generate_path(
    world: &mut World,
    origin: WorldPoint,
    commands: &[PathCommand],
    out_events: &mut Vec<Event>,
) {
    let mut builder = PathBuilder::begin(origin);
    for command in commands {
        builder = match builder.go(command.direction, command.steps) {
            Ok(next) => next,
            Err(reason) => {
                out_events.push(Event::PathRejected { reason });
                return;
            }
        };
    }

    match builder.finish() {
        Ok(blueprint) => {
            let id = world.allocate_path_id();
            let waypoints = blueprint.waypoints().len();
            world.paths.push(Path::from_blueprint(id, blueprint));
            out_events.push(Event::PathGenerated {
                path: id,
                waypoints,
            });
        }
        Err(reason) => out_events.push(Event::PathRejected { reason }),
    }
}

fn spawn_entity(world: &mut World, path: PathId, out_events: &mut Vec<Event>) {
    let Some(record) = world.paths.iter().find(|record| record.id() == path) else {
        return;
    };
    let Some(origin) = record.waypoints().first() else {
        return;
    };

    let position = origin.position.raised(ENTITY_LIFT);
    let id = world.allocate_entity_id();
    world.entities.push(MobileEntity {
        id,
        path,
        position,
        points_reached: 1,
        health: Health::new(0),
    });
    out_events.push(Event::EntitySpawned {
        entity: id,
        path,
        position,
    });
}

fn step_entity(world: &mut World, entity: EntityId, out_events: &mut Vec<Event>) {
    let Some(index) = world.entities.iter().position(|found| found.id == entity) else {
        return;
    };

    let (path, points_reached) = {
        let entity = &world.entities[index];
        (entity.path, entity.points_reached)
    };
    let Some(record) = world.paths.iter().find(|record| record.id() == path) else {
        return;
    };
    let waypoint_count = record.waypoints().len();
    let target = record.waypoints().get(points_reached).copied();

    let follower = &mut world.entities[index];
    match follower.advance_toward(target) {
        StepOutcome::Advanced => out_events.push(Event::EntityAdvanced {
            entity,
            position: follower.position,
        }),
        StepOutcome::WaypointConsumed => out_events.push(Event::WaypointReached {
            entity,
            points_reached: follower.points_reached,
        }),
    }

    // Termination is checked after the step so a cursor that just passed the
    // final waypoint retires the entity on the same frame.
    if world.entities[index].points_reached >= waypoint_count {
        let _ = world.entities.remove(index);
        out_events.push(Event::EntityRetired { entity });
    }
}

fn nearest_cell(grid: &Grid, cell_hits: &[CellHit]) -> Option<CandidateCell> {
    cell_hits
        .iter()
        .find(|hit| grid.contains(hit.cell))
        .map(|hit| CandidateCell {
            cell: hit.cell,
            point: hit.point,
        })
}

/// Evaluates the collision-based blocking policy for one drag tick.
///
/// The pointer ray is intersected against every placed boundary. A single
/// hit blocks only when it belongs to a different object that legitimately
/// occupies the candidate cell; overlapping hits block when any of the hit
/// objects occupies the candidate cell.
fn assess_blocked(
    objects: &[PlacedObject],
    boundary_hits: &[BoundaryHit],
    candidate: Option<CellCoord>,
    dragged: Option<PlaceableId>,
) -> bool {
    let Some(candidate) = candidate else {
        return false;
    };

    let occupies_candidate = |id: PlaceableId| {
        objects
            .iter()
            .any(|object| object.id == id && object.cell == candidate)
    };

    match boundary_hits {
        [] => false,
        [only] => Some(only.object) != dragged && occupies_candidate(only.object),
        several => several.iter().any(|hit| occupies_candidate(hit.object)),
    }
}

/// The mutually exclusive machine mode. Exactly one variant is ever active,
/// which rules out the illegal "creating while dragging" combinations at the
/// type level.
#[derive(Clone, Debug)]
enum ActiveProcess {
    Idle,
    Creating,
    Dragging(DragSession),
}

/// Ephemeral state of an in-progress creation or move drag.
#[derive(Clone, Copy, Debug)]
struct DragSession {
    request: DragRequest,
    candidate: Option<CandidateCell>,
    blocked: bool,
}

impl DragSession {
    fn new(request: DragRequest) -> Self {
        Self {
            request,
            candidate: None,
            blocked: false,
        }
    }

    fn dragged_object(&self) -> Option<PlaceableId> {
        match self.request {
            DragRequest::New { .. } => None,
            DragRequest::Move { object } => Some(object),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct CandidateCell {
    cell: CellCoord,
    point: WorldPoint,
}

#[derive(Clone, Debug)]
struct PlacedObject {
    id: PlaceableId,
    cell: CellCoord,
    position: WorldPoint,
    boundary: Boundary,
}

/// Invisible collider used purely for pointer-intersection tests.
#[derive(Clone, Copy, Debug)]
struct Boundary {
    position: WorldPoint,
    extent: f32,
}

impl Boundary {
    /// Derives the collider from the committed preview's vertical extent,
    /// trimmed so neighbouring cells do not overlap at their shared edge.
    fn for_extent(cell_center: WorldPoint, preview_extent: f32) -> Self {
        Self {
            position: cell_center.raised(BOUNDARY_LIFT),
            extent: (preview_extent - BOUNDARY_TRIM).max(0.0),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct MobileEntity {
    id: EntityId,
    path: PathId,
    position: WorldPoint,
    points_reached: usize,
    health: Health,
}

enum StepOutcome {
    Advanced,
    WaypointConsumed,
}

impl MobileEntity {
    /// One frame of axis-at-a-time advancement toward the current target.
    ///
    /// When the comparison is already satisfied the waypoint cursor advances
    /// instead of the position, spending the frame on the transition.
    fn advance_toward(&mut self, target: Option<Waypoint>) -> StepOutcome {
        use gridkeep_core::Direction::{Backward, Forward, Left, Right};

        let direction_and_position = target.map(|waypoint| (waypoint.direction, waypoint.position));
        match direction_and_position {
            Some((Some(Forward), goal)) if self.position.z < goal.z => {
                self.position.z += STEP_INCREMENT;
                StepOutcome::Advanced
            }
            Some((Some(Backward), goal)) if self.position.z > goal.z => {
                self.position.z -= STEP_INCREMENT;
                StepOutcome::Advanced
            }
            Some((Some(Right), goal)) if self.position.x < goal.x => {
                self.position.x += STEP_INCREMENT;
                StepOutcome::Advanced
            }
            Some((Some(Left), goal)) if self.position.x > goal.x => {
                self.position.x -= STEP_INCREMENT;
                StepOutcome::Advanced
            }
            _ => {
                self.points_reached = self.points_reached.saturating_add(1);
                StepOutcome::WaypointConsumed
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{ActiveProcess, Grid, Path, World};
    use gridkeep_core::{CellCoord, DragKind, EntityId, Health, PathId, PlaceableId, WorldPoint};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the world's placement grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Number of frames the world has ticked through so far.
    #[must_use]
    pub fn frame_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures a read-only view of the placed objects.
    #[must_use]
    pub fn placements(world: &World) -> PlacementView {
        let mut snapshots: Vec<PlacementSnapshot> = world
            .objects
            .iter()
            .map(|object| PlacementSnapshot {
                id: object.id,
                cell: object.cell,
                position: object.position,
                boundary_position: object.boundary.position,
                boundary_extent: object.boundary.extent,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        PlacementView { snapshots }
    }

    /// Returns the object occupying the provided cell, if any.
    #[must_use]
    pub fn object_at(world: &World, cell: CellCoord) -> Option<PlaceableId> {
        world
            .objects
            .iter()
            .find(|object| object.cell == cell)
            .map(|object| object.id)
    }

    /// Captures the current drag process as an immutable snapshot.
    #[must_use]
    pub fn drag_view(world: &World) -> DragView {
        match &world.process {
            ActiveProcess::Idle => DragView {
                mode: ProcessMode::Idle,
                candidate_cell: None,
                blocked: false,
            },
            ActiveProcess::Creating => DragView {
                mode: ProcessMode::Creating,
                candidate_cell: None,
                blocked: false,
            },
            ActiveProcess::Dragging(session) => DragView {
                mode: ProcessMode::Dragging {
                    kind: session.request.kind(),
                    object: session.dragged_object(),
                },
                candidate_cell: session.candidate.map(|candidate| candidate.cell),
                blocked: session.blocked,
            },
        }
    }

    /// Identifier of the currently selected object, if any.
    #[must_use]
    pub fn selected_object(world: &World) -> Option<PlaceableId> {
        world.selection
    }

    /// All paths registered with the world in registration order.
    #[must_use]
    pub fn paths(world: &World) -> &[Path] {
        &world.paths
    }

    /// Looks up a registered path by identifier.
    #[must_use]
    pub fn path(world: &World, id: PathId) -> Option<&Path> {
        world.paths.iter().find(|path| path.id() == id)
    }

    /// Identifier of the most recently registered path, if any.
    #[must_use]
    pub fn latest_path(world: &World) -> Option<PathId> {
        world.paths.last().map(Path::id)
    }

    /// Captures a read-only view of the live mobile entities.
    #[must_use]
    pub fn entity_view(world: &World) -> EntityView {
        let mut snapshots: Vec<EntitySnapshot> = world
            .entities
            .iter()
            .map(|entity| EntitySnapshot {
                id: entity.id,
                path: entity.path,
                position: entity.position,
                points_reached: entity.points_reached,
                health: entity.health,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        EntityView { snapshots }
    }

    /// Read-only snapshot describing all placed objects.
    #[derive(Clone, Debug, Default)]
    pub struct PlacementView {
        snapshots: Vec<PlacementSnapshot>,
    }

    impl PlacementView {
        /// Iterator over the captured placement snapshots in id order.
        pub fn iter(&self) -> impl Iterator<Item = &PlacementSnapshot> {
            self.snapshots.iter()
        }

        /// Number of objects captured by the view.
        #[must_use]
        pub fn len(&self) -> usize {
            self.snapshots.len()
        }

        /// Reports whether no objects are placed.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.snapshots.is_empty()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<PlacementSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single placed object.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct PlacementSnapshot {
        /// Identifier allocated to the object by the world.
        pub id: PlaceableId,
        /// Cell the object currently occupies.
        pub cell: CellCoord,
        /// World position of the visible object.
        pub position: WorldPoint,
        /// World position of the invisible boundary collider.
        pub boundary_position: WorldPoint,
        /// Vertical extent of the boundary collider.
        pub boundary_extent: f32,
    }

    /// Immutable snapshot of the active placement process.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct DragView {
        /// Machine mode active when the snapshot was captured.
        pub mode: ProcessMode,
        /// Cell under the pointer during an active drag, if any.
        pub candidate_cell: Option<CellCoord>,
        /// Whether committing at the candidate cell is currently blocked.
        pub blocked: bool,
    }

    /// Machine mode reported by [`drag_view`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum ProcessMode {
        /// No creation or drag is active.
        Idle,
        /// A creation was triggered and awaits its preview object.
        Creating,
        /// A drag session is active.
        Dragging {
            /// Kind of drag session in progress.
            kind: DragKind,
            /// Object being relocated when the drag is a move.
            object: Option<PlaceableId>,
        },
    }

    /// Read-only snapshot describing all live mobile entities.
    #[derive(Clone, Debug, Default)]
    pub struct EntityView {
        snapshots: Vec<EntitySnapshot>,
    }

    impl EntityView {
        /// Iterator over the captured entity snapshots in id order.
        pub fn iter(&self) -> impl Iterator<Item = &EntitySnapshot> {
            self.snapshots.iter()
        }

        /// Reports whether no entities are alive.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.snapshots.is_empty()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<EntitySnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single mobile entity.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct EntitySnapshot {
        /// Identifier assigned to the entity by the world.
        pub id: EntityId,
        /// Path the entity is following.
        pub path: PathId,
        /// Live world position of the entity.
        pub position: WorldPoint,
        /// Index of the waypoint the entity tests against next.
        pub points_reached: usize,
        /// Hit point stub. Carries no behavior.
        pub health: Health,
    }
}
