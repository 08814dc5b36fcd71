//! Deterministic waypoint path generation.
//!
//! A path starts at an origin waypoint and grows through chained
//! [`PathBuilder::go`] calls, each of which advances a shared cursor one whole
//! unit per step and terminates in exactly one directed waypoint. The per-unit
//! segment positions are retained for presentation so adapters can tile the
//! walked route.

use gridkeep_core::{Direction, PathError, PathId, Waypoint, WorldPoint};

/// Fluent builder accumulating waypoints from directional step commands.
///
/// The builder is stateful across chained calls: every `go` continues from
/// the cumulative cursor left by the previous one. Building is pure; the
/// world registers the finished blueprint under a fresh [`PathId`].
#[derive(Clone, Debug)]
pub struct PathBuilder {
    cursor: WorldPoint,
    waypoints: Vec<Waypoint>,
    segments: Vec<WorldPoint>,
}

impl PathBuilder {
    /// Starts a new path at the provided origin.
    #[must_use]
    pub fn begin(origin: WorldPoint) -> Self {
        Self {
            cursor: origin,
            waypoints: vec![Waypoint::origin(origin)],
            segments: Vec::new(),
        }
    }

    /// Appends `steps` whole-unit advances along `direction`.
    ///
    /// The very first command also lays a zero-increment segment on the
    /// origin itself so the visual route starts at, rather than one unit
    /// past, the spawn point. Waypoint positions are unaffected: each
    /// command's terminal waypoint sits exactly `steps` units from where the
    /// cursor started.
    pub fn go(mut self, direction: Direction, steps: u32) -> Result<Self, PathError> {
        if steps == 0 {
            return Err(PathError::ZeroSteps { direction });
        }

        let (dx, dz) = direction.unit();
        if self.segments.is_empty() {
            self.segments.push(self.cursor);
        }
        for _ in 0..steps {
            self.cursor = self.cursor.offset(dx, dz);
            self.segments.push(self.cursor);
        }
        self.waypoints.push(Waypoint::directed(self.cursor, direction));
        Ok(self)
    }

    /// Seals the builder into an immutable blueprint.
    ///
    /// A path with no directional waypoints is rejected: an origin-only path
    /// would retire every follower on its first frame.
    pub fn finish(self) -> Result<PathBlueprint, PathError> {
        if self.waypoints.len() < 2 {
            return Err(PathError::Empty);
        }

        Ok(PathBlueprint {
            waypoints: self.waypoints,
            segments: self.segments,
        })
    }
}

/// Finished, immutable output of a [`PathBuilder`].
#[derive(Clone, Debug, PartialEq)]
pub struct PathBlueprint {
    waypoints: Vec<Waypoint>,
    segments: Vec<WorldPoint>,
}

impl PathBlueprint {
    /// Ordered waypoints, starting with the undirected origin.
    #[must_use]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Per-unit segment positions retained for route presentation.
    #[must_use]
    pub fn segments(&self) -> &[WorldPoint] {
        &self.segments
    }
}

/// Waypoint path registered with the world and shared by followers.
#[derive(Clone, Debug)]
pub struct Path {
    id: PathId,
    waypoints: Vec<Waypoint>,
    segments: Vec<WorldPoint>,
}

impl Path {
    pub(crate) fn from_blueprint(id: PathId, blueprint: PathBlueprint) -> Self {
        Self {
            id,
            waypoints: blueprint.waypoints,
            segments: blueprint.segments,
        }
    }

    /// Identifier the world registered the path under.
    #[must_use]
    pub const fn id(&self) -> PathId {
        self.id
    }

    /// Ordered waypoints, starting with the undirected origin.
    #[must_use]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Per-unit segment positions retained for route presentation.
    #[must_use]
    pub fn segments(&self) -> &[WorldPoint] {
        &self.segments
    }
}
