#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Gridkeep adapters.
//!
//! Backends never read the world directly: [`build_scene`] projects the
//! world's query views into a declarative [`Scene`], and a backend only has to
//! draw what the scene describes.

use anyhow::Result as AnyResult;
use glam::Vec3;
use gridkeep_core::{EntityId, PlaceableId, WorldPoint};
use gridkeep_world::{query, World, DRAG_HIGHLIGHT_OPACITY, PREVIEW_LIFT};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with the provided alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

/// Fill color of the grid's ground cells.
pub const GRID_FILL_COLOR: Color = Color::from_rgb_u8(0xcb, 0xb2, 0x79);

/// Color of the drag backlight while the candidate cell is legal.
pub const BACKLIGHT_LEGAL_COLOR: Color = Color::new(0.0, 1.0, 0.0, 1.0);

/// Color of the drag backlight while the candidate cell is blocked.
pub const BACKLIGHT_BLOCKED_COLOR: Color = Color::new(1.0, 0.0, 0.0, 1.0);

/// Translucent boundary tint applied to the selected object.
pub const SELECTION_COLOR: Color = Color::new(1.0, 1.0, 0.0, 0.5);

/// Fill color of the tiles tracing a registered path.
pub const PATH_TILE_COLOR: Color = Color::new(0.8, 0.8, 0.8, 1.0);

/// Body color of mobile entities walking a path.
pub const ENTITY_COLOR: Color = Color::new(0.0, 1.0, 1.0, 1.0);

/// Pointer shape a backend should present for the current drag verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CursorStyle {
    /// Default pointer, shown while idle or over a legal candidate.
    Pointer,
    /// Denial pointer, shown while the active drag is blocked.
    NotAllowed,
}

/// Describes the square placement grid that adapters draw on the ground plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPresentation {
    /// Number of cell columns contained in the grid.
    pub columns: u32,
    /// Number of cell rows contained in the grid.
    pub rows: u32,
    /// Side length of a single cell expressed in world units.
    pub cell_length: f32,
    /// Fill color of every ground cell.
    pub fill_color: Color,
    /// Opacity applied to the cell edge overlay.
    pub edge_opacity: f32,
}

impl GridPresentation {
    /// Creates a new grid descriptor.
    ///
    /// Returns an error when `cell_length` is not strictly positive.
    pub fn new(
        columns: u32,
        rows: u32,
        cell_length: f32,
        edge_opacity: f32,
    ) -> std::result::Result<Self, RenderingError> {
        if cell_length <= 0.0 {
            return Err(RenderingError::InvalidCellLength { cell_length });
        }

        Ok(Self {
            columns,
            rows,
            cell_length,
            fill_color: GRID_FILL_COLOR,
            edge_opacity,
        })
    }

    /// Total width of the grid along the x axis.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.columns as f32 * self.cell_length
    }

    /// Total depth of the grid along the z axis.
    #[must_use]
    pub const fn depth(&self) -> f32 {
        self.rows as f32 * self.cell_length
    }
}

/// Placed object visible within the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScenePlacement {
    /// Identifier allocated to the object by the world.
    pub id: PlaceableId,
    /// Center of the object's visible body.
    pub position: Vec3,
    /// Whether the selection tint is applied to the object's boundary.
    pub highlighted: bool,
}

/// Drag preview hovering over the candidate cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScenePreview {
    /// Center of the hovering preview body.
    pub position: Vec3,
    /// Backlight color derived from the legality verdict.
    pub backlight_color: Color,
}

/// Mobile entity walking a registered path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneEntity {
    /// Identifier allocated to the entity by the world.
    pub id: EntityId,
    /// Center of the entity's body.
    pub position: Vec3,
}

/// Scene description combining the grid, its inhabitants and the drag state.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Placement grid that composes the ground plane.
    pub grid: GridPresentation,
    /// Objects currently placed on the grid, in id order.
    pub placements: Vec<ScenePlacement>,
    /// Active drag preview, if a drag session holds a candidate cell.
    pub preview: Option<ScenePreview>,
    /// Ground tiles tracing every registered path, in registration order.
    pub path_tiles: Vec<Vec3>,
    /// Entities currently walking a path, in id order.
    pub entities: Vec<SceneEntity>,
    /// Pointer shape matching the current drag verdict.
    pub cursor: CursorStyle,
}

/// Projects the world's query views into a drawable scene description.
#[must_use]
pub fn build_scene(world: &World) -> Scene {
    let grid = query::grid(world);
    let drag_view = query::drag_view(world);
    let selected = query::selected_object(world);

    let dragging = matches!(drag_view.mode, query::ProcessMode::Dragging { .. });
    let edge_opacity = if dragging { DRAG_HIGHLIGHT_OPACITY } else { 0.0 };

    let placements = query::placements(world)
        .iter()
        .map(|snapshot| ScenePlacement {
            id: snapshot.id,
            position: to_vec3(snapshot.position),
            highlighted: selected == Some(snapshot.id),
        })
        .collect();

    let preview = drag_view.candidate_cell.filter(|_| dragging).map(|cell| {
        let backlight_color = if drag_view.blocked {
            BACKLIGHT_BLOCKED_COLOR
        } else {
            BACKLIGHT_LEGAL_COLOR
        };
        ScenePreview {
            position: to_vec3(grid.cell_center(cell).raised(PREVIEW_LIFT)),
            backlight_color,
        }
    });

    let path_tiles = query::paths(world)
        .iter()
        .flat_map(|path| path.segments().iter().copied().map(to_vec3))
        .collect();

    let entities = query::entity_view(world)
        .iter()
        .map(|snapshot| SceneEntity {
            id: snapshot.id,
            position: to_vec3(snapshot.position),
        })
        .collect();

    let cursor = if dragging && drag_view.blocked {
        CursorStyle::NotAllowed
    } else {
        CursorStyle::Pointer
    };

    Scene {
        grid: GridPresentation {
            columns: grid.columns(),
            rows: grid.rows(),
            cell_length: grid.cell_length(),
            fill_color: GRID_FILL_COLOR,
            edge_opacity,
        },
        placements,
        preview,
        path_tiles,
        entities,
        cursor,
    }
}

fn to_vec3(point: WorldPoint) -> Vec3 {
    Vec3::new(point.x, point.y, point.z)
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Gridkeep scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta
    /// and may replace the scene before it is rendered, allowing adapters to
    /// animate world snapshots deterministically.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Cell length must be positive to avoid a zero-area grid.
    InvalidCellLength {
        /// Provided cell length that failed validation.
        cell_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellLength { cell_length } => {
                write!(f, "cell_length must be positive (received {cell_length})")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use gridkeep_core::{
        CellCoord, CellHit, Command, Direction, DragRequest, PathCommand, WorldPoint,
    };
    use gridkeep_world::{self as world, World};

    fn drag_to(world: &mut World, cell: CellCoord) {
        let mut events = Vec::new();
        world::apply(world, Command::StartCreation, &mut events);
        world::apply(
            world,
            Command::BeginDrag {
                request: DragRequest::New {
                    preview_extent: 1.5,
                },
            },
            &mut events,
        );
        let point = query::grid(world).cell_center(cell);
        world::apply(
            world,
            Command::DragTick {
                cell_hits: vec![CellHit {
                    cell,
                    point,
                    distance: 5.0,
                }],
                boundary_hits: Vec::new(),
            },
            &mut events,
        );
    }

    #[test]
    fn idle_world_produces_an_empty_scene() {
        let world = World::new();
        let scene = build_scene(&world);

        assert_eq!(scene.grid.columns, 10);
        assert_eq!(scene.grid.edge_opacity, 0.0);
        assert!(scene.placements.is_empty());
        assert!(scene.preview.is_none());
        assert_eq!(scene.cursor, CursorStyle::Pointer);
    }

    #[test]
    fn active_drags_raise_the_edge_overlay_and_preview() {
        let mut world = World::new();
        drag_to(&mut world, CellCoord::new(2, 3));

        let scene = build_scene(&world);

        assert_eq!(scene.grid.edge_opacity, DRAG_HIGHLIGHT_OPACITY);
        let preview = scene.preview.expect("candidate cell must yield a preview");
        assert_eq!(preview.backlight_color, BACKLIGHT_LEGAL_COLOR);
        assert_eq!(scene.cursor, CursorStyle::Pointer);
    }

    #[test]
    fn committed_objects_appear_as_placements() {
        let mut world = World::new();
        let cell = CellCoord::new(4, 4);
        drag_to(&mut world, cell);
        let mut events = Vec::new();
        world::apply(&mut world, Command::CommitDrag, &mut events);

        let scene = build_scene(&world);

        assert_eq!(scene.placements.len(), 1);
        assert!(!scene.placements[0].highlighted);
        assert_eq!(scene.grid.edge_opacity, 0.0, "overlay resets after commit");
    }

    #[test]
    fn registered_paths_surface_their_segment_tiles() {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::GeneratePath {
                origin: WorldPoint {
                    x: 0.0,
                    y: 0.0,
                    z: 0.0,
                },
                commands: vec![PathCommand {
                    direction: Direction::Forward,
                    steps: 3,
                }],
            },
            &mut events,
        );

        let scene = build_scene(&world);

        // Origin tile plus one tile per unit stepped.
        assert_eq!(scene.path_tiles.len(), 4);
    }

    #[test]
    fn backends_replay_scene_updates_until_exhausted() {
        use std::{cell::Cell, rc::Rc, time::Duration};

        /// Backend that renders nothing and stops after a fixed frame count.
        struct HeadlessBackend {
            frames: u32,
        }

        impl RenderingBackend for HeadlessBackend {
            fn run<F>(self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
            where
                F: FnMut(Duration, &mut Scene) + 'static,
            {
                let mut scene = presentation.scene;
                for _ in 0..self.frames {
                    update_scene(Duration::from_millis(16), &mut scene);
                }
                Ok(())
            }
        }

        let world = World::new();
        let presentation = Presentation::new("Gridkeep", GRID_FILL_COLOR, build_scene(&world));
        assert_eq!(presentation.window_title, "Gridkeep");

        let updates = Rc::new(Cell::new(0u32));
        let seen = Rc::clone(&updates);
        HeadlessBackend { frames: 3 }
            .run(presentation, move |_, scene| {
                seen.set(seen.get() + 1);
                scene.grid.edge_opacity = 0.0;
            })
            .expect("headless backend runs to completion");

        assert_eq!(updates.get(), 3, "one scene update per rendered frame");
    }

    #[test]
    fn grid_presentation_rejects_non_positive_cell_lengths() {
        let error = GridPresentation::new(4, 4, 0.0, 0.0)
            .expect_err("zero cell_length must be rejected");

        assert!(matches!(
            error,
            RenderingError::InvalidCellLength { .. }
        ));
    }
}
