#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure placement system that translates input intents into world commands.
//!
//! The system owns no authoritative state: it reads the world's drag and
//! selection snapshots, invokes the adapter-provided intersection queries
//! while a process is active, and responds exclusively with command batches.
//! The world re-validates every emitted command, so this layer only decides
//! *which* intents are worth forwarding on a given frame.

use gridkeep_core::{BoundaryHit, CellHit, Command, DragKind, DragRequest, PlaceableId};
use gridkeep_world::query::{DragView, ProcessMode};

/// Input intents distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementInput {
    /// Pointer released over the creation palette on this frame.
    pub palette_release: bool,
    /// Pointer released over the build surface on this frame.
    pub surface_release: bool,
    /// Confirm key pressed on this frame.
    pub confirm_key: bool,
    /// Cancel/delete key pressed on this frame.
    pub destroy_key: bool,
    /// Pointer moved on this frame.
    pub pointer_moved: bool,
    /// Pointer pressed down on this frame, querying a selection.
    pub select_press: bool,
    /// Begin-move intent issued against an existing object on this frame.
    pub grab_press: bool,
    /// Vertical extent of a freshly instantiated preview, when the frame
    /// loop finished reacting to a creation trigger.
    pub preview_ready: Option<f32>,
}

impl Default for PlacementInput {
    fn default() -> Self {
        Self {
            palette_release: false,
            surface_release: false,
            confirm_key: false,
            destroy_key: false,
            pointer_moved: false,
            select_press: false,
            grab_press: false,
            preview_ready: None,
        }
    }
}

/// Placement system that turns intents plus intersections into commands.
#[derive(Debug, Default)]
pub struct Placement;

impl Placement {
    /// Creates a new placement system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Consumes one frame of input intents and emits world commands.
    ///
    /// `intersect_cells` and `intersect_boundaries` perform the external
    /// pointer projection against the grid plane and the placed objects'
    /// boundary colliders respectively, nearest hit first. They are invoked
    /// only when the active process actually needs their result.
    pub fn handle<C, B>(
        &mut self,
        drag_view: &DragView,
        selected: Option<PlaceableId>,
        input: PlacementInput,
        mut intersect_cells: C,
        mut intersect_boundaries: B,
        out: &mut Vec<Command>,
    ) where
        C: FnMut() -> Vec<CellHit>,
        B: FnMut() -> Vec<BoundaryHit>,
    {
        let dragging_kind = match drag_view.mode {
            ProcessMode::Dragging { kind, .. } => Some(kind),
            _ => None,
        };

        if input.palette_release {
            if dragging_kind.is_some() {
                // Clicking the palette mid-drag abandons the drag instead of
                // stacking a second process.
                out.push(Command::CancelDrag);
            } else if drag_view.mode == ProcessMode::Idle {
                out.push(Command::StartCreation);
            }
        }

        if let Some(preview_extent) = input.preview_ready {
            if drag_view.mode == ProcessMode::Creating {
                out.push(Command::BeginDrag {
                    request: DragRequest::New { preview_extent },
                });
            }
        }

        if input.grab_press && drag_view.mode == ProcessMode::Idle {
            if let Some(hit) = intersect_boundaries().first() {
                out.push(Command::BeginDrag {
                    request: DragRequest::Move { object: hit.object },
                });
            }
        }

        if input.pointer_moved && dragging_kind.is_some() {
            out.push(Command::DragTick {
                cell_hits: intersect_cells(),
                boundary_hits: intersect_boundaries(),
            });
        }

        if (input.surface_release || input.confirm_key) && dragging_kind.is_some() {
            // Gate on the last assessed legality; the world re-validates.
            if drag_view.candidate_cell.is_some() && !drag_view.blocked {
                out.push(Command::CommitDrag);
            }
        }

        if input.destroy_key {
            if selected.is_some() {
                out.push(Command::DeleteSelected);
            } else {
                match dragging_kind {
                    Some(DragKind::New) => out.push(Command::CancelDrag),
                    Some(DragKind::Move) => out.push(Command::DeleteDragged),
                    None => {}
                }
            }
        }

        if input.select_press && drag_view.mode == ProcessMode::Idle {
            out.push(Command::Select {
                boundary_hits: intersect_boundaries(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridkeep_core::CellCoord;
    use gridkeep_world::query::DragView;

    fn idle_view() -> DragView {
        DragView {
            mode: ProcessMode::Idle,
            candidate_cell: None,
            blocked: false,
        }
    }

    #[test]
    fn palette_release_from_idle_starts_creation() {
        let mut placement = Placement::new();
        let mut commands = Vec::new();

        placement.handle(
            &idle_view(),
            None,
            PlacementInput {
                palette_release: true,
                ..PlacementInput::default()
            },
            Vec::new,
            Vec::new,
            &mut commands,
        );

        assert_eq!(commands, vec![Command::StartCreation]);
    }

    #[test]
    fn commit_is_not_forwarded_while_blocked() {
        let mut placement = Placement::new();
        let mut commands = Vec::new();

        placement.handle(
            &DragView {
                mode: ProcessMode::Dragging {
                    kind: DragKind::New,
                    object: None,
                },
                candidate_cell: Some(CellCoord::new(2, 2)),
                blocked: true,
            },
            None,
            PlacementInput {
                surface_release: true,
                ..PlacementInput::default()
            },
            Vec::new,
            Vec::new,
            &mut commands,
        );

        assert!(commands.is_empty(), "blocked drags must not commit");
    }
}
