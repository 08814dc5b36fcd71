use gridkeep_core::{BoundaryHit, CellCoord, CellHit, Event};
use gridkeep_system_placement::{Placement, PlacementInput};
use gridkeep_world::{self as world, query, World};

/// Runs one frame of the placement system and applies every emitted command.
fn pump(
    placement: &mut Placement,
    world: &mut World,
    input: PlacementInput,
    cell_hits: Vec<CellHit>,
    boundary_hits: Vec<BoundaryHit>,
) -> Vec<Event> {
    let drag_view = query::drag_view(world);
    let selected = query::selected_object(world);
    let mut commands = Vec::new();
    placement.handle(
        &drag_view,
        selected,
        input,
        || cell_hits.clone(),
        || boundary_hits.clone(),
        &mut commands,
    );

    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn cell_hit(world: &World, cell: CellCoord) -> CellHit {
    CellHit {
        cell,
        point: query::grid(world).cell_center(cell),
        distance: 6.0,
    }
}

/// Drives the full creation flow the frame loop would perform: palette
/// release, preview instantiation, one drag tick over `cell`, then a commit.
fn place_at(placement: &mut Placement, world: &mut World, cell: CellCoord) -> Vec<Event> {
    let mut events = Vec::new();
    events.extend(pump(
        placement,
        world,
        PlacementInput {
            palette_release: true,
            ..PlacementInput::default()
        },
        Vec::new(),
        Vec::new(),
    ));
    events.extend(pump(
        placement,
        world,
        PlacementInput {
            preview_ready: Some(1.5),
            ..PlacementInput::default()
        },
        Vec::new(),
        Vec::new(),
    ));
    let hit = cell_hit(world, cell);
    events.extend(pump(
        placement,
        world,
        PlacementInput {
            pointer_moved: true,
            ..PlacementInput::default()
        },
        vec![hit],
        Vec::new(),
    ));
    events.extend(pump(
        placement,
        world,
        PlacementInput {
            surface_release: true,
            ..PlacementInput::default()
        },
        vec![hit],
        Vec::new(),
    ));
    events
}

#[test]
fn full_creation_flow_places_an_object() {
    let mut placement = Placement::new();
    let mut world = World::new();
    let cell = CellCoord::new(4, 4);

    let events = place_at(&mut placement, &mut world, cell);

    assert!(events
        .iter()
        .any(|event| matches!(event, Event::CreationTriggered)));
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::ObjectPlaced { cell: placed, .. } if *placed == cell)));
    assert_eq!(query::placements(&world).len(), 1);
    assert_eq!(
        query::drag_view(&world).mode,
        query::ProcessMode::Idle,
        "process resets after a commit",
    );
}

#[test]
fn commit_over_an_occupied_cell_is_withheld() {
    let mut placement = Placement::new();
    let mut world = World::new();
    let occupied = CellCoord::new(3, 3);
    let _ = place_at(&mut placement, &mut world, occupied);
    let blocker = query::object_at(&world, occupied).expect("object placed");

    // Second creation dragged over the same cell.
    let _ = pump(
        &mut placement,
        &mut world,
        PlacementInput {
            palette_release: true,
            ..PlacementInput::default()
        },
        Vec::new(),
        Vec::new(),
    );
    let _ = pump(
        &mut placement,
        &mut world,
        PlacementInput {
            preview_ready: Some(1.5),
            ..PlacementInput::default()
        },
        Vec::new(),
        Vec::new(),
    );
    let hit = cell_hit(&world, occupied);
    let boundary = BoundaryHit {
        object: blocker,
        distance: 5.0,
    };
    let _ = pump(
        &mut placement,
        &mut world,
        PlacementInput {
            pointer_moved: true,
            ..PlacementInput::default()
        },
        vec![hit],
        vec![boundary],
    );
    assert!(query::drag_view(&world).blocked);

    let events = pump(
        &mut placement,
        &mut world,
        PlacementInput {
            surface_release: true,
            ..PlacementInput::default()
        },
        vec![hit],
        vec![boundary],
    );

    assert!(events.is_empty(), "blocked commit emits nothing");
    assert_eq!(query::placements(&world).len(), 1);
}

#[test]
fn grab_and_drop_moves_an_existing_object() {
    let mut placement = Placement::new();
    let mut world = World::new();
    let home = CellCoord::new(1, 1);
    let destination = CellCoord::new(6, 2);
    let _ = place_at(&mut placement, &mut world, home);
    let object = query::object_at(&world, home).expect("object placed");

    let grab_boundary = BoundaryHit {
        object,
        distance: 4.0,
    };
    let _ = pump(
        &mut placement,
        &mut world,
        PlacementInput {
            grab_press: true,
            ..PlacementInput::default()
        },
        Vec::new(),
        vec![grab_boundary],
    );
    assert!(matches!(
        query::drag_view(&world).mode,
        query::ProcessMode::Dragging { .. }
    ));

    let hit = cell_hit(&world, destination);
    let _ = pump(
        &mut placement,
        &mut world,
        PlacementInput {
            pointer_moved: true,
            ..PlacementInput::default()
        },
        vec![hit],
        Vec::new(),
    );
    let events = pump(
        &mut placement,
        &mut world,
        PlacementInput {
            confirm_key: true,
            ..PlacementInput::default()
        },
        vec![hit],
        Vec::new(),
    );

    assert!(events
        .iter()
        .any(|event| matches!(event, Event::ObjectMoved { cell, .. } if *cell == destination)));
    assert_eq!(query::object_at(&world, destination), Some(object));
    assert_eq!(query::object_at(&world, home), None);
}

#[test]
fn destroy_key_prefers_the_selection_over_the_drag() {
    let mut placement = Placement::new();
    let mut world = World::new();
    let cell = CellCoord::new(2, 8);
    let _ = place_at(&mut placement, &mut world, cell);
    let object = query::object_at(&world, cell).expect("object placed");

    let boundary = BoundaryHit {
        object,
        distance: 3.0,
    };
    let _ = pump(
        &mut placement,
        &mut world,
        PlacementInput {
            select_press: true,
            ..PlacementInput::default()
        },
        Vec::new(),
        vec![boundary],
    );
    assert_eq!(query::selected_object(&world), Some(object));

    let events = pump(
        &mut placement,
        &mut world,
        PlacementInput {
            destroy_key: true,
            ..PlacementInput::default()
        },
        Vec::new(),
        Vec::new(),
    );

    assert!(events
        .iter()
        .any(|event| matches!(event, Event::ObjectRemoved { object: removed, .. }
            if *removed == object)));
    assert_eq!(query::selected_object(&world), None);
    assert!(query::placements(&world).is_empty());
}

#[test]
fn destroy_key_cancels_a_new_drag() {
    let mut placement = Placement::new();
    let mut world = World::new();

    let _ = pump(
        &mut placement,
        &mut world,
        PlacementInput {
            palette_release: true,
            ..PlacementInput::default()
        },
        Vec::new(),
        Vec::new(),
    );
    let _ = pump(
        &mut placement,
        &mut world,
        PlacementInput {
            preview_ready: Some(1.5),
            ..PlacementInput::default()
        },
        Vec::new(),
        Vec::new(),
    );

    let events = pump(
        &mut placement,
        &mut world,
        PlacementInput {
            destroy_key: true,
            ..PlacementInput::default()
        },
        Vec::new(),
        Vec::new(),
    );

    assert!(events
        .iter()
        .any(|event| matches!(event, Event::PreviewDiscarded)));
    assert_eq!(query::drag_view(&world).mode, query::ProcessMode::Idle);
}

#[test]
fn selection_queries_are_ignored_mid_drag() {
    let mut placement = Placement::new();
    let mut world = World::new();
    let cell = CellCoord::new(5, 5);
    let _ = place_at(&mut placement, &mut world, cell);
    let object = query::object_at(&world, cell).expect("object placed");

    let _ = pump(
        &mut placement,
        &mut world,
        PlacementInput {
            palette_release: true,
            ..PlacementInput::default()
        },
        Vec::new(),
        Vec::new(),
    );
    let _ = pump(
        &mut placement,
        &mut world,
        PlacementInput {
            preview_ready: Some(1.5),
            ..PlacementInput::default()
        },
        Vec::new(),
        Vec::new(),
    );

    let boundary = BoundaryHit {
        object,
        distance: 3.0,
    };
    let events = pump(
        &mut placement,
        &mut world,
        PlacementInput {
            select_press: true,
            ..PlacementInput::default()
        },
        Vec::new(),
        vec![boundary],
    );

    assert!(
        !events
            .iter()
            .any(|event| matches!(event, Event::SelectionHighlighted { .. })),
        "no highlight may appear while a drag is active",
    );
    assert_eq!(query::selected_object(&world), None);
}

#[test]
fn palette_release_mid_drag_cancels_the_drag() {
    let mut placement = Placement::new();
    let mut world = World::new();

    let _ = pump(
        &mut placement,
        &mut world,
        PlacementInput {
            palette_release: true,
            ..PlacementInput::default()
        },
        Vec::new(),
        Vec::new(),
    );
    let _ = pump(
        &mut placement,
        &mut world,
        PlacementInput {
            preview_ready: Some(1.5),
            ..PlacementInput::default()
        },
        Vec::new(),
        Vec::new(),
    );

    let events = pump(
        &mut placement,
        &mut world,
        PlacementInput {
            palette_release: true,
            ..PlacementInput::default()
        },
        Vec::new(),
        Vec::new(),
    );

    assert!(events
        .iter()
        .any(|event| matches!(event, Event::PreviewDiscarded)));
    assert!(events.iter().any(|event| matches!(
        event,
        Event::GridHighlightSet { opacity } if *opacity == 0.0
    )));
}
