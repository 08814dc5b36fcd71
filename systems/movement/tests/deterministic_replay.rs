use std::time::Duration;

use gridkeep_core::{Command, Direction, Event, PathCommand, WorldPoint};
use gridkeep_system_movement::Movement;
use gridkeep_world::{self as world, query, World};

#[test]
fn deterministic_replay_produces_identical_event_logs() {
    let first = replay();
    let second = replay();

    assert_eq!(first, second, "replay diverged between runs");
    assert!(
        first
            .iter()
            .any(|event| matches!(event, Event::EntityRetired { .. })),
        "scenario must run the follower to completion",
    );
}

fn replay() -> Vec<Event> {
    let mut world = World::new();
    let mut movement = Movement::new();
    let mut log = Vec::new();

    for command in scripted_commands() {
        world::apply(&mut world, command, &mut log);
    }

    for _ in 0..120 {
        let mut frame_events = Vec::new();
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut frame_events,
        );

        let entity_view = query::entity_view(&world);
        let mut commands = Vec::new();
        movement.handle(&frame_events, &entity_view, &mut commands);
        for command in commands {
            world::apply(&mut world, command, &mut frame_events);
        }
        log.extend(frame_events);
    }

    log
}

fn scripted_commands() -> Vec<Command> {
    let path = vec![
        PathCommand {
            direction: Direction::Forward,
            steps: 2,
        },
        PathCommand {
            direction: Direction::Left,
            steps: 1,
        },
    ];
    vec![
        Command::GeneratePath {
            origin: WorldPoint {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            },
            commands: path,
        },
        Command::SpawnEntity {
            path: gridkeep_core::PathId::new(0),
        },
        Command::SpawnEntity {
            path: gridkeep_core::PathId::new(0),
        },
    ]
}
