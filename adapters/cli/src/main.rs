#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Gridkeep experience.

mod layout_transfer;

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use gridkeep_core::{CellCoord, CellHit, Command, Direction, Event, PathCommand, WorldPoint};
use gridkeep_rendering::build_scene;
use gridkeep_system_bootstrap::Bootstrap;
use gridkeep_system_movement::Movement;
use gridkeep_system_placement::{Placement, PlacementInput};
use gridkeep_system_spawning::{Config as SpawningConfig, Spawning};
use gridkeep_world::{self as world, query, World};

use crate::layout_transfer::GroundLayoutSnapshot;

const FRAME: Duration = Duration::from_millis(16);
const PREVIEW_EXTENT: f32 = 1.5;

/// Command-line interface for the Gridkeep placement sandbox.
#[derive(Debug, Parser)]
#[command(name = "gridkeep", about = "Grid placement and path-following sandbox")]
struct Cli {
    /// Subcommand to execute; defaults to a deterministic simulation.
    #[command(subcommand)]
    command: Option<CliCommand>,
}

/// Operations exposed by the command-line adapter.
#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Runs a scripted placement and path-following scenario.
    Simulate {
        /// Number of frames to simulate.
        #[arg(long, default_value_t = 240)]
        frames: u32,
        /// Milliseconds between entity spawns.
        #[arg(long, default_value_t = 500)]
        spawn_interval_ms: u64,
        /// Seed for the deterministic path selection.
        #[arg(long, default_value_t = 0x5eed)]
        seed: u64,
    },
    /// Prints the scripted layout as a clipboard transfer string.
    ExportLayout,
    /// Rebuilds a world from a clipboard transfer string.
    ImportLayout {
        /// Encoded layout produced by `export-layout`.
        layout: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command.unwrap_or(CliCommand::Simulate {
        frames: 240,
        spawn_interval_ms: 500,
        seed: 0x5eed,
    }) {
        CliCommand::Simulate {
            frames,
            spawn_interval_ms,
            seed,
        } => simulate(frames, Duration::from_millis(spawn_interval_ms), seed),
        CliCommand::ExportLayout => export_layout(),
        CliCommand::ImportLayout { layout } => import_layout(&layout),
    }
}

fn simulate(frames: u32, spawn_interval: Duration, seed: u64) -> Result<()> {
    let mut world = World::new();
    let bootstrap = Bootstrap::default();
    println!("{}", bootstrap.welcome_banner(&world));

    let mut placement = Placement::new();
    for cell in scripted_cells() {
        place_object(&mut world, &mut placement, cell)?;
    }

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::GeneratePath {
            origin: WorldPoint {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            },
            commands: vec![
                PathCommand {
                    direction: Direction::Forward,
                    steps: 4,
                },
                PathCommand {
                    direction: Direction::Right,
                    steps: 3,
                },
            ],
        },
        &mut events,
    );
    let registered: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::PathGenerated { path, .. } => Some(*path),
            _ => None,
        })
        .collect();
    if registered.is_empty() {
        return Err(anyhow!("scripted path generation was rejected"));
    }

    let mut movement = Movement::new();
    let mut spawning = Spawning::new(SpawningConfig::new(spawn_interval, seed));
    let mut spawned = 0usize;
    let mut retired = 0usize;

    for _ in 0..frames {
        let mut frame_events = Vec::new();
        world::apply(&mut world, Command::Tick { dt: FRAME }, &mut frame_events);

        let mut commands = Vec::new();
        spawning.handle(&frame_events, &registered, &mut commands);
        movement.handle(&frame_events, &query::entity_view(&world), &mut commands);
        for command in commands {
            world::apply(&mut world, command, &mut frame_events);
        }

        for event in &frame_events {
            match event {
                Event::EntitySpawned { .. } => spawned += 1,
                Event::EntityRetired { .. } => retired += 1,
                _ => {}
            }
        }
    }

    let scene = build_scene(&world);
    println!("frames simulated: {frames}");
    println!("objects placed:   {}", scene.placements.len());
    println!("path tiles:       {}", scene.path_tiles.len());
    println!("entities spawned: {spawned}");
    println!("entities retired: {retired}");
    println!("entities walking: {}", scene.entities.len());
    Ok(())
}

fn export_layout() -> Result<()> {
    let mut world = World::new();
    let mut placement = Placement::new();
    for cell in scripted_cells() {
        place_object(&mut world, &mut placement, cell)?;
    }

    println!("{}", layout_snapshot(&world).encode());
    Ok(())
}

fn import_layout(layout: &str) -> Result<()> {
    let snapshot = GroundLayoutSnapshot::decode(layout).context("could not decode layout")?;

    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureGrid {
            columns: snapshot.columns,
            rows: snapshot.rows,
            cell_length: snapshot.cell_length,
        },
        &mut events,
    );
    let mut placement = Placement::new();
    for cell in &snapshot.occupied_cells {
        place_object(&mut world, &mut placement, *cell)?;
    }

    let placements = query::placements(&world);
    println!(
        "restored {} objects on a {}x{} grid",
        placements.len(),
        snapshot.columns,
        snapshot.rows
    );
    Ok(())
}

fn layout_snapshot(world: &World) -> GroundLayoutSnapshot {
    let grid = query::grid(world);
    GroundLayoutSnapshot {
        columns: grid.columns(),
        rows: grid.rows(),
        cell_length: grid.cell_length(),
        occupied_cells: query::placements(world)
            .iter()
            .map(|snapshot| snapshot.cell)
            .collect(),
    }
}

/// Runs one frame of the placement system and applies every emitted command.
fn pump_placement(
    world: &mut World,
    placement: &mut Placement,
    input: PlacementInput,
    cell_hits: Vec<CellHit>,
    events: &mut Vec<Event>,
) {
    let drag_view = query::drag_view(world);
    let selected = query::selected_object(world);
    let mut commands = Vec::new();
    placement.handle(
        &drag_view,
        selected,
        input,
        || cell_hits.clone(),
        Vec::new,
        &mut commands,
    );
    for command in commands {
        world::apply(world, command, events);
    }
}

/// Drives the full creation flow for a single cell through the placement
/// system, exactly as an interactive frame loop would: palette release,
/// preview instantiation, one pointer move, then a release over the surface.
fn place_object(world: &mut World, placement: &mut Placement, cell: CellCoord) -> Result<()> {
    let mut events = Vec::new();
    pump_placement(
        world,
        placement,
        PlacementInput {
            palette_release: true,
            ..PlacementInput::default()
        },
        Vec::new(),
        &mut events,
    );
    pump_placement(
        world,
        placement,
        PlacementInput {
            preview_ready: Some(PREVIEW_EXTENT),
            ..PlacementInput::default()
        },
        Vec::new(),
        &mut events,
    );
    let hit = CellHit {
        cell,
        point: query::grid(world).cell_center(cell),
        distance: 5.0,
    };
    pump_placement(
        world,
        placement,
        PlacementInput {
            pointer_moved: true,
            ..PlacementInput::default()
        },
        vec![hit],
        &mut events,
    );
    pump_placement(
        world,
        placement,
        PlacementInput {
            surface_release: true,
            ..PlacementInput::default()
        },
        vec![hit],
        &mut events,
    );

    if !events
        .iter()
        .any(|event| matches!(event, Event::ObjectPlaced { .. }))
    {
        return Err(anyhow!("placement at {cell:?} was rejected"));
    }
    Ok(())
}

fn scripted_cells() -> [CellCoord; 3] {
    [
        CellCoord::new(2, 2),
        CellCoord::new(3, 5),
        CellCoord::new(7, 1),
    ]
}
