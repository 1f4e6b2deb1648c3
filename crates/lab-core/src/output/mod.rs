//! Snapshot Output
//!
//! Read-only capture of the grid and agent list for observers, and writing
//! it to disk as JSON.

use bevy_ecs::prelude::*;
use lab_events::{generate_snapshot_id, AgentSnapshot, BlockSnapshot, WorldSnapshot};
use std::fs;
use std::path::{Path, PathBuf};

use crate::components::entity::{ActionMemory, AgentId, Block, Energy, Kind, Look, Position};
use crate::components::grid::OccupancyGrid;
use crate::error::SimError;
use crate::systems::clock::{SimClock, TurnOrder};
use crate::WorldInfo;

/// Agents in current turn order
pub fn agent_snapshots(world: &World) -> Vec<AgentSnapshot> {
    world
        .resource::<TurnOrder>()
        .0
        .iter()
        .filter_map(|entity| agent_snapshot(world, *entity))
        .collect()
}

fn agent_snapshot(world: &World, entity: Entity) -> Option<AgentSnapshot> {
    let memory = world.get::<ActionMemory>(entity)?;
    Some(AgentSnapshot {
        agent_id: world.get::<AgentId>(entity)?.0.clone(),
        kind: world.get::<Kind>(entity)?.0.clone(),
        appearance: world.get::<Look>(entity)?.0.clone(),
        position: world
            .get::<Position>(entity)?
            .coord()
            .map(|c| c.to_array()),
        energy: world.get::<Energy>(entity)?.0,
        last_action: memory.last_record(),
        last_action_succeeded: memory.last_succeeded,
    })
}

/// Blocks sorted row-major by position
pub fn block_snapshots(world: &World) -> Vec<BlockSnapshot> {
    let mut blocks: Vec<BlockSnapshot> = world
        .iter_entities()
        .filter(|e| e.contains::<Block>())
        .filter_map(|e| {
            let position = e.get::<Position>()?.coord()?;
            Some(BlockSnapshot {
                kind: e.get::<Kind>()?.0.clone(),
                appearance: e.get::<Look>()?.0.clone(),
                position: position.to_array(),
            })
        })
        .collect();
    blocks.sort_by_key(|b| (b.position[1], b.position[0]));
    blocks
}

/// Capture the complete world state
pub fn generate_snapshot(world: &World) -> WorldSnapshot {
    let info = world.resource::<WorldInfo>();
    let grid = world.resource::<OccupancyGrid>();
    let steps = world.resource::<SimClock>().steps;

    WorldSnapshot {
        snapshot_id: generate_snapshot_id(steps),
        name: info.name.clone(),
        steps,
        width: grid.width(),
        height: grid.height(),
        seed: info.seed,
        tile: info.tile.clone(),
        agents: agent_snapshots(world),
        blocks: block_snapshots(world),
    }
}

/// Write a snapshot to `<dir>/<snapshot_id>.json`, creating `dir` if needed
pub fn write_snapshot(dir: impl AsRef<Path>, snapshot: &WorldSnapshot) -> Result<PathBuf, SimError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.json", snapshot.snapshot_id));
    fs::write(&path, serde_json::to_string_pretty(snapshot)?)?;
    Ok(path)
}
