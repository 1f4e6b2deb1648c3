//! World Construction
//!
//! Creates the ground layer, spawns and places every agent (relocating on
//! collisions), then scatters blocks. Running out of free tiles aborts
//! construction rather than leaving the world under-populated.

use bevy_ecs::prelude::*;
use bevy_ecs::query::Has;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::components::entity::{
    ActionMemory, Agent, AgentBundle, AgentId, Block, BlockBundle, Energy, Kind, Look, Metabolism,
    Mind, Position,
};
use crate::components::grid::OccupancyGrid;
use crate::config::{AgentDef, BlockDef, Config};
use crate::error::SimError;
use crate::events::TickEvents;
use crate::systems::clock::{SimClock, TurnOrder};
use crate::systems::placement::place_entity;
use crate::{SimRng, WorldInfo};

/// Counts reported after construction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnSummary {
    pub agents: usize,
    pub blocks: usize,
    pub by_kind: Vec<(String, usize)>,
}

/// Build a ready-to-run world from `config` using `seed` for every draw
pub fn build_world(config: &Config, seed: u64) -> Result<World, SimError> {
    config.validate()?;

    let mut world = World::new();
    world.insert_resource(SimRng(SmallRng::seed_from_u64(seed)));
    world.insert_resource(OccupancyGrid::new(config.world.width, config.world.height));
    world.insert_resource(WorldInfo {
        name: config.world.name.clone(),
        seed,
        tile: config.tile.appearance(),
    });
    world.insert_resource(SimClock::new(
        config.world.max_steps,
        config.world.check_interval,
    ));
    world.insert_resource(TickEvents::new());

    let mut order = Vec::new();
    for def in &config.agents {
        order.extend(spawn_agents(&mut world, def)?);
    }
    world.insert_resource(TurnOrder(order));

    for def in &config.blocks {
        spawn_blocks(&mut world, def, config.world.width, config.world.block_jitter)?;
    }

    let summary = spawn_summary(&mut world);
    tracing::info!(
        "Built world '{}' ({}x{}) with {} agents and {} blocks, seed {}",
        config.world.name,
        config.world.width,
        config.world.height,
        summary.agents,
        summary.blocks,
        seed
    );
    for (kind, count) in &summary.by_kind {
        tracing::debug!("  {}: {}", kind, count);
    }

    Ok(world)
}

/// Spawn every instance of an agent kind, in creation order
pub fn spawn_agents(world: &mut World, def: &AgentDef) -> Result<Vec<Entity>, SimError> {
    let mut spawned = Vec::new();

    for i in 0..def.count as usize {
        let entity = world
            .spawn(AgentBundle {
                agent: Agent,
                id: AgentId(format!("{}_{:04}", def.kind, i)),
                kind: Kind(def.kind.clone()),
                look: Look(def.appearance()),
                position: Position::default(),
                energy: Energy(def.energy),
                metabolism: Metabolism {
                    step_cost: def.step_cost,
                    move_cost: def.move_cost,
                    bite_damage: def.bite_damage,
                },
                mind: Mind(def.policy),
                memory: ActionMemory::default(),
            })
            .id();

        let requested = def.spawn.get(i).copied();
        let placed = place_entity(world, entity, requested, true)?;
        if requested.is_some_and(|r| r != placed) {
            tracing::debug!(
                "{} {} relocated from {:?} to {}",
                def.kind,
                i,
                requested,
                placed
            );
        }
        spawned.push(entity);
    }

    Ok(spawned)
}

/// Scatter the instances of a block kind
pub fn spawn_blocks(
    world: &mut World,
    def: &BlockDef,
    width: u32,
    jitter: f64,
) -> Result<Vec<Entity>, SimError> {
    let count = {
        let mut rng = world.resource_mut::<SimRng>();
        def.count.resolve(width, jitter, &mut rng.0)
    };
    let mut spawned = Vec::new();

    for i in 0..count as usize {
        let entity = world
            .spawn(BlockBundle {
                block: Block,
                kind: Kind(def.kind.clone()),
                look: Look(def.appearance()),
                position: Position::default(),
            })
            .id();
        place_entity(world, entity, def.positions.get(i).copied(), true)?;
        spawned.push(entity);
    }

    Ok(spawned)
}

/// Count agents and blocks by kind
pub fn spawn_summary(world: &mut World) -> SpawnSummary {
    let mut summary = SpawnSummary::default();

    let mut query = world.query::<(&Kind, Has<Agent>)>();
    for (kind, is_agent) in query.iter(world) {
        if is_agent {
            summary.agents += 1;
        } else {
            summary.blocks += 1;
        }
        match summary.by_kind.iter_mut().find(|(k, _)| *k == kind.0) {
            Some((_, count)) => *count += 1,
            None => summary.by_kind.push((kind.0.clone(), 1)),
        }
    }

    summary
}
