//! Simulation
//!
//! Owns the ECS world and exposes the step-by-step control interface. A host
//! drives it by calling [`Simulation::step`] and reading state between
//! steps; stopping is simply not calling `step` again.

use bevy_ecs::prelude::*;
use lab_events::{AgentSnapshot, TurnEvent, WorldSnapshot};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::components::entity::Energy;
use crate::components::grid::{Coord, Occupant, OccupancyGrid};
use crate::config::Config;
use crate::error::SimError;
use crate::events::TickEvents;
use crate::output;
use crate::setup::build_world;
use crate::systems::{
    advance_clock, occupancy_is_consistent, reorder_turns, take_turns, SimClock, TurnOrder,
};
use crate::WorldInfo;

pub struct Simulation {
    world: World,
    schedule: Schedule,
    aborted: bool,
}

impl Simulation {
    /// Build from configuration, seeding from the wall clock if no seed is set
    pub fn new(config: &Config) -> Result<Self, SimError> {
        let seed = match config.world.random_seed {
            Some(seed) => seed,
            None => {
                let seed = seed_from_clock();
                tracing::info!("No random_seed configured; using {}", seed);
                seed
            }
        };
        Self::with_seed(config, seed)
    }

    pub fn with_seed(config: &Config, seed: u64) -> Result<Self, SimError> {
        let world = build_world(config, seed)?;

        let mut schedule = Schedule::default();
        schedule.add_systems((reorder_turns, advance_clock).chain());

        Ok(Self {
            world,
            schedule,
            aborted: false,
        })
    }

    /// Advance one tick.
    ///
    /// On error the tick may be half applied; the simulation refuses further
    /// steps and should be discarded.
    pub fn step(&mut self) -> Result<(), SimError> {
        if self.aborted {
            return Err(SimError::Aborted);
        }
        if let Err(e) = take_turns(&mut self.world) {
            self.aborted = true;
            tracing::error!("Tick {} aborted: {}", self.steps(), e);
            return Err(e);
        }
        self.schedule.run(&mut self.world);
        debug_assert!(occupancy_is_consistent(&self.world));
        Ok(())
    }

    pub fn steps(&self) -> u64 {
        self.world.resource::<SimClock>().steps
    }

    pub fn seed(&self) -> u64 {
        self.world.resource::<WorldInfo>().seed
    }

    pub fn is_end(&self) -> bool {
        self.world.resource::<SimClock>().is_end()
    }

    pub fn time_to_checkpoint(&self) -> bool {
        self.world.resource::<SimClock>().time_to_checkpoint()
    }

    /// True when no agent has energy left to act
    pub fn all_inert(&self) -> bool {
        self.world
            .resource::<TurnOrder>()
            .0
            .iter()
            .all(|e| self.world.get::<Energy>(*e).map_or(true, |en| en.is_exhausted()))
    }

    /// Agents in the order they will act next tick
    pub fn agents(&self) -> Vec<AgentSnapshot> {
        output::agent_snapshots(&self.world)
    }

    pub fn occupant_at(&self, coord: Coord) -> Option<Occupant> {
        self.grid().occupant_at(coord)
    }

    pub fn grid(&self) -> &OccupancyGrid {
        self.world.resource::<OccupancyGrid>()
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        output::generate_snapshot(&self.world)
    }

    /// Turn events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<TurnEvent> {
        self.world.resource_mut::<TickEvents>().drain()
    }

    /// Grid cells and stored positions agree
    pub fn is_consistent(&self) -> bool {
        occupancy_is_consistent(&self.world)
    }
}

fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
