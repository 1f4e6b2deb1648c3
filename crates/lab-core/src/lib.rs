//! ASCII lab simulation engine.
//!
//! A population of agents on a bounded grid, advanced one turn at a time
//! under one-occupant-per-tile exclusion and simple energy accounting.

use bevy_ecs::prelude::*;
use lab_events::Appearance;
use rand::rngs::SmallRng;

pub mod actions;
pub mod components;
pub mod config;
pub mod error;
pub mod events;
pub mod output;
pub mod policy;
pub mod setup;
pub mod simulation;
pub mod systems;

pub use actions::Action;
pub use components::{Coord, Delta, Occupant, OccupantClass, OccupancyGrid};
pub use config::{Config, ConfigError};
pub use error::{GridError, SimError};
pub use policy::{BehaviorPolicy, PolicyKind};
pub use simulation::Simulation;

/// Seeded random number generator resource
#[derive(Resource)]
pub struct SimRng(pub SmallRng);

/// Static facts about the running world
#[derive(Resource, Debug, Clone)]
pub struct WorldInfo {
    pub name: String,
    pub seed: u64,
    pub tile: Appearance,
}
