//! Error types for grid placement, configuration and the turn loop.

use bevy_ecs::entity::Entity;
use thiserror::Error;

use crate::components::grid::Coord;
use crate::config::ConfigError;

/// Failures of the occupancy grid
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    #[error("coordinate {0} is outside the grid")]
    OutOfBounds(Coord),

    #[error("coordinate {0} is already occupied")]
    Occupied(Coord),

    #[error("no free tile left on the grid")]
    Full,
}

/// Errors that abort construction or a running simulation
#[derive(Error, Debug)]
pub enum SimError {
    #[error("grid error: {0}")]
    Grid(#[from] GridError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("entity {entity:?} is missing its {component} component")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("simulation aborted by an earlier error")]
    Aborted,
}

impl SimError {
    pub fn missing<T>(entity: Entity) -> Self {
        let full = std::any::type_name::<T>();
        let component = full.rsplit("::").next().unwrap_or(full);
        SimError::MissingComponent { entity, component }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
