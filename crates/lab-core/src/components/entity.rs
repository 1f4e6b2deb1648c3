//! Entity Components
//!
//! Identity and state for anything placed on the grid. Tiles live in the
//! grid's ground layer; blocks and agents are ECS entities.

use bevy_ecs::prelude::*;
use lab_events::{ActionRecord, Appearance};

use crate::actions::Action;
use crate::components::grid::Coord;
use crate::policy::PolicyKind;

/// Marker component identifying an entity as an agent
#[derive(Component, Debug, Clone, Default)]
pub struct Agent;

/// Marker component for static obstacles
#[derive(Component, Debug, Clone, Default)]
pub struct Block;

/// Unique identifier for an agent, `<kind>_<index>`
#[derive(Component, Debug, Clone, PartialEq, Eq, Hash)]
pub struct AgentId(pub String);

/// Name of the kind descriptor an entity was built from
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Kind(pub String);

/// Display metadata, passed through to observers untouched
#[derive(Component, Debug, Clone)]
pub struct Look(pub Appearance);

/// Where the entity sits on the grid; `None` until first placed.
///
/// Only written by the placement routine, which keeps it in step with the
/// grid's back-pointer.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position(pub Option<Coord>);

impl Position {
    pub fn coord(&self) -> Option<Coord> {
        self.0
    }
}

/// Remaining energy; the agent is inert at zero
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Energy(pub u32);

impl Energy {
    pub fn is_exhausted(&self) -> bool {
        self.0 == 0
    }

    pub fn spend(&mut self, amount: u32) {
        self.0 = self.0.saturating_sub(amount);
    }
}

/// Per-agent energy parameters, fixed at creation
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Metabolism {
    /// Flat cost charged on every turn
    pub step_cost: u32,
    /// Multiplied by the action's energy ratio
    pub move_cost: u32,
    /// Energy removed from the target of a successful bite
    pub bite_damage: u32,
}

/// The behavior policy driving an agent
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mind(pub PolicyKind);

/// Last chosen action and whether it took effect
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionMemory {
    pub last_action: Option<Action>,
    pub last_succeeded: bool,
}

impl ActionMemory {
    pub fn record(&mut self, action: Action, success: bool) {
        self.last_action = Some(action);
        self.last_succeeded = success;
    }

    pub fn last_record(&self) -> Option<ActionRecord> {
        self.last_action.map(|a| a.to_record())
    }
}

/// Bundle for spawning a fresh agent
#[derive(Bundle)]
pub struct AgentBundle {
    pub agent: Agent,
    pub id: AgentId,
    pub kind: Kind,
    pub look: Look,
    pub position: Position,
    pub energy: Energy,
    pub metabolism: Metabolism,
    pub mind: Mind,
    pub memory: ActionMemory,
}

/// Bundle for spawning a block
#[derive(Bundle)]
pub struct BlockBundle {
    pub block: Block,
    pub kind: Kind,
    pub look: Look,
    pub position: Position,
}
