//! Behavior Policies
//!
//! A policy picks one action per turn for an agent. It sees the grid only
//! through a read-only [`GridView`] and draws randomness from the stream it is
//! handed, so a seeded run replays exactly.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::components::grid::{Coord, GridView};

mod wanderer;

pub use wanderer::Wanderer;

/// What a policy knows about the agent it is deciding for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentView {
    pub position: Coord,
    pub energy: u32,
    pub last_action: Option<Action>,
    pub last_succeeded: bool,
}

/// Decision function shared by every behavior
pub trait BehaviorPolicy: Send + Sync {
    fn decide(&self, agent: &AgentView, grid: &GridView<'_>, rng: &mut dyn RngCore) -> Action;
}

/// Never does anything
#[derive(Debug, Clone, Copy, Default)]
pub struct Inert;

impl BehaviorPolicy for Inert {
    fn decide(&self, _agent: &AgentView, _grid: &GridView<'_>, _rng: &mut dyn RngCore) -> Action {
        Action::Idle
    }
}

static INERT: Inert = Inert;
static WANDERER: Wanderer = Wanderer::DEFAULT;

/// Policy selector as written in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    #[default]
    #[serde(alias = "mindless")]
    Inert,
    Wanderer,
}

impl PolicyKind {
    pub fn policy(&self) -> &'static dyn BehaviorPolicy {
        match self {
            PolicyKind::Inert => &INERT,
            PolicyKind::Wanderer => &WANDERER,
        }
    }
}
