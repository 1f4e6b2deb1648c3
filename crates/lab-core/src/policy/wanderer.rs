//! Wanderer policy: random steps with inertia, occasional stops and bites.

use lab_events::Verb;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use super::{AgentView, BehaviorPolicy};
use crate::actions::{definition, Action};
use crate::components::grid::GridView;

/// Probabilistic wanderer.
///
/// Every branch below draws exactly once, in this order:
/// inertia, stop, bite, then the choice of target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wanderer {
    /// Chance of repeating the last action if it succeeded
    pub inertia: f64,
    /// Chance of standing still
    pub stop: f64,
    /// Chance of biting a neighbour instead of moving
    pub bite: f64,
}

impl Wanderer {
    pub const DEFAULT: Wanderer = Wanderer {
        inertia: 0.66,
        stop: 0.10,
        bite: 0.50,
    };
}

impl Default for Wanderer {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl BehaviorPolicy for Wanderer {
    fn decide(&self, agent: &AgentView, grid: &GridView<'_>, rng: &mut dyn RngCore) -> Action {
        let keep_going = rng.gen_bool(self.inertia);
        if keep_going && agent.last_succeeded {
            if let Some(last) = agent.last_action {
                return last;
            }
        }

        if rng.gen_bool(self.stop) {
            return Action::Idle;
        }

        let bites = grid.possible_bites(agent.position, definition(Verb::Feed).arguments);
        if rng.gen_bool(self.bite) && !bites.is_empty() {
            if let Some(delta) = bites.choose(rng) {
                return Action::Feed(*delta);
            }
        }

        let moves = grid.possible_moves(agent.position, definition(Verb::Move).arguments);
        match moves.choose(rng) {
            Some(delta) => Action::Move(*delta),
            None => Action::Idle,
        }
    }
}
