//! Action Resolution
//!
//! Validates an agent's chosen action against the grid and applies it.
//! Failed actions still cost the agent its energy.

use bevy_ecs::prelude::*;
use lab_events::TurnFailure;

use crate::actions::Action;
use crate::components::entity::{Energy, Metabolism, Position};
use crate::components::grid::{Coord, OccupancyGrid};
use crate::error::{GridError, SimError};

use super::placement::place_entity;

/// Result of resolving one action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub success: bool,
    pub failure: Option<TurnFailure>,
    /// Energy the acting agent pays, step cost included
    pub energy_delta: u32,
}

type Outcome = std::result::Result<(), TurnFailure>;

/// Apply `action` for `entity` and report what it cost.
///
/// Only internal inconsistencies are errors; a blocked move or a bite at
/// nothing is an unsuccessful resolution.
pub fn resolve_action(
    world: &mut World,
    entity: Entity,
    action: &Action,
) -> Result<Resolution, SimError> {
    let metabolism = *world
        .get::<Metabolism>(entity)
        .ok_or_else(|| SimError::missing::<Metabolism>(entity))?;
    let position = world
        .get::<Position>(entity)
        .and_then(|p| p.coord())
        .ok_or_else(|| SimError::missing::<Position>(entity))?;

    let outcome = if !action.has_legal_argument() {
        Err(TurnFailure::InvalidArgument)
    } else {
        match *action {
            Action::Idle => Ok(()),
            Action::Move(delta) => step_to(world, entity, position.offset(delta))?,
            Action::Feed(delta) => bite(world, position.offset(delta), metabolism.bite_damage)?,
        }
    };

    let energy_delta = action
        .energy_ratio()
        .saturating_mul(metabolism.move_cost)
        .saturating_add(metabolism.step_cost);

    Ok(Resolution {
        success: outcome.is_ok(),
        failure: outcome.err(),
        energy_delta,
    })
}

fn step_to(world: &mut World, entity: Entity, target: Coord) -> Result<Outcome, SimError> {
    match place_entity(world, entity, Some(target), false) {
        Ok(_) => Ok(Ok(())),
        Err(SimError::Grid(GridError::Occupied(_) | GridError::OutOfBounds(_))) => {
            Ok(Err(TurnFailure::Blocked))
        }
        Err(e) => Err(e),
    }
}

fn bite(world: &mut World, target: Coord, damage: u32) -> Result<Outcome, SimError> {
    let victim = world
        .resource::<OccupancyGrid>()
        .occupant_at(target)
        .filter(|o| o.is_agent());
    let Some(victim) = victim else {
        return Ok(Err(TurnFailure::NoTarget));
    };

    let mut energy = world
        .get_mut::<Energy>(victim.entity)
        .ok_or_else(|| SimError::missing::<Energy>(victim.entity))?;
    energy.spend(damage);
    Ok(Ok(()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::{Agent, Block};
    use crate::components::grid::Delta;
    use crate::systems::placement::occupancy_is_consistent;
    use crate::SimRng;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn test_world() -> World {
        let mut world = World::new();
        world.insert_resource(OccupancyGrid::new(3, 3));
        world.insert_resource(SimRng(SmallRng::seed_from_u64(0)));
        world
    }

    fn spawn_agent(world: &mut World, at: Coord, energy: u32, metabolism: Metabolism) -> Entity {
        let entity = world
            .spawn((Agent, Position::default(), Energy(energy), metabolism))
            .id();
        place_entity(world, entity, Some(at), false).unwrap();
        entity
    }

    fn step_cost(cost: u32) -> Metabolism {
        Metabolism {
            step_cost: cost,
            ..Default::default()
        }
    }

    #[test]
    fn test_idle_costs_step_only() {
        let mut world = test_world();
        let me = spawn_agent(&mut world, Coord::new(1, 1), 5, step_cost(2));

        let resolution = resolve_action(&mut world, me, &Action::Idle).unwrap();
        assert_eq!(
            resolution,
            Resolution {
                success: true,
                failure: None,
                energy_delta: 2
            }
        );
    }

    #[test]
    fn test_move_relocates_agent() {
        let mut world = test_world();
        let me = spawn_agent(&mut world, Coord::new(1, 1), 5, step_cost(1));

        let resolution = resolve_action(&mut world, me, &Action::Move(Delta::new(1, -1))).unwrap();
        assert!(resolution.success);
        assert_eq!(resolution.energy_delta, 1);
        assert_eq!(world.get::<Position>(me), Some(&Position(Some(Coord::new(2, 0)))));
        assert!(occupancy_is_consistent(&world));
    }

    #[test]
    fn test_move_cost_uses_energy_ratio() {
        let mut world = test_world();
        let metabolism = Metabolism {
            step_cost: 1,
            move_cost: 3,
            bite_damage: 0,
        };
        let me = spawn_agent(&mut world, Coord::new(0, 0), 50, metabolism);

        let moved = resolve_action(&mut world, me, &Action::Move(Delta::new(1, 0))).unwrap();
        assert_eq!(moved.energy_delta, 4);

        let idle = resolve_action(&mut world, me, &Action::Idle).unwrap();
        assert_eq!(idle.energy_delta, 1);
    }

    #[test]
    fn test_blocked_move_fails_but_costs() {
        let mut world = test_world();
        let me = spawn_agent(&mut world, Coord::new(0, 0), 5, step_cost(1));
        let wall = world.spawn((Block, Position::default())).id();
        place_entity(&mut world, wall, Some(Coord::new(1, 0)), false).unwrap();

        let into_wall = resolve_action(&mut world, me, &Action::Move(Delta::new(1, 0))).unwrap();
        assert!(!into_wall.success);
        assert_eq!(into_wall.failure, Some(TurnFailure::Blocked));
        assert_eq!(into_wall.energy_delta, 1);

        let off_edge = resolve_action(&mut world, me, &Action::Move(Delta::new(-1, 0))).unwrap();
        assert_eq!(off_edge.failure, Some(TurnFailure::Blocked));
        assert_eq!(world.get::<Position>(me), Some(&Position(Some(Coord::new(0, 0)))));
    }

    #[test]
    fn test_illegal_delta_is_invalid() {
        let mut world = test_world();
        let me = spawn_agent(&mut world, Coord::new(0, 0), 5, step_cost(1));

        let jump = resolve_action(&mut world, me, &Action::Move(Delta::new(2, 2))).unwrap();
        assert_eq!(jump.failure, Some(TurnFailure::InvalidArgument));
        assert_eq!(world.get::<Position>(me), Some(&Position(Some(Coord::new(0, 0)))));
    }

    #[test]
    fn test_bite_damages_target() {
        let mut world = test_world();
        let biter = Metabolism {
            step_cost: 1,
            move_cost: 0,
            bite_damage: 3,
        };
        let me = spawn_agent(&mut world, Coord::new(0, 0), 10, biter);
        let prey = spawn_agent(&mut world, Coord::new(1, 1), 2, step_cost(1));

        let resolution = resolve_action(&mut world, me, &Action::Feed(Delta::new(1, 1))).unwrap();
        assert!(resolution.success);
        assert_eq!(resolution.energy_delta, 1);
        assert_eq!(world.get::<Energy>(prey), Some(&Energy(0)));
        // The biter's own energy is charged by the caller
        assert_eq!(world.get::<Energy>(me), Some(&Energy(10)));
    }

    #[test]
    fn test_bite_at_nothing_fails() {
        let mut world = test_world();
        let me = spawn_agent(&mut world, Coord::new(0, 0), 10, step_cost(1));
        let wall = world.spawn((Block, Position::default())).id();
        place_entity(&mut world, wall, Some(Coord::new(0, 1)), false).unwrap();

        let at_wall = resolve_action(&mut world, me, &Action::Feed(Delta::new(0, 1))).unwrap();
        assert_eq!(at_wall.failure, Some(TurnFailure::NoTarget));

        let at_air = resolve_action(&mut world, me, &Action::Feed(Delta::new(1, 0))).unwrap();
        assert_eq!(at_air.failure, Some(TurnFailure::NoTarget));
    }

    #[test]
    fn test_unplaced_agent_is_an_error() {
        let mut world = test_world();
        let ghost = world
            .spawn((Agent, Position::default(), Energy(1), step_cost(1)))
            .id();
        assert!(matches!(
            resolve_action(&mut world, ghost, &Action::Idle),
            Err(SimError::MissingComponent { .. })
        ));
    }
}
