//! Turn Loop
//!
//! Each live agent, in priority order, asks its policy for an action, has it
//! resolved against the grid and pays for it. Agents act strictly one after
//! another because every action may change what the next agent can do.

use bevy_ecs::prelude::*;
use lab_events::TurnEvent;

use crate::actions::Action;
use crate::components::entity::{ActionMemory, AgentId, Energy, Mind, Position};
use crate::components::grid::{GridView, OccupancyGrid};
use crate::error::SimError;
use crate::events::TickEvents;
use crate::policy::AgentView;
use crate::SimRng;

use super::clock::{SimClock, TurnOrder};
use super::resolve::{resolve_action, Resolution};

/// Run one turn for every agent that still has energy when its turn comes
pub fn take_turns(world: &mut World) -> Result<(), SimError> {
    let order = world.resource::<TurnOrder>().0.clone();
    let step = world.resource::<SimClock>().steps;

    for entity in order {
        let energy = world
            .get::<Energy>(entity)
            .ok_or_else(|| SimError::missing::<Energy>(entity))?
            .0;
        // Bites earlier in the tick can exhaust an agent before its turn
        if energy == 0 {
            continue;
        }

        let action = choose_action(world, entity, energy)?;
        let resolution = resolve_action(world, entity, &action)?;
        let energy_after = record_outcome(world, entity, action, &resolution)?;

        let agent_id = world
            .get::<AgentId>(entity)
            .map(|id| id.0.clone())
            .ok_or_else(|| SimError::missing::<AgentId>(entity))?;
        tracing::trace!(
            step,
            agent = %agent_id,
            verb = %action.verb(),
            success = resolution.success,
            energy = energy_after,
            "turn resolved"
        );

        world.resource_mut::<TickEvents>().push(TurnEvent {
            step,
            agent_id,
            action: action.to_record(),
            success: resolution.success,
            failure: resolution.failure,
            energy_before: energy,
            energy_after,
        });
    }

    Ok(())
}

fn choose_action(world: &mut World, entity: Entity, energy: u32) -> Result<Action, SimError> {
    let position = world
        .get::<Position>(entity)
        .and_then(|p| p.coord())
        .ok_or_else(|| SimError::missing::<Position>(entity))?;
    let memory = *world
        .get::<ActionMemory>(entity)
        .ok_or_else(|| SimError::missing::<ActionMemory>(entity))?;
    let mind = world
        .get::<Mind>(entity)
        .ok_or_else(|| SimError::missing::<Mind>(entity))?
        .0;

    let view = AgentView {
        position,
        energy,
        last_action: memory.last_action,
        last_succeeded: memory.last_succeeded,
    };

    Ok(world.resource_scope(|world, mut rng: Mut<SimRng>| {
        let grid = world.resource::<OccupancyGrid>();
        mind.policy().decide(&view, &GridView::new(grid), &mut rng.0)
    }))
}

/// Remember the action and charge its cost; returns the energy left
fn record_outcome(
    world: &mut World,
    entity: Entity,
    action: Action,
    resolution: &Resolution,
) -> Result<u32, SimError> {
    world
        .get_mut::<ActionMemory>(entity)
        .ok_or_else(|| SimError::missing::<ActionMemory>(entity))?
        .record(action, resolution.success);

    let mut energy = world
        .get_mut::<Energy>(entity)
        .ok_or_else(|| SimError::missing::<Energy>(entity))?;
    energy.spend(resolution.energy_delta);
    Ok(energy.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::{Agent, Kind, Metabolism};
    use crate::components::grid::Coord;
    use crate::policy::PolicyKind;
    use crate::systems::placement::place_entity;
    use lab_events::Verb;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn test_world(width: u32, height: u32) -> World {
        let mut world = World::new();
        world.insert_resource(OccupancyGrid::new(width, height));
        world.insert_resource(SimRng(SmallRng::seed_from_u64(21)));
        world.insert_resource(SimClock::new(None, None));
        world.insert_resource(TickEvents::new());
        world.insert_resource(TurnOrder::default());
        world
    }

    fn spawn(world: &mut World, name: &str, at: Coord, energy: u32, policy: PolicyKind) -> Entity {
        let entity = world
            .spawn((
                Agent,
                AgentId(name.to_string()),
                Kind("test".to_string()),
                Position::default(),
                Energy(energy),
                Metabolism {
                    step_cost: 1,
                    move_cost: 0,
                    bite_damage: 0,
                },
                Mind(policy),
                ActionMemory::default(),
            ))
            .id();
        place_entity(world, entity, Some(at), false).unwrap();
        world.resource_mut::<TurnOrder>().0.push(entity);
        entity
    }

    #[test]
    fn test_turns_charge_and_record() {
        let mut world = test_world(3, 3);
        let a = spawn(&mut world, "a", Coord::new(0, 0), 3, PolicyKind::Inert);
        let b = spawn(&mut world, "b", Coord::new(2, 2), 1, PolicyKind::Inert);

        take_turns(&mut world).unwrap();

        assert_eq!(world.get::<Energy>(a), Some(&Energy(2)));
        assert_eq!(world.get::<Energy>(b), Some(&Energy(0)));
        let memory = world.get::<ActionMemory>(a).unwrap();
        assert_eq!(memory.last_action, Some(Action::Idle));
        assert!(memory.last_succeeded);

        let events = world.resource_mut::<TickEvents>().drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].agent_id, "a");
        assert_eq!((events[1].energy_before, events[1].energy_after), (1, 0));
    }

    #[test]
    fn test_exhausted_agents_are_skipped() {
        let mut world = test_world(3, 3);
        let tired = spawn(&mut world, "tired", Coord::new(1, 1), 0, PolicyKind::Wanderer);

        take_turns(&mut world).unwrap();

        assert!(world.resource::<TickEvents>().is_empty());
        assert_eq!(world.get::<Position>(tired), Some(&Position(Some(Coord::new(1, 1)))));
        assert!(world.get::<ActionMemory>(tired).unwrap().last_action.is_none());
    }

    #[test]
    fn test_agent_bitten_to_zero_loses_its_turn() {
        let mut bitten_out = 0;
        for seed in 0..64 {
            // Boxed in on a 2x1 grid the wanderer can only bite or idle
            let mut world = test_world(2, 1);
            world.insert_resource(SimRng(SmallRng::seed_from_u64(seed)));
            let biter = spawn(&mut world, "biter", Coord::new(0, 0), 10, PolicyKind::Wanderer);
            let prey = spawn(&mut world, "prey", Coord::new(1, 0), 3, PolicyKind::Inert);
            world.get_mut::<Metabolism>(biter).unwrap().bite_damage = 5;

            take_turns(&mut world).unwrap();
            let events = world.resource_mut::<TickEvents>().drain();
            assert_eq!(events[0].agent_id, "biter");

            if events[0].action.verb == Verb::Feed {
                assert!(events[0].success);
                assert_eq!(world.get::<Energy>(prey), Some(&Energy(0)));
                assert_eq!(events.len(), 1, "exhausted prey still acted");
                assert!(world.get::<ActionMemory>(prey).unwrap().last_action.is_none());
                bitten_out += 1;
            } else {
                assert_eq!(events.len(), 2);
                assert_eq!(events[1].agent_id, "prey");
            }
        }
        assert!(bitten_out > 0, "no seed produced a bite");
    }

    #[test]
    fn test_missing_components_abort_the_tick() {
        let mut world = test_world(3, 3);
        let stray = world.spawn(Agent).id();
        world.resource_mut::<TurnOrder>().0.push(stray);

        assert!(matches!(
            take_turns(&mut world),
            Err(SimError::MissingComponent { .. })
        ));
    }
}
