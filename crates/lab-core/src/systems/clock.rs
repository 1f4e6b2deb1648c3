//! Clock and Turn Priority
//!
//! End-of-tick bookkeeping: re-derive the turn order from energy, then
//! advance the step counter.

use bevy_ecs::prelude::*;
use std::cmp::Reverse;

use crate::components::entity::Energy;

/// Resource: step counter and the host-facing predicates
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct SimClock {
    pub steps: u64,
    pub max_steps: Option<u64>,
    pub check_interval: Option<u64>,
}

impl SimClock {
    pub fn new(max_steps: Option<u64>, check_interval: Option<u64>) -> Self {
        Self {
            steps: 0,
            max_steps,
            check_interval,
        }
    }

    /// True once the configured step cap is reached; never without a cap
    pub fn is_end(&self) -> bool {
        self.max_steps.map_or(false, |max| self.steps >= max)
    }

    /// True on multiples of the checkpoint interval, including step 0
    pub fn time_to_checkpoint(&self) -> bool {
        match self.check_interval {
            Some(interval) if interval > 0 => self.steps % interval == 0,
            _ => false,
        }
    }
}

/// Resource: agents in the order they act this tick
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnOrder(pub Vec<Entity>);

/// Sort agents by energy, highest first. The sort is stable, so agents with
/// equal energy keep their previous relative order.
pub fn reorder_turns(mut order: ResMut<TurnOrder>, energies: Query<&Energy>) {
    order
        .0
        .sort_by_key(|entity| Reverse(energies.get(*entity).map_or(0, |e| e.0)));
}

pub fn advance_clock(mut clock: ResMut<SimClock>) {
    clock.steps += 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_predicate() {
        let mut clock = SimClock::new(Some(10), Some(5));
        for step in 0..10 {
            clock.steps = step;
            assert!(!clock.is_end());
        }
        clock.steps = 10;
        assert!(clock.is_end());
        clock.steps = 11;
        assert!(clock.is_end());

        let endless = SimClock {
            steps: u64::MAX,
            ..SimClock::new(None, None)
        };
        assert!(!endless.is_end());
    }

    #[test]
    fn test_checkpoint_predicate() {
        let mut clock = SimClock::new(Some(10), Some(5));
        let hits: Vec<u64> = (0..=10)
            .filter(|s| {
                clock.steps = *s;
                clock.time_to_checkpoint()
            })
            .collect();
        assert_eq!(hits, vec![0, 5, 10]);

        let never = SimClock::new(None, None);
        assert!(!never.time_to_checkpoint());
    }

    #[test]
    fn test_reorder_is_stable_by_energy() {
        let mut world = World::new();
        let a = world.spawn(Energy(3)).id();
        let b = world.spawn(Energy(7)).id();
        let c = world.spawn(Energy(3)).id();
        let d = world.spawn(Energy(9)).id();
        world.insert_resource(TurnOrder(vec![c, a, b, d]));

        let mut schedule = Schedule::default();
        schedule.add_systems(reorder_turns);
        schedule.run(&mut world);

        assert_eq!(world.resource::<TurnOrder>().0, vec![d, b, c, a]);
    }

    #[test]
    fn test_advance_clock() {
        let mut world = World::new();
        world.insert_resource(SimClock::new(None, None));

        let mut schedule = Schedule::default();
        schedule.add_systems(advance_clock);
        schedule.run(&mut world);
        schedule.run(&mut world);

        assert_eq!(world.resource::<SimClock>().steps, 2);
    }
}
