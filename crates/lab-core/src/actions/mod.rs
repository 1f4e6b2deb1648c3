//! Actions
//!
//! An action is a verb, its argument and an energy ratio. The legal argument
//! domain and the ratio of every verb come from one lookup table so that
//! policies and the resolver agree on them.

use lab_events::{ActionRecord, Verb};

use crate::components::grid::{Delta, NEIGHBOR_DELTAS};

/// Static description of a verb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionDef {
    pub verb: Verb,
    /// Legal relative arguments; empty for verbs without one
    pub arguments: &'static [Delta],
    /// Multiplier applied to the agent's move cost
    pub energy_ratio: u32,
}

/// The verb table
pub const ACTION_DEFS: [ActionDef; 3] = [
    ActionDef {
        verb: Verb::None,
        arguments: &[],
        energy_ratio: 0,
    },
    ActionDef {
        verb: Verb::Move,
        arguments: &NEIGHBOR_DELTAS,
        energy_ratio: 1,
    },
    ActionDef {
        verb: Verb::Feed,
        arguments: &NEIGHBOR_DELTAS,
        energy_ratio: 0,
    },
];

/// Look up a verb in the table
pub fn definition(verb: Verb) -> &'static ActionDef {
    match verb {
        Verb::None => &ACTION_DEFS[0],
        Verb::Move => &ACTION_DEFS[1],
        Verb::Feed => &ACTION_DEFS[2],
    }
}

/// What an agent intends to do this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Action {
    /// Passive; does nothing
    #[default]
    Idle,
    /// Step onto the adjacent tile at the given offset
    Move(Delta),
    /// Bite whatever agent stands at the given offset
    Feed(Delta),
}

impl Action {
    pub fn verb(&self) -> Verb {
        match self {
            Action::Idle => Verb::None,
            Action::Move(_) => Verb::Move,
            Action::Feed(_) => Verb::Feed,
        }
    }

    pub fn delta(&self) -> Option<Delta> {
        match self {
            Action::Idle => None,
            Action::Move(delta) | Action::Feed(delta) => Some(*delta),
        }
    }

    pub fn definition(&self) -> &'static ActionDef {
        definition(self.verb())
    }

    pub fn energy_ratio(&self) -> u32 {
        self.definition().energy_ratio
    }

    /// Whether the argument lies in the verb's legal domain
    pub fn has_legal_argument(&self) -> bool {
        match self.delta() {
            None => self.definition().arguments.is_empty(),
            Some(delta) => self.definition().arguments.contains(&delta),
        }
    }

    pub fn to_record(&self) -> ActionRecord {
        ActionRecord {
            verb: self.verb(),
            delta: self.delta().map(|d| d.to_array()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_ratios() {
        assert_eq!(Action::Idle.energy_ratio(), 0);
        assert_eq!(Action::Move(Delta::new(1, 0)).energy_ratio(), 1);
        assert_eq!(Action::Feed(Delta::new(1, 0)).energy_ratio(), 0);
    }

    #[test]
    fn test_table_is_keyed_by_verb() {
        for def in ACTION_DEFS.iter() {
            assert_eq!(definition(def.verb), def);
        }
    }

    #[test]
    fn test_argument_domain() {
        assert!(Action::Idle.has_legal_argument());
        assert!(Action::Move(Delta::new(-1, 1)).has_legal_argument());
        assert!(!Action::Move(Delta::new(0, 0)).has_legal_argument());
        assert!(!Action::Feed(Delta::new(2, 0)).has_legal_argument());
    }

    #[test]
    fn test_record_conversion() {
        let record = Action::Feed(Delta::new(0, -1)).to_record();
        assert_eq!(record.verb, Verb::Feed);
        assert_eq!(record.delta, Some([0, -1]));
        assert_eq!(Action::Idle.to_record().delta, None);
    }
}
