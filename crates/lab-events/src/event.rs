//! Turn Events
//!
//! One record per resolved agent turn, suitable for append-only JSONL logs.

use serde::{Deserialize, Serialize};

/// Action verbs understood by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verb {
    None,
    Move,
    Feed,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::None => "NONE",
            Verb::Move => "MOVE",
            Verb::Feed => "FEED",
        }
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialisable form of an action: verb plus its relative argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub verb: Verb,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<[i32; 2]>,
}

/// Why a resolved action did not take effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnFailure {
    /// Destination was occupied or outside the grid
    Blocked,
    /// Nothing edible at the bitten coordinate
    NoTarget,
    /// Argument outside the verb's legal domain
    InvalidArgument,
}

/// A single agent turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnEvent {
    /// Step counter value while the turn was taken
    pub step: u64,
    pub agent_id: String,
    pub action: ActionRecord,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<TurnFailure>,
    pub energy_before: u32,
    pub energy_after: u32,
}

impl TurnEvent {
    pub fn energy_spent(&self) -> u32 {
        self.energy_before.saturating_sub(self.energy_after)
    }
}
