//! Snapshot Types
//!
//! Read-only capture of the grid and agent list at a point in time, used by
//! renderers and for offline inspection.

use serde::{Deserialize, Serialize};

use crate::{ActionRecord, Appearance};

/// Generates a snapshot ID for the given step.
pub fn generate_snapshot_id(step: u64) -> String {
    format!("snap_{:06}", step)
}

/// Agent state as seen by observers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub agent_id: String,
    pub kind: String,
    pub appearance: Appearance,
    /// `None` only if the agent was never placed
    pub position: Option<[i32; 2]>,
    pub energy: u32,
    #[serde(default)]
    pub last_action: Option<ActionRecord>,
    #[serde(default)]
    pub last_action_succeeded: bool,
}

impl AgentSnapshot {
    pub fn is_inert(&self) -> bool {
        self.energy == 0
    }
}

/// Static obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSnapshot {
    pub kind: String,
    pub appearance: Appearance,
    pub position: [i32; 2],
}

/// Complete world state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub snapshot_id: String,
    pub name: String,
    pub steps: u64,
    pub width: u32,
    pub height: u32,
    pub seed: u64,
    /// Ground layer appearance, identical for every coordinate
    pub tile: Appearance,
    /// Agents in current turn order
    pub agents: Vec<AgentSnapshot>,
    pub blocks: Vec<BlockSnapshot>,
}

impl WorldSnapshot {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn live_agents(&self) -> usize {
        self.agents.iter().filter(|a| !a.is_inert()).count()
    }

    pub fn total_energy(&self) -> u64 {
        self.agents.iter().map(|a| a.energy as u64).sum()
    }

    /// Agent standing on the given coordinate, if any
    pub fn agent_at(&self, x: i32, y: i32) -> Option<&AgentSnapshot> {
        self.agents.iter().find(|a| a.position == Some([x, y]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Intensity, Verb};

    fn sample() -> WorldSnapshot {
        WorldSnapshot {
            snapshot_id: generate_snapshot_id(12),
            name: "Random Blox".to_string(),
            steps: 12,
            width: 4,
            height: 3,
            seed: 42,
            tile: Appearance::new("·", Color::Black, Intensity::Bright),
            agents: vec![
                AgentSnapshot {
                    agent_id: "bug_0000".to_string(),
                    kind: "bug".to_string(),
                    appearance: Appearance::new("o", Color::Green, Intensity::Bright),
                    position: Some([1, 2]),
                    energy: 7,
                    last_action: Some(ActionRecord {
                        verb: Verb::Move,
                        delta: Some([0, 1]),
                    }),
                    last_action_succeeded: true,
                },
                AgentSnapshot {
                    agent_id: "rock_0000".to_string(),
                    kind: "rock".to_string(),
                    appearance: Appearance::new("@", Color::White, Intensity::Normal),
                    position: Some([3, 0]),
                    energy: 0,
                    last_action: None,
                    last_action_succeeded: false,
                },
            ],
            blocks: vec![BlockSnapshot {
                kind: "fence".to_string(),
                appearance: Appearance::new("#", Color::Black, Intensity::Bright),
                position: [0, 0],
            }],
        }
    }

    #[test]
    fn test_snapshot_id_format() {
        assert_eq!(generate_snapshot_id(0), "snap_000000");
        assert_eq!(generate_snapshot_id(1234), "snap_001234");
    }

    #[test]
    fn test_snapshot_summaries() {
        let snapshot = sample();
        assert_eq!(snapshot.live_agents(), 1);
        assert_eq!(snapshot.total_energy(), 7);
        assert_eq!(snapshot.agent_at(3, 0).map(|a| a.kind.as_str()), Some("rock"));
        assert!(snapshot.agent_at(2, 2).is_none());
    }

    #[test]
    fn test_snapshot_survives_json() {
        let snapshot = sample();
        let json = snapshot.to_json_pretty().unwrap();
        let parsed: WorldSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }
}
