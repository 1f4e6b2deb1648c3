//! Configuration System
//!
//! Loads the world, tile, block and agent definitions from `lab.toml`.
//! Definitions are read once at construction and never mutated.

use lab_events::{Appearance, Color, Intensity};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;

use crate::components::grid::Coord;
use crate::policy::PolicyKind;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "lab.toml";

/// Largest grid accepted, in cells
pub const MAX_GRID_AREA: u64 = 1 << 24;

/// Top-level configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub tile: TileDef,
    #[serde(default)]
    pub blocks: Vec<BlockDef>,
    #[serde(default)]
    pub agents: Vec<AgentDef>,
}

/// World dimensions and run control
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub name: String,
    /// x runs from 0 to width - 1
    pub width: u32,
    /// y runs from 0 to height - 1
    pub height: u32,
    /// Fraction of the width used as +/- jitter for "auto" block counts
    pub block_jitter: f64,
    /// Stop after this many steps; run forever when unset
    pub max_steps: Option<u64>,
    /// Steps between checkpoints offered to the host
    pub check_interval: Option<u64>,
    /// Fixed seed for repeatable runs; wall clock when unset
    pub random_seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: "Random Blox".to_string(),
            width: 20,
            height: 14,
            block_jitter: 0.4,
            max_steps: None,
            check_interval: Some(100),
            random_seed: None,
        }
    }
}

/// Ground tile descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TileDef {
    pub kind: String,
    pub glyph: String,
    pub color: Color,
    pub intensity: Intensity,
}

impl TileDef {
    pub fn appearance(&self) -> Appearance {
        Appearance::new(self.glyph.clone(), self.color, self.intensity)
    }
}

impl Default for TileDef {
    fn default() -> Self {
        Self {
            kind: "tile".to_string(),
            glyph: "·".to_string(),
            color: Color::Black,
            intensity: Intensity::Bright,
        }
    }
}

/// Marker for `count = "auto"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoCount {
    Auto,
}

/// How many instances of a block kind to scatter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockCount {
    Fixed(u32),
    Auto(AutoCount),
}

impl BlockCount {
    /// Concrete count; "auto" is the world width plus or minus a random
    /// share of it.
    pub fn resolve<R: Rng + ?Sized>(&self, width: u32, jitter: f64, rng: &mut R) -> u32 {
        match self {
            BlockCount::Fixed(n) => *n,
            BlockCount::Auto(_) => {
                let spread = (width as f64 * jitter).floor() as i64;
                let count = width as i64 + rng.gen_range(-spread..=spread);
                count.max(0) as u32
            }
        }
    }
}

/// Static obstacle descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDef {
    pub count: BlockCount,
    pub kind: String,
    pub glyph: String,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub intensity: Intensity,
    /// Explicit coordinates for the first instances
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub positions: Vec<Coord>,
}

impl BlockDef {
    pub fn appearance(&self) -> Appearance {
        Appearance::new(self.glyph.clone(), self.color, self.intensity)
    }
}

/// Agent kind descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDef {
    pub count: u32,
    pub kind: String,
    pub glyph: String,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub intensity: Intensity,
    /// Flat energy charged every turn
    pub step_cost: u32,
    /// Initial energy
    pub energy: u32,
    #[serde(default)]
    pub policy: PolicyKind,
    /// Multiplied by the action's energy ratio
    #[serde(default)]
    pub move_cost: u32,
    /// Energy removed from a bitten agent
    #[serde(default)]
    pub bite_damage: u32,
    /// Requested coordinates for the first instances; relocated on collision
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spawn: Vec<Coord>,
}

impl AgentDef {
    pub fn appearance(&self) -> Appearance {
        Appearance::new(self.glyph.clone(), self.color, self.intensity)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            tile: TileDef::default(),
            blocks: vec![
                BlockDef {
                    count: BlockCount::Fixed(10),
                    kind: "fence".to_string(),
                    glyph: "#".to_string(),
                    color: Color::Black,
                    intensity: Intensity::Bright,
                    positions: Vec::new(),
                },
                BlockDef {
                    count: BlockCount::Fixed(40),
                    kind: "stone".to_string(),
                    glyph: "▓".to_string(),
                    color: Color::Black,
                    intensity: Intensity::Bright,
                    positions: Vec::new(),
                },
            ],
            agents: vec![
                AgentDef {
                    count: 8,
                    kind: "bug".to_string(),
                    glyph: "ö".to_string(),
                    color: Color::Green,
                    intensity: Intensity::Bright,
                    step_cost: 1,
                    energy: 200,
                    policy: PolicyKind::Wanderer,
                    move_cost: 0,
                    bite_damage: 0,
                    spawn: Vec::new(),
                },
                AgentDef {
                    count: 2,
                    kind: "lurker".to_string(),
                    glyph: "@".to_string(),
                    color: Color::Red,
                    intensity: Intensity::Normal,
                    step_cost: 1,
                    energy: 120,
                    policy: PolicyKind::Inert,
                    move_cost: 0,
                    bite_damage: 0,
                    spawn: Vec::new(),
                },
            ],
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, falling back to the defaults only when
    /// the file does not exist. A file that exists but fails to parse or
    /// validate is an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match Self::load(path) {
            Err(ConfigError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!("{} not found. Using defaults.", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Serialise as TOML, e.g. to seed a new config file
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let world = &self.world;
        if world.width == 0 || world.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "world must be at least 1x1, got {}x{}",
                world.width, world.height
            )));
        }
        let area = world.width as u64 * world.height as u64;
        if world.width > i32::MAX as u32 || world.height > i32::MAX as u32 || area > MAX_GRID_AREA
        {
            return Err(ConfigError::Invalid(format!(
                "world of {}x{} exceeds the {} cell limit",
                world.width, world.height, MAX_GRID_AREA
            )));
        }
        if world.check_interval == Some(0) {
            return Err(ConfigError::Invalid(
                "check_interval must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&world.block_jitter) {
            return Err(ConfigError::Invalid(format!(
                "block_jitter must lie in [0, 1], got {}",
                world.block_jitter
            )));
        }
        if let Some(def) = self.agents.iter().find(|a| a.kind.is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "agent kind with glyph {:?} has no name",
                def.glyph
            )));
        }
        Ok(())
    }
}

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
