//! Shared observer types for the ASCII lab simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! Renderers, loggers and the headless runner consume these; the engine in
//! `lab-core` produces them.

pub mod appearance;
pub mod event;
pub mod snapshot;

pub use appearance::{Appearance, Color, Intensity};
pub use event::{ActionRecord, TurnEvent, TurnFailure, Verb};
pub use snapshot::{generate_snapshot_id, AgentSnapshot, BlockSnapshot, WorldSnapshot};
