//! World Setup
//!
//! Builds the ECS world from configuration: ground, agents, then blocks.

pub mod world;

pub use world::*;
