//! ECS Components
//!
//! Entity components for agents and blocks, and the occupancy grid resource.

pub mod entity;
pub mod grid;

pub use entity::*;
pub use grid::*;
