//! Turn Systems
//!
//! Placement, action resolution, the per-agent turn loop and the clock
//! bookkeeping that runs once every agent has acted.

pub mod clock;
pub mod placement;
pub mod resolve;
pub mod turns;

pub use clock::{advance_clock, reorder_turns, SimClock, TurnOrder};
pub use placement::{occupancy_is_consistent, place_entity};
pub use resolve::{resolve_action, Resolution};
pub use turns::take_turns;
