//! Turn event collection and logging.

pub mod logger;

pub use logger::{EventLogger, TickEvents};
