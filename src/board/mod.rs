pub mod cozy;

pub use cozy::{Position, PositionError, Termination};
