//! circuits compiled against the engine

pub mod multiplier;

pub use multiplier::{MultiplicationGate, Multiplier, Multiplier3};
