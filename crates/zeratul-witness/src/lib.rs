//! Witness calculation runtime for compiled arithmetic circuits
//!
//! A compiled circuit is a hierarchy of template instances ("components")
//! wired together by signals. This crate is the engine every compiled
//! circuit runs on:
//!
//! - `arena`: one flat, fixed-size vector of field elements addressed by
//!   absolute offset (the signal arena)
//! - `constants`: read-only literals folded out by the compiler
//! - `component`: the component table, its lifecycle state machine and the
//!   edge-triggered input counters
//! - `context`: the scheduler; input writes run a child as soon as its last
//!   input arrives, and every run ends by releasing its consumed children
//! - `template`: the create/run contract compiled templates implement
//!
//! ## How It Works
//!
//! 1. **Host**: creates the root (component 0) and writes the main inputs,
//!    each write counting down the root's input counter
//! 2. **Root run**: creates subcomponents, wires their inputs (running each
//!    child depth first on its ready edge), reads their outputs, asserts
//!    constraints and releases the children
//! 3. **Extraction**: the witness is read out of the arena through the
//!    circuit's witness-to-signal map
//!
//! Any failed assertion, sizing mismatch or wiring defect aborts the whole
//! calculation with a [`WitnessError`]; there is no partial witness.
//!
//! ## Example
//!
//! ```
//! use zeratul_witness::{circuits::Multiplier3, FieldArithmetic, Fr, WitnessCalculator, WitnessConfig};
//!
//! let calculator = WitnessCalculator::<Fr>::new(Multiplier3::new(), WitnessConfig::default());
//! let witness = calculator.calculate_json(r#"{"in": [2, 3, 5]}"#).unwrap();
//! assert_eq!(witness.get(1), Some(Fr::from_u64(30)));
//! ```

pub mod arena;
pub mod calculator;
pub mod circuits;
pub mod component;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod field;
pub mod input;
pub mod template;
pub mod trace;
pub mod witness;

pub use arena::SignalArena;
pub use calculator::{Calculation, CalculationStats, WitnessCalculator};
pub use component::{
    ComponentId, ComponentRecord, ComponentState, ComponentTable, TemplateId, TemplateInfo, ROOT,
};
pub use config::WitnessConfig;
pub use constants::ConstantTable;
pub use context::{Context, RunScope};
pub use error::{Result, WitnessError};
pub use field::{FieldArithmetic, Fr};
pub use input::{parse_bigint, parse_inputs_json, resolve_inputs, Inputs};
pub use template::{CompiledCircuit, InputSignal, Template};
pub use trace::{format_ancestor_trace, position_suffix};
pub use witness::Witness;
