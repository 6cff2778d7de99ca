use thiserror::Error;

use crate::component::{ComponentId, ComponentState};

/// every variant aborts the witness calculation; there is no partial witness
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WitnessError {
    #[error("failed assert in template {template} line {line}. followed trace of components: {trace}")]
    ConstraintViolation {
        template: String,
        line: u32,
        trace: String,
    },

    #[error("component table exhausted: capacity {capacity}")]
    ComponentTableExhausted { capacity: usize },

    #[error("signal offset {offset} out of bounds (arena size {size})")]
    SignalOutOfBounds { offset: usize, size: usize },

    #[error("constant index {index} out of bounds ({size} constants)")]
    ConstantOutOfBounds { index: usize, size: usize },

    #[error("signal {offset} read before it was assigned")]
    UnassignedSignal { offset: usize },

    #[error("component {component} had an input written twice or past its declared arity")]
    DoubleTrigger { component: ComponentId },

    #[error("output of component {component} read before its run completed")]
    ReadBeforeRun { component: ComponentId },

    #[error("component {component} released before its run completed")]
    ReleaseBeforeDone { component: ComponentId },

    #[error("component {component} released twice")]
    DoubleRelease { component: ComponentId },

    #[error("component {component} is {found:?}, expected {expected:?}")]
    InvalidState {
        component: ComponentId,
        expected: ComponentState,
        found: ComponentState,
    },

    #[error("no live component with id {0}")]
    UnknownComponent(ComponentId),

    #[error("unknown template id {0}")]
    UnknownTemplate(usize),

    #[error("component {component} has no subcomponent slot {slot}")]
    SubcomponentSlot { component: ComponentId, slot: usize },

    #[error("main component still waits for {remaining} input signals")]
    InputsMissing { remaining: usize },

    #[error("unknown input signal: {0}")]
    UnknownInput(String),

    #[error("input signal {name} expects {expected} values, got {got}")]
    InputLengthMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("component {component} ({name}) was never released")]
    LeakedComponent { component: ComponentId, name: String },

    #[error("component {component} aborted: a concurrent run failed")]
    Aborted { component: ComponentId },
}

pub type Result<T> = std::result::Result<T, WitnessError>;
