//! `Multiplier(3)`: the product of three inputs through a chain of gates
//!
//! ```text
//! template MultiplicationGate() {
//!     signal input in1;
//!     signal input in2;
//!     signal output out <== in1 * in2;
//! }
//!
//! template Multiplier(N) {
//!     signal input in[N];
//!     signal output out;
//!     component gate[N-1];
//!     for (var i = 0; i < N-1; i++) gate[i] = MultiplicationGate();
//!     assert(N >= 2);
//!     gate[0].in1 <== in[0];
//!     gate[0].in2 <== in[1];
//!     for (var i = 0; i < N-2; i++) {
//!         gate[i+1].in1 <== gate[i].out;
//!         gate[i+1].in2 <== in[i+2];
//!     }
//!     out <== gate[N-2].out;
//! }
//!
//! component main = Multiplier(3);
//! ```
//!
//! signal layout (absolute arena offsets):
//!
//! | offset | signal            |
//! |--------|-------------------|
//! | 0      | constant one      |
//! | 1      | main.out          |
//! | 2..=4  | main.in[0..3]     |
//! | 5..=7  | gate[0] out/in1/in2 |
//! | 8..=10 | gate[1] out/in1/in2 |

use crate::component::{TemplateId, TemplateInfo};
use crate::context::RunScope;
use crate::error::Result;
use crate::field::FieldArithmetic;
use crate::template::{CompiledCircuit, InputSignal, Template};
use crate::trace::position_suffix;

pub const GATE_TEMPLATE: TemplateId = 0;
pub const MULTIPLIER_TEMPLATE: TemplateId = 1;

// constant table indices; index 2 holds N, which only the folded assert used
const C_ZERO: usize = 0;
const C_ONE: usize = 1;
const C_N_MINUS_ONE: usize = 3;

const CONSTANTS: [&str; 4] = ["0", "1", "3", "2"];
const WITNESS_TO_SIGNAL: [usize; 6] = [0, 1, 2, 3, 4, 5];
const INPUTS: [InputSignal; 1] = [InputSignal {
    name: "in",
    offset: 2,
    len: 3,
}];

// local signal indices of a gate
const GATE_OUT: usize = 0;
const GATE_IN1: usize = 1;
const GATE_IN2: usize = 2;
const GATE_SIGNALS: usize = 3;

/// `out <== in1 * in2`
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiplicationGate;

impl<F: FieldArithmetic> Template<F> for MultiplicationGate {
    fn info(&self) -> TemplateInfo {
        TemplateInfo {
            id: GATE_TEMPLATE,
            name: "MultiplicationGate",
            input_arity: 2,
            subcomponents: 0,
        }
    }

    fn run(&self, scope: &RunScope<'_, '_, F>) -> Result<()> {
        let product = F::multiply(&scope.signal(GATE_IN1)?, &scope.signal(GATE_IN2)?);
        scope.write_signal(GATE_OUT, product)?;
        scope.release_subcomponents()
    }
}

/// `Multiplier(3)`
#[derive(Debug, Clone, Copy, Default)]
pub struct Multiplier {
    /// run the gates on worker threads when the engine allows it
    pub parallel_gates: bool,
}

impl Multiplier {
    const OUT: usize = 0;
    const IN: usize = 1;
    const SIGNALS: usize = 4;
    const GATES: usize = 2;
}

impl<F: FieldArithmetic> Template<F> for Multiplier {
    fn info(&self) -> TemplateInfo {
        TemplateInfo {
            id: MULTIPLIER_TEMPLATE,
            name: "Multiplier",
            input_arity: 3,
            subcomponents: Self::GATES,
        }
    }

    fn run(&self, scope: &RunScope<'_, '_, F>) -> Result<()> {
        let one = scope.constant(C_ONE)?;

        let mut child_start = scope.signal_start()? + Self::SIGNALS;
        for i in 0..Self::GATES {
            let name = format!("gate{}", position_suffix(&[Self::GATES], i));
            scope.create_subcomponent(i, GATE_TEMPLATE, child_start, name, self.parallel_gates)?;
            child_start += GATE_SIGNALS;
        }

        // assert(N >= 2), folded to a constant
        scope.assert_true(&one, 9)?;

        // creation loop counter, kept by the compiler after unrolling
        let mut i = scope.constant(C_ZERO)?;
        let bound = scope.constant(C_N_MINUS_ONE)?;
        while F::is_true(&F::lt_flag(&i, &bound)) {
            i = F::plus(&i, &one);
        }

        scope.write_subcomponent_input(0, GATE_IN1, scope.signal(Self::IN)?)?;
        scope.write_subcomponent_input(0, GATE_IN2, scope.signal(Self::IN + 1)?)?;

        // for (i = 0; i < N-2; i++), one iteration
        let mut i = scope.constant(C_ZERO)?;
        while F::is_true(&F::lt_flag(&i, &one)) {
            scope.write_subcomponent_input(1, GATE_IN1, scope.read_subcomponent_output(0, GATE_OUT)?)?;
            scope.write_subcomponent_input(1, GATE_IN2, scope.signal(Self::IN + 2)?)?;
            i = F::plus(&i, &one);
        }

        scope.write_signal(Self::OUT, scope.read_subcomponent_output(1, GATE_OUT)?)?;
        scope.release_subcomponents()
    }
}

/// the compiled `Multiplier(3)` circuit
#[derive(Debug, Clone, Copy, Default)]
pub struct Multiplier3 {
    gate: MultiplicationGate,
    main: Multiplier,
}

impl Multiplier3 {
    pub const NAME: &'static str = "multiplier3";

    pub fn new() -> Self {
        Self::default()
    }

    /// gates marked for worker-thread execution
    pub fn parallel() -> Self {
        Self {
            gate: MultiplicationGate,
            main: Multiplier {
                parallel_gates: true,
            },
        }
    }
}

impl<F: FieldArithmetic> CompiledCircuit<F> for Multiplier3 {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn main_input_signal_start(&self) -> usize {
        2
    }

    fn main_input_signal_no(&self) -> usize {
        3
    }

    fn total_signal_no(&self) -> usize {
        11
    }

    fn number_of_components(&self) -> usize {
        3
    }

    fn constants(&self) -> &[&'static str] {
        &CONSTANTS
    }

    fn witness_to_signal(&self) -> &[usize] {
        &WITNESS_TO_SIGNAL
    }

    fn input_signals(&self) -> &[InputSignal] {
        &INPUTS
    }

    fn template(&self, id: TemplateId) -> Option<&dyn Template<F>> {
        match id {
            GATE_TEMPLATE => Some(&self.gate as &dyn Template<F>),
            MULTIPLIER_TEMPLATE => Some(&self.main as &dyn Template<F>),
            _ => None,
        }
    }

    fn main_template(&self) -> &dyn Template<F> {
        &self.main
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Fr;

    #[test]
    fn test_sizes_are_consistent() {
        let circuit = Multiplier3::new();
        let c: &dyn CompiledCircuit<Fr> = &circuit;
        assert_eq!(c.size_of_witness(), 6);
        assert_eq!(c.size_of_constants(), 4);
        assert_eq!(c.main_input_signal_no(), INPUTS[0].len);
        assert_eq!(c.main_input_signal_start(), INPUTS[0].offset);
        // main block + two gates, after the constant one
        assert_eq!(
            c.total_signal_no(),
            1 + Multiplier::SIGNALS + Multiplier::GATES * GATE_SIGNALS
        );
        assert_eq!(
            <Multiplier as Template<Fr>>::info(&Multiplier::default()).input_arity,
            c.main_input_signal_no()
        );
    }

    #[test]
    fn test_template_dispatch() {
        let circuit = Multiplier3::new();
        let c: &dyn CompiledCircuit<Fr> = &circuit;
        assert_eq!(c.template(GATE_TEMPLATE).unwrap().info().name, "MultiplicationGate");
        assert_eq!(c.template(MULTIPLIER_TEMPLATE).unwrap().info().name, "Multiplier");
        assert!(c.template(2).is_none());
        assert_eq!(c.main_template().info().id, MULTIPLIER_TEMPLATE);
    }

    #[test]
    fn test_gate_chain_runs_each_gate_once() {
        use crate::component::{ComponentState, ROOT};
        use crate::config::WitnessConfig;
        use crate::context::Context;
        use std::sync::Arc;

        let ctx = Context::<Fr>::new(Arc::new(Multiplier3::new()), WitnessConfig::default()).unwrap();
        ctx.create_root().unwrap();
        for (i, v) in [4u64, 6, 7].into_iter().enumerate() {
            ctx.write_main_input(2 + i, Fr::from_u64(v)).unwrap();
        }
        ctx.execute(ROOT).unwrap();

        assert_eq!(ctx.run_count(), 3);
        // gate[1] wired from gate[0].out and in[2], once each
        assert_eq!(ctx.signals().read(9).unwrap(), Fr::from_u64(24));
        assert_eq!(ctx.signals().read(10).unwrap(), Fr::from_u64(7));
        assert_eq!(ctx.signals().read(1).unwrap(), Fr::from_u64(168));
        for gate in [1, 2] {
            assert_eq!(ctx.components().state(gate).unwrap(), ComponentState::Released);
        }
    }
}
