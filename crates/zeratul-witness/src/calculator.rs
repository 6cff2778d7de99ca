//! host driver: inputs in, witness out

use std::sync::Arc;

use crate::component::{ComponentState, ROOT};
use crate::config::WitnessConfig;
use crate::context::Context;
use crate::error::{Result, WitnessError};
use crate::field::FieldArithmetic;
use crate::input::{parse_inputs_json, resolve_inputs, Inputs};
use crate::template::CompiledCircuit;
use crate::witness::Witness;

/// what one calculation produced, beyond the witness itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calculation<F> {
    pub witness: Witness<F>,
    /// full arena after the root run
    pub signals: Vec<F>,
    pub stats: CalculationStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalculationStats {
    pub components_run: usize,
    pub allocations: usize,
    pub releases: usize,
}

/// computes witnesses for one compiled circuit
///
/// every calculation gets a fresh arena and component table, so a calculator
/// can be reused and shared across threads.
#[derive(Clone)]
pub struct WitnessCalculator<F: FieldArithmetic> {
    circuit: Arc<dyn CompiledCircuit<F>>,
    config: WitnessConfig,
}

impl<F: FieldArithmetic> WitnessCalculator<F> {
    pub fn new(circuit: impl CompiledCircuit<F> + 'static, config: WitnessConfig) -> Self {
        Self::from_arc(Arc::new(circuit), config)
    }

    pub fn from_arc(circuit: Arc<dyn CompiledCircuit<F>>, config: WitnessConfig) -> Self {
        Self { circuit, config }
    }

    pub fn circuit(&self) -> &dyn CompiledCircuit<F> {
        self.circuit.as_ref()
    }

    pub fn config(&self) -> &WitnessConfig {
        &self.config
    }

    pub fn calculate(&self, inputs: &Inputs) -> Result<Witness<F>> {
        Ok(self.run(inputs)?.witness)
    }

    pub fn calculate_json(&self, json: &str) -> Result<Witness<F>> {
        self.calculate(&parse_inputs_json(json)?)
    }

    /// full calculation: create the root, feed inputs, run, audit, extract
    pub fn run(&self, inputs: &Inputs) -> Result<Calculation<F>> {
        let _span = tracing::info_span!(
            "witness",
            circuit = self.circuit.name(),
            parallel = self.config.parallel
        )
        .entered();

        let ctx = Context::new(self.circuit.clone(), self.config)?;
        ctx.create_root()?;

        for (offset, value) in resolve_inputs::<F>(self.circuit.input_signals(), inputs)? {
            ctx.write_main_input(offset, value)?;
        }
        let remaining = ctx.components().input_counter(ROOT)?;
        if remaining > 0 {
            return Err(WitnessError::InputsMissing { remaining });
        }

        // a worker's own error beats the Aborted its waiting parent saw
        ctx.execute(ROOT).map_err(|e| ctx.take_failure().unwrap_or(e))?;
        if let Some(e) = ctx.take_failure() {
            return Err(e);
        }

        if self.config.verify_release {
            audit_release(&ctx)?;
        }

        let witness = Witness::extract(ctx.signals(), self.circuit.witness_to_signal())?;
        let stats = CalculationStats {
            components_run: ctx.run_count(),
            allocations: ctx.components().allocation_count(),
            releases: ctx.components().released_count(),
        };
        tracing::info!(
            witness = witness.len(),
            components = stats.components_run,
            "witness calculated"
        );

        Ok(Calculation {
            witness,
            signals: ctx.signals().snapshot(),
            stats,
        })
    }
}

/// root done and kept; everything else released
fn audit_release<F: FieldArithmetic>(ctx: &Context<F>) -> Result<()> {
    let root = ctx.components().state(ROOT)?;
    if root != ComponentState::Done {
        return Err(WitnessError::InvalidState {
            component: ROOT,
            expected: ComponentState::Done,
            found: root,
        });
    }
    if let Some((component, name)) = ctx.components().unreleased().into_iter().next() {
        return Err(WitnessError::LeakedComponent { component, name });
    }
    Ok(())
}
