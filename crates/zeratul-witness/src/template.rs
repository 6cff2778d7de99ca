//! create/run contract for compiled templates and circuits
//!
//! the compiler emits one [`Template`] per source template and one
//! [`CompiledCircuit`] tying them together with the sizes the host needs.
//! templates form a closed set indexed by [`TemplateId`]; the engine never
//! calls a template except through [`CompiledCircuit::template`].

use crate::component::{ComponentId, TemplateId, TemplateInfo};
use crate::context::{Context, RunScope};
use crate::error::Result;
use crate::field::FieldArithmetic;

/// a create/run pair
pub trait Template<F: FieldArithmetic>: Send + Sync {
    fn info(&self) -> TemplateInfo;

    /// allocate and initialize a record for a new instance
    ///
    /// must not touch the signal arena. the default is enough for any
    /// template whose record is fully described by [`TemplateInfo`].
    fn create(
        &self,
        ctx: &Context<F>,
        signal_start: usize,
        name: String,
        parent: ComponentId,
    ) -> Result<ComponentId> {
        ctx.components()
            .allocate(parent, self.info(), signal_start, name)
    }

    /// execute the template body for the instance `scope.id()`
    ///
    /// the body ends with [`RunScope::release_subcomponents`].
    fn run(&self, scope: &RunScope<'_, '_, F>) -> Result<()>;
}

/// a main input signal (or signal array) the host must supply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSignal {
    pub name: &'static str,
    /// absolute arena offset of the first element
    pub offset: usize,
    /// number of elements (1 for a scalar)
    pub len: usize,
}

/// everything the host needs to know about a compiled circuit
pub trait CompiledCircuit<F: FieldArithmetic>: Send + Sync {
    fn name(&self) -> &'static str;

    /// first arena offset of the main component's inputs
    fn main_input_signal_start(&self) -> usize;

    /// number of main inputs
    fn main_input_signal_no(&self) -> usize;

    /// arena size, including signal 0 (the constant one)
    fn total_signal_no(&self) -> usize;

    /// component table capacity
    fn number_of_components(&self) -> usize;

    /// arena offset of the main component's signal block
    fn main_signal_start(&self) -> usize {
        1
    }

    fn size_of_witness(&self) -> usize {
        self.witness_to_signal().len()
    }

    fn size_of_constants(&self) -> usize {
        self.constants().len()
    }

    /// constants in decimal, indexed as the template bodies expect
    fn constants(&self) -> &[&'static str];

    /// for each witness position, the arena offset it is taken from
    fn witness_to_signal(&self) -> &[usize];

    /// main input name map, in declaration order
    fn input_signals(&self) -> &[InputSignal];

    fn template(&self, id: TemplateId) -> Option<&dyn Template<F>>;

    fn main_template(&self) -> &dyn Template<F>;
}
