//! execution context and scheduler
//!
//! a [`Context`] owns the process-wide state of one witness calculation:
//! the signal arena, the constants and the component table. template bodies
//! see it through a [`RunScope`], which binds the running component's id and
//! implements the statements generated code is made of: own signal access,
//! constraint assertions, subcomponent creation, input wiring (the scheduler
//! trigger point), output reads and the final release sweep.
//!
//! scheduling is edge triggered and depth first: the input write that drops
//! a child's counter to zero runs the child before the write returns. in
//! parallel mode a child created as parallel is instead spawned on a scoped
//! worker thread and the parent blocks on the child's record when it first
//! reads an output.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use crate::arena::SignalArena;
use crate::component::{ComponentId, ComponentState, ComponentTable, TemplateId, ROOT};
use crate::config::WitnessConfig;
use crate::constants::ConstantTable;
use crate::error::{Result, WitnessError};
use crate::field::FieldArithmetic;
use crate::template::{CompiledCircuit, Template};
use crate::trace::format_ancestor_trace;

/// shared state of a single witness calculation
pub struct Context<F: FieldArithmetic> {
    circuit: Arc<dyn CompiledCircuit<F>>,
    config: WitnessConfig,
    signals: SignalArena<F>,
    constants: ConstantTable<F>,
    components: ComponentTable,
    /// first error raised on a worker thread
    failure: Mutex<Option<WitnessError>>,
    runs: AtomicUsize,
}

impl<F: FieldArithmetic> Context<F> {
    /// fresh arena and table sized from the circuit; signal 0 holds one
    pub fn new(circuit: Arc<dyn CompiledCircuit<F>>, config: WitnessConfig) -> Result<Self> {
        let constants = ConstantTable::from_decimal(circuit.constants())?;
        let signals = SignalArena::new(circuit.total_signal_no(), config.strict_reads);
        signals.write(0, F::one())?;
        let components = ComponentTable::new(circuit.number_of_components());
        Ok(Self {
            circuit,
            config,
            signals,
            constants,
            components,
            failure: Mutex::new(None),
            runs: AtomicUsize::new(0),
        })
    }

    pub fn circuit(&self) -> &dyn CompiledCircuit<F> {
        self.circuit.as_ref()
    }

    pub fn config(&self) -> &WitnessConfig {
        &self.config
    }

    pub fn signals(&self) -> &SignalArena<F> {
        &self.signals
    }

    pub fn constants(&self) -> &ConstantTable<F> {
        &self.constants
    }

    pub fn components(&self) -> &ComponentTable {
        &self.components
    }

    /// number of component runs started so far
    pub fn run_count(&self) -> usize {
        self.runs.load(Ordering::Relaxed)
    }

    pub fn template(&self, id: TemplateId) -> Result<&dyn Template<F>> {
        self.circuit
            .template(id)
            .ok_or(WitnessError::UnknownTemplate(id))
    }

    /// create the main component at its fixed signal block
    pub fn create_root(&self) -> Result<ComponentId> {
        let root = self.circuit.main_template().create(
            self,
            self.circuit.main_signal_start(),
            "main".to_string(),
            ROOT,
        )?;
        debug_assert_eq!(root, ROOT);
        Ok(root)
    }

    /// host-side write of one main input; counts against the root's inputs
    ///
    /// returns whether the root is now ready to run. the root is never run
    /// from here: the host invokes it explicitly via [`Context::execute`].
    pub fn write_main_input(&self, offset: usize, value: F) -> Result<bool> {
        if self.signals.is_assigned(offset) {
            return Err(WitnessError::DoubleTrigger { component: ROOT });
        }
        self.signals.write(offset, value)?;
        self.components.on_input_written(ROOT)
    }

    /// run a ready component to completion
    pub fn execute(&self, id: ComponentId) -> Result<()> {
        let template = self.template(self.components.template_id(id)?)?;
        self.components.begin_run(id)?;
        self.runs.fetch_add(1, Ordering::Relaxed);

        let _span = tracing::debug_span!("run", id, template = template.info().name).entered();
        tracing::debug!("running component");

        let result = thread::scope(|threads| {
            let scope = RunScope {
                ctx: self,
                threads,
                id,
                template_name: template.info().name,
            };
            template.run(&scope)
        });

        match result {
            Ok(()) => self.components.finish_run(id),
            Err(e) => {
                self.components.fail(id);
                Err(e)
            }
        }
    }

    /// remember the first failure seen on a worker thread
    pub fn record_failure(&self, err: WitnessError) {
        let mut failure = self.failure.lock();
        if failure.is_none() {
            tracing::error!(error = %err, "parallel component run failed");
            *failure = Some(err);
        }
    }

    pub fn take_failure(&self) -> Option<WitnessError> {
        self.failure.lock().take()
    }
}

/// the view a running template body has of the engine
pub struct RunScope<'scope, 'env: 'scope, F: FieldArithmetic> {
    ctx: &'env Context<F>,
    threads: &'scope thread::Scope<'scope, 'env>,
    id: ComponentId,
    template_name: &'static str,
}

impl<'scope, 'env: 'scope, F: FieldArithmetic> RunScope<'scope, 'env, F> {
    /// id of the running component
    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn context(&self) -> &'env Context<F> {
        self.ctx
    }

    pub fn signal_start(&self) -> Result<usize> {
        self.ctx.components.signal_start(self.id)
    }

    /// read own signal `local`
    pub fn signal(&self, local: usize) -> Result<F> {
        self.ctx.signals.read(self.signal_start()? + local)
    }

    /// assign own signal `local`
    pub fn write_signal(&self, local: usize, value: F) -> Result<()> {
        self.ctx.signals.write(self.signal_start()? + local, value)
    }

    pub fn constant(&self, index: usize) -> Result<F> {
        self.ctx.constants.get(index)
    }

    /// fail the whole calculation unless `condition` is true
    pub fn assert_true(&self, condition: &F, line: u32) -> Result<()> {
        if F::is_true(condition) {
            return Ok(());
        }
        let trace = format_ancestor_trace(&self.ctx.components, self.id);
        tracing::error!(
            template = self.template_name,
            line,
            trace = %trace,
            "failed assert"
        );
        Err(WitnessError::ConstraintViolation {
            template: self.template_name.to_string(),
            line,
            trace,
        })
    }

    /// instantiate `template` into child slot `slot`
    ///
    /// a template without inputs is ready on creation and runs right away.
    pub fn create_subcomponent(
        &self,
        slot: usize,
        template: TemplateId,
        signal_start: usize,
        name: String,
        parallel: bool,
    ) -> Result<ComponentId> {
        let child = self
            .ctx
            .template(template)?
            .create(self.ctx, signal_start, name, self.id)?;
        self.ctx
            .components
            .set_subcomponent(self.id, slot, child, parallel)?;
        if self.ctx.components.state(child)? == ComponentState::Ready {
            self.dispatch(slot, child)?;
        }
        Ok(child)
    }

    /// write input `local` of the child in `slot`; runs the child on its
    /// ready edge
    ///
    /// each input cell is written once; a second write to the same cell
    /// would count towards the ready edge while another input is missing.
    pub fn write_subcomponent_input(&self, slot: usize, local: usize, value: F) -> Result<()> {
        let child = self.child(slot)?;
        let offset = self.ctx.components.signal_start(child)? + local;
        if self.ctx.signals.is_assigned(offset) {
            return Err(WitnessError::DoubleTrigger { component: child });
        }
        self.ctx.signals.write(offset, value)?;
        if self.ctx.components.on_input_written(child)? {
            self.dispatch(slot, child)?;
        }
        Ok(())
    }

    /// read signal `local` of the child in `slot` once it has run
    pub fn read_subcomponent_output(&self, slot: usize, local: usize) -> Result<F> {
        let child = self.child(slot)?;
        if !self.ctx.components.output_is_set(self.id, slot)? {
            if self.runs_on_worker(slot)? {
                self.ctx.components.wait_done(child)?;
            } else {
                self.ctx.components.ensure_done(child)?;
            }
            self.ctx.components.mark_output_set(self.id, slot)?;
        }
        let start = self.ctx.components.signal_start(child)?;
        self.ctx.signals.read(start + local)
    }

    /// release every child this component populated; the last statement of
    /// every run body
    pub fn release_subcomponents(&self) -> Result<()> {
        let children = self.ctx.components.take_subcomponents(self.id)?;
        for child in children {
            if self.ctx.config.parallel {
                let state = self.ctx.components.state(child)?;
                if matches!(state, ComponentState::Ready | ComponentState::Running) {
                    self.ctx.components.wait_done(child)?;
                }
            }
            self.ctx.components.release(child)?;
        }
        Ok(())
    }

    fn child(&self, slot: usize) -> Result<ComponentId> {
        match self.ctx.components.subcomponent(self.id, slot)? {
            // 0 is the root and never anyone's child
            ROOT => Err(WitnessError::SubcomponentSlot {
                component: self.id,
                slot,
            }),
            child => Ok(child),
        }
    }

    fn runs_on_worker(&self, slot: usize) -> Result<bool> {
        Ok(self.ctx.config.parallel
            && self.ctx.components.is_subcomponent_parallel(self.id, slot)?)
    }

    fn dispatch(&self, slot: usize, child: ComponentId) -> Result<()> {
        if self.runs_on_worker(slot)? {
            let ctx = self.ctx;
            tracing::trace!(child, "spawning parallel component");
            self.threads.spawn(move || {
                if let Err(e) = ctx.execute(child) {
                    // execute may fail before the record left Ready
                    ctx.components.fail(child);
                    ctx.record_failure(e);
                }
            });
            Ok(())
        } else {
            self.ctx.execute(child)
        }
    }
}
