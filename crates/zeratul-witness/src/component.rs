//! component table and lifecycle manager
//!
//! every instantiated template owns one record in a fixed-capacity table,
//! addressed by its component id. id 0 is the root: the first allocation
//! lands there and it is never released.
//!
//! each record moves through
//!
//! ```text
//! Allocated(counter = n) -> Ready -> Running -> Done -> Released
//! ```
//!
//! with `Failed` as the terminal state of a run that errored on a worker
//! thread. the ready edge is a pure function of the input counter (see
//! [`ComponentTable::on_input_written`]) and fires exactly once.
//!
//! released slots stay in the table as tombstones until a later allocation
//! reuses them, so a concurrent lookup never observes freed memory.

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Result, WitnessError};

/// index into the component table; 0 doubles as "no component" in child lists
pub type ComponentId = usize;

/// selects the create/run pair governing a component
pub type TemplateId = usize;

/// the root component
pub const ROOT: ComponentId = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentState {
    /// waiting for inputs
    Allocated,
    /// every input supplied, run not started
    Ready,
    Running,
    Done,
    /// run aborted with an error (parallel mode)
    Failed,
    Released,
}

/// static facts a template declares about its instances
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateInfo {
    pub id: TemplateId,
    pub name: &'static str,
    /// number of input signal writes before the instance may run
    pub input_arity: usize,
    /// number of child slots
    pub subcomponents: usize,
}

#[derive(Debug, Clone)]
pub struct ComponentRecord {
    pub template_id: TemplateId,
    pub template_name: &'static str,
    /// base offset of this instance's signal block in the arena
    pub signal_start: usize,
    /// inputs not yet supplied
    pub input_counter: usize,
    pub declared_inputs: usize,
    pub component_name: String,
    pub id_father: ComponentId,
    /// child ids per slot, 0 while unpopulated or once released
    pub subcomponents: Vec<ComponentId>,
    /// child slots whose run goes to a worker thread
    pub subcomponents_parallel: Vec<bool>,
    /// child slots whose completion this component has already observed
    pub output_is_set: Vec<bool>,
    pub state: ComponentState,
}

#[derive(Debug, Default)]
struct Slot {
    record: Mutex<Option<ComponentRecord>>,
    /// signalled on `Running -> Done` and `-> Failed`
    done: Condvar,
}

/// allocation cursor and released ids waiting for reuse
#[derive(Debug, Default)]
struct FreeSlots {
    /// first slot never handed out
    next: usize,
    released: Vec<ComponentId>,
}

/// fixed-capacity table of component records
#[derive(Debug)]
pub struct ComponentTable {
    slots: Box<[Slot]>,
    free: Mutex<FreeSlots>,
    allocations: AtomicUsize,
    releases: AtomicUsize,
}

impl ComponentTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| Slot::default()).collect(),
            free: Mutex::new(FreeSlots::default()),
            allocations: AtomicUsize::new(0),
            releases: AtomicUsize::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// reserve the next free slot and initialize its record
    ///
    /// released slots are reused first (most recently released on top),
    /// otherwise the cursor advances, so a circuit that never reuses a slot
    /// gets preorder ids. the input counter starts at the template's declared
    /// arity; a template without inputs is `Ready` immediately.
    pub fn allocate(
        &self,
        parent: ComponentId,
        template: TemplateInfo,
        signal_start: usize,
        name: String,
    ) -> Result<ComponentId> {
        let mut free = self.free.lock();
        let id = match free.released.pop() {
            Some(id) => id,
            None if free.next < self.slots.len() => {
                free.next += 1;
                free.next - 1
            }
            None => {
                return Err(WitnessError::ComponentTableExhausted {
                    capacity: self.capacity(),
                })
            }
        };

        let state = if template.input_arity == 0 {
            ComponentState::Ready
        } else {
            ComponentState::Allocated
        };
        tracing::debug!(
            id,
            parent,
            template = template.name,
            signal_start,
            name = %name,
            "allocated component"
        );
        *self.slot(id)?.record.lock() = Some(ComponentRecord {
            template_id: template.id,
            template_name: template.name,
            signal_start,
            input_counter: template.input_arity,
            declared_inputs: template.input_arity,
            component_name: name,
            id_father: parent,
            subcomponents: vec![0; template.subcomponents],
            subcomponents_parallel: vec![false; template.subcomponents],
            output_is_set: vec![false; template.subcomponents],
            state,
        });
        self.allocations.fetch_add(1, Ordering::Relaxed);
        Ok(id)
    }

    /// account for one input write; `true` exactly when the counter hits zero
    pub fn on_input_written(&self, id: ComponentId) -> Result<bool> {
        self.with_record_mut(id, |record| {
            if record.state != ComponentState::Allocated || record.input_counter == 0 {
                return Err(WitnessError::DoubleTrigger { component: id });
            }
            record.input_counter -= 1;
            tracing::trace!(id, remaining = record.input_counter, "input written");
            if record.input_counter == 0 {
                record.state = ComponentState::Ready;
                Ok(true)
            } else {
                Ok(false)
            }
        })
    }

    /// `Ready -> Running`
    pub fn begin_run(&self, id: ComponentId) -> Result<()> {
        self.transition(id, ComponentState::Ready, ComponentState::Running)
    }

    /// `Running -> Done`, waking any parent blocked on this component
    pub fn finish_run(&self, id: ComponentId) -> Result<()> {
        self.transition(id, ComponentState::Running, ComponentState::Done)?;
        self.slot(id)?.done.notify_all();
        Ok(())
    }

    /// mark a run as aborted and wake waiters
    pub fn fail(&self, id: ComponentId) {
        if let Ok(slot) = self.slot(id) {
            if let Some(record) = slot.record.lock().as_mut() {
                record.state = ComponentState::Failed;
            }
            slot.done.notify_all();
        }
    }

    /// error unless the component's run has completed
    pub fn ensure_done(&self, id: ComponentId) -> Result<()> {
        match self.state(id)? {
            ComponentState::Done => Ok(()),
            ComponentState::Failed => Err(WitnessError::Aborted { component: id }),
            _ => Err(WitnessError::ReadBeforeRun { component: id }),
        }
    }

    /// block until the component's run has completed
    ///
    /// only a component that is ready or running can still complete; anything
    /// earlier is a wiring defect and is reported instead of waited on.
    pub fn wait_done(&self, id: ComponentId) -> Result<()> {
        let slot = self.slot(id)?;
        let mut guard = slot.record.lock();
        loop {
            let state = guard
                .as_ref()
                .map(|r| r.state)
                .ok_or(WitnessError::UnknownComponent(id))?;
            match state {
                ComponentState::Done => return Ok(()),
                ComponentState::Failed => return Err(WitnessError::Aborted { component: id }),
                ComponentState::Ready | ComponentState::Running => slot.done.wait(&mut guard),
                _ => return Err(WitnessError::ReadBeforeRun { component: id }),
            }
        }
    }

    /// release a consumed component; a no-op for the root
    pub fn release(&self, id: ComponentId) -> Result<()> {
        if id == ROOT {
            return Ok(());
        }
        self.with_record_mut(id, |record| match record.state {
            ComponentState::Done => {
                record.subcomponents = Vec::new();
                record.subcomponents_parallel = Vec::new();
                record.output_is_set = Vec::new();
                record.state = ComponentState::Released;
                Ok(())
            }
            ComponentState::Released => Err(WitnessError::DoubleRelease { component: id }),
            _ => Err(WitnessError::ReleaseBeforeDone { component: id }),
        })?;
        self.free.lock().released.push(id);
        self.releases.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(id, "released component");
        Ok(())
    }

    pub fn state(&self, id: ComponentId) -> Result<ComponentState> {
        self.with_record(id, |r| r.state)
    }

    pub fn signal_start(&self, id: ComponentId) -> Result<usize> {
        self.with_record(id, |r| r.signal_start)
    }

    pub fn template_id(&self, id: ComponentId) -> Result<TemplateId> {
        self.with_record(id, |r| r.template_id)
    }

    pub fn input_counter(&self, id: ComponentId) -> Result<usize> {
        self.with_record(id, |r| r.input_counter)
    }

    /// component name and parent id, for diagnostics
    pub fn name_and_father(&self, id: ComponentId) -> Result<(String, ComponentId)> {
        self.with_record(id, |r| (r.component_name.clone(), r.id_father))
    }

    /// child id stored in `slot` of component `id`
    pub fn subcomponent(&self, id: ComponentId, slot: usize) -> Result<ComponentId> {
        self.with_record(id, |r| r.subcomponents.get(slot).copied())?
            .ok_or(WitnessError::SubcomponentSlot { component: id, slot })
    }

    pub fn is_subcomponent_parallel(&self, id: ComponentId, slot: usize) -> Result<bool> {
        self.with_record(id, |r| r.subcomponents_parallel.get(slot).copied())?
            .ok_or(WitnessError::SubcomponentSlot { component: id, slot })
    }

    pub fn set_subcomponent(
        &self,
        id: ComponentId,
        slot: usize,
        child: ComponentId,
        parallel: bool,
    ) -> Result<()> {
        self.with_record_mut(id, |r| {
            if slot >= r.subcomponents.len() {
                return Err(WitnessError::SubcomponentSlot { component: id, slot });
            }
            r.subcomponents[slot] = child;
            r.subcomponents_parallel[slot] = parallel;
            r.output_is_set[slot] = false;
            Ok(())
        })
    }

    /// whether component `id` already observed child `slot` finishing
    pub fn output_is_set(&self, id: ComponentId, slot: usize) -> Result<bool> {
        self.with_record(id, |r| r.output_is_set.get(slot).copied())?
            .ok_or(WitnessError::SubcomponentSlot { component: id, slot })
    }

    pub fn mark_output_set(&self, id: ComponentId, slot: usize) -> Result<()> {
        self.with_record_mut(id, |r| match r.output_is_set.get_mut(slot) {
            Some(flag) => {
                *flag = true;
                Ok(())
            }
            None => Err(WitnessError::SubcomponentSlot { component: id, slot }),
        })
    }

    /// clear the child list of `id`, returning the populated entries
    pub fn take_subcomponents(&self, id: ComponentId) -> Result<Vec<ComponentId>> {
        self.with_record_mut(id, |r| {
            let children = r.subcomponents.iter().copied().filter(|&c| c != 0).collect();
            r.subcomponents.iter_mut().for_each(|c| *c = 0);
            Ok(children)
        })
    }

    /// total successful allocations since construction
    pub fn allocation_count(&self) -> usize {
        self.allocations.load(Ordering::Relaxed)
    }

    /// total releases since construction
    pub fn released_count(&self) -> usize {
        self.releases.load(Ordering::Relaxed)
    }

    /// records currently allocated and not released
    pub fn live_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| {
                s.record
                    .lock()
                    .as_ref()
                    .map_or(false, |r| r.state != ComponentState::Released)
            })
            .count()
    }

    /// non-root components still holding their record
    pub fn unreleased(&self) -> Vec<(ComponentId, String)> {
        self.slots
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(id, s)| {
                s.record.lock().as_ref().and_then(|r| {
                    (r.state != ComponentState::Released).then(|| (id, r.component_name.clone()))
                })
            })
            .collect()
    }

    fn transition(
        &self,
        id: ComponentId,
        expected: ComponentState,
        next: ComponentState,
    ) -> Result<()> {
        self.with_record_mut(id, |r| {
            if r.state != expected {
                return Err(WitnessError::InvalidState {
                    component: id,
                    expected,
                    found: r.state,
                });
            }
            r.state = next;
            Ok(())
        })
    }

    fn slot(&self, id: ComponentId) -> Result<&Slot> {
        self.slots.get(id).ok_or(WitnessError::UnknownComponent(id))
    }

    fn with_record<R>(&self, id: ComponentId, f: impl FnOnce(&ComponentRecord) -> R) -> Result<R> {
        let guard = self.slot(id)?.record.lock();
        guard.as_ref().map(f).ok_or(WitnessError::UnknownComponent(id))
    }

    fn with_record_mut<R>(
        &self,
        id: ComponentId,
        f: impl FnOnce(&mut ComponentRecord) -> Result<R>,
    ) -> Result<R> {
        let mut guard = self.slot(id)?.record.lock();
        match guard.as_mut() {
            Some(record) => f(record),
            None => Err(WitnessError::UnknownComponent(id)),
        }
    }
}
