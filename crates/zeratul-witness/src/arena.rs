//! signal arena
//!
//! one flat vector of field elements sized once from the circuit's total
//! signal count. components address it only by absolute offset
//! (`signal_start + local index`); nothing hands out references into it,
//! so releasing a component can never leave a dangling pointer behind.
//!
//! the cells sit behind a single rwlock so worker threads in parallel mode
//! can share the arena by reference. ordering between a child's writes and
//! its parent's reads is established by the component table, not here.

use parking_lot::RwLock;

use crate::error::{Result, WitnessError};
use crate::field::FieldArithmetic;

#[derive(Debug)]
struct Cells<F> {
    values: Vec<F>,
    /// which cells have been written at least once
    assigned: Vec<bool>,
}

/// flat, fixed-size signal storage
#[derive(Debug)]
pub struct SignalArena<F> {
    cells: RwLock<Cells<F>>,
    size: usize,
    strict_reads: bool,
}

impl<F: FieldArithmetic> SignalArena<F> {
    /// arena of `size` zeroed, unassigned signals
    pub fn new(size: usize, strict_reads: bool) -> Self {
        Self {
            cells: RwLock::new(Cells {
                values: vec![F::zero(); size],
                assigned: vec![false; size],
            }),
            size,
            strict_reads,
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn read(&self, offset: usize) -> Result<F> {
        self.check_bounds(offset)?;
        let cells = self.cells.read();
        if self.strict_reads && !cells.assigned[offset] {
            return Err(WitnessError::UnassignedSignal { offset });
        }
        Ok(cells.values[offset])
    }

    pub fn write(&self, offset: usize, value: F) -> Result<()> {
        self.check_bounds(offset)?;
        let mut cells = self.cells.write();
        cells.values[offset] = value;
        cells.assigned[offset] = true;
        Ok(())
    }

    pub fn is_assigned(&self, offset: usize) -> bool {
        offset < self.size && self.cells.read().assigned[offset]
    }

    /// values at `offsets`, in the given order, under one lock
    ///
    /// honors strict reads like [`SignalArena::read`].
    pub fn gather(&self, offsets: &[usize]) -> Result<Vec<F>> {
        let cells = self.cells.read();
        offsets
            .iter()
            .map(|&offset| {
                if offset >= self.size {
                    return Err(WitnessError::SignalOutOfBounds {
                        offset,
                        size: self.size,
                    });
                }
                if self.strict_reads && !cells.assigned[offset] {
                    return Err(WitnessError::UnassignedSignal { offset });
                }
                Ok(cells.values[offset])
            })
            .collect()
    }

    /// copy of every cell, in offset order
    pub fn snapshot(&self) -> Vec<F> {
        self.cells.read().values.clone()
    }

    fn check_bounds(&self, offset: usize) -> Result<()> {
        if offset >= self.size {
            return Err(WitnessError::SignalOutOfBounds {
                offset,
                size: self.size,
            });
        }
        Ok(())
    }
}
