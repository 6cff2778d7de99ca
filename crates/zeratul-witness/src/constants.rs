//! circuit constants
//!
//! literals and derived constants the compiler folded out of the source.
//! filled once before any run and never mutated afterwards: the table only
//! exposes shared reads.

use num_bigint::BigInt;

use crate::error::{Result, WitnessError};
use crate::field::FieldArithmetic;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantTable<F> {
    values: Box<[F]>,
}

impl<F: FieldArithmetic> ConstantTable<F> {
    pub fn new(values: Vec<F>) -> Self {
        Self {
            values: values.into_boxed_slice(),
        }
    }

    /// parse decimal (optionally negative) constants as emitted by the compiler
    pub fn from_decimal(constants: &[&str]) -> Result<Self> {
        let values = constants
            .iter()
            .map(|s| {
                s.parse::<BigInt>()
                    .map(|v| F::from_bigint(&v))
                    .map_err(|e| WitnessError::InvalidInput(format!("constant {:?}: {}", s, e)))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(values))
    }

    pub fn get(&self, index: usize) -> Result<F> {
        self.values
            .get(index)
            .copied()
            .ok_or(WitnessError::ConstantOutOfBounds {
                index,
                size: self.values.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[F] {
        &self.values
    }
}
