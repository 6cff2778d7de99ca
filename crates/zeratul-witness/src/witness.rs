//! witness extraction
//!
//! the witness is the subset of arena signals the compiler kept for the
//! constraint system, in the order given by the circuit's
//! witness-to-signal map. position 0 is always the constant one.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::arena::SignalArena;
use crate::error::Result;
use crate::field::FieldArithmetic;

/// finished witness of a successful calculation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness<F> {
    values: Vec<F>,
}

impl<F: FieldArithmetic> Witness<F> {
    /// gather witness values out of the arena
    ///
    /// with strict reads, a witness signal no component assigned is an error
    /// rather than an exported zero.
    pub fn extract(arena: &SignalArena<F>, witness_to_signal: &[usize]) -> Result<Self> {
        Ok(Self {
            values: arena.gather(witness_to_signal)?,
        })
    }

    pub fn from_values(values: Vec<F>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<F> {
        self.values.get(index).copied()
    }

    pub fn values(&self) -> &[F] {
        &self.values
    }

    pub fn into_values(self) -> Vec<F> {
        self.values
    }

    /// canonical decimal representation of every element
    #[cfg(feature = "parallel")]
    pub fn to_decimal_strings(&self) -> Vec<String> {
        self.values.par_iter().map(|v| v.to_decimal()).collect()
    }

    /// canonical decimal representation of every element
    #[cfg(not(feature = "parallel"))]
    pub fn to_decimal_strings(&self) -> Vec<String> {
        self.values.iter().map(|v| v.to_decimal()).collect()
    }

    /// json array of decimal strings, as snarkjs exports a witness
    pub fn to_json(&self) -> String {
        serde_json::Value::from(self.to_decimal_strings()).to_string()
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.to_decimal_strings())
            .unwrap_or_else(|_| self.to_json())
    }
}
