//! main input parsing
//!
//! inputs arrive as a json object mapping signal names to values:
//!
//! ```json
//! { "in": ["2", 3, "0x05"] }
//! ```
//!
//! values may be json integers or strings holding decimal, `0x` hex or
//! negative numbers; nested arrays (multi-dimensional signals) are flattened
//! row-major.

use num_bigint::BigInt;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{Result, WitnessError};
use crate::field::FieldArithmetic;
use crate::template::InputSignal;

/// named main inputs, each flattened to a vector of integers
pub type Inputs = BTreeMap<String, Vec<BigInt>>;

/// parse a json input document
pub fn parse_inputs_json(json: &str) -> Result<Inputs> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| WitnessError::InvalidInput(format!("malformed input json: {}", e)))?;
    let object = match value {
        Value::Object(map) => map,
        other => {
            return Err(WitnessError::InvalidInput(format!(
                "input must be a json object, got {}",
                other
            )))
        }
    };

    let mut inputs = Inputs::new();
    for (name, value) in object {
        let mut flat = Vec::new();
        flatten(&name, &value, &mut flat)?;
        inputs.insert(name, flat);
    }
    Ok(inputs)
}

/// parse one scalar given as a string: decimal, `0x` hex, optionally negative
pub fn parse_bigint(s: &str) -> Result<BigInt> {
    let s = s.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let parsed = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => BigInt::parse_bytes(hex.as_bytes(), 16),
        None => BigInt::parse_bytes(digits.as_bytes(), 10),
    }
    .ok_or_else(|| WitnessError::InvalidInput(format!("not a number: {:?}", s)))?;
    Ok(if negative { -parsed } else { parsed })
}

/// match named inputs against the circuit's input map
///
/// returns `(arena offset, value)` pairs in declaration order. every name
/// must be known and carry exactly the declared number of values; inputs the
/// document omits are left for the root's input counter to report.
pub fn resolve_inputs<F: FieldArithmetic>(
    signals: &[InputSignal],
    inputs: &Inputs,
) -> Result<Vec<(usize, F)>> {
    for name in inputs.keys() {
        if !signals.iter().any(|s| s.name == name.as_str()) {
            return Err(WitnessError::UnknownInput(name.clone()));
        }
    }

    let mut resolved = Vec::new();
    for signal in signals {
        let Some(values) = inputs.get(signal.name) else {
            continue;
        };
        if values.len() != signal.len {
            return Err(WitnessError::InputLengthMismatch {
                name: signal.name.to_string(),
                expected: signal.len,
                got: values.len(),
            });
        }
        resolved.extend(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (signal.offset + i, F::from_bigint(v))),
        );
    }
    Ok(resolved)
}

fn flatten(name: &str, value: &Value, out: &mut Vec<BigInt>) -> Result<()> {
    match value {
        Value::Array(items) => {
            for item in items {
                flatten(name, item, out)?;
            }
            Ok(())
        }
        Value::String(s) => {
            out.push(parse_bigint(s)?);
            Ok(())
        }
        Value::Number(n) => {
            let v = if let Some(u) = n.as_u64() {
                BigInt::from(u)
            } else if let Some(i) = n.as_i64() {
                BigInt::from(i)
            } else {
                return Err(WitnessError::InvalidInput(format!(
                    "{}: non-integer value {}",
                    name, n
                )));
            };
            out.push(v);
            Ok(())
        }
        other => Err(WitnessError::InvalidInput(format!(
            "{}: unsupported value {}",
            name, other
        ))),
    }
}
