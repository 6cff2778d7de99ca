//! field element collaborator
//!
//! the engine never does arithmetic itself; generated template bodies call
//! into this trait. the only binding shipped is the bn254 scalar field,
//! which is what circuits compiled for groth16/plonk over bn254 expect.
//!
//! comparisons follow the signed convention of the circuit compiler:
//! an element `x > (p - 1) / 2` is read as the negative number `x - p`.

use ark_ff::{BigInteger, PrimeField};
use num_bigint::{BigInt, BigUint, Sign};

use core::fmt::Debug;

/// bn254 scalar field
pub use ark_bn254::Fr;

/// operations the engine and generated code consume from the field library
pub trait FieldArithmetic: Copy + Debug + PartialEq + Eq + Send + Sync + 'static {
    fn zero() -> Self;
    fn one() -> Self;
    fn from_u64(value: u64) -> Self;

    /// reduce an arbitrary signed integer into the field
    fn from_bigint(value: &BigInt) -> Self;

    /// canonical representative in `[0, p)`
    fn to_biguint(&self) -> BigUint;

    fn multiply(a: &Self, b: &Self) -> Self;
    fn plus(a: &Self, b: &Self) -> Self;
    fn minus(a: &Self, b: &Self) -> Self;
    fn negate(a: &Self) -> Self;

    /// signed comparison `a < b`
    fn less_than(a: &Self, b: &Self) -> bool;

    /// nonzero means true
    fn is_true(a: &Self) -> bool;

    /// `a < b` as a field boolean (0 or 1)
    fn lt_flag(a: &Self, b: &Self) -> Self {
        Self::from_bool(Self::less_than(a, b))
    }

    /// `a == b` as a field boolean (0 or 1)
    fn eq_flag(a: &Self, b: &Self) -> Self {
        Self::from_bool(a == b)
    }

    fn from_bool(b: bool) -> Self {
        if b {
            Self::one()
        } else {
            Self::zero()
        }
    }

    fn to_decimal(&self) -> String {
        self.to_biguint().to_string()
    }
}

impl FieldArithmetic for Fr {
    fn zero() -> Self {
        <Fr as ark_ff::Zero>::zero()
    }

    fn one() -> Self {
        <Fr as ark_ff::One>::one()
    }

    fn from_u64(value: u64) -> Self {
        Fr::from(value)
    }

    fn from_bigint(value: &BigInt) -> Self {
        let (sign, magnitude) = value.to_bytes_le();
        let reduced = Fr::from_le_bytes_mod_order(&magnitude);
        match sign {
            Sign::Minus => -reduced,
            _ => reduced,
        }
    }

    fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_le(&self.into_bigint().to_bytes_le())
    }

    fn multiply(a: &Self, b: &Self) -> Self {
        *a * *b
    }

    fn plus(a: &Self, b: &Self) -> Self {
        *a + *b
    }

    fn minus(a: &Self, b: &Self) -> Self {
        *a - *b
    }

    fn negate(a: &Self) -> Self {
        -*a
    }

    fn less_than(a: &Self, b: &Self) -> bool {
        signed(a) < signed(b)
    }

    fn is_true(a: &Self) -> bool {
        !<Fr as ark_ff::Zero>::is_zero(a)
    }
}

/// signed view of a bn254 element
fn signed(x: &Fr) -> BigInt {
    let repr = x.into_bigint();
    let magnitude = BigUint::from_bytes_le(&repr.to_bytes_le());
    if repr > Fr::MODULUS_MINUS_ONE_DIV_TWO {
        let modulus = BigUint::from_bytes_le(&Fr::MODULUS.to_bytes_le());
        -BigInt::from(modulus - magnitude)
    } else {
        BigInt::from(magnitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_basic_arithmetic() {
        let two = Fr::from_u64(2);
        let three = Fr::from_u64(3);
        assert_eq!(Fr::multiply(&two, &three), Fr::from_u64(6));
        assert_eq!(Fr::plus(&two, &three), Fr::from_u64(5));
        assert_eq!(Fr::minus(&three, &two), Fr::one());
        assert_eq!(Fr::plus(&Fr::negate(&two), &two), Fr::zero());
    }

    #[test]
    fn test_truthiness() {
        assert!(!Fr::is_true(&Fr::zero()));
        assert!(Fr::is_true(&Fr::one()));
        assert!(Fr::is_true(&Fr::negate(&Fr::one())));
    }

    #[test]
    fn test_signed_comparison() {
        let minus_one = Fr::negate(&Fr::one());
        // -1 is the largest representative but compares as negative
        assert!(Fr::less_than(&minus_one, &Fr::zero()));
        assert!(Fr::less_than(&Fr::zero(), &Fr::from_u64(2)));
        assert!(!Fr::less_than(&Fr::from_u64(2), &Fr::from_u64(2)));
        assert_eq!(Fr::lt_flag(&Fr::zero(), &Fr::one()), Fr::one());
        assert_eq!(Fr::lt_flag(&Fr::one(), &Fr::zero()), Fr::zero());
    }

    #[test]
    fn test_from_bigint_negative() {
        let v = <Fr as FieldArithmetic>::from_bigint(&BigInt::from(-5));
        assert_eq!(Fr::plus(&v, &Fr::from_u64(5)), Fr::zero());
    }

    #[test]
    fn test_decimal_rendering() {
        assert_eq!(Fr::from_u64(30).to_decimal(), "30");
        // p - 1
        assert_eq!(
            Fr::negate(&Fr::one()).to_decimal(),
            "21888242871839275222246405745257275088548364400416034343698204186575808495616"
        );
    }

    proptest! {
        #[test]
        fn prop_u64_arithmetic_matches_integers(a in 0u64..u32::MAX as u64, b in 0u64..u32::MAX as u64) {
            let fa = Fr::from_u64(a);
            let fb = Fr::from_u64(b);
            prop_assert_eq!(Fr::multiply(&fa, &fb).to_biguint(), BigUint::from(a) * BigUint::from(b));
            prop_assert_eq!(Fr::plus(&fa, &fb).to_biguint(), BigUint::from(a) + BigUint::from(b));
            prop_assert_eq!(Fr::less_than(&fa, &fb), a < b);
        }

        #[test]
        fn prop_bigint_roundtrip(a in any::<u64>()) {
            let f = <Fr as FieldArithmetic>::from_bigint(&BigInt::from(a));
            prop_assert_eq!(f, Fr::from_u64(a));
        }
    }
}
