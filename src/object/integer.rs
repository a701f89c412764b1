//! The Integer value: arbitrary-precision, with the conversion subflag the
//! source VM uses to mark integers produced by a narrowing conversion
//! (e.g. `Float#to_i`) rather than written as a literal.

use std::fmt;

use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};

/// An Integer object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegerObj {
    pub value: BigInt,
    /// Set on integers that are the *result* of a conversion (`to_i`,
    /// `to_s.to_i`, …) rather than a literal or arithmetic result. The
    /// source fragment calls this the `i` subflag; it does not affect
    /// equality or arithmetic, only certain inspection/dispatch paths that
    /// care whether a value came from a coercion.
    pub from_conversion: bool,
}

impl IntegerObj {
    pub fn new(value: impl Into<BigInt>) -> Self {
        Self {
            value: value.into(),
            from_conversion: false,
        }
    }

    pub fn from_conversion(value: impl Into<BigInt>) -> Self {
        Self {
            value: value.into(),
            from_conversion: true,
        }
    }

    pub fn float_value(&self) -> f64 {
        self.value.to_f64().unwrap_or(f64::NAN)
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.value.sign() == num_bigint::Sign::Plus
    }

    pub fn is_negative(&self) -> bool {
        self.value.sign() == num_bigint::Sign::Minus
    }

    pub fn is_even(&self) -> bool {
        (&self.value % 2u8).is_zero()
    }

    pub fn is_odd(&self) -> bool {
        !self.is_even()
    }
}

impl fmt::Display for IntegerObj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl From<i64> for IntegerObj {
    fn from(value: i64) -> Self {
        IntegerObj::new(value)
    }
}
