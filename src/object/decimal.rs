//! The Decimal value: arbitrary-precision base-10 arithmetic, for callers
//! that need to avoid the rounding error of binary floating point.

use std::fmt;
use std::str::FromStr;

use decimal::d128;

/// A Decimal object, backed by the `decimal` crate's 128-bit decimal type.
#[derive(Debug, Clone, Copy)]
pub struct DecimalObj(pub d128);

impl DecimalObj {
    pub fn zero() -> Self {
        DecimalObj(d128::zero())
    }

    pub fn from_str_exact(s: &str) -> Result<Self, String> {
        d128::from_str(s)
            .map(DecimalObj)
            .map_err(|_| format!("invalid numeric string: {s:?}"))
    }

    /// Non-exponential decimal formatting, parsed back from a Float's own
    /// `to_s`. This is the path `Float#to_d` uses.
    pub fn from_float(value: f64) -> Result<Self, String> {
        Self::from_str_exact(&format!("{value}"))
    }

    pub fn float_value(&self) -> f64 {
        self.0.to_string().parse::<f64>().unwrap_or(f64::NAN)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == d128::zero()
    }
}

impl PartialEq for DecimalObj {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl fmt::Display for DecimalObj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
