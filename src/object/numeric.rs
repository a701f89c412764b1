//! The Numeric capability: "I can be projected to a double-precision real
//! for the purposes of arithmetic and comparison." (see SPEC_FULL.md §3).

use num_bigint::BigInt;

use super::decimal::DecimalObj;
use super::integer::IntegerObj;

/// A typed view over the three built-in classes that offer the Numeric
/// capability. Borrowed from the owning [`crate::object::Object`] rather than
/// boxed as a trait object — the set of implementors is closed, so a tagged
/// view is simpler than dynamic dispatch.
pub enum NumericView<'a> {
    Integer(&'a IntegerObj),
    Float(f64),
    Decimal(&'a DecimalObj),
}

impl<'a> NumericView<'a> {
    /// Coerces to double precision. Never fails: every implementor has a
    /// well-defined (if lossy) projection into `f64`.
    pub fn float_value(&self) -> f64 {
        match self {
            NumericView::Integer(i) => i.float_value(),
            NumericView::Float(f) => *f,
            NumericView::Decimal(d) => d.float_value(),
        }
    }

    /// The arbitrary-precision integer projection, when one exists exactly.
    /// Only `Integer` offers this; `Float` and `Decimal` return `None`.
    pub fn integer_value(&self) -> Option<BigInt> {
        match self {
            NumericView::Integer(i) => Some(i.value.clone()),
            NumericView::Float(_) | NumericView::Decimal(_) => None,
        }
    }

    /// The class name to report in `TypeError` messages when a strict-typed
    /// method (e.g. Float's comparisons) rejects this operand.
    pub fn class_name(&self) -> &'static str {
        match self {
            NumericView::Integer(_) => "Integer",
            NumericView::Float(_) => "Float",
            NumericView::Decimal(_) => "Decimal",
        }
    }
}
