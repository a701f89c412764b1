//! Float built-in methods (SPEC_FULL.md §4.5): the representative numeric
//! subsystem the spec treats as illustrative of the whole built-in method
//! registry pattern.

use std::cmp::Ordering;
use std::rc::Rc;

use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive};

use crate::object::error_object::{init_error_object, zero_division_error};
use crate::object::{Arity, BuiltinFn, DecimalObj, ErrorKind, IntegerObj, Object};
use crate::registry::ClassRegistry;
use crate::source_line::SourceLine;
use crate::thread::Thread;

use super::{coerce_numeric, require_float};

pub fn install(registry: &ClassRegistry) {
    let class = registry.initialize_class("Float");
    registry.set_builtin_methods(
        &class,
        [
            ("+", Arity::Exact(1), add as BuiltinFn),
            ("-", Arity::Exact(1), sub as BuiltinFn),
            ("*", Arity::Exact(1), mul as BuiltinFn),
            ("/", Arity::Exact(1), div as BuiltinFn),
            ("%", Arity::Exact(1), modulo as BuiltinFn),
            ("**", Arity::Exact(1), pow as BuiltinFn),
            (">", Arity::Exact(1), gt as BuiltinFn),
            (">=", Arity::Exact(1), ge as BuiltinFn),
            ("<", Arity::Exact(1), lt as BuiltinFn),
            ("<=", Arity::Exact(1), le as BuiltinFn),
            ("<=>", Arity::Exact(1), spaceship as BuiltinFn),
            ("==", Arity::Exact(1), eq as BuiltinFn),
            ("to_i", Arity::Exact(0), to_i as BuiltinFn),
            ("to_d", Arity::Exact(0), to_d as BuiltinFn),
            ("abs", Arity::Exact(0), abs as BuiltinFn),
            ("ceil", Arity::Exact(0), ceil as BuiltinFn),
            ("floor", Arity::Exact(0), floor as BuiltinFn),
            ("round", Arity::Range { min: 0, max: 1 }, round as BuiltinFn),
            ("zero?", Arity::Exact(0), is_zero as BuiltinFn),
            ("positive?", Arity::Exact(0), is_positive as BuiltinFn),
            ("negative?", Arity::Exact(0), is_negative as BuiltinFn),
        ],
        false,
    );
    // `Float.new` is deliberately left unregistered (SPEC_FULL.md §4.5):
    // the ordinary method-lookup miss already yields `NoMethodError`.
}

fn self_value(receiver: &Object) -> f64 {
    match receiver {
        Object::Float(f) => *f,
        _ => unreachable!("Float builtin invoked on a non-Float receiver"),
    }
}

fn add(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_value(receiver);
    match coerce_numeric(thread, line, &args[0]) {
        Ok(rhs) => Object::float(lhs + rhs),
        Err(e) => e,
    }
}

fn sub(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_value(receiver);
    match coerce_numeric(thread, line, &args[0]) {
        Ok(rhs) => Object::float(lhs - rhs),
        Err(e) => e,
    }
}

fn mul(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_value(receiver);
    match coerce_numeric(thread, line, &args[0]) {
        Ok(rhs) => Object::float(lhs * rhs),
        Err(e) => e,
    }
}

fn div(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_value(receiver);
    match coerce_numeric(thread, line, &args[0]) {
        Ok(rhs) if rhs == 0.0 => Object::Error(Rc::new(zero_division_error(line, "/"))),
        Ok(rhs) => Object::float(lhs / rhs),
        Err(e) => e,
    }
}

/// IEEE remainder with the sign convention of the mathematical library's
/// `mod` (the result takes the divisor's sign), not Rust's `%` (which takes
/// the dividend's).
fn modulo(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_value(receiver);
    match coerce_numeric(thread, line, &args[0]) {
        Ok(rhs) if rhs == 0.0 => Object::Error(Rc::new(zero_division_error(line, "%"))),
        Ok(rhs) => Object::float(lhs - rhs * (lhs / rhs).floor()),
        Err(e) => e,
    }
}

fn pow(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_value(receiver);
    match coerce_numeric(thread, line, &args[0]) {
        Ok(rhs) => Object::float(lhs.powf(rhs)),
        Err(e) => e,
    }
}

fn gt(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_value(receiver);
    match require_float(thread, line, &args[0]) {
        Ok(rhs) => Object::bool(lhs > rhs),
        Err(e) => e,
    }
}

fn ge(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_value(receiver);
    match require_float(thread, line, &args[0]) {
        Ok(rhs) => Object::bool(lhs >= rhs),
        Err(e) => e,
    }
}

fn lt(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_value(receiver);
    match require_float(thread, line, &args[0]) {
        Ok(rhs) => Object::bool(lhs < rhs),
        Err(e) => e,
    }
}

fn le(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_value(receiver);
    match require_float(thread, line, &args[0]) {
        Ok(rhs) => Object::bool(lhs <= rhs),
        Err(e) => e,
    }
}

fn spaceship(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_value(receiver);
    match coerce_numeric(thread, line, &args[0]) {
        Ok(rhs) => match lhs.partial_cmp(&rhs) {
            Some(Ordering::Less) => Object::int(-1i64),
            Some(Ordering::Equal) => Object::int(0i64),
            Some(Ordering::Greater) => Object::int(1i64),
            None => Object::Nil,
        },
        Err(e) => e,
    }
}

fn eq(receiver: &Object, _line: SourceLine, _thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_value(receiver);
    match args[0].as_numeric() {
        Some(view) => Object::bool(lhs == view.float_value()),
        None => Object::bool(false),
    }
}

fn to_i(receiver: &Object, _line: SourceLine, _thread: &mut Thread, _args: &[Object], _block: Option<&Object>) -> Object {
    let truncated = self_value(receiver).trunc();
    let value = BigInt::from_f64(truncated).unwrap_or_else(|| BigInt::from(0));
    Object::Integer(IntegerObj::from_conversion(value))
}

fn to_d(receiver: &Object, line: SourceLine, _thread: &mut Thread, _args: &[Object], _block: Option<&Object>) -> Object {
    match DecimalObj::from_float(self_value(receiver)) {
        Ok(d) => Object::Decimal(d),
        Err(msg) => Object::Error(Rc::new(init_error_object(ErrorKind::ArgumentError, line, msg))),
    }
}

fn abs(receiver: &Object, _line: SourceLine, _thread: &mut Thread, _args: &[Object], _block: Option<&Object>) -> Object {
    Object::float(self_value(receiver).abs())
}

fn ceil(receiver: &Object, _line: SourceLine, _thread: &mut Thread, _args: &[Object], _block: Option<&Object>) -> Object {
    let value = BigInt::from_f64(self_value(receiver).ceil()).unwrap_or_else(|| BigInt::from(0));
    Object::Integer(IntegerObj::from_conversion(value))
}

fn floor(receiver: &Object, _line: SourceLine, _thread: &mut Thread, _args: &[Object], _block: Option<&Object>) -> Object {
    let value = BigInt::from_f64(self_value(receiver).floor()).unwrap_or_else(|| BigInt::from(0));
    Object::Integer(IntegerObj::from_conversion(value))
}

/// Precision rounding is `round(value × 10^p) / 10^p`; `f64::round` already
/// rounds half away from zero (SPEC_FULL.md §4.5, §8 invariant 4), matching
/// `1.115.round(2) == 1.12` and `-1.115.round(2) == -1.12`.
fn round(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let precision = match args.first() {
        None => 0i32,
        Some(Object::Integer(i)) => match i.value.to_i32() {
            Some(p) if p >= 0 => p,
            _ => {
                return Object::Error(Rc::new(init_error_object(
                    ErrorKind::ArgumentError,
                    line,
                    "precision must be a non-negative integer",
                )))
            }
        },
        Some(other) => {
            let class_name = other.class(&thread.vm.registry).borrow().name.clone();
            return Object::Error(Rc::new(crate::object::error_object::type_error(line, "Integer", &class_name)));
        }
    };
    let factor = 10f64.powi(precision);
    Object::float((self_value(receiver) * factor).round() / factor)
}

fn is_zero(receiver: &Object, _line: SourceLine, _thread: &mut Thread, _args: &[Object], _block: Option<&Object>) -> Object {
    Object::bool(self_value(receiver) == 0.0)
}

fn is_positive(receiver: &Object, _line: SourceLine, _thread: &mut Thread, _args: &[Object], _block: Option<&Object>) -> Object {
    Object::bool(self_value(receiver) > 0.0)
}

fn is_negative(receiver: &Object, _line: SourceLine, _thread: &mut Thread, _args: &[Object], _block: Option<&Object>) -> Object {
    Object::bool(self_value(receiver) < 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::VmLimits;
    use crate::vm::Vm;

    fn thread() -> Thread {
        Vm::with_limits(VmLimits::default()).spawn_thread()
    }

    #[test]
    fn add_coerces_integer() {
        let mut t = thread();
        let result = add(&Object::float(1.1), 1, &mut t, &[Object::int(2i64)], None);
        assert!(matches!(result, Object::Float(f) if (f - 3.1).abs() < 1e-9));
    }

    #[test]
    fn div_by_zero_is_zero_division_error() {
        let mut t = thread();
        let result = div(&Object::float(7.5), 1, &mut t, &[Object::int(0i64)], None);
        assert!(matches!(result, Object::Error(e) if e.kind == ErrorKind::ZeroDivisionError));
    }

    #[test]
    fn strict_gt_rejects_integer() {
        let mut t = thread();
        let result = gt(&Object::float(1.0), 1, &mut t, &[Object::int(1i64)], None);
        assert!(matches!(result, Object::Error(e) if e.kind == ErrorKind::TypeError));
    }

    #[test]
    fn round_half_away_from_zero() {
        let mut t = thread();
        let result = round(&Object::float(1.115), 1, &mut t, &[Object::int(2i64)], None);
        assert!(matches!(result, Object::Float(f) if (f - 1.12).abs() < 1e-9));
        let result = round(&Object::float(-1.115), 1, &mut t, &[Object::int(2i64)], None);
        assert!(matches!(result, Object::Float(f) if (f - -1.12).abs() < 1e-9));
    }

    #[test]
    fn zero_predicate_treats_nan_as_false() {
        let mut t = thread();
        assert!(matches!(is_zero(&Object::float(0.0), 1, &mut t, &[], None), Object::Boolean(true)));
        assert!(matches!(is_zero(&Object::float(-0.0), 1, &mut t, &[], None), Object::Boolean(true)));
        assert!(matches!(is_zero(&Object::float(f64::NAN), 1, &mut t, &[], None), Object::Boolean(false)));
    }
}
