//! Integer built-in methods (SPEC_FULL.md §4.5.1): the other half of the
//! numeric tower the Float section illustrates, supplying a second concrete
//! receiver for the mixed Integer/Float coercion contract.

use std::cmp::Ordering;
use std::rc::Rc;

use num_bigint::{BigInt, Sign};
use num_traits::{Signed, ToPrimitive, Zero};

use crate::object::error_object::zero_division_error;
use crate::object::{Arity, BuiltinFn, DecimalObj, IntegerObj, Object};
use crate::registry::ClassRegistry;
use crate::source_line::SourceLine;
use crate::thread::Thread;

use super::coerce_numeric;

pub fn install(registry: &ClassRegistry) {
    let class = registry.initialize_class("Integer");
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
            ("to_f", Arity::Exact(0), to_f as BuiltinFn),
            ("to_i", Arity::Exact(0), to_i as BuiltinFn),
            ("to_s", Arity::Exact(0), to_s as BuiltinFn),
            ("to_d", Arity::Exact(0), to_d as BuiltinFn),
            ("abs", Arity::Exact(0), abs as BuiltinFn),
            ("zero?", Arity::Exact(0), is_zero as BuiltinFn),
            ("positive?", Arity::Exact(0), is_positive as BuiltinFn),
            ("negative?", Arity::Exact(0), is_negative as BuiltinFn),
            ("even?", Arity::Exact(0), is_even as BuiltinFn),
            ("odd?", Arity::Exact(0), is_odd as BuiltinFn),
        ],
        false,
    );
}

fn self_int(receiver: &Object) -> &IntegerObj {
    match receiver {
        Object::Integer(i) => i,
        _ => unreachable!("Integer builtin invoked on a non-Integer receiver"),
    }
}

fn floor_div(lhs: &BigInt, rhs: &BigInt) -> BigInt {
    let q = lhs / rhs;
    let r = lhs % rhs;
    if !r.is_zero() && (r.sign() == Sign::Minus) != (rhs.sign() == Sign::Minus) {
        q - BigInt::from(1)
    } else {
        q
    }
}

fn floor_mod(lhs: &BigInt, rhs: &BigInt) -> BigInt {
    let r = lhs % rhs;
    if !r.is_zero() && (r.sign() == Sign::Minus) != (rhs.sign() == Sign::Minus) {
        r + rhs
    } else {
        r
    }
}

fn bigint_pow(base: &BigInt, exp: u64) -> BigInt {
    let mut result = BigInt::from(1);
    let mut b = base.clone();
    let mut e = exp;
    while e > 0 {
        if e & 1 == 1 {
            result = &result * &b;
        }
        b = &b * &b;
        e >>= 1;
    }
    result
}

fn add(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_int(receiver);
    match &args[0] {
        Object::Integer(rhs) => Object::Integer(IntegerObj::new(&lhs.value + &rhs.value)),
        other => match coerce_numeric(thread, line, other) {
            Ok(rhs) => Object::float(lhs.float_value() + rhs),
            Err(e) => e,
        },
    }
}

fn sub(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_int(receiver);
    match &args[0] {
        Object::Integer(rhs) => Object::Integer(IntegerObj::new(&lhs.value - &rhs.value)),
        other => match coerce_numeric(thread, line, other) {
            Ok(rhs) => Object::float(lhs.float_value() - rhs),
            Err(e) => e,
        },
    }
}

fn mul(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_int(receiver);
    match &args[0] {
        Object::Integer(rhs) => Object::Integer(IntegerObj::new(&lhs.value * &rhs.value)),
        other => match coerce_numeric(thread, line, other) {
            Ok(rhs) => Object::float(lhs.float_value() * rhs),
            Err(e) => e,
        },
    }
}

/// Integer/Integer division floors toward negative infinity (the language's
/// integer-division convention, SPEC_FULL.md §4.5.1), unlike Rust's `/`
/// which truncates toward zero.
fn div(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_int(receiver);
    match &args[0] {
        Object::Integer(rhs) if rhs.is_zero() => Object::Error(Rc::new(zero_division_error(line, "/"))),
        Object::Integer(rhs) => Object::Integer(IntegerObj::new(floor_div(&lhs.value, &rhs.value))),
        other => match coerce_numeric(thread, line, other) {
            Ok(rhs) if rhs == 0.0 => Object::Error(Rc::new(zero_division_error(line, "/"))),
            Ok(rhs) => Object::float(lhs.float_value() / rhs),
            Err(e) => e,
        },
    }
}

fn modulo(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_int(receiver);
    match &args[0] {
        Object::Integer(rhs) if rhs.is_zero() => Object::Error(Rc::new(zero_division_error(line, "%"))),
        Object::Integer(rhs) => Object::Integer(IntegerObj::new(floor_mod(&lhs.value, &rhs.value))),
        other => match coerce_numeric(thread, line, other) {
            Ok(rhs) if rhs == 0.0 => Object::Error(Rc::new(zero_division_error(line, "%"))),
            Ok(rhs) => {
                let lhs_f = lhs.float_value();
                Object::float(lhs_f - rhs * (lhs_f / rhs).floor())
            }
            Err(e) => e,
        },
    }
}

/// A non-negative Integer exponent stays in arbitrary-precision arithmetic;
/// a negative exponent or any Float operand promotes through `float_value()`
/// coercion and returns a Float (SPEC_FULL.md §4.5.1).
fn pow(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_int(receiver);
    match &args[0] {
        Object::Integer(rhs) if !rhs.is_negative() => match rhs.value.to_u64() {
            Some(exp) => Object::Integer(IntegerObj::new(bigint_pow(&lhs.value, exp))),
            None => Object::float(lhs.float_value().powf(rhs.float_value())),
        },
        other => match coerce_numeric(thread, line, other) {
            Ok(rhs) => Object::float(lhs.float_value().powf(rhs)),
            Err(e) => e,
        },
    }
}

fn gt(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_int(receiver);
    match &args[0] {
        Object::Integer(rhs) => Object::bool(lhs.value > rhs.value),
        other => match coerce_numeric(thread, line, other) {
            Ok(rhs) => Object::bool(lhs.float_value() > rhs),
            Err(e) => e,
        },
    }
}

fn ge(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_int(receiver);
    match &args[0] {
        Object::Integer(rhs) => Object::bool(lhs.value >= rhs.value),
        other => match coerce_numeric(thread, line, other) {
            Ok(rhs) => Object::bool(lhs.float_value() >= rhs),
            Err(e) => e,
        },
    }
}

fn lt(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_int(receiver);
    match &args[0] {
        Object::Integer(rhs) => Object::bool(lhs.value < rhs.value),
        other => match coerce_numeric(thread, line, other) {
            Ok(rhs) => Object::bool(lhs.float_value() < rhs),
            Err(e) => e,
        },
    }
}

fn le(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_int(receiver);
    match &args[0] {
        Object::Integer(rhs) => Object::bool(lhs.value <= rhs.value),
        other => match coerce_numeric(thread, line, other) {
            Ok(rhs) => Object::bool(lhs.float_value() <= rhs),
            Err(e) => e,
        },
    }
}

fn ordering_to_i64(ord: Ordering) -> i64 {
    match ord {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

fn spaceship(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_int(receiver);
    match &args[0] {
        Object::Integer(rhs) => Object::int(ordering_to_i64(lhs.value.cmp(&rhs.value))),
        other => match coerce_numeric(thread, line, other) {
            Ok(rhs) => match lhs.float_value().partial_cmp(&rhs) {
                Some(ord) => Object::int(ordering_to_i64(ord)),
                None => Object::Nil,
            },
            Err(e) => e,
        },
    }
}

fn eq(receiver: &Object, _line: SourceLine, _thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_int(receiver);
    match &args[0] {
        Object::Integer(rhs) => Object::bool(lhs.value == rhs.value),
        other => match other.as_numeric() {
            Some(view) => Object::bool(lhs.float_value() == view.float_value()),
            None => Object::bool(false),
        },
    }
}

fn to_f(receiver: &Object, _line: SourceLine, _thread: &mut Thread, _args: &[Object], _block: Option<&Object>) -> Object {
    Object::float(self_int(receiver).float_value())
}

fn to_i(receiver: &Object, _line: SourceLine, _thread: &mut Thread, _args: &[Object], _block: Option<&Object>) -> Object {
    receiver.clone()
}

fn to_s(receiver: &Object, _line: SourceLine, _thread: &mut Thread, _args: &[Object], _block: Option<&Object>) -> Object {
    Object::string(self_int(receiver).value.to_string())
}

fn to_d(receiver: &Object, line: SourceLine, _thread: &mut Thread, _args: &[Object], _block: Option<&Object>) -> Object {
    match DecimalObj::from_str_exact(&self_int(receiver).value.to_string()) {
        Ok(d) => Object::Decimal(d),
        Err(msg) => Object::Error(Rc::new(crate::object::error_object::init_error_object(
            crate::object::ErrorKind::ArgumentError,
            line,
            msg,
        ))),
    }
}

fn abs(receiver: &Object, _line: SourceLine, _thread: &mut Thread, _args: &[Object], _block: Option<&Object>) -> Object {
    Object::Integer(IntegerObj::new(self_int(receiver).value.abs()))
}

fn is_zero(receiver: &Object, _line: SourceLine, _thread: &mut Thread, _args: &[Object], _block: Option<&Object>) -> Object {
    Object::bool(self_int(receiver).is_zero())
}

fn is_positive(receiver: &Object, _line: SourceLine, _thread: &mut Thread, _args: &[Object], _block: Option<&Object>) -> Object {
    Object::bool(self_int(receiver).is_positive())
}

fn is_negative(receiver: &Object, _line: SourceLine, _thread: &mut Thread, _args: &[Object], _block: Option<&Object>) -> Object {
    Object::bool(self_int(receiver).is_negative())
}

fn is_even(receiver: &Object, _line: SourceLine, _thread: &mut Thread, _args: &[Object], _block: Option<&Object>) -> Object {
    Object::bool(self_int(receiver).is_even())
}

fn is_odd(receiver: &Object, _line: SourceLine, _thread: &mut Thread, _args: &[Object], _block: Option<&Object>) -> Object {
    Object::bool(self_int(receiver).is_odd())
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
    fn integer_division_floors() {
        let mut t = thread();
        let result = div(&Object::int(-7i64), 1, &mut t, &[Object::int(2i64)], None);
        assert!(matches!(result, Object::Integer(i) if i.value == BigInt::from(-4)));
    }

    #[test]
    fn mixed_arithmetic_promotes_to_float() {
        let mut t = thread();
        let result = add(&Object::int(1i64), 1, &mut t, &[Object::float(2.5)], None);
        assert!(matches!(result, Object::Float(f) if (f - 3.5).abs() < 1e-9));
    }

    #[test]
    fn comparison_is_non_strict_unlike_float() {
        let mut t = thread();
        let result = gt(&Object::int(2i64), 1, &mut t, &[Object::float(1.0)], None);
        assert!(matches!(result, Object::Boolean(true)));
    }

    #[test]
    fn division_by_zero_is_zero_division_error() {
        let mut t = thread();
        let result = div(&Object::int(1i64), 1, &mut t, &[Object::int(0i64)], None);
        assert!(matches!(result, Object::Error(e) if e.kind == crate::object::ErrorKind::ZeroDivisionError));
    }
}
