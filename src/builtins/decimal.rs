//! Decimal built-in methods (SPEC_FULL.md §4.5.2): arbitrary-precision
//! base-10 arithmetic for callers avoiding binary floating-point rounding.

use std::rc::Rc;

use crate::object::error_object::{init_error_object, zero_division_error};
use crate::object::{Arity, BuiltinFn, DecimalObj, ErrorKind, Object};
use crate::registry::ClassRegistry;
use crate::source_line::SourceLine;
use crate::thread::Thread;

use super::type_error_for;

pub fn install(registry: &ClassRegistry) {
    let class = registry.initialize_class("Decimal");
    registry.set_builtin_methods(
        &class,
        [
            ("+", Arity::Exact(1), add as BuiltinFn),
            ("-", Arity::Exact(1), sub as BuiltinFn),
            ("*", Arity::Exact(1), mul as BuiltinFn),
            ("/", Arity::Exact(1), div as BuiltinFn),
            (">", Arity::Exact(1), gt as BuiltinFn),
            (">=", Arity::Exact(1), ge as BuiltinFn),
            ("<", Arity::Exact(1), lt as BuiltinFn),
            ("<=", Arity::Exact(1), le as BuiltinFn),
            ("==", Arity::Exact(1), eq as BuiltinFn),
            ("to_s", Arity::Exact(0), to_s as BuiltinFn),
            ("to_f", Arity::Exact(0), to_f as BuiltinFn),
        ],
        false,
    );
}

fn self_dec(receiver: &Object) -> DecimalObj {
    match receiver {
        Object::Decimal(d) => *d,
        _ => unreachable!("Decimal builtin invoked on a non-Decimal receiver"),
    }
}

/// Exact when the argument is already Decimal; otherwise coerces through
/// `float_value()` and re-parses — the same path `Float#to_d` uses
/// (SPEC_FULL.md §4.5.2).
fn coerce_to_decimal(thread: &Thread, line: SourceLine, arg: &Object) -> Result<DecimalObj, Object> {
    match arg {
        Object::Decimal(d) => Ok(*d),
        other => match other.as_numeric() {
            Some(view) => DecimalObj::from_float(view.float_value())
                .map_err(|msg| Object::Error(Rc::new(init_error_object(ErrorKind::ArgumentError, line, msg)))),
            None => Err(type_error_for(thread, line, other)),
        },
    }
}

fn add(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_dec(receiver);
    match coerce_to_decimal(thread, line, &args[0]) {
        Ok(rhs) => Object::Decimal(DecimalObj(lhs.0 + rhs.0)),
        Err(e) => e,
    }
}

fn sub(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_dec(receiver);
    match coerce_to_decimal(thread, line, &args[0]) {
        Ok(rhs) => Object::Decimal(DecimalObj(lhs.0 - rhs.0)),
        Err(e) => e,
    }
}

fn mul(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_dec(receiver);
    match coerce_to_decimal(thread, line, &args[0]) {
        Ok(rhs) => Object::Decimal(DecimalObj(lhs.0 * rhs.0)),
        Err(e) => e,
    }
}

fn div(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_dec(receiver);
    match coerce_to_decimal(thread, line, &args[0]) {
        Ok(rhs) if rhs.is_zero() => Object::Error(Rc::new(zero_division_error(line, "/"))),
        Ok(rhs) => Object::Decimal(DecimalObj(lhs.0 / rhs.0)),
        Err(e) => e,
    }
}

fn gt(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_dec(receiver);
    match coerce_to_decimal(thread, line, &args[0]) {
        Ok(rhs) => Object::bool(lhs.float_value() > rhs.float_value()),
        Err(e) => e,
    }
}

fn ge(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_dec(receiver);
    match coerce_to_decimal(thread, line, &args[0]) {
        Ok(rhs) => Object::bool(lhs.float_value() >= rhs.float_value()),
        Err(e) => e,
    }
}

fn lt(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_dec(receiver);
    match coerce_to_decimal(thread, line, &args[0]) {
        Ok(rhs) => Object::bool(lhs.float_value() < rhs.float_value()),
        Err(e) => e,
    }
}

fn le(receiver: &Object, line: SourceLine, thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_dec(receiver);
    match coerce_to_decimal(thread, line, &args[0]) {
        Ok(rhs) => Object::bool(lhs.float_value() <= rhs.float_value()),
        Err(e) => e,
    }
}

fn eq(receiver: &Object, _line: SourceLine, _thread: &mut Thread, args: &[Object], _block: Option<&Object>) -> Object {
    let lhs = self_dec(receiver);
    match &args[0] {
        Object::Decimal(rhs) => Object::bool(lhs == *rhs),
        other => match other.as_numeric() {
            Some(view) => Object::bool(lhs.float_value() == view.float_value()),
            None => Object::bool(false),
        },
    }
}

fn to_s(receiver: &Object, _line: SourceLine, _thread: &mut Thread, _args: &[Object], _block: Option<&Object>) -> Object {
    Object::string(self_dec(receiver).to_string())
}

fn to_f(receiver: &Object, _line: SourceLine, _thread: &mut Thread, _args: &[Object], _block: Option<&Object>) -> Object {
    Object::float(self_dec(receiver).float_value())
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
    fn add_is_exact_for_decimal_operands() {
        let mut t = thread();
        let lhs = Object::Decimal(DecimalObj::from_str_exact("0.1").unwrap());
        let rhs = Object::Decimal(DecimalObj::from_str_exact("0.2").unwrap());
        let result = add(&lhs, 1, &mut t, &[rhs], None);
        match result {
            Object::Decimal(d) => assert_eq!(d.to_string(), "0.3"),
            other => panic!("expected Decimal, got {other:?}"),
        }
    }

    #[test]
    fn div_by_zero_is_zero_division_error() {
        let mut t = thread();
        let lhs = Object::Decimal(DecimalObj::from_str_exact("1").unwrap());
        let rhs = Object::Decimal(DecimalObj::zero());
        let result = div(&lhs, 1, &mut t, &[rhs], None);
        assert!(matches!(result, Object::Error(e) if e.kind == ErrorKind::ZeroDivisionError));
    }
}
