//! Declarative built-in method tables for the numeric tower (SPEC_FULL.md
//! §4.5–§4.5.2). Each submodule installs one class's instance methods into a
//! freshly bootstrapped [`crate::registry::ClassRegistry`].

pub mod decimal;
pub mod float;
pub mod integer;

use std::rc::Rc;

use crate::object::error_object::type_error;
use crate::object::Object;
use crate::source_line::SourceLine;
use crate::thread::Thread;

/// `coerce(x)` (SPEC_FULL.md §4.5): "if x offers the Numeric capability,
/// return x.float_value(), otherwise fail with TypeError("Numeric",
/// x.class_name)".
pub(super) fn coerce_numeric(thread: &Thread, line: SourceLine, arg: &Object) -> Result<f64, Object> {
    match arg.as_numeric() {
        Some(view) => Ok(view.float_value()),
        None => Err(type_error_for(thread, line, arg)),
    }
}

/// The strict form Float's `>`, `>=`, `<`, `<=` use: the argument must
/// literally be a Float, not merely Numeric (SPEC_FULL.md §4.5, §9).
pub(super) fn require_float(thread: &Thread, line: SourceLine, arg: &Object) -> Result<f64, Object> {
    match arg {
        Object::Float(f) => Ok(*f),
        _ => Err(type_error_for(thread, line, arg)),
    }
}

fn type_error_for(thread: &Thread, line: SourceLine, arg: &Object) -> Object {
    let class_name = arg.class(&thread.vm.registry).borrow().name.clone();
    Object::Error(Rc::new(type_error(line, "Numeric", &class_name)))
}
