//! Builtin class installation (SPEC_FULL.md §4.1, §4.5–§4.5.2): populates a
//! fresh [`ClassRegistry`] with every class name the value model can report
//! through `class()`, plus the declarative method tables for the numeric
//! tower. Everything outside the numeric tower (String, Array, Hash, Range,
//! Block, the Object root) gets a bare class registration only — their
//! standard-library methods are out of scope (SPEC_FULL.md §1).

use std::rc::Rc;

use crate::builtins::{decimal, float, integer};
use crate::object::error_object::ErrorKind;
use crate::registry::ClassRegistry;

const ERROR_KINDS: [ErrorKind; 7] = [
    ErrorKind::TypeError,
    ErrorKind::ArgumentError,
    ErrorKind::ZeroDivisionError,
    ErrorKind::NoMethodError,
    ErrorKind::NameError,
    ErrorKind::NotImplementedError,
    ErrorKind::InternalError,
];

/// Installs every built-in class into `registry`. Idempotent: repeated
/// calls against the same registry are harmless, since
/// `initialize_class`/`initialize_subclass` return the existing class on a
/// second call.
pub fn bootstrap_registry(registry: &ClassRegistry) {
    registry.initialize_class("Object");
    registry.initialize_class("NilClass");
    registry.initialize_class("Boolean");
    registry.initialize_class("String");
    registry.initialize_class("Array");
    registry.initialize_class("Hash");
    registry.initialize_class("Range");
    registry.initialize_class("Block");

    let base_error = registry.initialize_class("Error");
    for kind in ERROR_KINDS {
        registry.initialize_subclass(kind.class_name(), Rc::clone(&base_error));
    }

    integer::install(registry);
    float::install(registry);
    decimal::install(registry);
}
