//! Built-in method descriptors and the method-table entry shape
//! (SPEC_FULL.md §4.1, §4.5). Declarative data, installed into a class's
//! instance- or class-method table — never reflection-based dispatch.

use std::fmt;
use std::rc::Rc;

use crate::instruction_set::InstructionSet;
use crate::object::Object;
use crate::source_line::SourceLine;
use crate::thread::Thread;

/// How many positional arguments a built-in accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly `n` positional arguments.
    Exact(usize),
    /// Between `min` and `max` (inclusive) positional arguments.
    Range { min: usize, max: usize },
}

impl Arity {
    pub fn accepts(self, got: usize) -> bool {
        match self {
            Arity::Exact(n) => got == n,
            Arity::Range { min, max } => got >= min && got <= max,
        }
    }

    /// The `expected` count reported in `ArgumentError` messages: the
    /// minimum, since that is what the source fragment's "Expect K
    /// argument(s)" message names for range arities (e.g. `round`'s K=0).
    pub fn expected_count(self) -> usize {
        match self {
            Arity::Exact(n) => n,
            Arity::Range { min, .. } => min,
        }
    }
}

/// A built-in method implementation: receiver, source line (for error
/// reporting), the executing thread, the positional argument slice, and an
/// optional block (a captured closure passed to a method call).
pub type BuiltinFn = fn(&Object, SourceLine, &mut Thread, &[Object], Option<&Object>) -> Object;

/// A declarative built-in method record.
pub struct BuiltinMethod {
    pub name: &'static str,
    pub arity: Arity,
    pub handler: BuiltinFn,
}

impl fmt::Debug for BuiltinMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinMethod").field("name", &self.name).finish()
    }
}

/// What a class's method table maps a name to: either a built-in descriptor
/// or a user-defined instruction set the bytecode interpreter executes.
#[derive(Clone, Debug)]
pub enum MethodEntry {
    Builtin(Rc<BuiltinMethod>),
    UserDefined(Rc<InstructionSet>),
}

impl MethodEntry {
    pub fn builtin(name: &'static str, arity: Arity, handler: BuiltinFn) -> Self {
        MethodEntry::Builtin(Rc::new(BuiltinMethod { name, arity, handler }))
    }
}
