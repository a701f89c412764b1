//! Blocks: closures over an enclosing frame's locals (SPEC_FULL.md §3, §9
//! "Frame graphs with capture").

use std::rc::Rc;

use crate::frame::Environment;
use crate::instruction_set::InstructionSet;
use crate::object::Object;

/// A block value: the instruction set for its body, the parameter names it
/// binds on invocation, the environment chain it was defined inside (nearest
/// enclosing scope first), and the `self` it closes over.
#[derive(Debug, Clone)]
pub struct BlockObj {
    pub instruction_set: Rc<InstructionSet>,
    pub parameters: Vec<String>,
    pub environment: Environment,
    pub captured_self: Box<Object>,
}

impl BlockObj {
    pub fn new(instruction_set: Rc<InstructionSet>, environment: Environment, captured_self: Object) -> Self {
        let parameters = instruction_set.parameters.clone();
        Self {
            instruction_set,
            parameters,
            environment,
            captured_self: Box::new(captured_self),
        }
    }
}
