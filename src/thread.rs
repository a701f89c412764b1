//! Per-thread execution state (SPEC_FULL.md §3 "Thread", §4.6).
//!
//! A thread owns its own operand stack and call-frame stack; the class
//! registry is the only state shared with its sibling threads (via the
//! owning [`crate::vm::Vm`]).

use std::rc::Rc;

use crate::error::VmResult;
use crate::frame::{new_locals, CallFrame, CallFrameStack, Locals};
use crate::instruction::{Action, Instruction};
use crate::instruction_set::InstructionSet;
use crate::object::error_object::{arity_error, no_method_error};
use crate::object::{BlockObj, Class, MethodEntry, Object};
use crate::source_line::{SourceLine, UNKNOWN_LINE};
use crate::stack::OperandStack;
use crate::vm::Vm;

/// One execution context: its own stacks, current line, and pending error.
pub struct Thread {
    pub vm: Rc<Vm>,
    pub frames: CallFrameStack,
    pub stack: OperandStack,
    pub current_line: SourceLine,
    pub pending_error: Option<Object>,
    /// Set by a `SendBlock` instruction, consumed by the following `Send`
    /// (SPEC_FULL.md §4.4: "set up the trailing block for the method call
    /// about to be sent").
    pub(crate) pending_block: Option<Rc<BlockObj>>,
    instructions_run: u64,
}

impl Thread {
    pub fn new(vm: Rc<Vm>) -> Self {
        let limits = vm.limits;
        Self {
            vm,
            frames: CallFrameStack::new(limits.max_call_depth),
            stack: OperandStack::new(limits.stack_capacity),
            current_line: UNKNOWN_LINE,
            pending_error: None,
            pending_block: None,
            instructions_run: 0,
        }
    }

    /// `run_instruction_set(root)` (SPEC_FULL.md §4.6): executes until the
    /// root's terminal return pops the last frame.
    pub fn run_instruction_set(&mut self, root: Rc<InstructionSet>) -> VmResult<Object> {
        let self_obj = Object::Instance(crate::object::Instance::new(self.vm.top_level_class()));
        let frame = CallFrame::top_level(root, self_obj);
        self.frames.push(frame)?;
        self.vm.metrics.record_frame_push();
        let pre_depth = self.frames.depth();
        let result = self.run_top_frame()?;
        self.frames.pop()?;
        self.vm.metrics.record_frame_pop();
        debug_assert_eq!(self.frames.depth(), pre_depth - 1);
        if result.is_error() {
            self.pending_error = Some(result.clone());
            self.vm.metrics.record_error();
        }
        Ok(result)
    }

    /// `yield_block(block, args)` (SPEC_FULL.md §4.6): pushes the block
    /// frame and resumes execution in it.
    pub fn yield_block(&mut self, block: &BlockObj, args: &[Object]) -> VmResult<Object> {
        let locals = new_locals();
        bind_parameters(&locals, &block.parameters, args);
        let frame = CallFrame::block_frame(
            Rc::clone(&block.instruction_set),
            (*block.captured_self).clone(),
            locals,
            block.environment.clone(),
        );
        self.frames.push(frame)?;
        self.vm.metrics.record_frame_push();
        let result = self.run_top_frame()?;
        self.frames.pop()?;
        self.vm.metrics.record_frame_pop();
        Ok(result)
    }

    /// `throw(error)` (SPEC_FULL.md §4.6): sets the pending-error cell.
    /// Frame unwinding itself happens as a side effect of the normal
    /// call-site error check (see `run_top_frame`) — there is no separate
    /// exception-handler table in this core (try/catch bytecode positions
    /// are the external rescue construct's concern, SPEC_FULL.md §7).
    pub fn throw(&mut self, error: Object) {
        debug_assert!(error.is_error());
        self.pending_error = Some(error);
        self.vm.metrics.record_error();
    }

    /// Invokes a user-defined method body directly with an explicit
    /// receiver and arguments, outside of bytecode `Send` dispatch. Used by
    /// [`crate::object::Object::to_json`] to call a user override, and
    /// available to embedders that want to invoke a known method without
    /// building a `Send` instruction.
    pub fn invoke_user_method(
        &mut self,
        receiver: Object,
        body: &Rc<InstructionSet>,
        args: &[Object],
        block: Option<Rc<BlockObj>>,
    ) -> Object {
        let locals = new_locals();
        bind_parameters(&locals, &body.parameters, args);
        if let Some(block) = block {
            locals.borrow_mut().insert("__block__".to_string(), Object::Block(block));
        }
        let frame = CallFrame::method_frame(Rc::clone(body), receiver, locals);
        if self.frames.push(frame).is_err() {
            return self.vm.fault_object(self.current_line, "call depth exceeded");
        }
        self.vm.metrics.record_frame_push();
        let result = match self.run_top_frame() {
            Ok(obj) => obj,
            Err(e) => self.vm.fault_object(self.current_line, &e.to_string()),
        };
        let _ = self.frames.pop();
        self.vm.metrics.record_frame_pop();
        result
    }

    /// Runs the topmost frame from its current `pc` to a terminal `Return`
    /// or the end of its instruction sequence, dispatching every
    /// instruction in between. Returns the frame's result; does not pop it
    /// (callers pop once they are done inspecting/propagating the frame).
    pub(crate) fn run_top_frame(&mut self) -> VmResult<Object> {
        loop {
            let (instruction, line, is_done) = {
                let frame = self.frames.top().expect("run_top_frame called with no active frame");
                match frame.instruction_set.get(frame.pc) {
                    Some(instr) => (instr.clone(), instr.line, false),
                    None => (Instruction::simple(Action::Return, frame.line), frame.line, true),
                }
            };
            self.current_line = line;
            self.vm.metrics.record_instruction();
            self.instructions_run += 1;
            if let Some(limit) = self.vm.limits.max_instructions {
                if self.instructions_run > limit {
                    return Err(crate::error::VmError::InstructionLimitExceeded {
                        executed: self.instructions_run,
                        limit,
                    });
                }
            }
            log::trace!("dispatch {:?} at line {line}", instruction.action);

            if is_done {
                // Fell off the end of the instruction sequence: an implicit
                // `nil` return, same as Ruby-family languages.
                return Ok(Object::Nil);
            }

            match self.dispatch(&instruction)? {
                FrameExitOrContinue::Return(value) => return Ok(value),
                FrameExitOrContinue::Continue => continue,
            }
        }
    }

    fn dispatch(&mut self, instr: &Instruction) -> VmResult<FrameExitOrContinue> {
        crate::dispatch::dispatch(self, instr)
    }
}

/// `bind_parameters`: positional binding of a call's argument slice onto a
/// frame's declared parameter names, left over unbound as `nil`.
fn bind_parameters(locals: &Locals, names: &[String], args: &[Object]) {
    let mut locals_mut = locals.borrow_mut();
    for (i, name) in names.iter().enumerate() {
        locals_mut.insert(name.clone(), args.get(i).cloned().unwrap_or(Object::Nil));
    }
}

/// Resolves and invokes a method send: looks the method up through the
/// receiver's class (and, for class receivers, the class-method table
/// too), checks arity, and either calls the built-in handler directly or
/// pushes a frame for a user-defined body (SPEC_FULL.md §4.1).
pub fn send_method(
    thread: &mut Thread,
    receiver: Object,
    method: &str,
    args: &[Object],
    block: Option<Rc<BlockObj>>,
) -> VmResult<Object> {
    let line = thread.current_line;
    let as_class_method = matches!(receiver, Object::Class(_));
    let class = receiver.class(&thread.vm.registry);
    let lookup_class = if as_class_method {
        match &receiver {
            Object::Class(c) => Rc::clone(c),
            _ => unreachable!(),
        }
    } else {
        class
    };

    // For a class receiver, a miss in its own (and its superclasses')
    // class-method table falls through to the metaclass's instance-method
    // table, so built-ins installed on the `Class` class itself (e.g.
    // `name`) are reachable on any class object (SPEC_FULL.md §4.1).
    let entry = Class::lookup_method(&lookup_class, method, as_class_method).or_else(|| {
        if as_class_method {
            let metaclass = thread.vm.registry.class_of_class(&lookup_class);
            Class::lookup_method(&metaclass, method, false)
        } else {
            None
        }
    });

    let Some(entry) = entry else {
        let class_name = Class::qualified_name(&lookup_class);
        return Ok(Object::Error(Rc::new(no_method_error(line, &class_name, method))));
    };

    match entry {
        MethodEntry::Builtin(builtin) => {
            if !builtin.arity.accepts(args.len()) {
                let expected = builtin.arity.expected_count();
                return Ok(Object::Error(Rc::new(arity_error(line, expected, args.len()))));
            }
            let block_obj = block.map(Object::Block);
            let result = (builtin.handler)(&receiver, line, thread, args, block_obj.as_ref());
            Ok(result)
        }
        MethodEntry::UserDefined(body) => {
            let locals = new_locals();
            bind_parameters(&locals, &body.parameters, args);
            if let Some(block) = block {
                locals.borrow_mut().insert("__block__".to_string(), Object::Block(block));
            }
            let frame = CallFrame::method_frame(Rc::clone(&body), receiver, locals);
            thread.frames.push(frame)?;
            thread.vm.metrics.record_frame_push();
            let result = thread.run_top_frame()?;
            thread.frames.pop()?;
            thread.vm.metrics.record_frame_pop();
            Ok(result)
        }
    }
}

/// The dispatch loop's per-instruction control-flow signal: either "keep
/// running this frame" or "this frame is done, with this value."
pub(crate) enum FrameExitOrContinue {
    Continue,
    Return(Object),
}
