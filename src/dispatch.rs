//! Per-instruction execution (SPEC_FULL.md §4.4): "fetch the instruction at
//! the current frame's program counter, dispatch on action, update
//! stack/frame/line state, advance or jump the program counter."
//!
//! Every arm that can yield a language-level error (`Send`, `YieldBlock`,
//! `GetConstant`, `DefineClass`) checks the result and, on an error object,
//! returns it as the frame's terminal value immediately rather than pushing
//! it to the operand stack. This is the core's entire unwinding mechanism:
//! there is no exception-handler table (SPEC_FULL.md §7 — guest-level rescue
//! is external), so a frame that observes an error from a call it made just
//! becomes that error itself, and the frame above it does the same in turn.

use std::rc::Rc;

use crate::error::{VmError, VmResult};
use crate::frame::{new_locals, CallFrame};
use crate::instruction::{Action, Instruction, Param};
use crate::object::error_object::{name_error, type_error};
use crate::object::{BlockObj, ErrorKind, MethodEntry, Object};
use crate::thread::{send_method, FrameExitOrContinue, Thread};

pub fn dispatch(thread: &mut Thread, instr: &Instruction) -> VmResult<FrameExitOrContinue> {
    use FrameExitOrContinue::{Continue, Return};

    match instr.action {
        Action::PutObject => {
            let obj = literal(instr.params.first());
            thread.stack.push(obj)?;
            advance(thread)
        }

        Action::PutSelf => {
            let self_obj = current_frame(thread).self_object.clone();
            thread.stack.push(self_obj)?;
            advance(thread)
        }

        Action::PutNull => {
            thread.stack.push(Object::Nil)?;
            advance(thread)
        }

        Action::Dup => {
            let top = thread.stack.top()?.clone();
            thread.stack.push(top)?;
            advance(thread)
        }

        Action::Pop => {
            thread.stack.pop()?;
            advance(thread)
        }

        Action::GetLocal => {
            let name = param_str(instr, 0)?;
            let value = current_frame(thread).get_local(name).unwrap_or(Object::Nil);
            thread.stack.push(value)?;
            advance(thread)
        }

        Action::SetLocal => {
            let name = param_str(instr, 0)?.to_string();
            let value = thread.stack.pop()?;
            current_frame(thread).set_local(&name, value);
            advance(thread)
        }

        Action::GetConstant => {
            let name = param_str(instr, 0)?;
            match lookup_constant(thread, name) {
                Some(value) => {
                    thread.stack.push(value)?;
                    advance(thread)
                }
                None => Ok(Return(Object::Error(Rc::new(name_error(thread.current_line, name))))),
            }
        }

        Action::SetConstant => {
            let name = param_str(instr, 0)?.to_string();
            let value = thread.stack.pop()?;
            let self_obj = current_frame(thread).self_object.clone();
            let class = self_obj.class(&thread.vm.registry);
            class.borrow_mut().constants.insert(name, value);
            advance(thread)
        }

        Action::Jump => {
            let target = param_offset(instr, 0)?;
            current_frame(thread).pc = target;
            Ok(Continue)
        }

        Action::BranchUnless => {
            let target = param_offset(instr, 0)?;
            let cond = thread.stack.pop()?;
            if cond.is_truthy() {
                advance(thread)
            } else {
                current_frame(thread).pc = target;
                Ok(Continue)
            }
        }

        Action::BranchIf => {
            let target = param_offset(instr, 0)?;
            let cond = thread.stack.pop()?;
            if cond.is_truthy() {
                current_frame(thread).pc = target;
                Ok(Continue)
            } else {
                advance(thread)
            }
        }

        Action::Send => {
            let method = param_str(instr, 0)?.to_string();
            let argc = param_int(instr, 1)? as usize;
            let mut args = Vec::with_capacity(argc);
            for _ in 0..argc {
                args.push(thread.stack.pop()?);
            }
            args.reverse();
            let receiver = thread.stack.pop()?;
            let block = thread.pending_block.take();
            let result = send_method(thread, receiver, &method, &args, block)?;
            if result.is_error() {
                return Ok(Return(result));
            }
            thread.stack.push(result)?;
            advance(thread)
        }

        Action::SendBlock => {
            let nested = instr
                .nested
                .clone()
                .ok_or_else(|| VmError::internal("SendBlock instruction missing its nested block body"))?;
            let frame = current_frame(thread);
            // Chain the current frame's own locals onto its own environment
            // (if it is itself a block frame), so a block nested inside
            // another block can still reach every enclosing scope, not just
            // its immediate parent.
            let mut environment = vec![Rc::clone(&frame.locals)];
            environment.extend(frame.environment.iter().cloned());
            let block = BlockObj::new(nested, environment, frame.self_object.clone());
            thread.pending_block = Some(Rc::new(block));
            advance(thread)
        }

        Action::YieldBlock => {
            let argc = param_int(instr, 0)? as usize;
            let mut args = Vec::with_capacity(argc);
            for _ in 0..argc {
                args.push(thread.stack.pop()?);
            }
            args.reverse();
            let block = current_frame(thread).get_local("__block__");
            let result = match block {
                Some(Object::Block(block)) => thread.yield_block(block.as_ref(), &args)?,
                _ => Object::error(ErrorKind::ArgumentError, thread.current_line, "no block given (yield)"),
            };
            if result.is_error() {
                return Ok(Return(result));
            }
            thread.stack.push(result)?;
            advance(thread)
        }

        Action::Return => {
            let value = thread.stack.pop()?;
            Ok(Return(value))
        }

        Action::LeaveBlock => Ok(Return(Object::Nil)),

        Action::DefineMethod => {
            let name = param_str(instr, 0)?.to_string();
            let is_class_method = matches!(instr.params.get(1), Some(Param::Bool(true)));
            let body = instr
                .nested
                .clone()
                .ok_or_else(|| VmError::internal("DefineMethod instruction missing its nested body"))?;
            let self_obj = current_frame(thread).self_object.clone();
            let class = match &self_obj {
                Object::Class(c) => Rc::clone(c),
                other => other.class(&thread.vm.registry),
            };
            {
                let mut class = class.borrow_mut();
                let table = if is_class_method {
                    &mut class.class_methods
                } else {
                    &mut class.instance_methods
                };
                table.insert(name, MethodEntry::UserDefined(body));
            }
            thread.stack.push(Object::Nil)?;
            advance(thread)
        }

        Action::DefineClass => {
            let name = param_str(instr, 0)?.to_string();
            let has_superclass = matches!(instr.params.get(1), Some(Param::Bool(true)));
            let body = instr
                .nested
                .clone()
                .ok_or_else(|| VmError::internal("DefineClass instruction missing its nested body"))?;

            let superclass = if has_superclass {
                match thread.stack.pop()? {
                    Object::Class(c) => Some(c),
                    other => {
                        let received = other.class(&thread.vm.registry).borrow().name.clone();
                        let err = type_error(thread.current_line, "Class", &received);
                        return Ok(Return(Object::Error(Rc::new(err))));
                    }
                }
            } else {
                None
            };

            let class = match superclass {
                Some(sc) => thread.vm.registry.initialize_subclass(&name, sc),
                None => thread.vm.registry.initialize_class(&name),
            };
            let class_obj = Object::Class(Rc::clone(&class));

            let frame = CallFrame::method_frame(body, class_obj.clone(), new_locals());
            thread.frames.push(frame)?;
            thread.vm.metrics.record_frame_push();
            let body_result = thread.run_top_frame()?;
            thread.frames.pop()?;
            thread.vm.metrics.record_frame_pop();
            if body_result.is_error() {
                return Ok(Return(body_result));
            }

            thread.stack.push(class_obj)?;
            advance(thread)
        }

        Action::Nop => advance(thread),
    }
}

fn current_frame(thread: &mut Thread) -> &mut CallFrame {
    thread.frames.top_mut().expect("dispatch called with no active frame")
}

fn advance(thread: &mut Thread) -> VmResult<FrameExitOrContinue> {
    current_frame(thread).pc += 1;
    Ok(FrameExitOrContinue::Continue)
}

fn literal(param: Option<&Param>) -> Object {
    match param {
        Some(Param::Int(n)) => Object::int(*n),
        Some(Param::Float(f)) => Object::float(*f),
        Some(Param::Str(s)) => Object::string(s.clone()),
        Some(Param::Bool(b)) => Object::bool(*b),
        Some(Param::Offset(_)) | Some(Param::None) | None => Object::Nil,
    }
}

fn param_str(instr: &Instruction, index: usize) -> VmResult<&str> {
    instr
        .params
        .get(index)
        .and_then(Param::as_str)
        .ok_or_else(|| VmError::internal(format!("{:?} missing string param {index}", instr.action)))
}

fn param_int(instr: &Instruction, index: usize) -> VmResult<i64> {
    instr
        .params
        .get(index)
        .and_then(Param::as_int)
        .ok_or_else(|| VmError::internal(format!("{:?} missing integer param {index}", instr.action)))
}

fn param_offset(instr: &Instruction, index: usize) -> VmResult<usize> {
    instr
        .params
        .get(index)
        .and_then(Param::as_offset)
        .ok_or_else(|| VmError::internal(format!("{:?} missing jump offset param {index}", instr.action)))
}

/// Walks the current `self`'s class chain for a constant, falling back to
/// treating `name` as a top-level class reference (so `Integer`, `Float`,
/// and user-defined class names resolve the same way a bare constant
/// reference to a class does).
fn lookup_constant(thread: &mut Thread, name: &str) -> Option<Object> {
    let self_obj = current_frame(thread).self_object.clone();
    let mut current = Some(self_obj.class(&thread.vm.registry));
    while let Some(class) = current {
        if let Some(value) = class.borrow().constants.get(name) {
            return Some(value.clone());
        }
        current = class.borrow().superclass.clone();
    }
    thread.vm.registry.top_level_class(name).ok().map(Object::Class)
}
