//! Whole-program scenarios through the public embedding API (SPEC_FULL.md
//! §6, §8, §10): the concrete Float examples from §8, a closure-capture
//! test for invariant 6, and a multi-thread registry-sharing test.

use std::rc::Rc;

use ember_vm::frame::new_locals;
use ember_vm::object::BlockObj;
use ember_vm::{Action, Instruction, InstructionSet, InstructionSetKind, Object, Param, Vm};

fn send(method: &str, argc: i64, line: usize) -> Instruction {
    Instruction::new(Action::Send, vec![Param::Str(method.to_string()), Param::Int(argc)], line)
}

fn put(param: Param, line: usize) -> Instruction {
    Instruction::new(Action::PutObject, vec![param], line)
}

fn run(instructions: Vec<Instruction>) -> Object {
    let vm = Vm::new_vm();
    let root = Rc::new(InstructionSet::new("main", InstructionSetKind::TopLevel, instructions));
    vm.execute(root)
}

fn as_float(obj: &Object) -> f64 {
    match obj {
        Object::Float(f) => *f,
        other => panic!("expected Float, got {other:?}"),
    }
}

#[test]
fn float_add_coerces_integer_argument() {
    let result = run(vec![
        put(Param::Float(1.1), 1),
        put(Param::Int(2), 1),
        send("+", 1, 1),
        Instruction::simple(Action::Return, 1),
    ]);
    assert!((as_float(&result) - 3.1).abs() < 1e-9);
}

#[test]
fn float_modulo_matches_divisor_sign_convention() {
    let result = run(vec![
        put(Param::Float(5.5), 1),
        put(Param::Int(2), 1),
        send("%", 1, 1),
        Instruction::simple(Action::Return, 1),
    ]);
    assert!((as_float(&result) - 1.5).abs() < 1e-9);
}

#[test]
fn float_division_by_zero_is_zero_division_error() {
    let result = run(vec![
        put(Param::Float(7.5), 1),
        put(Param::Int(0), 1),
        send("/", 1, 1),
        Instruction::simple(Action::Return, 1),
    ]);
    match result {
        Object::Error(e) => assert_eq!(e.kind, ember_vm::object::ErrorKind::ZeroDivisionError),
        other => panic!("expected a ZeroDivisionError, got {other:?}"),
    }
}

#[test]
fn float_strict_comparison_rejects_integer_argument() {
    let result = run(vec![
        put(Param::Float(1.0), 1),
        put(Param::Int(1), 1),
        send(">", 1, 1),
        Instruction::simple(Action::Return, 1),
    ]);
    match result {
        Object::Error(e) => assert_eq!(e.kind, ember_vm::object::ErrorKind::TypeError),
        other => panic!("expected a TypeError, got {other:?}"),
    }
}

#[test]
fn round_rounds_half_away_from_zero() {
    let positive = run(vec![
        put(Param::Float(1.115), 1),
        put(Param::Int(2), 1),
        send("round", 1, 1),
        Instruction::simple(Action::Return, 1),
    ]);
    assert!((as_float(&positive) - 1.12).abs() < 1e-9);

    let negative = run(vec![
        put(Param::Float(-1.115), 1),
        put(Param::Int(2), 1),
        send("round", 1, 1),
        Instruction::simple(Action::Return, 1),
    ]);
    assert!((as_float(&negative) - -1.12).abs() < 1e-9);
}

#[test]
fn float_dot_new_is_no_method_error() {
    let result = run(vec![
        Instruction::new(Action::GetConstant, vec![Param::Str("Float".to_string())], 1),
        send("new", 0, 1),
        Instruction::simple(Action::Return, 1),
    ]);
    match result {
        Object::Error(e) => assert_eq!(e.kind, ember_vm::object::ErrorKind::NoMethodError),
        other => panic!("expected a NoMethodError, got {other:?}"),
    }
}

#[test]
fn float_to_i_truncates_toward_zero() {
    let result = run(vec![
        put(Param::Float(100.1), 1),
        send("to_i", 0, 1),
        Instruction::simple(Action::Return, 1),
    ]);
    match result {
        Object::Integer(i) => assert_eq!(i.to_string(), "100"),
        other => panic!("expected an Integer, got {other:?}"),
    }
}

#[test]
fn zero_predicate_treats_signed_zero_as_zero_and_nan_as_not() {
    let positive_zero = run(vec![put(Param::Float(0.0), 1), send("zero?", 0, 1), Instruction::simple(Action::Return, 1)]);
    assert!(matches!(positive_zero, Object::Boolean(true)));

    let negative_zero = run(vec![put(Param::Float(-0.0), 1), send("zero?", 0, 1), Instruction::simple(Action::Return, 1)]);
    assert!(matches!(negative_zero, Object::Boolean(true)));

    let nan = run(vec![put(Param::Float(f64::NAN), 1), send("zero?", 0, 1), Instruction::simple(Action::Return, 1)]);
    assert!(matches!(nan, Object::Boolean(false)));
}

/// Invariant 6: a block frame whose defining frame has returned still reads
/// and writes its captured locals. Exercises `Thread::yield_block` directly
/// against an environment the test holds independently of any call frame,
/// which is the observable consequence of a frame dropping while a live
/// block still references its locals.
#[test]
fn block_mutates_captured_locals_after_defining_frame_is_gone() {
    let vm = Vm::new_vm();
    let mut thread = vm.spawn_thread();

    let environment = new_locals();
    environment.borrow_mut().insert("x".to_string(), Object::int(0i64));

    let body = Rc::new(InstructionSet::new(
        "increment",
        InstructionSetKind::Block,
        vec![
            Instruction::new(Action::GetLocal, vec![Param::Str("x".to_string())], 1),
            put(Param::Int(1), 1),
            send("+", 1, 1),
            Instruction::simple(Action::Dup, 1),
            Instruction::new(Action::SetLocal, vec![Param::Str("x".to_string())], 1),
            Instruction::simple(Action::Return, 1),
        ],
    ));
    let block = BlockObj::new(body, vec![Rc::clone(&environment)], Object::Nil);

    let first = thread.yield_block(&block, &[]).unwrap();
    let second = thread.yield_block(&block, &[]).unwrap();

    match (first, second) {
        (Object::Integer(a), Object::Integer(b)) => {
            assert_eq!(a.to_string(), "1");
            assert_eq!(b.to_string(), "2");
        }
        other => panic!("expected two Integers, got {other:?}"),
    }
    assert_eq!(environment.borrow().get("x").unwrap().inspect(), "2");
}

/// A block created from inside another block frame (via `SendBlock`) must
/// still reach the grandparent scope's locals, not just its immediate
/// parent's — SPEC_FULL.md's environment pointer chain, invariant 6's
/// closure capture "for any depth of nesting".
#[test]
fn block_nested_inside_another_block_reads_the_grandparent_scope() {
    use ember_vm::object::{Class, Instance, MethodEntry};

    let vm = Vm::new_vm();
    let mut thread = vm.spawn_thread();

    let class = Class::new("Runner");
    let yield_it_body = Rc::new(InstructionSet::new(
        "yield_it",
        InstructionSetKind::Method,
        vec![
            Instruction::new(Action::YieldBlock, vec![Param::Int(0)], 1),
            Instruction::simple(Action::Return, 1),
        ],
    ));
    class
        .borrow_mut()
        .instance_methods
        .insert("yield_it".to_string(), MethodEntry::UserDefined(yield_it_body));
    let receiver = Object::Instance(Instance::new(Rc::clone(&class)));

    let inner_body = Rc::new(InstructionSet::new(
        "inner",
        InstructionSetKind::Block,
        vec![
            Instruction::new(Action::GetLocal, vec![Param::Str("x".to_string())], 1),
            Instruction::simple(Action::Return, 1),
        ],
    ));

    let outer_body = Rc::new(InstructionSet::new(
        "outer",
        InstructionSetKind::Block,
        vec![
            Instruction::with_nested(Action::SendBlock, vec![], 1, Rc::clone(&inner_body)),
            Instruction::simple(Action::PutSelf, 1),
            send("yield_it", 0, 1),
            Instruction::simple(Action::Return, 1),
        ],
    ));

    let outer_locals = new_locals();
    outer_locals.borrow_mut().insert("x".to_string(), Object::int(1i64));
    let outer_block = BlockObj::new(outer_body, vec![Rc::clone(&outer_locals)], receiver);

    let result = thread.yield_block(&outer_block, &[]).unwrap();
    match result {
        Object::Integer(n) => assert_eq!(n.to_string(), "1"),
        other => panic!("expected the inner block to see the grandparent's x, got {other:?}"),
    }
}

/// Two threads spawned from the same `Vm` see the same class registry
/// without redefinition races (SPEC_FULL.md §5, §10).
#[test]
fn threads_share_the_class_registry() {
    let vm = Vm::new_vm();
    let mut thread_a = vm.spawn_thread();
    let mut thread_b = vm.spawn_thread();

    let root = Rc::new(InstructionSet::new(
        "main",
        InstructionSetKind::TopLevel,
        vec![
            Instruction::new(Action::GetConstant, vec![Param::Str("Integer".to_string())], 1),
            Instruction::simple(Action::Return, 1),
        ],
    ));

    let from_a = thread_a.run_instruction_set(Rc::clone(&root)).unwrap();
    let from_b = thread_b.run_instruction_set(Rc::clone(&root)).unwrap();

    match (from_a, from_b) {
        (Object::Class(a), Object::Class(b)) => assert!(Rc::ptr_eq(&a, &b)),
        other => panic!("expected two Class objects, got {other:?}"),
    }
}
