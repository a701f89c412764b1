//! The embedding surface (SPEC_FULL.md §3 "VM", §6): the owner of the class
//! registry and the ambient limits/metrics every spawned thread shares.
//!
//! Grounded on the reference codebase's `ExecutionEngine`, whose state
//! (jump table, limits, interop service) is likewise constructed once and
//! shared by reference across everything that runs against it — but this
//! core has no interop host or invocation stack of its own at this layer;
//! those live per-[`crate::thread::Thread`].

use std::rc::Rc;

use crate::bootstrap::bootstrap_registry;
use crate::instruction_set::InstructionSet;
use crate::limits::VmLimits;
use crate::metrics::{MetricsSnapshot, VmMetrics};
use crate::object::error_object::ErrorKind;
use crate::object::{ClassRef, Instance, Object};
use crate::registry::ClassRegistry;
use crate::source_line::SourceLine;
use crate::thread::Thread;

/// Owns the class registry and the resource ceilings/counters every thread
/// spawned from it shares (SPEC_FULL.md §5: "the class registry is shared;
/// the operand stack and call-frame stack are per-thread").
pub struct Vm {
    pub registry: ClassRegistry,
    pub limits: VmLimits,
    pub metrics: VmMetrics,
}

impl Vm {
    /// `new_vm()` (SPEC_FULL.md §6): builds a registry with every built-in
    /// class installed and ready to receive `Send`s.
    pub fn new_vm() -> Rc<Self> {
        Self::with_limits(VmLimits::default())
    }

    pub fn with_limits(limits: VmLimits) -> Rc<Self> {
        let registry = ClassRegistry::new();
        bootstrap_registry(&registry);
        log::debug!("vm bootstrapped: {} builtin classes", registry.all_class_names().len());
        Rc::new(Self {
            registry,
            limits,
            metrics: VmMetrics::new(),
        })
    }

    /// `spawn_thread()` (SPEC_FULL.md §6): a fresh operand stack and
    /// call-frame stack over the same shared registry.
    pub fn spawn_thread(self: &Rc<Self>) -> Thread {
        Thread::new(Rc::clone(self))
    }

    /// `execute(instructionSet)` (SPEC_FULL.md §6): convenience entry point
    /// that spawns one thread, runs the instruction set to completion, and
    /// returns its result (or a fault object if the host-level engine
    /// itself failed rather than the guest program).
    pub fn execute(self: &Rc<Self>, root: Rc<InstructionSet>) -> Object {
        let mut thread = self.spawn_thread();
        match thread.run_instruction_set(root) {
            Ok(value) => value,
            Err(e) => self.fault_object(0, &e.to_string()),
        }
    }

    /// `top_level_binding()` (SPEC_FULL.md §6): the receiver every top-level
    /// instruction set executes against.
    pub fn top_level_binding(self: &Rc<Self>) -> Object {
        Object::Instance(Instance::new(self.top_level_class()))
    }

    /// The class backing the implicit top-level `self` object.
    pub fn top_level_class(&self) -> ClassRef {
        self.registry
            .top_level_class("Object")
            .unwrap_or_else(|_| panic!("Object class missing from registry; bootstrap did not run"))
    }

    /// Wraps a host-level fault as an `InternalError` object so a caller
    /// failure never has to distinguish "the guest raised an error" from
    /// "the engine itself could not continue" at the call site (SPEC_FULL.md
    /// §7: host faults and language-level errors share the `Object::Error`
    /// representation at observation time, even though they are raised
    /// through different paths internally).
    pub fn fault_object(&self, line: SourceLine, message: &str) -> Object {
        log::error!("engine fault at line {line}: {message}");
        Object::error(ErrorKind::InternalError, line, message.to_string())
    }

    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// `teardown()` (SPEC_FULL.md §6): releases nothing this core doesn't
    /// already drop on scope exit — present for embedder API symmetry and
    /// as the hook a future interop host's cleanup would attach to.
    pub fn teardown(self: Rc<Self>) {
        log::debug!("vm teardown");
    }
}
