//! Embedder-tunable resource ceilings (SPEC_FULL.md §4.9). Enforced as
//! host-level faults, never as language-level error objects, since
//! exceeding one means the embedder's resource budget was exceeded rather
//! than a guest-recoverable condition.

/// Default operand-stack capacity: generous enough for realistic recursion
/// without a guest program being able to exhaust host memory silently.
pub const DEFAULT_STACK_CAPACITY: usize = 2048;

/// Default maximum call-frame depth.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 512;

#[derive(Debug, Clone, Copy)]
pub struct VmLimits {
    pub stack_capacity: usize,
    pub max_call_depth: usize,
    pub max_instructions: Option<u64>,
}

impl Default for VmLimits {
    fn default() -> Self {
        Self {
            stack_capacity: DEFAULT_STACK_CAPACITY,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            max_instructions: None,
        }
    }
}
