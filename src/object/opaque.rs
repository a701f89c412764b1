//! Host-opaque objects: a raw host pointer wrapped for FFI (SPEC_FULL.md
//! §3, §5 "Host-opaque objects MAY outlive the VM if the embedder retains
//! them"). Unsafe by construction; gated behind explicit construction so a
//! guest program can never conjure one itself — only an embedder handing
//! one in through the embedding API can.

use std::fmt;
use std::rc::Rc;

/// A type-erased host value, identified by a tag the embedder chooses.
pub struct OpaqueObj {
    pub tag: &'static str,
    pub ptr: *mut std::ffi::c_void,
    /// Keeps the pointee alive for as long as any `Object::Opaque` handle
    /// to it exists. The embedder is responsible for the pointer's
    /// validity; the VM only manages this handle's lifetime.
    _owner: Rc<dyn std::any::Any>,
}

impl OpaqueObj {
    /// # Safety
    /// `ptr` must remain valid for as long as `owner` is alive, and must be
    /// a pointer into (or derived from) `owner`'s allocation.
    pub unsafe fn new(tag: &'static str, ptr: *mut std::ffi::c_void, owner: Rc<dyn std::any::Any>) -> Self {
        Self { tag, ptr, _owner: owner }
    }
}

impl fmt::Debug for OpaqueObj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpaqueObj").field("tag", &self.tag).finish()
    }
}

impl Clone for OpaqueObj {
    fn clone(&self) -> Self {
        Self {
            tag: self.tag,
            ptr: self.ptr,
            _owner: Rc::clone(&self._owner),
        }
    }
}
