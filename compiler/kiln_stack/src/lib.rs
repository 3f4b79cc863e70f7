//! Stack safety for deep recursion.
//!
//! The parser and the semantic checker recurse once per nesting level of the
//! source. Wrapping each recursive step in [`ensure_sufficient_stack`] lets
//! them handle generated sources with thousands of nested expressions or
//! blocks without overflowing the thread's stack.
//!
//! - **Red zone**: 100KB. If less than this remains, the stack grows.
//! - **Growth size**: 1MB per growth.

const RED_ZONE: usize = 100 * 1024;

const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
