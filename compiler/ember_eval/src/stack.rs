//! Native stack headroom for the recursive evaluator.
//!
//! `eval` recurses once per nested expression and `call_function` once per
//! Ember call, so deep programs can exhaust the thread's stack long before
//! the interpreter's call-depth limit trips.

/// Bytes that must remain free before evaluating the next expression.
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 128 * 1024;

/// Size of each freshly allocated stack segment.
#[cfg(not(target_arch = "wasm32"))]
const SEGMENT: usize = 1024 * 1024;

/// Run `eval` on a new stack segment if fewer than `RED_ZONE` bytes remain.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(eval: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT, eval)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(eval: impl FnOnce() -> R) -> R {
    eval()
}
