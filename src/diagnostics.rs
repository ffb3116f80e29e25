//! Scoped suppression of colorimetry diagnostics.
//!
//! The colorimetry solvers report degenerate inputs (zero tristimulus sums,
//! searches pinned to a table edge, and so on) through [`diagnostic!`]. While a
//! [`SuppressionGuard`] is alive on the current thread those reports are
//! dropped and counted instead of reaching the tracing subscriber. Guards nest
//! and are released on every exit path, including `?` returns and unwinding.

use std::cell::Cell;
use std::marker::PhantomData;

/// Tracing target used for colorimetry diagnostics
pub const TARGET: &str = "cct_annotate::colorimetry";

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
    static SWALLOWED: Cell<u64> = const { Cell::new(0) };
}

/// RAII scope that silences colorimetry diagnostics on this thread.
///
/// Not `Send`: the suppression state is thread-local, so the guard must be
/// dropped on the thread that acquired it.
#[must_use = "diagnostics are only suppressed while the guard is alive"]
pub struct SuppressionGuard {
    _thread_bound: PhantomData<*const ()>,
}

impl SuppressionGuard {
    pub fn acquire() -> Self {
        DEPTH.with(|depth| depth.set(depth.get() + 1));
        Self {
            _thread_bound: PhantomData,
        }
    }
}

impl Drop for SuppressionGuard {
    fn drop(&mut self) {
        DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Whether a suppression scope is active on this thread
pub fn is_suppressed() -> bool {
    DEPTH.with(|depth| depth.get() > 0)
}

/// Diagnostics dropped on this thread so far
pub fn swallowed_count() -> u64 {
    SWALLOWED.with(|count| count.get())
}

#[doc(hidden)]
pub fn record_swallowed() {
    SWALLOWED.with(|count| count.set(count.get() + 1));
}

/// Emit a colorimetry diagnostic unless suppressed.
#[macro_export]
macro_rules! diagnostic {
    ($($arg:tt)*) => {
        if $crate::diagnostics::is_suppressed() {
            $crate::diagnostics::record_swallowed();
        } else {
            tracing::warn!(target: $crate::diagnostics::TARGET, $($arg)*);
        }
    };
}
