//! Halt line shared between a core's control logic and the engine.
//!
//! A core halts when its own control module (e.g. the issue unit) executes a halt
//! condition. The module holds one clone of the line and raises it; the engine holds
//! another and only reads it, except for the serial executor which forces it when a
//! core reaches the stop cycle. Both clones are touched only by the worker thread that
//! owns the core, so relaxed ordering is sufficient; the cycle barrier publishes the
//! value to every other thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared, clonable halted flag for one core.
#[derive(Clone, Debug, Default)]
pub struct HaltLine {
    halted: Arc<AtomicBool>,
}

impl HaltLine {
    /// Creates a lowered (running) halt line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the line; the core is halted from now until the next frame reset.
    #[inline]
    pub fn raise(&self) {
        self.halted.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once the line has been raised.
    #[inline]
    pub fn is_raised(&self) -> bool {
        self.halted.load(Ordering::Relaxed)
    }

    /// Lowers the line for a fresh frame.
    pub fn clear(&self) {
        self.halted.store(false, Ordering::Relaxed);
    }
}
