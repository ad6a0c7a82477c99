//! Lock-free primitives for real-time audio.

use atomic_float::AtomicF64;
use core::sync::atomic::{AtomicBool, AtomicI64, AtomicU8, Ordering};

use crate::transport::Position;

/// Cache-line aligned atomic bool.
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicFlag {
    value: AtomicBool,
}

impl AtomicFlag {
    pub fn new(value: bool) -> Self {
        Self {
            value: AtomicBool::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> bool {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: bool) {
        self.value.store(value, Ordering::Release);
    }

    #[inline]
    pub fn swap(&self, value: bool) -> bool {
        self.value.swap(value, Ordering::AcqRel)
    }
}

impl Default for AtomicFlag {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Cache-line aligned atomic f64.
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicDouble {
    value: AtomicF64,
}

impl AtomicDouble {
    pub fn new(value: f64) -> Self {
        Self {
            value: AtomicF64::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> f64 {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: f64) {
        self.value.store(value, Ordering::Release);
    }
}

impl Default for AtomicDouble {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Cache-line aligned atomic frame counter.
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicFrames {
    value: AtomicI64,
}

impl AtomicFrames {
    pub fn new(value: i64) -> Self {
        Self {
            value: AtomicI64::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: i64) {
        self.value.store(value, Ordering::Release);
    }
}

impl Default for AtomicFrames {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Atomic storage for a small `Copy` enum encoded as `u8`.
///
/// Transitions go through `compare_exchange` so a control-thread request can
/// never overwrite a value the audio thread just committed.
#[derive(Debug)]
pub struct AtomicState {
    value: AtomicU8,
}

impl AtomicState {
    pub fn new(value: u8) -> Self {
        Self {
            value: AtomicU8::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> u8 {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: u8) {
        self.value.store(value, Ordering::Release);
    }

    /// Store `new` only if the current value is still `current`.
    #[inline]
    pub fn transition(&self, current: u8, new: u8) -> bool {
        self.value
            .compare_exchange(current, new, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// A [`Position`] stored as two atomics.
///
/// Each position has a single writer at a time, so a reader may only ever see
/// a torn pair while that writer is mid-store. Frames are stored last.
#[derive(Debug, Default)]
pub struct AtomicPosition {
    ticks: AtomicDouble,
    frames: AtomicFrames,
}

impl AtomicPosition {
    pub fn new(pos: Position) -> Self {
        Self {
            ticks: AtomicDouble::new(pos.ticks()),
            frames: AtomicFrames::new(pos.frames()),
        }
    }

    #[inline]
    pub fn load(&self) -> Position {
        Position::from_parts(self.ticks.get(), self.frames.get())
    }

    #[inline]
    pub fn store(&self, pos: Position) {
        self.ticks.set(pos.ticks());
        self.frames.set(pos.frames());
    }
}
