//! Interrupt-shared calibration state
//!
//! `offset`, `lock` and the last accepted trigger time are packed into a
//! single 64-bit atomic so a reader can never see a torn pair:
//!
//! ```text
//!  63        49  48   47           32 31                     0
//! ┌───────────┬────┬───────────────┬─────────────────────────┐
//! │  unused   │lock│ offset (i16)  │  last accepted (ms)     │
//! └───────────┴────┴───────────────┴─────────────────────────┘
//! ```
//!
//! On targets without native 64-bit atomics (thumbv6m) `portable-atomic`
//! implements the word with a critical section.

use portable_atomic::{AtomicU64, Ordering};

const OFFSET_SHIFT: u32 = 32;
const LOCK_BIT: u64 = 1 << 48;

/// Consistent view of the calibration fields
///
/// `lock` is true exactly when `offset` is non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationSnapshot {
    offset: i16,
    lock: bool,
}

impl CalibrationSnapshot {
    /// Uncalibrated state at boot
    pub const NEUTRAL: Self = Self {
        offset: 0,
        lock: false,
    };

    /// Snapshot for a given offset, with the matching lock flag
    pub const fn with_offset(offset: i16) -> Self {
        Self {
            offset,
            lock: offset != 0,
        }
    }

    /// Temperature offset in degrees Celsius
    pub const fn offset(&self) -> i16 {
        self.offset
    }

    /// Whether the humidity feature is pinned to its training mean
    pub const fn lock(&self) -> bool {
        self.lock
    }
}

/// Decoded contents of the atomic word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Word {
    pub last_accepted_ms: u32,
    pub snapshot: CalibrationSnapshot,
}

impl Word {
    pub(crate) const INITIAL: Self = Self {
        last_accepted_ms: 0,
        snapshot: CalibrationSnapshot::NEUTRAL,
    };

    pub(crate) const fn pack(self) -> u64 {
        let mut bits = self.last_accepted_ms as u64;
        bits |= (self.snapshot.offset as u16 as u64) << OFFSET_SHIFT;
        if self.snapshot.lock {
            bits |= LOCK_BIT;
        }
        bits
    }

    pub(crate) const fn unpack(bits: u64) -> Self {
        let offset = (bits >> OFFSET_SHIFT) as u16 as i16;
        Self {
            last_accepted_ms: bits as u32,
            snapshot: CalibrationSnapshot {
                offset,
                lock: bits & LOCK_BIT != 0,
            },
        }
    }
}

/// Process-wide calibration state
///
/// Written only through [`ButtonDebouncer`](super::ButtonDebouncer),
/// read by the perception loop through [`snapshot`](Self::snapshot).
/// Intended to live in a `static`.
pub struct CalibrationState {
    word: AtomicU64,
}

impl Default for CalibrationState {
    fn default() -> Self {
        Self::new()
    }
}

impl CalibrationState {
    /// Create the boot state: offset 0, unlocked, last trigger at 0 ms
    pub const fn new() -> Self {
        Self {
            word: AtomicU64::new(Word::INITIAL.pack()),
        }
    }

    /// Read offset and lock as one consistent pair
    pub fn snapshot(&self) -> CalibrationSnapshot {
        self.load().snapshot
    }

    /// Time of the last accepted trigger (ms since boot)
    pub fn last_accepted_ms(&self) -> u32 {
        self.load().last_accepted_ms
    }

    pub(crate) fn load(&self) -> Word {
        Word::unpack(self.word.load(Ordering::Acquire))
    }

    /// Atomically apply `f` to the current word
    ///
    /// `f` may run more than once if another context writes concurrently.
    /// Returns the committed word, or the observed word if `f` declined.
    pub(crate) fn update<F>(&self, mut f: F) -> Result<Word, Word>
    where
        F: FnMut(Word) -> Option<Word>,
    {
        let mut committed = None;
        let result = self
            .word
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                let next = f(Word::unpack(bits))?;
                committed = Some(next);
                Some(next.pack())
            });

        match (result, committed) {
            (Ok(_), Some(next)) => Ok(next),
            (Ok(bits), None) | (Err(bits), _) => Err(Word::unpack(bits)),
        }
    }
}
