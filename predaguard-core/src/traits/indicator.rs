//! Status indicator trait

use crate::NUM_CLASSES;

/// Displayed category, one per classifier output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Indicator {
    /// Baseline conditions (class 0)
    Idle,
    /// Expected activity (class 1)
    Active,
    /// Anomaly or obstruction (class 2)
    Alert,
}

impl Indicator {
    /// All indicators in class-index order
    pub const ALL: [Indicator; NUM_CLASSES] = [Indicator::Idle, Indicator::Active, Indicator::Alert];

    /// Shown once hardware bring-up is done, until the first commit
    pub const BOOT_OK: Indicator = Indicator::Active;

    /// Map a class index to its indicator
    pub fn from_class(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Class index of this indicator
    pub const fn class(&self) -> usize {
        *self as usize
    }

    /// Human-readable label for logs
    pub const fn label(&self) -> &'static str {
        match self {
            Indicator::Idle => "IDLE",
            Indicator::Active => "ACTIVE",
            Indicator::Alert => "ALERT",
        }
    }
}

/// Mutually exclusive indicator lines
///
/// Implementations assert exactly one line per call and explicitly
/// de-assert every other line. Calling twice with the same value is a no-op
/// as far as the outputs are concerned.
pub trait IndicatorOutput {
    /// Error type of the underlying output lines
    type Error;

    /// Assert the line for `indicator`, de-asserting all others
    fn set_indicator(&mut self, indicator: Indicator) -> Result<(), Self::Error>;

    /// De-assert every line
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Currently asserted indicator, if any
    fn active(&self) -> Option<Indicator>;
}
