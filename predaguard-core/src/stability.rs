//! Hysteresis filter for the displayed state
//!
//! The committed indicator changes only after `threshold` consecutive
//! predictions that differ from it. The counter tracks "differs from the
//! committed state", not "repeats the same candidate", so a prediction
//! alternating between two non-committed classes still accumulates, and
//! the commit goes to whichever class arrives on the threshold cycle.
//!
//! ```text
//!   p == committed        -> pending = 0
//!   p != committed        -> pending += 1
//!   pending == threshold  -> committed = p, pending = 0, emit p
//! ```
//!
//! Before the first commit the committed state is unset, so every
//! prediction differs from it.

use crate::traits::Indicator;

/// Consecutive differing predictions required to switch by default
pub const DEFAULT_THRESHOLD: u8 = 3;

/// Single-counter hysteresis filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StabilityFilter {
    committed: Option<Indicator>,
    pending: u8,
    threshold: u8,
}

impl Default for StabilityFilter {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl StabilityFilter {
    /// Create an unset filter; a threshold of 0 is treated as 1
    pub const fn new(threshold: u8) -> Self {
        Self {
            committed: None,
            pending: 0,
            threshold: if threshold == 0 { 1 } else { threshold },
        }
    }

    /// Feed one prediction
    ///
    /// Returns the newly committed indicator on the cycle the commit
    /// happens, `None` otherwise.
    pub fn observe(&mut self, prediction: Indicator) -> Option<Indicator> {
        if self.committed == Some(prediction) {
            self.pending = 0;
            return None;
        }

        self.pending += 1;
        if self.pending >= self.threshold {
            self.committed = Some(prediction);
            self.pending = 0;
            return Some(prediction);
        }
        None
    }

    /// Indicator currently on display, `None` before the first commit
    ///
    /// Safe to re-drive to the outputs at any time.
    pub fn committed(&self) -> Option<Indicator> {
        self.committed
    }

    /// Differing predictions seen since the last match or commit
    pub fn pending(&self) -> u8 {
        self.pending
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Indicator::*;

    fn feed(filter: &mut StabilityFilter, predictions: &[Indicator]) -> [Option<Indicator>; 8] {
        let mut emitted = [None; 8];
        for (slot, &p) in emitted.iter_mut().zip(predictions) {
            *slot = filter.observe(p);
        }
        emitted
    }

    #[test]
    fn test_first_commit_from_unset() {
        let mut filter = StabilityFilter::default();
        let emitted = feed(&mut filter, &[Idle, Idle, Idle]);
        assert_eq!(emitted[..3], [None, None, Some(Idle)]);
        assert_eq!(filter.committed(), Some(Idle));
        assert_eq!(filter.pending(), 0);
    }

    #[test]
    fn test_steady_state_emits_nothing() {
        let mut filter = StabilityFilter::default();
        feed(&mut filter, &[Idle, Idle, Idle]);
        let emitted = feed(&mut filter, &[Idle, Idle, Idle, Idle]);
        assert!(emitted.iter().all(Option::is_none));
        assert_eq!(filter.committed(), Some(Idle));
    }

    #[test]
    fn test_switch_after_three_differing() {
        let mut filter = StabilityFilter::default();
        feed(&mut filter, &[Idle, Idle, Idle]);
        let emitted = feed(&mut filter, &[Alert, Alert, Alert]);
        assert_eq!(emitted[..3], [None, None, Some(Alert)]);
        assert_eq!(filter.committed(), Some(Alert));
    }

    #[test]
    fn test_matching_prediction_resets_counter() {
        let mut filter = StabilityFilter::default();
        feed(&mut filter, &[Idle, Idle, Idle]);
        feed(&mut filter, &[Alert, Alert, Idle, Alert, Alert]);
        assert_eq!(filter.committed(), Some(Idle));
        assert_eq!(filter.pending(), 2);
    }

    #[test]
    fn test_oscillating_non_committed_classes_commit() {
        let mut filter = StabilityFilter::default();
        feed(&mut filter, &[Idle, Idle, Idle]);
        // Active and Alert never repeat, yet the counter still reaches 3
        let emitted = feed(&mut filter, &[Active, Alert, Active]);
        assert_eq!(emitted[..3], [None, None, Some(Active)]);
        assert_eq!(filter.committed(), Some(Active));
    }

    #[test]
    fn test_unset_commits_third_prediction_whatever_it_is() {
        let mut filter = StabilityFilter::default();
        let emitted = feed(&mut filter, &[Idle, Active, Alert]);
        assert_eq!(emitted[2], Some(Alert));
    }

    #[test]
    fn test_unset_oscillation_0_1_0_commits_0() {
        let mut filter = StabilityFilter::default();
        // Every prediction differs from "unset", so none resets the counter
        let emitted = feed(&mut filter, &[Idle, Active, Idle]);
        assert_eq!(emitted[..3], [None, None, Some(Idle)]);
        assert_eq!(filter.committed(), Some(Idle));
        assert_eq!(filter.pending(), 0);
    }

    #[test]
    fn test_custom_threshold() {
        let mut filter = StabilityFilter::new(1);
        assert_eq!(filter.observe(Active), Some(Active));
        assert_eq!(filter.observe(Alert), Some(Alert));

        let mut filter = StabilityFilter::new(0);
        assert_eq!(filter.threshold(), 1);
        assert_eq!(filter.observe(Idle), Some(Idle));
    }

    #[test]
    fn test_committed_is_read_only() {
        let mut filter = StabilityFilter::default();
        feed(&mut filter, &[Alert, Alert, Alert, Idle]);
        let before = filter;
        assert_eq!(filter.committed(), Some(Alert));
        assert_eq!(filter, before);
    }
}
