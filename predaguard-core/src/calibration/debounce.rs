//! Calibration button debouncing
//!
//! Both buttons share one "last accepted" timestamp, so alternating presses
//! across A and B are debounced against each other as well.

use super::state::{CalibrationSnapshot, CalibrationState, Word};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Calibration trigger inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Decreases the offset
    A,
    /// Increases the offset
    B,
}

impl Button {
    /// Signed offset change for one accepted press
    pub const fn delta(&self, step: i16) -> i16 {
        match self {
            Button::A => step.saturating_neg(),
            Button::B => step,
        }
    }
}

/// Debounce and step configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DebounceConfig {
    /// Minimum time between accepted triggers (ms)
    pub window_ms: u32,
    /// Offset change per accepted trigger (°C)
    pub step: i16,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            window_ms: 200,
            step: 5,
        }
    }
}

/// Result of one edge event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerOutcome {
    /// Press accepted; carries the new calibration values
    Accepted(CalibrationSnapshot),
    /// Press discarded as bounce; carries the time since the last accepted press
    Rejected { elapsed_ms: u32 },
}

/// Decide the next word for a press at `now_ms`
///
/// Returns `None` if the press falls inside the debounce window.
fn next_word(current: Word, button: Button, now_ms: u32, config: &DebounceConfig) -> Option<Word> {
    let elapsed = now_ms.wrapping_sub(current.last_accepted_ms);
    if elapsed < config.window_ms {
        return None;
    }

    let offset = current
        .snapshot
        .offset()
        .saturating_add(button.delta(config.step));

    Some(Word {
        last_accepted_ms: now_ms,
        snapshot: CalibrationSnapshot::with_offset(offset),
    })
}

/// Edge-trigger filter feeding [`CalibrationState`]
///
/// Meant to be called from the button interrupt handlers. The check and the
/// update happen in one atomic step, so two handlers racing each other can
/// never both pass the window.
pub struct ButtonDebouncer<'a> {
    state: &'a CalibrationState,
    config: DebounceConfig,
}

impl<'a> ButtonDebouncer<'a> {
    /// Create a debouncer writing into `state`
    pub const fn new(state: &'a CalibrationState, config: DebounceConfig) -> Self {
        Self { state, config }
    }

    /// Get the active configuration
    pub fn config(&self) -> &DebounceConfig {
        &self.config
    }

    /// Handle one falling edge from `button` at `now_ms` (ms since boot)
    pub fn on_edge(&self, button: Button, now_ms: u32) -> TriggerOutcome {
        match self
            .state
            .update(|current| next_word(current, button, now_ms, &self.config))
        {
            Ok(word) => TriggerOutcome::Accepted(word.snapshot),
            Err(current) => TriggerOutcome::Rejected {
                elapsed_ms: now_ms.wrapping_sub(current.last_accepted_ms),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepted_offset(outcome: TriggerOutcome) -> i16 {
        match outcome {
            TriggerOutcome::Accepted(s) => s.offset(),
            TriggerOutcome::Rejected { .. } => panic!("expected accepted press"),
        }
    }

    #[test]
    fn test_same_button_100ms_apart_counts_once() {
        let state = CalibrationState::new();
        let debouncer = ButtonDebouncer::new(&state, DebounceConfig::default());

        assert_eq!(accepted_offset(debouncer.on_edge(Button::B, 1_000)), 5);
        assert_eq!(
            debouncer.on_edge(Button::B, 1_100),
            TriggerOutcome::Rejected { elapsed_ms: 100 }
        );
        assert_eq!(state.snapshot().offset(), 5);
    }

    #[test]
    fn test_same_button_250ms_apart_counts_twice() {
        let state = CalibrationState::new();
        let debouncer = ButtonDebouncer::new(&state, DebounceConfig::default());

        debouncer.on_edge(Button::B, 1_000);
        assert_eq!(accepted_offset(debouncer.on_edge(Button::B, 1_250)), 10);
        assert_eq!(state.snapshot(), CalibrationSnapshot::with_offset(10));
    }

    #[test]
    fn test_window_shared_across_buttons() {
        let state = CalibrationState::new();
        let debouncer = ButtonDebouncer::new(&state, DebounceConfig::default());

        debouncer.on_edge(Button::A, 1_000);
        // B inside A's window is rejected too
        assert!(matches!(
            debouncer.on_edge(Button::B, 1_150),
            TriggerOutcome::Rejected { elapsed_ms: 150 }
        ));
        assert_eq!(state.snapshot().offset(), -5);
    }

    #[test]
    fn test_rejected_press_does_not_extend_window() {
        let state = CalibrationState::new();
        let debouncer = ButtonDebouncer::new(&state, DebounceConfig::default());

        debouncer.on_edge(Button::B, 1_000);
        debouncer.on_edge(Button::B, 1_150); // bounce
        // 200 ms after the accepted press, not after the bounce
        assert_eq!(accepted_offset(debouncer.on_edge(Button::B, 1_200)), 10);
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let state = CalibrationState::new();
        let debouncer = ButtonDebouncer::new(&state, DebounceConfig::default());

        debouncer.on_edge(Button::B, 1_000);
        assert!(matches!(
            debouncer.on_edge(Button::B, 1_199),
            TriggerOutcome::Rejected { .. }
        ));
        assert!(matches!(
            debouncer.on_edge(Button::B, 1_200),
            TriggerOutcome::Accepted(_)
        ));
    }

    #[test]
    fn test_press_right_after_boot_is_rejected() {
        let state = CalibrationState::new();
        let debouncer = ButtonDebouncer::new(&state, DebounceConfig::default());

        assert!(matches!(
            debouncer.on_edge(Button::A, 150),
            TriggerOutcome::Rejected { elapsed_ms: 150 }
        ));
        assert_eq!(state.snapshot(), CalibrationSnapshot::NEUTRAL);
    }

    #[test]
    fn test_lock_released_when_offset_returns_to_zero() {
        let state = CalibrationState::new();
        let debouncer = ButtonDebouncer::new(&state, DebounceConfig::default());

        debouncer.on_edge(Button::B, 1_000);
        assert!(state.snapshot().lock());

        debouncer.on_edge(Button::A, 1_500);
        assert_eq!(state.snapshot(), CalibrationSnapshot::NEUTRAL);
        assert!(!state.snapshot().lock());
    }

    #[test]
    fn test_clock_wraparound() {
        let state = CalibrationState::new();
        let debouncer = ButtonDebouncer::new(&state, DebounceConfig::default());

        debouncer.on_edge(Button::B, u32::MAX - 50);
        // 100 ms later, across the u32 wrap
        assert!(matches!(
            debouncer.on_edge(Button::B, 49),
            TriggerOutcome::Rejected { elapsed_ms: 100 }
        ));
        assert!(matches!(
            debouncer.on_edge(Button::B, 300),
            TriggerOutcome::Accepted(_)
        ));
    }

    #[test]
    fn test_racing_handlers_accept_one_press_per_window() {
        use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
        use std::sync::Barrier;
        use std::thread;

        const WINDOWS: u32 = 200;

        let state = CalibrationState::new();
        let barrier = Barrier::new(2);
        let accepted = AtomicU32::new(0);
        let done = AtomicBool::new(false);

        thread::scope(|s| {
            // Reader: the pair must never be observed torn
            s.spawn(|| {
                while !done.load(Ordering::Relaxed) {
                    let snap = state.snapshot();
                    assert_eq!(snap.lock(), snap.offset() != 0);
                }
            });

            let writers: [_; 2] = [Button::A, Button::B].map(|button| {
                let (state, barrier, accepted) = (&state, &barrier, &accepted);
                s.spawn(move || {
                    let debouncer = ButtonDebouncer::new(state, DebounceConfig::default());
                    for k in 0..WINDOWS {
                        // Both buttons fire on the same millisecond
                        barrier.wait();
                        let now = 1_000 + k * 250;
                        if let TriggerOutcome::Accepted(snap) = debouncer.on_edge(button, now) {
                            assert_eq!(snap.lock(), snap.offset() != 0);
                            accepted.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                })
            });
            for writer in writers {
                writer.join().unwrap();
            }
            done.store(true, Ordering::Relaxed);
        });

        assert_eq!(accepted.load(Ordering::Relaxed), WINDOWS);
        assert_eq!(state.last_accepted_ms(), 1_000 + (WINDOWS - 1) * 250);
        let snap = state.snapshot();
        assert_eq!(snap.lock(), snap.offset() != 0);
        assert_eq!(snap.offset() % 5, 0);
    }

    #[test]
    fn test_offset_drifts_without_bound_until_storage_limit() {
        let state = CalibrationState::new();
        let debouncer = ButtonDebouncer::new(&state, DebounceConfig::default());

        let mut now = 1_000u32;
        for _ in 0..100 {
            debouncer.on_edge(Button::B, now);
            now += 250;
        }
        // No functional clamp: 100 presses of +5
        assert_eq!(state.snapshot().offset(), 500);

        let big = ButtonDebouncer::new(
            &state,
            DebounceConfig {
                window_ms: 200,
                step: i16::MAX,
            },
        );
        big.on_edge(Button::B, now);
        // Saturates instead of wrapping negative
        assert_eq!(state.snapshot().offset(), i16::MAX);
        assert!(state.snapshot().lock());
    }
}
