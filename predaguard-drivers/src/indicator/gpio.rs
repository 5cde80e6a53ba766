//! GPIO indicator bank
//!
//! One output line per [`Indicator`], e.g. the blue/green/red LEDs of the
//! board. Exactly one line is asserted after every update: the other lines
//! are explicitly de-asserted first, every time.

use embedded_hal::digital::OutputPin;

use predaguard_core::traits::{Indicator, IndicatorOutput};
use predaguard_core::NUM_CLASSES;

/// Mutually exclusive indicator lines
///
/// `lines` is indexed by class: `[idle, active, alert]`. Lines can be
/// active-high (default) or active-low.
pub struct GpioIndicators<P> {
    lines: [P; NUM_CLASSES],
    /// If true, line ON = pin LOW
    inverted: bool,
    active: Option<Indicator>,
}

impl<P: OutputPin> GpioIndicators<P> {
    /// Create the bank with every line off
    pub fn new(lines: [P; NUM_CLASSES], inverted: bool) -> Result<Self, P::Error> {
        let mut bank = Self {
            lines,
            inverted,
            active: None,
        };
        bank.clear()?;
        Ok(bank)
    }

    /// Create a bank of active-high lines
    pub fn new_active_high(lines: [P; NUM_CLASSES]) -> Result<Self, P::Error> {
        Self::new(lines, false)
    }

    fn drive(&mut self, index: usize, on: bool) -> Result<(), P::Error> {
        let pin = &mut self.lines[index];
        if on != self.inverted {
            pin.set_high()
        } else {
            pin.set_low()
        }
    }
}

impl<P: OutputPin> IndicatorOutput for GpioIndicators<P> {
    type Error = P::Error;

    fn set_indicator(&mut self, indicator: Indicator) -> Result<(), Self::Error> {
        let target = indicator.class();
        for index in (0..NUM_CLASSES).filter(|&i| i != target) {
            self.drive(index, false)?;
        }
        self.drive(target, true)?;
        self.active = Some(indicator);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.active = None;
        for index in 0..NUM_CLASSES {
            self.drive(index, false)?;
        }
        Ok(())
    }

    fn active(&self) -> Option<Indicator> {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    /// Mock GPIO pin for testing
    struct MockPin {
        high: bool,
        writes: u32,
    }

    impl MockPin {
        fn new() -> Self {
            Self {
                high: false,
                writes: 0,
            }
        }
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            self.writes += 1;
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            self.writes += 1;
            Ok(())
        }
    }

    fn levels(bank: &GpioIndicators<MockPin>) -> [bool; NUM_CLASSES] {
        [bank.lines[0].high, bank.lines[1].high, bank.lines[2].high]
    }

    #[test]
    fn test_starts_all_off() {
        let bank = GpioIndicators::new_active_high([MockPin::new(), MockPin::new(), MockPin::new()]).unwrap();
        assert_eq!(levels(&bank), [false, false, false]);
        assert_eq!(bank.active(), None);
    }

    #[test]
    fn test_exactly_one_line_on() {
        let mut bank =
            GpioIndicators::new_active_high([MockPin::new(), MockPin::new(), MockPin::new()]).unwrap();

        bank.set_indicator(Indicator::Idle).unwrap();
        assert_eq!(levels(&bank), [true, false, false]);

        bank.set_indicator(Indicator::Alert).unwrap();
        assert_eq!(levels(&bank), [false, false, true]);
        assert_eq!(bank.active(), Some(Indicator::Alert));

        bank.set_indicator(Indicator::Active).unwrap();
        assert_eq!(levels(&bank), [false, true, false]);
    }

    #[test]
    fn test_reassert_is_idempotent() {
        let mut bank =
            GpioIndicators::new_active_high([MockPin::new(), MockPin::new(), MockPin::new()]).unwrap();

        bank.set_indicator(Indicator::Active).unwrap();
        bank.set_indicator(Indicator::Active).unwrap();
        assert_eq!(levels(&bank), [false, true, false]);
        // Every line is re-driven on every call
        assert!(bank.lines.iter().all(|p| p.writes == 3));
    }

    #[test]
    fn test_stray_line_is_cleared() {
        let mut bank =
            GpioIndicators::new_active_high([MockPin::new(), MockPin::new(), MockPin::new()]).unwrap();

        // Something else left the red line on
        bank.lines[2].high = true;
        bank.set_indicator(Indicator::Idle).unwrap();
        assert_eq!(levels(&bank), [true, false, false]);
    }

    #[test]
    fn test_boot_indication_cleared_on_halt() {
        let mut bank =
            GpioIndicators::new_active_high([MockPin::new(), MockPin::new(), MockPin::new()]).unwrap();

        bank.set_indicator(Indicator::BOOT_OK).unwrap();
        assert_eq!(levels(&bank), [false, true, false]);

        bank.clear().unwrap();
        assert_eq!(levels(&bank), [false, false, false]);
        assert_eq!(bank.active(), None);
    }

    #[test]
    fn test_active_low_lines() {
        let mut bank =
            GpioIndicators::new([MockPin::new(), MockPin::new(), MockPin::new()], true).unwrap();
        assert_eq!(levels(&bank), [true, true, true]);

        bank.set_indicator(Indicator::Alert).unwrap();
        assert_eq!(levels(&bank), [true, true, false]);

        bank.clear().unwrap();
        assert_eq!(levels(&bank), [true, true, true]);
        assert_eq!(bank.active(), None);
    }
}
