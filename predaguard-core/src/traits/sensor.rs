//! Temperature/humidity sensor traits

/// Errors that can occur while reading a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Bus transaction failed (NACK, arbitration loss, timeout)
    Bus,
    /// Measurement still in progress after the conversion wait
    Busy,
    /// CRC over the measurement frame did not match
    Checksum,
    /// Device reports it has not loaded its calibration coefficients
    NotCalibrated,
}

/// One temperature/humidity pair
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Temperature in degrees Celsius
    pub temperature: f32,
    /// Relative humidity in percent
    pub humidity: f32,
}

impl Reading {
    /// Substitute reading used when the bus fails
    pub const ZERO: Self = Self {
        temperature: 0.0,
        humidity: 0.0,
    };

    pub const fn new(temperature: f32, humidity: f32) -> Self {
        Self {
            temperature,
            humidity,
        }
    }
}

/// Raw readings produced once per cycle
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorSample {
    /// One sensor
    Single(Reading),
    /// Two sensors: exhaust (first) and ambient (second)
    Dual(Reading, Reading),
}

impl SensorSample {
    /// First (or only) reading
    pub fn primary(&self) -> Reading {
        match *self {
            SensorSample::Single(r) => r,
            SensorSample::Dual(r, _) => r,
        }
    }

    /// Second reading, if this is a dual sample
    pub fn secondary(&self) -> Option<Reading> {
        match *self {
            SensorSample::Single(_) => None,
            SensorSample::Dual(_, r) => Some(r),
        }
    }
}

/// A single temperature/humidity device
///
/// Implementations handle the bus protocol of a specific part (AHT20,
/// SHT3x, ...). Errors are reported here and turned into degraded readings
/// by the acquirer.
#[allow(async_fn_in_trait)]
pub trait HumiditySensor {
    /// Trigger a conversion and read the result
    async fn measure(&mut self) -> Result<Reading, SensorError>;
}

/// Source of one [`SensorSample`] per pipeline cycle
///
/// Must never fail: on a transient bus error the implementation substitutes
/// [`Reading::ZERO`] for the affected pair and keeps going.
#[allow(async_fn_in_trait)]
pub trait SensorAcquirer {
    /// Read all sensors
    async fn read_sensors(&mut self) -> SensorSample;

    /// Whether the most recent sample contained a substituted reading
    fn last_degraded(&self) -> bool {
        false
    }
}
