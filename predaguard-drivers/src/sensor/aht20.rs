//! AHT20 temperature/humidity sensor
//!
//! Measurement sequence:
//! 1. Soft reset (0xBA), then check the calibration bit in the status byte
//!    and send the calibration command (0xBE 0x08 0x00) if it is clear
//! 2. Trigger a measurement (0xAC 0x33 0x00)
//! 3. Wait ~80 ms for the conversion
//! 4. Read 7 bytes: status, 20-bit humidity, 20-bit temperature, CRC-8
//!
//! ```text
//! RH [%] = raw_h / 2^20 * 100
//! T [°C] = raw_t / 2^20 * 200 - 50
//! ```

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use predaguard_core::traits::{HumiditySensor, Reading, SensorError};

/// Fixed 7-bit bus address
pub const ADDRESS: u8 = 0x38;

const CMD_SOFT_RESET: u8 = 0xBA;
const CMD_STATUS: u8 = 0x71;
const CMD_CALIBRATE: [u8; 3] = [0xBE, 0x08, 0x00];
const CMD_TRIGGER: [u8; 3] = [0xAC, 0x33, 0x00];

const STATUS_BUSY: u8 = 0x80;
const STATUS_CALIBRATED: u8 = 0x08;

const RESET_DELAY_MS: u32 = 20;
const CALIBRATE_DELAY_MS: u32 = 10;
const MEASURE_DELAY_MS: u32 = 80;

/// Full scale of the 20-bit raw values
const FULL_SCALE: f32 = (1u32 << 20) as f32;

/// CRC-8, polynomial 0x31, initial value 0xFF
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc: u8 = 0xFF;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ 0x31
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// Convert a measurement frame (status + 5 data bytes) to physical units
pub fn convert(frame: &[u8; 6]) -> Reading {
    let raw_h = ((frame[1] as u32) << 12) | ((frame[2] as u32) << 4) | ((frame[3] as u32) >> 4);
    let raw_t = (((frame[3] & 0x0F) as u32) << 16) | ((frame[4] as u32) << 8) | frame[5] as u32;

    Reading {
        temperature: raw_t as f32 / FULL_SCALE * 200.0 - 50.0,
        humidity: raw_h as f32 / FULL_SCALE * 100.0,
    }
}

/// AHT20 over async I2C
///
/// Initialization happens lazily on the first [`measure`](HumiditySensor::measure)
/// and is retried after any failure.
pub struct Aht20<I2C, D> {
    i2c: I2C,
    delay: D,
    initialized: bool,
}

impl<I2C: I2c, D: DelayNs> Aht20<I2C, D> {
    /// Create a driver; no bus traffic until the first measurement
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self {
            i2c,
            delay,
            initialized: false,
        }
    }

    /// Soft reset and make sure the calibration coefficients are loaded
    pub async fn init(&mut self) -> Result<(), SensorError> {
        self.initialized = false;

        self.i2c
            .write(ADDRESS, &[CMD_SOFT_RESET])
            .await
            .map_err(|_| SensorError::Bus)?;
        self.delay.delay_ms(RESET_DELAY_MS).await;

        if self.status().await? & STATUS_CALIBRATED == 0 {
            self.i2c
                .write(ADDRESS, &CMD_CALIBRATE)
                .await
                .map_err(|_| SensorError::Bus)?;
            self.delay.delay_ms(CALIBRATE_DELAY_MS).await;

            if self.status().await? & STATUS_CALIBRATED == 0 {
                return Err(SensorError::NotCalibrated);
            }
        }

        self.initialized = true;
        Ok(())
    }

    /// Whether [`init`](Self::init) has succeeded since the last failure
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Release the bus and delay
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    async fn status(&mut self) -> Result<u8, SensorError> {
        let mut status = [0u8; 1];
        self.i2c
            .write_read(ADDRESS, &[CMD_STATUS], &mut status)
            .await
            .map_err(|_| SensorError::Bus)?;
        Ok(status[0])
    }

    async fn read_frame(&mut self) -> Result<Reading, SensorError> {
        self.i2c
            .write(ADDRESS, &CMD_TRIGGER)
            .await
            .map_err(|_| SensorError::Bus)?;
        self.delay.delay_ms(MEASURE_DELAY_MS).await;

        let mut buf = [0u8; 7];
        self.i2c
            .read(ADDRESS, &mut buf)
            .await
            .map_err(|_| SensorError::Bus)?;

        if buf[0] & STATUS_BUSY != 0 {
            return Err(SensorError::Busy);
        }
        if crc8(&buf[..6]) != buf[6] {
            return Err(SensorError::Checksum);
        }

        let mut frame = [0u8; 6];
        frame.copy_from_slice(&buf[..6]);
        Ok(convert(&frame))
    }
}

impl<I2C: I2c, D: DelayNs> HumiditySensor for Aht20<I2C, D> {
    async fn measure(&mut self) -> Result<Reading, SensorError> {
        if !self.initialized {
            self.init().await?;
        }

        let result = self.read_frame().await;
        if matches!(result, Err(SensorError::Bus)) {
            // Device may have browned out; redo the reset next time
            self.initialized = false;
        }
        result
    }
}
