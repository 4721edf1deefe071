// Tilt & Defuse - ADXL345 Accelerometer Driver
//
// Register-level driver over the shared I2C bus.  Full-resolution mode,
// +-16 g range, 3.9 mg/LSB on every range.

use crate::config::*;
use crate::drivers::{lock_bus, SharedBus};
use crate::events::SensorData;

// ADXL345 register addresses
const REG_DEVID: u8 = 0x00;
const REG_BW_RATE: u8 = 0x2C;
const REG_POWER_CTL: u8 = 0x2D;
const REG_DATA_FORMAT: u8 = 0x31;
const REG_DATAX0: u8 = 0x32; // Start of 6-byte X/Y/Z burst
const DEVID_EXPECTED: u8 = 0xE5;

const BW_RATE_100HZ: u8 = 0x0A;
const POWER_CTL_MEASURE: u8 = 0x08;
const DATA_FORMAT_FULL_RES_16G: u8 = 0x0B;

pub struct Adxl345 {
    bus: SharedBus,
}

impl Adxl345 {
    pub fn new(bus: SharedBus) -> Self {
        Self { bus }
    }

    pub fn is_connected(&self) -> bool {
        let Ok(mut bus) = lock_bus(self.bus) else {
            return false;
        };
        let mut buf = [0u8; 1];
        match bus.write_read(I2C_ADDR_ADXL345, &[REG_DEVID], &mut buf, I2C_TIMEOUT_TICKS) {
            Ok(()) => buf[0] == DEVID_EXPECTED,
            Err(_) => false,
        }
    }

    /// 100 Hz output rate, full resolution, start measuring.
    pub fn init(&self) -> anyhow::Result<()> {
        let mut bus = lock_bus(self.bus)?;

        bus.write(I2C_ADDR_ADXL345, &[REG_BW_RATE, BW_RATE_100HZ], I2C_TIMEOUT_TICKS)?;
        bus.write(
            I2C_ADDR_ADXL345,
            &[REG_DATA_FORMAT, DATA_FORMAT_FULL_RES_16G],
            I2C_TIMEOUT_TICKS,
        )?;
        // Measurement mode last, once the format is set
        bus.write(I2C_ADDR_ADXL345, &[REG_POWER_CTL, POWER_CTL_MEASURE], I2C_TIMEOUT_TICKS)?;

        log::info!("ADXL345 initialised (full res, +-16g, 100Hz)");
        Ok(())
    }

    /// Burst-read X/Y/Z and convert to m/s^2.
    pub fn read_data(&self) -> anyhow::Result<SensorData> {
        let mut bus = lock_bus(self.bus)?;
        let mut raw = [0u8; 6];
        bus.write_read(I2C_ADDR_ADXL345, &[REG_DATAX0], &mut raw, I2C_TIMEOUT_TICKS)?;

        Ok(SensorData {
            ax: i16::from_le_bytes([raw[0], raw[1]]) as f32 * ACCEL_SCALE_FULL_RES,
            ay: i16::from_le_bytes([raw[2], raw[3]]) as f32 * ACCEL_SCALE_FULL_RES,
            az: i16::from_le_bytes([raw[4], raw[5]]) as f32 * ACCEL_SCALE_FULL_RES,
        })
    }
}
