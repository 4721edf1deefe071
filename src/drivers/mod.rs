pub mod accel;
pub mod buzzer;
pub mod display;
pub mod knob;
pub mod pixel;

use std::sync::{Mutex, MutexGuard};

use esp_idf_hal::i2c::I2cDriver;

/// Thread-safe handle to the I2C bus shared by the OLED and accelerometer.
pub type SharedBus = &'static Mutex<I2cDriver<'static>>;

/// Take the bus, treating a poisoned lock as a bus error.
pub(crate) fn lock_bus(bus: SharedBus) -> anyhow::Result<MutexGuard<'static, I2cDriver<'static>>> {
    bus.lock()
        .map_err(|_| anyhow::anyhow!("I2C bus mutex poisoned"))
}
