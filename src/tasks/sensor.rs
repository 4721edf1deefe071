// Tilt & Defuse - Sensor Task
//
// Samples the ADXL345 at ~62.5 Hz and forwards every reading to the game
// loop, which only ever uses the newest one.

use std::sync::mpsc::Sender;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::*;
use crate::drivers::accel::Adxl345;
use crate::drivers::SharedBus;
use crate::events::SensorData;

pub fn sensor_task(bus: SharedBus, sensor_tx: Sender<SensorData>) {
    log::info!("Sensor task started");

    let accel = Adxl345::new(bus);
    if !accel.is_connected() {
        log::error!("ADXL345 not found at {:#04x}", I2C_ADDR_ADXL345);
        return;
    }
    if let Err(e) = accel.init() {
        log::error!("ADXL345 init failed in sensor task: {}", e);
        return;
    }

    let interval = Duration::from_millis(SENSOR_SAMPLE_INTERVAL_MS);

    loop {
        let tick_start = Instant::now();

        match accel.read_data() {
            Ok(data) => {
                if sensor_tx.send(data).is_err() {
                    log::warn!("Sensor channel closed, exiting sensor task");
                    return;
                }
            }
            Err(e) => {
                log::warn!("Accelerometer read error: {}", e);
            }
        }

        let elapsed = tick_start.elapsed();
        if elapsed < interval {
            thread::sleep(interval - elapsed);
        }
    }
}
