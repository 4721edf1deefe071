// Tilt & Defuse - Library Root
//
// Game logic is target-independent and unit tested on the host.  Drivers and
// tasks only build for ESP-IDF.

pub mod config;
pub mod countdown;
pub mod encoder;
pub mod events;
pub mod game;
pub mod hal;
pub mod input;
pub mod level;
pub mod screen;
pub mod tilt;

#[cfg(target_os = "espidf")]
pub mod drivers;
#[cfg(target_os = "espidf")]
pub mod tasks;

/// Milliseconds since boot.
#[cfg(target_os = "espidf")]
pub fn now_ms() -> u64 {
    // SAFETY: reads a monotonic hardware counter, no preconditions.
    (unsafe { esp_idf_sys::esp_timer_get_time() } / 1000) as u64
}
