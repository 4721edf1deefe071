// Tilt & Defuse - Hardware & Game Configuration
// Target: Seeed Studio Xiao ESP32-C3 (RISC-V)

use smart_leds::RGB8;
use crate::level::LevelMode;
use crate::tilt::AxisConvention;

// ---------------------------------------------------------------------------
// GPIO Pin Definitions (Xiao ESP32-C3 pinout)
// ---------------------------------------------------------------------------
pub const PIN_PIXEL_KNOB: i32 = 2;  // D0    - Knob status NeoPixel
pub const PIN_PIXEL_TILT: i32 = 3;  // D1    - Tilt status NeoPixel
pub const PIN_I2C_SDA: i32 = 6;     // D4    - I2C data line
pub const PIN_I2C_SCL: i32 = 7;     // D5    - I2C clock line
pub const PIN_KNOB_BUTTON: i32 = 21; // D6   - Encoder push button (INPUT_PULLUP, active LOW)
pub const PIN_BUZZER: i32 = 20;     // D7    - Buzzer (LEDC PWM or plain GPIO)
pub const PIN_ENCODER_A: i32 = 8;   // D8    - Encoder phase A (INPUT_PULLUP), B is not read

// ---------------------------------------------------------------------------
// I2C Bus
// ---------------------------------------------------------------------------
pub const I2C_ADDR_ADXL345: u8 = 0x53;
pub const I2C_ADDR_OLED: u8 = 0x3C;
pub const I2C_TIMEOUT_TICKS: u32 = 1000; // FreeRTOS ticks

// ---------------------------------------------------------------------------
// Display (SSD1306 OLED)
// ---------------------------------------------------------------------------
pub const SCREEN_WIDTH: u32 = 128;
pub const SCREEN_HEIGHT: u32 = 64;
pub const DISPLAY_BUFFER_SIZE: usize = (SCREEN_WIDTH as usize * SCREEN_HEIGHT as usize) / 8; // 1024

// ---------------------------------------------------------------------------
// Task Stack Sizes (bytes)
// ---------------------------------------------------------------------------
pub const STACK_SENSOR: usize = 4096;

// ---------------------------------------------------------------------------
// Timing (milliseconds)
// ---------------------------------------------------------------------------
pub const SENSOR_SAMPLE_INTERVAL_MS: u64 = 16;     // ~62.5 Hz
pub const GAME_TICK_INTERVAL_MS: u64 = 10;         // 100 Hz encoder poll
pub const ENCODER_DEBOUNCE_MS: u64 = 3;
pub const DOUBLE_CLICK_WINDOW_MS: u64 = 350;
pub const RENDER_INTERVAL_MS: u64 = 80;            // OLED status refresh
pub const LEVEL_INTRO_MS: u64 = 2000;
pub const LEVEL_CLEAR_MS: u64 = 2000;
pub const EXIT_HOLD_MS: u64 = 2000;
pub const WIN_HOLD_MS: u64 = 5000;

// ---------------------------------------------------------------------------
// Buzzer
// ---------------------------------------------------------------------------
pub const BUZZER_FREQUENCY_HZ: u32 = 2000;
pub const BEEP_MS: u32 = 50;                // countdown tick
pub const CONFIRM_BEEP_MS: u32 = 100;       // menu commit / restart / boot
pub const BEEP_INTENSITY: f32 = 0.5;
pub const SUSTAIN_INTENSITY: f32 = 0.15;    // last second before the bomb goes off
pub const USE_DIGITAL_BUZZER: bool = cfg!(feature = "digital-buzzer");

// ---------------------------------------------------------------------------
// Tilt filter
// ---------------------------------------------------------------------------
pub const TILT_ALPHA: f32 = 0.2;
pub const TILT_NEAR_FACTOR: f32 = 2.0;      // "almost there" band = tolerance * factor

// ---------------------------------------------------------------------------
// Levels
// ---------------------------------------------------------------------------
pub const LEVEL_COUNT: usize = 10;

pub const LEVEL_MODE: LevelMode = if cfg!(feature = "fixed-levels") {
    LevelMode::Fixed
} else {
    LevelMode::Randomized
};

pub const AXIS_CONVENTION: AxisConvention = match LEVEL_MODE {
    LevelMode::Randomized => AxisConvention::Dual,
    LevelMode::Fixed => AxisConvention::Pitch,
};

// Randomized mode bounds
pub const RANDOM_TILT_BOUND_DEG: f32 = 45.0;
pub const RANDOM_KNOB_MIN_LOW: i32 = 1;
pub const RANDOM_KNOB_MIN_HIGH: i32 = 8;
pub const RANDOM_KNOB_WINDOW: i32 = 2;

// Fixed mode targets
pub const FIXED_TILT_PITCH_DEG: f32 = 30.0;
pub const FIXED_KNOB_TARGET: i32 = 6;

// Difficulty table: (time limit s, tilt tolerance deg, knob tolerance detents)
pub const EASY_TUNABLES: (f32, f32, i32) = (30.0, 5.0, 2);
pub const MEDIUM_TUNABLES: (f32, f32, i32) = (25.0, 4.0, 1);
pub const HARD_TUNABLES: (f32, f32, i32) = (20.0, 3.0, 0);

// ---------------------------------------------------------------------------
// ADXL345 Sensor Scale
// ---------------------------------------------------------------------------
pub const ACCEL_SCALE_FULL_RES: f32 = 0.0039 * 9.806_65; // m/s^2 per LSB (3.9 mg)

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------
pub const RED: RGB8 = RGB8 { r: 255, g: 0, b: 0 };
pub const ORANGE: RGB8 = RGB8 { r: 255, g: 80, b: 0 };
pub const GREEN: RGB8 = RGB8 { r: 0, g: 255, b: 0 };
pub const WHITE: RGB8 = RGB8 { r: 255, g: 255, b: 255 };
pub const OFF: RGB8 = RGB8 { r: 0, g: 0, b: 0 };
pub const PIXEL_BRIGHTNESS: u8 = 128; // half of full scale

/// Runtime view of the timing and feedback constants above.
///
/// The firmware always runs with [`GameConfig::default`]; tests shrink the
/// level count or hold times to keep scenarios short.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameConfig {
    pub level_count: usize,
    pub double_click_window_ms: u64,
    pub encoder_debounce_ms: u64,
    pub render_interval_ms: u64,
    pub level_intro_ms: u64,
    pub level_clear_ms: u64,
    pub exit_hold_ms: u64,
    pub win_hold_ms: u64,
    pub beep_ms: u32,
    pub confirm_beep_ms: u32,
    pub beep_intensity: f32,
    pub sustain_intensity: f32,
    pub tilt_alpha: f32,
    pub axis_convention: AxisConvention,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            level_count: LEVEL_COUNT,
            double_click_window_ms: DOUBLE_CLICK_WINDOW_MS,
            encoder_debounce_ms: ENCODER_DEBOUNCE_MS,
            render_interval_ms: RENDER_INTERVAL_MS,
            level_intro_ms: LEVEL_INTRO_MS,
            level_clear_ms: LEVEL_CLEAR_MS,
            exit_hold_ms: EXIT_HOLD_MS,
            win_hold_ms: WIN_HOLD_MS,
            beep_ms: BEEP_MS,
            confirm_beep_ms: CONFIRM_BEEP_MS,
            beep_intensity: BEEP_INTENSITY,
            sustain_intensity: SUSTAIN_INTENSITY,
            tilt_alpha: TILT_ALPHA,
            axis_convention: AXIS_CONVENTION,
        }
    }
}
