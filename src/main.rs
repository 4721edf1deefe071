// Tilt & Defuse - Firmware Entry Point
//
// Start-up:
//   1. Bring up the shared I2C bus, OLED, NeoPixels, buzzer and knob pins.
//   2. Spawn the sensor task (ADXL345 -> channel).
//   3. Run the game loop on the main thread.  It never returns.

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    firmware::run()
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("tilt-defuse is ESP32-C3 firmware; build for riscv32imc-esp-espidf");
}

#[cfg(target_os = "espidf")]
mod firmware {
    use std::sync::mpsc;
    use std::sync::Mutex;
    use std::thread;

    use esp_idf_hal::delay::FreeRtos;
    use esp_idf_hal::gpio::{IOPin, OutputPin, Pin, PinDriver};
    use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_hal::ledc::{config::TimerConfig, LedcDriver, LedcTimerDriver};
    use esp_idf_hal::prelude::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use ws2812_esp32_rmt_driver::Ws2812Esp32Rmt;

    use tilt_defuse::config::*;
    use tilt_defuse::drivers::buzzer::BuzzerDriver;
    use tilt_defuse::drivers::display::OledDisplay;
    use tilt_defuse::drivers::knob::BoardInputs;
    use tilt_defuse::drivers::pixel::NeoPixels;
    use tilt_defuse::drivers::SharedBus;
    use tilt_defuse::game::Game;
    use tilt_defuse::hal::HardwareContext;
    use tilt_defuse::level::LevelGenerator;
    use tilt_defuse::{now_ms, tasks};

    pub fn run() -> anyhow::Result<()> {
        // Link esp-idf-sys runtime patches and initialise logging.
        esp_idf_svc::sys::link_patches();
        esp_idf_svc::log::EspLogger::initialize_default();
        log::info!("Tilt & Defuse firmware starting ({:?} levels)", LEVEL_MODE);

        let peripherals = Peripherals::take()?;
        let pins = peripherals.pins;

        // ---- I2C bus (shared between OLED and ADXL345) --------------------
        let i2c_config = I2cConfig::new().baudrate(400u32.kHz().into());
        let i2c = I2cDriver::new(
            peripherals.i2c0,
            wired(pins.gpio6, PIN_I2C_SDA)?,
            wired(pins.gpio7, PIN_I2C_SCL)?,
            &i2c_config,
        )?;
        // The bus lives for the whole program; firmware never exits.
        let i2c_bus: SharedBus = Box::leak(Box::new(Mutex::new(i2c)));

        let mut display = OledDisplay::new(i2c_bus);
        if !display.is_connected() {
            log::error!("OLED not found at {:#04x}", I2C_ADDR_OLED);
        }
        display.init()?;

        // ---- NeoPixels ----------------------------------------------------
        let knob_led =
            Ws2812Esp32Rmt::new(peripherals.rmt.channel0, wired(pins.gpio2, PIN_PIXEL_KNOB)?)?;
        let tilt_led =
            Ws2812Esp32Rmt::new(peripherals.rmt.channel1, wired(pins.gpio3, PIN_PIXEL_TILT)?)?;
        let pixels = NeoPixels::new(knob_led, tilt_led)?;

        // ---- Buzzer -------------------------------------------------------
        let buzzer_pin = wired(pins.gpio20, PIN_BUZZER)?;
        let buzzer = if USE_DIGITAL_BUZZER {
            let mut pin = PinDriver::output(buzzer_pin.downgrade_output())?;
            pin.set_low()?;
            BuzzerDriver::Digital(pin)
        } else {
            let timer = LedcTimerDriver::new(
                peripherals.ledc.timer0,
                &TimerConfig::default().frequency(BUZZER_FREQUENCY_HZ.Hz().into()),
            )?;
            let mut channel = LedcDriver::new(peripherals.ledc.channel0, timer, buzzer_pin)?;
            channel.set_duty(0)?;
            BuzzerDriver::Pwm(channel)
        };

        // ---- Sensor task --------------------------------------------------
        let (sensor_tx, sensor_rx) = mpsc::channel();
        thread::Builder::new()
            .name("sensor".into())
            .stack_size(STACK_SENSOR)
            .spawn(move || {
                tasks::sensor::sensor_task(i2c_bus, sensor_tx);
            })?;

        let inputs = BoardInputs::new(
            wired(pins.gpio8, PIN_ENCODER_A)?.downgrade(),
            wired(pins.gpio21, PIN_KNOB_BUTTON)?.downgrade(),
            sensor_rx,
        )?;

        // ---- Game ---------------------------------------------------------
        let seed = u64::from(unsafe { esp_idf_svc::sys::esp_random() });
        let levels = LevelGenerator::new(SmallRng::seed_from_u64(seed), LEVEL_MODE);
        let hw = HardwareContext::new(display, pixels, buzzer, inputs, FreeRtos);
        let game = Game::new(hw, levels, GameConfig::default(), now_ms());

        tasks::game::game_task(game)
    }

    /// Hand back `pin` after checking it is the GPIO the pin map in
    /// `config.rs` names for it.
    fn wired<P: Pin>(pin: P, expected: i32) -> anyhow::Result<P> {
        let actual = i32::from(pin.pin());
        anyhow::ensure!(
            actual == expected,
            "GPIO{} wired where config.rs expects GPIO{}",
            actual,
            expected
        );
        Ok(pin)
    }
}
