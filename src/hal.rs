// Tilt & Defuse - Hardware Collaborators
//
// The game never touches a peripheral directly.  Everything it drives or
// samples goes through these traits, bundled into a `HardwareContext` that is
// built once in `main` and handed to the game.

use embedded_hal::delay::DelayNs;
use smart_leds::RGB8;

use crate::events::SensorData;

/// Pixel positions on the chain.
pub const PIXEL_KNOB: usize = 0;
pub const PIXEL_TILT: usize = 1;

// ---------------------------------------------------------------------------
// Collaborator traits
// ---------------------------------------------------------------------------

/// Text-only OLED.  Implementations keep whatever they last rendered.
pub trait TextDisplay {
    /// Render lines top to bottom, left aligned.
    fn render(&mut self, lines: &[&str]) -> anyhow::Result<()>;
    /// Render a single string centered on screen at a font `scale` (1-4).
    fn render_centered(&mut self, text: &str, scale: u8) -> anyhow::Result<()>;
    /// Render a large centered `title` with a small `subtitle` under it.
    fn render_title(&mut self, title: &str, subtitle: &str) -> anyhow::Result<()>;
}

pub trait PixelOutput {
    fn set_color(&mut self, index: usize, color: RGB8) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuzzerKind {
    /// Passive piezo on a PWM channel, loudness follows duty.
    Pwm,
    /// Active buzzer on a plain GPIO, either on or off.
    Digital,
}

pub trait Buzzer {
    fn kind(&self) -> BuzzerKind;
    /// Duty ratio 0.0-1.0.  Only meaningful for [`BuzzerKind::Pwm`].
    fn set_intensity(&mut self, ratio: f32) -> anyhow::Result<()>;
    /// Only meaningful for [`BuzzerKind::Digital`].
    fn set_level(&mut self, on: bool) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPinId {
    EncoderA,
    KnobButton,
}

pub trait Sensors {
    /// Most recent acceleration sample.  Must not block waiting for a new one.
    fn read_acceleration(&mut self) -> anyhow::Result<SensorData>;
    /// Electrical level of a pin (`true` = HIGH).
    fn read_digital(&mut self, pin: InputPinId) -> bool;
}

// ---------------------------------------------------------------------------
// Hardware bundle
// ---------------------------------------------------------------------------
pub struct HardwareContext<D, P, B, S, Dl> {
    pub display: D,
    pub pixels: P,
    pub buzzer: B,
    pub sensors: S,
    pub delay: Dl,
}

impl<D, P, B, S, Dl> HardwareContext<D, P, B, S, Dl>
where
    D: TextDisplay,
    P: PixelOutput,
    B: Buzzer,
    S: Sensors,
    Dl: DelayNs,
{
    pub fn new(display: D, pixels: P, buzzer: B, sensors: S, delay: Dl) -> Self {
        Self {
            display,
            pixels,
            buzzer,
            sensors,
            delay,
        }
    }

    /// Drive the buzzer at `ratio`, whatever kind it is.  Zero silences it.
    pub fn tone(&mut self, ratio: f32) {
        let result = match self.buzzer.kind() {
            BuzzerKind::Pwm => self.buzzer.set_intensity(ratio),
            BuzzerKind::Digital => self.buzzer.set_level(ratio > 0.0),
        };
        if let Err(e) = result {
            log::warn!("Buzzer error: {}", e);
        }
    }

    /// Blocking beep.  Holds the tone for `duration_ms` then silences it.
    pub fn beep(&mut self, duration_ms: u32, intensity: f32) {
        self.tone(intensity);
        self.delay.delay_ms(duration_ms);
        self.tone(0.0);
    }

    pub fn fill(&mut self, color: RGB8) {
        self.set_pixel(PIXEL_KNOB, color);
        self.set_pixel(PIXEL_TILT, color);
    }

    pub fn set_pixel(&mut self, index: usize, color: RGB8) {
        if let Err(e) = self.pixels.set_color(index, color) {
            log::warn!("Pixel {} error: {}", index, e);
        }
    }

    pub fn show(&mut self, lines: &[&str]) {
        if let Err(e) = self.display.render(lines) {
            log::warn!("Display error: {}", e);
        }
    }

    /// Centered text held on screen for `hold_ms` (blocking).
    pub fn show_centered(&mut self, text: &str, scale: u8, hold_ms: u32) {
        if let Err(e) = self.display.render_centered(text, scale) {
            log::warn!("Display error: {}", e);
        }
        if hold_ms > 0 {
            self.delay.delay_ms(hold_ms);
        }
    }

    pub fn show_title(&mut self, title: &str, subtitle: &str, hold_ms: u32) {
        if let Err(e) = self.display.render_title(title, subtitle) {
            log::warn!("Display error: {}", e);
        }
        if hold_ms > 0 {
            self.delay.delay_ms(hold_ms);
        }
    }

    /// Silence everything the player can see or hear.
    pub fn quiet(&mut self) {
        self.tone(0.0);
        self.fill(crate::config::OFF);
    }
}

#[cfg(test)]
pub(crate) mod mock;
