//! Recording collaborators for host tests.

use embedded_hal::delay::DelayNs;

use super::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Lines(Vec<String>),
    Centered(String, u8),
    Title(String, String),
}

#[derive(Debug, Default)]
pub struct MockDisplay {
    pub frames: Vec<Frame>,
}

impl MockDisplay {
    pub fn last_lines(&self) -> Vec<String> {
        match self.frames.last() {
            Some(Frame::Lines(lines)) => lines.clone(),
            _ => Vec::new(),
        }
    }

    pub fn centered_count(&self, text: &str) -> usize {
        self.frames
            .iter()
            .filter(|f| matches!(f, Frame::Centered(t, _) if t == text))
            .count()
    }
}

impl TextDisplay for MockDisplay {
    fn render(&mut self, lines: &[&str]) -> anyhow::Result<()> {
        self.frames
            .push(Frame::Lines(lines.iter().map(|l| l.to_string()).collect()));
        Ok(())
    }

    fn render_centered(&mut self, text: &str, scale: u8) -> anyhow::Result<()> {
        self.frames.push(Frame::Centered(text.to_string(), scale));
        Ok(())
    }

    fn render_title(&mut self, title: &str, subtitle: &str) -> anyhow::Result<()> {
        self.frames
            .push(Frame::Title(title.to_string(), subtitle.to_string()));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MockPixels {
    pub colors: [RGB8; 2],
}

impl PixelOutput for MockPixels {
    fn set_color(&mut self, index: usize, color: RGB8) -> anyhow::Result<()> {
        match self.colors.get_mut(index) {
            Some(slot) => {
                *slot = color;
                Ok(())
            }
            None => anyhow::bail!("no pixel at index {}", index),
        }
    }
}

#[derive(Debug)]
pub struct MockBuzzer {
    pub kind: BuzzerKind,
    pub intensity: f32,
    pub level: bool,
    /// Number of silent-to-sounding transitions.
    pub onsets: usize,
}

impl MockBuzzer {
    pub fn new(kind: BuzzerKind) -> Self {
        Self {
            kind,
            intensity: 0.0,
            level: false,
            onsets: 0,
        }
    }

    pub fn sounding(&self) -> bool {
        self.intensity > 0.0 || self.level
    }
}

impl Buzzer for MockBuzzer {
    fn kind(&self) -> BuzzerKind {
        self.kind
    }

    fn set_intensity(&mut self, ratio: f32) -> anyhow::Result<()> {
        if self.intensity == 0.0 && ratio > 0.0 {
            self.onsets += 1;
        }
        self.intensity = ratio;
        Ok(())
    }

    fn set_level(&mut self, on: bool) -> anyhow::Result<()> {
        if !self.level && on {
            self.onsets += 1;
        }
        self.level = on;
        Ok(())
    }
}

#[derive(Debug)]
pub struct MockSensors {
    pub accel: SensorData,
    pub encoder_a: bool,
    /// Electrical level, pull-up: `true` = released.
    pub button: bool,
    pub fail_accel: bool,
}

impl Default for MockSensors {
    fn default() -> Self {
        Self {
            accel: SensorData::default(),
            encoder_a: true,
            button: true,
            fail_accel: false,
        }
    }
}

impl Sensors for MockSensors {
    fn read_acceleration(&mut self) -> anyhow::Result<SensorData> {
        if self.fail_accel {
            anyhow::bail!("bus timeout");
        }
        Ok(self.accel)
    }

    fn read_digital(&mut self, pin: InputPinId) -> bool {
        match pin {
            InputPinId::EncoderA => self.encoder_a,
            InputPinId::KnobButton => self.button,
        }
    }
}

#[derive(Debug, Default)]
pub struct MockDelay {
    pub total_ns: u64,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }
}

pub type MockHardware =
    HardwareContext<MockDisplay, MockPixels, MockBuzzer, MockSensors, MockDelay>;

pub fn hardware(kind: BuzzerKind) -> MockHardware {
    HardwareContext::new(
        MockDisplay::default(),
        MockPixels::default(),
        MockBuzzer::new(kind),
        MockSensors::default(),
        MockDelay::default(),
    )
}

#[test]
fn digital_buzzer_follows_tone_on_off() {
    let mut hw = hardware(BuzzerKind::Digital);
    hw.tone(0.15);
    assert!(hw.buzzer.level);
    assert_eq!(hw.buzzer.intensity, 0.0);
    hw.tone(0.0);
    assert!(!hw.buzzer.level);
}

#[test]
fn beep_holds_for_duration_then_silences() {
    let mut hw = hardware(BuzzerKind::Pwm);
    hw.beep(50, 0.5);
    assert_eq!(hw.buzzer.onsets, 1);
    assert!(!hw.buzzer.sounding());
    assert_eq!(hw.delay.total_ns, 50_000_000);
}
