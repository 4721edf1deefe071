// Tilt & Defuse - SSD1306 OLED Driver
//
// Command/data framing over the shared I2C bus.  Drawing happens in a
// `Framebuffer`; this driver only initialises the panel and pushes pages.

use crate::config::*;
use crate::drivers::{lock_bus, SharedBus};
use crate::hal::TextDisplay;
use crate::screen::Framebuffer;

const CONTROL_COMMAND: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;

/// Bytes of pixel data per I2C transaction.
const FLUSH_CHUNK: usize = 32;

const INIT_SEQUENCE: &[u8] = &[
    0xAE, // display off
    0xD5, 0x80, // clock divide
    0xA8, 0x3F, // multiplex 64
    0xD3, 0x00, // no display offset
    0x40, // start line 0
    0x8D, 0x14, // charge pump on
    0x20, 0x00, // horizontal addressing
    0xA1, // segment remap
    0xC8, // COM scan descending
    0xDA, 0x12, // COM pins
    0x81, 0xCF, // contrast
    0xD9, 0xF1, // pre-charge
    0xDB, 0x40, // VCOMH deselect
    0xA4, // resume from RAM
    0xA6, // normal (not inverted)
    0xAF, // display on
];

pub struct OledDisplay {
    bus: SharedBus,
    frame: Framebuffer,
}

impl OledDisplay {
    pub fn new(bus: SharedBus) -> Self {
        Self {
            bus,
            frame: Framebuffer::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        match lock_bus(self.bus) {
            Ok(mut bus) => bus
                .write(I2C_ADDR_OLED, &[CONTROL_COMMAND, 0xE3], I2C_TIMEOUT_TICKS)
                .is_ok(),
            Err(_) => false,
        }
    }

    pub fn init(&mut self) -> anyhow::Result<()> {
        for &cmd in INIT_SEQUENCE {
            self.command(&[cmd])?;
        }
        self.frame.clear_all();
        self.flush()?;
        log::info!("SSD1306 initialised ({}x{})", SCREEN_WIDTH, SCREEN_HEIGHT);
        Ok(())
    }

    fn command(&self, cmd: &[u8]) -> anyhow::Result<()> {
        let mut packet = [0u8; 4];
        packet[0] = CONTROL_COMMAND;
        packet[1..=cmd.len()].copy_from_slice(cmd);
        let mut bus = lock_bus(self.bus)?;
        bus.write(I2C_ADDR_OLED, &packet[..=cmd.len()], I2C_TIMEOUT_TICKS)?;
        Ok(())
    }

    /// Push the whole framebuffer to GDDRAM.
    pub fn flush(&mut self) -> anyhow::Result<()> {
        self.command(&[0x21, 0, (SCREEN_WIDTH - 1) as u8])?;
        self.command(&[0x22, 0, (SCREEN_HEIGHT / 8 - 1) as u8])?;

        let mut bus = lock_bus(self.bus)?;
        let mut packet = [0u8; FLUSH_CHUNK + 1];
        packet[0] = CONTROL_DATA;
        for chunk in self.frame.as_bytes().chunks(FLUSH_CHUNK) {
            packet[1..=chunk.len()].copy_from_slice(chunk);
            bus.write(I2C_ADDR_OLED, &packet[..=chunk.len()], I2C_TIMEOUT_TICKS)?;
        }
        Ok(())
    }
}

impl TextDisplay for OledDisplay {
    fn render(&mut self, lines: &[&str]) -> anyhow::Result<()> {
        self.frame.draw_lines(lines);
        self.flush()
    }

    fn render_centered(&mut self, text: &str, scale: u8) -> anyhow::Result<()> {
        self.frame.draw_centered(text, scale);
        self.flush()
    }

    fn render_title(&mut self, title: &str, subtitle: &str) -> anyhow::Result<()> {
        self.frame.draw_title(title, subtitle);
        self.flush()
    }
}
