// Tilt & Defuse - NeoPixel Driver
//
// One WS2812 per status pin, each on its own RMT channel.  Frame encoding is
// left to the RMT driver; this only picks the channel and dims the color.

use std::iter;

use smart_leds::{brightness, SmartLedsWrite, RGB8};
use ws2812_esp32_rmt_driver::Ws2812Esp32Rmt;

use crate::config::*;
use crate::hal::PixelOutput;

pub struct NeoPixels {
    channels: [Ws2812Esp32Rmt<'static>; 2],
}

impl NeoPixels {
    /// `knob` and `tilt` drive [`PIXEL_KNOB`](crate::hal::PIXEL_KNOB) and
    /// [`PIXEL_TILT`](crate::hal::PIXEL_TILT).  Both start dark.
    pub fn new(
        knob: Ws2812Esp32Rmt<'static>,
        tilt: Ws2812Esp32Rmt<'static>,
    ) -> anyhow::Result<Self> {
        let mut pixels = Self {
            channels: [knob, tilt],
        };
        for index in 0..pixels.channels.len() {
            pixels.set_color(index, OFF)?;
        }
        Ok(pixels)
    }
}

impl PixelOutput for NeoPixels {
    fn set_color(&mut self, index: usize, color: RGB8) -> anyhow::Result<()> {
        let Some(led) = self.channels.get_mut(index) else {
            anyhow::bail!("no pixel at index {}", index);
        };
        led.write(brightness(iter::once(color), PIXEL_BRIGHTNESS))?;
        Ok(())
    }
}
