// Tilt & Defuse - OLED Framebuffer
//
// 128x64 monochrome buffer in SSD1306 page order (8 vertical pixels per byte,
// 8 pages of 128 columns).  The display driver flushes `as_bytes()` straight
// to GDDRAM; layout lives here so it can be tested off-target.

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10, FONT_9X18_BOLD};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use crate::config::*;

const LINE_LEFT: i32 = 4;
const LINE_TOP: i32 = 4;
const LINE_PITCH: i32 = 12;
const TITLE_Y: i32 = 24;
const SUBTITLE_Y: i32 = 46;

pub struct Framebuffer {
    buf: [u8; DISPLAY_BUFFER_SIZE],
}

impl Framebuffer {
    pub const fn new() -> Self {
        Self {
            buf: [0; DISPLAY_BUFFER_SIZE],
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn clear_all(&mut self) {
        self.buf.fill(0);
    }

    pub fn pixel(&self, x: u32, y: u32) -> bool {
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return false;
        }
        let (idx, bit) = Self::locate(x, y);
        self.buf[idx] & bit != 0
    }

    fn locate(x: u32, y: u32) -> (usize, u8) {
        let idx = (y / 8) as usize * SCREEN_WIDTH as usize + x as usize;
        (idx, 1 << (y % 8))
    }

    /// Replace the frame with `lines`, top to bottom.
    pub fn draw_lines(&mut self, lines: &[&str]) {
        self.clear_all();
        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        let mut y = LINE_TOP;
        for line in lines {
            let _ = Text::with_baseline(line, Point::new(LINE_LEFT, y), style, Baseline::Top)
                .draw(self);
            y += LINE_PITCH;
        }
    }

    /// Replace the frame with `text` centered, bigger `scale` = bigger font.
    pub fn draw_centered(&mut self, text: &str, scale: u8) {
        self.clear_all();
        let style = MonoTextStyle::new(font_for_scale(scale), BinaryColor::On);
        let layout = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();
        let center = Point::new(SCREEN_WIDTH as i32 / 2, SCREEN_HEIGHT as i32 / 2);
        let _ = Text::with_text_style(text, center, style, layout).draw(self);
    }

    /// Replace the frame with a scale-2 `title` over a small `subtitle`,
    /// both centered horizontally.
    pub fn draw_title(&mut self, title: &str, subtitle: &str) {
        self.clear_all();
        let layout = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();
        let x = SCREEN_WIDTH as i32 / 2;
        let big = MonoTextStyle::new(font_for_scale(2), BinaryColor::On);
        let small = MonoTextStyle::new(font_for_scale(1), BinaryColor::On);
        let _ = Text::with_text_style(title, Point::new(x, TITLE_Y), big, layout).draw(self);
        let _ = Text::with_text_style(subtitle, Point::new(x, SUBTITLE_Y), small, layout)
            .draw(self);
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

fn font_for_scale(scale: u8) -> &'static MonoFont<'static> {
    match scale {
        0 | 1 => &FONT_6X10,
        2 => &FONT_9X18_BOLD,
        _ => &FONT_10X20,
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl DrawTarget for Framebuffer {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as u32, point.y as u32);
            if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
                continue;
            }
            let (idx, bit) = Self::locate(x, y);
            match color {
                BinaryColor::On => self.buf[idx] |= bit,
                BinaryColor::Off => self.buf[idx] &= !bit,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_bounds(fb: &Framebuffer) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for y in 0..SCREEN_HEIGHT {
            for x in 0..SCREEN_WIDTH {
                if fb.pixel(x, y) {
                    bounds = Some(match bounds {
                        None => (x, y, x, y),
                        Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                    });
                }
            }
        }
        bounds
    }

    #[test]
    fn page_layout_matches_ssd1306() {
        let mut fb = Framebuffer::new();
        let _ = Pixel(Point::new(3, 10), BinaryColor::On).draw(&mut fb);
        // page 1, column 3, bit 2
        assert_eq!(fb.as_bytes()[128 + 3], 0b0000_0100);
        assert!(fb.pixel(3, 10));
        assert!(!fb.pixel(3, 11));
    }

    #[test]
    fn out_of_range_pixels_are_dropped() {
        let mut fb = Framebuffer::new();
        let _ = Pixel(Point::new(-1, 5), BinaryColor::On).draw(&mut fb);
        let _ = Pixel(Point::new(200, 5), BinaryColor::On).draw(&mut fb);
        assert!(fb.as_bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn lines_stack_from_the_top() {
        let mut fb = Framebuffer::new();
        fb.draw_lines(&["AAAA", "BBBB"]);
        let (x0, y0, _, y1) = lit_bounds(&fb).unwrap();
        assert!(x0 >= LINE_LEFT as u32);
        assert!(y0 >= LINE_TOP as u32);
        // second line occupies the next 12 px slot
        assert!(y1 >= (LINE_TOP + LINE_PITCH) as u32);
        assert!(y1 < (LINE_TOP + 2 * LINE_PITCH) as u32);
    }

    #[test]
    fn title_sits_above_subtitle_and_both_are_centered() {
        let mut fb = Framebuffer::new();
        fb.draw_lines(&["leftover"]);
        fb.draw_title("321 BOOM!", "Tilt & Defuse");
        let (x0, y0, x1, y1) = lit_bounds(&fb).unwrap();
        assert!(((x0 + x1) / 2).abs_diff(64) <= 4, "x {}..{}", x0, x1);

        let fb = &fb;
        // split at the gap between the two rows of text
        let row_lit = |y: u32| (0..SCREEN_WIDTH).any(|x| fb.pixel(x, y));
        let gap = (y0..=y1).find(|y| !row_lit(*y)).unwrap();
        let sub_start = (gap..=y1).find(|y| row_lit(*y)).unwrap();
        assert!(gap - y0 > y1 + 1 - sub_start, "title uses the larger font");

        let span = |rows: std::ops::RangeInclusive<u32>| {
            let xs: Vec<u32> = rows
                .flat_map(|y| (0..SCREEN_WIDTH).filter(move |x| fb.pixel(*x, y)))
                .collect();
            (*xs.iter().min().unwrap(), *xs.iter().max().unwrap())
        };
        let (tx0, tx1) = span(y0..=gap - 1);
        let (sx0, sx1) = span(sub_start..=y1);
        assert!(((tx0 + tx1) / 2).abs_diff(64) <= 4);
        assert!(((sx0 + sx1) / 2).abs_diff(64) <= 4);
        assert!(!fb.pixel(LINE_LEFT as u32, LINE_TOP as u32 + 2));
    }

    #[test]
    fn centered_text_is_centered_and_replaces_frame() {
        let mut fb = Framebuffer::new();
        fb.draw_lines(&["leftover"]);
        fb.draw_centered("BOOM!", 3);
        let (x0, _, x1, _) = lit_bounds(&fb).unwrap();
        let mid = (x0 + x1) / 2;
        assert!((60..=68).contains(&mid), "mid = {}", mid);
        assert!(!fb.pixel(LINE_LEFT as u32, LINE_TOP as u32 + 2));
    }
}
