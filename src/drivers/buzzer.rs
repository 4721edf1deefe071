// Tilt & Defuse - Buzzer Driver
//
// Passive piezo on an LEDC channel (loudness = duty) or an active buzzer on a
// plain GPIO (on/off only).  Selected at build time.

use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};
use esp_idf_hal::ledc::LedcDriver;

use crate::hal::{Buzzer, BuzzerKind};

pub enum BuzzerDriver {
    Pwm(LedcDriver<'static>),
    Digital(PinDriver<'static, AnyOutputPin, Output>),
}

impl Buzzer for BuzzerDriver {
    fn kind(&self) -> BuzzerKind {
        match self {
            Self::Pwm(_) => BuzzerKind::Pwm,
            Self::Digital(_) => BuzzerKind::Digital,
        }
    }

    fn set_intensity(&mut self, ratio: f32) -> anyhow::Result<()> {
        if let Self::Pwm(ledc) = self {
            let duty = (ledc.get_max_duty() as f32 * ratio.clamp(0.0, 1.0)) as u32;
            ledc.set_duty(duty)?;
        }
        Ok(())
    }

    fn set_level(&mut self, on: bool) -> anyhow::Result<()> {
        if let Self::Digital(pin) = self {
            if on {
                pin.set_high()?;
            } else {
                pin.set_low()?;
            }
        }
        Ok(())
    }
}
