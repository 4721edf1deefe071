// Tilt & Defuse - Board Inputs
//
// Encoder phase A and push button as pulled-up GPIO inputs, plus the latest
// accelerometer sample forwarded by the sensor task.

use std::sync::mpsc::{Receiver, TryRecvError};

use esp_idf_hal::gpio::{AnyIOPin, Input, PinDriver, Pull};

use crate::events::SensorData;
use crate::hal::{InputPinId, Sensors};

type KnobPin = PinDriver<'static, AnyIOPin, Input>;

pub struct BoardInputs {
    encoder_a: KnobPin,
    button: KnobPin,
    samples: Receiver<SensorData>,
    latest: Option<SensorData>,
}

impl BoardInputs {
    pub fn new(
        encoder_a: AnyIOPin,
        button: AnyIOPin,
        samples: Receiver<SensorData>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            encoder_a: pulled_up(encoder_a)?,
            button: pulled_up(button)?,
            samples,
            latest: None,
        })
    }
}

fn pulled_up(pin: AnyIOPin) -> anyhow::Result<KnobPin> {
    let mut driver = PinDriver::input(pin)?;
    driver.set_pull(Pull::Up)?;
    Ok(driver)
}

impl Sensors for BoardInputs {
    fn read_acceleration(&mut self) -> anyhow::Result<SensorData> {
        // Drain the queue, the newest sample wins.
        loop {
            match self.samples.try_recv() {
                Ok(sample) => self.latest = Some(sample),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => anyhow::bail!("sensor task stopped"),
            }
        }
        self.latest
            .ok_or_else(|| anyhow::anyhow!("no accelerometer sample yet"))
    }

    fn read_digital(&mut self, pin: InputPinId) -> bool {
        match pin {
            InputPinId::EncoderA => self.encoder_a.is_high(),
            InputPinId::KnobButton => self.button.is_high(),
        }
    }
}
