// Tilt & Defuse - Game Task
//
// Runs the game tick at 100 Hz on the calling thread.  Phase A is sampled
// once per tick, so the loop period bounds how fast the knob can be spun.

use std::thread;
use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;

use crate::config::*;
use crate::game::Game;
use crate::hal::{Buzzer, PixelOutput, Sensors, TextDisplay};
use crate::level::LevelSource;

pub fn game_task<D, P, B, S, Dl, L>(mut game: Game<D, P, B, S, Dl, L>) -> !
where
    D: TextDisplay,
    P: PixelOutput,
    B: Buzzer,
    S: Sensors,
    Dl: DelayNs,
    L: LevelSource,
{
    log::info!("Game task started");

    let interval = Duration::from_millis(GAME_TICK_INTERVAL_MS);

    loop {
        let tick_start = Instant::now();

        game.tick(crate::now_ms());

        // Blocking beeps and the boot animation overrun the period; just
        // carry on from wherever the clock is.
        let elapsed = tick_start.elapsed();
        if elapsed < interval {
            thread::sleep(interval - elapsed);
        }
    }
}
