// Tilt & Defuse - Game State Machine
//
// Boot -> difficulty menu -> level loop -> win/lose -> menu.  Everything is
// driven by `tick(now_ms)` from a fixed-rate loop; the only blocking calls
// are the boot animation and beeps, both paced by the injected delay.

use embedded_hal::delay::DelayNs;
use smart_leds::RGB8;

use crate::config::*;
use crate::countdown::{self, Cue};
use crate::encoder::EncoderTracker;
use crate::events::{Difficulty, Outcome, Phase, SensorData};
use crate::hal::{
    Buzzer, HardwareContext, InputPinId, PixelOutput, Sensors, TextDisplay, PIXEL_KNOB, PIXEL_TILT,
};
use crate::input::{ButtonEdges, Edge, Gesture, GestureDetector};
use crate::level::{LevelSource, LevelSpec, Proximity, SuccessPolicy, TiltTarget};
use crate::tilt::{TiltAngles, TiltEstimator};

/// Live state of the level being played.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameProgress {
    /// Zero-based.
    pub level_index: usize,
    pub difficulty: Difficulty,
    /// Detents since the level started or the knob was last re-centered.
    pub knob_value: i32,
    pub tilt_ok: bool,
    pub knob_ok: bool,
    /// Seconds since the level clock started.
    pub elapsed: f32,
    pub last_beep_mark: f32,
}

#[derive(Debug, Clone, Copy)]
struct ActiveLevel {
    spec: LevelSpec,
    progress: GameProgress,
    started_ms: u64,
}

pub struct Game<D, P, B, S, Dl, L> {
    hw: HardwareContext<D, P, B, S, Dl>,
    levels: L,
    config: GameConfig,
    phase: Phase,

    encoder: EncoderTracker,
    gesture: GestureDetector,
    menu_button: ButtonEdges,
    tilt: TiltEstimator,
    angles: TiltAngles,
    last_sample: SensorData,
    sensor_fault: bool,

    difficulty: Difficulty,
    menu_count: u32,
    level_index: usize,
    active: Option<ActiveLevel>,

    /// End of the current timed card (intro, clear, exit, win).
    hold_until_ms: u64,
    last_render_ms: Option<u64>,
    sustaining: bool,
}

impl<D, P, B, S, Dl, L> Game<D, P, B, S, Dl, L>
where
    D: TextDisplay,
    P: PixelOutput,
    B: Buzzer,
    S: Sensors,
    Dl: DelayNs,
    L: LevelSource,
{
    pub fn new(
        mut hw: HardwareContext<D, P, B, S, Dl>,
        levels: L,
        config: GameConfig,
        now_ms: u64,
    ) -> Self {
        let phase_a = hw.sensors.read_digital(InputPinId::EncoderA);
        Self {
            hw,
            levels,
            phase: Phase::Booting,
            encoder: EncoderTracker::new(phase_a, now_ms, config.encoder_debounce_ms),
            gesture: GestureDetector::new(config.double_click_window_ms),
            menu_button: ButtonEdges::new(false),
            tilt: TiltEstimator::new(config.tilt_alpha, config.axis_convention),
            angles: TiltAngles::default(),
            last_sample: SensorData::default(),
            sensor_fault: false,
            difficulty: Difficulty::default(),
            menu_count: 0,
            level_index: 0,
            active: None,
            hold_until_ms: 0,
            last_render_ms: None,
            sustaining: false,
            config,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn angles(&self) -> TiltAngles {
        self.angles
    }

    pub fn knob_count(&self) -> u32 {
        self.encoder.count()
    }

    /// Progress of the current (or most recently played) level.
    pub fn progress(&self) -> Option<&GameProgress> {
        self.active.as_ref().map(|level| &level.progress)
    }

    pub fn hardware(&self) -> &HardwareContext<D, P, B, S, Dl> {
        &self.hw
    }

    pub fn hardware_mut(&mut self) -> &mut HardwareContext<D, P, B, S, Dl> {
        &mut self.hw
    }

    /// Advance the game by one tick and return the phase it ends in.
    pub fn tick(&mut self, now_ms: u64) -> Phase {
        let pressed = self.sample_inputs(now_ms);

        match self.phase {
            Phase::Booting => {
                self.run_boot_animation();
                self.enter_difficulty_select(pressed);
            }
            Phase::DifficultySelect => self.tick_menu(now_ms, pressed),
            Phase::LevelIntro => {
                if now_ms >= self.hold_until_ms {
                    self.enter_level(now_ms, pressed);
                }
            }
            Phase::LevelActive => self.tick_level(now_ms, pressed),
            Phase::LevelCleared => {
                if now_ms >= self.hold_until_ms {
                    self.enter_intro(now_ms);
                }
            }
            Phase::AllLevelsCleared => {
                if now_ms >= self.hold_until_ms {
                    self.enter_result(Outcome::Won, pressed);
                }
            }
            Phase::Timeout => self.enter_result(Outcome::Lost, pressed),
            Phase::PlayerExit => {
                if now_ms >= self.hold_until_ms {
                    self.enter_difficulty_select(pressed);
                }
            }
            Phase::ResultDisplay(_) => {
                if self.gesture.detect_double_click(pressed, now_ms) {
                    self.hw.beep(self.config.confirm_beep_ms, self.config.beep_intensity);
                    self.enter_difficulty_select(pressed);
                }
            }
        }

        self.phase
    }

    // -----------------------------------------------------------------------
    // Sampling
    // -----------------------------------------------------------------------

    /// Poll encoder and accelerometer.  Returns whether the knob button is
    /// held (active LOW).
    fn sample_inputs(&mut self, now_ms: u64) -> bool {
        let phase_a = self.hw.sensors.read_digital(InputPinId::EncoderA);
        self.encoder.update(phase_a, now_ms);

        match self.hw.sensors.read_acceleration() {
            Ok(sample) => {
                if self.sensor_fault {
                    log::info!("Accelerometer recovered");
                    self.sensor_fault = false;
                }
                self.last_sample = sample;
            }
            // Last good sample stands in; report once per outage.
            Err(e) if !self.sensor_fault => {
                log::warn!("Accelerometer read error: {}", e);
                self.sensor_fault = true;
            }
            Err(_) => {}
        }
        self.angles = self.tilt.update(self.last_sample);

        !self.hw.sensors.read_digital(InputPinId::KnobButton)
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            log::info!("{:?} -> {:?}", self.phase, phase);
        }
        self.phase = phase;
    }

    fn render(&mut self, lines: &[String]) {
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        self.hw.show(&refs);
    }

    // -----------------------------------------------------------------------
    // Boot
    // -----------------------------------------------------------------------

    fn run_boot_animation(&mut self) {
        log::info!("Boot animation");
        let beep_ms = self.config.confirm_beep_ms;
        let intensity = self.config.beep_intensity;
        self.hw.fill(OFF);

        // 3 -> 2 -> 1 zoom
        for n in ["3", "2", "1"] {
            for scale in 1..=3 {
                self.hw.show_centered(n, scale, 80);
            }
            self.hw.fill(WHITE);
            self.hw.beep(beep_ms, intensity);
            self.hw.fill(OFF);
            self.hw.delay.delay_ms(200);
        }

        for scale in 1..=4 {
            self.hw.show_centered("BOOM!", scale, 70);
        }
        for _ in 0..4 {
            self.hw.fill(RED);
            self.hw.beep(beep_ms, intensity);
            self.hw.fill(OFF);
            self.hw.delay.delay_ms(100);
        }

        self.hw.show_title("321 BOOM!", "Tilt & Defuse", 1500);
    }

    // -----------------------------------------------------------------------
    // Difficulty menu
    // -----------------------------------------------------------------------

    fn enter_difficulty_select(&mut self, pressed: bool) {
        self.encoder.reset();
        self.menu_count = 0;
        self.difficulty = Difficulty::Easy;
        self.menu_button = ButtonEdges::new(pressed);
        self.active = None;
        self.sustaining = false;
        self.hw.quiet();
        self.draw_menu();
        self.set_phase(Phase::DifficultySelect);
    }

    fn draw_menu(&mut self) {
        let mut lines = vec![String::from("Select Difficulty:")];
        for d in Difficulty::ALL {
            let marker = if d == self.difficulty { "> " } else { "  " };
            lines.push(format!("{}{}", marker, d.display_name()));
        }
        self.render(&lines);
    }

    fn tick_menu(&mut self, now_ms: u64, pressed: bool) {
        let count = self.encoder.count();
        if count != self.menu_count {
            let steps = count as i64 - self.menu_count as i64;
            self.difficulty = self.difficulty.cycle(steps);
            self.menu_count = count;
            self.draw_menu();
        }

        if self.menu_button.update(pressed) == Some(Edge::Pressed) {
            self.hw.beep(self.config.confirm_beep_ms, self.config.beep_intensity);
            log::info!("Difficulty selected: {}", self.difficulty.display_name());
            self.level_index = 0;
            self.enter_intro(now_ms);
        }
    }

    // -----------------------------------------------------------------------
    // Levels
    // -----------------------------------------------------------------------

    fn enter_intro(&mut self, now_ms: u64) {
        let lines = [
            format!("Level {}/{}", self.level_index + 1, self.config.level_count),
            format!("Difficulty: {}", self.difficulty.display_name()),
        ];
        self.render(&lines);
        self.hold_until_ms = now_ms + self.config.level_intro_ms;
        self.set_phase(Phase::LevelIntro);
    }

    fn enter_level(&mut self, now_ms: u64, pressed: bool) {
        let spec = self.levels.generate(self.difficulty);
        log::info!(
            "Level {}/{} ({}): {:?}",
            self.level_index + 1,
            self.config.level_count,
            self.difficulty.display_name(),
            spec
        );

        self.encoder.reset();
        self.gesture.rearm(pressed);
        self.sustaining = false;
        self.last_render_ms = None;
        self.active = Some(ActiveLevel {
            spec,
            started_ms: now_ms,
            progress: GameProgress {
                level_index: self.level_index,
                difficulty: self.difficulty,
                knob_value: 0,
                tilt_ok: false,
                knob_ok: false,
                elapsed: 0.0,
                last_beep_mark: 0.0,
            },
        });
        self.set_phase(Phase::LevelActive);
        self.render_status(now_ms);
    }

    fn tick_level(&mut self, now_ms: u64, pressed: bool) {
        // ---- exit / knob re-center ----
        match self.gesture.update(pressed, now_ms) {
            Some(Gesture::DoubleClick) => {
                self.player_exit(now_ms);
                return;
            }
            Some(Gesture::SingleClick) => {
                log::debug!("Knob re-centered at {}", self.encoder.count());
                self.encoder.reset();
            }
            None => {}
        }

        let Some(mut level) = self.active else {
            return;
        };
        let spec = level.spec;
        let progress = &mut level.progress;

        let elapsed_ms = now_ms.saturating_sub(level.started_ms);
        progress.elapsed = elapsed_ms as f32 / 1000.0;
        progress.knob_value = self.encoder.count() as i32;
        let remaining = (spec.time_limit_s - progress.elapsed).max(0.0);

        // ---- countdown ----
        let decision =
            countdown::next_beep_due(remaining, spec.time_limit_s, progress.last_beep_mark);
        progress.last_beep_mark = decision.mark;
        match decision.cue {
            Cue::Beep => {
                log::debug!("Beep, {:.1}s left", remaining);
                self.hw.beep(self.config.beep_ms, self.config.beep_intensity);
            }
            Cue::Sustain if !self.sustaining => {
                log::debug!("Final second");
                self.hw.tone(self.config.sustain_intensity);
                self.sustaining = true;
            }
            _ => {}
        }

        // ---- objectives ----
        let tilt = spec.tilt.proximity(self.angles, spec.tilt_tolerance);
        let knob = spec.knob.proximity(progress.knob_value);
        match spec.policy {
            SuccessPolicy::Simultaneous => {
                progress.tilt_ok = tilt == Proximity::On;
                progress.knob_ok = knob == Proximity::On;
            }
            SuccessPolicy::Latching => {
                progress.tilt_ok |= tilt == Proximity::On;
                progress.knob_ok |= knob == Proximity::On;
            }
        }
        let cleared = progress.tilt_ok && progress.knob_ok;

        self.hw.set_pixel(PIXEL_TILT, status_color(progress.tilt_ok, tilt));
        self.hw.set_pixel(PIXEL_KNOB, status_color(progress.knob_ok, knob));

        self.active = Some(level);

        if cleared {
            self.level_cleared(now_ms);
        } else if remaining <= 0.0 {
            log::info!("Level {} timed out", self.level_index + 1);
            self.sustaining = false;
            self.hw.quiet();
            self.set_phase(Phase::Timeout);
        } else {
            let due = match self.last_render_ms {
                None => true,
                Some(last) => now_ms.saturating_sub(last) > self.config.render_interval_ms,
            };
            if due {
                self.render_status(now_ms);
            }
        }
    }

    fn level_cleared(&mut self, now_ms: u64) {
        self.sustaining = false;
        self.hw.tone(0.0);

        let number = self.level_index + 1;
        self.level_index += 1;
        if self.level_index >= self.config.level_count {
            self.render(&[format!("Level {} Clear!", number), "All Levels Cleared!".into()]);
            self.hold_until_ms = now_ms + self.config.win_hold_ms;
            self.set_phase(Phase::AllLevelsCleared);
        } else {
            self.render(&[format!("Level {} Clear!", number), "Next Level...".into()]);
            self.hold_until_ms = now_ms + self.config.level_clear_ms;
            self.set_phase(Phase::LevelCleared);
        }
    }

    fn player_exit(&mut self, now_ms: u64) {
        log::info!("Exit gesture during level {}", self.level_index + 1);
        self.sustaining = false;
        self.hw.quiet();
        self.hw.show(&["EXIT GAME"]);
        self.hold_until_ms = now_ms + self.config.exit_hold_ms;
        self.set_phase(Phase::PlayerExit);
    }

    /// Per-difficulty status screen: Easy shows everything, Medium only the
    /// targets, Hard only the clock.
    fn render_status(&mut self, now_ms: u64) {
        let Some(level) = self.active else {
            return;
        };
        self.last_render_ms = Some(now_ms);

        let spec = level.spec;
        let progress = level.progress;
        let remaining = (spec.time_limit_s - progress.elapsed).max(0.0);
        let header = format!(
            "L{}/{}        {}",
            progress.level_index + 1,
            self.config.level_count,
            progress.difficulty.display_name()
        );
        let target = match spec.tilt {
            TiltTarget::Dual { x, y } => format!("Tilt: {} / {}", x as i32, y as i32),
            TiltTarget::Pitch(p) => format!("Tilt: {}", p as i32),
        };
        let reading = match spec.tilt {
            TiltTarget::Dual { .. } => format!("You: {:.1} / {:.1}", self.angles.a, self.angles.b),
            TiltTarget::Pitch(_) => format!("You: {:.1}", self.angles.a),
        };
        let knob = format!("Knob: {}-{}", spec.knob.min, spec.knob.max);

        let lines = match progress.difficulty {
            Difficulty::Easy => vec![
                header,
                target,
                reading,
                knob,
                format!("You: {}", progress.knob_value),
            ],
            Difficulty::Medium => vec![header, String::new(), target, knob],
            Difficulty::Hard => vec![header, String::new(), format!("Time: {:.1}", remaining)],
        };
        self.render(&lines);
    }

    // -----------------------------------------------------------------------
    // Results
    // -----------------------------------------------------------------------

    fn enter_result(&mut self, outcome: Outcome, pressed: bool) {
        let (title, detail, again) = match outcome {
            Outcome::Won => ("YOU WIN!", "All Levels Cleared!", "play again"),
            Outcome::Lost => ("Game Over", "The bomb exploded!", "try again"),
        };
        self.hw.show(&[title, detail, "", "Double-click to", again]);
        self.sustaining = false;
        self.hw.quiet();
        self.gesture.rearm(pressed);
        self.set_phase(Phase::ResultDisplay(outcome));
    }
}

fn status_color(latched: bool, proximity: Proximity) -> RGB8 {
    if latched {
        return GREEN;
    }
    match proximity {
        Proximity::On => GREEN,
        Proximity::Near => ORANGE,
        Proximity::Off => RED,
    }
}
