// Tilt & Defuse - Level Generator
//
// Each level asks for a tilt and a knob position.  Targets are either drawn
// at random inside physically comfortable bounds or fixed, with difficulty
// deciding tolerance and time limit.

use rand::Rng;

use crate::config::*;
use crate::events::Difficulty;
use crate::tilt::TiltAngles;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelMode {
    Randomized,
    Fixed,
}

/// How the tilt and knob objectives combine into "level cleared".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessPolicy {
    /// Both objectives must hold in the same tick.
    Simultaneous,
    /// Each objective latches once met; the level clears when both have.
    Latching,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TiltTarget {
    /// Match both axis angles.
    Dual { x: f32, y: f32 },
    /// Match pitch only.
    Pitch(f32),
}

/// How close the live tilt is to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proximity {
    On,
    Near,
    Off,
}

impl TiltTarget {
    pub fn proximity(&self, angles: TiltAngles, tolerance: f32) -> Proximity {
        let near = tolerance * TILT_NEAR_FACTOR;
        match *self {
            TiltTarget::Dual { x, y } => {
                let dx = (angles.a - x).abs();
                let dy = (angles.b - y).abs();
                if dx <= tolerance && dy <= tolerance {
                    Proximity::On
                } else if dx <= near || dy <= near {
                    Proximity::Near
                } else {
                    Proximity::Off
                }
            }
            TiltTarget::Pitch(pitch) => {
                let d = (angles.a - pitch).abs();
                if d <= tolerance {
                    Proximity::On
                } else if d <= near {
                    Proximity::Near
                } else {
                    Proximity::Off
                }
            }
        }
    }
}

/// Inclusive detent window, counted from the knob position at level start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnobWindow {
    pub min: i32,
    pub max: i32,
}

impl KnobWindow {
    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn proximity(&self, value: i32) -> Proximity {
        if self.contains(value) {
            Proximity::On
        } else if (self.min - 1..=self.max + 1).contains(&value) {
            Proximity::Near
        } else {
            Proximity::Off
        }
    }
}

/// Everything that defines one level.  Immutable once generated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelSpec {
    pub tilt: TiltTarget,
    pub tilt_tolerance: f32,
    pub knob: KnobWindow,
    pub time_limit_s: f32,
    pub policy: SuccessPolicy,
}

/// Supplies the next level to the game.
pub trait LevelSource {
    fn generate(&mut self, difficulty: Difficulty) -> LevelSpec;
}

pub struct LevelGenerator<R> {
    rng: R,
    mode: LevelMode,
}

impl<R: Rng> LevelGenerator<R> {
    pub fn new(rng: R, mode: LevelMode) -> Self {
        Self { rng, mode }
    }
}

impl<R: Rng> LevelSource for LevelGenerator<R> {
    fn generate(&mut self, difficulty: Difficulty) -> LevelSpec {
        let tunables = difficulty.tunables();
        match self.mode {
            LevelMode::Randomized => {
                let bound = RANDOM_TILT_BOUND_DEG;
                let x = self.rng.gen_range(-bound..=bound);
                let y = self.rng.gen_range(-bound..=bound);
                let min = self
                    .rng
                    .gen_range(RANDOM_KNOB_MIN_LOW..=RANDOM_KNOB_MIN_HIGH);
                LevelSpec {
                    tilt: TiltTarget::Dual { x, y },
                    tilt_tolerance: tunables.tilt_tolerance_deg,
                    knob: KnobWindow {
                        min,
                        max: min + RANDOM_KNOB_WINDOW,
                    },
                    time_limit_s: tunables.time_limit_s,
                    policy: SuccessPolicy::Simultaneous,
                }
            }
            LevelMode::Fixed => LevelSpec {
                tilt: TiltTarget::Pitch(FIXED_TILT_PITCH_DEG),
                tilt_tolerance: tunables.tilt_tolerance_deg,
                knob: KnobWindow {
                    min: FIXED_KNOB_TARGET - tunables.knob_tolerance,
                    max: FIXED_KNOB_TARGET + tunables.knob_tolerance,
                },
                time_limit_s: tunables.time_limit_s,
                policy: SuccessPolicy::Latching,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn randomized_levels_stay_in_bounds() {
        let rng = ChaCha8Rng::seed_from_u64(0x321B);
        let mut gen = LevelGenerator::new(rng, LevelMode::Randomized);
        for i in 0..10_000 {
            let difficulty = Difficulty::ALL[i % 3];
            let level = gen.generate(difficulty);
            match level.tilt {
                TiltTarget::Dual { x, y } => {
                    assert!((-45.0..=45.0).contains(&x), "x = {}", x);
                    assert!((-45.0..=45.0).contains(&y), "y = {}", y);
                }
                other => panic!("unexpected target {:?}", other),
            }
            assert!((1..=8).contains(&level.knob.min));
            assert_eq!(level.knob.max, level.knob.min + 2);
            assert_eq!(level.policy, SuccessPolicy::Simultaneous);
            assert_eq!(level.time_limit_s, difficulty.tunables().time_limit_s);
        }
    }

    #[test]
    fn randomized_levels_actually_vary() {
        let rng = ChaCha8Rng::seed_from_u64(7);
        let mut gen = LevelGenerator::new(rng, LevelMode::Randomized);
        let first = gen.generate(Difficulty::Easy);
        let differs = (0..20).any(|_| gen.generate(Difficulty::Easy) != first);
        assert!(differs);
    }

    #[test]
    fn fixed_levels_scale_window_with_difficulty() {
        let rng = ChaCha8Rng::seed_from_u64(1);
        let mut gen = LevelGenerator::new(rng, LevelMode::Fixed);
        let easy = gen.generate(Difficulty::Easy);
        let hard = gen.generate(Difficulty::Hard);
        assert_eq!(easy.tilt, TiltTarget::Pitch(FIXED_TILT_PITCH_DEG));
        assert_eq!(easy.knob, KnobWindow { min: 4, max: 8 });
        assert_eq!(hard.knob, KnobWindow { min: 6, max: 6 });
        assert!(hard.tilt_tolerance < easy.tilt_tolerance);
        assert_eq!(easy.policy, SuccessPolicy::Latching);
        // reachable from a freshly reset encoder
        assert!(easy.knob.min > 0 && hard.knob.max <= 10);
    }

    #[test]
    fn dual_proximity_bands() {
        let target = TiltTarget::Dual { x: 10.0, y: 10.0 };
        let at = |a, b| target.proximity(TiltAngles { a, b }, 5.0);
        assert_eq!(at(9.0, 11.0), Proximity::On);
        assert_eq!(at(15.0, 5.0), Proximity::On);
        assert_eq!(at(19.0, 40.0), Proximity::Near);
        assert_eq!(at(-20.0, 40.0), Proximity::Off);
    }

    #[test]
    fn knob_window_bands() {
        let window = KnobWindow { min: 3, max: 5 };
        assert_eq!(window.proximity(4), Proximity::On);
        assert_eq!(window.proximity(2), Proximity::Near);
        assert_eq!(window.proximity(6), Proximity::Near);
        assert_eq!(window.proximity(0), Proximity::Off);
    }
}
