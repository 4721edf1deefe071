// Tilt & Defuse - Game Events & Data Types

use crate::config::*;

// ---------------------------------------------------------------------------
// Sensor Data (3-axis accelerometer reading, m/s^2)
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorData {
    pub ax: f32,
    pub ay: f32,
    pub az: f32,
}

impl SensorData {
    pub const fn new(ax: f32, ay: f32, az: f32) -> Self {
        Self { ax, ay, az }
    }
}

impl Default for SensorData {
    /// Board lying flat, gravity straight down the Z axis.
    fn default() -> Self {
        Self::new(0.0, 0.0, 9.8)
    }
}

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// Per-difficulty knobs of a level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tunables {
    pub time_limit_s: f32,
    pub tilt_tolerance_deg: f32,
    pub knob_tolerance: i32,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Easy => 0,
            Self::Medium => 1,
            Self::Hard => 2,
        }
    }

    /// Move `steps` entries through the menu, wrapping in both directions.
    pub fn cycle(self, steps: i64) -> Self {
        let len = Self::ALL.len() as i64;
        let idx = (self.index() as i64 + steps).rem_euclid(len);
        Self::ALL[idx as usize]
    }

    pub fn tunables(&self) -> Tunables {
        let (time_limit_s, tilt_tolerance_deg, knob_tolerance) = match self {
            Self::Easy => EASY_TUNABLES,
            Self::Medium => MEDIUM_TUNABLES,
            Self::Hard => HARD_TUNABLES,
        };
        Tunables {
            time_limit_s,
            tilt_tolerance_deg,
            knob_tolerance,
        }
    }
}

// ---------------------------------------------------------------------------
// Game phases
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Boot animation, runs once per power-on.
    Booting,
    DifficultySelect,
    /// "Level n/N" card shown before the clock starts.
    LevelIntro,
    LevelActive,
    /// Level solved, more levels to go.
    LevelCleared,
    AllLevelsCleared,
    /// The bomb went off. Lasts one tick.
    Timeout,
    /// Double click during a level.
    PlayerExit,
    ResultDisplay(Outcome),
}
