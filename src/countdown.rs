// Tilt & Defuse - Countdown Beeps
//
// Beeps speed up as the fuse burns down: once a second, then twice, then
// five times a second, and a continuous whine for the final second.  Pure
// function of the clock; the caller keeps `last_mark` between ticks.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Silent,
    Beep,
    /// Hold a steady tone until the level ends.
    Sustain,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeepDecision {
    pub cue: Cue,
    /// Elapsed seconds of the last beep, to pass back next tick.
    pub mark: f32,
}

/// Spacing between beeps for the given seconds left.
pub fn beep_interval(remaining: f32) -> f32 {
    if remaining > 10.0 {
        1.0
    } else if remaining > 5.0 {
        0.5
    } else {
        0.2
    }
}

pub fn next_beep_due(remaining: f32, total: f32, last_mark: f32) -> BeepDecision {
    if remaining <= 1.0 {
        return BeepDecision {
            cue: Cue::Sustain,
            mark: last_mark,
        };
    }

    let elapsed = total - remaining;
    if elapsed - last_mark >= beep_interval(remaining) {
        BeepDecision {
            cue: Cue::Beep,
            mark: elapsed,
        }
    } else {
        BeepDecision {
            cue: Cue::Silent,
            mark: last_mark,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_due_right_after_start() {
        let d = next_beep_due(29.9, 30.0, 0.0);
        assert_eq!(d.cue, Cue::Silent);
        assert_eq!(d.mark, 0.0);
    }

    #[test]
    fn one_beep_after_a_long_gap() {
        let d = next_beep_due(19.0, 30.0, 0.0);
        assert_eq!(d.cue, Cue::Beep);
        assert_eq!(d.mark, 11.0);
        // the mark catches up, so the next tick is quiet again
        let again = next_beep_due(18.99, 30.0, d.mark);
        assert_eq!(again.cue, Cue::Silent);
    }

    #[test]
    fn cadence_tightens_with_remaining_time() {
        assert_eq!(beep_interval(20.0), 1.0);
        assert_eq!(beep_interval(10.0), 0.5);
        assert_eq!(beep_interval(5.0), 0.2);
        assert_eq!(next_beep_due(7.0, 30.0, 22.6).cue, Cue::Silent);
        assert_eq!(next_beep_due(7.0, 30.0, 22.5).cue, Cue::Beep);
    }

    #[test]
    fn final_second_sustains_and_keeps_mark() {
        let d = next_beep_due(1.0, 30.0, 28.8);
        assert_eq!(d.cue, Cue::Sustain);
        assert_eq!(d.mark, 28.8);
        assert_eq!(next_beep_due(0.0, 30.0, 28.8).cue, Cue::Sustain);
    }

    #[test]
    fn ticking_at_100hz_beeps_once_per_second_early_on() {
        let total = 30.0;
        let mut mark = 0.0;
        let mut beeps = 0;
        for tick in 1..=1000 {
            let elapsed = tick as f32 * 0.01;
            let d = next_beep_due(total - elapsed, total, mark);
            mark = d.mark;
            if d.cue == Cue::Beep {
                beeps += 1;
            }
        }
        // elapsed 0..10 s, all with more than 10 s left
        assert!((9..=10).contains(&beeps), "beeps = {}", beeps);
    }
}
