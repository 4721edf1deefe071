// Tilt & Defuse - Rotary Encoder Tracker
//
// Counts detents on the phase-A falling edge only (HIGH -> LOW).  Ignoring
// phase B and every other edge filters out the 4-step quadrature pattern and
// contact bounce, at the price of counting in one direction only.

/// Debounced detent counter fed with raw phase-A samples.
#[derive(Debug, Clone)]
pub struct EncoderTracker {
    count: u32,
    last_phase: bool,
    last_event_ms: u64,
    debounce_ms: u64,
}

impl EncoderTracker {
    /// `initial_phase` is the pin level at construction, `now_ms` the time it
    /// was read.
    pub fn new(initial_phase: bool, now_ms: u64, debounce_ms: u64) -> Self {
        Self {
            count: 0,
            last_phase: initial_phase,
            last_event_ms: now_ms,
            debounce_ms,
        }
    }

    /// Feed one sample.  Returns `true` if a detent was counted.
    pub fn update(&mut self, phase_a: bool, now_ms: u64) -> bool {
        let falling = self.last_phase && !phase_a;
        self.last_phase = phase_a;

        if !falling {
            return false;
        }

        // A clock that went backwards (wrap or reset) never blocks an edge.
        let settled = match now_ms.checked_sub(self.last_event_ms) {
            Some(delta) => delta >= self.debounce_ms,
            None => true,
        };
        if settled {
            self.count += 1;
            self.last_event_ms = now_ms;
        }
        settled
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Zero the count.  Edge timing is left alone so the next real edge is
    /// still judged against the last accepted one.
    pub fn reset(&mut self) {
        self.count = 0;
    }
}
