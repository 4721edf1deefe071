// Tilt & Defuse - Knob Button Input
//
// Non-blocking press classification for the encoder push button.  Polled
// from the game tick with the already-debounced "pressed" level (pull-up +
// switch settle time does the filtering) and the current time.

// ---------------------------------------------------------------------------
// Raw edges
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Pressed,
    Released,
}

#[derive(Debug, Clone)]
pub struct ButtonEdges {
    last_pressed: bool,
}

impl ButtonEdges {
    pub fn new(pressed: bool) -> Self {
        Self {
            last_pressed: pressed,
        }
    }

    pub fn update(&mut self, pressed: bool) -> Option<Edge> {
        let edge = match (self.last_pressed, pressed) {
            (false, true) => Some(Edge::Pressed),
            (true, false) => Some(Edge::Released),
            _ => None,
        };
        self.last_pressed = pressed;
        edge
    }
}

// ---------------------------------------------------------------------------
// Click gestures
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// One press/release and nothing else within the window.
    SingleClick,
    /// Second press arrived within the window after the first release.
    DoubleClick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClickState {
    Idle,
    WaitingRelease,
    ArmedForSecond { deadline_ms: u64 },
}

#[derive(Debug, Clone)]
pub struct GestureDetector {
    edges: ButtonEdges,
    state: ClickState,
    window_ms: u64,
}

impl GestureDetector {
    pub fn new(window_ms: u64) -> Self {
        Self {
            edges: ButtonEdges::new(false),
            state: ClickState::Idle,
            window_ms,
        }
    }

    /// Drop any half-seen gesture.  `pressed` is the current level so a
    /// button already held down is not taken as a fresh press.
    pub fn rearm(&mut self, pressed: bool) {
        self.edges = ButtonEdges::new(pressed);
        self.state = ClickState::Idle;
    }

    /// Call every tick.
    pub fn update(&mut self, pressed: bool, now_ms: u64) -> Option<Gesture> {
        let edge = self.edges.update(pressed);

        // ---- window expiry ----
        let mut expired = false;
        if let ClickState::ArmedForSecond { deadline_ms } = self.state {
            if now_ms > deadline_ms {
                self.state = ClickState::Idle;
                expired = true;
            }
        }

        let gesture = match (self.state, edge) {
            (ClickState::Idle, Some(Edge::Pressed)) => {
                self.state = ClickState::WaitingRelease;
                None
            }
            (ClickState::WaitingRelease, Some(Edge::Released)) => {
                self.state = ClickState::ArmedForSecond {
                    deadline_ms: now_ms + self.window_ms,
                };
                None
            }
            (ClickState::ArmedForSecond { .. }, Some(Edge::Pressed)) => {
                self.state = ClickState::Idle;
                Some(Gesture::DoubleClick)
            }
            _ => None,
        };

        if expired && gesture.is_none() {
            Some(Gesture::SingleClick)
        } else {
            gesture
        }
    }

    /// Same as [`update`](Self::update) but single clicks are swallowed.
    pub fn detect_double_click(&mut self, pressed: bool, now_ms: u64) -> bool {
        matches!(self.update(pressed, now_ms), Some(Gesture::DoubleClick))
    }
}
