//! View modes and the mode state machine.

/// The views the dashboard cycles through, in button order.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// Date, weather, temperature and time together.
    #[default]
    Default,
    /// Current conditions in large type.
    Weather,
    /// Latest headlines.
    Headlines,
    /// Full-screen clock.
    Time,
}

impl Mode {
    /// Cycle order.
    pub const ALL: [Mode; 4] = [Mode::Default, Mode::Weather, Mode::Headlines, Mode::Time];

    pub fn index(self) -> usize {
        match self {
            Mode::Default => 0,
            Mode::Weather => 1,
            Mode::Headlines => 2,
            Mode::Time => 3,
        }
    }

    /// The mode after this one; wraps from the last back to the first.
    pub fn next(self) -> Mode {
        Mode::ALL[(self.index() + 1) % Mode::ALL.len()]
    }
}

/// Owns the active mode. Advancing is the only transition.
#[derive(Debug, Default)]
pub struct ModeStateMachine {
    current: Mode,
}

impl ModeStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Mode {
        self.current
    }

    /// Move to the next mode and return it.
    pub fn advance(&mut self) -> Mode {
        self.current = self.current.next();
        self.current
    }
}
