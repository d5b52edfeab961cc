use chrono::{DateTime, Utc};

/// A simple wall-clock abstraction for deterministic timestamps in sessions and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }
}

//
// ─── STOPWATCH ─────────────────────────────────────────────────────────────────
//

/// Whole-second elapsed counter driven by external ticks.
///
/// The stopwatch never reads the system time itself. Whoever owns the periodic
/// interrupt calls [`Stopwatch::tick`]; ticks that arrive while the stopwatch is
/// stopped are dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stopwatch {
    elapsed_secs: u64,
    running: bool,
}

impl Stopwatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Stops the stopwatch and zeroes the elapsed counter.
    pub fn reset(&mut self) {
        self.running = false;
        self.elapsed_secs = 0;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// Adds one second. Returns `false` if the tick was ignored.
    pub fn tick(&mut self) -> bool {
        self.advance(1)
    }

    /// Adds `secs` seconds. Returns `false` if the stopwatch is stopped.
    pub fn advance(&mut self, secs: u64) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed_secs = self.elapsed_secs.saturating_add(secs);
        true
    }
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}
