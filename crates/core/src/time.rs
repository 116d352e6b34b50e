use chrono::{
    DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc,
};

/// A simple clock abstraction for deterministic time in services and tests.
///
/// All readings are device-local wall-clock time; no timezone normalization
/// happens beyond what the local clock reports.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(NaiveDateTime),
}

impl Clock {
    /// Returns a clock that uses the current local time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given local timestamp.
    #[must_use]
    pub fn fixed(at: NaiveDateTime) -> Self {
        Self::Fixed(at)
    }

    /// Returns a clock fixed at midnight of the given local calendar day.
    #[must_use]
    pub fn fixed_on(day: NaiveDate) -> Self {
        Self::Fixed(day.and_time(NaiveTime::MIN))
    }

    /// Returns the current local time according to the clock.
    #[must_use]
    pub fn now(&self) -> NaiveDateTime {
        match self {
            Clock::Default => Local::now().naive_local(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Returns the current local calendar day as a `YYYY-M-D` string.
    ///
    /// Month and day are not zero padded, so `2024-03-07` renders as
    /// `2024-3-7`. Stored streak and badge dates use this exact form.
    #[must_use]
    pub fn today(&self) -> String {
        format_day(self.now().date())
    }

    /// If this is a fixed clock, advance it by the given duration.
    ///
    /// Has no effect on `Clock::Default`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }
}

/// Formats a calendar day as `YYYY-M-D` without zero padding.
#[must_use]
pub fn format_day(day: NaiveDate) -> String {
    format!("{}-{}-{}", day.year(), day.month(), day.day())
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20).
const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic local `NaiveDateTime` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> NaiveDateTime {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
        .naive_utc()
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}
