//! Elapsed-time clock. Timestamps are milliseconds from `performance.now()`
//! (or any monotonic source in tests).

/// Display text shown before the first tick and after a reset.
pub const ZERO_DISPLAY: &str = "00:00:00";

/// ElapsedClock accumulates running time across pause / resume cycles.
#[derive(Clone, Debug, Default)]
pub struct ElapsedClock {
    start_ms: f64,   // now - elapsed at the last (re)start
    elapsed_ms: f64, // elapsed as of the last tick / pause
    running: bool,
}

impl ElapsedClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin (or resume) counting. Resuming keeps the accumulated elapsed time.
    pub fn start(&mut self, now: f64) {
        self.start_ms = now - self.elapsed_ms;
        self.running = true;
    }

    /// Advance to `now` and return the elapsed milliseconds. A paused clock is frozen.
    pub fn tick(&mut self, now: f64) -> f64 {
        if self.running {
            self.elapsed_ms = (now - self.start_ms).max(0.0);
        }
        self.elapsed_ms
    }

    pub fn pause(&mut self, now: f64) {
        self.tick(now);
        self.running = false;
    }

    pub fn reset(&mut self) {
        self.start_ms = 0.0;
        self.elapsed_ms = 0.0;
        self.running = false;
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

/// Format milliseconds as `hh:mm:ss`. Hours keep counting past 99.
pub fn format_hms(ms: f64) -> String {
    let total = if ms.is_finite() && ms > 0.0 { ms as u64 } else { 0 };
    let hrs = total / 3_600_000;
    let mins = (total % 3_600_000) / 60_000;
    let secs = (total % 60_000) / 1000;
    format!("{hrs:02}:{mins:02}:{secs:02}")
}

/// Whole `period_ms` spans between `*mark` and `now`. Advances `mark` by exactly
/// that many periods so the fractional remainder carries into the next call.
pub fn take_whole_periods(mark: &mut f64, now: f64, period_ms: f64) -> u32 {
    if period_ms.is_nan() || period_ms <= 0.0 || now < *mark {
        return 0;
    }
    let n = ((now - *mark) / period_ms).floor();
    *mark += n * period_ms;
    n.min(u32::MAX as f64) as u32
}
