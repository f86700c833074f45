//! Cooperative cancellation for timer-driven playback.
//!
//! Everything runs on the browser's single thread, so the token is a shared
//! `Rc<Cell<bool>>` rather than an atomic.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::{VizError, VizResult};

/// Shared cancellation flag for one run.
///
/// Clones observe the same flag. A cancelled token never resets; a new run
/// gets a new token.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag for every clone.
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }

    /// `Err(RunCancelled)` once the flag is raised.
    ///
    /// # Errors
    ///
    /// Returns `VizError::RunCancelled` if the token was cancelled.
    pub fn check(&self) -> VizResult<()> {
        if self.is_cancelled() {
            Err(VizError::RunCancelled)
        } else {
            Ok(())
        }
    }
}

/// Countdown between automatic advances.
///
/// The host reports elapsed wall time through [`elapse`](Self::elapse);
/// the delay answers how many intervals completed.
#[derive(Debug, Clone)]
pub struct Delay {
    interval_ms: f64,
    remaining_ms: f64,
    token: CancelToken,
}

impl Delay {
    pub fn new(interval_ms: u32, token: CancelToken) -> Self {
        let interval_ms = f64::from(interval_ms.max(1));
        Self {
            interval_ms,
            remaining_ms: interval_ms,
            token,
        }
    }

    /// Restart the countdown from a full interval.
    pub fn rearm(&mut self) {
        self.remaining_ms = self.interval_ms;
    }

    /// Change the interval. A pending wait never gets longer than the new
    /// interval.
    pub fn set_interval(&mut self, interval_ms: u32) {
        self.interval_ms = f64::from(interval_ms.max(1));
        self.remaining_ms = self.remaining_ms.min(self.interval_ms);
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Time left until the next advance.
    pub fn remaining_ms(&self) -> f64 {
        self.remaining_ms
    }

    /// Count down by `elapsed_ms` and return the number of intervals that
    /// completed. Negative and NaN elapsed times count as zero; the count
    /// saturates at `usize::MAX`.
    ///
    /// # Errors
    ///
    /// Returns `VizError::RunCancelled` if the token was cancelled before
    /// the wait completed.
    pub fn elapse(&mut self, elapsed_ms: f64) -> VizResult<usize> {
        self.token.check()?;
        if !(elapsed_ms > 0.0) {
            return Ok(0);
        }
        if elapsed_ms < self.remaining_ms {
            self.remaining_ms -= elapsed_ms;
            return Ok(0);
        }
        if elapsed_ms.is_infinite() {
            self.rearm();
            return Ok(usize::MAX);
        }
        let overshoot = elapsed_ms - self.remaining_ms;
        let extra = (overshoot / self.interval_ms).floor();
        self.remaining_ms = self.interval_ms - overshoot.rem_euclid(self.interval_ms);
        // `as` saturates for floats past the integer range.
        Ok(1usize.saturating_add(extra as usize))
    }
}
