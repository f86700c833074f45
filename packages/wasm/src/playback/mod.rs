//! Playback driver.
//!
//! The driver owns at most one [`AlgorithmRun`] and walks its cursor under
//! user control. It never sleeps: the host reports elapsed time through
//! [`PlaybackDriver::tick`] and polls a [`Frame`] afterwards.
//!
//! ```text
//! idle --start--> running <--pause/resume--> paused
//!                    |                          |
//!                    +---- last step ----> finished
//! running/paused --cancel / input change--> cancelled
//! any --reset--> idle
//! ```

mod cancel;
mod run;

pub use cancel::{CancelToken, Delay};
pub use run::AlgorithmRun;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::VisualizerConfig;
use crate::error::{VizError, VizResult};
use crate::step::Step;
use crate::steppers::{AlgorithmSpec, generate};

/// Driver state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackState {
    Idle,
    Running,
    Paused,
    Finished,
    Cancelled,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Finished => "finished",
            Self::Cancelled => "cancelled",
        })
    }
}

/// What the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// Step under the cursor; `None` when idle.
    pub step: Option<Step>,
    pub cursor: usize,
    pub total: usize,
    pub state: PlaybackState,
}

/// Timer-driven state machine over one run.
#[derive(Debug)]
pub struct PlaybackDriver {
    config: VisualizerConfig,
    state: PlaybackState,
    run: Option<AlgorithmRun>,
    speed_ms: u32,
    token: CancelToken,
    delay: Delay,
}

impl PlaybackDriver {
    /// Create an idle driver. The speed starts at `config.speed_ms`, clamped.
    pub fn new(config: VisualizerConfig) -> Self {
        let speed_ms = config.clamp_speed(config.speed_ms);
        let token = CancelToken::new();
        Self {
            delay: Delay::new(speed_ms, token.clone()),
            config,
            state: PlaybackState::Idle,
            run: None,
            speed_ms,
            token,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    pub fn run(&self) -> Option<&AlgorithmRun> {
        self.run.as_ref()
    }

    pub fn speed_ms(&self) -> u32 {
        self.speed_ms
    }

    /// Token of the current run. Cancelling it stops playback on the next
    /// tick.
    pub fn cancel_token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn cursor(&self) -> usize {
        self.run.as_ref().map_or(0, AlgorithmRun::cursor)
    }

    pub fn total(&self) -> usize {
        self.run.as_ref().map_or(0, AlgorithmRun::len)
    }

    /// Step under the cursor, if a run exists.
    pub fn current_step(&self) -> Option<&Step> {
        self.run.as_ref().and_then(|run| run.current().ok())
    }

    /// Snapshot for rendering.
    pub fn frame(&self) -> Frame {
        Frame {
            step: self.current_step().cloned(),
            cursor: self.cursor(),
            total: self.total(),
            state: self.state,
        }
    }

    // =========================================================================
    // Control actions
    // =========================================================================

    /// Generate the full sequence for `spec` and start playing it.
    ///
    /// Allowed from `idle` and `finished`. A one-step sequence goes straight
    /// to `finished`. On invalid input nothing changes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` from validation, or `InvalidTransition` while
    /// a run is active or cancelled.
    pub fn start(&mut self, spec: AlgorithmSpec) -> VizResult<()> {
        if !matches!(self.state, PlaybackState::Idle | PlaybackState::Finished) {
            return Err(self.refuse("start"));
        }
        let steps = generate(&spec, &self.config.limits)?;
        let run = match AlgorithmRun::new(spec, steps) {
            Ok(run) => run,
            Err(err) => {
                self.fail(&err);
                return Err(err);
            }
        };

        self.token.cancel();
        self.token = CancelToken::new();
        self.delay = Delay::new(self.speed_ms, self.token.clone());
        let single = run.is_at_end();
        debug!(family = run.spec().family(), total = run.len(), "run started");
        self.run = Some(run);
        self.transition(if single {
            PlaybackState::Finished
        } else {
            PlaybackState::Running
        });
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `InvalidTransition` unless running.
    pub fn pause(&mut self) -> VizResult<()> {
        if self.state != PlaybackState::Running {
            return Err(self.refuse("pause"));
        }
        self.transition(PlaybackState::Paused);
        Ok(())
    }

    /// Continue automatic playback; the next advance is a full interval away.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless paused.
    pub fn resume(&mut self) -> VizResult<()> {
        if self.state != PlaybackState::Paused {
            return Err(self.refuse("resume"));
        }
        self.delay.rearm();
        self.transition(PlaybackState::Running);
        Ok(())
    }

    /// Move one step forward and keep playing from there. Reaching the last
    /// step finishes the run; stepping forward when finished does nothing.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` when idle or cancelled.
    pub fn step_forward(&mut self) -> VizResult<()> {
        match self.state {
            PlaybackState::Running | PlaybackState::Paused => {}
            PlaybackState::Finished => return Ok(()),
            PlaybackState::Idle | PlaybackState::Cancelled => {
                return Err(self.refuse("step forward"));
            }
        }
        let Some(run) = self.run.as_mut() else {
            self.fail(&VizError::invariant("no run while stepping forward"));
            return Ok(());
        };
        run.advance();
        if run.is_at_end() {
            self.transition(PlaybackState::Finished);
        } else {
            self.delay.rearm();
            self.transition(PlaybackState::Running);
        }
        Ok(())
    }

    /// Move one step back and keep playing from there. The cursor stops at
    /// the first step.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` when idle or cancelled.
    pub fn step_backward(&mut self) -> VizResult<()> {
        if matches!(self.state, PlaybackState::Idle | PlaybackState::Cancelled) {
            return Err(self.refuse("step backward"));
        }
        let Some(run) = self.run.as_mut() else {
            self.fail(&VizError::invariant("no run while stepping backward"));
            return Ok(());
        };
        run.retreat();
        // A one-step run has nowhere to go back to.
        if !run.is_at_end() {
            self.delay.rearm();
            self.transition(PlaybackState::Running);
        }
        Ok(())
    }

    /// Discard the run and return to `idle`. Allowed from every state.
    pub fn reset(&mut self) {
        self.token.cancel();
        self.run = None;
        self.transition(PlaybackState::Idle);
    }

    /// Stop the active run. The driver stays inert until reset.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless running or paused.
    pub fn cancel(&mut self) -> VizResult<()> {
        if !matches!(self.state, PlaybackState::Running | PlaybackState::Paused) {
            return Err(self.refuse("cancel"));
        }
        self.token.cancel();
        self.transition(PlaybackState::Cancelled);
        Ok(())
    }

    /// Notify the driver that the user edited the input. An active run is
    /// cancelled; returns whether that happened.
    pub fn input_changed(&mut self) -> bool {
        self.cancel().is_ok()
    }

    /// Change the interval between automatic advances. Returns the speed
    /// actually applied after clamping.
    pub fn set_speed(&mut self, speed_ms: u32) -> u32 {
        self.speed_ms = self.config.clamp_speed(speed_ms);
        self.delay.set_interval(self.speed_ms);
        debug!(speed_ms = self.speed_ms, "playback speed changed");
        self.speed_ms
    }

    /// Report elapsed wall time. Advances once per completed interval while
    /// running and returns the number of advances made.
    pub fn tick(&mut self, elapsed_ms: f64) -> usize {
        if self.state != PlaybackState::Running {
            return 0;
        }
        let fires = match self.delay.elapse(elapsed_ms) {
            Ok(fires) => fires,
            Err(VizError::RunCancelled) => {
                self.transition(PlaybackState::Cancelled);
                return 0;
            }
            Err(err) => {
                self.fail(&err);
                return 0;
            }
        };

        let mut advanced = 0;
        for _ in 0..fires {
            if self.token.check().is_err() {
                self.transition(PlaybackState::Cancelled);
                break;
            }
            let Some(run) = self.run.as_mut() else {
                self.fail(&VizError::invariant("running without a run"));
                break;
            };
            if !run.advance() {
                let err = VizError::invariant(format!(
                    "advance past the last step ({} of {})",
                    run.cursor(),
                    run.len()
                ));
                self.fail(&err);
                break;
            }
            advanced += 1;
            if run.is_at_end() {
                self.transition(PlaybackState::Finished);
                break;
            }
        }
        advanced
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn transition(&mut self, next: PlaybackState) {
        if self.state != next {
            debug!(from = %self.state, to = %next, cursor = self.cursor(), "playback transition");
            self.state = next;
        }
    }

    fn refuse(&self, action: &'static str) -> VizError {
        debug!(state = %self.state, action, "control action refused");
        VizError::InvalidTransition {
            from: self.state,
            action,
        }
    }

    /// Log an invariant violation and force the run to finish.
    fn fail(&mut self, err: &VizError) {
        error!(error = %err, "playback invariant violated");
        self.state = PlaybackState::Finished;
    }
}

impl Default for PlaybackDriver {
    fn default() -> Self {
        Self::new(VisualizerConfig::default())
    }
}
