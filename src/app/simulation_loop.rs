// app/simulation_loop.rs
// Drives one run tick by tick and hands every frame to a Reporter

use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::reporter::{Completion, Reporter, StopReason};
use crate::config::{SimConfig, DEFAULT_FRAME_DELAY_MS, DEFAULT_MAX_TICKS};
use crate::error::{Result, SimError};
use crate::simulation::{RunRequest, SimulationRun, TickSnapshot};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    /// No run has been started
    Idle,
    Running,
    /// The last run stopped; a new one may be started
    Terminal,
}

/// Stop request observed at the top of the next tick, never mid-tick.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

pub struct Driver<R: Reporter> {
    config: SimConfig,
    reporter: R,
    run: Option<SimulationRun>,
    state: DriverState,
    completion: Option<Completion>,
    frame_delay: Duration,
    max_ticks: u64,
    cancel: CancelToken,
}

impl<R: Reporter> Driver<R> {
    pub fn new(config: SimConfig, reporter: R) -> Self {
        Self {
            config,
            reporter,
            run: None,
            state: DriverState::Idle,
            completion: None,
            frame_delay: Duration::from_millis(DEFAULT_FRAME_DELAY_MS),
            max_ticks: DEFAULT_MAX_TICKS,
            cancel: CancelToken::new(),
        }
    }

    /// Pause between frames. Zero disables pacing (headless and tests).
    pub fn with_frame_delay(mut self, delay: Duration) -> Self {
        self.frame_delay = delay;
        self
    }

    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    /// Share an existing token, e.g. one held by a UI thread.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn run(&self) -> Option<&SimulationRun> {
        self.run.as_ref()
    }

    pub fn completion(&self) -> Option<&Completion> {
        self.completion.as_ref()
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }

    /// Create a run from validated counts and begin it.
    pub fn start(&mut self, request: RunRequest, seed: u64) -> Result<()> {
        if self.state == DriverState::Running {
            return Err(SimError::AlreadyRunning);
        }
        let run = SimulationRun::new(request, self.config.clone(), seed)?;
        self.start_run(run)
    }

    /// Begin a prepared run (restored from disk or laid out by hand).
    /// A run with no acid or no base goes straight to Terminal.
    pub fn start_run(&mut self, run: SimulationRun) -> Result<()> {
        if self.state == DriverState::Running {
            return Err(SimError::AlreadyRunning);
        }
        info!(
            "starting run: {} acid, {} base (seed {})",
            run.store.acid.len(),
            run.store.base.len(),
            run.seed
        );
        self.cancel.reset();
        self.completion = None;
        let terminal = run.is_terminal();
        self.run = Some(run);
        self.state = DriverState::Running;
        if terminal {
            self.finish(StopReason::Exhausted)?;
        }
        Ok(())
    }

    /// Advance exactly one tick and report it.
    pub fn step_once(&mut self) -> Result<TickSnapshot> {
        if self.state != DriverState::Running {
            return Err(SimError::NotRunning);
        }
        let run = self.run.as_mut().ok_or(SimError::NotRunning)?;
        let outcome = run.step();
        let snapshot = run.snapshot(outcome.reacted_pairs);
        let terminal = run.is_terminal();
        self.reporter.on_snapshot(&snapshot);
        if terminal {
            self.finish(StopReason::Exhausted)?;
        }
        Ok(snapshot)
    }

    /// Tick until a reactant runs out, the token is cancelled or the tick
    /// ceiling is hit.
    pub fn run_to_completion(&mut self) -> Result<Completion> {
        loop {
            match self.state {
                DriverState::Idle => return Err(SimError::NotRunning),
                DriverState::Terminal => {
                    return self.completion.clone().ok_or(SimError::NotRunning);
                }
                DriverState::Running => {}
            }

            if self.cancel.is_cancelled() {
                self.finish(StopReason::Cancelled)?;
                continue;
            }
            let tick = self.run.as_ref().map_or(0, |r| r.tick);
            if tick >= self.max_ticks {
                self.finish(StopReason::TickLimit)?;
                continue;
            }

            self.step_once()?;

            if self.state == DriverState::Running && !self.frame_delay.is_zero() {
                std::thread::sleep(self.frame_delay);
            }
        }
    }

    fn finish(&mut self, reason: StopReason) -> Result<()> {
        let run = self.run.as_ref().ok_or(SimError::NotRunning)?;
        let completion = Completion {
            ticks: run.tick,
            total_reacted: run.total_reacted,
            counts: run.counts(),
            reason,
        };
        info!(
            "run stopped ({:?}) after {} ticks with {} reactions",
            reason, completion.ticks, completion.total_reacted
        );
        self.reporter.on_complete(&completion);
        self.completion = Some(completion);
        self.state = DriverState::Terminal;
        Ok(())
    }
}
