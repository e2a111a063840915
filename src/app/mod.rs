use log::info;
use std::time::Duration;

use crate::config::SimConfig;
use crate::error::Result;
use crate::simulation::RunRequest;

pub mod reporter;
pub mod simulation_loop;

pub use reporter::{
    format_table, ChannelReporter, CollectingReporter, Completion, Fanout, LogReporter,
    NullReporter, ReportEvent, Reporter, StopReason,
};
pub use simulation_loop::{CancelToken, Driver, DriverState};

/// Everything needed to launch one run, resolved from a run file and/or
/// command-line flags.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSettings {
    pub request: RunRequest,
    pub config: SimConfig,
    pub seed: u64,
    pub max_ticks: u64,
    pub frame_delay: Duration,
}

/// Run to completion on the calling thread, reporting to `reporter`.
pub fn run<R: Reporter>(settings: &RunSettings, reporter: R) -> Result<Driver<R>> {
    info!(
        "neutralization run: {} H⁺ vs {} OH⁻, threshold {}, seed {}",
        settings.request.acid,
        settings.request.base,
        settings.config.collision_threshold,
        settings.seed
    );
    let mut driver = Driver::new(settings.config.clone(), reporter)
        .with_frame_delay(settings.frame_delay)
        .with_max_ticks(settings.max_ticks);
    driver.start(settings.request, settings.seed)?;
    driver.run_to_completion()?;
    Ok(driver)
}

#[cfg(test)]
mod tests;
