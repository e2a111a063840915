// error.rs
// Error type shared by run initiation, configuration loading and the driver

use thiserror::Error;

/// Unified error type for the neutralization simulator.
///
/// All variants are boundary rejections: nothing here is raised mid-tick.
#[derive(Error, Debug)]
pub enum SimError {
    /// A particle count was negative
    #[error("invalid {species} count: {count} (must be zero or positive)")]
    InvalidCount { species: &'static str, count: i64 },

    /// A particle count was above the per-species cap
    #[error("too many {species} particles: {count} (limit {limit})")]
    TooManyParticles {
        species: &'static str,
        count: u64,
        limit: usize,
    },

    /// A concentration or volume was negative or not finite
    #[error("invalid {species} solution: {message}")]
    InvalidSolution {
        species: &'static str,
        message: String,
    },

    /// Simulation parameters failed validation
    #[error("configuration error: {0}")]
    InvalidConfig(String),

    /// `start` was called while a run was still in progress
    #[error("a run is already in progress")]
    AlreadyRunning,

    /// A step was requested with no run in progress
    #[error("no run in progress")]
    NotRunning,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl SimError {
    pub fn config(message: impl Into<String>) -> Self {
        SimError::InvalidConfig(message.into())
    }

    pub fn solution(species: &'static str, message: impl Into<String>) -> Self {
        SimError::InvalidSolution {
            species,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
