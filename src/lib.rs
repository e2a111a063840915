pub mod app;
pub mod body;
pub mod config;
pub mod error;
pub mod init_config;
pub mod io;
pub mod simulation;
pub mod species;

pub use app::{Completion, Driver, DriverState, Reporter, RunSettings, StopReason};
pub use body::{Particle, ReactionEffect, Species};
pub use config::{EffectShape, Preset, SimConfig};
pub use error::{Result, SimError};
pub use simulation::{ParticleStore, RunRequest, SimulationRun, Solution, TickSnapshot};
