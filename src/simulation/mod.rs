// simulation/mod.rs
// Re-exports and module declarations for simulation submodules

pub mod collision;
pub mod forces;
pub mod request;
pub mod snapshot;
pub mod store;
pub mod simulation;

pub use collision::{Candidate, Reaction, Reactions};
pub use request::{RunRequest, Solution};
pub use simulation::*;
pub use snapshot::{SpeciesCounts, SpeciesTally, TickSnapshot};
pub use store::ParticleStore;
