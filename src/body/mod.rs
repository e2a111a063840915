// body/mod.rs
// Re-exports for the body module

mod types;
mod effect;

pub use types::*;
pub use effect::*;

#[cfg(test)]
mod tests;
