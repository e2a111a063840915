// simulation/request.rs
// Validates user-submitted initial amounts before any run state exists

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Validated initial particle counts for one run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    pub acid: usize,
    pub base: usize,
}

impl RunRequest {
    /// Accept signed counts so that negative input is rejected here rather
    /// than wrapping somewhere upstream.
    pub fn from_counts(acid: i64, base: i64, limit: usize) -> Result<Self> {
        Ok(Self {
            acid: checked_count("acid", acid, limit)?,
            base: checked_count("base", base, limit)?,
        })
    }

    /// Titration-style initiation: each side is a concentration and a volume.
    pub fn from_solutions(
        acid: Solution,
        base: Solution,
        particles_per_mol: f64,
        limit: usize,
    ) -> Result<Self> {
        let acid_count = acid.particle_count("acid", particles_per_mol)?;
        let base_count = base.particle_count("base", particles_per_mol)?;
        Self::from_counts(acid_count, base_count, limit)
    }

    pub fn is_degenerate(&self) -> bool {
        self.acid == 0 || self.base == 0
    }
}

fn checked_count(species: &'static str, count: i64, limit: usize) -> Result<usize> {
    if count < 0 {
        return Err(SimError::InvalidCount { species, count });
    }
    let count = count as u64;
    if count > limit as u64 {
        return Err(SimError::TooManyParticles {
            species,
            count,
            limit,
        });
    }
    Ok(count as usize)
}

/// An amount of acid or base solution.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub concentration_mol_per_l: f64,
    pub volume_ml: f64,
}

impl Solution {
    pub fn new(concentration_mol_per_l: f64, volume_ml: f64) -> Self {
        Self {
            concentration_mol_per_l,
            volume_ml,
        }
    }

    pub fn moles(&self) -> f64 {
        self.concentration_mol_per_l * self.volume_ml / 1000.0
    }

    /// `round(concentration × litres × particles_per_mol)`
    pub fn particle_count(&self, species: &'static str, particles_per_mol: f64) -> Result<i64> {
        if !self.concentration_mol_per_l.is_finite() || self.concentration_mol_per_l < 0.0 {
            return Err(SimError::solution(
                species,
                format!("concentration {} mol/L", self.concentration_mol_per_l),
            ));
        }
        if !self.volume_ml.is_finite() || self.volume_ml < 0.0 {
            return Err(SimError::solution(species, format!("volume {} mL", self.volume_ml)));
        }
        if !particles_per_mol.is_finite() || particles_per_mol <= 0.0 {
            return Err(SimError::solution(
                species,
                format!("scale {} particles/mol", particles_per_mol),
            ));
        }
        let count = (self.moles() * particles_per_mol).round();
        if count > i64::MAX as f64 {
            return Err(SimError::solution(species, "particle count overflows"));
        }
        Ok(count as i64)
    }
}
