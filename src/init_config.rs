// init_config.rs
// Loads a run description (particles or titration amounts, parameters, pacing) from TOML

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::app::RunSettings;
use crate::config::{
    Preset, SimConfig, DEFAULT_FRAME_DELAY_MS, DEFAULT_MAX_TICKS, MAX_PARTICLES_PER_SPECIES,
    PARTICLES_PER_MOL,
};
use crate::error::{Result, SimError};
use crate::simulation::{RunRequest, Solution};

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct InitConfig {
    #[serde(default)]
    pub simulation: SimulationSection,
    #[serde(default)]
    pub run: RunSection,
    pub particles: Option<ParticlesSection>,
    pub titration: Option<TitrationSection>,
}

/// A preset plus any `SimConfig` fields to override on top of it.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct SimulationSection {
    pub preset: Option<Preset>,
    #[serde(flatten)]
    pub overrides: toml::Table,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct RunSection {
    /// Fixed seed for a reproducible run. Random when omitted.
    pub seed: Option<u64>,
    pub max_ticks: Option<u64>,
    pub frame_delay_ms: Option<u64>,
    /// Per-species cap at run initiation
    pub max_particles: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ParticlesSection {
    /// Signed so that a negative value reaches validation instead of failing to parse
    pub acid: i64,
    pub base: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct TitrationSection {
    pub acid_concentration: f64,
    pub acid_volume_ml: f64,
    pub base_concentration: f64,
    pub base_volume_ml: f64,
    pub particles_per_mol: Option<f64>,
}

/// Merge `overrides` into `base`; nested tables merge key by key.
fn merge_tables(base: &mut toml::Table, overrides: &toml::Table) {
    for (key, value) in overrides {
        match (base.get_mut(key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(inner)) => {
                merge_tables(existing, inner);
            }
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

impl InitConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Starting point written by `neutralization_sim config`: 25 of each species.
    pub fn example() -> Self {
        Self {
            simulation: SimulationSection {
                preset: Some(Preset::Classic),
                overrides: toml::Table::new(),
            },
            run: RunSection {
                seed: None,
                max_ticks: Some(DEFAULT_MAX_TICKS),
                frame_delay_ms: Some(DEFAULT_FRAME_DELAY_MS),
                max_particles: Some(MAX_PARTICLES_PER_SPECIES),
            },
            particles: Some(ParticlesSection { acid: 25, base: 25 }),
            titration: None,
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SimError::config(e.to_string()))
    }

    pub fn sim_config(&self) -> Result<SimConfig> {
        let base = SimConfig::from_preset(self.simulation.preset.unwrap_or(Preset::Classic));
        if self.simulation.overrides.is_empty() {
            return Ok(base);
        }
        let mut table = match toml::Value::try_from(&base) {
            Ok(toml::Value::Table(table)) => table,
            Ok(_) => return Err(SimError::config("simulation parameters are not a table")),
            Err(e) => return Err(SimError::config(e.to_string())),
        };
        merge_tables(&mut table, &self.simulation.overrides);
        let config: SimConfig = toml::Value::Table(table).try_into()?;
        config.validate()?;
        Ok(config)
    }

    pub fn request(&self) -> Result<RunRequest> {
        let limit = self.run.max_particles.unwrap_or(MAX_PARTICLES_PER_SPECIES);
        match (&self.particles, &self.titration) {
            (Some(p), None) => RunRequest::from_counts(p.acid, p.base, limit),
            (None, Some(t)) => RunRequest::from_solutions(
                Solution::new(t.acid_concentration, t.acid_volume_ml),
                Solution::new(t.base_concentration, t.base_volume_ml),
                t.particles_per_mol.unwrap_or(PARTICLES_PER_MOL),
                limit,
            ),
            (Some(_), Some(_)) => Err(SimError::config(
                "give either [particles] or [titration], not both",
            )),
            (None, None) => Err(SimError::config("missing [particles] or [titration] section")),
        }
    }

    /// Resolve into launch settings. A missing seed is drawn at random.
    pub fn settings(&self) -> Result<RunSettings> {
        Ok(RunSettings {
            request: self.request()?,
            config: self.sim_config()?,
            seed: self.run.seed.unwrap_or_else(|| fastrand::u64(..)),
            max_ticks: self.run.max_ticks.unwrap_or(DEFAULT_MAX_TICKS),
            frame_delay: Duration::from_millis(self.run.frame_delay_ms.unwrap_or(DEFAULT_FRAME_DELAY_MS)),
        })
    }
}
