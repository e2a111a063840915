// Centralized configuration for simulation parameters

use serde::{Deserialize, Serialize};

use crate::body::Species;
use crate::error::{Result, SimError};

// ====================
// Reaction Parameters
// ====================
/// Maximum acid-base distance (unit square) for a pair to react.
pub const COLLISION_THRESHOLD: f32 = 0.05;

// ====================
// Diffusion Parameters
// ====================
pub const ACID_AMPLITUDE: f32 = 0.03;
pub const BASE_AMPLITUDE: f32 = 0.03;
/// Water diffuses at half the reactant amplitude (heavier molecule).
pub const PRODUCT_AMPLITUDE: f32 = 0.015;

// ====================
// Reaction Effect Parameters
// ====================
pub const EFFECT_MIN_SIZE: f32 = 0.05;
pub const EFFECT_GROWTH_RATE: f32 = 0.005;
pub const EFFECT_MAX_SIZE: f32 = 0.15;
/// Slack for f32 rounding when comparing an effect's size against the maximum.
pub const EFFECT_SIZE_TOLERANCE: f32 = 1.0e-6;

// ====================
// Attraction Parameters
// ====================
/// Attraction is disabled unless a strength above zero is configured.
pub const ATTRACTION_STRENGTH: f32 = 0.0;
/// Pairs closer than this contribute no attraction (direction undefined).
pub const ATTRACTION_EPSILON: f32 = 1.0e-6;

// ====================
// Run Initiation
// ====================
/// Particles per mol when converting concentration x volume to a count.
pub const PARTICLES_PER_MOL: f64 = 10.0;
/// Upper bound on particles per species accepted at run initiation.
pub const MAX_PARTICLES_PER_SPECIES: usize = 100;

// ====================
// Driver
// ====================
pub const DEFAULT_FRAME_DELAY_MS: u64 = 1;
pub const DEFAULT_MAX_TICKS: u64 = 100_000;
/// Candidate search goes parallel once |acid| x |base| reaches this.
pub const PARALLEL_PAIR_THRESHOLD: usize = 4096;

/// How renderers should draw reaction effects. Has no effect on physics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectShape {
    #[default]
    Circle,
    Star,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiffusionAmplitude {
    #[serde(default = "default_acid_amplitude")]
    pub acid: f32,
    #[serde(default = "default_base_amplitude")]
    pub base: f32,
    #[serde(default = "default_product_amplitude")]
    pub product: f32,
}

impl DiffusionAmplitude {
    pub fn for_species(&self, species: Species) -> f32 {
        match species {
            Species::Acid => self.acid,
            Species::Base => self.base,
            Species::Product => self.product,
        }
    }
}

impl Default for DiffusionAmplitude {
    fn default() -> Self {
        Self {
            acid: Species::Acid.default_amplitude(),
            base: Species::Base.default_amplitude(),
            product: Species::Product.default_amplitude(),
        }
    }
}

fn default_acid_amplitude() -> f32 {
    ACID_AMPLITUDE
}

fn default_base_amplitude() -> f32 {
    BASE_AMPLITUDE
}

fn default_product_amplitude() -> f32 {
    PRODUCT_AMPLITUDE
}

fn default_collision_threshold() -> f32 {
    COLLISION_THRESHOLD
}

fn default_effect_min_size() -> f32 {
    EFFECT_MIN_SIZE
}

fn default_effect_growth_rate() -> f32 {
    EFFECT_GROWTH_RATE
}

fn default_effect_max_size() -> f32 {
    EFFECT_MAX_SIZE
}

fn default_attraction_strength() -> f32 {
    ATTRACTION_STRENGTH
}

fn default_parallel_pair_threshold() -> usize {
    PARALLEL_PAIR_THRESHOLD
}

/// Per-run simulation parameters. Every field falls back to its default
/// constant when omitted from a TOML file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default = "default_collision_threshold")]
    pub collision_threshold: f32,
    #[serde(default)]
    pub diffusion: DiffusionAmplitude,
    #[serde(default = "default_effect_min_size")]
    pub effect_min_size: f32,
    #[serde(default = "default_effect_growth_rate")]
    pub effect_growth_rate: f32,
    #[serde(default = "default_effect_max_size")]
    pub effect_max_size: f32,
    /// Displacement per tick pulling each acid-base pair together. 0 disables.
    #[serde(default = "default_attraction_strength")]
    pub attraction_strength: f32,
    /// Only pairs within this distance attract. `None` means every pair.
    #[serde(default)]
    pub attraction_radius: Option<f32>,
    #[serde(default)]
    pub effect_shape: EffectShape,
    #[serde(default = "default_parallel_pair_threshold")]
    pub parallel_pair_threshold: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            collision_threshold: COLLISION_THRESHOLD,
            diffusion: DiffusionAmplitude::default(),
            effect_min_size: EFFECT_MIN_SIZE,
            effect_growth_rate: EFFECT_GROWTH_RATE,
            effect_max_size: EFFECT_MAX_SIZE,
            attraction_strength: ATTRACTION_STRENGTH,
            attraction_radius: None,
            effect_shape: EffectShape::Circle,
            parallel_pair_threshold: PARALLEL_PAIR_THRESHOLD,
        }
    }
}

impl SimConfig {
    pub fn from_preset(preset: Preset) -> Self {
        let base = Self::default();
        match preset {
            Preset::Classic | Preset::Simplified => base,
            Preset::Star => Self {
                effect_shape: EffectShape::Star,
                ..base
            },
            Preset::Pulse => Self {
                effect_min_size: 0.1,
                effect_growth_rate: 0.01,
                effect_max_size: 0.3,
                ..base
            },
        }
    }

    pub fn attraction_enabled(&self) -> bool {
        self.attraction_strength > 0.0
    }

    /// Number of aging steps after which a fresh effect is guaranteed gone.
    pub fn effect_lifetime_ticks(&self) -> u32 {
        let span = (self.effect_max_size - EFFECT_SIZE_TOLERANCE - self.effect_min_size) as f64;
        (span / self.effect_growth_rate as f64).ceil().max(0.0) as u32
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.collision_threshold.is_finite() && self.collision_threshold > 0.0) {
            return Err(SimError::config(format!(
                "collision_threshold must be positive, got {}",
                self.collision_threshold
            )));
        }
        for species in Species::ALL {
            let amp = self.diffusion.for_species(species);
            if !(amp.is_finite() && amp >= 0.0) {
                return Err(SimError::config(format!(
                    "{:?} diffusion amplitude must be >= 0, got {}",
                    species, amp
                )));
            }
        }
        if !(self.effect_min_size.is_finite() && self.effect_min_size >= 0.0) {
            return Err(SimError::config("effect_min_size must be >= 0"));
        }
        if !(self.effect_growth_rate.is_finite() && self.effect_growth_rate > 0.0) {
            return Err(SimError::config("effect_growth_rate must be positive"));
        }
        if !(self.effect_max_size.is_finite() && self.effect_max_size > self.effect_min_size) {
            return Err(SimError::config(
                "effect_max_size must be larger than effect_min_size",
            ));
        }
        if !(self.attraction_strength.is_finite() && self.attraction_strength >= 0.0) {
            return Err(SimError::config("attraction_strength must be >= 0"));
        }
        if let Some(radius) = self.attraction_radius {
            if !(radius.is_finite() && radius > 0.0) {
                return Err(SimError::config("attraction_radius must be positive"));
            }
        }
        Ok(())
    }
}

/// Named parameter sets reproducing the classroom variants of the animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Circular pulses, 0.05 -> 0.15 in 0.005 steps
    Classic,
    /// Same lifecycle as classic, drawn as stars
    Star,
    /// Larger, faster pulses: 0.1 -> 0.3 in 0.01 steps
    Pulse,
    /// Vectorized-distance variant; same parameters as classic
    Simplified,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Classic, Preset::Star, Preset::Pulse, Preset::Simplified];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Classic => "classic",
            Preset::Star => "star",
            Preset::Pulse => "pulse",
            Preset::Simplified => "simplified",
        }
    }

    pub fn from_name(name: &str) -> Option<Preset> {
        Self::ALL.into_iter().find(|p| p.name().eq_ignore_ascii_case(name))
    }
}
