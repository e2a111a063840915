// body/types.rs
// Contains the Species enum and the Particle record

use serde::{Deserialize, Serialize};
use std::hash::Hash;
use ultraviolet::Vec2;

use crate::species::SpeciesProps;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Species {
    Acid,    // H⁺
    Base,    // OH⁻
    Product, // H₂O
}

impl Species {
    pub const ALL: [Species; 3] = [Species::Acid, Species::Base, Species::Product];

    fn props(&self) -> SpeciesProps {
        crate::species::get_species_props(*self)
    }

    pub fn label(&self) -> &'static str {
        self.props().label
    }

    pub fn formula(&self) -> &'static str {
        self.props().formula
    }

    pub fn default_amplitude(&self) -> f32 {
        self.props().amplitude
    }

    pub fn is_reactant(&self) -> bool {
        matches!(self, Species::Acid | Species::Base)
    }
}

/// A point particle in the unit square. Motion is memoryless, so there is
/// no velocity: each tick adds fresh noise to `pos`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub species: Species,
}

impl Particle {
    pub fn new(pos: Vec2, species: Species) -> Self {
        Self { pos, species }
    }

    /// Uniformly random position in [0, 1)².
    pub fn random(species: Species, rng: &mut fastrand::Rng) -> Self {
        Self::new(Vec2::new(rng.f32(), rng.f32()), species)
    }

    pub fn distance_sq(&self, other: &Particle) -> f32 {
        (self.pos - other.pos).mag_sq()
    }

    pub fn midpoint(&self, other: &Particle) -> Vec2 {
        (self.pos + other.pos) * 0.5
    }

    /// Clip each axis to [0, 1] independently. No reflection.
    pub fn clamp_to_unit(&mut self) {
        self.pos.x = self.pos.x.clamp(0.0, 1.0);
        self.pos.y = self.pos.y.clamp(0.0, 1.0);
    }

    pub fn in_bounds(&self) -> bool {
        (0.0..=1.0).contains(&self.pos.x) && (0.0..=1.0).contains(&self.pos.y)
    }
}
