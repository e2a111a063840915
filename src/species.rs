use crate::body::Species;
use crate::config;

#[derive(Clone, Copy, Debug)]
pub struct SpeciesProps {
    pub label: &'static str,
    pub formula: &'static str,
    /// Default per-axis displacement bound per tick
    pub amplitude: f32,
}

pub fn get_species_props(species: Species) -> SpeciesProps {
    match species {
        Species::Acid => SpeciesProps {
            label: "H⁺ (acid)",
            formula: "H⁺",
            amplitude: config::ACID_AMPLITUDE,
        },
        Species::Base => SpeciesProps {
            label: "OH⁻ (base)",
            formula: "OH⁻",
            amplitude: config::BASE_AMPLITUDE,
        },
        Species::Product => SpeciesProps {
            label: "H₂O (water)",
            formula: "H₂O",
            amplitude: config::PRODUCT_AMPLITUDE,
        },
    }
}
