//! Section properties for frame elements

use serde::{Deserialize, Serialize};

/// Cross-section properties shared by any number of beams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionProfile {
    /// Display name
    pub name: String,
    /// Cross-sectional area in m²
    pub area: f64,
    /// Moment of inertia about the bending axis in m⁴
    pub moment_of_inertia: f64,
    /// Elastic section modulus (I / c) in m³
    pub section_modulus: f64,
}

impl SectionProfile {
    /// Create a new section with explicit properties
    pub fn new(name: &str, area: f64, moment_of_inertia: f64, section_modulus: f64) -> Self {
        Self {
            name: name.to_string(),
            area,
            moment_of_inertia,
            section_modulus,
        }
    }

    /// Axial-only section: no bending properties
    pub fn axial(name: &str, area: f64) -> Self {
        Self::new(name, area, 0.0, 0.0)
    }

    /// Solid round bar
    pub fn circular(name: &str, diameter: f64) -> Self {
        let r = diameter / 2.0;
        let area = std::f64::consts::PI * r.powi(2);
        let i = std::f64::consts::PI * diameter.powi(4) / 64.0;

        Self::new(name, area, i, i / r)
    }

    /// Solid rectangle bending about the axis parallel to `width`
    pub fn rectangular(name: &str, width: f64, depth: f64) -> Self {
        let area = width * depth;
        let i = width * depth.powi(3) / 12.0;

        Self::new(name, area, i, width * depth.powi(2) / 6.0)
    }

    /// Get the radius of gyration
    pub fn radius_of_gyration(&self) -> f64 {
        (self.moment_of_inertia / self.area).sqrt()
    }
}

impl Default for SectionProfile {
    fn default() -> Self {
        // 1/2" round bar
        Self::circular("Round 12.7mm", 0.0127)
    }
}
