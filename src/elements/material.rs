//! Material catalog entries

use serde::{Deserialize, Serialize};

/// Elastic material shared by any number of beams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialProfile {
    /// Display name
    pub name: String,
    /// Modulus of elasticity (Young's modulus) in Pa
    pub youngs_modulus: f64,
}

impl MaterialProfile {
    /// Create a new material
    pub fn new(name: &str, youngs_modulus: f64) -> Self {
        Self {
            name: name.to_string(),
            youngs_modulus,
        }
    }

    /// Structural steel (30,000 ksi)
    pub fn steel() -> Self {
        Self::new("Steel", 2.068427e11)
    }

    /// Aluminum (11,000 ksi)
    pub fn aluminum() -> Self {
        Self::new("Aluminum", 7.584233e10)
    }
}

impl Default for MaterialProfile {
    fn default() -> Self {
        Self::steel()
    }
}
