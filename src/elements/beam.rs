//! Beam element - 2-node planar frame element (beam or truss bar)

use serde::{Deserialize, Serialize};

/// A planar frame element connecting two nodes
///
/// Endpoint order matters: the local x-axis runs from `nodes[0]` to
/// `nodes[1]` and fixes the sign of shear and moment results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamElement {
    /// Indices of the start and end nodes
    pub nodes: [usize; 2],
    /// Index into the material catalog
    pub material: usize,
    /// Index into the section catalog
    pub section: usize,
    /// Pin-ended, axial-only member (bending stiffness suppressed)
    pub truss: bool,

    /// Axial force from the last solve (positive = tension)
    #[serde(skip)]
    pub(crate) axial_force: f64,

    /// Largest end moment magnitude from the last solve
    #[serde(skip)]
    pub(crate) max_moment: f64,

    /// Envelope combined stress from the last solve
    #[serde(skip)]
    pub(crate) stress: f64,
}

impl BeamElement {
    /// Create a new rigid-jointed beam
    pub fn new(i_node: usize, j_node: usize, material: usize, section: usize) -> Self {
        Self {
            nodes: [i_node, j_node],
            material,
            section,
            truss: false,
            axial_force: 0.0,
            max_moment: 0.0,
            stress: 0.0,
        }
    }

    /// Create a new axial-only truss bar
    pub fn truss(i_node: usize, j_node: usize, material: usize, section: usize) -> Self {
        Self::new(i_node, j_node, material, section).as_truss(true)
    }

    /// Set the truss flag
    pub fn as_truss(mut self, truss: bool) -> Self {
        self.truss = truss;
        self
    }

    /// Check whether the element references the given node
    pub fn connects(&self, node: usize) -> bool {
        self.nodes[0] == node || self.nodes[1] == node
    }

    /// Axial force (positive = tension)
    pub fn axial_force(&self) -> f64 {
        self.axial_force
    }

    /// Maximum absolute end moment
    pub fn max_moment(&self) -> f64 {
        self.max_moment
    }

    /// Combined axial + bending stress of the governing fiber
    pub fn stress(&self) -> f64 {
        self.stress
    }

    pub(crate) fn clear_results(&mut self) {
        self.axial_force = 0.0;
        self.max_moment = 0.0;
        self.stress = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beam_creation() {
        let beam = BeamElement::new(0, 1, 0, 2);
        assert_eq!(beam.nodes, [0, 1]);
        assert_eq!(beam.section, 2);
        assert!(!beam.truss);
        assert_eq!(beam.stress(), 0.0);
    }

    #[test]
    fn test_truss_constructor() {
        let bar = BeamElement::truss(3, 5, 1, 1);
        assert!(bar.truss);
        assert!(bar.connects(5));
        assert!(!bar.connects(4));
    }
}
