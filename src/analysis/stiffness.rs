//! Element stiffness formulation

use log::{debug, trace};

use crate::analysis::AnalysisOptions;
use crate::elements::{BeamElement, MaterialProfile, Node, SectionProfile};
use crate::error::{FEAError, FEAResult};
use crate::math::{self, Mat6};

/// Length and orientation of an element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementGeometry {
    pub length: f64,
    /// cos of the element axis angle
    pub c: f64,
    /// sin of the element axis angle
    pub s: f64,
}

impl ElementGeometry {
    /// Check whether the element is numerically zero-length
    pub fn is_degenerate(&self, tolerance: f64) -> bool {
        self.length < tolerance
    }

    /// Global-to-local transformation matrix
    pub fn transformation(&self) -> Mat6 {
        math::beam_transformation_matrix(self.c, self.s)
    }
}

/// Compute the geometry of a beam from its endpoint nodes
pub fn element_geometry(beam: &BeamElement, nodes: &[Node]) -> FEAResult<ElementGeometry> {
    let i_node = nodes
        .get(beam.nodes[0])
        .ok_or(FEAError::NodeNotFound(beam.nodes[0]))?;
    let j_node = nodes
        .get(beam.nodes[1])
        .ok_or(FEAError::NodeNotFound(beam.nodes[1]))?;

    let (length, c, s) = math::direction_cosines(&i_node.coords(), &j_node.coords());
    Ok(ElementGeometry { length, c, s })
}

/// Compute the 6x6 stiffness matrix of one element in global coordinates
///
/// Zero-length elements return the zero matrix. Truss elements have their
/// moment of inertia forced to zero so only the axial block survives.
pub fn element_stiffness(
    beam: &BeamElement,
    nodes: &[Node],
    materials: &[MaterialProfile],
    sections: &[SectionProfile],
    options: &AnalysisOptions,
) -> FEAResult<Mat6> {
    let material = materials
        .get(beam.material)
        .ok_or(FEAError::MaterialNotFound(beam.material))?;
    let section = sections
        .get(beam.section)
        .ok_or(FEAError::SectionNotFound(beam.section))?;
    let geometry = element_geometry(beam, nodes)?;

    if geometry.is_degenerate(options.zero_length_tolerance) {
        debug!(
            "Zero-length beam between nodes {} and {} contributes no stiffness",
            beam.nodes[0], beam.nodes[1]
        );
        return Ok(Mat6::zeros());
    }

    let i = if beam.truss {
        0.0
    } else {
        section.moment_of_inertia
    };

    let k_local = math::beam_local_stiffness(
        material.youngs_modulus,
        section.area,
        i,
        geometry.length,
    );

    // K_global = T^T * K_local * T
    let t = geometry.transformation();
    Ok(t.transpose() * k_local * t)
}

/// Compute the global stiffness matrix of every element, in beam order
pub fn element_matrices(
    beams: &[BeamElement],
    nodes: &[Node],
    materials: &[MaterialProfile],
    sections: &[SectionProfile],
    options: &AnalysisOptions,
) -> FEAResult<Vec<Mat6>> {
    beams
        .iter()
        .enumerate()
        .map(|(index, beam)| {
            let k = element_stiffness(beam, nodes, materials, sections, options)?;
            if options.log_matrices {
                trace!("Beam {} global stiffness:{}", index, k);
            }
            Ok(k)
        })
        .collect()
}
