//! Global stiffness assembly

use crate::elements::{BeamElement, DOF_PER_NODE};
use crate::math::{Mat, Mat6};

/// Global DOF indices of an element's end DOFs `[u1, v1, θ1, u2, v2, θ2]`
pub fn element_dofs(beam: &BeamElement) -> [usize; 6] {
    let i_dof = beam.nodes[0] * DOF_PER_NODE;
    let j_dof = beam.nodes[1] * DOF_PER_NODE;
    [i_dof, i_dof + 1, i_dof + 2, j_dof, j_dof + 1, j_dof + 2]
}

/// Build the global stiffness matrix
///
/// `element_matrices[e]` is the global 6x6 matrix of `beams[e]`.
pub fn assemble_global_stiffness(
    beams: &[BeamElement],
    element_matrices: &[Mat6],
    n_nodes: usize,
) -> Mat {
    let n_dofs = n_nodes * DOF_PER_NODE;
    let mut k_global = Mat::zeros(n_dofs, n_dofs);

    for (beam, k_element) in beams.iter().zip(element_matrices) {
        let dofs = element_dofs(beam);

        for (a, &row) in dofs.iter().enumerate() {
            for (b, &col) in dofs.iter().enumerate() {
                k_global[(row, col)] += k_element[(a, b)];
            }
        }
    }

    k_global
}
