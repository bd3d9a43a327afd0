//! DOF classification, system reduction and slider constraints

use crate::elements::{Node, DOF_PER_NODE, DX, DY};
use crate::error::{FEAError, FEAResult};
use crate::math::{Mat, Vec as FEVec};

/// Mapping between the reduced system and global DOF indices
///
/// Built once per solve and read-only afterwards. Column `r` of the reduced
/// system is global DOF `free_dofs()[r]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DofMap {
    free: Vec<usize>,
    reduced_index: Vec<Option<usize>>,
}

impl DofMap {
    /// Classify every node's DOFs by its constraint
    ///
    /// Fails with [`FEAError::NoFreeDofs`] when nothing is left to solve.
    pub fn new(nodes: &[Node]) -> FEAResult<Self> {
        let total = nodes.len() * DOF_PER_NODE;
        let mut free = Vec::with_capacity(total);
        let mut reduced_index = vec![None; total];

        for (index, node) in nodes.iter().enumerate() {
            let base_dof = Node::first_dof(index);
            for &offset in node.constraint.free_dofs() {
                reduced_index[base_dof + offset] = Some(free.len());
                free.push(base_dof + offset);
            }
        }

        if free.is_empty() {
            return Err(FEAError::NoFreeDofs);
        }

        Ok(Self {
            free,
            reduced_index,
        })
    }

    /// Ordered global indices of the free DOFs
    pub fn free_dofs(&self) -> &[usize] {
        &self.free
    }

    /// Size of the reduced system
    pub fn len(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    /// Total number of global DOFs
    pub fn total_dofs(&self) -> usize {
        self.reduced_index.len()
    }

    /// Reduced column of a global DOF, `None` when it is eliminated
    pub fn reduced_index(&self, global_dof: usize) -> Option<usize> {
        self.reduced_index.get(global_dof).copied().flatten()
    }

    /// Extract the free-free block of a global matrix
    pub fn reduce_matrix(&self, k_global: &Mat) -> Mat {
        let n = self.free.len();
        Mat::from_fn(n, n, |i, j| k_global[(self.free[i], self.free[j])])
    }

    /// Extract the free entries of a global vector
    pub fn reduce_vector(&self, v_global: &FEVec) -> FEVec {
        FEVec::from_iterator(self.free.len(), self.free.iter().map(|&dof| v_global[dof]))
    }

    /// Scatter a reduced vector into a zero-filled global vector
    pub fn expand(&self, v_reduced: &FEVec) -> FEVec {
        let mut v_global = FEVec::zeros(self.total_dofs());
        for (i, &dof) in self.free.iter().enumerate() {
            v_global[dof] = v_reduced[i];
        }
        v_global
    }
}

/// Slider multi-point constraints over the reduced basis
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintRows {
    /// One row per slider node, one column per free DOF
    pub matrix: Mat,
    /// Slider node index of each row
    pub nodes: Vec<usize>,
}

impl ConstraintRows {
    /// Number of constraint equations
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Coefficients of one slider row: `n_x * u_x + n_y * u_y = 0`
///
/// Returns `(reduced column, coefficient)` pairs; empty for non-slider nodes.
pub fn constraint_row(index: usize, node: &Node, dof_map: &DofMap) -> Vec<(usize, f64)> {
    let Some(normal) = node.constraint.slider_normal() else {
        return Vec::new();
    };

    let base_dof = Node::first_dof(index);
    [(DX, normal[0]), (DY, normal[1])]
        .into_iter()
        .filter_map(|(offset, coeff)| {
            dof_map
                .reduced_index(base_dof + offset)
                .map(|col| (col, coeff))
        })
        .collect()
}

/// Build the constraint matrix for every slider node, in node order
///
/// Returns `None` when the model has no sliders.
pub fn slider_constraints(nodes: &[Node], dof_map: &DofMap) -> Option<ConstraintRows> {
    let sliders: Vec<usize> = nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| node.constraint.is_slider())
        .map(|(index, _)| index)
        .collect();

    if sliders.is_empty() {
        return None;
    }

    let mut matrix = Mat::zeros(sliders.len(), dof_map.len());
    for (row, &index) in sliders.iter().enumerate() {
        for (col, coeff) in constraint_row(index, &nodes[index], dof_map) {
            matrix[(row, col)] = coeff;
        }
    }

    Some(ConstraintRows {
        matrix,
        nodes: sliders,
    })
}
