//! Mathematical utilities for frame calculations

use nalgebra::{DMatrix, DVector, Matrix6, Vector6};

use crate::error::{FEAError, FEAResult};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;

/// 6x6 matrix for element stiffness and transformation
pub type Mat6 = Matrix6<f64>;
/// 6-element vector for element end forces/displacements
pub type Vec6 = Vector6<f64>;

/// Iteration cap for the SVD; exceeding it is reported as a singular system
const MAX_SVD_ITERATIONS: usize = 10_000;

/// Compute the local stiffness matrix for a planar frame element
///
/// DOF order is `[u1, v1, θ1, u2, v2, θ2]` in element axes. With `i = 0`
/// every bending and shear term vanishes and only the axial block remains.
///
/// # Arguments
/// * `e` - Modulus of elasticity
/// * `a` - Cross-sectional area
/// * `i` - Moment of inertia
/// * `length` - Element length (must be non-zero)
pub fn beam_local_stiffness(e: f64, a: f64, i: f64, length: f64) -> Mat6 {
    let l = length;

    let ea_l = e * a / l;
    let ei_l = e * i / l;
    let ei_l2 = ei_l / l;
    let ei_l3 = ei_l2 / l;

    #[rustfmt::skip]
    let data = [
        // Row 0: axial at i
        ea_l,    0.0,           0.0,          -ea_l,   0.0,           0.0,
        // Row 1: shear at i
        0.0,     12.0*ei_l3,    6.0*ei_l2,    0.0,     -12.0*ei_l3,   6.0*ei_l2,
        // Row 2: moment at i
        0.0,     6.0*ei_l2,     4.0*ei_l,     0.0,     -6.0*ei_l2,    2.0*ei_l,
        // Row 3: axial at j
        -ea_l,   0.0,           0.0,          ea_l,    0.0,           0.0,
        // Row 4: shear at j
        0.0,     -12.0*ei_l3,   -6.0*ei_l2,   0.0,     12.0*ei_l3,    -6.0*ei_l2,
        // Row 5: moment at j
        0.0,     6.0*ei_l2,     2.0*ei_l,     0.0,     -6.0*ei_l2,    4.0*ei_l,
    ];

    Mat6::from_row_slice(&data)
}

/// Compute the global-to-local transformation matrix for a planar element
///
/// `c` and `s` are the direction cosines of the element axis. The two
/// translational pairs are rotated, the rotations pass through unchanged.
pub fn beam_transformation_matrix(c: f64, s: f64) -> Mat6 {
    #[rustfmt::skip]
    let data = [
        c,    s,    0.0,  0.0,  0.0,  0.0,
        -s,   c,    0.0,  0.0,  0.0,  0.0,
        0.0,  0.0,  1.0,  0.0,  0.0,  0.0,
        0.0,  0.0,  0.0,  c,    s,    0.0,
        0.0,  0.0,  0.0,  -s,   c,    0.0,
        0.0,  0.0,  0.0,  0.0,  0.0,  1.0,
    ];

    Mat6::from_row_slice(&data)
}

/// Length and direction cosines `(L, c, s)` of the segment from `i` to `j`
pub fn direction_cosines(i: &[f64; 2], j: &[f64; 2]) -> (f64, f64, f64) {
    let dx = j[0] - i[0];
    let dy = j[1] - i[1];
    let length = (dx * dx + dy * dy).sqrt();

    if length == 0.0 {
        return (0.0, 1.0, 0.0);
    }

    (length, dx / length, dy / length)
}

/// Result of a dense rank-revealing solve
#[derive(Debug, Clone)]
pub struct LinearSolution {
    /// Solution vector
    pub x: Vec,
    /// Numerical rank of the coefficient matrix
    pub rank: usize,
    /// σ_max / σ_min over the unknowns that carry stiffness (may be infinite)
    pub condition_number: f64,
}

/// Unknowns whose row or column holds a non-zero entry
fn coupled_unknowns(a: &Mat) -> std::vec::Vec<usize> {
    (0..a.nrows())
        .filter(|&i| {
            a.row(i).iter().any(|v| *v != 0.0) || a.column(i).iter().any(|v| *v != 0.0)
        })
        .collect()
}

/// Solve `a * x = b` with a singular value decomposition
///
/// Unknowns with an all-zero row and column (the rotation of a node reached
/// only by truss members) are set to zero, or rejected when loaded. The rest
/// is solved by SVD. Singular values below `rank_tolerance * n * σ_max` are
/// dropped, so a consistent but numerically singular system gets its
/// minimum-norm solution.
///
/// [`FEAError::SingularMatrix`] is returned when
/// - the load has a component of more than `residual_tolerance * ‖b‖` on the
///   dropped singular vectors (a loaded mechanism),
/// - the normwise backward error exceeds `residual_tolerance`,
/// - or the solution is not finite.
pub fn solve_rank_revealing(
    a: &Mat,
    b: &Vec,
    rank_tolerance: f64,
    residual_tolerance: f64,
) -> FEAResult<LinearSolution> {
    let n = a.nrows();
    if a.ncols() != n || b.len() != n {
        return Err(FEAError::InvalidInput(format!(
            "cannot solve a {}x{} system with a right-hand side of length {}",
            n,
            a.ncols(),
            b.len()
        )));
    }

    let coupled = coupled_unknowns(a);
    let mut x = Vec::zeros(n);

    for i in (0..n).filter(|i| coupled.binary_search(i).is_err()) {
        if b[i] != 0.0 {
            log::debug!("Rejected solution: load {:e} on unknown {} without stiffness", b[i], i);
            return Err(FEAError::SingularMatrix);
        }
    }

    if coupled.is_empty() {
        return Ok(LinearSolution {
            x,
            rank: 0,
            condition_number: f64::INFINITY,
        });
    }

    let m = coupled.len();
    let a_c = a.select_rows(&coupled).select_columns(&coupled);
    let b_c = b.select_rows(&coupled);

    let svd = a_c
        .try_svd(true, true, f64::EPSILON, MAX_SVD_ITERATIONS)
        .ok_or(FEAError::SingularMatrix)?;

    let sigma_max = svd.singular_values.max();
    let sigma_min = svd.singular_values.min();
    let cutoff = rank_tolerance * m as f64 * sigma_max;

    let x_c = svd.solve(&b_c, cutoff).map_err(|_| FEAError::SingularMatrix)?;
    if x_c.iter().any(|v| !v.is_finite()) {
        return Err(FEAError::SingularMatrix);
    }

    // Load left on the dropped directions is unbalanced by any displacement
    let u = svd.u.as_ref().ok_or(FEAError::SingularMatrix)?;
    let unresolved = svd
        .singular_values
        .iter()
        .enumerate()
        .filter(|(_, sigma)| **sigma <= cutoff)
        .map(|(j, _)| u.column(j).dot(&b_c).powi(2))
        .sum::<f64>()
        .sqrt();
    let load_norm = b.norm();
    if unresolved > residual_tolerance * load_norm {
        log::debug!(
            "Rejected solution: {:e} of the load acts on a mechanism",
            unresolved / load_norm
        );
        return Err(FEAError::SingularMatrix);
    }

    for (k, &i) in coupled.iter().enumerate() {
        x[i] = x_c[k];
    }

    let residual = (a * &x - b).norm();
    let scale = load_norm + a.norm() * x.norm();
    if residual > residual_tolerance * scale {
        log::debug!(
            "Rejected solution: residual {:e} exceeds {:e}",
            residual,
            residual_tolerance * scale
        );
        return Err(FEAError::SingularMatrix);
    }

    let rank = svd.rank(cutoff);
    let condition_number = if sigma_min > 0.0 {
        sigma_max / sigma_min
    } else {
        f64::INFINITY
    };

    Ok(LinearSolution {
        x,
        rank,
        condition_number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_transformation_matrix_horizontal() {
        let t = beam_transformation_matrix(1.0, 0.0);
        assert_relative_eq!(t, Mat6::identity(), epsilon = 1e-12);
    }

    #[test]
    fn test_transformation_matrix_is_orthogonal() {
        let (_, c, s) = direction_cosines(&[0.0, 0.0], &[3.0, 4.0]);
        let t = beam_transformation_matrix(c, s);
        assert_relative_eq!(t * t.transpose(), Mat6::identity(), epsilon = 1e-12);
        assert_relative_eq!(t[(0, 1)], 0.8, epsilon = 1e-12);
        assert_relative_eq!(t[(1, 0)], -0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_local_stiffness_symmetry() {
        let k = beam_local_stiffness(200e9, 0.01, 1e-4, 10.0);
        assert_relative_eq!(k, k.transpose(), epsilon = 1e-6);
        assert_relative_eq!(k[(0, 0)], 200e9 * 0.01 / 10.0, epsilon = 1e-3);
        assert_relative_eq!(k[(2, 2)], 4.0 * 200e9 * 1e-4 / 10.0, epsilon = 1e-6);
    }

    #[test]
    fn test_local_stiffness_zero_inertia() {
        let k = beam_local_stiffness(200e9, 0.01, 0.0, 2.0);
        for r in [1, 2, 4, 5] {
            for c in 0..6 {
                assert_eq!(k[(r, c)], 0.0);
                assert_eq!(k[(c, r)], 0.0);
            }
        }
    }

    #[test]
    fn test_solve_regular_system() {
        let a = Mat::from_row_slice(2, 2, &[4.0, 1.0, 1.0, 3.0]);
        let b = Vec::from_vec(vec![1.0, 2.0]);
        let sol = solve_rank_revealing(&a, &b, f64::EPSILON, 1e-8).unwrap();
        assert_relative_eq!(sol.x[0], 1.0 / 11.0, epsilon = 1e-12);
        assert_relative_eq!(sol.x[1], 7.0 / 11.0, epsilon = 1e-12);
        assert_eq!(sol.rank, 2);
        assert!(sol.condition_number >= 1.0);
    }

    #[test]
    fn test_solve_consistent_rank_deficient() {
        // Zero row/column: unknown 1 is unconstrained and unloaded
        let a = Mat::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 0.0]);
        let b = Vec::from_vec(vec![4.0, 0.0]);
        let sol = solve_rank_revealing(&a, &b, f64::EPSILON, 1e-8).unwrap();
        assert_relative_eq!(sol.x[0], 2.0, epsilon = 1e-12);
        assert_eq!(sol.x[1], 0.0);
        assert_eq!(sol.rank, 1);
        assert_relative_eq!(sol.condition_number, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_solve_inconsistent_is_singular() {
        let a = Mat::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 0.0]);
        let b = Vec::from_vec(vec![4.0, 1.0]);
        let result = solve_rank_revealing(&a, &b, f64::EPSILON, 1e-8);
        assert!(matches!(result, Err(FEAError::SingularMatrix)));
    }

    #[test]
    fn test_solve_keeps_small_singular_values() {
        // Stiff and soft springs in series, σ_min / σ_max near 1e-13
        let (stiff, soft) = (1e13, 1.0);
        let a = Mat::from_row_slice(2, 2, &[stiff + soft, -stiff, -stiff, stiff]);
        let b = Vec::from_vec(vec![0.0, 1.0]);
        let sol = solve_rank_revealing(&a, &b, f64::EPSILON, 1e-8).unwrap();

        assert_eq!(sol.rank, 2);
        assert_relative_eq!(sol.x[0], 1.0, max_relative = 5e-2);
        assert_relative_eq!(sol.x[1], 1.0, max_relative = 5e-2);
        assert!(sol.condition_number > 1e12);
    }

    #[test]
    fn test_solve_rejects_load_on_mechanism() {
        // Rigid-body mode along (1, 1)
        let a = Mat::from_row_slice(2, 2, &[1.0, -1.0, -1.0, 1.0]);
        let b = Vec::from_vec(vec![1.0, 1.0]);
        let result = solve_rank_revealing(&a, &b, f64::EPSILON, 1e-8);
        assert!(matches!(result, Err(FEAError::SingularMatrix)));
    }
}
