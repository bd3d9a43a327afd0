//! Linear solve of the reduced (optionally augmented) system

use log::{debug, warn};

use crate::analysis::constraints::ConstraintRows;
use crate::analysis::AnalysisOptions;
use crate::error::{FEAError, FEAResult};
use crate::math::{self, Mat, Vec as FEVec};

/// Solution of the reduced system
#[derive(Debug, Clone)]
pub struct ReducedSolution {
    /// Free-DOF displacements, in `DofMap` order
    pub displacement: FEVec,
    /// Physical Lagrange multipliers, one per slider row (empty when unconstrained)
    pub multipliers: FEVec,
    /// Numerical rank of the solved matrix
    pub rank: usize,
    /// σ_max / σ_min of the solved matrix, when requested
    pub condition_number: Option<f64>,
    /// Factor applied to the constraint rows
    pub constraint_scale: f64,
}

/// Solve `K_r u_r = F_r`, subject to the slider rows when present
pub fn solve_reduced(
    k_r: &Mat,
    f_r: &FEVec,
    constraints: Option<&ConstraintRows>,
    options: &AnalysisOptions,
) -> FEAResult<ReducedSolution> {
    match constraints {
        Some(rows) if !rows.is_empty() => solve_constrained(k_r, f_r, rows, options),
        _ => solve_unconstrained(k_r, f_r, options),
    }
}

/// Direct solve of the reduced stiffness equation
pub fn solve_unconstrained(
    k_r: &Mat,
    f_r: &FEVec,
    options: &AnalysisOptions,
) -> FEAResult<ReducedSolution> {
    let solution =
        math::solve_rank_revealing(k_r, f_r, options.rank_tolerance, options.residual_tolerance)?;

    let condition_number = diagnose_conditioning(solution.condition_number, options);

    Ok(ReducedSolution {
        displacement: solution.x,
        multipliers: FEVec::zeros(0),
        rank: solution.rank,
        condition_number,
        constraint_scale: 1.0,
    })
}

/// Build the scaled saddle-point matrix
///
/// ```text
/// [ K_r        s*C^T ]
/// [ s*C        0     ]
/// ```
///
/// Returns the matrix and the scale `s = ||K_r||_F` (1.0 when `K_r` is zero).
pub fn augmented_matrix(k_r: &Mat, c: &Mat) -> (Mat, f64) {
    let n = k_r.nrows();
    let m = c.nrows();

    let k_norm = k_r.norm();
    let scale = if k_norm > 0.0 { k_norm } else { 1.0 };
    let c_scaled = c * scale;

    let mut saddle = Mat::zeros(n + m, n + m);
    saddle.view_mut((0, 0), (n, n)).copy_from(k_r);
    saddle.view_mut((0, n), (n, m)).copy_from(&c_scaled.transpose());
    saddle.view_mut((n, 0), (m, n)).copy_from(&c_scaled);

    (saddle, scale)
}

/// Solve the Lagrange-multiplier augmented system for slider constraints
pub fn solve_constrained(
    k_r: &Mat,
    f_r: &FEVec,
    rows: &ConstraintRows,
    options: &AnalysisOptions,
) -> FEAResult<ReducedSolution> {
    let n = k_r.nrows();
    let m = rows.len();
    let augmented_size = n + m;

    let (saddle, scale) = augmented_matrix(k_r, &rows.matrix);

    let mut rhs = FEVec::zeros(augmented_size);
    rhs.rows_mut(0, n).copy_from(f_r);

    if options.log_matrices {
        debug!("Constraint matrix C_r ({}x{}):{}", m, n, rows.matrix);
        debug!("Saddle-point matrix ({0}x{0}):{1}", augmented_size, saddle);
    }

    let solution = math::solve_rank_revealing(
        &saddle,
        &rhs,
        options.rank_tolerance,
        options.residual_tolerance,
    )?;

    if solution.x.len() != augmented_size {
        return Err(FEAError::AugmentedSizeMismatch {
            expected: augmented_size,
            actual: solution.x.len(),
        });
    }

    let condition_number = diagnose_conditioning(solution.condition_number, options);

    let displacement = solution.x.rows(0, n).into_owned();
    // K u + (s C)^T λ' = F  =>  λ = s λ'
    let multipliers = solution.x.rows(n, m).into_owned() * scale;

    debug!(
        "Solved augmented system: {} DOFs, {} constraints, scale {:e}",
        n, m, scale
    );

    Ok(ReducedSolution {
        displacement,
        multipliers,
        rank: solution.rank,
        condition_number,
        constraint_scale: scale,
    })
}

fn diagnose_conditioning(condition_number: f64, options: &AnalysisOptions) -> Option<f64> {
    if !options.compute_condition_number {
        return None;
    }

    if condition_number > options.condition_warning_threshold {
        warn!(
            "Ill-conditioned system: condition number {:e} exceeds {:e}",
            condition_number, options.condition_warning_threshold
        );
    } else {
        debug!("Condition number: {:e}", condition_number);
    }

    Some(condition_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rows(matrix: Mat, nodes: Vec<usize>) -> ConstraintRows {
        ConstraintRows { matrix, nodes }
    }

    #[test]
    fn test_augmented_matrix_layout() {
        let k = Mat::from_row_slice(2, 2, &[3.0, 0.0, 0.0, 4.0]);
        let c = Mat::from_row_slice(1, 2, &[1.0, -1.0]);
        let (saddle, scale) = augmented_matrix(&k, &c);

        assert_relative_eq!(scale, 5.0, epsilon = 1e-12);
        assert_eq!(saddle.nrows(), 3);
        assert_eq!(saddle[(0, 0)], 3.0);
        assert_relative_eq!(saddle[(0, 2)], 5.0, epsilon = 1e-12);
        assert_relative_eq!(saddle[(2, 1)], -5.0, epsilon = 1e-12);
        assert_eq!(saddle[(2, 2)], 0.0);
        assert_eq!(saddle, saddle.transpose());
    }

    #[test]
    fn test_zero_stiffness_uses_unit_scale() {
        let k = Mat::zeros(2, 2);
        let c = Mat::from_row_slice(1, 2, &[0.0, 1.0]);
        let (_, scale) = augmented_matrix(&k, &c);
        assert_eq!(scale, 1.0);
    }

    #[test]
    fn test_constrained_two_springs() {
        // Two uncoupled springs tied by u0 - u1 = 0, load on the first one
        let k = Mat::from_row_slice(2, 2, &[100.0, 0.0, 0.0, 300.0]);
        let f = FEVec::from_vec(vec![40.0, 0.0]);
        let c = rows(Mat::from_row_slice(1, 2, &[1.0, -1.0]), vec![0]);

        let sol = solve_constrained(&k, &f, &c, &AnalysisOptions::default()).unwrap();
        assert_relative_eq!(sol.displacement[0], 0.1, epsilon = 1e-12);
        assert_relative_eq!(sol.displacement[1], 0.1, epsilon = 1e-12);
        // K u + C^T λ = F  =>  100 * 0.1 + λ = 40
        assert_relative_eq!(sol.multipliers[0], 30.0, epsilon = 1e-9);
        assert!(sol.condition_number.is_some());
    }

    #[test]
    fn test_unconstrained_dispatch() {
        let k = Mat::from_row_slice(1, 1, &[8.0]);
        let f = FEVec::from_vec(vec![2.0]);
        let sol = solve_reduced(&k, &f, None, &AnalysisOptions::default()).unwrap();
        assert_relative_eq!(sol.displacement[0], 0.25, epsilon = 1e-12);
        assert_eq!(sol.multipliers.len(), 0);
        assert_eq!(sol.constraint_scale, 1.0);
    }

    #[test]
    fn test_unloaded_mechanism_is_accepted_loaded_is_not() {
        let k = Mat::from_row_slice(2, 2, &[1.0, -1.0, -1.0, 1.0]);
        let opts = AnalysisOptions::default();

        let zero = FEVec::zeros(2);
        let sol = solve_unconstrained(&k, &zero, &opts).unwrap();
        assert_eq!(sol.displacement, FEVec::zeros(2));

        let pushed = FEVec::from_vec(vec![1.0, 0.0]);
        assert!(matches!(
            solve_unconstrained(&k, &pushed, &opts),
            Err(FEAError::SingularMatrix)
        ));
    }

    #[test]
    fn test_unstiffened_dof_stays_at_zero() {
        // Second unknown has neither stiffness nor load, like a truss node rotation
        let k = Mat::from_row_slice(2, 2, &[5.0, 0.0, 0.0, 0.0]);
        let f = FEVec::from_vec(vec![10.0, 0.0]);
        let sol = solve_unconstrained(&k, &f, &AnalysisOptions::default()).unwrap();

        assert_relative_eq!(sol.displacement[0], 2.0, epsilon = 1e-12);
        assert_eq!(sol.displacement[1], 0.0);
        assert_eq!(sol.rank, 1);
        assert_eq!(sol.condition_number, Some(1.0));
    }
}
