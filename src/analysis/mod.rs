//! Analysis pipeline and options
//!
//! A solve runs the stages in order:
//! [`stiffness`] → [`assembly`] → [`constraints`] → [`solver`] → [`postprocess`].
//! Every stage is a free function over borrowed model data; the orchestration
//! lives in [`crate::model::FrameSystem::solve_with`].

pub mod assembly;
pub mod constraints;
pub mod postprocess;
pub mod solver;
pub mod stiffness;

use serde::{Deserialize, Serialize};

/// Options for structural analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Elements shorter than this contribute no stiffness
    pub zero_length_tolerance: f64,
    /// Sections with |S| below this are stressed axially only
    pub section_modulus_tolerance: f64,
    /// Singular values below `rank_tolerance * n * σ_max` are treated as zero,
    /// `n` being the size of the solved system
    pub rank_tolerance: f64,
    /// Largest accepted unbalanced share of the load and normwise backward
    /// error of the linear solve
    pub residual_tolerance: f64,
    /// Record σ_max / σ_min of the solved matrix in the report
    pub compute_condition_number: bool,
    /// Condition numbers above this are logged as warnings
    pub condition_warning_threshold: f64,
    /// Check static equilibrium after analysis
    pub check_statics: bool,
    /// Relative tolerance for the equilibrium and slider drift checks
    pub equilibrium_tolerance: f64,
    /// Dump assembled, reduced and augmented matrices at debug level
    pub log_matrices: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            zero_length_tolerance: 1e-9,
            section_modulus_tolerance: 1e-12,
            rank_tolerance: f64::EPSILON,
            residual_tolerance: 1e-8,
            compute_condition_number: true,
            condition_warning_threshold: 1e12,
            check_statics: true,
            equilibrium_tolerance: 1e-6,
            log_matrices: false,
        }
    }
}

impl AnalysisOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable matrix dumps at debug level
    pub fn with_matrix_logging(mut self) -> Self {
        self.log_matrices = true;
        self
    }

    /// Set the relative rank cutoff of the linear solve
    pub fn with_rank_tolerance(mut self, tol: f64) -> Self {
        self.rank_tolerance = tol;
        self
    }

    /// Set the accepted backward error of the linear solve
    pub fn with_residual_tolerance(mut self, tol: f64) -> Self {
        self.residual_tolerance = tol;
        self
    }

    /// Skip the condition number diagnostic
    pub fn without_condition_number(mut self) -> Self {
        self.compute_condition_number = false;
        self
    }

    /// Skip the equilibrium check
    pub fn without_statics_check(mut self) -> Self {
        self.check_statics = false;
        self
    }
}
