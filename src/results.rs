//! Result types for frame analysis

use serde::{Deserialize, Serialize};

use crate::math::Vec6;

/// Displacement results at a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeDisplacement {
    /// Displacement in X direction
    pub dx: f64,
    /// Displacement in Y direction
    pub dy: f64,
    /// Rotation about Z axis (radians)
    pub rz: f64,
}

impl NodeDisplacement {
    /// Create from array [DX, DY, RZ]
    pub fn from_array(arr: [f64; 3]) -> Self {
        Self {
            dx: arr[0],
            dy: arr[1],
            rz: arr[2],
        }
    }

    /// Get translation magnitude
    pub fn translation_magnitude(&self) -> f64 {
        (self.dx.powi(2) + self.dy.powi(2)).sqrt()
    }
}

/// Reaction forces at a node
///
/// Only meaningful at constrained DOFs; at free DOFs the values are the
/// solve residual and should be ~0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reactions {
    /// Reaction force in X direction
    pub fx: f64,
    /// Reaction force in Y direction
    pub fy: f64,
    /// Reaction moment about Z axis
    pub mz: f64,
}

impl Reactions {
    /// Create from array [FX, FY, MZ]
    pub fn from_array(arr: [f64; 3]) -> Self {
        Self {
            fx: arr[0],
            fy: arr[1],
            mz: arr[2],
        }
    }

    /// Get total force magnitude
    pub fn force_magnitude(&self) -> f64 {
        (self.fx.powi(2) + self.fy.powi(2)).sqrt()
    }
}

/// Element end forces in local axes
///
/// Stored exactly as `T * k * d`: `[P1, V1, M1, P2, V2, M2]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BeamForces {
    pub p1: f64,
    pub v1: f64,
    pub m1: f64,
    pub p2: f64,
    pub v2: f64,
    pub m2: f64,
}

impl BeamForces {
    /// Create from a local end force vector
    pub fn from_local(forces: &Vec6) -> Self {
        Self {
            p1: forces[0],
            v1: forces[1],
            m1: forces[2],
            p2: forces[3],
            v2: forces[4],
            m2: forces[5],
        }
    }

    /// Axial force, positive = tension (taken at the j end)
    pub fn axial(&self) -> f64 {
        self.p2
    }

    /// Largest end moment magnitude
    pub fn max_moment(&self) -> f64 {
        self.m1.abs().max(self.m2.abs())
    }

    pub fn as_array(&self) -> [f64; 6] {
        [self.p1, self.v1, self.m1, self.p2, self.v2, self.m2]
    }
}

/// Movement of a slider node relative to its track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderDrift {
    /// Displacement along the permitted direction
    pub along: f64,
    /// Displacement normal to the track (should be ~0)
    pub perpendicular: f64,
}

/// Static equilibrium of applied loads plus reactions
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Equilibrium {
    /// Σ applied FX
    pub applied_fx: f64,
    /// Σ applied FY
    pub applied_fy: f64,
    /// Σ applied moment about the origin
    pub applied_mz: f64,
    /// Σ reaction FX
    pub reaction_fx: f64,
    /// Σ reaction FY
    pub reaction_fy: f64,
    /// Σ reaction moment about the origin
    pub reaction_mz: f64,
}

impl Equilibrium {
    /// Out-of-balance force and moment `[FX, FY, MZ]`
    pub fn imbalance(&self) -> [f64; 3] {
        [
            self.applied_fx + self.reaction_fx,
            self.applied_fy + self.reaction_fy,
            self.applied_mz + self.reaction_mz,
        ]
    }

    /// Largest applied force or moment component, used to scale tolerances
    pub fn load_scale(&self) -> f64 {
        self.applied_fx
            .abs()
            .max(self.applied_fy.abs())
            .max(self.applied_mz.abs())
            .max(self.reaction_fx.abs())
            .max(self.reaction_fy.abs())
            .max(self.reaction_mz.abs())
    }

    /// Check balance relative to the load magnitude
    pub fn is_balanced(&self, tolerance: f64) -> bool {
        let limit = tolerance * self.load_scale().max(1.0);
        self.imbalance().iter().all(|r| r.abs() <= limit)
    }
}

/// Diagnostics returned by a successful solve
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolveReport {
    /// Total DOFs (3 per node)
    pub total_dofs: usize,
    /// Free DOFs in the reduced system
    pub free_dofs: usize,
    /// Slider constraint rows appended to the system
    pub constraints: usize,
    /// Numerical rank of the solved (possibly augmented) matrix
    pub rank: usize,
    /// σ_max / σ_min of the solved matrix, when requested
    pub condition_number: Option<f64>,
    /// Factor applied to the constraint rows (1.0 when unconstrained)
    pub constraint_scale: f64,
    /// Smallest combined stress over all beams
    pub min_stress: f64,
    /// Largest combined stress over all beams
    pub max_stress: f64,
    /// Equilibrium check
    pub equilibrium: Equilibrium,
}

/// Summary of analysis results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Maximum translation magnitude
    pub max_displacement: f64,
    /// Node with maximum displacement
    pub max_disp_node: usize,
    /// Maximum reaction force magnitude at a supported node
    pub max_reaction: f64,
    /// Node with maximum reaction
    pub max_reaction_node: usize,
    /// Maximum member axial force magnitude
    pub max_axial: f64,
    /// Beam with maximum axial
    pub max_axial_beam: usize,
    /// Maximum member moment
    pub max_moment: f64,
    /// Beam with maximum moment
    pub max_moment_beam: usize,
    /// Stress range `(min, max)`
    pub stress_range: (f64, f64),
    /// Total number of nodes
    pub num_nodes: usize,
    /// Total number of beams
    pub num_beams: usize,
    /// Total DOFs
    pub total_dofs: usize,
    /// Free DOFs (unknown)
    pub free_dofs: usize,
}

impl Default for AnalysisSummary {
    fn default() -> Self {
        Self {
            max_displacement: 0.0,
            max_disp_node: 0,
            max_reaction: 0.0,
            max_reaction_node: 0,
            max_axial: 0.0,
            max_axial_beam: 0,
            max_moment: 0.0,
            max_moment_beam: 0,
            stress_range: (0.0, 0.0),
            num_nodes: 0,
            num_beams: 0,
            total_dofs: 0,
            free_dofs: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beam_forces_accessors() {
        let f = BeamForces::from_local(&Vec6::new(-5.0, 1.0, 3.0, 5.0, -1.0, -7.0));
        assert_eq!(f.axial(), 5.0);
        assert_eq!(f.max_moment(), 7.0);
    }

    #[test]
    fn test_equilibrium_balance() {
        let eq = Equilibrium {
            applied_fx: 10.0,
            reaction_fx: -10.0,
            applied_fy: -4.0,
            reaction_fy: 4.0 + 1e-9,
            ..Default::default()
        };
        assert!(eq.is_balanced(1e-6));

        let off = Equilibrium {
            applied_fx: 10.0,
            reaction_fx: -9.0,
            ..Default::default()
        };
        assert!(!off.is_balanced(1e-6));
    }
}
