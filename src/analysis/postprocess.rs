//! Reactions, element end forces and stresses

use crate::analysis::assembly::element_dofs;
use crate::analysis::stiffness::ElementGeometry;
use crate::elements::{BeamElement, Node, SectionProfile, DOF_PER_NODE, DX, DY, RZ};
use crate::math::{Mat, Mat6, Vec as FEVec, Vec6};
use crate::results::{BeamForces, Equilibrium, SliderDrift};

/// Reaction vector `R = K u - F` over all global DOFs
pub fn reactions(k_global: &Mat, displacement: &FEVec, forces: &FEVec) -> FEVec {
    k_global * displacement - forces
}

/// Sum applied loads and support reactions
///
/// Moments are taken about the global origin so that the moment component
/// balances for any geometry, not only when all loads act at one point.
/// Reactions count at supported nodes only; whatever `K u - F` leaves at a
/// free node is solver error and shows up as imbalance.
pub fn equilibrium(nodes: &[Node], forces: &FEVec, reactions: &FEVec) -> Equilibrium {
    let mut eq = Equilibrium::default();

    for (index, node) in nodes.iter().enumerate() {
        let base = index * DOF_PER_NODE;

        let (fx, fy, mz) = (forces[base + DX], forces[base + DY], forces[base + RZ]);
        eq.applied_fx += fx;
        eq.applied_fy += fy;
        eq.applied_mz += mz + node.x * fy - node.y * fx;

        if !node.constraint.is_supported() {
            continue;
        }

        let (rx, ry, rm) = (
            reactions[base + DX],
            reactions[base + DY],
            reactions[base + RZ],
        );
        eq.reaction_fx += rx;
        eq.reaction_fy += ry;
        eq.reaction_mz += rm + node.x * ry - node.y * rx;
    }

    eq
}

/// Largest nodal translation, rotations excluded
pub fn max_translation(displacement: &FEVec) -> f64 {
    displacement
        .iter()
        .enumerate()
        .filter(|(i, _)| i % DOF_PER_NODE != RZ)
        .fold(0.0, |acc, (_, u)| acc.max(u.abs()))
}

/// Gather an element's end displacements `[u1, v1, θ1, u2, v2, θ2]`
pub fn element_displacements(beam: &BeamElement, displacement: &FEVec) -> Vec6 {
    let dofs = element_dofs(beam);
    Vec6::from_fn(|i, _| displacement[dofs[i]])
}

/// Local end forces of one element
///
/// Global end forces `k_e d_e` are rotated into element axes with `T`.
pub fn beam_end_forces(
    k_element: &Mat6,
    geometry: &ElementGeometry,
    end_displacements: &Vec6,
) -> BeamForces {
    let global_end_forces = k_element * end_displacements;
    let local_end_forces = geometry.transformation() * global_end_forces;
    BeamForces::from_local(&local_end_forces)
}

/// Envelope stress of the governing fiber (tension positive)
///
/// Sections without a usable section modulus are stressed axially only.
/// Otherwise the larger-magnitude of `P/A + M/S` and `P/A - M/S` is
/// reported with its sign.
pub fn combined_stress(
    axial: f64,
    max_moment: f64,
    section: &SectionProfile,
    section_modulus_tolerance: f64,
) -> f64 {
    let axial_stress = axial / section.area;

    if section.section_modulus.abs() < section_modulus_tolerance {
        return axial_stress;
    }

    let bending_stress = max_moment / section.section_modulus;
    let tension_fiber = axial_stress + bending_stress;
    let compression_fiber = axial_stress - bending_stress;

    if tension_fiber.abs() > compression_fiber.abs() {
        tension_fiber
    } else {
        compression_fiber
    }
}

/// Running minimum and maximum of the beam stresses
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StressRange {
    pub min: f64,
    pub max: f64,
    empty: bool,
}

impl StressRange {
    pub fn new() -> Self {
        Self {
            min: 0.0,
            max: 0.0,
            empty: true,
        }
    }

    pub fn update(&mut self, stress: f64) {
        if self.empty {
            self.min = stress;
            self.max = stress;
            self.empty = false;
        } else {
            self.min = self.min.min(stress);
            self.max = self.max.max(stress);
        }
    }
}

impl Default for StressRange {
    fn default() -> Self {
        Self::new()
    }
}

/// Movement of a slider node along and across its track
pub fn slider_drift(index: usize, node: &Node, displacement: &FEVec) -> Option<SliderDrift> {
    let track = node.constraint.slider_track()?;
    let normal = node.constraint.slider_normal()?;

    let base = index * DOF_PER_NODE;
    let (u, v) = (displacement[base + DX], displacement[base + DY]);

    Some(SliderDrift {
        along: u * track[0] + v * track[1],
        perpendicular: u * normal[0] + v * normal[1],
    })
}
