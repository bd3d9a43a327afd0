//! Frame system - planar structural model container and solve orchestration

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::analysis::assembly::assemble_global_stiffness;
use crate::analysis::constraints::{slider_constraints, DofMap};
use crate::analysis::postprocess::{self, StressRange};
use crate::analysis::solver::solve_reduced;
use crate::analysis::stiffness::{element_geometry, element_matrices};
use crate::analysis::AnalysisOptions;
use crate::elements::{
    BeamElement, Constraint, MaterialProfile, Node, SectionProfile, DOF_PER_NODE,
};
use crate::error::{FEAError, FEAResult};
use crate::loads::NodeLoad;
use crate::math::{Mat, Mat6, Vec as FEVec};
use crate::results::{
    AnalysisSummary, BeamForces, Equilibrium, NodeDisplacement, Reactions, SliderDrift,
    SolveReport,
};

/// State derived by a successful solve
#[derive(Debug, Clone)]
struct Solution {
    global_stiffness: Mat,
    element_stiffness: Vec<Mat6>,
    reactions: FEVec,
    multipliers: FEVec,
    beam_forces: Vec<BeamForces>,
    report: SolveReport,
}

/// Serialized form of a [`FrameSystem`]
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ModelData {
    nodes: Vec<Node>,
    beams: Vec<BeamElement>,
    materials: Vec<MaterialProfile>,
    sections: Vec<SectionProfile>,
    #[serde(default)]
    loads: Vec<NodeLoad>,
    #[serde(default)]
    options: AnalysisOptions,
}

/// A planar frame/truss model
///
/// Nodes, beams and the two catalogs are addressed by position. Removing an
/// entry renumbers every reference to the entries after it.
#[derive(Debug, Clone)]
pub struct FrameSystem {
    /// Nodes in the model
    pub nodes: Vec<Node>,
    /// Beams and truss bars
    pub beams: Vec<BeamElement>,
    /// Material catalog
    pub materials: Vec<MaterialProfile>,
    /// Section catalog
    pub sections: Vec<SectionProfile>,
    /// Applied nodal loads `[FX0, FY0, MZ0, FX1, ...]`
    pub forces: FEVec,
    /// Options used by [`FrameSystem::solve`]
    pub options: AnalysisOptions,

    displacement: FEVec,
    solution: Option<Solution>,
}

impl Default for FrameSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSystem {
    /// Create a new empty model
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            beams: Vec::new(),
            materials: Vec::new(),
            sections: Vec::new(),
            forces: FEVec::zeros(0),
            options: AnalysisOptions::default(),
            displacement: FEVec::zeros(0),
            solution: None,
        }
    }

    // ========================
    // Model Building Methods
    // ========================

    /// Add a node and return its index
    pub fn add_node(&mut self, node: Node) -> usize {
        let index = self.nodes.len();
        self.nodes.push(node);

        let n = self.forces.len();
        self.forces = self.forces.clone().resize_vertically(n + DOF_PER_NODE, 0.0);
        let n = self.displacement.len();
        self.displacement = self
            .displacement
            .clone()
            .resize_vertically(n + DOF_PER_NODE, 0.0);

        self.invalidate();
        index
    }

    /// Remove a node together with every beam attached to it
    pub fn remove_node(&mut self, index: usize) -> FEAResult<Node> {
        if index >= self.nodes.len() {
            return Err(FEAError::NodeNotFound(index));
        }

        let before = self.beams.len();
        self.beams.retain(|beam| !beam.connects(index));
        for beam in &mut self.beams {
            for end in &mut beam.nodes {
                if *end > index {
                    *end -= 1;
                }
            }
        }
        let dropped = before - self.beams.len();
        if dropped > 0 {
            debug!("Removing node {} deleted {} beam(s)", index, dropped);
        }

        self.forces = without_node_dofs(&self.forces, index);
        self.displacement = without_node_dofs(&self.displacement, index);

        self.invalidate();
        Ok(self.nodes.remove(index))
    }

    /// Change the support condition of a node
    pub fn set_constraint(&mut self, index: usize, constraint: Constraint) -> FEAResult<()> {
        let node = self
            .nodes
            .get_mut(index)
            .ok_or(FEAError::NodeNotFound(index))?;
        node.constraint = constraint;
        self.invalidate();
        Ok(())
    }

    /// Add a beam and return its index
    pub fn add_beam(&mut self, beam: BeamElement) -> FEAResult<usize> {
        self.check_beam(&beam)?;
        self.beams.push(beam);
        self.invalidate();
        Ok(self.beams.len() - 1)
    }

    /// Remove a beam
    pub fn remove_beam(&mut self, index: usize) -> FEAResult<BeamElement> {
        if index >= self.beams.len() {
            return Err(FEAError::BeamNotFound(index));
        }
        self.invalidate();
        Ok(self.beams.remove(index))
    }

    /// Add a material to the catalog and return its index
    pub fn add_material(&mut self, material: MaterialProfile) -> usize {
        self.materials.push(material);
        self.invalidate();
        self.materials.len() - 1
    }

    /// Remove a material along with every beam made of it
    pub fn remove_material(&mut self, index: usize) -> FEAResult<MaterialProfile> {
        if index >= self.materials.len() {
            return Err(FEAError::MaterialNotFound(index));
        }

        self.beams.retain(|beam| beam.material != index);
        for beam in &mut self.beams {
            if beam.material > index {
                beam.material -= 1;
            }
        }

        self.invalidate();
        Ok(self.materials.remove(index))
    }

    /// Add a section to the catalog and return its index
    pub fn add_section(&mut self, section: SectionProfile) -> usize {
        self.sections.push(section);
        self.invalidate();
        self.sections.len() - 1
    }

    /// Remove a section along with every beam using it
    pub fn remove_section(&mut self, index: usize) -> FEAResult<SectionProfile> {
        if index >= self.sections.len() {
            return Err(FEAError::SectionNotFound(index));
        }

        self.beams.retain(|beam| beam.section != index);
        for beam in &mut self.beams {
            if beam.section > index {
                beam.section -= 1;
            }
        }

        self.invalidate();
        Ok(self.sections.remove(index))
    }

    /// Replace the load applied at a node
    pub fn set_load(&mut self, node: usize, load: NodeLoad) -> FEAResult<()> {
        self.check_load_target(node)?;
        let first = Node::first_dof(node);
        for (offset, value) in load.as_array().into_iter().enumerate() {
            self.forces[first + offset] = value;
        }
        self.invalidate();
        Ok(())
    }

    /// Add to the load applied at a node
    pub fn add_load(&mut self, node: usize, load: NodeLoad) -> FEAResult<()> {
        self.check_load_target(node)?;
        let first = Node::first_dof(node);
        for (offset, value) in load.as_array().into_iter().enumerate() {
            self.forces[first + offset] += value;
        }
        self.invalidate();
        Ok(())
    }

    /// Load currently applied at a node
    pub fn load(&self, node: usize) -> FEAResult<NodeLoad> {
        self.check_load_target(node)?;
        let first = Node::first_dof(node);
        Ok(NodeLoad::new(
            self.forces[first],
            self.forces[first + 1],
            self.forces[first + 2],
        ))
    }

    /// Zero every applied load
    pub fn clear_loads(&mut self) {
        self.forces.fill(0.0);
        self.invalidate();
    }

    fn check_load_target(&self, node: usize) -> FEAResult<()> {
        if node >= self.nodes.len() {
            return Err(FEAError::NodeNotFound(node));
        }
        if self.forces.len() != self.nodes.len() * DOF_PER_NODE {
            return Err(self.force_length_error());
        }
        Ok(())
    }

    fn force_length_error(&self) -> FEAError {
        FEAError::InvalidInput(format!(
            "force vector has {} entries, expected {} for {} nodes",
            self.forces.len(),
            self.nodes.len() * DOF_PER_NODE,
            self.nodes.len()
        ))
    }

    fn check_beam(&self, beam: &BeamElement) -> FEAResult<()> {
        for &node in &beam.nodes {
            if node >= self.nodes.len() {
                return Err(FEAError::NodeNotFound(node));
            }
        }
        if beam.nodes[0] == beam.nodes[1] {
            return Err(FEAError::DuplicateNodeReference(beam.nodes[0]));
        }
        if beam.material >= self.materials.len() {
            return Err(FEAError::MaterialNotFound(beam.material));
        }
        if beam.section >= self.sections.len() {
            return Err(FEAError::SectionNotFound(beam.section));
        }
        Ok(())
    }

    /// Check topology, catalog references and the force vector length
    ///
    /// Reports the first violation found.
    pub fn validate(&self) -> FEAResult<()> {
        if self.forces.len() != self.nodes.len() * DOF_PER_NODE {
            return Err(self.force_length_error());
        }

        for (index, node) in self.nodes.iter().enumerate() {
            if !node.x.is_finite() || !node.y.is_finite() {
                return Err(FEAError::InvalidInput(format!(
                    "node {} has non-finite coordinates",
                    index
                )));
            }
            if let Constraint::Slider { angle } = node.constraint {
                if !angle.is_finite() {
                    return Err(FEAError::InvalidInput(format!(
                        "slider angle of node {} is not finite",
                        index
                    )));
                }
            }
        }

        for beam in &self.beams {
            self.check_beam(beam)?;
        }

        if self.forces.iter().any(|f| !f.is_finite()) {
            return Err(FEAError::InvalidInput(
                "applied loads must be finite".to_string(),
            ));
        }

        Ok(())
    }

    // ========================
    // Analysis Methods
    // ========================

    /// Run the analysis with the model's own options
    pub fn solve(&mut self) -> FEAResult<SolveReport> {
        let options = self.options.clone();
        self.solve_with(&options)
    }

    /// Run the analysis and return the integer status (0 on success)
    pub fn solve_status(&mut self) -> i32 {
        match self.solve() {
            Ok(_) => 0,
            Err(e) => {
                warn!("Solve failed: {}", e);
                e.status_code()
            }
        }
    }

    /// Run the analysis with custom options
    ///
    /// On failure the previous displacement vector is left in place, the
    /// element results are zeroed and the solution is marked invalid.
    pub fn solve_with(&mut self, options: &AnalysisOptions) -> FEAResult<SolveReport> {
        self.invalidate();
        self.validate()?;

        let dof_map = DofMap::new(&self.nodes)?;

        // Element matrices and global stiffness
        let element_stiffness = element_matrices(
            &self.beams,
            &self.nodes,
            &self.materials,
            &self.sections,
            options,
        )?;
        let k_global =
            assemble_global_stiffness(&self.beams, &element_stiffness, self.nodes.len());

        // Reduce and solve
        let k_r = dof_map.reduce_matrix(&k_global);
        let f_r = dof_map.reduce_vector(&self.forces);
        let rows = slider_constraints(&self.nodes, &dof_map);

        if options.log_matrices {
            debug!("Global stiffness ({0}x{0}):{1}", k_global.nrows(), k_global);
            debug!("Reduced stiffness ({0}x{0}):{1}", k_r.nrows(), k_r);
        }

        let reduced = solve_reduced(&k_r, &f_r, rows.as_ref(), options)?;
        let displacement = dof_map.expand(&reduced.displacement);

        // Post-processing
        let reactions = postprocess::reactions(&k_global, &displacement, &self.forces);
        let equilibrium = postprocess::equilibrium(&self.nodes, &self.forces, &reactions);

        let mut beam_forces = Vec::with_capacity(self.beams.len());
        let mut stress_range = StressRange::new();
        for (beam, k_e) in self.beams.iter().zip(&element_stiffness) {
            let mut geometry = element_geometry(beam, &self.nodes)?;
            if geometry.is_degenerate(options.zero_length_tolerance) {
                geometry.c = 1.0;
                geometry.s = 0.0;
            }

            let d_e = postprocess::element_displacements(beam, &displacement);
            let forces = postprocess::beam_end_forces(k_e, &geometry, &d_e);
            beam_forces.push(forces);
        }

        for (beam, forces) in self.beams.iter_mut().zip(&beam_forces) {
            let section = self
                .sections
                .get(beam.section)
                .ok_or(FEAError::SectionNotFound(beam.section))?;

            beam.axial_force = forces.axial();
            beam.max_moment = forces.max_moment();
            beam.stress = postprocess::combined_stress(
                beam.axial_force,
                beam.max_moment,
                section,
                options.section_modulus_tolerance,
            );
            stress_range.update(beam.stress);
        }

        if options.check_statics && !equilibrium.is_balanced(options.equilibrium_tolerance) {
            let [fx, fy, mz] = equilibrium.imbalance();
            warn!(
                "Equilibrium check failed: residual FX={:e}, FY={:e}, MZ={:e}",
                fx, fy, mz
            );
        }

        let max_translation = postprocess::max_translation(&displacement);
        for (index, node) in self.nodes.iter().enumerate() {
            if let Some(drift) = postprocess::slider_drift(index, node, &displacement) {
                if drift.perpendicular.abs() > options.equilibrium_tolerance * max_translation {
                    warn!(
                        "Slider node {} drifted {:e} off its track",
                        index, drift.perpendicular
                    );
                }
            }
        }

        let report = SolveReport {
            total_dofs: dof_map.total_dofs(),
            free_dofs: dof_map.len(),
            constraints: rows.as_ref().map_or(0, |r| r.len()),
            rank: reduced.rank,
            condition_number: reduced.condition_number,
            constraint_scale: reduced.constraint_scale,
            min_stress: stress_range.min,
            max_stress: stress_range.max,
            equilibrium,
        };

        info!(
            "Solved {} nodes, {} beams: {} free DOFs, {} slider constraint(s), stress range [{:e}, {:e}]",
            self.nodes.len(),
            self.beams.len(),
            report.free_dofs,
            report.constraints,
            report.min_stress,
            report.max_stress
        );

        self.displacement = displacement;
        self.solution = Some(Solution {
            global_stiffness: k_global,
            element_stiffness,
            reactions,
            multipliers: reduced.multipliers,
            beam_forces,
            report: report.clone(),
        });

        Ok(report)
    }

    /// Drop the solution and the per-beam results it produced
    fn invalidate(&mut self) {
        self.solution = None;
        for beam in &mut self.beams {
            beam.clear_results();
        }
    }

    fn solution(&self) -> FEAResult<&Solution> {
        self.solution.as_ref().ok_or(FEAError::NotSolved)
    }

    // ========================
    // Result Access Methods
    // ========================

    /// Check if the current model state has been solved
    pub fn is_solved(&self) -> bool {
        self.solution.is_some()
    }

    /// Global displacement vector of the current solution
    pub fn displacements(&self) -> FEAResult<&FEVec> {
        self.solution()?;
        Ok(&self.displacement)
    }

    /// Displacement vector from the last successful solve, even if stale
    ///
    /// Holds 3 entries per node and is all zero before the first solve.
    pub fn last_displacements(&self) -> &FEVec {
        &self.displacement
    }

    /// Global reaction vector `K u - F`
    pub fn reactions(&self) -> FEAResult<&FEVec> {
        Ok(&self.solution()?.reactions)
    }

    /// Physical Lagrange multipliers, one per slider node in node order
    pub fn multipliers(&self) -> FEAResult<&FEVec> {
        Ok(&self.solution()?.multipliers)
    }

    /// Assembled global stiffness matrix
    pub fn global_stiffness(&self) -> FEAResult<&Mat> {
        Ok(&self.solution()?.global_stiffness)
    }

    /// Global 6x6 stiffness matrix of a beam
    pub fn beam_stiffness(&self, index: usize) -> FEAResult<&Mat6> {
        self.solution()?
            .element_stiffness
            .get(index)
            .ok_or(FEAError::BeamNotFound(index))
    }

    /// Local end forces of a beam
    pub fn beam_forces(&self, index: usize) -> FEAResult<BeamForces> {
        self.solution()?
            .beam_forces
            .get(index)
            .copied()
            .ok_or(FEAError::BeamNotFound(index))
    }

    /// Get node displacement
    pub fn node_displacement(&self, index: usize) -> FEAResult<NodeDisplacement> {
        let u = self.displacements()?;
        if index >= self.nodes.len() {
            return Err(FEAError::NodeNotFound(index));
        }
        let first = Node::first_dof(index);
        Ok(NodeDisplacement::from_array([
            u[first],
            u[first + 1],
            u[first + 2],
        ]))
    }

    /// Get node reactions
    pub fn node_reaction(&self, index: usize) -> FEAResult<Reactions> {
        let r = self.reactions()?;
        if index >= self.nodes.len() {
            return Err(FEAError::NodeNotFound(index));
        }
        let first = Node::first_dof(index);
        Ok(Reactions::from_array([r[first], r[first + 1], r[first + 2]]))
    }

    /// Movement of a slider node along and across its track
    ///
    /// `Ok(None)` when the node is not a slider.
    pub fn slider_drift(&self, index: usize) -> FEAResult<Option<SliderDrift>> {
        let u = self.displacements()?;
        let node = self.nodes.get(index).ok_or(FEAError::NodeNotFound(index))?;
        Ok(postprocess::slider_drift(index, node, u))
    }

    /// Smallest and largest combined stress over all beams
    pub fn stress_range(&self) -> FEAResult<(f64, f64)> {
        let report = &self.solution()?.report;
        Ok((report.min_stress, report.max_stress))
    }

    /// Applied loads and reactions summed over the model
    pub fn equilibrium(&self) -> FEAResult<Equilibrium> {
        Ok(self.solution()?.report.equilibrium)
    }

    /// Diagnostics of the last solve
    pub fn report(&self) -> FEAResult<&SolveReport> {
        Ok(&self.solution()?.report)
    }

    /// Get analysis summary
    pub fn summary(&self) -> FEAResult<AnalysisSummary> {
        let solution = self.solution()?;

        let mut summary = AnalysisSummary {
            num_nodes: self.nodes.len(),
            num_beams: self.beams.len(),
            total_dofs: solution.report.total_dofs,
            free_dofs: solution.report.free_dofs,
            stress_range: (solution.report.min_stress, solution.report.max_stress),
            ..Default::default()
        };

        for (index, node) in self.nodes.iter().enumerate() {
            let first = Node::first_dof(index);

            let disp = NodeDisplacement::from_array([
                self.displacement[first],
                self.displacement[first + 1],
                self.displacement[first + 2],
            ]);
            let mag = disp.translation_magnitude();
            if mag > summary.max_displacement {
                summary.max_displacement = mag;
                summary.max_disp_node = index;
            }

            if node.constraint.is_supported() {
                let rxn = Reactions::from_array([
                    solution.reactions[first],
                    solution.reactions[first + 1],
                    solution.reactions[first + 2],
                ]);
                let mag = rxn.force_magnitude();
                if mag > summary.max_reaction {
                    summary.max_reaction = mag;
                    summary.max_reaction_node = index;
                }
            }
        }

        for (index, beam) in self.beams.iter().enumerate() {
            let axial = beam.axial_force().abs();
            if axial > summary.max_axial {
                summary.max_axial = axial;
                summary.max_axial_beam = index;
            }
            if beam.max_moment() > summary.max_moment {
                summary.max_moment = beam.max_moment();
                summary.max_moment_beam = index;
            }
        }

        Ok(summary)
    }

    // ========================
    // Persistence
    // ========================

    /// Serialize the model (not its results) to JSON
    pub fn to_json(&self) -> FEAResult<String> {
        let loads = (0..self.nodes.len())
            .map(|index| self.load(index))
            .collect::<FEAResult<Vec<_>>>()?;

        let data = ModelData {
            nodes: self.nodes.clone(),
            beams: self.beams.clone(),
            materials: self.materials.clone(),
            sections: self.sections.clone(),
            loads,
            options: self.options.clone(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Rebuild a model from JSON and validate it
    pub fn from_json(json: &str) -> FEAResult<Self> {
        let data: ModelData = serde_json::from_str(json)?;

        if !data.loads.is_empty() && data.loads.len() != data.nodes.len() {
            return Err(FEAError::InvalidInput(format!(
                "{} loads given for {} nodes",
                data.loads.len(),
                data.nodes.len()
            )));
        }

        let total_dofs = data.nodes.len() * DOF_PER_NODE;
        let mut forces = FEVec::zeros(total_dofs);
        for (index, load) in data.loads.iter().enumerate() {
            let first = Node::first_dof(index);
            for (offset, value) in load.as_array().into_iter().enumerate() {
                forces[first + offset] = value;
            }
        }

        let system = Self {
            nodes: data.nodes,
            beams: data.beams,
            materials: data.materials,
            sections: data.sections,
            forces,
            options: data.options,
            displacement: FEVec::zeros(total_dofs),
            solution: None,
        };
        system.validate()?;
        Ok(system)
    }
}

/// Copy of a per-DOF vector without the entries of one node
fn without_node_dofs(values: &FEVec, index: usize) -> FEVec {
    let first = Node::first_dof(index);
    let kept: Vec<f64> = values
        .iter()
        .enumerate()
        .filter(|(dof, _)| !(first..first + DOF_PER_NODE).contains(dof))
        .map(|(_, &v)| v)
        .collect();
    FEVec::from_vec(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cantilever() -> FrameSystem {
        let mut model = FrameSystem::new();
        let steel = model.add_material(MaterialProfile::new("Steel", 200e9));
        let rect = model.add_section(SectionProfile::rectangular("Rect", 0.3, 0.5));

        let n1 = model.add_node(Node::new(0.0, 0.0).with_constraint(Constraint::Fixed));
        let n2 = model.add_node(Node::new(10.0, 0.0));
        model.add_beam(BeamElement::new(n1, n2, steel, rect)).unwrap();
        model.set_load(n2, NodeLoad::force(0.0, -10000.0)).unwrap();
        model
    }

    #[test]
    fn test_simple_cantilever() {
        let mut model = cantilever();
        model.solve().unwrap();

        let disp = model.node_displacement(1).unwrap();
        assert!(disp.dy < 0.0, "Expected negative Y displacement");

        let rxn = model.node_reaction(0).unwrap();
        assert_relative_eq!(rxn.fy, 10000.0, epsilon = 1e-4);
        assert_relative_eq!(rxn.mz, 100000.0, epsilon = 1e-4);
    }

    #[test]
    fn test_add_node_grows_forces() {
        let mut model = FrameSystem::new();
        model.add_node(Node::new(0.0, 0.0));
        model.add_node(Node::new(1.0, 0.0));
        assert_eq!(model.forces.len(), 6);
        model.set_load(1, NodeLoad::new(1.0, 2.0, 3.0)).unwrap();
        model.add_load(1, NodeLoad::force(1.0, 0.0)).unwrap();
        assert_eq!(model.load(1).unwrap(), NodeLoad::new(2.0, 2.0, 3.0));
        assert!(matches!(
            model.set_load(2, NodeLoad::default()),
            Err(FEAError::NodeNotFound(2))
        ));
    }

    #[test]
    fn test_results_require_solve() {
        let mut model = cantilever();
        assert!(matches!(model.displacements(), Err(FEAError::NotSolved)));

        model.solve().unwrap();
        assert!(model.is_solved());

        model.set_load(1, NodeLoad::force(0.0, -5.0)).unwrap();
        assert!(!model.is_solved());
        assert!(matches!(model.summary(), Err(FEAError::NotSolved)));
    }

    #[test]
    fn test_edits_and_failed_solves_clear_beam_results() {
        let mut model = cantilever();
        model.solve().unwrap();
        assert_relative_eq!(model.beams[0].max_moment(), 100000.0, max_relative = 1e-9);
        assert!(model.beams[0].stress().abs() > 0.0);

        model.set_load(1, NodeLoad::force(-500.0, 0.0)).unwrap();
        assert_eq!(model.beams[0].axial_force(), 0.0);
        assert_eq!(model.beams[0].max_moment(), 0.0);
        assert_eq!(model.beams[0].stress(), 0.0);

        model.solve().unwrap();
        assert_relative_eq!(model.beams[0].axial_force(), -500.0, max_relative = 1e-9);
        let solved = model.last_displacements().clone();

        model.nodes[1].constraint = Constraint::Fixed;
        assert!(matches!(model.solve(), Err(FEAError::NoFreeDofs)));
        assert_eq!(model.beams[0].axial_force(), 0.0);
        assert_eq!(model.beams[0].stress(), 0.0);
        assert_eq!(model.last_displacements(), &solved);
    }

    #[test]
    fn test_displacement_vector_tracks_nodes() {
        let mut model = FrameSystem::new();
        assert_eq!(model.last_displacements().len(), 0);

        model.add_node(Node::new(0.0, 0.0).with_constraint(Constraint::Fixed));
        model.add_node(Node::new(1.0, 0.0).with_constraint(Constraint::Fixed));
        assert_eq!(model.last_displacements(), &FEVec::zeros(6));

        assert!(matches!(model.solve(), Err(FEAError::NoFreeDofs)));
        assert_eq!(model.last_displacements(), &FEVec::zeros(6));

        model.add_node(Node::new(2.0, 0.0));
        model.remove_node(0).unwrap();
        assert_eq!(model.last_displacements().len(), 6);
    }

    #[test]
    fn test_remove_node_cascades() {
        let mut model = FrameSystem::new();
        let m = model.add_material(MaterialProfile::steel());
        let s = model.add_section(SectionProfile::default());
        for x in 0..4 {
            model.add_node(Node::new(x as f64, 0.0));
        }
        model.add_beam(BeamElement::new(0, 1, m, s)).unwrap();
        model.add_beam(BeamElement::new(1, 2, m, s)).unwrap();
        model.add_beam(BeamElement::new(2, 3, m, s)).unwrap();
        model.set_load(3, NodeLoad::force(5.0, 6.0)).unwrap();

        model.remove_node(1).unwrap();

        assert_eq!(model.nodes.len(), 3);
        assert_eq!(model.beams.len(), 1);
        assert_eq!(model.beams[0].nodes, [1, 2]);
        assert_eq!(model.forces.len(), 9);
        assert_eq!(model.load(2).unwrap(), NodeLoad::force(5.0, 6.0));
        model.validate().unwrap();
    }

    #[test]
    fn test_remove_catalog_entries_cascade() {
        let mut model = FrameSystem::new();
        let steel = model.add_material(MaterialProfile::steel());
        let alu = model.add_material(MaterialProfile::aluminum());
        let small = model.add_section(SectionProfile::circular("Small", 0.01));
        let large = model.add_section(SectionProfile::circular("Large", 0.02));
        for x in 0..3 {
            model.add_node(Node::new(x as f64, 0.0));
        }
        model.add_beam(BeamElement::new(0, 1, steel, large)).unwrap();
        model.add_beam(BeamElement::new(1, 2, alu, small)).unwrap();

        model.remove_material(steel).unwrap();
        assert_eq!(model.beams.len(), 1);
        assert_eq!(model.beams[0].material, 0);

        model.remove_section(small).unwrap();
        assert!(model.beams.is_empty());
        assert_eq!(model.sections[0].name, "Large");
    }

    #[test]
    fn test_add_beam_rejects_bad_references() {
        let mut model = FrameSystem::new();
        model.add_material(MaterialProfile::steel());
        model.add_section(SectionProfile::default());
        model.add_node(Node::new(0.0, 0.0));
        model.add_node(Node::new(1.0, 0.0));

        assert!(matches!(
            model.add_beam(BeamElement::new(0, 5, 0, 0)),
            Err(FEAError::NodeNotFound(5))
        ));
        assert!(matches!(
            model.add_beam(BeamElement::new(1, 1, 0, 0)),
            Err(FEAError::DuplicateNodeReference(1))
        ));
        assert!(matches!(
            model.add_beam(BeamElement::new(0, 1, 2, 0)),
            Err(FEAError::MaterialNotFound(2))
        ));
        assert!(matches!(
            model.add_beam(BeamElement::new(0, 1, 0, 1)),
            Err(FEAError::SectionNotFound(1))
        ));
        assert_eq!(model.add_beam(BeamElement::new(0, 1, 0, 0)).unwrap(), 0);
    }

    #[test]
    fn test_validate_catches_direct_edits() {
        let mut model = cantilever();
        model.beams[0].section = 9;
        assert!(matches!(model.validate(), Err(FEAError::SectionNotFound(9))));
        assert_eq!(model.solve_status(), -4);

        let mut model = cantilever();
        model.forces = FEVec::zeros(2);
        assert!(matches!(model.validate(), Err(FEAError::InvalidInput(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let mut model = cantilever();
        let json = model.to_json().unwrap();
        let mut restored = FrameSystem::from_json(&json).unwrap();

        assert_eq!(restored.nodes, model.nodes);
        assert_eq!(restored.beams, model.beams);
        assert_eq!(restored.forces, model.forces);

        let a = model.solve().unwrap();
        let b = restored.solve().unwrap();
        assert_eq!(a.free_dofs, b.free_dofs);
        assert_eq!(model.displacements().unwrap(), restored.displacements().unwrap());
    }

    #[test]
    fn test_from_json_rejects_dangling_beam() {
        let json = r#"{
            "nodes": [{"x": 0.0, "y": 0.0}],
            "beams": [{"nodes": [0, 1], "material": 0, "section": 0, "truss": false}],
            "materials": [{"name": "Steel", "youngs_modulus": 2.0e11}],
            "sections": [{"name": "S", "area": 1.0e-4, "moment_of_inertia": 0.0, "section_modulus": 0.0}]
        }"#;
        assert!(matches!(
            FrameSystem::from_json(json),
            Err(FEAError::NodeNotFound(1))
        ));
    }
}
