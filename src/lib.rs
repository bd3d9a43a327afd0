//! Frame Solver - planar frame and truss analysis with the direct stiffness method
//!
//! This library provides a 2D linear static structural solver supporting:
//! - Rigid-jointed beams and pin-ended truss bars
//! - Free, fixed, pinned and inclined slider supports
//! - Slider tracks enforced with Lagrange multipliers
//! - End forces, reactions, combined axial + bending stress
//!
//! ## Example
//! ```rust
//! use frame_solver::prelude::*;
//!
//! let mut model = FrameSystem::new();
//!
//! // Catalogs
//! let steel = model.add_material(MaterialProfile::steel());
//! let rod = model.add_section(SectionProfile::circular("Rod", 0.0127));
//!
//! // Nodes
//! let base = model.add_node(Node::new(0.0, 0.0).with_constraint(Constraint::Fixed));
//! let tip = model.add_node(Node::new(1.0, 0.0));
//!
//! // Cantilever with a downward tip load
//! model.add_beam(BeamElement::new(base, tip, steel, rod)).unwrap();
//! model.set_load(tip, NodeLoad::force(0.0, -100.0)).unwrap();
//!
//! // Analyze
//! model.solve().unwrap();
//!
//! // Get results
//! let displacement = model.node_displacement(tip).unwrap();
//! assert!(displacement.dy < 0.0);
//! ```

pub mod analysis;
pub mod elements;
pub mod error;
pub mod loads;
pub mod math;
pub mod model;
pub mod results;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::AnalysisOptions;
    pub use crate::elements::{BeamElement, Constraint, MaterialProfile, Node, SectionProfile};
    pub use crate::error::{FEAError, FEAResult};
    pub use crate::loads::NodeLoad;
    pub use crate::model::FrameSystem;
    pub use crate::results::{
        AnalysisSummary, BeamForces, Equilibrium, NodeDisplacement, Reactions, SliderDrift,
        SolveReport,
    };
}
