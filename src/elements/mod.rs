//! Structural elements module

mod beam;
mod constraint;
mod material;
mod node;
mod section;

pub use beam::BeamElement;
pub use constraint::{Constraint, DX, DY, RZ};
pub use material::MaterialProfile;
pub use node::{Node, DOF_PER_NODE};
pub use section::SectionProfile;
