//! Error types for the frame solver

use thiserror::Error;

/// Main error type for frame analysis operations
#[derive(Error, Debug)]
pub enum FEAError {
    #[error("Node {0} not found in model")]
    NodeNotFound(usize),

    #[error("Beam {0} not found in model")]
    BeamNotFound(usize),

    #[error("Material {0} not found in catalog")]
    MaterialNotFound(usize),

    #[error("Section {0} not found in catalog")]
    SectionNotFound(usize),

    #[error("Beam connects node {0} to itself")]
    DuplicateNodeReference(usize),

    #[error("No free degrees of freedom to solve")]
    NoFreeDofs,

    #[error("Augmented system solve returned {actual} values, expected {expected}")]
    AugmentedSizeMismatch { expected: usize, actual: usize },

    #[error("Singular stiffness matrix - model may be a mechanism or have insufficient supports")]
    SingularMatrix,

    #[error("Model not solved - run solve() first")]
    NotSolved,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl FEAError {
    /// Integer status reported to collaborators that only understand codes.
    ///
    /// `0` is reserved for success, see [`crate::model::FrameSystem::solve_status`].
    pub fn status_code(&self) -> i32 {
        match self {
            FEAError::NoFreeDofs => -1,
            FEAError::AugmentedSizeMismatch { .. } => -2,
            FEAError::SingularMatrix => -3,
            FEAError::NodeNotFound(_)
            | FEAError::BeamNotFound(_)
            | FEAError::MaterialNotFound(_)
            | FEAError::SectionNotFound(_)
            | FEAError::DuplicateNodeReference(_)
            | FEAError::InvalidInput(_) => -4,
            FEAError::NotSolved | FEAError::SerializationError(_) => -5,
        }
    }
}

/// Result type for frame analysis operations
pub type FEAResult<T> = Result<T, FEAError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(FEAError::NoFreeDofs.status_code(), -1);
        assert_eq!(
            FEAError::AugmentedSizeMismatch { expected: 4, actual: 3 }.status_code(),
            -2
        );
        assert_eq!(FEAError::SingularMatrix.status_code(), -3);
        assert_eq!(FEAError::NodeNotFound(7).status_code(), -4);
    }

    #[test]
    fn test_messages() {
        let err = FEAError::AugmentedSizeMismatch { expected: 10, actual: 9 };
        assert_eq!(
            err.to_string(),
            "Augmented system solve returned 9 values, expected 10"
        );
    }
}
