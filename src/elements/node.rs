//! Node element - a point in the plane of the frame

use serde::{Deserialize, Serialize};

use super::Constraint;

/// Number of degrees of freedom carried by every node (DX, DY, RZ)
pub const DOF_PER_NODE: usize = 3;

/// A 2D node in the frame model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Support condition
    #[serde(default)]
    pub constraint: Constraint,
}

impl Node {
    /// Create a new free node at the given coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            constraint: Constraint::Free,
        }
    }

    /// Set the support condition
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = constraint;
        self
    }

    /// Get the coordinates as an array
    pub fn coords(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Calculate distance to another node
    pub fn distance_to(&self, other: &Node) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Global index of this node's first DOF
    pub fn first_dof(index: usize) -> usize {
        index * DOF_PER_NODE
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation() {
        let node = Node::new(1.0, 2.0).with_constraint(Constraint::FixedPin);
        assert_eq!(node.x, 1.0);
        assert_eq!(node.y, 2.0);
        assert_eq!(node.constraint, Constraint::FixedPin);
    }

    #[test]
    fn test_node_distance() {
        let n1 = Node::new(0.0, 0.0);
        let n2 = Node::new(3.0, 4.0);
        assert!((n1.distance_to(&n2) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_first_dof() {
        assert_eq!(Node::first_dof(0), 0);
        assert_eq!(Node::first_dof(4), 12);
    }
}
