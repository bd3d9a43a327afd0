//! Node constraint conditions

use serde::{Deserialize, Serialize};

/// Local DOF offsets within a node: x-translation, y-translation, rotation
pub const DX: usize = 0;
pub const DY: usize = 1;
pub const RZ: usize = 2;

/// Support condition at a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum Constraint {
    /// No restraint
    #[default]
    Free,
    /// Translations and rotation restrained
    Fixed,
    /// Translations restrained, rotation free
    FixedPin,
    /// Roller: free to move along `angle` (degrees from global X), free to rotate
    Slider { angle: f64 },
}

impl Constraint {
    /// Create a slider (roller) support along the given direction in degrees
    pub fn slider(angle: f64) -> Self {
        Self::Slider { angle }
    }

    /// Get list of free DOF offsets (0-2) for a node with this constraint
    ///
    /// Slider DOFs are all free here; the track is enforced separately
    /// through a multi-point constraint row.
    pub fn free_dofs(&self) -> &'static [usize] {
        match self {
            Constraint::Free => &[DX, DY, RZ],
            Constraint::Slider { .. } => &[DX, DY, RZ],
            Constraint::FixedPin => &[RZ],
            Constraint::Fixed => &[],
        }
    }

    /// Get list of eliminated DOF offsets (0-2)
    pub fn restrained_dofs(&self) -> &'static [usize] {
        match self {
            Constraint::Free | Constraint::Slider { .. } => &[],
            Constraint::FixedPin => &[DX, DY],
            Constraint::Fixed => &[DX, DY, RZ],
        }
    }

    /// Unit vector perpendicular to the slider track, `None` for other kinds
    pub fn slider_normal(&self) -> Option<[f64; 2]> {
        match self {
            Constraint::Slider { angle } => {
                let normal = angle.to_radians() + std::f64::consts::FRAC_PI_2;
                Some([normal.cos(), normal.sin()])
            }
            _ => None,
        }
    }

    /// Unit vector along the slider track, `None` for other kinds
    pub fn slider_track(&self) -> Option<[f64; 2]> {
        match self {
            Constraint::Slider { angle } => {
                let theta = angle.to_radians();
                Some([theta.cos(), theta.sin()])
            }
            _ => None,
        }
    }

    /// Check if any DOF is restrained (directly or through a track)
    pub fn is_supported(&self) -> bool {
        !matches!(self, Constraint::Free)
    }

    pub fn is_slider(&self) -> bool {
        matches!(self, Constraint::Slider { .. })
    }

    /// Short label used in logs and reports
    pub fn label(&self) -> &'static str {
        match self {
            Constraint::Free => "Free",
            Constraint::Fixed => "Fixed",
            Constraint::FixedPin => "FixedPin",
            Constraint::Slider { .. } => "Slider",
        }
    }
}
