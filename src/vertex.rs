use crate::math::{Point2, Point3, Projector};

/// Vertex structure with rotated position and screen position
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: Point3,
    pub screen_position: Point2,
}

impl Vertex {
    /// Projects an already rotated point
    pub fn project(position: Point3, projector: &Projector) -> Self {
        Vertex {
            position,
            screen_position: projector.project(position),
        }
    }
}
