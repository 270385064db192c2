/// Radians of user rotation per unit of pointer movement
pub const DRAG_SENSITIVITY: f64 = 0.005;
/// Radians per frame for each unit of configured rotation speed
pub const ROTATION_STEP: f64 = 0.01;
/// Progress per frame for each unit of configured beam speed
pub const BEAM_STEP: f64 = 0.005;

/// Rotation accumulators
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RotationState {
    /// Autonomous rotation around the X-axis
    pub auto_x: f64,
    /// Autonomous rotation around the Y-axis
    pub auto_y: f64,
    /// User rotation around the X-axis
    pub user_x: f64,
    /// User rotation around the Y-axis
    pub user_y: f64,
}

impl RotationState {
    /// Advances the autonomous rotation by one frame
    pub fn advance(&mut self, rotation_speed: f64) {
        let step = rotation_speed * ROTATION_STEP;
        self.auto_x += step;
        self.auto_y += step;
    }

    /// Applies a pointer drag; horizontal movement turns about Y, vertical about X
    pub fn drag(&mut self, dx: f64, dy: f64) {
        self.user_y += dx * DRAG_SENSITIVITY;
        self.user_x += dy * DRAG_SENSITIVITY;
    }

    /// Adds a direct angular offset to the user rotation
    pub fn nudge(&mut self, angle_x: f64, angle_y: f64) {
        self.user_x += angle_x;
        self.user_y += angle_y;
    }

    /// Effective angles: autonomous plus user rotation
    pub fn angles(&self) -> (f64, f64) {
        (self.auto_x + self.user_x, self.auto_y + self.user_y)
    }
}

/// Beam position along its path
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BeamState {
    pub progress: f64,
}

impl BeamState {
    pub fn advance(&mut self, beam_speed: f64) {
        self.progress += beam_speed * BEAM_STEP;
    }
}

/// Animation state owned by one renderer
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RenderSession {
    pub rotation: RotationState,
    pub beam: BeamState,
    /// Number of ticks rendered so far
    pub frame: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_auto_rotation_accumulates() {
        let mut rotation = RotationState::default();
        for _ in 0..10 {
            rotation.advance(0.5);
        }
        assert_relative_eq!(rotation.auto_x, 0.05, max_relative = 1e-12);
        assert_relative_eq!(rotation.auto_y, 0.05, max_relative = 1e-12);
    }

    #[test]
    fn test_drag_updates_user_rotation() {
        let mut rotation = RotationState::default();
        rotation.drag(100.0, -40.0);
        assert_relative_eq!(rotation.user_y, 0.5);
        assert_relative_eq!(rotation.user_x, -0.2);
        assert_eq!(rotation.auto_x, 0.0);
    }

    #[test]
    fn test_effective_angles_sum_both_pairs() {
        let mut rotation = RotationState::default();
        rotation.advance(10.0);
        rotation.nudge(0.25, -0.5);
        let (x, y) = rotation.angles();
        assert_relative_eq!(x, 0.35);
        assert_relative_eq!(y, -0.4);
    }

    #[test]
    fn test_beam_progress() {
        let mut beam = BeamState::default();
        beam.advance(2.0);
        beam.advance(2.0);
        assert_relative_eq!(beam.progress, 0.02);
    }

    #[test]
    fn test_nan_speed_propagates() {
        let mut beam = BeamState::default();
        beam.advance(f64::NAN);
        assert!(beam.progress.is_nan());
    }
}
