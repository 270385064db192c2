/// Smallest magnitude allowed for the perspective denominator
pub const MIN_DEPTH: f64 = 1e-6;

/// A point in sphere-local or rotated world space
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Point3 { x, y, z }
    }

    /// Euclidean length of the vector from the origin
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn from_array(v: [f64; 3]) -> Self {
        Point3::new(v[0], v[1], v[2])
    }
}

/// A point in screen space
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Point2 { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Multiplies a 3x3 matrix by a 3-dimensional vector
pub fn multiply_matrix_vector(matrix: &[[f64; 3]; 3], vector: &[f64; 3]) -> [f64; 3] {
    let mut result = [0.0; 3];
    for i in 0..3 {
        for j in 0..3 {
            result[i] += matrix[i][j] * vector[j];
        }
    }
    result
}

/// Rotation of the (y, z) plane about the X-axis
pub fn rotation_x(angle: f64) -> [[f64; 3]; 3] {
    let (sin_x, cos_x) = angle.sin_cos();
    [[1.0, 0.0, 0.0], [0.0, cos_x, -sin_x], [0.0, sin_x, cos_x]]
}

/// Rotation of the (x, z) plane about the Y-axis
pub fn rotation_y(angle: f64) -> [[f64; 3]; 3] {
    let (sin_y, cos_y) = angle.sin_cos();
    [[cos_y, 0.0, sin_y], [0.0, 1.0, 0.0], [-sin_y, 0.0, cos_y]]
}

/// Rotation about X followed by rotation about Y.
///
/// The matrices are built once per frame and then applied to every point,
/// so the trigonometry is not recomputed for each of the sphere's points.
#[derive(Clone, Copy, Debug)]
pub struct Rotation {
    rotation_x: [[f64; 3]; 3],
    rotation_y: [[f64; 3]; 3],
}

impl Rotation {
    pub fn new(angle_x: f64, angle_y: f64) -> Self {
        Rotation {
            rotation_x: rotation_x(angle_x),
            rotation_y: rotation_y(angle_y),
        }
    }

    /// Rotates `(y, z)` by the X angle, then the resulting `(x, z)` by the Y angle
    pub fn apply(&self, point: Point3) -> Point3 {
        let about_x = multiply_matrix_vector(&self.rotation_x, &point.to_array());
        Point3::from_array(multiply_matrix_vector(&self.rotation_y, &about_x))
    }
}

/// Fixed-distance perspective projection onto the screen
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projector {
    pub camera_distance: f64,
    pub center: Point2,
    /// Multiplier on the projected offset from the center; 1.0 is the plain perspective divide
    pub scale: f64,
}

impl Projector {
    pub fn new(camera_distance: f64, center: Point2) -> Self {
        Projector {
            camera_distance,
            center,
            scale: 1.0,
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Perspective factor for a given depth, with the denominator kept away from zero
    pub fn depth_factor(&self, z: f64) -> f64 {
        let mut denominator = self.camera_distance + z;
        if denominator.abs() < MIN_DEPTH {
            denominator = if denominator < 0.0 { -MIN_DEPTH } else { MIN_DEPTH };
        }
        self.camera_distance / denominator
    }

    pub fn project(&self, point: Point3) -> Point2 {
        let factor = self.depth_factor(point.z) * self.scale;
        Point2::new(
            point.x * factor + self.center.x,
            point.y * factor + self.center.y,
        )
    }
}
