//! Minimal vector math for joint angles

use repsense_core::Landmark;

/// Bones shorter than this are treated as degenerate
const MIN_BONE_LENGTH: f32 = 1e-4;

/// 3D vector
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Full 3D position of a landmark
    pub fn from_landmark(lm: &Landmark) -> Self {
        Self::new(lm.x, lm.y, lm.z)
    }

    /// Image-plane projection of a landmark (depth dropped)
    pub fn projected(lm: &Landmark) -> Self {
        Self::new(lm.x, lm.y, 0.0)
    }

    #[inline]
    pub fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    #[inline]
    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }
}

/// Angle at `vertex` between the bones to `a` and `b`, in degrees
///
/// cos(θ) = (v1 · v2) / (|v1| × |v2|). Returns `None` when either bone is
/// degenerate, since no meaningful angle exists.
pub fn angle_at(a: Vec3, vertex: Vec3, b: Vec3) -> Option<f32> {
    let v1 = a.sub(vertex);
    let v2 = b.sub(vertex);

    let mag1 = v1.length();
    let mag2 = v2.length();
    if mag1 < MIN_BONE_LENGTH || mag2 < MIN_BONE_LENGTH {
        return None;
    }

    let cos_angle = (v1.dot(v2) / (mag1 * mag2)).clamp(-1.0, 1.0);
    let angle = cos_angle.acos().to_degrees();
    angle.is_finite().then_some(angle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_limb() {
        let angle = angle_at(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        )
        .unwrap();
        assert!((angle - 180.0).abs() < 0.01);
    }

    #[test]
    fn test_right_angle() {
        let angle = angle_at(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::new(0.5, 0.5, 0.0),
        )
        .unwrap();
        assert!((angle - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_depth_changes_angle() {
        // Same image-plane projection, different depth
        let a = Vec3::new(0.0, 0.0, 0.0);
        let vertex = Vec3::new(0.5, 0.0, 0.0);
        let flat = Vec3::new(1.0, 0.0, 0.0);
        let deep = Vec3::new(1.0, 0.0, 0.5);

        let flat_angle = angle_at(a, vertex, flat).unwrap();
        let deep_angle = angle_at(a, vertex, deep).unwrap();
        assert!(deep_angle < flat_angle);
    }

    #[test]
    fn test_degenerate_bone() {
        let p = Vec3::new(0.3, 0.3, 0.0);
        assert!(angle_at(p, p, Vec3::new(1.0, 0.0, 0.0)).is_none());
    }
}
