//! Transforms and poses for placing fields and drones in the world

use crate::quaternion::Quat;
use crate::vector::Vec3;

/// World placement of a field: position, rotation, and scale
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    /// Identity transform
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create from position only
    #[inline]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Create from position and rotation
    #[inline]
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            scale: Vec3::ONE,
        }
    }

    /// Set scale (builder pattern)
    #[inline]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Transform a local point into world space
    #[inline]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * point.scale_by(self.scale)
    }

    /// Bring a world point into this transform's local space
    pub fn inverse_transform_point(&self, point: Vec3) -> Vec3 {
        let unrotated = self.rotation.inverse() * (point - self.position);
        Vec3::new(
            unrotated.x / self.scale.x,
            unrotated.y / self.scale.y,
            unrotated.z / self.scale.z,
        )
    }

    /// Rotate a local direction into world space. Scale does not affect
    /// directions.
    #[inline]
    pub fn transform_direction(&self, direction: Vec3) -> Vec3 {
        self.rotation * direction
    }

    /// Whether position, rotation and scale are all finite
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }

    /// Position and rotation without scale
    #[inline]
    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.rotation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Position and rotation, e.g. a teleport destination
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    #[inline]
    pub const fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Pose at `position` with no rotation
    #[inline]
    pub fn at(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    /// Same position, different rotation
    #[inline]
    pub fn with_rotation(self, rotation: Quat) -> Self {
        Self::new(self.position, rotation)
    }
}

impl From<Transform> for Pose {
    fn from(transform: Transform) -> Self {
        transform.pose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAC_PI_2;

    #[test]
    fn test_transform_identity() {
        let point = Vec3::new(1.0, 2.0, 3.0);
        let result = Transform::IDENTITY.transform_point(point);
        assert!((result - point).length() < 1e-6);
    }

    #[test]
    fn test_transform_translation() {
        let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        let result = t.transform_point(Vec3::ZERO);
        assert!((result - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-6);
    }

    #[test]
    fn test_direction_ignores_position_and_scale() {
        let t = Transform::from_position_rotation(
            Vec3::new(5.0, 5.0, 5.0),
            Quat::from_rotation_y(FRAC_PI_2),
        )
        .with_scale(Vec3::splat(3.0));

        let dir = t.transform_direction(Vec3::Z);
        assert!((dir - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_inverse_transform_point() {
        let t = Transform::from_position_rotation(
            Vec3::new(1.0, 0.0, -2.0),
            Quat::from_rotation_z(0.4),
        )
        .with_scale(Vec3::new(2.0, 1.0, 0.5));
        let local = Vec3::new(0.3, -0.7, 1.2);
        let back = t.inverse_transform_point(t.transform_point(local));
        assert!((back - local).length() < 1e-5);
    }

    #[test]
    fn test_pose_from_transform_drops_scale() {
        let t = Transform::from_position(Vec3::X).with_scale(Vec3::splat(4.0));
        let pose: Pose = t.into();
        assert_eq!(pose, Pose::at(Vec3::X));
    }
}
