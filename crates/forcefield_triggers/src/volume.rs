//! Trigger volume shapes

use forcefield_math::{Transform, Vec3};
use serde::{Deserialize, Serialize};

/// Trigger volume shapes, defined around their local origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum TriggerVolume {
    /// Box aligned with the local axes
    Box {
        /// Half-extents (width/2, height/2, depth/2)
        half_extents: [f32; 3],
    },
    /// Sphere
    Sphere {
        /// Radius
        radius: f32,
    },
    /// Capsule (cylinder with hemisphere caps)
    Capsule {
        /// Radius
        radius: f32,
        /// Half-height (cylinder portion only)
        half_height: f32,
        /// Axis (0 = X, 1 = Y, 2 = Z)
        axis: u8,
    },
    /// Cylinder
    Cylinder {
        /// Radius
        radius: f32,
        /// Half-height
        half_height: f32,
        /// Axis (0 = X, 1 = Y, 2 = Z)
        axis: u8,
    },
}

impl TriggerVolume {
    /// Create a box trigger volume
    pub fn box_shape(width: f32, height: f32, depth: f32) -> Self {
        Self::Box {
            half_extents: [width / 2.0, height / 2.0, depth / 2.0],
        }
    }

    /// Create a cube trigger volume
    pub fn cube(size: f32) -> Self {
        Self::box_shape(size, size, size)
    }

    /// Create a sphere trigger volume
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    /// Create a capsule trigger volume (Y-axis aligned)
    pub fn capsule(radius: f32, height: f32) -> Self {
        Self::Capsule {
            radius,
            half_height: height / 2.0,
            axis: 1,
        }
    }

    /// Create a cylinder trigger volume (Y-axis aligned)
    pub fn cylinder(radius: f32, height: f32) -> Self {
        Self::Cylinder {
            radius,
            half_height: height / 2.0,
            axis: 1,
        }
    }

    /// Check if a local-space point is inside this volume
    pub fn contains_point(&self, point: Vec3) -> bool {
        let p = point.to_array();
        match self {
            Self::Box { half_extents } => {
                p[0].abs() <= half_extents[0]
                    && p[1].abs() <= half_extents[1]
                    && p[2].abs() <= half_extents[2]
            }
            Self::Sphere { radius } => point.length_squared() <= radius * radius,
            Self::Capsule {
                radius,
                half_height,
                axis,
            } => {
                let axis = Self::axis_index(*axis);
                // Closest point on the capsule's core segment
                let mut closest = [0.0f32; 3];
                closest[axis] = p[axis].clamp(-*half_height, *half_height);

                let dist_sq = (point - Vec3::from_array(closest)).length_squared();
                dist_sq <= radius * radius
            }
            Self::Cylinder {
                radius,
                half_height,
                axis,
            } => {
                let axis = Self::axis_index(*axis);
                if p[axis].abs() > *half_height {
                    return false;
                }
                let dist_sq: f32 = (0..3).filter(|&i| i != axis).map(|i| p[i] * p[i]).sum();
                dist_sq <= radius * radius
            }
        }
    }

    /// Check if a world-space point is inside the volume placed at `transform`
    pub fn contains_point_transformed(&self, point: Vec3, transform: &Transform) -> bool {
        self.contains_point(transform.inverse_transform_point(point))
    }

    /// Local axis-aligned bounding box (min, max)
    pub fn bounding_box(&self) -> (Vec3, Vec3) {
        match self {
            Self::Box { half_extents } => {
                let h = Vec3::from_array(*half_extents);
                (-h, h)
            }
            Self::Sphere { radius } => (Vec3::splat(-*radius), Vec3::splat(*radius)),
            Self::Capsule {
                radius,
                half_height,
                axis,
            } => Self::axial_bounds(*radius, *half_height + *radius, *axis),
            Self::Cylinder {
                radius,
                half_height,
                axis,
            } => Self::axial_bounds(*radius, *half_height, *axis),
        }
    }

    fn axial_bounds(radius: f32, half_length: f32, axis: u8) -> (Vec3, Vec3) {
        let axis = Self::axis_index(axis);
        let mut min = [-radius; 3];
        let mut max = [radius; 3];
        min[axis] = -half_length;
        max[axis] = half_length;
        (Vec3::from_array(min), Vec3::from_array(max))
    }

    // Out-of-range axes fall back to Z
    fn axis_index(axis: u8) -> usize {
        (axis as usize).min(2)
    }
}

impl Default for TriggerVolume {
    fn default() -> Self {
        Self::box_shape(1.0, 1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forcefield_math::{consts::FRAC_PI_2, Quat};

    #[test]
    fn test_box_contains() {
        let volume = TriggerVolume::box_shape(2.0, 2.0, 2.0);

        assert!(volume.contains_point(Vec3::ZERO));
        assert!(volume.contains_point(Vec3::new(0.9, 0.9, 0.9)));
        assert!(!volume.contains_point(Vec3::new(1.5, 0.0, 0.0)));
    }

    #[test]
    fn test_sphere_contains() {
        let volume = TriggerVolume::sphere(1.0);

        assert!(volume.contains_point(Vec3::ZERO));
        assert!(volume.contains_point(Vec3::new(0.5, 0.5, 0.5)));
        assert!(!volume.contains_point(Vec3::new(1.0, 1.0, 0.0)));
    }

    #[test]
    fn test_capsule_contains() {
        let volume = TriggerVolume::capsule(0.5, 2.0);

        assert!(volume.contains_point(Vec3::ZERO));
        assert!(volume.contains_point(Vec3::new(0.0, 1.0, 0.0)));
        assert!(volume.contains_point(Vec3::new(0.0, 1.4, 0.0))); // top hemisphere
        assert!(!volume.contains_point(Vec3::new(0.0, 2.0, 0.0)));
    }

    #[test]
    fn test_cylinder_contains() {
        let volume = TriggerVolume::cylinder(1.0, 2.0);

        assert!(volume.contains_point(Vec3::new(0.7, 0.9, 0.0)));
        assert!(!volume.contains_point(Vec3::new(0.0, 1.1, 0.0)));
        assert!(!volume.contains_point(Vec3::new(0.8, 0.0, 0.8)));
    }

    #[test]
    fn test_rotated_box() {
        // Long along local X, turned so that it is long along world Z
        let volume = TriggerVolume::box_shape(10.0, 1.0, 1.0);
        let transform =
            Transform::from_position_rotation(Vec3::ZERO, Quat::from_rotation_y(FRAC_PI_2));

        assert!(volume.contains_point_transformed(Vec3::new(0.0, 0.0, 4.0), &transform));
        assert!(!volume.contains_point_transformed(Vec3::new(4.0, 0.0, 0.0), &transform));
    }

    #[test]
    fn test_translated_and_scaled() {
        let volume = TriggerVolume::cube(1.0);
        let transform =
            Transform::from_position(Vec3::new(10.0, 0.0, 0.0)).with_scale(Vec3::splat(4.0));

        assert!(volume.contains_point_transformed(Vec3::new(11.5, 0.0, 0.0), &transform));
        assert!(!volume.contains_point_transformed(Vec3::new(12.5, 0.0, 0.0), &transform));
        assert!(!volume.contains_point_transformed(Vec3::ZERO, &transform));
    }

    #[test]
    fn test_bounding_box() {
        let (min, max) = TriggerVolume::box_shape(2.0, 4.0, 2.0).bounding_box();
        assert_eq!(min, Vec3::new(-1.0, -2.0, -1.0));
        assert_eq!(max, Vec3::new(1.0, 2.0, 1.0));

        let (min, max) = TriggerVolume::capsule(0.5, 2.0).bounding_box();
        assert_eq!(min, Vec3::new(-0.5, -1.5, -0.5));
        assert_eq!(max, Vec3::new(0.5, 1.5, 0.5));
    }
}
