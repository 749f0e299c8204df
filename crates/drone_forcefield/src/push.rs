//! Push computation
//!
//! Pure functions over the push settings; the controller supplies drone
//! state and writes the result back.

use crate::config::PushSettings;
use forcefield_math::{Transform, Vec3};

/// Scale applied to additive pushes. Together with the step length this
/// turns `strength` into an acceleration-like impulse; existing scenes are
/// tuned against it.
pub const ADDITIVE_PUSH_SCALE: f32 = 10.0;

/// World-space direction the drone is pushed in.
///
/// Pushing from a point yields `-normalize(origin - drone)`, i.e. away from
/// the origin, which is `settings.origin` or the field's position. A drone
/// sitting exactly on the origin gets a zero direction.
pub fn push_direction(settings: &PushSettings, field: &Transform, drone_position: Vec3) -> Vec3 {
    if settings.from_point {
        let origin = settings.origin.unwrap_or(field.position);
        -(origin - drone_position).normalize_or_zero()
    } else if settings.local_space {
        field.transform_direction(settings.direction)
    } else {
        settings.direction
    }
}

/// Velocity after pushing along `direction`
pub fn pushed_velocity(
    settings: &PushSettings,
    direction: Vec3,
    current_velocity: Vec3,
    step_seconds: f32,
) -> Vec3 {
    let push = direction * settings.strength;
    if settings.override_velocity {
        push
    } else {
        current_velocity + push * ADDITIVE_PUSH_SCALE * step_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use forcefield_math::{consts::FRAC_PI_2, Quat};

    fn from_point() -> PushSettings {
        PushSettings {
            from_point: true,
            ..Default::default()
        }
    }

    fn constant(direction: Vec3, local_space: bool) -> PushSettings {
        PushSettings {
            from_point: false,
            direction,
            local_space,
            ..Default::default()
        }
    }

    #[test]
    fn test_point_push_points_away_from_field() {
        let dir = push_direction(&from_point(), &Transform::IDENTITY, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(dir, Vec3::X);

        let dir = push_direction(&from_point(), &Transform::IDENTITY, Vec3::new(0.0, -3.0, 4.0));
        assert_relative_eq!(dir.y, -0.6, epsilon = 1e-6);
        assert_relative_eq!(dir.z, 0.8, epsilon = 1e-6);
    }

    #[test]
    fn test_explicit_origin_overrides_field_position() {
        let settings = PushSettings {
            origin: Some(Vec3::new(0.0, 10.0, 0.0)),
            ..from_point()
        };
        let field = Transform::from_position(Vec3::new(50.0, 0.0, 0.0));

        let dir = push_direction(&settings, &field, Vec3::new(0.0, 8.0, 0.0));
        assert_eq!(dir, Vec3::NEG_Y);
    }

    #[test]
    fn test_drone_on_origin_gets_no_direction() {
        let field = Transform::from_position(Vec3::new(2.0, 2.0, 2.0));
        let dir = push_direction(&from_point(), &field, Vec3::new(2.0, 2.0, 2.0));
        assert_eq!(dir, Vec3::ZERO);
    }

    #[test]
    fn test_constant_direction_world_and_local() {
        let field = Transform::from_position_rotation(
            Vec3::new(3.0, 0.0, 0.0),
            Quat::from_rotation_y(FRAC_PI_2),
        );

        let world = push_direction(&constant(Vec3::Z, false), &field, Vec3::ZERO);
        assert_eq!(world, Vec3::Z);

        let local = push_direction(&constant(Vec3::Z, true), &field, Vec3::ZERO);
        assert!((local - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_override_ignores_prior_velocity() {
        let settings = PushSettings {
            strength: 5.0,
            override_velocity: true,
            ..Default::default()
        };

        let v = pushed_velocity(&settings, Vec3::X, Vec3::new(-40.0, 3.0, 7.0), 0.02);
        assert_eq!(v, Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_additive_push_scales_with_step() {
        let settings = PushSettings {
            strength: 10.0,
            override_velocity: false,
            ..Default::default()
        };

        let v = pushed_velocity(&settings, Vec3::Y, Vec3::new(1.0, 2.0, 3.0), 0.02);
        // 2 + 10 * 10 * 0.02
        assert_relative_eq!(v.x, 1.0);
        assert_relative_eq!(v.y, 4.0, epsilon = 1e-5);
        assert_relative_eq!(v.z, 3.0);
    }
}
