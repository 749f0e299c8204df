//! # forcefield_math - Spatial Primitives
//!
//! Small value types shared by the forcefield crates: a 3D vector, a
//! rotation quaternion, and transforms/poses built from them.
//!
//! Enable the `serde` feature to (de)serialize them inside field
//! configurations.

pub mod quaternion;
pub mod transform;
pub mod vector;

pub use quaternion::*;
pub use transform::*;
pub use vector::*;

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const FRAC_PI_2: f32 = PI / 2.0;
}

pub mod prelude {
    pub use crate::quaternion::Quat;
    pub use crate::transform::{Pose, Transform};
    pub use crate::vector::Vec3;
}
