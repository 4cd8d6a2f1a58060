//! Vector types and traits for particle positions.

use crate::float::Float;
use core::ops::{Add, Sub, Neg};

/// Trait for vector types used by the simulation.
///
/// Abstracts over dimensionality (2D sheets, 3D surfaces) so particles,
/// constraints and picking are written once. Vectors are plain values:
/// every operation returns a new vector, nothing is mutated through an alias.
pub trait Vec:
    Copy
    + Clone
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + PartialEq
    + Default
    + core::fmt::Debug
{
    /// The scalar (float) type for this vector.
    type Scalar: Float;

    /// Number of scalar components, i.e. the stride in a flat vertex buffer.
    const DIM: usize;

    /// Zero vector.
    fn zero() -> Self;

    /// Dot product.
    fn dot(self, other: Self) -> Self::Scalar;

    /// Scale all components by a scalar.
    fn scale(self, s: Self::Scalar) -> Self;

    /// Read one vector from the first `DIM` entries of `src`.
    fn read_from(src: &[Self::Scalar]) -> Self;

    /// Write this vector into the first `DIM` entries of `out`.
    fn write_to(self, out: &mut [Self::Scalar]);

    /// Squared length (avoids sqrt).
    fn length_sq(self) -> Self::Scalar {
        self.dot(self)
    }

    /// Length (magnitude).
    fn length(self) -> Self::Scalar {
        self.length_sq().sqrt()
    }

    /// Normalize to unit length. Returns zero vector if length is near zero.
    fn normalize(self) -> Self {
        let len = self.length();
        if len.is_near_zero(Self::Scalar::from_f32(1e-10)) {
            Self::zero()
        } else {
            self.scale(Self::Scalar::one() / len)
        }
    }

    /// Distance between two points.
    fn distance(self, other: Self) -> Self::Scalar {
        (self - other).length()
    }

    /// Squared distance between two points.
    fn distance_sq(self, other: Self) -> Self::Scalar {
        (self - other).length_sq()
    }

    /// True when no component is NaN or infinite.
    fn is_finite(self) -> bool;
}

// --------------------------------------------------------------------------
// Vec2<F>: 2D vector
// --------------------------------------------------------------------------

/// 2D vector for planar meshes.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec2<F: Float> {
    pub x: F,
    pub y: F,
}

impl<F: Float> Vec2<F> {
    /// Create a new 2D vector.
    pub fn new(x: F, y: F) -> Self { Vec2 { x, y } }
}

impl<F: Float> Add for Vec2<F> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self { Vec2 { x: self.x + rhs.x, y: self.y + rhs.y } }
}

impl<F: Float> Sub for Vec2<F> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self { Vec2 { x: self.x - rhs.x, y: self.y - rhs.y } }
}

impl<F: Float> Neg for Vec2<F> {
    type Output = Self;
    fn neg(self) -> Self { Vec2 { x: -self.x, y: -self.y } }
}

impl<F: Float> Vec for Vec2<F> {
    type Scalar = F;
    const DIM: usize = 2;
    fn zero() -> Self { Vec2 { x: F::zero(), y: F::zero() } }
    fn dot(self, other: Self) -> F { self.x * other.x + self.y * other.y }
    fn scale(self, s: F) -> Self { Vec2 { x: self.x * s, y: self.y * s } }
    fn read_from(src: &[F]) -> Self { Vec2 { x: src[0], y: src[1] } }
    fn is_finite(self) -> bool { self.x.is_finite() && self.y.is_finite() }
    fn write_to(self, out: &mut [F]) {
        out[0] = self.x;
        out[1] = self.y;
    }
}

// --------------------------------------------------------------------------
// Vec3<F>: 3D vector
// --------------------------------------------------------------------------

/// 3D vector, the layout of a renderer's position attribute.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec3<F: Float> {
    pub x: F,
    pub y: F,
    pub z: F,
}

impl<F: Float> Vec3<F> {
    /// Create a new 3D vector.
    pub fn new(x: F, y: F, z: F) -> Self { Vec3 { x, y, z } }

    /// 3D cross product.
    pub fn cross(self, other: Self) -> Self {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }
}

impl<F: Float> Add for Vec3<F> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Vec3 { x: self.x + rhs.x, y: self.y + rhs.y, z: self.z + rhs.z }
    }
}

impl<F: Float> Sub for Vec3<F> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Vec3 { x: self.x - rhs.x, y: self.y - rhs.y, z: self.z - rhs.z }
    }
}

impl<F: Float> Neg for Vec3<F> {
    type Output = Self;
    fn neg(self) -> Self { Vec3 { x: -self.x, y: -self.y, z: -self.z } }
}

impl<F: Float> Vec for Vec3<F> {
    type Scalar = F;
    const DIM: usize = 3;
    fn zero() -> Self { Vec3 { x: F::zero(), y: F::zero(), z: F::zero() } }
    fn dot(self, other: Self) -> F {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
    fn scale(self, s: F) -> Self {
        Vec3 { x: self.x * s, y: self.y * s, z: self.z * s }
    }
    fn read_from(src: &[F]) -> Self { Vec3 { x: src[0], y: src[1], z: src[2] } }
    fn is_finite(self) -> bool { self.x.is_finite() && self.y.is_finite() && self.z.is_finite() }
    fn write_to(self, out: &mut [F]) {
        out[0] = self.x;
        out[1] = self.y;
        out[2] = self.z;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec2_length() {
        let v = Vec2::new(3.0f32, 4.0);
        assert!((v.length() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn vec3_cross() {
        let i = Vec3::new(1.0f32, 0.0, 0.0);
        let j = Vec3::new(0.0f32, 1.0, 0.0);
        let k = i.cross(j);
        assert!((k.x - 0.0).abs() < 1e-6);
        assert!((k.y - 0.0).abs() < 1e-6);
        assert!((k.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn normalize_zero_vector() {
        let v = Vec3::<f32>::zero();
        assert_eq!(v.normalize(), Vec3::zero());
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Vec3::new(0.3f32, -1.7, 2.2);
        let b = Vec3::new(-4.1f32, 0.9, 0.05);
        assert_eq!(a.distance(b), b.distance(a));
    }

    #[test]
    fn finite_checks_every_component() {
        assert!(Vec3::new(1.0f32, -2.0, 3.0).is_finite());
        assert!(!Vec3::new(1.0f32, f32::NAN, 3.0).is_finite());
        assert!(!Vec2::new(f64::INFINITY, 0.0).is_finite());
    }

    #[test]
    fn flat_buffer_io() {
        let mut buf = [0.0f32; 6];
        Vec3::new(1.0, 2.0, 3.0).write_to(&mut buf[3..]);
        assert_eq!(buf, [0.0, 0.0, 0.0, 1.0, 2.0, 3.0]);
        assert_eq!(Vec3::read_from(&buf[3..]), Vec3::new(1.0, 2.0, 3.0));
    }
}
