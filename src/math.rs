//! Math and resource types that travel inside a [`Variant`](crate::Variant).
//!
//! All of these are plain old data with the engine's memory layout. The
//! floating point ones use [`Real`], which is [`f32`] unless the
//! `double-precision` feature is enabled.
//!
//! <https://github.com/godotengine/godot/tree/07cf36d21c9056fb4055f020949fb90ebd795afb/core/math>

use bytemuck::{Pod, Zeroable};

/// The floating point type of the engine's math types.
#[cfg(not(feature = "double-precision"))]
pub type Real = f32;

/// The floating point type of the engine's math types.
#[cfg(feature = "double-precision")]
pub type Real = f64;

/// A 2D vector using floating point coordinates.
#[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vector2 {
    #[allow(missing_docs)]
    pub x: Real,
    #[allow(missing_docs)]
    pub y: Real,
}

/// A 2D vector using integer coordinates.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Vector2I {
    #[allow(missing_docs)]
    pub x: i32,
    #[allow(missing_docs)]
    pub y: i32,
}

/// A 3D vector using floating point coordinates.
#[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vector3 {
    #[allow(missing_docs)]
    pub x: Real,
    #[allow(missing_docs)]
    pub y: Real,
    #[allow(missing_docs)]
    pub z: Real,
}

/// A 3D vector using integer coordinates.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Vector3I {
    #[allow(missing_docs)]
    pub x: i32,
    #[allow(missing_docs)]
    pub y: i32,
    #[allow(missing_docs)]
    pub z: i32,
}

/// A 4D vector using floating point coordinates.
#[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vector4 {
    #[allow(missing_docs)]
    pub x: Real,
    #[allow(missing_docs)]
    pub y: Real,
    #[allow(missing_docs)]
    pub z: Real,
    #[allow(missing_docs)]
    pub w: Real,
}

/// A 4D vector using integer coordinates.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Vector4I {
    #[allow(missing_docs)]
    pub x: i32,
    #[allow(missing_docs)]
    pub y: i32,
    #[allow(missing_docs)]
    pub z: i32,
    #[allow(missing_docs)]
    pub w: i32,
}

/// An axis-aligned 2D rectangle using floating point coordinates.
#[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Rect2 {
    /// The origin point, usually the top-left corner.
    pub position: Vector2,
    /// The width and height of the rectangle.
    pub size: Vector2,
}

/// An axis-aligned 2D rectangle using integer coordinates.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Rect2I {
    /// The origin point, usually the top-left corner.
    pub position: Vector2I,
    /// The width and height of the rectangle.
    pub size: Vector2I,
}

/// A 2×3 matrix representing a 2D transformation.
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Transform2D {
    /// The basis X column.
    pub x: Vector2,
    /// The basis Y column.
    pub y: Vector2,
    /// The translation.
    pub origin: Vector2,
}

/// A plane in Hessian normal form.
#[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Plane {
    /// The normal of the plane, typically a unit vector.
    pub normal: Vector3,
    /// The distance from the origin to the plane along the normal.
    pub d: Real,
}

/// A unit quaternion used for representing 3D rotations.
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Quaternion {
    #[allow(missing_docs)]
    pub x: Real,
    #[allow(missing_docs)]
    pub y: Real,
    #[allow(missing_docs)]
    pub z: Real,
    #[allow(missing_docs)]
    pub w: Real,
}

/// An axis-aligned 3D bounding box.
#[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Aabb {
    /// The origin point, usually the corner with the smallest coordinates.
    pub position: Vector3,
    /// The width, height and depth of the box.
    pub size: Vector3,
}

/// A 3×3 matrix for representing 3D rotation and scale, stored as rows.
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Basis {
    #[allow(missing_docs)]
    pub rows: [Vector3; 3],
}

/// A 3×4 matrix representing a 3D transformation.
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Transform3D {
    /// The rotation and scale part.
    pub basis: Basis,
    /// The translation.
    pub origin: Vector3,
}

/// A 4×4 matrix for 3D projective transformations, stored as columns.
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Projection {
    #[allow(missing_docs)]
    pub columns: [Vector4; 4],
}

/// A color in RGBA format. Always single precision, regardless of
/// `double-precision`.
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Color {
    #[allow(missing_docs)]
    pub r: f32,
    #[allow(missing_docs)]
    pub g: f32,
    #[allow(missing_docs)]
    pub b: f32,
    #[allow(missing_docs)]
    pub a: f32,
}

/// A handle for a resource's unique identifier in a server. `0` is the
/// invalid RID.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Pod, Zeroable)]
#[repr(transparent)]
pub struct Rid(pub u64);

impl Vector2 {
    /// `(0, 0)`.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[allow(missing_docs)]
    pub const fn new(x: Real, y: Real) -> Self {
        Self { x, y }
    }
}

impl Vector2I {
    #[allow(missing_docs)]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Vector3 {
    /// `(0, 0, 0)`.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[allow(missing_docs)]
    pub const fn new(x: Real, y: Real, z: Real) -> Self {
        Self { x, y, z }
    }
}

impl Vector3I {
    #[allow(missing_docs)]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl Vector4 {
    #[allow(missing_docs)]
    pub const fn new(x: Real, y: Real, z: Real, w: Real) -> Self {
        Self { x, y, z, w }
    }
}

impl Vector4I {
    #[allow(missing_docs)]
    pub const fn new(x: i32, y: i32, z: i32, w: i32) -> Self {
        Self { x, y, z, w }
    }
}

impl Rect2 {
    #[allow(missing_docs)]
    pub const fn new(position: Vector2, size: Vector2) -> Self {
        Self { position, size }
    }
}

impl Rect2I {
    #[allow(missing_docs)]
    pub const fn new(position: Vector2I, size: Vector2I) -> Self {
        Self { position, size }
    }
}

impl Transform2D {
    /// The transform that does nothing.
    pub const IDENTITY: Self = Self {
        x: Vector2::new(1.0, 0.0),
        y: Vector2::new(0.0, 1.0),
        origin: Vector2::ZERO,
    };
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Plane {
    #[allow(missing_docs)]
    pub const fn new(normal: Vector3, d: Real) -> Self {
        Self { normal, d }
    }
}

impl Quaternion {
    /// The quaternion representing no rotation.
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    #[allow(missing_docs)]
    pub const fn new(x: Real, y: Real, z: Real, w: Real) -> Self {
        Self { x, y, z, w }
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Aabb {
    #[allow(missing_docs)]
    pub const fn new(position: Vector3, size: Vector3) -> Self {
        Self { position, size }
    }
}

impl Basis {
    /// The basis without rotation or scale.
    pub const IDENTITY: Self = Self {
        rows: [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ],
    };

    /// Builds the rotation basis of a unit quaternion.
    pub fn from_quaternion(q: Quaternion) -> Self {
        let Quaternion { x, y, z, w } = q;
        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, xz, yz) = (x * y, x * z, y * z);
        let (wx, wy, wz) = (w * x, w * y, w * z);
        Self {
            rows: [
                Vector3::new(1.0 - 2.0 * (yy + zz), 2.0 * (xy - wz), 2.0 * (xz + wy)),
                Vector3::new(2.0 * (xy + wz), 1.0 - 2.0 * (xx + zz), 2.0 * (yz - wx)),
                Vector3::new(2.0 * (xz - wy), 2.0 * (yz + wx), 1.0 - 2.0 * (xx + yy)),
            ],
        }
    }
}

impl Default for Basis {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform3D {
    /// The transform that does nothing.
    pub const IDENTITY: Self = Self {
        basis: Basis::IDENTITY,
        origin: Vector3::ZERO,
    };
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Projection {
    /// The identity matrix.
    pub const IDENTITY: Self = Self {
        columns: [
            Vector4::new(1.0, 0.0, 0.0, 0.0),
            Vector4::new(0.0, 1.0, 0.0, 0.0),
            Vector4::new(0.0, 0.0, 1.0, 0.0),
            Vector4::new(0.0, 0.0, 0.0, 1.0),
        ],
    };
}

impl Default for Projection {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Color {
    /// Opaque black, which is also the engine's default color.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    #[allow(missing_docs)]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Rid {
    /// Returns [`true`] if this is not the invalid RID.
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl From<Vector2I> for Vector2 {
    fn from(v: Vector2I) -> Self {
        Self::new(v.x as Real, v.y as Real)
    }
}

impl From<Vector2> for Vector2I {
    fn from(v: Vector2) -> Self {
        Self::new(v.x as i32, v.y as i32)
    }
}

impl From<Vector3I> for Vector3 {
    fn from(v: Vector3I) -> Self {
        Self::new(v.x as Real, v.y as Real, v.z as Real)
    }
}

impl From<Vector3> for Vector3I {
    fn from(v: Vector3) -> Self {
        Self::new(v.x as i32, v.y as i32, v.z as i32)
    }
}

impl From<Vector4I> for Vector4 {
    fn from(v: Vector4I) -> Self {
        Self::new(v.x as Real, v.y as Real, v.z as Real, v.w as Real)
    }
}

impl From<Vector4> for Vector4I {
    fn from(v: Vector4) -> Self {
        Self::new(v.x as i32, v.y as i32, v.z as i32, v.w as i32)
    }
}

impl From<Rect2I> for Rect2 {
    fn from(r: Rect2I) -> Self {
        Self::new(r.position.into(), r.size.into())
    }
}

impl From<Rect2> for Rect2I {
    fn from(r: Rect2) -> Self {
        Self::new(r.position.into(), r.size.into())
    }
}

#[cfg(test)]
mod tests {
    use core::mem::size_of;

    use super::*;

    #[test]
    fn layouts_match_the_engine() {
        let real = size_of::<Real>();
        assert_eq!(size_of::<Vector2>(), 2 * real);
        assert_eq!(size_of::<Vector3I>(), 12);
        assert_eq!(size_of::<Rect2>(), 4 * real);
        assert_eq!(size_of::<Transform2D>(), 6 * real);
        assert_eq!(size_of::<Basis>(), 9 * real);
        assert_eq!(size_of::<Transform3D>(), 12 * real);
        assert_eq!(size_of::<Projection>(), 16 * real);
        assert_eq!(size_of::<Color>(), 16);
        assert_eq!(size_of::<Rid>(), 8);
    }

    #[test]
    fn defaults_are_identities() {
        assert_eq!(Transform2D::default(), Transform2D::IDENTITY);
        assert_eq!(Quaternion::default(), Quaternion::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(Color::default(), Color::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(Basis::from_quaternion(Quaternion::IDENTITY), Basis::IDENTITY);
    }

    #[test]
    fn float_to_integer_vectors_truncate() {
        assert_eq!(Vector2I::from(Vector2::new(1.9, -1.9)), Vector2I::new(1, -1));
        assert_eq!(Vector3::from(Vector3I::new(1, 2, 3)), Vector3::new(1.0, 2.0, 3.0));
    }
}
