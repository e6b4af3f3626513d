use core::{fmt, mem::ManuallyDrop};

use crate::{
    decode::FromVariant,
    math::{
        Aabb, Basis, Color, Plane, Projection, Quaternion, Rect2, Rect2I, Rid, Transform2D,
        Transform3D, Vector2, Vector2I, Vector3, Vector3I, Vector4, Vector4I,
    },
    marshal,
    sys::{
        self, ObjectPtr, RawArray, RawCallable, RawDictionary, RawNodePath, RawPackedArray,
        RawSignal, RawString, RawStringName, RawVariant,
    },
};

use super::VariantType;

/// The most important data type in the engine: a value of any of the
/// [`VariantType`]s.
///
/// A `Variant` owns its payload. Dropping it releases any handle it holds and
/// cloning it copies that handle through the engine.
///
/// [`Variant`](https://docs.godotengine.org/en/4.2/classes/class_variant.html)
#[repr(transparent)]
pub struct Variant(RawVariant);

/// A view of a [`Variant`]'s payload, selected by its type. Handles are only
/// borrowed; copy them through the engine if you need to keep them.
#[derive(Debug, Clone, Copy)]
#[allow(missing_docs)]
pub enum Payload<'a> {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(&'a RawString),
    Vector2(Vector2),
    Vector2I(Vector2I),
    Rect2(Rect2),
    Rect2I(Rect2I),
    Vector3(Vector3),
    Vector3I(Vector3I),
    Transform2D(&'a Transform2D),
    Vector4(Vector4),
    Vector4I(Vector4I),
    Plane(Plane),
    Quaternion(Quaternion),
    Aabb(&'a Aabb),
    Basis(&'a Basis),
    Transform3D(&'a Transform3D),
    Projection(&'a Projection),
    Color(Color),
    StringName(&'a RawStringName),
    NodePath(&'a RawNodePath),
    Rid(Rid),
    Object(ObjectPtr),
    Callable(&'a RawCallable),
    Signal(&'a RawSignal),
    Dictionary(&'a RawDictionary),
    Array(&'a RawArray),
    PackedByteArray(&'a RawPackedArray<u8>),
    PackedInt32Array(&'a RawPackedArray<i32>),
    PackedInt64Array(&'a RawPackedArray<i64>),
    PackedFloat32Array(&'a RawPackedArray<f32>),
    PackedFloat64Array(&'a RawPackedArray<f64>),
    PackedStringArray(&'a RawPackedArray<RawString>),
    PackedVector2Array(&'a RawPackedArray<Vector2>),
    PackedVector3Array(&'a RawPackedArray<Vector3>),
    PackedColorArray(&'a RawPackedArray<Color>),
    PackedVector4Array(&'a RawPackedArray<Vector4>),
    /// A type this crate doesn't know about. This is likely the case if the
    /// engine is newer than this crate.
    Unknown(VariantType),
}

impl Variant {
    /// The Nil variant.
    pub const NIL: Self = Self(RawVariant::NIL);

    /// Creates a Nil variant.
    #[inline]
    pub const fn nil() -> Self {
        Self::NIL
    }

    /// Takes ownership of a raw Variant.
    ///
    /// # Safety
    ///
    /// The raw Variant needs to be valid and must not be released by anyone
    /// else afterwards.
    #[inline]
    pub const unsafe fn from_raw(raw: RawVariant) -> Self {
        Self(raw)
    }

    /// Gives up ownership of the raw Variant. You are responsible for releasing
    /// it through the engine.
    #[inline]
    pub fn into_raw(self) -> RawVariant {
        ManuallyDrop::new(self).0
    }

    /// Returns the raw Variant, still owned by `self`.
    #[inline]
    pub fn as_raw(&self) -> &RawVariant {
        &self.0
    }

    /// Returns the type of the variant.
    #[inline]
    pub fn get_type(&self) -> VariantType {
        self.0.ty
    }

    /// Returns [`true`] if the variant is Nil.
    #[inline]
    pub fn is_nil(&self) -> bool {
        self.0.ty == VariantType::NIL
    }

    /// Converts the variant to a host value, coercing through the engine if
    /// the types don't match.
    #[inline]
    pub fn to<T: FromVariant>(&self) -> T {
        T::from_variant(self)
    }

    /// Returns the payload selected by the variant's type.
    pub fn payload(&self) -> Payload<'_> {
        let data = &self.0.data;
        // SAFETY: The type determines which field of the payload is active,
        // and we only ever read that one. Pointers to engine-allocated math
        // values are valid for as long as the variant is alive.
        unsafe {
            match self.0.ty {
                VariantType::NIL => Payload::Nil,
                VariantType::BOOL => Payload::Bool(data.boolean != 0),
                VariantType::INT => Payload::Int(data.int),
                VariantType::FLOAT => Payload::Float(data.float),
                VariantType::STRING => Payload::String(&data.string),
                VariantType::VECTOR2 => Payload::Vector2(data.vector2),
                VariantType::VECTOR2I => Payload::Vector2I(data.vector2i),
                VariantType::RECT2 => Payload::Rect2(data.rect2),
                VariantType::RECT2I => Payload::Rect2I(data.rect2i),
                VariantType::VECTOR3 => Payload::Vector3(data.vector3),
                VariantType::VECTOR3I => Payload::Vector3I(data.vector3i),
                VariantType::TRANSFORM2D => Payload::Transform2D(&*data.transform2d),
                VariantType::VECTOR4 => Payload::Vector4(data.vector4),
                VariantType::VECTOR4I => Payload::Vector4I(data.vector4i),
                VariantType::PLANE => Payload::Plane(data.plane),
                VariantType::QUATERNION => Payload::Quaternion(data.quaternion),
                VariantType::AABB => Payload::Aabb(&*data.aabb),
                VariantType::BASIS => Payload::Basis(&*data.basis),
                VariantType::TRANSFORM3D => Payload::Transform3D(&*data.transform3d),
                VariantType::PROJECTION => Payload::Projection(&*data.projection),
                VariantType::COLOR => Payload::Color(data.color),
                VariantType::STRING_NAME => Payload::StringName(&data.string_name),
                VariantType::NODE_PATH => Payload::NodePath(&data.node_path),
                VariantType::RID => Payload::Rid(data.rid),
                VariantType::OBJECT => Payload::Object(data.object),
                VariantType::CALLABLE => Payload::Callable(&data.callable),
                VariantType::SIGNAL => Payload::Signal(&data.signal),
                VariantType::DICTIONARY => Payload::Dictionary(&data.dictionary),
                VariantType::ARRAY => Payload::Array(&data.array),
                VariantType::PACKED_BYTE_ARRAY => Payload::PackedByteArray(&data.packed_byte_array),
                VariantType::PACKED_INT32_ARRAY => {
                    Payload::PackedInt32Array(&data.packed_int32_array)
                }
                VariantType::PACKED_INT64_ARRAY => {
                    Payload::PackedInt64Array(&data.packed_int64_array)
                }
                VariantType::PACKED_FLOAT32_ARRAY => {
                    Payload::PackedFloat32Array(&data.packed_float32_array)
                }
                VariantType::PACKED_FLOAT64_ARRAY => {
                    Payload::PackedFloat64Array(&data.packed_float64_array)
                }
                VariantType::PACKED_STRING_ARRAY => {
                    Payload::PackedStringArray(&data.packed_string_array)
                }
                VariantType::PACKED_VECTOR2_ARRAY => {
                    Payload::PackedVector2Array(&data.packed_vector2_array)
                }
                VariantType::PACKED_VECTOR3_ARRAY => {
                    Payload::PackedVector3Array(&data.packed_vector3_array)
                }
                VariantType::PACKED_COLOR_ARRAY => {
                    Payload::PackedColorArray(&data.packed_color_array)
                }
                VariantType::PACKED_VECTOR4_ARRAY => {
                    Payload::PackedVector4Array(&data.packed_vector4_array)
                }
                ty => Payload::Unknown(ty),
            }
        }
    }
}

impl Default for Variant {
    #[inline]
    fn default() -> Self {
        Self::NIL
    }
}

impl Clone for Variant {
    #[inline]
    fn clone(&self) -> Self {
        if !self.0.ty.needs_destroy() {
            return Self(self.0);
        }
        let mut raw = RawVariant::NIL;
        // SAFETY: Our variant is valid and `raw` is a valid destination. We
        // own the copy now.
        unsafe { (sys::interface().variant_new_copy)(&mut raw, &self.0) };
        Self(raw)
    }
}

impl Drop for Variant {
    #[inline]
    fn drop(&mut self) {
        if self.0.ty.needs_destroy() {
            // SAFETY: The variant is valid and we own it, so it's our
            // responsibility to free it.
            unsafe { (sys::interface().variant_destroy)(&mut self.0) }
        }
    }
}

impl fmt::Debug for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.payload() {
            Payload::Nil => write!(f, "Variant::NIL"),
            Payload::Bool(v) => write!(f, "Variant::BOOL({v})"),
            Payload::Int(v) => write!(f, "Variant::INT({v})"),
            Payload::Float(v) => write!(f, "Variant::FLOAT({v})"),
            Payload::String(s) => {
                write!(f, "Variant::STRING({:?})", marshal::convert_string_to_managed(s))
            }
            Payload::Object(ptr) => write!(f, "Variant::OBJECT({:p})", ptr.0),
            Payload::Rid(rid) => write!(f, "Variant::RID({})", rid.0),
            _ => f
                .debug_struct("Variant")
                .field("ty", &self.0.ty)
                .finish_non_exhaustive(),
        }
    }
}
