//! Converting [`Variant`]s to host values.
//!
//! None of these fail. If the variant holds the requested type, its payload is
//! copied directly. Otherwise the engine's coercion rules apply, the same way
//! they would for a script assigning the value to a typed variable.

use core::ptr;

use crate::{
    builtin::{
        Array, Callable, Dictionary, FromObjectPtr, GString, NativeCallable, NativeSignal,
        NodePath, PackedArray, PackedArrayElement, Signal, StringName,
    },
    marshal,
    math::{
        Aabb, Basis, Color, Plane, Projection, Quaternion, Rect2, Rect2I, Rid, Transform2D,
        Transform3D, Vector2, Vector2I, Vector3, Vector3I, Vector4, Vector4I,
    },
    sys::{
        self, ObjectPtr, RawArray, RawCallable, RawDictionary, RawNodePath, RawSignal,
        RawStringName, RawVariant,
    },
    Payload, Variant, VariantType,
};

/// A host type that can be read out of a [`Variant`]. Use
/// [`Variant::to`] to call it.
pub trait FromVariant: Sized {
    /// Converts the variant, coercing it if its type doesn't match.
    fn from_variant(variant: &Variant) -> Self;
}

/// Calls a native `variant_as_*` entry. Anything returned that owns a handle
/// is owned by the caller.
#[inline]
fn coerce<R>(
    from: &Variant,
    to: VariantType,
    native: unsafe extern "C" fn(variant: *const RawVariant) -> R,
) -> R {
    if from.get_type() != to {
        tracing::trace!(from = from.get_type().name(), to = to.name(), "coercing variant");
    }
    // SAFETY: The variant is valid for the duration of the call and the
    // engine doesn't keep the pointer.
    unsafe { native(from.as_raw()) }
}

macro_rules! value_conversions {
    ($($(#[$attr:meta])* $name:ident -> $ty:ty, $payload:ident(|$v:ident| $copy:expr), $variant_type:ident => $native:ident;)*) => {
        $(
            $(#[$attr])*
            #[inline]
            pub fn $name(from: &Variant) -> $ty {
                match from.payload() {
                    Payload::$payload($v) => $copy,
                    _ => coerce(from, VariantType::$variant_type, sys::interface().$native),
                }
            }
        )*
    };
}

value_conversions! {
    /// Converts the variant to a `bool`.
    convert_to_bool -> bool, Bool(|v| v), BOOL => variant_as_bool;
    /// Converts the variant to an `int`. This is what all the narrower integer
    /// conversions are based on.
    convert_to_int64 -> i64, Int(|v| v), INT => variant_as_int;
    /// Converts the variant to a `float`. This is what
    /// [`convert_to_float32`] is based on.
    convert_to_float64 -> f64, Float(|v| v), FLOAT => variant_as_float;
    /// Converts the variant to a `Vector2`.
    convert_to_vector2 -> Vector2, Vector2(|v| v), VECTOR2 => variant_as_vector2;
    /// Converts the variant to a `Vector2i`.
    convert_to_vector2i -> Vector2I, Vector2I(|v| v), VECTOR2I => variant_as_vector2i;
    /// Converts the variant to a `Rect2`.
    convert_to_rect2 -> Rect2, Rect2(|v| v), RECT2 => variant_as_rect2;
    /// Converts the variant to a `Rect2i`.
    convert_to_rect2i -> Rect2I, Rect2I(|v| v), RECT2I => variant_as_rect2i;
    /// Converts the variant to a `Vector3`.
    convert_to_vector3 -> Vector3, Vector3(|v| v), VECTOR3 => variant_as_vector3;
    /// Converts the variant to a `Vector3i`.
    convert_to_vector3i -> Vector3I, Vector3I(|v| v), VECTOR3I => variant_as_vector3i;
    /// Converts the variant to a `Transform2D`.
    convert_to_transform2d -> Transform2D, Transform2D(|v| *v), TRANSFORM2D => variant_as_transform2d;
    /// Converts the variant to a `Vector4`.
    convert_to_vector4 -> Vector4, Vector4(|v| v), VECTOR4 => variant_as_vector4;
    /// Converts the variant to a `Vector4i`.
    convert_to_vector4i -> Vector4I, Vector4I(|v| v), VECTOR4I => variant_as_vector4i;
    /// Converts the variant to a `Plane`.
    convert_to_plane -> Plane, Plane(|v| v), PLANE => variant_as_plane;
    /// Converts the variant to a `Quaternion`.
    convert_to_quaternion -> Quaternion, Quaternion(|v| v), QUATERNION => variant_as_quaternion;
    /// Converts the variant to an `AABB`.
    convert_to_aabb -> Aabb, Aabb(|v| *v), AABB => variant_as_aabb;
    /// Converts the variant to a `Basis`.
    convert_to_basis -> Basis, Basis(|v| *v), BASIS => variant_as_basis;
    /// Converts the variant to a `Transform3D`.
    convert_to_transform3d -> Transform3D, Transform3D(|v| *v), TRANSFORM3D => variant_as_transform3d;
    /// Converts the variant to a `Projection`.
    convert_to_projection -> Projection, Projection(|v| *v), PROJECTION => variant_as_projection;
    /// Converts the variant to a `Color`.
    convert_to_color -> Color, Color(|v| v), COLOR => variant_as_color;
    /// Converts the variant to an `RID`.
    convert_to_rid -> Rid, Rid(|v| v), RID => variant_as_rid;
}

macro_rules! narrowing_conversions {
    ($($name:ident -> $ty:ty = $base:ident;)*) => {
        $(
            /// Truncates the converted value to the narrower type.
            #[inline]
            pub fn $name(from: &Variant) -> $ty {
                $base(from) as $ty
            }
        )*
    };
}

narrowing_conversions! {
    convert_to_int8 -> i8 = convert_to_int64;
    convert_to_int16 -> i16 = convert_to_int64;
    convert_to_int32 -> i32 = convert_to_int64;
    convert_to_uint8 -> u8 = convert_to_int64;
    convert_to_uint16 -> u16 = convert_to_int64;
    convert_to_uint32 -> u32 = convert_to_int64;
    convert_to_uint64 -> u64 = convert_to_int64;
    convert_to_float32 -> f32 = convert_to_float64;
}

/// Converts the variant to a UTF-16 code unit.
#[inline]
pub fn convert_to_char(from: &Variant) -> u16 {
    convert_to_int64(from) as u16
}

/// Converts the variant to a native string. Nil is the empty string, not the
/// engine's `<null>`.
pub fn convert_to_gstring(from: &Variant) -> GString {
    match from.payload() {
        Payload::Nil => GString::new(),
        Payload::String(string) => {
            let mut raw = sys::RawString(ptr::null_mut());
            // SAFETY: The handle is valid. We own the copy.
            unsafe {
                (sys::interface().string_new_copy)(&mut raw, string);
                GString::from_raw(raw)
            }
        }
        // SAFETY: We own the returned string.
        _ => unsafe {
            GString::from_raw(coerce(from, VariantType::STRING, sys::interface().variant_as_string))
        },
    }
}

/// Converts the variant to a host string. Nil is the empty string, not the
/// engine's `<null>`.
pub fn convert_to_string(from: &Variant) -> String {
    match from.payload() {
        Payload::Nil => String::new(),
        Payload::String(string) => marshal::convert_string_to_managed(string),
        _ => marshal::convert_string_to_managed(convert_to_gstring(from).as_raw()),
    }
}

macro_rules! handle_conversions {
    ($($native_name:ident, $name:ident -> $raw:ident, $wrapper:ident, $payload:ident, $variant_type:ident => $copy:ident, $native:ident;)*) => {
        $(
            /// Converts the variant to a native handle, copying it if the
            /// variant already holds one. You own the returned handle and are
            /// responsible for freeing it.
            #[must_use]
            pub fn $native_name(from: &Variant) -> $raw {
                match from.payload() {
                    Payload::$payload(handle) => {
                        let mut raw = $raw(ptr::null_mut());
                        // SAFETY: The handle is valid. We own the copy.
                        unsafe { (sys::interface().$copy)(&mut raw, handle) };
                        raw
                    }
                    _ => coerce(from, VariantType::$variant_type, sys::interface().$native),
                }
            }

            /// Converts the variant, copying the handle if the variant already
            /// holds one.
            #[inline]
            pub fn $name(from: &Variant) -> $wrapper {
                // SAFETY: We own the handle that was just created.
                unsafe { $wrapper::from_raw($native_name(from)) }
            }
        )*
    };
}

handle_conversions! {
    convert_to_native_string_name, convert_to_string_name -> RawStringName, StringName, StringName,
        STRING_NAME => string_name_new_copy, variant_as_string_name;
    convert_to_native_node_path, convert_to_node_path -> RawNodePath, NodePath, NodePath,
        NODE_PATH => node_path_new_copy, variant_as_node_path;
    convert_to_native_array, convert_to_array -> RawArray, Array, Array,
        ARRAY => array_new_copy, variant_as_array;
    convert_to_native_dictionary, convert_to_dictionary -> RawDictionary, Dictionary, Dictionary,
        DICTIONARY => dictionary_new_copy, variant_as_dictionary;
}

/// Converts the variant to a native callable. You own the returned handle and
/// are responsible for freeing it.
#[must_use]
#[inline]
pub fn convert_to_native_callable(from: &Variant) -> RawCallable {
    coerce(from, VariantType::CALLABLE, sys::interface().variant_as_callable)
}

/// Converts the variant to a callable.
pub fn convert_to_callable(from: &Variant) -> Callable {
    // SAFETY: We own the handle that was just created.
    let native = unsafe { NativeCallable::from_raw(convert_to_native_callable(from)) };
    marshal::convert_callable_to_managed(&native)
}

/// Converts the variant to a native signal. You own the returned handle and
/// are responsible for freeing it.
#[must_use]
#[inline]
pub fn convert_to_native_signal(from: &Variant) -> RawSignal {
    coerce(from, VariantType::SIGNAL, sys::interface().variant_as_signal)
}

/// Converts the variant to a signal.
pub fn convert_to_signal(from: &Variant) -> Signal {
    // SAFETY: We own the handle that was just created.
    let native = unsafe { NativeSignal::from_raw(convert_to_native_signal(from)) };
    marshal::convert_signal_to_managed(&native)
}

/// Returns the object pointer. Anything that isn't an `Object` is null.
#[inline]
pub fn convert_to_object_ptr(from: &Variant) -> ObjectPtr {
    match from.payload() {
        Payload::Object(ptr) => ptr,
        _ => ObjectPtr::NULL,
    }
}

/// Returns the host wrapper of the object. Returns [`None`] if the variant
/// holds no object or the host doesn't know the object.
#[inline]
pub fn convert_to_object<T: FromObjectPtr>(from: &Variant) -> Option<T> {
    let ptr = convert_to_object_ptr(from);
    if ptr.is_null() {
        return None;
    }
    T::from_object_ptr(ptr)
}

/// Converts the variant to a native packed array of the element type.
#[inline]
pub fn convert_to_packed_array<T: PackedArrayElement>(from: &Variant) -> PackedArray<T> {
    let raw = coerce(from, T::VARIANT_TYPE, T::interface(sys::interface()).variant_as);
    // SAFETY: We own the packed array that was just created.
    unsafe { PackedArray::from_raw(raw) }
}

/// Converts the variant to host values through a temporary native packed
/// array, which is released before this returns.
#[inline]
pub fn convert_as_packed_array_to_system_array<T: PackedArrayElement>(from: &Variant) -> Vec<T> {
    marshal::convert_native_packed_array_to_vec(&convert_to_packed_array::<T>(from))
}

macro_rules! packed_conversions {
    ($($name:ident -> $ty:ty;)*) => {
        $(
            /// Converts the variant to host values.
            #[inline]
            pub fn $name(from: &Variant) -> Vec<$ty> {
                convert_as_packed_array_to_system_array(from)
            }
        )*
    };
}

packed_conversions! {
    convert_as_packed_byte_array_to_system_array -> u8;
    convert_as_packed_int32_array_to_system_array -> i32;
    convert_as_packed_int64_array_to_system_array -> i64;
    convert_as_packed_float32_array_to_system_array -> f32;
    convert_as_packed_float64_array_to_system_array -> f64;
    convert_as_packed_string_array_to_system_array -> String;
    convert_as_packed_vector2_array_to_system_array -> Vector2;
    convert_as_packed_vector3_array_to_system_array -> Vector3;
    convert_as_packed_vector4_array_to_system_array -> Vector4;
    convert_as_packed_color_array_to_system_array -> Color;
}

/// Converts the variant to an array, then every element with `from_variant`.
/// The array is a copy and is released before this returns.
fn convert_to_system_array<T>(from: &Variant, from_variant: impl FnMut(&Variant) -> T) -> Vec<T> {
    let raw = coerce(from, VariantType::ARRAY, sys::interface().variant_as_array);
    // SAFETY: We own the array that was just created.
    let array = unsafe { Array::from_raw(raw) };
    marshal::convert_native_array_to_vec(&array, from_variant)
}

/// Converts the variant to `StringName`s.
pub fn convert_to_system_array_of_string_name(from: &Variant) -> Vec<StringName> {
    convert_to_system_array(from, convert_to_string_name)
}

/// Converts the variant to `NodePath`s.
pub fn convert_to_system_array_of_node_path(from: &Variant) -> Vec<NodePath> {
    convert_to_system_array(from, convert_to_node_path)
}

/// Converts the variant to `RID`s.
pub fn convert_to_system_array_of_rid(from: &Variant) -> Vec<Rid> {
    convert_to_system_array(from, convert_to_rid)
}

/// Converts the variant to host object wrappers. Elements that aren't known
/// objects are [`None`].
pub fn convert_to_system_array_of_object<T: FromObjectPtr>(from: &Variant) -> Vec<Option<T>> {
    convert_to_system_array(from, convert_to_object::<T>)
}

/// Converts the variant to an array, then every element to `T`.
pub fn convert_to_typed_array<T: FromVariant>(from: &Variant) -> Vec<T> {
    convert_to_system_array(from, T::from_variant)
}

/// Converts the variant to a dictionary, then every key to `K` and every value
/// to `V`. The pairs are in insertion order.
pub fn convert_to_typed_dictionary<K, V>(from: &Variant) -> Vec<(K, V)>
where
    K: FromVariant,
    V: FromVariant,
{
    convert_to_dictionary(from)
        .iter()
        .map(|(key, value)| (K::from_variant(&key), V::from_variant(&value)))
        .collect()
}

macro_rules! from_variant_impls {
    ($($ty:ty => $f:path;)*) => {
        $(
            impl FromVariant for $ty {
                #[inline]
                fn from_variant(variant: &Variant) -> Self {
                    $f(variant)
                }
            }
        )*
    };
}

from_variant_impls! {
    bool => convert_to_bool;
    i8 => convert_to_int8;
    i16 => convert_to_int16;
    i32 => convert_to_int32;
    i64 => convert_to_int64;
    u8 => convert_to_uint8;
    u16 => convert_to_uint16;
    u32 => convert_to_uint32;
    u64 => convert_to_uint64;
    f32 => convert_to_float32;
    f64 => convert_to_float64;
    Vector2 => convert_to_vector2;
    Vector2I => convert_to_vector2i;
    Rect2 => convert_to_rect2;
    Rect2I => convert_to_rect2i;
    Vector3 => convert_to_vector3;
    Vector3I => convert_to_vector3i;
    Transform2D => convert_to_transform2d;
    Vector4 => convert_to_vector4;
    Vector4I => convert_to_vector4i;
    Plane => convert_to_plane;
    Quaternion => convert_to_quaternion;
    Aabb => convert_to_aabb;
    Basis => convert_to_basis;
    Transform3D => convert_to_transform3d;
    Projection => convert_to_projection;
    Color => convert_to_color;
    Rid => convert_to_rid;
    String => convert_to_string;
    GString => convert_to_gstring;
    StringName => convert_to_string_name;
    NodePath => convert_to_node_path;
    Array => convert_to_array;
    Dictionary => convert_to_dictionary;
    Callable => convert_to_callable;
    Signal => convert_to_signal;
    ObjectPtr => convert_to_object_ptr;
}

impl<T: PackedArrayElement> FromVariant for PackedArray<T> {
    #[inline]
    fn from_variant(variant: &Variant) -> Self {
        convert_to_packed_array(variant)
    }
}

impl<T: PackedArrayElement> FromVariant for Vec<T> {
    #[inline]
    fn from_variant(variant: &Variant) -> Self {
        convert_as_packed_array_to_system_array(variant)
    }
}

impl FromVariant for Variant {
    #[inline]
    fn from_variant(variant: &Variant) -> Self {
        variant.clone()
    }
}
