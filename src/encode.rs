//! Creating [`Variant`]s from host values.
//!
//! None of these fail. Absent values ([`None`]) become the Nil variant, except
//! for strings, where [`None`] is the empty string.

use crate::{
    builtin::{
        Array, Callable, Dictionary, GString, GodotObject, NativeCallable, NativeSignal, NodePath,
        PackedArray, PackedArrayElement, Signal, StringName,
    },
    marshal,
    math::{
        Aabb, Basis, Color, Plane, Projection, Quaternion, Rect2, Rect2I, Rid, Transform2D,
        Transform3D, Vector2, Vector2I, Vector3, Vector3I, Vector4, Vector4I,
    },
    sys::{self, ObjectPtr, RawArray, RawDictionary, RawNodePath, RawStringName, RawVariant},
    Variant, VariantType,
};

macro_rules! inline_constructors {
    ($($(#[$attr:meta])* $name:ident($ty:ty) => $variant_type:ident.$field:ident;)*) => {
        $(
            $(#[$attr])*
            #[inline]
            pub fn $name(from: $ty) -> Variant {
                let mut raw = RawVariant::with_type(VariantType::$variant_type);
                raw.data.$field = from;
                // SAFETY: Inline payloads don't own anything, so any value is a
                // valid variant.
                unsafe { Variant::from_raw(raw) }
            }
        )*
    };
}

inline_constructors! {
    /// Creates an `int` variant.
    create_from_int(i64) => INT.int;
    /// Creates a `float` variant.
    create_from_float(f64) => FLOAT.float;
    /// Creates a `Vector2` variant.
    create_from_vector2(Vector2) => VECTOR2.vector2;
    /// Creates a `Vector2i` variant.
    create_from_vector2i(Vector2I) => VECTOR2I.vector2i;
    /// Creates a `Vector3` variant.
    create_from_vector3(Vector3) => VECTOR3.vector3;
    /// Creates a `Vector3i` variant.
    create_from_vector3i(Vector3I) => VECTOR3I.vector3i;
    /// Creates a `Vector4` variant.
    create_from_vector4(Vector4) => VECTOR4.vector4;
    /// Creates a `Vector4i` variant.
    create_from_vector4i(Vector4I) => VECTOR4I.vector4i;
    /// Creates a `Rect2` variant.
    create_from_rect2(Rect2) => RECT2.rect2;
    /// Creates a `Rect2i` variant.
    create_from_rect2i(Rect2I) => RECT2I.rect2i;
    /// Creates a `Quaternion` variant.
    create_from_quaternion(Quaternion) => QUATERNION.quaternion;
    /// Creates a `Color` variant.
    create_from_color(Color) => COLOR.color;
    /// Creates a `Plane` variant.
    create_from_plane(Plane) => PLANE.plane;
    /// Creates an `RID` variant.
    create_from_rid(Rid) => RID.rid;
}

/// Creates a `bool` variant.
#[inline]
pub fn create_from_bool(from: bool) -> Variant {
    let mut raw = RawVariant::with_type(VariantType::BOOL);
    raw.data.boolean = from as u8;
    // SAFETY: Booleans don't own anything.
    unsafe { Variant::from_raw(raw) }
}

/// Creates an `int` variant. Values above [`i64::MAX`] wrap around, the same
/// way the engine stores them.
#[inline]
pub fn create_from_uint(from: u64) -> Variant {
    create_from_int(from as i64)
}

macro_rules! boxed_constructors {
    ($($name:ident($ty:ty) => $native:ident;)*) => {
        $(
            /// Creates a variant holding an engine-allocated copy of the value.
            #[inline]
            pub fn $name(from: $ty) -> Variant {
                let mut raw = RawVariant::NIL;
                // SAFETY: `raw` is a valid destination. The engine allocates
                // the storage and the variant owns it from now on.
                unsafe {
                    (sys::interface().$native)(&mut raw, &from);
                    Variant::from_raw(raw)
                }
            }
        )*
    };
}

boxed_constructors! {
    create_from_transform2d(Transform2D) => variant_new_transform2d;
    create_from_basis(Basis) => variant_new_basis;
    create_from_transform3d(Transform3D) => variant_new_transform3d;
    create_from_projection(Projection) => variant_new_projection;
    create_from_aabb(Aabb) => variant_new_aabb;
}

/// Creates a `String` variant that takes over the native string.
#[inline]
pub fn create_from_string_taking_ownership(from: GString) -> Variant {
    let mut raw = RawVariant::with_type(VariantType::STRING);
    raw.data.string = from.into_raw();
    // SAFETY: The variant now owns the string and releases it when dropped.
    unsafe { Variant::from_raw(raw) }
}

/// Creates a `String` variant. [`None`] is stored as the empty string.
#[inline]
pub fn create_from_string(from: Option<&str>) -> Variant {
    create_from_string_taking_ownership(marshal::convert_string_to_native(from))
}

/// Creates a `Callable` variant that takes over the native callable.
#[inline]
pub fn create_from_callable_taking_ownership(from: NativeCallable) -> Variant {
    let mut raw = RawVariant::with_type(VariantType::CALLABLE);
    raw.data.callable = from.into_raw();
    // SAFETY: The variant now owns the callable and releases it when dropped.
    unsafe { Variant::from_raw(raw) }
}

/// Creates a `Callable` variant.
#[inline]
pub fn create_from_callable(from: &Callable) -> Variant {
    create_from_callable_taking_ownership(marshal::convert_callable_to_native(from))
}

/// Creates a `Signal` variant that takes over the native signal.
#[inline]
pub fn create_from_signal_taking_ownership(from: NativeSignal) -> Variant {
    let mut raw = RawVariant::with_type(VariantType::SIGNAL);
    raw.data.signal = from.into_raw();
    // SAFETY: The variant now owns the signal and releases it when dropped.
    unsafe { Variant::from_raw(raw) }
}

/// Creates a `Signal` variant.
#[inline]
pub fn create_from_signal(from: &Signal) -> Variant {
    create_from_signal_taking_ownership(marshal::convert_signal_to_native(from))
}

macro_rules! copying_constructors {
    ($($raw_name:ident, $name:ident($raw:ty, $wrapper:ty) => $native:ident;)*) => {
        $(
            /// Creates a variant holding a copy of the native handle. The
            /// handle stays owned by the caller.
            #[inline]
            pub fn $raw_name(from: &$raw) -> Variant {
                let mut raw = RawVariant::NIL;
                // SAFETY: The handle is valid and `raw` is a valid
                // destination. The variant owns the copy.
                unsafe {
                    (sys::interface().$native)(&mut raw, from);
                    Variant::from_raw(raw)
                }
            }

            /// Creates a variant holding a copy of the value. [`None`] is Nil.
            #[inline]
            pub fn $name(from: Option<&$wrapper>) -> Variant {
                match from {
                    Some(from) => $raw_name(from.as_raw()),
                    None => Variant::NIL,
                }
            }
        )*
    };
}

copying_constructors! {
    create_from_native_array, create_from_array(RawArray, Array) => variant_new_array;
    create_from_native_dictionary, create_from_dictionary(RawDictionary, Dictionary)
        => variant_new_dictionary;
    create_from_native_string_name, create_from_string_name(RawStringName, StringName)
        => variant_new_string_name;
    create_from_native_node_path, create_from_node_path(RawNodePath, NodePath)
        => variant_new_node_path;
}

/// Creates an `Object` variant referencing the object. A null pointer is Nil.
#[inline]
pub fn create_from_object_ptr(from: ObjectPtr) -> Variant {
    if from.is_null() {
        return Variant::NIL;
    }
    let mut raw = RawVariant::NIL;
    // SAFETY: The pointer is not null and `raw` is a valid destination. The
    // variant owns the reference it holds and releases it when dropped.
    unsafe {
        (sys::interface().variant_new_object)(&mut raw, from);
        Variant::from_raw(raw)
    }
}

/// Creates an `Object` variant referencing the wrapped object. [`None`] is
/// Nil.
#[inline]
pub fn create_from_object<T: GodotObject + ?Sized>(from: Option<&T>) -> Variant {
    match from {
        Some(from) => create_from_object_ptr(from.object_ptr()),
        None => Variant::NIL,
    }
}

/// Builds a temporary native array, wraps a copy of it and releases the
/// temporary.
fn create_from_system_array<T>(from: Option<&[T]>, to_variant: impl FnMut(&T) -> Variant) -> Variant {
    match from {
        Some(from) => {
            let array = marshal::convert_slice_to_native_array(from, to_variant);
            create_from_native_array(array.as_raw())
        }
        None => Variant::NIL,
    }
}

/// Creates an `Array` variant of `StringName`s. [`None`] is Nil.
pub fn create_from_system_array_of_string_name(from: Option<&[StringName]>) -> Variant {
    create_from_system_array(from, |name| create_from_string_name(Some(name)))
}

/// Creates an `Array` variant of `NodePath`s. [`None`] is Nil.
pub fn create_from_system_array_of_node_path(from: Option<&[NodePath]>) -> Variant {
    create_from_system_array(from, |path| create_from_node_path(Some(path)))
}

/// Creates an `Array` variant of `RID`s. [`None`] is Nil.
pub fn create_from_system_array_of_rid(from: Option<&[Rid]>) -> Variant {
    create_from_system_array(from, |&rid| create_from_rid(rid))
}

/// Creates an `Array` variant of objects. [`None`] is Nil, and so is every
/// [`None`] element.
pub fn create_from_system_array_of_object<T: GodotObject>(from: Option<&[Option<T>]>) -> Variant {
    create_from_system_array(from, |object| create_from_object(object.as_ref()))
}

/// Creates an `Array` variant from host values of a single type, converting
/// every element with its [`From`] impl. [`None`] is Nil.
pub fn create_from_typed_array<T: Clone + Into<Variant>>(from: Option<&[T]>) -> Variant {
    create_from_system_array(from, |value| value.clone().into())
}

/// Creates a `Dictionary` variant from host key-value pairs, inserted in
/// order. A later pair overwrites an earlier one with an equal key. [`None`]
/// is Nil.
pub fn create_from_typed_dictionary<K, V>(from: Option<&[(K, V)]>) -> Variant
where
    K: Clone + Into<Variant>,
    V: Clone + Into<Variant>,
{
    let Some(from) = from else {
        return Variant::NIL;
    };
    let mut dictionary = Dictionary::new();
    for (key, value) in from {
        dictionary.insert(&key.clone().into(), &value.clone().into());
    }
    create_from_native_dictionary(dictionary.as_raw())
}

/// Creates a packed array variant holding a copy of the native packed array.
/// The packed array stays owned by the caller.
#[inline]
pub fn create_from_packed_array<T: PackedArrayElement>(from: &PackedArray<T>) -> Variant {
    let mut raw = RawVariant::NIL;
    // SAFETY: The handle is valid and `raw` is a valid destination. The
    // variant owns the copy.
    unsafe {
        (T::interface(sys::interface()).variant_new)(&mut raw, from.as_raw());
        Variant::from_raw(raw)
    }
}

/// Creates a packed array variant from host values. The temporary native
/// packed array is released before this returns.
#[inline]
pub fn create_from_packed_slice<T: PackedArrayElement>(from: &[T]) -> Variant {
    create_from_packed_array(&marshal::convert_slice_to_native_packed_array(from))
}

macro_rules! packed_constructors {
    ($($name:ident($ty:ty);)*) => {
        $(
            /// Creates a packed array variant from host values.
            #[inline]
            pub fn $name(from: &[$ty]) -> Variant {
                create_from_packed_slice(from)
            }
        )*
    };
}

packed_constructors! {
    create_from_packed_byte_array(u8);
    create_from_packed_int32_array(i32);
    create_from_packed_int64_array(i64);
    create_from_packed_float32_array(f32);
    create_from_packed_float64_array(f64);
    create_from_packed_string_array(String);
    create_from_packed_vector2_array(Vector2);
    create_from_packed_vector3_array(Vector3);
    create_from_packed_vector4_array(Vector4);
    create_from_packed_color_array(Color);
}

macro_rules! from_impls {
    ($($ty:ty => |$v:ident| $e:expr;)*) => {
        $(
            impl From<$ty> for Variant {
                #[inline]
                fn from($v: $ty) -> Self {
                    $e
                }
            }
        )*
    };
}

from_impls! {
    bool => |v| create_from_bool(v);
    i8 => |v| create_from_int(v.into());
    i16 => |v| create_from_int(v.into());
    i32 => |v| create_from_int(v.into());
    i64 => |v| create_from_int(v);
    u8 => |v| create_from_int(v.into());
    u16 => |v| create_from_int(v.into());
    u32 => |v| create_from_int(v.into());
    u64 => |v| create_from_uint(v);
    f32 => |v| create_from_float(v.into());
    f64 => |v| create_from_float(v);
    Vector2 => |v| create_from_vector2(v);
    Vector2I => |v| create_from_vector2i(v);
    Vector3 => |v| create_from_vector3(v);
    Vector3I => |v| create_from_vector3i(v);
    Vector4 => |v| create_from_vector4(v);
    Vector4I => |v| create_from_vector4i(v);
    Rect2 => |v| create_from_rect2(v);
    Rect2I => |v| create_from_rect2i(v);
    Quaternion => |v| create_from_quaternion(v);
    Color => |v| create_from_color(v);
    Plane => |v| create_from_plane(v);
    Rid => |v| create_from_rid(v);
    Transform2D => |v| create_from_transform2d(v);
    Basis => |v| create_from_basis(v);
    Transform3D => |v| create_from_transform3d(v);
    Projection => |v| create_from_projection(v);
    Aabb => |v| create_from_aabb(v);
    &str => |v| create_from_string(Some(v));
    &String => |v| create_from_string(Some(v));
    String => |v| create_from_string(Some(&v));
    GString => |v| create_from_string_taking_ownership(v);
    &StringName => |v| create_from_string_name(Some(v));
    StringName => |v| create_from_string_name(Some(&v));
    &NodePath => |v| create_from_node_path(Some(v));
    NodePath => |v| create_from_node_path(Some(&v));
    &Array => |v| create_from_array(Some(v));
    Array => |v| create_from_array(Some(&v));
    &Dictionary => |v| create_from_dictionary(Some(v));
    Dictionary => |v| create_from_dictionary(Some(&v));
    &Callable => |v| create_from_callable(v);
    Callable => |v| create_from_callable(&v);
    NativeCallable => |v| create_from_callable_taking_ownership(v);
    &Signal => |v| create_from_signal(v);
    Signal => |v| create_from_signal(&v);
    NativeSignal => |v| create_from_signal_taking_ownership(v);
    ObjectPtr => |v| create_from_object_ptr(v);
}

impl<T: PackedArrayElement> From<&PackedArray<T>> for Variant {
    #[inline]
    fn from(value: &PackedArray<T>) -> Self {
        create_from_packed_array(value)
    }
}

impl<T: PackedArrayElement> From<&[T]> for Variant {
    #[inline]
    fn from(value: &[T]) -> Self {
        create_from_packed_slice(value)
    }
}

impl<T: Into<Variant>> From<Option<T>> for Variant {
    /// [`None`] is Nil.
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(Variant::NIL, Into::into)
    }
}
