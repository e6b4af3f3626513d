use crate::{
    math::{Aabb, Basis, Projection, Transform2D, Transform3D},
    sys::{
        ObjectPtr, RawArray, RawCallable, RawDictionary, RawNodePath, RawSignal, RawString,
        RawStringName, RawVariant,
    },
    Payload, Variant, VariantType,
};

use super::{containers, packed, text};

/// Looks at a raw variant through the typed payload view without taking
/// ownership of it.
pub(super) fn view(raw: &RawVariant) -> &Variant {
    // SAFETY: Variant is a transparent wrapper around RawVariant, and the
    // shared borrow keeps anyone from dropping it.
    unsafe { &*(raw as *const RawVariant).cast::<Variant>() }
}

pub(super) fn new_boxed<T>(value: T) -> *mut T {
    super::handle_allocated();
    Box::into_raw(Box::new(value))
}

/// # Safety
///
/// The pointer needs to be null or allocated by [`new_boxed`] and not yet
/// freed.
unsafe fn free_boxed<T>(value: *mut T) {
    if !value.is_null() {
        drop(Box::from_raw(value));
        super::handle_released();
    }
}

/// Deep copies a variant. The copy shares no storage with the original.
pub(super) fn copy(src: &RawVariant) -> RawVariant {
    let mut dest = *src;
    let data = &mut dest.data;
    // SAFETY: Every handle in a valid variant is null or one of ours.
    unsafe {
        match view(src).payload() {
            Payload::String(s) => data.string = RawString(text::copy(s.0)),
            Payload::StringName(s) => data.string_name = RawStringName(text::copy(s.0)),
            Payload::NodePath(p) => data.node_path = RawNodePath(text::copy(p.0)),
            Payload::Transform2D(t) => data.transform2d = new_boxed(*t),
            Payload::Aabb(a) => data.aabb = new_boxed(*a),
            Payload::Basis(b) => data.basis = new_boxed(*b),
            Payload::Transform3D(t) => data.transform3d = new_boxed(*t),
            Payload::Projection(p) => data.projection = new_boxed(*p),
            Payload::Object(_) => super::handle_allocated(),
            Payload::Callable(c) => {
                data.callable = RawCallable {
                    method: RawStringName(text::copy(c.method.0)),
                    object: c.object,
                }
            }
            Payload::Signal(s) => {
                data.signal = RawSignal {
                    name: RawStringName(text::copy(s.name.0)),
                    owner: s.owner,
                }
            }
            Payload::Array(a) => data.array = containers::copy_array(a),
            Payload::Dictionary(d) => data.dictionary = containers::copy_dictionary(d),
            Payload::PackedByteArray(a) => data.packed_byte_array = packed::copy(a),
            Payload::PackedInt32Array(a) => data.packed_int32_array = packed::copy(a),
            Payload::PackedInt64Array(a) => data.packed_int64_array = packed::copy(a),
            Payload::PackedFloat32Array(a) => data.packed_float32_array = packed::copy(a),
            Payload::PackedFloat64Array(a) => data.packed_float64_array = packed::copy(a),
            Payload::PackedStringArray(a) => data.packed_string_array = packed::copy(a),
            Payload::PackedVector2Array(a) => data.packed_vector2_array = packed::copy(a),
            Payload::PackedVector3Array(a) => data.packed_vector3_array = packed::copy(a),
            Payload::PackedColorArray(a) => data.packed_color_array = packed::copy(a),
            Payload::PackedVector4Array(a) => data.packed_vector4_array = packed::copy(a),
            _ => {}
        }
    }
    dest
}

/// Releases whatever the variant owns and leaves it Nil.
///
/// # Safety
///
/// The variant needs to be valid and must not be used again with its old
/// payload.
pub(super) unsafe fn destroy(variant: &mut RawVariant) {
    let data = variant.data;
    match variant.ty {
        VariantType::STRING => text::free(data.string.0),
        VariantType::STRING_NAME => text::free(data.string_name.0),
        VariantType::NODE_PATH => text::free(data.node_path.0),
        VariantType::TRANSFORM2D => free_boxed(data.transform2d),
        VariantType::AABB => free_boxed(data.aabb),
        VariantType::BASIS => free_boxed(data.basis),
        VariantType::TRANSFORM3D => free_boxed(data.transform3d),
        VariantType::PROJECTION => free_boxed(data.projection),
        VariantType::OBJECT => super::handle_released(),
        VariantType::CALLABLE => text::free(data.callable.method.0),
        VariantType::SIGNAL => text::free(data.signal.name.0),
        VariantType::ARRAY => containers::free_array(data.array),
        VariantType::DICTIONARY => containers::free_dictionary(data.dictionary),
        VariantType::PACKED_BYTE_ARRAY => packed::free(data.packed_byte_array),
        VariantType::PACKED_INT32_ARRAY => packed::free(data.packed_int32_array),
        VariantType::PACKED_INT64_ARRAY => packed::free(data.packed_int64_array),
        VariantType::PACKED_FLOAT32_ARRAY => packed::free(data.packed_float32_array),
        VariantType::PACKED_FLOAT64_ARRAY => packed::free(data.packed_float64_array),
        VariantType::PACKED_STRING_ARRAY => packed::free(data.packed_string_array),
        VariantType::PACKED_VECTOR2_ARRAY => packed::free(data.packed_vector2_array),
        VariantType::PACKED_VECTOR3_ARRAY => packed::free(data.packed_vector3_array),
        VariantType::PACKED_COLOR_ARRAY => packed::free(data.packed_color_array),
        VariantType::PACKED_VECTOR4_ARRAY => packed::free(data.packed_vector4_array),
        _ => {}
    }
    *variant = RawVariant::NIL;
}

/// Compares two variants by value. Variants of different types are never
/// equal. This is how dictionary keys are matched.
pub(super) fn equals(a: &RawVariant, b: &RawVariant) -> bool {
    if a.ty != b.ty {
        return false;
    }
    // SAFETY: Every handle in a valid variant is null or one of ours.
    unsafe {
        match (view(a).payload(), view(b).payload()) {
            (Payload::Nil, Payload::Nil) => true,
            (Payload::Bool(a), Payload::Bool(b)) => a == b,
            (Payload::Int(a), Payload::Int(b)) => a == b,
            (Payload::Float(a), Payload::Float(b)) => a == b,
            (Payload::String(a), Payload::String(b)) => text::get(a.0) == text::get(b.0),
            (Payload::StringName(a), Payload::StringName(b)) => text::get(a.0) == text::get(b.0),
            (Payload::NodePath(a), Payload::NodePath(b)) => text::get(a.0) == text::get(b.0),
            (Payload::Vector2(a), Payload::Vector2(b)) => a == b,
            (Payload::Vector2I(a), Payload::Vector2I(b)) => a == b,
            (Payload::Rect2(a), Payload::Rect2(b)) => a == b,
            (Payload::Rect2I(a), Payload::Rect2I(b)) => a == b,
            (Payload::Vector3(a), Payload::Vector3(b)) => a == b,
            (Payload::Vector3I(a), Payload::Vector3I(b)) => a == b,
            (Payload::Transform2D(a), Payload::Transform2D(b)) => a == b,
            (Payload::Vector4(a), Payload::Vector4(b)) => a == b,
            (Payload::Vector4I(a), Payload::Vector4I(b)) => a == b,
            (Payload::Plane(a), Payload::Plane(b)) => a == b,
            (Payload::Quaternion(a), Payload::Quaternion(b)) => a == b,
            (Payload::Aabb(a), Payload::Aabb(b)) => a == b,
            (Payload::Basis(a), Payload::Basis(b)) => a == b,
            (Payload::Transform3D(a), Payload::Transform3D(b)) => a == b,
            (Payload::Projection(a), Payload::Projection(b)) => a == b,
            (Payload::Color(a), Payload::Color(b)) => a == b,
            (Payload::Rid(a), Payload::Rid(b)) => a == b,
            (Payload::Object(a), Payload::Object(b)) => a == b,
            (Payload::Callable(a), Payload::Callable(b)) => {
                a.object == b.object && text::get(a.method.0) == text::get(b.method.0)
            }
            (Payload::Signal(a), Payload::Signal(b)) => {
                a.owner == b.owner && text::get(a.name.0) == text::get(b.name.0)
            }
            (Payload::Array(a), Payload::Array(b)) => {
                let (a, b) = (containers::elements(a), containers::elements(b));
                a.len() == b.len() && a.iter().zip(b).all(|(a, b)| equals(a, b))
            }
            (Payload::Dictionary(a), Payload::Dictionary(b)) => {
                let (a, b) = (containers::entries(a), containers::entries(b));
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|((ak, av), (bk, bv))| equals(ak, bk) && equals(av, bv))
            }
            (Payload::PackedByteArray(a), Payload::PackedByteArray(b)) => packed::equals(a, b),
            (Payload::PackedInt32Array(a), Payload::PackedInt32Array(b)) => packed::equals(a, b),
            (Payload::PackedInt64Array(a), Payload::PackedInt64Array(b)) => packed::equals(a, b),
            (Payload::PackedFloat32Array(a), Payload::PackedFloat32Array(b)) => {
                packed::equals(a, b)
            }
            (Payload::PackedFloat64Array(a), Payload::PackedFloat64Array(b)) => {
                packed::equals(a, b)
            }
            (Payload::PackedStringArray(a), Payload::PackedStringArray(b)) => {
                packed::equals(a, b)
            }
            (Payload::PackedVector2Array(a), Payload::PackedVector2Array(b)) => {
                packed::equals(a, b)
            }
            (Payload::PackedVector3Array(a), Payload::PackedVector3Array(b)) => {
                packed::equals(a, b)
            }
            (Payload::PackedColorArray(a), Payload::PackedColorArray(b)) => packed::equals(a, b),
            (Payload::PackedVector4Array(a), Payload::PackedVector4Array(b)) => {
                packed::equals(a, b)
            }
            _ => false,
        }
    }
}

pub(super) unsafe extern "C" fn variant_new_copy(dest: *mut RawVariant, src: *const RawVariant) {
    dest.write(copy(&*src));
}

pub(super) unsafe extern "C" fn variant_destroy(variant: *mut RawVariant) {
    destroy(&mut *variant);
}

macro_rules! boxed_entries {
    ($($entry:ident($ty:ty) => $variant_type:ident.$field:ident;)*) => {
        $(
            pub(super) unsafe extern "C" fn $entry(dest: *mut RawVariant, from: *const $ty) {
                let mut raw = RawVariant::with_type(VariantType::$variant_type);
                raw.data.$field = new_boxed(*from);
                dest.write(raw);
            }
        )*
    };
}

boxed_entries! {
    variant_new_transform2d(Transform2D) => TRANSFORM2D.transform2d;
    variant_new_basis(Basis) => BASIS.basis;
    variant_new_transform3d(Transform3D) => TRANSFORM3D.transform3d;
    variant_new_projection(Projection) => PROJECTION.projection;
    variant_new_aabb(Aabb) => AABB.aabb;
}

pub(super) unsafe extern "C" fn variant_new_string_name(
    dest: *mut RawVariant,
    from: *const RawStringName,
) {
    let mut raw = RawVariant::with_type(VariantType::STRING_NAME);
    raw.data.string_name = RawStringName(text::copy((*from).0));
    dest.write(raw);
}

pub(super) unsafe extern "C" fn variant_new_node_path(
    dest: *mut RawVariant,
    from: *const RawNodePath,
) {
    let mut raw = RawVariant::with_type(VariantType::NODE_PATH);
    raw.data.node_path = RawNodePath(text::copy((*from).0));
    dest.write(raw);
}

pub(super) unsafe extern "C" fn variant_new_object(dest: *mut RawVariant, from: ObjectPtr) {
    let raw = if from.is_null() {
        RawVariant::NIL
    } else {
        super::handle_allocated();
        let mut raw = RawVariant::with_type(VariantType::OBJECT);
        raw.data.object = from;
        raw
    };
    dest.write(raw);
}

pub(super) unsafe extern "C" fn variant_new_array(dest: *mut RawVariant, from: *const RawArray) {
    let mut raw = RawVariant::with_type(VariantType::ARRAY);
    raw.data.array = containers::copy_array(&*from);
    dest.write(raw);
}

pub(super) unsafe extern "C" fn variant_new_dictionary(
    dest: *mut RawVariant,
    from: *const RawDictionary,
) {
    let mut raw = RawVariant::with_type(VariantType::DICTIONARY);
    raw.data.dictionary = containers::copy_dictionary(&*from);
    dest.write(raw);
}

/// Creates a raw variant holding a copy of the text.
pub(super) fn new_string(value: &str) -> RawVariant {
    let mut raw = RawVariant::with_type(VariantType::STRING);
    raw.data.string = RawString(text::new(value));
    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{headless::live_handles, math::Vector2};

    fn int(value: i64) -> RawVariant {
        let mut raw = RawVariant::with_type(VariantType::INT);
        raw.data.int = value;
        raw
    }

    #[test]
    fn copies_share_no_storage() {
        let live = live_handles();
        let mut original = new_string("shared?");
        let mut copied = copy(&original);
        assert_eq!(live_handles(), live + 2);
        // SAFETY: Both are strings we just created.
        unsafe {
            assert_ne!(original.data.string, copied.data.string);
            destroy(&mut original);
            assert_eq!(text::get(copied.data.string.0), "shared?");
            destroy(&mut copied);
        }
        assert_eq!(live_handles(), live);
        assert_eq!(copied.ty, VariantType::NIL);
    }

    #[test]
    fn equality_is_by_value_and_type() {
        let mut a = new_string("key");
        let mut b = new_string("key");
        assert!(equals(&a, &b));
        assert!(equals(&int(3), &int(3)));
        assert!(!equals(&int(3), &int(4)));

        let mut float = RawVariant::with_type(VariantType::FLOAT);
        float.data.float = 3.0;
        assert!(!equals(&int(3), &float));

        let mut vector = RawVariant::with_type(VariantType::VECTOR2);
        vector.data.vector2 = Vector2::new(1.0, 2.0);
        assert!(equals(&vector, &vector));

        // SAFETY: Both are strings we just created.
        unsafe {
            destroy(&mut a);
            destroy(&mut b);
        }
    }
}
