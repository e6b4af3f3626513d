//! The coercion table: what a Variant of one type becomes when it's read as
//! another. Whatever has no sensible conversion becomes the target type's
//! default value.
//!
//! Numbers are read out of text as leniently as the engine reads them. Floats
//! print in their shortest round-trip form, which keeps the `.0` of whole
//! numbers.

use core::{fmt::Write, ptr};

use crate::{
    math::{
        Aabb, Basis, Color, Plane, Projection, Quaternion, Rect2, Rect2I, Rid, Transform2D,
        Transform3D, Vector2, Vector2I, Vector3, Vector3I, Vector4, Vector4I,
    },
    sys::{
        ObjectPtr, RawArray, RawCallable, RawDictionary, RawNodePath, RawPackedArray, RawSignal,
        RawString, RawStringName, RawVariant,
    },
    Payload,
};

use super::{
    containers,
    packed::{self, HeadlessElement},
    text,
    variant::{self, view},
};

pub(super) fn to_bool(v: &RawVariant) -> bool {
    // SAFETY: Every handle in a valid variant is null or one of ours.
    unsafe {
        match view(v).payload() {
            Payload::Nil => false,
            Payload::Bool(b) => b,
            Payload::Int(i) => i != 0,
            Payload::Float(f) => f != 0.0,
            Payload::String(s) => !text::get(s.0).is_empty(),
            Payload::StringName(s) => !text::get(s.0).is_empty(),
            Payload::NodePath(p) => !text::get(p.0).is_empty(),
            Payload::Vector2(v) => v != Vector2::ZERO,
            Payload::Vector2I(v) => v != Vector2I::default(),
            Payload::Vector3(v) => v != Vector3::ZERO,
            Payload::Vector3I(v) => v != Vector3I::default(),
            Payload::Vector4(v) => v != Vector4::default(),
            Payload::Vector4I(v) => v != Vector4I::default(),
            Payload::Rid(rid) => rid.is_valid(),
            Payload::Object(object) => !object.is_null(),
            Payload::Callable(c) => !c.object.is_null(),
            Payload::Signal(s) => !s.owner.is_null(),
            Payload::Array(a) => !containers::elements(a).is_empty(),
            Payload::Dictionary(d) => !containers::entries(d).is_empty(),
            Payload::Unknown(_) => false,
            _ => true,
        }
    }
}

pub(super) fn to_int(v: &RawVariant) -> i64 {
    match view(v).payload() {
        Payload::Int(i) => i,
        Payload::Bool(b) => b.into(),
        Payload::Float(f) => f as i64,
        // SAFETY: The string is null or one of ours.
        Payload::String(s) => parse_int(unsafe { text::get(s.0) }),
        _ => 0,
    }
}

pub(super) fn to_float(v: &RawVariant) -> f64 {
    match view(v).payload() {
        Payload::Float(f) => f,
        Payload::Int(i) => i as f64,
        Payload::Bool(b) => u8::from(b).into(),
        // SAFETY: The string is null or one of ours.
        Payload::String(s) => parse_float(unsafe { text::get(s.0) }),
        _ => 0.0,
    }
}

/// Reads the digits in front of the first `.`, skipping anything else. A `-`
/// before the first nonzero digit flips the sign. Overflow saturates.
fn parse_int(text: &str) -> i64 {
    let whole = text.split('.').next().unwrap_or(text);
    let mut value: i64 = 0;
    let mut negative = false;
    for c in whole.chars() {
        if let Some(digit) = c.to_digit(10) {
            match value.checked_mul(10).and_then(|v| v.checked_add(digit.into())) {
                Some(v) => value = v,
                None => return if negative { i64::MIN } else { i64::MAX },
            }
        } else if c == '-' && value == 0 {
            negative = !negative;
        }
    }
    if negative {
        -value
    } else {
        value
    }
}

/// Reads the longest prefix that is a number. Text without one is 0.
fn parse_float(text: &str) -> f64 {
    let text = text.trim_start();
    (1..=text.len())
        .rev()
        .filter(|&end| text.is_char_boundary(end))
        .find_map(|end| text[..end].parse().ok())
        .unwrap_or(0.0)
}

macro_rules! inline_coercions {
    ($($name:ident -> $ty:ty { $($pattern:pat => $value:expr,)* } else $default:expr;)*) => {
        $(
            pub(super) fn $name(v: &RawVariant) -> $ty {
                match view(v).payload() {
                    $($pattern => $value,)*
                    _ => $default,
                }
            }
        )*
    };
}

inline_coercions! {
    to_vector2 -> Vector2 {
        Payload::Vector2(v) => v,
        Payload::Vector2I(v) => v.into(),
    } else Vector2::ZERO;
    to_vector2i -> Vector2I {
        Payload::Vector2I(v) => v,
        Payload::Vector2(v) => v.into(),
    } else Vector2I::default();
    to_rect2 -> Rect2 {
        Payload::Rect2(r) => r,
        Payload::Rect2I(r) => r.into(),
    } else Rect2::default();
    to_rect2i -> Rect2I {
        Payload::Rect2I(r) => r,
        Payload::Rect2(r) => r.into(),
    } else Rect2I::default();
    to_vector3 -> Vector3 {
        Payload::Vector3(v) => v,
        Payload::Vector3I(v) => v.into(),
    } else Vector3::ZERO;
    to_vector3i -> Vector3I {
        Payload::Vector3I(v) => v,
        Payload::Vector3(v) => v.into(),
    } else Vector3I::default();
    to_vector4 -> Vector4 {
        Payload::Vector4(v) => v,
        Payload::Vector4I(v) => v.into(),
    } else Vector4::default();
    to_vector4i -> Vector4I {
        Payload::Vector4I(v) => v,
        Payload::Vector4(v) => v.into(),
    } else Vector4I::default();
    to_transform2d -> Transform2D {
        Payload::Transform2D(t) => *t,
    } else Transform2D::IDENTITY;
    to_plane -> Plane {
        Payload::Plane(p) => p,
    } else Plane::default();
    to_quaternion -> Quaternion {
        Payload::Quaternion(q) => q,
    } else Quaternion::IDENTITY;
    to_aabb -> Aabb {
        Payload::Aabb(a) => *a,
    } else Aabb::default();
    to_basis -> Basis {
        Payload::Basis(b) => *b,
        Payload::Quaternion(q) => Basis::from_quaternion(q),
        Payload::Transform3D(t) => t.basis,
    } else Basis::IDENTITY;
    to_transform3d -> Transform3D {
        Payload::Transform3D(t) => *t,
        Payload::Basis(b) => Transform3D { basis: *b, origin: Vector3::ZERO },
        Payload::Quaternion(q) => Transform3D {
            basis: Basis::from_quaternion(q),
            origin: Vector3::ZERO,
        },
    } else Transform3D::IDENTITY;
    to_projection -> Projection {
        Payload::Projection(p) => *p,
    } else Projection::IDENTITY;
    to_rid -> Rid {
        Payload::Rid(rid) => rid,
    } else Rid(0);
}

pub(super) fn to_color(v: &RawVariant) -> Color {
    match view(v).payload() {
        Payload::Color(c) => c,
        Payload::Int(rgba) => color_from_rgba(rgba as u32),
        // SAFETY: The string is null or one of ours.
        Payload::String(s) => parse_html_color(unsafe { text::get(s.0) }).unwrap_or_default(),
        _ => Color::default(),
    }
}

fn color_from_rgba(rgba: u32) -> Color {
    let [r, g, b, a] = rgba.to_be_bytes().map(|c| c as f32 / 255.0);
    Color::new(r, g, b, a)
}

/// Parses `#rrggbb` or `#rrggbbaa`. The `#` is optional.
fn parse_html_color(text: &str) -> Option<Color> {
    let hex = text.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    let rgba = u32::from_str_radix(hex, 16).ok()?;
    match hex.len() {
        6 => Some(color_from_rgba(rgba << 8 | 0xFF)),
        8 => Some(color_from_rgba(rgba)),
        _ => None,
    }
}

/// Stringifies any variant the way the engine prints it. Nil is `<null>`.
pub(super) fn to_text(v: &RawVariant) -> String {
    let mut out = String::new();
    write_text(&mut out, v);
    out
}

fn write_elements<'a>(out: &mut String, elements: impl IntoIterator<Item = &'a RawVariant>) {
    out.push('[');
    for (i, element) in elements.into_iter().enumerate() {
        if i != 0 {
            out.push_str(", ");
        }
        write_text(out, element);
    }
    out.push(']');
}

fn write_packed<T: HeadlessElement>(out: &mut String, array: &RawPackedArray<T>) {
    // SAFETY: The buffer is empty or one of ours.
    let mut elements: Vec<RawVariant> =
        unsafe { packed::elements(array) }.iter().map(T::to_variant).collect();
    write_elements(out, &elements);
    for element in &mut elements {
        // SAFETY: The variants were just created and aren't used afterwards.
        unsafe { variant::destroy(element) };
    }
}

fn write_text(out: &mut String, v: &RawVariant) {
    // Writing to a String can't fail.
    let _ = write_payload(out, v);
}

fn write_payload(out: &mut String, v: &RawVariant) -> core::fmt::Result {
    // SAFETY: Every handle in a valid variant is null or one of ours.
    unsafe {
        match view(v).payload() {
            Payload::Nil => out.push_str("<null>"),
            Payload::Bool(b) => write!(out, "{b}")?,
            Payload::Int(i) => write!(out, "{i}")?,
            Payload::Float(f) => write!(out, "{f:?}")?,
            Payload::String(s) => out.push_str(text::get(s.0)),
            Payload::StringName(s) => out.push_str(text::get(s.0)),
            Payload::NodePath(p) => out.push_str(text::get(p.0)),
            Payload::Vector2(v) => write!(out, "({}, {})", v.x, v.y)?,
            Payload::Vector2I(v) => write!(out, "({}, {})", v.x, v.y)?,
            Payload::Rect2(r) => write!(
                out,
                "[P: ({}, {}), S: ({}, {})]",
                r.position.x, r.position.y, r.size.x, r.size.y
            )?,
            Payload::Rect2I(r) => write!(
                out,
                "[P: ({}, {}), S: ({}, {})]",
                r.position.x, r.position.y, r.size.x, r.size.y
            )?,
            Payload::Vector3(v) => write!(out, "({}, {}, {})", v.x, v.y, v.z)?,
            Payload::Vector3I(v) => write!(out, "({}, {}, {})", v.x, v.y, v.z)?,
            Payload::Transform2D(t) => write!(
                out,
                "[X: ({}, {}), Y: ({}, {}), O: ({}, {})]",
                t.x.x, t.x.y, t.y.x, t.y.y, t.origin.x, t.origin.y
            )?,
            Payload::Vector4(v) => write!(out, "({}, {}, {}, {})", v.x, v.y, v.z, v.w)?,
            Payload::Vector4I(v) => write!(out, "({}, {}, {}, {})", v.x, v.y, v.z, v.w)?,
            Payload::Plane(p) => write!(
                out,
                "[N: ({}, {}, {}), D: {}]",
                p.normal.x, p.normal.y, p.normal.z, p.d
            )?,
            Payload::Quaternion(q) => write!(out, "({}, {}, {}, {})", q.x, q.y, q.z, q.w)?,
            Payload::Aabb(a) => write!(
                out,
                "[P: ({}, {}, {}), S: ({}, {}, {})]",
                a.position.x, a.position.y, a.position.z, a.size.x, a.size.y, a.size.z
            )?,
            Payload::Basis(b) => write_basis(out, b)?,
            Payload::Transform3D(t) => {
                write_basis(out, &t.basis)?;
                out.pop();
                write!(out, ", O: ({}, {}, {})]", t.origin.x, t.origin.y, t.origin.z)?;
            }
            Payload::Projection(p) => {
                out.push('[');
                for (i, (name, c)) in ["X", "Y", "Z", "W"].iter().zip(&p.columns).enumerate() {
                    if i != 0 {
                        out.push_str(", ");
                    }
                    write!(out, "{name}: ({}, {}, {}, {})", c.x, c.y, c.z, c.w)?;
                }
                out.push(']');
            }
            Payload::Color(c) => write!(out, "({}, {}, {}, {})", c.r, c.g, c.b, c.a)?,
            Payload::Rid(rid) => write!(out, "RID({})", rid.0)?,
            Payload::Object(object) => write!(out, "<Object#{:p}>", object.0)?,
            Payload::Callable(c) => write!(out, "{:p}::{}", c.object.0, text::get(c.method.0))?,
            Payload::Signal(s) => {
                write!(out, "{:p}::[signal]{}", s.owner.0, text::get(s.name.0))?
            }
            Payload::Dictionary(d) => {
                out.push('{');
                for (i, (key, value)) in containers::entries(d).iter().enumerate() {
                    if i != 0 {
                        out.push_str(", ");
                    }
                    write_text(out, key);
                    out.push_str(": ");
                    write_text(out, value);
                }
                out.push('}');
            }
            Payload::Array(a) => write_elements(out, containers::elements(a)),
            Payload::PackedByteArray(a) => write_packed(out, a),
            Payload::PackedInt32Array(a) => write_packed(out, a),
            Payload::PackedInt64Array(a) => write_packed(out, a),
            Payload::PackedFloat32Array(a) => write_packed(out, a),
            Payload::PackedFloat64Array(a) => write_packed(out, a),
            Payload::PackedStringArray(a) => write_packed(out, a),
            Payload::PackedVector2Array(a) => write_packed(out, a),
            Payload::PackedVector3Array(a) => write_packed(out, a),
            Payload::PackedColorArray(a) => write_packed(out, a),
            Payload::PackedVector4Array(a) => write_packed(out, a),
            Payload::Unknown(ty) => write!(out, "<{ty:?}>")?,
        }
    }
    Ok(())
}

fn write_basis(out: &mut String, b: &Basis) -> core::fmt::Result {
    let [x, y, z] = b.rows;
    write!(
        out,
        "[X: ({}, {}, {}), Y: ({}, {}, {}), Z: ({}, {}, {})]",
        x.x, x.y, x.z, y.x, y.y, y.z, z.x, z.y, z.z
    )
}

fn packed_to_variants<T: HeadlessElement>(array: &RawPackedArray<T>) -> Vec<RawVariant> {
    // SAFETY: The buffer is empty or one of ours.
    unsafe { packed::elements(array) }.iter().map(T::to_variant).collect()
}

/// Returns owned copies of the elements of an array or packed array.
fn sequence_elements(v: &RawVariant) -> Option<Vec<RawVariant>> {
    Some(match view(v).payload() {
        // SAFETY: The array is one of ours.
        Payload::Array(a) => unsafe { containers::elements(a) }.iter().map(variant::copy).collect(),
        Payload::PackedByteArray(a) => packed_to_variants(a),
        Payload::PackedInt32Array(a) => packed_to_variants(a),
        Payload::PackedInt64Array(a) => packed_to_variants(a),
        Payload::PackedFloat32Array(a) => packed_to_variants(a),
        Payload::PackedFloat64Array(a) => packed_to_variants(a),
        Payload::PackedStringArray(a) => packed_to_variants(a),
        Payload::PackedVector2Array(a) => packed_to_variants(a),
        Payload::PackedVector3Array(a) => packed_to_variants(a),
        Payload::PackedColorArray(a) => packed_to_variants(a),
        Payload::PackedVector4Array(a) => packed_to_variants(a),
        _ => return None,
    })
}

pub(super) fn to_packed<T: HeadlessElement>(v: &RawVariant) -> RawPackedArray<T> {
    if v.ty == T::VARIANT_TYPE {
        // SAFETY: The type says the payload is a packed array of `T`.
        return unsafe { packed::copy(&T::get(&v.data)) };
    }
    let Some(mut elements) = sequence_elements(v) else {
        return RawPackedArray::EMPTY;
    };
    let packed = packed::from_vec(elements.iter().map(T::from_variant).collect());
    for element in &mut elements {
        // SAFETY: The copies are ours and aren't used afterwards.
        unsafe { variant::destroy(element) };
    }
    packed
}

macro_rules! entries {
    ($($entry:ident -> $ty:ty = $f:expr;)*) => {
        $(
            pub(super) unsafe extern "C" fn $entry(variant: *const RawVariant) -> $ty {
                super::count_coercion();
                $f(&*variant)
            }
        )*
    };
}

entries! {
    variant_as_bool -> bool = to_bool;
    variant_as_int -> i64 = to_int;
    variant_as_float -> f64 = to_float;
    variant_as_vector2 -> Vector2 = to_vector2;
    variant_as_vector2i -> Vector2I = to_vector2i;
    variant_as_rect2 -> Rect2 = to_rect2;
    variant_as_rect2i -> Rect2I = to_rect2i;
    variant_as_vector3 -> Vector3 = to_vector3;
    variant_as_vector3i -> Vector3I = to_vector3i;
    variant_as_transform2d -> Transform2D = to_transform2d;
    variant_as_vector4 -> Vector4 = to_vector4;
    variant_as_vector4i -> Vector4I = to_vector4i;
    variant_as_plane -> Plane = to_plane;
    variant_as_quaternion -> Quaternion = to_quaternion;
    variant_as_aabb -> Aabb = to_aabb;
    variant_as_basis -> Basis = to_basis;
    variant_as_transform3d -> Transform3D = to_transform3d;
    variant_as_projection -> Projection = to_projection;
    variant_as_color -> Color = to_color;
    variant_as_rid -> Rid = to_rid;
    variant_as_string -> RawString = |v: &RawVariant| RawString(text::new(&to_text(v)));
    variant_as_string_name -> RawStringName = |v: &RawVariant| RawStringName(text_of(v, true));
    variant_as_node_path -> RawNodePath = |v: &RawVariant| RawNodePath(text_of(v, false));
    variant_as_callable -> RawCallable = to_callable;
    variant_as_signal -> RawSignal = to_signal;
    variant_as_array -> RawArray = to_array;
    variant_as_dictionary -> RawDictionary = to_dictionary;
}

/// Copies the text of a String, and of a StringName or a NodePath depending
/// on the target. Everything else is empty.
fn text_of(v: &RawVariant, to_name: bool) -> *mut core::ffi::c_void {
    // SAFETY: Every handle in a valid variant is null or one of ours.
    unsafe {
        match view(v).payload() {
            Payload::String(s) => text::copy(s.0),
            Payload::StringName(s) if to_name => text::copy(s.0),
            Payload::NodePath(p) if !to_name => text::copy(p.0),
            _ => ptr::null_mut(),
        }
    }
}

fn to_callable(v: &RawVariant) -> RawCallable {
    match view(v).payload() {
        // SAFETY: The method name is null or one of ours.
        Payload::Callable(c) => RawCallable {
            method: RawStringName(unsafe { text::copy(c.method.0) }),
            object: c.object,
        },
        _ => RawCallable {
            method: RawStringName(ptr::null_mut()),
            object: ObjectPtr::NULL,
        },
    }
}

fn to_signal(v: &RawVariant) -> RawSignal {
    match view(v).payload() {
        // SAFETY: The signal name is null or one of ours.
        Payload::Signal(s) => RawSignal {
            name: RawStringName(unsafe { text::copy(s.name.0) }),
            owner: s.owner,
        },
        _ => RawSignal {
            name: RawStringName(ptr::null_mut()),
            owner: ObjectPtr::NULL,
        },
    }
}

fn to_array(v: &RawVariant) -> RawArray {
    containers::new_array(sequence_elements(v).unwrap_or_default())
}

fn to_dictionary(v: &RawVariant) -> RawDictionary {
    match view(v).payload() {
        // SAFETY: The dictionary is one of ours.
        Payload::Dictionary(d) => unsafe { containers::copy_dictionary(d) },
        _ => containers::new_dictionary(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{headless::live_handles, VariantType};

    fn int(value: i64) -> RawVariant {
        let mut raw = RawVariant::with_type(VariantType::INT);
        raw.data.int = value;
        raw
    }

    fn float(value: f64) -> RawVariant {
        let mut raw = RawVariant::with_type(VariantType::FLOAT);
        raw.data.float = value;
        raw
    }

    #[test]
    fn numbers_coerce_like_the_engine() {
        assert_eq!(to_int(&float(2.9)), 2);
        assert_eq!(to_int(&float(-2.9)), -2);
        assert_eq!(to_float(&int(7)), 7.0);
        assert!(to_bool(&int(-1)));
        assert!(!to_bool(&float(0.0)));
        assert!(!to_bool(&RawVariant::NIL));
    }

    #[test]
    fn strings_parse_and_print() {
        let mut number = variant::new_string(" 42 ");
        let mut fraction = variant::new_string("3.75");
        let mut garbage = variant::new_string("forty-two");
        assert_eq!(to_int(&number), 42);
        assert_eq!(to_int(&fraction), 3);
        assert_eq!(to_float(&fraction), 3.75);
        assert_eq!(to_int(&garbage), 0);
        assert_eq!(to_float(&garbage), 0.0);
        // SAFETY: The strings were just created.
        unsafe {
            variant::destroy(&mut number);
            variant::destroy(&mut fraction);
            variant::destroy(&mut garbage);
        }

        assert_eq!(to_text(&RawVariant::NIL), "<null>");
        assert_eq!(to_text(&int(-12)), "-12");
        assert_eq!(to_text(&float(1.5)), "1.5");
        assert_eq!(to_text(&float(1.0)), "1.0");
    }

    #[test]
    fn numbers_are_read_from_the_front_of_text() {
        let mut suffixed = variant::new_string("12abc");
        let mut signs = variant::new_string("-1-2");
        let mut huge = variant::new_string("99999999999999999999");
        let mut units = variant::new_string(" 2.5kg");
        assert_eq!(to_int(&suffixed), 12);
        assert_eq!(to_float(&suffixed), 12.0);
        assert_eq!(to_int(&signs), -12);
        assert_eq!(to_int(&huge), i64::MAX);
        assert_eq!(to_int(&units), 2);
        assert_eq!(to_float(&units), 2.5);
        // SAFETY: The strings were just created.
        unsafe {
            variant::destroy(&mut suffixed);
            variant::destroy(&mut signs);
            variant::destroy(&mut huge);
            variant::destroy(&mut units);
        }
    }

    #[test]
    fn colors_come_from_hex() {
        assert_eq!(to_color(&int(0xFF0000FF)), Color::new(1.0, 0.0, 0.0, 1.0));
        let mut html = variant::new_string("#00ff00");
        assert_eq!(to_color(&html), Color::new(0.0, 1.0, 0.0, 1.0));
        // SAFETY: The string was just created.
        unsafe { variant::destroy(&mut html) };
    }

    #[test]
    fn packed_arrays_convert_through_their_elements() {
        let live = live_handles();
        let mut source = packed::into_variant(packed::from_vec(vec![1i32, 2, 300]));
        let bytes: RawPackedArray<u8> = to_packed(&source);
        let floats: RawPackedArray<f64> = to_packed(&source);
        // SAFETY: All buffers are ours and freed at the end.
        unsafe {
            assert_eq!(packed::elements(&bytes), &[1, 2, 44]);
            assert_eq!(packed::elements(&floats), &[1.0, 2.0, 300.0]);
            packed::free(bytes);
            packed::free(floats);
            variant::destroy(&mut source);
        }
        assert_eq!(live_handles(), live);
    }
}
