//! Variants into host values.

use core::ffi::c_void;

use variant_marshal::{
    builtin::{Array, Callable, Dictionary, FromObjectPtr, GString, ObjectPtr, StringName},
    decode, encode, headless,
    math::{Basis, Color, Quaternion, Rid, Transform3D, Vector2, Vector2I, Vector3},
    Variant, VariantType,
};

const PLAYER: usize = 0x1000;
const ENEMY: usize = 0x2000;

/// Only knows the player and the enemy.
#[derive(Debug, PartialEq)]
struct Node(ObjectPtr);

impl FromObjectPtr for Node {
    fn from_object_ptr(ptr: ObjectPtr) -> Option<Self> {
        [PLAYER, ENEMY]
            .contains(&(ptr.0 as usize))
            .then_some(Node(ptr))
    }
}

fn object(address: usize) -> ObjectPtr {
    ObjectPtr(address as *mut c_void)
}

#[test]
fn matching_types_skip_coercion() {
    headless::install().unwrap();

    let float = encode::create_from_float(1.25);
    let int = encode::create_from_int(-9);
    let vector = encode::create_from_vector2(Vector2::new(0.5, 2.0));
    let coercions = headless::coercion_count();

    assert_eq!(decode::convert_to_float64(&float), 1.25);
    assert_eq!(decode::convert_to_float32(&float), 1.25);
    assert_eq!(decode::convert_to_int64(&int), -9);
    assert_eq!(decode::convert_to_vector2(&vector), Vector2::new(0.5, 2.0));
    assert_eq!(headless::coercion_count(), coercions);
}

#[test]
fn mismatched_types_coerce() {
    headless::install().unwrap();

    let coercions = headless::coercion_count();
    assert_eq!(decode::convert_to_int64(&encode::create_from_float(2.75)), 2);
    assert_eq!(headless::coercion_count(), coercions + 1);

    assert_eq!(decode::convert_to_float64(&encode::create_from_int(3)), 3.0);
    assert_eq!(decode::convert_to_string(&encode::create_from_int(42)), "42");
    assert_eq!(decode::convert_to_int32(&encode::create_from_string(Some("-17"))), -17);
    assert_eq!(decode::convert_to_int64(&encode::create_from_string(Some("12abc"))), 12);
    assert_eq!(decode::convert_to_string(&encode::create_from_float(1.0)), "1.0");
    assert!(decode::convert_to_bool(&encode::create_from_int(5)));
    assert_eq!(
        decode::convert_to_vector2i(&encode::create_from_vector2(Vector2::new(1.9, -1.9))),
        Vector2I::new(1, -1)
    );
    assert_eq!(
        decode::convert_to_basis(&encode::create_from_quaternion(Quaternion::IDENTITY)),
        Basis::IDENTITY
    );
    assert_eq!(
        decode::convert_to_transform3d(&encode::create_from_int(1)),
        Transform3D::IDENTITY
    );
    assert_eq!(
        decode::convert_to_color(&encode::create_from_string(Some("#ff0000"))),
        Color::new(1.0, 0.0, 0.0, 1.0)
    );
}

#[test]
fn integers_narrow_by_truncation() {
    headless::install().unwrap();

    assert_eq!(decode::convert_to_uint8(&encode::create_from_int(300)), 44);
    assert_eq!(decode::convert_to_int8(&encode::create_from_int(200)), -56);
    assert_eq!(decode::convert_to_uint16(&encode::create_from_int(-1)), u16::MAX);
    assert_eq!(decode::convert_to_uint32(&encode::create_from_int(1 << 32 | 5)), 5);
    assert_eq!(decode::convert_to_char(&encode::create_from_int(0x1F600)), 0xF600);
    assert_eq!(decode::convert_to_char(&encode::create_from_int('é' as i64)), 0xE9);
}

#[test]
fn nil_is_an_empty_string() {
    headless::install().unwrap();

    assert_eq!(decode::convert_to_string(&Variant::NIL), "");
    assert!(decode::convert_to_gstring(&Variant::NIL).is_empty());

    // The engine itself prints Nil as `<null>`.
    let mut array = Array::new();
    array.push(&Variant::NIL);
    assert_eq!(decode::convert_to_string(&encode::create_from_array(Some(&array))), "[<null>]");
}

#[test]
fn strings_are_copied_out() {
    headless::install().unwrap();

    let variant = encode::create_from_string(Some("héllo wörld"));
    assert_eq!(decode::convert_to_string(&variant), "héllo wörld");
    assert_eq!(decode::convert_to_gstring(&variant), GString::from("héllo wörld"));
    assert_eq!(variant.to::<String>(), "héllo wörld");
}

#[test]
fn decoded_arrays_are_independent() {
    headless::install().unwrap();

    let mut source = Array::new();
    source.push(&Variant::from(1i64));
    let variant = encode::create_from_array(Some(&source));

    let mut decoded = decode::convert_to_array(&variant);
    decoded.push(&Variant::from(2i64));

    assert_eq!(decoded.len(), 2);
    assert_eq!(decode::convert_to_array(&variant).len(), 1);
    assert_eq!(source.len(), 1);
}

#[test]
fn dictionaries_keep_their_entries() {
    headless::install().unwrap();

    let mut dictionary = Dictionary::new();
    dictionary.insert(&"hp".into(), &Variant::from(100i64));
    dictionary.insert(&Variant::from(3i64), &"three".into());
    dictionary.insert(&"hp".into(), &Variant::from(90i64));
    let variant = encode::create_from_dictionary(Some(&dictionary));

    let decoded = decode::convert_to_dictionary(&variant);
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded.get(&"hp".into()).map(|v| v.to::<i64>()), Some(90));
    assert_eq!(
        decoded.get(&Variant::from(3i64)).map(|v| v.to::<String>()),
        Some("three".to_owned())
    );
    assert!(decoded.get(&Variant::from(3.0f64)).is_none());

    let keys: Vec<String> = decoded.keys().iter().map(|k| k.to()).collect();
    assert_eq!(keys, ["hp", "3"]);

    assert_eq!(decode::convert_to_dictionary(&Variant::from(1i64)).len(), 0);
}

#[test]
fn names_and_paths_come_from_strings() {
    headless::install().unwrap();

    let idle = encode::create_from_string(Some("idle"));
    assert_eq!(decode::convert_to_string_name(&idle), StringName::new("idle"));
    assert_eq!(decode::convert_to_node_path(&idle).to_string(), "idle");

    let number = encode::create_from_int(1);
    assert_eq!(decode::convert_to_string_name(&number), StringName::new(""));
    assert!(decode::convert_to_node_path(&number).is_empty());
}

#[test]
fn callables_always_go_through_the_engine() {
    headless::install().unwrap();

    let callable = Callable::new(object(PLAYER), "jump");
    let variant = encode::create_from_callable(&callable);
    let coercions = headless::coercion_count();
    assert_eq!(decode::convert_to_callable(&variant), callable);
    assert_eq!(headless::coercion_count(), coercions + 1);

    let null = decode::convert_to_callable(&encode::create_from_int(1));
    assert!(null.is_null());
    assert!(decode::convert_to_signal(&Variant::NIL).is_null());
}

#[test]
fn objects_are_looked_up() {
    headless::install().unwrap();

    let player = encode::create_from_object_ptr(object(PLAYER));
    assert_eq!(decode::convert_to_object_ptr(&player), object(PLAYER));
    assert_eq!(decode::convert_to_object::<Node>(&player), Some(Node(object(PLAYER))));

    let stranger = encode::create_from_object_ptr(object(0x3000));
    assert_eq!(decode::convert_to_object::<Node>(&stranger), None);

    let not_an_object = encode::create_from_int(PLAYER as i64);
    assert!(decode::convert_to_object_ptr(&not_an_object).is_null());
    assert_eq!(decode::convert_to_object::<Node>(&not_an_object), None);
}

#[test]
fn sequences_decode_every_element() {
    headless::install().unwrap();

    let mut array = Array::new();
    array.push(&encode::create_from_object_ptr(object(ENEMY)));
    array.push(&Variant::NIL);
    array.push(&encode::create_from_object_ptr(object(0x3000)));
    let variant = encode::create_from_array(Some(&array));
    assert_eq!(
        decode::convert_to_system_array_of_object::<Node>(&variant),
        [Some(Node(object(ENEMY))), None, None]
    );

    let mut array = Array::new();
    array.push(&encode::create_from_rid(Rid(3)));
    array.push(&encode::create_from_int(4));
    let variant = encode::create_from_array(Some(&array));
    assert_eq!(decode::convert_to_system_array_of_rid(&variant), [Rid(3), Rid(0)]);

    let mut array = Array::new();
    array.push(&"../Camera".into());
    let variant = encode::create_from_array(Some(&array));
    let paths = decode::convert_to_system_array_of_node_path(&variant);
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].to_string(), "../Camera");

    assert!(decode::convert_to_system_array_of_string_name(&Variant::NIL).is_empty());
}

#[test]
fn typed_collections_decode_every_element() {
    headless::install().unwrap();

    let mut array = Array::new();
    array.push(&Variant::from(1i64));
    array.push(&"2".into());
    array.push(&Variant::from(3.5f64));
    let variant = encode::create_from_array(Some(&array));
    assert_eq!(decode::convert_to_typed_array::<i64>(&variant), [1, 2, 3]);
    assert_eq!(decode::convert_to_typed_array::<String>(&variant), ["1", "2", "3.5"]);
    assert!(decode::convert_to_typed_array::<i64>(&Variant::NIL).is_empty());

    let mut dictionary = Dictionary::new();
    dictionary.insert(&"speed".into(), &Variant::from(2i64));
    dictionary.insert(&"jump".into(), &Variant::from(0.5f64));
    let variant = encode::create_from_dictionary(Some(&dictionary));
    assert_eq!(
        decode::convert_to_typed_dictionary::<String, f64>(&variant),
        [("speed".to_owned(), 2.0), ("jump".to_owned(), 0.5)]
    );
    assert!(decode::convert_to_typed_dictionary::<String, i64>(&Variant::NIL).is_empty());
}

#[test]
fn packed_arrays_decode_to_vectors() {
    headless::install().unwrap();

    let bytes = encode::create_from_packed_byte_array(b"abc");
    assert_eq!(decode::convert_as_packed_byte_array_to_system_array(&bytes), b"abc");

    let vectors = [Vector3::new(1.0, 2.0, 3.0), Vector3::ZERO];
    let variant = encode::create_from_packed_vector3_array(&vectors);
    assert_eq!(decode::convert_as_packed_vector3_array_to_system_array(&variant), vectors);
    assert_eq!(variant.to::<Vec<Vector3>>(), vectors);

    // Arrays coerce element by element.
    let mut array = Array::new();
    array.push(&Variant::from(1i64));
    array.push(&Variant::from(2.5f64));
    array.push(&"3".into());
    let variant = encode::create_from_array(Some(&array));
    assert_eq!(decode::convert_as_packed_int64_array_to_system_array(&variant), [1, 2, 3]);

    assert!(decode::convert_as_packed_float32_array_to_system_array(&Variant::NIL).is_empty());
}

#[test]
fn to_uses_the_matching_conversion() {
    headless::install().unwrap();

    let variant = Variant::from(Vector2I::new(3, 4));
    assert_eq!(variant.to::<Vector2I>(), Vector2I::new(3, 4));
    assert_eq!(variant.to::<Vector2>(), Vector2::new(3.0, 4.0));
    assert_eq!(Variant::from(true).to::<i64>(), 1);
    assert_eq!(Variant::from(7i64).get_type(), VariantType::INT);
    assert_eq!(Variant::from(7i64).to::<Variant>().to::<u8>(), 7);
}
