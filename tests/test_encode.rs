//! Host values into Variants.

use core::ffi::c_void;

use variant_marshal::{
    builtin::{Array, Callable, Dictionary, GodotObject, NodePath, ObjectPtr, Signal, StringName},
    decode, encode, headless,
    math::{Basis, Color, Rect2I, Rid, Transform3D, Vector2I, Vector3},
    Payload, Variant, VariantType,
};

struct Node(ObjectPtr);

impl GodotObject for Node {
    fn object_ptr(&self) -> ObjectPtr {
        self.0
    }
}

fn object(address: usize) -> ObjectPtr {
    ObjectPtr(address as *mut c_void)
}

#[test]
fn inline_values_set_the_discriminant() {
    headless::install().unwrap();

    let variant = encode::create_from_vector3(Vector3::new(1.0, -2.0, 3.5));
    assert_eq!(variant.get_type(), VariantType::VECTOR3);
    assert!(matches!(variant.payload(), Payload::Vector3(v) if v == Vector3::new(1.0, -2.0, 3.5)));

    let variant = encode::create_from_rect2i(Rect2I::new(Vector2I::new(1, 2), Vector2I::new(3, 4)));
    assert_eq!(variant.get_type(), VariantType::RECT2I);

    let variant = encode::create_from_color(Color::new(0.5, 0.25, 1.0, 1.0));
    assert_eq!(variant.get_type(), VariantType::COLOR);

    assert_eq!(encode::create_from_rid(Rid(9)).get_type(), VariantType::RID);
    assert_eq!(encode::create_from_bool(false).get_type(), VariantType::BOOL);
}

#[test]
fn unsigned_integers_are_reinterpreted() {
    headless::install().unwrap();

    let variant = encode::create_from_uint(u64::MAX);
    assert!(matches!(variant.payload(), Payload::Int(-1)));
    assert_eq!(decode::convert_to_uint64(&variant), u64::MAX);
}

#[test]
fn boxed_values_are_owned_by_the_variant() {
    headless::install().unwrap();

    let live = headless::live_handles();
    let variant = encode::create_from_basis(Basis::IDENTITY);
    assert_eq!(variant.get_type(), VariantType::BASIS);
    assert_eq!(headless::live_handles(), live + 1);

    let copy = variant.clone();
    assert_eq!(headless::live_handles(), live + 2);
    drop(variant);
    assert_eq!(decode::convert_to_basis(&copy), Basis::IDENTITY);
    drop(copy);
    assert_eq!(headless::live_handles(), live);

    let transform = encode::create_from_transform3d(Transform3D::IDENTITY);
    assert_eq!(decode::convert_to_transform3d(&transform), Transform3D::IDENTITY);
}

#[test]
fn absent_string_is_an_empty_string() {
    headless::install().unwrap();

    let variant = encode::create_from_string(None);
    assert_eq!(variant.get_type(), VariantType::STRING);
    assert_eq!(decode::convert_to_string(&variant), "");

    let variant = encode::create_from_string(Some(""));
    assert_eq!(variant.get_type(), VariantType::STRING);
}

#[test]
fn absent_handles_are_nil() {
    headless::install().unwrap();

    assert!(encode::create_from_array(None).is_nil());
    assert!(encode::create_from_dictionary(None).is_nil());
    assert!(encode::create_from_string_name(None).is_nil());
    assert!(encode::create_from_node_path(None).is_nil());
    assert!(encode::create_from_object(None::<&Node>).is_nil());
    assert!(encode::create_from_object_ptr(ObjectPtr::NULL).is_nil());
    assert!(encode::create_from_system_array_of_rid(None).is_nil());
    assert!(encode::create_from_system_array_of_string_name(None).is_nil());
    assert!(Variant::from(None::<i64>).is_nil());
}

#[test]
fn copying_constructors_leave_the_source_alone() {
    headless::install().unwrap();

    let mut array = Array::new();
    array.push(&Variant::from(1i64));
    let variant = encode::create_from_array(Some(&array));
    array.push(&Variant::from(2i64));

    assert_eq!(array.len(), 2);
    assert_eq!(decode::convert_to_array(&variant).len(), 1);

    let mut dictionary = Dictionary::new();
    dictionary.insert(&"speed".into(), &Variant::from(3.5f64));
    let variant = encode::create_from_dictionary(Some(&dictionary));
    assert_eq!(variant.get_type(), VariantType::DICTIONARY);
    assert_eq!(dictionary.len(), 1);

    let name = StringName::new("ready");
    let variant = encode::create_from_string_name(Some(&name));
    assert_eq!(variant.get_type(), VariantType::STRING_NAME);
    assert_eq!(decode::convert_to_string_name(&variant), name);

    let path = NodePath::new("../Player");
    let variant = encode::create_from_node_path(Some(&path));
    assert_eq!(variant.get_type(), VariantType::NODE_PATH);
    assert_eq!(decode::convert_to_string(&variant), "../Player");
}

#[test]
fn objects_are_referenced() {
    headless::install().unwrap();

    let node = Node(object(0x1000));
    let variant = encode::create_from_object(Some(&node));
    assert_eq!(variant.get_type(), VariantType::OBJECT);
    assert_eq!(decode::convert_to_object_ptr(&variant), node.0);
}

#[test]
fn callables_and_signals_keep_target_and_name() {
    headless::install().unwrap();

    let callable = Callable::new(object(0x2000), "on_hit");
    let variant = encode::create_from_callable(&callable);
    assert_eq!(variant.get_type(), VariantType::CALLABLE);
    assert_eq!(decode::convert_to_callable(&variant), callable);

    let signal = Signal::new(object(0x3000), "died");
    let variant = encode::create_from_signal(&signal);
    assert_eq!(variant.get_type(), VariantType::SIGNAL);
    assert_eq!(decode::convert_to_signal(&variant), signal);
}

#[test]
fn system_arrays_become_arrays() {
    headless::install().unwrap();

    let variant = encode::create_from_system_array_of_rid(Some(&[][..]));
    assert_eq!(variant.get_type(), VariantType::ARRAY);
    assert_eq!(decode::convert_to_array(&variant).len(), 0);

    let rids = [Rid(4), Rid(8)];
    let variant = encode::create_from_system_array_of_rid(Some(&rids[..]));
    assert_eq!(decode::convert_to_system_array_of_rid(&variant), rids);

    let names = [StringName::new("a"), StringName::new("b")];
    let variant = encode::create_from_system_array_of_string_name(Some(&names[..]));
    assert_eq!(decode::convert_to_system_array_of_string_name(&variant), names);

    let paths = [NodePath::new("../Player"), NodePath::new("")];
    let variant = encode::create_from_system_array_of_node_path(Some(&paths[..]));
    assert_eq!(variant.get_type(), VariantType::ARRAY);
    assert_eq!(decode::convert_to_system_array_of_node_path(&variant), paths);
    assert!(encode::create_from_system_array_of_node_path(None).is_nil());

    let nodes = [Some(Node(object(0x10))), None];
    let variant = encode::create_from_system_array_of_object(Some(&nodes[..]));
    let array = decode::convert_to_array(&variant);
    assert_eq!(array.len(), 2);
    assert_eq!(array.get(0).map(|v| v.get_type()), Some(VariantType::OBJECT));
    assert!(array.get(1).is_some_and(|v| v.is_nil()));
}

#[test]
fn typed_collections_convert_every_element() {
    headless::install().unwrap();

    let vectors = [Vector2I::new(1, 2), Vector2I::new(3, 4)];
    let variant = encode::create_from_typed_array(Some(&vectors[..]));
    let array = decode::convert_to_array(&variant);
    assert_eq!(array.len(), 2);
    assert_eq!(array.get(1).map(|v| v.get_type()), Some(VariantType::VECTOR2I));
    assert!(encode::create_from_typed_array::<i64>(None).is_nil());

    let pairs = [("hp", 100i64), ("mp", 20), ("hp", 90)];
    let variant = encode::create_from_typed_dictionary(Some(&pairs[..]));
    assert_eq!(variant.get_type(), VariantType::DICTIONARY);
    let dictionary = decode::convert_to_dictionary(&variant);
    assert_eq!(dictionary.len(), 2);
    assert_eq!(dictionary.get(&"hp".into()).map(|v| v.to::<i64>()), Some(90));
    assert!(encode::create_from_typed_dictionary::<i64, i64>(None).is_nil());
}

#[test]
fn packed_slices_become_packed_arrays() {
    headless::install().unwrap();

    let live = headless::live_handles();
    let variant = encode::create_from_packed_int32_array(&[1, 2, 3]);
    assert_eq!(variant.get_type(), VariantType::PACKED_INT32_ARRAY);
    // Only the buffer the variant owns is still alive.
    assert_eq!(headless::live_handles(), live + 1);

    let variant = encode::create_from_packed_string_array(&["x".to_owned(), String::new()]);
    assert_eq!(variant.get_type(), VariantType::PACKED_STRING_ARRAY);
    assert_eq!(
        decode::convert_as_packed_string_array_to_system_array(&variant),
        ["x", ""]
    );

    let empty = encode::create_from_packed_color_array(&[]);
    assert_eq!(empty.get_type(), VariantType::PACKED_COLOR_ARRAY);
}

#[test]
fn from_impls_pick_the_matching_constructor() {
    headless::install().unwrap();

    assert_eq!(Variant::from(true).get_type(), VariantType::BOOL);
    assert_eq!(Variant::from(7u8).get_type(), VariantType::INT);
    assert_eq!(Variant::from(0.5f32).get_type(), VariantType::FLOAT);
    assert_eq!(Variant::from("text").get_type(), VariantType::STRING);
    assert_eq!(Variant::from(Vector2I::new(1, 1)).get_type(), VariantType::VECTOR2I);
    assert_eq!(Variant::from(&[1.0f64, 2.0][..]).get_type(), VariantType::PACKED_FLOAT64_ARRAY);
    assert_eq!(Variant::from(Array::new()).get_type(), VariantType::ARRAY);
}
