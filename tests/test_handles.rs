//! Ownership of native handles and loading the function table.

use variant_marshal::{
    builtin::{
        Array, Callable, Dictionary, GString, NativeCallable, NativeSignal, PackedArray, Signal,
        StringName,
    },
    decode, encode, headless,
    math::{Color, Rid},
    sys::{self, Interface, InterfaceError, INTERFACE_VERSION},
    Variant,
};

#[test]
fn installing_twice_is_fine() {
    headless::install().unwrap();
    headless::install().unwrap();
    assert!(sys::is_loaded());
}

#[test]
fn other_versions_are_rejected() {
    let table: &'static Interface = Box::leak(Box::new(Interface {
        version: 99,
        ..*headless::interface()
    }));
    assert_eq!(
        sys::load(table),
        Err(InterfaceError::VersionMismatch {
            expected: INTERFACE_VERSION,
            found: 99,
        })
    );
}

#[test]
fn a_loaded_table_cant_be_replaced() {
    headless::install().unwrap();

    let table: &'static Interface = Box::leak(Box::new(*headless::interface()));
    assert_eq!(sys::load(table), Err(InterfaceError::AlreadyLoaded));
}

#[test]
fn packed_decoding_releases_the_temporary() {
    headless::install().unwrap();

    let variant = encode::create_from_packed_string_array(&["a".to_owned(), "b".to_owned()]);
    let colors = encode::create_from_packed_color_array(&[Color::BLACK; 3]);
    let live = headless::live_handles();

    assert_eq!(decode::convert_as_packed_string_array_to_system_array(&variant), ["a", "b"]);
    assert_eq!(decode::convert_as_packed_color_array_to_system_array(&colors).len(), 3);
    assert_eq!(decode::convert_as_packed_int32_array_to_system_array(&variant), [0, 0]);
    assert_eq!(headless::live_handles(), live);
}

#[test]
fn sequence_decoding_releases_the_temporary() {
    headless::install().unwrap();

    let names = [StringName::new("x"), StringName::new("y")];
    let variant = encode::create_from_system_array_of_string_name(Some(&names[..]));
    let rids = encode::create_from_system_array_of_rid(Some(&[Rid(1), Rid(2)][..]));
    let live = headless::live_handles();

    let decoded = decode::convert_to_system_array_of_string_name(&variant);
    // The decoded names are the only new handles.
    assert_eq!(headless::live_handles(), live + 2);
    drop(decoded);
    assert_eq!(decode::convert_to_system_array_of_rid(&rids), [Rid(1), Rid(2)]);
    assert_eq!(headless::live_handles(), live);
}

#[test]
fn string_coercion_releases_the_temporary() {
    headless::install().unwrap();

    let array = encode::create_from_array(Some(&Array::new()));
    let float = encode::create_from_float(0.5);
    let live = headless::live_handles();

    assert_eq!(decode::convert_to_string(&array), "[]");
    assert_eq!(decode::convert_to_string(&float), "0.5");
    assert_eq!(headless::live_handles(), live);
}

#[test]
fn encoding_releases_temporaries() {
    headless::install().unwrap();

    let live = headless::live_handles();
    let variant = encode::create_from_system_array_of_rid(Some(&[Rid(1)][..]));
    // Only the array the variant owns is still alive.
    assert_eq!(headless::live_handles(), live + 1);
    drop(variant);

    let variant = encode::create_from_string(Some("name"));
    assert_eq!(headless::live_handles(), live + 1);
    drop(variant);
    assert_eq!(headless::live_handles(), live);
}

#[test]
fn taking_ownership_moves_the_handle() {
    headless::install().unwrap();

    let live = headless::live_handles();
    let string = GString::from("moved");
    assert_eq!(headless::live_handles(), live + 1);
    let variant = encode::create_from_string_taking_ownership(string);
    assert_eq!(headless::live_handles(), live + 1);
    assert_eq!(decode::convert_to_string(&variant), "moved");
    drop(variant);
    assert_eq!(headless::live_handles(), live);

    let callable = NativeCallable::new(&Callable::new(sys::ObjectPtr::NULL, "method"));
    let variant = encode::create_from_callable_taking_ownership(callable);
    assert_eq!(decode::convert_to_callable(&variant).method, StringName::new("method"));
    drop(variant);
    assert_eq!(headless::live_handles(), live);
}

#[test]
fn taking_ownership_of_a_signal_moves_the_handle() {
    headless::install().unwrap();

    let live = headless::live_handles();
    let signal = NativeSignal::new(&Signal::new(sys::ObjectPtr::NULL, "died"));
    assert_eq!(headless::live_handles(), live + 1);
    let variant = encode::create_from_signal_taking_ownership(signal);
    assert_eq!(headless::live_handles(), live + 1);
    assert_eq!(decode::convert_to_signal(&variant).name, StringName::new("died"));
    drop(variant);
    assert_eq!(headless::live_handles(), live);
}

#[test]
fn native_callables_and_signals_go_to_the_caller() {
    headless::install().unwrap();

    let target = sys::ObjectPtr(0x5000 as *mut _);
    let callable = encode::create_from_callable(&Callable::new(target, "fire"));
    let signal = encode::create_from_signal(&Signal::new(target, "fired"));
    let live = headless::live_handles();

    let raw = decode::convert_to_native_callable(&callable);
    assert_eq!(raw.object, target);
    assert_eq!(headless::live_handles(), live + 1);
    // SAFETY: We own the handle that was just returned.
    let native = unsafe { NativeCallable::from_raw(raw) };
    assert_eq!(native.to_callable().method, StringName::new("fire"));
    drop(native);

    let raw = decode::convert_to_native_signal(&signal);
    assert_eq!(raw.owner, target);
    assert_eq!(headless::live_handles(), live + 1);
    // SAFETY: We own the handle that was just returned.
    let native = unsafe { NativeSignal::from_raw(raw) };
    assert_eq!(native.to_signal().name, StringName::new("fired"));
    drop(native);

    assert_eq!(headless::live_handles(), live);
}

#[test]
fn native_handles_are_handed_to_the_caller() {
    headless::install().unwrap();

    let variant = encode::create_from_string(Some("owned"));
    let live = headless::live_handles();
    let raw = decode::convert_to_native_string_name(&variant);
    assert_eq!(headless::live_handles(), live + 1);

    // SAFETY: We own the handle that was just returned.
    let name = unsafe { StringName::from_raw(raw) };
    assert_eq!(name.to_string(), "owned");
    drop(name);
    assert_eq!(headless::live_handles(), live);
}

#[test]
fn object_references_go_through_the_engine() {
    headless::install().unwrap();

    let live = headless::live_handles();
    let variant = encode::create_from_object_ptr(sys::ObjectPtr(0x4000 as *mut _));
    assert_eq!(headless::live_handles(), live + 1);

    let copy = variant.clone();
    assert_eq!(headless::live_handles(), live + 2);
    drop(variant);
    assert_eq!(decode::convert_to_object_ptr(&copy).0 as usize, 0x4000);
    drop(copy);
    assert_eq!(headless::live_handles(), live);

    assert!(encode::create_from_object_ptr(sys::ObjectPtr::NULL).is_nil());
    assert_eq!(headless::live_handles(), live);
}

#[test]
fn clones_are_deep() {
    headless::install().unwrap();

    let mut dictionary = Dictionary::new();
    dictionary.insert(&"list".into(), &encode::create_from_array(Some(&Array::new())));
    let variant = encode::create_from_dictionary(Some(&dictionary));
    let copy = variant.clone();
    drop(variant);

    let decoded = decode::convert_to_dictionary(&copy);
    let list = decoded.get(&"list".into()).map(|v| v.to::<Array>());
    assert_eq!(list.map(|l| l.len()), Some(0));
}

#[test]
fn packed_guards_release_on_drop() {
    headless::install().unwrap();

    let live = headless::live_handles();
    let packed = PackedArray::<f64>::from_slice(&[1.0, 2.0]);
    let copy = packed.clone();
    assert_eq!(headless::live_handles(), live + 2);
    assert_eq!(copy.to_vec(), [1.0, 2.0]);
    drop((packed, copy));
    assert_eq!(headless::live_handles(), live);

    assert!(PackedArray::<u8>::new().is_empty());
    assert!(Variant::from(&PackedArray::<u8>::new()).to::<Vec<u8>>().is_empty());
}
