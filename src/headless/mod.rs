//! A native backend written in Rust.
//!
//! It implements the whole function table without a running engine, which is
//! what tests and offline tools marshal against. Strings, names and paths are
//! boxed host strings (null is empty), containers are boxed vectors of raw
//! Variants, and copies are deep, so no two handles ever share storage.
//!
//! Every thread counts its own coercion calls and live handles, so a test can
//! check that a conversion neither coerced nor leaked. Each Object variant
//! counts as one live handle for the reference it holds.
//!
//! ```
//! use variant_marshal::{decode, encode, headless};
//!
//! headless::install().unwrap();
//! let variant = encode::create_from_string(Some("42"));
//! assert_eq!(decode::convert_to_int64(&variant), 42);
//! ```

use core::cell::Cell;

use crate::{
    math::{Color, Vector2, Vector3, Vector4},
    sys::{self, Interface, InterfaceError, RawString, INTERFACE_VERSION},
};

mod coerce;
mod containers;
mod packed;
mod text;
mod variant;

thread_local! {
    static COERCIONS: Cell<usize> = const { Cell::new(0) };
    static LIVE_HANDLES: Cell<isize> = const { Cell::new(0) };
}

fn count_coercion() {
    COERCIONS.with(|c| c.set(c.get() + 1));
}

fn handle_allocated() {
    LIVE_HANDLES.with(|c| c.set(c.get() + 1));
}

fn handle_released() {
    LIVE_HANDLES.with(|c| c.set(c.get() - 1));
}

/// Returns how many `variant_as_*` entries this thread has called so far.
pub fn coercion_count() -> usize {
    COERCIONS.with(Cell::get)
}

/// Returns how many handles this thread has allocated and not yet released.
/// Handles released on another thread than the one that allocated them are
/// counted on the releasing thread.
pub fn live_handles() -> isize {
    LIVE_HANDLES.with(Cell::get)
}

/// The function table of the headless backend.
pub static INTERFACE: Interface = Interface {
    version: INTERFACE_VERSION,

    variant_new_copy: variant::variant_new_copy,
    variant_destroy: variant::variant_destroy,

    variant_new_transform2d: variant::variant_new_transform2d,
    variant_new_basis: variant::variant_new_basis,
    variant_new_transform3d: variant::variant_new_transform3d,
    variant_new_projection: variant::variant_new_projection,
    variant_new_aabb: variant::variant_new_aabb,
    variant_new_string_name: variant::variant_new_string_name,
    variant_new_node_path: variant::variant_new_node_path,
    variant_new_object: variant::variant_new_object,
    variant_new_array: variant::variant_new_array,
    variant_new_dictionary: variant::variant_new_dictionary,

    variant_as_bool: coerce::variant_as_bool,
    variant_as_int: coerce::variant_as_int,
    variant_as_float: coerce::variant_as_float,
    variant_as_vector2: coerce::variant_as_vector2,
    variant_as_vector2i: coerce::variant_as_vector2i,
    variant_as_rect2: coerce::variant_as_rect2,
    variant_as_rect2i: coerce::variant_as_rect2i,
    variant_as_vector3: coerce::variant_as_vector3,
    variant_as_vector3i: coerce::variant_as_vector3i,
    variant_as_transform2d: coerce::variant_as_transform2d,
    variant_as_vector4: coerce::variant_as_vector4,
    variant_as_vector4i: coerce::variant_as_vector4i,
    variant_as_plane: coerce::variant_as_plane,
    variant_as_quaternion: coerce::variant_as_quaternion,
    variant_as_aabb: coerce::variant_as_aabb,
    variant_as_basis: coerce::variant_as_basis,
    variant_as_transform3d: coerce::variant_as_transform3d,
    variant_as_projection: coerce::variant_as_projection,
    variant_as_color: coerce::variant_as_color,
    variant_as_rid: coerce::variant_as_rid,
    variant_as_string: coerce::variant_as_string,
    variant_as_string_name: coerce::variant_as_string_name,
    variant_as_node_path: coerce::variant_as_node_path,
    variant_as_callable: coerce::variant_as_callable,
    variant_as_signal: coerce::variant_as_signal,
    variant_as_array: coerce::variant_as_array,
    variant_as_dictionary: coerce::variant_as_dictionary,

    string_new_with_utf8_chars: text::string_new_with_utf8_chars,
    string_new_copy: text::string_new_copy,
    string_destroy: text::string_destroy,
    string_get_utf8: text::string_get_utf8,

    string_name_new_from_string: text::string_name_new_from_string,
    string_name_new_copy: text::string_name_new_copy,
    string_name_destroy: text::string_name_destroy,
    string_name_as_string: text::string_name_as_string,

    node_path_new_from_string: text::node_path_new_from_string,
    node_path_new_copy: text::node_path_new_copy,
    node_path_destroy: text::node_path_destroy,
    node_path_as_string: text::node_path_as_string,

    array_new: containers::array_new,
    array_new_copy: containers::array_new_copy,
    array_destroy: containers::array_destroy,
    array_size: containers::array_size,
    array_get: containers::array_get,
    array_push_back: containers::array_push_back,

    dictionary_new: containers::dictionary_new,
    dictionary_new_copy: containers::dictionary_new_copy,
    dictionary_destroy: containers::dictionary_destroy,
    dictionary_size: containers::dictionary_size,
    dictionary_set: containers::dictionary_set,
    dictionary_get: containers::dictionary_get,
    dictionary_keys: containers::dictionary_keys,

    callable_new: containers::callable_new,
    callable_get_data: containers::callable_get_data,
    callable_destroy: containers::callable_destroy,

    signal_new: containers::signal_new,
    signal_get_data: containers::signal_get_data,
    signal_destroy: containers::signal_destroy,

    packed_byte_array: packed::interface::<u8>(),
    packed_int32_array: packed::interface::<i32>(),
    packed_int64_array: packed::interface::<i64>(),
    packed_float32_array: packed::interface::<f32>(),
    packed_float64_array: packed::interface::<f64>(),
    packed_string_array: packed::interface::<RawString>(),
    packed_vector2_array: packed::interface::<Vector2>(),
    packed_vector3_array: packed::interface::<Vector3>(),
    packed_vector4_array: packed::interface::<Vector4>(),
    packed_color_array: packed::interface::<Color>(),
};

/// Returns the function table of the headless backend.
#[inline]
pub fn interface() -> &'static Interface {
    &INTERFACE
}

/// Loads the headless backend as the native interface. Installing it again is
/// a no-op, but it can't replace a different backend that is already loaded.
pub fn install() -> Result<(), InterfaceError> {
    let fresh = !sys::is_loaded();
    sys::load(&INTERFACE)?;
    if fresh {
        tracing::debug!("headless backend installed");
    }
    Ok(())
}
