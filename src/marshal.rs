//! Conversions between host values and the engine's native handles.
//!
//! These sit one layer below [`encode`](crate::encode) and
//! [`decode`](crate::decode): they produce or consume the handles that end up
//! inside a Variant, but never touch a Variant themselves.

use core::ptr;

use bytemuck::Zeroable;

use crate::{
    builtin::{
        Array, Callable, GString, NativeCallable, NativeSignal, PackedArray, PackedArrayElement,
        Signal, StringName,
    },
    sys::{self, ObjectPtr, RawCallable, RawSignal, RawString, RawStringName},
    Variant,
};

/// Creates a native string. [`None`] becomes the empty string, which doesn't
/// call into the engine.
pub fn convert_string_to_native(from: Option<&str>) -> GString {
    let from = match from {
        Some(from) if !from.is_empty() => from,
        _ => return GString::new(),
    };
    let mut raw = RawString(ptr::null_mut());
    // SAFETY: We provide a valid pointer and length to text that is UTF-8
    // encoded. We own the new string.
    unsafe {
        (sys::interface().string_new_with_utf8_chars)(&mut raw, from.as_ptr(), from.len() as i64);
        GString::from_raw(raw)
    }
}

/// Copies a native string into a host string. The native string stays owned
/// by the caller.
pub fn convert_string_to_managed(from: &RawString) -> String {
    if from.0.is_null() {
        return String::new();
    }
    let get_utf8 = sys::interface().string_get_utf8;

    // SAFETY: The handle is valid. We provide a null pointer and 0 as the
    // length to query the length of the string. Then we allocate a buffer of
    // that length and call the function again with it. If that doesn't
    // succeed, nothing got written and we don't touch the buffer.
    unsafe {
        let mut len = 0;
        get_utf8(from, ptr::null_mut(), &mut len);
        if len == 0 {
            return String::new();
        }
        let mut buf = Vec::with_capacity(len);
        if !get_utf8(from, buf.as_mut_ptr(), &mut len) {
            tracing::warn!(len, "native string changed its length while being read");
            return String::new();
        }
        buf.set_len(len);
        String::from_utf8(buf)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
    }
}

/// Creates the engine's representation of a callable.
pub fn convert_callable_to_native(from: &Callable) -> NativeCallable {
    let mut raw = RawCallable::zeroed();
    // SAFETY: The method name is valid and stays owned by the callable. We own
    // the new native callable.
    unsafe {
        (sys::interface().callable_new)(&mut raw, from.target, from.method.as_raw());
        NativeCallable::from_raw(raw)
    }
}

/// Reads a native callable into a host callable. The native callable stays
/// owned by the caller.
pub fn convert_callable_to_managed(from: &NativeCallable) -> Callable {
    let mut target = ObjectPtr::NULL;
    let mut method = RawStringName(ptr::null_mut());
    // SAFETY: The handle is valid. We own the copied method name.
    unsafe {
        (sys::interface().callable_get_data)(from.as_raw(), &mut target, &mut method);
        Callable {
            target,
            method: StringName::from_raw(method),
        }
    }
}

/// Creates the engine's representation of a signal.
pub fn convert_signal_to_native(from: &Signal) -> NativeSignal {
    let mut raw = RawSignal::zeroed();
    // SAFETY: The signal name is valid and stays owned by the signal. We own
    // the new native signal.
    unsafe {
        (sys::interface().signal_new)(&mut raw, from.owner, from.name.as_raw());
        NativeSignal::from_raw(raw)
    }
}

/// Reads a native signal into a host signal. The native signal stays owned by
/// the caller.
pub fn convert_signal_to_managed(from: &NativeSignal) -> Signal {
    let mut owner = ObjectPtr::NULL;
    let mut name = RawStringName(ptr::null_mut());
    // SAFETY: The handle is valid. We own the copied signal name.
    unsafe {
        (sys::interface().signal_get_data)(from.as_raw(), &mut owner, &mut name);
        Signal {
            owner,
            name: StringName::from_raw(name),
        }
    }
}

/// Creates a native packed array holding copies of the values.
#[inline]
pub fn convert_slice_to_native_packed_array<T: PackedArrayElement>(from: &[T]) -> PackedArray<T> {
    PackedArray::from_slice(from)
}

/// Copies a native packed array into a host vector.
#[inline]
pub fn convert_native_packed_array_to_vec<T: PackedArrayElement>(from: &PackedArray<T>) -> Vec<T> {
    from.to_vec()
}

/// Creates a native array from a sequence, converting every element with
/// `to_variant`. The array holds copies, so the temporary Variants are
/// released as soon as they are pushed.
pub fn convert_slice_to_native_array<T>(
    from: &[T],
    mut to_variant: impl FnMut(&T) -> Variant,
) -> Array {
    let mut array = Array::new();
    for element in from {
        array.push(&to_variant(element));
    }
    array
}

/// Converts every element of a native array with `from_variant`. The array
/// stays owned by the caller.
pub fn convert_native_array_to_vec<T>(
    from: &Array,
    mut from_variant: impl FnMut(&Variant) -> T,
) -> Vec<T> {
    from.iter().map(|element| from_variant(&element)).collect()
}
