//! Strings, string names and node paths. All three are a boxed host string,
//! and the null pointer is the empty one.

use core::{ffi::c_void, ptr, slice};

use crate::sys::{RawNodePath, RawString, RawStringName};

/// Allocates a new text handle. The empty text is null and allocates nothing.
pub(super) fn new(text: &str) -> *mut c_void {
    if text.is_empty() {
        return ptr::null_mut();
    }
    super::handle_allocated();
    Box::into_raw(Box::new(text.to_owned())).cast()
}

/// Borrows the text behind a handle.
///
/// # Safety
///
/// The handle needs to be null or allocated by [`new`] and not yet freed.
pub(super) unsafe fn get<'a>(handle: *mut c_void) -> &'a str {
    if handle.is_null() {
        ""
    } else {
        &*handle.cast::<String>()
    }
}

/// # Safety
///
/// Same as [`get`].
pub(super) unsafe fn copy(handle: *mut c_void) -> *mut c_void {
    new(get(handle))
}

/// # Safety
///
/// Same as [`get`]. The handle must not be used afterwards.
pub(super) unsafe fn free(handle: *mut c_void) {
    if !handle.is_null() {
        drop(Box::from_raw(handle.cast::<String>()));
        super::handle_released();
    }
}

pub(super) unsafe extern "C" fn string_new_with_utf8_chars(
    dest: *mut RawString,
    chars: *const u8,
    len: i64,
) {
    let text = if chars.is_null() || len <= 0 {
        ptr::null_mut()
    } else {
        new(&String::from_utf8_lossy(slice::from_raw_parts(chars, len as usize)))
    };
    dest.write(RawString(text));
}

pub(super) unsafe extern "C" fn string_new_copy(dest: *mut RawString, src: *const RawString) {
    dest.write(RawString(copy((*src).0)));
}

pub(super) unsafe extern "C" fn string_destroy(string: *mut RawString) {
    free((*string).0);
    (*string).0 = ptr::null_mut();
}

pub(super) unsafe extern "C" fn string_get_utf8(
    string: *const RawString,
    buf_ptr: *mut u8,
    buf_len_ptr: *mut usize,
) -> bool {
    let text = get((*string).0);
    let capacity = *buf_len_ptr;
    *buf_len_ptr = text.len();
    if text.is_empty() {
        return true;
    }
    if buf_ptr.is_null() || capacity < text.len() {
        return false;
    }
    ptr::copy_nonoverlapping(text.as_ptr(), buf_ptr, text.len());
    true
}

macro_rules! text_handle {
    ($raw:ident: $new_from_string:ident, $new_copy:ident, $destroy:ident, $as_string:ident) => {
        pub(super) unsafe extern "C" fn $new_from_string(dest: *mut $raw, from: *const RawString) {
            dest.write($raw(copy((*from).0)));
        }

        pub(super) unsafe extern "C" fn $new_copy(dest: *mut $raw, src: *const $raw) {
            dest.write($raw(copy((*src).0)));
        }

        pub(super) unsafe extern "C" fn $destroy(handle: *mut $raw) {
            free((*handle).0);
            (*handle).0 = ptr::null_mut();
        }

        pub(super) unsafe extern "C" fn $as_string(dest: *mut RawString, handle: *const $raw) {
            dest.write(RawString(copy((*handle).0)));
        }
    };
}

text_handle!(RawStringName: string_name_new_from_string, string_name_new_copy, string_name_destroy, string_name_as_string);
text_handle!(RawNodePath: node_path_new_from_string, node_path_new_copy, node_path_destroy, node_path_as_string);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::live_handles;

    #[test]
    fn empty_text_is_null() {
        let live = live_handles();
        assert!(new("").is_null());
        assert_eq!(live_handles(), live);
        // SAFETY: Null is the empty text.
        assert_eq!(unsafe { get(ptr::null_mut()) }, "");
    }

    #[test]
    fn utf8_is_read_in_two_phases() {
        let mut string = RawString(ptr::null_mut());
        let text = "grüße";
        // SAFETY: All pointers are valid and the string is freed at the end.
        unsafe {
            string_new_with_utf8_chars(&mut string, text.as_ptr(), text.len() as i64);

            let mut len = 0;
            assert!(!string_get_utf8(&string, ptr::null_mut(), &mut len));
            assert_eq!(len, text.len());

            let mut buf = vec![0; len];
            assert!(string_get_utf8(&string, buf.as_mut_ptr(), &mut len));
            assert_eq!(buf, text.as_bytes());

            string_destroy(&mut string);
        }
        assert!(string.0.is_null());
    }
}
