use core::{fmt, mem::ManuallyDrop};

use crate::{marshal, sys};

/// A string owned by the engine.
///
/// The host side equivalent is a Rust [`String`]. This type only exists so the
/// native handle has an owner that releases it.
///
/// [`String`](https://docs.godotengine.org/en/4.2/classes/class_string.html)
#[repr(transparent)]
pub struct GString(sys::RawString);

impl GString {
    /// Creates the empty string. This doesn't call into the engine.
    #[inline]
    pub const fn new() -> Self {
        Self(sys::RawString(core::ptr::null_mut()))
    }

    /// Takes ownership of a native string.
    ///
    /// # Safety
    ///
    /// The handle needs to be valid and must not be released by anyone else
    /// afterwards.
    #[inline]
    pub const unsafe fn from_raw(raw: sys::RawString) -> Self {
        Self(raw)
    }

    /// Gives up ownership of the native string. You are responsible for
    /// freeing it.
    #[inline]
    pub fn into_raw(self) -> sys::RawString {
        ManuallyDrop::new(self).0
    }

    /// Returns the native string, still owned by `self`.
    #[inline]
    pub fn as_raw(&self) -> &sys::RawString {
        &self.0
    }

    /// Returns [`true`] if the string has a length of 0.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the length of the string in UTF-8 bytes.
    #[inline]
    pub fn len(&self) -> usize {
        if self.0 .0.is_null() {
            return 0;
        }
        let mut len = 0;
        // SAFETY: The handle is valid. A null buffer with a length of 0 only
        // queries the length.
        unsafe { (sys::interface().string_get_utf8)(&self.0, core::ptr::null_mut(), &mut len) };
        len
    }
}

impl Default for GString {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for GString {
    #[inline]
    fn from(value: &str) -> Self {
        marshal::convert_string_to_native(Some(value))
    }
}

impl Clone for GString {
    #[inline]
    fn clone(&self) -> Self {
        let mut raw = sys::RawString(core::ptr::null_mut());
        // SAFETY: The handle is valid, so we can safely copy it. We own the
        // copy.
        unsafe { (sys::interface().string_new_copy)(&mut raw, &self.0) };
        Self(raw)
    }
}

impl Drop for GString {
    #[inline]
    fn drop(&mut self) {
        if !self.0 .0.is_null() {
            // SAFETY: The handle is valid and we own it, so it's our
            // responsibility to free it.
            unsafe { (sys::interface().string_destroy)(&mut self.0) }
        }
    }
}

impl fmt::Display for GString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&marshal::convert_string_to_managed(&self.0))
    }
}

impl fmt::Debug for GString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&marshal::convert_string_to_managed(&self.0), f)
    }
}

impl PartialEq for GString {
    fn eq(&self, other: &Self) -> bool {
        marshal::convert_string_to_managed(&self.0) == marshal::convert_string_to_managed(&other.0)
    }
}

impl Eq for GString {}
