use core::{fmt, mem::ManuallyDrop};

use crate::sys;

use super::GString;

/// A built-in type for unique strings. The engine interns them, so comparing
/// two of them on the engine side is cheap.
///
/// [`StringName`](https://docs.godotengine.org/en/4.2/classes/class_stringname.html)
#[repr(transparent)]
pub struct StringName(sys::RawStringName);

impl StringName {
    /// Creates a string name with the given text.
    pub fn new(text: &str) -> Self {
        let string = GString::from(text);
        let mut raw = sys::RawStringName(core::ptr::null_mut());
        // SAFETY: The string handle is valid and stays owned by us. We own the
        // new string name.
        unsafe { (sys::interface().string_name_new_from_string)(&mut raw, string.as_raw()) };
        Self(raw)
    }

    /// Takes ownership of a native string name.
    ///
    /// # Safety
    ///
    /// The handle needs to be valid and must not be released by anyone else
    /// afterwards.
    #[inline]
    pub const unsafe fn from_raw(raw: sys::RawStringName) -> Self {
        Self(raw)
    }

    /// Gives up ownership of the native string name. You are responsible for
    /// freeing it.
    #[inline]
    pub fn into_raw(self) -> sys::RawStringName {
        ManuallyDrop::new(self).0
    }

    /// Returns the native string name, still owned by `self`.
    #[inline]
    pub fn as_raw(&self) -> &sys::RawStringName {
        &self.0
    }

    /// Returns the text of the name as an engine string.
    pub fn to_gstring(&self) -> GString {
        let mut raw = sys::RawString(core::ptr::null_mut());
        // SAFETY: The handle is valid. We own the returned string.
        unsafe {
            (sys::interface().string_name_as_string)(&mut raw, &self.0);
            GString::from_raw(raw)
        }
    }
}

impl From<&str> for StringName {
    #[inline]
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl Clone for StringName {
    #[inline]
    fn clone(&self) -> Self {
        let mut raw = sys::RawStringName(core::ptr::null_mut());
        // SAFETY: The handle is valid, so we can safely copy it.
        unsafe { (sys::interface().string_name_new_copy)(&mut raw, &self.0) };
        Self(raw)
    }
}

impl Drop for StringName {
    #[inline]
    fn drop(&mut self) {
        // SAFETY: The handle is valid and we own it, so it's our responsibility
        // to free it.
        unsafe { (sys::interface().string_name_destroy)(&mut self.0) }
    }
}

impl fmt::Display for StringName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_gstring(), f)
    }
}

impl fmt::Debug for StringName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "&{:?}", self.to_gstring())
    }
}

impl PartialEq for StringName {
    fn eq(&self, other: &Self) -> bool {
        self.to_gstring() == other.to_gstring()
    }
}

impl Eq for StringName {}
