use core::{fmt, mem::ManuallyDrop};

use crate::sys;

use super::GString;

/// A pre-parsed path to a node or a property, like `"Player/Sprite:texture"`.
///
/// [`NodePath`](https://docs.godotengine.org/en/4.2/classes/class_nodepath.html)
#[repr(transparent)]
pub struct NodePath(sys::RawNodePath);

impl NodePath {
    /// Parses a node path.
    pub fn new(path: &str) -> Self {
        let string = GString::from(path);
        let mut raw = sys::RawNodePath(core::ptr::null_mut());
        // SAFETY: The string handle is valid and stays owned by us. We own the
        // new node path.
        unsafe { (sys::interface().node_path_new_from_string)(&mut raw, string.as_raw()) };
        Self(raw)
    }

    /// Takes ownership of a native node path.
    ///
    /// # Safety
    ///
    /// The handle needs to be valid and must not be released by anyone else
    /// afterwards.
    #[inline]
    pub const unsafe fn from_raw(raw: sys::RawNodePath) -> Self {
        Self(raw)
    }

    /// Gives up ownership of the native node path. You are responsible for
    /// freeing it.
    #[inline]
    pub fn into_raw(self) -> sys::RawNodePath {
        ManuallyDrop::new(self).0
    }

    /// Returns the native node path, still owned by `self`.
    #[inline]
    pub fn as_raw(&self) -> &sys::RawNodePath {
        &self.0
    }

    /// Returns [`true`] if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.to_gstring().is_empty()
    }

    /// Returns the path as an engine string.
    pub fn to_gstring(&self) -> GString {
        let mut raw = sys::RawString(core::ptr::null_mut());
        // SAFETY: The handle is valid. We own the returned string.
        unsafe {
            (sys::interface().node_path_as_string)(&mut raw, &self.0);
            GString::from_raw(raw)
        }
    }
}

impl From<&str> for NodePath {
    #[inline]
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl Clone for NodePath {
    #[inline]
    fn clone(&self) -> Self {
        let mut raw = sys::RawNodePath(core::ptr::null_mut());
        // SAFETY: The handle is valid, so we can safely copy it.
        unsafe { (sys::interface().node_path_new_copy)(&mut raw, &self.0) };
        Self(raw)
    }
}

impl Drop for NodePath {
    #[inline]
    fn drop(&mut self) {
        // SAFETY: The handle is valid and we own it, so it's our responsibility
        // to free it.
        unsafe { (sys::interface().node_path_destroy)(&mut self.0) }
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_gstring(), f)
    }
}

impl fmt::Debug for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "^{:?}", self.to_gstring())
    }
}

impl PartialEq for NodePath {
    fn eq(&self, other: &Self) -> bool {
        self.to_gstring() == other.to_gstring()
    }
}

impl Eq for NodePath {}
