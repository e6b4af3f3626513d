use core::{fmt, mem::ManuallyDrop};

use crate::{
    sys::{self, RawVariant},
    Variant,
};

/// An array of [`Variant`]s owned by the engine.
///
/// [`Array`](https://docs.godotengine.org/en/4.2/classes/class_array.html)
#[repr(transparent)]
pub struct Array(sys::RawArray);

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Drop for Array {
    #[inline]
    fn drop(&mut self) {
        // SAFETY: The handle is valid and we own it, so it's our responsibility
        // to free it.
        unsafe { (sys::interface().array_destroy)(&mut self.0) }
    }
}

impl Clone for Array {
    /// Copies the array. No changes inside the copy affect the original.
    #[inline]
    fn clone(&self) -> Self {
        let mut raw = sys::RawArray(core::ptr::null_mut());
        // SAFETY: The handle is valid, so we can safely copy it.
        unsafe { (sys::interface().array_new_copy)(&mut raw, &self.0) };
        Self(raw)
    }
}

impl Default for Array {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Array {
    /// Creates a new empty array.
    #[inline]
    pub fn new() -> Self {
        let mut raw = sys::RawArray(core::ptr::null_mut());
        // SAFETY: This is always safe to call. We own the new array.
        unsafe { (sys::interface().array_new)(&mut raw) };
        Self(raw)
    }

    /// Takes ownership of a native array.
    ///
    /// # Safety
    ///
    /// The handle needs to be valid and must not be released by anyone else
    /// afterwards.
    #[inline]
    pub const unsafe fn from_raw(raw: sys::RawArray) -> Self {
        Self(raw)
    }

    /// Gives up ownership of the native array. You are responsible for freeing
    /// it.
    #[inline]
    pub fn into_raw(self) -> sys::RawArray {
        ManuallyDrop::new(self).0
    }

    /// Returns the native array, still owned by `self`.
    #[inline]
    pub fn as_raw(&self) -> &sys::RawArray {
        &self.0
    }

    /// Returns the number of values in the array.
    #[inline]
    pub fn len(&self) -> usize {
        // SAFETY: The handle is valid, so we can safely call this function.
        unsafe { (sys::interface().array_size)(&self.0) as usize }
    }

    /// Returns [`true`] if the array has a length of 0.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a copy of the value at the given index. Returns [`None`] if the
    /// index is out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Variant> {
        let mut raw = RawVariant::NIL;
        // SAFETY: The handle is valid. On success we own the copied element,
        // otherwise `raw` stays Nil and owns nothing.
        unsafe {
            if (sys::interface().array_get)(&mut raw, &self.0, index as i64) {
                Some(Variant::from_raw(raw))
            } else {
                None
            }
        }
    }

    /// Pushes a copy of the value to the end of the array.
    #[inline]
    pub fn push(&mut self, value: &Variant) {
        // SAFETY: Both handles are valid. The value stays owned by the caller.
        unsafe { (sys::interface().array_push_back)(&mut self.0, value.as_raw()) }
    }

    /// Returns an iterator over copies of the values in the array.
    #[inline]
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Variant> + '_ {
        (0..self.len()).flat_map(|i| self.get(i))
    }
}

impl FromIterator<Variant> for Array {
    fn from_iter<I: IntoIterator<Item = Variant>>(iter: I) -> Self {
        let mut array = Self::new();
        for value in iter {
            array.push(&value);
        }
        array
    }
}
