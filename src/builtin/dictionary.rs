use core::{fmt, mem::ManuallyDrop};

use crate::{
    sys::{self, RawVariant},
    Variant,
};

use super::Array;

/// A map from [`Variant`] keys to [`Variant`] values, owned by the engine.
/// Keys keep their insertion order.
///
/// [`Dictionary`](https://docs.godotengine.org/en/4.2/classes/class_dictionary.html)
#[repr(transparent)]
pub struct Dictionary(sys::RawDictionary);

impl fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl Drop for Dictionary {
    #[inline]
    fn drop(&mut self) {
        // SAFETY: The handle is valid and we own it, so it's our responsibility
        // to free it.
        unsafe { (sys::interface().dictionary_destroy)(&mut self.0) }
    }
}

impl Clone for Dictionary {
    /// Copies the dictionary. No changes inside the copy affect the original.
    #[inline]
    fn clone(&self) -> Self {
        let mut raw = sys::RawDictionary(core::ptr::null_mut());
        // SAFETY: The handle is valid, so we can safely copy it.
        unsafe { (sys::interface().dictionary_new_copy)(&mut raw, &self.0) };
        Self(raw)
    }
}

impl Default for Dictionary {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Dictionary {
    /// Creates a new empty dictionary.
    #[inline]
    pub fn new() -> Self {
        let mut raw = sys::RawDictionary(core::ptr::null_mut());
        // SAFETY: This is always safe to call. We own the new dictionary.
        unsafe { (sys::interface().dictionary_new)(&mut raw) };
        Self(raw)
    }

    /// Takes ownership of a native dictionary.
    ///
    /// # Safety
    ///
    /// The handle needs to be valid and must not be released by anyone else
    /// afterwards.
    #[inline]
    pub const unsafe fn from_raw(raw: sys::RawDictionary) -> Self {
        Self(raw)
    }

    /// Gives up ownership of the native dictionary. You are responsible for
    /// freeing it.
    #[inline]
    pub fn into_raw(self) -> sys::RawDictionary {
        ManuallyDrop::new(self).0
    }

    /// Returns the native dictionary, still owned by `self`.
    #[inline]
    pub fn as_raw(&self) -> &sys::RawDictionary {
        &self.0
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        // SAFETY: The handle is valid, so we can safely call this function.
        unsafe { (sys::interface().dictionary_size)(&self.0) as usize }
    }

    /// Returns [`true`] if the dictionary has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts copies of the key and the value. If the key already exists, its
    /// value is overwritten.
    #[inline]
    pub fn insert(&mut self, key: &Variant, value: &Variant) {
        // SAFETY: All handles are valid. Key and value stay owned by the caller.
        unsafe { (sys::interface().dictionary_set)(&mut self.0, key.as_raw(), value.as_raw()) }
    }

    /// Returns a copy of the value stored for the key. Returns [`None`] if the
    /// key does not exist.
    #[inline]
    pub fn get(&self, key: &Variant) -> Option<Variant> {
        let mut raw = RawVariant::NIL;
        // SAFETY: The handles are valid. On success we own the copied value,
        // otherwise `raw` stays Nil and owns nothing.
        unsafe {
            if (sys::interface().dictionary_get)(&mut raw, &self.0, key.as_raw()) {
                Some(Variant::from_raw(raw))
            } else {
                None
            }
        }
    }

    /// Returns an array of copies of all keys, in insertion order.
    pub fn keys(&self) -> Array {
        let mut raw = sys::RawArray(core::ptr::null_mut());
        // SAFETY: The handle is valid. We own the returned array.
        unsafe {
            (sys::interface().dictionary_keys)(&mut raw, &self.0);
            Array::from_raw(raw)
        }
    }

    /// Returns an iterator over copies of the entries, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Variant, Variant)> + '_ {
        let keys = self.keys();
        (0..keys.len()).filter_map(move |i| {
            let key = keys.get(i)?;
            let value = self.get(&key)?;
            Some((key, value))
        })
    }
}
