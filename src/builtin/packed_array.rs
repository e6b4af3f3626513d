use core::{fmt, mem::ManuallyDrop, slice};

use crate::{
    marshal,
    math::{Color, Vector2, Vector3, Vector4},
    sys::{self, PackedArrayInterface, RawPackedArray, RawString},
    VariantType,
};

use super::GString;

/// An element type of a packed array.
pub trait PackedArrayElement: Sized {
    /// How a single element is stored in the engine's buffer.
    type Native: Copy;
    /// The type of a Variant holding a packed array of this element.
    const VARIANT_TYPE: VariantType;

    /// Selects the native functions for this element type.
    fn interface(interface: &sys::Interface) -> &PackedArrayInterface<Self::Native>;

    /// Converts the elements of an engine buffer to host values.
    fn to_managed(native: &[Self::Native]) -> Vec<Self>;

    /// Creates an engine buffer holding copies of the host values.
    fn to_native(managed: &[Self]) -> PackedArray<Self>;
}

/// A packed array owned by the engine. It's usually only alive for the
/// duration of a single conversion, as the guard that releases the engine's
/// buffer.
///
/// [`Packed*Array`](https://docs.godotengine.org/en/4.2/classes/class_packedbytearray.html)
#[repr(transparent)]
pub struct PackedArray<T: PackedArrayElement>(RawPackedArray<T::Native>);

impl<T: PackedArrayElement> PackedArray<T> {
    /// Creates an empty packed array. This doesn't call into the engine.
    #[inline]
    pub const fn new() -> Self {
        Self(RawPackedArray::EMPTY)
    }

    /// Creates a packed array holding copies of the values.
    #[inline]
    pub fn from_slice(values: &[T]) -> Self {
        T::to_native(values)
    }

    /// Creates a packed array holding copies of elements that are already in
    /// the engine's representation.
    pub fn copy_from_native(native: &[T::Native]) -> Self {
        if native.is_empty() {
            return Self::new();
        }
        let mut raw = RawPackedArray::EMPTY;
        // SAFETY: We provide a valid pointer and length to the elements. The
        // engine copies them and we own the new packed array.
        unsafe {
            (T::interface(sys::interface()).new_mem_copy)(
                &mut raw,
                native.as_ptr(),
                native.len() as i64,
            )
        };
        Self(raw)
    }

    /// Takes ownership of a native packed array.
    ///
    /// # Safety
    ///
    /// The handle needs to be valid, hold elements of type `T::Native`, and
    /// must not be released by anyone else afterwards.
    #[inline]
    pub const unsafe fn from_raw(raw: RawPackedArray<T::Native>) -> Self {
        Self(raw)
    }

    /// Gives up ownership of the native packed array. You are responsible for
    /// freeing it.
    #[inline]
    pub fn into_raw(self) -> RawPackedArray<T::Native> {
        ManuallyDrop::new(self).0
    }

    /// Returns the native packed array, still owned by `self`.
    #[inline]
    pub fn as_raw(&self) -> &RawPackedArray<T::Native> {
        &self.0
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        if self.0.data.is_null() {
            0
        } else {
            self.0.len as usize
        }
    }

    /// Returns [`true`] if there are no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the engine's buffer.
    #[inline]
    pub fn as_native_slice(&self) -> &[T::Native] {
        let len = self.len();
        if len == 0 {
            return &[];
        }
        // SAFETY: A non-null buffer holds `len` initialized elements and lives
        // until the packed array is released, which can't happen while `self`
        // is borrowed.
        unsafe { slice::from_raw_parts(self.0.data, len) }
    }

    /// Converts the elements to host values.
    #[inline]
    pub fn to_vec(&self) -> Vec<T> {
        T::to_managed(self.as_native_slice())
    }
}

impl<T: PackedArrayElement> Default for PackedArray<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PackedArrayElement> Clone for PackedArray<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self::copy_from_native(self.as_native_slice())
    }
}

impl<T: PackedArrayElement> Drop for PackedArray<T> {
    #[inline]
    fn drop(&mut self) {
        if !self.0.data.is_null() {
            // SAFETY: The handle is valid and we own it, so it's our
            // responsibility to free it.
            unsafe { (T::interface(sys::interface()).destroy)(&mut self.0) }
        }
    }
}

impl<T: PackedArrayElement + fmt::Debug> fmt::Debug for PackedArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.to_vec()).finish()
    }
}

macro_rules! plain_elements {
    ($($ty:ty => $field:ident, $variant_type:ident;)*) => {
        $(
            impl PackedArrayElement for $ty {
                type Native = $ty;
                const VARIANT_TYPE: VariantType = VariantType::$variant_type;

                #[inline]
                fn interface(interface: &sys::Interface) -> &PackedArrayInterface<$ty> {
                    &interface.$field
                }

                #[inline]
                fn to_managed(native: &[$ty]) -> Vec<$ty> {
                    native.to_vec()
                }

                #[inline]
                fn to_native(managed: &[$ty]) -> PackedArray<$ty> {
                    PackedArray::copy_from_native(managed)
                }
            }
        )*
    };
}

plain_elements! {
    u8 => packed_byte_array, PACKED_BYTE_ARRAY;
    i32 => packed_int32_array, PACKED_INT32_ARRAY;
    i64 => packed_int64_array, PACKED_INT64_ARRAY;
    f32 => packed_float32_array, PACKED_FLOAT32_ARRAY;
    f64 => packed_float64_array, PACKED_FLOAT64_ARRAY;
    Vector2 => packed_vector2_array, PACKED_VECTOR2_ARRAY;
    Vector3 => packed_vector3_array, PACKED_VECTOR3_ARRAY;
    Vector4 => packed_vector4_array, PACKED_VECTOR4_ARRAY;
    Color => packed_color_array, PACKED_COLOR_ARRAY;
}

impl PackedArrayElement for String {
    type Native = RawString;
    const VARIANT_TYPE: VariantType = VariantType::PACKED_STRING_ARRAY;

    #[inline]
    fn interface(interface: &sys::Interface) -> &PackedArrayInterface<RawString> {
        &interface.packed_string_array
    }

    fn to_managed(native: &[RawString]) -> Vec<String> {
        native.iter().map(marshal::convert_string_to_managed).collect()
    }

    fn to_native(managed: &[String]) -> PackedArray<String> {
        // The engine copies every string, so the temporaries are released
        // right after.
        let strings: Vec<GString> = managed.iter().map(|s| GString::from(s.as_str())).collect();
        let raw: Vec<RawString> = strings.iter().map(|s| *s.as_raw()).collect();
        PackedArray::copy_from_native(&raw)
    }
}
