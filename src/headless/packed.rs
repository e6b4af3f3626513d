//! Packed arrays. A non-empty buffer is a boxed slice; the empty one is a null
//! pointer and allocates nothing.

use core::{ptr, slice};

use crate::{
    math::{Color, Vector2, Vector3, Vector4},
    sys::{PackedArrayInterface, RawPackedArray, RawString, RawVariant, RawVariantData},
    VariantType,
};

use super::{coerce, text, variant};

/// An element type as it is stored in a packed array buffer.
pub(super) trait HeadlessElement: Copy {
    const VARIANT_TYPE: VariantType;

    /// Reads the packed array out of a payload of [`Self::VARIANT_TYPE`].
    ///
    /// # Safety
    ///
    /// The payload needs to hold a packed array of this element type.
    unsafe fn get(data: &RawVariantData) -> RawPackedArray<Self>;

    fn set(data: &mut RawVariantData, array: RawPackedArray<Self>);

    /// Coerces a single array element.
    fn from_variant(variant: &RawVariant) -> Self;

    /// Creates a variant holding a copy of the element.
    fn to_variant(&self) -> RawVariant;

    /// # Safety
    ///
    /// The element needs to be valid.
    unsafe fn copy_element(&self) -> Self {
        *self
    }

    /// # Safety
    ///
    /// The element needs to be valid and must not be used afterwards.
    unsafe fn destroy_element(&mut self) {}

    /// # Safety
    ///
    /// Both elements need to be valid.
    unsafe fn element_equals(&self, other: &Self) -> bool;
}

macro_rules! plain_elements {
    ($($ty:ty => $variant_type:ident.$field:ident, $from_variant:expr, $to_variant:expr;)*) => {
        $(
            impl HeadlessElement for $ty {
                const VARIANT_TYPE: VariantType = VariantType::$variant_type;

                unsafe fn get(data: &RawVariantData) -> RawPackedArray<Self> {
                    data.$field
                }

                fn set(data: &mut RawVariantData, array: RawPackedArray<Self>) {
                    data.$field = array;
                }

                fn from_variant(variant: &RawVariant) -> Self {
                    $from_variant(variant)
                }

                fn to_variant(&self) -> RawVariant {
                    $to_variant(*self)
                }

                unsafe fn element_equals(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

fn new_int(value: i64) -> RawVariant {
    let mut raw = RawVariant::with_type(VariantType::INT);
    raw.data.int = value;
    raw
}

fn new_float(value: f64) -> RawVariant {
    let mut raw = RawVariant::with_type(VariantType::FLOAT);
    raw.data.float = value;
    raw
}

plain_elements! {
    u8 => PACKED_BYTE_ARRAY.packed_byte_array,
        |v| coerce::to_int(v) as u8, |v: u8| new_int(v.into());
    i32 => PACKED_INT32_ARRAY.packed_int32_array,
        |v| coerce::to_int(v) as i32, |v: i32| new_int(v.into());
    i64 => PACKED_INT64_ARRAY.packed_int64_array, coerce::to_int, new_int;
    f32 => PACKED_FLOAT32_ARRAY.packed_float32_array,
        |v| coerce::to_float(v) as f32, |v: f32| new_float(v.into());
    f64 => PACKED_FLOAT64_ARRAY.packed_float64_array, coerce::to_float, new_float;
    Vector2 => PACKED_VECTOR2_ARRAY.packed_vector2_array, coerce::to_vector2, |v| {
        let mut raw = RawVariant::with_type(VariantType::VECTOR2);
        raw.data.vector2 = v;
        raw
    };
    Vector3 => PACKED_VECTOR3_ARRAY.packed_vector3_array, coerce::to_vector3, |v| {
        let mut raw = RawVariant::with_type(VariantType::VECTOR3);
        raw.data.vector3 = v;
        raw
    };
    Vector4 => PACKED_VECTOR4_ARRAY.packed_vector4_array, coerce::to_vector4, |v| {
        let mut raw = RawVariant::with_type(VariantType::VECTOR4);
        raw.data.vector4 = v;
        raw
    };
    Color => PACKED_COLOR_ARRAY.packed_color_array, coerce::to_color, |v| {
        let mut raw = RawVariant::with_type(VariantType::COLOR);
        raw.data.color = v;
        raw
    };
}

impl HeadlessElement for RawString {
    const VARIANT_TYPE: VariantType = VariantType::PACKED_STRING_ARRAY;

    unsafe fn get(data: &RawVariantData) -> RawPackedArray<Self> {
        data.packed_string_array
    }

    fn set(data: &mut RawVariantData, array: RawPackedArray<Self>) {
        data.packed_string_array = array;
    }

    fn from_variant(variant: &RawVariant) -> Self {
        RawString(text::new(&coerce::to_text(variant)))
    }

    fn to_variant(&self) -> RawVariant {
        // SAFETY: Elements of our packed string arrays are our strings.
        variant::new_string(unsafe { text::get(self.0) })
    }

    unsafe fn copy_element(&self) -> Self {
        RawString(text::copy(self.0))
    }

    unsafe fn destroy_element(&mut self) {
        text::free(self.0);
        self.0 = ptr::null_mut();
    }

    unsafe fn element_equals(&self, other: &Self) -> bool {
        text::get(self.0) == text::get(other.0)
    }
}

/// Takes over the elements as a new buffer.
pub(super) fn from_vec<T: HeadlessElement>(elements: Vec<T>) -> RawPackedArray<T> {
    if elements.is_empty() {
        return RawPackedArray::EMPTY;
    }
    super::handle_allocated();
    let len = elements.len() as i64;
    let data = Box::into_raw(elements.into_boxed_slice()).cast::<T>();
    RawPackedArray { data, len }
}

/// Borrows the elements of a buffer.
///
/// # Safety
///
/// The buffer needs to be empty or one of ours and not yet freed.
pub(super) unsafe fn elements<'a, T>(array: &RawPackedArray<T>) -> &'a [T] {
    if array.data.is_null() || array.len <= 0 {
        &[]
    } else {
        slice::from_raw_parts(array.data, array.len as usize)
    }
}

/// # Safety
///
/// Same as [`elements`].
pub(super) unsafe fn copy<T: HeadlessElement>(array: &RawPackedArray<T>) -> RawPackedArray<T> {
    from_vec(elements(array).iter().map(|e| e.copy_element()).collect())
}

/// # Safety
///
/// Same as [`elements`]. The buffer must not be used afterwards.
pub(super) unsafe fn free<T: HeadlessElement>(array: RawPackedArray<T>) {
    if array.data.is_null() {
        return;
    }
    let mut elements = Box::from_raw(ptr::slice_from_raw_parts_mut(array.data, array.len as usize));
    for element in elements.iter_mut() {
        element.destroy_element();
    }
    drop(elements);
    super::handle_released();
}

/// # Safety
///
/// Same as [`elements`].
pub(super) unsafe fn equals<T: HeadlessElement>(a: &RawPackedArray<T>, b: &RawPackedArray<T>) -> bool {
    let (a, b) = (elements(a), elements(b));
    a.len() == b.len() && a.iter().zip(b).all(|(a, b)| a.element_equals(b))
}

/// Creates a variant holding the packed array. The variant owns the buffer.
pub(super) fn into_variant<T: HeadlessElement>(array: RawPackedArray<T>) -> RawVariant {
    let mut raw = RawVariant::with_type(T::VARIANT_TYPE);
    T::set(&mut raw.data, array);
    raw
}

unsafe extern "C" fn new_mem_copy<T: HeadlessElement>(
    dest: *mut RawPackedArray<T>,
    src: *const T,
    len: i64,
) {
    let source = RawPackedArray {
        data: src.cast_mut(),
        len,
    };
    dest.write(copy(&source));
}

unsafe extern "C" fn destroy<T: HeadlessElement>(array: *mut RawPackedArray<T>) {
    free(*array);
    array.write(RawPackedArray::EMPTY);
}

unsafe extern "C" fn variant_new<T: HeadlessElement>(
    dest: *mut RawVariant,
    from: *const RawPackedArray<T>,
) {
    dest.write(into_variant(copy(&*from)));
}

unsafe extern "C" fn variant_as<T: HeadlessElement>(variant: *const RawVariant) -> RawPackedArray<T> {
    super::count_coercion();
    coerce::to_packed(&*variant)
}

/// The native entries for one element type.
pub(super) const fn interface<T: HeadlessElement>() -> PackedArrayInterface<T> {
    PackedArrayInterface {
        new_mem_copy: new_mem_copy::<T>,
        destroy: destroy::<T>,
        variant_new: variant_new::<T>,
        variant_as: variant_as::<T>,
    }
}
