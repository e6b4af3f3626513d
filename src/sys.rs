//! The raw boundary to the engine: the fixed memory layout of a Variant and
//! its owning handles, plus the table of native functions the engine hands us
//! when it loads the library.
//!
//! Nothing in here releases anything on its own. The safe wrappers in
//! [`builtin`](crate::builtin) and [`Variant`](crate::Variant) own these raw
//! handles and call the matching `destroy` entries when they are dropped.

use core::{ffi::c_void, fmt, ptr};

use bytemuck::Zeroable;
use once_cell::sync::OnceCell;

use crate::{
    math::{
        Aabb, Basis, Color, Plane, Projection, Quaternion, Rect2, Rect2I, Rid, Transform2D,
        Transform3D, Vector2, Vector2I, Vector3, Vector3I, Vector4, Vector4I,
    },
    VariantType,
};

/// The version of the function table layout this crate is built against. The
/// engine must hand us an [`Interface`] with the same version.
pub const INTERFACE_VERSION: u32 = 1;

#[cfg(not(feature = "double-precision"))]
const PAYLOAD_WORDS: usize = 2;
#[cfg(feature = "double-precision")]
const PAYLOAD_WORDS: usize = 4;

/// A native string. A null pointer is the empty string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Zeroable)]
#[repr(transparent)]
pub struct RawString(pub *mut c_void);

/// A native interned string. A null pointer is the empty name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Zeroable)]
#[repr(transparent)]
pub struct RawStringName(pub *mut c_void);

/// A native node path. A null pointer is the empty path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Zeroable)]
#[repr(transparent)]
pub struct RawNodePath(pub *mut c_void);

/// A native array of Variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Zeroable)]
#[repr(transparent)]
pub struct RawArray(pub *mut c_void);

/// A native dictionary mapping Variants to Variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Zeroable)]
#[repr(transparent)]
pub struct RawDictionary(pub *mut c_void);

/// A pointer to an engine object. The object is owned by the engine, not by
/// whoever holds this pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Zeroable)]
#[repr(transparent)]
pub struct ObjectPtr(pub *mut c_void);

impl ObjectPtr {
    /// The null object pointer.
    pub const NULL: Self = Self(ptr::null_mut());

    /// Checks whether the pointer is null.
    pub fn is_null(self) -> bool {
        self.0.is_null()
    }
}

/// A native callable: a method name bound to a target object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Zeroable)]
#[repr(C)]
pub struct RawCallable {
    /// The owned method name.
    pub method: RawStringName,
    /// The object the method is called on.
    pub object: ObjectPtr,
}

/// A native signal: a signal name on an owner object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Zeroable)]
#[repr(C)]
pub struct RawSignal {
    /// The owned signal name.
    pub name: RawStringName,
    /// The object that emits the signal.
    pub owner: ObjectPtr,
}

/// A native packed array: a contiguous buffer of `len` elements. A null
/// `data` pointer is the empty array.
#[repr(C)]
pub struct RawPackedArray<T> {
    /// The first element.
    pub data: *mut T,
    /// The number of elements.
    pub len: i64,
}

impl<T> RawPackedArray<T> {
    /// The empty packed array. Releasing it is a no-op.
    pub const EMPTY: Self = Self {
        data: ptr::null_mut(),
        len: 0,
    };
}

impl<T> Copy for RawPackedArray<T> {}

impl<T> Clone for RawPackedArray<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> fmt::Debug for RawPackedArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawPackedArray({:p}, {})", self.data, self.len)
    }
}

// SAFETY: A null pointer and a zero length is the empty packed array.
unsafe impl<T> Zeroable for RawPackedArray<T> {}

/// The payload of a Variant. Which field is active is determined by the
/// [`RawVariant::ty`]. Prefer [`Variant::payload`](crate::Variant::payload),
/// which performs that dispatch.
#[derive(Clone, Copy)]
#[repr(C)]
#[allow(missing_docs)]
pub union RawVariantData {
    pub boolean: u8,
    pub int: i64,
    pub float: f64,
    pub string: RawString,
    pub vector2: Vector2,
    pub vector2i: Vector2I,
    pub rect2: Rect2,
    pub rect2i: Rect2I,
    pub vector3: Vector3,
    pub vector3i: Vector3I,
    pub transform2d: *mut Transform2D,
    pub vector4: Vector4,
    pub vector4i: Vector4I,
    pub plane: Plane,
    pub quaternion: Quaternion,
    pub aabb: *mut Aabb,
    pub basis: *mut Basis,
    pub transform3d: *mut Transform3D,
    pub projection: *mut Projection,
    pub color: Color,
    pub string_name: RawStringName,
    pub node_path: RawNodePath,
    pub rid: Rid,
    pub object: ObjectPtr,
    pub callable: RawCallable,
    pub signal: RawSignal,
    pub dictionary: RawDictionary,
    pub array: RawArray,
    pub packed_byte_array: RawPackedArray<u8>,
    pub packed_int32_array: RawPackedArray<i32>,
    pub packed_int64_array: RawPackedArray<i64>,
    pub packed_float32_array: RawPackedArray<f32>,
    pub packed_float64_array: RawPackedArray<f64>,
    pub packed_string_array: RawPackedArray<RawString>,
    pub packed_vector2_array: RawPackedArray<Vector2>,
    pub packed_vector3_array: RawPackedArray<Vector3>,
    pub packed_color_array: RawPackedArray<Color>,
    pub packed_vector4_array: RawPackedArray<Vector4>,
    words: [u64; PAYLOAD_WORDS],
}

/// The engine's Variant, exactly as it is laid out in memory.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct RawVariant {
    /// The type of the variant.
    pub ty: VariantType,
    _padding: [u8; 7],
    /// The data of the variant.
    pub data: RawVariantData,
}

impl RawVariant {
    /// The Nil variant. All payload bytes are zero.
    pub const NIL: Self = Self::with_type(VariantType::NIL);

    /// Creates a variant of the given type with a zeroed payload, ready for
    /// the matching payload field to be written.
    pub const fn with_type(ty: VariantType) -> Self {
        Self {
            ty,
            _padding: [0; 7],
            data: RawVariantData {
                words: [0; PAYLOAD_WORDS],
            },
        }
    }
}

impl fmt::Debug for RawVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawVariant")
            .field("ty", &self.ty)
            .finish_non_exhaustive()
    }
}

/// The native entries that create, convert and release one packed array
/// element type.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct PackedArrayInterface<T> {
    /// Creates a packed array holding a copy of `len` elements at `src`. You
    /// own the packed array and are responsible for freeing it.
    pub new_mem_copy: unsafe extern "C" fn(dest: *mut RawPackedArray<T>, src: *const T, len: i64),
    /// Frees a packed array.
    pub destroy: unsafe extern "C" fn(array: *mut RawPackedArray<T>),
    /// Creates a Variant holding a copy of the packed array. You still retain
    /// ownership of the packed array.
    pub variant_new: unsafe extern "C" fn(dest: *mut RawVariant, from: *const RawPackedArray<T>),
    /// Converts a Variant of any type to a packed array of this element type.
    /// You own the returned packed array.
    pub variant_as: unsafe extern "C" fn(variant: *const RawVariant) -> RawPackedArray<T>,
}

/// The function table the engine provides. Every function that returns or
/// writes a handle hands ownership of it to the caller. Every function that
/// takes a handle by pointer only borrows it, unless it is a `destroy`.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct Interface {
    /// Must equal [`INTERFACE_VERSION`].
    pub version: u32,

    /// Copies a Variant, including its owned payload.
    pub variant_new_copy: unsafe extern "C" fn(dest: *mut RawVariant, src: *const RawVariant),
    /// Frees the payload of a Variant and leaves it Nil.
    pub variant_destroy: unsafe extern "C" fn(variant: *mut RawVariant),

    /// Creates a Variant holding an engine-allocated copy of the transform.
    pub variant_new_transform2d:
        unsafe extern "C" fn(dest: *mut RawVariant, from: *const Transform2D),
    /// Creates a Variant holding an engine-allocated copy of the basis.
    pub variant_new_basis: unsafe extern "C" fn(dest: *mut RawVariant, from: *const Basis),
    /// Creates a Variant holding an engine-allocated copy of the transform.
    pub variant_new_transform3d:
        unsafe extern "C" fn(dest: *mut RawVariant, from: *const Transform3D),
    /// Creates a Variant holding an engine-allocated copy of the projection.
    pub variant_new_projection:
        unsafe extern "C" fn(dest: *mut RawVariant, from: *const Projection),
    /// Creates a Variant holding an engine-allocated copy of the bounding box.
    pub variant_new_aabb: unsafe extern "C" fn(dest: *mut RawVariant, from: *const Aabb),
    /// Creates a Variant holding a copy of the string name.
    pub variant_new_string_name:
        unsafe extern "C" fn(dest: *mut RawVariant, from: *const RawStringName),
    /// Creates a Variant holding a copy of the node path.
    pub variant_new_node_path:
        unsafe extern "C" fn(dest: *mut RawVariant, from: *const RawNodePath),
    /// Creates a Variant referencing the object. A null pointer creates Nil.
    /// The variant holds its own reference, which is taken again by
    /// `variant_new_copy` and released by `variant_destroy`.
    pub variant_new_object: unsafe extern "C" fn(dest: *mut RawVariant, from: ObjectPtr),
    /// Creates a Variant holding a copy of the array.
    pub variant_new_array: unsafe extern "C" fn(dest: *mut RawVariant, from: *const RawArray),
    /// Creates a Variant holding a copy of the dictionary.
    pub variant_new_dictionary:
        unsafe extern "C" fn(dest: *mut RawVariant, from: *const RawDictionary),

    #[allow(missing_docs)]
    pub variant_as_bool: unsafe extern "C" fn(variant: *const RawVariant) -> bool,
    #[allow(missing_docs)]
    pub variant_as_int: unsafe extern "C" fn(variant: *const RawVariant) -> i64,
    #[allow(missing_docs)]
    pub variant_as_float: unsafe extern "C" fn(variant: *const RawVariant) -> f64,
    #[allow(missing_docs)]
    pub variant_as_vector2: unsafe extern "C" fn(variant: *const RawVariant) -> Vector2,
    #[allow(missing_docs)]
    pub variant_as_vector2i: unsafe extern "C" fn(variant: *const RawVariant) -> Vector2I,
    #[allow(missing_docs)]
    pub variant_as_rect2: unsafe extern "C" fn(variant: *const RawVariant) -> Rect2,
    #[allow(missing_docs)]
    pub variant_as_rect2i: unsafe extern "C" fn(variant: *const RawVariant) -> Rect2I,
    #[allow(missing_docs)]
    pub variant_as_vector3: unsafe extern "C" fn(variant: *const RawVariant) -> Vector3,
    #[allow(missing_docs)]
    pub variant_as_vector3i: unsafe extern "C" fn(variant: *const RawVariant) -> Vector3I,
    #[allow(missing_docs)]
    pub variant_as_transform2d: unsafe extern "C" fn(variant: *const RawVariant) -> Transform2D,
    #[allow(missing_docs)]
    pub variant_as_vector4: unsafe extern "C" fn(variant: *const RawVariant) -> Vector4,
    #[allow(missing_docs)]
    pub variant_as_vector4i: unsafe extern "C" fn(variant: *const RawVariant) -> Vector4I,
    #[allow(missing_docs)]
    pub variant_as_plane: unsafe extern "C" fn(variant: *const RawVariant) -> Plane,
    #[allow(missing_docs)]
    pub variant_as_quaternion: unsafe extern "C" fn(variant: *const RawVariant) -> Quaternion,
    #[allow(missing_docs)]
    pub variant_as_aabb: unsafe extern "C" fn(variant: *const RawVariant) -> Aabb,
    #[allow(missing_docs)]
    pub variant_as_basis: unsafe extern "C" fn(variant: *const RawVariant) -> Basis,
    #[allow(missing_docs)]
    pub variant_as_transform3d: unsafe extern "C" fn(variant: *const RawVariant) -> Transform3D,
    #[allow(missing_docs)]
    pub variant_as_projection: unsafe extern "C" fn(variant: *const RawVariant) -> Projection,
    #[allow(missing_docs)]
    pub variant_as_color: unsafe extern "C" fn(variant: *const RawVariant) -> Color,
    #[allow(missing_docs)]
    pub variant_as_rid: unsafe extern "C" fn(variant: *const RawVariant) -> Rid,
    /// Stringifies any Variant. You own the returned string.
    pub variant_as_string: unsafe extern "C" fn(variant: *const RawVariant) -> RawString,
    /// You own the returned string name.
    pub variant_as_string_name: unsafe extern "C" fn(variant: *const RawVariant) -> RawStringName,
    /// You own the returned node path.
    pub variant_as_node_path: unsafe extern "C" fn(variant: *const RawVariant) -> RawNodePath,
    /// You own the returned callable.
    pub variant_as_callable: unsafe extern "C" fn(variant: *const RawVariant) -> RawCallable,
    /// You own the returned signal.
    pub variant_as_signal: unsafe extern "C" fn(variant: *const RawVariant) -> RawSignal,
    /// You own the returned array.
    pub variant_as_array: unsafe extern "C" fn(variant: *const RawVariant) -> RawArray,
    /// You own the returned dictionary.
    pub variant_as_dictionary: unsafe extern "C" fn(variant: *const RawVariant) -> RawDictionary,

    /// Creates a string from `len` bytes of UTF-8.
    pub string_new_with_utf8_chars:
        unsafe extern "C" fn(dest: *mut RawString, chars: *const u8, len: i64),
    #[allow(missing_docs)]
    pub string_new_copy: unsafe extern "C" fn(dest: *mut RawString, src: *const RawString),
    #[allow(missing_docs)]
    pub string_destroy: unsafe extern "C" fn(string: *mut RawString),
    /// Writes the string as UTF-8 into the buffer. The buffer length is
    /// passed in through `buf_len_ptr` and the string's length is written back
    /// to it. Returns `false` if the buffer was too small, in which case
    /// nothing is written to the buffer. A null buffer with a length of 0
    /// queries the length.
    pub string_get_utf8:
        unsafe extern "C" fn(string: *const RawString, buf_ptr: *mut u8, buf_len_ptr: *mut usize) -> bool,

    #[allow(missing_docs)]
    pub string_name_new_from_string:
        unsafe extern "C" fn(dest: *mut RawStringName, from: *const RawString),
    #[allow(missing_docs)]
    pub string_name_new_copy:
        unsafe extern "C" fn(dest: *mut RawStringName, src: *const RawStringName),
    #[allow(missing_docs)]
    pub string_name_destroy: unsafe extern "C" fn(name: *mut RawStringName),
    #[allow(missing_docs)]
    pub string_name_as_string: unsafe extern "C" fn(dest: *mut RawString, name: *const RawStringName),

    #[allow(missing_docs)]
    pub node_path_new_from_string:
        unsafe extern "C" fn(dest: *mut RawNodePath, from: *const RawString),
    #[allow(missing_docs)]
    pub node_path_new_copy: unsafe extern "C" fn(dest: *mut RawNodePath, src: *const RawNodePath),
    #[allow(missing_docs)]
    pub node_path_destroy: unsafe extern "C" fn(path: *mut RawNodePath),
    #[allow(missing_docs)]
    pub node_path_as_string: unsafe extern "C" fn(dest: *mut RawString, path: *const RawNodePath),

    #[allow(missing_docs)]
    pub array_new: unsafe extern "C" fn(dest: *mut RawArray),
    /// Copies an array. No changes inside the copy affect the original.
    pub array_new_copy: unsafe extern "C" fn(dest: *mut RawArray, src: *const RawArray),
    #[allow(missing_docs)]
    pub array_destroy: unsafe extern "C" fn(array: *mut RawArray),
    #[allow(missing_docs)]
    pub array_size: unsafe extern "C" fn(array: *const RawArray) -> i64,
    /// Writes a copy of the element at `index` into `dest`. Returns `false`
    /// and leaves `dest` Nil if the index is out of bounds.
    pub array_get:
        unsafe extern "C" fn(dest: *mut RawVariant, array: *const RawArray, index: i64) -> bool,
    /// Appends a copy of the value.
    pub array_push_back: unsafe extern "C" fn(array: *mut RawArray, value: *const RawVariant),

    #[allow(missing_docs)]
    pub dictionary_new: unsafe extern "C" fn(dest: *mut RawDictionary),
    /// Copies a dictionary. No changes inside the copy affect the original.
    pub dictionary_new_copy: unsafe extern "C" fn(dest: *mut RawDictionary, src: *const RawDictionary),
    #[allow(missing_docs)]
    pub dictionary_destroy: unsafe extern "C" fn(dictionary: *mut RawDictionary),
    #[allow(missing_docs)]
    pub dictionary_size: unsafe extern "C" fn(dictionary: *const RawDictionary) -> i64,
    /// Inserts copies of the key and the value, overwriting any previous value.
    pub dictionary_set: unsafe extern "C" fn(
        dictionary: *mut RawDictionary,
        key: *const RawVariant,
        value: *const RawVariant,
    ),
    /// Writes a copy of the value stored for `key` into `dest`. Returns
    /// `false` and leaves `dest` Nil if the key does not exist.
    pub dictionary_get: unsafe extern "C" fn(
        dest: *mut RawVariant,
        dictionary: *const RawDictionary,
        key: *const RawVariant,
    ) -> bool,
    /// Writes a new array of copies of all keys, in insertion order.
    pub dictionary_keys: unsafe extern "C" fn(dest: *mut RawArray, dictionary: *const RawDictionary),

    /// Creates a callable. The method name is copied.
    pub callable_new:
        unsafe extern "C" fn(dest: *mut RawCallable, object: ObjectPtr, method: *const RawStringName),
    /// Reads the target and a copy of the method name out of a callable.
    pub callable_get_data: unsafe extern "C" fn(
        callable: *const RawCallable,
        object: *mut ObjectPtr,
        method: *mut RawStringName,
    ),
    #[allow(missing_docs)]
    pub callable_destroy: unsafe extern "C" fn(callable: *mut RawCallable),

    /// Creates a signal. The signal name is copied.
    pub signal_new:
        unsafe extern "C" fn(dest: *mut RawSignal, owner: ObjectPtr, name: *const RawStringName),
    /// Reads the owner and a copy of the signal name out of a signal.
    pub signal_get_data:
        unsafe extern "C" fn(signal: *const RawSignal, owner: *mut ObjectPtr, name: *mut RawStringName),
    #[allow(missing_docs)]
    pub signal_destroy: unsafe extern "C" fn(signal: *mut RawSignal),

    #[allow(missing_docs)]
    pub packed_byte_array: PackedArrayInterface<u8>,
    #[allow(missing_docs)]
    pub packed_int32_array: PackedArrayInterface<i32>,
    #[allow(missing_docs)]
    pub packed_int64_array: PackedArrayInterface<i64>,
    #[allow(missing_docs)]
    pub packed_float32_array: PackedArrayInterface<f32>,
    #[allow(missing_docs)]
    pub packed_float64_array: PackedArrayInterface<f64>,
    #[allow(missing_docs)]
    pub packed_string_array: PackedArrayInterface<RawString>,
    #[allow(missing_docs)]
    pub packed_vector2_array: PackedArrayInterface<Vector2>,
    #[allow(missing_docs)]
    pub packed_vector3_array: PackedArrayInterface<Vector3>,
    #[allow(missing_docs)]
    pub packed_vector4_array: PackedArrayInterface<Vector4>,
    #[allow(missing_docs)]
    pub packed_color_array: PackedArrayInterface<Color>,
}

/// An error returned when loading the native [`Interface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum InterfaceError {
    /// A different function table is already loaded. It can't be replaced.
    #[error("a different native interface is already loaded")]
    AlreadyLoaded,
    /// The function table has a different layout version.
    #[error("native interface version {found} does not match expected version {expected}")]
    VersionMismatch {
        /// The version this crate is built against.
        expected: u32,
        /// The version of the table that was passed in.
        found: u32,
    },
}

static INTERFACE: OnceCell<&'static Interface> = OnceCell::new();

/// Loads the engine's function table. This needs to happen once, before any
/// Variant is created or converted. Loading the same table again is a no-op.
pub fn load(interface: &'static Interface) -> Result<(), InterfaceError> {
    if interface.version != INTERFACE_VERSION {
        return Err(InterfaceError::VersionMismatch {
            expected: INTERFACE_VERSION,
            found: interface.version,
        });
    }

    let mut fresh = false;
    let loaded = INTERFACE.get_or_init(|| {
        fresh = true;
        interface
    });
    if !ptr::eq(*loaded, interface) {
        return Err(InterfaceError::AlreadyLoaded);
    }
    if fresh {
        tracing::debug!(version = interface.version, "native interface loaded");
    }
    Ok(())
}

/// Returns [`true`] if a function table has been loaded.
pub fn is_loaded() -> bool {
    INTERFACE.get().is_some()
}

/// Returns the loaded function table.
///
/// # Panics
///
/// Panics if no table has been loaded with [`load`]. Converting values before
/// the engine handed over its functions is a programming error.
#[inline]
pub fn interface() -> &'static Interface {
    match INTERFACE.get() {
        Some(interface) => interface,
        None => panic!("the native interface is not loaded"),
    }
}
