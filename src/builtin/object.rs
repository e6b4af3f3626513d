pub use crate::sys::ObjectPtr;

/// A host wrapper around an engine object.
///
/// The engine owns the object itself. The wrapper only needs to hand out the
/// pointer so it can be stored in a [`Variant`](crate::Variant).
pub trait GodotObject {
    /// Returns the pointer to the engine object.
    fn object_ptr(&self) -> ObjectPtr;
}

/// Resolves an engine object pointer to its host wrapper. This is where the
/// host keeps its registry of wrappers; the marshaling layer only asks it.
pub trait FromObjectPtr: Sized {
    /// Returns the wrapper for the object. Returns [`None`] if the host doesn't
    /// know the object. This is never called with a null pointer.
    fn from_object_ptr(ptr: ObjectPtr) -> Option<Self>;
}

impl<T: GodotObject + ?Sized> GodotObject for &T {
    fn object_ptr(&self) -> ObjectPtr {
        (**self).object_ptr()
    }
}

impl GodotObject for ObjectPtr {
    fn object_ptr(&self) -> ObjectPtr {
        *self
    }
}

impl FromObjectPtr for ObjectPtr {
    fn from_object_ptr(ptr: ObjectPtr) -> Option<Self> {
        Some(ptr)
    }
}
