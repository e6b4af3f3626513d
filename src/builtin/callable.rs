use core::mem::ManuallyDrop;

use crate::{
    marshal,
    sys::{self, ObjectPtr},
};

use super::StringName;

/// A method bound to an object.
///
/// [`Callable`](https://docs.godotengine.org/en/4.2/classes/class_callable.html)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Callable {
    /// The object the method is called on.
    pub target: ObjectPtr,
    /// The name of the method.
    pub method: StringName,
}

impl Callable {
    /// Creates a callable for the method on the target object.
    pub fn new(target: ObjectPtr, method: impl Into<StringName>) -> Self {
        Self {
            target,
            method: method.into(),
        }
    }

    /// Returns [`true`] if the callable has no target.
    pub fn is_null(&self) -> bool {
        self.target.is_null()
    }
}

/// A signal on an object.
///
/// [`Signal`](https://docs.godotengine.org/en/4.2/classes/class_signal.html)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    /// The object that emits the signal.
    pub owner: ObjectPtr,
    /// The name of the signal.
    pub name: StringName,
}

impl Signal {
    /// Creates a signal with the name on the owner object.
    pub fn new(owner: ObjectPtr, name: impl Into<StringName>) -> Self {
        Self {
            owner,
            name: name.into(),
        }
    }

    /// Returns [`true`] if the signal has no owner.
    pub fn is_null(&self) -> bool {
        self.owner.is_null()
    }
}

/// A callable owned by the engine. Convert it with
/// [`to_callable`](Self::to_callable) to inspect it.
#[repr(transparent)]
pub struct NativeCallable(sys::RawCallable);

impl NativeCallable {
    /// Creates the engine's representation of the callable.
    #[inline]
    pub fn new(callable: &Callable) -> Self {
        marshal::convert_callable_to_native(callable)
    }

    /// Takes ownership of a native callable.
    ///
    /// # Safety
    ///
    /// The handle needs to be valid and must not be released by anyone else
    /// afterwards.
    #[inline]
    pub const unsafe fn from_raw(raw: sys::RawCallable) -> Self {
        Self(raw)
    }

    /// Gives up ownership of the native callable. You are responsible for
    /// freeing it.
    #[inline]
    pub fn into_raw(self) -> sys::RawCallable {
        ManuallyDrop::new(self).0
    }

    /// Returns the native callable, still owned by `self`.
    #[inline]
    pub fn as_raw(&self) -> &sys::RawCallable {
        &self.0
    }

    /// Reads the target and method out of the native callable.
    #[inline]
    pub fn to_callable(&self) -> Callable {
        marshal::convert_callable_to_managed(self)
    }
}

impl Drop for NativeCallable {
    #[inline]
    fn drop(&mut self) {
        // SAFETY: The handle is valid and we own it, so it's our responsibility
        // to free it.
        unsafe { (sys::interface().callable_destroy)(&mut self.0) }
    }
}

/// A signal owned by the engine. Convert it with
/// [`to_signal`](Self::to_signal) to inspect it.
#[repr(transparent)]
pub struct NativeSignal(sys::RawSignal);

impl NativeSignal {
    /// Creates the engine's representation of the signal.
    #[inline]
    pub fn new(signal: &Signal) -> Self {
        marshal::convert_signal_to_native(signal)
    }

    /// Takes ownership of a native signal.
    ///
    /// # Safety
    ///
    /// The handle needs to be valid and must not be released by anyone else
    /// afterwards.
    #[inline]
    pub const unsafe fn from_raw(raw: sys::RawSignal) -> Self {
        Self(raw)
    }

    /// Gives up ownership of the native signal. You are responsible for
    /// freeing it.
    #[inline]
    pub fn into_raw(self) -> sys::RawSignal {
        ManuallyDrop::new(self).0
    }

    /// Returns the native signal, still owned by `self`.
    #[inline]
    pub fn as_raw(&self) -> &sys::RawSignal {
        &self.0
    }

    /// Reads the owner and name out of the native signal.
    #[inline]
    pub fn to_signal(&self) -> Signal {
        marshal::convert_signal_to_managed(self)
    }
}

impl Drop for NativeSignal {
    #[inline]
    fn drop(&mut self) {
        // SAFETY: The handle is valid and we own it, so it's our responsibility
        // to free it.
        unsafe { (sys::interface().signal_destroy)(&mut self.0) }
    }
}
