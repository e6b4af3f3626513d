//! Arrays, dictionaries, callables and signals.

use core::ptr;

use crate::sys::{ObjectPtr, RawArray, RawCallable, RawDictionary, RawSignal, RawStringName, RawVariant};

use super::{text, variant};

type Elements = Vec<RawVariant>;
type Entries = Vec<(RawVariant, RawVariant)>;

pub(super) fn new_array(elements: Elements) -> RawArray {
    super::handle_allocated();
    RawArray(Box::into_raw(Box::new(elements)).cast())
}

/// Borrows the elements of an array. A null array is empty.
///
/// # Safety
///
/// The handle needs to be null or one of ours and not yet freed.
pub(super) unsafe fn elements<'a>(array: &RawArray) -> &'a [RawVariant] {
    if array.0.is_null() {
        &[]
    } else {
        &*array.0.cast::<Elements>()
    }
}

/// # Safety
///
/// Same as [`elements`].
pub(super) unsafe fn copy_array(array: &RawArray) -> RawArray {
    new_array(elements(array).iter().map(variant::copy).collect())
}

/// # Safety
///
/// Same as [`elements`]. The handle must not be used afterwards.
pub(super) unsafe fn free_array(array: RawArray) {
    if array.0.is_null() {
        return;
    }
    let mut elements = Box::from_raw(array.0.cast::<Elements>());
    for element in elements.iter_mut() {
        variant::destroy(element);
    }
    drop(elements);
    super::handle_released();
}

pub(super) fn new_dictionary(entries: Entries) -> RawDictionary {
    super::handle_allocated();
    RawDictionary(Box::into_raw(Box::new(entries)).cast())
}

/// Borrows the entries of a dictionary, in insertion order. A null dictionary
/// is empty.
///
/// # Safety
///
/// The handle needs to be null or one of ours and not yet freed.
pub(super) unsafe fn entries<'a>(dictionary: &RawDictionary) -> &'a [(RawVariant, RawVariant)] {
    if dictionary.0.is_null() {
        &[]
    } else {
        &*dictionary.0.cast::<Entries>()
    }
}

/// # Safety
///
/// Same as [`entries`].
pub(super) unsafe fn copy_dictionary(dictionary: &RawDictionary) -> RawDictionary {
    new_dictionary(
        entries(dictionary)
            .iter()
            .map(|(key, value)| (variant::copy(key), variant::copy(value)))
            .collect(),
    )
}

/// # Safety
///
/// Same as [`entries`]. The handle must not be used afterwards.
pub(super) unsafe fn free_dictionary(dictionary: RawDictionary) {
    if dictionary.0.is_null() {
        return;
    }
    let mut entries = Box::from_raw(dictionary.0.cast::<Entries>());
    for (key, value) in entries.iter_mut() {
        variant::destroy(key);
        variant::destroy(value);
    }
    drop(entries);
    super::handle_released();
}

pub(super) unsafe extern "C" fn array_new(dest: *mut RawArray) {
    dest.write(new_array(Vec::new()));
}

pub(super) unsafe extern "C" fn array_new_copy(dest: *mut RawArray, src: *const RawArray) {
    dest.write(copy_array(&*src));
}

pub(super) unsafe extern "C" fn array_destroy(array: *mut RawArray) {
    free_array(*array);
    (*array).0 = ptr::null_mut();
}

pub(super) unsafe extern "C" fn array_size(array: *const RawArray) -> i64 {
    elements(&*array).len() as i64
}

pub(super) unsafe extern "C" fn array_get(
    dest: *mut RawVariant,
    array: *const RawArray,
    index: i64,
) -> bool {
    let element = usize::try_from(index)
        .ok()
        .and_then(|index| elements(&*array).get(index));
    match element {
        Some(element) => {
            dest.write(variant::copy(element));
            true
        }
        None => {
            dest.write(RawVariant::NIL);
            false
        }
    }
}

pub(super) unsafe extern "C" fn array_push_back(array: *mut RawArray, value: *const RawVariant) {
    if (*array).0.is_null() {
        *array = new_array(Vec::new());
    }
    (*(*array).0.cast::<Elements>()).push(variant::copy(&*value));
}

pub(super) unsafe extern "C" fn dictionary_new(dest: *mut RawDictionary) {
    dest.write(new_dictionary(Vec::new()));
}

pub(super) unsafe extern "C" fn dictionary_new_copy(
    dest: *mut RawDictionary,
    src: *const RawDictionary,
) {
    dest.write(copy_dictionary(&*src));
}

pub(super) unsafe extern "C" fn dictionary_destroy(dictionary: *mut RawDictionary) {
    free_dictionary(*dictionary);
    (*dictionary).0 = ptr::null_mut();
}

pub(super) unsafe extern "C" fn dictionary_size(dictionary: *const RawDictionary) -> i64 {
    entries(&*dictionary).len() as i64
}

pub(super) unsafe extern "C" fn dictionary_set(
    dictionary: *mut RawDictionary,
    key: *const RawVariant,
    value: *const RawVariant,
) {
    if (*dictionary).0.is_null() {
        *dictionary = new_dictionary(Vec::new());
    }
    let entries = &mut *(*dictionary).0.cast::<Entries>();
    let value = variant::copy(&*value);
    match entries.iter_mut().find(|(k, _)| variant::equals(k, &*key)) {
        Some((_, old)) => {
            variant::destroy(old);
            *old = value;
        }
        None => entries.push((variant::copy(&*key), value)),
    }
}

pub(super) unsafe extern "C" fn dictionary_get(
    dest: *mut RawVariant,
    dictionary: *const RawDictionary,
    key: *const RawVariant,
) -> bool {
    match entries(&*dictionary)
        .iter()
        .find(|(k, _)| variant::equals(k, &*key))
    {
        Some((_, value)) => {
            dest.write(variant::copy(value));
            true
        }
        None => {
            dest.write(RawVariant::NIL);
            false
        }
    }
}

pub(super) unsafe extern "C" fn dictionary_keys(dest: *mut RawArray, dictionary: *const RawDictionary) {
    let keys = entries(&*dictionary)
        .iter()
        .map(|(key, _)| variant::copy(key))
        .collect();
    dest.write(new_array(keys));
}

pub(super) unsafe extern "C" fn callable_new(
    dest: *mut RawCallable,
    object: ObjectPtr,
    method: *const RawStringName,
) {
    dest.write(RawCallable {
        method: RawStringName(text::copy((*method).0)),
        object,
    });
}

pub(super) unsafe extern "C" fn callable_get_data(
    callable: *const RawCallable,
    object: *mut ObjectPtr,
    method: *mut RawStringName,
) {
    object.write((*callable).object);
    method.write(RawStringName(text::copy((*callable).method.0)));
}

pub(super) unsafe extern "C" fn callable_destroy(callable: *mut RawCallable) {
    text::free((*callable).method.0);
    callable.write(RawCallable {
        method: RawStringName(ptr::null_mut()),
        object: ObjectPtr::NULL,
    });
}

pub(super) unsafe extern "C" fn signal_new(
    dest: *mut RawSignal,
    owner: ObjectPtr,
    name: *const RawStringName,
) {
    dest.write(RawSignal {
        name: RawStringName(text::copy((*name).0)),
        owner,
    });
}

pub(super) unsafe extern "C" fn signal_get_data(
    signal: *const RawSignal,
    owner: *mut ObjectPtr,
    name: *mut RawStringName,
) {
    owner.write((*signal).owner);
    name.write(RawStringName(text::copy((*signal).name.0)));
}

pub(super) unsafe extern "C" fn signal_destroy(signal: *mut RawSignal) {
    text::free((*signal).name.0);
    signal.write(RawSignal {
        name: RawStringName(ptr::null_mut()),
        owner: ObjectPtr::NULL,
    });
}
