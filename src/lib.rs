//! Marshaling between Rust values and the engine's `Variant`.
//!
//! The engine hands over its function table once through [`sys::load`]. After
//! that, [`encode`] turns host values into [`Variant`]s and [`decode`] turns
//! them back, coercing through the engine whenever the types don't match.
//! Every native handle that is created along the way is owned by a guard and
//! released exactly once.
//!
//! With the `headless` feature (on by default), [`headless::install`] loads a
//! backend written in Rust instead, so values can be marshaled without a
//! running engine.

#![warn(missing_docs)]

pub mod builtin;
pub mod decode;
pub mod encode;
pub mod marshal;
pub mod math;
pub mod sys;
mod variant;

#[cfg(feature = "headless")]
pub mod headless;

pub use self::{
    decode::FromVariant,
    sys::{InterfaceError, INTERFACE_VERSION},
    variant::*,
};
