//! Host wrappers for the engine's built-in types that are backed by native
//! handles. Every wrapper owns its handle: dropping it releases the handle
//! and cloning it copies the handle through the engine.

mod array;
mod callable;
mod dictionary;
mod gstring;
mod node_path;
mod object;
mod packed_array;
mod string_name;

pub use array::*;
pub use callable::*;
pub use dictionary::*;
pub use gstring::*;
pub use node_path::*;
pub use object::*;
pub use packed_array::*;
pub use string_name::*;
