mod variant;
mod variant_type;

pub use variant::*;
pub use variant_type::*;
