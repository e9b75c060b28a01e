//! Signature model and translation
//!
//! This module declares handler signatures, extracts parameter help from
//! doc blocks, holds caller overrides, and translates a signature into the
//! ordered parameter descriptors the flag emitter consumes.

pub mod descriptor;
pub mod doc;
pub mod overrides;
pub mod translate;
pub mod value;

// Re-export main types
pub use descriptor::*;
pub use doc::*;
pub use overrides::*;
pub use translate::*;
pub use value::*;
