//! CLI construction and dispatch
//!
//! This module registers translated parameters with clap, binds parsed
//! values back into handler calls, and routes to the selected command.

pub mod app;
pub mod bind;
pub mod emit;
pub mod scope;

// Re-export main types
pub use app::*;
pub use bind::*;
pub use emit::*;
pub use scope::*;
