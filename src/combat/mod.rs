//! Turn-based battle loop and its supporting types.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
