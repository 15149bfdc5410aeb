pub mod templates;
pub mod resources;
pub mod assembler;
pub mod artifacts;

pub use resources::*;
pub use assembler::*;
pub use artifacts::*;
