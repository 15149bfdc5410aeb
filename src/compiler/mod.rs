pub mod script;
pub mod fragment;
pub mod reducer;
pub mod chart;
pub mod summary;

pub use fragment::*;
pub use reducer::*;
pub use chart::*;
pub use summary::*;
