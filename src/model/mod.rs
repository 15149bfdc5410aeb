pub mod value;
pub mod dataset;
pub mod chart;
pub mod index;

pub use value::*;
pub use dataset::*;
pub use chart::*;
pub use index::*;
