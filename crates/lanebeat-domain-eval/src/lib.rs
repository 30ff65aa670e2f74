pub mod judge;
pub mod long_note;
pub mod registry;
pub mod score;
pub mod tier;

pub use judge::*;
pub use long_note::*;
pub use registry::*;
pub use score::*;
pub use tier::*;
