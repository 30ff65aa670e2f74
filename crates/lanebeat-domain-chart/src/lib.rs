pub mod json_import;
pub mod model;
pub mod timeline;

pub use json_import::*;
pub use model::*;
pub use timeline::*;
