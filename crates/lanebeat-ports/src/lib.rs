pub mod input;
pub mod playback;
pub mod storage;
pub mod types;

pub use input::*;
pub use playback::*;
pub use storage::*;
pub use types::*;
