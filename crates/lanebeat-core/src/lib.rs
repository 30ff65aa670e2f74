pub mod app;
pub mod clock;
pub mod diagnostics;
pub mod input;
pub mod ipc;
pub mod transport;

pub use app::*;
pub use clock::*;
pub use diagnostics::*;
pub use input::*;
pub use ipc::*;
pub use transport::*;
