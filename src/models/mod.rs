pub mod event;
pub mod call_log;
pub mod session;
pub mod integration;
pub mod debug_log;

pub use event::*;
pub use call_log::*;
pub use session::*;
pub use integration::*;
pub use debug_log::*;
