mod driver;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use driver::SessionDriver;
