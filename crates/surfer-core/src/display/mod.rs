//! Display session: refresh policy applied to a driver handle.

pub mod errors;
pub mod session;

pub use errors::DisplayError;
pub use session::{DisplaySession, SessionState};
