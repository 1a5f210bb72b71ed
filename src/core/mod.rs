//! Services, clock, and filesystem helpers shared by the CLI and library users.

pub mod clock;
pub mod services;
pub mod utils;

pub use clock::{Clock, FixedClock, SystemClock};
