//! Shared constants and timing primitives.

pub mod clock;
pub mod constants;
pub mod timing;

pub use clock::{Clock, ManualClock, SystemClock};
pub use constants::*;
pub use timing::{Cadence, ExpiryQueue};
