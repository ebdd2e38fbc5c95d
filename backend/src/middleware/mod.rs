//! Request middleware.

pub mod throttle;
pub mod trace;

pub use throttle::{Throttle, ThrottlePolicy};
pub use trace::Trace;
