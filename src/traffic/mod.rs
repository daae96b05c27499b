//! Time-triggered traffic.
//!
//! Frame value types and the random frame generator that fills a built
//! topology with traffic between its end systems.

pub mod frame;
pub mod generator;

pub use frame::{Frame, FrameType, TrafficError};
pub use generator::{generate_frames, ReceiverClass, ReceiverMix, ReceiverSelection, TrafficProfile};

/// Tolerance used when checking that percentages add up to 1.0
pub const PERCENTAGE_TOLERANCE: f64 = 1e-9;
