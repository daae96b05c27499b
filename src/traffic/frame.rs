//! Frame and frame type definitions.
//!
//! All times are in nanoseconds and sizes in bytes.

use serde::Serialize;

/// Smallest Ethernet payload accepted for a frame
pub const MIN_FRAME_SIZE: u32 = 64;
/// Largest Ethernet payload accepted for a frame
pub const MAX_FRAME_SIZE: u32 = 1500;

/// Errors raised while describing or generating traffic
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrafficError {
    #[error("Percentage {value} is outside [0.0, 1.0]")]
    InvalidPercentage { value: f64 },

    #[error("{what} percentages add up to {sum}, expected 1.0")]
    PercentageSum { what: &'static str, sum: f64 },

    #[error("Period must be positive")]
    ZeroPeriod,

    #[error("Deadline {deadline} ns must be positive and not larger than the period {period} ns")]
    InvalidDeadline { deadline: u64, period: u64 },

    #[error("Frame type size must be positive")]
    ZeroSize,

    #[error("Frame size {size} is outside the Ethernet range [64, 1500] bytes")]
    FrameSize { size: u32 },

    #[error("End-to-end delay must be positive")]
    ZeroEndToEnd,

    #[error("A frame needs at least one receiver")]
    NoReceivers,

    #[error("Traffic needs at least two end systems, the topology has {available}")]
    NotEnoughEndSystems { available: usize },
}

/// A class of traffic: its share of all frames and its timing parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameType {
    percentage: f64,
    period: u64,
    deadline: u64,
    size: u32,
    starting_time: u64,
    end_to_end: u64,
}

impl FrameType {
    pub fn new(
        percentage: f64,
        period: u64,
        deadline: u64,
        size: u32,
        starting_time: u64,
        end_to_end: u64,
    ) -> Result<Self, TrafficError> {
        if !(0.0..=1.0).contains(&percentage) {
            return Err(TrafficError::InvalidPercentage { value: percentage });
        }
        if period == 0 {
            return Err(TrafficError::ZeroPeriod);
        }
        if deadline == 0 || deadline > period {
            return Err(TrafficError::InvalidDeadline { deadline, period });
        }
        if size == 0 {
            return Err(TrafficError::ZeroSize);
        }
        if end_to_end == 0 {
            return Err(TrafficError::ZeroEndToEnd);
        }
        Ok(Self { percentage, period, deadline, size, starting_time, end_to_end })
    }

    /// Share of generated frames of this type
    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    pub fn period(&self) -> u64 {
        self.period
    }

    pub fn deadline(&self) -> u64 {
        self.deadline
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn starting_time(&self) -> u64 {
        self.starting_time
    }

    pub fn end_to_end(&self) -> u64 {
        self.end_to_end
    }
}

/// A time-triggered frame from one sender to one or more receivers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    sender: usize,
    receivers: Vec<usize>,
    period: u64,
    deadline: u64,
    size: u32,
    starting_time: u64,
    end_to_end: u64,
}

impl Frame {
    /// Create a frame; a deadline of 0 means the deadline equals the period
    pub fn new(
        sender: usize,
        receivers: Vec<usize>,
        period: u64,
        deadline: u64,
        size: u32,
        starting_time: u64,
        end_to_end: u64,
    ) -> Result<Self, TrafficError> {
        if receivers.is_empty() {
            return Err(TrafficError::NoReceivers);
        }
        if period == 0 {
            return Err(TrafficError::ZeroPeriod);
        }
        if deadline > period {
            return Err(TrafficError::InvalidDeadline { deadline, period });
        }
        if !(MIN_FRAME_SIZE..=MAX_FRAME_SIZE).contains(&size) {
            return Err(TrafficError::FrameSize { size });
        }
        if end_to_end == 0 {
            return Err(TrafficError::ZeroEndToEnd);
        }
        let deadline = if deadline == 0 { period } else { deadline };
        Ok(Self { sender, receivers, period, deadline, size, starting_time, end_to_end })
    }

    /// Create a frame with the parameters of a frame type
    pub fn from_type(
        sender: usize,
        receivers: Vec<usize>,
        frame_type: &FrameType,
    ) -> Result<Self, TrafficError> {
        Self::new(
            sender,
            receivers,
            frame_type.period,
            frame_type.deadline,
            frame_type.size,
            frame_type.starting_time,
            frame_type.end_to_end,
        )
    }

    pub fn sender(&self) -> usize {
        self.sender
    }

    pub fn receivers(&self) -> &[usize] {
        &self.receivers
    }

    pub fn period(&self) -> u64 {
        self.period
    }

    pub fn deadline(&self) -> u64 {
        self.deadline
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn starting_time(&self) -> u64 {
        self.starting_time
    }

    pub fn end_to_end(&self) -> u64 {
        self.end_to_end
    }
}
