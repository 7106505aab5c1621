//! Configuration constants for the quiz session engine
//!
//! This module contains the timing and sizing constraints used throughout
//! the session engine to ensure consistent boundaries between the countdown
//! logic, the submission protocol, and session configuration.

/// Session timing constants
pub mod session {
    /// Nominal duration of a single question in seconds
    pub const QUESTION_DURATION_SECONDS: u64 = 15;
    /// Minimum configurable question duration in seconds
    pub const MIN_QUESTION_DURATION: u64 = 5;
    /// Maximum configurable question duration in seconds
    pub const MAX_QUESTION_DURATION: u64 = 240;
}

/// Room code generation constants
pub mod room_code {
    /// Smallest value that prints as six decimal digits
    pub const MIN_VALUE: u32 = 100_000;
    /// Exclusive upper bound for generated room codes
    pub const MAX_VALUE: u32 = 1_000_000;
}
