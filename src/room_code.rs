//! Room code generation and management
//!
//! This module provides functionality for generating and managing the short
//! join codes that identify quiz rooms. Room codes are six-digit decimal
//! numbers so they are easy to read out and type on a phone keypad.

use std::{fmt::Display, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::room_code::{MAX_VALUE, MIN_VALUE};

/// A short join code identifying a quiz room
///
/// Codes are generated randomly within a range that always displays as six
/// decimal digits. On the wire the code travels as a string, matching how
/// participants see and share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoomCode(u32);

impl RoomCode {
    /// Creates a new random room code
    ///
    /// Used by embeddings that stand in for the server (fixtures, mock
    /// backends); a real session receives its code from the server.
    pub fn generate() -> Self {
        Self(fastrand::u32(MIN_VALUE..MAX_VALUE))
    }
}

impl Display for RoomCode {
    /// Formats the room code as a zero-padded six-digit decimal number
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:06}", self.0)
    }
}

impl Serialize for RoomCode {
    /// Serializes the room code as a decimal string
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for RoomCode {
    /// Deserializes a room code from a decimal string
    fn deserialize<D>(deserializer: D) -> Result<RoomCode, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RoomCode::from_str(&s).map_err(|e| serde::de::Error::custom(e.to_string()))
    }
}

impl FromStr for RoomCode {
    type Err = ParseIntError;

    /// Parses a room code from its decimal string representation
    ///
    /// # Errors
    ///
    /// Returns a `ParseIntError` if the string cannot be parsed as a valid
    /// decimal number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_room_code_generate_in_range() {
        for _ in 0..100 {
            let code = RoomCode::generate();
            assert!(code.0 >= MIN_VALUE);
            assert!(code.0 < MAX_VALUE);
        }
    }

    #[test]
    fn test_room_code_display_format() {
        let code = RoomCode(MIN_VALUE);
        assert_eq!(code.to_string(), "100000");

        let code = RoomCode(MIN_VALUE + 1);
        assert_eq!(code.to_string(), "100001");

        let code = RoomCode(MAX_VALUE - 1);
        assert_eq!(code.to_string(), "999999");
    }

    #[test]
    fn test_room_code_from_str() {
        let code = RoomCode::from_str("100000").unwrap();
        assert_eq!(code.0, MIN_VALUE);

        let code = RoomCode::from_str("123456").unwrap();
        assert_eq!(code.0, 123_456);
    }

    #[test]
    fn test_room_code_from_str_invalid() {
        assert!(RoomCode::from_str("invalid").is_err());
        assert!(RoomCode::from_str("12 34").is_err());
        assert!(RoomCode::from_str("").is_err());
    }

    #[test]
    fn test_room_code_serialization() {
        let code = RoomCode(123_456);
        let serialized = serde_json::to_string(&code).unwrap();
        assert_eq!(serialized, "\"123456\"");

        let deserialized: RoomCode = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, code);
    }

    #[test]
    fn test_room_code_deserialization_error() {
        // Number instead of string
        let result: Result<RoomCode, _> = serde_json::from_str("123456");
        assert!(result.is_err());

        // Non-decimal content
        let result: Result<RoomCode, _> = serde_json::from_str("\"12a456\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_room_code_round_trip() {
        let code = RoomCode::generate();
        let parsed = RoomCode::from_str(&code.to_string()).unwrap();
        assert_eq!(parsed, code);
    }
}
