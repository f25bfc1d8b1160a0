//! Core domain types for Reversi.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// A cell marker: empty, or one of the two player colors.
///
/// Dark moves first. The numeric codes (0 = empty, 1 = dark, 2 = light)
/// are the storage and wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Disc {
    /// No disc on the cell.
    Empty,
    /// Dark disc (moves first).
    Dark,
    /// Light disc.
    Light,
}

impl Disc {
    /// Returns the numeric code used in storage and on the wire.
    pub fn code(self) -> i32 {
        match self {
            Disc::Empty => 0,
            Disc::Dark => 1,
            Disc::Light => 2,
        }
    }

    /// Parses a numeric code.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidDiscError`] if the code is not 0, 1, or 2.
    pub fn from_code(code: i32) -> Result<Self, InvalidDiscError> {
        match code {
            0 => Ok(Disc::Empty),
            1 => Ok(Disc::Dark),
            2 => Ok(Disc::Light),
            _ => Err(InvalidDiscError { code }),
        }
    }

    /// Returns the opposing color. `Empty` has no opponent and maps to itself.
    pub fn opponent(self) -> Self {
        match self {
            Disc::Dark => Disc::Light,
            Disc::Light => Disc::Dark,
            Disc::Empty => Disc::Empty,
        }
    }

    /// Whether this is a playable color (dark or light).
    pub fn is_player(self) -> bool {
        matches!(self, Disc::Dark | Disc::Light)
    }
}

/// Error raised when parsing an unknown disc code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("invalid disc code: {code} (expected 0, 1, or 2)")]
pub struct InvalidDiscError {
    /// The offending code.
    pub code: i32,
}

/// A disc placed at a board coordinate. Coordinates are 0-indexed,
/// x = column, y = row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// The color placed.
    pub disc: Disc,
    /// Column, 0-7.
    pub x: usize,
    /// Row, 0-7.
    pub y: usize,
}
