//! Defines the error types needed by the chess module
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Error type used by methods in the `chess` module
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// Cannot parse string
    ParseError,
    /// Failed to convert an integer to another type
    TryFromIntError,
    /// A board string places pieces beyond the last square
    BoardOverflow,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Error::*;

        match self {
            ParseError => "cannot parse string",
            TryFromIntError => "integer out of range",
            BoardOverflow => "board string runs past the last square",
        }.fmt(f)
    }
}

impl std::error::Error for Error { }

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Result type used by methods in the `chess` module
pub type Result<T> = std::result::Result<T, Error>;
