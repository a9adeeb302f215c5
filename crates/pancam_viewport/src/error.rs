// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error type shared by the viewport and the player.

use crate::presentation::LayerId;

/// Errors raised by camera and navigation operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// An argument violated the operation's contract
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A frame reference did not resolve
    #[error("Frame not found: {0}")]
    NotFound(String),

    /// A layer reference did not resolve
    #[error("Layer not found: {0}")]
    LayerNotFound(LayerId),
}

/// Result type for viewport and navigation operations
pub type Result<T> = std::result::Result<T, Error>;
