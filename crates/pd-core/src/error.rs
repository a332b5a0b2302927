//! Errors raised while configuring or generating a level
//!
//! Generation itself is total: repeated work and missed doors are reported
//! through return values, not errors. These variants cover construction
//! boundaries and the one unrecoverable level defect.

use thiserror::Error;

/// Level generation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenError {
    #[error("Distribution has total weight {total}, at least 1 is required")]
    InvalidDistribution { total: u32 },

    #[error("Grid coordinate ({x}, {y}) is outside the section grid")]
    OutOfGridBounds { x: i32, y: i32 },

    #[error("Frontier exhausted at progression {progression} without an exit")]
    FrontierExhausted { progression: u32 },

    #[error("Invalid generation config: {0}")]
    InvalidConfig(String),

    #[error("Could not read config '{path}': {reason}")]
    ConfigIo { path: String, reason: String },

    #[error("Could not parse config: {0}")]
    ConfigParse(String),
}

/// Result type for level generation operations
pub type GenResult<T> = Result<T, GenError>;
