use std::result;

use read_fonts::ReadError;
use thiserror::Error;
use write_fonts::{BuilderError, error};

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("failed to read font: {0}")]
    ReadError(#[from] ReadError),

    #[error("failed to write font: {0}")]
    WriteError(#[from] error::Error),

    #[error("failed to build font: {0}")]
    BuilderError(#[from] BuilderError),

    #[error("fonts have incompatible unitsPerEm: expected {expected}, got {actual}")]
    IncompatibleUnitsPerEm { expected: u16, actual: u16 },

    #[error("{font} has no TrueType outlines (glyf/loca); CFF and CFF2 outlines cannot be merged")]
    UnsupportedOutlines { font: String },

    #[error("merged font would have {count} glyphs, more than the 65535 allowed")]
    TooManyGlyphs { count: usize },

    #[error("required table '{0}' not found")]
    MissingTable(&'static str),
}

pub type Result<T> = result::Result<T, MergeError>;
