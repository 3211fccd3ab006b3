//! Error types for merge requests.
//!
//! The pipeline returns `anyhow::Error`; these types sit at its root so
//! callers can tell the classes apart with `downcast_ref`.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::blocks::Block;

/// The request cannot be satisfied with the supplied sources.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("at least one --latin font is required")]
    NoLatinFont,

    #[error("{flag} requires a {required} font")]
    MissingDonor { block: Block, flag: &'static str, required: String },

    #[error("prefer order {order:?} names no supplied font")]
    EmptyPreferOrder { order: String },

    #[error("invalid table tag {0:?}: tags are 1 to 4 ASCII characters")]
    InvalidTableTag(String),

    #[error("invalid corpus pattern {pattern:?}: {message}")]
    InvalidCorpusPattern { pattern: String, message: String },
}

/// An input file is missing, malformed, or incompatible with the others.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("cannot read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not a valid font: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: read_fonts::ReadError,
    },

    #[error("unitsPerEm mismatch: base font has {expected}, {} has {actual}", .path.display())]
    UnitsPerEmMismatch { path: PathBuf, expected: u16, actual: u16 },

    #[error(
        "{} has {kind} outlines; only TrueType (glyf) outlines are supported",
        .path.display()
    )]
    UnsupportedOutlines { path: PathBuf, kind: &'static str },
}

/// Target code points that no eligible source covers (strict mode only).
#[derive(Debug, Error)]
#[error(
    "{} target code point(s) have no eligible source, first: U+{:04X}",
    .missing.len(),
    .missing.first().copied().unwrap_or_default()
)]
pub struct CoverageError {
    pub missing: Vec<u32>,
}
