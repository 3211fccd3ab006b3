//! CJK merge core - block selection, donor assignment and the merge pipeline.

pub mod blocks;
pub mod corpus;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod plan;
pub mod prefer;
pub mod report;
pub mod request;
pub mod source;
pub mod validate;

pub use blocks::{ASCII_BASIC, Block, BlockSpec};
pub use error::{ConfigError, CoverageError, InputError};
pub use io::FontFile;
pub use pipeline::{DEFAULT_SUBFAMILY, merge};
pub use plan::{Assignment, Target};
pub use prefer::{DEFAULT_PREFER_ORDER, resolve_prefer_order};
pub use report::{BlockCoverage, MergeReport};
pub use request::MergeRequest;
pub use source::{Region, Source, SourceKinds};
