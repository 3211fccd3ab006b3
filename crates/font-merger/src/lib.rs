mod context;
mod error;
mod glyph_order;
mod merger;
mod options;
mod strategies;
mod tables;
mod types;

pub use context::{DonorFont, GlyphPlan, MAX_GLYPHS, MergeContext};
pub use error::{MergeError, Result};
pub use glyph_order::GlyphName;
pub use merger::{Donor, Merger};
pub use options::Options;
pub use tables::{cmap::cmap_mappings, glyf::has_glyf};
pub use types::{Codepoint, DonorIndex, GlyphId, MergedGlyphId, TableTag};

/// Append donor glyphs into a base font using default options.
///
/// This is a convenience wrapper around [`Merger`] for the common case
/// of merging with no dropped tables and an untouched timestamp.
///
/// # Example
///
/// ```no_run
/// use cjk_merge_font_merger::{Donor, merge_into};
///
/// let base = std::fs::read("latin.ttf").unwrap();
/// let donor = std::fs::read("cjk-subset.ttf").unwrap();
/// let merged = merge_into(&base, &[Donor::new(&donor, [0x4E00, 0x4E01])]).unwrap();
/// ```
pub fn merge_into(base: &[u8], donors: &[Donor]) -> Result<Vec<u8>> {
    Merger::default().merge(base, donors)
}
