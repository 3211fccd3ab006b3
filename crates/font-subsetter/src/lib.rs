//! Font subsetting wrapper around hb-subset with builder pattern.
//!
//! Donor fonts are cut down to the code points they were assigned plus the
//! glyphs those code points reach through composites, before their glyphs
//! are appended to the base font. It operates purely on byte slices with no
//! file I/O dependencies.
//!
//! # Example
//!
//! ```no_run
//! use cjk_merge_font_subsetter::Subsetter;
//!
//! let font_data: &[u8] = &[];
//! let subset = Subsetter::donor()
//!     .with_codepoints(['漢', '字'])
//!     .drop_tables([*b"vhea", *b"vmtx"])
//!     .subset(font_data);
//! ```

use anyhow::Result;
use hb_subset::{Blob, FontFace, SubsetInput, Tag};

/// Variable font tables to drop during subsetting.
///
/// These tables are specific to variable fonts and can be safely removed
/// when creating a static font subset.
pub const VF_TABLES_TO_DROP: &[&[u8; 4]] = &[
    b"HVAR", b"MVAR", b"STAT", b"avar", b"fvar", b"gvar", b"cvar",
];

/// Layout tables to drop from donors.
///
/// Donor glyphs are appended after the base glyphs, so donor layout lookups
/// would point at the wrong glyph ids. Only the base font's layout survives.
pub const DONOR_TABLES_TO_DROP: &[&[u8; 4]] = &[
    b"GSUB", b"GPOS", b"GDEF", b"BASE", b"JSTF", b"MATH", b"morx", b"kern",
];

/// Font subsetter with builder pattern.
///
/// Provides a flexible way to configure font subsetting options before
/// performing the subset operation.
#[derive(Default)]
pub struct Subsetter {
    codepoints: Vec<char>,
    drop_tables: Vec<[u8; 4]>,
    retain_glyph_names: bool,
}

impl Subsetter {
    /// Creates a new subsetter that keeps every table and no code points.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a subsetter pre-configured for donor fonts.
    ///
    /// This preset:
    /// - Drops [`DONOR_TABLES_TO_DROP`] and [`VF_TABLES_TO_DROP`]
    /// - Retains glyph names
    pub fn donor() -> Self {
        Self {
            codepoints: Vec::new(),
            drop_tables: DONOR_TABLES_TO_DROP
                .iter()
                .chain(VF_TABLES_TO_DROP)
                .map(|t| **t)
                .collect(),
            retain_glyph_names: true,
        }
    }

    /// Adds code points to include in the subset.
    pub fn with_codepoints(mut self, codepoints: impl IntoIterator<Item = char>) -> Self {
        self.codepoints.extend(codepoints);
        self
    }

    /// Adds tables to remove from the subset.
    pub fn drop_tables(mut self, tables: impl IntoIterator<Item = [u8; 4]>) -> Self {
        for table in tables {
            if !self.drop_tables.contains(&table) {
                self.drop_tables.push(table);
            }
        }
        self
    }

    /// Sets whether to retain glyph names in the subset.
    pub fn retain_glyph_names(mut self, retain: bool) -> Self {
        self.retain_glyph_names = retain;
        self
    }

    /// Subsets the font data and returns the result.
    ///
    /// Glyph ids are renumbered densely by hb-subset; `.notdef` stays at 0.
    pub fn subset(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut input = SubsetInput::new()?;

        if self.retain_glyph_names {
            input.flags().retain_glyph_names();
        }

        {
            let mut unicode_set = input.unicode_set();
            for c in &self.codepoints {
                unicode_set.insert(*c);
            }
        }

        {
            let mut drop_tables = input.drop_table_tag_set();
            for table in &self.drop_tables {
                drop_tables.insert(Tag::new(table));
            }
        }

        let font = FontFace::new(Blob::from_bytes(data)?)?;
        let subset_font = input.subset_font(&font)?;
        Ok(subset_font.underlying_blob().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_donor_preset() {
        let subsetter = Subsetter::donor();
        assert!(subsetter.retain_glyph_names);
        assert!(subsetter.drop_tables.contains(b"GSUB"));
        assert!(subsetter.drop_tables.contains(b"fvar"));
        assert_eq!(
            subsetter.drop_tables.len(),
            DONOR_TABLES_TO_DROP.len() + VF_TABLES_TO_DROP.len()
        );
    }

    #[test]
    fn test_builder_chain() {
        let subsetter = Subsetter::new()
            .with_codepoints(['A', '漢'])
            .with_codepoints(['字'])
            .drop_tables([*b"vhea", *b"vmtx"])
            .retain_glyph_names(true);

        assert!(subsetter.retain_glyph_names);
        assert_eq!(subsetter.codepoints, vec!['A', '漢', '字']);
        assert_eq!(subsetter.drop_tables, vec![*b"vhea", *b"vmtx"]);
    }

    #[test]
    fn test_drop_tables_deduplicated() {
        let subsetter = Subsetter::donor().drop_tables([*b"GSUB", *b"DSIG"]);
        let gsub = subsetter.drop_tables.iter().filter(|t| *t == b"GSUB").count();
        assert_eq!(gsub, 1);
        assert!(subsetter.drop_tables.contains(b"DSIG"));
    }
}
