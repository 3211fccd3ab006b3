//! Append context and glyph plan
//!
//! - `GlyphPlan`: where each donor's glyphs land in the merged glyph order
//! - `DonorFont`: a parsed donor together with the code points it supplies
//! - `MergeContext`: the central context passed to all table mergers

use std::collections::BTreeSet;

use read_fonts::{FontRef, TableProvider};

use crate::{
    MergeError, Result,
    options::Options,
    types::{Codepoint, DonorIndex, GlyphId, MergedGlyphId},
};

/// Maximum number of glyphs a font can hold
pub const MAX_GLYPHS: usize = u16::MAX as usize;

/// Layout of the merged glyph order
///
/// Base glyphs keep their ids. Each donor's glyphs `1..n` follow in donor
/// order; donor `.notdef` (gid 0) is never copied and resolves to the base
/// `.notdef`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphPlan {
    base_glyphs: u16,
    donor_offsets: Vec<u16>,
    donor_glyphs: Vec<u16>,
    total: u16,
}

impl GlyphPlan {
    pub fn new(base_glyphs: u16, donor_glyphs: &[u16]) -> Result<Self> {
        let mut offsets = Vec::with_capacity(donor_glyphs.len());
        let mut next = base_glyphs as usize;

        for &count in donor_glyphs {
            offsets.push(next);
            next += count.saturating_sub(1) as usize;
        }

        if next > MAX_GLYPHS {
            return Err(MergeError::TooManyGlyphs { count: next });
        }

        Ok(Self {
            base_glyphs,
            donor_offsets: offsets.into_iter().map(|o| o as u16).collect(),
            donor_glyphs: donor_glyphs.to_vec(),
            total: next as u16,
        })
    }

    pub fn base_glyphs(&self) -> u16 {
        self.base_glyphs
    }

    pub fn total_glyphs(&self) -> u16 {
        self.total
    }

    pub fn donor_count(&self) -> usize {
        self.donor_glyphs.len()
    }

    /// Number of glyphs in a donor font, including its `.notdef`
    pub fn donor_glyphs(&self, donor: DonorIndex) -> u16 {
        self.donor_glyphs[donor.as_usize()]
    }

    /// Merged id of a donor glyph
    ///
    /// Returns `None` for ids past the end of the donor's glyph order.
    pub fn remap(&self, donor: DonorIndex, gid: GlyphId) -> Option<MergedGlyphId> {
        let idx = donor.as_usize();
        match gid.to_u16() {
            0 => Some(MergedGlyphId::new(0)),
            g if g < self.donor_glyphs[idx] => {
                Some(MergedGlyphId::new(self.donor_offsets[idx] + g - 1))
            }
            _ => None,
        }
    }

    /// Donor glyph ids that get copied, in merged order
    pub fn copied_glyphs(&self, donor: DonorIndex) -> impl Iterator<Item = GlyphId> {
        (1..self.donor_glyphs(donor)).map(GlyphId::new)
    }
}

/// A parsed donor font and the code points it is asked to supply
pub struct DonorFont<'a> {
    pub font: FontRef<'a>,
    pub codepoints: &'a BTreeSet<Codepoint>,
}

/// Central context for the append operation
pub struct MergeContext<'a> {
    base: &'a FontRef<'a>,
    donors: &'a [DonorFont<'a>],
    plan: GlyphPlan,
    options: &'a Options,
}

impl<'a> MergeContext<'a> {
    pub fn new(
        base: &'a FontRef<'a>,
        donors: &'a [DonorFont<'a>],
        options: &'a Options,
    ) -> Result<Self> {
        let base_glyphs = base.maxp()?.num_glyphs();
        let donor_glyphs = donors
            .iter()
            .map(|d| Ok(d.font.maxp()?.num_glyphs()))
            .collect::<Result<Vec<_>>>()?;
        let plan = GlyphPlan::new(base_glyphs, &donor_glyphs)?;

        Ok(Self { base, donors, plan, options })
    }

    pub fn base(&self) -> &FontRef<'a> {
        self.base
    }

    pub fn donors(&self) -> impl Iterator<Item = (DonorIndex, &DonorFont<'a>)> {
        self.donors.iter().enumerate().map(|(i, d)| (DonorIndex::new(i), d))
    }

    /// Donor fonts only, in order, for per-field strategies
    pub fn donor_fonts(&self) -> impl Iterator<Item = &FontRef<'a>> {
        self.donors.iter().map(|d| &d.font)
    }

    pub fn plan(&self) -> &GlyphPlan {
        &self.plan
    }

    pub fn total_glyphs(&self) -> u16 {
        self.plan.total_glyphs()
    }

    pub fn options(&self) -> &Options {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_appends_after_base() {
        let plan = GlyphPlan::new(10, &[4, 3]).unwrap();
        assert_eq!(plan.total_glyphs(), 10 + 3 + 2);

        let first = DonorIndex::new(0);
        let second = DonorIndex::new(1);
        assert_eq!(plan.remap(first, GlyphId::new(0)), Some(MergedGlyphId::new(0)));
        assert_eq!(plan.remap(first, GlyphId::new(1)), Some(MergedGlyphId::new(10)));
        assert_eq!(plan.remap(first, GlyphId::new(3)), Some(MergedGlyphId::new(12)));
        assert_eq!(plan.remap(first, GlyphId::new(4)), None);
        assert_eq!(plan.remap(second, GlyphId::new(1)), Some(MergedGlyphId::new(13)));
        assert_eq!(plan.remap(second, GlyphId::new(2)), Some(MergedGlyphId::new(14)));
    }

    #[test]
    fn test_plan_notdef_only_donor_adds_nothing() {
        let plan = GlyphPlan::new(5, &[1]).unwrap();
        assert_eq!(plan.total_glyphs(), 5);
        assert_eq!(plan.copied_glyphs(DonorIndex::new(0)).count(), 0);
    }

    #[test]
    fn test_plan_rejects_overflow() {
        let result = GlyphPlan::new(60000, &[6000]);
        assert!(matches!(result, Err(MergeError::TooManyGlyphs { count: 65999 })));
    }
}
