//! Summary of a finished merge.

use std::{
    fmt::{self, Display},
    path::PathBuf,
};

use indexmap::IndexMap;

use crate::{blocks::Block, source::Source};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockCoverage {
    pub block: Block,
    pub requested: usize,
    pub covered: usize,
}

#[derive(Debug, Clone)]
pub struct MergeReport {
    pub output: PathBuf,
    pub glyph_count: u16,
    /// Target code points already mapped by the base font
    pub kept_by_base: usize,
    /// Code points supplied per donor, in prefer order
    pub assigned: IndexMap<Source, usize>,
    pub blocks: Vec<BlockCoverage>,
    pub unassigned: Vec<u32>,
    /// Base tables absent from the output
    pub dropped_tables: Vec<String>,
}

impl MergeReport {
    pub fn assigned_total(&self) -> usize {
        self.assigned.values().sum()
    }
}

impl Display for MergeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Output: {}", self.output.display())?;
        writeln!(f, "Glyphs: {}", self.glyph_count)?;
        writeln!(f, "Kept from base: {}", self.kept_by_base)?;
        for (source, count) in &self.assigned {
            writeln!(f, "Added from {source}: {count}")?;
        }
        for coverage in &self.blocks {
            let (name, covered, requested) =
                (coverage.block.name(), coverage.covered, coverage.requested);
            writeln!(f, "{name}: {covered}/{requested}")?;
        }
        if !self.dropped_tables.is_empty() {
            writeln!(f, "Dropped tables: {}", self.dropped_tables.join(", "))?;
        }
        write!(f, "Unassigned: {}", self.unassigned.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Region;

    #[test]
    fn test_summary() {
        let report = MergeReport {
            output: PathBuf::from("out/merged.ttf"),
            glyph_count: 1234,
            kept_by_base: 95,
            assigned: IndexMap::from([(Source::Region(Region::ZhCn), 1000)]),
            blocks: vec![BlockCoverage { block: Block::HanBasic, requested: 2000, covered: 1000 }],
            unassigned: vec![0x4E02],
            dropped_tables: vec!["vhea".to_string(), "vmtx".to_string()],
        };

        let summary = report.to_string();
        assert!(summary.starts_with("Output: out/merged.ttf\nGlyphs: 1234\n"));
        assert!(summary.contains("Added from zh-cn: 1000\n"));
        assert!(summary.contains("CJK Unified Ideographs: 1000/2000\n"));
        assert!(summary.contains("Dropped tables: vhea, vmtx\n"));
        assert!(summary.ends_with("Unassigned: 1"));
        assert_eq!(report.assigned_total(), 1000);
    }
}
