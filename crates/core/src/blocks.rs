//! Character block selectors.
//!
//! The table below is pure data: which code points a selector adds, which
//! source kinds may donate them, and which kinds must be supplied for the
//! selector to be usable.

use std::ops::RangeInclusive;

use crate::source::SourceKinds;

/// Printable ASCII, always part of the target and only donated by Latin fonts.
pub const ASCII_BASIC: RangeInclusive<u32> = 0x20..=0x7E;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Block {
    Latin1,
    CjkPunct,
    JpSyllabaries,
    Halfwidth,
    HanBasic,
}

#[derive(Debug, Clone, Copy)]
pub struct BlockSpec {
    pub block: Block,
    pub name: &'static str,
    pub flag: &'static str,
    /// Inclusive code point ranges
    pub ranges: &'static [(u32, u32)],
    pub eligible: SourceKinds,
    pub requires: SourceKinds,
}

impl BlockSpec {
    const fn new(
        block: Block,
        name: &'static str,
        flag: &'static str,
        ranges: &'static [(u32, u32)],
        eligible: SourceKinds,
        requires: SourceKinds,
    ) -> Self {
        Self { block, name, flag, ranges, eligible, requires }
    }
}

/// Selectors in processing order.
pub const BLOCKS: &[BlockSpec] = &[
    BlockSpec::new(
        Block::Latin1,
        "Latin-1 Supplement",
        "--add-latin1",
        &[(0x00A0, 0x00FF)],
        SourceKinds::ALL,
        SourceKinds::LATIN,
    ),
    BlockSpec::new(
        Block::CjkPunct,
        "CJK Symbols and Punctuation",
        "--add-cjk-punct",
        &[(0x3000, 0x303F)],
        SourceKinds::REGIONS,
        SourceKinds::REGIONS,
    ),
    BlockSpec::new(
        Block::JpSyllabaries,
        "Hiragana and Katakana",
        "--add-jp-syllabaries",
        &[(0x3040, 0x309F), (0x30A0, 0x30FF)],
        SourceKinds::REGIONS,
        SourceKinds::REGIONS,
    ),
    BlockSpec::new(
        Block::Halfwidth,
        "Halfwidth and Fullwidth Forms",
        "--add-halfwidth",
        &[(0xFF00, 0xFFEF)],
        SourceKinds::REGIONS,
        SourceKinds::REGIONS,
    ),
    BlockSpec::new(
        Block::HanBasic,
        "CJK Unified Ideographs",
        "--add-han-basic",
        &[(0x4E00, 0x9FFF), (0x3400, 0x4DBF), (0xF900, 0xFAFF)],
        SourceKinds::REGIONS,
        SourceKinds::CHINESE,
    ),
];

impl Block {
    pub const ALL: [Block; 5] =
        [Block::Latin1, Block::CjkPunct, Block::JpSyllabaries, Block::Halfwidth, Block::HanBasic];

    pub fn spec(self) -> &'static BlockSpec {
        // BLOCKS is declared in enum order
        &BLOCKS[self as usize]
    }

    pub fn flag(self) -> &'static str {
        self.spec().flag
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn codepoints(self) -> impl Iterator<Item = u32> {
        self.spec().ranges.iter().flat_map(|&(start, end)| start..=end)
    }

    pub fn contains(self, cp: u32) -> bool {
        self.spec().ranges.iter().any(|&(start, end)| (start..=end).contains(&cp))
    }

    /// The block whose ranges include `cp`, enabled or not.
    pub fn containing(cp: u32) -> Option<Block> {
        Block::ALL.into_iter().find(|block| block.contains(cp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_declared_in_enum_order() {
        for (i, spec) in BLOCKS.iter().enumerate() {
            assert_eq!(spec.block as usize, i);
            assert_eq!(spec.block.spec().flag, spec.flag);
        }
        assert_eq!(Block::ALL.len(), BLOCKS.len());
    }

    #[test]
    fn test_block_ranges() {
        assert_eq!(Block::Latin1.codepoints().count(), 0x60);
        assert_eq!(Block::JpSyllabaries.codepoints().count(), 0xC0);
        assert!(Block::HanBasic.contains(0x4E00));
        assert!(Block::HanBasic.contains(0x3400));
        assert!(Block::HanBasic.contains(0xFAFF));
        assert!(!Block::HanBasic.contains(0x3000));
        assert!(Block::CjkPunct.contains(0x3001));
    }

    #[test]
    fn test_cjk_blocks_exclude_latin_sources() {
        for block in [Block::CjkPunct, Block::JpSyllabaries, Block::Halfwidth, Block::HanBasic] {
            assert!(!block.spec().eligible.contains(SourceKinds::LATIN));
        }
        assert!(Block::Latin1.spec().eligible.contains(SourceKinds::LATIN));
    }

    #[test]
    fn test_han_requires_chinese() {
        let requires = Block::HanBasic.spec().requires;
        assert!(requires.contains(SourceKinds::ZH_TW));
        assert!(requires.contains(SourceKinds::ZH_CN));
        assert!(!requires.intersects(SourceKinds::JA | SourceKinds::KR));
    }

    #[test]
    fn test_block_containing() {
        assert_eq!(Block::containing(0x4E00), Some(Block::HanBasic));
        assert_eq!(Block::containing(0x30A2), Some(Block::JpSyllabaries));
        assert_eq!(Block::containing(0xE9), Some(Block::Latin1));
        assert_eq!(Block::containing(0x41), None);
        assert_eq!(Block::containing(0xAC00), None);
    }

    #[test]
    fn test_ascii_basic() {
        assert_eq!(ASCII_BASIC.count(), 95);
    }
}
