//! CLI definitions and request construction.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::debug;

use cjk_merge_core::{Block, MergeRequest, Region, merge};

#[derive(Debug, Parser)]
#[command(name = "merge-cjk-font")]
#[command(about = "Merge CJK glyphs from regional donor fonts into a Latin TrueType font")]
pub struct Cli {
    /// Latin fonts; the first is the base, later ones are Latin donors
    #[arg(long, required = true, num_args = 1..)]
    pub latin: Vec<PathBuf>,
    /// Traditional Chinese donor
    #[arg(long)]
    pub zh_tw: Option<PathBuf>,
    /// Simplified Chinese donor
    #[arg(long)]
    pub zh_cn: Option<PathBuf>,
    /// Japanese donor
    #[arg(long)]
    pub ja: Option<PathBuf>,
    /// Korean donor
    #[arg(long)]
    pub kr: Option<PathBuf>,

    /// Add Latin-1 Supplement (U+00A0-00FF)
    #[arg(long)]
    pub add_latin1: bool,
    /// Add CJK Symbols and Punctuation (U+3000-303F)
    #[arg(long)]
    pub add_cjk_punct: bool,
    /// Add Hiragana and Katakana (U+3040-30FF)
    #[arg(long)]
    pub add_jp_syllabaries: bool,
    /// Add Halfwidth and Fullwidth Forms (U+FF00-FFEF)
    #[arg(long)]
    pub add_halfwidth: bool,
    /// Add CJK Unified Ideographs, Extension A and Compatibility Ideographs
    #[arg(long)]
    pub add_han_basic: bool,

    /// Text files or glob patterns whose characters join the target set
    #[arg(long, num_args = 1..)]
    pub corpus: Vec<String>,
    /// Comma-separated donor priority, e.g. "latin,ja,zh-tw"
    #[arg(long)]
    pub prefer_order: Option<String>,
    /// Tables to remove from the output, space- or comma-separated
    #[arg(long, num_args = 1..)]
    pub drop_tables: Vec<String>,

    /// Family name for the merged font
    #[arg(long)]
    pub out_name: Option<String>,
    /// Subfamily name used with --out-name
    #[arg(long, requires = "out_name")]
    pub out_subfamily: Option<String>,
    /// Fail when a target code point has no eligible source
    #[arg(long)]
    pub strict: bool,
    /// Output font path
    #[arg(long)]
    pub out: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    fn blocks(&self) -> impl Iterator<Item = Block> + '_ {
        let enabled = [
            (Block::Latin1, self.add_latin1),
            (Block::CjkPunct, self.add_cjk_punct),
            (Block::JpSyllabaries, self.add_jp_syllabaries),
            (Block::Halfwidth, self.add_halfwidth),
            (Block::HanBasic, self.add_han_basic),
        ];
        enabled.into_iter().filter_map(|(block, on)| on.then_some(block))
    }

    pub fn request(&self) -> MergeRequest {
        let regions = [
            (Region::ZhTw, &self.zh_tw),
            (Region::ZhCn, &self.zh_cn),
            (Region::Ja, &self.ja),
            (Region::Kr, &self.kr),
        ];
        let mut request = MergeRequest {
            latin: self.latin.clone(),
            output: self.out.clone(),
            prefer_order: self.prefer_order.clone(),
            strict: self.strict,
            ..Default::default()
        }
        .blocks(self.blocks())
        .corpus(self.corpus.iter().cloned())
        .drop_tables(self.drop_tables.iter().cloned());

        for (region, path) in regions {
            if let Some(path) = path {
                request = request.region(region, path);
            }
        }
        if let Some(family) = &self.out_name {
            request = request.rename(family, self.out_subfamily.clone());
        }
        request
    }

    pub fn run(&self) -> Result<()> {
        let request = self.request();
        debug!("{request:?}");
        let report = merge(&request)?;
        println!("{report}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cjk_merge_core::Source;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("merge-cjk-font").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_full_command_line() {
        let cli = parse(&[
            "--latin", "base.ttf", "extra.ttf",
            "--zh-cn", "cn.ttf",
            "--ja", "ja.ttf",
            "--add-latin1", "--add-han-basic",
            "--drop-tables", "vhea", "vmtx,DSIG",
            "--prefer-order", "latin,ja,zh-cn",
            "--out-name", "Merged Sans",
            "--out-subfamily", "Bold",
            "--strict",
            "--out", "out/merged.ttf",
        ]);
        let request = cli.request();

        assert_eq!(request.latin, vec![PathBuf::from("base.ttf"), PathBuf::from("extra.ttf")]);
        assert_eq!(request.regions.get(&Region::ZhCn), Some(&PathBuf::from("cn.ttf")));
        assert_eq!(request.regions.get(&Region::Ja), Some(&PathBuf::from("ja.ttf")));
        assert!(!request.regions.contains_key(&Region::Kr));
        let blocks: Vec<Block> = request.blocks.iter().copied().collect();
        assert_eq!(blocks, vec![Block::Latin1, Block::HanBasic]);
        assert_eq!(request.drop_tables, vec!["vhea", "vmtx,DSIG"]);
        assert_eq!(request.prefer_order.as_deref(), Some("latin,ja,zh-cn"));
        assert_eq!(request.family.as_deref(), Some("Merged Sans"));
        assert_eq!(request.subfamily.as_deref(), Some("Bold"));
        assert!(request.strict);
        assert_eq!(request.output, PathBuf::from("out/merged.ttf"));
        assert_eq!(request.sources()[1].0, Source::Latin(1));
    }

    #[test]
    fn test_minimal_command_line() {
        let cli = parse(&["--latin", "base.ttf", "--out", "merged.ttf"]);
        let request = cli.request();

        assert!(request.blocks.is_empty());
        assert!(request.regions.is_empty());
        assert!(request.family.is_none());
        assert!(!request.strict);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_latin_and_out_are_required() {
        assert!(Cli::try_parse_from(["merge-cjk-font", "--out", "merged.ttf"]).is_err());
        assert!(Cli::try_parse_from(["merge-cjk-font", "--latin", "base.ttf"]).is_err());
    }

    #[test]
    fn test_subfamily_requires_name() {
        let result = Cli::try_parse_from([
            "merge-cjk-font",
            "--latin",
            "base.ttf",
            "--out-subfamily",
            "Bold",
            "--out",
            "merged.ttf",
        ]);
        assert!(result.is_err());
    }
}
