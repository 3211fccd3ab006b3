//! Merge request: every input the pipeline needs.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
};

use crate::{
    blocks::Block,
    source::{Region, Source, SourceKinds},
};

#[derive(Debug, Clone, Default)]
pub struct MergeRequest {
    /// Latin fonts; the first one is the base
    pub latin: Vec<PathBuf>,
    pub regions: BTreeMap<Region, PathBuf>,
    pub blocks: BTreeSet<Block>,
    pub drop_tables: Vec<String>,
    pub output: PathBuf,
    /// Corpus files or glob patterns
    pub corpus: Vec<String>,
    /// Comma-separated source tokens; `None` uses the default order
    pub prefer_order: Option<String>,
    pub family: Option<String>,
    pub subfamily: Option<String>,
    /// Fail instead of warning when target code points stay unassigned
    pub strict: bool,
}

impl MergeRequest {
    pub fn new(base: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self { latin: vec![base.into()], output: output.into(), ..Default::default() }
    }

    pub fn latin(mut self, path: impl Into<PathBuf>) -> Self {
        self.latin.push(path.into());
        self
    }

    pub fn region(mut self, region: Region, path: impl Into<PathBuf>) -> Self {
        self.regions.insert(region, path.into());
        self
    }

    pub fn block(mut self, block: Block) -> Self {
        self.blocks.insert(block);
        self
    }

    pub fn blocks(mut self, blocks: impl IntoIterator<Item = Block>) -> Self {
        self.blocks.extend(blocks);
        self
    }

    pub fn drop_tables(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.drop_tables.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn corpus(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.corpus.extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn prefer_order(mut self, order: impl Into<String>) -> Self {
        self.prefer_order = Some(order.into());
        self
    }

    pub fn rename(mut self, family: impl Into<String>, subfamily: Option<String>) -> Self {
        self.family = Some(family.into());
        self.subfamily = subfamily;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Every supplied source with its path: Latin fonts first, then regions.
    pub fn sources(&self) -> Vec<(Source, &Path)> {
        let latin = self.latin.iter().enumerate().map(|(i, p)| (Source::Latin(i), p.as_path()));
        let regions = self.regions.iter().map(|(r, p)| (Source::Region(*r), p.as_path()));
        latin.chain(regions).collect()
    }

    /// Kinds of every supplied source.
    pub fn supplied_kinds(&self) -> SourceKinds {
        self.sources().iter().map(|(s, _)| s.kind()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_in_order() {
        let request = MergeRequest::new("base.ttf", "out.ttf")
            .latin("extra.ttf")
            .region(Region::Ja, "ja.otf")
            .region(Region::ZhTw, "tw.ttf");

        let sources: Vec<Source> = request.sources().into_iter().map(|(s, _)| s).collect();
        assert_eq!(
            sources,
            vec![
                Source::Latin(0),
                Source::Latin(1),
                Source::Region(Region::ZhTw),
                Source::Region(Region::Ja),
            ]
        );
        let expected = SourceKinds::LATIN | SourceKinds::ZH_TW | SourceKinds::JA;
        assert_eq!(request.supplied_kinds(), expected);
    }

    #[test]
    fn test_builder() {
        let request = MergeRequest::new("base.ttf", "out.ttf")
            .blocks([Block::HanBasic, Block::Latin1])
            .block(Block::HanBasic)
            .drop_tables(["vhea", "vmtx"])
            .rename("Merged", None)
            .strict(true);

        assert_eq!(request.blocks.len(), 2);
        assert_eq!(request.drop_tables, vec!["vhea", "vmtx"]);
        assert_eq!(request.family.as_deref(), Some("Merged"));
        assert!(request.subfamily.is_none());
        assert!(request.strict);
    }
}
