//! Options for glyph appending

use read_fonts::types::Tag;

use crate::types::TableTag;

/// Options for glyph appending
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Tables to drop from the merged font
    pub drop_tables: Vec<TableTag>,

    /// Stamp `head.modified` with the current time
    pub recalc_timestamp: bool,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tables to drop (accepts any iterable of string-like values)
    ///
    /// Entries that are not valid tags are ignored.
    pub fn drop_tables(mut self, tables: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        self.drop_tables = tables
            .into_iter()
            .filter_map(|s| TableTag::parse(s.as_ref()))
            .collect();
        self
    }

    /// Add a single table to drop
    pub fn drop_table(mut self, table: impl AsRef<str>) -> Self {
        if let Some(tag) = TableTag::parse(table.as_ref()) {
            self.drop_tables.push(tag);
        }
        self
    }

    pub fn recalc_timestamp(mut self, recalc: bool) -> Self {
        self.recalc_timestamp = recalc;
        self
    }

    /// Check if a table should be dropped
    pub fn should_drop(&self, tag: &TableTag) -> bool {
        self.drop_tables.contains(tag)
    }

    /// Check if a table should be dropped (by Tag)
    pub fn should_drop_tag(&self, tag: Tag) -> bool {
        self.should_drop(&tag.into())
    }
}
