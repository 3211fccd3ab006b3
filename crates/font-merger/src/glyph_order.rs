//! Glyph names for the merged glyph order
//!
//! Names only matter when the base font carries a version 2 `post` table.
//! Donor glyphs are appended under their own names, renamed with a numeric
//! suffix ("uni4E00.1") when the base or an earlier donor already uses
//! the name.

use std::{
    borrow::Borrow,
    collections::HashMap,
    fmt::{Display, Formatter, Result},
    ops::Deref,
};

use font_types::Version16Dot16;
use read_fonts::{FontRef, TableProvider, types::GlyphId16};

/// A glyph name in the merged glyph order
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlyphName(String);

impl GlyphName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for GlyphName {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for GlyphName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for GlyphName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Display for GlyphName {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(&self.0)
    }
}

/// Read every glyph name from a font's `post` table.
///
/// Glyphs without a stored name get a synthetic `glyphNNNNN` name. Returns
/// `None` when the table is missing or is not version 2.0.
pub fn glyph_names(font: &FontRef) -> Option<Vec<GlyphName>> {
    let post = font.post().ok()?;
    if post.version() != Version16Dot16::VERSION_2_0 {
        return None;
    }
    let num_glyphs = font.maxp().ok()?.num_glyphs();

    Some(
        (0..num_glyphs)
            .map(|gid| {
                post.glyph_name(GlyphId16::new(gid))
                    .map(GlyphName::new)
                    .unwrap_or_else(|| GlyphName::new(format!("glyph{gid:05}")))
            })
            .collect(),
    )
}

/// Ordered, collision-free list of names for the merged font
#[derive(Debug, Default)]
pub struct MergedNames {
    names: Vec<GlyphName>,
    seen: HashMap<GlyphName, usize>,
}

impl MergedNames {
    /// Start from the base font's names, which are kept verbatim
    pub fn from_base(base: Vec<GlyphName>) -> Self {
        let mut merged = Self::default();
        for name in base {
            merged.seen.entry(name.clone()).or_insert(1);
            merged.names.push(name);
        }
        merged
    }

    /// Append a donor glyph name, renaming it if it is already taken
    pub fn push(&mut self, name: &GlyphName) {
        let unique = match self.seen.get(name.as_str()).copied() {
            None => name.clone(),
            Some(mut count) => loop {
                let candidate = GlyphName::new(format!("{name}.{count}"));
                count += 1;
                if !self.seen.contains_key(candidate.as_str()) {
                    self.seen.insert(name.clone(), count);
                    break candidate;
                }
            },
        };
        self.seen.entry(unique.clone()).or_insert(1);
        self.names.push(unique);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(GlyphName::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<GlyphName> {
        list.iter().copied().map(GlyphName::new).collect()
    }

    #[test]
    fn test_base_names_kept() {
        let merged = MergedNames::from_base(names(&[".notdef", "A", "B"]));
        assert_eq!(merged.iter().collect::<Vec<_>>(), [".notdef", "A", "B"]);
    }

    #[test]
    fn test_donor_names_disambiguated() {
        let mut merged = MergedNames::from_base(names(&[".notdef", "A", "A.1"]));
        merged.push(&GlyphName::new("A"));
        merged.push(&GlyphName::new("A"));
        merged.push(&GlyphName::new("uni4E00"));

        assert_eq!(
            merged.iter().collect::<Vec<_>>(),
            [".notdef", "A", "A.1", "A.2", "A.3", "uni4E00"]
        );
    }

    #[test]
    fn test_glyph_name_display() {
        assert_eq!(GlyphName::new("space").to_string(), "space");
        assert_eq!(GlyphName::new("space"), "space");
    }
}
