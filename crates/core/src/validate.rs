//! Loading and compatibility checks for input fonts.

use std::{
    collections::BTreeSet,
    fs::read,
    path::{Path, PathBuf},
};

use anyhow::Context;
use cjk_merge_font_merger::{cmap_mappings, has_glyf};
use log::warn;
use read_fonts::{FontRef, TableProvider, types::Tag};

use crate::{error::InputError, source::Source};

/// A source font read into memory.
#[derive(Debug, Clone)]
pub struct LoadedFont {
    pub source: Source,
    pub path: PathBuf,
    pub data: Vec<u8>,
}

impl LoadedFont {
    /// Read a font file and check that it parses.
    pub fn load(source: Source, path: &Path) -> Result<Self, InputError> {
        let data = read(path)
            .map_err(|source| InputError::Unreadable { path: path.to_path_buf(), source })?;
        FontRef::new(&data)
            .map_err(|source| InputError::Parse { path: path.to_path_buf(), source })?;
        Ok(Self { source, path: path.to_path_buf(), data })
    }

    pub fn font(&self) -> Result<FontRef<'_>, InputError> {
        FontRef::new(&self.data).map_err(|source| self.parse_error(source))
    }

    /// Code points mapped by the font's cmap.
    pub fn coverage(&self) -> anyhow::Result<BTreeSet<u32>> {
        let font = self.font()?;
        let mappings = cmap_mappings(&font)
            .with_context(|| format!("Failed to read cmap: {}", self.path.display()))?;
        Ok(mappings.keys().map(|cp| cp.to_u32()).collect())
    }

    fn units_per_em(&self) -> Result<u16, InputError> {
        Ok(self.font()?.head().map_err(|source| self.parse_error(source))?.units_per_em())
    }

    fn parse_error(&self, source: read_fonts::ReadError) -> InputError {
        InputError::Parse { path: self.path.clone(), source }
    }
}

/// Outline format of a font, as far as merging is concerned.
fn outline_kind(font: &FontRef) -> Option<&'static str> {
    let has_cff = font.table_data(Tag::new(b"CFF ")).is_some();
    let has_cff2 = font.table_data(Tag::new(b"CFF2")).is_some();
    match (has_glyf(font), has_cff || has_cff2) {
        (true, false) => None,
        (true, true) => Some("mixed glyf/CFF"),
        (false, _) if has_cff2 => Some("CFF2"),
        (false, _) if has_cff => Some("CFF"),
        (false, _) => Some("no"),
    }
}

/// Check that the base and every donor can be merged.
///
/// `fonts` must start with the base. All fonts must share the base's
/// unitsPerEm and carry TrueType outlines. Variable fonts only warn.
pub fn validate_fonts(fonts: &[&LoadedFont]) -> Result<(), InputError> {
    let Some(base) = fonts.first() else {
        return Ok(());
    };
    let expected = base.units_per_em()?;

    for loaded in fonts {
        let font = loaded.font()?;

        let actual = loaded.units_per_em()?;
        if actual != expected {
            return Err(InputError::UnitsPerEmMismatch {
                path: loaded.path.clone(),
                expected,
                actual,
            });
        }

        if let Some(kind) = outline_kind(&font) {
            return Err(InputError::UnsupportedOutlines { path: loaded.path.clone(), kind });
        }

        if font.table_data(Tag::new(b"fvar")).is_some() {
            warn!(
                "{} ({}) is a variable font; only its default instance is merged. \
                 Instancing it first is recommended.",
                loaded.path.display(),
                loaded.source
            );
        }
    }

    Ok(())
}
