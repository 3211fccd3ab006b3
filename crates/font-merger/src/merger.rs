//! Main Merger implementation

use std::collections::{BTreeSet, HashSet};

use log::{debug, info};
use read_fonts::{FontRef, TableProvider, types::Tag};
use write_fonts::FontBuilder;

use crate::{
    MergeError, Result,
    context::{DonorFont, MergeContext},
    options::Options,
    tables::{
        cmap::merge_cmap, glyf::has_glyf, glyf::merge_glyf, head::merge_head, hhea::merge_hhea,
        hmtx::merge_hmtx, maxp::merge_maxp, os2::merge_os2, post::merge_post,
        vmtx::merge_vertical,
    },
    types::Codepoint,
};

/// Tables rebuilt from the merged glyph order
const HANDLED_TABLES: &[[u8; 4]] = &[
    *b"head", *b"maxp", *b"cmap", *b"hmtx", *b"hhea", *b"post", *b"OS/2", *b"vhea", *b"vmtx",
    *b"glyf", *b"loca",
];

/// Base tables indexed by glyph id that become invalid once glyphs are appended
const GLYPH_INDEXED_TABLES: &[[u8; 4]] =
    &[*b"hdmx", *b"LTSH", *b"VDMX", *b"gvar", *b"HVAR", *b"VVAR", *b"DSIG"];

/// A donor font and the code points it supplies
#[derive(Debug, Clone)]
pub struct Donor<'a> {
    pub data: &'a [u8],
    pub codepoints: BTreeSet<Codepoint>,
}

impl<'a> Donor<'a> {
    pub fn new(data: &'a [u8], codepoints: impl IntoIterator<Item = u32>) -> Self {
        Self { data, codepoints: codepoints.into_iter().map(Codepoint::new).collect() }
    }
}

/// Appends donor glyphs into a base font
///
/// The base font provides the output's structure: its glyphs keep their ids,
/// its cmap entries are never replaced, and every table the merger does not
/// rebuild is copied from it unchanged.
#[derive(Default)]
pub struct Merger {
    options: Options,
}

impl Merger {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    /// Merge donor glyphs into the base font
    pub fn merge(&self, base: &[u8], donors: &[Donor]) -> Result<Vec<u8>> {
        let base = FontRef::new(base)?;
        let donors: Vec<DonorFont> = donors
            .iter()
            .map(|d| Ok(DonorFont { font: FontRef::new(d.data)?, codepoints: &d.codepoints }))
            .collect::<Result<_>>()?;

        self.merge_fonts(&base, &donors)
    }

    /// Merge already parsed fonts
    pub fn merge_fonts(&self, base: &FontRef, donors: &[DonorFont]) -> Result<Vec<u8>> {
        validate_units_per_em(base, donors)?;
        validate_outlines(base, donors)?;

        let ctx = MergeContext::new(base, donors, &self.options)?;
        info!(
            "Appending glyphs from {} donor(s): {} base glyphs, {} total",
            donors.len(),
            ctx.plan().base_glyphs(),
            ctx.total_glyphs()
        );

        let (glyf, loca, loca_format) = merge_glyf(&ctx)?;
        let (cmap, mappings) = merge_cmap(&ctx)?;
        let head = merge_head(&ctx, loca_format)?;
        let maxp = merge_maxp(&ctx)?;
        let hhea = merge_hhea(&ctx)?;
        let hmtx = merge_hmtx(&ctx)?;
        let post = merge_post(&ctx)?;
        let os2 = merge_os2(&ctx, &mappings)?;
        let vertical = merge_vertical(&ctx)?;

        let mut builder = FontBuilder::new();
        self.add_table(&mut builder, &head)?;
        self.add_table(&mut builder, &maxp)?;
        self.add_table(&mut builder, &cmap)?;
        self.add_table(&mut builder, &hhea)?;
        self.add_table(&mut builder, &hmtx)?;
        self.add_table(&mut builder, &post)?;
        self.add_table(&mut builder, &glyf)?;
        self.add_table(&mut builder, &loca)?;
        if let Some(os2) = os2 {
            self.add_table(&mut builder, &os2)?;
        }
        if let Some((vhea, vmtx)) = vertical {
            self.add_table(&mut builder, &vhea)?;
            self.add_table(&mut builder, &vmtx)?;
        }

        self.copy_other_tables(&mut builder, base);

        Ok(builder.build())
    }

    fn add_table<T>(&self, builder: &mut FontBuilder, table: &T) -> Result<()>
    where
        T: write_fonts::validate::Validate + write_fonts::FontWrite + read_fonts::TopLevelTable,
    {
        if self.options.should_drop_tag(T::TAG) {
            info!("Dropping table: {}", T::TAG);
        } else {
            builder.add_table(table)?;
        }
        Ok(())
    }

    fn copy_other_tables(&self, builder: &mut FontBuilder, base: &FontRef) {
        let handled: HashSet<Tag> = HANDLED_TABLES.iter().map(Tag::new).collect();
        let glyph_indexed: HashSet<Tag> = GLYPH_INDEXED_TABLES.iter().map(Tag::new).collect();

        for record in base.table_directory.table_records() {
            let tag = record.tag();
            if handled.contains(&tag) || builder.contains(tag) {
                continue;
            }
            if self.options.should_drop_tag(tag) {
                info!("Dropping table: {tag}");
                continue;
            }
            if glyph_indexed.contains(&tag) {
                info!("Dropping table {tag}: it is indexed by glyph id and cannot be extended");
                continue;
            }
            if let Some(data) = base.table_data(tag) {
                debug!("Copying table {tag} from base ({} bytes)", data.len());
                builder.add_raw(tag, data.as_bytes().to_vec());
            }
        }
    }
}

fn validate_units_per_em(base: &FontRef, donors: &[DonorFont]) -> Result<()> {
    let expected = base.head()?.units_per_em();
    donors.iter().try_for_each(|donor| {
        let actual = donor.font.head()?.units_per_em();
        if actual == expected {
            Ok(())
        } else {
            Err(MergeError::IncompatibleUnitsPerEm { expected, actual })
        }
    })
}

fn validate_outlines(base: &FontRef, donors: &[DonorFont]) -> Result<()> {
    if !has_glyf(base) {
        return Err(MergeError::UnsupportedOutlines { font: "base font".to_string() });
    }
    for (i, donor) in donors.iter().enumerate() {
        if !has_glyf(&donor.font) {
            return Err(MergeError::UnsupportedOutlines { font: format!("donor {i}") });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merger_invalid_base() {
        let merger = Merger::default();
        let result = merger.merge(b"not a font", &[]);
        assert!(matches!(result, Err(MergeError::ReadError(_))));
    }

    #[test]
    fn test_donor_codepoints() {
        let donor = Donor::new(&[], [0x4E00, 0x3042, 0x4E00]);
        assert_eq!(donor.codepoints.len(), 2);
        assert!(donor.codepoints.contains(&Codepoint::new(0x3042)));
    }
}
