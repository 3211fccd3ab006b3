//! Generic font table manipulation utilities.

use anyhow::{Context, Result};
use log::{debug, warn};
use read_fonts::{FontRef, TableProvider, tables::name::Encoding, types::Tag};
use write_fonts::{
    FontBuilder,
    tables::name::{Name, NameRecord},
};

// Name IDs rewritten by `apply_family_subfamily_names`
pub const FAMILY_NAME_ID: u16 = 1;
pub const SUBFAMILY_NAME_ID: u16 = 2;
pub const FULL_NAME_ID: u16 = 4;
pub const POSTSCRIPT_NAME_ID: u16 = 6;

/// Rewrite font data by applying a transformation function.
///
/// Copies all tables from the source font, then calls `f` to modify or add tables.
/// The function receives a reference to the source font and a mutable builder
/// that already contains all original tables.
pub fn rewrite_font(
    data: &[u8],
    f: impl FnOnce(&FontRef, &mut FontBuilder) -> Result<()>,
) -> Result<Vec<u8>> {
    let font = FontRef::new(data).context("Failed to parse font")?;
    let mut builder = FontBuilder::new();

    for record in font.table_directory.table_records() {
        let tag = record.tag();
        if let Some(table_data) = font.table_data(tag) {
            builder.add_raw(tag, table_data);
        }
    }

    f(&font, &mut builder)?;
    Ok(builder.build())
}

/// Map name table records using a transformation function.
///
/// The mapper receives `(name_id, current_string)` and returns:
/// - `Some(new_string)` to replace the record's string
/// - `None` to keep the current string unchanged
///
/// Records in an encoding other than UTF-16 or Mac Roman cannot be
/// re-encoded, so they are dropped with a warning, as are records whose
/// string cannot be read.
pub fn map_name_records(
    font: &FontRef,
    mut mapper: impl FnMut(u16, &str) -> Option<String>,
) -> Result<Name> {
    let name = font.name().context("Font has no name table")?;
    let mut new_records = Vec::new();

    for record in name.name_record() {
        let name_id = record.name_id().to_u16();
        let (platform_id, encoding_id) = (record.platform_id(), record.encoding_id());
        let current = match record.string(name.string_data()) {
            Ok(current) if Encoding::new(platform_id, encoding_id) != Encoding::Unknown => current,
            _ => {
                warn!(
                    "Dropping name record {name_id} (platform {platform_id}, encoding \
                     {encoding_id}): string cannot be re-encoded"
                );
                continue;
            }
        };
        let current: String = current.chars().collect();

        let new_string = mapper(name_id, &current).unwrap_or(current);

        new_records.push(NameRecord::new(
            record.platform_id(),
            record.encoding_id(),
            record.language_id(),
            read_fonts::types::NameId::new(name_id),
            new_string.into(),
        ));
    }

    Ok(Name::new(new_records))
}

/// The full name for a family and subfamily pair
///
/// A `Regular` subfamily is implied and left out.
pub fn full_name(family: &str, subfamily: &str) -> String {
    if subfamily == "Regular" {
        family.to_string()
    } else {
        format!("{family} {subfamily}")
    }
}

/// Apply family and subfamily naming to a font.
///
/// Updates every existing record with these name IDs:
/// - 1 (Family): `"{family}"`
/// - 2 (Subfamily): `"{subfamily}"`
/// - 4 (Full name): `"{family} {subfamily}"`, or `"{family}"` for `Regular`
/// - 6 (PostScript name): the full name with spaces removed
///
/// Records are never added; a font without a given ID keeps lacking it.
pub fn apply_family_subfamily_names(
    font_data: &[u8],
    family: &str,
    subfamily: &str,
) -> Result<Vec<u8>> {
    let full = full_name(family, subfamily);
    let postscript = full.replace(' ', "");
    debug!("Renaming font to {full:?} ({postscript})");

    rewrite_font(font_data, |font, builder| {
        let new_name = map_name_records(font, |name_id, _current| match name_id {
            FAMILY_NAME_ID => Some(family.to_string()),
            SUBFAMILY_NAME_ID => Some(subfamily.to_string()),
            FULL_NAME_ID => Some(full.clone()),
            POSTSCRIPT_NAME_ID => Some(postscript.clone()),
            _ => None,
        })?;
        builder.add_table(&new_name)?;
        Ok(())
    })
}

/// List the table tags present in a font, in directory order.
pub fn table_tags(data: &[u8]) -> Result<Vec<Tag>> {
    let font = FontRef::new(data).context("Failed to parse font")?;
    Ok(font.table_directory.table_records().iter().map(|r| r.tag()).collect())
}

/// Read every name record with the given ID as a string.
pub fn name_strings(data: &[u8], name_id: u16) -> Result<Vec<String>> {
    let font = FontRef::new(data).context("Failed to parse font")?;
    let name = font.name().context("Font has no name table")?;
    Ok(name
        .name_record()
        .iter()
        .filter(|r| r.name_id().to_u16() == name_id)
        .filter_map(|r| r.string(name.string_data()).ok())
        .map(|s| s.chars().collect())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use read_fonts::types::NameId;
    use write_fonts::tables::maxp::Maxp;

    /// A font with a maxp table and Windows English name records
    fn named_font(records: &[(u16, &str)]) -> Vec<u8> {
        let records = records
            .iter()
            .map(|(id, s)| NameRecord::new(3, 1, 0x409, NameId::new(*id), s.to_string().into()))
            .collect();
        let mut builder = FontBuilder::new();
        builder.add_table(&Name::new(records)).unwrap();
        builder.add_table(&Maxp { num_glyphs: 1, ..Default::default() }).unwrap();
        builder.build()
    }

    #[test]
    fn test_full_name() {
        assert_eq!(full_name("Merged Serif", "Regular"), "Merged Serif");
        assert_eq!(full_name("Merged Serif", "Light"), "Merged Serif Light");
    }

    #[test]
    fn test_apply_family_subfamily_names() {
        let font = named_font(&[
            (1, "Old Family"),
            (2, "Bold"),
            (3, "unique id"),
            (4, "Old Family Bold"),
            (6, "OldFamily-Bold"),
        ]);

        let renamed = apply_family_subfamily_names(&font, "Merged Serif", "Light").unwrap();

        assert_eq!(name_strings(&renamed, 1).unwrap(), vec!["Merged Serif"]);
        assert_eq!(name_strings(&renamed, 2).unwrap(), vec!["Light"]);
        assert_eq!(name_strings(&renamed, 3).unwrap(), vec!["unique id"]);
        assert_eq!(name_strings(&renamed, 4).unwrap(), vec!["Merged Serif Light"]);
        assert_eq!(name_strings(&renamed, 6).unwrap(), vec!["MergedSerifLight"]);
    }

    #[test]
    fn test_regular_subfamily_omitted_from_full_name() {
        let font = named_font(&[(1, "Old"), (4, "Old Bold"), (6, "Old-Bold")]);

        let renamed = apply_family_subfamily_names(&font, "Merged Sans", "Regular").unwrap();

        assert_eq!(name_strings(&renamed, 4).unwrap(), vec!["Merged Sans"]);
        assert_eq!(name_strings(&renamed, 6).unwrap(), vec!["MergedSans"]);
        assert!(name_strings(&renamed, 2).unwrap().is_empty());
    }

    #[test]
    fn test_records_in_unknown_encodings_are_dropped() {
        // Mac Japanese record for ID 3, Windows Unicode record for ID 1
        let mut name = vec![0, 0, 0, 2, 0, 30];
        name.extend([0, 1, 0, 1, 0, 11, 0, 3, 0, 2, 0, 0]);
        name.extend([0, 3, 0, 1, 0x04, 0x09, 0, 1, 0, 2, 0, 2]);
        name.extend([0x82, 0xA0, 0x00, 0x41]);
        let mut builder = FontBuilder::new();
        builder.add_raw(Tag::new(b"name"), name);
        builder.add_table(&Maxp { num_glyphs: 1, ..Default::default() }).unwrap();
        let font = builder.build();
        assert_eq!(name_strings(&font, 1).unwrap(), vec!["A"]);

        let renamed = apply_family_subfamily_names(&font, "Merged", "Regular").unwrap();

        assert_eq!(name_strings(&renamed, 1).unwrap(), vec!["Merged"]);
        let name_font = FontRef::new(&renamed).unwrap();
        assert_eq!(name_font.name().unwrap().name_record().len(), 1);
    }

    #[test]
    fn test_rewrite_font_keeps_tables() {
        let font = named_font(&[(1, "Family")]);
        let rewritten = rewrite_font(&font, |_, _| Ok(())).unwrap();

        let tags = table_tags(&rewritten).unwrap();
        assert!(tags.contains(&Tag::new(b"name")));
        assert!(tags.contains(&Tag::new(b"maxp")));
    }

    #[test]
    fn test_rewrite_font_invalid_data() {
        assert!(rewrite_font(b"not a font", |_, _| Ok(())).is_err());
        assert!(table_tags(b"not a font").is_err());
    }
}
