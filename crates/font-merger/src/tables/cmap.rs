//! cmap reading and merging

use std::collections::BTreeMap;

use read_fonts::{
    FontRef, TableProvider,
    tables::cmap::{Cmap as ReadCmap, CmapSubtable, PlatformId},
};
use write_fonts::tables::cmap::{
    Cmap, Cmap12, CmapSubtable as WriteCmapSubtable, EncodingRecord, PlatformId as WritePlatformId,
    SequentialMapGroup,
};

use crate::{
    Result,
    context::MergeContext,
    types::{Codepoint, GlyphId, MergedGlyphId},
};

const MAX_CODEPOINT: u32 = 0x10FFFF;

/// Read the Unicode mappings of a font's best cmap subtable
///
/// Entries mapping to gid 0 are skipped.
pub fn cmap_mappings(font: &FontRef) -> Result<BTreeMap<Codepoint, GlyphId>> {
    let cmap = font.cmap()?;
    Ok(find_best_subtable(&cmap)
        .map(|subtable| iter_cmap_subtable(&subtable).into_iter().collect())
        .unwrap_or_default())
}

/// Merge base and donor mappings
///
/// Base mappings always win. A donor only contributes the code points it was
/// asked to supply, and only when no earlier font has claimed them.
pub fn merge_cmap(ctx: &MergeContext) -> Result<(Cmap, BTreeMap<Codepoint, MergedGlyphId>)> {
    let mut merged: BTreeMap<Codepoint, MergedGlyphId> = cmap_mappings(ctx.base())?
        .into_iter()
        .map(|(cp, gid)| (cp, MergedGlyphId::new(gid.to_u16())))
        .collect();

    for (idx, donor) in ctx.donors() {
        for (cp, gid) in cmap_mappings(&donor.font)? {
            if !donor.codepoints.contains(&cp) || merged.contains_key(&cp) {
                continue;
            }
            if let Some(new_gid) = ctx.plan().remap(idx, gid) {
                merged.insert(cp, new_gid);
            }
        }
    }

    let mappings: Vec<(u32, u32)> =
        merged.iter().map(|(cp, gid)| (cp.to_u32(), gid.to_u32())).collect();

    Ok((build_cmap_format12(&mappings), merged))
}

/// Build a cmap table using only format 12 subtables.
///
/// Format 4 uses u16 segment counts and overflows on CJK-sized repertoires.
fn build_cmap_format12(mappings: &[(u32, u32)]) -> Cmap {
    let cmap12 = Cmap12 { language: 0, groups: build_sequential_groups(mappings) };

    // Unicode full repertoire (0, 4) and Windows UCS-4 (3, 10)
    let unicode = WriteCmapSubtable::Format12(cmap12.clone());
    let windows = WriteCmapSubtable::Format12(cmap12);
    let encoding_records = vec![
        EncodingRecord::new(WritePlatformId::Unicode, 4, unicode),
        EncodingRecord::new(WritePlatformId::Windows, 10, windows),
    ];

    Cmap::new(encoding_records)
}

/// Group sorted (codepoint, glyph id) pairs into runs where both increase by one
fn build_sequential_groups(mappings: &[(u32, u32)]) -> Vec<SequentialMapGroup> {
    let Some((&(first_cp, first_gid), rest)) = mappings.split_first() else {
        return Vec::new();
    };

    let mut groups = Vec::new();
    let (mut start_cp, mut start_gid) = (first_cp, first_gid);
    let (mut prev_cp, mut prev_gid) = (first_cp, first_gid);

    for &(cp, gid) in rest {
        if cp == prev_cp + 1 && gid == prev_gid + 1 {
            prev_cp = cp;
            prev_gid = gid;
        } else {
            groups.push(SequentialMapGroup::new(start_cp, prev_cp, start_gid));
            (start_cp, start_gid) = (cp, gid);
            (prev_cp, prev_gid) = (cp, gid);
        }
    }
    groups.push(SequentialMapGroup::new(start_cp, prev_cp, start_gid));

    groups
}

fn find_best_subtable<'a>(cmap: &'a ReadCmap<'a>) -> Option<CmapSubtable<'a>> {
    let records = cmap.encoding_records();

    // Format 12 (full Unicode) first
    for record in records {
        if (record.platform_id() == PlatformId::Unicode
            || (record.platform_id() == PlatformId::Windows && record.encoding_id() == 10))
            && let Ok(subtable) = record.subtable(cmap.offset_data())
            && matches!(subtable, CmapSubtable::Format12(_))
        {
            return Some(subtable);
        }
    }

    // Then format 4 (BMP)
    for record in records {
        if (record.platform_id() == PlatformId::Unicode
            || (record.platform_id() == PlatformId::Windows && record.encoding_id() == 1))
            && let Ok(subtable) = record.subtable(cmap.offset_data())
            && matches!(subtable, CmapSubtable::Format4(_))
        {
            return Some(subtable);
        }
    }

    records.iter().find_map(|r| r.subtable(cmap.offset_data()).ok())
}

fn iter_cmap_subtable(subtable: &CmapSubtable) -> Vec<(Codepoint, GlyphId)> {
    let mut mappings = Vec::new();

    match subtable {
        CmapSubtable::Format4(f4) => {
            let end_codes = f4.end_code();
            let start_codes = f4.start_code();
            let id_deltas = f4.id_delta();
            let id_range_offsets = f4.id_range_offsets();
            let glyph_id_array = f4.glyph_id_array();
            let seg_count = f4.seg_count_x2() as usize / 2;

            for seg in 0..seg_count {
                let end_code = end_codes.get(seg).map(|v| v.get()).unwrap_or(0xFFFF);
                let start_code = start_codes.get(seg).map(|v| v.get()).unwrap_or(0xFFFF);
                let id_delta = id_deltas.get(seg).map(|v| v.get()).unwrap_or(0);
                let id_range_offset = id_range_offsets.get(seg).map(|v| v.get()).unwrap_or(0);

                if start_code == 0xFFFF || start_code > end_code {
                    continue;
                }

                for cp in start_code..=end_code {
                    let gid = if id_range_offset == 0 {
                        (cp as i32 + id_delta as i32) as u16
                    } else {
                        ((id_range_offset as usize / 2) + (cp - start_code) as usize)
                            .checked_sub(seg_count - seg)
                            .and_then(|idx| glyph_id_array.get(idx))
                            .map(|g| g.get())
                            .filter(|&g| g != 0)
                            .map(|g| (g as i32 + id_delta as i32) as u16)
                            .unwrap_or(0)
                    };

                    if gid != 0 {
                        mappings.push((Codepoint::new(cp as u32), GlyphId::new(gid)));
                    }
                }
            }
        }
        CmapSubtable::Format12(f12) => {
            for group in f12.groups() {
                let start = group.start_char_code();
                let end = group.end_char_code().min(MAX_CODEPOINT);
                let start_gid = group.start_glyph_id();
                for cp in start..=end {
                    let gid = start_gid.checked_add(cp - start).and_then(|g| u16::try_from(g).ok());
                    if let Some(gid) = gid.filter(|&g| g != 0) {
                        mappings.push((Codepoint::new(cp), GlyphId::new(gid)));
                    }
                }
            }
        }
        CmapSubtable::Format6(f6) => {
            let first = f6.first_code() as u32;
            for (i, gid) in f6.glyph_id_array().iter().enumerate() {
                let gid = gid.get();
                if gid != 0 {
                    mappings.push((Codepoint::new(first + i as u32), GlyphId::new(gid)));
                }
            }
        }
        _ => {}
    }

    mappings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_groups() {
        let groups =
            build_sequential_groups(&[(0x41, 1), (0x42, 2), (0x43, 3), (0x4E00, 10), (0x4E01, 12)]);
        let ranges: Vec<_> = groups
            .iter()
            .map(|g| (g.start_char_code, g.end_char_code, g.start_glyph_id))
            .collect();
        assert_eq!(ranges, [(0x41, 0x43, 1), (0x4E00, 0x4E00, 10), (0x4E01, 0x4E01, 12)]);
    }

    #[test]
    fn test_sequential_groups_empty() {
        assert!(build_sequential_groups(&[]).is_empty());
    }
}
