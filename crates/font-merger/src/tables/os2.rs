//! OS/2 table merging

use std::collections::BTreeMap;

use read_fonts::{TableProvider, tables::os2::Os2 as ReadOs2};
use write_fonts::{from_obj::ToOwnedTable, tables::os2::Os2};

use crate::{
    Result,
    context::MergeContext,
    strategies::union,
    types::{Codepoint, MergedGlyphId},
};

/// Base OS/2 with coverage fields updated for the appended glyphs
///
/// Unicode and code page range bits are OR'd with every donor that has an
/// OS/2 table, and the first/last character indices are recomputed from the
/// merged cmap. Returns `None` when the base has no OS/2 table.
pub fn merge_os2(
    ctx: &MergeContext,
    cmap: &BTreeMap<Codepoint, MergedGlyphId>,
) -> Result<Option<Os2>> {
    let Ok(base) = ctx.base().os2() else {
        return Ok(None);
    };
    let donors: Vec<ReadOs2> = ctx.donor_fonts().filter_map(|f| f.os2().ok()).collect();

    let ranges = |field: fn(&ReadOs2) -> u32| -> u32 {
        let values: Vec<u32> = donors.iter().map(field).collect();
        union(field(&base), &values)
    };
    let code_pages = |field: fn(&ReadOs2) -> Option<u32>| -> Option<u32> {
        let values: Vec<u32> = donors.iter().filter_map(field).collect();
        field(&base).map(|b| union(b, &values))
    };

    let mut os2: Os2 = base.to_owned_table();
    os2.ul_unicode_range_1 = ranges(|t| t.ul_unicode_range_1());
    os2.ul_unicode_range_2 = ranges(|t| t.ul_unicode_range_2());
    os2.ul_unicode_range_3 = ranges(|t| t.ul_unicode_range_3());
    os2.ul_unicode_range_4 = ranges(|t| t.ul_unicode_range_4());
    os2.ul_code_page_range_1 = code_pages(|t| t.ul_code_page_range_1());
    os2.ul_code_page_range_2 = code_pages(|t| t.ul_code_page_range_2());

    // Both indices saturate at 0xFFFF for supplementary-plane code points
    if let (Some(first), Some(last)) = (cmap.keys().next(), cmap.keys().next_back()) {
        os2.us_first_char_index = first.to_u32().min(0xFFFF) as u16;
        os2.us_last_char_index = last.to_u32().min(0xFFFF) as u16;
    }

    Ok(Some(os2))
}
