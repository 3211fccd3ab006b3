//! hhea table merging
//!
//! Line metrics (ascender, descender, line gap) stay with the base font so
//! the merged font keeps the base font's vertical rhythm; only the extents
//! that depend on glyph data are widened.

use std::result;

use read_fonts::{TableProvider, tables::hhea::Hhea as ReadHhea};
use write_fonts::{from_obj::ToOwnedTable, tables::hhea::Hhea};

use crate::{
    Result,
    context::MergeContext,
    strategies::{max, min},
};

pub fn merge_hhea(ctx: &MergeContext) -> Result<Hhea> {
    let base = ctx.base().hhea()?;
    let donors: Vec<ReadHhea> =
        ctx.donor_fonts().map(|f| f.hhea()).collect::<result::Result<_, _>>()?;

    let advance_width_max: Vec<u16> =
        donors.iter().map(|t| t.advance_width_max().to_u16()).collect();
    let min_lsbs: Vec<i16> = donors.iter().map(|t| t.min_left_side_bearing().to_i16()).collect();
    let min_rsbs: Vec<i16> = donors.iter().map(|t| t.min_right_side_bearing().to_i16()).collect();
    let x_max_extents: Vec<i16> = donors.iter().map(|t| t.x_max_extent().to_i16()).collect();

    let mut hhea: Hhea = base.to_owned_table();
    hhea.advance_width_max =
        font_types::UfWord::new(max(base.advance_width_max().to_u16(), &advance_width_max));
    hhea.min_left_side_bearing =
        font_types::FWord::new(min(base.min_left_side_bearing().to_i16(), &min_lsbs));
    hhea.min_right_side_bearing =
        font_types::FWord::new(min(base.min_right_side_bearing().to_i16(), &min_rsbs));
    hhea.x_max_extent = font_types::FWord::new(max(base.x_max_extent().to_i16(), &x_max_extents));
    hhea.number_of_h_metrics = ctx.total_glyphs();

    Ok(hhea)
}
