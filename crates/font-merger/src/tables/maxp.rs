//! maxp table merging

use std::result;

use read_fonts::{TableProvider, tables::maxp::Maxp as ReadMaxp};
use write_fonts::{from_obj::ToOwnedTable, tables::maxp::Maxp};

use crate::{Result, context::MergeContext, strategies::max};

/// Base maxp with the merged glyph count
///
/// Outline-related maxima cover the donors too. The hinting program limits
/// (storage, function and instruction defs, instruction size) stay with the
/// base, whose `fpgm`/`prep` are the only programs in the output.
pub fn merge_maxp(ctx: &MergeContext) -> Result<Maxp> {
    let base = ctx.base().maxp()?;
    let donors: Vec<ReadMaxp> =
        ctx.donor_fonts().map(|f| f.maxp()).collect::<result::Result<_, _>>()?;

    let mut maxp: Maxp = base.to_owned_table();
    maxp.num_glyphs = ctx.total_glyphs();

    // Version 0.5 (CFF) tables have no limits to widen
    if base.max_points().is_none() {
        return Ok(maxp);
    }

    let widen = |field: fn(&ReadMaxp) -> Option<u16>| -> Option<u16> {
        let values: Vec<u16> = donors.iter().filter_map(field).collect();
        field(&base).map(|b| max(b, &values))
    };

    maxp.max_points = widen(|t| t.max_points());
    maxp.max_contours = widen(|t| t.max_contours());
    maxp.max_composite_points = widen(|t| t.max_composite_points());
    maxp.max_composite_contours = widen(|t| t.max_composite_contours());
    maxp.max_zones = widen(|t| t.max_zones());
    maxp.max_twilight_points = widen(|t| t.max_twilight_points());
    maxp.max_stack_elements = widen(|t| t.max_stack_elements());
    maxp.max_component_elements = widen(|t| t.max_component_elements());
    maxp.max_component_depth = widen(|t| t.max_component_depth());

    Ok(maxp)
}
