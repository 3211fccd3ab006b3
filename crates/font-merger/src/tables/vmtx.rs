//! vhea/vmtx merging
//!
//! Vertical metrics are only carried when the base font has them. The two
//! tables live or die together: a `vmtx` without `vhea` cannot be parsed.

use read_fonts::{FontRef, TableProvider, types::Tag};
use write_fonts::{
    from_obj::ToOwnedTable,
    tables::{
        vhea::Vhea,
        vmtx::{LongMetric, Vmtx},
    },
};

use crate::{Result, context::MergeContext, strategies::max};

/// Vertical metrics of every glyph in a font, or `None` without vhea/vmtx
fn vertical_metrics(font: &FontRef) -> Result<Option<Vec<LongMetric>>> {
    let (Ok(vhea), Ok(vmtx)) = (font.vhea(), font.vmtx()) else {
        return Ok(None);
    };
    let num_glyphs = font.maxp()?.num_glyphs() as usize;
    let num_v_metrics = vhea.number_of_long_ver_metrics() as usize;
    let long = vmtx.v_metrics();
    let last_advance =
        long.get(num_v_metrics.saturating_sub(1)).map(|m| m.advance.get()).unwrap_or(0);

    Ok(Some(
        (0..num_glyphs)
            .map(|gid| match long.get(gid).filter(|_| gid < num_v_metrics) {
                Some(m) => {
                    LongMetric { advance: m.advance.get(), side_bearing: m.side_bearing.get() }
                }
                None => {
                    let tsb = vmtx
                        .top_side_bearings()
                        .get(gid - num_v_metrics.min(gid))
                        .map(|b| b.get())
                        .unwrap_or(0);
                    LongMetric { advance: last_advance, side_bearing: tsb }
                }
            })
            .collect(),
    ))
}

/// Extend the base vertical metrics to the merged glyph order
///
/// Donor glyphs without vertical metrics advance by one em with a zero top
/// side bearing.
pub fn merge_vertical(ctx: &MergeContext) -> Result<Option<(Vhea, Vmtx)>> {
    let options = ctx.options();
    if options.should_drop_tag(Tag::new(b"vhea")) || options.should_drop_tag(Tag::new(b"vmtx")) {
        return Ok(None);
    }
    let Some(mut v_metrics) = vertical_metrics(ctx.base())? else {
        return Ok(None);
    };
    let base_vhea = ctx.base().vhea()?;
    let em = ctx.base().head()?.units_per_em();
    let fallback = LongMetric { advance: em, side_bearing: 0 };

    v_metrics.resize(ctx.plan().base_glyphs() as usize, fallback.clone());
    let mut advance_height_max = Vec::new();

    for (idx, donor) in ctx.donors() {
        let metrics = vertical_metrics(&donor.font)?;
        if let Ok(vhea) = donor.font.vhea() {
            advance_height_max.push(vhea.advance_height_max().to_u16());
        } else {
            advance_height_max.push(em);
        }
        v_metrics.extend(ctx.plan().copied_glyphs(idx).map(|gid| {
            metrics
                .as_ref()
                .and_then(|m| m.get(gid.to_u16() as usize))
                .cloned()
                .unwrap_or_else(|| fallback.clone())
        }));
    }

    let mut vhea: Vhea = base_vhea.to_owned_table();
    vhea.advance_height_max = font_types::UfWord::new(max(
        base_vhea.advance_height_max().to_u16(),
        &advance_height_max,
    ));
    vhea.number_of_long_ver_metrics = ctx.total_glyphs();

    Ok(Some((vhea, Vmtx { v_metrics, top_side_bearings: Vec::new() })))
}
