//! hmtx table merging

use read_fonts::{FontRef, TableProvider};
use write_fonts::tables::hmtx::{Hmtx, LongMetric};

use crate::{Result, context::MergeContext};

/// Horizontal metrics of every glyph in a font, in glyph order
///
/// Glyphs past `numberOfHMetrics` reuse the last advance width.
pub fn horizontal_metrics(font: &FontRef) -> Result<Vec<LongMetric>> {
    let num_glyphs = font.maxp()?.num_glyphs() as usize;
    let num_h_metrics = font.hhea()?.number_of_h_metrics() as usize;
    let hmtx = font.hmtx()?;
    let long = hmtx.h_metrics();
    let last_advance =
        long.get(num_h_metrics.saturating_sub(1)).map(|m| m.advance.get()).unwrap_or(0);

    Ok((0..num_glyphs)
        .map(|gid| match long.get(gid).filter(|_| gid < num_h_metrics) {
            Some(m) => LongMetric { advance: m.advance.get(), side_bearing: m.side_bearing.get() },
            None => {
                let lsb = hmtx
                    .left_side_bearings()
                    .get(gid - num_h_metrics.min(gid))
                    .map(|b| b.get())
                    .unwrap_or(0);
                LongMetric { advance: last_advance, side_bearing: lsb }
            }
        })
        .collect())
}

/// Base metrics followed by the metrics of every copied donor glyph
///
/// Every glyph gets a full long metric; no trailing side-bearing array is
/// written.
pub fn merge_hmtx(ctx: &MergeContext) -> Result<Hmtx> {
    const ZERO: LongMetric = LongMetric { advance: 0, side_bearing: 0 };

    let mut h_metrics = horizontal_metrics(ctx.base())?;
    h_metrics.resize(ctx.plan().base_glyphs() as usize, ZERO);

    for (idx, donor) in ctx.donors() {
        let metrics = horizontal_metrics(&donor.font)?;
        h_metrics.extend(
            ctx.plan()
                .copied_glyphs(idx)
                .map(|gid| metrics.get(gid.to_u16() as usize).cloned().unwrap_or(ZERO)),
        );
    }

    Ok(Hmtx { h_metrics, left_side_bearings: Vec::new() })
}
