//! glyf/loca rebuilding (TrueType outlines)
//!
//! Base glyphs are carried over with their instructions. Donor glyphs lose
//! theirs: per-glyph instructions may call `fpgm` functions or read `cvt`
//! entries, and only the base font's programs survive in the output.

use std::collections::HashSet;

use read_fonts::{
    FontRef, TableProvider,
    tables::glyf::{Anchor as ReadAnchor, CurvePoint, Glyph as ReadGlyph},
};
use write_fonts::tables::{
    glyf::{
        Anchor, Bbox, Component, ComponentFlags, CompositeGlyph, Contour, Glyf, GlyfLocaBuilder,
        Glyph, SimpleGlyph, Transform,
    },
    loca::{Loca, LocaFormat},
};

use crate::{Result, context::MergeContext, types::MergedGlyphId};

/// Check that a font has TrueType outlines
pub fn has_glyf(font: &FontRef) -> bool {
    font.glyf().is_ok() && font.loca(None).is_ok()
}

/// Rebuild glyf and loca with the base glyphs followed by every donor's glyphs
pub fn merge_glyf(ctx: &MergeContext) -> Result<(Glyf, Loca, LocaFormat)> {
    let mut glyphs: Vec<Glyph> = Vec::with_capacity(ctx.total_glyphs() as usize);

    let base_count = ctx.plan().base_glyphs();
    glyphs.extend(read_glyphs(ctx.base(), 0..base_count, false, &|gid| Some(gid))?);

    for (idx, donor) in ctx.donors() {
        let plan = ctx.plan();
        let remap = |gid: u16| plan.remap(idx, gid.into()).map(MergedGlyphId::to_u16);
        let range = 1..plan.donor_glyphs(idx);
        glyphs.extend(read_glyphs(&donor.font, range, true, &remap)?);
    }

    empty_broken_composites(&mut glyphs);

    let mut builder = GlyfLocaBuilder::new();
    for glyph in &glyphs {
        // A glyph that fails validation is written as empty
        if builder.add_glyph(glyph).is_err() {
            builder.add_glyph(&Glyph::Empty)?;
        }
    }

    Ok(builder.build())
}

/// Replace composites that reference empty glyphs with empty glyphs.
///
/// OTS (used by Firefox) rejects such composites. Emptying one composite can
/// break another that uses it, so this repeats until nothing changes.
fn empty_broken_composites(glyphs: &mut [Glyph]) {
    loop {
        let empty: HashSet<u16> = glyphs
            .iter()
            .enumerate()
            .filter_map(|(gid, g)| matches!(g, Glyph::Empty).then_some(gid as u16))
            .collect();
        let mut changed = false;
        for glyph in glyphs.iter_mut() {
            if let Glyph::Composite(composite) = glyph
                && composite.components().iter().any(|c| empty.contains(&c.glyph.to_u16()))
            {
                *glyph = Glyph::Empty;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
}

fn read_glyphs(
    font: &FontRef,
    gids: std::ops::Range<u16>,
    strip_hinting: bool,
    remap: &dyn Fn(u16) -> Option<u16>,
) -> Result<Vec<Glyph>> {
    let glyf = font.glyf()?;
    let loca = font.loca(None)?;

    Ok(gids
        .map(|gid| match loca.get_glyf(read_fonts::types::GlyphId::new(gid as u32), &glyf) {
            Ok(Some(glyph)) => convert_glyph(&glyph, strip_hinting, remap),
            _ => Glyph::Empty,
        })
        .collect())
}

/// Convert a read-fonts glyph to a write-fonts glyph
///
/// Composite components are renumbered through `remap`; a component whose
/// target has no merged id points at `.notdef`. Composite-level instructions
/// are not carried over.
fn convert_glyph(
    glyph: &ReadGlyph,
    strip_hinting: bool,
    remap: &dyn Fn(u16) -> Option<u16>,
) -> Glyph {
    match glyph {
        ReadGlyph::Simple(simple) => {
            let mut contours: Vec<Contour> = Vec::new();
            let mut points = simple.points();
            let mut current = 0usize;

            for end_pt in simple.end_pts_of_contours() {
                let end = end_pt.get() as usize;
                let mut contour = Vec::new();
                while current <= end {
                    if let Some(pt) = points.next() {
                        contour.push(CurvePoint { x: pt.x, y: pt.y, on_curve: pt.on_curve });
                    }
                    current += 1;
                }
                contours.push(contour.into());
            }

            let bbox = Bbox {
                x_min: simple.x_min(),
                y_min: simple.y_min(),
                x_max: simple.x_max(),
                y_max: simple.y_max(),
            };
            let instructions = if strip_hinting { vec![] } else { simple.instructions().to_vec() };

            Glyph::Simple(SimpleGlyph { bbox, contours, instructions })
        }
        ReadGlyph::Composite(composite) => {
            let mut components = composite.components().map(|comp| {
                let new_gid = remap(comp.glyph.to_u16()).unwrap_or(0);
                let anchor = match comp.anchor {
                    ReadAnchor::Offset { x, y } => Anchor::Offset { x, y },
                    ReadAnchor::Point { base, component } => Anchor::Point { base, component },
                };
                let transform = Transform {
                    xx: comp.transform.xx,
                    yx: comp.transform.yx,
                    xy: comp.transform.xy,
                    yy: comp.transform.yy,
                };
                let flags: ComponentFlags = comp.flags.into();
                Component { glyph: font_types::GlyphId16::new(new_gid), anchor, transform, flags }
            });

            let bbox = Bbox {
                x_min: composite.x_min(),
                y_min: composite.y_min(),
                x_max: composite.x_max(),
                y_max: composite.y_max(),
            };

            let Some(first) = components.next() else {
                return Glyph::Empty;
            };
            let mut merged = CompositeGlyph::new(first, bbox);
            for comp in components {
                merged.add_component(comp, bbox);
            }

            Glyph::Composite(merged)
        }
    }
}
