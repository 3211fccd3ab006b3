//! post table merging

use std::collections::HashMap;

use font_types::Version16Dot16;
use read_fonts::{FontRef, TableProvider};
use write_fonts::{from_obj::ToOwnedTable, tables::post::Post};

use crate::{
    Result,
    context::MergeContext,
    glyph_order::{GlyphName, MergedNames, glyph_names},
    tables::cmap::cmap_mappings,
    types::GlyphId,
};

/// Base post table extended to the merged glyph order
///
/// When the base stores glyph names (version 2.0) every appended glyph gets a
/// unique name; otherwise the table is written as version 3.0.
pub fn merge_post(ctx: &MergeContext) -> Result<Post> {
    let mut post: Post = ctx.base().post()?.to_owned_table();
    post.num_glyphs = Some(ctx.total_glyphs());

    let Some(base_names) = glyph_names(ctx.base()) else {
        post.version = Version16Dot16::VERSION_3_0;
        post.glyph_name_index = None;
        post.string_data = None;
        return Ok(post);
    };

    let mut names = MergedNames::from_base(base_names);
    for (idx, donor) in ctx.donors() {
        let donor_names = donor_glyph_names(&donor.font)?;
        for gid in ctx.plan().copied_glyphs(idx) {
            names.push(&donor_names[gid.to_u16() as usize]);
        }
    }

    let mut named = Post::new_v2(names.iter());
    named.italic_angle = post.italic_angle;
    named.underline_position = post.underline_position;
    named.underline_thickness = post.underline_thickness;
    named.is_fixed_pitch = post.is_fixed_pitch;
    named.min_mem_type42 = post.min_mem_type42;
    named.max_mem_type42 = post.max_mem_type42;
    named.min_mem_type1 = post.min_mem_type1;
    named.max_mem_type1 = post.max_mem_type1;
    Ok(named)
}

/// Names for every glyph of a donor
///
/// Falls back to `uniXXXX`/`uXXXXX` names derived from the cmap, then to
/// `glyphNNNNN`, when the donor stores no names.
fn donor_glyph_names(font: &FontRef) -> Result<Vec<GlyphName>> {
    if let Some(names) = glyph_names(font) {
        return Ok(names);
    }

    let mut by_gid: HashMap<GlyphId, u32> = HashMap::new();
    for (cp, gid) in cmap_mappings(font)? {
        by_gid.entry(gid).or_insert(cp.to_u32());
    }

    let num_glyphs = font.maxp()?.num_glyphs();
    Ok((0..num_glyphs)
        .map(|gid| match by_gid.get(&GlyphId::new(gid)) {
            Some(&cp) if cp <= 0xFFFF => GlyphName::new(format!("uni{cp:04X}")),
            Some(&cp) => GlyphName::new(format!("u{cp:05X}")),
            None if gid == 0 => GlyphName::new(".notdef"),
            None => GlyphName::new(format!("glyph{gid:05}")),
        })
        .collect())
}
