//! The merge pipeline: resolve, read, validate, assign, subset, append, write.

use std::collections::{BTreeSet, HashMap};

use anyhow::{Context, Result};
use cjk_merge_font_merger::{Donor, Merger, Options, TableTag};
use cjk_merge_font_ops::{apply_family_subfamily_names, table_tags};
use cjk_merge_font_subsetter::Subsetter;
use log::{debug, info, warn};
use read_fonts::{FontRef, TableProvider};

use crate::{
    blocks::Block,
    corpus::{expand_corpus_patterns, read_corpus},
    error::{ConfigError, CoverageError},
    io::FontFile,
    plan::{Assignment, Target},
    prefer::{DEFAULT_PREFER_ORDER, resolve_prefer_order},
    report::{BlockCoverage, MergeReport},
    request::MergeRequest,
    source::Source,
    validate::{LoadedFont, validate_fonts},
};

/// Tables a donor needs to be appended; user drops apply to the output only.
const DONOR_REQUIRED_TABLES: &[[u8; 4]] =
    &[*b"glyf", *b"loca", *b"cmap", *b"head", *b"hhea", *b"hmtx", *b"maxp", *b"post"];

/// Subfamily used for renaming when none is given
pub const DEFAULT_SUBFAMILY: &str = "Regular";

/// Merge the requested glyphs into the base font and write the result.
///
/// Nothing is written unless every step succeeds.
pub fn merge(request: &MergeRequest) -> Result<MergeReport> {
    check_required_donors(request)?;
    let drop_tags = parse_drop_tables(&request.drop_tables)?;

    let sources = request.sources();
    let supplied: Vec<Source> = sources.iter().map(|(s, _)| *s).collect();
    let order_text = request.prefer_order.as_deref().unwrap_or(DEFAULT_PREFER_ORDER);
    let order = resolve_prefer_order(order_text, &supplied)?;
    info!("Prefer order: {}", join(&order));

    let fonts = sources
        .iter()
        .map(|(source, path)| {
            info!("Reading {source}: {}", path.display());
            LoadedFont::load(*source, path)
        })
        .collect::<Result<Vec<_>, _>>()?;
    let base = fonts.iter().find(|f| f.source.is_base()).ok_or(ConfigError::NoLatinFont)?;
    let donors: Vec<&LoadedFont> = order
        .iter()
        .filter(|s| !s.is_base())
        .filter_map(|s| fonts.iter().find(|f| f.source == *s))
        .collect();

    let mut checked = vec![base];
    checked.extend(donors.iter().copied());
    validate_fonts(&checked)?;

    let corpus = read_corpus(&expand_corpus_patterns(&request.corpus)?)?;
    let target = Target::build(&request.blocks, &corpus);
    info!("Target: {} code points ({} from corpus)", target.len(), corpus.len());

    let base_coverage = base.coverage()?;
    let coverage = donors
        .iter()
        .map(|f| Ok((f.source, f.coverage()?)))
        .collect::<Result<HashMap<Source, BTreeSet<u32>>>>()?;
    let assignment = Assignment::assign(&target, &order, &base_coverage, &coverage);
    log_assignment(request, &assignment);

    if request.strict && !assignment.unassigned.is_empty() {
        return Err(CoverageError { missing: assignment.unassigned.iter().copied().collect() }
            .into());
    }

    let mut subsets: Vec<(Vec<u8>, &BTreeSet<u32>)> = Vec::new();
    for (source, codepoints) in assignment.active_donors() {
        let Some(font) = donors.iter().find(|f| f.source == source) else {
            continue;
        };
        subsets.push((subset_donor(font, codepoints, &drop_tags)?, codepoints));
    }
    let donor_inputs: Vec<Donor> = subsets
        .iter()
        .map(|(data, codepoints)| Donor::new(data, codepoints.iter().copied()))
        .collect();

    let options = Options { drop_tables: drop_tags, recalc_timestamp: true };
    let merged = Merger::new(options)
        .merge(&base.data, &donor_inputs)
        .context("Failed to append donor glyphs")?;

    let merged = match &request.family {
        Some(family) => {
            let subfamily = request.subfamily.as_deref().unwrap_or(DEFAULT_SUBFAMILY);
            info!("Renaming to {family} {subfamily}");
            apply_family_subfamily_names(&merged, family, subfamily)
                .context("Failed to rename merged font")?
        }
        None => merged,
    };

    let glyph_count = FontRef::new(&merged)
        .and_then(|font| font.maxp())
        .map(|maxp| maxp.num_glyphs())
        .context("Merged font is unreadable")?;
    let output_tags = table_tags(&merged)?;
    let dropped_tables: Vec<String> = table_tags(&base.data)?
        .into_iter()
        .filter(|tag| !output_tags.contains(tag))
        .map(|tag| tag.to_string().trim_end().to_string())
        .collect();

    let output = FontFile::new(&request.output);
    output.write(&merged)?;
    let size_mb = merged.len() as f64 / 1024.0 / 1024.0;
    info!("Merged font: {} ({glyph_count} glyphs, {size_mb:.2} MB)", output.path().display());

    Ok(MergeReport {
        output: request.output.clone(),
        glyph_count,
        kept_by_base: assignment.base.len(),
        assigned: assignment.donors.iter().map(|(s, cps)| (*s, cps.len())).collect(),
        blocks: enabled_blocks(request)
            .map(|block| {
                let (requested, covered) = assignment.block_coverage(block);
                BlockCoverage { block, requested, covered }
            })
            .collect(),
        unassigned: assignment.unassigned.into_iter().collect(),
        dropped_tables,
    })
}

fn enabled_blocks(request: &MergeRequest) -> impl Iterator<Item = Block> + '_ {
    Block::ALL.into_iter().filter(|b| request.blocks.contains(b))
}

/// Every enabled block needs at least one source able to supply it.
fn check_required_donors(request: &MergeRequest) -> Result<(), ConfigError> {
    if request.latin.is_empty() {
        return Err(ConfigError::NoLatinFont);
    }
    let supplied = request.supplied_kinds();
    for block in enabled_blocks(request) {
        let spec = block.spec();
        if !spec.requires.intersects(supplied) {
            return Err(ConfigError::MissingDonor {
                block,
                flag: spec.flag,
                required: spec.requires.describe(),
            });
        }
    }
    Ok(())
}

/// Parse table tags, accepting comma-separated lists within each entry.
fn parse_drop_tables(entries: &[String]) -> Result<Vec<TableTag>, ConfigError> {
    entries
        .iter()
        .flat_map(|entry| entry.split(','))
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(|tag| TableTag::parse(tag).ok_or_else(|| ConfigError::InvalidTableTag(tag.into())))
        .collect()
}

fn subset_donor(
    font: &LoadedFont,
    codepoints: &BTreeSet<u32>,
    drop_tags: &[TableTag],
) -> Result<Vec<u8>> {
    let droppable = drop_tags
        .iter()
        .map(TableTag::to_bytes)
        .filter(|tag| !DONOR_REQUIRED_TABLES.contains(tag));

    info!("Subsetting {} to {} code points", font.source, codepoints.len());
    Subsetter::donor()
        .with_codepoints(codepoints.iter().filter_map(|cp| char::from_u32(*cp)))
        .drop_tables(droppable)
        .subset(&font.data)
        .with_context(|| format!("Failed to subset {}", font.path.display()))
}

fn log_assignment(request: &MergeRequest, assignment: &Assignment) {
    info!("Kept from base: {}", assignment.base.len());
    for (source, codepoints) in &assignment.donors {
        info!("Assigned to {source}: {}", codepoints.len());
    }
    for block in enabled_blocks(request) {
        let (requested, covered) = assignment.block_coverage(block);
        debug!("{} ({}): {covered}/{requested} covered", block.name(), block.flag());
    }
    if !assignment.unassigned.is_empty() {
        let sample: Vec<String> =
            assignment.unassigned.iter().take(8).map(|cp| format!("U+{cp:04X}")).collect();
        warn!(
            "{} target code point(s) have no eligible source and are skipped: {}{}",
            assignment.unassigned.len(),
            sample.join(" "),
            if assignment.unassigned.len() > sample.len() { " ..." } else { "" }
        );
    }
}

fn join(sources: &[Source]) -> String {
    sources.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Region;

    #[test]
    fn test_han_requires_chinese_donor() {
        let request = MergeRequest::new("latin.ttf", "out.ttf")
            .region(Region::Ja, "ja.ttf")
            .block(Block::HanBasic);

        let err = check_required_donors(&request).unwrap_err();
        assert!(matches!(err, ConfigError::MissingDonor { block: Block::HanBasic, .. }));
    }

    #[test]
    fn test_latin1_satisfied_by_base() {
        let request = MergeRequest::new("latin.ttf", "out.ttf").block(Block::Latin1);
        assert!(check_required_donors(&request).is_ok());
    }

    #[test]
    fn test_cjk_blocks_need_a_region() {
        let request = MergeRequest::new("latin.ttf", "out.ttf").block(Block::CjkPunct);
        let err = check_required_donors(&request).unwrap_err();
        assert_eq!(err.to_string(), "--add-cjk-punct requires a zh-tw or zh-cn or ja or kr font");
    }

    #[test]
    fn test_parse_drop_tables() {
        let tags = parse_drop_tables(&["vhea,vmtx".to_string(), " DSIG ".to_string()]).unwrap();
        let tags: Vec<String> = tags.iter().map(ToString::to_string).collect();
        assert_eq!(tags, vec!["vhea", "vmtx", "DSIG"]);

        let err = parse_drop_tables(&["toolong".to_string()]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTableTag(tag) if tag == "toolong"));
    }

    #[test]
    fn test_no_latin_font() {
        let request = MergeRequest { output: "out.ttf".into(), ..Default::default() };
        assert!(matches!(check_required_donors(&request), Err(ConfigError::NoLatinFont)));
    }
}
