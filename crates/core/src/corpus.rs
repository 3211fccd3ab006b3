//! Corpus text files whose characters join the target set.

use std::{
    collections::BTreeSet,
    fs::read,
    path::{Path, PathBuf},
};

use glob::glob;
use log::{debug, warn};

use crate::error::{ConfigError, InputError};

const GLOB_META: &[char] = &['*', '?', '['];

/// Expand corpus arguments into file paths.
///
/// Arguments containing glob metacharacters are expanded and may match
/// nothing (with a warning); other arguments are taken as literal paths.
pub fn expand_corpus_patterns(patterns: &[String]) -> Result<Vec<PathBuf>, ConfigError> {
    let mut paths = Vec::new();
    for pattern in patterns {
        if !pattern.contains(GLOB_META) {
            paths.push(PathBuf::from(pattern));
            continue;
        }
        let matches: Vec<PathBuf> = glob(pattern)
            .map_err(|e| ConfigError::InvalidCorpusPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?
            .filter_map(Result::ok)
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            warn!("Corpus pattern {pattern:?} matched no files");
        }
        paths.extend(matches);
    }
    Ok(paths)
}

/// Read the code points used by a set of UTF-8 text files.
///
/// Invalid UTF-8 sequences, control characters and U+FFFD are ignored.
pub fn read_corpus(paths: &[PathBuf]) -> Result<BTreeSet<u32>, InputError> {
    let mut codepoints = BTreeSet::new();
    for path in paths {
        let chars = read_corpus_file(path)?;
        debug!("Corpus {}: {} distinct characters", path.display(), chars.len());
        codepoints.extend(chars);
    }
    Ok(codepoints)
}

fn read_corpus_file(path: &Path) -> Result<BTreeSet<u32>, InputError> {
    let bytes = read(path)
        .map_err(|source| InputError::Unreadable { path: path.to_path_buf(), source })?;
    Ok(String::from_utf8_lossy(&bytes)
        .chars()
        .filter(|c| !c.is_control() && *c != char::REPLACEMENT_CHARACTER)
        .map(u32::from)
        .collect())
}
