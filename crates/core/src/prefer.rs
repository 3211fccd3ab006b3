//! Donor priority ("prefer order") parsing.

use indexmap::IndexSet;
use log::warn;

use crate::{
    error::ConfigError,
    source::{Region, Source},
};

pub const DEFAULT_PREFER_ORDER: &str = "latin,zh-tw,zh-cn,ja,kr";

/// Resolve a comma-separated prefer order against the supplied sources.
///
/// `latin` expands to every Latin source, `latin<i>` names one of them, and
/// region codes name regional sources. Tokens that are unknown or name an
/// unsupplied source are skipped with a warning; repeats keep their first
/// position.
pub fn resolve_prefer_order(
    order: &str,
    supplied: &[Source],
) -> Result<Vec<Source>, ConfigError> {
    let mut resolved: IndexSet<Source> = IndexSet::new();

    for token in order.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let candidates: Vec<Source> = match parse_token(token) {
            Some(Token::AllLatin) => {
                supplied.iter().copied().filter(|s| matches!(s, Source::Latin(_))).collect()
            }
            Some(Token::Source(source)) if supplied.contains(&source) => vec![source],
            Some(Token::Source(source)) => {
                warn!("Prefer order names {source}, which was not supplied; skipping");
                continue;
            }
            None => {
                warn!("Unknown prefer order token {token:?}; skipping");
                continue;
            }
        };
        resolved.extend(candidates);
    }

    if resolved.is_empty() {
        return Err(ConfigError::EmptyPreferOrder { order: order.to_string() });
    }

    let ignored: Vec<String> = supplied
        .iter()
        .filter(|s| !resolved.contains(*s))
        .map(ToString::to_string)
        .collect();
    if !ignored.is_empty() {
        warn!("Not in prefer order, will not donate glyphs: {}", ignored.join(", "));
    }

    Ok(resolved.into_iter().collect())
}

enum Token {
    AllLatin,
    Source(Source),
}

fn parse_token(token: &str) -> Option<Token> {
    let token = token.to_ascii_lowercase();
    if token == "latin" {
        return Some(Token::AllLatin);
    }
    if let Some(index) = token.strip_prefix("latin") {
        return index.parse().ok().map(|i| Token::Source(Source::Latin(i)));
    }
    Region::parse(&token).map(|r| Token::Source(Source::Region(r)))
}
