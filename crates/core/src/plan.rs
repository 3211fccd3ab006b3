//! Target code point set and donor assignment.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use indexmap::IndexMap;

use crate::{
    blocks::{ASCII_BASIC, Block},
    source::{Source, SourceKinds},
};

/// Code points the output should cover, each with the kinds allowed to supply it.
#[derive(Debug, Clone, Default)]
pub struct Target {
    codepoints: BTreeMap<u32, SourceKinds>,
}

impl Target {
    /// ASCII, then corpus characters, then enabled blocks in declaration order.
    pub fn build(blocks: &BTreeSet<Block>, corpus: &BTreeSet<u32>) -> Self {
        let mut target = Self::default();
        for cp in ASCII_BASIC {
            target.insert(cp, SourceKinds::LATIN);
        }
        for &cp in corpus {
            target.insert(cp, SourceKinds::ALL);
        }
        for block in Block::ALL.into_iter().filter(|b| blocks.contains(b)) {
            let eligible = block.spec().eligible;
            for cp in block.codepoints() {
                target.insert(cp, eligible);
            }
        }
        target
    }

    /// Add a code point; eligibility accumulates across selectors.
    ///
    /// A code point inside a block range never gets more than that block's
    /// eligible kinds, whichever selector asked for it.
    pub fn insert(&mut self, cp: u32, kinds: SourceKinds) {
        let cap = Block::containing(cp).map_or(SourceKinds::ALL, |block| block.spec().eligible);
        let entry = self.codepoints.entry(cp).or_default();
        *entry = entry.union(kinds).intersection(cap);
    }

    pub fn eligible(&self, cp: u32) -> Option<SourceKinds> {
        self.codepoints.get(&cp).copied()
    }

    pub fn len(&self) -> usize {
        self.codepoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codepoints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, SourceKinds)> + '_ {
        self.codepoints.iter().map(|(cp, kinds)| (*cp, *kinds))
    }
}

/// Which source supplies each target code point.
#[derive(Debug, Clone, Default)]
pub struct Assignment {
    /// Code points the base font already maps
    pub base: BTreeSet<u32>,
    /// Code points each donor supplies, in prefer order
    pub donors: IndexMap<Source, BTreeSet<u32>>,
    /// Code points no eligible source covers
    pub unassigned: BTreeSet<u32>,
}

impl Assignment {
    /// The base keeps everything it maps. Every other code point goes to the
    /// first source in `order` that is eligible for it and covers it.
    pub fn assign(
        target: &Target,
        order: &[Source],
        base_coverage: &BTreeSet<u32>,
        coverage: &HashMap<Source, BTreeSet<u32>>,
    ) -> Self {
        let mut assignment = Self {
            donors: order.iter().filter(|s| !s.is_base()).map(|s| (*s, BTreeSet::new())).collect(),
            ..Default::default()
        };

        for (cp, eligible) in target.iter() {
            if base_coverage.contains(&cp) {
                assignment.base.insert(cp);
                continue;
            }
            let donor = order.iter().filter(|s| !s.is_base()).find(|s| {
                eligible.contains(s.kind()) && coverage.get(*s).is_some_and(|c| c.contains(&cp))
            });
            match donor {
                Some(source) => {
                    assignment.donors.entry(*source).or_default().insert(cp);
                }
                None => {
                    assignment.unassigned.insert(cp);
                }
            }
        }

        assignment
    }

    pub fn is_assigned(&self, cp: u32) -> bool {
        self.base.contains(&cp) || self.donors.values().any(|cps| cps.contains(&cp))
    }

    /// Donors that supply at least one code point, in prefer order.
    pub fn active_donors(&self) -> impl Iterator<Item = (Source, &BTreeSet<u32>)> {
        self.donors.iter().filter(|(_, cps)| !cps.is_empty()).map(|(s, cps)| (*s, cps))
    }

    /// Requested and covered counts for a block.
    pub fn block_coverage(&self, block: Block) -> (usize, usize) {
        let requested = block.codepoints().count();
        let covered = block.codepoints().filter(|cp| self.is_assigned(*cp)).count();
        (requested, covered)
    }
}
