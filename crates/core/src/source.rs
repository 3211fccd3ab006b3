//! Source fonts and the kinds they belong to.

use std::{
    fmt::{self, Display},
    ops::BitOr,
};

/// Regional CJK source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    ZhTw,
    ZhCn,
    Ja,
    Kr,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::ZhTw, Region::ZhCn, Region::Ja, Region::Kr];

    /// Token used on the command line and in prefer orders.
    pub const fn code(self) -> &'static str {
        match self {
            Region::ZhTw => "zh-tw",
            Region::ZhCn => "zh-cn",
            Region::Ja => "ja",
            Region::Kr => "kr",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.code() == code)
    }

    pub const fn kind(self) -> SourceKinds {
        match self {
            Region::ZhTw => SourceKinds::ZH_TW,
            Region::ZhCn => SourceKinds::ZH_CN,
            Region::Ja => SourceKinds::JA,
            Region::Kr => SourceKinds::KR,
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A supplied font: one of the `--latin` fonts by position, or a regional font.
///
/// `Latin(0)` is the base font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Source {
    Latin(usize),
    Region(Region),
}

impl Source {
    pub const BASE: Source = Source::Latin(0);

    pub const fn kind(self) -> SourceKinds {
        match self {
            Source::Latin(_) => SourceKinds::LATIN,
            Source::Region(region) => region.kind(),
        }
    }

    pub const fn is_base(self) -> bool {
        matches!(self, Source::Latin(0))
    }
}

impl Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Latin(i) => write!(f, "latin{i}"),
            Source::Region(region) => region.fmt(f),
        }
    }
}

/// Set of source kinds, stored as a bit mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SourceKinds(u8);

impl SourceKinds {
    pub const NONE: Self = Self(0);
    pub const LATIN: Self = Self(1);
    pub const ZH_TW: Self = Self(1 << 1);
    pub const ZH_CN: Self = Self(1 << 2);
    pub const JA: Self = Self(1 << 3);
    pub const KR: Self = Self(1 << 4);
    pub const REGIONS: Self = Self(Self::ZH_TW.0 | Self::ZH_CN.0 | Self::JA.0 | Self::KR.0);
    pub const CHINESE: Self = Self(Self::ZH_TW.0 | Self::ZH_CN.0);
    pub const ALL: Self = Self(Self::LATIN.0 | Self::REGIONS.0);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Human-readable list of the kinds in this set, e.g. `zh-tw or zh-cn`.
    pub fn describe(self) -> String {
        let mut names: Vec<&str> = Vec::new();
        if self.contains(Self::LATIN) {
            names.push("latin");
        }
        names.extend(Region::ALL.iter().filter(|r| self.contains(r.kind())).map(|r| r.code()));
        names.join(" or ")
    }
}

impl BitOr for SourceKinds {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl FromIterator<SourceKinds> for SourceKinds {
    fn from_iter<I: IntoIterator<Item = SourceKinds>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, Self::union)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_codes_round_trip() {
        for region in Region::ALL {
            assert_eq!(Region::parse(region.code()), Some(region));
        }
        assert_eq!(Region::parse("zh-hk"), None);
    }

    #[test]
    fn test_source_display() {
        assert_eq!(Source::BASE.to_string(), "latin0");
        assert_eq!(Source::Latin(2).to_string(), "latin2");
        assert_eq!(Source::Region(Region::ZhCn).to_string(), "zh-cn");
    }

    #[test]
    fn test_source_kinds() {
        assert!(SourceKinds::REGIONS.contains(SourceKinds::JA));
        assert!(!SourceKinds::REGIONS.contains(SourceKinds::LATIN));
        assert!(SourceKinds::CHINESE.intersects(SourceKinds::ZH_TW | SourceKinds::KR));
        assert!(!SourceKinds::CHINESE.intersects(SourceKinds::JA));

        let kinds: SourceKinds = [Source::BASE, Source::Region(Region::Kr)]
            .iter()
            .map(|s| s.kind())
            .collect();
        assert_eq!(kinds, SourceKinds::LATIN | SourceKinds::KR);
    }

    #[test]
    fn test_describe() {
        assert_eq!(SourceKinds::CHINESE.describe(), "zh-tw or zh-cn");
        assert_eq!(SourceKinds::LATIN.describe(), "latin");
        assert_eq!(SourceKinds::REGIONS.describe(), "zh-tw or zh-cn or ja or kr");
    }
}
