//! Domain-specific newtypes for type safety
//!
//! Source glyph ids and merged glyph ids are different spaces once donor
//! glyphs are appended after the base glyphs; keeping them apart in the type
//! system stops a donor gid from leaking into the output unchanged.

use std::{
    fmt,
    fmt::{Display, Formatter, Result},
};

use read_fonts::types::Tag;

macro_rules! u16_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u16);

        impl $name {
            pub const fn new(id: u16) -> Self {
                Self(id)
            }

            pub const fn to_u16(self) -> u16 {
                self.0
            }

            pub const fn to_u32(self) -> u32 {
                self.0 as u32
            }
        }

        impl From<u16> for $name {
            fn from(id: u16) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u16 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $label, self.0)
            }
        }
    };
}

/// Index into the donor list passed to the merger
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DonorIndex(pub usize);

impl DonorIndex {
    pub const fn new(idx: usize) -> Self {
        Self(idx)
    }

    pub const fn as_usize(self) -> usize {
        self.0
    }
}

impl Display for DonorIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "Donor[{}]", self.0)
    }
}

u16_id!(
    /// A glyph ID in a source font (base or donor) before appending
    GlyphId,
    "GID"
);

u16_id!(
    /// A glyph ID in the merged output font
    MergedGlyphId,
    "MGID"
);

/// A Unicode codepoint
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Codepoint(pub u32);

impl Codepoint {
    pub const fn new(cp: u32) -> Self {
        Self(cp)
    }

    pub const fn to_u32(self) -> u32 {
        self.0
    }
}

impl From<u32> for Codepoint {
    fn from(cp: u32) -> Self {
        Self(cp)
    }
}

impl Display for Codepoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "U+{:04X}", self.0)
    }
}

/// A font table tag (always 4 bytes)
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableTag(Tag);

impl TableTag {
    /// Parse a tag from user input.
    ///
    /// Returns None for empty strings and strings longer than 4 bytes.
    /// Shorter strings are padded with spaces, so `"CFF"` becomes `"CFF "`.
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        (!bytes.is_empty() && bytes.len() <= 4).then(|| {
            let mut arr = [b' '; 4];
            arr[..bytes.len()].copy_from_slice(bytes);
            Self(Tag::new(&arr))
        })
    }

    pub fn to_bytes(&self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

impl From<Tag> for TableTag {
    fn from(tag: Tag) -> Self {
        Self(tag)
    }
}

impl Display for TableTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.0)
    }
}
