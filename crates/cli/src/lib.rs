//! Command-line front end for merging CJK glyphs into Latin fonts.

pub mod cli;
