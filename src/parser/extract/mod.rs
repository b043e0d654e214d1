//! Per-node extractors the segmenter delegates to.

pub mod fields;
pub mod returns;
pub mod subtypes;
