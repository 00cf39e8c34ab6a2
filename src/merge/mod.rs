//! Per-file three-way merge engine: classification, content merge,
//! index-wide walking, tree unpacking, and the resolve/octopus strategies.

pub mod content;
pub mod dispatch;
pub mod strategy;
pub mod types;
pub mod unpack;
pub mod walker;

pub use types::{GitMode, MergeOutcome, MergeTriple};
