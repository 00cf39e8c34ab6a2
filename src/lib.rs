//! Hook dispatcher and three-way merge helper library.

pub mod config;
pub mod debug;
pub mod error;
pub mod git;
pub mod hooks;
pub mod merge;

pub use error::{GithookedError, Result};
