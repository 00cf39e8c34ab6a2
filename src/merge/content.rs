//! Content Merge Worker: runs the three-way text merge, writes the result
//! to the working tree, and stages it.

use git2::Oid;

use crate::error::Result;
use crate::git::Repository;
use crate::merge::types::GitMode;

/// Outcome of merging three byte buffers.
pub struct ContentMergeResult {
    pub content: Vec<u8>,
    /// True iff the merge left conflict markers in `content`.
    pub conflicted: bool,
}

/// The content-level merge algorithm, modeled as a pluggable black box over
/// three byte buffers (base, ours, theirs) per the boundary this subsystem
/// treats it as.
pub trait ContentMerger {
    fn merge(&self, base: &[u8], ours: &[u8], theirs: &[u8]) -> Result<ContentMergeResult>;
}

/// Three-way text merge backed by `diffy`, with a byte-equality fallback
/// for content that isn't valid UTF-8 (`diffy` operates on `&str`).
pub struct DiffyMerger;

impl ContentMerger for DiffyMerger {
    fn merge(&self, base: &[u8], ours: &[u8], theirs: &[u8]) -> Result<ContentMergeResult> {
        match (
            std::str::from_utf8(base),
            std::str::from_utf8(ours),
            std::str::from_utf8(theirs),
        ) {
            (Ok(b), Ok(o), Ok(t)) => match diffy::merge(b, o, t) {
                Ok(clean) => Ok(ContentMergeResult {
                    content: clean.into_bytes(),
                    conflicted: false,
                }),
                Err(conflicted) => Ok(ContentMergeResult {
                    content: conflicted.into_bytes(),
                    conflicted: true,
                }),
            },
            _ => Ok(binary_fallback(base, ours, theirs)),
        }
    }
}

/// `diffy::merge` only understands text; for binary content we can only
/// tell whether both sides agree.
fn binary_fallback(base: &[u8], ours: &[u8], theirs: &[u8]) -> ContentMergeResult {
    if ours == theirs {
        return ContentMergeResult {
            content: ours.to_vec(),
            conflicted: false,
        };
    }
    if ours == base {
        return ContentMergeResult {
            content: theirs.to_vec(),
            conflicted: false,
        };
    }
    if theirs == base {
        return ContentMergeResult {
            content: ours.to_vec(),
            conflicted: false,
        };
    }
    let mut content = Vec::new();
    content.extend_from_slice(b"<<<<<<< ours\n");
    content.extend_from_slice(ours);
    content.extend_from_slice(b"\n=======\n");
    content.extend_from_slice(theirs);
    content.extend_from_slice(b"\n>>>>>>> theirs\n");
    ContentMergeResult {
        content,
        conflicted: true,
    }
}

/// Runs the content merge for one path, writes the result to the working
/// tree under `ours`'s mode, and stages it as the clean (stage 0) entry.
/// Returns `ConflictKept` if the sticky per-path error flag ended up set:
/// the merge itself conflicted, this was an add/add (no base), or ours and
/// theirs disagree on mode.
pub fn merge_content(
    repo: &Repository,
    index: &mut git2::Index,
    merger: &dyn ContentMerger,
    path: &str,
    orig: Option<(Oid, GitMode)>,
    ours: (Oid, GitMode),
    theirs: (Oid, GitMode),
) -> Result<crate::merge::types::MergeOutcome> {
    let orig_bytes = match orig {
        Some((oid, _)) => repo.read_blob(oid)?,
        None => Vec::new(),
    };
    let ours_bytes = repo.read_blob(ours.0)?;
    let theirs_bytes = repo.read_blob(theirs.0)?;

    let result = merger.merge(&orig_bytes, &ours_bytes, &theirs_bytes)?;

    let sticky = result.conflicted || orig.is_none() || ours.1 != theirs.1;

    repo.checkout_blob(path, &result.content, ours.1 .0)?;

    let new_oid = repo.write_blob(&result.content)?;
    crate::git::repo::Repository::stage_clean(index, path, new_oid, ours.1 .0)?;

    Ok(if sticky {
        crate::merge::types::MergeOutcome::ConflictKept
    } else {
        crate::merge::types::MergeOutcome::Resolved
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_merge_has_no_conflict() {
        let merger = DiffyMerger;
        let result = merger.merge(b"a\nb\nc\n", b"a\nB\nc\n", b"a\nb\nC\n").unwrap();
        assert!(!result.conflicted);
    }

    #[test]
    fn overlapping_edits_conflict() {
        let merger = DiffyMerger;
        let result = merger.merge(b"a\n", b"ours\n", b"theirs\n").unwrap();
        assert!(result.conflicted);
    }

    #[test]
    fn binary_identical_sides_are_clean() {
        let merger = DiffyMerger;
        let bin = [0u8, 159, 255, 1];
        let result = merger.merge(&[0u8, 0], &bin, &bin).unwrap();
        assert!(!result.conflicted);
        assert_eq!(result.content, bin.to_vec());
    }
}
