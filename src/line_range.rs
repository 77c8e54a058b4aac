//! Removal of a fixed, contiguous range of lines from a text file
//!
//! The range is a literal pair of 0-indexed bounds. No attempt is made to check
//! that the removed lines form any meaningful unit (a matching code block, a
//! closing tag, ...): whatever sits at those positions is dropped.
//!
//! # Examples
//!
//! ```
//! use hbs_maintenance::line_range::{remove_range, split_lines, LineRange};
//!
//! let lines = split_lines("a\nb\nc\nd\n");
//! let range = LineRange::new(1, 3).unwrap();
//! assert_eq!(remove_range(&lines, range).concat(), "a\nd\n");
//! ```
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

#[derive(Debug, thiserror::Error)]
pub enum LineRangeError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid line range: start {start} is past end {end}")]
    InvalidRange { start: usize, end: usize },
}

/// Half-open, 0-indexed line range (`start..end`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    start: usize,
    end: usize,
}

impl LineRange {
    /// Lines 511-647 (one-indexed) of the bookings page: the old modal markup.
    pub const DEFAULT: LineRange = LineRange {
        start: 510,
        end: 647,
    };

    pub fn new(start: usize, end: usize) -> Result<Self, LineRangeError> {
        if start > end {
            return Err(LineRangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub const fn start(&self) -> usize {
        self.start
    }

    pub const fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl Default for LineRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for LineRange {
    // One-indexed, inclusive, the way an editor shows it
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start + 1, self.end)
    }
}

/// Counts reported after a removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalSummary {
    pub path: PathBuf,
    pub range: LineRange,
    pub original_lines: usize,
    pub new_lines: usize,
}

impl RemovalSummary {
    pub fn removed_lines(&self) -> usize {
        self.original_lines - self.new_lines
    }
}

impl fmt::Display for RemovalSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Removed lines {} from {}",
            self.range,
            self.path.display()
        )?;
        writeln!(f, "Old line count: {}", self.original_lines)?;
        writeln!(f, "New line count: {}", self.new_lines)?;
        write!(f, "Lines removed: {}", self.removed_lines())
    }
}

/// Split text into lines, each keeping its terminator.
///
/// A trailing line without a newline is still a line; an empty string has none.
pub fn split_lines(content: &str) -> Vec<&str> {
    content.split_inclusive('\n').collect()
}

/// Drop `range` from `lines`.
///
/// Bounds past the end are clamped, so a short input comes back partly or
/// wholly unchanged instead of failing.
pub fn remove_range<'a>(lines: &[&'a str], range: LineRange) -> Vec<&'a str> {
    let start = range.start.min(lines.len());
    let end = range.end.min(lines.len());

    let mut kept = Vec::with_capacity(lines.len() - (end - start));
    kept.extend_from_slice(&lines[..start]);
    kept.extend_from_slice(&lines[end..]);
    kept
}

/// Remove `range` from the file at `path`, overwriting it in place.
///
/// There is no backup. If the write fails after a successful read the file may
/// be left truncated.
#[instrument(skip_all, fields(path = %path.display(), range = %range))]
pub fn remove_lines_from_file(
    path: &Path,
    range: LineRange,
) -> Result<RemovalSummary, LineRangeError> {
    let summary = plan_removal(path, range, |path, contents| {
        fs::write(path, contents).map_err(|source| LineRangeError::Write {
            path: path.to_path_buf(),
            source,
        })
    })?;

    info!(
        original = summary.original_lines,
        new = summary.new_lines,
        "Rewrote file"
    );
    Ok(summary)
}

/// Compute the counts `remove_lines_from_file` would report, without writing.
#[instrument(skip_all, fields(path = %path.display(), range = %range))]
pub fn preview_removal(path: &Path, range: LineRange) -> Result<RemovalSummary, LineRangeError> {
    plan_removal(path, range, |_, _| Ok(()))
}

fn plan_removal<F>(
    path: &Path,
    range: LineRange,
    write: F,
) -> Result<RemovalSummary, LineRangeError>
where
    F: FnOnce(&Path, &str) -> Result<(), LineRangeError>,
{
    let content = fs::read_to_string(path).map_err(|source| LineRangeError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let lines = split_lines(&content);
    debug!("Read {} lines", lines.len());

    if lines.len() < range.end {
        warn!(
            line_count = lines.len(),
            range_end = range.end,
            "File is shorter than the range end; fewer lines than requested will be removed"
        );
    }

    let kept = remove_range(&lines, range);
    write(path, &kept.concat())?;

    Ok(RemovalSummary {
        path: path.to_path_buf(),
        range,
        original_lines: lines.len(),
        new_lines: kept.len(),
    })
}
