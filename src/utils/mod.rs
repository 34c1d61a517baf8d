//! Common utilities and helper functions
//!
//! Flat text files with one entry per line are the only on-disk format this
//! tool knows about; both the roster and the exclusion list use it.

pub mod retry;

use std::fs;
use std::io;
use std::path::Path;

/// Read a file and split it into lines
///
/// Line terminators (`\n` or `\r\n`) are dropped, a trailing newline does not
/// produce an empty last entry. No further validation is applied, so blank
/// lines in the middle of the file are kept.
pub fn read_lines(path: &Path) -> io::Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content.lines().map(str::to_string).collect())
}

/// Write entries newline-joined, without a trailing newline
pub fn write_lines(path: &Path, lines: &[String]) -> io::Result<()> {
    fs::write(path, lines.join("\n"))
}
