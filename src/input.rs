//! Line source for the command line tool
//!
//! Reads a newline-delimited text file and keeps only the data lines: every
//! line is trimmed, and blank lines or lines starting with `#` or `//` are
//! dropped. Comment markers later in a line are part of the data.

use crate::error::{SortContext, SortError, SortResult};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// True for a trimmed line that carries data
pub fn is_valid_line(line: &str) -> bool {
    !line.is_empty() && !line.starts_with('#') && !line.starts_with("//")
}

/// Collect the trimmed data lines from `reader`
pub fn parse_values<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut values = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if is_valid_line(trimmed) {
            values.push(trimmed.to_string());
        }
    }
    Ok(values)
}

/// Read the data lines of the file at `path`
pub fn read_values(path: &Path) -> SortResult<Vec<String>> {
    let filename = path.to_string_lossy();

    if path.is_dir() {
        return Err(SortError::is_directory(&filename));
    }

    let file = File::open(path).with_file_context(&filename)?;
    parse_values(BufReader::new(file)).with_file_context(&filename)
}
