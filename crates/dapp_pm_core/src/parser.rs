use anyhow::{Context, Result};
use log::{debug, trace};
use regex::Regex;
use std::{io::BufRead, path::Path, sync::LazyLock};

use crate::{constants::IMPORT_PATTERN, types::Specifier};

static IMPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(IMPORT_PATTERN).unwrap_or_else(|e| panic!("import regex: {e}")));

/// Extracts the raw import path from a single line, if the line holds an import.
///
/// The scan is regex based and unanchored: the first match anywhere on the line
/// wins, so an import inside a trailing comment is still reported. The
/// double-quoted capture is preferred; the single-quoted one is used when the
/// first is empty.
pub fn scan_line(line: &str) -> Option<String> {
    let caps = IMPORT_RE.captures(line)?;
    let double = caps.get(1).map(|m| m.as_str()).unwrap_or("");
    let request = if double.is_empty() {
        caps.get(2).map(|m| m.as_str()).unwrap_or("")
    } else {
        double
    };
    Some(request.to_string())
}

/// Scans every line of `reader` for imports, in encounter order.
///
/// Lines are split on raw bytes and decoded lossily, so invalid UTF-8 never
/// stops the scan. Only I/O errors are returned. `file` only labels errors and
/// log output.
pub fn imports_for<R: BufRead>(file: &Path, reader: R) -> Result<Vec<Specifier>> {
    trace!("Scanning file for imports: {}", file.display());
    let mut specs: Vec<Specifier> = Vec::new();

    for (idx, bytes) in reader.split(b'\n').enumerate() {
        let bytes = bytes.with_context(|| format!("Failed to read {}", file.display()))?;
        let raw = bytes.strip_suffix(b"\r").unwrap_or(&bytes[..]);
        let line = String::from_utf8_lossy(raw);
        if let Some(request) = scan_line(&line) {
            trace!("Found import '{}' at {}:{}", request, file.display(), idx + 1);
            specs.push(Specifier { request, line: idx + 1 });
        }
    }

    debug!("Found {} import specifiers in {}", specs.len(), file.display());
    Ok(specs)
}
