use anyhow::Result;
use ignore::WalkBuilder;
use log::{debug, trace};
use std::path::Path;

use crate::{
    constants::{SOL_EXTENSION, SOURCE_DIRS},
    resolver::normalize,
    types::DiscoveredFile,
};

/// Lists the source files of a vendored tree.
///
/// Each of [`SOURCE_DIRS`] is walked in turn (entries sorted by file name);
/// missing directories are skipped. Ignore files are not honoured since the
/// tree is third-party code copied verbatim.
pub fn collect_sources(tree_root: &Path) -> Result<Vec<DiscoveredFile>> {
    debug!("Collecting source files under {}", tree_root.display());
    let mut files: Vec<DiscoveredFile> = Vec::new();

    for dir in SOURCE_DIRS {
        let start = tree_root.join(dir);
        if !start.is_dir() {
            trace!("Skipping missing source directory: {}", start.display());
            continue;
        }

        let walker = WalkBuilder::new(&start)
            .standard_filters(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for res in walker {
            let dent = res?;
            let p = dent.path();
            if !p.is_file() {
                continue;
            }
            if p.extension().and_then(|e| e.to_str()) != Some(SOL_EXTENSION) {
                continue;
            }

            let Ok(rel) = p.strip_prefix(tree_root) else {
                continue;
            };
            let name = p.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
            trace!("Found source file: {}", rel.display());
            files.push(DiscoveredFile::new(name, normalize(rel)));
        }
    }

    debug!("Collected {} source files", files.len());
    Ok(files)
}
