use std::{
    env,
    io::{self, Write},
    path::{Component, Path, PathBuf},
};

use colored::Colorize;
use log::{debug, trace};
use serde::Serialize;

use crate::types::{InstallResult, ListResult};

/// Display `path` relative to the current working directory when possible
fn relativize_to_cwd(path: &Path) -> String {
    let cwd = match env::current_dir() {
        Ok(cwd) => cwd,
        Err(_) => {
            debug!("Failed to get current directory");
            return path.display().to_string();
        }
    };

    match make_relative(path, &cwd) {
        Some(rel_path) => {
            let result = rel_path.display().to_string();
            trace!("Relativized '{}' to '{}'", path.display(), result);
            result
        }
        None => path.display().to_string(),
    }
}

/// Create a relative path from `base` to `target`
fn make_relative(target: &Path, base: &Path) -> Option<PathBuf> {
    let target_parts: Vec<Component> = target.components().collect();
    let base_parts: Vec<Component> = base.components().collect();

    // Paths on different roots (or one relative, one absolute) can't be related
    if target_parts.first() != base_parts.first() {
        return None;
    }

    let common = target_parts.iter().zip(&base_parts).take_while(|(t, b)| t == b).count();

    let mut result = PathBuf::new();
    for _ in &base_parts[common..] {
        result.push("..");
    }
    for component in &target_parts[common..] {
        match component {
            Component::Normal(p) => result.push(p),
            Component::ParentDir => result.push(".."),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    if result.as_os_str().is_empty() { Some(PathBuf::from(".")) } else { Some(result) }
}

/// Writes `value` as pretty-printed JSON followed by a newline.
pub fn print_json<W: Write, T: Serialize>(writer: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()
}

/// Lists every source file as `[X] name (path)`, followed by its direct imports.
pub fn print_file_list<W: Write>(writer: &mut W, result: &ListResult) -> io::Result<()> {
    debug!("Printing {} files", result.files.len());
    writeln!(
        writer,
        "{} {} ({} files, {} imports)\n",
        "●".bright_blue(),
        result.dependency.to_string().bold(),
        result.files.len().to_string().cyan(),
        result.edges.to_string().cyan()
    )?;

    for file in &result.files {
        let mark = if file.selected { "X".green().bold() } else { " ".normal() };
        writeln!(writer, "[{}] {} ({})", mark, file.name.bright_white(), file.path.dimmed())?;

        for (idx, dep) in file.deps.iter().enumerate() {
            let prefix = if idx == file.deps.len() - 1 { "└──" } else { "├──" };
            writeln!(writer, "    {}  {}", prefix.dimmed(), dep)?;
        }
    }

    writer.flush()?;
    Ok(())
}

pub fn print_install_summary<W: Write>(writer: &mut W, result: &InstallResult) -> io::Result<()> {
    let verb = if result.dry_run { "Would copy" } else { "Copied" };
    writeln!(
        writer,
        "{} {} {} files from {} into {}",
        "✓".green().bold(),
        verb,
        result.files.len().to_string().cyan(),
        result.dependency.to_string().bold(),
        relativize_to_cwd(&result.destination).blue()
    )?;

    for path in &result.files {
        let path = path.display().to_string();
        if result.selected.contains(&path) {
            writeln!(writer, "  {} {}", "●".green(), path)?;
        } else {
            writeln!(writer, "  {} {}", "○".dimmed(), path.dimmed())?;
        }
    }

    writer.flush()?;
    Ok(())
}
