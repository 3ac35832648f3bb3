use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// List the workout files directly inside `dir`.
///
/// Yields regular files only, in whatever order the filesystem listing
/// returns them; no sort is imposed and subdirectories are skipped. The
/// sequence is lazy and consumed once.
pub fn workout_files(dir: &Path) -> io::Result<impl Iterator<Item = io::Result<PathBuf>>> {
    let entries = fs::read_dir(dir)?;
    Ok(entries.filter_map(|entry| {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => return Some(Err(e)),
        };
        match entry.file_type() {
            Ok(ty) if ty.is_file() => Some(Ok(entry.path())),
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        }
    }))
}
