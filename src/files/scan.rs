//! Folder listing
//!
//! Lists the regular files under a folder once, at initialization. The listing
//! is sorted and then shuffled a single time so that consecutive selections
//! don't walk the folder in name order.

use super::FileEntry;
use crate::error::InitFailure;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use regex::Regex;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// List the files under `folder`
///
/// Only files directly inside `folder` are listed unless `recursive` is set.
/// When `filter` is given, only files whose *name* it matches are kept. A
/// `seed` makes the shuffle reproducible; without one the order differs between
/// runs.
pub fn list_files(
    folder: &Path,
    recursive: bool,
    filter: Option<&Regex>,
    seed: Option<u64>,
) -> Result<Vec<FileEntry>, InitFailure> {
    let mut walker = WalkDir::new(folder)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| InitFailure::Scan {
            folder: folder.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(filter) = filter {
            if !filter.is_match(&name) {
                continue;
            }
        }
        files.push(FileEntry {
            name,
            path: entry.into_path(),
        });
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));

    let mut rng = match seed {
        Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
        None => Xoshiro256PlusPlus::from_entropy(),
    };
    files.shuffle(&mut rng);

    debug!(folder = %folder.display(), files = files.len(), recursive, "listed folder");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(files: &[FileEntry]) -> Vec<String> {
        let mut names: Vec<String> = files.iter().map(|f| f.name.clone()).collect();
        names.sort();
        names
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), b"a").unwrap();
        fs::write(dir.path().join("b.log"), b"b").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("c.txt"), b"c").unwrap();
        dir
    }

    #[test]
    fn test_recursive_listing_skips_directories() {
        let dir = fixture();
        let files = list_files(dir.path(), true, None, Some(1)).unwrap();
        assert_eq!(names(&files), vec!["a.txt", "b.log", "c.txt"]);
    }

    #[test]
    fn test_flat_listing() {
        let dir = fixture();
        let files = list_files(dir.path(), false, None, Some(1)).unwrap();
        assert_eq!(names(&files), vec!["a.txt", "b.log"]);
    }

    #[test]
    fn test_filter_matches_file_name_only() {
        let dir = fixture();
        let filter = Regex::new(r"^(?:.*\.txt)$").unwrap();
        let files = list_files(dir.path(), true, Some(&filter), Some(1)).unwrap();
        assert_eq!(names(&files), vec!["a.txt", "c.txt"]);

        // The folder name is not part of what the filter sees
        let filter = Regex::new(r"^(?:nested.*)$").unwrap();
        let files = list_files(dir.path(), true, Some(&filter), Some(1)).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_seeded_shuffle_is_reproducible() {
        let dir = TempDir::new().unwrap();
        for i in 0..20 {
            fs::write(dir.path().join(format!("f{:02}", i)), b"x").unwrap();
        }

        let first = list_files(dir.path(), false, None, Some(42)).unwrap();
        let second = list_files(dir.path(), false, None, Some(42)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 20);
    }

    #[test]
    fn test_missing_folder_is_a_scan_error() {
        let err = list_files(Path::new("/nonexistent/paramfeed/folder"), true, None, None).unwrap_err();
        assert!(matches!(err, InitFailure::Scan { .. }));
    }
}
