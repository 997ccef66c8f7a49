//! File containers
//!
//! A [`FileContainer`] is one folder of a file set: the folder's files, listed
//! once and shuffled, plus the cursor used to walk them. The pattern attached
//! to the folder is applied in one of two ways:
//!
//! - without placeholders it filters the listing at load time, so every file
//!   in the container matches;
//! - with `${name}` placeholders it is substituted with the values resolved so
//!   far on each call, and files that don't match are skipped.

pub mod pattern;
pub mod scan;

use crate::config::{FolderConfig, ParameterLevel};
use crate::error::{InitFailure, ProviderError, ProviderResult};
use crate::selection::CyclicCursor;
use crate::value::{ArgumentValue, CallerId};
use pattern::{compile_full_match, FilePattern};
use regex::Regex;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::trace;

/// One listed file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// File name without directories
    pub name: String,
    /// Full path, rooted at the configured folder
    pub path: PathBuf,
}

/// Folder, its share of selections, its pattern and its files
#[derive(Debug)]
pub struct FileContainer {
    folder: PathBuf,
    percentage: u8,
    pattern: FilePattern,
    files: Vec<FileEntry>,
    cursor: CyclicCursor,
}

impl FileContainer {
    /// List the folder described by `config`
    pub fn load(config: &FolderConfig, recursive: bool, seed: Option<u64>) -> Result<Self, InitFailure> {
        let pattern = FilePattern::parse(&config.pattern)?;

        if !config.path.is_dir() {
            return Err(InitFailure::MissingFolder(config.path.clone()));
        }

        let files = scan::list_files(&config.path, recursive, pattern.static_regex(), seed)?;
        if files.is_empty() {
            return Err(InitFailure::EmptyFolder {
                folder: config.path.clone(),
                pattern: config.pattern.clone(),
            });
        }

        let cursor = CyclicCursor::new(files.len());
        Ok(Self {
            folder: config.path.clone(),
            percentage: config.percentage,
            pattern,
            files,
            cursor,
        })
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    pub fn pattern(&self) -> &FilePattern {
        &self.pattern
    }

    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Pick the next file for `caller` whose name matches the pattern
    ///
    /// Candidates are tried in cursor order, skipping names the pattern
    /// rejects. The whole search holds the cursor lock, so concurrent callers
    /// see every file. After each file has been tried exactly once the call
    /// fails with [`ProviderError::NoMatch`] and the cursor is left as it was.
    pub fn next_file(
        &self,
        parameter: &str,
        level: ParameterLevel,
        caller: CallerId,
        resolved: &[ArgumentValue],
    ) -> ProviderResult<&FileEntry> {
        let (regex, pattern): (Cow<'_, Regex>, Cow<'_, str>) = match self.pattern.static_regex() {
            Some(regex) => (Cow::Borrowed(regex), Cow::Borrowed(self.pattern.as_str())),
            None => {
                let substituted = self.pattern.substitute(resolved);
                let regex = compile_full_match(&substituted).map_err(|source| {
                    ProviderError::InvalidPattern {
                        parameter: parameter.to_string(),
                        pattern: substituted.clone(),
                        source,
                    }
                })?;
                (Cow::Owned(regex), Cow::Owned(substituted))
            }
        };

        let found = self.cursor.select_matching(level, caller, |index| {
            self.files
                .get(index)
                .map(|entry| regex.is_match(&entry.name))
                .unwrap_or(false)
        });
        if let Some(entry) = found.and_then(|index| self.files.get(index)) {
            return Ok(entry);
        }

        trace!(parameter, pattern = %pattern, files = self.files.len(), "no file name matches");
        Err(ProviderError::NoMatch {
            parameter: parameter.to_string(),
            pattern: pattern.into_owned(),
            folder: self.folder.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn folder_with(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in files {
            fs::write(dir.path().join(name), b"data").unwrap();
        }
        dir
    }

    #[test]
    fn test_load_applies_static_filter() {
        let dir = folder_with(&["a.txt", "b.txt", "c.log"]);
        let config = FolderConfig::new(dir.path(), 100, r".*\.txt");

        let container = FileContainer::load(&config, true, Some(3)).unwrap();
        assert_eq!(container.len(), 2);
        assert!(container.files().iter().all(|f| f.name.ends_with(".txt")));
    }

    #[test]
    fn test_load_missing_folder() {
        let config = FolderConfig::new("/asdfasdf", 100, ".*");
        let err = FileContainer::load(&config, true, None).unwrap_err();
        assert!(matches!(err, InitFailure::MissingFolder(_)));
    }

    #[test]
    fn test_load_file_instead_of_folder() {
        let dir = folder_with(&["a.txt"]);
        let config = FolderConfig::new(dir.path().join("a.txt"), 100, ".*");
        let err = FileContainer::load(&config, true, None).unwrap_err();
        assert!(matches!(err, InitFailure::MissingFolder(_)));
    }

    #[test]
    fn test_load_empty_after_filter() {
        let dir = folder_with(&["a.txt"]);
        let config = FolderConfig::new(dir.path(), 100, "wrongFileNamePart.*");
        let err = FileContainer::load(&config, true, None).unwrap_err();
        assert!(matches!(err, InitFailure::EmptyFolder { .. }));
    }

    #[test]
    fn test_next_file_cycles_through_all_files() {
        let dir = folder_with(&["a", "b", "c"]);
        let config = FolderConfig::new(dir.path(), 100, ".*");
        let container = FileContainer::load(&config, true, Some(9)).unwrap();

        let mut seen: Vec<String> = (0..3)
            .map(|_| {
                container
                    .next_file("file", ParameterLevel::PerInvocation, CallerId(1), &[])
                    .unwrap()
                    .name
                    .clone()
            })
            .collect();
        seen.sort();
        assert_eq!(seen, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_next_file_uses_resolved_placeholder() {
        let dir = folder_with(&["bob_1.txt", "alice_2.txt", "bob_3.txt", "carol_4.txt"]);
        let config = FolderConfig::new(dir.path(), 100, r"${user}_\d+\.txt");
        let container = FileContainer::load(&config, true, Some(5)).unwrap();
        assert_eq!(container.len(), 4);

        let resolved = vec![ArgumentValue::new("user", "bob")];
        for _ in 0..6 {
            let file = container
                .next_file("file", ParameterLevel::PerInvocation, CallerId(1), &resolved)
                .unwrap();
            assert!(file.name.starts_with("bob_"), "unexpected {}", file.name);
        }
    }

    #[test]
    fn test_next_file_no_match() {
        let dir = folder_with(&["alice_2.txt", "carol_4.txt", "dave_5.txt"]);
        let config = FolderConfig::new(dir.path(), 100, r"${user}_\d+\.txt");
        let container = FileContainer::load(&config, true, Some(5)).unwrap();

        let alice = vec![ArgumentValue::new("user", "alice")];
        container
            .next_file("file", ParameterLevel::PerInvocation, CallerId(1), &alice)
            .unwrap();
        let before = container.cursor.shared_position();

        let bob = vec![ArgumentValue::new("user", "bob")];
        let err = container
            .next_file("file", ParameterLevel::PerInvocation, CallerId(1), &bob)
            .unwrap_err();
        assert!(err
            .to_string()
            .starts_with(r"No files matching regex pattern 'bob_\d+\.txt' in directory"));

        // Every file was tried once: the shared cursor went full circle
        assert_eq!(container.cursor.shared_position(), before);

        let err = container
            .next_file("file", ParameterLevel::PerThread, CallerId(2), &bob)
            .unwrap_err();
        assert!(matches!(err, ProviderError::NoMatch { .. }));
        assert_eq!(container.cursor.caller_position(CallerId(2)), None);
    }

    #[test]
    fn test_concurrent_callers_with_different_patterns_always_match() {
        let dir = folder_with(&["alice_1.txt", "bob_1.txt"]);
        let config = FolderConfig::new(dir.path(), 100, r"${user}_\d+\.txt");
        let container = FileContainer::load(&config, true, Some(1)).unwrap();

        let failures: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8u64)
                .map(|t| {
                    let container = &container;
                    scope.spawn(move || {
                        let user = if t % 2 == 0 { "alice" } else { "bob" };
                        let resolved = vec![ArgumentValue::new("user", user)];
                        (0..2000)
                            .filter(|_| {
                                match container.next_file("file", ParameterLevel::PerInvocation, CallerId(t), &resolved) {
                                    Ok(entry) => !entry.name.starts_with(user),
                                    Err(_) => true,
                                }
                            })
                            .count()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });

        assert_eq!(failures, 0);
    }

    #[test]
    fn test_next_file_invalid_substituted_pattern() {
        let dir = folder_with(&["a.txt"]);
        let config = FolderConfig::new(dir.path(), 100, r"${user}\.txt");
        let container = FileContainer::load(&config, true, None).unwrap();

        let resolved = vec![ArgumentValue::new("user", "(")];
        let err = container
            .next_file("file", ParameterLevel::PerInvocation, CallerId(1), &resolved)
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidPattern { .. }));
    }

    #[test]
    fn test_sticky_caller_moves_past_mismatch_and_stays() {
        let dir = folder_with(&["alice_1.txt", "bob_1.txt"]);
        let config = FolderConfig::new(dir.path(), 100, r"${user}_\d+\.txt");
        let container = FileContainer::load(&config, true, Some(11)).unwrap();

        let bob = vec![ArgumentValue::new("user", "bob")];
        let caller = CallerId(7);
        let first = container
            .next_file("file", ParameterLevel::PerThreadStatic, caller, &bob)
            .unwrap()
            .clone();
        assert_eq!(first.name, "bob_1.txt");

        for _ in 0..3 {
            let again = container
                .next_file("file", ParameterLevel::PerThreadStatic, caller, &bob)
                .unwrap();
            assert_eq!(again, &first);
        }
    }
}
