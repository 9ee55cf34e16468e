use crate::error::{IoContext, Result};
use itertools::Itertools;
use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

/// Persistent set of test files whose last actual output matched the expected
/// output. Batch runs use it to skip tests that are already known to pass.
///
/// The set is kept in memory and written back as newline-delimited, sorted
/// text on every change.
#[derive(Debug)]
pub struct MatchedTestTracker {
    path: PathBuf,
    matched: Mutex<BTreeSet<String>>,
}

impl MatchedTestTracker {
    /// Load the tracker from `path`. A missing or unreadable file starts an
    /// empty set.
    pub fn load(path: &Path) -> Self {
        let mut matched = BTreeSet::new();
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => {
                    matched.extend(
                        content
                            .lines()
                            .map(str::trim)
                            .filter(|line| !line.is_empty())
                            .map(String::from),
                    );
                    if !matched.is_empty() {
                        tracing::info!(
                            "Loaded {} previously matched test(s): {}",
                            matched.len(),
                            matched.iter().join(", ")
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!("failed to load matched tests from {}: {}", path.display(), e);
                }
            }
        }

        Self {
            path: path.to_path_buf(),
            matched: Mutex::new(matched),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeSet<String>> {
        self.matched
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn save(&self, matched: &BTreeSet<String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).at(parent)?;
        }
        fs::write(&self.path, matched.iter().join("\n")).at(&self.path)
    }

    pub fn is_matched(&self, name: &str) -> bool {
        self.lock().contains(name)
    }

    /// Mark a single test file as matched. No-op when it already is.
    pub fn mark_matched(&self, name: &str) -> Result<()> {
        let mut matched = self.lock();
        if matched.insert(name.to_string()) {
            self.save(&matched)?;
            tracing::info!("Marked {} as matched", name);
        }
        Ok(())
    }

    /// Mark several test files as matched, persisting once. Returns how many
    /// names were newly added.
    pub fn mark_all_matched<I, S>(&self, names: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut matched = self.lock();
        let added = names
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| matched.insert(name.clone()))
            .count();
        if added > 0 {
            self.save(&matched)?;
            tracing::info!("Marked {} test(s) as matched", added);
        }
        Ok(added)
    }

    /// Drop a single test file from the set so the next batch run repeats it.
    pub fn unmark(&self, name: &str) -> Result<bool> {
        let mut matched = self.lock();
        if matched.remove(name) {
            self.save(&matched)?;
            tracing::info!("Unmarked {}", name);
            return Ok(true);
        }
        Ok(false)
    }

    /// Forget every matched test. `silent` suppresses the user-facing notice
    /// for internal resets such as loading a new problem.
    pub fn clear_all(&self, silent: bool) -> Result<()> {
        let mut matched = self.lock();
        matched.clear();
        self.save(&matched)?;
        if silent {
            tracing::debug!("matched test tracking reset");
        } else {
            tracing::info!("Cleared all matched tests");
        }
        Ok(())
    }

    pub fn matched(&self) -> BTreeSet<String> {
        self.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Keep only the files whose name is not in the matched set.
    pub fn filter_unmatched(&self, files: Vec<PathBuf>) -> Vec<PathBuf> {
        let matched = self.lock();
        files
            .into_iter()
            .filter(|file| {
                file.file_name()
                    .map(|name| !matched.contains(name.to_string_lossy().as_ref()))
                    .unwrap_or(true)
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn persists_sorted_newline_delimited() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".matched-tests.txt");
        let tracker = MatchedTestTracker::load(&path);

        tracker.mark_all_matched(["3.txt", "1.txt"]).unwrap();
        tracker.mark_matched("2.txt").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "1.txt\n2.txt\n3.txt");
    }

    #[test]
    fn reload_restores_state() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".matched-tests.txt");
        fs::write(&path, "1.txt\n\n  \n2.txt\n").unwrap();

        let tracker = MatchedTestTracker::load(&path);

        assert_eq!(tracker.count(), 2);
        assert!(tracker.is_matched("1.txt"));
        assert!(tracker.is_matched("2.txt"));
    }

    #[test]
    fn marking_twice_is_a_no_op() {
        let tmp = TempDir::new().unwrap();
        let tracker = MatchedTestTracker::load(&tmp.path().join(".matched-tests.txt"));

        assert_eq!(tracker.mark_all_matched(["1.txt"]).unwrap(), 1);
        assert_eq!(tracker.mark_all_matched(["1.txt"]).unwrap(), 0);
        assert_eq!(tracker.count(), 1);
    }

    #[test]
    fn unmark_and_clear() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".matched-tests.txt");
        let tracker = MatchedTestTracker::load(&path);
        tracker.mark_all_matched(["1.txt", "2.txt"]).unwrap();

        assert!(tracker.unmark("1.txt").unwrap());
        assert!(!tracker.unmark("1.txt").unwrap());
        assert_eq!(tracker.matched(), BTreeSet::from([String::from("2.txt")]));

        tracker.clear_all(true).unwrap();
        assert_eq!(tracker.count(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn filter_unmatched_files() {
        let tmp = TempDir::new().unwrap();
        let tracker = MatchedTestTracker::load(&tmp.path().join(".matched-tests.txt"));
        tracker.mark_matched("2.txt").unwrap();

        let files = vec![
            PathBuf::from("sample/input/1.txt"),
            PathBuf::from("sample/input/2.txt"),
            PathBuf::from("sample/input/3.txt"),
        ];

        assert_eq!(
            tracker.filter_unmatched(files),
            vec![
                PathBuf::from("sample/input/1.txt"),
                PathBuf::from("sample/input/3.txt"),
            ]
        );
    }
}
