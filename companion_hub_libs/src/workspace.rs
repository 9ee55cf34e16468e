use crate::error::{HubError, IoContext, Result};
use itertools::Itertools;
use std::{
    fs,
    path::{Component, Path, PathBuf},
};

pub const SAMPLE_INPUT_DIR: &str = "sample/input";
pub const SAMPLE_OUTPUT_DIR: &str = "sample/output";
pub const OUTPUT_DIR: &str = "output";
pub const ARCHIVES_DIR: &str = "archives";
pub const PROBLEM_META_FILE: &str = ".problem-meta.txt";
pub const MATCHED_TESTS_FILE: &str = ".matched-tests.txt";

/// Fixed on-disk layout of a problem workspace and the file primitives the
/// other components are built on.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    solution: PathBuf,
}

impl Workspace {
    pub fn new(root: &Path, solution: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            solution: solution.to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn sample_input_dir(&self) -> PathBuf {
        self.root.join(SAMPLE_INPUT_DIR)
    }

    pub fn sample_output_dir(&self) -> PathBuf {
        self.root.join(SAMPLE_OUTPUT_DIR)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join(OUTPUT_DIR)
    }

    pub fn archives_dir(&self) -> PathBuf {
        self.root.join(ARCHIVES_DIR)
    }

    pub fn problem_meta_file(&self) -> PathBuf {
        self.root.join(PROBLEM_META_FILE)
    }

    pub fn matched_tests_file(&self) -> PathBuf {
        self.root.join(MATCHED_TESTS_FILE)
    }

    pub fn solution_file(&self) -> PathBuf {
        self.root.join(&self.solution)
    }

    /// File name the solution source is stored under inside an archive.
    pub fn solution_file_name(&self) -> String {
        self.solution
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or(String::from("solution"))
    }

    /// Write `content` to `path`, creating parent directories and truncating
    /// any existing file.
    pub fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).at(parent)?;
        }
        fs::write(path, content).at(path)
    }

    pub fn read_file(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).at(path)
    }

    /// Read a text file written by arbitrary programs. Invalid UTF-8 is
    /// replaced with U+FFFD instead of failing.
    pub fn read_file_lossy(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).at(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Delete everything below `dir` and leave it behind as an empty directory.
    pub fn clear_dir(&self, dir: &Path) -> Result<()> {
        if dir.exists() {
            fs::remove_dir_all(dir).at(dir)?;
        }
        fs::create_dir_all(dir).at(dir)?;
        tracing::debug!("cleared {}", dir.display());
        Ok(())
    }

    /// Remove a file if it is there. Returns whether something was removed.
    pub fn remove_file_if_exists(&self, path: &Path) -> Result<bool> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(HubError::IoError {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    /// Regular files in `dir`, sorted by name. A missing directory is empty.
    pub fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in fs::read_dir(dir).at(dir)? {
            let path = entry.at(dir)?.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// `<n>.txt` files in `dir` as `(n, path)` pairs in ascending numeric order.
    pub fn list_numbered_files(&self, dir: &Path) -> Result<Vec<(u32, PathBuf)>> {
        Ok(self
            .list_files(dir)?
            .into_iter()
            .filter_map(|path| test_number(&path).map(|number| (number, path)))
            .sorted_by_key(|(number, _)| *number)
            .collect())
    }

    /// Copy every regular file from `from` into `to`, replacing existing files.
    pub fn copy_files(&self, from: &Path, to: &Path) -> Result<usize> {
        fs::create_dir_all(to).at(to)?;
        let files = self.list_files(from)?;
        for file in files.iter() {
            if let Some(name) = file.file_name() {
                let target = to.join(name);
                fs::copy(file, &target).at(&target)?;
            }
        }
        Ok(files.len())
    }

    pub fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).at(parent)?;
        }
        fs::copy(from, to).at(to)?;
        Ok(())
    }

    pub fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        fs::rename(from, to).at(from)
    }

    /// Recursively delete a directory.
    pub fn remove_dir(&self, dir: &Path) -> Result<()> {
        fs::remove_dir_all(dir).at(dir)
    }

    pub fn is_empty_dir(&self, dir: &Path) -> Result<bool> {
        Ok(fs::read_dir(dir).at(dir)?.next().is_none())
    }
}

/// Numeric stem of a `<n>.txt` test file.
pub fn test_number(path: &Path) -> Option<u32> {
    if path.extension()? != "txt" {
        return None;
    }
    path.file_stem()?.to_str()?.parse().ok()
}

/// Ensure `name` is a single plain path component so it can be joined to a
/// workspace directory without escaping it.
pub fn validate_file_name(name: &str) -> Result<&str> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains(['/', '\\']) => Ok(name),
        _ => Err(HubError::InvalidNameError(name.to_string())),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::TempDir;

    fn workspace() -> (TempDir, Workspace) {
        let tmp = TempDir::new().unwrap();
        let workspace = Workspace::new(tmp.path(), Path::new("src/main.rs"));
        (tmp, workspace)
    }

    #[test]
    fn write_file_creates_parents_and_truncates() {
        let (_tmp, workspace) = workspace();
        let path = workspace.sample_input_dir().join("1.txt");

        workspace.write_file(&path, "a long first content").unwrap();
        workspace.write_file(&path, "short").unwrap();

        assert_eq!(workspace.read_file(&path).unwrap(), "short");
    }

    #[test]
    fn clear_dir_leaves_empty_directory() {
        let (_tmp, workspace) = workspace();
        let dir = workspace.output_dir();
        workspace.write_file(&dir.join("1.txt"), "x").unwrap();
        workspace.write_file(&dir.join("nested/2.txt"), "y").unwrap();

        workspace.clear_dir(&dir).unwrap();

        assert!(dir.is_dir());
        assert!(workspace.is_empty_dir(&dir).unwrap());
    }

    #[test]
    fn clear_dir_creates_missing_directory() {
        let (_tmp, workspace) = workspace();
        let dir = workspace.sample_output_dir();

        workspace.clear_dir(&dir).unwrap();

        assert!(dir.is_dir());
    }

    #[test]
    fn numbered_files_are_sorted_numerically() {
        let (_tmp, workspace) = workspace();
        let dir = workspace.sample_input_dir();
        for name in ["10.txt", "2.txt", "1.txt", "notes.txt", "3.in"] {
            workspace.write_file(&dir.join(name), "").unwrap();
        }

        let numbers: Vec<u32> = workspace
            .list_numbered_files(&dir)
            .unwrap()
            .into_iter()
            .map(|(number, _)| number)
            .collect();

        assert_eq!(numbers, vec![1, 2, 10]);
    }

    #[test]
    fn list_files_of_missing_directory_is_empty() {
        let (_tmp, workspace) = workspace();
        assert!(workspace.list_files(&workspace.output_dir()).unwrap().is_empty());
    }

    #[test]
    fn solution_file_name_uses_last_component() {
        let (_tmp, workspace) = workspace();
        assert_eq!(workspace.solution_file_name(), "main.rs");
    }

    #[test]
    fn validate_plain_file_names() {
        assert!(validate_file_name("1.txt").is_ok());
        assert!(validate_file_name("Two_Sum_1700000000000").is_ok());
        assert!(validate_file_name("..").is_err());
        assert!(validate_file_name("../secret").is_err());
        assert!(validate_file_name("a/b").is_err());
        assert!(validate_file_name("a\\b").is_err());
        assert!(validate_file_name("").is_err());
        assert!(validate_file_name(".").is_err());
    }
}
