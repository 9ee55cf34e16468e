use crate::{
    api::{ComparisonResult, FileComparison, LineDifference},
    error::Result,
    tracker::MatchedTestTracker,
    workspace::{Workspace, OUTPUT_DIR, SAMPLE_OUTPUT_DIR},
};
use std::{path::Path, sync::Arc};

/// Split text into lines, accepting `\r\n`, `\n` and lone `\r` as breaks.
/// A trailing break yields a final empty line.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find(['\r', '\n']) {
        lines.push(&rest[..pos]);
        rest = if rest[pos..].starts_with("\r\n") {
            &rest[pos + 2..]
        } else {
            &rest[pos + 1..]
        };
    }
    lines.push(rest);
    lines
}

/// Line-by-line differences between two texts. Missing trailing lines on
/// either side compare as empty strings.
pub fn diff_lines(expected: &str, actual: &str) -> Vec<LineDifference> {
    let expected = split_lines(expected);
    let actual = split_lines(actual);

    (0..expected.len().max(actual.len()))
        .filter_map(|i| {
            let expected_line = expected.get(i).copied().unwrap_or_default();
            let actual_line = actual.get(i).copied().unwrap_or_default();
            (expected_line != actual_line).then(|| LineDifference {
                line_number: i + 1,
                expected: expected_line.to_string(),
                actual: actual_line.to_string(),
            })
        })
        .collect()
}

/// Compares the expected sample outputs with the outputs of the last run.
#[derive(Debug, Clone)]
pub struct OutputComparator {
    workspace: Workspace,
    tracker: Arc<MatchedTestTracker>,
}

impl OutputComparator {
    pub fn new(workspace: Workspace, tracker: Arc<MatchedTestTracker>) -> Self {
        Self { workspace, tracker }
    }

    /// Compare every expected `*.txt` file with the identically named actual
    /// output and record the matching ones in the tracker.
    pub fn compare(&self) -> Result<ComparisonResult> {
        let expected_dir = self.workspace.sample_output_dir();
        let actual_dir = self.workspace.output_dir();

        if !expected_dir.is_dir() {
            return Ok(unavailable(FileComparison::unavailable(
                false,
                false,
                format!("Expected output folder not found: {}", SAMPLE_OUTPUT_DIR),
            )));
        }
        if !actual_dir.is_dir() {
            return Ok(unavailable(FileComparison::unavailable(
                true,
                false,
                format!("Actual output folder not found: {}", OUTPUT_DIR),
            )));
        }

        let expected_files: Vec<_> = self
            .workspace
            .list_files(&expected_dir)?
            .into_iter()
            .filter(|path| path.extension().map(|ext| ext == "txt").unwrap_or(false))
            .collect();
        if expected_files.is_empty() {
            return Ok(unavailable(FileComparison::unavailable(
                true,
                true,
                format!("No test files found in {}", SAMPLE_OUTPUT_DIR),
            )));
        }

        let mut comparisons = Vec::with_capacity(expected_files.len());
        for expected_file in expected_files.iter() {
            let Some(file_name) = expected_file.file_name() else {
                continue;
            };
            let actual_file = actual_dir.join(file_name);
            comparisons.push(self.compare_files(
                &file_name.to_string_lossy(),
                expected_file,
                &actual_file,
            )?);
        }

        let matched: Vec<&str> = comparisons
            .iter()
            .filter(|comparison| comparison.matched)
            .map(|comparison| comparison.file_name.as_str())
            .collect();
        let matched_files = matched.len();
        if !matched.is_empty() {
            self.tracker.mark_all_matched(matched)?;
        }

        tracing::info!(
            "compared {} output file(s), {} matched",
            comparisons.len(),
            matched_files
        );

        Ok(ComparisonResult {
            total_files: comparisons.len(),
            matched_files,
            comparisons,
        })
    }

    fn compare_files(&self, file_name: &str, expected: &Path, actual: &Path) -> Result<FileComparison> {
        if !actual.is_file() {
            return Ok(FileComparison {
                file_name: file_name.to_string(),
                matched: false,
                differences: Vec::new(),
                expected_exists: true,
                actual_exists: false,
                message: String::from("Actual output file not found"),
            });
        }

        let differences = diff_lines(
            &self.workspace.read_file_lossy(expected)?,
            &self.workspace.read_file_lossy(actual)?,
        );
        let message = if differences.is_empty() {
            String::from("All lines match!")
        } else {
            format!("{} line(s) differ", differences.len())
        };

        Ok(FileComparison {
            file_name: file_name.to_string(),
            matched: differences.is_empty(),
            differences,
            expected_exists: true,
            actual_exists: true,
            message,
        })
    }
}

fn unavailable(comparison: FileComparison) -> ComparisonResult {
    ComparisonResult {
        total_files: 0,
        matched_files: 0,
        comparisons: vec![comparison],
    }
}
