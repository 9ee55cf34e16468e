use crate::{
    api::TestCasesResponse,
    error::Result,
    model::TestCase,
    workspace::Workspace,
};

fn file_name(number: u32) -> String {
    format!("{}.txt", number)
}

/// CRUD over the live sample tests in `sample/input` and `sample/output`.
///
/// Test files are named `<n>.txt` with `n` contiguous from 1. Deleting a test
/// shifts every later test down by one so no gaps remain.
#[derive(Debug, Clone)]
pub struct TestCaseEditor {
    workspace: Workspace,
}

impl TestCaseEditor {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }

    /// Input/output pairs ordered by test number. Inputs without a matching
    /// output file are left out.
    pub fn list(&self) -> Result<Vec<TestCase>> {
        let output_dir = self.workspace.sample_output_dir();
        let mut tests = Vec::new();
        for (number, input_file) in self
            .workspace
            .list_numbered_files(&self.workspace.sample_input_dir())?
        {
            let output_file = output_dir.join(file_name(number));
            if !output_file.is_file() {
                continue;
            }
            tests.push(TestCase {
                test_number: number,
                input: self.workspace.read_file_lossy(&input_file)?,
                output: self.workspace.read_file_lossy(&output_file)?,
            });
        }
        Ok(tests)
    }

    fn total(&self) -> usize {
        self.list().map(|tests| tests.len()).unwrap_or(0)
    }

    fn failure(&self, message: impl ToString) -> TestCasesResponse {
        TestCasesResponse {
            success: false,
            message: message.to_string(),
            total_tests: self.total(),
        }
    }

    /// Append a test after the current last one.
    pub fn add(&self, input: &str, output: &str) -> TestCasesResponse {
        match self.try_add(input, output) {
            Ok(number) => {
                tracing::info!("Added new test case #{}", number);
                TestCasesResponse {
                    success: true,
                    message: format!("Test case #{} added successfully", number),
                    total_tests: number as usize,
                }
            }
            Err(e) => {
                tracing::error!("failed to add test case: {}", e);
                self.failure(format!("Failed to add test case: {}", e))
            }
        }
    }

    fn try_add(&self, input: &str, output: &str) -> Result<u32> {
        let number = self.list()?.len() as u32 + 1;
        let name = file_name(number);
        self.workspace
            .write_file(&self.workspace.sample_input_dir().join(&name), input)?;
        self.workspace
            .write_file(&self.workspace.sample_output_dir().join(&name), output)?;
        Ok(number)
    }

    /// Overwrite test `number` and drop its stale actual output.
    pub fn update(&self, number: i64, input: &str, output: &str) -> TestCasesResponse {
        let Some(number) = self.existing(number) else {
            return self.rejection(number);
        };

        match self.try_update(number, input, output) {
            Ok(()) => {
                tracing::info!("Updated test case #{}", number);
                TestCasesResponse {
                    success: true,
                    message: format!("Test case #{} updated successfully", number),
                    total_tests: self.total(),
                }
            }
            Err(e) => {
                tracing::error!("failed to update test case #{}: {}", number, e);
                self.failure(format!("Failed to update test case: {}", e))
            }
        }
    }

    fn try_update(&self, number: u32, input: &str, output: &str) -> Result<()> {
        let name = file_name(number);
        self.workspace
            .write_file(&self.workspace.sample_input_dir().join(&name), input)?;
        self.workspace
            .write_file(&self.workspace.sample_output_dir().join(&name), output)?;
        if self
            .workspace
            .remove_file_if_exists(&self.workspace.output_dir().join(&name))?
        {
            tracing::info!("Cleared actual output for test #{} (will need rerun)", number);
        }
        Ok(())
    }

    /// Delete test `number` and renumber the tests after it.
    pub fn delete(&self, number: i64) -> TestCasesResponse {
        let Some(number) = self.existing(number) else {
            return self.rejection(number);
        };

        match self.try_delete(number) {
            Ok(()) => {
                tracing::info!("Deleted test case #{}", number);
                TestCasesResponse {
                    success: true,
                    message: format!("Test case #{} deleted successfully", number),
                    total_tests: self.total(),
                }
            }
            Err(e) => {
                tracing::error!("failed to delete test case #{}: {}", number, e);
                self.failure(format!("Failed to delete test case: {}", e))
            }
        }
    }

    fn try_delete(&self, number: u32) -> Result<()> {
        let name = file_name(number);
        let dirs = [
            self.workspace.sample_input_dir(),
            self.workspace.sample_output_dir(),
            self.workspace.output_dir(),
        ];
        for dir in dirs.iter() {
            self.workspace.remove_file_if_exists(&dir.join(&name))?;
        }

        let later: Vec<u32> = self
            .workspace
            .list_numbered_files(&dirs[0])?
            .into_iter()
            .map(|(n, _)| n)
            .filter(|n| *n > number)
            .collect();
        for current in later {
            for dir in dirs.iter() {
                let from = dir.join(file_name(current));
                if from.is_file() {
                    self.workspace.rename(&from, &dir.join(file_name(current - 1)))?;
                }
            }
            tracing::debug!("renumbered test #{} to #{}", current, current - 1);
        }
        Ok(())
    }

    /// `Some(n)` if test `n` has both files on disk.
    fn existing(&self, number: i64) -> Option<u32> {
        let number = u32::try_from(number).ok().filter(|n| *n >= 1)?;
        let name = file_name(number);
        let exists = self.workspace.sample_input_dir().join(&name).is_file()
            && self.workspace.sample_output_dir().join(&name).is_file();
        exists.then_some(number)
    }

    fn rejection(&self, number: i64) -> TestCasesResponse {
        if number < 1 {
            self.failure(format!("Invalid test number: {}", number))
        } else {
            self.failure(format!("Test case #{} not found", number))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::{fs, path::Path};
    use tempfile::TempDir;

    fn setup(count: u32) -> (TempDir, Workspace, TestCaseEditor) {
        let tmp = TempDir::new().unwrap();
        let workspace = Workspace::new(tmp.path(), Path::new("src/main.rs"));
        let editor = TestCaseEditor::new(workspace.clone());
        for i in 1..=count {
            let response = editor.add(&format!("in{}", i), &format!("out{}", i));
            assert!(response.success);
        }
        (tmp, workspace, editor)
    }

    fn numbers(editor: &TestCaseEditor) -> Vec<u32> {
        editor
            .list()
            .unwrap()
            .into_iter()
            .map(|test| test.test_number)
            .collect()
    }

    #[test]
    fn add_appends_numbered_pairs() {
        let (_tmp, workspace, editor) = setup(2);

        let response = editor.add("", "");

        assert!(response.success);
        assert_eq!(response.total_tests, 3);
        assert_eq!(response.message, "Test case #3 added successfully");
        assert_eq!(
            fs::read_to_string(workspace.sample_input_dir().join("2.txt")).unwrap(),
            "in2"
        );
        assert_eq!(numbers(&editor), vec![1, 2, 3]);
    }

    #[test]
    fn list_skips_inputs_without_output() {
        let (_tmp, workspace, editor) = setup(2);
        workspace
            .write_file(&workspace.sample_input_dir().join("3.txt"), "orphan")
            .unwrap();

        let tests = editor.list().unwrap();

        assert_eq!(tests.len(), 2);
        assert_eq!(tests[1].input, "in2");
        assert_eq!(tests[1].output, "out2");
    }

    #[test]
    fn list_of_empty_workspace() {
        let (_tmp, _workspace, editor) = setup(0);
        assert!(editor.list().unwrap().is_empty());
    }

    #[test]
    fn update_overwrites_and_clears_actual_output() {
        let (_tmp, workspace, editor) = setup(2);
        let actual = workspace.output_dir().join("2.txt");
        workspace.write_file(&actual, "old").unwrap();

        let response = editor.update(2, "new in", "new out");

        assert!(response.success);
        assert_eq!(response.total_tests, 2);
        assert!(!actual.exists());
        let tests = editor.list().unwrap();
        assert_eq!(tests[1].input, "new in");
        assert_eq!(tests[1].output, "new out");
    }

    #[test]
    fn update_rejects_invalid_and_missing() {
        let (_tmp, _workspace, editor) = setup(1);

        let invalid = editor.update(0, "", "");
        assert!(!invalid.success);
        assert_eq!(invalid.message, "Invalid test number: 0");

        let missing = editor.update(5, "", "");
        assert!(!missing.success);
        assert_eq!(missing.message, "Test case #5 not found");
        assert_eq!(missing.total_tests, 1);
    }

    #[test]
    fn delete_renumbers_all_directories() {
        let (_tmp, workspace, editor) = setup(4);
        workspace
            .write_file(&workspace.output_dir().join("2.txt"), "actual2")
            .unwrap();
        workspace
            .write_file(&workspace.output_dir().join("4.txt"), "actual4")
            .unwrap();

        let response = editor.delete(2);

        assert!(response.success);
        assert_eq!(response.total_tests, 3);
        let tests = editor.list().unwrap();
        assert_eq!(numbers(&editor), vec![1, 2, 3]);
        assert_eq!(tests[1].input, "in3");
        assert_eq!(tests[2].output, "out4");
        assert!(!workspace.output_dir().join("2.txt").exists());
        assert_eq!(
            fs::read_to_string(workspace.output_dir().join("3.txt")).unwrap(),
            "actual4"
        );
        assert!(!workspace.sample_input_dir().join("4.txt").exists());
    }

    #[test]
    fn delete_keeps_numbering_contiguous_for_every_position() {
        for total in 1..=4u32 {
            for target in 1..=total {
                let (_tmp, _workspace, editor) = setup(total);

                assert!(editor.delete(target as i64).success);

                let expected: Vec<u32> = (1..total).collect();
                assert_eq!(numbers(&editor), expected, "N={} n={}", total, target);
            }
        }
    }

    #[test]
    fn delete_rejects_invalid_and_missing() {
        let (_tmp, _workspace, editor) = setup(1);

        let invalid = editor.delete(-1);
        assert!(!invalid.success);
        assert_eq!(invalid.message, "Invalid test number: -1");

        let missing = editor.delete(2);
        assert!(!missing.success);
        assert_eq!(missing.message, "Test case #2 not found");
        assert_eq!(numbers(&editor), vec![1]);
    }

    #[test]
    fn list_decodes_invalid_utf8_lossily() {
        let (_tmp, workspace, editor) = setup(1);
        fs::write(workspace.sample_output_dir().join("1.txt"), [b'o', 0xff]).unwrap();

        let tests = editor.list().unwrap();

        assert_eq!(tests.len(), 1);
        assert_eq!(tests[0].output, "o\u{fffd}");
        assert!(editor.add("in2", "out2").success);
    }
}
