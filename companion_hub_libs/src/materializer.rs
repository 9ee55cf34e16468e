use crate::{error::Result, model::Problem, tracker::MatchedTestTracker, workspace::Workspace};
use std::sync::Arc;

/// Writes an approved problem into the live workspace.
#[derive(Debug, Clone)]
pub struct ProblemMaterializer {
    workspace: Workspace,
    tracker: Arc<MatchedTestTracker>,
}

impl ProblemMaterializer {
    pub fn new(workspace: Workspace, tracker: Arc<MatchedTestTracker>) -> Self {
        Self { workspace, tracker }
    }

    /// Replace the live sample tests, actual outputs and metadata with the
    /// content of `problem`.
    ///
    /// The first failing step aborts the rest and is returned. Nothing is
    /// rolled back, the next successful call overwrites whatever was left.
    pub fn materialize(&self, problem: &Problem) -> Result<()> {
        let input_dir = self.workspace.sample_input_dir();
        let output_dir = self.workspace.sample_output_dir();
        let actual_dir = self.workspace.output_dir();

        tracing::info!("Preparing directories");
        for dir in [&input_dir, &output_dir, &actual_dir] {
            self.workspace.clear_dir(dir)?;
            tracing::info!("Cleared {}", dir.display());
        }

        self.tracker.clear_all(true)?;
        tracing::info!("Cleared previous test tracking");

        for (i, test) in problem.tests.iter().enumerate() {
            let name = format!("{}.txt", i + 1);
            self.workspace.write_file(&input_dir.join(&name), &test.input)?;
            self.workspace.write_file(&output_dir.join(&name), &test.output)?;
            tracing::info!(
                "Test {}: {} lines input, {} lines output",
                i + 1,
                test.input.lines().count(),
                test.output.lines().count()
            );
        }

        let meta = self.workspace.problem_meta_file();
        self.workspace.write_file(&meta, &problem.metadata_text())?;
        tracing::info!("Saved metadata to {}", meta.display());

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{error::HubError, model::Test};
    use std::{fs, path::Path};
    use tempfile::TempDir;

    fn setup() -> (TempDir, Workspace, Arc<MatchedTestTracker>, ProblemMaterializer) {
        let tmp = TempDir::new().unwrap();
        let workspace = Workspace::new(tmp.path(), Path::new("src/main.rs"));
        let tracker = Arc::new(MatchedTestTracker::load(&workspace.matched_tests_file()));
        let materializer = ProblemMaterializer::new(workspace.clone(), tracker.clone());
        (tmp, workspace, tracker, materializer)
    }

    fn two_sum() -> Problem {
        Problem {
            name: Some(String::from("Two Sum")),
            group: Some(String::from("Codeforces - Round 1")),
            url: Some(String::from("https://codeforces.com/contest/1/problem/A")),
            interactive: Some(false),
            memory_limit: Some(256),
            time_limit: Some(2000),
            tests: vec![Test {
                input: String::from("3\n1 2 3"),
                output: String::from("6"),
            }],
        }
    }

    #[test]
    fn writes_tests_and_metadata() {
        let (_tmp, workspace, tracker, materializer) = setup();
        tracker.mark_matched("1.txt").unwrap();

        materializer.materialize(&two_sum()).unwrap();

        assert_eq!(
            fs::read_to_string(workspace.sample_input_dir().join("1.txt")).unwrap(),
            "3\n1 2 3"
        );
        assert_eq!(
            fs::read_to_string(workspace.sample_output_dir().join("1.txt")).unwrap(),
            "6"
        );
        assert_eq!(
            fs::read_to_string(workspace.problem_meta_file()).unwrap(),
            "Two Sum\nCodeforces - Round 1\nhttps://codeforces.com/contest/1/problem/A\nTL(ms)=2000, ML(MB)=256\n"
        );
        assert_eq!(tracker.count(), 0);
        assert_eq!(fs::read_to_string(workspace.matched_tests_file()).unwrap(), "");
    }

    #[test]
    fn replaces_previous_problem() {
        let (_tmp, workspace, _tracker, materializer) = setup();
        let mut previous = two_sum();
        previous.tests = (0..3)
            .map(|i| Test {
                input: i.to_string(),
                output: i.to_string(),
            })
            .collect();
        materializer.materialize(&previous).unwrap();
        workspace
            .write_file(&workspace.output_dir().join("3.txt"), "stale")
            .unwrap();

        materializer.materialize(&two_sum()).unwrap();

        let inputs = workspace
            .list_numbered_files(&workspace.sample_input_dir())
            .unwrap();
        let outputs = workspace
            .list_numbered_files(&workspace.sample_output_dir())
            .unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(outputs.len(), 1);
        assert!(workspace.list_files(&workspace.output_dir()).unwrap().is_empty());
    }

    #[test]
    fn problem_without_tests_leaves_empty_directories() {
        let (_tmp, workspace, _tracker, materializer) = setup();

        materializer.materialize(&Problem::default()).unwrap();

        assert!(workspace.sample_input_dir().is_dir());
        assert!(workspace.sample_output_dir().is_dir());
        assert!(workspace.output_dir().is_dir());
        assert_eq!(
            fs::read_to_string(workspace.problem_meta_file()).unwrap(),
            "\n\n\nTL(ms)=-1, ML(MB)=-1\n"
        );
    }

    #[test]
    fn io_failure_aborts_remaining_steps() {
        let (_tmp, workspace, tracker, materializer) = setup();
        tracker.mark_matched("1.txt").unwrap();
        // a regular file where the expected output directory belongs
        workspace
            .write_file(&workspace.root().join("sample/output"), "not a directory")
            .unwrap();

        let result = materializer.materialize(&two_sum());

        assert!(matches!(result, Err(HubError::IoError { .. })));
        assert!(!workspace.problem_meta_file().exists());
        assert!(!workspace.sample_input_dir().join("1.txt").exists());
        assert!(tracker.is_matched("1.txt"));
    }
}
