use crate::{
    archive::ArchiveStore, comparator::OutputComparator, materializer::ProblemMaterializer,
    registry::RequestRegistry, testcase::TestCaseEditor, tracker::MatchedTestTracker,
    workspace::Workspace,
};
use std::{path::Path, sync::Arc};

/// Every component wired to one workspace. Built once at startup and shared
/// with the HTTP gateway and the CLI commands.
#[derive(Debug)]
pub struct CompanionHub {
    pub workspace: Workspace,
    pub registry: RequestRegistry,
    pub tracker: Arc<MatchedTestTracker>,
    pub materializer: ProblemMaterializer,
    pub archives: ArchiveStore,
    pub comparator: OutputComparator,
    pub tests: TestCaseEditor,
}

impl CompanionHub {
    pub fn new(root: &Path, solution: &Path) -> Self {
        let workspace = Workspace::new(root, solution);
        let tracker = Arc::new(MatchedTestTracker::load(&workspace.matched_tests_file()));

        Self {
            registry: RequestRegistry::new(),
            materializer: ProblemMaterializer::new(workspace.clone(), tracker.clone()),
            archives: ArchiveStore::new(workspace.clone(), tracker.clone()),
            comparator: OutputComparator::new(workspace.clone(), tracker.clone()),
            tests: TestCaseEditor::new(workspace.clone()),
            tracker,
            workspace,
        }
    }
}
