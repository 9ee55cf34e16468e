use crate::{
    api::{ArchiveGroup, ArchiveListResponse, ArchiveResponse},
    error::{IoContext, Result},
    model::{ArchivedProblem, Problem},
    tracker::MatchedTestTracker,
    workspace::{validate_file_name, Workspace},
};
use chrono::{Local, Utc};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

pub const DEFAULT_GROUP: &str = "Ungrouped";
pub const DEFAULT_PROBLEM_NAME: &str = "Unknown Problem";
const METADATA_FILE: &str = "metadata.json";
const ARCHIVE_ID_MAX_LEN: usize = 50;
const GROUP_NAME_MAX_LEN: usize = 100;
// Literal path segment of the group endpoints, so never used as a group directory
const RESERVED_GROUP_NAME: &str = "group";

static ARCHIVE_ID_DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());
static GROUP_NAME_DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_ \-]+").unwrap());
static REPEATED_UNDERSCORES: Lazy<Regex> = Lazy::new(|| Regex::new(r"_{2,}").unwrap());
// `<base>_<millis>` archive directory names
static ARCHIVE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.*)_(\d+)$").unwrap());

fn sanitize(value: &str, disallowed: &Regex, max_len: usize, fallback: &str) -> String {
    let replaced = disallowed.replace_all(value, "_");
    let collapsed = REPEATED_UNDERSCORES.replace_all(&replaced, "_");
    let trimmed: String = collapsed
        .trim_matches(|c: char| c == '_' || c.is_whitespace())
        .chars()
        .take(max_len)
        .collect();
    let trimmed = trimmed.trim_matches(|c: char| c == '_' || c.is_whitespace());

    if trimmed.is_empty() {
        String::from(fallback)
    } else {
        trimmed.to_string()
    }
}

/// Base part of an archive id derived from a problem name.
pub fn sanitize_archive_id(name: &str) -> String {
    sanitize(
        name,
        &ARCHIVE_ID_DISALLOWED,
        ARCHIVE_ID_MAX_LEN,
        &DEFAULT_PROBLEM_NAME.replace(' ', "_"),
    )
}

/// Directory name of an archive group.
pub fn sanitize_group_name(group: &str) -> String {
    let sanitized = sanitize(group, &GROUP_NAME_DISALLOWED, GROUP_NAME_MAX_LEN, DEFAULT_GROUP);
    if sanitized == RESERVED_GROUP_NAME {
        format!("{}_", sanitized)
    } else {
        sanitized
    }
}

fn read_metadata(workspace: &Workspace, archive_dir: &Path) -> Result<ArchivedProblem> {
    let content = workspace.read_file(&archive_dir.join(METADATA_FILE))?;
    Ok(serde_json::from_str(&content)?)
}

fn write_metadata(workspace: &Workspace, archive_dir: &Path, metadata: &ArchivedProblem) -> Result<()> {
    let content = serde_json::to_string_pretty(metadata)?;
    workspace.write_file(&archive_dir.join(METADATA_FILE), &content)
}

/// Named, grouped snapshots of a problem stored under
/// `archives/<group>/<archive id>/`.
///
/// Every archive holds the sample `input/` and `output/` files, a verbatim
/// copy of the solution source and a `metadata.json` document.
#[derive(Debug, Clone)]
pub struct ArchiveStore {
    workspace: Workspace,
    tracker: Arc<MatchedTestTracker>,
}

impl ArchiveStore {
    pub fn new(workspace: Workspace, tracker: Arc<MatchedTestTracker>) -> Self {
        Self { workspace, tracker }
    }

    /// Directory of an existing group. `group_name` must be the exact
    /// directory name, lookups never sanitize.
    fn existing_group_dir(&self, group_name: &str) -> Option<PathBuf> {
        let name = validate_file_name(group_name).ok()?;
        let dir = self.workspace.archives_dir().join(name);
        dir.is_dir().then_some(dir)
    }

    /// Existing archive of the same problem in `group_dir`, if any.
    fn find_existing(&self, group_dir: &Path, base: &str) -> Result<Option<String>> {
        if !group_dir.is_dir() {
            return Ok(None);
        }
        Ok(self
            .subdirectories(group_dir)?
            .into_iter()
            .filter_map(|dir| dir.file_name().map(|name| name.to_string_lossy().to_string()))
            .find(|name| {
                ARCHIVE_ID
                    .captures(name)
                    .and_then(|captures| captures.get(1))
                    .map(|existing| existing.as_str() == base)
                    .unwrap_or(false)
            }))
    }

    fn subdirectories(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut dirs = Vec::new();
        if dir.is_dir() {
            for entry in fs::read_dir(dir).at(dir)? {
                let path = entry.at(dir)?.path();
                if path.is_dir() {
                    dirs.push(path);
                }
            }
        }
        dirs.sort();
        Ok(dirs)
    }

    /// Snapshot the live sample tests and solution source together with
    /// `problem`.
    ///
    /// An archive of the same problem in the same group is only replaced when
    /// `overwrite` is set. Otherwise the call fails with an "already exists"
    /// message so the caller can ask for confirmation and retry.
    pub fn archive(&self, problem: &Problem, overwrite: bool) -> ArchiveResponse {
        let name = problem
            .name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_PROBLEM_NAME)
            .to_string();
        let base = sanitize_archive_id(&name);
        let group = sanitize_group_name(problem.group.as_deref().unwrap_or_default());
        let group_dir = self.workspace.archives_dir().join(&group);

        let existing = match self.find_existing(&group_dir, &base) {
            Ok(existing) => existing,
            Err(e) => {
                tracing::error!("failed to scan archive group {}: {}", group, e);
                return ArchiveResponse::failure(format!("Error archiving problem: {}", e));
            }
        };

        let archive_id = match existing {
            Some(existing) if !overwrite => {
                tracing::info!("archive {} already exists in group {}", existing, group);
                return ArchiveResponse::failure(format!("Archive already exists: {}", name))
                    .with_archive_id(existing);
            }
            Some(existing) => existing,
            None => format!("{}_{}", base, Utc::now().timestamp_millis()),
        };

        match self.write_archive(problem, &name, &group, &archive_id) {
            Ok(test_count) => {
                tracing::info!(
                    "Problem archived successfully: {} (archive id {}, group {}, {} test case(s))",
                    name,
                    archive_id,
                    group,
                    test_count
                );
                ArchiveResponse::success("Problem archived successfully").with_archive_id(archive_id)
            }
            Err(e) => {
                tracing::error!("failed to archive problem {}: {}", name, e);
                ArchiveResponse::failure(format!("Error archiving problem: {}", e))
            }
        }
    }

    fn write_archive(&self, problem: &Problem, name: &str, group: &str, archive_id: &str) -> Result<usize> {
        let archive_dir = self.workspace.archives_dir().join(group).join(archive_id);
        if archive_dir.exists() {
            self.workspace.remove_dir(&archive_dir)?;
        }

        let test_count = self
            .workspace
            .copy_files(&self.workspace.sample_input_dir(), &archive_dir.join("input"))?;
        self.workspace
            .copy_files(&self.workspace.sample_output_dir(), &archive_dir.join("output"))?;

        let solution = self.workspace.solution_file();
        if solution.is_file() {
            self.workspace.copy_file(
                &solution,
                &archive_dir.join(self.workspace.solution_file_name()),
            )?;
        } else {
            tracing::warn!("solution source {} not found, archiving without it", solution.display());
        }

        let metadata = ArchivedProblem {
            id: archive_id.to_string(),
            name: name.to_string(),
            group: group.to_string(),
            url: problem.url.clone().unwrap_or_default(),
            archived_at: Local::now().format("%Y-%m-%dT%H:%M:%S%.3f").to_string(),
            test_count,
            problem: problem.clone(),
        };
        write_metadata(&self.workspace, &archive_dir, &metadata)?;

        Ok(test_count)
    }

    /// All archives grouped by directory. Groups are sorted by name and
    /// problems newest first. Archives whose metadata cannot be read are
    /// skipped.
    pub fn list(&self) -> ArchiveListResponse {
        let group_dirs = match self.subdirectories(&self.workspace.archives_dir()) {
            Ok(dirs) => dirs,
            Err(e) => {
                tracing::error!("failed to list archive groups: {}", e);
                Vec::new()
            }
        };

        let groups: Vec<ArchiveGroup> = group_dirs
            .iter()
            .filter_map(|group_dir| {
                let group_name = group_dir.file_name()?.to_string_lossy().to_string();
                Some(self.list_group(group_name, group_dir))
            })
            .sorted_by(|a, b| a.group_name.cmp(&b.group_name))
            .collect();

        ArchiveListResponse {
            total_problems: groups.iter().map(|group| group.problem_count).sum(),
            total_groups: groups.len(),
            groups,
        }
    }

    fn list_group(&self, group_name: String, group_dir: &Path) -> ArchiveGroup {
        let archive_dirs = self.subdirectories(group_dir).unwrap_or_else(|e| {
            tracing::warn!("failed to read archive group {}: {}", group_name, e);
            Vec::new()
        });

        let problems: Vec<ArchivedProblem> = archive_dirs
            .iter()
            .filter_map(|archive_dir| match read_metadata(&self.workspace, archive_dir) {
                Ok(metadata) => Some(metadata),
                Err(e) => {
                    tracing::warn!("skipping archive {}: {}", archive_dir.display(), e);
                    None
                }
            })
            .sorted_by(|a, b| b.archived_at.cmp(&a.archived_at))
            .collect();

        ArchiveGroup {
            group_name,
            problem_count: problems.len(),
            problems,
        }
    }

    /// Replace the live sample tests, solution source and metadata text with
    /// the content of an archive.
    pub fn import(&self, archive_id: &str, group_name: &str) -> ArchiveResponse {
        if validate_file_name(archive_id).is_err() {
            return ArchiveResponse::failure(format!("Invalid archive id: {}", archive_id));
        }
        let Some(archive_dir) = self
            .existing_group_dir(group_name)
            .map(|group_dir| group_dir.join(archive_id))
            .filter(|archive_dir| archive_dir.is_dir())
        else {
            return ArchiveResponse::failure(format!("Archive not found: {}", archive_id));
        };
        if !archive_dir.join(METADATA_FILE).is_file() {
            return ArchiveResponse::failure("Archive metadata not found");
        }

        match self.restore_archive(&archive_dir) {
            Ok(metadata) => {
                tracing::info!(
                    "Archive imported successfully: {} ({} test case(s))",
                    metadata.name,
                    metadata.test_count
                );
                ArchiveResponse::success(format!("Archive imported successfully: {}", metadata.name))
            }
            Err(e) => {
                tracing::error!("failed to import archive {}: {}", archive_id, e);
                ArchiveResponse::failure(format!("Error importing archive: {}", e))
            }
        }
    }

    fn restore_archive(&self, archive_dir: &Path) -> Result<ArchivedProblem> {
        let metadata = read_metadata(&self.workspace, archive_dir)?;

        let input_dir = self.workspace.sample_input_dir();
        let output_dir = self.workspace.sample_output_dir();
        self.workspace.clear_dir(&input_dir)?;
        self.workspace.clear_dir(&output_dir)?;
        self.workspace.clear_dir(&self.workspace.output_dir())?;

        self.workspace.copy_files(&archive_dir.join("input"), &input_dir)?;
        self.workspace.copy_files(&archive_dir.join("output"), &output_dir)?;

        let archived_solution = archive_dir.join(self.workspace.solution_file_name());
        if archived_solution.is_file() {
            self.workspace
                .copy_file(&archived_solution, &self.workspace.solution_file())?;
        }

        self.workspace.write_file(
            &self.workspace.problem_meta_file(),
            &metadata.problem.metadata_text(),
        )?;
        self.tracker.clear_all(true)?;

        Ok(metadata)
    }

    /// Delete one archive, and its group directory once it is empty.
    pub fn delete(&self, archive_id: &str, group_name: &str) -> ArchiveResponse {
        if validate_file_name(archive_id).is_err() {
            return ArchiveResponse::failure(format!("Invalid archive id: {}", archive_id));
        }
        let Some(group_dir) = self.existing_group_dir(group_name) else {
            return ArchiveResponse::failure(format!("Archive not found: {}", archive_id));
        };
        let archive_dir = group_dir.join(archive_id);
        if !archive_dir.is_dir() {
            return ArchiveResponse::failure(format!("Archive not found: {}", archive_id));
        }

        let result = self.workspace.remove_dir(&archive_dir).and_then(|_| {
            if self.workspace.is_empty_dir(&group_dir)? {
                self.workspace.remove_dir(&group_dir)?;
                tracing::info!("Removed empty group {}", group_dir.display());
            }
            Ok(())
        });

        match result {
            Ok(()) => {
                tracing::info!("Archive deleted: {}", archive_id);
                ArchiveResponse::success("Archive deleted successfully")
            }
            Err(e) => {
                tracing::error!("failed to delete archive {}: {}", archive_id, e);
                ArchiveResponse::failure(format!("Error deleting archive: {}", e))
            }
        }
    }

    /// Delete a group with every archive in it.
    pub fn delete_group(&self, group_name: &str) -> ArchiveResponse {
        if group_name.trim().is_empty() {
            return ArchiveResponse::failure("Group name cannot be empty");
        }
        let Some(group_dir) = self.existing_group_dir(group_name) else {
            return ArchiveResponse::failure(format!("Group not found: {}", group_name));
        };

        let count = self.subdirectories(&group_dir).map(|dirs| dirs.len()).unwrap_or(0);
        match self.workspace.remove_dir(&group_dir) {
            Ok(()) => {
                tracing::info!("Group deleted: {} ({} archive(s))", group_name, count);
                ArchiveResponse::success(format!(
                    "Group deleted successfully: {} ({} archive(s))",
                    group_name, count
                ))
            }
            Err(e) => {
                tracing::error!("failed to delete group {}: {}", group_name, e);
                ArchiveResponse::failure(format!("Error deleting group: {}", e))
            }
        }
    }

    /// Rename a group directory and rewrite the `group` field of every archive
    /// in it. Never merges into an existing group.
    pub fn rename_group(&self, old_name: &str, new_name: &str) -> ArchiveResponse {
        if old_name.trim().is_empty() || new_name.trim().is_empty() {
            return ArchiveResponse::failure("Group names cannot be empty");
        }
        let old_group = old_name;
        let new_group = sanitize_group_name(new_name);
        if old_group == new_name || old_group == new_group {
            return ArchiveResponse::failure(format!(
                "New group name must differ from the current one: {}",
                old_group
            ));
        }

        let Some(old_dir) = self.existing_group_dir(old_group) else {
            return ArchiveResponse::failure(format!("Group not found: {}", old_name));
        };
        let new_dir = self.workspace.archives_dir().join(&new_group);
        if new_dir.exists() {
            return ArchiveResponse::failure(format!("Group already exists: {}", new_group));
        }

        if let Err(e) = self.workspace.rename(&old_dir, &new_dir) {
            tracing::error!("failed to rename group {} to {}: {}", old_group, new_group, e);
            return ArchiveResponse::failure(format!("Error renaming group: {}", e));
        }

        let archive_dirs = self.subdirectories(&new_dir).unwrap_or_else(|e| {
            tracing::warn!("failed to read renamed group {}: {}", new_group, e);
            Vec::new()
        });
        for archive_dir in archive_dirs.iter() {
            let rewritten = read_metadata(&self.workspace, archive_dir).and_then(|mut metadata| {
                metadata.group = new_group.clone();
                write_metadata(&self.workspace, archive_dir, &metadata)
            });
            if let Err(e) = rewritten {
                tracing::warn!("failed to update group of {}: {}", archive_dir.display(), e);
            }
        }

        tracing::info!("Group renamed from {} to {}", old_group, new_group);
        ArchiveResponse::success(format!(
            "Group renamed from '{}' to '{}'",
            old_group, new_group
        ))
    }
}
