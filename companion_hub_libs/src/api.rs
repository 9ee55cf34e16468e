use crate::{model::ArchivedProblem, registry::PendingRequestView};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Outcome of an archive operation.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveResponse {
    pub success: bool,
    pub message: String,
    pub archive_id: Option<String>,
}

impl ArchiveResponse {
    pub fn success(message: impl ToString) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            archive_id: None,
        }
    }

    pub fn failure(message: impl ToString) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            archive_id: None,
        }
    }

    pub fn with_archive_id(mut self, archive_id: impl ToString) -> Self {
        self.archive_id = Some(archive_id.to_string());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveGroup {
    pub group_name: String,
    pub problems: Vec<ArchivedProblem>,
    pub problem_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveListResponse {
    pub groups: Vec<ArchiveGroup>,
    pub total_problems: usize,
    pub total_groups: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRenameRequest {
    pub old_group_name: String,
    pub new_group_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineDifference {
    pub line_number: usize,
    pub expected: String,
    pub actual: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileComparison {
    pub file_name: String,
    pub matched: bool,
    pub differences: Vec<LineDifference>,
    pub expected_exists: bool,
    pub actual_exists: bool,
    pub message: String,
}

impl FileComparison {
    /// Placeholder entry used when no per-file comparison could be made.
    pub fn unavailable(expected_exists: bool, actual_exists: bool, message: impl ToString) -> Self {
        Self {
            file_name: String::from("N/A"),
            matched: false,
            differences: Vec::new(),
            expected_exists,
            actual_exists,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub total_files: usize,
    pub matched_files: usize,
    pub comparisons: Vec<FileComparison>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TestCaseRequest {
    pub input: String,
    pub output: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseUpdateRequest {
    pub test_number: i64,
    pub input: String,
    pub output: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseDeleteRequest {
    pub test_number: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCasesResponse {
    pub success: bool,
    pub message: String,
    pub total_tests: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PendingRequestsResponse {
    pub requests: Vec<PendingRequestView>,
    pub count: usize,
}

impl From<Vec<PendingRequestView>> for PendingRequestsResponse {
    fn from(requests: Vec<PendingRequestView>) -> Self {
        let count = requests.len();
        Self { requests, count }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContentResponse {
    pub success: bool,
    pub content: String,
    pub error: String,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn archive_id_is_omitted_when_absent() {
        let response = ArchiveResponse::failure("Archive not found: x");
        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"success":false,"message":"Archive not found: x"}"#
        );

        let response = ArchiveResponse::success("ok").with_archive_id("A_1");
        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"success":true,"message":"ok","archiveId":"A_1"}"#
        );
    }

    #[test]
    fn comparison_uses_camel_case() {
        let result = ComparisonResult {
            total_files: 1,
            matched_files: 0,
            comparisons: vec![FileComparison {
                file_name: String::from("1.txt"),
                matched: false,
                differences: vec![LineDifference {
                    line_number: 3,
                    expected: String::from("6"),
                    actual: String::from("7"),
                }],
                expected_exists: true,
                actual_exists: true,
                message: String::from("1 line(s) differ"),
            }],
        };
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["totalFiles"], 1);
        assert_eq!(value["comparisons"][0]["fileName"], "1.txt");
        assert_eq!(value["comparisons"][0]["differences"][0]["lineNumber"], 3);
    }
}
