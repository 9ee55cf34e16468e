use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// A single sample test carried by a problem payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Test {
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub output: String,
}

/// Problem payload pushed by Competitive Companion.
///
/// Every field is optional on the wire and unknown fields are ignored, so the
/// same type accepts payloads from any version of the extension.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub name: Option<String>,
    pub group: Option<String>,
    pub url: Option<String>,
    pub interactive: Option<bool>,
    pub memory_limit: Option<i64>,
    pub time_limit: Option<i64>,
    #[serde(default)]
    pub tests: Vec<Test>,
}

impl Problem {
    /// Render the four-line metadata text written next to the sample tests.
    pub fn metadata_text(&self) -> String {
        format!(
            "{}\n{}\n{}\nTL(ms)={}, ML(MB)={}\n",
            self.name.as_deref().unwrap_or_default(),
            self.group.as_deref().unwrap_or_default(),
            self.url.as_deref().unwrap_or_default(),
            self.time_limit.unwrap_or(-1),
            self.memory_limit.unwrap_or(-1),
        )
    }
}

/// A live sample test case identified by its 1-based file number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub test_number: u32,
    pub input: String,
    pub output: String,
}

/// Metadata document stored as `metadata.json` in every archive directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedProblem {
    pub id: String,
    pub name: String,
    pub group: String,
    pub url: String,
    pub archived_at: String,
    pub test_count: usize,
    pub problem: Problem,
}
