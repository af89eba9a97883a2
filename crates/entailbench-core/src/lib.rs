//! Core domain types and error definitions for entailbench.
//!
//! This crate provides the fundamental types shared across the harness:
//!
//! - [`BenchError`] — Error type for loading, dispatch and evaluation
//! - [`BenchmarkEntry`], [`Axioms`], [`Axiom`] — One benchmark question as read from disk
//! - [`DlProfile`] — The Description Logic profile an entry is written in
//! - [`ResultRecord`] and [`Verdict`] — One scored answer as written to disk
//!
//! # Example
//!
//! ```rust
//! use entailbench_core::{BenchmarkEntry, DlProfile, Verdict};
//!
//! let entry: BenchmarkEntry = serde_json::from_str(r#"{
//!     "id": 1,
//!     "dl_profile": "EL",
//!     "axioms": "- C ⊑ D",
//!     "query": "Is C ⊑ D entailed?",
//!     "expected": "Yes"
//! }"#).unwrap();
//!
//! assert_eq!(entry.profile(), DlProfile::El);
//! assert_eq!(Verdict::compare(&entry.expected, " yes "), Verdict::Yes);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading benchmarks, calling models, or writing results.
#[derive(Error, Debug)]
pub enum BenchError {
    /// LLM API request failed.
    #[error("LLM request failed: {0}")]
    LlmError(String),

    /// Backend answered with a non-success HTTP status.
    #[error("{backend} error: {status} - {body}")]
    BackendStatus {
        backend: &'static str,
        status: u16,
        body: String,
    },

    /// No backend is registered for the requested model identifier.
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    /// Benchmark input file does not exist.
    #[error("Benchmark file not found: '{0}'")]
    InputNotFound(String),

    /// Reading or writing a file failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse or serialize JSON.
    #[error("Failed to parse JSON: {0}")]
    ParseError(String),

    /// Maximum retry attempts exceeded.
    #[error("Max retries exceeded")]
    MaxRetriesExceeded,
}

impl BenchError {
    /// Creates an I/O error with path context, mapping a missing file to [`BenchError::InputNotFound`].
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::InputNotFound(path),
            _ => Self::Io { path, source },
        }
    }

    /// Returns true if this error means the benchmark input file was absent.
    pub fn is_input_not_found(&self) -> bool {
        matches!(self, Self::InputNotFound(_))
    }
}

impl From<serde_json::Error> for BenchError {
    fn from(err: serde_json::Error) -> Self {
        BenchError::ParseError(err.to_string())
    }
}

// ============================================================================
// Benchmark input
// ============================================================================

/// Identifier of a benchmark entry.
///
/// Generated benchmarks use strings like `"test_3"`, hand-written ones often use numbers.
/// Any JSON number is accepted and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryId {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryId::Number(n) => write!(f, "{}", n),
            EntryId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A single structured axiom.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Axiom {
    /// Human-readable DL notation, e.g. `A ⊑ ∃r.B`.
    pub symbolic: String,
    /// OWL functional syntax, when the generator provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functional: Option<String>,
}

/// The axiom block of an entry: either preformatted text or a list of axioms.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Axioms {
    /// Preformatted text, used verbatim.
    Text(String),
    /// Structured axioms, rendered one per line.
    List(Vec<Axiom>),
}

/// Description Logic profile of a benchmark entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DlProfile {
    El,
    Elh,
    Unknown,
}

impl DlProfile {
    /// Maps a raw `dl_profile` value to a profile. Matching is exact and case-sensitive.
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some("EL") => Self::El,
            Some("ELH") => Self::Elh,
            _ => Self::Unknown,
        }
    }

    /// Returns the description used when prompting a model.
    pub fn description(&self) -> &'static str {
        match self {
            Self::El => "Description Logic EL (simple axioms with no role hierarchy extensions or existential quantifiers)",
            Self::Elh => "Description Logic ELH (extended with role hierarchies and existential quantifiers)",
            Self::Unknown => "Description Logic (unknown profile)",
        }
    }
}

/// One benchmark question: an axiom set, a yes/no query, and the ground truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkEntry {
    pub id: EntryId,
    /// Metamorphic relation tag, if the generator assigned one.
    #[serde(default)]
    pub mr: Option<String>,
    #[serde(default)]
    pub dl_profile: Option<String>,
    pub axioms: Axioms,
    pub query: String,
    /// `"Yes"` or `"No"`, compared case-insensitively.
    pub expected: String,
}

impl BenchmarkEntry {
    /// Returns the parsed profile of this entry.
    pub fn profile(&self) -> DlProfile {
        DlProfile::from_label(self.dl_profile.as_deref())
    }
}

// ============================================================================
// Results
// ============================================================================

/// Lowercases and trims an answer for comparison.
pub fn normalize(answer: &str) -> String {
    answer.trim().to_lowercase()
}

/// Whether a model's answer matched the expected label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Yes,
    No,
}

impl Verdict {
    /// Compares an expected label and an answer after normalizing both.
    pub fn compare(expected: &str, answer: &str) -> Self {
        match normalize(expected) == normalize(answer) {
            true => Self::Yes,
            false => Self::No,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Self::Yes)
    }
}

/// A scored model answer for one benchmark entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRecord {
    pub id: EntryId,
    #[serde(default)]
    pub mr: String,
    #[serde(default)]
    pub dl_profile: String,
    pub query: String,
    pub expected: String,
    /// Model identifier that produced the answer.
    #[serde(rename = "llm")]
    pub model_name: String,
    /// Answer text as returned by the dispatcher, including sentinels.
    #[serde(rename = "llm_answer")]
    pub raw_answer: String,
    #[serde(rename = "match")]
    pub verdict: Verdict,
}

impl ResultRecord {
    /// Scores `raw_answer` against `entry` and builds the record.
    pub fn score(entry: &BenchmarkEntry, model_name: &str, raw_answer: impl Into<String>) -> Self {
        let raw_answer = raw_answer.into();
        Self {
            id: entry.id.clone(),
            mr: entry.mr.clone().unwrap_or_default(),
            dl_profile: entry.dl_profile.clone().unwrap_or_default(),
            query: entry.query.clone(),
            expected: entry.expected.clone(),
            model_name: model_name.to_string(),
            verdict: Verdict::compare(&entry.expected, &raw_answer),
            raw_answer,
        }
    }

    /// Expected "No" but the model said "Yes".
    pub fn is_false_positive(&self) -> bool {
        normalize(&self.expected) == "no" && normalize(&self.raw_answer) == "yes"
    }

    /// Expected "Yes" but the model said "No".
    pub fn is_false_negative(&self) -> bool {
        normalize(&self.expected) == "yes" && normalize(&self.raw_answer) == "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(json: &str) -> BenchmarkEntry {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn parses_text_axioms_and_numeric_id() {
        let e = entry(r#"{"id": 1, "dl_profile": "EL", "axioms": "- C ⊑ D", "query": "q", "expected": "Yes"}"#);
        assert_eq!(e.id, EntryId::Number(1.into()));
        assert!(matches!(e.axioms, Axioms::Text(ref t) if t == "- C ⊑ D"));
        assert_eq!(e.profile(), DlProfile::El);
        assert!(e.mr.is_none());
    }

    #[test]
    fn parses_structured_axioms_and_string_id() {
        let e = entry(
            r#"{"id": "test_0", "axioms": [
                {"symbolic": "A ⊑ B", "functional": "SubClassOf(:A :B)"},
                {"symbolic": "B ⊑ C"}
            ], "query": "q", "expected": "No"}"#,
        );
        assert_eq!(e.id.to_string(), "test_0");
        match &e.axioms {
            Axioms::List(axioms) => {
                assert_eq!(axioms.len(), 2);
                assert_eq!(axioms[1].symbolic, "B ⊑ C");
                assert!(axioms[1].functional.is_none());
            }
            Axioms::Text(_) => panic!("expected structured axioms"),
        }
        assert_eq!(e.profile(), DlProfile::Unknown);
    }

    #[test]
    fn any_json_number_is_a_valid_id() {
        let big = entry(r#"{"id": 18446744073709551615, "axioms": "x", "query": "q", "expected": "Yes"}"#);
        assert_eq!(big.id.to_string(), "18446744073709551615");

        let float = entry(r#"{"id": 2.5, "axioms": "x", "query": "q", "expected": "No"}"#);
        assert_eq!(float.id.to_string(), "2.5");

        let record = ResultRecord::score(&float, "qwen:7b", "No");
        assert_eq!(serde_json::to_value(&record).unwrap()["id"], serde_json::json!(2.5));
    }

    #[test]
    fn profile_match_is_exact() {
        assert_eq!(DlProfile::from_label(Some("ELH")), DlProfile::Elh);
        assert_eq!(DlProfile::from_label(Some("el")), DlProfile::Unknown);
        assert_eq!(DlProfile::from_label(None), DlProfile::Unknown);
    }

    #[test]
    fn verdict_ignores_case_and_whitespace() {
        assert_eq!(Verdict::compare("Yes", "  YES\n"), Verdict::Yes);
        assert_eq!(Verdict::compare("No", "Yes"), Verdict::No);
        assert_eq!(Verdict::compare("Yes", "Yes, because C ⊑ D"), Verdict::No);
    }

    #[test]
    fn score_fills_defaults_and_flags_errors() {
        let e = entry(r#"{"id": 1, "dl_profile": "EL", "axioms": "- C ⊑ D", "query": "Is C ⊑ D entailed?", "expected": "Yes"}"#);

        let hit = ResultRecord::score(&e, "qwen:7b", "Yes");
        assert!(hit.verdict.is_match());
        assert_eq!(hit.mr, "");

        let miss = ResultRecord::score(&e, "qwen:7b", "No");
        assert_eq!(miss.verdict, Verdict::No);
        assert!(miss.is_false_negative());
        assert!(!miss.is_false_positive());
    }

    #[test]
    fn record_uses_result_file_field_names() {
        let e = entry(r#"{"id": "test_4", "mr": "MR-1", "axioms": "x", "query": "q", "expected": "No"}"#);
        let value = serde_json::to_value(ResultRecord::score(&e, "gpt-4o", "Yes")).unwrap();

        assert_eq!(value["llm"], "gpt-4o");
        assert_eq!(value["llm_answer"], "Yes");
        assert_eq!(value["match"], "No");
        assert_eq!(value["mr"], "MR-1");
        assert_eq!(value["dl_profile"], "");
    }

    #[test]
    fn missing_file_maps_to_input_not_found() {
        let err = BenchError::io("bench.json", std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(err.is_input_not_found());

        let err = BenchError::io("bench.json", std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        assert!(!err.is_input_not_found());
    }
}
