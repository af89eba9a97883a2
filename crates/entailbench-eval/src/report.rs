//! Accuracy summary and error listings for a result set.

use std::fmt;
use std::fs;
use std::path::Path;

use entailbench_core::{BenchError, EntryId, ResultRecord};

/// An entry the model got wrong, identified for the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Miss {
    pub id: EntryId,
    pub query: String,
}

impl From<&ResultRecord> for Miss {
    fn from(record: &ResultRecord) -> Self {
        Self { id: record.id.clone(), query: record.query.clone() }
    }
}

/// Aggregate outcome of one (model, profile) evaluation.
#[derive(Debug, Clone)]
pub struct Summary {
    pub model: String,
    pub total: usize,
    pub correct: usize,
    /// Expected "No", answered "Yes".
    pub false_positives: Vec<Miss>,
    /// Expected "Yes", answered "No".
    pub false_negatives: Vec<Miss>,
}

impl Summary {
    pub fn from_records(model: impl Into<String>, records: &[ResultRecord]) -> Self {
        Self {
            model: model.into(),
            total: records.len(),
            correct: records.iter().filter(|r| r.verdict.is_match()).count(),
            false_positives: records.iter().filter(|r| r.is_false_positive()).map(Miss::from).collect(),
            false_negatives: records.iter().filter(|r| r.is_false_negative()).map(Miss::from).collect(),
        }
    }

    /// Percentage of matching answers; 0 for an empty result set.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64 * 100.0
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} Accuracy: {}/{} correct ({:.2}%)",
            self.model,
            self.correct,
            self.total,
            self.accuracy()
        )?;

        writeln!(f, "\nFalse Positives (Expected: No, Got: Yes):")?;
        for miss in &self.false_positives {
            writeln!(f, "- ID: {} | Query: {}", miss.id, miss.query)?;
        }

        writeln!(f, "\nFalse Negatives (Expected: Yes, Got: No):")?;
        for miss in &self.false_negatives {
            writeln!(f, "- ID: {} | Query: {}", miss.id, miss.query)?;
        }
        Ok(())
    }
}

/// Loads a results file written by an earlier run.
pub fn load_results(path: &Path) -> Result<Vec<ResultRecord>, BenchError> {
    let content = fs::read_to_string(path).map_err(|e| BenchError::io(path.display().to_string(), e))?;
    Ok(serde_json::from_str(&content)?)
}

/// Rebuilds the summary of a results file; the model name is taken from its records.
pub fn summarize_file(path: &Path) -> Result<Summary, BenchError> {
    let records = load_results(path)?;
    let model = records.first().map(|r| r.model_name.clone()).unwrap_or_default();
    Ok(Summary::from_records(model, &records))
}
