//! The per-file evaluation loop.

use std::fs;
use std::path::Path;

use entailbench_core::{BenchError, BenchmarkEntry, ResultRecord};
use entailbench_llm::Dispatcher;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::prompt::build_prompt;
use crate::report::Summary;

/// Loads a benchmark file. A missing file is reported as [`BenchError::InputNotFound`].
pub fn load_entries(path: &Path) -> Result<Vec<BenchmarkEntry>, BenchError> {
    let content = fs::read_to_string(path).map_err(|e| BenchError::io(path.display().to_string(), e))?;
    Ok(serde_json::from_str(&content)?)
}

/// Writes a result set as pretty-printed JSON, replacing any existing file.
pub fn write_results(path: &Path, records: &[ResultRecord]) -> Result<(), BenchError> {
    let io_err = |source| BenchError::Io { path: path.display().to_string(), source };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json).map_err(io_err)
}

/// Runs every entry of a benchmark file through one model and scores the answers.
pub struct Evaluator {
    dispatcher: Dispatcher,
    show_progress: bool,
}

impl Evaluator {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher, show_progress: true }
    }

    /// Enables or disables the terminal progress bar.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Evaluates `model` on `input`, writes the results to `output` and prints the summary.
    ///
    /// Backend failures never abort the loop; they are recorded as sentinel answers.
    /// Only reading `input` or writing `output` can fail.
    pub async fn evaluate(&self, input: &Path, output: &Path, model: &str) -> Result<Summary, BenchError> {
        let entries = load_entries(input)?;
        info!("Loaded {} entries from {}", entries.len(), input.display());

        let progress = self.progress_bar(entries.len() as u64, model);
        let mut records = Vec::with_capacity(entries.len());

        for entry in &entries {
            let prompt = build_prompt(entry);
            let answer = self.dispatcher.ask(model, &prompt).await;
            records.push(ResultRecord::score(entry, model, answer));
            progress.inc(1);
        }
        progress.finish_and_clear();

        write_results(output, &records)?;
        info!("Saved results to {}", output.display());

        let summary = Summary::from_records(model, &records);
        println!("\n{}", summary);
        Ok(summary)
    }

    fn progress_bar(&self, len: u64, model: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len);
        if let Ok(style) = ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len} ({elapsed})") {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_message(format!("Evaluating with {}", model));
        bar
    }
}
