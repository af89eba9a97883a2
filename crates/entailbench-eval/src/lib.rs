//! Prompt construction, evaluation loop and run driver for entailbench.
//!
//! - [`build_prompt`] — Renders a benchmark entry as a yes/no prompt
//! - [`Evaluator`] — Scores one model on one benchmark file and writes the results
//! - [`Summary`] — Accuracy plus false positive / false negative listings
//! - [`Runner`] — Evaluates every configured model on every configured profile
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use entailbench_config::{Credentials, RunConfig};
//! use entailbench_eval::{Evaluator, Runner};
//! use entailbench_llm::Dispatcher;
//!
//! let config = RunConfig::from_file("entailbench.json")?;
//! let dispatcher = Dispatcher::from_config(&config, &Credentials::from_env());
//! let outcomes = Runner::new(config, Evaluator::new(dispatcher)).run().await?;
//! ```

mod evaluator;
mod prompt;
mod report;
mod runner;

#[cfg(test)]
mod testing;

pub use evaluator::{load_entries, write_results, Evaluator};
pub use prompt::{build_prompt, render_axioms};
pub use report::{load_results, summarize_file, Miss, Summary};
pub use runner::{RunOutcome, Runner};
