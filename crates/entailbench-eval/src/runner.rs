//! Runs every configured model over every benchmark profile.

use std::path::PathBuf;

use entailbench_config::{ProfileRun, RunConfig};
use entailbench_core::BenchError;
use tracing::warn;

use crate::evaluator::Evaluator;
use crate::report::Summary;

/// What happened to one (model, profile) pair.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Completed {
        model: String,
        profile: String,
        output: PathBuf,
        summary: Summary,
    },
    /// The profile is optional and its input file was absent.
    Skipped {
        model: String,
        profile: String,
        input: PathBuf,
    },
}

/// Drives the evaluator over `models × profiles`, in configuration order.
pub struct Runner {
    config: RunConfig,
    evaluator: Evaluator,
}

impl Runner {
    pub fn new(config: RunConfig, evaluator: Evaluator) -> Self {
        Self { config, evaluator }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Evaluates all models.
    ///
    /// A missing input for an optional profile is skipped with a notice; a missing input
    /// for a required profile, or any write failure, stops the run.
    pub async fn run(&self) -> Result<Vec<RunOutcome>, BenchError> {
        let mut outcomes = Vec::new();
        for model in &self.config.models {
            for profile in &self.config.profiles {
                outcomes.push(self.run_profile(model, profile).await?);
            }
        }
        Ok(outcomes)
    }

    async fn run_profile(&self, model: &str, profile: &ProfileRun) -> Result<RunOutcome, BenchError> {
        println!("\nRunning {} on {}", model, profile.label);

        let output = profile.output_path(model);
        match self.evaluator.evaluate(&profile.input, &output, model).await {
            Ok(summary) => Ok(RunOutcome::Completed {
                model: model.to_string(),
                profile: profile.label.clone(),
                output,
                summary,
            }),
            Err(e) if e.is_input_not_found() && !profile.required => {
                warn!("{}", e);
                println!("  Skipped {}: '{}' not found.", profile.label, profile.input.display());
                Ok(RunOutcome::Skipped {
                    model: model.to_string(),
                    profile: profile.label.clone(),
                    input: profile.input.clone(),
                })
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use crate::testing::{answering, write_json};

    const EL_BENCH: &str = r#"[
        {"id": 1, "dl_profile": "EL", "axioms": "- C ⊑ D", "query": "Is C ⊑ D entailed?", "expected": "Yes"},
        {"id": 2, "dl_profile": "EL", "axioms": "- C ⊑ D", "query": "Is D ⊑ C entailed?", "expected": "No"}
    ]"#;

    fn config(dir: &Path) -> RunConfig {
        let out = |name: &str| dir.join(name).display().to_string();
        RunConfig::builder()
            .model("qwen:7b")
            .profile("EL", dir.join("el.json"), out("results_{model}_el.json"), true)
            .profile("ELH", dir.join("elh.json"), out("results_{model}_elh.json"), false)
            .build()
    }

    fn runner(dir: &Path) -> Runner {
        Runner::new(config(dir), Evaluator::new(answering("Yes")).with_progress(false))
    }

    #[tokio::test]
    async fn missing_optional_profile_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_json(dir.path(), "el.json", EL_BENCH);

        let outcomes = runner(dir.path()).run().await.unwrap();

        assert_eq!(outcomes.len(), 2);
        match &outcomes[0] {
            RunOutcome::Completed { output, summary, .. } => {
                assert_eq!(output, &dir.path().join("results_qwen_7b_el.json"));
                assert!(output.exists());
                assert_eq!(summary.total, 2);
                assert_eq!(summary.false_positives.len(), 1);
            }
            other => panic!("expected EL to complete, got {:?}", other),
        }
        assert!(matches!(&outcomes[1], RunOutcome::Skipped { profile, .. } if profile == "ELH"));
        assert!(!dir.path().join("results_qwen_7b_elh.json").exists());
    }

    #[tokio::test]
    async fn both_profiles_run_when_present() {
        let dir = tempfile::tempdir().unwrap();
        write_json(dir.path(), "el.json", EL_BENCH);
        write_json(
            dir.path(),
            "elh.json",
            r#"[{"id": "test_0", "dl_profile": "ELH", "axioms": [{"symbolic": "r ⊑ s"}], "query": "q", "expected": "Yes"}]"#,
        );

        let outcomes = runner(dir.path()).run().await.unwrap();

        assert!(outcomes.iter().all(|o| matches!(o, RunOutcome::Completed { .. })));
        assert!(dir.path().join("results_qwen_7b_elh.json").exists());
    }

    #[tokio::test]
    async fn missing_required_profile_stops_the_run() {
        let dir = tempfile::tempdir().unwrap();
        write_json(dir.path(), "elh.json", "[]");

        let err = runner(dir.path()).run().await.unwrap_err();

        assert!(err.is_input_not_found());
        assert!(!dir.path().join("results_qwen_7b_elh.json").exists());
    }

    #[tokio::test]
    async fn models_run_in_order() {
        let dir = tempfile::tempdir().unwrap();
        write_json(dir.path(), "el.json", EL_BENCH);
        let mut config = config(dir.path());
        config.models.push("unrouted-model".into());

        let runner = Runner::new(config, Evaluator::new(answering("No")).with_progress(false));
        let outcomes = runner.run().await.unwrap();

        let models: Vec<&str> = outcomes
            .iter()
            .map(|o| match o {
                RunOutcome::Completed { model, .. } | RunOutcome::Skipped { model, .. } => model.as_str(),
            })
            .collect();
        assert_eq!(models, vec!["qwen:7b", "qwen:7b", "unrouted-model", "unrouted-model"]);

        let written = std::fs::read_to_string(dir.path().join("results_unrouted-model_el.json")).unwrap();
        assert!(written.contains(entailbench_llm::CALL_FAILED));
    }
}
