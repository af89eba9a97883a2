//! Benchmark entry to prompt text.

use entailbench_core::{Axioms, BenchmarkEntry};

/// Renders the axiom block: text verbatim, or one `- <symbolic>` line per axiom.
pub fn render_axioms(axioms: &Axioms) -> String {
    match axioms {
        Axioms::Text(text) => text.clone(),
        Axioms::List(list) => list
            .iter()
            .map(|ax| format!("- {}", ax.symbolic))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Builds the yes/no entailment prompt for an entry.
pub fn build_prompt(entry: &BenchmarkEntry) -> String {
    format!(
        "Given the following logical axioms written in {description}:\n\
         \n\
         {axioms}\n\
         \n\
         Answer the following question as truthfully as possible:\n\
         {query}\n\
         \n\
         Reply only with \"Yes\" or \"No\", and do not explain your answer.",
        description = entry.profile().description(),
        axioms = render_axioms(&entry.axioms),
        query = entry.query,
    )
}
