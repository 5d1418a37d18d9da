//! Train command implementation

use crate::cli::TrainArgs;
use crate::output::OutputWriter;
use crate::output_types::TrainOutput;
use crate::progress::{create_progress_bar, finish_success};
use anyhow::{bail, Context, Result};
use geoscope_classify::{ScopeLearner, TrainingDocument};
use geoscope_core::config::LayeredConfig;
use geoscope_core::ports::DictionaryModel;
use std::fs;

pub fn execute(args: TrainArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let content = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read training data {}", args.input.display()))?;

    let fine_grid_size = config.fine_grid_size.value;
    let tokenizer = config.tokenizer().context("Invalid tokenizer configuration")?;
    let mut learner =
        ScopeLearner::new(fine_grid_size, tokenizer).context("Invalid fine grid size")?;

    if let Err(e) = config
        .cascade_config()
        .and_then(|cascade| cascade.validate_fine_grid_size(fine_grid_size))
    {
        output.warning(format!("The configured cascade cannot run on this model: {}", e));
    }

    let lines: Vec<&str> = content.lines().collect();
    let pb = create_progress_bar(lines.len() as u64, "Training scope model...", output.is_json());
    let mut skipped = 0;
    for (index, line) in lines.iter().enumerate() {
        pb.inc(1);
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<TrainingDocument>(line) {
            Ok(document) => learner.learn(&document),
            Err(e) => {
                skipped += 1;
                tracing::warn!(line = index + 1, error = %e, "Skipping invalid training document");
            }
        }
    }
    finish_success(&pb, "Training complete");

    if learner.num_documents() == 0 {
        bail!("No usable training documents in {}", args.input.display());
    }

    let model = learner.finish();
    model
        .save(&args.output)
        .with_context(|| format!("Failed to write model to {}", args.output.display()))?;

    let result = TrainOutput {
        model_path: args.output.display().to_string(),
        documents: model.dictionary.num_documents(),
        skipped_lines: skipped,
        categories: model.dictionary.num_categories(),
        terms: model.dictionary.num_terms(),
        representatives: model.representatives.len(),
        fine_grid_size,
    };

    if output.is_json() {
        output.result(result)?;
    } else {
        output.success(format!("Model written to {}", result.model_path));
        output.kv("Documents", result.documents);
        output.kv("Cells", result.categories);
        output.kv("Terms", result.terms);
        output.kv("Fine grid size", format!("{}°", result.fine_grid_size));
        if skipped > 0 {
            output.warning(format!("Skipped {} invalid lines", skipped));
        }
    }

    Ok(())
}
