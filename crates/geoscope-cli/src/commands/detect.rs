//! Detect command implementation

use crate::cli::DetectArgs;
use crate::output::OutputWriter;
use crate::output_types::{CacheRow, DetectOutput};
use anyhow::{Context, Result};
use geoscope_classify::{BayesClassifier, CascadeScopeDetector, CascadeStatus, ScopeModelFile};
use geoscope_core::config::LayeredConfig;
use serde::Serialize;
use std::io::{self, BufRead};
use std::sync::Arc;
use tabled::Tabled;

pub fn execute(args: DetectArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let file = ScopeModelFile::load(&args.model)
        .with_context(|| format!("Failed to load model {}", args.model.display()))?;
    let model = Arc::new(file.into_model().context("Model failed validation")?);
    let cascade = config.cascade_config().context("Invalid cascade configuration")?;
    let detector = CascadeScopeDetector::new(model, &cascade, BayesClassifier::default())
        .context("Cascade does not fit the model")?;

    let texts: Vec<String> = match args.text {
        Some(text) => vec![text],
        None => io::stdin()
            .lock()
            .lines()
            .collect::<io::Result<Vec<_>>>()
            .context("Failed to read text from stdin")?
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .collect(),
    };

    let results: Vec<DetectOutput> = texts
        .into_iter()
        .map(|text| {
            let detection = detector.detect(&text);
            DetectOutput { text, detection }
        })
        .collect();

    let cache_rows: Vec<CacheRow> = detector
        .cache_stats()
        .into_iter()
        .map(|(grid_size, stats)| CacheRow::new(grid_size, stats))
        .collect();

    if output.is_json() {
        if args.explain {
            output.result(serde_json::json!({
                "results": results,
                "caches": cache_rows,
            }))?;
        } else {
            output.result(&results)?;
        }
        return Ok(());
    }

    for result in &results {
        print_detection(result, args.explain, output)?;
    }
    if args.explain {
        output.section("Coarse term caches");
        output.table(cache_rows)?;
    }

    Ok(())
}

#[derive(Serialize, Tabled)]
struct StageRow {
    #[tabled(rename = "Stage")]
    stage: usize,
    #[tabled(rename = "Grid size")]
    grid_size: f64,
    #[tabled(rename = "Candidates")]
    candidates: String,
    #[tabled(rename = "Cell")]
    cell: String,
    #[tabled(rename = "Probability")]
    probability: String,
}

fn print_detection(result: &DetectOutput, explain: bool, output: &OutputWriter) -> Result<()> {
    let detection = &result.detection;
    match detection.coordinate {
        Some(coordinate) => output.success(format!("{} → {}", result.text, coordinate)),
        None => output.warning(format!("{} → no scope detected", result.text)),
    }

    if let CascadeStatus::Degraded { failed_stage } = detection.status {
        output.info(format!(
            "Stage {} abstained, using the cell of stage {}",
            failed_stage,
            failed_stage.saturating_sub(1)
        ));
    }

    if explain {
        let rows: Vec<StageRow> = detection
            .stages
            .iter()
            .map(|s| StageRow {
                stage: s.stage,
                grid_size: s.grid_size,
                candidates: s.candidates.map_or_else(|| "all".to_string(), |n| n.to_string()),
                cell: s.cell.clone(),
                probability: format!("{:.4}", s.probability),
            })
            .collect();
        output.table(rows)?;
    }

    Ok(())
}
