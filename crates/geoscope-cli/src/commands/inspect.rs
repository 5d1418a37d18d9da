//! Inspect command implementation

use crate::cli::InspectArgs;
use crate::output::OutputWriter;
use crate::output_types::{CategoryRow, InspectOutput};
use anyhow::{Context, Result};
use geoscope_classify::ScopeModelFile;
use geoscope_core::ports::DictionaryModel;
use geoscope_geo::{CellId, Grid};

pub fn execute(args: InspectArgs, output: &OutputWriter) -> Result<()> {
    let file = ScopeModelFile::load(&args.model)
        .with_context(|| format!("Failed to load model {}", args.model.display()))?;
    let grid = Grid::new(file.fine_grid_size).context("Model has an invalid fine grid size")?;

    let documents = file.dictionary.document_counts();
    let terms = file.dictionary.term_counts();
    let mut top: Vec<CategoryRow> = documents
        .iter()
        .map(|(cell, count)| CategoryRow {
            cell: cell.to_string(),
            documents: count,
            terms: terms.count(cell),
            representative: cell
                .parse::<CellId>()
                .ok()
                .and_then(|id| file.representatives.get(&id))
                .map_or_else(|| "-".to_string(), |c| c.to_string()),
        })
        .collect();
    top.sort_by(|a, b| b.documents.cmp(&a.documents).then_with(|| a.cell.cmp(&b.cell)));
    top.truncate(args.top);

    let info = InspectOutput {
        version: file.version,
        trained_at: file.trained_at,
        fine_grid_size: file.fine_grid_size,
        grid_cells: grid.num_cells(),
        max_ngram: file.tokenizer.max_ngram,
        documents: file.dictionary.num_documents(),
        categories: file.dictionary.num_categories(),
        terms: file.dictionary.num_terms(),
        representatives: file.representatives.len(),
        top_categories: top,
    };

    if output.is_json() {
        return output.result(info);
    }

    output.section("Model");
    output.kv("Format version", info.version);
    output.kv("Trained at", info.trained_at.format("%Y-%m-%d %H:%M:%S UTC"));
    output.kv("Fine grid size", format!("{}° ({} cells)", info.fine_grid_size, info.grid_cells));
    output.kv("Max n-gram", info.max_ngram);
    output.kv("Documents", info.documents);
    output.kv("Trained cells", info.categories);
    output.kv("Terms", info.terms);

    output.section("Cells with most documents");
    output.table(info.top_categories)?;

    Ok(())
}
