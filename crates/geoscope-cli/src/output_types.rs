use chrono::{DateTime, Utc};
use geoscope_classify::{CacheStats, ScopeDetection};
use serde::Serialize;
use tabled::Tabled;

/// Output for train command
#[derive(Debug, Serialize)]
pub struct TrainOutput {
    pub model_path: String,
    pub documents: u64,
    pub skipped_lines: usize,
    pub categories: usize,
    pub terms: usize,
    pub representatives: usize,
    pub fine_grid_size: f64,
}

/// Output for a single detected text
#[derive(Debug, Serialize)]
pub struct DetectOutput {
    pub text: String,
    #[serde(flatten)]
    pub detection: ScopeDetection,
}

/// Cache counters of one coarse stage
#[derive(Debug, Serialize, Tabled)]
pub struct CacheRow {
    #[tabled(rename = "Grid size")]
    pub grid_size: f64,
    #[tabled(rename = "Entries")]
    pub entries: usize,
    #[tabled(rename = "Hits")]
    pub hits: u64,
    #[tabled(rename = "Misses")]
    pub misses: u64,
    #[tabled(rename = "Evicted")]
    pub evictions: u64,
    #[tabled(rename = "Min categories")]
    pub admission_threshold: usize,
}

impl CacheRow {
    pub fn new(grid_size: f64, stats: CacheStats) -> Self {
        Self {
            grid_size,
            entries: stats.entries,
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            admission_threshold: stats.admission_threshold,
        }
    }
}

/// Output for inspect command
#[derive(Debug, Serialize)]
pub struct InspectOutput {
    pub version: u32,
    pub trained_at: DateTime<Utc>,
    pub fine_grid_size: f64,
    pub grid_cells: u64,
    pub max_ngram: usize,
    pub documents: u64,
    pub categories: usize,
    pub terms: usize,
    pub representatives: usize,
    pub top_categories: Vec<CategoryRow>,
}

/// A fine cell with its training volume
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct CategoryRow {
    #[tabled(rename = "Cell")]
    pub cell: String,
    #[tabled(rename = "Documents")]
    pub documents: u64,
    #[tabled(rename = "Terms")]
    pub terms: u64,
    #[tabled(rename = "Representative")]
    pub representative: String,
}

/// One configuration value and its source
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}
