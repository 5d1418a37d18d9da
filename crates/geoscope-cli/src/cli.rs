use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// GeoScope - Geographic scope detection for text
#[derive(Parser, Debug)]
#[command(name = "geoscope")]
#[command(about = "Detect the geographic scope of text with a cascade of grid classifiers", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./geoscope.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Coarse grid sizes in degrees, coarsest first (e.g. "22.5,5.625,1.40625")
    #[arg(long, global = true, value_name = "SIZES")]
    pub grid_sizes: Option<String>,

    /// Fine grid size in degrees used for training
    #[arg(long, global = true, value_name = "DEGREES")]
    pub fine_grid_size: Option<f64>,

    /// Coarse term cache size that triggers eviction
    #[arg(long, global = true)]
    pub cache_upper: Option<usize>,

    /// Coarse term cache size kept after eviction
    #[arg(long, global = true)]
    pub cache_lower: Option<usize>,

    /// Longest word n-gram used as a term during training
    #[arg(long, global = true)]
    pub max_ngram: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train a scope model from geotagged documents
    Train(TrainArgs),

    /// Detect the geographic scope of text
    Detect(DetectArgs),

    /// Show information about a trained model
    Inspect(InspectArgs),

    /// Show the effective configuration and where each value comes from
    Config,
}

#[derive(Parser, Debug)]
pub struct TrainArgs {
    /// JSON Lines file with one {"text", "lat", "lng"} object per line
    pub input: PathBuf,

    /// Where to write the trained model
    #[arg(long, short = 'o', default_value = "model.json")]
    pub output: PathBuf,
}

#[derive(Parser, Debug)]
pub struct DetectArgs {
    /// Text to classify; reads one text per line from stdin when omitted
    pub text: Option<String>,

    /// Trained model file
    #[arg(long, short = 'm', default_value = "model.json")]
    pub model: PathBuf,

    /// Show the prediction of every stage and cache statistics
    #[arg(long)]
    pub explain: bool,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Trained model file
    #[arg(long, short = 'm', default_value = "model.json")]
    pub model: PathBuf,

    /// Number of categories to list
    #[arg(long, default_value = "10")]
    pub top: usize,
}
