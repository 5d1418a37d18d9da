use crate::error::{GeoscopeError, Result};
use crate::models::cascade::{DEFAULT_CACHE_LOWER, DEFAULT_CACHE_UPPER};
use crate::models::{validate_grid_size, CacheLimits, CascadeConfig};
use crate::processing::TermTokenizer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Default coarse stages, each a quarter of the previous one
pub const DEFAULT_GRID_SIZES: [f64; 3] = [22.5, 5.625, 1.40625];

/// Default grid size used for training the fine dictionary
pub const DEFAULT_FINE_GRID_SIZE: f64 = 0.3515625;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for GeoScope
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub grid_sizes: ConfigValue<Vec<f64>>,
    pub fine_grid_size: ConfigValue<f64>,
    pub cache_upper: ConfigValue<usize>,
    pub cache_lower: ConfigValue<usize>,
    pub max_ngram: ConfigValue<usize>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            grid_sizes: ConfigValue::new(DEFAULT_GRID_SIZES.to_vec(), ConfigSource::Default),
            fine_grid_size: ConfigValue::new(DEFAULT_FINE_GRID_SIZE, ConfigSource::Default),
            cache_upper: ConfigValue::new(DEFAULT_CACHE_UPPER, ConfigSource::Default),
            cache_lower: ConfigValue::new(DEFAULT_CACHE_LOWER, ConfigSource::Default),
            max_ngram: ConfigValue::new(1, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| GeoscopeError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| GeoscopeError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(grid_sizes) = file_config.grid_sizes {
            self.grid_sizes.update(grid_sizes, ConfigSource::File);
        }

        if let Some(fine_grid_size) = file_config.fine_grid_size {
            self.fine_grid_size.update(fine_grid_size, ConfigSource::File);
        }

        if let Some(cache_upper) = file_config.cache_upper {
            self.cache_upper.update(cache_upper, ConfigSource::File);
        }

        if let Some(cache_lower) = file_config.cache_lower {
            self.cache_lower.update(cache_lower, ConfigSource::File);
        }

        if let Some(max_ngram) = file_config.max_ngram {
            self.max_ngram.update(max_ngram, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // GEOSCOPE_GRID_SIZES
        if let Ok(sizes_str) = env::var("GEOSCOPE_GRID_SIZES") {
            match parse_grid_sizes(&sizes_str) {
                Ok(sizes) => self.grid_sizes.update(sizes, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOSCOPE_GRID_SIZES value '{}': expected comma-separated degrees",
                    sizes_str
                ),
            }
        }

        // GEOSCOPE_FINE_GRID_SIZE
        if let Ok(size_str) = env::var("GEOSCOPE_FINE_GRID_SIZE") {
            match size_str.trim().parse::<f64>() {
                Ok(size) if validate_grid_size(size).is_ok() => {
                    self.fine_grid_size.update(size, ConfigSource::Environment)
                }
                _ => tracing::warn!(
                    "Invalid GEOSCOPE_FINE_GRID_SIZE value '{}': expected degrees in (0, 180]",
                    size_str
                ),
            }
        }

        // GEOSCOPE_CACHE_UPPER
        if let Ok(upper_str) = env::var("GEOSCOPE_CACHE_UPPER") {
            match upper_str.trim().parse::<usize>() {
                Ok(upper) => self.cache_upper.update(upper, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOSCOPE_CACHE_UPPER value '{}': expected a positive integer",
                    upper_str
                ),
            }
        }

        // GEOSCOPE_CACHE_LOWER
        if let Ok(lower_str) = env::var("GEOSCOPE_CACHE_LOWER") {
            match lower_str.trim().parse::<usize>() {
                Ok(lower) => self.cache_lower.update(lower, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOSCOPE_CACHE_LOWER value '{}': expected a positive integer",
                    lower_str
                ),
            }
        }

        // GEOSCOPE_MAX_NGRAM
        if let Ok(ngram_str) = env::var("GEOSCOPE_MAX_NGRAM") {
            match ngram_str.trim().parse::<usize>() {
                Ok(max_ngram) => self.max_ngram.update(max_ngram, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOSCOPE_MAX_NGRAM value '{}': expected a positive integer",
                    ngram_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(grid_sizes) = overrides.grid_sizes {
            self.grid_sizes.update(grid_sizes, ConfigSource::Cli);
        }

        if let Some(fine_grid_size) = overrides.fine_grid_size {
            self.fine_grid_size.update(fine_grid_size, ConfigSource::Cli);
        }

        if let Some(cache_upper) = overrides.cache_upper {
            self.cache_upper.update(cache_upper, ConfigSource::Cli);
        }

        if let Some(cache_lower) = overrides.cache_lower {
            self.cache_lower.update(cache_lower, ConfigSource::Cli);
        }

        if let Some(max_ngram) = overrides.max_ngram {
            self.max_ngram.update(max_ngram, ConfigSource::Cli);
        }
    }

    /// Build the validated cascade configuration
    pub fn cascade_config(&self) -> Result<CascadeConfig> {
        let cache = CacheLimits::new(self.cache_upper.value, self.cache_lower.value)?;
        Ok(CascadeConfig::new(self.grid_sizes.value.clone())?.with_cache_limits(cache))
    }

    /// Build the tokenizer used for training
    pub fn tokenizer(&self) -> Result<TermTokenizer> {
        TermTokenizer::new(self.max_ngram.value, TermTokenizer::default().min_word_length)
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "grid_sizes".to_string(),
            (format_grid_sizes(&self.grid_sizes.value), self.grid_sizes.source),
        );

        map.insert(
            "fine_grid_size".to_string(),
            (format!("{}°", self.fine_grid_size.value), self.fine_grid_size.source),
        );

        map.insert(
            "cache_upper".to_string(),
            (self.cache_upper.value.to_string(), self.cache_upper.source),
        );

        map.insert(
            "cache_lower".to_string(),
            (self.cache_lower.value.to_string(), self.cache_lower.source),
        );

        map.insert("max_ngram".to_string(), (self.max_ngram.value.to_string(), self.max_ngram.source));

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    grid_sizes: Option<Vec<f64>>,
    fine_grid_size: Option<f64>,
    cache_upper: Option<usize>,
    cache_lower: Option<usize>,
    max_ngram: Option<usize>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub grid_sizes: Option<Vec<f64>>,
    pub fine_grid_size: Option<f64>,
    pub cache_upper: Option<usize>,
    pub cache_lower: Option<usize>,
    pub max_ngram: Option<usize>,
}

/// Parse a comma-separated list of grid sizes in degrees
pub fn parse_grid_sizes(s: &str) -> Result<Vec<f64>> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    trimmed
        .split(',')
        .map(|part| {
            let part = part.trim();
            let size = part.parse::<f64>().map_err(|_| GeoscopeError::ConfigInvalid {
                key: "grid_sizes".to_string(),
                reason: format!("Invalid grid size: '{}'. Use degrees, e.g. 22.5,5.625", part),
            })?;
            validate_grid_size(size)?;
            Ok(size)
        })
        .collect()
}

/// Render grid sizes the way [`parse_grid_sizes`] reads them
pub fn format_grid_sizes(sizes: &[f64]) -> String {
    sizes.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.grid_sizes.value, vec![22.5, 5.625, 1.40625]);
        assert_eq!(config.grid_sizes.source, ConfigSource::Default);
        assert_eq!(config.fine_grid_size.value, 0.3515625);
        assert_eq!(config.max_ngram.value, 1);
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        // File should override default
        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);
        assert_eq!(value.source, ConfigSource::File);

        // Environment should override file
        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);
        assert_eq!(value.source, ConfigSource::Environment);

        // CLI should override environment
        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
grid_sizes = [10.0, 5.0]
fine_grid_size = 1.0
cache_upper = 500
cache_lower = 250
max_ngram = 2
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.grid_sizes.value, vec![10.0, 5.0]);
        assert_eq!(config.grid_sizes.source, ConfigSource::File);
        assert_eq!(config.fine_grid_size.value, 1.0);
        assert_eq!(config.cache_upper.value, 500);
        assert_eq!(config.cache_lower.value, 250);
        assert_eq!(config.max_ngram.value, 2);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        let overrides = CliConfigOverrides {
            grid_sizes: Some(vec![45.0, 10.0]),
            fine_grid_size: Some(2.0),
            ..Default::default()
        };

        config.update_from_cli(overrides);

        assert_eq!(config.grid_sizes.value, vec![45.0, 10.0]);
        assert_eq!(config.grid_sizes.source, ConfigSource::Cli);
        assert_eq!(config.fine_grid_size.source, ConfigSource::Cli);
        // These should still be defaults
        assert_eq!(config.cache_upper.source, ConfigSource::Default);
        assert_eq!(config.max_ngram.source, ConfigSource::Default);
    }

    #[test]
    fn test_cascade_config() {
        let config = LayeredConfig::with_defaults();
        let cascade = config.cascade_config().unwrap();
        assert_eq!(cascade.grid_sizes(), &DEFAULT_GRID_SIZES);
        assert_eq!(cascade.cache_limits(), CacheLimits::default());
    }

    #[test]
    fn test_cascade_config_rejects_bad_cache() {
        let mut config = LayeredConfig::with_defaults();
        config.update_from_cli(CliConfigOverrides {
            cache_upper: Some(10),
            cache_lower: Some(20),
            ..Default::default()
        });
        assert!(config.cascade_config().is_err());
    }

    #[test]
    fn test_parse_grid_sizes() {
        assert_eq!(parse_grid_sizes("22.5, 5.625").unwrap(), vec![22.5, 5.625]);
        assert_eq!(parse_grid_sizes("").unwrap(), Vec::<f64>::new());
        assert!(parse_grid_sizes("10,abc").is_err());
        assert!(parse_grid_sizes("200").is_err());
        assert!(parse_grid_sizes("-5").is_err());
    }

    #[test]
    fn test_format_grid_sizes_roundtrip() {
        let sizes = vec![22.5, 5.625, 1.40625];
        assert_eq!(parse_grid_sizes(&format_grid_sizes(&sizes)).unwrap(), sizes);
    }

    #[test]
    fn test_inspection_map() {
        let config = LayeredConfig::with_defaults();
        let map = config.to_inspection_map();

        assert!(map.contains_key("grid_sizes"));
        assert!(map.contains_key("fine_grid_size"));
        assert!(map.contains_key("cache_upper"));
        assert!(map.contains_key("cache_lower"));
        assert!(map.contains_key("max_ngram"));

        let (sizes, source) = &map["grid_sizes"];
        assert_eq!(sizes, "22.5,5.625,1.40625");
        assert_eq!(*source, ConfigSource::Default);
    }
}
