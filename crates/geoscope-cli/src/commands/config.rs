//! Config command implementation

use crate::output::OutputWriter;
use crate::output_types::ConfigRow;
use anyhow::Result;
use geoscope_core::config::LayeredConfig;

pub fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let mut rows: Vec<ConfigRow> = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| ConfigRow { key, value, source: format!("{:?}", source) })
        .collect();
    rows.sort_by(|a, b| a.key.cmp(&b.key));

    output.section("Configuration");
    output.table(rows)?;

    let fine_grid_size = config.fine_grid_size.value;
    if let Err(e) = config
        .cascade_config()
        .and_then(|cascade| cascade.validate_fine_grid_size(fine_grid_size))
    {
        output.warning(format!("Configuration does not form a usable cascade: {}", e));
    }

    Ok(())
}
