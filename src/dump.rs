//! Human-readable text dump for debugging dashboards.

use std::fmt::{self, Write as FmtWrite};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::analyzer::{preview_chart, ChartPreview};
use crate::error::Result;
use crate::model::{ChartSpec, Dataset};
use crate::visualization::Dashboard;

const RULE: &str = "================================================================================";

/// Options for controlling what gets dumped
pub struct DumpOptions {
    /// Maximum buckets listed per chart
    pub max_buckets: usize,
    /// Include each chart's generated fragment
    pub fragments: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self { max_buckets: 20, fragments: true }
    }
}

/// Dump dashboard information to a file
pub fn dump_to_file(dashboard: &Dashboard, output_path: &Path, options: &DumpOptions) -> Result<()> {
    let content = dump_to_string(dashboard, options)?;
    let mut file = File::create(output_path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Dump dashboard information to a string
pub fn dump_to_string(dashboard: &Dashboard, options: &DumpOptions) -> Result<String> {
    let mut out = String::new();

    section(&mut out, "Crossfilter Dashboard Dump")?;
    writeln!(out, "Index: {}", dashboard.index())?;
    writeln!(out, "Charts: {}", dashboard.specs().len())?;
    writeln!(out)?;

    dump_dataset(&mut out, dashboard.dataset())?;

    for (i, (spec, fragment)) in dashboard.specs().iter().zip(dashboard.fragments()).enumerate() {
        writeln!(out)?;
        section(&mut out, &format!("CHART {}: {}", i + 1, spec.describe()))?;
        let preview = preview_chart(spec, dashboard.index(), dashboard.dataset());
        dump_chart(&mut out, spec, &preview, options)?;

        if options.fragments {
            writeln!(out)?;
            writeln!(out, "Fragment:")?;
            for line in fragment.to_string().lines() {
                writeln!(out, "  {}", line)?;
            }
        }
    }

    Ok(out)
}

fn section(out: &mut String, title: &str) -> fmt::Result {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", RULE)
}

fn dump_dataset(out: &mut String, dataset: &Dataset) -> fmt::Result {
    writeln!(out, "Dataset: {} rows", dataset.row_count())?;
    for column in &dataset.columns {
        writeln!(out, "  {:<24} {}", column.name, column.kind.name())?;
    }
    Ok(())
}

fn dump_chart(out: &mut String, spec: &ChartSpec, preview: &ChartPreview, options: &DumpOptions) -> fmt::Result {
    writeln!(out, "Element key: {}", preview.element_key)?;
    writeln!(out, "Reducer: {}", spec.reducer.kind().name())?;
    if let Some(field) = spec.reducer.field() {
        writeln!(out, "Reduced field: {}", field)?;
    }
    writeln!(out, "Size: {}x{}", spec.size.width, spec.size.height)?;

    match &preview.domain {
        Some(domain) => writeln!(out, "Domain probe: min={} max={}", domain.min.display(), domain.max.display())?,
        None => writeln!(out, "Domain probe: (empty dataset)")?,
    }

    writeln!(out, "Buckets: {}", preview.buckets.len())?;
    for bucket in preview.buckets.iter().take(options.max_buckets) {
        writeln!(out, "  {:<30} {}", bucket.key.to_string(), bucket.value)?;
    }
    if preview.buckets.len() > options.max_buckets {
        writeln!(out, "  ... {} more", preview.buckets.len() - options.max_buckets)?;
    }
    Ok(())
}
