pub mod error;
pub mod model;
pub mod parser;
pub mod compiler;
pub mod analyzer;
pub mod visualization;
pub mod dump;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Result;
use crate::parser::{parse_config, parse_dataset, DashboardConfig};
use crate::visualization::{bootstrap, Bootstrap, Dashboard};

/// A loaded configuration, its dashboard and the resource bootstrap
#[derive(Debug)]
pub struct Project {
    pub config: DashboardConfig,
    pub dashboard: Dashboard,
    pub bootstrap: Bootstrap,
}

impl Project {
    /// Load a JSON dashboard configuration and the CSV dataset it charts
    pub fn open<P: AsRef<Path>, Q: AsRef<Path>>(config_path: P, data_path: Q) -> Result<Self> {
        let config = parse_config(&std::fs::read_to_string(config_path)?)?;
        let data = File::open(data_path)?;
        Self::from_parts(config, data)
    }

    pub fn from_parts<R: Read>(config: DashboardConfig, data: R) -> Result<Self> {
        let dataset = parse_dataset(data, &config.categorical)?;
        let index = config.index()?;
        let specs = config.chart_specs(&index)?;
        let dashboard = Dashboard::new(dataset, specs, index)?;
        let bootstrap = bootstrap(&config.resources)?;
        Ok(Self { config, dashboard, bootstrap })
    }
}

/// Print dashboard info
pub fn print_dashboard_info(project: &Project, verbose: bool) {
    let dashboard = &project.dashboard;
    let dataset = dashboard.dataset();

    println!("Crossfilter Dashboard Information");
    println!("=================================");
    println!("Index: {}", dashboard.index());
    println!("Output: {}", project.config.output);
    println!("Records: {}", dataset.row_count());
    println!("Columns: {}", dataset.columns.len());
    println!("Charts: {}", dashboard.specs().len());

    if verbose {
        println!();
        println!("Columns");
        println!("-------");
        for column in &dataset.columns {
            println!("  {} ({})", column.name, column.kind.name());
        }

        println!();
        println!("Charts");
        println!("------");
        for (spec, fragment) in dashboard.specs().iter().zip(dashboard.fragments()) {
            println!("  {} [{}]", spec.describe(), fragment.element_key.as_deref().unwrap_or("-"));
            println!("    Reducer: {}", spec.reducer.kind().name());
            println!("    Size: {}x{}", spec.size.width, spec.size.height);
        }
    }
}
