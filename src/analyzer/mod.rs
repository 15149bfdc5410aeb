//! Record-level preview of what a compiled chart shows.
//!
//! Mirrors the grouping, reduction and domain probes of the generated script
//! so dashboards can be inspected without a browser.

pub mod key;
pub mod group;
pub mod domain;

pub use key::*;
pub use group::*;
pub use domain::*;

use crate::compiler::ChartProgram;
use crate::model::{ChartSpec, Dataset, IndexHandle};

/// What one chart would render over the full, unfiltered dataset
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPreview {
    pub element_key: String,
    pub buckets: Vec<Bucket>,
    pub domain: Option<DomainProbe>,
}

pub fn preview_chart(spec: &ChartSpec, index: &IndexHandle, dataset: &Dataset) -> ChartPreview {
    let program = ChartProgram::new(spec, index);
    let normalized = dataset.normalized();
    ChartPreview {
        buckets: evaluate_groups(&program.key, &program.reducer.grouping, &normalized),
        domain: probe_domain(&program.key, &program.probe_field, &normalized),
        element_key: program.element_key,
    }
}
