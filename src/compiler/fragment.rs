use std::fmt;

use crate::compiler::script::indent;

/// One self-contained unit of generated script.
///
/// Chart fragments address their container through the `displayId`
/// variable the dashboard preamble binds, so one compiled fragment can be
/// emitted into any number of renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Human-readable name, e.g. `BarChart(a)`
    pub label: String,
    /// Suffix of the chart container id (`dc-<display>-chart-<key>`)
    pub element_key: Option<String>,
    pub body: String,
}

impl Fragment {
    pub fn new(label: impl Into<String>, element_key: Option<String>, body: String) -> Self {
        Self { label: label.into(), element_key, body }
    }

    /// Full container id for a given render
    pub fn element_id(&self, display_id: &str) -> Option<String> {
        self.element_key.as_ref().map(|key| chart_element_id(display_id, key))
    }
}

pub fn chart_element_id(display_id: &str, key: &str) -> String {
    format!("dc-{}-chart-{}", display_id, key)
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "// {}", self.label.replace(['\n', '\r'], " "))?;
        writeln!(f, "(function() {{")?;
        writeln!(f, "{}", indent(&self.body, "    "))?;
        write!(f, "}})();")
    }
}
