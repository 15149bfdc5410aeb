use std::path::Path;

use log::{debug, info};
use uuid::Uuid;

use crate::compiler::script::indent;
use crate::compiler::{compile_chart, compile_summary, Fragment};
use crate::error::{DashError, Result};
use crate::model::{ChartSpec, Dataset, IndexHandle};
use crate::visualization::artifacts::{write_artifacts, ArtifactPaths};
use crate::visualization::resources::Bootstrap;

/// Datasets are bound to this variable before the index is built
const DATA_VAR: &str = "crossfilterData";

/// A dataset plus the charts linked over one shared index.
#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: Dataset,
    index: IndexHandle,
    specs: Vec<ChartSpec>,
    fragments: Vec<Fragment>,
}

/// One generated script body and the display id it was minted with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub display_id: String,
    pub script: String,
}

/// A save call's script body and the files it wrote
#[derive(Debug, Clone)]
pub struct Saved {
    pub rendered: Rendered,
    pub paths: ArtifactPaths,
}

impl Dashboard {
    /// Compile `specs` against `index`, rejecting fields the dataset lacks.
    pub fn new(dataset: Dataset, specs: Vec<ChartSpec>, index: IndexHandle) -> Result<Self> {
        for spec in &specs {
            if let Some(field) = spec.referenced_fields().into_iter().find(|f| !dataset.has_column(f)) {
                return Err(DashError::UnknownField {
                    chart: spec.describe(),
                    field: field.to_string(),
                });
            }
        }

        let fragments: Vec<Fragment> = specs.iter().map(|spec| compile_chart(spec, &index)).collect();
        for (i, fragment) in fragments.iter().enumerate() {
            if let Some(earlier) = fragments[..i].iter().find(|f| f.element_key == fragment.element_key) {
                return Err(DashError::DuplicateElementKey {
                    first: earlier.label.clone(),
                    second: fragment.label.clone(),
                    key: fragment.element_key.clone().unwrap_or_default(),
                });
            }
        }

        info!("dashboard over index {} with {} charts", index, specs.len());
        Ok(Self { dataset, index, specs, fragments })
    }

    /// Use caller-built fragments instead of compiling chart specs
    pub fn from_fragments(dataset: Dataset, fragments: Vec<Fragment>, index: IndexHandle) -> Self {
        Self { dataset, index, specs: Vec::new(), fragments }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn index(&self) -> &IndexHandle {
        &self.index
    }

    pub fn specs(&self) -> &[ChartSpec] {
        &self.specs
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Generate a fresh script body under a newly minted display id.
    ///
    /// The dataset is serialized again on every call.
    pub fn render(&self, bootstrap: &Bootstrap) -> Result<Rendered> {
        let display_id = Uuid::new_v4().to_string();
        let script = self.script(&display_id, bootstrap)?;
        info!("rendered display {} ({} bytes)", display_id, script.len());
        Ok(Rendered { display_id, script })
    }

    /// Script body for a given display id
    pub fn script(&self, display_id: &str, bootstrap: &Bootstrap) -> Result<String> {
        let records = self.dataset.to_records_json()?;
        debug!("serialized {} records", self.dataset.row_count());

        let mut sections = vec![
            format!("var displayId = {};", serde_json::to_string(display_id)?),
            format!("var {} = {};", DATA_VAR, records),
            format!("var {} = crossfilter({});", self.index, DATA_VAR),
            compile_summary(&self.index).to_string(),
        ];
        sections.extend(self.fragments.iter().map(ToString::to_string));
        sections.push("dc.renderAll();\ndc.redrawAll();".to_string());

        let body = sections
            .iter()
            .map(|s| indent(s, "    "))
            .collect::<Vec<_>>()
            .join("\n\n");

        Ok(format!("{}\n{}\n}});\n", bootstrap.require_opener()?, body))
    }

    /// Render, then write `<base>.html`, `<base>.csv` and `<base>.json`.
    pub fn save<P: AsRef<Path>>(&self, bootstrap: &Bootstrap, base: P) -> Result<Saved> {
        let rendered = self.render(bootstrap)?;
        let paths = write_artifacts(&rendered, &self.dataset, bootstrap, base.as_ref())?;
        info!("saved {}", paths.html.display());
        Ok(Saved { rendered, paths })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChartKind, ChartSize, Column, ColumnKind, ReducerKind, Value};
    use crate::visualization::resources::{bootstrap, Resources};
    use assert_matches::assert_matches;

    fn dataset() -> Dataset {
        Dataset::new(
            vec![
                Column { name: "a".into(), kind: ColumnKind::Integer },
                Column { name: "b".into(), kind: ColumnKind::Text },
            ],
            vec![
                vec![Value::Integer(1), Value::Text("x".into())],
                vec![Value::Integer(2), Value::Text("y".into())],
            ],
        )
    }

    fn bar(field: &str, reducer: ReducerKind) -> ChartSpec {
        ChartSpec::new(ChartKind::BarChart, vec![field.into()], reducer, Some("a".into()), ChartSize::default()).unwrap()
    }

    #[test]
    fn test_script_layout() {
        let dash = Dashboard::new(dataset(), vec![bar("a", ReducerKind::Count), bar("b", ReducerKind::Sum)], IndexHandle::default()).unwrap();
        let boot = bootstrap(&Resources::default()).unwrap();
        let script = dash.script("abc", &boot).unwrap();

        assert!(script.starts_with("require([\"d3\",\"crossfilter\",\"dc\"], function(d3, crossfilter, dc) {\n"));
        assert!(script.contains("    var displayId = \"abc\";"));
        assert!(script.contains(r#"    var crossfilterData = [{"a":1,"b":"x"},{"a":2,"b":"y"}];"#));
        assert!(script.contains("    var cf = crossfilter(crossfilterData);"));
        assert!(script.trim_end().ends_with("dc.renderAll();\n    dc.redrawAll();\n});"));

        let summary = script.find("cf.groupAll()").unwrap();
        let first = script.find("// BarChart(a)").unwrap();
        let second = script.find("// BarChart(b)").unwrap();
        assert!(summary < first && first < second);
    }

    #[test]
    fn test_render_mints_fresh_ids() {
        let dash = Dashboard::new(dataset(), vec![bar("a", ReducerKind::Count)], IndexHandle::default()).unwrap();
        let boot = bootstrap(&Resources::default()).unwrap();
        let first = dash.render(&boot).unwrap();
        let second = dash.render(&boot).unwrap();
        assert_ne!(first.display_id, second.display_id);
        assert!(first.script.contains(&first.display_id));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = Dashboard::new(dataset(), vec![bar("missing", ReducerKind::Count)], IndexHandle::default());
        assert_matches!(result, Err(DashError::UnknownField { field, .. }) if field == "missing");
    }

    #[test]
    fn test_colliding_element_keys_rejected() {
        let pie = ChartSpec::new(ChartKind::PieChart, vec!["a".into()], ReducerKind::Count, None, ChartSize::default()).unwrap();
        let result = Dashboard::new(dataset(), vec![bar("a", ReducerKind::Count), pie], IndexHandle::default());
        assert_matches!(result, Err(DashError::DuplicateElementKey { key, .. }) if key == "a_Count");

        let dotted = Dataset::new(
            vec![
                Column { name: "a.b".into(), kind: ColumnKind::Integer },
                Column { name: "a_b".into(), kind: ColumnKind::Integer },
                Column { name: "a".into(), kind: ColumnKind::Integer },
            ],
            vec![vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]],
        );
        let row = ChartSpec::new(ChartKind::RowChart, vec!["a_b".into()], ReducerKind::Count, None, ChartSize::default()).unwrap();
        let result = Dashboard::new(dotted.clone(), vec![bar("a.b", ReducerKind::Count), row], IndexHandle::default());
        assert_matches!(result, Err(DashError::DuplicateElementKey { first, second, .. })
            if first == "BarChart(a.b)" && second == "RowChart(a_b)");

        let distinct = vec![bar("a.b", ReducerKind::Count), bar("a.b", ReducerKind::Sum)];
        assert!(Dashboard::new(dotted, distinct, IndexHandle::default()).is_ok());
    }

    #[test]
    fn test_prebuilt_fragments() {
        let fragment = Fragment::new("custom", None, "console.log(cf.size());".to_string());
        let dash = Dashboard::from_fragments(dataset(), vec![fragment], IndexHandle::default());
        let boot = bootstrap(&Resources::default()).unwrap();
        let script = dash.script("id", &boot).unwrap();
        assert!(script.contains("        console.log(cf.size());"));
    }
}
