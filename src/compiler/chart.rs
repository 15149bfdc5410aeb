use std::fmt;

use log::debug;

use crate::compiler::fragment::Fragment;
use crate::compiler::reducer::{ReducerDescriptor, ValueAccessor};
use crate::compiler::script::{field_access, html_escape, string_literal};
use crate::model::{Axis, ChartKind, ChartSize, ChartSpec, IndexHandle};

/// Palette indexed by the scatter color category
const CATEGORY_COLORS: [&str; 10] = [
    "#ff2600", "#ffdd00", "#9dff00", "#00d4ff", "#1500ff",
    "#6a00ff", "#e900ff", "#000000", "#770000", "#ff7700",
];

/// Per-record projection used as the dimension key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAccessor {
    Raw(String),
    Numeric(String),
    /// `[+x, +y, color]`
    Tuple { x: String, y: String, color: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XScale {
    None,
    /// Linear domain stepping by integer units
    LinearIntegers,
    Linear,
    Time,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartOption {
    ElasticX,
    ElasticY,
    RenderArea,
    Margins,
    /// Hide buckets whose value is zero
    ExistenceFilter,
    CategoryColors,
    /// Filter on the (x, y) pair and ignore the color category
    PairFilter,
}

/// Typed form of one chart fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartProgram {
    pub element_key: String,
    pub label: String,
    pub index: IndexHandle,
    pub key: KeyAccessor,
    pub reducer: ReducerDescriptor,
    /// Field read from the extreme records
    pub probe_field: String,
    pub widget: Widget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    /// `dc` constructor name
    pub constructor: &'static str,
    pub x_scale: XScale,
    pub options: Vec<ChartOption>,
    pub size: ChartSize,
    pub accessor: ValueAccessor,
}

/// Stable id suffix: field names with dots made safe, then the reducer kind.
pub fn element_key(spec: &ChartSpec) -> String {
    let fields: Vec<String> = spec.axis.fields().iter().map(|f| f.replace('.', "_")).collect();
    format!("{}_{}", fields.join("___"), spec.reducer.kind().name())
}

impl ChartProgram {
    pub fn new(spec: &ChartSpec, index: &IndexHandle) -> Self {
        let key = match (&spec.axis, spec.kind) {
            (Axis::Scatter { x, y, color }, _) => KeyAccessor::Tuple {
                x: x.clone(),
                y: y.clone(),
                color: color.clone(),
            },
            (Axis::Single(field), ChartKind::BarChart | ChartKind::LineChart | ChartKind::TimeChart) => {
                KeyAccessor::Numeric(field.clone())
            }
            (Axis::Single(field), _) => KeyAccessor::Raw(field.clone()),
        };

        let (constructor, x_scale, options) = match spec.kind {
            ChartKind::BarChart => ("barChart", XScale::LinearIntegers, vec![ChartOption::ElasticY]),
            ChartKind::RowChart => ("rowChart", XScale::None, vec![ChartOption::ElasticX]),
            ChartKind::LineChart => (
                "lineChart",
                XScale::Time,
                vec![ChartOption::ElasticY, ChartOption::ElasticX, ChartOption::RenderArea],
            ),
            ChartKind::TimeChart => ("barChart", XScale::Time, vec![ChartOption::ElasticY, ChartOption::ElasticX]),
            ChartKind::PieChart => ("pieChart", XScale::None, Vec::new()),
            ChartKind::ScatterPlot => ("scatterPlot", XScale::Linear, scatter_options()),
            ChartKind::ScatterPlotTime => ("scatterPlot", XScale::Time, scatter_options()),
        };

        let label = match &spec.axis {
            Axis::Single(field) => field.clone(),
            Axis::Scatter { .. } => element_key(spec),
        };

        let reducer = ReducerDescriptor::new(&spec.reducer);
        Self {
            element_key: element_key(spec),
            label,
            index: index.clone(),
            key,
            widget: Widget { constructor, x_scale, options, size: spec.size, accessor: reducer.accessor },
            reducer,
            probe_field: spec.axis.primary().to_string(),
        }
    }
}

fn scatter_options() -> Vec<ChartOption> {
    vec![
        ChartOption::ElasticY,
        ChartOption::ElasticX,
        ChartOption::Margins,
        ChartOption::ExistenceFilter,
        ChartOption::CategoryColors,
        ChartOption::PairFilter,
    ]
}

/// Compile one chart description against the dashboard's shared index.
pub fn compile_chart(spec: &ChartSpec, index: &IndexHandle) -> Fragment {
    let program = ChartProgram::new(spec, index);
    debug!("compiled {} as {}", spec.describe(), program.element_key);
    Fragment::new(spec.describe(), Some(program.element_key.clone()), program.to_string())
}

impl fmt::Display for KeyAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyAccessor::Raw(field) => write!(f, "function(d) {{ return {}; }}", field_access("d", field)?),
            KeyAccessor::Numeric(field) => write!(f, "function(d) {{ return +{}; }}", field_access("d", field)?),
            KeyAccessor::Tuple { x, y, color } => write!(
                f,
                "function(d) {{ return [+{}, +{}, {}]; }}",
                field_access("d", x)?,
                field_access("d", y)?,
                field_access("d", color)?
            ),
        }
    }
}

impl fmt::Display for ChartOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartOption::ElasticX => write!(f, ".elasticX(true)"),
            ChartOption::ElasticY => write!(f, ".elasticY(true)"),
            ChartOption::RenderArea => write!(f, ".renderArea(true)"),
            ChartOption::Margins => write!(f, ".margins({{top: 20, right: 40, bottom: 20, left: 40}})"),
            ChartOption::ExistenceFilter => {
                write!(f, ".existenceAccessor(function(d) {{ return d.value > 0; }})")
            }
            ChartOption::CategoryColors => {
                let range: Vec<String> = CATEGORY_COLORS.iter().map(|c| format!("\"{}\"", c)).collect();
                writeln!(f, ".colorAccessor(function(d) {{ return d.key[2]; }})")?;
                write!(
                    f,
                    "    .colors(d3.scale.ordinal().domain([0, 1, 2, 3, 4, 5, 6, 7, 8, 9]).range([{}]))",
                    range.join(", ")
                )
            }
            ChartOption::PairFilter => {
                writeln!(f, ".filterHandler(function(dim, filters) {{")?;
                writeln!(f, "        if (!filters || !filters.length) {{")?;
                writeln!(f, "            dim.filter(null);")?;
                writeln!(f, "        }} else {{")?;
                writeln!(f, "            dim.filterFunction(function(d) {{")?;
                writeln!(f, "                return filters[0].isFiltered([d[0], d[1]]);")?;
                writeln!(f, "            }});")?;
                writeln!(f, "        }}")?;
                writeln!(f, "        return filters;")?;
                write!(f, "    }})")
            }
        }
    }
}

impl fmt::Display for XScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XScale::None => Ok(()),
            XScale::LinearIntegers => {
                writeln!(f, ".x(d3.scale.linear().domain([min, max]))")?;
                write!(f, "    .xUnits(dc.units.integers)")
            }
            XScale::Linear => write!(f, ".x(d3.scale.linear().domain([min, max]))"),
            XScale::Time => write!(f, ".x(d3.time.scale().domain([new Date(min), new Date(max)]))"),
        }
    }
}

impl fmt::Display for ChartProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "var chartId = \"dc-\" + displayId + \"-chart-\" + {};",
            string_literal(&self.element_key)?
        )?;
        writeln!(
            f,
            "element.append('<div style=\"float: left;\" id=\"' + chartId + '\"><strong>' + {} + \
             '</strong><div style=\"clear: both;\"></div></div>');",
            string_literal(&html_escape(&self.label))?
        )?;
        writeln!(f, "var dim = {}.dimension({});", self.index, self.key)?;
        writeln!(f, "{}", self.reducer.grouping)?;
        writeln!(f, "var min = dim.bottom(1)[0][{}];", string_literal(&self.probe_field)?)?;
        writeln!(f, "var max = dim.top(1)[0][{}] + 1;", string_literal(&self.probe_field)?)?;
        writeln!(f, "var chart = dc.{}(\"#\" + chartId);", self.widget.constructor)?;
        write!(f, "chart.dimension(dim).group(group)")?;

        let mut chain: Vec<String> = Vec::new();
        if self.widget.x_scale != XScale::None {
            chain.push(self.widget.x_scale.to_string());
        }
        chain.extend(self.widget.options.iter().map(ToString::to_string));
        chain.push(format!(".width({}).height({})", self.widget.size.width, self.widget.size.height));
        if self.widget.accessor != ValueAccessor::Default {
            chain.push(self.widget.accessor.to_string());
        }
        for link in chain {
            write!(f, "\n    {}", link)?;
        }
        write!(f, ";")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReducerKind;

    fn spec(kind: ChartKind, axis: &[&str], reducer: ReducerKind, field: Option<&str>) -> ChartSpec {
        ChartSpec::new(
            kind,
            axis.iter().map(|s| s.to_string()).collect(),
            reducer,
            field.map(str::to_string),
            ChartSize::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_bar_chart_count() {
        let fragment = compile_chart(&spec(ChartKind::BarChart, &["a"], ReducerKind::Count, None), &IndexHandle::default());
        let body = &fragment.body;
        assert!(body.contains(r#"var dim = cf.dimension(function(d) { return +d["a"]; });"#));
        assert!(body.contains("var group = dim.group().reduceCount();"));
        assert!(body.contains(r#"var min = dim.bottom(1)[0]["a"];"#));
        assert!(body.contains(r#"var max = dim.top(1)[0]["a"] + 1;"#));
        assert!(body.contains(r##"var chart = dc.barChart("#" + chartId);"##));
        assert!(body.contains(".xUnits(dc.units.integers)"));
        assert!(body.contains(".elasticY(true)"));
        assert!(body.contains(".width(450).height(250);"));
        assert!(!body.contains("valueAccessor"));
        assert_eq!(fragment.element_key.as_deref(), Some("a_Count"));
    }

    #[test]
    fn test_element_key_embeds_reducer() {
        let count = element_key(&spec(ChartKind::RowChart, &["a.b"], ReducerKind::Count, None));
        let sum = element_key(&spec(ChartKind::RowChart, &["a.b"], ReducerKind::Sum, Some("v")));
        assert_eq!(count, "a_b_Count");
        assert_eq!(sum, "a_b_Sum");
        assert_ne!(count, sum);

        for kind in ChartKind::ALL {
            let axis: &[&str] = if kind.is_scatter() { &["x", "y", "c"] } else { &["x"] };
            let a = element_key(&spec(kind, axis, ReducerKind::None, None));
            let b = element_key(&spec(kind, axis, ReducerKind::CumulativeCount, None));
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_scatter_key_and_filter() {
        let s = spec(ChartKind::ScatterPlot, &["x.1", "y", "cat"], ReducerKind::Count, None);
        assert_eq!(element_key(&s), "x_1___y___cat_Count");

        let body = compile_chart(&s, &IndexHandle::default()).body;
        assert!(body.contains(r#"return [+d["x.1"], +d["y"], d["cat"]];"#));
        assert!(body.contains(".x(d3.scale.linear().domain([min, max]))"));
        assert!(body.contains("return d.value > 0;"));
        assert!(body.contains("return d.key[2];"));
        assert!(body.contains("filters[0].isFiltered([d[0], d[1]])"));
        assert!(body.contains(r#"var min = dim.bottom(1)[0]["x.1"];"#));
    }

    #[test]
    fn test_time_kinds_use_time_scale() {
        for kind in [ChartKind::TimeChart, ChartKind::LineChart, ChartKind::ScatterPlotTime] {
            let axis: &[&str] = if kind.is_scatter() { &["t", "y", "c"] } else { &["t"] };
            let body = compile_chart(&spec(kind, axis, ReducerKind::Count, None), &IndexHandle::default()).body;
            assert!(body.contains("d3.time.scale().domain([new Date(min), new Date(max)])"), "{:?}", kind);
        }
        let line = compile_chart(&spec(ChartKind::LineChart, &["t"], ReducerKind::Count, None), &IndexHandle::default()).body;
        assert!(line.contains(".renderArea(true)"));
        assert!(line.contains("dc.lineChart("));
    }

    #[test]
    fn test_pie_and_row_have_no_axis() {
        let pie = compile_chart(&spec(ChartKind::PieChart, &["g"], ReducerKind::None, None), &IndexHandle::default()).body;
        assert!(!pie.contains(".x("));
        assert!(pie.contains(r#"return d["g"];"#));

        let row = compile_chart(&spec(ChartKind::RowChart, &["g"], ReducerKind::Mean, Some("v")), &IndexHandle::default()).body;
        assert!(row.contains(".elasticX(true)"));
        assert!(row.contains(".valueAccessor(function(p) { return p.value.averages; });"));
    }

    #[test]
    fn test_uses_index_handle() {
        let index = IndexHandle::new("sales").unwrap();
        let body = compile_chart(&spec(ChartKind::BarChart, &["a"], ReducerKind::None, None), &index).body;
        assert!(body.contains("var dim = sales.dimension("));
    }

    #[test]
    fn test_field_names_are_quoted() {
        let s = spec(ChartKind::RowChart, &["it's \"{prop}\""], ReducerKind::Count, None);
        let body = compile_chart(&s, &IndexHandle::default()).body;
        assert!(body.contains(r#"d["it's \"{prop}\""]"#));
        assert!(body.contains(r#"+ "it&#39;s &quot;{prop}&quot;" +"#));
    }
}
