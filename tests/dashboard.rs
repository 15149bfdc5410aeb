use std::fs;

use assert_matches::assert_matches;
use tempfile::tempdir;

use crossfilter_dash::analyzer::preview_chart;
use crossfilter_dash::error::DashError;
use crossfilter_dash::model::Value;
use crossfilter_dash::parser::parse_config;
use crossfilter_dash::Project;

const DATA: &str = "a,b\n1,x\n2,y\n";

fn project(config: &str) -> crossfilter_dash::error::Result<Project> {
    Project::from_parts(parse_config(config)?, DATA.as_bytes())
}

#[test]
fn test_bar_chart_count_end_to_end() {
    let project = project(r#"{"charts": [{"kind": "BarChart", "axis": "a", "reducer": "Count"}]}"#).unwrap();
    let dashboard = &project.dashboard;

    let fragment = &dashboard.fragments()[0];
    assert!(fragment.body.contains(r#"cf.dimension(function(d) { return +d["a"]; })"#));
    assert!(fragment.body.contains("dim.group().reduceCount()"));
    assert!(fragment.body.contains("dc.barChart("));
    assert!(!fragment.body.contains("valueAccessor"));

    let preview = preview_chart(&dashboard.specs()[0], dashboard.index(), dashboard.dataset());
    let domain = preview.domain.unwrap();
    assert_eq!(domain.min, Value::Integer(1));
    assert_eq!(domain.max, Value::Integer(3));

    let rendered = dashboard.render(&project.bootstrap).unwrap();
    assert!(rendered.script.contains(&fragment.to_string().replace('\n', "\n    ")));
}

#[test]
fn test_save_writes_page_and_exports() {
    let project = project(r#"{"charts": [{"kind": "BarChart", "axis": "a", "reducer": "Count"}]}"#).unwrap();
    let dir = tempdir().unwrap();
    let base = dir.path().join("out");

    let saved = project.dashboard.save(&project.bootstrap, &base).unwrap();
    assert_eq!(saved.paths.html, dir.path().join("out.html"));

    let html = fs::read_to_string(dir.path().join("out.html")).unwrap();
    assert!(html.contains(&saved.rendered.script));
    assert!(html.contains(&format!("<div id=\"{}\"></div>", saved.rendered.display_id)));

    let csv = fs::read_to_string(dir.path().join("out.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines, vec!["a,b", "1,x", "2,y"]);

    // Records export reproduces the delimited format under a .json name
    let records = fs::read_to_string(dir.path().join("out.json")).unwrap();
    assert_eq!(records, csv);
}

#[test]
fn test_categorical_columns_serialize_as_labels() {
    let project = project(
        r#"{"categorical": ["b"], "charts": [{"kind": "PieChart", "axis": "b", "reducer": "Count"}]}"#,
    )
    .unwrap();
    let rendered = project.dashboard.render(&project.bootstrap).unwrap();
    assert!(rendered.script.contains(r#"[{"a":1,"b":"x"},{"a":2,"b":"y"}]"#));
}

#[test]
fn test_configuration_errors_fail_fast() {
    assert_matches!(
        project(r#"{"charts": [{"kind": "BarChart", "axis": "a", "reducer": "Mean"}]}"#),
        Err(DashError::MissingDimensionReducer { reducer: "Mean", .. })
    );
    assert_matches!(
        project(r#"{"charts": [{"kind": "ScatterPlotTime", "axis": "a", "reducer": "Count"}]}"#),
        Err(DashError::AxisArity { expected: 3, found: 1, .. })
    );
    assert_matches!(
        project(r#"{"charts": [{"kind": "BarChart", "axis": "a", "reducer": "Sum", "dimension_reducer": "c"}]}"#),
        Err(DashError::UnknownField { field, .. }) if field == "c"
    );
    assert_matches!(
        project(r#"{"index_name": "dc", "charts": []}"#),
        Err(DashError::InvalidIndexName(_))
    );
}

#[test]
fn test_custom_index_threads_through_fragments() {
    let project = project(
        r#"{"index_name": "sales", "charts": [
            {"kind": "RowChart", "axis": "b", "reducer": "Sum", "dimension_reducer": "a", "crossfilter_name": "sales"},
            {"kind": "LineChart", "axis": "a", "reducer": "CumulativeCount"}
        ]}"#,
    )
    .unwrap();
    let rendered = project.dashboard.render(&project.bootstrap).unwrap();
    assert!(rendered.script.contains("var sales = crossfilter(crossfilterData);"));
    assert!(rendered.script.contains("var all = sales.groupAll();"));
    assert_eq!(rendered.script.matches("sales.dimension(").count(), 2);
    assert!(!rendered.script.contains("cf."));
}
