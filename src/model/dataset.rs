use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::model::{ColumnKind, Value};

/// Name the original data-publishing helper binds the records to
pub const DEFAULT_GLOBAL_NAME: &str = "crossfilterData";

/// A named, typed column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

/// Ordered records sharing one column layout
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub columns: Vec<Column>,
    /// Row-major cells, each row as long as `columns`
    pub rows: Vec<Vec<Value>>,
}

impl Dataset {
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell of `row` under column `name`, `Null` when either is missing
    pub fn value(&self, row: usize, name: &str) -> &Value {
        self.column_index(name)
            .and_then(|col| self.rows.get(row).and_then(|r| r.get(col)))
            .unwrap_or(&Value::Null)
    }

    /// Copy with every categorical column replaced by its text labels.
    ///
    /// Category codes mean nothing to the browser-side index, so this runs
    /// before any serialization.
    pub fn normalized(&self) -> Dataset {
        let columns = self.columns.iter()
            .map(|c| match c.kind {
                ColumnKind::Categorical(_) => Column { name: c.name.clone(), kind: ColumnKind::Text },
                _ => c.clone(),
            })
            .collect();

        let rows = self.rows.iter()
            .map(|row| {
                row.iter()
                    .zip(&self.columns)
                    .map(|(value, column)| match (value, &column.kind) {
                        (Value::Category(code), ColumnKind::Categorical(labels)) => labels
                            .get(*code as usize)
                            .map(|l| Value::Text(l.clone()))
                            .unwrap_or(Value::Null),
                        _ => value.clone(),
                    })
                    .collect()
            })
            .collect();

        Dataset { columns, rows }
    }

    /// Row-oriented JSON (`[{"col": value, ...}, ...]`) safe to inline in a
    /// `<script>` element.
    pub fn to_records_json(&self) -> serde_json::Result<String> {
        let normalized = self.normalized();
        let json = serde_json::to_string(&Records(&normalized))?;
        Ok(json.replace("</", "<\\/"))
    }

    /// `window.<name> = <records>;`
    pub fn global_script(&self, name: &str) -> serde_json::Result<String> {
        Ok(format!("window.{} = {};", name, self.to_records_json()?))
    }
}

struct Records<'a>(&'a Dataset);

struct RecordRef<'a> {
    columns: &'a [Column],
    row: &'a [Value],
}

impl Serialize for Records<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.rows.len()))?;
        for row in &self.0.rows {
            seq.serialize_element(&RecordRef { columns: &self.0.columns, row })?;
        }
        seq.end()
    }
}

impl Serialize for RecordRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in self.columns.iter().zip(self.row) {
            map.serialize_entry(&column.name, value)?;
        }
        map.end()
    }
}
