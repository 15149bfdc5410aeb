use std::io::Read;

use crate::error::{DashError, Result};
use crate::model::{parse_timestamp, Column, ColumnKind, Dataset, Value};

/// Parse a delimited table with a header row into a typed dataset.
///
/// Column kinds are inferred from the non-empty cells. Columns listed in
/// `categorical` are dictionary-encoded in first-seen order.
pub fn parse_dataset<R: Read>(reader: R, categorical: &[String]) -> Result<Dataset> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let names: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();

    let mut raw: Vec<Vec<String>> = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        raw.push(record.iter().map(str::to_string).collect());
    }

    for name in categorical {
        if !names.contains(name) {
            return Err(DashError::DatasetError(format!("categorical column {:?} not in header", name)));
        }
    }

    let mut columns = Vec::with_capacity(names.len());
    let mut cells: Vec<Vec<Value>> = vec![Vec::with_capacity(names.len()); raw.len()];

    for (col, name) in names.into_iter().enumerate() {
        let column_cells = raw.iter().map(|row| row[col].as_str());
        let (kind, values) = if categorical.contains(&name) {
            encode_categorical(column_cells)
        } else {
            let kind = infer_kind(column_cells.clone());
            let values = column_cells.map(|cell| convert_cell(cell, &kind)).collect();
            (kind, values)
        };

        for (row, value) in cells.iter_mut().zip(values) {
            row.push(value);
        }
        columns.push(Column { name, kind });
    }

    log::debug!("parsed dataset: {} columns, {} rows", columns.len(), cells.len());
    Ok(Dataset::new(columns, cells))
}

fn infer_kind<'a>(cells: impl Iterator<Item = &'a str> + Clone) -> ColumnKind {
    let mut present = cells.filter(|c| !c.is_empty()).peekable();
    if present.peek().is_none() {
        return ColumnKind::Text;
    }

    if present.clone().all(|c| c.parse::<i64>().is_ok()) {
        ColumnKind::Integer
    } else if present.clone().all(|c| c.parse::<f64>().is_ok()) {
        ColumnKind::Real
    } else if present.clone().all(|c| parse_bool(c).is_some()) {
        ColumnKind::Boolean
    } else if present.all(|c| parse_timestamp(c).is_some()) {
        ColumnKind::Timestamp
    } else {
        ColumnKind::Text
    }
}

fn convert_cell(cell: &str, kind: &ColumnKind) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    let converted = match kind {
        ColumnKind::Integer => cell.parse().ok().map(Value::Integer),
        ColumnKind::Real => cell.parse().ok().map(Value::Real),
        ColumnKind::Boolean => parse_bool(cell).map(Value::Boolean),
        ColumnKind::Timestamp => parse_timestamp(cell).map(Value::Timestamp),
        ColumnKind::Text | ColumnKind::Categorical(_) => None,
    };
    converted.unwrap_or_else(|| Value::Text(cell.to_string()))
}

fn encode_categorical<'a>(cells: impl Iterator<Item = &'a str>) -> (ColumnKind, Vec<Value>) {
    let mut labels: Vec<String> = Vec::new();
    let values = cells
        .map(|cell| {
            if cell.is_empty() {
                return Value::Null;
            }
            let code = match labels.iter().position(|l| l == cell) {
                Some(code) => code,
                None => {
                    labels.push(cell.to_string());
                    labels.len() - 1
                }
            };
            Value::Category(code as u32)
        })
        .collect();
    (ColumnKind::Categorical(labels), values)
}

fn parse_bool(cell: &str) -> Option<bool> {
    match cell {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}
