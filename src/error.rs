use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Formatting error")]
    FormatError(#[from] std::fmt::Error),

    #[error("Unknown chart kind: {0}")]
    UnknownChartKind(String),

    #[error("Unknown reducer: {0}")]
    UnknownReducer(String),

    #[error("Chart {chart}: reducer {reducer} needs a dimension_reducer field")]
    MissingDimensionReducer { chart: String, reducer: &'static str },

    #[error("Chart {chart}: {kind} takes {expected} axis field(s), got {found}")]
    AxisArity {
        chart: String,
        kind: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Chart {chart}: empty field name")]
    EmptyField { chart: String },

    #[error("Chart {chart}: width and height must be positive, got {width}x{height}")]
    InvalidSize { chart: String, width: u32, height: u32 },

    #[error("Chart {chart}: field {field:?} is not a column of the dataset")]
    UnknownField { chart: String, field: String },

    #[error("Charts {first} and {second} share the element id key {key:?}")]
    DuplicateElementKey {
        first: String,
        second: String,
        key: String,
    },

    #[error("Invalid index name {0:?}")]
    InvalidIndexName(String),

    #[error("Chart {chart} targets index {found:?} but the dashboard index is {expected:?}")]
    IndexNameMismatch {
        chart: String,
        expected: String,
        found: String,
    },

    #[error("Dataset parse error: {0}")]
    DatasetError(String),
}

pub type Result<T> = std::result::Result<T, DashError>;
