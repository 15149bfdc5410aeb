use crate::error::{DashError, Result};

/// Visual widget family of a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    TimeChart,
    RowChart,
    BarChart,
    LineChart,
    ScatterPlot,
    ScatterPlotTime,
    PieChart,
}

impl ChartKind {
    pub const ALL: [ChartKind; 7] = [
        ChartKind::TimeChart,
        ChartKind::RowChart,
        ChartKind::BarChart,
        ChartKind::LineChart,
        ChartKind::ScatterPlot,
        ChartKind::ScatterPlotTime,
        ChartKind::PieChart,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == s)
    }

    pub fn name(self) -> &'static str {
        match self {
            ChartKind::TimeChart => "TimeChart",
            ChartKind::RowChart => "RowChart",
            ChartKind::BarChart => "BarChart",
            ChartKind::LineChart => "LineChart",
            ChartKind::ScatterPlot => "ScatterPlot",
            ChartKind::ScatterPlotTime => "ScatterPlotTime",
            ChartKind::PieChart => "PieChart",
        }
    }

    pub fn is_scatter(self) -> bool {
        matches!(self, ChartKind::ScatterPlot | ChartKind::ScatterPlotTime)
    }

    pub fn axis_arity(self) -> usize {
        if self.is_scatter() { 3 } else { 1 }
    }
}

/// Reducer tag without its field, as written in configuration and element ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReducerKind {
    None,
    Count,
    Sum,
    Mean,
    CumulativeSum,
    CumulativeCount,
}

impl ReducerKind {
    pub const ALL: [ReducerKind; 6] = [
        ReducerKind::None,
        ReducerKind::Count,
        ReducerKind::Sum,
        ReducerKind::Mean,
        ReducerKind::CumulativeSum,
        ReducerKind::CumulativeCount,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == s)
    }

    pub fn name(self) -> &'static str {
        match self {
            ReducerKind::None => "None",
            ReducerKind::Count => "Count",
            ReducerKind::Sum => "Sum",
            ReducerKind::Mean => "Mean",
            ReducerKind::CumulativeSum => "CumulativeSum",
            ReducerKind::CumulativeCount => "CumulativeCount",
        }
    }

    /// Whether the reducer aggregates a dimension-reducer field
    pub fn needs_field(self) -> bool {
        matches!(self, ReducerKind::Sum | ReducerKind::Mean | ReducerKind::CumulativeSum)
    }
}

/// Aggregation applied to each group bucket, carrying the field it reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reducer {
    None,
    Count,
    Sum { field: String },
    Mean { field: String },
    CumulativeCount,
    CumulativeSum { field: String },
}

impl Reducer {
    pub fn kind(&self) -> ReducerKind {
        match self {
            Reducer::None => ReducerKind::None,
            Reducer::Count => ReducerKind::Count,
            Reducer::Sum { .. } => ReducerKind::Sum,
            Reducer::Mean { .. } => ReducerKind::Mean,
            Reducer::CumulativeCount => ReducerKind::CumulativeCount,
            Reducer::CumulativeSum { .. } => ReducerKind::CumulativeSum,
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            Reducer::Sum { field } | Reducer::Mean { field } | Reducer::CumulativeSum { field } => {
                Some(field)
            }
            _ => None,
        }
    }
}

/// Field(s) a chart projects each record onto
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Axis {
    Single(String),
    Scatter { x: String, y: String, color: String },
}

impl Axis {
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Axis::Single(field) => vec![field],
            Axis::Scatter { x, y, color } => vec![x, y, color],
        }
    }

    /// Field whose extremes drive the domain probes
    pub fn primary(&self) -> &str {
        match self {
            Axis::Single(field) => field,
            Axis::Scatter { x, .. } => x,
        }
    }
}

/// Pixel size of a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartSize {
    fn default() -> Self {
        Self { width: 450, height: 250 }
    }
}

/// A validated, immutable chart description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub axis: Axis,
    pub reducer: Reducer,
    pub size: ChartSize,
}

impl ChartSpec {
    /// Build a spec, rejecting combinations that would generate broken script.
    ///
    /// A dimension-reducer field given to a reducer that does not aggregate
    /// one is ignored.
    pub fn new(
        kind: ChartKind,
        axis: Vec<String>,
        reducer: ReducerKind,
        dimension_reducer: Option<String>,
        size: ChartSize,
    ) -> Result<Self> {
        let chart = format!("{}({})", kind.name(), axis.join(", "));

        if axis.len() != kind.axis_arity() {
            return Err(DashError::AxisArity {
                chart,
                kind: kind.name(),
                expected: kind.axis_arity(),
                found: axis.len(),
            });
        }
        if axis.iter().any(|f| f.is_empty()) {
            return Err(DashError::EmptyField { chart });
        }
        if size.width == 0 || size.height == 0 {
            return Err(DashError::InvalidSize { chart, width: size.width, height: size.height });
        }

        let field = match dimension_reducer {
            Some(f) if f.is_empty() && reducer.needs_field() => {
                return Err(DashError::EmptyField { chart });
            }
            Some(f) => Some(f),
            None => None,
        };
        let require_field = || {
            field.clone().ok_or_else(|| DashError::MissingDimensionReducer {
                chart: chart.clone(),
                reducer: reducer.name(),
            })
        };

        let reducer = match reducer {
            ReducerKind::None => Reducer::None,
            ReducerKind::Count => Reducer::Count,
            ReducerKind::Sum => Reducer::Sum { field: require_field()? },
            ReducerKind::Mean => Reducer::Mean { field: require_field()? },
            ReducerKind::CumulativeCount => Reducer::CumulativeCount,
            ReducerKind::CumulativeSum => Reducer::CumulativeSum { field: require_field()? },
        };

        let mut fields = axis.into_iter();
        let axis = match (fields.next(), fields.next(), fields.next()) {
            (Some(x), Some(y), Some(color)) => Axis::Scatter { x, y, color },
            (Some(single), None, None) => Axis::Single(single),
            _ => unreachable!("arity checked above"),
        };

        Ok(Self { kind, axis, reducer, size })
    }

    /// Short label used in logs and error messages
    pub fn describe(&self) -> String {
        format!("{}({})", self.kind.name(), self.axis.fields().join(", "))
    }

    /// Every dataset field the generated fragment reads
    pub fn referenced_fields(&self) -> Vec<&str> {
        let mut fields = self.axis.fields();
        if let Some(f) = self.reducer.field() {
            fields.push(f);
        }
        fields
    }
}
