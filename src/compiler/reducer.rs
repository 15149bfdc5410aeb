use std::fmt;

use crate::compiler::script::field_access;
use crate::model::Reducer;

/// How group buckets are built over `dim`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grouping {
    /// Plain group-by-key
    Keys,
    Count,
    Sum { field: String },
    /// Incremental {count, sums, averages} state
    Mean { field: String },
    /// Running total over an inner count or sum grouping
    Cumulative(Box<Grouping>),
}

/// How a rendered value is read back from a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueAccessor {
    /// Keep the widget's own extraction
    Default,
    /// `p.value`
    Value,
    /// `p.value.averages`
    Average,
}

/// Grouping and value accessor that belong together for one reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducerDescriptor {
    pub grouping: Grouping,
    pub accessor: ValueAccessor,
}

impl ReducerDescriptor {
    pub fn new(reducer: &Reducer) -> Self {
        let (grouping, accessor) = match reducer {
            Reducer::None => (Grouping::Keys, ValueAccessor::Default),
            Reducer::Count => (Grouping::Count, ValueAccessor::Default),
            Reducer::Sum { field } => (Grouping::Sum { field: field.clone() }, ValueAccessor::Default),
            Reducer::Mean { field } => (Grouping::Mean { field: field.clone() }, ValueAccessor::Average),
            Reducer::CumulativeCount => (Grouping::Cumulative(Box::new(Grouping::Count)), ValueAccessor::Value),
            Reducer::CumulativeSum { field } => (
                Grouping::Cumulative(Box::new(Grouping::Sum { field: field.clone() })),
                ValueAccessor::Value,
            ),
        };
        Self { grouping, accessor }
    }
}

impl Grouping {
    /// Expression producing the group object, without the `var` binding
    fn write_expr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grouping::Keys => write!(f, "dim.group()"),
            Grouping::Count => write!(f, "dim.group().reduceCount()"),
            Grouping::Sum { field } => write!(
                f,
                "dim.group().reduceSum(function(d) {{ return +{}; }})",
                field_access("d", field)?
            ),
            Grouping::Mean { field } => {
                let value = field_access("v", field)?;
                writeln!(f, "dim.group().reduce(")?;
                writeln!(f, "    function(p, v) {{")?;
                writeln!(f, "        ++p.count;")?;
                writeln!(f, "        p.sums += +{};", value)?;
                writeln!(f, "        p.averages = (p.count === 0) ? 0 : p.sums / p.count;")?;
                writeln!(f, "        return p;")?;
                writeln!(f, "    }},")?;
                writeln!(f, "    function(p, v) {{")?;
                writeln!(f, "        --p.count;")?;
                writeln!(f, "        p.sums -= +{};", value)?;
                writeln!(f, "        p.averages = (p.count === 0) ? 0 : p.sums / p.count;")?;
                writeln!(f, "        return p;")?;
                writeln!(f, "    }},")?;
                writeln!(f, "    function() {{")?;
                writeln!(f, "        return {{count: 0, sums: 0, averages: 0}};")?;
                writeln!(f, "    }}")?;
                write!(f, ")")
            }
            Grouping::Cumulative(inner) => inner.write_expr(f),
        }
    }
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grouping::Cumulative(inner) => {
                write!(f, "var _group = ")?;
                inner.write_expr(f)?;
                writeln!(f, ";")?;
                writeln!(f, "var group = {{")?;
                writeln!(f, "    all: function() {{")?;
                writeln!(f, "        var cumulate = 0;")?;
                writeln!(f, "        var g = [];")?;
                writeln!(f, "        _group.all().forEach(function(d) {{")?;
                writeln!(f, "            cumulate += d.value;")?;
                writeln!(f, "            g.push({{key: d.key, value: cumulate}});")?;
                writeln!(f, "        }});")?;
                writeln!(f, "        return g;")?;
                writeln!(f, "    }}")?;
                write!(f, "}};")
            }
            _ => {
                write!(f, "var group = ")?;
                self.write_expr(f)?;
                write!(f, ";")
            }
        }
    }
}

impl fmt::Display for ValueAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueAccessor::Default => Ok(()),
            ValueAccessor::Value => write!(f, ".valueAccessor(function(p) {{ return p.value; }})"),
            ValueAccessor::Average => write!(f, ".valueAccessor(function(p) {{ return p.value.averages; }})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_accessor_for_plain_reducers() {
        for reducer in [Reducer::None, Reducer::Count, Reducer::Sum { field: "x".into() }] {
            let desc = ReducerDescriptor::new(&reducer);
            assert_eq!(desc.accessor, ValueAccessor::Default);
            assert_eq!(desc.accessor.to_string(), "");
        }
    }

    #[test]
    fn test_mean_pairs_with_average_accessor() {
        let desc = ReducerDescriptor::new(&Reducer::Mean { field: "x".into() });
        let group = desc.grouping.to_string();
        assert!(group.contains(r#"p.sums += +v["x"];"#));
        assert!(group.contains("(p.count === 0) ? 0 : p.sums / p.count"));
        assert!(group.contains("return {count: 0, sums: 0, averages: 0};"));
        assert!(desc.accessor.to_string().contains("p.value.averages"));
    }

    #[test]
    fn test_cumulative_sum_wraps_sum() {
        let desc = ReducerDescriptor::new(&Reducer::CumulativeSum { field: "amount".into() });
        let group = desc.grouping.to_string();
        assert!(group.starts_with(r#"var _group = dim.group().reduceSum(function(d) { return +d["amount"]; });"#));
        assert!(group.contains("cumulate += d.value;"));
        assert!(desc.accessor.to_string().contains("return p.value;"));
    }

    #[test]
    fn test_count_grouping() {
        let desc = ReducerDescriptor::new(&Reducer::Count);
        assert_eq!(desc.grouping.to_string(), "var group = dim.group().reduceCount();");
        assert_eq!(ReducerDescriptor::new(&Reducer::None).grouping.to_string(), "var group = dim.group();");
    }
}
