use crate::analyzer::key::dimension_key;
use crate::compiler::KeyAccessor;
use crate::model::{Dataset, Value};

/// Values the generated `min`/`max` probes evaluate to
#[derive(Debug, Clone, PartialEq)]
pub struct DomainProbe {
    /// Probe field of the record with the smallest key
    pub min: Value,
    /// Probe field of the record with the largest key, plus one
    pub max: Value,
}

/// `None` for an empty dataset, where the browser-side probe throws.
pub fn probe_domain(accessor: &KeyAccessor, probe_field: &str, dataset: &Dataset) -> Option<DomainProbe> {
    let keyed: Vec<_> = (0..dataset.row_count())
        .map(|row| (dimension_key(accessor, dataset, row), row))
        .collect();

    let (_, bottom) = keyed.iter().min_by(|a, b| a.0.cmp(&b.0))?;
    let (_, top) = keyed.iter().max_by(|a, b| a.0.cmp(&b.0))?;

    Some(DomainProbe {
        min: dataset.value(*bottom, probe_field).clone(),
        max: dataset.value(*top, probe_field).plus_one(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Column, ColumnKind};

    fn ints(values: &[i64]) -> Dataset {
        Dataset::new(
            vec![Column { name: "a".into(), kind: ColumnKind::Integer }],
            values.iter().map(|v| vec![Value::Integer(*v)]).collect(),
        )
    }

    #[test]
    fn test_probe_is_min_and_max_plus_one() {
        let probe = probe_domain(&KeyAccessor::Numeric("a".into()), "a", &ints(&[2, 3, 1])).unwrap();
        assert_eq!(probe, DomainProbe { min: Value::Integer(1), max: Value::Integer(4) });
    }

    #[test]
    fn test_empty_dataset_has_no_probe() {
        assert_eq!(probe_domain(&KeyAccessor::Numeric("a".into()), "a", &ints(&[])), None);
    }

    #[test]
    fn test_text_max_concatenates() {
        let ds = Dataset::new(
            vec![Column { name: "g".into(), kind: ColumnKind::Text }],
            vec![vec![Value::Text("b".into())], vec![Value::Text("a".into())]],
        );
        let probe = probe_domain(&KeyAccessor::Raw("g".into()), "g", &ds).unwrap();
        assert_eq!(probe.min, Value::Text("a".into()));
        assert_eq!(probe.max, Value::Text("b1".into()));
    }
}
