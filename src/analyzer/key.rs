use std::cmp::Ordering;
use std::fmt;

use crate::compiler::KeyAccessor;
use crate::model::{Dataset, Value};

/// A dimension key as the browser index would compute and order it
#[derive(Debug, Clone)]
pub enum Key {
    Boolean(bool),
    Number(f64),
    Text(String),
    Tuple(Vec<Key>),
}

impl Key {
    fn raw(value: &Value) -> Key {
        match value {
            // Relational comparison coerces null to 0
            Value::Null => Key::Number(0.0),
            Value::Boolean(b) => Key::Boolean(*b),
            Value::Text(s) => Key::Text(s.clone()),
            other => Key::Number(other.to_number()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Key::Boolean(_) => 0,
            Key::Number(_) => 1,
            Key::Text(_) => 2,
            Key::Tuple(_) => 3,
        }
    }
}

/// Key of `row` under `accessor`; `dataset` must already be normalized
pub fn dimension_key(accessor: &KeyAccessor, dataset: &Dataset, row: usize) -> Key {
    match accessor {
        KeyAccessor::Raw(field) => Key::raw(dataset.value(row, field)),
        KeyAccessor::Numeric(field) => Key::Number(dataset.value(row, field).to_number()),
        KeyAccessor::Tuple { x, y, color } => Key::Tuple(vec![
            Key::Number(dataset.value(row, x).to_number()),
            Key::Number(dataset.value(row, y).to_number()),
            Key::raw(dataset.value(row, color)),
        ]),
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Key::Boolean(a), Key::Boolean(b)) => a.cmp(b),
            (Key::Number(a), Key::Number(b)) => a.total_cmp(b),
            (Key::Text(a), Key::Text(b)) => a.cmp(b),
            (Key::Tuple(a), Key::Tuple(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Key {}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Boolean(b) => write!(f, "{}", b),
            Key::Number(n) => write!(f, "{}", n),
            Key::Text(s) => write!(f, "{:?}", s),
            Key::Tuple(keys) => {
                let parts: Vec<String> = keys.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}
