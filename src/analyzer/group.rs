use std::collections::BTreeMap;

use crate::analyzer::key::{dimension_key, Key};
use crate::compiler::{Grouping, KeyAccessor};
use crate::model::Dataset;

/// Incremental {count, sums, averages} state of a mean bucket
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeanState {
    pub count: i64,
    pub sums: f64,
    pub averages: f64,
}

impl MeanState {
    pub fn add(&mut self, value: f64) {
        self.count += 1;
        self.sums += value;
        self.recompute();
    }

    pub fn remove(&mut self, value: f64) {
        self.count -= 1;
        self.sums -= value;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.averages = if self.count == 0 { 0.0 } else { self.sums / self.count as f64 };
    }
}

/// Aggregate state of one bucket
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BucketState {
    Count(i64),
    Sum(f64),
    Mean(MeanState),
}

impl BucketState {
    fn empty(grouping: &Grouping) -> Self {
        match grouping {
            Grouping::Keys | Grouping::Count => BucketState::Count(0),
            Grouping::Sum { .. } => BucketState::Sum(0.0),
            Grouping::Mean { .. } => BucketState::Mean(MeanState::default()),
            Grouping::Cumulative(inner) => BucketState::empty(inner),
        }
    }

    /// `value` is the record's reduced field, ignored by counts
    pub fn add(&mut self, value: f64) {
        match self {
            BucketState::Count(n) => *n += 1,
            BucketState::Sum(s) => *s += value,
            BucketState::Mean(m) => m.add(value),
        }
    }

    /// Value the widget renders for the bucket
    pub fn rendered(&self) -> f64 {
        match self {
            BucketState::Count(n) => *n as f64,
            BucketState::Sum(s) => *s,
            BucketState::Mean(m) => m.averages,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub key: Key,
    pub value: f64,
}

fn reduced_field(grouping: &Grouping) -> Option<&str> {
    match grouping {
        Grouping::Sum { field } | Grouping::Mean { field } => Some(field),
        Grouping::Cumulative(inner) => reduced_field(inner),
        Grouping::Keys | Grouping::Count => None,
    }
}

/// Buckets of the whole dataset in ascending key order
pub fn evaluate_groups(accessor: &KeyAccessor, grouping: &Grouping, dataset: &Dataset) -> Vec<Bucket> {
    let field = reduced_field(grouping);
    let mut states: BTreeMap<Key, BucketState> = BTreeMap::new();

    for row in 0..dataset.row_count() {
        let value = field.map(|f| dataset.value(row, f).to_number()).unwrap_or(0.0);
        states
            .entry(dimension_key(accessor, dataset, row))
            .or_insert_with(|| BucketState::empty(grouping))
            .add(value);
    }

    let buckets = states
        .into_iter()
        .map(|(key, state)| Bucket { key, value: state.rendered() })
        .collect();

    match grouping {
        Grouping::Cumulative(_) => cumulate(buckets),
        _ => buckets,
    }
}

/// Replace each bucket value with the running total up to its key
pub fn cumulate(buckets: Vec<Bucket>) -> Vec<Bucket> {
    let mut total = 0.0;
    buckets
        .into_iter()
        .map(|b| {
            total += b.value;
            Bucket { key: b.key, value: total }
        })
        .collect()
}
