//! Aggregation pipelines
//!
//! A [`Pipeline`] is an ordered list of [`Stage`]s evaluated over the documents
//! of one collection:
//!
//! - `Match`: keep documents satisfying a [`Filter`]
//! - `Group`: bucket documents by a key and fold each bucket with accumulators
//! - `Sort`: stable multi-key sort
//! - `Project`: apply a [`Projection`]
//!
//! ## Grouping semantics
//!
//! - Groups are emitted in the order their key was first seen.
//! - A missing key field groups under `null`.
//! - Grouping an empty input emits no rows at all, including for a constant key.
//! - `Avg` ignores missing and non-numeric values and yields `null` when nothing
//!   contributed; `Push` and `AddToSet` skip missing values.

use crate::compare::{compare_values, group_key, values_equal};
use crate::filter::Filter;
use crate::projection::Projection;
use nutriflow_core::{Document, Error, FieldPath, Result, ID_FIELD};
use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Value fed into an accumulator
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Value of a field (missing fields are skipped)
    Field(FieldPath),
    /// The same value for every document
    Constant(Value),
}

/// Group accumulator
#[derive(Debug, Clone, PartialEq)]
pub enum Accumulator {
    /// Sum of numeric operands; integer unless a float contributed
    Sum(Operand),
    /// Arithmetic mean of numeric values, `null` when none
    Avg(FieldPath),
    /// Every value in encounter order, duplicates kept
    Push(FieldPath),
    /// Distinct values in first-seen order
    AddToSet(FieldPath),
}

/// Grouping key
#[derive(Debug, Clone, PartialEq)]
pub enum GroupKey {
    /// Group by the value of a field
    Field(FieldPath),
    /// A single group for the whole input
    Constant(Value),
}

/// `Group` stage definition
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    key: GroupKey,
    fields: Vec<(String, Accumulator)>,
}

impl Group {
    /// Group by a field path
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if `path` does not parse.
    pub fn by(path: &str) -> Result<Self> {
        Ok(Group {
            key: GroupKey::Field(FieldPath::parse(path)?),
            fields: Vec::new(),
        })
    }

    /// One group with `_id: null` covering the whole input
    pub fn whole() -> Self {
        Group {
            key: GroupKey::Constant(Value::Null),
            fields: Vec::new(),
        }
    }

    /// Add an output field (builder pattern)
    pub fn field(mut self, name: impl Into<String>, accumulator: Accumulator) -> Self {
        self.fields.push((name.into(), accumulator));
        self
    }

    /// Grouping key
    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    /// Output fields in declaration order
    pub fn fields(&self) -> &[(String, Accumulator)] {
        &self.fields
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    #[allow(missing_docs)]
    Ascending,
    #[allow(missing_docs)]
    Descending,
}

/// One sort key
#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    /// Field to sort by (missing sorts as null)
    pub field: FieldPath,
    /// Direction
    pub order: SortOrder,
}

impl SortKey {
    /// Descending on `path`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if `path` does not parse.
    pub fn descending(path: &str) -> Result<Self> {
        Ok(SortKey {
            field: FieldPath::parse(path)?,
            order: SortOrder::Descending,
        })
    }

    /// Ascending on `path`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if `path` does not parse.
    pub fn ascending(path: &str) -> Result<Self> {
        Ok(SortKey {
            field: FieldPath::parse(path)?,
            order: SortOrder::Ascending,
        })
    }
}

/// A pipeline stage
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    #[allow(missing_docs)]
    Match(Filter),
    #[allow(missing_docs)]
    Group(Group),
    #[allow(missing_docs)]
    Sort(Vec<SortKey>),
    #[allow(missing_docs)]
    Project(Projection),
}

/// Ordered list of stages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Empty pipeline (returns its input unchanged)
    pub fn new() -> Self {
        Pipeline { stages: Vec::new() }
    }

    /// Append a `Match` stage
    pub fn matching(mut self, filter: Filter) -> Self {
        self.stages.push(Stage::Match(filter));
        self
    }

    /// Append a `Group` stage
    pub fn group(mut self, group: Group) -> Self {
        self.stages.push(Stage::Group(group));
        self
    }

    /// Append a `Sort` stage
    pub fn sort(mut self, keys: Vec<SortKey>) -> Self {
        self.stages.push(Stage::Sort(keys));
        self
    }

    /// Append a `Project` stage
    pub fn project(mut self, projection: Projection) -> Self {
        self.stages.push(Stage::Project(projection));
        self
    }

    /// Stages in evaluation order
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Reject malformed stages before any data is touched
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPipeline`] for an empty sort, or a group output
    /// field that is empty, dotted, `_id`, or declared twice.
    pub fn validate(&self) -> Result<()> {
        for (idx, stage) in self.stages.iter().enumerate() {
            match stage {
                Stage::Group(group) => {
                    let mut seen = HashSet::new();
                    for (name, _) in &group.fields {
                        if name.is_empty() || name.contains('.') || name.starts_with('$') {
                            return Err(Error::invalid_pipeline(format!(
                                "stage {idx}: invalid group output field '{name}'"
                            )));
                        }
                        if name == ID_FIELD {
                            return Err(Error::invalid_pipeline(format!(
                                "stage {idx}: '_id' is reserved for the group key"
                            )));
                        }
                        if !seen.insert(name.as_str()) {
                            return Err(Error::invalid_pipeline(format!(
                                "stage {idx}: duplicate group output field '{name}'"
                            )));
                        }
                    }
                }
                Stage::Sort(keys) if keys.is_empty() => {
                    return Err(Error::invalid_pipeline(format!(
                        "stage {idx}: sort needs at least one key"
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Evaluate over a collection's documents
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPipeline`] if [`Pipeline::validate`] fails.
    pub fn execute(&self, input: &[Document]) -> Result<Vec<Document>> {
        self.validate()?;

        let mut docs: Vec<Document> = input.to_vec();
        for stage in &self.stages {
            docs = match stage {
                Stage::Match(filter) => docs.into_iter().filter(|d| filter.matches(d)).collect(),
                Stage::Group(group) => run_group(group, &docs),
                Stage::Sort(keys) => {
                    docs.sort_by(|a, b| compare_by_keys(keys, a, b));
                    docs
                }
                Stage::Project(projection) => docs.iter().map(|d| projection.apply(d)).collect(),
            };
        }
        Ok(docs)
    }
}

fn compare_by_keys(keys: &[SortKey], a: &Document, b: &Document) -> Ordering {
    for key in keys {
        let left = a.get_path(&key.field).unwrap_or(&Value::Null);
        let right = b.get_path(&key.field).unwrap_or(&Value::Null);
        let ord = match key.order {
            SortOrder::Ascending => compare_values(left, right),
            SortOrder::Descending => compare_values(right, left),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

enum State {
    Sum { int: i64, float: f64, is_float: bool },
    Avg { total: f64, n: u64 },
    Push(Vec<Value>),
    AddToSet(Vec<Value>),
}

impl State {
    fn new(acc: &Accumulator) -> Self {
        match acc {
            Accumulator::Sum(_) => State::Sum {
                int: 0,
                float: 0.0,
                is_float: false,
            },
            Accumulator::Avg(_) => State::Avg { total: 0.0, n: 0 },
            Accumulator::Push(_) => State::Push(Vec::new()),
            Accumulator::AddToSet(_) => State::AddToSet(Vec::new()),
        }
    }

    fn fold(&mut self, acc: &Accumulator, doc: &Document) {
        match (self, acc) {
            (State::Sum { int, float, is_float }, Accumulator::Sum(operand)) => {
                let value = match operand {
                    Operand::Field(path) => doc.get_path(path),
                    Operand::Constant(value) => Some(value),
                };
                if let Some(Value::Number(n)) = value {
                    match (n.as_i64(), *is_float) {
                        (Some(i), false) => match int.checked_add(i) {
                            Some(sum) => *int = sum,
                            None => {
                                *is_float = true;
                                *float = *int as f64 + i as f64;
                            }
                        },
                        _ => {
                            if !*is_float {
                                *is_float = true;
                                *float = *int as f64;
                            }
                            *float += n.as_f64().unwrap_or(0.0);
                        }
                    }
                }
            }
            (State::Avg { total, n }, Accumulator::Avg(path)) => {
                if let Some(x) = doc.get_path(path).and_then(Value::as_f64) {
                    *total += x;
                    *n += 1;
                }
            }
            (State::Push(values), Accumulator::Push(path)) => {
                if let Some(v) = doc.get_path(path) {
                    values.push(v.clone());
                }
            }
            (State::AddToSet(values), Accumulator::AddToSet(path)) => {
                if let Some(v) = doc.get_path(path) {
                    if !values.iter().any(|seen| values_equal(seen, v)) {
                        values.push(v.clone());
                    }
                }
            }
            _ => {}
        }
    }

    fn finish(self) -> Value {
        match self {
            State::Sum { int, is_float: false, .. } => Value::from(int),
            State::Sum { float, .. } => number_or_null(float),
            State::Avg { n: 0, .. } => Value::Null,
            State::Avg { total, n } => number_or_null(total / n as f64),
            State::Push(values) | State::AddToSet(values) => Value::Array(values),
        }
    }
}

fn number_or_null(x: f64) -> Value {
    Number::from_f64(x).map_or(Value::Null, Value::Number)
}

fn run_group(group: &Group, docs: &[Document]) -> Vec<Document> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<(Value, Vec<State>)> = Vec::new();

    for doc in docs {
        let key = match &group.key {
            GroupKey::Field(path) => doc.get_path(path).cloned().unwrap_or(Value::Null),
            GroupKey::Constant(value) => value.clone(),
        };
        let slot = *index.entry(group_key(&key)).or_insert_with(|| {
            let states = group.fields.iter().map(|(_, acc)| State::new(acc)).collect();
            buckets.push((key, states));
            buckets.len() - 1
        });

        let states = &mut buckets[slot].1;
        for (state, (_, acc)) in states.iter_mut().zip(&group.fields) {
            state.fold(acc, doc);
        }
    }

    buckets
        .into_iter()
        .map(|(key, states)| {
            let mut out = Document::new().with(ID_FIELD, key);
            for ((name, _), state) in group.fields.iter().zip(states) {
                out.insert(name.clone(), state.finish());
            }
            out
        })
        .collect()
}
