//! Column predicates and their rendering into a `WHERE` clause.
//!
//! A [`PredicateSet`] is an ordered conjunction: every predicate must hold. Values are always
//! bound as parameters, never interpolated.

use std::fmt;

use cesaa_core::{SceneType, SessionLevel, SupportScope};
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite};

/// A table-qualified column, rendered as `table.name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Column {
    table: &'static str,
    name: &'static str,
}

impl Column {
    pub const fn new(table: &'static str, name: &'static str) -> Self {
        Self { table, name }
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.name)
    }
}

/// A bindable value. Text columns hold ids and tags; integer columns hold scene types and levels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Text(String),
    Int(i64),
    Time(DateTime<Utc>),
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Time(value)
    }
}

impl From<SupportScope> for Value {
    fn from(scope: SupportScope) -> Self {
        Value::Text(scope.as_str().to_string())
    }
}

impl From<SceneType> for Value {
    fn from(scene_type: SceneType) -> Self {
        Value::Int(scene_type.value())
    }
}

impl From<SessionLevel> for Value {
    fn from(level: SessionLevel) -> Self {
        Value::Int(level.value())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Condition {
    Eq(Value),
    In(Vec<Value>),
    NotIn(Vec<Value>),
    /// Inclusive lower bound.
    AtLeast(Value),
    /// Inclusive upper bound.
    AtMost(Value),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Predicate {
    pub column: Column,
    pub condition: Condition,
}

impl Predicate {
    pub fn eq(column: Column, value: impl Into<Value>) -> Self {
        Self {
            column,
            condition: Condition::Eq(value.into()),
        }
    }

    pub fn is_in<V: Into<Value>>(column: Column, values: impl IntoIterator<Item = V>) -> Self {
        Self {
            column,
            condition: Condition::In(values.into_iter().map(Into::into).collect()),
        }
    }

    pub fn not_in<V: Into<Value>>(column: Column, values: impl IntoIterator<Item = V>) -> Self {
        Self {
            column,
            condition: Condition::NotIn(values.into_iter().map(Into::into).collect()),
        }
    }

    pub fn at_least(column: Column, value: impl Into<Value>) -> Self {
        Self {
            column,
            condition: Condition::AtLeast(value.into()),
        }
    }

    pub fn at_most(column: Column, value: impl Into<Value>) -> Self {
        Self {
            column,
            condition: Condition::AtMost(value.into()),
        }
    }

    fn push_sql(&self, query: &mut QueryBuilder<'_, Sqlite>) {
        match &self.condition {
            Condition::Eq(value) => {
                query.push(self.column).push(" = ");
                push_value(query, value);
            }
            // An empty inclusion list matches nothing; an empty exclusion list excludes nothing.
            Condition::In(values) if values.is_empty() => {
                query.push("1 = 0");
            }
            Condition::NotIn(values) if values.is_empty() => {
                query.push("1 = 1");
            }
            Condition::In(values) => {
                query.push(self.column).push(" IN (");
                push_list(query, values);
                query.push(")");
            }
            Condition::NotIn(values) => {
                query.push(self.column).push(" NOT IN (");
                push_list(query, values);
                query.push(")");
            }
            Condition::AtLeast(value) => {
                query.push(self.column).push(" >= ");
                push_value(query, value);
            }
            Condition::AtMost(value) => {
                query.push(self.column).push(" <= ");
                push_value(query, value);
            }
        }
    }
}

fn push_value(query: &mut QueryBuilder<'_, Sqlite>, value: &Value) {
    match value {
        Value::Text(text) => query.push_bind(text.clone()),
        Value::Int(int) => query.push_bind(*int),
        Value::Time(time) => query.push_bind(*time),
    };
}

fn push_list(query: &mut QueryBuilder<'_, Sqlite>, values: &[Value]) {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            query.push(", ");
        }
        push_value(query, value);
    }
}

/// Ordered conjunction of predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PredicateSet(Vec<Predicate>);

impl PredicateSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, predicate: Predicate) {
        self.0.push(predicate);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Predicate> {
        self.0.iter()
    }

    /// Adds `column IN (values)` unless `values` is `None` or empty.
    pub fn include<V>(&mut self, column: Column, values: Option<&[V]>)
    where
        V: Clone + Into<Value>,
    {
        if let Some(values) = values.filter(|v| !v.is_empty()) {
            self.push(Predicate::is_in(column, values.iter().cloned()));
        }
    }

    /// Adds `column NOT IN (values)` unless `values` is `None` or empty.
    pub fn exclude<V>(&mut self, column: Column, values: Option<&[V]>)
    where
        V: Clone + Into<Value>,
    {
        if let Some(values) = values.filter(|v| !v.is_empty()) {
            self.push(Predicate::not_in(column, values.iter().cloned()));
        }
    }

    /// Appends ` WHERE p1 AND p2 ...`; appends nothing for an empty set.
    pub fn push_where(&self, query: &mut QueryBuilder<'_, Sqlite>) {
        for (i, predicate) in self.0.iter().enumerate() {
            query.push(if i == 0 { " WHERE " } else { " AND " });
            predicate.push_sql(query);
        }
    }
}

impl Extend<Predicate> for PredicateSet {
    fn extend<T: IntoIterator<Item = Predicate>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl FromIterator<Predicate> for PredicateSet {
    fn from_iter<T: IntoIterator<Item = Predicate>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for PredicateSet {
    type Item = Predicate;
    type IntoIter = std::vec::IntoIter<Predicate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PredicateSet {
    type Item = &'a Predicate;
    type IntoIter = std::slice::Iter<'a, Predicate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
