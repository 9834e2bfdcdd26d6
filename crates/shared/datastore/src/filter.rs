//! Row filters for `select`, rendered as PostgREST query parameters.

use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    ILike,
    Is,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Like => "like",
            Operator::ILike => "ilike",
            Operator::Is => "is",
        }
    }
}

impl FromStr for Operator {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "eq" => Ok(Operator::Eq),
            "neq" => Ok(Operator::Neq),
            "gt" => Ok(Operator::Gt),
            "gte" => Ok(Operator::Gte),
            "lt" => Ok(Operator::Lt),
            "lte" => Ok(Operator::Lte),
            "like" => Ok(Operator::Like),
            "ilike" => Ok(Operator::ILike),
            "is" => Ok(Operator::Is),
            other => Err(DataError::InvalidFilter(format!(
                "unknown filter operator '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `column op value` test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub column: String,
    pub op: Operator,
    pub value: String,
}

impl Condition {
    pub fn new(column: impl Into<String>, op: Operator, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            op,
            value: value.into(),
        }
    }
}

/// Parses `column=value` (equality) or `column:op=value`.
impl FromStr for Condition {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lhs, value) = s
            .split_once('=')
            .ok_or_else(|| {
                DataError::InvalidFilter(format!("expected column=value, got '{}'", s))
            })?;

        let (column, op) = match lhs.split_once(':') {
            Some((column, op)) => (column, op.parse::<Operator>()?),
            None => (lhs, Operator::Eq),
        };

        let column = column.trim();
        if column.is_empty() {
            return Err(DataError::InvalidFilter(format!("missing column in '{}'", s)));
        }

        Ok(Condition::new(column, op, value))
    }
}

/// Sort direction for [`Filter::order_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Conjunction of conditions plus optional ordering.
///
/// Column names are passed through as given; nothing checks them against
/// a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    conditions: Vec<Condition>,
    order: Option<(String, Direction)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, op: Operator, value: impl Into<String>) -> Self {
        self.conditions.push(Condition::new(column, op, value));
        self
    }

    pub fn eq(self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(column, Operator::Eq, value)
    }

    pub fn neq(self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(column, Operator::Neq, value)
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order = Some((column.into(), direction));
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.order.is_none()
    }

    /// Query parameters in PostgREST form (`column=op.value`, `order=col.desc`).
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .conditions
            .iter()
            .map(|c| (c.column.clone(), format!("{}.{}", c.op, c.value)))
            .collect();

        if let Some((column, direction)) = &self.order {
            let dir = match direction {
                Direction::Ascending => "asc",
                Direction::Descending => "desc",
            };
            pairs.push(("order".to_string(), format!("{}.{}", column, dir)));
        }

        pairs
    }
}
