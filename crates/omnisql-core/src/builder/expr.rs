//! Predicate trees.
//!
//! Predicates are kept as a tree until render time so that placeholders can
//! be allocated in the dialect's style and in textual order.

use super::SqlWriter;
use crate::value::{SqlValue, ToSqlValue};

/// Creates a column reference.
#[must_use]
pub fn col(name: &str) -> Column {
    Column {
        table: None,
        name: String::from(name),
    }
}

/// A column reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Optional table qualifier.
    pub table: Option<String>,
    /// Column name.
    pub name: String,
}

/// Binary comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `LIKE`
    Like,
    /// `NOT LIKE`
    NotLike,
}

impl CompareOp {
    /// Returns the SQL operator.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
        }
    }
}

impl Column {
    /// Creates a qualified column reference.
    #[must_use]
    pub fn qualified(table: &str, name: &str) -> Self {
        Self {
            table: Some(String::from(table)),
            name: String::from(name),
        }
    }

    /// Returns the SQL representation.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match &self.table {
            Some(t) => format!("{t}.{}", self.name),
            None => self.name.clone(),
        }
    }

    fn compare<T: ToSqlValue>(self, op: CompareOp, value: T) -> Predicate {
        Predicate::Compare {
            column: self,
            op,
            value: value.to_sql_value(),
        }
    }

    /// Creates an equality predicate.
    #[must_use]
    pub fn eq<T: ToSqlValue>(self, value: T) -> Predicate {
        self.compare(CompareOp::Eq, value)
    }

    /// Creates an inequality predicate.
    #[must_use]
    pub fn not_eq<T: ToSqlValue>(self, value: T) -> Predicate {
        self.compare(CompareOp::NotEq, value)
    }

    /// Creates a less-than predicate.
    #[must_use]
    pub fn lt<T: ToSqlValue>(self, value: T) -> Predicate {
        self.compare(CompareOp::Lt, value)
    }

    /// Creates a less-than-or-equal predicate.
    #[must_use]
    pub fn lt_eq<T: ToSqlValue>(self, value: T) -> Predicate {
        self.compare(CompareOp::LtEq, value)
    }

    /// Creates a greater-than predicate.
    #[must_use]
    pub fn gt<T: ToSqlValue>(self, value: T) -> Predicate {
        self.compare(CompareOp::Gt, value)
    }

    /// Creates a greater-than-or-equal predicate.
    #[must_use]
    pub fn gt_eq<T: ToSqlValue>(self, value: T) -> Predicate {
        self.compare(CompareOp::GtEq, value)
    }

    /// Creates a LIKE predicate.
    #[must_use]
    pub fn like<T: ToSqlValue>(self, pattern: T) -> Predicate {
        self.compare(CompareOp::Like, pattern)
    }

    /// Creates a NOT LIKE predicate.
    #[must_use]
    pub fn not_like<T: ToSqlValue>(self, pattern: T) -> Predicate {
        self.compare(CompareOp::NotLike, pattern)
    }

    /// Creates an IS NULL predicate.
    #[must_use]
    pub const fn is_null(self) -> Predicate {
        Predicate::IsNull {
            column: self,
            negated: false,
        }
    }

    /// Creates an IS NOT NULL predicate.
    #[must_use]
    pub const fn is_not_null(self) -> Predicate {
        Predicate::IsNull {
            column: self,
            negated: true,
        }
    }

    /// Creates a BETWEEN predicate.
    #[must_use]
    pub fn between<T: ToSqlValue, U: ToSqlValue>(self, low: T, high: U) -> Predicate {
        Predicate::Between {
            column: self,
            low: low.to_sql_value(),
            high: high.to_sql_value(),
            negated: false,
        }
    }

    /// Creates a NOT BETWEEN predicate.
    #[must_use]
    pub fn not_between<T: ToSqlValue, U: ToSqlValue>(self, low: T, high: U) -> Predicate {
        Predicate::Between {
            column: self,
            low: low.to_sql_value(),
            high: high.to_sql_value(),
            negated: true,
        }
    }

    /// Creates an IN predicate.
    #[must_use]
    pub fn in_list<T: ToSqlValue>(self, values: Vec<T>) -> Predicate {
        Predicate::InList {
            column: self,
            values: values.into_iter().map(ToSqlValue::to_sql_value).collect(),
            negated: false,
        }
    }

    /// Creates a NOT IN predicate.
    #[must_use]
    pub fn not_in_list<T: ToSqlValue>(self, values: Vec<T>) -> Predicate {
        Predicate::InList {
            column: self,
            values: values.into_iter().map(ToSqlValue::to_sql_value).collect(),
            negated: true,
        }
    }
}

/// A WHERE / HAVING predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column op ?`
    Compare {
        /// Left-hand column.
        column: Column,
        /// Operator.
        op: CompareOp,
        /// Bound right-hand value.
        value: SqlValue,
    },
    /// `column [NOT] BETWEEN ? AND ?`
    Between {
        /// Tested column.
        column: Column,
        /// Lower bound.
        low: SqlValue,
        /// Upper bound.
        high: SqlValue,
        /// NOT BETWEEN.
        negated: bool,
    },
    /// `column [NOT] IN (?, ...)`
    InList {
        /// Tested column.
        column: Column,
        /// Candidate values.
        values: Vec<SqlValue>,
        /// NOT IN.
        negated: bool,
    },
    /// `column IS [NOT] NULL`
    IsNull {
        /// Tested column.
        column: Column,
        /// IS NOT NULL.
        negated: bool,
    },
    /// `a AND b`
    And(Box<Predicate>, Box<Predicate>),
    /// `a OR b`
    Or(Box<Predicate>, Box<Predicate>),
    /// `NOT a`
    Not(Box<Predicate>),
    /// `(a)`
    Group(Box<Predicate>),
    /// Raw SQL fragment.
    ///
    /// **Warning**: Only use this for SQL fragments that don't contain user input.
    Raw(String),
}

impl Predicate {
    /// Creates a raw predicate.
    #[must_use]
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::Raw(sql.into())
    }

    /// Creates an AND predicate.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    /// Creates an OR predicate.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    /// Wraps the predicate in parentheses.
    #[must_use]
    pub fn paren(self) -> Self {
        Self::Group(Box::new(self))
    }

    /// Negates the predicate with NOT.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::Not(Box::new(self))
    }

    pub(crate) const fn is_disjunction(&self) -> bool {
        matches!(self, Self::Or(..))
    }

    pub(crate) fn write(&self, w: &mut SqlWriter) {
        match self {
            Self::Compare { column, op, value } => {
                w.push_str(&column.to_sql());
                w.push_str(" ");
                w.push_str(op.as_sql());
                w.push_str(" ");
                w.bind(value.clone());
            }
            Self::Between {
                column,
                low,
                high,
                negated,
            } => {
                w.push_str(&column.to_sql());
                w.push_str(if *negated { " NOT BETWEEN " } else { " BETWEEN " });
                w.bind(low.clone());
                w.push_str(" AND ");
                w.bind(high.clone());
            }
            Self::InList {
                column,
                values,
                negated,
            } => {
                w.push_str(&column.to_sql());
                w.push_str(if *negated { " NOT IN (" } else { " IN (" });
                w.bind_list(values);
                w.push_str(")");
            }
            Self::IsNull { column, negated } => {
                w.push_str(&column.to_sql());
                w.push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Self::And(left, right) => {
                left.write(w);
                w.push_str(" AND ");
                right.write(w);
            }
            Self::Or(left, right) => {
                left.write(w);
                w.push_str(" OR ");
                right.write(w);
            }
            Self::Not(inner) => {
                w.push_str("NOT ");
                inner.write(w);
            }
            Self::Group(inner) => {
                w.push_str("(");
                inner.write(w);
                w.push_str(")");
            }
            Self::Raw(sql) => w.push_str(sql),
        }
    }
}
