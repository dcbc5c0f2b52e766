//! Query parameters: conditions, projections, ordering and pagination.
//!
//! These are plain values a request handler fills in and hands to the
//! generic operations in [`crate::crud`]. Nothing here touches the database.

use std::fmt;
use std::str::FromStr;

use crate::error::{OrmError, Result};
use crate::value::{SqlValue, ToSqlValue};

/// Comparison operators accepted in a [`WhereParam`].
///
/// The set is closed: operator text only ever comes from [`Operator::as_sql`],
/// so a condition can never smuggle arbitrary SQL through its operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Operator {
    /// Equal (=)
    #[default]
    Eq,
    /// Not equal (!=)
    Ne,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Gte,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Lte,
    /// Pattern match (LIKE)
    Like,
    /// Negated pattern match (NOT LIKE)
    NotLike,
    /// Membership (IN)
    In,
    /// Negated membership (NOT IN)
    NotIn,
}

impl Operator {
    /// Returns the SQL text of the operator.
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
        }
    }

    /// Returns whether the operator takes a list of values.
    pub const fn is_membership(self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Parses the textual tags used by callers that build conditions from
/// strings. An empty tag means equality.
impl FromStr for Operator {
    type Err = OrmError;

    fn from_str(tag: &str) -> Result<Self> {
        let normalized = tag.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.to_ascii_uppercase().as_str() {
            "" | "=" | "==" => Ok(Self::Eq),
            "!=" | "<>" => Ok(Self::Ne),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Gte),
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Lte),
            "LIKE" => Ok(Self::Like),
            "NOT LIKE" => Ok(Self::NotLike),
            "IN" => Ok(Self::In),
            "NOT IN" => Ok(Self::NotIn),
            _ => Err(OrmError::UnsupportedOperator(tag.to_string())),
        }
    }
}

/// The value side of a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum WhereValue {
    /// A single bound value.
    Scalar(SqlValue),
    /// A sequence bound as one unit, for membership operators.
    List(Vec<SqlValue>),
}

impl WhereValue {
    /// Wraps a single value.
    pub fn scalar<V: ToSqlValue>(value: V) -> Self {
        Self::Scalar(value.to_sql_value())
    }

    /// Wraps a sequence of values.
    pub fn list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToSqlValue,
    {
        Self::List(values.into_iter().map(ToSqlValue::to_sql_value).collect())
    }
}

/// One filter condition: `field op value`.
///
/// `field` is written into the statement as-is. Only `value` is
/// parameterized, so field names that originate from a request must be
/// checked against an allow-list by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereParam {
    field: String,
    op: Operator,
    value: WhereValue,
}

impl WhereParam {
    /// Creates a condition with a single value.
    pub fn new<V: ToSqlValue>(field: impl Into<String>, op: Operator, value: V) -> Self {
        Self::with_value(field, op, WhereValue::scalar(value))
    }

    /// Creates a condition from an already-built value.
    pub fn with_value(field: impl Into<String>, op: Operator, value: WhereValue) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    /// Creates a condition from a textual operator tag.
    pub fn parse(field: impl Into<String>, tag: &str, value: WhereValue) -> Result<Self> {
        Ok(Self::with_value(field, tag.parse()?, value))
    }

    /// Creates an equality condition (field = value).
    pub fn eq<V: ToSqlValue>(field: impl Into<String>, value: V) -> Self {
        Self::new(field, Operator::Eq, value)
    }

    /// Creates a membership condition (field IN values).
    pub fn in_list<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToSqlValue,
    {
        Self::with_value(field, Operator::In, WhereValue::list(values))
    }

    /// Creates a negated membership condition (field NOT IN values).
    pub fn not_in_list<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToSqlValue,
    {
        Self::with_value(field, Operator::NotIn, WhereValue::list(values))
    }

    /// The column name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The operator.
    pub fn op(&self) -> Operator {
        self.op
    }

    /// The bound value.
    pub fn value(&self) -> &WhereValue {
        &self.value
    }
}

/// Accumulates conditions in order.
///
/// # Example
///
/// ```
/// use brisk_orm::{Operator, WhereBuilder};
///
/// let conditions = WhereBuilder::new()
///     .eq("status", "active")
///     .add("age", Operator::Gte, 18)
///     .in_list("role", ["admin", "editor"])
///     .build();
/// assert_eq!(conditions.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WhereBuilder {
    conditions: Vec<WhereParam>,
}

impl WhereBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `field op value`.
    #[must_use]
    pub fn add<V: ToSqlValue>(mut self, field: &str, op: Operator, value: V) -> Self {
        self.conditions.push(WhereParam::new(field, op, value));
        self
    }

    /// Appends `field = value`.
    #[must_use]
    pub fn eq<V: ToSqlValue>(self, field: &str, value: V) -> Self {
        self.add(field, Operator::Eq, value)
    }

    /// Appends `field IN (values)`.
    #[must_use]
    pub fn in_list<I, V>(mut self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToSqlValue,
    {
        self.conditions.push(WhereParam::in_list(field, values));
        self
    }

    /// Appends a condition given by a textual operator tag.
    pub fn add_tagged(mut self, field: &str, tag: &str, value: WhereValue) -> Result<Self> {
        self.conditions.push(WhereParam::parse(field, tag, value)?);
        Ok(self)
    }

    /// Returns whether no condition has been added.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Finishes the builder.
    pub fn build(self) -> Vec<WhereParam> {
        self.conditions
    }
}

/// Parameters of a row query.
///
/// `fields` is a comma-separated projection (empty selects every model
/// column), `order` is an ORDER BY body such as `"id DESC"`, and `preload`
/// names a relation handed to [`crate::Model::preload`]. A `limit` of zero
/// or less means no limit. Soft-deleted rows are skipped unless `unscoped`
/// is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParam {
    /// Comma-separated column list.
    pub fields: String,
    /// Rows to skip.
    pub offset: i64,
    /// Maximum rows to return.
    pub limit: i64,
    /// ORDER BY body.
    pub order: String,
    /// Relation to eager-load.
    pub preload: String,
    /// Conditions, AND-ed in order.
    pub conditions: Vec<WhereParam>,
    /// Include soft-deleted rows; on `delete`, remove rows for good.
    pub unscoped: bool,
}

impl QueryParam {
    /// Creates parameters that match every row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the projection.
    #[must_use]
    pub fn fields(mut self, fields: &str) -> Self {
        self.fields = fields.to_string();
        self
    }

    /// Sets the number of rows to skip.
    #[must_use]
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the maximum number of rows.
    #[must_use]
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the ordering.
    #[must_use]
    pub fn order(mut self, order: &str) -> Self {
        self.order = order.to_string();
        self
    }

    /// Sets the relation to eager-load.
    #[must_use]
    pub fn preload(mut self, relation: &str) -> Self {
        self.preload = relation.to_string();
        self
    }

    /// Appends one condition.
    #[must_use]
    pub fn filter(mut self, condition: WhereParam) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Replaces all conditions.
    #[must_use]
    pub fn conditions(mut self, conditions: Vec<WhereParam>) -> Self {
        self.conditions = conditions;
        self
    }

    /// Includes soft-deleted rows. A `delete` with this set removes the
    /// matching rows permanently instead of stamping them.
    #[must_use]
    pub fn unscoped(mut self) -> Self {
        self.unscoped = true;
        self
    }
}

/// Parameters of a scalar or aggregate read, e.g. `SUM(amount)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExprParam {
    /// Expression placed in the SELECT list.
    pub expression: String,
    /// Conditions, AND-ed in order.
    pub conditions: Vec<WhereParam>,
    /// Include soft-deleted rows; on `delete`, remove rows for good.
    pub unscoped: bool,
}

impl ExprParam {
    /// Creates an unfiltered expression read.
    pub fn new(expression: &str) -> Self {
        Self {
            expression: expression.to_string(),
            ..Self::default()
        }
    }

    /// Appends one condition.
    #[must_use]
    pub fn filter(mut self, condition: WhereParam) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Replaces all conditions.
    #[must_use]
    pub fn conditions(mut self, conditions: Vec<WhereParam>) -> Self {
        self.conditions = conditions;
        self
    }

    /// Includes soft-deleted rows.
    #[must_use]
    pub fn unscoped(mut self) -> Self {
        self.unscoped = true;
        self
    }
}

/// A partial-update payload: columns and their new values, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Changes {
    columns: Vec<(String, SqlValue)>,
}

impl Changes {
    /// Creates an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `column` to `value`.
    #[must_use]
    pub fn set<V: ToSqlValue>(mut self, column: &str, value: V) -> Self {
        self.columns.push((column.to_string(), value.to_sql_value()));
        self
    }

    /// Returns whether nothing would be written.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterates over `(column, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.columns.iter().map(|(c, v)| (c.as_str(), v))
    }
}

impl<C: Into<String>> FromIterator<(C, SqlValue)> for Changes {
    fn from_iter<I: IntoIterator<Item = (C, SqlValue)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().map(|(c, v)| (c.into(), v)).collect(),
        }
    }
}
