//! Translation of [`WhereParam`] sequences into a parameterized filter.
//!
//! A [`Predicate`] keeps one clause per condition, in input order, and
//! joins them with `AND`. Comparison clauses read `field op ?`; membership
//! clauses read `field IN (?)` and carry their whole list as one binding.
//! The list is only expanded to one placeholder per element when the
//! predicate is rendered for execution.

use crate::error::{OrmError, Result};
use crate::param::{Operator, WhereParam, WhereValue};
use crate::value::SqlValue;

#[derive(Debug, Clone, PartialEq)]
struct Clause {
    field: String,
    op: Operator,
    binding: WhereValue,
}

impl Clause {
    fn from_param(param: &WhereParam) -> Result<Self> {
        if param.field().trim().is_empty() {
            return Err(OrmError::InvalidParam(String::from(
                "condition without a field name",
            )));
        }
        match (param.op().is_membership(), param.value()) {
            (true, WhereValue::Scalar(_)) => {
                return Err(OrmError::InvalidParam(format!(
                    "{} {} requires a list value",
                    param.field(),
                    param.op()
                )));
            }
            (false, WhereValue::List(_)) => {
                return Err(OrmError::InvalidParam(format!(
                    "{} {} does not accept a list value",
                    param.field(),
                    param.op()
                )));
            }
            _ => {}
        }
        Ok(Self {
            field: param.field().to_string(),
            op: param.op(),
            binding: param.value().clone(),
        })
    }

    fn template(&self) -> String {
        if self.op.is_membership() {
            format!("{} {} (?)", self.field, self.op)
        } else {
            format!("{} {} ?", self.field, self.op)
        }
    }

    fn render(&self, params: &mut Vec<SqlValue>) -> String {
        match &self.binding {
            WhereValue::Scalar(value) => {
                params.push(value.clone());
                format!("{} {} ?", self.field, self.op)
            }
            // An empty list matches nothing, as `IN (NULL)` never holds.
            WhereValue::List(values) if values.is_empty() => {
                format!("{} {} (NULL)", self.field, self.op)
            }
            WhereValue::List(values) => {
                let placeholders: Vec<&str> =
                    values.iter().map(|_| SqlValue::placeholder()).collect();
                params.extend(values.iter().cloned());
                format!("{} {} ({})", self.field, self.op, placeholders.join(", "))
            }
        }
    }

    fn inline(&self) -> String {
        match &self.binding {
            WhereValue::Scalar(value) => {
                format!("{} {} {}", self.field, self.op, value.to_sql_inline())
            }
            WhereValue::List(values) if values.is_empty() => {
                format!("{} {} (NULL)", self.field, self.op)
            }
            WhereValue::List(values) => {
                let items: Vec<String> = values.iter().map(SqlValue::to_sql_inline).collect();
                format!("{} {} ({})", self.field, self.op, items.join(", "))
            }
        }
    }
}

/// An AND-conjunction of conditions with their bound values.
///
/// # Example
///
/// ```
/// use brisk_orm::{Predicate, WhereParam};
///
/// let predicate = Predicate::build(&[
///     WhereParam::eq("status", "active"),
///     WhereParam::in_list("age", [18, 19, 20]),
/// ])
/// .unwrap();
///
/// assert_eq!(predicate.template(), "status = ? AND age IN (?)");
/// let (sql, params) = predicate.render();
/// assert_eq!(sql, "status = ? AND age IN (?, ?, ?)");
/// assert_eq!(params.len(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    /// Builds a predicate from conditions, keeping their order.
    ///
    /// An empty slice yields an empty predicate, which filters nothing.
    pub fn build(conditions: &[WhereParam]) -> Result<Self> {
        let clauses = conditions
            .iter()
            .map(Clause::from_param)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { clauses })
    }

    /// Returns whether the predicate has no clause.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Number of clauses.
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// The conjunction with one placeholder per binding.
    pub fn template(&self) -> String {
        self.clauses
            .iter()
            .map(Clause::template)
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    /// The bound values, one per clause.
    pub fn bindings(&self) -> impl Iterator<Item = &WhereValue> {
        self.clauses.iter().map(|c| &c.binding)
    }

    /// Renders the executable SQL and its flattened parameters.
    pub fn render(&self) -> (String, Vec<SqlValue>) {
        let mut params = Vec::new();
        let sql = self
            .clauses
            .iter()
            .map(|c| c.render(&mut params))
            .collect::<Vec<_>>()
            .join(" AND ");
        (sql, params)
    }

    /// Renders the conjunction with values inlined, for logs.
    pub fn to_inline_sql(&self) -> String {
        self.clauses
            .iter()
            .map(Clause::inline)
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_conditions_build_empty_predicate() {
        let predicate = Predicate::build(&[]).unwrap();
        assert!(predicate.is_empty());
        assert_eq!(predicate.render(), (String::new(), vec![]));
    }

    #[test]
    fn test_clause_and_binding_counts_match_input() {
        let conditions = vec![
            WhereParam::eq("name", "alice"),
            WhereParam::new("age", Operator::Gt, 18),
            WhereParam::in_list("role", ["admin", "editor"]),
            WhereParam::new("email", Operator::Like, "%@example.com"),
        ];
        let predicate = Predicate::build(&conditions).unwrap();

        assert_eq!(predicate.len(), conditions.len());
        assert_eq!(predicate.bindings().count(), conditions.len());
        assert_eq!(predicate.template().matches(" AND ").count(), 3);
    }

    #[test]
    fn test_conditions_keep_input_order() {
        let predicate = Predicate::build(&[
            WhereParam::new("b", Operator::Lte, 2),
            WhereParam::eq("a", 1),
        ])
        .unwrap();
        assert_eq!(predicate.template(), "b <= ? AND a = ?");

        let (_, params) = predicate.render();
        assert_eq!(params, vec![SqlValue::Int(2), SqlValue::Int(1)]);
    }

    #[test]
    fn test_in_clause_binds_one_list() {
        let predicate = Predicate::build(&[WhereParam::in_list("age", [18, 19, 20])]).unwrap();

        assert_eq!(predicate.template(), "age IN (?)");
        let bindings: Vec<&WhereValue> = predicate.bindings().collect();
        assert_eq!(
            bindings,
            [&WhereValue::List(vec![
                SqlValue::Int(18),
                SqlValue::Int(19),
                SqlValue::Int(20)
            ])]
        );
        assert_eq!(predicate.to_inline_sql(), "age IN (18, 19, 20)");
    }

    #[test]
    fn test_in_clause_expands_on_render() {
        let predicate = Predicate::build(&[
            WhereParam::eq("status", "active"),
            WhereParam::in_list("age", [18, 19, 20]),
        ])
        .unwrap();

        let (sql, params) = predicate.render();
        assert_eq!(sql, "status = ? AND age IN (?, ?, ?)");
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_empty_list_matches_nothing() {
        let predicate =
            Predicate::build(&[WhereParam::in_list("id", Vec::<i64>::new())]).unwrap();
        let (sql, params) = predicate.render();
        assert_eq!(sql, "id IN (NULL)");
        assert!(params.is_empty());
    }

    #[test]
    fn test_not_in_clause() {
        let predicate = Predicate::build(&[WhereParam::not_in_list("id", [1, 2])]).unwrap();
        assert_eq!(predicate.render().0, "id NOT IN (?, ?)");
    }

    #[test]
    fn test_membership_requires_list() {
        let err = Predicate::build(&[WhereParam::new("age", Operator::In, 18)]).unwrap_err();
        assert!(matches!(err, OrmError::InvalidParam(_)));
    }

    #[test]
    fn test_comparison_rejects_list() {
        let condition = WhereParam::with_value("age", Operator::Gt, WhereValue::list([1, 2]));
        assert!(Predicate::build(&[condition]).is_err());
    }

    #[test]
    fn test_missing_field_rejected() {
        assert!(Predicate::build(&[WhereParam::eq(" ", 1)]).is_err());
    }

    #[test]
    fn test_values_never_reach_sql_text() {
        let predicate =
            Predicate::build(&[WhereParam::eq("name", "'; DROP TABLE users; --")]).unwrap();
        let (sql, params) = predicate.render();
        assert_eq!(sql, "name = ?");
        assert_eq!(
            params,
            vec![SqlValue::Text(String::from("'; DROP TABLE users; --"))]
        );
    }
}
