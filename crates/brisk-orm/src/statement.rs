//! SQL assembly for the generic operations.
//!
//! Clauses are laid down in a fixed order: projection, source, filter
//! (soft-delete scope first, then the caller's predicate), ordering and
//! pagination.

use chrono::Local;

use crate::fields::TIME_FORMAT;
use crate::model::Model;
use crate::param::{Changes, QueryParam};
use crate::predicate::Predicate;
use crate::value::{SqlValue, ToSqlValue};

/// A statement ready to be executed.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Statement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl Statement {
    fn new(sql: String) -> Self {
        Self {
            sql,
            params: Vec::new(),
        }
    }

    fn push_where<M: Model>(&mut self, predicate: &Predicate, scoped: bool) {
        let mut conditions = Vec::new();

        if scoped {
            if let Some(column) = M::SOFT_DELETE {
                conditions.push(format!("{column} IS NULL"));
            }
        }

        if !predicate.is_empty() {
            let (sql, params) = predicate.render();
            conditions.push(sql);
            self.params.extend(params);
        }

        if !conditions.is_empty() {
            self.sql.push_str(" WHERE ");
            self.sql.push_str(&conditions.join(" AND "));
        }
    }
}

/// `SELECT ... FROM ... [WHERE] [ORDER BY] [LIMIT/OFFSET]`.
pub(crate) fn select<M: Model>(query: &QueryParam, predicate: &Predicate) -> Statement {
    let projection = if query.fields.trim().is_empty() {
        M::COLUMNS.join(", ")
    } else {
        query.fields.trim().to_string()
    };

    let mut stmt = Statement::new(format!("SELECT {projection} FROM {}", M::TABLE));
    stmt.push_where::<M>(predicate, !query.unscoped);

    if !query.order.trim().is_empty() {
        stmt.sql.push_str(" ORDER BY ");
        stmt.sql.push_str(query.order.trim());
    }

    // SQLite only accepts OFFSET after a LIMIT; -1 means no limit.
    if query.limit > 0 {
        stmt.sql.push_str(&format!(" LIMIT {}", query.limit));
    } else if query.offset > 0 {
        stmt.sql.push_str(" LIMIT -1");
    }
    if query.offset > 0 {
        stmt.sql.push_str(&format!(" OFFSET {}", query.offset));
    }

    stmt
}

/// `SELECT COUNT(*) FROM ... [WHERE]`.
pub(crate) fn count<M: Model>(predicate: &Predicate, scoped: bool) -> Statement {
    let mut stmt = Statement::new(format!("SELECT COUNT(*) FROM {}", M::TABLE));
    stmt.push_where::<M>(predicate, scoped);
    stmt
}

/// `SELECT expression FROM ... [WHERE]`.
pub(crate) fn expression<M: Model>(expr: &str, predicate: &Predicate, scoped: bool) -> Statement {
    let mut stmt = Statement::new(format!("SELECT {expr} FROM {}", M::TABLE));
    stmt.push_where::<M>(predicate, scoped);
    stmt
}

/// `INSERT INTO ... (...) VALUES (...)`.
///
/// The primary key is only written when already set; otherwise the
/// database assigns it.
pub(crate) fn insert<M: Model>(model: &M) -> Statement {
    let mut columns = Vec::new();
    let mut params = Vec::new();

    let pk = model.pk();
    if pk.is_set() {
        columns.push(M::PRIMARY_KEY);
        params.push(pk.to_sql_value());
    }
    for (column, value) in model.values() {
        columns.push(column);
        params.push(value);
    }

    if columns.is_empty() {
        return Statement::new(format!("INSERT INTO {} DEFAULT VALUES", M::TABLE));
    }

    let placeholders: Vec<&str> = params.iter().map(|_| SqlValue::placeholder()).collect();
    Statement {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({})",
            M::TABLE,
            columns.join(", "),
            placeholders.join(", ")
        ),
        params,
    }
}

/// `UPDATE ... SET ... [WHERE]`.
pub(crate) fn update<M: Model>(changes: &Changes, predicate: &Predicate, scoped: bool) -> Statement {
    let mut assignments = Vec::new();
    let mut params = Vec::new();
    for (column, value) in changes.iter() {
        assignments.push(format!("{column} = ?"));
        params.push(value.clone());
    }

    let mut stmt = Statement {
        sql: format!("UPDATE {} SET {}", M::TABLE, assignments.join(", ")),
        params,
    };
    stmt.push_where::<M>(predicate, scoped);
    stmt
}

/// `DELETE FROM ... [WHERE]`, or a soft-delete stamp for models that
/// declare [`Model::SOFT_DELETE`].
///
/// An unscoped delete on a soft-delete model removes the rows for good,
/// already stamped ones included.
pub(crate) fn delete<M: Model>(predicate: &Predicate, scoped: bool) -> Statement {
    match M::SOFT_DELETE {
        Some(column) if scoped => {
            let now = Local::now().naive_local().format(TIME_FORMAT).to_string();
            let changes = Changes::new().set(column, now);
            update::<M>(&changes, predicate, true)
        }
        _ => {
            let mut stmt = Statement::new(format!("DELETE FROM {}", M::TABLE));
            stmt.push_where::<M>(predicate, scoped);
            stmt
        }
    }
}
