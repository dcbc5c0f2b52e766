//! Generic data-access operations over any [`Model`].
//!
//! Two result styles coexist on purpose:
//!
//! - `create`, `get_multi`, `count` and `update` return the storage error
//!   untouched, so callers can tell "no rows" from a broken connection.
//! - `get_one`, `get_by_pk`, `delete`, `delete_by_pk`, `update_by_pk` and
//!   `expression` collapse every failure, "not found" included, into
//!   `None`/`false`. The swallowed error is logged at `warn`.
//!
//! ```ignore
//! use brisk_orm::{crud, QueryParam, WhereParam};
//!
//! let adults: Vec<User> = crud::get_multi(
//!     &pool,
//!     &QueryParam::new()
//!         .filter(WhereParam::new("age", Operator::Gte, 18))
//!         .order("name ASC")
//!         .limit(20),
//! )
//! .await?;
//! ```

use sqlx::SqlitePool;
use sqlx::sqlite::SqliteRow;
use tracing::{debug, warn};

use crate::error::{OrmError, Result};
use crate::fields::Id;
use crate::model::Model;
use crate::param::{Changes, ExprParam, QueryParam, WhereParam};
use crate::predicate::Predicate;
use crate::statement::{self, Statement};
use crate::value::{ToSqlValue, into_arguments};

/// Inserts `model` and stores the generated key back into it.
pub async fn create<M: Model>(pool: &SqlitePool, model: &mut M) -> Result<()> {
    let stmt = statement::insert(model);
    debug!(sql = %stmt.sql, table = M::TABLE, "create");

    let result = sqlx::query_with(&stmt.sql, into_arguments(stmt.params)?)
        .execute(pool)
        .await?;

    if !model.pk().is_set() {
        let id = Id::try_from(result.last_insert_rowid())
            .map_err(|e| OrmError::InvalidParam(format!("generated key: {e}")))?;
        model.set_pk(id);
    }
    Ok(())
}

/// Returns every row matching `query`. No match is an empty vector.
pub async fn get_multi<M: Model>(pool: &SqlitePool, query: &QueryParam) -> Result<Vec<M>> {
    let predicate = Predicate::build(&query.conditions)?;
    let stmt = statement::select::<M>(query, &predicate);
    let mut rows = fetch_all::<M>(pool, stmt).await?;

    if !query.preload.is_empty() && !rows.is_empty() {
        M::preload(pool, &mut rows, &query.preload).await?;
    }
    Ok(rows)
}

/// Counts rows matching the conditions of `query`.
///
/// Projection, ordering, pagination and preload are ignored.
pub async fn count<M: Model>(pool: &SqlitePool, query: &QueryParam) -> Result<i64> {
    let predicate = Predicate::build(&query.conditions)?;
    let stmt = statement::count::<M>(&predicate, !query.unscoped);
    debug!(sql = %stmt.sql, table = M::TABLE, "count");

    let count = sqlx::query_scalar_with::<_, i64, _>(&stmt.sql, into_arguments(stmt.params)?)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Deletes the rows matching `query`.
///
/// Refuses, without touching the database, when `query` has no condition.
/// Soft-delete models are stamped rather than removed, unless `query` is
/// unscoped.
pub async fn delete<M: Model>(pool: &SqlitePool, query: &QueryParam) -> bool {
    if query.conditions.is_empty() {
        warn!(table = M::TABLE, "refusing to delete without conditions");
        return false;
    }

    match try_delete::<M>(pool, &query.conditions, !query.unscoped).await {
        Ok(affected) => {
            debug!(table = M::TABLE, affected, "delete");
            true
        }
        Err(err) => {
            warn!(table = M::TABLE, error = %err, "delete failed");
            false
        }
    }
}

/// Deletes the row identified by the key of `model`.
///
/// Returns `false` when the key is unset or no row was affected.
pub async fn delete_by_pk<M: Model>(pool: &SqlitePool, model: &M) -> bool {
    let pk = model.pk();
    if !pk.is_set() {
        warn!(table = M::TABLE, "refusing to delete a row without primary key");
        return false;
    }

    match try_delete::<M>(pool, &[WhereParam::eq(M::PRIMARY_KEY, pk)], true).await {
        Ok(affected) => affected > 0,
        Err(err) => {
            warn!(table = M::TABLE, %pk, error = %err, "delete by pk failed");
            false
        }
    }
}

/// Returns the first row matching `query`.
///
/// Not found and storage failures both yield `None`.
pub async fn get_one<M: Model>(pool: &SqlitePool, query: &QueryParam) -> Option<M> {
    match try_get_one::<M>(pool, query).await {
        Ok(found) => found,
        Err(err) => {
            warn!(table = M::TABLE, error = %err, "get one failed");
            None
        }
    }
}

/// Returns the row with primary key `id`.
///
/// Not found and storage failures both yield `None`.
pub async fn get_by_pk<M: Model>(pool: &SqlitePool, id: Id) -> Option<M> {
    let query = QueryParam::new().filter(WhereParam::eq(M::PRIMARY_KEY, id));
    get_one::<M>(pool, &query).await
}

/// Writes every non-key column of `model` to its row.
///
/// Returns `false` when the key is unset, no row was affected, or the
/// write failed.
pub async fn update_by_pk<M: Model>(pool: &SqlitePool, model: &M) -> bool {
    let pk = model.pk();
    if !pk.is_set() {
        warn!(table = M::TABLE, "refusing to update a row without primary key");
        return false;
    }

    let changes: Changes = model.values().into_iter().collect();
    let conditions = [WhereParam::eq(M::PRIMARY_KEY, pk)];
    match try_update::<M>(pool, &changes, &conditions, true).await {
        Ok(affected) => affected > 0,
        Err(err) => {
            warn!(table = M::TABLE, %pk, error = %err, "update by pk failed");
            false
        }
    }
}

/// Applies `changes` to the rows matching `query`.
///
/// Returns the number of updated rows. Zero matches is reported as
/// [`sqlx::Error::RowNotFound`], and the error is never folded into a
/// boolean.
pub async fn update<M: Model>(
    pool: &SqlitePool,
    changes: &Changes,
    query: &QueryParam,
) -> Result<u64> {
    if query.conditions.is_empty() {
        return Err(OrmError::MissingWhereClause);
    }

    let affected = try_update::<M>(pool, changes, &query.conditions, !query.unscoped).await?;
    if affected == 0 {
        return Err(sqlx::Error::RowNotFound.into());
    }
    Ok(affected)
}

/// Evaluates a scalar or aggregate expression over the matching rows.
///
/// ```ignore
/// let total: Option<i64> = crud::expression::<Order, _>(
///     &pool,
///     &ExprParam::new("SUM(amount)").filter(WhereParam::eq("status", "paid")),
/// )
/// .await
/// .flatten();
/// ```
pub async fn expression<M, T>(pool: &SqlitePool, expr: &ExprParam) -> Option<T>
where
    M: Model,
    T: Send + Unpin,
    (T,): for<'r> sqlx::FromRow<'r, SqliteRow>,
{
    match try_expression::<M, T>(pool, expr).await {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(table = M::TABLE, expression = %expr.expression, error = %err, "expression failed");
            None
        }
    }
}

/// Loads the `R` rows whose `fk_column` is one of `keys`.
///
/// Building block for [`Model::preload`] implementations.
pub async fn load_related<R, I, V>(pool: &SqlitePool, fk_column: &str, keys: I) -> Result<Vec<R>>
where
    R: Model,
    I: IntoIterator<Item = V>,
    V: ToSqlValue,
{
    let query = QueryParam::new().filter(WhereParam::in_list(fk_column, keys));
    let predicate = Predicate::build(&query.conditions)?;
    fetch_all::<R>(pool, statement::select::<R>(&query, &predicate)).await
}

async fn fetch_all<M: Model>(pool: &SqlitePool, stmt: Statement) -> Result<Vec<M>> {
    debug!(sql = %stmt.sql, table = M::TABLE, "select");
    let rows = sqlx::query_as_with::<_, M, _>(&stmt.sql, into_arguments(stmt.params)?)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

async fn try_get_one<M: Model>(pool: &SqlitePool, query: &QueryParam) -> Result<Option<M>> {
    let predicate = Predicate::build(&query.conditions)?;
    let first = query.clone().limit(1);
    let stmt = statement::select::<M>(&first, &predicate);
    debug!(sql = %stmt.sql, table = M::TABLE, "select one");

    let found = sqlx::query_as_with::<_, M, _>(&stmt.sql, into_arguments(stmt.params)?)
        .fetch_optional(pool)
        .await?;

    match found {
        Some(row) if !query.preload.is_empty() => {
            let mut rows = [row];
            M::preload(pool, &mut rows, &query.preload).await?;
            let [row] = rows;
            Ok(Some(row))
        }
        other => Ok(other),
    }
}

async fn try_delete<M: Model>(
    pool: &SqlitePool,
    conditions: &[WhereParam],
    scoped: bool,
) -> Result<u64> {
    let predicate = Predicate::build(conditions)?;
    let stmt = statement::delete::<M>(&predicate, scoped);
    execute(pool, stmt).await
}

async fn try_update<M: Model>(
    pool: &SqlitePool,
    changes: &Changes,
    conditions: &[WhereParam],
    scoped: bool,
) -> Result<u64> {
    if changes.is_empty() {
        return Err(OrmError::InvalidParam(String::from("nothing to update")));
    }
    let predicate = Predicate::build(conditions)?;
    let stmt = statement::update::<M>(changes, &predicate, scoped);
    execute(pool, stmt).await
}

async fn try_expression<M, T>(pool: &SqlitePool, expr: &ExprParam) -> Result<T>
where
    M: Model,
    T: Send + Unpin,
    (T,): for<'r> sqlx::FromRow<'r, SqliteRow>,
{
    if expr.expression.trim().is_empty() {
        return Err(OrmError::InvalidParam(String::from("empty expression")));
    }
    let predicate = Predicate::build(&expr.conditions)?;
    let stmt = statement::expression::<M>(&expr.expression, &predicate, !expr.unscoped);
    debug!(sql = %stmt.sql, table = M::TABLE, "expression");

    let value = sqlx::query_scalar_with::<_, T, _>(&stmt.sql, into_arguments(stmt.params)?)
        .fetch_one(pool)
        .await?;
    Ok(value)
}

async fn execute(pool: &SqlitePool, stmt: Statement) -> Result<u64> {
    debug!(sql = %stmt.sql, "execute");
    let result = sqlx::query_with(&stmt.sql, into_arguments(stmt.params)?)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
