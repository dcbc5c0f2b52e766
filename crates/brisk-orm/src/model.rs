//! The `Model` trait: what the generic operations need to know about an
//! entity type.

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqlitePool};

use crate::error::{OrmError, Result};
use crate::fields::Id;
use crate::value::SqlValue;

/// A database entity backed by one table.
///
/// Row decoding goes through sqlx's `FromRow`, so most entities derive it
/// and only spell out the table layout here.
///
/// # Example
///
/// ```ignore
/// use brisk_orm::{Id, Model, SqlValue, ToSqlValue};
///
/// #[derive(sqlx::FromRow)]
/// struct User {
///     #[sqlx(try_from = "i64")]
///     id: Id,
///     name: String,
///     age: i64,
/// }
///
/// impl Model for User {
///     const TABLE: &'static str = "users";
///     const COLUMNS: &'static [&'static str] = &["id", "name", "age"];
///
///     fn pk(&self) -> Id {
///         self.id
///     }
///
///     fn set_pk(&mut self, id: Id) {
///         self.id = id;
///     }
///
///     fn values(&self) -> Vec<(&'static str, SqlValue)> {
///         vec![
///             ("name", self.name.as_str().to_sql_value()),
///             ("age", self.age.to_sql_value()),
///         ]
///     }
/// }
/// ```
#[allow(async_fn_in_trait)]
pub trait Model: for<'r> FromRow<'r, SqliteRow> + Send + Unpin + Sized {
    /// Table name.
    const TABLE: &'static str;

    /// Every column, primary key included, in SELECT order.
    const COLUMNS: &'static [&'static str];

    /// Primary key column.
    const PRIMARY_KEY: &'static str = "id";

    /// Soft-delete column, if rows are only marked as deleted.
    ///
    /// When set, reads and writes skip rows where this column is not NULL,
    /// and deletes stamp it instead of removing the row.
    const SOFT_DELETE: Option<&'static str> = None;

    /// Returns the primary key value.
    fn pk(&self) -> Id;

    /// Stores a primary key, e.g. the one generated on insert.
    fn set_pk(&mut self, id: Id);

    /// Non-key columns and their current values, used for INSERT and
    /// full-row UPDATE.
    fn values(&self) -> Vec<(&'static str, SqlValue)>;

    /// Eager-loads `relation` into `rows`.
    ///
    /// Implementations usually collect the keys of `rows`, call
    /// [`crate::crud::load_related`] and distribute the result.
    async fn preload(pool: &SqlitePool, rows: &mut [Self], relation: &str) -> Result<()> {
        let _ = (pool, rows);
        Err(OrmError::UnknownRelation(relation.to_string()))
    }
}
