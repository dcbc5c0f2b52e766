//! # brisk-orm
//!
//! Generic data access over sqlx's SQLite pool.
//!
//! This crate provides:
//! - `WhereParam` / `QueryParam` / `ExprParam` for describing a query as data
//! - `Predicate`, which turns conditions into a parameterized AND-conjunction
//! - `Model` for describing an entity's table
//! - the generic operations in [`crud`]
//! - column helpers (`Id`, `DeletedAt`, `LocalTime`, `LocalTimeStamp`)
//!
//! ## Quick Start
//!
//! ```ignore
//! use brisk_orm::{crud, Operator, QueryParam, WhereBuilder};
//!
//! async fn example(pool: &sqlx::SqlitePool) -> brisk_orm::Result<()> {
//!     let query = QueryParam::new()
//!         .conditions(
//!             WhereBuilder::new()
//!                 .eq("status", "active")
//!                 .in_list("age", [18, 19, 20])
//!                 .build(),
//!         )
//!         .order("id DESC")
//!         .limit(10);
//!
//!     let users: Vec<User> = crud::get_multi(pool, &query).await?;
//!     let total = crud::count::<User>(pool, &query).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Trust boundary
//!
//! Only values are bound as parameters. Field names, `fields`, `order` and
//! expressions are written into the statement as given, so anything derived
//! from a request must be checked against an allow-list first. Operators
//! are a closed enum and cannot carry SQL.

pub mod crud;
mod error;
pub mod fields;
mod model;
mod param;
mod predicate;
mod statement;
mod value;

pub use error::{OrmError, Result};
pub use fields::{DeletedAt, Id, LocalTime, LocalTimeStamp, TIME_FORMAT};
pub use model::Model;
pub use param::{Changes, ExprParam, Operator, QueryParam, WhereBuilder, WhereParam, WhereValue};
pub use predicate::Predicate;
pub use value::{SqlValue, ToSqlValue};
