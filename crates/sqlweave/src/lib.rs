//! # sqlweave
//!
//! Typed SQL expression trees, dialect-aware serialization and nested result
//! hydration.
//!
//! ## Features
//!
//! - **Typed expressions**: columns and literals carry a scalar family, so
//!   `age.eq("x")` does not compile
//! - **Deterministic output**: statements serialize to pretty-printed SQL
//!   with positional arguments, identical for identical trees
//! - **Dialects**: Postgres (`$n`) and MySQL (`?`) ship, custom ones derive
//!   from either
//! - **Fail late**: statements are validated when serialized (DELETE without
//!   WHERE, empty INSERT, one-branch UNION), never half-executed
//! - **Nested hydration**: join-shaped rows fold into `Vec<Parent>` with
//!   `Vec<Child>` fields, grouped by primary key
//! - **Query monitoring**: hooks, monitors and timeouts around any client
//!
//! ## Example
//!
//! ```ignore
//! use sqlweave::prelude::*;
//!
//! let table1 = Table::new("db", "table1");
//! let col1 = table1.column::<Text>("col1");
//! let col_float = table1.column::<Float>("col_float");
//! let col_int = table1.column::<Integer>("col_int");
//!
//! let stmt = select((&col1, &col_float))
//!     .from(&table1)
//!     .where_(col_int.gt_eq(10))
//!     .order_by(col_int.desc());
//!
//! let built = stmt.build(Dialect::postgres())?;
//! // SELECT table1.col1 AS "table1.col1",
//! //      table1.col_float AS "table1.col_float"
//! // FROM db.table1
//! // WHERE table1.col_int >= $1
//! // ORDER BY table1.col_int DESC;
//!
//! let rows: Vec<Row1> = stmt.fetch_all(&client).await?;
//! ```

mod macros;

pub mod client;
pub mod column;
pub mod dialect;
pub mod error;
pub mod exec;
pub mod expr;
pub mod hydrate;
pub mod ident;
pub mod monitor;
pub mod prelude;
pub mod sql;
pub mod statement;
pub mod table;
pub mod value;

pub use client::{GenericClient, RowStream, StreamingClient};
pub use column::{
    AnyColumn, Assignment, Column, ColumnList, IntoAssignments, IntoColumnList, IntoOrderBy,
    IntoOrderByList, IntoProjection, IntoProjections, OrderBy, Projection,
};
pub use dialect::{Dialect, DialectBuilder};
pub use error::{SqlError, SqlResult};
pub use exec::Executable;
pub use expr::{AnyExpr, Expr, IntoAnyExpr, IntoExpr, IntoExprList};
pub use hydrate::{
    ColumnMeta, ConvertError, FromValue, Model, ModelDesc, RowSet, Scanner, hydrate_all,
    hydrate_one,
};
pub use monitor::{
    CompositeHook, CompositeMonitor, HookAction, InstrumentedClient, LoggingMonitor, MonitorConfig,
    NoopMonitor, QueryContext, QueryHook, QueryMonitor, QueryResult, QueryStats, QueryType,
    StatsMonitor,
};
pub use sql::{BuiltSql, SqlBuilder, StatementKind};
pub use statement::{
    DeleteStatement, InsertStatement, LockMode, LockStatement, RowLock, SelectStatement,
    SetStatement, SqlStatement, Statement, UpdateStatement, WithStatement, select, with,
    with_recursive,
};
pub use table::{DerivedTable, Joinable, Table, TableSource, cte};
pub use value::{Param, Value};

#[cfg(feature = "tracing")]
pub use monitor::TracingSqlHook;

#[cfg(feature = "derive")]
pub use sqlweave_derive::Model;
