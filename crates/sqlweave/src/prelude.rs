//! Convenient imports for typical `sqlweave` usage.
//!
//! Brings in the expression families, operators-as-methods, SQL functions,
//! statement constructors and execution traits:
//!
//! ```ignore
//! use sqlweave::prelude::*;
//! ```

pub use crate::expr::*;
pub use crate::{
    Column, ColumnList, Dialect, Executable, GenericClient, Joinable, LockMode, Model, SqlError,
    SqlResult, SqlStatement, Table, Value, cte, hydrate_all, hydrate_one, select, with,
    with_recursive,
};
