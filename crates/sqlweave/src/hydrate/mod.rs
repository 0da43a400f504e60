//! Nested result hydration.
//!
//! A join-shaped row set is folded into a graph of [`Model`] records. Every
//! destination level is matched to result columns by `prefix.field` name, and
//! rows sharing a level's primary-key cells are merged into one record: the
//! record's own scalars are taken from the first row, later rows only extend
//! its collections.
//!
//! ```ignore
//! #[derive(Default, Model)]
//! struct Artist {
//!     #[sqlweave(primary_key)]
//!     id: i64,
//!     name: String,
//!     #[sqlweave(nested)]
//!     albums: Vec<Album>,
//! }
//!
//! let rows = client.query(&built.sql, &built.args).await?;
//! let artists: Vec<Artist> = hydrate_all(&rows)?;
//! ```
//!
//! Column lookup is case-insensitive. Cells that are NULL never overwrite a
//! field, and a nested record none of whose cells were assigned is discarded,
//! so outer-joined rows without a match do not fabricate empty children.

mod convert;
mod model;
mod plan;
mod rowset;
mod scanner;


pub use convert::{ConvertError, FromValue, assign_scalar, collect_scalar};
pub use model::{
    Cardinality, FieldDesc, FieldKind, ManySlot, Model, ModelDesc, Nested, OptionalSlot, Record,
};
pub use rowset::{ColumnMeta, RowSet};
pub use scanner::Scanner;

pub(crate) use rowset::decode_row;

use crate::error::SqlResult;

/// Hydrate every row of `rows` into `Vec<T>`.
pub fn hydrate_all<T: Model>(rows: &RowSet) -> SqlResult<Vec<T>> {
    let mut scanner = Scanner::<T>::new(&rows.columns);
    for row in &rows.rows {
        scanner.push(row)?;
    }
    Ok(scanner.finish())
}

/// First record hydrated from `rows`, if any.
///
/// All rows are consumed so the record's collections are complete.
pub fn hydrate_one<T: Model>(rows: &RowSet) -> SqlResult<Option<T>> {
    Ok(hydrate_all::<T>(rows)?.into_iter().next())
}
