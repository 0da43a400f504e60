use crate::error::SqlResult;
use crate::value::Value;
use tokio_postgres::Row;

/// Name and declared source type of a result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    pub name: String,
    pub type_name: String,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        ColumnMeta {
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    pub(crate) fn from_pg(column: &tokio_postgres::Column) -> Self {
        ColumnMeta::new(column.name(), column.type_().name())
    }
}

/// A materialized, driver-independent result: column metadata plus rows of
/// decoded values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    pub columns: Vec<ColumnMeta>,
    pub rows: Vec<Vec<Value>>,
}

impl RowSet {
    pub fn new(columns: Vec<ColumnMeta>) -> Self {
        RowSet {
            columns,
            rows: Vec::new(),
        }
    }

    /// Column metadata from bare names, with unknown source types.
    pub fn with_column_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(names.into_iter().map(|n| ColumnMeta::new(n, "")).collect())
    }

    /// Append a row; cells are in column order.
    pub fn push(&mut self, row: Vec<Value>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first column named `name` (case-insensitive).
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Cell of `row` in column `name`.
    pub fn get(&self, row: usize, name: &str) -> Option<&Value> {
        let column = self.column_index(name)?;
        self.rows.get(row)?.get(column)
    }

    /// Decode tokio-postgres rows.
    pub fn from_pg_rows(rows: &[Row]) -> SqlResult<Self> {
        let Some(first) = rows.first() else {
            return Ok(RowSet::default());
        };
        let mut set = RowSet::new(first.columns().iter().map(ColumnMeta::from_pg).collect());
        set.rows.reserve(rows.len());
        for row in rows {
            set.rows.push(decode_row(row)?);
        }
        Ok(set)
    }
}

/// Decode every cell of a tokio-postgres row.
pub(crate) fn decode_row(row: &Row) -> SqlResult<Vec<Value>> {
    (0..row.len()).map(|i| Value::from_pg_row(row, i)).collect()
}
