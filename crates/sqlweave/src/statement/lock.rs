use super::SqlStatement;
use crate::error::{SqlError, SqlResult};
use crate::sql::{SqlBuilder, StatementKind};
use crate::table::Table;

/// Table lock modes: the eight Postgres modes plus MySQL's READ / WRITE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockMode {
    AccessShare,
    RowShare,
    RowExclusive,
    ShareUpdateExclusive,
    Share,
    ShareRowExclusive,
    Exclusive,
    #[default]
    AccessExclusive,
    /// MySQL `LOCK TABLES t READ`
    Read,
    /// MySQL `LOCK TABLES t WRITE`
    Write,
}

impl LockMode {
    pub fn as_str(self) -> &'static str {
        match self {
            LockMode::AccessShare => "ACCESS SHARE",
            LockMode::RowShare => "ROW SHARE",
            LockMode::RowExclusive => "ROW EXCLUSIVE",
            LockMode::ShareUpdateExclusive => "SHARE UPDATE EXCLUSIVE",
            LockMode::Share => "SHARE",
            LockMode::ShareRowExclusive => "SHARE ROW EXCLUSIVE",
            LockMode::Exclusive => "EXCLUSIVE",
            LockMode::AccessExclusive => "ACCESS EXCLUSIVE",
            LockMode::Read => "READ",
            LockMode::Write => "WRITE",
        }
    }

    fn is_mysql(self) -> bool {
        matches!(self, LockMode::Read | LockMode::Write)
    }
}

/// `LOCK TABLE t [, ...] IN <mode> MODE [NOWAIT]` / `LOCK TABLES t READ|WRITE`.
#[derive(Debug, Clone)]
pub struct LockStatement {
    tables: Vec<Table>,
    mode: Option<LockMode>,
    nowait: bool,
}

impl LockStatement {
    pub(crate) fn new(tables: Vec<Table>) -> Self {
        LockStatement {
            tables,
            mode: None,
            nowait: false,
        }
    }

    /// Lock several tables at once.
    pub fn tables(tables: impl IntoIterator<Item = Table>) -> Self {
        Self::new(tables.into_iter().collect())
    }

    pub fn in_(mut self, mode: LockMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn nowait(mut self) -> Self {
        self.nowait = true;
        self
    }
}

impl SqlStatement for LockStatement {
    fn kind(&self) -> StatementKind {
        StatementKind::Lock
    }

    fn write_sql(&self, out: &mut SqlBuilder<'_>) -> SqlResult<()> {
        if self.tables.is_empty() {
            return Err(SqlError::serialize("LOCK", "no tables to lock"));
        }

        out.new_line();
        match self.mode {
            Some(mode) if mode.is_mysql() => {
                if self.nowait {
                    return Err(SqlError::serialize(
                        "LOCK",
                        "NOWAIT is not supported with READ/WRITE locks",
                    ));
                }
                out.write("LOCK TABLES");
                for (i, table) in self.tables.iter().enumerate() {
                    if i > 0 {
                        out.write(", ");
                    }
                    table.serialize(out)?;
                    out.write(mode.as_str());
                }
            }
            mode => {
                out.write("LOCK TABLE");
                for (i, table) in self.tables.iter().enumerate() {
                    if i > 0 {
                        out.write(", ");
                    }
                    table.serialize(out)?;
                }
                if let Some(mode) = mode {
                    out.write("IN");
                    out.write(mode.as_str());
                    out.write("MODE");
                }
                if self.nowait {
                    out.write("NOWAIT");
                }
            }
        }
        Ok(())
    }
}
