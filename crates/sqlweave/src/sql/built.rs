use crate::value::Value;
use std::fmt;
use tokio_postgres::types::ToSql;

/// A serialized statement: SQL text plus its positional arguments.
///
/// Immutable once produced; safe to share across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltSql {
    /// SQL text, always terminated by `;\n`.
    pub sql: String,
    /// Arguments in placeholder order.
    pub args: Vec<Value>,
}

impl BuiltSql {
    /// Arguments as references for tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.args.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
    }

    pub fn arg_count(&self) -> usize {
        self.args.len()
    }
}

impl fmt::Display for BuiltSql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}
