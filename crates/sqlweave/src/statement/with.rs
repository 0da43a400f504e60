use super::{SqlStatement, Statement};
use crate::column::Projection;
use crate::error::{SqlError, SqlResult};
use crate::sql::{SqlBuilder, StatementKind};
use crate::table::{CteDefinition, DerivedTable};

/// `WITH [RECURSIVE] name AS (...), ... <statement>`
#[derive(Debug, Clone)]
pub struct WithStatement {
    recursive: bool,
    ctes: Vec<CteDefinition>,
    body: Box<Statement>,
}

/// Prefix `body` with common table expressions.
pub fn with(
    ctes: impl IntoIterator<Item = CteDefinition>,
    body: impl Into<Statement>,
) -> WithStatement {
    WithStatement {
        recursive: false,
        ctes: ctes.into_iter().collect(),
        body: Box::new(body.into()),
    }
}

/// `WITH RECURSIVE`
pub fn with_recursive(
    ctes: impl IntoIterator<Item = CteDefinition>,
    body: impl Into<Statement>,
) -> WithStatement {
    WithStatement {
        recursive: true,
        ..with(ctes, body)
    }
}

impl WithStatement {
    pub fn as_table(self, alias: &str) -> DerivedTable {
        DerivedTable::new(Statement::With(self), alias)
    }
}

impl SqlStatement for WithStatement {
    fn kind(&self) -> StatementKind {
        self.body.kind()
    }

    fn projections(&self) -> &[Projection] {
        self.body.projections()
    }

    fn write_sql(&self, out: &mut SqlBuilder<'_>) -> SqlResult<()> {
        if self.ctes.is_empty() {
            return Err(SqlError::serialize("WITH", "no common table expressions"));
        }

        out.new_line();
        out.write(if self.recursive { "WITH RECURSIVE" } else { "WITH" });
        for (i, cte) in self.ctes.iter().enumerate() {
            if i > 0 {
                out.write(",");
                out.new_line();
            }
            cte.table.serialize_head(out)?;
            out.write("AS");
            cte.statement.serialize_nested(out)?;
        }
        self.body.write_sql(out)
    }
}
