use super::family::FamilyKind;
use crate::column::{ColumnRef, OrderBy};
use crate::error::{SqlError, SqlResult};
use crate::sql::{Operand, SerializeOptions, SqlBuilder, StatementKind};
use crate::statement::Statement;
use crate::value::Value;
use std::borrow::Cow;
use std::sync::Arc;

/// Untyped expression tree node.
///
/// Immutable once built; parents share children through `Arc`.
#[derive(Debug, Clone)]
pub(crate) enum Node {
    Literal {
        value: Value,
        constant: bool,
    },
    Keyword(&'static str),
    Column(ColumnRef),
    Binary {
        lhs: Arc<Node>,
        op: &'static str,
        rhs: Arc<Node>,
    },
    Prefix {
        op: &'static str,
        operand: Arc<Node>,
    },
    Postfix {
        operand: Arc<Node>,
        op: &'static str,
    },
    Between {
        operand: Arc<Node>,
        low: Arc<Node>,
        high: Arc<Node>,
        negated: bool,
    },
    Func(Arc<FuncCall>),
    Cast {
        operand: Arc<Node>,
        target: CastTarget,
    },
    SubQuery(Arc<Statement>),
    Case(Arc<CaseNode>),
    Raw(Arc<RawNode>),
    /// Parenthesized, comma-separated list.
    List(Vec<Arc<Node>>),
    /// Nodes written one after another with normal spacing.
    Seq(Vec<Arc<Node>>),
    Over {
        call: Arc<Node>,
        window: Arc<Window>,
    },
}

/// Type named by a cast: a family resolved per dialect, or verbatim SQL.
#[derive(Debug, Clone)]
pub(crate) enum CastTarget {
    Family(FamilyKind),
    Named(Cow<'static, str>),
}

#[derive(Debug, Clone)]
pub(crate) struct FuncCall {
    pub name: Cow<'static, str>,
    pub args: Vec<Arc<Node>>,
    pub distinct: bool,
    /// `CURRENT_DATE` style functions take no parentheses when called bare.
    pub omit_empty_parens: bool,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct CaseNode {
    pub operand: Option<Arc<Node>>,
    pub whens: Vec<Arc<Node>>,
    pub thens: Vec<Arc<Node>>,
    pub otherwise: Option<Arc<Node>>,
}

#[derive(Debug, Clone)]
pub(crate) struct RawNode {
    pub sql: String,
    pub args: Vec<(String, Value)>,
}

/// `OVER (...)` specification.
#[derive(Debug, Clone, Default)]
pub struct Window {
    pub(crate) partition_by: Vec<Arc<Node>>,
    pub(crate) order_by: Vec<OrderBy>,
}

impl Node {
    pub(crate) fn literal(value: impl Into<Value>) -> Node {
        Node::Literal {
            value: value.into(),
            constant: false,
        }
    }

    pub(crate) fn constant(value: impl Into<Value>) -> Node {
        Node::Literal {
            value: value.into(),
            constant: true,
        }
    }

    pub(crate) fn binary(lhs: Arc<Node>, op: &'static str, rhs: Arc<Node>) -> Node {
        Node::Binary { lhs, op, rhs }
    }

    pub(crate) fn func(name: impl Into<Cow<'static, str>>, args: Vec<Arc<Node>>) -> Node {
        Node::Func(Arc::new(FuncCall {
            name: name.into(),
            args,
            distinct: false,
            omit_empty_parens: false,
        }))
    }

    pub(crate) fn as_column(&self) -> Option<&ColumnRef> {
        match self {
            Node::Column(c) => Some(c),
            _ => None,
        }
    }

    pub(crate) fn serialize(
        &self,
        kind: StatementKind,
        out: &mut SqlBuilder<'_>,
        opts: SerializeOptions,
    ) -> SqlResult<()> {
        match self {
            Node::Literal { value, constant } => {
                if *constant {
                    out.write_constant(value);
                } else {
                    out.bind(value.clone());
                }
                Ok(())
            }
            Node::Keyword(kw) => {
                out.write(kw);
                Ok(())
            }
            Node::Column(column) => column.serialize(kind, out, opts),
            Node::Binary { lhs, op, rhs } => {
                if let Some(f) = out.dialect().operator_override(op) {
                    let operands = [Operand::new(lhs, kind), Operand::new(rhs, kind)];
                    return f(out, &operands, opts);
                }
                out.wrap(!opts.no_wrap, |out| {
                    lhs.serialize(kind, out, opts.child())?;
                    out.write(op);
                    rhs.serialize(kind, out, opts.child())
                })
            }
            Node::Prefix { op, operand } => out.wrap(!opts.no_wrap, |out| {
                out.write(op);
                operand.serialize(kind, out, opts.child())
            }),
            Node::Postfix { operand, op } => {
                operand.serialize(kind, out, opts.child())?;
                out.write(op);
                Ok(())
            }
            Node::Between {
                operand,
                low,
                high,
                negated,
            } => out.wrap(!opts.no_wrap, |out| {
                operand.serialize(kind, out, opts.child())?;
                out.write(if *negated { "NOT BETWEEN" } else { "BETWEEN" });
                low.serialize(kind, out, opts.child())?;
                out.write("AND");
                high.serialize(kind, out, opts.child())
            }),
            Node::Func(call) => call.serialize(kind, out),
            Node::Cast { operand, target } => {
                let target: &str = match target {
                    CastTarget::Family(family) => out.dialect().cast_type(*family),
                    CastTarget::Named(name) => name.as_ref(),
                };
                if target.trim().is_empty() {
                    return Err(SqlError::serialize("CAST", "target type is empty"));
                }
                if let Some(f) = out.dialect().cast_override() {
                    return f(out, Operand::new(operand, kind), target);
                }
                operand.serialize(kind, out, opts.child())?;
                out.write("::");
                out.write(target);
                Ok(())
            }
            Node::SubQuery(statement) => statement.serialize_nested(out),
            Node::Case(case) => case.serialize(kind, out),
            Node::Raw(raw) => raw.serialize(out),
            Node::List(items) => {
                if items.is_empty() {
                    return Err(SqlError::serialize("list", "value list is empty"));
                }
                out.write("(");
                serialize_list(items, kind, out)?;
                out.write(")");
                Ok(())
            }
            Node::Seq(items) => {
                for item in items {
                    item.serialize(kind, out, opts.child())?;
                }
                Ok(())
            }
            Node::Over { call, window } => {
                call.serialize(kind, out, opts.child())?;
                out.write("OVER (");
                window.serialize(kind, out)?;
                out.write(")");
                Ok(())
            }
        }
    }
}

/// Comma-separated nodes, no surrounding parentheses.
pub(crate) fn serialize_list(
    items: &[Arc<Node>],
    kind: StatementKind,
    out: &mut SqlBuilder<'_>,
) -> SqlResult<()> {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.write(", ");
        }
        item.serialize(kind, out, SerializeOptions::DEFAULT)?;
    }
    Ok(())
}

impl FuncCall {
    fn serialize(&self, kind: StatementKind, out: &mut SqlBuilder<'_>) -> SqlResult<()> {
        if self.name.trim().is_empty() {
            return Err(SqlError::serialize("function call", "function name is empty"));
        }
        if self.args.is_empty() && self.omit_empty_parens {
            out.write(&self.name);
            return Ok(());
        }
        out.write(&format!("{}(", self.name));
        if self.distinct {
            out.write("DISTINCT");
        }
        serialize_list(&self.args, kind, out)?;
        out.write(")");
        Ok(())
    }
}

impl CaseNode {
    fn serialize(&self, kind: StatementKind, out: &mut SqlBuilder<'_>) -> SqlResult<()> {
        if self.whens.is_empty() {
            return Err(SqlError::serialize(
                "CASE",
                "at least one WHEN clause is required",
            ));
        }
        if self.whens.len() != self.thens.len() {
            return Err(SqlError::serialize(
                "CASE",
                format!(
                    "WHEN/THEN arm count mismatch ({} WHEN, {} THEN)",
                    self.whens.len(),
                    self.thens.len()
                ),
            ));
        }

        out.write("(CASE");
        if let Some(operand) = &self.operand {
            operand.serialize(kind, out, SerializeOptions::DEFAULT)?;
        }
        for (when, then) in self.whens.iter().zip(&self.thens) {
            out.write("WHEN");
            when.serialize(kind, out, SerializeOptions::NO_WRAP)?;
            out.write("THEN");
            then.serialize(kind, out, SerializeOptions::NO_WRAP)?;
        }
        if let Some(otherwise) = &self.otherwise {
            out.write("ELSE");
            otherwise.serialize(kind, out, SerializeOptions::NO_WRAP)?;
        }
        out.write("END)");
        Ok(())
    }
}

impl RawNode {
    /// Substitute named arguments in order of appearance.
    fn serialize(&self, out: &mut SqlBuilder<'_>) -> SqlResult<()> {
        let mut names: Vec<(usize, &str)> = self
            .args
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (i, name.as_str()))
            .collect();
        if let Some((_, empty)) = names.iter().find(|(_, n)| n.is_empty()) {
            return Err(SqlError::serialize(
                "raw",
                format!("argument name {empty:?} is empty"),
            ));
        }
        // Longest names first so `:id` never shadows `:id2`.
        names.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

        let mut used = vec![false; self.args.len()];
        let mut text = String::with_capacity(self.sql.len());
        let mut rest = self.sql.as_str();
        'scan: while let Some(ch) = rest.chars().next() {
            for &(idx, name) in &names {
                if rest.starts_with(name) {
                    text.push_str(&out.arg_token(self.args[idx].1.clone()));
                    used[idx] = true;
                    rest = &rest[name.len()..];
                    continue 'scan;
                }
            }
            text.push(ch);
            rest = &rest[ch.len_utf8()..];
        }

        if let Some(idx) = used.iter().position(|u| !u) {
            return Err(SqlError::serialize(
                "raw",
                format!("argument {:?} does not appear in the fragment", self.args[idx].0),
            ));
        }

        out.write(&text);
        Ok(())
    }
}

impl Window {
    fn serialize(&self, kind: StatementKind, out: &mut SqlBuilder<'_>) -> SqlResult<()> {
        if !self.partition_by.is_empty() {
            out.write("PARTITION BY");
            serialize_list(&self.partition_by, kind, out)?;
        }
        if !self.order_by.is_empty() {
            out.write("ORDER BY");
            for (i, item) in self.order_by.iter().enumerate() {
                if i > 0 {
                    out.write(", ");
                }
                item.serialize(kind, out)?;
            }
        }
        Ok(())
    }
}
