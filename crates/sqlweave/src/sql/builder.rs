use crate::dialect::Dialect;
use crate::error::SqlResult;
use crate::expr::Node;
use crate::ident;
use crate::value::Value;

use super::BuiltSql;

/// Spaces added per indentation level.
pub const INDENT_STEP: usize = 5;

/// Statement being serialized; some nodes render differently per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Lock,
    /// UNION / INTERSECT / EXCEPT
    SetOperation,
}

impl StatementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
            StatementKind::Lock => "LOCK",
            StatementKind::SetOperation => "SET OPERATION",
        }
    }
}

/// Where in a statement a node is being written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Position {
    #[default]
    Default,
    /// SELECT / RETURNING list: columns append `AS "alias"`.
    Projection,
    GroupBy,
    /// ORDER BY item: set operations refer to columns by alias.
    OrderBy,
}

/// Per-call-site serialization flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Skip the outermost parentheses of a binary node.
    pub no_wrap: bool,
    pub position: Position,
}

impl SerializeOptions {
    pub const DEFAULT: SerializeOptions = SerializeOptions {
        no_wrap: false,
        position: Position::Default,
    };

    pub const NO_WRAP: SerializeOptions = SerializeOptions {
        no_wrap: true,
        position: Position::Default,
    };

    pub fn at(position: Position) -> Self {
        SerializeOptions {
            no_wrap: false,
            position,
        }
    }

    /// Options handed to children: wrapping is only skipped once.
    pub(crate) fn child(self) -> Self {
        SerializeOptions {
            no_wrap: false,
            position: Position::Default,
        }
    }
}

/// An operand handed to a dialect override.
#[derive(Clone, Copy)]
pub struct Operand<'a> {
    pub(crate) node: &'a Node,
    pub(crate) kind: StatementKind,
}

impl<'a> Operand<'a> {
    pub(crate) fn new(node: &'a Node, kind: StatementKind) -> Self {
        Operand { node, kind }
    }

    /// Write the operand with default options.
    pub fn serialize(&self, out: &mut SqlBuilder<'_>) -> SqlResult<()> {
        self.node.serialize(self.kind, out, SerializeOptions::DEFAULT)
    }

    pub fn serialize_with(&self, out: &mut SqlBuilder<'_>, opts: SerializeOptions) -> SqlResult<()> {
        self.node.serialize(self.kind, out, opts)
    }
}

/// Serializer sink.
pub struct SqlBuilder<'d> {
    dialect: &'d Dialect,
    buf: String,
    args: Vec<Value>,
    indent: usize,
    debug: bool,
}

fn is_pre_separator(c: char) -> bool {
    matches!(c, ' ' | '.' | ',' | '(' | '\n' | ':')
}

fn is_post_separator(c: char) -> bool {
    matches!(c, ' ' | '.' | ',' | ')' | '\n' | ':')
}

impl<'d> SqlBuilder<'d> {
    /// Builder that binds literals as placeholders.
    pub fn new(dialect: &'d Dialect) -> Self {
        Self {
            dialect,
            buf: String::with_capacity(256),
            args: Vec::new(),
            indent: 0,
            debug: false,
        }
    }

    /// Builder that inlines every argument as a literal.
    pub fn debug(dialect: &'d Dialect) -> Self {
        Self {
            debug: true,
            ..Self::new(dialect)
        }
    }

    pub fn dialect(&self) -> &'d Dialect {
        self.dialect
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// SQL written so far.
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// Append a token, inserting one space unless either side is a separator.
    pub fn write(&mut self, token: &str) {
        let Some(first) = token.chars().next() else {
            return;
        };
        if let Some(last) = self.buf.chars().next_back() {
            if !is_pre_separator(last) && !is_post_separator(first) {
                self.buf.push(' ');
            }
        }
        self.buf.push_str(token);
    }

    /// Append an identifier, quoting it when required.
    pub fn write_identifier(&mut self, name: &str) -> SqlResult<()> {
        ident::validate(name)?;
        if ident::needs_quoting(name, self.dialect.reserved()) {
            let mut quoted = String::new();
            ident::push_quoted(&mut quoted, name, self.dialect.quote());
            self.write(&quoted);
        } else {
            self.write(name);
        }
        Ok(())
    }

    /// Append an alias; always quoted.
    pub fn write_alias(&mut self, alias: &str) -> SqlResult<()> {
        ident::validate(alias)?;
        let mut quoted = String::new();
        ident::push_quoted(&mut quoted, alias, self.dialect.quote());
        self.write(&quoted);
        Ok(())
    }

    /// Newline followed by the current indentation.
    pub fn new_line(&mut self) {
        self.buf.push('\n');
        self.buf.extend(std::iter::repeat_n(' ', self.indent));
    }

    pub fn increase_indent(&mut self) {
        self.increase_indent_by(INDENT_STEP);
    }

    pub fn decrease_indent(&mut self) {
        self.decrease_indent_by(INDENT_STEP);
    }

    pub fn increase_indent_by(&mut self, n: usize) {
        self.indent += n;
    }

    pub fn decrease_indent_by(&mut self, n: usize) {
        self.indent = self.indent.saturating_sub(n);
    }

    /// Run `f` one indentation level deeper.
    pub fn indented(
        &mut self,
        f: impl FnOnce(&mut Self) -> SqlResult<()>,
    ) -> SqlResult<()> {
        self.increase_indent();
        let result = f(self);
        self.decrease_indent();
        result
    }

    /// Run `f` between parentheses when `wrap` is set.
    pub fn wrap(
        &mut self,
        wrap: bool,
        f: impl FnOnce(&mut Self) -> SqlResult<()>,
    ) -> SqlResult<()> {
        if wrap {
            self.write("(");
        }
        f(self)?;
        if wrap {
            self.write(")");
        }
        Ok(())
    }

    /// Register an argument and return the token that stands for it.
    ///
    /// In debug mode the token is the inlined literal and nothing is recorded.
    pub fn arg_token(&mut self, value: Value) -> String {
        if self.debug {
            return value.to_literal();
        }
        self.args.push(value);
        self.dialect.placeholder(self.args.len()).into_owned()
    }

    /// Bind `value` as a parametrized argument.
    pub fn bind(&mut self, value: Value) {
        let token = self.arg_token(value);
        self.write(&token);
    }

    /// Inline `value` as a literal constant.
    pub fn write_constant(&mut self, value: &Value) {
        self.write(&value.to_literal());
    }

    /// Terminate the statement.
    pub fn finish(mut self) -> BuiltSql {
        self.buf.push_str(";\n");
        BuiltSql {
            sql: self.buf,
            args: self.args,
        }
    }
}
