use super::*;
use crate::dialect::Dialect;
use crate::value::Value;

fn pg() -> SqlBuilder<'static> {
    SqlBuilder::new(Dialect::postgres())
}

#[test]
fn write_inserts_single_spaces_between_words() {
    let mut out = pg();
    out.write("SELECT");
    out.write("a");
    out.write("FROM");
    out.write("t");
    assert_eq!(out.as_str(), "SELECT a FROM t");
}

#[test]
fn write_skips_space_around_separators() {
    let mut out = pg();
    out.write("COUNT(");
    out.write("t");
    out.write(".");
    out.write("id");
    out.write(")");
    out.write(", ");
    out.write("x");
    out.write("::");
    out.write("text");
    assert_eq!(out.as_str(), "COUNT(t.id), x::text");
}

#[test]
fn write_ignores_empty_tokens() {
    let mut out = pg();
    out.write("a");
    out.write("");
    out.write("b");
    assert_eq!(out.as_str(), "a b");
}

#[test]
fn new_line_applies_indentation() {
    let mut out = pg();
    out.write("SELECT");
    out.indented(|out| {
        out.new_line();
        out.write("a");
        Ok(())
    })
    .unwrap();
    out.new_line();
    out.write("FROM");
    assert_eq!(out.as_str(), "SELECT\n     a\nFROM");
}

#[test]
fn indentation_never_goes_negative() {
    let mut out = pg();
    out.decrease_indent();
    out.increase_indent_by(2);
    out.new_line();
    out.write("x");
    assert_eq!(out.as_str(), "\n  x");
}

#[test]
fn indented_restores_level_on_error() {
    let mut out = pg();
    let err = out
        .indented(|_| Err(crate::error::SqlError::serialize("test", "boom")))
        .unwrap_err();
    assert!(err.is_serialize());
    out.new_line();
    out.write("x");
    assert_eq!(out.as_str(), "\nx");
}

#[test]
fn postgres_placeholders_are_numbered() {
    let mut out = pg();
    out.write("a =");
    out.bind(Value::Int(1));
    out.write("AND b =");
    out.bind(Value::from("x"));
    let built = out.finish();
    assert_eq!(built.sql, "a = $1 AND b = $2;\n");
    assert_eq!(built.args, vec![Value::Int(1), Value::from("x")]);
    assert_eq!(built.arg_count(), 2);
}

#[test]
fn mysql_placeholders_repeat() {
    let mut out = SqlBuilder::new(Dialect::mysql());
    out.bind(Value::Int(1));
    out.write(", ");
    out.bind(Value::Int(2));
    assert_eq!(out.as_str(), "?, ?");
    assert_eq!(out.arg_count(), 2);
}

#[test]
fn debug_mode_inlines_literals() {
    let mut out = SqlBuilder::debug(Dialect::postgres());
    assert!(out.is_debug());
    out.write("name =");
    out.bind(Value::from("it's"));
    out.write("AND n =");
    out.bind(Value::Int(7));
    let built = out.finish();
    assert_eq!(built.sql, "name = 'it''s' AND n = 7;\n");
    assert!(built.args.is_empty());
}

#[test]
fn constants_are_written_inline() {
    let mut out = pg();
    out.write_constant(&Value::Bool(true));
    assert_eq!(out.as_str(), "TRUE");
    assert_eq!(out.arg_count(), 0);
}

#[test]
fn identifiers_are_quoted_per_dialect() {
    let mut out = pg();
    out.write_identifier("users").unwrap();
    out.write(", ");
    out.write_identifier("CamelCase").unwrap();
    out.write(", ");
    out.write_identifier("user").unwrap();
    assert_eq!(out.as_str(), r#"users, "CamelCase", "user""#);

    let mut out = SqlBuilder::new(Dialect::mysql());
    out.write_identifier("CamelCase").unwrap();
    out.write(", ");
    out.write_identifier("user").unwrap();
    assert_eq!(out.as_str(), "`CamelCase`, user");
}

#[test]
fn aliases_are_always_quoted() {
    let mut out = pg();
    out.write("x AS");
    out.write_alias("table1.col1").unwrap();
    assert_eq!(out.as_str(), r#"x AS "table1.col1""#);
}

#[test]
fn empty_identifier_is_rejected() {
    let mut out = pg();
    assert!(out.write_identifier("").unwrap_err().is_serialize());
    assert!(out.write_alias("").unwrap_err().is_serialize());
}

#[test]
fn wrap_adds_parentheses_only_when_asked() {
    let mut out = pg();
    out.wrap(true, |out| {
        out.write("a");
        Ok(())
    })
    .unwrap();
    out.write("AND");
    out.wrap(false, |out| {
        out.write("b");
        Ok(())
    })
    .unwrap();
    assert_eq!(out.as_str(), "(a) AND b");
}

#[test]
fn child_options_reset_wrapping() {
    let opts = SerializeOptions::NO_WRAP;
    assert_eq!(opts.child(), SerializeOptions::DEFAULT);
    assert_eq!(
        SerializeOptions::at(Position::Projection).child().position,
        Position::Default
    );
}

#[test]
fn statement_kind_names() {
    assert_eq!(StatementKind::Select.as_str(), "SELECT");
    assert_eq!(StatementKind::SetOperation.as_str(), "SET OPERATION");
    assert_eq!(StatementKind::Lock.as_str(), "LOCK");
}

#[test]
fn built_sql_displays_its_text() {
    let built = BuiltSql {
        sql: "SELECT 1;\n".to_string(),
        args: vec![Value::Int(1)],
    };
    assert_eq!(built.to_string(), "SELECT 1;\n");
    assert_eq!(built.params_ref().len(), 1);
}
