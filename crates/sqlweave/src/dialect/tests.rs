use super::*;
use crate::expr::op;
use crate::sql::StatementKind;

#[test]
fn builtin_dialects() {
    let pg = Dialect::postgres();
    assert_eq!(pg.name(), "postgres");
    assert_eq!(pg.placeholder(3), "$3");
    assert_eq!(pg.quote(), '"');
    assert!(pg.cast_override().is_none());
    assert!(pg.operator_override(op::CONCAT).is_none());

    let my = Dialect::mysql();
    assert_eq!(my.name(), "mysql");
    assert_eq!(my.placeholder(3), "?");
    assert_eq!(my.quote(), '`');
    assert!(my.cast_override().is_some());
    assert!(my.operator_override(op::CONCAT).is_some());
    assert!(my.operator_override(op::EQ).is_none());
}

#[test]
fn reserved_words_differ() {
    assert!(Dialect::postgres().is_reserved("user"));
    assert!(!Dialect::mysql().is_reserved("user"));
    assert!(Dialect::mysql().is_reserved("key"));
}

#[test]
fn builtins_are_shared() {
    assert!(std::ptr::eq(Dialect::postgres(), Dialect::postgres()));
    assert_ne!(Dialect::postgres(), Dialect::mysql());
}

fn colon_placeholder(index: usize) -> Cow<'static, str> {
    Cow::Owned(format!(":p{index}"))
}

fn spaceship(
    out: &mut SqlBuilder<'_>,
    operands: &[Operand<'_>],
    _opts: SerializeOptions,
) -> SqlResult<()> {
    operands[0].serialize(out)?;
    out.write("<=>");
    operands[1].serialize(out)
}

#[test]
fn builder_derives_a_custom_dialect() {
    let custom = Dialect::builder(Dialect::mysql())
        .name("custom")
        .placeholder(colon_placeholder)
        .quote('"')
        .without_operator(op::CONCAT)
        .operator(op::EQ, spaceship)
        .cast(None)
        .build();

    assert_eq!(custom.name(), "custom");
    assert_eq!(custom.placeholder(2), ":p2");
    assert_eq!(custom.quote(), '"');
    assert!(custom.operator_override(op::CONCAT).is_none());
    assert!(custom.operator_override(op::EQ).is_some());
    assert!(custom.cast_override().is_none());

    // the base is untouched
    assert!(Dialect::mysql().operator_override(op::CONCAT).is_some());
}

#[test]
fn custom_operator_is_used_by_the_serializer() {
    use crate::expr::{Expr, lit};

    let custom = Dialect::builder(Dialect::postgres())
        .operator(op::EQ, spaceship)
        .build();
    let e: Expr<crate::expr::Bool> = lit::int(1).eq(lit::constant_int(2));
    let mut out = SqlBuilder::new(&custom);
    e.node
        .serialize(StatementKind::Select, &mut out, SerializeOptions::DEFAULT)
        .unwrap();
    assert_eq!(out.as_str(), "$1 <=> 2");
}

#[test]
fn mysql_rewrites_operators() {
    use crate::expr::{Expr, Text, lit};

    let cases: Vec<(Expr<crate::expr::Bool>, &str)> = vec![
        (
            lit::constant_int(1).is_distinct_from(lit::constant_int(2)),
            "NOT(1 <=> 2)",
        ),
        (
            lit::constant_int(1).is_not_distinct_from(lit::constant_int(2)),
            "(1 <=> 2)",
        ),
        (
            lit::constant_text("a").regexp_like(lit::constant_text("^a"), false),
            "REGEXP_LIKE('a', '^a', 'i')",
        ),
        (
            lit::constant_text("a").not_regexp_like(lit::constant_text("^a"), true),
            "(NOT REGEXP_LIKE('a', '^a', 'c'))",
        ),
    ];
    for (expr, expected) in cases {
        let mut out = SqlBuilder::new(Dialect::mysql());
        expr.node
            .serialize(StatementKind::Select, &mut out, SerializeOptions::DEFAULT)
            .unwrap();
        assert_eq!(out.as_str(), expected);
    }

    let concat: Expr<Text> = lit::constant_text("a").concat(lit::constant_text("b"));
    let mut out = SqlBuilder::new(Dialect::mysql());
    concat
        .node
        .serialize(StatementKind::Select, &mut out, SerializeOptions::DEFAULT)
        .unwrap();
    assert_eq!(out.as_str(), "CONCAT('a', 'b')");
}

#[test]
fn mysql_casts_use_cast_syntax() {
    use crate::expr::{Expr, Integer, cast, lit};

    let e: Expr<Integer> = cast(lit::constant_text("7")).as_("SIGNED");
    let mut out = SqlBuilder::new(Dialect::mysql());
    e.node
        .serialize(StatementKind::Select, &mut out, SerializeOptions::DEFAULT)
        .unwrap();
    assert_eq!(out.as_str(), "CAST('7' AS SIGNED)");
}

#[test]
fn mysql_family_casts_use_mysql_types() {
    use crate::expr::{Expr, cast, lit};

    fn mysql_sql<F>(e: Expr<F>) -> String {
        let mut out = SqlBuilder::new(Dialect::mysql());
        e.node
            .serialize(StatementKind::Select, &mut out, SerializeOptions::DEFAULT)
            .unwrap();
        out.as_str().to_string()
    }

    let seven = || lit::constant_int(7);
    assert_eq!(mysql_sql(cast(lit::constant_text("7")).as_integer()), "CAST('7' AS SIGNED)");
    assert_eq!(mysql_sql(cast(seven()).as_bool()), "CAST(7 AS SIGNED)");
    assert_eq!(mysql_sql(cast(seven()).as_text()), "CAST(7 AS CHAR)");
    assert_eq!(mysql_sql(cast(seven()).as_float()), "CAST(7 AS DOUBLE)");
    assert_eq!(mysql_sql(cast(seven()).as_date()), "CAST(7 AS DATE)");
    assert_eq!(mysql_sql(cast(seven()).as_time()), "CAST(7 AS TIME)");
    assert_eq!(mysql_sql(cast(seven()).as_interval()), "CAST(7 AS TIME)");
    assert_eq!(mysql_sql(cast(seven()).as_timestamp()), "CAST(7 AS DATETIME)");
    assert_eq!(mysql_sql(cast(seven()).as_timestamptz()), "CAST(7 AS DATETIME)");
    assert_eq!(mysql_sql(cast(seven()).as_bytes()), "CAST(7 AS BINARY)");
    assert_eq!(mysql_sql(cast(seven()).as_uuid()), "CAST(7 AS CHAR(36))");
    assert_eq!(mysql_sql(cast(lit::constant_text("{}")).as_json()), "CAST('{}' AS JSON)");

    // verbatim targets are left alone
    let e: Expr<crate::expr::Text> = cast(seven()).as_("CHAR(4)");
    assert_eq!(mysql_sql(e), "CAST(7 AS CHAR(4))");
}

#[test]
fn custom_cast_type_mapping() {
    use crate::expr::{Expr, FamilyKind, cast, lit};

    fn sqlite_type(family: FamilyKind) -> &'static str {
        match family {
            FamilyKind::Integer | FamilyKind::Bool => "INTEGER",
            FamilyKind::Float => "REAL",
            FamilyKind::Bytes => "BLOB",
            _ => "TEXT",
        }
    }

    let custom = Dialect::builder(Dialect::postgres())
        .name("sqlite")
        .cast_type(sqlite_type)
        .build();
    assert_eq!(custom.cast_type(FamilyKind::Float), "REAL");
    assert_eq!(Dialect::postgres().cast_type(FamilyKind::Float), "double precision");

    let e: Expr<crate::expr::Integer> = cast(lit::constant_text("7")).as_integer();
    let mut out = SqlBuilder::new(&custom);
    e.node
        .serialize(StatementKind::Select, &mut out, SerializeOptions::DEFAULT)
        .unwrap();
    assert_eq!(out.as_str(), "'7'::INTEGER");
}

#[test]
fn equality_covers_formatting_rules() {
    let same = Dialect::builder(Dialect::postgres()).build();
    assert_eq!(&same, Dialect::postgres());

    let numbered_differently = Dialect::builder(Dialect::postgres())
        .placeholder(colon_placeholder)
        .build();
    assert_ne!(&numbered_differently, Dialect::postgres());

    let quoted_differently = Dialect::builder(Dialect::postgres()).quote('`').build();
    assert_ne!(&quoted_differently, Dialect::postgres());

    let without_concat = Dialect::builder(Dialect::mysql())
        .without_operator(op::CONCAT)
        .build();
    assert_ne!(&without_concat, Dialect::mysql());

    let without_cast = Dialect::builder(Dialect::mysql()).cast(None).build();
    assert_ne!(&without_cast, Dialect::mysql());
}
