use super::OperatorFn;
use crate::error::{SqlError, SqlResult};
use crate::expr::{FamilyKind, op};
use crate::sql::{Operand, SerializeOptions, SqlBuilder};
use std::collections::HashMap;

pub(super) fn operators() -> HashMap<&'static str, OperatorFn> {
    let mut map: HashMap<&'static str, OperatorFn> = HashMap::new();
    map.insert(op::IS_DISTINCT_FROM, is_distinct_from);
    map.insert(op::IS_NOT_DISTINCT_FROM, is_not_distinct_from);
    map.insert(op::CONCAT, concat);
    map.insert(op::BIT_XOR, bit_xor);
    map.insert(op::POW, pow);
    map.insert(op::REGEXP, regexp_case_sensitive);
    map.insert(op::REGEXP_CI, regexp_case_insensitive);
    map.insert(op::NOT_REGEXP, not_regexp_case_sensitive);
    map.insert(op::NOT_REGEXP_CI, not_regexp_case_insensitive);
    map
}

pub(super) fn cast(out: &mut SqlBuilder<'_>, operand: Operand<'_>, target: &str) -> SqlResult<()> {
    out.write("CAST(");
    operand.serialize(out)?;
    out.write("AS");
    out.write(target);
    out.write(")");
    Ok(())
}

/// MySQL only casts to a handful of types; intervals have none and read as `TIME`.
pub(super) fn cast_type(family: FamilyKind) -> &'static str {
    match family {
        FamilyKind::Bool | FamilyKind::Integer => "SIGNED",
        FamilyKind::Float => "DOUBLE",
        FamilyKind::Text => "CHAR",
        FamilyKind::Date => "DATE",
        FamilyKind::Time | FamilyKind::TimeTz | FamilyKind::Interval => "TIME",
        FamilyKind::Timestamp | FamilyKind::TimestampTz => "DATETIME",
        FamilyKind::Bytes => "BINARY",
        FamilyKind::Uuid => "CHAR(36)",
        FamilyKind::Json => "JSON",
    }
}

fn binary<'a, 'b>(
    operator: &'static str,
    operands: &'a [Operand<'b>],
) -> SqlResult<(&'a Operand<'b>, &'a Operand<'b>)> {
    match operands {
        [lhs, rhs] => Ok((lhs, rhs)),
        _ => Err(SqlError::serialize(
            operator,
            format!("expected 2 operands, got {}", operands.len()),
        )),
    }
}

fn is_distinct_from(
    out: &mut SqlBuilder<'_>,
    operands: &[Operand<'_>],
    _opts: SerializeOptions,
) -> SqlResult<()> {
    let (lhs, rhs) = binary(op::IS_DISTINCT_FROM, operands)?;
    out.write("NOT(");
    lhs.serialize(out)?;
    out.write("<=>");
    rhs.serialize(out)?;
    out.write(")");
    Ok(())
}

fn is_not_distinct_from(
    out: &mut SqlBuilder<'_>,
    operands: &[Operand<'_>],
    opts: SerializeOptions,
) -> SqlResult<()> {
    let (lhs, rhs) = binary(op::IS_NOT_DISTINCT_FROM, operands)?;
    out.wrap(!opts.no_wrap, |out| {
        lhs.serialize(out)?;
        out.write("<=>");
        rhs.serialize(out)
    })
}

fn concat(
    out: &mut SqlBuilder<'_>,
    operands: &[Operand<'_>],
    _opts: SerializeOptions,
) -> SqlResult<()> {
    let (lhs, rhs) = binary(op::CONCAT, operands)?;
    out.write("CONCAT(");
    lhs.serialize(out)?;
    out.write(", ");
    rhs.serialize(out)?;
    out.write(")");
    Ok(())
}

fn bit_xor(
    out: &mut SqlBuilder<'_>,
    operands: &[Operand<'_>],
    opts: SerializeOptions,
) -> SqlResult<()> {
    let (lhs, rhs) = binary(op::BIT_XOR, operands)?;
    out.wrap(!opts.no_wrap, |out| {
        lhs.serialize(out)?;
        out.write("^");
        rhs.serialize(out)
    })
}

fn pow(out: &mut SqlBuilder<'_>, operands: &[Operand<'_>], _opts: SerializeOptions) -> SqlResult<()> {
    let (lhs, rhs) = binary(op::POW, operands)?;
    out.write("POW(");
    lhs.serialize(out)?;
    out.write(", ");
    rhs.serialize(out)?;
    out.write(")");
    Ok(())
}

fn regexp_like(
    out: &mut SqlBuilder<'_>,
    operator: &'static str,
    operands: &[Operand<'_>],
    opts: SerializeOptions,
    negated: bool,
    match_type: &str,
) -> SqlResult<()> {
    let (lhs, rhs) = binary(operator, operands)?;
    let body = |out: &mut SqlBuilder<'_>| -> SqlResult<()> {
        if negated {
            out.write("NOT");
        }
        out.write("REGEXP_LIKE(");
        lhs.serialize(out)?;
        out.write(", ");
        rhs.serialize(out)?;
        out.write(", ");
        out.write(match_type);
        out.write(")");
        Ok(())
    };
    if negated {
        out.wrap(!opts.no_wrap, body)
    } else {
        body(out)
    }
}

fn regexp_case_sensitive(
    out: &mut SqlBuilder<'_>,
    operands: &[Operand<'_>],
    opts: SerializeOptions,
) -> SqlResult<()> {
    regexp_like(out, op::REGEXP, operands, opts, false, "'c'")
}

fn regexp_case_insensitive(
    out: &mut SqlBuilder<'_>,
    operands: &[Operand<'_>],
    opts: SerializeOptions,
) -> SqlResult<()> {
    regexp_like(out, op::REGEXP_CI, operands, opts, false, "'i'")
}

fn not_regexp_case_sensitive(
    out: &mut SqlBuilder<'_>,
    operands: &[Operand<'_>],
    opts: SerializeOptions,
) -> SqlResult<()> {
    regexp_like(out, op::NOT_REGEXP, operands, opts, true, "'c'")
}

fn not_regexp_case_insensitive(
    out: &mut SqlBuilder<'_>,
    operands: &[Operand<'_>],
    opts: SerializeOptions,
) -> SqlResult<()> {
    regexp_like(out, op::NOT_REGEXP_CI, operands, opts, true, "'i'")
}
