//! Typed SQL expressions.
//!
//! Every expression is an immutable tree of nodes. [`Expr<F>`] wraps a tree
//! with a scalar family tag `F` ([`Integer`], [`Text`], ...), so comparing an
//! integer column with a string is a compile error while the serializer only
//! ever sees untyped nodes. Composition never mutates: `a.eq(b)` returns a new
//! parent node sharing `a` and `b`.
//!
//! # Example
//!
//! ```ignore
//! use sqlweave::prelude::*;
//!
//! let cond = users.age.gt_eq(18).and(users.name.like("a%"));
//! let total = sum(&orders.amount).as_("total");
//! ```

mod case;
mod cast;
mod family;
mod func;
mod literal;
mod node;
mod raw;
mod typed;
mod window;


pub use case::{Case, case, case_on};
pub use cast::{Cast, cast};
pub use family::{
    Bool, Bytes, Date, Family, FamilyKind, Float, Integer, Interval, Json, Numeric, Ordered,
    Temporal, Text, Time, TimeTz, Timestamp, TimestampTz, Uuid,
};
pub use func::*;
pub use literal::lit;
pub use raw::{raw, raw_with};
pub use typed::{AnyExpr, Expr, IntoAnyExpr, IntoExpr, IntoExprList};
pub use window::window;

pub use node::Window;
pub(crate) use node::{Node, serialize_list};

/// Operator tokens.
///
/// Dialect overrides are keyed by these constants, so a custom dialect can
/// replace the emission of any binary operator.
pub mod op {
    pub const EQ: &str = "=";
    pub const NOT_EQ: &str = "!=";
    pub const LT: &str = "<";
    pub const LT_EQ: &str = "<=";
    pub const GT: &str = ">";
    pub const GT_EQ: &str = ">=";
    pub const IS_DISTINCT_FROM: &str = "IS DISTINCT FROM";
    pub const IS_NOT_DISTINCT_FROM: &str = "IS NOT DISTINCT FROM";
    pub const IN: &str = "IN";
    pub const NOT_IN: &str = "NOT IN";

    pub const AND: &str = "AND";
    pub const OR: &str = "OR";
    pub const NOT: &str = "NOT";

    pub const ADD: &str = "+";
    pub const SUB: &str = "-";
    pub const MUL: &str = "*";
    pub const DIV: &str = "/";
    pub const MOD: &str = "%";
    pub const POW: &str = "^";
    pub const NEG: &str = "-";

    pub const BIT_AND: &str = "&";
    pub const BIT_OR: &str = "|";
    pub const BIT_XOR: &str = "#";
    pub const BIT_NOT: &str = "~";
    pub const SHL: &str = "<<";
    pub const SHR: &str = ">>";

    pub const CONCAT: &str = "||";
    pub const LIKE: &str = "LIKE";
    pub const NOT_LIKE: &str = "NOT LIKE";
    pub const REGEXP: &str = "~";
    pub const REGEXP_CI: &str = "~*";
    pub const NOT_REGEXP: &str = "!~";
    pub const NOT_REGEXP_CI: &str = "!~*";

    pub const IS_NULL: &str = "IS NULL";
    pub const IS_NOT_NULL: &str = "IS NOT NULL";
    pub const IS_TRUE: &str = "IS TRUE";
    pub const IS_FALSE: &str = "IS FALSE";
    pub const IS_UNKNOWN: &str = "IS UNKNOWN";
}
