use super::node::{Node, RawNode};
use super::typed::Expr;
use crate::value::Value;
use std::sync::Arc;

/// Verbatim SQL fragment of family `F`.
pub fn raw<F>(sql: impl Into<String>) -> Expr<F> {
    raw_with(sql, std::iter::empty::<(String, Value)>())
}

/// SQL fragment with named arguments.
///
/// Every occurrence of a name (`:id`, `#limit`, any token) becomes a bound
/// placeholder. A name that never occurs fails serialization.
///
/// ```ignore
/// let e: Expr<Bool> = raw_with("age > :min AND age < :max", [(":min", 18), (":max", 65)]);
/// ```
pub fn raw_with<F, I, K, V>(sql: impl Into<String>, args: I) -> Expr<F>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    Expr::from_node(Node::Raw(Arc::new(RawNode {
        sql: sql.into(),
        args: args
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect(),
    })))
}
