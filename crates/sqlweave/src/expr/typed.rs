use super::family::{Bool, Family, Integer, Interval, Numeric, Ordered, Temporal, Text};
use super::node::{Node, Window};
use super::op;
use crate::column::{OrderBy, Projection};
use crate::statement::Statement;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// An expression of scalar family `F`.
///
/// Cheap to clone; the tree underneath is shared and never mutated.
pub struct Expr<F> {
    pub(crate) node: Arc<Node>,
    _family: PhantomData<fn() -> F>,
}

impl<F> Clone for Expr<F> {
    fn clone(&self) -> Self {
        Self::from_arc(self.node.clone())
    }
}

impl<F> fmt::Debug for Expr<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Expr")
            .field(&std::any::type_name::<F>())
            .field(&self.node)
            .finish()
    }
}

/// Conversion into an expression of family `F`.
///
/// Implemented by expressions, columns and Rust scalars (which become
/// parametrized literals).
pub trait IntoExpr<F> {
    fn into_expr(self) -> Expr<F>;
}

impl<F> IntoExpr<F> for Expr<F> {
    fn into_expr(self) -> Expr<F> {
        self
    }
}

impl<F> IntoExpr<F> for &Expr<F> {
    fn into_expr(self) -> Expr<F> {
        self.clone()
    }
}

impl<F> Expr<F> {
    pub(crate) fn from_node(node: Node) -> Self {
        Self::from_arc(Arc::new(node))
    }

    pub(crate) fn from_arc(node: Arc<Node>) -> Self {
        Expr {
            node,
            _family: PhantomData,
        }
    }

    fn binary<G>(&self, op: &'static str, rhs: Arc<Node>) -> Expr<G> {
        Expr::from_node(Node::binary(self.node.clone(), op, rhs))
    }

    fn postfix<G>(&self, op: &'static str) -> Expr<G> {
        Expr::from_node(Node::Postfix {
            operand: self.node.clone(),
            op,
        })
    }

    /// Re-declare this expression as family `G` without emitting a cast.
    pub fn retype<G>(self) -> Expr<G> {
        Expr::from_arc(self.node)
    }

    /// Forget the family.
    pub fn any(&self) -> AnyExpr {
        AnyExpr(self.node.clone())
    }

    /// Projection under an explicit alias: `expr AS "alias"`.
    pub fn as_(&self, alias: impl Into<String>) -> Projection {
        Projection::aliased(self.node.clone(), alias.into())
    }

    pub fn asc(&self) -> OrderBy {
        OrderBy::new(self.node.clone()).asc()
    }

    pub fn desc(&self) -> OrderBy {
        OrderBy::new(self.node.clone()).desc()
    }

    /// Window function call: `expr OVER (...)`.
    pub fn over(&self, window: Window) -> Expr<F> {
        Expr::from_node(Node::Over {
            call: self.node.clone(),
            window: Arc::new(window),
        })
    }
}

impl<F: Family> Expr<F> {
    pub fn eq(&self, rhs: impl IntoExpr<F>) -> Expr<Bool> {
        self.binary(op::EQ, rhs.into_expr().node)
    }

    pub fn not_eq(&self, rhs: impl IntoExpr<F>) -> Expr<Bool> {
        self.binary(op::NOT_EQ, rhs.into_expr().node)
    }

    pub fn is_distinct_from(&self, rhs: impl IntoExpr<F>) -> Expr<Bool> {
        self.binary(op::IS_DISTINCT_FROM, rhs.into_expr().node)
    }

    pub fn is_not_distinct_from(&self, rhs: impl IntoExpr<F>) -> Expr<Bool> {
        self.binary(op::IS_NOT_DISTINCT_FROM, rhs.into_expr().node)
    }

    pub fn is_null(&self) -> Expr<Bool> {
        self.postfix(op::IS_NULL)
    }

    pub fn is_not_null(&self) -> Expr<Bool> {
        self.postfix(op::IS_NOT_NULL)
    }

    /// `expr IN (v1, v2, ...)`; an empty list fails at serialization.
    pub fn in_<I>(&self, values: I) -> Expr<Bool>
    where
        I: IntoIterator,
        I::Item: IntoExpr<F>,
    {
        self.binary(op::IN, list_node(values))
    }

    pub fn not_in<I>(&self, values: I) -> Expr<Bool>
    where
        I: IntoIterator,
        I::Item: IntoExpr<F>,
    {
        self.binary(op::NOT_IN, list_node(values))
    }

    /// `expr IN (SELECT ...)`
    pub fn in_query(&self, query: impl Into<Statement>) -> Expr<Bool> {
        self.binary(op::IN, Arc::new(Node::SubQuery(Arc::new(query.into()))))
    }

    pub fn not_in_query(&self, query: impl Into<Statement>) -> Expr<Bool> {
        self.binary(op::NOT_IN, Arc::new(Node::SubQuery(Arc::new(query.into()))))
    }
}

fn list_node<F, I>(values: I) -> Arc<Node>
where
    I: IntoIterator,
    I::Item: IntoExpr<F>,
{
    Arc::new(Node::List(
        values.into_iter().map(|v| v.into_expr().node).collect(),
    ))
}

impl<F: Ordered> Expr<F> {
    pub fn lt(&self, rhs: impl IntoExpr<F>) -> Expr<Bool> {
        self.binary(op::LT, rhs.into_expr().node)
    }

    pub fn lt_eq(&self, rhs: impl IntoExpr<F>) -> Expr<Bool> {
        self.binary(op::LT_EQ, rhs.into_expr().node)
    }

    pub fn gt(&self, rhs: impl IntoExpr<F>) -> Expr<Bool> {
        self.binary(op::GT, rhs.into_expr().node)
    }

    pub fn gt_eq(&self, rhs: impl IntoExpr<F>) -> Expr<Bool> {
        self.binary(op::GT_EQ, rhs.into_expr().node)
    }

    pub fn between(&self, low: impl IntoExpr<F>, high: impl IntoExpr<F>) -> Expr<Bool> {
        self.between_impl(low, high, false)
    }

    pub fn not_between(&self, low: impl IntoExpr<F>, high: impl IntoExpr<F>) -> Expr<Bool> {
        self.between_impl(low, high, true)
    }

    fn between_impl(
        &self,
        low: impl IntoExpr<F>,
        high: impl IntoExpr<F>,
        negated: bool,
    ) -> Expr<Bool> {
        Expr::from_node(Node::Between {
            operand: self.node.clone(),
            low: low.into_expr().node,
            high: high.into_expr().node,
            negated,
        })
    }
}

impl<F: Numeric> Expr<F> {
    pub fn add(&self, rhs: impl IntoExpr<F>) -> Expr<F> {
        self.binary(op::ADD, rhs.into_expr().node)
    }

    pub fn sub(&self, rhs: impl IntoExpr<F>) -> Expr<F> {
        self.binary(op::SUB, rhs.into_expr().node)
    }

    pub fn mul(&self, rhs: impl IntoExpr<F>) -> Expr<F> {
        self.binary(op::MUL, rhs.into_expr().node)
    }

    pub fn div(&self, rhs: impl IntoExpr<F>) -> Expr<F> {
        self.binary(op::DIV, rhs.into_expr().node)
    }

    /// `expr % rhs`
    pub fn rem(&self, rhs: impl IntoExpr<F>) -> Expr<F> {
        self.binary(op::MOD, rhs.into_expr().node)
    }

    pub fn pow(&self, rhs: impl IntoExpr<F>) -> Expr<F> {
        self.binary(op::POW, rhs.into_expr().node)
    }

    pub fn neg(&self) -> Expr<F> {
        Expr::from_node(Node::Prefix {
            op: op::NEG,
            operand: self.node.clone(),
        })
    }
}

impl Expr<Integer> {
    pub fn bit_and(&self, rhs: impl IntoExpr<Integer>) -> Expr<Integer> {
        self.binary(op::BIT_AND, rhs.into_expr().node)
    }

    pub fn bit_or(&self, rhs: impl IntoExpr<Integer>) -> Expr<Integer> {
        self.binary(op::BIT_OR, rhs.into_expr().node)
    }

    pub fn bit_xor(&self, rhs: impl IntoExpr<Integer>) -> Expr<Integer> {
        self.binary(op::BIT_XOR, rhs.into_expr().node)
    }

    pub fn shl(&self, rhs: impl IntoExpr<Integer>) -> Expr<Integer> {
        self.binary(op::SHL, rhs.into_expr().node)
    }

    pub fn shr(&self, rhs: impl IntoExpr<Integer>) -> Expr<Integer> {
        self.binary(op::SHR, rhs.into_expr().node)
    }

    pub fn bit_not(&self) -> Expr<Integer> {
        Expr::from_node(Node::Prefix {
            op: op::BIT_NOT,
            operand: self.node.clone(),
        })
    }
}

impl Expr<Text> {
    /// `expr || rhs`
    pub fn concat(&self, rhs: impl IntoExpr<Text>) -> Expr<Text> {
        self.binary(op::CONCAT, rhs.into_expr().node)
    }

    pub fn like(&self, pattern: impl IntoExpr<Text>) -> Expr<Bool> {
        self.binary(op::LIKE, pattern.into_expr().node)
    }

    pub fn not_like(&self, pattern: impl IntoExpr<Text>) -> Expr<Bool> {
        self.binary(op::NOT_LIKE, pattern.into_expr().node)
    }

    pub fn regexp_like(&self, pattern: impl IntoExpr<Text>, case_sensitive: bool) -> Expr<Bool> {
        let op = if case_sensitive { op::REGEXP } else { op::REGEXP_CI };
        self.binary(op, pattern.into_expr().node)
    }

    pub fn not_regexp_like(
        &self,
        pattern: impl IntoExpr<Text>,
        case_sensitive: bool,
    ) -> Expr<Bool> {
        let op = if case_sensitive {
            op::NOT_REGEXP
        } else {
            op::NOT_REGEXP_CI
        };
        self.binary(op, pattern.into_expr().node)
    }
}

impl Expr<Bool> {
    pub fn and(&self, rhs: impl IntoExpr<Bool>) -> Expr<Bool> {
        self.binary(op::AND, rhs.into_expr().node)
    }

    pub fn or(&self, rhs: impl IntoExpr<Bool>) -> Expr<Bool> {
        self.binary(op::OR, rhs.into_expr().node)
    }

    pub fn not(&self) -> Expr<Bool> {
        Expr::from_node(Node::Prefix {
            op: op::NOT,
            operand: self.node.clone(),
        })
    }

    pub fn is_true(&self) -> Expr<Bool> {
        self.postfix(op::IS_TRUE)
    }

    pub fn is_false(&self) -> Expr<Bool> {
        self.postfix(op::IS_FALSE)
    }

    pub fn is_unknown(&self) -> Expr<Bool> {
        self.postfix(op::IS_UNKNOWN)
    }
}

impl<F: Temporal> Expr<F> {
    pub fn add_interval(&self, interval: impl IntoExpr<Interval>) -> Expr<F> {
        self.binary(op::ADD, interval.into_expr().node)
    }

    pub fn sub_interval(&self, interval: impl IntoExpr<Interval>) -> Expr<F> {
        self.binary(op::SUB, interval.into_expr().node)
    }

    /// Difference of two values of the same temporal family.
    pub fn since(&self, earlier: impl IntoExpr<F>) -> Expr<Interval> {
        self.binary(op::SUB, earlier.into_expr().node)
    }
}

/// An expression of unknown family.
///
/// Used where heterogeneous expressions share a list: INSERT rows, GROUP BY,
/// function arguments.
#[derive(Debug, Clone)]
pub struct AnyExpr(pub(crate) Arc<Node>);

impl AnyExpr {
    /// Declare the family.
    pub fn typed<F>(self) -> Expr<F> {
        Expr::from_arc(self.0)
    }
}

/// Conversion into an [`AnyExpr`].
pub trait IntoAnyExpr {
    fn into_any_expr(self) -> AnyExpr;
}

impl IntoAnyExpr for AnyExpr {
    fn into_any_expr(self) -> AnyExpr {
        self
    }
}

impl<F> IntoAnyExpr for Expr<F> {
    fn into_any_expr(self) -> AnyExpr {
        AnyExpr(self.node)
    }
}

impl<F> IntoAnyExpr for &Expr<F> {
    fn into_any_expr(self) -> AnyExpr {
        AnyExpr(self.node.clone())
    }
}

/// A list of heterogeneous expressions.
pub trait IntoExprList {
    fn into_expr_list(self) -> Vec<AnyExpr>;
}

impl IntoExprList for Vec<AnyExpr> {
    fn into_expr_list(self) -> Vec<AnyExpr> {
        self
    }
}

impl<T: IntoAnyExpr> IntoExprList for T {
    fn into_expr_list(self) -> Vec<AnyExpr> {
        vec![self.into_any_expr()]
    }
}

macro_rules! impl_expr_list_tuple {
    ($($T:ident),+; $($idx:tt),+) => {
        impl<$($T: IntoAnyExpr),+> IntoExprList for ($($T,)+) {
            fn into_expr_list(self) -> Vec<AnyExpr> {
                vec![$(self.$idx.into_any_expr()),+]
            }
        }
    };
}

crate::macros::tuple_impls!(impl_expr_list_tuple);
