use super::family::Bool;
use super::node::{CaseNode, Node};
use super::typed::{Expr, IntoExpr};
use std::marker::PhantomData;
use std::sync::Arc;

/// `CASE` builder producing family `F`, with WHEN operands of family `W`.
///
/// Arms are collected as given; a WHEN/THEN count mismatch is reported when
/// the expression is serialized.
pub struct Case<F, W = Bool> {
    node: CaseNode,
    _family: PhantomData<fn() -> (F, W)>,
}

/// Searched `CASE WHEN cond THEN .. END`.
pub fn case<F>() -> Case<F, Bool> {
    Case {
        node: CaseNode::default(),
        _family: PhantomData,
    }
}

/// Simple `CASE operand WHEN value THEN .. END`.
pub fn case_on<F, W>(operand: impl IntoExpr<W>) -> Case<F, W> {
    Case {
        node: CaseNode {
            operand: Some(operand.into_expr().node),
            ..CaseNode::default()
        },
        _family: PhantomData,
    }
}

impl<F, W> Case<F, W> {
    pub fn when(mut self, condition: impl IntoExpr<W>) -> Self {
        self.node.whens.push(condition.into_expr().node);
        self
    }

    pub fn then(mut self, result: impl IntoExpr<F>) -> Self {
        self.node.thens.push(result.into_expr().node);
        self
    }

    pub fn else_(mut self, result: impl IntoExpr<F>) -> Self {
        self.node.otherwise = Some(result.into_expr().node);
        self
    }

    pub fn end(self) -> Expr<F> {
        Expr::from_node(Node::Case(Arc::new(self.node)))
    }
}

impl<F, W> IntoExpr<F> for Case<F, W> {
    fn into_expr(self) -> Expr<F> {
        self.end()
    }
}
