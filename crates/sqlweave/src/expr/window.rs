use super::node::Window;
use super::typed::IntoExprList;
use crate::column::IntoOrderByList;

/// Empty `OVER ()` specification.
pub fn window() -> Window {
    Window::default()
}

impl Window {
    pub fn partition_by(mut self, exprs: impl IntoExprList) -> Self {
        self.partition_by
            .extend(exprs.into_expr_list().into_iter().map(|e| e.0));
        self
    }

    pub fn order_by(mut self, items: impl IntoOrderByList) -> Self {
        self.order_by.extend(items.into_order_by_list());
        self
    }
}
