use super::expression::LinearExpr;
use super::registry::VariableId;
use crate::domain::OptimizationType;

/// Sparse objective produced by an [`ObjectiveAssembler`]
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub direction: OptimizationType,
    pub expr: LinearExpr,
}

/// Accumulates weighted terms into a scalar objective
#[derive(Debug, Clone)]
pub struct ObjectiveAssembler {
    direction: OptimizationType,
    expr: LinearExpr,
}

impl ObjectiveAssembler {
    pub fn new(direction: OptimizationType) -> Self {
        Self {
            direction,
            expr: LinearExpr::new(),
        }
    }

    pub fn minimize() -> Self {
        Self::new(OptimizationType::Minimize)
    }

    pub fn maximize() -> Self {
        Self::new(OptimizationType::Maximize)
    }

    pub fn add_term(&mut self, coefficient: f64, var: VariableId) -> &mut Self {
        self.expr.add_term(coefficient, var);
        self
    }

    pub fn add_expr(&mut self, expr: impl Into<LinearExpr>) -> &mut Self {
        self.expr += expr;
        self
    }

    pub fn finish(self) -> Objective {
        Objective {
            direction: self.direction,
            expr: self.expr,
        }
    }
}
