// Sparse linear expressions over registered variables

use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use super::registry::VariableId;
use crate::domain::ConstraintType;

/// `Σ coeff·var + constant`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(VariableId, f64)>,
    constant: f64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constant(value: f64) -> Self {
        Self {
            terms: Vec::new(),
            constant: value,
        }
    }

    pub fn term(coefficient: f64, var: VariableId) -> Self {
        Self {
            terms: vec![(var, coefficient)],
            constant: 0.0,
        }
    }

    pub fn terms(&self) -> &[(VariableId, f64)] {
        &self.terms
    }

    pub fn constant_part(&self) -> f64 {
        self.constant
    }

    pub fn add_term(&mut self, coefficient: f64, var: VariableId) {
        self.terms.push((var, coefficient));
    }

    pub fn leq(self, rhs: impl Into<LinearExpr>) -> LinearConstraint {
        LinearConstraint::new(self - rhs.into(), ConstraintType::LessThanOrEqual)
    }

    pub fn geq(self, rhs: impl Into<LinearExpr>) -> LinearConstraint {
        LinearConstraint::new(self - rhs.into(), ConstraintType::GreaterThanOrEqual)
    }

    pub fn equals(self, rhs: impl Into<LinearExpr>) -> LinearConstraint {
        LinearConstraint::new(self - rhs.into(), ConstraintType::Equal)
    }
}

impl From<VariableId> for LinearExpr {
    fn from(var: VariableId) -> Self {
        LinearExpr::term(1.0, var)
    }
}

impl From<f64> for LinearExpr {
    fn from(value: f64) -> Self {
        LinearExpr::constant(value)
    }
}

impl<T: Into<LinearExpr>> Add<T> for LinearExpr {
    type Output = LinearExpr;

    fn add(mut self, rhs: T) -> LinearExpr {
        self += rhs;
        self
    }
}

impl<T: Into<LinearExpr>> AddAssign<T> for LinearExpr {
    fn add_assign(&mut self, rhs: T) {
        let rhs = rhs.into();
        self.terms.extend(rhs.terms);
        self.constant += rhs.constant;
    }
}

impl<T: Into<LinearExpr>> Sub<T> for LinearExpr {
    type Output = LinearExpr;

    fn sub(self, rhs: T) -> LinearExpr {
        self + (-rhs.into())
    }
}

impl Neg for LinearExpr {
    type Output = LinearExpr;

    fn neg(self) -> LinearExpr {
        self * -1.0
    }
}

impl Mul<f64> for LinearExpr {
    type Output = LinearExpr;

    fn mul(mut self, rhs: f64) -> LinearExpr {
        for (_, coefficient) in &mut self.terms {
            *coefficient *= rhs;
        }
        self.constant *= rhs;
        self
    }
}

impl Mul<VariableId> for f64 {
    type Output = LinearExpr;

    fn mul(self, rhs: VariableId) -> LinearExpr {
        LinearExpr::term(self, rhs)
    }
}

impl<T: Into<LinearExpr>> Add<T> for VariableId {
    type Output = LinearExpr;

    fn add(self, rhs: T) -> LinearExpr {
        LinearExpr::from(self) + rhs
    }
}

impl<T: Into<LinearExpr>> Sub<T> for VariableId {
    type Output = LinearExpr;

    fn sub(self, rhs: T) -> LinearExpr {
        LinearExpr::from(self) - rhs
    }
}

impl Sum for LinearExpr {
    fn sum<I: Iterator<Item = LinearExpr>>(iter: I) -> LinearExpr {
        iter.fold(LinearExpr::new(), |acc, expr| acc + expr)
    }
}

/// `expr <op> 0`, with everything moved to the left-hand side
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    expr: LinearExpr,
    constraint_type: ConstraintType,
    name: String,
}

impl LinearConstraint {
    fn new(expr: LinearExpr, constraint_type: ConstraintType) -> Self {
        Self {
            expr,
            constraint_type,
            name: String::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn constraint_type(&self) -> ConstraintType {
        self.constraint_type
    }

    /// Variable terms of the normalized left-hand side.
    pub fn terms(&self) -> &[(VariableId, f64)] {
        self.expr.terms()
    }

    /// Right-hand side once constants are moved across.
    pub fn bound(&self) -> f64 {
        -self.expr.constant_part()
    }
}
