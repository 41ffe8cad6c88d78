//! Scalar expressions used by `FILTER` and `ORDER BY` key clauses.

use fukurow_core::{Solution, Term, Variable};
use thiserror::Error;

/// An expression that resolves to a term given a solution.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Variable(Variable),
    Literal(Term),
    Arithmetic {
        op: ArithmeticOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Expression {
    /// Resolve this expression against `solution`. A variable that isn't
    /// bound, or arithmetic over a non-numeric operand, resolves to `None`
    /// rather than erroring — callers that need a hard failure (comparison)
    /// turn a `None` into [`ExpressionError::Unbound`] themselves.
    pub fn resolve(&self, solution: &Solution) -> Option<Term> {
        match self {
            Expression::Variable(var) => solution.get(var).cloned(),
            Expression::Literal(term) => Some(term.clone()),
            Expression::Arithmetic { op, left, right } => {
                let l = left.resolve(solution)?.as_f64()?;
                let r = right.resolve(solution)?.as_f64()?;
                let result = match op {
                    ArithmeticOp::Add => l + r,
                    ArithmeticOp::Subtract => l - r,
                    ArithmeticOp::Multiply => l * r,
                    ArithmeticOp::Divide => l / r,
                };
                Some(Term::float(result))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

/// A `FILTER`'s sole binary comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub op: CompareOp,
    pub left: Expression,
    pub right: Expression,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionError {
    #[error("comparison operand is unbound")]
    Unbound,
    #[error("comparison operands are not comparable")]
    TypeMismatch,
}

impl Comparison {
    /// Evaluate the comparison. A type error (incompatible operand kinds,
    /// or an unbound operand) is returned rather than swallowed here —
    /// `Filter`'s evaluation is what turns this into a dropped solution,
    /// per this pipeline's error-handling policy.
    pub fn matches(&self, solution: &Solution) -> Result<bool, ExpressionError> {
        let left = self.left.resolve(solution).ok_or(ExpressionError::Unbound)?;
        let right = self.right.resolve(solution).ok_or(ExpressionError::Unbound)?;

        if let (Some(l), Some(r)) = (left.as_f64(), right.as_f64()) {
            return l
                .partial_cmp(&r)
                .map(|ord| apply(ord, self.op))
                .ok_or(ExpressionError::TypeMismatch);
        }
        if let (Some(l), Some(r)) = (left.as_text(), right.as_text()) {
            return Ok(apply(l.cmp(r), self.op));
        }
        match self.op {
            CompareOp::Eq => Ok(left == right),
            CompareOp::Ne => Ok(left != right),
            _ => Err(ExpressionError::TypeMismatch),
        }
    }
}

fn apply(ordering: std::cmp::Ordering, op: CompareOp) -> bool {
    use std::cmp::Ordering::*;
    match op {
        CompareOp::Lt => ordering == Less,
        CompareOp::Le => ordering != Greater,
        CompareOp::Gt => ordering == Greater,
        CompareOp::Ge => ordering != Less,
        CompareOp::Eq => ordering == Equal,
        CompareOp::Ne => ordering != Equal,
    }
}
