use std::fmt;
use std::rc::Rc;

use anyhow::Result;
use num_integer::div_ceil;
use num_integer::div_floor;

use crate::csp::IntegerVariable;
use crate::csp::LinearExpression;
use crate::csp::LinearTerm;
use crate::error::Error;
use crate::types::Int;

/// Comparison `lhs <= constant`, or its negation when `sign` is false.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Comparison<L> {
    lhs: L,
    constant: Int,
    sign: bool,
}

/// Canonical linear constraint `a1*x1 + ... + an*xn <= c` (or its negation).
pub type Inequation = Comparison<LinearExpression>;

/// Atomic `x <= c` (or its negation), the unit predicate of the order encoding.
pub type PrimitiveComparison = Comparison<Rc<IntegerVariable>>;

impl<L> Comparison<L> {
    pub fn new(lhs: L, constant: Int, sign: bool) -> Self {
        Comparison { lhs, constant, sign }
    }

    pub fn le(lhs: L, constant: Int) -> Self {
        Self::new(lhs, constant, true)
    }

    pub fn lhs(&self) -> &L {
        &self.lhs
    }

    pub fn constant(&self) -> Int {
        self.constant
    }

    /// `true` for `lhs <= c`, `false` for `-(lhs <= c)`.
    pub fn sign(&self) -> bool {
        self.sign
    }

    pub fn inverse_sign(&mut self) {
        self.sign = !self.sign;
    }

    pub fn negated(mut self) -> Self {
        self.inverse_sign();
        self
    }
}

impl Inequation {
    pub fn expression(&self) -> &LinearExpression {
        &self.lhs
    }

    /// Truth value of the inequation for the given variable values.
    pub fn eval(&self, value_of: impl Fn(&str) -> Int) -> bool {
        (self.lhs.eval(value_of) <= self.constant) == self.sign
    }

    /// Hash translation of a one-term inequation `a*x <= b` into `x <= c`.
    ///
    /// For `a > 0` the result is `x <= floor(b/a)`, otherwise it is
    /// `-(x <= ceil(b/a) - 1)`. A negated inequation gives the negated
    /// primitive comparison.
    pub fn to_primitive(&self) -> Result<PrimitiveComparison> {
        match self.lhs.terms() {
            [term] => {
                let primitive = PrimitiveComparison::translate(term, self.constant);
                Ok(if self.sign {
                    primitive
                } else {
                    primitive.negated()
                })
            }
            _ => Err(Error::Encoding(format!(
                "hash translation needs exactly one term, got '{self}'"
            ))
            .into()),
        }
    }
}

impl PrimitiveComparison {
    /// Primitive comparison equivalent to `term <= bound`.
    pub fn translate(term: &LinearTerm, bound: Int) -> Self {
        let a = term.coeff();
        let var = term.var().clone();
        if a > 0 {
            Self::new(var, div_floor(bound, a), true)
        } else {
            Self::new(var, div_ceil(bound, a) - 1, false)
        }
    }

    pub fn var(&self) -> &Rc<IntegerVariable> {
        &self.lhs
    }

    /// Truth value for the given value of the variable.
    pub fn eval(&self, value: Int) -> bool {
        (value <= self.constant) == self.sign
    }
}

impl<L: fmt::Display> fmt::Display for Comparison<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sign {
            write!(f, "{}<={}", self.lhs, self.constant)
        } else {
            write!(f, "-({}<={})", self.lhs, self.constant)
        }
    }
}
