use std::fmt;
use std::rc::Rc;

use anyhow::Result;

use crate::csp::IntegerVariable;
use crate::error::Error;
use crate::types::Int;

/// A linear term `a * x` where `a` is a non-zero constant.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct LinearTerm {
    var: Rc<IntegerVariable>,
    coeff: Int,
}

impl LinearTerm {
    /// Create a term.
    ///
    /// Fails if the coefficient is zero or if the values of the term, or of
    /// its negation, do not fit in an [Int].
    pub fn new(var: Rc<IntegerVariable>, coeff: Int) -> Result<Self> {
        if coeff == 0 {
            return Err(Error::invalid(
                format!("0{}", var.name()),
                "coefficient cannot equal 0",
            )
            .into());
        }
        let term = LinearTerm { var, coeff };
        if term.magnitude().is_none() {
            return Err(Error::invalid(&term, "constant out of range").into());
        }
        Ok(term)
    }

    /// One more than the largest absolute value of the term.
    fn magnitude(&self) -> Option<Int> {
        self.coeff.checked_neg()?;
        let lb = self.coeff.checked_mul(self.var.lb())?;
        let ub = self.coeff.checked_mul(self.var.ub())?;
        lb.checked_abs()?.max(ub.checked_abs()?).checked_add(1)
    }

    /// The term `-a * x`.
    pub fn negated(&self) -> Self {
        LinearTerm {
            var: self.var.clone(),
            coeff: -self.coeff,
        }
    }

    pub fn var(&self) -> &Rc<IntegerVariable> {
        &self.var
    }

    pub fn coeff(&self) -> Int {
        self.coeff
    }

    /// Smallest value taken by the term.
    pub fn lb(&self) -> Int {
        if self.coeff > 0 {
            self.coeff * self.var.lb()
        } else {
            self.coeff * self.var.ub()
        }
    }

    /// Largest value taken by the term.
    pub fn ub(&self) -> Int {
        if self.coeff > 0 {
            self.coeff * self.var.ub()
        } else {
            self.coeff * self.var.lb()
        }
    }
}

impl fmt::Display for LinearTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.coeff {
            1 => write!(f, "{}", self.var),
            -1 => write!(f, "-{}", self.var),
            a => write!(f, "{a}{}", self.var),
        }
    }
}

/// Sum of linear terms over distinct variables: `a1*x1 + ... + an*xn`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct LinearExpression {
    terms: Vec<LinearTerm>,
}

impl LinearExpression {
    /// Build an expression from `(variable, coefficient)` pairs.
    ///
    /// Pairs on the same variable are merged by summing their coefficients,
    /// in order of first occurrence. Terms whose merged coefficient is zero
    /// are dropped.
    ///
    /// Fails if a partial sum of the values of the terms may not fit in an
    /// [Int], so that bounds and sums of the expression, or of its negation,
    /// never overflow.
    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (Rc<IntegerVariable>, Int)>,
    ) -> Result<Self> {
        let mut merged: Vec<(Rc<IntegerVariable>, Int)> = Vec::new();
        for (var, coeff) in pairs {
            match merged.iter_mut().find(|(v, _)| v.name() == var.name()) {
                Some((_, c)) => {
                    *c = c
                        .checked_add(coeff)
                        .ok_or_else(|| Error::invalid(var.name(), "coefficient out of range"))?;
                }
                None => merged.push((var, coeff)),
            }
        }
        let terms = merged
            .into_iter()
            .filter(|(_, coeff)| *coeff != 0)
            .map(|(var, coeff)| LinearTerm::new(var, coeff))
            .collect::<Result<Vec<_>>>()?;
        let expr = LinearExpression { terms };
        let magnitude = expr
            .terms
            .iter()
            .try_fold(0 as Int, |acc, t| acc.checked_add(t.magnitude()?));
        if magnitude.is_none() {
            return Err(Error::invalid(&expr, "constant out of range").into());
        }
        Ok(expr)
    }

    /// Expression made of a single term.
    pub fn single(term: LinearTerm) -> Self {
        LinearExpression { terms: vec![term] }
    }

    /// The expression `-a1*x1 - ... - an*xn`.
    pub fn negated(&self) -> Self {
        LinearExpression {
            terms: self.terms.iter().map(LinearTerm::negated).collect(),
        }
    }

    pub fn terms(&self) -> &[LinearTerm] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn lb(&self) -> Int {
        self.terms.iter().map(LinearTerm::lb).sum()
    }

    pub fn ub(&self) -> Int {
        self.terms.iter().map(LinearTerm::ub).sum()
    }

    /// Value of the expression for the given variable values.
    ///
    /// `value_of` is queried with each variable name.
    pub fn eval(&self, value_of: impl Fn(&str) -> Int) -> Int {
        self.terms
            .iter()
            .map(|t| t.coeff * value_of(t.var.name()))
            .sum()
    }
}

impl fmt::Display for LinearExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 && term.coeff > 0 {
                write!(f, "+")?;
            }
            write!(f, "{term}")?;
        }
        Ok(())
    }
}
