//! Domain axioms of the order encoding.

use std::rc::Rc;

use crate::csp::IntegerVariable;
use crate::csp::PrimitiveComparison;
use crate::encode::order::PrimitiveCnf;

/// Clauses forcing `p(x, c)` to mean `x <= c` for the variable `x`.
///
/// With `x` in `[l, u]` these are `[-(x <= l-1)]`, `[x <= u]` and, for each
/// `i` in `[l, u]`, the monotonicity clause `[-(x <= i-1), x <= i]`.
pub fn axioms(var: &Rc<IntegerVariable>) -> PrimitiveCnf {
    let (lb, ub) = var.bounds();
    let le = |c| PrimitiveComparison::le(var.clone(), c);
    let mut cnf = vec![vec![le(lb - 1).negated()], vec![le(ub)]];
    for i in lb..=ub {
        cnf.push(vec![le(i - 1).negated(), le(i)]);
    }
    cnf
}
