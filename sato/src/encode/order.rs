//! Order encoding of linear inequations into CNF of primitive comparisons.
//!
//! `a1*x1 + ... + an*xn <= c` is equivalent to the conjunction, over every
//! tuple `(b1, ..., bn)` with `b1 + ... + bn = c - n + 1` and each `bi` in
//! `[lb(ai*xi) - 1, ub(ai*xi)]`, of the clauses `(a1*x1 <= b1) ∨ ... ∨
//! (an*xn <= bn)`. Each `ai*xi <= bi` is then reduced to a primitive
//! comparison by hash translation.
//!
//! `-(e <= c)` is encoded as `-e <= -c - 1`, which has the same size as the
//! positive form.

use anyhow::Result;
use itertools::Itertools;

use crate::csp::Inequation;
use crate::csp::LinearExpression;
use crate::csp::PrimitiveComparison;
use crate::types::Int;

/// Conjunction of disjunctions of primitive comparisons.
pub type PrimitiveCnf = Vec<Vec<PrimitiveComparison>>;

/// CNF of primitive comparisons logically equivalent to the inequation.
pub fn encode_inequation(ineq: &Inequation) -> Result<PrimitiveCnf> {
    let cnf = if ineq.sign() {
        encode_le(ineq.expression(), ineq.constant())?
    } else {
        encode_le(&ineq.expression().negated(), -1 - ineq.constant())?
    };
    let cnf = dedup_clauses(cnf);
    tracing::trace!(
        "{ineq} : CNF = {{{}}}",
        cnf.iter().map(|c| format!("[{}]", c.iter().join(";"))).join(", ")
    );
    Ok(cnf)
}

/// CNF of `expr <= c`.
fn encode_le(expr: &LinearExpression, c: Int) -> Result<PrimitiveCnf> {
    if expr.is_empty() {
        return Ok(if 0 <= c { Vec::new() } else { vec![Vec::new()] });
    }
    if c < expr.lb() {
        // never satisfied: no tuple reaches the target, the CNF is false
        return Ok(vec![Vec::new()]);
    }
    let target = c - expr.len() as Int + 1;
    let domains: Vec<(Int, Int)> = expr.terms().iter().map(|t| (t.lb() - 1, t.ub())).collect();

    let mut cnf = Vec::new();
    for combination in combinations_with_sum(&domains, target) {
        let clause = expr
            .terms()
            .iter()
            .zip(combination)
            .map(|(term, b)| Inequation::le(LinearExpression::single(term.clone()), b).to_primitive())
            .collect::<Result<Vec<_>>>()?;
        cnf.push(clause);
    }
    Ok(cnf)
}

/// Every tuple of values, one per inclusive range, whose sum is `target`.
///
/// Tuples come in lexicographic order (the first range varies slowest).
/// Partial tuples that cannot reach the target any more are pruned.
pub fn combinations_with_sum(domains: &[(Int, Int)], target: Int) -> Vec<Vec<Int>> {
    // reachable sums of the ranges after position i
    let mut rest = vec![(0, 0); domains.len() + 1];
    for (i, &(lo, hi)) in domains.iter().enumerate().rev() {
        rest[i] = (rest[i + 1].0 + lo, rest[i + 1].1 + hi);
    }

    let mut partials: Vec<(Vec<Int>, Int)> = vec![(Vec::new(), 0)];
    for (i, &(lo, hi)) in domains.iter().enumerate() {
        let (rest_min, rest_max) = rest[i + 1];
        let mut extended = Vec::new();
        for (combination, sum) in &partials {
            for value in lo..=hi {
                let sum = sum + value;
                if sum + rest_min <= target && target <= sum + rest_max {
                    let mut next = combination.clone();
                    next.push(value);
                    extended.push((next, sum));
                }
            }
        }
        partials = extended;
    }
    partials
        .into_iter()
        .filter(|(_, sum)| *sum == target)
        .map(|(combination, _)| combination)
        .collect()
}

/// Remove clauses equal to a previous one as sets of literals.
fn dedup_clauses(cnf: PrimitiveCnf) -> PrimitiveCnf {
    cnf.into_iter()
        .unique_by(|clause| clause.iter().cloned().sorted().dedup().collect::<Vec<_>>())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::rc::Rc;

    use super::*;
    use crate::csp::IntegerVariable;
    use crate::product::cartesian_product;

    fn var(name: &str, lb: Int, ub: Int) -> Rc<IntegerVariable> {
        Rc::new(IntegerVariable::new(name, lb, ub).unwrap())
    }

    /// Truth of the CNF when every primitive comparison takes its integer meaning.
    fn cnf_holds(cnf: &PrimitiveCnf, values: &HashMap<String, Int>) -> bool {
        cnf.iter()
            .all(|clause| clause.iter().any(|p| p.eval(values[p.var().name()])))
    }

    /// Check the encoding of `expr <= c` and of its negation on all assignments.
    fn verify_all(vars: &[Rc<IntegerVariable>], coeffs: &[Int], c: Int) {
        let expr = LinearExpression::from_pairs(vars.iter().cloned().zip(coeffs.iter().copied())).unwrap();
        let positive = encode_inequation(&Inequation::le(expr.clone(), c)).unwrap();
        let negative = encode_inequation(&Inequation::new(expr.clone(), c, false)).unwrap();
        let ranges: Vec<Vec<Int>> = vars.iter().map(|v| (v.lb()..=v.ub()).collect()).collect();
        for assignment in cartesian_product(&ranges) {
            let values: HashMap<String, Int> = vars
                .iter()
                .map(|v| v.name().to_string())
                .zip(assignment.iter().copied())
                .collect();
            let expected = expr.eval(|name| values[name]) <= c;
            assert_eq!(cnf_holds(&positive, &values), expected, "{expr}<={c} with {values:?}");
            assert_eq!(cnf_holds(&negative, &values), !expected, "-({expr}<={c}) with {values:?}");
        }
    }

    #[test]
    fn golden_two_terms() -> Result<()> {
        let (x, y) = (var("x", 0, 2), var("y", 0, 2));
        let expr = LinearExpression::from_pairs([(x, 1), (y, 1)])?;
        let cnf = encode_inequation(&Inequation::le(expr, 2))?;
        let printed: Vec<String> = cnf.iter().map(|c| c.iter().join(" ")).collect();
        assert_eq!(
            printed,
            vec!["x<=-1 y<=2", "x<=0 y<=1", "x<=1 y<=0", "x<=2 y<=-1"]
        );
        Ok(())
    }

    #[test]
    fn golden_negative_coefficient() -> Result<()> {
        let expr = LinearExpression::from_pairs([(var("x", 0, 2), -1)])?;
        let cnf = encode_inequation(&Inequation::le(expr, -1))?;
        let printed: Vec<String> = cnf.iter().map(|c| c.iter().join(" ")).collect();
        assert_eq!(printed, vec!["-(x<=0)"]);
        Ok(())
    }

    #[test]
    fn golden_scaled_terms() -> Result<()> {
        // 2x - 3y <= 1 with x in [0,1], y in [0,1]
        let expr = LinearExpression::from_pairs([(var("x", 0, 1), 2), (var("y", 0, 1), -3)])?;
        let cnf = encode_inequation(&Inequation::le(expr, 1))?;
        let printed: Vec<String> = cnf.iter().map(|c| c.iter().join(" ")).collect();
        // target 0, 2x in [-1,2], -3y in [-4,0]
        assert_eq!(printed, vec!["x<=0 -(y<=-1)", "x<=0 -(y<=0)", "x<=1 -(y<=0)"]);
        Ok(())
    }

    #[test]
    fn single_variable_soundness() {
        let x = var("x", -2, 3);
        for c in (x.lb() - 2)..=(x.ub() + 2) {
            verify_all(&[x.clone()], &[1], c);
        }
    }

    #[test]
    fn multi_term_soundness() {
        let (x, y, z) = (var("x", -1, 2), var("y", 0, 3), var("z", 1, 2));
        for c in -8..=8 {
            verify_all(&[x.clone(), y.clone()], &[1, 1], c);
            verify_all(&[x.clone(), y.clone()], &[2, -3], c);
            verify_all(&[x.clone(), y.clone(), z.clone()], &[-1, 2, 1], c);
        }
    }

    #[test]
    fn negation_grows_with_the_domain() -> Result<()> {
        // x > y is -(x - y <= 0): one clause per target tuple plus bound clauses
        let (x, y) = (var("x", 0, 30), var("y", 0, 30));
        let expr = LinearExpression::from_pairs([(x.clone(), 1), (y.clone(), -1)])?;
        let cnf = encode_inequation(&Inequation::new(expr, 0, false))?;
        assert!(cnf.len() <= 31 + 2, "{} clauses", cnf.len());
        verify_all(&[var("x", 0, 5), var("y", 0, 5)], &[1, -1], 0);
        Ok(())
    }

    #[test]
    fn extreme_constants() -> Result<()> {
        let x = var("x", 0, 3);
        let expr = LinearExpression::from_pairs([(x, 1)])?;
        assert_eq!(encode_inequation(&Inequation::le(expr.clone(), Int::MAX))?, PrimitiveCnf::new());
        assert_eq!(encode_inequation(&Inequation::le(expr.clone(), Int::MIN))?, vec![Vec::new()]);
        assert_eq!(encode_inequation(&Inequation::new(expr.clone(), Int::MAX, false))?, vec![Vec::new()]);
        assert_eq!(encode_inequation(&Inequation::new(expr, Int::MIN, false))?, PrimitiveCnf::new());
        let empty = LinearExpression::default();
        assert_eq!(encode_inequation(&Inequation::le(empty.clone(), Int::MAX))?, PrimitiveCnf::new());
        assert_eq!(encode_inequation(&Inequation::new(empty, Int::MIN, false))?, PrimitiveCnf::new());
        Ok(())
    }

    #[test]
    fn constant_inequations() -> Result<()> {
        let empty = LinearExpression::default();
        assert_eq!(encode_inequation(&Inequation::le(empty.clone(), 0))?, PrimitiveCnf::new());
        assert_eq!(encode_inequation(&Inequation::le(empty.clone(), -2))?, vec![Vec::new()]);
        assert_eq!(encode_inequation(&Inequation::new(empty, 3, false))?, vec![Vec::new()]);
        Ok(())
    }

    #[test]
    fn combinations() {
        assert_eq!(
            combinations_with_sum(&[(-1, 2), (-1, 2)], 1),
            vec![vec![-1, 2], vec![0, 1], vec![1, 0], vec![2, -1]]
        );
        assert_eq!(combinations_with_sum(&[], 0), vec![Vec::<Int>::new()]);
        assert!(combinations_with_sum(&[], 1).is_empty());
        assert!(combinations_with_sum(&[(0, 1)], 5).is_empty());
    }
}
